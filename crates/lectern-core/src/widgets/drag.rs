// Drag gesture state for reordering widgets.
//
// Tracks the dragged index and the current drop candidate. Finishing the
// gesture yields a `Reorder` for `WidgetLayout::reorder`; the session
// itself never touches the layout. Dropping a session abandons it.

/// A completed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reorder {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    source: usize,
    candidate: Option<usize>,
}

impl DragSession {
    pub fn start(source: usize) -> Self {
        Self {
            source,
            candidate: None,
        }
    }

    pub fn source(&self) -> usize {
        self.source
    }

    /// Index currently highlighted as the drop target.
    pub fn candidate(&self) -> Option<usize> {
        self.candidate
    }

    pub fn hover(&mut self, index: usize) {
        self.candidate = (index != self.source).then_some(index);
    }

    pub fn leave(&mut self) {
        self.candidate = None;
    }

    /// Release over the highlighted candidate, if any.
    pub fn release(self) -> Option<Reorder> {
        self.candidate.map(|to| Reorder {
            from: self.source,
            to,
        })
    }

    /// Drop directly on `index`.
    pub fn drop_on(self, index: usize) -> Option<Reorder> {
        (index != self.source).then_some(Reorder {
            from: self.source,
            to: index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_then_drop() {
        let mut drag = DragSession::start(0);
        drag.hover(0);
        assert_eq!(drag.candidate(), None);
        drag.hover(2);
        assert_eq!(drag.release(), Some(Reorder { from: 0, to: 2 }));
    }

    #[test]
    fn leaving_clears_candidate() {
        let mut drag = DragSession::start(1);
        drag.hover(0);
        drag.leave();
        assert_eq!(drag.release(), None);
    }

    #[test]
    fn drop_on_self_is_nothing() {
        assert_eq!(DragSession::start(3).drop_on(3), None);
    }
}
