// ── Ordered widget layout ──
//
// Pure, synchronous model of the homepage arrangement. Every mutation
// marks the layout dirty and bumps `revision`; only a publish that saw the
// latest revision may clear the dirty flag.

use std::collections::HashSet;

use tracing::warn;

use crate::error::CoreError;
use crate::model::{SettingValue, WidgetDescriptor};
use crate::ordering::move_item;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetLayout {
    widgets: Vec<WidgetDescriptor>,
    dirty: bool,
    revision: u64,
}

impl WidgetLayout {
    /// Build a clean layout. Later duplicates of an id are dropped.
    pub fn new(widgets: Vec<WidgetDescriptor>) -> Self {
        Self {
            widgets: dedupe(widgets),
            dirty: false,
            revision: 0,
        }
    }

    pub fn widgets(&self) -> &[WidgetDescriptor] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WidgetDescriptor> {
        self.widgets.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.widgets.iter().position(|w| w.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.widgets.iter().map(|w| w.id.as_str()).collect()
    }

    /// Enabled widgets in render order.
    pub fn rendered(&self) -> impl Iterator<Item = &WidgetDescriptor> {
        self.widgets.iter().filter(|w| w.enabled)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Flip `enabled` at `index`; returns the new state.
    pub fn toggle(&mut self, index: usize) -> Result<bool, CoreError> {
        let len = self.widgets.len();
        let widget = self
            .widgets
            .get_mut(index)
            .ok_or(CoreError::InvalidIndex { index, len })?;
        widget.enabled = !widget.enabled;
        let enabled = widget.enabled;
        self.touch();
        Ok(enabled)
    }

    /// Move the widget at `from` to `to`. Out-of-range or equal indices are
    /// a no-op and leave the layout clean.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let moved = move_item(&mut self.widgets, from, to);
        if moved {
            self.touch();
        }
        moved
    }

    pub fn update_setting(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: SettingValue,
    ) -> Result<(), CoreError> {
        let len = self.widgets.len();
        let widget = self
            .widgets
            .get_mut(index)
            .ok_or(CoreError::InvalidIndex { index, len })?;
        widget.settings.insert(key.into(), value);
        self.touch();
        Ok(())
    }

    pub fn enable_all(&mut self) {
        self.set_all(true);
    }

    pub fn disable_all(&mut self) {
        self.set_all(false);
    }

    /// Swap in a whole new sequence (used by reset). Marks dirty.
    pub fn replace(&mut self, widgets: Vec<WidgetDescriptor>) {
        self.widgets = dedupe(widgets);
        self.touch();
    }

    /// Clear the dirty flag if nothing changed since `revision`.
    pub fn mark_clean_at(&mut self, revision: u64) -> bool {
        if self.revision == revision {
            self.dirty = false;
            true
        } else {
            false
        }
    }

    fn set_all(&mut self, enabled: bool) {
        for w in &mut self.widgets {
            w.enabled = enabled;
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }
}

fn dedupe(widgets: Vec<WidgetDescriptor>) -> Vec<WidgetDescriptor> {
    let mut seen = HashSet::new();
    widgets
        .into_iter()
        .filter(|w| {
            let fresh = seen.insert(w.id.clone());
            if !fresh {
                warn!(id = %w.id, "dropping duplicate widget id");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn abc() -> WidgetLayout {
        let mut sermons = WidgetDescriptor::new("B", "Sermons", true);
        sermons.settings.insert("count".into(), SettingValue::Integer(3));
        sermons
            .settings
            .insert("show_speaker".into(), SettingValue::Bool(true));
        WidgetLayout::new(vec![
            WidgetDescriptor::new("A", "Hero", true),
            sermons,
            WidgetDescriptor::new("C", "Events", false),
        ])
    }

    fn flags(layout: &WidgetLayout) -> Vec<bool> {
        layout.widgets().iter().map(|w| w.enabled).collect()
    }

    #[test]
    fn reorder_front_to_back() {
        let mut layout = abc();
        assert!(layout.reorder(0, 2));
        assert_eq!(layout.ids(), ["B", "C", "A"]);
        assert!(layout.is_dirty());
    }

    #[test]
    fn reorder_out_of_range_stays_clean() {
        let mut layout = abc();
        assert!(!layout.reorder(0, 3));
        assert!(!layout.reorder(1, 1));
        assert_eq!(layout.ids(), ["A", "B", "C"]);
        assert!(!layout.is_dirty());
    }

    #[test]
    fn reorder_keeps_every_widget_for_all_pairs() {
        let ids = ["A", "B", "C", "D"];
        for from in 0..ids.len() {
            for to in 0..ids.len() {
                let mut layout = WidgetLayout::new(
                    ids.iter().map(|id| WidgetDescriptor::new(*id, *id, true)).collect(),
                );
                assert_eq!(layout.reorder(from, to), from != to, "{from} -> {to}");
                assert_eq!(layout.len(), ids.len());
                assert_eq!(layout.ids()[to], ids[from], "{from} -> {to}");

                let mut seen = layout.ids();
                seen.sort_unstable();
                assert_eq!(seen, ids, "{from} -> {to}");
                assert_eq!(layout.is_dirty(), from != to);
            }
        }
    }

    #[test]
    fn toggle_leaves_other_widgets_alone() {
        let mut layout = abc();
        let before = layout.widgets().to_vec();
        assert!(!layout.toggle(1).unwrap());

        assert_eq!(layout.ids(), ["A", "B", "C"]);
        assert_eq!(flags(&layout), [true, false, false]);
        assert_eq!(layout.get(1).unwrap().settings, before[1].settings);
        assert_eq!(layout.get(0).unwrap(), &before[0]);
        assert_eq!(layout.get(2).unwrap(), &before[2]);
    }

    #[test]
    fn toggle_twice_restores_but_stays_dirty() {
        let mut layout = abc();
        let before = layout.widgets().to_vec();
        assert!(!layout.toggle(0).unwrap());
        assert!(layout.toggle(0).unwrap());
        assert_eq!(layout.widgets(), before.as_slice());
        assert!(layout.get(0).unwrap().enabled);
        assert!(layout.is_dirty());
        assert!(layout.toggle(7).is_err());
    }

    #[test]
    fn rendered_follows_sequence_order() {
        let mut layout = abc();
        layout.reorder(2, 0);
        layout.toggle(0).unwrap();
        let rendered: Vec<_> = layout.rendered().map(|w| w.id.as_str()).collect();
        assert_eq!(rendered, ["C", "A", "B"]);
    }

    #[test]
    fn bulk_toggles() {
        let mut layout = abc();
        layout.reorder(2, 0);
        layout.enable_all();
        assert_eq!(flags(&layout), [true, true, true]);
        assert_eq!(layout.ids(), ["C", "A", "B"]);
        layout.disable_all();
        assert_eq!(flags(&layout), [false, false, false]);
        assert_eq!(layout.ids(), ["C", "A", "B"]);
        assert_eq!(layout.rendered().count(), 0);
        assert_eq!(layout.get(2).unwrap().settings.len(), 2);
    }

    #[test]
    fn settings_update_marks_dirty() {
        let mut layout = abc();
        layout
            .update_setting(1, "count", SettingValue::Integer(6))
            .unwrap();
        let settings = &layout.get(1).unwrap().settings;
        assert_eq!(settings["count"], SettingValue::Integer(6));
        assert_eq!(settings["show_speaker"], SettingValue::Bool(true));
        assert_eq!(settings.len(), 2);
        assert_eq!(layout.ids(), ["A", "B", "C"]);
        assert_eq!(flags(&layout), [true, true, false]);
        assert!(layout.is_dirty());
    }

    #[test]
    fn duplicates_dropped_on_load() {
        let layout = WidgetLayout::new(vec![
            WidgetDescriptor::new("A", "first", true),
            WidgetDescriptor::new("A", "second", false),
        ]);
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.get(0).unwrap().label, "first");
    }

    #[test]
    fn stale_revision_keeps_dirty() {
        let mut layout = abc();
        layout.toggle(0).unwrap();
        let seen = layout.revision();
        layout.toggle(1).unwrap();
        assert!(!layout.mark_clean_at(seen));
        assert!(layout.is_dirty());
        assert!(layout.mark_clean_at(layout.revision()));
        assert!(!layout.is_dirty());
    }
}
