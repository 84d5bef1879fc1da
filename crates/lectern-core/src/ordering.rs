// Positional reordering shared by the widget layout and menu editors.

/// Remove the element at `from` and insert it at `to`.
///
/// Out-of-range indices and `from == to` leave `items` untouched and
/// return `false`.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    let len = items.len();
    if from >= len || to >= len || from == to {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}
