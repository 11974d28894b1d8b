//! Id-keyed list helpers shared by clips, markers and overlays.

/// An item stored in an ordered list and looked up by id.
pub(crate) trait Keyed {
    fn key(&self) -> &str;
}

/// Replace the item with the same id in place, or append it.
pub(crate) fn upsert<T: Keyed + PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    match items.iter_mut().find(|existing| existing.key() == item.key()) {
        Some(existing) if *existing == item => false,
        Some(existing) => {
            *existing = item;
            true
        }
        None => {
            items.push(item);
            true
        }
    }
}

/// Remove the item with the given id. Returns whether anything was removed.
pub(crate) fn remove<T: Keyed>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.key() != id);
    items.len() != before
}

/// Mutate the item with the given id. Returns whether its value changed.
pub(crate) fn update<T: Keyed + PartialEq + Clone>(
    items: &mut [T],
    id: &str,
    mutate: impl FnOnce(&mut T),
) -> bool {
    let Some(item) = items.iter_mut().find(|item| item.key() == id) else {
        return false;
    };
    let before = item.clone();
    mutate(item);
    *item != before
}
