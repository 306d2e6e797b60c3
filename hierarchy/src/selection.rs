use crate::sort::Identified;
use api_client::{Album, Photograph};
use std::collections::BTreeSet;

/// Identifiers picked at the leaf level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<u64>,
}

impl Selection {
    /// Flip membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: u64) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<u64> {
        self.ids.iter().copied().collect()
    }

    pub fn select_all<T: Identified>(&mut self, displayed: &[T]) {
        self.ids.extend(displayed.iter().map(Identified::id));
    }

    pub fn unselect_all(&mut self) {
        self.ids.clear();
    }

    /// True when the displayed set is non-empty and every item of it is selected.
    pub fn is_all_selected<T: Identified>(&self, displayed: &[T]) -> bool {
        !displayed.is_empty() && displayed.iter().all(|item| self.ids.contains(&item.id()))
    }

    /// Forget ids that are no longer displayed.
    pub fn retain_displayed<T: Identified>(&mut self, displayed: &[T]) {
        let shown: BTreeSet<u64> = displayed.iter().map(Identified::id).collect();
        self.ids.retain(|id| shown.contains(id));
    }

    pub fn remove(&mut self, id: u64) {
        self.ids.remove(&id);
    }
}

/// Albums every selected photograph belongs to, in album-list order.
pub fn common_albums<'a, 'p, I>(albums: &'a [Album], selected: I) -> Vec<&'a Album>
where
    I: IntoIterator<Item = &'p Photograph>,
{
    let mut common: Option<BTreeSet<u64>> = None;
    for photo in selected {
        let memberships: BTreeSet<u64> = photo.albums.iter().copied().collect();
        common = Some(match common {
            None => memberships,
            Some(acc) => acc.intersection(&memberships).copied().collect(),
        });
    }
    match common {
        Some(ids) => albums.iter().filter(|a| ids.contains(&a.id)).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn album(id: u64, name: &str) -> Album {
        serde_json::from_value(json!({ "id": id, "name": name })).unwrap()
    }

    fn photo(id: u64, albums: &[u64]) -> Photograph {
        serde_json::from_value(json!({ "id": id, "albums": albums })).unwrap()
    }

    #[test]
    fn test_toggle() {
        let mut selection = Selection::default();
        assert!(selection.toggle(4));
        assert!(selection.contains(4));
        assert!(!selection.toggle(4));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_then_unselect_all() {
        let shown = vec![photo(1, &[]), photo(2, &[]), photo(3, &[])];
        let mut selection = Selection::default();
        assert!(!selection.is_all_selected(&shown));

        selection.select_all(&shown);
        assert_eq!(selection.len(), 3);
        assert!(selection.is_all_selected(&shown));

        selection.unselect_all();
        assert!(selection.is_empty());
        assert!(!selection.is_all_selected(&shown));
    }

    #[test]
    fn test_empty_leaf_set_is_never_all_selected() {
        let selection = Selection::default();
        let shown: Vec<Photograph> = Vec::new();
        assert!(!selection.is_all_selected(&shown));
    }

    #[test]
    fn test_retain_displayed() {
        let mut selection = Selection::default();
        selection.toggle(1);
        selection.toggle(9);
        selection.retain_displayed(&[photo(1, &[]), photo(2, &[])]);
        assert_eq!(selection.ids(), vec![1]);
    }

    #[test]
    fn test_common_albums_disjoint_memberships() {
        let albums = vec![album(1, "A"), album(2, "B")];
        let x = photo(10, &[1]);
        let y = photo(11, &[2]);

        assert!(common_albums(&albums, [&x, &y]).is_empty());
        let only_x = common_albums(&albums, [&x]);
        assert_eq!(only_x.len(), 1);
        assert_eq!(only_x[0].id, 1);
    }

    #[test]
    fn test_common_albums_intersection() {
        let albums = vec![album(1, "A"), album(2, "B")];
        let x = photo(10, &[2, 1]);
        let y = photo(11, &[1]);

        let both: Vec<u64> = common_albums(&albums, [&x, &y]).iter().map(|a| a.id).collect();
        assert_eq!(both, vec![1]);
        let only_x: Vec<u64> = common_albums(&albums, [&x]).iter().map(|a| a.id).collect();
        assert_eq!(only_x, vec![1, 2]);
        assert!(common_albums(&albums, std::iter::empty::<&Photograph>()).is_empty());
    }
}
