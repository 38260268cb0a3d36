//! The per-session wishlist.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Whether a toggle added or removed the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleStatus {
    Added,
    Removed,
}

impl ToggleStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
        }
    }
}

/// Outcome of [`WishlistSet::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    pub status: ToggleStatus,
    pub count: usize,
}

/// Ordered set of product ids, stored in the session under `wishlist`.
///
/// Ids are kept in insertion order and never repeat. Existence is not
/// checked on toggle; ids that no longer resolve are skipped when listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ProductId>", into = "Vec<ProductId>")]
pub struct WishlistSet {
    ids: Vec<ProductId>,
}

impl From<Vec<ProductId>> for WishlistSet {
    fn from(raw: Vec<ProductId>) -> Self {
        let mut ids = Vec::with_capacity(raw.len());
        for id in raw {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { ids }
    }
}

impl From<WishlistSet> for Vec<ProductId> {
    fn from(set: WishlistSet) -> Self {
        set.ids
    }
}

impl WishlistSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the product if absent, remove it if present.
    pub fn toggle(&mut self, id: ProductId) -> Toggle {
        let status = if let Some(pos) = self.ids.iter().position(|held| *held == id) {
            self.ids.remove(pos);
            ToggleStatus::Removed
        } else {
            self.ids.push(id);
            ToggleStatus::Added
        };

        Toggle {
            status,
            count: self.ids.len(),
        }
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in the order they were added.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores() {
        let mut wishlist = WishlistSet::from(vec![ProductId::new(4)]);
        let before = wishlist.clone();

        let first = wishlist.toggle(ProductId::new(9));
        assert_eq!(first.status, ToggleStatus::Added);
        assert_eq!(first.count, 2);

        let second = wishlist.toggle(ProductId::new(9));
        assert_eq!(second.status, ToggleStatus::Removed);
        assert_eq!(second.count, 1);
        assert_eq!(wishlist, before);
    }

    #[test]
    fn test_toggle_unknown_id_is_accepted() {
        let mut wishlist = WishlistSet::new();
        assert_eq!(wishlist.toggle(ProductId::new(12345)).status, ToggleStatus::Added);
        assert!(wishlist.contains(ProductId::new(12345)));
    }

    #[test]
    fn test_deserialize_removes_duplicates() {
        let wishlist: WishlistSet = serde_json::from_str("[3,1,3,2,1]").unwrap();
        assert_eq!(
            wishlist.ids(),
            &[ProductId::new(3), ProductId::new(1), ProductId::new(2)]
        );
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ToggleStatus::Added).unwrap(), "\"added\"");
        assert_eq!(ToggleStatus::Removed.as_str(), "removed");
    }
}
