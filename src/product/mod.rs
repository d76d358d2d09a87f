//! Product identity and detail-panel content resolution.
//!
//! Products carry a composite key `category[-index]` (e.g. `handCream-1`)
//! encoded as an element attribute by the host markup; the numeric suffix
//! doubles as the scent id, falling back to the category when absent.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::scene::ElementId;

pub type ProductResult<T> = std::result::Result<T, ProductError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("product key {0:?} does not match category[-index]")]
    MalformedKey(String),
    #[error("duplicate product key {0:?}")]
    DuplicateKey(String),
}

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z]+)(?:-(\d+))?$").expect("product key pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductKey {
    raw: String,
    category: String,
    index: Option<String>,
}

impl ProductKey {
    pub fn parse(raw: &str) -> ProductResult<Self> {
        let captures = key_pattern()
            .captures(raw)
            .ok_or_else(|| ProductError::MalformedKey(raw.to_string()))?;
        let category = captures
            .get(1)
            .map(|group| group.as_str().to_string())
            .ok_or_else(|| ProductError::MalformedKey(raw.to_string()))?;
        let index = captures.get(2).map(|group| group.as_str().to_string());
        Ok(Self {
            raw: raw.to_string(),
            category,
            index,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// The numeric suffix, or the category itself when the key has none.
    pub fn scent(&self) -> &str {
        self.index.as_deref().unwrap_or(&self.category)
    }
}

/// Fixed ordered product collection established at startup. Products are
/// never created or destroyed afterwards, only relocated between parents.
#[derive(Debug, Default)]
pub struct ProductCatalog {
    entries: Vec<(ProductKey, ElementId)>,
    by_raw: HashMap<String, usize>,
    by_element: HashMap<ElementId, usize>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register one product. Malformed keys are rejected here so a
    /// corrupted key can never reach an open transition through the catalog.
    pub fn register(&mut self, raw_key: &str, element: ElementId) -> ProductResult<()> {
        let key = ProductKey::parse(raw_key)?;
        if self.by_raw.contains_key(raw_key) {
            return Err(ProductError::DuplicateKey(raw_key.to_string()));
        }
        let slot = self.entries.len();
        self.by_raw.insert(raw_key.to_string(), slot);
        self.by_element.insert(element, slot);
        self.entries.push((key, element));
        Ok(())
    }

    pub fn element_for(&self, raw_key: &str) -> Option<ElementId> {
        self.by_raw.get(raw_key).map(|slot| self.entries[*slot].1)
    }

    pub fn key_for(&self, element: ElementId) -> Option<&ProductKey> {
        self.by_element
            .get(&element)
            .map(|slot| &self.entries[*slot].0)
    }

    pub fn elements(&self) -> Vec<ElementId> {
        self.entries.iter().map(|(_, element)| *element).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The six optional detail-panel content slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentSlot {
    Desc,
    Category,
    Price,
    Ml,
    Scent,
    Note,
}

impl ContentSlot {
    pub const ALL: [ContentSlot; 6] = [
        Self::Desc,
        Self::Category,
        Self::Price,
        Self::Ml,
        Self::Scent,
        Self::Note,
    ];
}

/// Scent-keyed lookup table for panel content, built once at initialization
/// instead of querying the tree per interaction. Absent slots are simply
/// skipped when a detail opens.
#[derive(Debug, Default)]
pub struct DetailContentMap {
    slots: HashMap<(String, ContentSlot), ElementId>,
}

impl DetailContentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, scent: &str, slot: ContentSlot, element: ElementId) {
        self.slots.insert((scent.to_string(), slot), element);
    }

    pub fn resolve(&self, scent: &str, slot: ContentSlot) -> Option<ElementId> {
        self.slots.get(&(scent.to_string(), slot)).copied()
    }

    /// Present slots for one product, in slot order.
    pub fn resolve_all(&self, scent: &str) -> Vec<(ContentSlot, ElementId)> {
        ContentSlot::ALL
            .iter()
            .filter_map(|slot| self.resolve(scent, *slot).map(|element| (*slot, element)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_with_numeric_suffix_splits_category_and_scent() {
        let key = ProductKey::parse("handCream-1").expect("suffixed key should parse");
        assert_eq!(key.category(), "handCream");
        assert_eq!(key.scent(), "1");
        assert_eq!(key.raw(), "handCream-1");
    }

    #[test]
    fn key_without_suffix_falls_back_to_category_as_scent() {
        let key = ProductKey::parse("rose").expect("bare key should parse");
        assert_eq!(key.category(), "rose");
        assert_eq!(key.scent(), "rose");
    }

    #[test]
    fn malformed_keys_are_rejected() {
        for raw in ["hand cream", "handCream-", "-1", "handCream-1-2", "", "crème"] {
            let err = ProductKey::parse(raw).expect_err("malformed key should fail");
            assert_eq!(err, ProductError::MalformedKey(raw.to_string()));
        }
    }

    #[test]
    fn catalog_keeps_registration_order_and_resolves_both_ways() {
        let mut catalog = ProductCatalog::new();
        let first = ElementId::new(10);
        let second = ElementId::new(11);
        catalog.register("handCream-1", first).unwrap();
        catalog.register("rose", second).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.elements(), vec![first, second]);
        assert_eq!(catalog.element_for("rose"), Some(second));
        assert_eq!(
            catalog.key_for(first).map(ProductKey::raw),
            Some("handCream-1")
        );
        assert_eq!(catalog.element_for("unknown"), None);
    }

    #[test]
    fn catalog_rejects_duplicates_and_malformed_keys() {
        let mut catalog = ProductCatalog::new();
        catalog.register("rose", ElementId::new(1)).unwrap();

        let err = catalog.register("rose", ElementId::new(2)).unwrap_err();
        assert_eq!(err, ProductError::DuplicateKey("rose".to_string()));

        let err = catalog.register("bad key", ElementId::new(3)).unwrap_err();
        assert_eq!(err, ProductError::MalformedKey("bad key".to_string()));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn content_map_skips_absent_slots() {
        let mut content = DetailContentMap::new();
        content.register("1", ContentSlot::Desc, ElementId::new(20));
        content.register("1", ContentSlot::Price, ElementId::new(21));
        content.register("rose", ContentSlot::Note, ElementId::new(22));

        let resolved = content.resolve_all("1");
        assert_eq!(
            resolved,
            vec![
                (ContentSlot::Desc, ElementId::new(20)),
                (ContentSlot::Price, ElementId::new(21)),
            ]
        );
        assert_eq!(content.resolve("1", ContentSlot::Note), None);
        assert_eq!(
            content.resolve("rose", ContentSlot::Note),
            Some(ElementId::new(22))
        );
    }
}
