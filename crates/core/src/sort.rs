//! Sort specification
//!
//! A `SortSpec` is an ordered list of keys. The baseline orders by title,
//! type, creation time and anagram type, all ascending; the requested field
//! keeps its position and only its direction changes.

use std::cmp::Ordering;

use crate::types::{Question, SortField, SortOrder};

/// A single sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub order: SortOrder,
}

/// Ordered sort keys; earlier keys take priority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Direction applied to `field`
    pub fn order_of(&self, field: SortField) -> Option<SortOrder> {
        self.keys
            .iter()
            .find(|key| key.field == field)
            .map(|key| key.order)
    }

    /// Compare two questions key by key
    pub fn compare(&self, a: &Question, b: &Question) -> Ordering {
        for key in &self.keys {
            let ordering = match key.field {
                SortField::Title => a.title.cmp(&b.title),
                SortField::Type => a.kind.as_str().cmp(b.kind.as_str()),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::AnagramType => a
                    .anagram_type
                    .map(|t| t.as_str())
                    .cmp(&b.anagram_type.map(|t| t.as_str())),
            };
            let ordering = match key.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            keys: SortField::ALL
                .into_iter()
                .map(|field| SortKey {
                    field,
                    order: SortOrder::Asc,
                })
                .collect(),
        }
    }
}

/// Builds a `SortSpec` from a validated field and direction
#[derive(Debug, Default, Clone, Copy)]
pub struct SortSpecBuilder;

impl SortSpecBuilder {
    pub fn build(field: SortField, order: SortOrder) -> SortSpec {
        let mut spec = SortSpec::default();
        if let Some(key) = spec.keys.iter_mut().find(|key| key.field == field) {
            key.order = order;
        }
        spec
    }
}
