//! # Catalog Index
//!
//! The read-only reference catalog and its search.
//!
//! ## Search Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Catalog Search Works                             │
//! │                                                                         │
//! │  Operator types: "folic"                                               │
//! │       │                                                                 │
//! │       ├── empty query?         ──► whole catalog, file order           │
//! │       ├── shorter than min?    ──► NotPerformed (not "no results")     │
//! │       ▼                                                                 │
//! │  lower-case substring test per entry                                   │
//! │       │                                                                 │
//! │       ├── CodeOrName:  "54520" or "a folic"                            │
//! │       └── AllColumns:  "54520 a folic 30 acme ..."                     │
//! │       ▼                                                                 │
//! │  matches in catalog order (no ranking)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{CatalogEntry, ProductCode};

// =============================================================================
// Search Options
// =============================================================================

/// Which text a query is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// Product code digits or product name.
    #[default]
    CodeOrName,
    /// Every column of the row joined by spaces.
    AllColumns,
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchScope::CodeOrName => f.write_str("code-or-name"),
            SearchScope::AllColumns => f.write_str("all-columns"),
        }
    }
}

impl FromStr for SearchScope {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "code-or-name" => Ok(SearchScope::CodeOrName),
            "all-columns" => Ok(SearchScope::AllColumns),
            other => Err(ValidationError::InvalidFormat {
                field: "search scope".to_string(),
                reason: format!("'{}' is not one of: code-or-name, all-columns", other),
            }),
        }
    }
}

/// Search configuration of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub scope: SearchScope,
    /// Non-empty queries shorter than this are not searched. `0` disables it.
    pub min_query_len: usize,
}

/// Result of [`Catalog::search`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'a> {
    /// Matching entries, in catalog order. May be empty.
    Matches(Vec<&'a CatalogEntry>),
    /// The query was below the minimum length; nothing was searched.
    NotPerformed { min_query_len: usize },
}

impl<'a> SearchOutcome<'a> {
    /// The matches, or `None` when no search was performed.
    pub fn matches(&self) -> Option<&[&'a CatalogEntry]> {
        match self {
            SearchOutcome::Matches(entries) => Some(entries),
            SearchOutcome::NotPerformed { .. } => None,
        }
    }

    pub fn is_performed(&self) -> bool {
        matches!(self, SearchOutcome::Matches(_))
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Reference products keyed by product code.
///
/// ## Invariants
/// - Product codes are unique (enforced by [`Catalog::from_entries`])
/// - Entry order is the order of the source file
/// - Never mutated after construction
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_code: HashMap<ProductCode, usize>,
}

impl Catalog {
    /// Builds a catalog, keeping the first entry of each product code.
    ///
    /// ## Returns
    /// The catalog and the entries rejected as duplicates, in input order.
    pub fn from_entries<I>(entries: I) -> (Self, Vec<CatalogEntry>)
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut catalog = Catalog::default();
        let mut duplicates = Vec::new();

        for entry in entries {
            if catalog.by_code.contains_key(&entry.product_code) {
                duplicates.push(entry);
                continue;
            }
            catalog
                .by_code
                .insert(entry.product_code, catalog.entries.len());
            catalog.entries.push(entry);
        }

        (catalog, duplicates)
    }

    /// All entries in catalog order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by product code.
    pub fn get(&self, code: ProductCode) -> Option<&CatalogEntry> {
        self.by_code.get(&code).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, code: ProductCode) -> bool {
        self.by_code.contains_key(&code)
    }

    /// Pack fraction of a product, when the catalog declares one.
    pub fn pack_fraction(&self, code: ProductCode) -> Option<u32> {
        self.get(code).and_then(|entry| entry.pack_fraction)
    }

    /// Case-insensitive substring search.
    ///
    /// The query is trimmed. An empty query returns the whole catalog even
    /// when a minimum length is configured.
    pub fn search(&self, query: &str, options: &SearchOptions) -> SearchOutcome<'_> {
        let query = query.trim();

        if query.is_empty() {
            return SearchOutcome::Matches(self.entries.iter().collect());
        }

        if query.chars().count() < options.min_query_len {
            return SearchOutcome::NotPerformed {
                min_query_len: options.min_query_len,
            };
        }

        let needle = query.to_lowercase();
        let matches = self
            .entries
            .iter()
            .filter(|entry| match options.scope {
                SearchScope::CodeOrName => {
                    entry.product_code.to_string().contains(&needle)
                        || entry.name.to_lowercase().contains(&needle)
                }
                SearchScope::AllColumns => entry.row_text().to_lowercase().contains(&needle),
            })
            .collect();

        SearchOutcome::Matches(matches)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attribute;

    fn sample_catalog() -> Catalog {
        let mut folic = CatalogEntry::new(ProductCode::new(54520), "A FOLIC", Some(30));
        folic.extra_attributes.push(Attribute::new("Laboratorio", "Genfar"));

        let entries = vec![
            folic,
            CatalogEntry::new(ProductCode::new(100), "Paracetamol 500mg", Some(100)),
            CatalogEntry::new(ProductCode::new(2045), "Ibuprofeno 400mg", None),
            CatalogEntry::new(ProductCode::new(777), "Folico Forte", Some(10)),
        ];
        Catalog::from_entries(entries).0
    }

    fn codes(outcome: &SearchOutcome<'_>) -> Vec<u64> {
        outcome
            .matches()
            .unwrap()
            .iter()
            .map(|e| e.product_code.value())
            .collect()
    }

    #[test]
    fn test_empty_query_returns_full_catalog_in_order() {
        let catalog = sample_catalog();
        let outcome = catalog.search("", &SearchOptions::default());
        assert_eq!(codes(&outcome), vec![54520, 100, 2045, 777]);

        let outcome = catalog.search("   ", &SearchOptions::default());
        assert_eq!(codes(&outcome).len(), 4);
    }

    #[test]
    fn test_search_by_name_is_case_insensitive_substring() {
        let catalog = sample_catalog();
        let outcome = catalog.search("FoLiC", &SearchOptions::default());
        assert_eq!(codes(&outcome), vec![54520, 777]);
    }

    #[test]
    fn test_search_by_code_is_unanchored() {
        let catalog = sample_catalog();
        let outcome = catalog.search("45", &SearchOptions::default());
        // 54520 and 2045 both contain "45"
        assert_eq!(codes(&outcome), vec![54520, 2045]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let catalog = sample_catalog();
        let outcome = catalog.search("zzz", &SearchOptions::default());
        assert!(outcome.is_performed());
        assert!(outcome.matches().unwrap().is_empty());
    }

    #[test]
    fn test_all_columns_scope_reaches_passthrough_values() {
        let catalog = sample_catalog();

        let code_or_name = catalog.search("genfar", &SearchOptions::default());
        assert!(code_or_name.matches().unwrap().is_empty());

        let options = SearchOptions {
            scope: SearchScope::AllColumns,
            min_query_len: 0,
        };
        let all = catalog.search("genfar", &options);
        assert_eq!(codes(&all), vec![54520]);
    }

    #[test]
    fn test_min_query_len_reports_not_performed() {
        let catalog = sample_catalog();
        let options = SearchOptions {
            scope: SearchScope::CodeOrName,
            min_query_len: 2,
        };

        let outcome = catalog.search("f", &options);
        assert_eq!(outcome, SearchOutcome::NotPerformed { min_query_len: 2 });
        assert!(outcome.matches().is_none());

        // Empty still means "everything"
        assert_eq!(codes(&catalog.search("", &options)).len(), 4);
        assert_eq!(codes(&catalog.search("fo", &options)), vec![54520, 777]);
    }

    #[test]
    fn test_search_results_are_subset_of_full_catalog() {
        let catalog = sample_catalog();
        let options = SearchOptions::default();
        let all = codes(&catalog.search("", &options));

        for query in ["a", "0", "mg", "folic", "zzz", "5"] {
            for code in codes(&catalog.search(query, &options)) {
                assert!(all.contains(&code), "{} not in full catalog", code);
            }
        }
    }

    #[test]
    fn test_from_entries_keeps_first_duplicate() {
        let (catalog, duplicates) = Catalog::from_entries(vec![
            CatalogEntry::new(ProductCode::new(1), "First", None),
            CatalogEntry::new(ProductCode::new(1), "Second", None),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(ProductCode::new(1)).unwrap().name, "First");
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].name, "Second");
    }

    #[test]
    fn test_search_scope_parse() {
        assert_eq!("all-columns".parse::<SearchScope>().unwrap(), SearchScope::AllColumns);
        assert_eq!("Code_Or_Name".parse::<SearchScope>().unwrap(), SearchScope::CodeOrName);
        assert!("everything".parse::<SearchScope>().is_err());
    }

    #[test]
    fn test_pack_fraction_lookup() {
        let catalog = sample_catalog();
        assert_eq!(catalog.pack_fraction(ProductCode::new(54520)), Some(30));
        assert_eq!(catalog.pack_fraction(ProductCode::new(2045)), None);
        assert_eq!(catalog.pack_fraction(ProductCode::new(1)), None);
        assert!(catalog.contains(ProductCode::new(777)));
    }
}
