//! # Bundle Catalog
//!
//! The table of bundle definitions every evaluation reads from.
//!
//! ## Document Format
//!
//! The catalog is loaded from a YAML sequence. Every field is required and unknown fields are
//! rejected, so a typo fails the load instead of silently granting or denying access:
//!
//! ```yaml
//! - name: insights
//!   use_valid_acc_num: true
//!   skus:
//!     SVC3124: { is_trial: false }
//!     MCT3691: { is_trial: true }
//! - name: everyone
//!   use_valid_acc_num: false
//!   skus: {}
//! ```
//!
//! Bundle names must be unique and non-empty; SKU keys must be non-empty.

use crate::error::{CatalogError, CatalogErrorExt};
use fxhash::FxHashMap;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Per-SKU flags inside a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkuAttributes {
    pub is_trial: bool,
}

/// One bundle and the rule that grants it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDefinition {
    name: String,
    requires_valid_account_number: bool,
    skus: FxHashMap<String, SkuAttributes>,
}

impl BundleDefinition {
    pub fn new(name: impl Into<String>, requires_valid_account_number: bool) -> Self {
        Self { name: name.into(), requires_valid_account_number, skus: FxHashMap::default() }
    }

    /// Adds (or replaces) a SKU that grants this bundle.
    #[must_use]
    pub fn with_sku(mut self, sku: impl Into<String>, is_trial: bool) -> Self {
        self.skus.insert(sku.into(), SkuAttributes { is_trial });
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A valid account number alone is enough to be entitled.
    #[must_use]
    pub const fn requires_valid_account_number(&self) -> bool {
        self.requires_valid_account_number
    }

    #[must_use]
    pub fn sku(&self, sku: &str) -> Option<SkuAttributes> {
        self.skus.get(sku).copied()
    }

    pub fn skus(&self) -> impl Iterator<Item = (&str, SkuAttributes)> {
        self.skus.iter().map(|(sku, attrs)| (sku.as_str(), *attrs))
    }

    /// No SKU gate and no account gate: granted to every caller.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.skus.is_empty() && !self.requires_valid_account_number
    }
}

/// An immutable set of bundles keyed by name.
///
/// Built once per load; replaced wholesale through [`crate::CatalogStore`], never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleCatalog {
    bundles: BTreeMap<String, BundleDefinition>,
}

impl BundleCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a catalog, enforcing unique non-empty names and non-empty SKU keys.
    ///
    /// # Errors
    /// Returns [`CatalogError::Invalid`] on the first rule violation.
    pub fn from_bundles(
        bundles: impl IntoIterator<Item = BundleDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = BTreeMap::new();

        for bundle in bundles {
            if bundle.name.trim().is_empty() {
                return Err(CatalogError::Invalid {
                    message: "bundle name must not be empty".into(),
                    context: None,
                });
            }
            if bundle.skus.keys().any(|sku| sku.trim().is_empty()) {
                return Err(CatalogError::Invalid {
                    message: format!("bundle '{}' declares an empty SKU", bundle.name).into(),
                    context: None,
                });
            }
            if catalog.contains_key(&bundle.name) {
                return Err(CatalogError::Invalid {
                    message: format!("bundle '{}' is declared more than once", bundle.name).into(),
                    context: None,
                });
            }
            catalog.insert(bundle.name.clone(), bundle);
        }

        Ok(Self { bundles: catalog })
    }

    /// Parses a YAML catalog document.
    ///
    /// # Errors
    /// * [`CatalogError::Parse`] for syntax errors, unknown or missing fields and wrong types.
    /// * [`CatalogError::Invalid`] for duplicate or empty names and empty SKU keys.
    pub fn from_yaml_str(document: &str) -> Result<Self, CatalogError> {
        let raw: Vec<BundleDocument> =
            serde_yaml::from_str(document).context("Decoding bundle document")?;

        Self::from_bundles(raw.into_iter().map(BundleDocument::into_definition))
    }

    /// Reads and parses a YAML catalog file.
    ///
    /// # Errors
    /// * [`CatalogError::Load`] when the file cannot be read.
    /// * Any error of [`BundleCatalog::from_yaml_str`], with the path as context.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let document = fs::read_to_string(path)
            .context(format!("Reading bundle file {}", path.display()))?;

        Self::from_yaml_str(&document).context(format!("Parsing {}", path.display()))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BundleDefinition> {
        self.bundles.get(name)
    }

    /// Bundles in name order.
    pub fn iter(&self) -> impl Iterator<Item = &BundleDefinition> {
        self.bundles.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Comma-joined, sorted union of every SKU any bundle names.
    ///
    /// Passed upstream as an allow-list hint; `None` when no bundle names a SKU.
    #[must_use]
    pub fn sku_filter(&self) -> Option<String> {
        let skus: BTreeSet<&str> =
            self.bundles.values().flat_map(|b| b.skus.keys().map(String::as_str)).collect();

        if skus.is_empty() {
            return None;
        }
        Some(skus.into_iter().collect::<Vec<_>>().join(","))
    }
}

/// On-disk shape of one bundle.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BundleDocument {
    name: String,
    use_valid_acc_num: bool,
    skus: BTreeMap<String, SkuAttributes>,
}

impl BundleDocument {
    fn into_definition(self) -> BundleDefinition {
        BundleDefinition {
            name: self.name,
            requires_valid_account_number: self.use_valid_acc_num,
            skus: self.skus.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r"
- name: TestBundle1
  use_valid_acc_num: false
  skus:
    SVC3124: { is_trial: false }
    MCT3691: { is_trial: false }
- name: TestBundle4
  use_valid_acc_num: true
  skus: {}
";

    #[test]
    fn parses_document() {
        let catalog = BundleCatalog::from_yaml_str(DOCUMENT).expect("valid document");

        assert_eq!(catalog.len(), 2);
        let first = catalog.get("TestBundle1").expect("bundle present");
        assert!(!first.requires_valid_account_number());
        assert_eq!(first.sku("MCT3691"), Some(SkuAttributes { is_trial: false }));
        assert!(catalog.get("TestBundle4").is_some_and(BundleDefinition::requires_valid_account_number));
    }

    #[test]
    fn empty_sequence_is_an_empty_catalog() {
        let catalog = BundleCatalog::from_yaml_str("[]").expect("empty list");
        assert!(catalog.is_empty());
        assert_eq!(catalog.sku_filter(), None);
    }

    #[test]
    fn missing_flag_is_a_parse_error() {
        let err = BundleCatalog::from_yaml_str("- name: A\n  skus: {}\n").expect_err("missing flag");
        assert!(err.is_parse_error());
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn unknown_sku_attribute_is_a_parse_error() {
        let doc = "- name: A\n  use_valid_acc_num: false\n  skus:\n    X1: { is_trial: true, tier: gold }\n";
        let err = BundleCatalog::from_yaml_str(doc).expect_err("unknown field");
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = BundleCatalog::from_bundles([
            BundleDefinition::new("A", true),
            BundleDefinition::new("A", false),
        ])
        .expect_err("duplicate");
        assert!(matches!(err, CatalogError::Invalid { .. }));
        assert!(err.to_string().contains("declared more than once"));
    }

    #[test]
    fn blank_names_and_skus_are_rejected() {
        assert!(BundleCatalog::from_bundles([BundleDefinition::new(" ", true)]).is_err());
        assert!(
            BundleCatalog::from_bundles([BundleDefinition::new("A", false).with_sku("", false)])
                .is_err()
        );
    }

    #[test]
    fn sku_filter_is_sorted_and_deduplicated() {
        let catalog = BundleCatalog::from_bundles([
            BundleDefinition::new("B", false).with_sku("SVC3344", false).with_sku("MCT1122", true),
            BundleDefinition::new("A", false).with_sku("MCT1122", false),
            BundleDefinition::new("C", true),
        ])
        .expect("valid catalog");

        assert_eq!(catalog.sku_filter().as_deref(), Some("MCT1122,SVC3344"));
    }

    #[test]
    fn unrestricted_means_no_gate_at_all() {
        assert!(BundleDefinition::new("open", false).is_unrestricted());
        assert!(!BundleDefinition::new("account", true).is_unrestricted());
        assert!(!BundleDefinition::new("sku", false).with_sku("X", false).is_unrestricted());
    }
}
