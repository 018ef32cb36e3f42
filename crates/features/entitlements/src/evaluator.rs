//! # Entitlement Evaluation
//!
//! Turns one caller's account number and SKU list into a verdict for every catalog bundle.
//!
//! ## Rule
//!
//! A bundle is granted through two independent paths, OR-combined:
//!
//! 1. **SKU path**: the caller owns at least one SKU the bundle lists.
//! 2. **Account path**: the bundle requires a valid account number and the caller has one.
//!    `""` and `"-1"` are placeholders for system accounts and never count as valid.
//!
//! A bundle listing no SKUs and not requiring an account number is unrestricted and granted to
//! every caller.
//!
//! ## Trial
//!
//! A verdict is trial only when the SKU path granted it and every matched SKU is trial-flagged.
//! One production SKU makes the whole bundle non-trial; account-only grants are never trial.

use crate::catalog::{BundleCatalog, BundleDefinition};
use ent_domain::constants::PLACEHOLDER_ACCOUNT_NUMBERS;
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Entitlement state of one bundle for one caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct EntitlementVerdict {
    pub is_entitled: bool,
    /// Only meaningful when `is_entitled` is true.
    pub is_trial: bool,
}

impl EntitlementVerdict {
    pub const DENIED: Self = Self { is_entitled: false, is_trial: false };
    pub const GRANTED: Self = Self { is_entitled: true, is_trial: false };
    pub const TRIAL: Self = Self { is_entitled: true, is_trial: true };
}

/// Bundle name to verdict, one entry per catalog bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Entitlements(BTreeMap<String, EntitlementVerdict>);

impl Entitlements {
    #[must_use]
    pub fn get(&self, bundle: &str) -> Option<EntitlementVerdict> {
        self.0.get(bundle).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, EntitlementVerdict)> {
        self.0.iter().map(|(name, verdict)| (name.as_str(), *verdict))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of bundles the caller is entitled to.
    #[must_use]
    pub fn granted(&self) -> usize {
        self.0.values().filter(|v| v.is_entitled).count()
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, EntitlementVerdict> {
        self.0
    }
}

/// `false` for the placeholder accounts `""` and `"-1"`.
#[must_use]
pub fn is_valid_account_number(account_number: &str) -> bool {
    !PLACEHOLDER_ACCOUNT_NUMBERS.contains(&account_number)
}

/// Evaluates every bundle of `catalog` for one caller.
///
/// `skus` is the upstream list as returned; duplicates and order do not matter.
#[must_use]
pub fn evaluate(catalog: &BundleCatalog, account_number: &str, skus: &[String]) -> Entitlements {
    let account_valid = is_valid_account_number(account_number);
    let owned: FxHashSet<&str> = skus.iter().map(String::as_str).collect();

    Entitlements(
        catalog
            .iter()
            .map(|bundle| (bundle.name().to_owned(), evaluate_bundle(bundle, account_valid, &owned)))
            .collect(),
    )
}

/// Evaluates one bundle against an owned-SKU set.
#[must_use]
pub fn evaluate_bundle(
    bundle: &BundleDefinition,
    account_valid: bool,
    owned: &FxHashSet<&str>,
) -> EntitlementVerdict {
    if bundle.is_unrestricted() {
        return EntitlementVerdict::GRANTED;
    }

    let mut matched = false;
    let mut all_trial = true;
    for (sku, attrs) in bundle.skus() {
        if owned.contains(sku) {
            matched = true;
            all_trial &= attrs.is_trial;
        }
    }

    let account_entitled = bundle.requires_valid_account_number() && account_valid;

    match (matched, account_entitled) {
        (true, _) if all_trial => EntitlementVerdict::TRIAL,
        (true, _) | (false, true) => EntitlementVerdict::GRANTED,
        (false, false) => EntitlementVerdict::DENIED,
    }
}
