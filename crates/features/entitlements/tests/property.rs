use ent_entitlements::{BundleCatalog, BundleDefinition, evaluate};
use proptest::prelude::*;

const SKU_POOL: [&str; 6] = ["SVC3124", "MCT3691", "MCT1122", "SVC3344", "MCT2233", "RH0001"];

fn sku() -> impl Strategy<Value = String> {
    prop::sample::select(SKU_POOL.to_vec()).prop_map(str::to_owned)
}

fn bundle(index: usize) -> impl Strategy<Value = BundleDefinition> {
    (any::<bool>(), prop::collection::vec((sku(), any::<bool>()), 0..4)).prop_map(
        move |(requires_account, skus)| {
            skus.into_iter().fold(
                BundleDefinition::new(format!("Bundle{index}"), requires_account),
                |bundle, (sku, is_trial)| bundle.with_sku(sku, is_trial),
            )
        },
    )
}

fn catalog() -> impl Strategy<Value = BundleCatalog> {
    (0..6usize)
        .prop_flat_map(|count| (0..count).map(bundle).collect::<Vec<_>>())
        .prop_map(|bundles| BundleCatalog::from_bundles(bundles).expect("names are unique"))
}

fn account() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("-1".to_owned()), "[0-9]{1,8}"]
}

proptest! {
    #[test]
    fn evaluation_is_idempotent(
        catalog in catalog(),
        account in account(),
        skus in prop::collection::vec(sku(), 0..8),
    ) {
        prop_assert_eq!(evaluate(&catalog, &account, &skus), evaluate(&catalog, &account, &skus));
    }

    #[test]
    fn every_bundle_gets_one_verdict(
        catalog in catalog(),
        account in account(),
        skus in prop::collection::vec(sku(), 0..8),
    ) {
        let verdicts = evaluate(&catalog, &account, &skus);
        prop_assert_eq!(verdicts.len(), catalog.len());
        for bundle in catalog.iter() {
            prop_assert!(verdicts.get(bundle.name()).is_some());
        }
    }

    #[test]
    fn adding_skus_never_revokes(
        catalog in catalog(),
        account in account(),
        skus in prop::collection::vec(sku(), 0..8),
        extra in sku(),
    ) {
        let before = evaluate(&catalog, &account, &skus);
        let mut more = skus.clone();
        more.push(extra);
        let after = evaluate(&catalog, &account, &more);

        for (name, verdict) in before.iter() {
            if verdict.is_entitled {
                prop_assert!(after.get(name).is_some_and(|v| v.is_entitled), "{} revoked", name);
            }
        }
    }

    #[test]
    fn placeholder_accounts_never_entitle_alone(
        catalog in catalog(),
        placeholder in prop_oneof![Just(""), Just("-1")],
    ) {
        let verdicts = evaluate(&catalog, placeholder, &[]);
        for bundle in catalog.iter() {
            let verdict = verdicts.get(bundle.name()).expect("verdict present");
            prop_assert_eq!(verdict.is_entitled, bundle.is_unrestricted());
        }
    }

    #[test]
    fn production_match_is_never_trial(
        catalog in catalog(),
        account in account(),
        skus in prop::collection::vec(sku(), 0..8),
    ) {
        let verdicts = evaluate(&catalog, &account, &skus);
        for bundle in catalog.iter() {
            let verdict = verdicts.get(bundle.name()).expect("verdict present");
            let production_match = bundle
                .skus()
                .any(|(sku, attrs)| !attrs.is_trial && skus.iter().any(|owned| owned == sku));
            if production_match {
                prop_assert!(verdict.is_entitled);
                prop_assert!(!verdict.is_trial);
            }
            if verdict.is_trial {
                prop_assert!(verdict.is_entitled);
            }
        }
    }

    #[test]
    fn valid_account_entitles_account_gated_bundles(
        catalog in catalog(),
        account in "[1-9][0-9]{0,7}",
    ) {
        let verdicts = evaluate(&catalog, &account, &[]);
        for bundle in catalog.iter().filter(|b| b.requires_valid_account_number()) {
            prop_assert!(verdicts.get(bundle.name()).is_some_and(|v| v.is_entitled && !v.is_trial));
        }
    }
}
