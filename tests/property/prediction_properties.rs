use basket_core::core::tables::{
    BasketSizeTable, FrequencyTable, FrequencyTables, GlobalFrequencyTable, RatioTable,
};
use basket_core::core::types::Ratios;
use basket_core::{Method, PredictionEngine};
use proptest::prelude::*;
use std::collections::HashSet;

const USER: u64 = 1;

fn personal_rows() -> impl Strategy<Value = Vec<(u64, f64)>> {
    prop::collection::vec((0u64..30, 1u32..50), 1..15).prop_map(|rows| {
        rows.into_iter()
            .map(|(item, count)| (item, count as f64))
            .collect()
    })
}

fn global_rows() -> impl Strategy<Value = Vec<(u64, f64)>> {
    prop::collection::vec((0u64..40, 1u32..100), 0..30).prop_map(|rows| {
        rows.into_iter()
            .map(|(item, count)| (item, count as f64))
            .collect()
    })
}

fn build(personal: &[(u64, f64)], global: &[(u64, f64)]) -> FrequencyTables {
    let personal = FrequencyTable::from_triples(
        personal.iter().map(|&(item, freq)| (USER, item, freq)),
    )
    .unwrap();
    let global = GlobalFrequencyTable::from_pairs(global.iter().copied()).unwrap();
    FrequencyTables::new(global).with_personal(personal)
}

proptest! {
    #[test]
    fn global_prediction_ignores_user(
        global in global_rows(),
        size in 0.0f64..20.0,
        other in 2u64..1000,
    ) {
        let tables = build(&[(0, 1.0)], &global);
        let sizes: BasketSizeTable = vec![(USER, size), (other, size)].into_iter().collect();
        let engine = PredictionEngine::new(&tables, &sizes);
        prop_assert_eq!(
            engine.predict(USER, Method::GlobalFrequency, None).unwrap(),
            engine.predict(other, Method::GlobalFrequency, None).unwrap()
        );
    }

    #[test]
    fn threshold_only_shrinks_personal_prediction(
        personal in personal_rows(),
        size in 0.0f64..20.0,
        threshold in 0.001f64..=1.0,
    ) {
        let tables = build(&personal, &[]);
        let sizes: BasketSizeTable = vec![(USER, size)].into_iter().collect();
        let engine = PredictionEngine::new(&tables, &sizes);

        let untrimmed = engine.predict(USER, Method::PersonalFrequency, None).unwrap();
        let trimmed = engine
            .predict(USER, Method::PersonalFrequency, Some(threshold))
            .unwrap();
        prop_assert!(trimmed.len() <= untrimmed.len());
        prop_assert_eq!(&untrimmed[..trimmed.len()], &trimmed[..]);
    }

    #[test]
    fn guided_prediction_is_bounded_and_ordered(
        personal in personal_rows(),
        global in global_rows(),
        size in 0.0f64..20.0,
        exploration in 0.0f64..=1.0,
    ) {
        let tables = build(&personal, &global);
        let sizes: BasketSizeTable = vec![(USER, size)].into_iter().collect();
        let ratios: RatioTable = vec![(USER, Ratios::from_exploration(exploration))]
            .into_iter()
            .collect();
        let engine = PredictionEngine::new(&tables, &sizes).with_ratios(&ratios);

        let predicted = engine
            .predict(USER, Method::GuidedPersonalFrequency, None)
            .unwrap();
        prop_assert!(predicted.len() <= size.floor() as usize);

        let bought: HashSet<u64> = personal.iter().map(|&(item, _)| item).collect();
        let repetition = predicted.iter().take_while(|item| bought.contains(item)).count();
        prop_assert!(predicted[repetition..].iter().all(|item| !bought.contains(item)));

        let distinct: HashSet<&u64> = predicted.iter().collect();
        prop_assert_eq!(distinct.len(), predicted.len());
    }
}
