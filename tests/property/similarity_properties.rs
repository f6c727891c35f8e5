use basket_core::core::exploration::{exploration_ratio, repetition_ratio};
use basket_core::core::similarity::{multiset_jaccard, set_jaccard};
use proptest::prelude::*;

fn basket() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..20, 0..12)
}

fn distinct_basket() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::hash_set(0u64..30, 0..12).prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn set_jaccard_is_symmetric_and_bounded(a in basket(), b in basket()) {
        let ab = set_jaccard(&a, &b);
        prop_assert_eq!(ab, set_jaccard(&b, &a));
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    #[test]
    fn multiset_jaccard_is_symmetric_and_bounded(a in basket(), b in basket()) {
        let ab = multiset_jaccard(&a, &b);
        prop_assert_eq!(ab, multiset_jaccard(&b, &a));
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    #[test]
    fn identical_baskets_score_one(a in prop::collection::vec(0u64..20, 1..12)) {
        prop_assert_eq!(set_jaccard(&a, &a), 1.0);
        prop_assert_eq!(multiset_jaccard(&a, &a), 1.0);
    }

    #[test]
    fn metrics_agree_without_duplicates(a in distinct_basket(), b in distinct_basket()) {
        prop_assert_eq!(set_jaccard(&a, &b), multiset_jaccard(&a, &b));
    }

    #[test]
    fn exploration_ignores_duplicates_within_baskets(
        history in prop::collection::vec(basket(), 1..6),
        last_n in 0usize..8,
    ) {
        let doubled: Vec<Vec<u64>> = history
            .iter()
            .map(|basket| basket.iter().chain(basket.iter()).copied().collect())
            .collect();
        let ratio = exploration_ratio(&history, last_n);
        prop_assert_eq!(ratio, exploration_ratio(&doubled, last_n));
        prop_assert!((0.0..=1.0).contains(&ratio));
    }

    #[test]
    fn repetition_is_complement_of_exploration(
        history in prop::collection::vec(basket(), 0..6),
        last_n in 0usize..8,
    ) {
        let exploration = exploration_ratio(&history, last_n);
        prop_assert_eq!(repetition_ratio(&history, last_n), 1.0 - exploration);
        prop_assert!((0.0..=1.0).contains(&repetition_ratio(&history, last_n)));
    }
}
