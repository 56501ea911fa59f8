use crate::slots::SlotCatalog;
use proptest::prelude::*;

fn catalog() -> SlotCatalog {
    SlotCatalog::default()
}

// Booked entries drawn from the catalog plus a few values outside it.
fn booked_strategy() -> impl Strategy<Value = Vec<String>> {
    let pool: Vec<String> = catalog()
        .slots()
        .iter()
        .cloned()
        .chain(["08:00", "12:30", "", "garbage"].map(String::from))
        .collect();
    prop::collection::vec(prop::sample::select(pool), 0..20)
}

proptest! {
    #[test]
    fn test_result_excludes_every_booked_slot(booked in booked_strategy()) {
        let available = catalog().available(&booked);
        for slot in &available {
            prop_assert!(!booked.contains(slot));
        }
    }

    #[test]
    fn test_result_is_catalog_subsequence(booked in booked_strategy()) {
        let catalog = catalog();
        let available = catalog.available(&booked);
        let expected: Vec<String> = catalog
            .slots()
            .iter()
            .filter(|s| !booked.contains(s))
            .cloned()
            .collect();
        prop_assert_eq!(available, expected);
    }

    #[test]
    fn test_invariant_under_reordering(
        (booked, shuffled) in booked_strategy()
            .prop_flat_map(|booked| (Just(booked.clone()), Just(booked).prop_shuffle()))
    ) {
        prop_assert_eq!(catalog().available(&booked), catalog().available(&shuffled));
    }

    #[test]
    fn test_custom_catalog_keeps_order(slots in prop::collection::vec("[0-2][0-9]:[0-5][0-9]", 1..10)) {
        let catalog = SlotCatalog::new(&slots);
        let none: Vec<String> = Vec::new();
        let available = catalog.available(&none);
        prop_assert_eq!(available.as_slice(), catalog.slots());

        let mut seen = std::collections::HashSet::new();
        for slot in &available {
            prop_assert!(seen.insert(slot.clone()));
        }
    }
}

#[test]
fn test_empty_booked_yields_full_catalog() {
    let none: Vec<String> = Vec::new();
    assert_eq!(catalog().available(&none), catalog().slots());
}

#[test]
fn test_fully_booked_day_is_empty() {
    let catalog = catalog();
    assert!(catalog.available(catalog.slots()).is_empty());
}

#[test]
fn test_duplicate_bookings_still_exclude() {
    let booked = ["11:00", "11:00", "17:00"];
    assert_eq!(
        catalog().available(&booked),
        vec!["09:00", "13:00", "15:00", "19:00"]
    );
}
