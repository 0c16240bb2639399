// Route classification and insurance rules

use freightbill::modules::pricing::{Classification, ClassificationResolver, ServiceRoute};
use proptest::prelude::*;
use rust_decimal_macros::dec;

fn route(code: &str) -> ServiceRoute {
    ServiceRoute::parse(code).unwrap()
}

fn any_classification() -> impl Strategy<Value = Option<Classification>> {
    prop_oneof![
        Just(None),
        Just(Some(Classification::General)),
        Just(Some(Classification::Commercial)),
        Just(Some(Classification::Flomic)),
        Just(Some(Classification::Personal)),
        Just(Some(Classification::Custom("PERISHABLE".to_string()))),
    ]
}

fn inbound_box() -> impl Strategy<Value = Option<Classification>> {
    prop_oneof![
        Just(None),
        Just(Some(Classification::Commercial)),
        Just(Some(Classification::Flomic)),
        Just(Some(Classification::Personal)),
    ]
}

fn inbound_shipment() -> impl Strategy<Value = Classification> {
    prop_oneof![Just(Classification::Commercial), Just(Classification::Flomic)]
}

proptest! {
    #[test]
    fn test_outbound_forcing_is_idempotent(
        shipment in any_classification(),
        boxes in proptest::collection::vec(any_classification(), 0..6),
    ) {
        let resolver = ClassificationResolver::new();
        let outbound = route("PH_TO_UAE");

        let first = resolver.resolve(&outbound, shipment.as_ref(), &boxes).unwrap();
        let second = resolver
            .resolve(&outbound, first.shipment.as_ref(), &first.boxes)
            .unwrap();

        prop_assert_eq!(second, first);
    }

    #[test]
    fn test_inbound_resolution_is_idempotent(
        shipment in inbound_shipment(),
        boxes in proptest::collection::vec(inbound_box(), 0..6),
    ) {
        let resolver = ClassificationResolver::new();
        let inbound = route("UAE_TO_PH");

        let first = resolver.resolve(&inbound, Some(&shipment), &boxes).unwrap();
        let second = resolver
            .resolve(&inbound, first.shipment.as_ref(), &first.boxes)
            .unwrap();

        let marked = shipment == Classification::Flomic
            || boxes.iter().any(|b| {
                matches!(b, Some(Classification::Flomic) | Some(Classification::Personal))
            });
        prop_assert_eq!(first.flomic_or_personal, marked);
        prop_assert_eq!(second, first);
    }

    #[test]
    fn test_outbound_is_always_general(
        shipment in any_classification(),
        boxes in proptest::collection::vec(any_classification(), 0..6),
    ) {
        let resolved = ClassificationResolver::new()
            .resolve(&route("PH_TO_UAE"), shipment.as_ref(), &boxes)
            .unwrap();

        prop_assert_eq!(resolved.shipment, Some(Classification::General));
        prop_assert_eq!(resolved.boxes.len(), boxes.len());
        prop_assert!(resolved.boxes.iter().all(|b| *b == Some(Classification::General)));
        prop_assert!(!resolved.flomic_or_personal);
    }

    #[test]
    fn test_other_routes_keep_input(
        shipment in any_classification(),
        boxes in proptest::collection::vec(any_classification(), 0..6),
    ) {
        let resolved = ClassificationResolver::new()
            .resolve(&route("UAE_TO_KSA"), shipment.as_ref(), &boxes)
            .unwrap();

        prop_assert_eq!(resolved.shipment, shipment);
        prop_assert_eq!(resolved.boxes, boxes);
    }
}

#[test]
fn test_route_codes_are_normalized() {
    assert_eq!(route(" ph to uae ").code(), "PH_TO_UAE");
    assert!(route("ph-to-uae-express").is_outbound());
    assert!(route("uae to pinas").is_inbound());
    assert!(route("UAE_TO_PH_SEA").is_inbound());
    assert!(!route("UAE_TO_KSA").is_outbound());
    assert!(ServiceRoute::parse("   ").is_err());
}

#[test]
fn test_inbound_shipment_level_rules() {
    let resolver = ClassificationResolver::new();
    let inbound = route("UAE_TO_PH");

    for allowed in [Classification::Commercial, Classification::Flomic] {
        assert!(resolver.resolve(&inbound, Some(&allowed), &[]).is_ok());
    }

    for rejected in [Classification::General, Classification::Personal] {
        let err = resolver.resolve(&inbound, Some(&rejected), &[]).unwrap_err();
        assert_eq!(err.field(), Some("shipment_classification"));
    }

    let err = resolver.resolve(&inbound, None, &[]).unwrap_err();
    assert_eq!(err.field(), Some("shipment_classification"));
}

#[test]
fn test_inbound_box_level_rules() {
    let resolver = ClassificationResolver::new();
    let inbound = route("UAE_TO_PH");
    let commercial = Classification::Commercial;

    let resolved = resolver
        .resolve(
            &inbound,
            Some(&commercial),
            &[Some(Classification::Commercial), Some(Classification::Personal)],
        )
        .unwrap();
    assert!(resolved.flomic_or_personal);

    let err = resolver
        .resolve(
            &inbound,
            Some(&commercial),
            &[None, Some(Classification::General)],
        )
        .unwrap_err();
    assert_eq!(err.field(), Some("boxes[1].classification"));
}

#[test]
fn test_commercial_inbound_is_not_flomic() {
    let resolved = ClassificationResolver::new()
        .resolve(
            &route("UAE_TO_PH"),
            Some(&Classification::Commercial),
            &[Some(Classification::Commercial)],
        )
        .unwrap();
    assert!(!resolved.flomic_or_personal);
}

#[test]
fn test_classification_parsing() {
    assert_eq!(Classification::parse(" flomic "), Some(Classification::Flomic));
    assert_eq!(Classification::parse(""), None);
    assert_eq!(
        Classification::parse("dangerous goods"),
        Some(Classification::Custom("DANGEROUS GOODS".to_string()))
    );
}

#[test]
fn test_insured_inbound_needs_declared_value() {
    let resolver = ClassificationResolver::new();
    let inbound = route("UAE_TO_PH");

    assert!(resolver.validate_insurance(&inbound, true, Some(dec!(250))).is_ok());
    assert!(resolver.validate_insurance(&inbound, false, None).is_ok());

    for missing in [None, Some(dec!(0))] {
        let err = resolver.validate_insurance(&inbound, true, missing).unwrap_err();
        assert_eq!(err.field(), Some("declared_value"));
    }

    // only inbound enforces the rule
    assert!(resolver
        .validate_insurance(&route("PH_TO_UAE"), true, None)
        .is_ok());
}
