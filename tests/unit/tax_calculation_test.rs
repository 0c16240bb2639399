// VAT handling per lane
//
// Inbound FLOMIC/PERSONAL amounts already include VAT, so tax is extracted
// rather than added; the customer total never changes.

use freightbill::modules::pricing::models::ChargeBreakdown;
use freightbill::modules::pricing::{ServiceRoute, SettlementPath, TaxCalculator};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn cents(value: u64) -> Decimal {
    Decimal::new(value as i64, 2)
}

fn breakdown(base: Decimal) -> ChargeBreakdown {
    ChargeBreakdown {
        rate: dec!(12),
        shipping_charge: base,
        pickup_charge: Decimal::ZERO,
        delivery_charge: Decimal::ZERO,
        insurance_charge: Decimal::ZERO,
        base_amount: base,
        delivery_cod: None,
        delivery_tax_invoice: None,
        settlement_path: None,
    }
}

proptest! {
    #[test]
    fn test_inclusive_split_recombines_within_a_cent(amount in 0u64..100_000_000) {
        let amount = cents(amount);
        let (subtotal, tax) = TaxCalculator::default().extract_inclusive_tax(amount);

        prop_assert!(tax >= Decimal::ZERO);
        prop_assert!(subtotal <= amount);
        prop_assert!(
            (subtotal + tax - amount).abs() <= dec!(0.01),
            "{} + {} drifted from {}", subtotal, tax, amount
        );
    }

    #[test]
    fn test_inbound_flomic_total_is_unchanged(amount in 0u64..100_000_000) {
        let amount = cents(amount);
        let route = ServiceRoute::parse("UAE_TO_PH").unwrap();

        let outcome = TaxCalculator::default()
            .calculate(&route, true, &breakdown(amount))
            .unwrap();

        prop_assert_eq!(outcome.total_amount, amount);
        prop_assert!(outcome.tax_inclusive);
        prop_assert!(outcome.base_amount + outcome.tax_amount - amount <= dec!(0.01));
    }

    #[test]
    fn test_untaxed_lanes_pass_base_through(amount in 0u64..100_000_000, flomic in any::<bool>()) {
        let amount = cents(amount);
        let calc = TaxCalculator::default();

        let commercial = calc
            .calculate(&ServiceRoute::parse("UAE_TO_PH").unwrap(), false, &breakdown(amount))
            .unwrap();
        prop_assert_eq!(commercial.total_amount, amount);
        prop_assert_eq!(commercial.tax_amount, Decimal::ZERO);

        let other = calc
            .calculate(&ServiceRoute::parse("KSA_TO_UAE").unwrap(), flomic, &breakdown(amount))
            .unwrap();
        prop_assert_eq!(other.total_amount, amount);
        prop_assert_eq!(other.tax_amount, Decimal::ZERO);
    }
}

#[test]
fn test_inbound_extraction_example() {
    let route = ServiceRoute::parse("UAE_TO_PH").unwrap();
    let outcome = TaxCalculator::default()
        .calculate(&route, true, &breakdown(dec!(120.00)))
        .unwrap();

    assert_eq!(outcome.base_amount, dec!(114.29));
    assert_eq!(outcome.tax_amount, dec!(5.71));
    assert_eq!(outcome.total_amount, dec!(120.00));
    assert_eq!(outcome.tax_rate, dec!(5));
}

#[test]
fn test_settlement_path_selection() {
    assert_eq!(
        SettlementPath::from_tax_rate(None, dec!(5)).unwrap(),
        SettlementPath::CashOnDelivery
    );
    assert_eq!(
        SettlementPath::from_tax_rate(Some(dec!(0)), dec!(5)).unwrap(),
        SettlementPath::CashOnDelivery
    );
    assert_eq!(
        SettlementPath::from_tax_rate(Some(dec!(5.00)), dec!(5)).unwrap(),
        SettlementPath::TaxInvoice
    );

    let err = SettlementPath::from_tax_rate(Some(dec!(12)), dec!(5)).unwrap_err();
    assert_eq!(err.field(), Some("tax_rate"));
}

#[test]
fn test_outbound_totals_keep_both_paths() {
    let route = ServiceRoute::parse("PH_TO_UAE").unwrap();
    let charges = ChargeBreakdown {
        rate: dec!(10),
        shipping_charge: dec!(185.00),
        pickup_charge: dec!(15.00),
        delivery_charge: dec!(20.00),
        insurance_charge: Decimal::ZERO,
        base_amount: dec!(220.00),
        delivery_cod: Some(dec!(20.00)),
        delivery_tax_invoice: Some(dec!(30.00)),
        settlement_path: Some(SettlementPath::CashOnDelivery),
    };

    let outcome = TaxCalculator::default()
        .calculate(&route, false, &charges)
        .unwrap();

    assert_eq!(outcome.total_amount_cod, Some(dec!(220.00)));
    assert_eq!(outcome.total_amount_tax_invoice, Some(dec!(31.50)));
    assert_eq!(outcome.total_amount, dec!(220.00));
    assert_eq!(outcome.tax_amount, Decimal::ZERO);
    assert_eq!(outcome.tax_rate, Decimal::ZERO);
}
