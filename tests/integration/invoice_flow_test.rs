// Request → verification → invoice, with carrier sync and audit report

#[path = "../helpers/mod.rs"]
mod helpers;

use freightbill::modules::carriers::SyncStatus;
use freightbill::modules::invoices::GenerateInvoiceRequest;
use freightbill::modules::pricing::{Classification, SettlementPath};
use freightbill::modules::shipments::models::BoxDetail;
use freightbill::modules::shipments::RequestStatus;
use helpers::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_outbound_invoice_end_to_end() {
    let app = TestApp::new();

    let created = app
        .services
        .shipments
        .create_request(outbound_request())
        .await
        .unwrap();
    let request = created.request;
    assert_eq!(request.status, RequestStatus::Submitted);
    assert_eq!(request.version, 1);
    assert!(request.tracking_code.starts_with("PHL"));
    assert_eq!(request.tracking_code.len(), 15);
    assert!((8..=10).contains(&request.invoice_number.len()));

    let verified = app
        .services
        .verification
        .apply_verification(&request.id, verification(dec!(12), dec!(18.5), 3))
        .await
        .unwrap();
    assert_eq!(verified.status, RequestStatus::Verified);
    assert_eq!(verified.version, 2);
    // outbound forces GENERAL
    assert_eq!(verified.shipment_classification, Some(Classification::General));

    let invoice = app
        .services
        .invoices
        .generate_invoice(&request.id, tax_invoice_options())
        .await
        .unwrap();

    assert_eq!(invoice.invoice_number, request.invoice_number);
    assert_eq!(invoice.chargeable_weight, dec!(18.5));
    assert_eq!(invoice.amount, dec!(185.00));
    assert_eq!(invoice.pickup_charge, dec!(15.00));
    assert_eq!(invoice.delivery_charge, dec!(30.00));
    assert_eq!(invoice.base_amount, dec!(230.00));
    assert_eq!(invoice.tax_amount, dec!(1.50));
    assert_eq!(invoice.total_amount_cod, Some(dec!(220.00)));
    assert_eq!(invoice.total_amount_tax_invoice, Some(dec!(31.50)));
    assert_eq!(invoice.settlement_path, Some(SettlementPath::TaxInvoice));

    let stored = app.services.shipments.get_request(&request.id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Completed);
    assert_eq!(stored.version, 3);

    let fetched = app
        .services
        .invoices
        .get_invoice_for_request(&request.id)
        .await
        .unwrap();
    assert_eq!(fetched, invoice);

    let sync = app
        .services
        .carrier_sync
        .find_for_invoice(&invoice.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sync.status, SyncStatus::Synced);
    assert_eq!(sync.attempts, 1);
    assert_eq!(app.carrier.payloads()[0].awb, request.tracking_code);

    let report = app.services.reports.get_for_invoice(&invoice.id).await.unwrap();
    assert_eq!(report.total_amount, invoice.total_amount);
}

#[tokio::test]
async fn test_inbound_flomic_is_tax_inclusive() {
    let app = TestApp::new();
    let mut new_request = inbound_request(Some(Classification::Flomic));
    new_request.tracking_code = Some("uae-2024-0001".to_string());

    let created = app
        .services
        .shipments
        .create_request(new_request)
        .await
        .unwrap();
    assert_eq!(created.request.tracking_code, "UAE-2024-0001");
    assert!(created.tracking_code_substituted.is_none());

    app.services
        .verification
        .apply_verification(&created.request.id, verification(dec!(10), dec!(8), 1))
        .await
        .unwrap();

    let invoice = app
        .services
        .invoices
        .generate_invoice(&created.request.id, GenerateInvoiceRequest::default())
        .await
        .unwrap();

    assert_eq!(invoice.amount, dec!(120.00));
    assert_eq!(invoice.total_amount, dec!(120.00));
    assert_eq!(invoice.base_amount, dec!(114.29));
    assert_eq!(invoice.tax_amount, dec!(5.71));
    assert!(invoice.tax_inclusive);
    assert_eq!(invoice.total_amount_cod, None);
}

#[tokio::test]
async fn test_inbound_classification_enforced_at_verification() {
    let app = TestApp::new();
    let created = app
        .services
        .shipments
        .create_request(inbound_request(None))
        .await
        .unwrap();

    let err = app
        .services
        .verification
        .apply_verification(&created.request.id, verification(dec!(5), dec!(5), 1))
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("shipment_classification"));

    let mut payload = verification(dec!(5), dec!(5), 2);
    payload.shipment_classification = Some(Classification::Commercial);
    payload.boxes = Some(vec![
        BoxDetail {
            classification: Some(Classification::Commercial),
            ..BoxDetail::default()
        },
        BoxDetail {
            classification: Some(Classification::Personal),
            ..BoxDetail::default()
        },
    ]);
    let verified = app
        .services
        .verification
        .apply_verification(&created.request.id, payload)
        .await
        .unwrap();

    let snapshot = verified.verification.unwrap();
    assert!(snapshot.flomic_or_personal);
    assert_eq!(snapshot.number_of_boxes, 2);
}

#[tokio::test]
async fn test_insured_inbound_requires_declared_value() {
    let app = TestApp::new();
    let mut new_request = inbound_request(Some(Classification::Commercial));
    new_request.insured = true;
    let created = app
        .services
        .shipments
        .create_request(new_request)
        .await
        .unwrap();

    let err = app
        .services
        .verification
        .apply_verification(&created.request.id, verification(dec!(5), dec!(5), 1))
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("declared_value"));

    let mut payload = verification(dec!(5), dec!(5), 1);
    payload.declared_value = Some(dec!(1500));
    let verified = app
        .services
        .verification
        .apply_verification(&created.request.id, payload)
        .await
        .unwrap();
    assert_eq!(verified.declared_value, Some(dec!(1500)));
}

#[tokio::test]
async fn test_carrier_failure_keeps_invoice() {
    let app = TestApp::with_carrier(FakeCarrier::failing());
    let created = app
        .services
        .shipments
        .create_request(outbound_request())
        .await
        .unwrap();
    app.services
        .verification
        .apply_verification(&created.request.id, verification(dec!(40), dec!(35), 1))
        .await
        .unwrap();

    let invoice = app
        .services
        .invoices
        .generate_invoice(&created.request.id, tax_invoice_options())
        .await
        .unwrap();

    // COD delivery is free at 40 kg
    assert_eq!(invoice.total_amount_cod, Some(dec!(415.00)));
    assert!(app
        .services
        .invoices
        .get_invoice(&invoice.id)
        .await
        .is_ok());

    let sync = app
        .services
        .carrier_sync
        .find_for_invoice(&invoice.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sync.status, SyncStatus::Failed);
    assert!(sync.last_error.is_some());

    app.carrier.set_failing(false);
    let summary = app.services.carrier_sync.retry_pending(50).await.unwrap();
    assert_eq!(summary.attempted, 1);
    assert_eq!(summary.synced, 1);

    let sync = app
        .services
        .carrier_sync
        .find_for_invoice(&invoice.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sync.status, SyncStatus::Synced);
    assert_eq!(sync.attempts, 2);
    assert!(sync.carrier_reference.is_some());
}

#[tokio::test]
async fn test_report_failure_keeps_invoice() {
    let app = TestApp::new();
    app.store.fail_reports(true);
    let created = app
        .services
        .shipments
        .create_request(outbound_request())
        .await
        .unwrap();
    app.services
        .verification
        .apply_verification(&created.request.id, verification(dec!(2), dec!(1), 1))
        .await
        .unwrap();

    let invoice = app
        .services
        .invoices
        .generate_invoice(&created.request.id, tax_invoice_options())
        .await
        .unwrap();

    let err = app
        .services
        .reports
        .get_for_invoice(&invoice.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn test_outbound_pickup_amount_required() {
    let app = TestApp::new();
    let created = app
        .services
        .shipments
        .create_request(outbound_request())
        .await
        .unwrap();
    app.services
        .verification
        .apply_verification(&created.request.id, verification(dec!(10), dec!(10), 1))
        .await
        .unwrap();

    let err = app
        .services
        .invoices
        .generate_invoice(&created.request.id, GenerateInvoiceRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("pickup_base_amount"));

    let stored = app
        .services
        .shipments
        .get_request(&created.request.id)
        .await
        .unwrap();
    assert_eq!(stored.status, RequestStatus::Verified);
}

#[tokio::test]
async fn test_unverified_request_cannot_be_invoiced() {
    let app = TestApp::new();
    let created = app
        .services
        .shipments
        .create_request(outbound_request())
        .await
        .unwrap();

    let err = app
        .services
        .invoices
        .generate_invoice(&created.request.id, tax_invoice_options())
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("verification"));
}

#[tokio::test]
async fn test_stale_versions_conflict() {
    let app = TestApp::new();
    let created = app
        .services
        .shipments
        .create_request(outbound_request())
        .await
        .unwrap();
    let id = created.request.id;

    app.services
        .verification
        .apply_verification(&id, verification(dec!(10), dec!(10), 1))
        .await
        .unwrap();

    // second writer still holds version 1
    let err = app
        .services
        .verification
        .apply_verification(&id, verification(dec!(11), dec!(10), 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "conflict");

    let stale = GenerateInvoiceRequest {
        expected_version: Some(1),
        ..tax_invoice_options()
    };
    let err = app
        .services
        .invoices
        .generate_invoice(&id, stale)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "conflict");

    app.services
        .invoices
        .generate_invoice(&id, tax_invoice_options())
        .await
        .unwrap();

    let err = app
        .services
        .invoices
        .generate_invoice(&id, tax_invoice_options())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "conflict");

    let mut late = verification(dec!(10), dec!(10), 1);
    late.expected_version = Some(3);
    let err = app
        .services
        .verification
        .apply_verification(&id, late)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "conflict");
}

#[tokio::test]
async fn test_verification_without_version_uses_current() {
    let app = TestApp::new();
    let created = app
        .services
        .shipments
        .create_request(outbound_request())
        .await
        .unwrap();
    let id = created.request.id;

    let mut first = verification(dec!(10), dec!(10), 1);
    first.expected_version = None;
    let verified = app
        .services
        .verification
        .apply_verification(&id, first)
        .await
        .unwrap();
    assert_eq!(verified.version, 2);

    let mut again = verification(dec!(12), dec!(10), 2);
    again.expected_version = None;
    let reverified = app
        .services
        .verification
        .apply_verification(&id, again)
        .await
        .unwrap();
    assert_eq!(reverified.version, 3);
    assert_eq!(
        reverified.verification.unwrap().chargeable_weight,
        dec!(12)
    );
}

#[tokio::test]
async fn test_request_validation() {
    let app = TestApp::new();

    let mut missing_client = outbound_request();
    missing_client.client_id = "  ".to_string();
    let err = app
        .services
        .shipments
        .create_request(missing_client)
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("client_id"));

    let mut negative = inbound_request(Some(Classification::Commercial));
    negative.declared_value = Some(dec!(-1));
    let err = app
        .services
        .shipments
        .create_request(negative)
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("declared_value"));

    let created = app
        .services
        .shipments
        .create_request(outbound_request())
        .await
        .unwrap();
    let mut zero_boxes = verification(dec!(1), dec!(1), 0);
    zero_boxes.expected_version = Some(created.request.version);
    let err = app
        .services
        .verification
        .apply_verification(&created.request.id, zero_boxes)
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("number_of_boxes"));

    let mut bad_rate = verification(dec!(1), dec!(1), 1);
    bad_rate.rate = Some(Decimal::ZERO);
    let err = app
        .services
        .verification
        .apply_verification(&created.request.id, bad_rate)
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("rate"));

    let err = app.services.shipments.get_request("missing").await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn test_special_rate_overrides_table() {
    let app = TestApp::new();
    let mut new_request = outbound_request();
    new_request.sender_delivery_option = Default::default();
    let created = app
        .services
        .shipments
        .create_request(new_request)
        .await
        .unwrap();

    let mut payload = verification(dec!(10), dec!(10), 1);
    payload.rate = Some(dec!(7.5));
    app.services
        .verification
        .apply_verification(&created.request.id, payload)
        .await
        .unwrap();

    let invoice = app
        .services
        .invoices
        .generate_invoice(&created.request.id, GenerateInvoiceRequest::default())
        .await
        .unwrap();

    assert_eq!(invoice.rate, dec!(7.5));
    assert_eq!(invoice.amount, dec!(75.00));
    assert_eq!(invoice.settlement_path, Some(SettlementPath::CashOnDelivery));
    assert_eq!(invoice.total_amount, dec!(95.00));
}
