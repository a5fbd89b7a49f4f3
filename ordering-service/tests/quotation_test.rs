//! Quotation generation tests.

mod common;

use common::{line_input, TestApp};
use ordering_service::models::{GenerateQuotation, QuotationStatus, UpdateQuotation};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use service_core::error::AppError;

#[tokio::test]
async fn generate_snapshots_lines_and_totals() {
    let app = TestApp::spawn();
    let order_id = app.seed_order().await;
    let variant_id = app.seed_variant(Some(dec!(30000))).await;
    let color_id = app.seed_color().await;
    app.seed_stock(variant_id, color_id, 10).await;

    app.order_lines
        .create(line_input(order_id, variant_id, color_id, 2, Some(dec!(1000000000))))
        .await
        .expect("Line should be created");

    let quotation = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            discount_percent: Some(dec!(10)),
            ..Default::default()
        })
        .await
        .expect("Generate should succeed");

    assert_eq!(quotation.status, QuotationStatus::Pending);
    assert!(quotation.quotation_number.starts_with("DQ-"));
    assert_eq!(quotation.subtotal, dec!(2000000000));
    assert_eq!(quotation.discount_amount, dec!(200000000.00));
    assert_eq!(quotation.total_amount, dec!(1800000000.00));
    assert_eq!(quotation.validity_days, 30);
    assert_eq!(
        quotation.expiry_date,
        quotation.quotation_date + chrono::Duration::days(30)
    );

    let lines = app
        .quotations
        .lines(quotation.quotation_id)
        .await
        .expect("Lines should exist");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(lines[0].unit_price, dec!(1000000000));
    assert_eq!(lines[0].discount_percentage, Some(dec!(10)));
    assert_eq!(lines[0].total_price, dec!(2000000000));
}

#[tokio::test]
async fn subtotal_sums_line_totals_across_many_lines() {
    let app = TestApp::spawn();
    let order_id = app.seed_order().await;
    let variant_id = app.seed_variant(Some(dec!(30000))).await;
    let color_id = app.seed_color().await;
    app.seed_stock(variant_id, color_id, 50).await;

    app.order_lines
        .create(line_input(order_id, variant_id, color_id, 3, Some(dec!(19999.99))))
        .await
        .expect("First line");
    app.order_lines
        .create(line_input(order_id, variant_id, color_id, 5, Some(dec!(42000))))
        .await
        .expect("Second line");
    app.order_lines
        .create(line_input(order_id, variant_id, color_id, 1, None))
        .await
        .expect("Third line, priced from the variant list price");

    let quotation = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await
        .expect("Generate should succeed");

    let lines = app
        .quotations
        .lines(quotation.quotation_id)
        .await
        .expect("Lines");
    let line_sum: Decimal = lines.iter().map(|line| line.total_price).sum();

    // 3 x 19999.99 + 5 x 42000 + 1 x 30000 (variant list price fallback).
    assert_eq!(quotation.subtotal, dec!(299999.97));
    assert_eq!(quotation.subtotal, line_sum);
    assert_eq!(quotation.discount_amount, Decimal::ZERO);
    assert_eq!(quotation.total_amount, quotation.subtotal);
}

#[tokio::test]
async fn line_discounts_fold_into_lines_not_the_header() {
    let app = TestApp::spawn();
    let order_id = app.seed_order().await;
    let variant_id = app.seed_variant(None).await;
    let color_id = app.seed_color().await;
    app.seed_stock(variant_id, color_id, 10).await;

    let mut input = line_input(order_id, variant_id, color_id, 2, Some(dec!(1000)));
    input.discount_percent = Some(dec!(20));
    app.order_lines.create(input).await.expect("Line");

    let quotation = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await
        .expect("Generate should succeed");

    // No override: the header keeps the per-line discount out of its
    // discount amount; the line carries it instead.
    assert_eq!(quotation.subtotal, dec!(2000));
    assert_eq!(quotation.discount_amount, Decimal::ZERO);
    assert_eq!(quotation.total_amount, dec!(2000));

    let lines = app.quotations.lines(quotation.quotation_id).await.expect("Lines");
    assert_eq!(lines[0].discount_amount, dec!(400.00));
    assert_eq!(lines[0].final_price, dec!(1600.00));
}

#[tokio::test]
async fn override_discount_supersedes_line_discounts() {
    let app = TestApp::spawn();
    let order_id = app.seed_order().await;
    let variant_id = app.seed_variant(None).await;
    let color_id = app.seed_color().await;
    app.seed_stock(variant_id, color_id, 10).await;

    let mut input = line_input(order_id, variant_id, color_id, 2, Some(dec!(1000)));
    input.discount_percent = Some(dec!(20));
    app.order_lines.create(input).await.expect("Line");

    let quotation = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            discount_percent: Some(dec!(5)),
            ..Default::default()
        })
        .await
        .expect("Generate should succeed");

    assert_eq!(quotation.discount_percentage, Some(dec!(5)));
    assert_eq!(quotation.discount_amount, dec!(100.00));
    assert_eq!(quotation.total_amount, dec!(1900.00));

    let lines = app.quotations.lines(quotation.quotation_id).await.expect("Lines");
    assert_eq!(lines[0].discount_percentage, Some(dec!(5)));
    assert_eq!(lines[0].discount_amount, dec!(100.00));
}

#[tokio::test]
async fn unpriced_line_without_list_price_quotes_at_zero() {
    let app = TestApp::spawn();
    let order_id = app.seed_order().await;
    let variant_id = app.seed_variant(None).await;
    let color_id = app.seed_color().await;
    app.seed_stock(variant_id, color_id, 10).await;

    app.order_lines
        .create(line_input(order_id, variant_id, color_id, 3, None))
        .await
        .expect("Line");

    let quotation = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await
        .expect("Generate should succeed");

    assert_eq!(quotation.subtotal, Decimal::ZERO);
    assert_eq!(quotation.total_amount, Decimal::ZERO);

    let lines = app.quotations.lines(quotation.quotation_id).await.expect("Lines");
    assert_eq!(lines[0].unit_price, Decimal::ZERO);
}

#[tokio::test]
async fn second_active_quotation_is_a_conflict() {
    let app = TestApp::spawn();
    let order_id = app.seed_order().await;
    let variant_id = app.seed_variant(Some(dec!(30000))).await;
    let color_id = app.seed_color().await;
    app.seed_stock(variant_id, color_id, 10).await;

    app.order_lines
        .create(line_input(order_id, variant_id, color_id, 1, None))
        .await
        .expect("Line");

    let first = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await
        .expect("First generate should succeed");

    // PENDING blocks a second quotation.
    let while_pending = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await;
    assert!(matches!(while_pending, Err(AppError::Conflict(_))));

    // SENT still blocks it.
    app.quotations.send(first.quotation_id).await.expect("Send");
    let while_sent = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await;
    assert!(matches!(while_sent, Err(AppError::Conflict(_))));

    // A terminal state releases the order for a fresh quotation.
    app.quotations
        .reject(first.quotation_id, "Too expensive")
        .await
        .expect("Reject");
    app.quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await
        .expect("Generate after rejection should succeed");
}

#[tokio::test]
async fn order_without_dealer_reference_is_rejected() {
    let app = TestApp::spawn();
    let order_id = app.seed_order_with(None, None).await;
    let variant_id = app.seed_variant(Some(dec!(30000))).await;
    let color_id = app.seed_color().await;
    app.seed_stock(variant_id, color_id, 10).await;

    app.order_lines
        .create(line_input(order_id, variant_id, color_id, 1, None))
        .await
        .expect("Line");

    let result = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn order_without_lines_is_rejected() {
    let app = TestApp::spawn();
    let order_id = app.seed_order().await;

    let result = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let app = TestApp::spawn();

    let result = app
        .quotations
        .generate(GenerateQuotation {
            order_id: uuid::Uuid::new_v4(),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn payment_terms_copy_from_the_order() {
    let app = TestApp::spawn();
    let order_id = app
        .seed_order_with(Some(uuid::Uuid::new_v4()), Some(45))
        .await;
    let variant_id = app.seed_variant(Some(dec!(30000))).await;
    let color_id = app.seed_color().await;
    app.seed_stock(variant_id, color_id, 10).await;

    app.order_lines
        .create(line_input(order_id, variant_id, color_id, 1, None))
        .await
        .expect("Line");

    let quotation = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await
        .expect("Generate should succeed");

    assert_eq!(quotation.payment_terms_days, 45);
}

#[tokio::test]
async fn update_is_pending_only_and_reprices_the_header() {
    let app = TestApp::spawn();
    let order_id = app.seed_order().await;
    let variant_id = app.seed_variant(None).await;
    let color_id = app.seed_color().await;
    app.seed_stock(variant_id, color_id, 10).await;

    app.order_lines
        .create(line_input(order_id, variant_id, color_id, 2, Some(dec!(1000))))
        .await
        .expect("Line");

    let quotation = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await
        .expect("Generate");

    let updated = app
        .quotations
        .update(
            quotation.quotation_id,
            UpdateQuotation {
                discount_percent: Some(dec!(10)),
                validity_days: Some(60),
                ..Default::default()
            },
        )
        .await
        .expect("Update should succeed while PENDING");

    assert_eq!(updated.discount_amount, dec!(200.00));
    assert_eq!(updated.total_amount, dec!(1800.00));
    assert_eq!(updated.validity_days, 60);
    assert_eq!(
        updated.expiry_date,
        updated.quotation_date + chrono::Duration::days(60)
    );

    app.quotations
        .send(quotation.quotation_id)
        .await
        .expect("Send");

    let after_send = app
        .quotations
        .update(
            quotation.quotation_id,
            UpdateQuotation {
                notes: Some("too late".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(after_send, Err(AppError::InvalidState(_))));
}

#[tokio::test]
async fn delete_is_pending_only() {
    let app = TestApp::spawn();
    let order_id = app.seed_order().await;
    let variant_id = app.seed_variant(Some(dec!(30000))).await;
    let color_id = app.seed_color().await;
    app.seed_stock(variant_id, color_id, 10).await;

    app.order_lines
        .create(line_input(order_id, variant_id, color_id, 1, None))
        .await
        .expect("Line");

    let quotation = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await
        .expect("Generate");

    app.quotations
        .delete(quotation.quotation_id)
        .await
        .expect("Delete should succeed while PENDING");

    let regenerated = app
        .quotations
        .generate(GenerateQuotation {
            order_id,
            ..Default::default()
        })
        .await
        .expect("Regenerate after delete");
    app.quotations
        .send(regenerated.quotation_id)
        .await
        .expect("Send");

    let delete_sent = app.quotations.delete(regenerated.quotation_id).await;
    assert!(matches!(delete_sent, Err(AppError::InvalidState(_))));
}
