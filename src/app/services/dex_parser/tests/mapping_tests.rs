//! Tests for typed field mapping

use super::*;
use crate::app::models::{Dialect, ProductActivity, RecordPayload};
use crate::app::services::dex_parser::record_mapper::RecordMapper;

fn map_all(text: &str, dialect: Dialect) -> Vec<Result<Option<RecordPayload>, String>> {
    let mut mapper = RecordMapper::new(dialect);
    classify_text(text)
        .iter()
        .map(|line| mapper.map(line).map_err(|f| f.message))
        .collect()
}

fn product(payload: &Result<Option<RecordPayload>, String>) -> &ProductActivity {
    match payload {
        Ok(Some(RecordPayload::ProductActivity(activity))) => activity,
        other => panic!("expected product activity, got {:?}", other),
    }
}

#[test]
fn test_generic_pa1_and_inherited_selection() {
    let mapped = map_all("PA1*A1*150*COLA*10\nPA2*3*450\nPA3*1\nPA4*2", Dialect::Generic);

    let pa1 = product(&mapped[0]);
    assert_eq!(pa1.selection_code, "A1");
    assert_eq!(pa1.price_cents, Some(150));
    assert_eq!(pa1.product_id.as_deref(), Some("COLA"));
    assert_eq!(pa1.capacity, Some(10));
    assert_eq!(pa1.units_sold, None);

    let pa2 = product(&mapped[1]);
    assert_eq!(pa2.selection_code, "A1");
    assert_eq!(pa2.units_sold, Some(3));
    assert_eq!(pa2.revenue_cents, Some(450));

    assert_eq!(product(&mapped[2]).test_vends, Some(1));
    assert_eq!(product(&mapped[3]).free_vends, Some(2));
}

#[test]
fn test_absent_fields_are_none_and_blank_numbers_are_zero() {
    let mapped = map_all("PA1*A1**COLA", Dialect::Generic);
    let pa1 = product(&mapped[0]);

    // Present but blank price is zero, missing capacity is None
    assert_eq!(pa1.price_cents, Some(0));
    assert_eq!(pa1.capacity, None);
}

#[test]
fn test_inheriting_record_without_context_fails() {
    let mapped = map_all("PA2*3*450", Dialect::Generic);
    let message = mapped[0].as_ref().unwrap_err();
    assert!(message.contains("no preceding PA1"));
}

#[test]
fn test_empty_selection_code_fails_with_field_index() {
    let mut mapper = RecordMapper::new(Dialect::Generic);
    let lines = classify_text("PA1**150\nPA2*1*100");

    let failure = mapper.map(&lines[0]).unwrap_err();
    assert_eq!(failure.field_index, Some(1));

    // The blank PA1 clears the context, so the PA2 cannot borrow an older one
    assert!(mapper.selection_context().is_none());
    assert!(mapper.map(&lines[1]).is_err());
}

#[test]
fn test_invalid_number_reports_position() {
    let mut mapper = RecordMapper::new(Dialect::Generic);
    let lines = classify_text("PA1*A1*1x0*COLA*10\nPA2*2*200");

    let failure = mapper.map(&lines[0]).unwrap_err();
    assert_eq!(failure.field_index, Some(2));
    assert!(failure.message.contains("1x0"));

    // The selection still opens so following lines attach to A1
    assert_eq!(mapper.selection_context(), Some("A1"));
    let next = mapper.map(&lines[1]).unwrap();
    assert!(matches!(
        next,
        Some(RecordPayload::ProductActivity(ref activity)) if activity.selection_code == "A1"
    ));
}

#[test]
fn test_crane_layout_carries_selection() {
    let mapped = map_all("PA2*A1*150*3*450\nPA5*B4*20240101*0930", Dialect::Crane);

    let pa2 = product(&mapped[0]);
    assert_eq!(pa2.selection_code, "A1");
    assert_eq!(pa2.price_cents, Some(150));
    assert_eq!(pa2.units_sold, Some(3));
    assert_eq!(pa2.revenue_cents, Some(450));

    let pa5 = product(&mapped[1]);
    assert_eq!(pa5.selection_code, "B4");
    assert_eq!(pa5.sold_out_at.as_deref(), Some("20240101 0930"));
}

#[test]
fn test_dixie_narco_pa1_order() {
    let mapped = map_all("PA1*12*20*175*LEMON", Dialect::DixieNarco);
    let pa1 = product(&mapped[0]);

    assert_eq!(pa1.capacity, Some(20));
    assert_eq!(pa1.price_cents, Some(175));
    assert_eq!(pa1.product_id.as_deref(), Some("LEMON"));
}

#[test]
fn test_automatic_products_whole_units() {
    let mapped = map_all("PA1*11*1.5*SODA\nPA2*4*6\nVA1*12.25*9", Dialect::AutomaticProducts);

    assert_eq!(product(&mapped[0]).price_cents, Some(150));
    assert_eq!(product(&mapped[1]).revenue_cents, Some(600));
    assert!(matches!(
        &mapped[2],
        Ok(Some(RecordPayload::VendTotals(totals))) if totals.value_cents == Some(1225)
    ));
}

#[test]
fn test_pa7_routes_device_totals() {
    let mapped = map_all(
        "PA7*A1*CA*0*150*2*300\nPA7*A1*DA*1*140*5*700\nPA7*A1*TA*0*150*9*900",
        Dialect::Generic,
    );

    let cash = product(&mapped[0]);
    assert_eq!(cash.payment_device.as_deref(), Some("CA"));
    assert_eq!(cash.cash_sales_count, Some(2));
    assert_eq!(cash.cash_sales_cents, Some(300));
    assert_eq!(cash.cashless_sales_count, None);
    assert_eq!(cash.price_cents, None);

    let cashless = product(&mapped[1]);
    assert_eq!(cashless.price_list, Some(1));
    assert_eq!(cashless.price_list_price_cents, Some(140));
    assert_eq!(cashless.price_cents, None);
    assert_eq!(cashless.cashless_sales_count, Some(5));
    assert_eq!(cashless.cashless_sales_cents, Some(700));

    let other = product(&mapped[2]);
    assert_eq!(other.price_list_price_cents, Some(150));
    assert_eq!(other.cash_sales_count, None);
    assert_eq!(other.cashless_sales_count, None);
}

#[test]
fn test_envelope_and_audit_payloads() {
    let mapped = map_all(
        "DXS*CN1*VA*V1/1*7\nSE*12*0001\nID1*S1*M1*B1*L1**A1\nID4*2*840\nCA3*100*40*60*0\nDA2*900*6\nEA1*X",
        Dialect::Generic,
    );

    assert!(matches!(
        &mapped[0],
        Ok(Some(RecordPayload::StreamHeader(h)))
            if h.communication_id.as_deref() == Some("CN1") && h.transmission_number == Some(7)
    ));
    assert!(matches!(
        &mapped[1],
        Ok(Some(RecordPayload::TransactionTrailer(t))) if t.segment_count == Some(12)
    ));
    assert!(matches!(
        &mapped[2],
        Ok(Some(RecordPayload::Identification(id)))
            if id.asset_number.as_deref() == Some("A1") && id.decimal_places.is_none()
    ));
    assert!(matches!(
        &mapped[3],
        Ok(Some(RecordPayload::Identification(id)))
            if id.decimal_places == Some(2) && id.currency_code.as_deref() == Some("840")
    ));
    assert!(matches!(
        &mapped[4],
        Ok(Some(RecordPayload::CashActivity(ca)))
            if ca.cash_in_cents == Some(100) && ca.to_tubes_cents == Some(60) && ca.sales_cents.is_none()
    ));
    assert!(matches!(
        &mapped[5],
        Ok(Some(RecordPayload::CashlessActivity(da))) if da.sales_count == Some(6)
    ));
    assert!(matches!(&mapped[6], Ok(None)));
}
