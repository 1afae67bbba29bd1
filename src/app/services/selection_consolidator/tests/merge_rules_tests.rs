//! Tests for the merge rule table

use super::*;
use crate::app::models::ConsolidatedSelection;
use crate::app::services::selection_consolidator::merge_rules::{
    MergeRule, MergeValue, ProductField, merge,
};

#[test]
fn test_rule_table() {
    assert_eq!(ProductField::Price.merge_rule(), MergeRule::Last);
    assert_eq!(ProductField::ProductId.merge_rule(), MergeRule::Last);
    assert_eq!(ProductField::SoldOutAt.merge_rule(), MergeRule::Last);
    assert_eq!(ProductField::UnitsSold.merge_rule(), MergeRule::Sum);
    assert_eq!(ProductField::CashlessSalesCents.merge_rule(), MergeRule::Sum);

    let sums = ProductField::ALL
        .iter()
        .filter(|f| f.merge_rule() == MergeRule::Sum)
        .count();
    assert_eq!(sums, 10);
}

#[test]
fn test_sum_merge() {
    assert_eq!(merge(MergeRule::Sum, None, None), None);
    assert_eq!(
        merge(MergeRule::Sum, Some(MergeValue::Number(3)), None),
        Some(MergeValue::Number(3))
    );
    assert_eq!(
        merge(
            MergeRule::Sum,
            Some(MergeValue::Number(3)),
            Some(MergeValue::Number(4))
        ),
        Some(MergeValue::Number(7))
    );
}

#[test]
fn test_last_merge() {
    assert_eq!(
        merge(
            MergeRule::Last,
            Some(MergeValue::Number(150)),
            Some(MergeValue::Number(175))
        ),
        Some(MergeValue::Number(175))
    );
    assert_eq!(
        merge(MergeRule::Last, Some(MergeValue::Text("COLA".into())), None),
        Some(MergeValue::Text("COLA".into()))
    );
}

#[test]
fn test_read_and_write_round_through_selection() {
    let source = sales_record("A1", 2, 300);
    let mut selection = ConsolidatedSelection::default();

    for field in ProductField::ALL {
        field.write(&mut selection, field.read(&source));
    }

    assert_eq!(selection.units_sold, Some(2));
    assert_eq!(selection.revenue_cents, Some(300));
    assert_eq!(selection.price_cents, None);
    assert_eq!(
        ProductField::Revenue.current(&selection),
        Some(MergeValue::Number(300))
    );
}
