//! Field merge rules for product-activity consolidation
//!
//! Every consolidated field has exactly one rule. Counters and money totals
//! are summed; descriptive values take the occurrence with the highest line
//! number.

use std::fmt;

use crate::app::models::{ConsolidatedSelection, ProductActivity};

/// How values from several records combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// Add present values; absent on every record stays absent
    Sum,
    /// Keep the value from the latest line that reports one
    Last,
}

/// A single typed value read from a product-activity record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for MergeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeValue::Number(value) => write!(f, "{}", value),
            MergeValue::Text(value) => write!(f, "'{}'", value),
        }
    }
}

/// Consolidated product fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Price,
    Capacity,
    ProductId,
    SoldOutAt,
    UnitsSold,
    Revenue,
    TestVends,
    FreeVends,
    CashSalesCount,
    CashSalesCents,
    CashlessSalesCount,
    CashlessSalesCents,
    DiscountCount,
    DiscountCents,
}

impl ProductField {
    pub const ALL: [ProductField; 14] = [
        ProductField::Price,
        ProductField::Capacity,
        ProductField::ProductId,
        ProductField::SoldOutAt,
        ProductField::UnitsSold,
        ProductField::Revenue,
        ProductField::TestVends,
        ProductField::FreeVends,
        ProductField::CashSalesCount,
        ProductField::CashSalesCents,
        ProductField::CashlessSalesCount,
        ProductField::CashlessSalesCents,
        ProductField::DiscountCount,
        ProductField::DiscountCents,
    ];

    pub fn merge_rule(&self) -> MergeRule {
        match self {
            ProductField::Price
            | ProductField::Capacity
            | ProductField::ProductId
            | ProductField::SoldOutAt => MergeRule::Last,
            ProductField::UnitsSold
            | ProductField::Revenue
            | ProductField::TestVends
            | ProductField::FreeVends
            | ProductField::CashSalesCount
            | ProductField::CashSalesCents
            | ProductField::CashlessSalesCount
            | ProductField::CashlessSalesCents
            | ProductField::DiscountCount
            | ProductField::DiscountCents => MergeRule::Sum,
        }
    }

    /// Field name as serialized on [`ConsolidatedSelection`]
    pub fn name(&self) -> &'static str {
        match self {
            ProductField::Price => "price_cents",
            ProductField::Capacity => "capacity",
            ProductField::ProductId => "product_id",
            ProductField::SoldOutAt => "sold_out_at",
            ProductField::UnitsSold => "units_sold",
            ProductField::Revenue => "revenue_cents",
            ProductField::TestVends => "test_vends",
            ProductField::FreeVends => "free_vends",
            ProductField::CashSalesCount => "cash_sales_count",
            ProductField::CashSalesCents => "cash_sales_cents",
            ProductField::CashlessSalesCount => "cashless_sales_count",
            ProductField::CashlessSalesCents => "cashless_sales_cents",
            ProductField::DiscountCount => "discount_count",
            ProductField::DiscountCents => "discount_cents",
        }
    }

    /// Value reported by one record
    pub fn read(&self, activity: &ProductActivity) -> Option<MergeValue> {
        match self {
            ProductField::ProductId => activity.product_id.clone().map(MergeValue::Text),
            ProductField::SoldOutAt => activity.sold_out_at.clone().map(MergeValue::Text),
            _ => self.number_in_activity(activity).map(MergeValue::Number),
        }
    }

    /// Value accumulated so far on a selection
    pub fn current(&self, selection: &ConsolidatedSelection) -> Option<MergeValue> {
        match self {
            ProductField::ProductId => selection.product_id.clone().map(MergeValue::Text),
            ProductField::SoldOutAt => selection.sold_out_at.clone().map(MergeValue::Text),
            _ => self.number_slot(selection).map(MergeValue::Number),
        }
    }

    /// Store a merged value on a selection
    pub fn write(&self, selection: &mut ConsolidatedSelection, value: Option<MergeValue>) {
        match (self, value) {
            (ProductField::ProductId, value) => selection.product_id = value.and_then(into_text),
            (ProductField::SoldOutAt, value) => selection.sold_out_at = value.and_then(into_text),
            (field, value) => {
                let number = value.and_then(|v| match v {
                    MergeValue::Number(n) => Some(n),
                    MergeValue::Text(_) => None,
                });
                match field {
                    ProductField::Price => selection.price_cents = number,
                    ProductField::Capacity => selection.capacity = number,
                    ProductField::UnitsSold => selection.units_sold = number,
                    ProductField::Revenue => selection.revenue_cents = number,
                    ProductField::TestVends => selection.test_vends = number,
                    ProductField::FreeVends => selection.free_vends = number,
                    ProductField::CashSalesCount => selection.cash_sales_count = number,
                    ProductField::CashSalesCents => selection.cash_sales_cents = number,
                    ProductField::CashlessSalesCount => selection.cashless_sales_count = number,
                    ProductField::CashlessSalesCents => selection.cashless_sales_cents = number,
                    ProductField::DiscountCount => selection.discount_count = number,
                    ProductField::DiscountCents => selection.discount_cents = number,
                    ProductField::ProductId | ProductField::SoldOutAt => {}
                }
            }
        }
    }

    fn number_in_activity(&self, activity: &ProductActivity) -> Option<i64> {
        match self {
            ProductField::Price => activity.price_cents,
            ProductField::Capacity => activity.capacity,
            ProductField::UnitsSold => activity.units_sold,
            ProductField::Revenue => activity.revenue_cents,
            ProductField::TestVends => activity.test_vends,
            ProductField::FreeVends => activity.free_vends,
            ProductField::CashSalesCount => activity.cash_sales_count,
            ProductField::CashSalesCents => activity.cash_sales_cents,
            ProductField::CashlessSalesCount => activity.cashless_sales_count,
            ProductField::CashlessSalesCents => activity.cashless_sales_cents,
            ProductField::DiscountCount => activity.discount_count,
            ProductField::DiscountCents => activity.discount_cents,
            ProductField::ProductId | ProductField::SoldOutAt => None,
        }
    }

    fn number_slot(&self, selection: &ConsolidatedSelection) -> Option<i64> {
        match self {
            ProductField::Price => selection.price_cents,
            ProductField::Capacity => selection.capacity,
            ProductField::UnitsSold => selection.units_sold,
            ProductField::Revenue => selection.revenue_cents,
            ProductField::TestVends => selection.test_vends,
            ProductField::FreeVends => selection.free_vends,
            ProductField::CashSalesCount => selection.cash_sales_count,
            ProductField::CashSalesCents => selection.cash_sales_cents,
            ProductField::CashlessSalesCount => selection.cashless_sales_count,
            ProductField::CashlessSalesCents => selection.cashless_sales_cents,
            ProductField::DiscountCount => selection.discount_count,
            ProductField::DiscountCents => selection.discount_cents,
            ProductField::ProductId | ProductField::SoldOutAt => None,
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn into_text(value: MergeValue) -> Option<String> {
    match value {
        MergeValue::Text(text) => Some(text),
        MergeValue::Number(_) => None,
    }
}

/// Combine the accumulated value with a later record's value
///
/// `incoming` must come from a line after every line folded into `current`.
pub fn merge(
    rule: MergeRule,
    current: Option<MergeValue>,
    incoming: Option<MergeValue>,
) -> Option<MergeValue> {
    match (rule, current, incoming) {
        (_, None, incoming) => incoming,
        (_, current, None) => current,
        (MergeRule::Sum, Some(MergeValue::Number(a)), Some(MergeValue::Number(b))) => {
            Some(MergeValue::Number(a.saturating_add(b)))
        }
        (_, Some(_), incoming) => incoming,
    }
}
