//! Test utilities for selection consolidation

use crate::app::models::ProductActivity;

mod merge_rules_tests;

/// Product activity for a selection with no fields set
pub fn activity(code: &str) -> ProductActivity {
    ProductActivity {
        selection_code: code.to_string(),
        ..Default::default()
    }
}

/// PA1-style activity
pub fn price_record(code: &str, price: i64, capacity: i64) -> ProductActivity {
    ProductActivity {
        price_cents: Some(price),
        capacity: Some(capacity),
        ..activity(code)
    }
}

/// PA2-style activity
pub fn sales_record(code: &str, units: i64, revenue: i64) -> ProductActivity {
    ProductActivity {
        units_sold: Some(units),
        revenue_cents: Some(revenue),
        ..activity(code)
    }
}
