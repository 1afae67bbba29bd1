//! Typed field mapping for classified records
//!
//! Converts the element tokens of one classified line into a typed
//! [`RecordPayload`] using the layout for the resolved dialect. The mapper is
//! stateful only in the selection context: the code of the most recent PA1,
//! inherited by product records that do not name their selection.

use std::collections::BTreeMap;

use super::classifier::ClassifiedLine;
use super::field_layouts::{Field, FieldKind, carries_selection, layout, money_unit};
use super::field_parsers::{parse_count, parse_money, parse_text};
use crate::app::models::{
    CashActivity, CashlessActivity, Checksum, ControlBoard, Dialect, Identification,
    ProductActivity, RecordPayload, RecordType, StreamHeader, StreamTrailer, TransactionHeader,
    TransactionTrailer, VendTotals,
};
use crate::constants::{CASH_DEVICES, CASHLESS_DEVICES};

/// A record whose fields could not be typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingFailure {
    /// Offending element position, if a single element is at fault
    pub field_index: Option<usize>,
    pub message: String,
}

impl MappingFailure {
    fn at_field(field_index: usize, message: impl Into<String>) -> Self {
        Self {
            field_index: Some(field_index),
            message: message.into(),
        }
    }

    fn record(message: impl Into<String>) -> Self {
        Self {
            field_index: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    Text(Option<String>),
    Number(i64),
}

/// Typed values read from one line, keyed by field
#[derive(Debug, Default)]
struct MappedFields {
    values: BTreeMap<Field, FieldValue>,
}

impl MappedFields {
    fn text(&self, field: Field) -> Option<String> {
        match self.values.get(&field) {
            Some(FieldValue::Text(value)) => value.clone(),
            _ => None,
        }
    }

    fn number(&self, field: Field) -> Option<i64> {
        match self.values.get(&field) {
            Some(FieldValue::Number(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Maps classified lines to typed payloads for one file
#[derive(Debug, Clone)]
pub struct RecordMapper {
    dialect: Dialect,
    selection_context: Option<String>,
}

impl RecordMapper {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            selection_context: None,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Selection inherited by the next context-less product record
    pub fn selection_context(&self) -> Option<&str> {
        self.selection_context.as_deref()
    }

    /// Map one line; `Ok(None)` for unknown records
    pub fn map(&mut self, line: &ClassifiedLine) -> Result<Option<RecordPayload>, MappingFailure> {
        if line.record_type == RecordType::Unknown {
            return Ok(None);
        }

        if line.record_type == RecordType::ProductActivity(1) {
            // A PA1 opens a new selection even if its other fields are bad
            self.selection_context = line.field(1).and_then(parse_text);
        }

        let fields = self.read_fields(line)?;
        let payload = match line.record_type {
            RecordType::ProductActivity(subtype) => {
                RecordPayload::ProductActivity(self.product_activity(line, subtype, &fields)?)
            }
            RecordType::StreamStart => RecordPayload::StreamHeader(StreamHeader {
                communication_id: fields.text(Field::CommunicationId),
                functional_id: fields.text(Field::FunctionalId),
                version: fields.text(Field::Version),
                transmission_number: fields.number(Field::TransmissionNumber),
            }),
            RecordType::StreamEnd => RecordPayload::StreamTrailer(StreamTrailer {
                transmission_number: fields.number(Field::TransmissionNumber),
                set_count: fields.number(Field::SetCount),
            }),
            RecordType::TransactionHeader => RecordPayload::TransactionHeader(TransactionHeader {
                set_id: fields.text(Field::SetId),
                control_number: fields.text(Field::ControlNumber),
            }),
            RecordType::TransactionTrailer => {
                RecordPayload::TransactionTrailer(TransactionTrailer {
                    segment_count: fields.number(Field::SegmentCount),
                    control_number: fields.text(Field::ControlNumber),
                })
            }
            RecordType::Checksum => RecordPayload::Checksum(Checksum {
                value: fields.text(Field::ChecksumValue),
            }),
            RecordType::Identification(_) => RecordPayload::Identification(Identification {
                serial_number: fields.text(Field::SerialNumber),
                model_number: fields.text(Field::ModelNumber),
                build_standard: fields.text(Field::BuildStandard),
                location: fields.text(Field::Location),
                asset_number: fields.text(Field::AssetNumber),
                decimal_places: fields.number(Field::DecimalPlaces),
                currency_code: fields.text(Field::CurrencyCode),
                date: fields.text(Field::Date),
                time: fields.text(Field::Time),
            }),
            RecordType::ControlBoard => RecordPayload::ControlBoard(ControlBoard {
                serial_number: fields.text(Field::SerialNumber),
                model_number: fields.text(Field::ModelNumber),
                software_version: fields.text(Field::SoftwareVersion),
            }),
            RecordType::VendTotals(_) => RecordPayload::VendTotals(VendTotals {
                value_cents: fields.number(Field::Value),
                count: fields.number(Field::Count),
            }),
            RecordType::CashActivity(_) => RecordPayload::CashActivity(CashActivity {
                sales_cents: fields.number(Field::Value),
                sales_count: fields.number(Field::Count),
                cash_in_cents: fields.number(Field::CashIn),
                to_cash_box_cents: fields.number(Field::ToCashBox),
                to_tubes_cents: fields.number(Field::ToTubes),
                bills_in_cents: fields.number(Field::BillsIn),
            }),
            RecordType::CashlessActivity => RecordPayload::CashlessActivity(CashlessActivity {
                sales_cents: fields.number(Field::Value),
                sales_count: fields.number(Field::Count),
            }),
            RecordType::Unknown => return Ok(None),
        };

        Ok(Some(payload))
    }

    /// Read every element named by the layout; absent elements are skipped
    fn read_fields(&self, line: &ClassifiedLine) -> Result<MappedFields, MappingFailure> {
        let unit = money_unit(self.dialect);
        let mut fields = MappedFields::default();

        for (position, field) in layout(line.record_type, self.dialect) {
            let Some(token) = line.field(*position) else {
                continue;
            };

            let value = match field.kind() {
                FieldKind::Text => FieldValue::Text(parse_text(token)),
                FieldKind::Count => FieldValue::Number(
                    parse_count(token)
                        .map_err(|e| MappingFailure::at_field(*position, e.to_string()))?,
                ),
                FieldKind::Money => FieldValue::Number(
                    parse_money(token, unit)
                        .map_err(|e| MappingFailure::at_field(*position, e.to_string()))?,
                ),
            };
            fields.values.insert(*field, value);
        }

        Ok(fields)
    }

    fn product_activity(
        &self,
        line: &ClassifiedLine,
        subtype: u8,
        fields: &MappedFields,
    ) -> Result<ProductActivity, MappingFailure> {
        let selection_code = if carries_selection(line.record_type, self.dialect) {
            fields
                .text(Field::SelectionCode)
                .ok_or_else(|| MappingFailure::at_field(1, "selection code is empty"))?
        } else {
            self.selection_context.clone().ok_or_else(|| {
                MappingFailure::record(format!("PA{} has no preceding PA1 selection", subtype))
            })?
        };

        let sold_out_at = match (fields.text(Field::SoldOutDate), fields.text(Field::SoldOutTime)) {
            (Some(date), Some(time)) => Some(format!("{} {}", date, time)),
            (date, time) => date.or(time),
        };

        let mut activity = ProductActivity {
            selection_code,
            price_cents: fields.number(Field::Price),
            capacity: fields.number(Field::Capacity),
            product_id: fields.text(Field::ProductId),
            units_sold: fields.number(Field::UnitsSold),
            revenue_cents: fields.number(Field::Revenue),
            test_vends: fields.number(Field::TestVends),
            free_vends: fields.number(Field::FreeVends),
            discount_count: fields.number(Field::DiscountCount),
            discount_cents: fields.number(Field::DiscountValue),
            sold_out_at,
            payment_device: fields.text(Field::PaymentDevice),
            price_list: fields.number(Field::PriceList),
            price_list_price_cents: fields.number(Field::PriceListPrice),
            ..Default::default()
        };

        if let Some(device) = activity.payment_device.as_deref() {
            let count = fields.number(Field::DeviceCount);
            let value = fields.number(Field::DeviceValue);
            if is_device(device, CASH_DEVICES) {
                activity.cash_sales_count = count;
                activity.cash_sales_cents = value;
            } else if is_device(device, CASHLESS_DEVICES) {
                activity.cashless_sales_count = count;
                activity.cashless_sales_cents = value;
            }
        }

        Ok(activity)
    }
}

fn is_device(device: &str, codes: &[&str]) -> bool {
    codes.iter().any(|code| code.eq_ignore_ascii_case(device))
}
