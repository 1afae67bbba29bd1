//! Per-dialect element layouts
//!
//! Each layout lists `(position, field)` pairs for one record type. Positions
//! are DEX element numbers: 1 is the first element after the tag. Adding a
//! dialect means adding a match arm here; the compiler flags every table that
//! needs one.

use super::field_parsers::MoneyUnit;
use crate::app::models::{Dialect, RecordType};

/// Typed element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Count,
    Money,
}

/// Every element the mappers know how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    // Product activity
    SelectionCode,
    Price,
    Capacity,
    ProductId,
    UnitsSold,
    Revenue,
    TestVends,
    FreeVends,
    SoldOutDate,
    SoldOutTime,
    PriceList,
    /// Price on one price list or payment device, separate from the base price
    PriceListPrice,
    PaymentDevice,
    DeviceCount,
    DeviceValue,
    DiscountCount,
    DiscountValue,

    // Envelope
    CommunicationId,
    FunctionalId,
    Version,
    TransmissionNumber,
    SetCount,
    SetId,
    ControlNumber,
    SegmentCount,
    ChecksumValue,

    // Machine identification
    SerialNumber,
    ModelNumber,
    BuildStandard,
    Location,
    AssetNumber,
    DecimalPlaces,
    CurrencyCode,
    Date,
    Time,
    SoftwareVersion,

    // Audit totals
    Value,
    Count,
    CashIn,
    ToCashBox,
    ToTubes,
    BillsIn,
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Price
            | Field::PriceListPrice
            | Field::Revenue
            | Field::DeviceValue
            | Field::DiscountValue
            | Field::Value
            | Field::CashIn
            | Field::ToCashBox
            | Field::ToTubes
            | Field::BillsIn => FieldKind::Money,

            Field::Capacity
            | Field::UnitsSold
            | Field::TestVends
            | Field::FreeVends
            | Field::PriceList
            | Field::DeviceCount
            | Field::DiscountCount
            | Field::TransmissionNumber
            | Field::SetCount
            | Field::SegmentCount
            | Field::DecimalPlaces
            | Field::Count => FieldKind::Count,

            Field::SelectionCode
            | Field::ProductId
            | Field::SoldOutDate
            | Field::SoldOutTime
            | Field::PaymentDevice
            | Field::CommunicationId
            | Field::FunctionalId
            | Field::Version
            | Field::SetId
            | Field::ControlNumber
            | Field::ChecksumValue
            | Field::SerialNumber
            | Field::ModelNumber
            | Field::BuildStandard
            | Field::Location
            | Field::AssetNumber
            | Field::CurrencyCode
            | Field::Date
            | Field::Time
            | Field::SoftwareVersion => FieldKind::Text,
        }
    }
}

pub type Layout = &'static [(usize, Field)];

/// Money unit used by a dialect
pub fn money_unit(dialect: Dialect) -> MoneyUnit {
    match dialect {
        Dialect::Generic | Dialect::Crane | Dialect::DixieNarco => MoneyUnit::Cents,
        Dialect::AutomaticProducts => MoneyUnit::WholeUnits,
    }
}

/// Element layout for a record type under a dialect
pub fn layout(record_type: RecordType, dialect: Dialect) -> Layout {
    match record_type {
        RecordType::ProductActivity(subtype) => product_layout(subtype, dialect),
        RecordType::StreamStart => DXS,
        RecordType::StreamEnd => DXE,
        RecordType::TransactionHeader => ST,
        RecordType::TransactionTrailer => SE,
        RecordType::Checksum => G85,
        RecordType::Identification(1) => ID1,
        RecordType::Identification(4) => ID4,
        RecordType::Identification(5) => ID5,
        RecordType::Identification(_) => &[],
        RecordType::ControlBoard => CB1,
        RecordType::VendTotals(_) => VALUE_COUNT,
        RecordType::CashActivity(3) => CA3,
        RecordType::CashActivity(_) => VALUE_COUNT,
        RecordType::CashlessActivity => VALUE_COUNT,
        RecordType::Unknown => &[],
    }
}

/// Whether records of this type name their selection explicitly
pub fn carries_selection(record_type: RecordType, dialect: Dialect) -> bool {
    layout(record_type, dialect)
        .iter()
        .any(|(_, field)| *field == Field::SelectionCode)
}

fn product_layout(subtype: u8, dialect: Dialect) -> Layout {
    match dialect {
        Dialect::Generic | Dialect::AutomaticProducts => generic_product_layout(subtype),
        Dialect::DixieNarco => match subtype {
            1 => DN_PA1,
            _ => generic_product_layout(subtype),
        },
        Dialect::Crane => match subtype {
            2 => CN_PA2,
            3 => CN_PA3,
            4 => CN_PA4,
            5 => CN_PA5,
            6 => CN_PA6,
            8 => CN_PA8,
            _ => generic_product_layout(subtype),
        },
    }
}

fn generic_product_layout(subtype: u8) -> Layout {
    match subtype {
        1 => PA1,
        2 => PA2,
        3 => PA3,
        4 => PA4,
        5 => PA5,
        6 => PA6,
        7 => PA7,
        8 => PA8,
        _ => &[],
    }
}

// Product activity, generic ordering. PA2-PA6 and PA8 inherit the selection of
// the preceding PA1.
const PA1: Layout = &[
    (1, Field::SelectionCode),
    (2, Field::Price),
    (3, Field::ProductId),
    (4, Field::Capacity),
];
const PA2: Layout = &[(1, Field::UnitsSold), (2, Field::Revenue)];
const PA3: Layout = &[(1, Field::TestVends)];
const PA4: Layout = &[(1, Field::FreeVends)];
const PA5: Layout = &[(1, Field::SoldOutDate), (2, Field::SoldOutTime)];
const PA6: Layout = &[(1, Field::PriceList), (2, Field::PriceListPrice)];
const PA7: Layout = &[
    (1, Field::SelectionCode),
    (2, Field::PaymentDevice),
    (3, Field::PriceList),
    (4, Field::PriceListPrice),
    (5, Field::DeviceCount),
    (6, Field::DeviceValue),
];
const PA8: Layout = &[(1, Field::DiscountCount), (2, Field::DiscountValue)];

const DN_PA1: Layout = &[
    (1, Field::SelectionCode),
    (2, Field::Capacity),
    (3, Field::Price),
    (4, Field::ProductId),
];

// Crane repeats the selection on every product line
const CN_PA2: Layout = &[
    (1, Field::SelectionCode),
    (2, Field::Price),
    (3, Field::UnitsSold),
    (4, Field::Revenue),
];
const CN_PA3: Layout = &[(1, Field::SelectionCode), (2, Field::TestVends)];
const CN_PA4: Layout = &[(1, Field::SelectionCode), (2, Field::FreeVends)];
const CN_PA5: Layout = &[
    (1, Field::SelectionCode),
    (2, Field::SoldOutDate),
    (3, Field::SoldOutTime),
];
const CN_PA6: Layout = &[
    (1, Field::SelectionCode),
    (2, Field::PriceList),
    (3, Field::PriceListPrice),
];
const CN_PA8: Layout = &[
    (1, Field::SelectionCode),
    (2, Field::DiscountCount),
    (3, Field::DiscountValue),
];

const DXS: Layout = &[
    (1, Field::CommunicationId),
    (2, Field::FunctionalId),
    (3, Field::Version),
    (4, Field::TransmissionNumber),
];
const DXE: Layout = &[(1, Field::TransmissionNumber), (2, Field::SetCount)];
const ST: Layout = &[(1, Field::SetId), (2, Field::ControlNumber)];
const SE: Layout = &[(1, Field::SegmentCount), (2, Field::ControlNumber)];
const G85: Layout = &[(1, Field::ChecksumValue)];

const ID1: Layout = &[
    (1, Field::SerialNumber),
    (2, Field::ModelNumber),
    (3, Field::BuildStandard),
    (4, Field::Location),
    (6, Field::AssetNumber),
];
const ID4: Layout = &[(1, Field::DecimalPlaces), (2, Field::CurrencyCode)];
const ID5: Layout = &[(1, Field::Date), (2, Field::Time)];
const CB1: Layout = &[
    (1, Field::SerialNumber),
    (2, Field::ModelNumber),
    (3, Field::SoftwareVersion),
];

const VALUE_COUNT: Layout = &[(1, Field::Value), (2, Field::Count)];
const CA3: Layout = &[
    (1, Field::CashIn),
    (2, Field::ToCashBox),
    (3, Field::ToTubes),
    (4, Field::BillsIn),
];
