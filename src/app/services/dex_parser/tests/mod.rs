//! Test utilities for DEX parser testing
//!
//! Sample files for each dialect and small helpers used across the parser test
//! modules.

use std::io::Write;
use tempfile::NamedTempFile;

use super::classifier::{ClassifiedLine, classify};
use super::tokenizer::tokenize;

// Test modules
mod classifier_tests;
mod envelope_tests;
mod mapping_tests;
mod stats_tests;

/// Crane machine with selection codes repeated on every product line
pub fn create_crane_dex() -> String {
    [
        "DXS*CN00012345*VA*V1/1*1",
        "ST*001*0001",
        "ID1*112233*CN167*2103*FLOOR2**A-44",
        "ID4*2*840",
        "VA1*4500*30",
        "PA1*A1*150*COLA*10",
        "PA2*A1*150*3*450",
        "PA7*A1*CA*0*150*2*300",
        "PA1*A2*125*CHIPS*8",
        "PA2*A2*125*4*500",
        "SE*10*0001",
        "DXE*1*1",
    ]
    .join("\r\n")
}

/// Generic file where PA2-PA5 inherit the selection from PA1
pub fn create_generic_dex() -> String {
    [
        "DXS*XYZ0000001*VA*V0/6*1",
        "ST*001*0001",
        "ID1*998877*VM200*1*LOBBY**A-17",
        "PA1*A1*100*WATER*12",
        "PA2*5*500",
        "PA3*1",
        "PA5*20240105*1430",
        "PA1*A2*120*JUICE*12",
        "PA2*2*240",
        "SE*9*0001",
        "DXE*1*1",
    ]
    .join("\n")
}

/// Automatic Products file reporting money in whole units
pub fn create_automatic_products_dex() -> String {
    [
        "DXS*AP55501*VA*V1/1*1",
        "ST*001*0001",
        "PA1*11*1.5*SODA*9",
        "PA2*4*6",
        "PA1*12*2*TEA*9",
        "PA2*1*2.25",
        "SE*6*0001",
        "DXE*1*1",
    ]
    .join("\n")
}

/// Dixie-Narco file with capacity before price in PA1
pub fn create_dixie_narco_dex() -> String {
    [
        "DXS*DN9000*VA*V1/1*1",
        "ST*001*0001",
        "PA1*12*20*175*LEMON",
        "PA2*6*1050",
        "SE*4*0001",
        "DXE*1*1",
    ]
    .join("\n")
}

/// Tokenize and classify text with the default delimiter
pub fn classify_text(text: &str) -> Vec<ClassifiedLine> {
    tokenize(text, '*').lines.into_iter().map(classify).collect()
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}
