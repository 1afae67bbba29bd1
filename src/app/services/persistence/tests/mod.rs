//! Tests for persistence sinks

use crate::app::models::DexReadResult;
use crate::app::services::dex_parser::DexParser;

use super::SourceRead;

mod read_id_tests;

/// Small Crane audit used by the sink tests
pub fn sample_text() -> String {
    [
        "DXS*CN0001*VA*V1/1*1",
        "ST*001*0001",
        "PA1*A1*150*COLA*10",
        "PA2*A1*150*3*450",
        "PA1*A2*125*CHIPS*8",
        "EA1*EGS",
        "SE*6*0001",
        "DXE*1*1",
    ]
    .join("\n")
}

/// Parsed sample with its source
pub fn sample_read() -> (SourceRead, DexReadResult) {
    let text = sample_text();
    let result = DexParser::default().parse_str(&text);
    let source = SourceRead::new(text)
        .with_device("machine-7")
        .with_path("/audits/machine7.dex");
    (source, result)
}
