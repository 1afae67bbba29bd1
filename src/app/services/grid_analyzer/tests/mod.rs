//! Test utilities for grid pattern inference


/// Codes "A1".."A<columns>", "B1".. for a letter-row machine
pub fn alpha_grid(rows: &[char], columns: u32) -> Vec<String> {
    rows.iter()
        .flat_map(|row| (1..=columns).map(move |column| format!("{}{}", row, column)))
        .collect()
}

/// Borrow a list of owned codes
pub fn as_strs(codes: &[String]) -> Vec<&str> {
    codes.iter().map(String::as_str).collect()
}
