//! Grid command implementation
//!
//! Parses a single file and renders the inferred selection layout as a
//! row-by-column table.

use colored::*;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;

use super::shared::{RunSummary, load_configuration, setup_logging};
use crate::app::models::{DexReadResult, GridPosition, IssueKind};
use crate::app::services::dex_parser::DexParser;
use crate::app::services::grid_analyzer::sort_labels;
use crate::cli::args::GridArgs;
use crate::Result;

/// Run the grid command
pub async fn run_grid(args: GridArgs) -> Result<RunSummary> {
    let start_time = Instant::now();

    args.validate()?;
    setup_logging(args.get_log_level())?;

    let mut config = load_configuration(args.config_file.as_deref())?;
    if let Some(columns) = args.columns {
        config.parsing.column_hint = Some(columns);
    }
    config.validate()?;

    let parser = DexParser::new(config.parse_options()?);
    let result = parser.parse_file(&args.input).await?;
    info!(
        "Grid for {}: {:?}",
        args.input.display(),
        result.grid.convention
    );

    println!("{}", args.input.display().to_string().bright_white().bold());
    println!(
        "Convention: {} ({} rows x {} columns)",
        result.grid.convention.description().cyan(),
        result.grid.rows,
        result.grid.columns
    );
    for issue in result.issues_of(IssueKind::GridInferenceWarning) {
        println!("{}", issue.message.yellow());
    }
    println!();
    print!("{}", render_grid(&result));

    Ok(RunSummary {
        files_parsed: 1,
        reads_failed: usize::from(!result.success),
        selections: result.selections.len(),
        issues: result.issues.len(),
        processing_time: start_time.elapsed(),
        ..RunSummary::default()
    })
}

/// Render placed selections as a text table, rows down and columns across
///
/// Selections without a position are listed underneath.
pub fn render_grid(result: &DexReadResult) -> String {
    let cells: BTreeMap<&GridPosition, &str> = result
        .selections
        .iter()
        .filter_map(|s| {
            s.grid_position
                .as_ref()
                .map(|position| (position, s.selection_code.as_str()))
        })
        .collect();

    let mut output = String::new();

    if !cells.is_empty() {
        let rows = sort_labels(cells.keys().map(|p| p.row.clone()));
        let columns = sort_labels(cells.keys().map(|p| p.column.clone()));

        let width = cells
            .values()
            .map(|code| code.len())
            .chain(columns.iter().map(String::len))
            .max()
            .unwrap_or(1);
        let row_width = rows.iter().map(String::len).max().unwrap_or(1);

        output.push_str(&format!("{:row_width$}", ""));
        for column in &columns {
            output.push_str(&format!(" {:>width$}", column));
        }
        output.push('\n');

        for row in &rows {
            output.push_str(&format!("{:row_width$}", row));
            for column in &columns {
                let code = cells
                    .get(&GridPosition::new(row.as_str(), column.as_str()))
                    .copied()
                    .unwrap_or(".");
                output.push_str(&format!(" {:>width$}", code));
            }
            output.push('\n');
        }
    }

    let unplaced: Vec<&str> = result
        .selections
        .iter()
        .filter(|s| s.grid_position.is_none())
        .map(|s| s.selection_code.as_str())
        .collect();
    if !unplaced.is_empty() {
        output.push_str(&format!("Unplaced: {}\n", unplaced.join(", ")));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audit(codes: &[&str]) -> String {
        let mut lines = vec!["DXS*CN0001*VA*V1/1*1".to_string()];
        for code in codes {
            lines.push(format!("PA1*{}*100*ITEM", code));
        }
        lines.join("\n")
    }

    #[test]
    fn test_render_alpha_grid() {
        let result = DexParser::default().parse_str(&audit(&["A1", "A2", "B1", "B10"]));
        let rendered = render_grid(&result);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split_whitespace().collect::<Vec<_>>(), ["1", "2", "10"]);
        assert_eq!(lines[1].split_whitespace().collect::<Vec<_>>(), ["A", "A1", "A2", "."]);
        assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), ["B", "B1", ".", "B10"]);
    }

    #[test]
    fn test_render_lists_unplaced() {
        // Mixed encodings match no convention without a column hint
        let result = DexParser::default().parse_str(&audit(&["A1", "1A"]));
        assert!(result.selections.iter().all(|s| s.grid_position.is_none()));

        let rendered = render_grid(&result);
        assert_eq!(rendered, "Unplaced: A1, 1A\n");
    }
}
