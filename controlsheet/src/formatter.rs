//! Output formatters for the run summary

use anyhow::Result;
use colored::*;
use controlsheet_core::GenerationSummary;

/// Print the summary in human-readable format with colors
pub fn print_human(summary: &GenerationSummary) {
    println!(
        "{}",
        format!(
            "Catalog: {} {} ({})",
            summary.catalog,
            summary.version,
            summary.input.display()
        )
        .bold()
    );
    println!();

    for sheet in &summary.sheets {
        println!(
            "  {} {} {}",
            "Sheet:".bold(),
            sheet.name.cyan().bold(),
            format!("({} rows, {} groups)", sheet.rows, sheet.groups).bright_black()
        );
    }
    println!();

    println!("{} {}", "Checklist items:".bold(), summary.total_items);
    if summary.written {
        println!("{}", "✓ Successfully generated workbook".green().bold());
        println!("Output: {}", summary.output.display());
    } else {
        println!("[DRY RUN] Output would be: {}", summary.output.display());
    }
}

/// Print the summary in JSON format
pub fn print_json(summary: &GenerationSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
