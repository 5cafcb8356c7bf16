//! Terminal styling utilities for the dashboard output

use console::{style, Emoji};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static FILTER: Emoji<'_, '_> = Emoji("🔎 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        CHART,
        style("Student Performance Analytics").cyan().bold()
    );
    println!(
        "    {}",
        style("Analyze factors influencing student performance and identify key insights.").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the data source and outcome card
pub fn print_source(source: &str, outcome: &str, rows: usize, columns: usize) {
    let line = "─".repeat(54);

    println!("    ┌{}┐", line);
    println!("    │  {} Source:  {:<41}│", FOLDER, truncate_string(source, 40));
    println!("    │  {} Outcome: {:<41}│", TARGET, truncate_string(outcome, 40));
    println!(
        "    │  {} Shape:   {:<41}│",
        CHART,
        format!("{} rows × {} columns", rows, columns)
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a section header with styling
pub fn print_section_header(title: &str) {
    println!();
    println!(
        "    {} {}",
        style("▌").cyan().bold(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a sub-heading within a section
pub fn print_subheader(title: &str) {
    println!();
    println!("    {}", style(title).cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print the active filter line
pub fn print_filter_summary(rows: usize, total: usize, percent: f64) {
    println!(
        "    {} Filtered data: {} of {} records ({})",
        FILTER,
        style(rows).yellow().bold(),
        total,
        style(format!("{:.1}%", percent)).dim()
    );
}

/// Replace underscores for display, e.g. `Hours_Studied` -> `Hours Studied`
pub fn display_name(column: &str) -> String {
    column.replace('_', " ")
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
