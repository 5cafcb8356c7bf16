//! Terminal rendering of a dashboard view

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use polars::prelude::*;

use crate::pipeline::{
    retained_percent, DashboardView, InsightSet, MetricError, RankedFactor, Relationship,
};
use crate::utils::{
    display_name, print_filter_summary, print_info, print_section_header, print_subheader,
    print_success, print_warning,
};

/// Print every section of the view. `details` adds the describe tables and
/// the strong factor pairs.
pub fn render(view: &DashboardView, outcome: &str, details: bool) {
    if view.overview.is_filtered() {
        if let Some(percent) = retained_percent(view.overview.rows, view.overview.total_rows) {
            print_filter_summary(view.overview.rows, view.overview.total_rows, percent);
        }
    }
    if view.is_empty() {
        print_warning("No records match the current filters.");
    }

    render_overview(view, details);
    render_performance(view, outcome);
    render_factor_impact(view, outcome);
    render_relationships(view, details);
}

fn print_table(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        header
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn print_fallback(error: &MetricError) {
    print_info(&error.fallback_message());
}

fn signed(delta: f64, suffix: &str) -> String {
    format!("{:+.1}{}", delta, suffix)
}

fn delta_cell(delta: &Result<f64, MetricError>, suffix: &str) -> Cell {
    match delta {
        Ok(d) if *d > 0.0 => Cell::new(signed(*d, suffix)).fg(Color::Green),
        Ok(d) if *d < 0.0 => Cell::new(signed(*d, suffix)).fg(Color::Red),
        Ok(d) => Cell::new(signed(*d, suffix)),
        Err(_) => Cell::new("—"),
    }
}

fn value_or_fallback<T>(value: &Result<T, MetricError>, format: impl Fn(&T) -> String) -> String {
    match value {
        Ok(v) => format(v),
        Err(e) => e.fallback_message(),
    }
}

fn cell_text(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn render_overview(view: &DashboardView, details: bool) {
    print_section_header("Dataset Overview");

    let overview = &view.overview;
    let mut table = new_table(&["Metric", "Value", "vs. all data"]);
    table.add_row(vec![
        Cell::new("Average Score"),
        Cell::new(value_or_fallback(&overview.average, |v| format!("{:.1}", v))),
        delta_cell(&overview.average_delta, ""),
    ]);
    table.add_row(vec![
        Cell::new("Pass Rate"),
        Cell::new(value_or_fallback(&overview.pass_rate, |v| format!("{:.1}%", v))),
        delta_cell(&overview.pass_rate_delta, "%"),
    ]);
    table.add_row(vec![
        Cell::new("Total Students"),
        Cell::new(overview.rows).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Score Range"),
        Cell::new(value_or_fallback(&overview.range, |r| {
            format!("{} - {}", r.min, r.max)
        })),
        Cell::new(""),
    ]);
    print_table(&table);

    print_subheader("Data Preview");
    if view.preview.height() == 0 {
        print_info("No rows to preview.");
    } else {
        let columns = view.preview.get_columns();
        let mut table = new_table(
            &columns
                .iter()
                .map(|c| c.name().as_str())
                .collect::<Vec<_>>(),
        );
        for row in 0..view.preview.height() {
            table.add_row(
                columns
                    .iter()
                    .map(|c| Cell::new(c.get(row).map(cell_text).unwrap_or_default()))
                    .collect::<Vec<_>>(),
            );
        }
        print_table(&table);
    }

    print_subheader("Data Quality");
    match &view.missing {
        Ok(entries) if entries.is_empty() => print_success("No missing values found in the dataset!"),
        Ok(entries) => {
            let mut table = new_table(&["Column", "Missing Values", "Percent"]);
            for entry in entries {
                table.add_row(vec![
                    Cell::new(&entry.column),
                    Cell::new(entry.count).set_alignment(CellAlignment::Right),
                    Cell::new(format!("{:.1}%", entry.percent)).set_alignment(CellAlignment::Right),
                ]);
            }
            print_table(&table);
        }
        Err(e) => print_fallback(e),
    }

    if !details {
        return;
    }

    print_subheader("Numerical Columns");
    match &view.numeric_summary {
        Ok(rows) if rows.is_empty() => print_info("No numerical columns."),
        Ok(rows) => {
            let mut table = new_table(&[
                "Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
            ]);
            for s in rows {
                table.add_row(vec![
                    Cell::new(&s.column),
                    Cell::new(s.count),
                    Cell::new(format!("{:.2}", s.mean)),
                    Cell::new(s.std.map_or_else(|| "—".to_string(), |v| format!("{:.2}", v))),
                    Cell::new(format!("{:.2}", s.min)),
                    Cell::new(format!("{:.2}", s.q1)),
                    Cell::new(format!("{:.2}", s.median)),
                    Cell::new(format!("{:.2}", s.q3)),
                    Cell::new(format!("{:.2}", s.max)),
                ]);
            }
            print_table(&table);
        }
        Err(e) => print_fallback(e),
    }

    print_subheader("Categorical Columns");
    match &view.categorical_summary {
        Ok(rows) if rows.is_empty() => print_info("No categorical columns."),
        Ok(rows) => {
            let mut table = new_table(&["Column", "Unique Values", "Most Common"]);
            for s in rows {
                table.add_row(vec![
                    Cell::new(&s.column),
                    Cell::new(s.unique),
                    Cell::new(s.most_common.as_deref().unwrap_or("—")),
                ]);
            }
            print_table(&table);
        }
        Err(e) => print_fallback(e),
    }
}

fn render_performance(view: &DashboardView, outcome: &str) {
    print_section_header("Student Performance Analysis");

    print_subheader("Performance Categories");
    match &view.bands {
        Ok(bands) => {
            let mut table = new_table(&["Category", "Count", "Share"]);
            for band in bands {
                table.add_row(vec![
                    Cell::new(band.label),
                    Cell::new(band.count).set_alignment(CellAlignment::Right),
                    Cell::new(format!("{:.1}%", band.percent)).set_alignment(CellAlignment::Right),
                ]);
            }
            print_table(&table);
        }
        Err(e) => print_fallback(e),
    }

    let group = view.group_by.as_deref().unwrap_or("category");
    print_subheader(&format!(
        "Average {} by {}",
        display_name(outcome),
        display_name(group)
    ));
    match &view.group_means {
        Ok(stats) => {
            let mut table = new_table(&[group, "Average Score", "Count"]);
            for stat in stats {
                table.add_row(vec![
                    Cell::new(&stat.category),
                    Cell::new(format!("{:.1}", stat.mean)).set_alignment(CellAlignment::Right),
                    Cell::new(stat.count).set_alignment(CellAlignment::Right),
                ]);
            }
            print_table(&table);
        }
        Err(e) => print_fallback(e),
    }

    print_subheader(&format!(
        "{} Distribution by {}",
        display_name(outcome),
        display_name(group)
    ));
    match &view.group_quartiles {
        Ok(stats) => {
            let mut table = new_table(&[group, "n", "min", "25%", "median", "75%", "max"]);
            for s in stats {
                table.add_row(vec![
                    Cell::new(&s.category),
                    Cell::new(s.count),
                    Cell::new(format!("{:.1}", s.min)),
                    Cell::new(format!("{:.1}", s.q1)),
                    Cell::new(format!("{:.1}", s.median)),
                    Cell::new(format!("{:.1}", s.q3)),
                    Cell::new(format!("{:.1}", s.max)),
                ]);
            }
            print_table(&table);
        }
        Err(e) => print_fallback(e),
    }
}

fn correlation_cell(value: Option<f64>) -> Cell {
    match value {
        Some(r) if r > 0.0 => Cell::new(format!("{:.2}", r)).fg(Color::Blue),
        Some(r) if r < 0.0 => Cell::new(format!("{:.2}", r)).fg(Color::Red),
        Some(r) => Cell::new(format!("{:.2}", r)),
        None => Cell::new("n/a"),
    }
}

fn render_factor_impact(view: &DashboardView, outcome: &str) {
    print_section_header("Factor Impact Analysis");

    print_subheader(&format!("Factor Correlation with {}", display_name(outcome)));
    match &view.correlations {
        Ok(entries) if entries.is_empty() => {
            print_info("No numerical factors to correlate.")
        }
        Ok(entries) => {
            let mut sorted = entries.clone();
            sorted.sort_by(|a, b| match (a.correlation, b.correlation) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
            let mut table = new_table(&["Factor", "Correlation"]);
            for entry in &sorted {
                table.add_row(vec![
                    Cell::new(display_name(&entry.factor)),
                    correlation_cell(entry.correlation).set_alignment(CellAlignment::Right),
                ]);
            }
            print_table(&table);
        }
        Err(e) => print_fallback(e),
    }

    print_subheader("Key Insights");
    if let Err(e) = &view.correlations {
        print_fallback(e);
        return;
    }
    render_ranked(
        "Top Positive Factors",
        &view.insights.top_positive,
        view.insights.positive_message(),
    );
    render_ranked(
        "Top Negative Factors",
        &view.insights.top_negative,
        view.insights.negative_message(),
    );
}

fn render_ranked(title: &str, factors: &[RankedFactor], fallback: Option<&str>) {
    println!("    {}", style(title).bold());
    if let Some(message) = fallback {
        println!("      {}", style(message).dim());
        return;
    }
    for factor in factors {
        println!(
            "      {} {} (Correlation: {:.2})",
            style("•").dim(),
            style(display_name(&factor.factor)).bold(),
            factor.correlation
        );
    }
}

fn render_relationships(view: &DashboardView, details: bool) {
    print_section_header("Relationship Explorer");

    print_subheader("Correlation Matrix");
    match &view.matrix {
        Ok(matrix) => {
            let mut header = vec![""];
            header.extend(matrix.names().iter().map(String::as_str));
            let mut table = new_table(&header);
            for (i, name) in matrix.names().iter().enumerate() {
                let mut row = vec![Cell::new(name).add_attribute(Attribute::Bold)];
                row.extend((0..matrix.len()).map(|j| correlation_cell(matrix.get(i, j))));
                table.add_row(row);
            }
            print_table(&table);
        }
        Err(e) if e.is_insufficient_data() => {
            print_info("Not enough numerical variables for correlation analysis.")
        }
        Err(e) => print_fallback(e),
    }

    if details {
        render_strong_pairs(&view.insights);
    }
}

fn render_strong_pairs(insights: &InsightSet) {
    print_subheader("Insights from Variable Relationships");
    if let Some(message) = insights.strong_pairs_message() {
        print_info(message);
        return;
    }

    let mut table = new_table(&["Variable 1", "Variable 2", "Correlation", "Relationship"]);
    for pair in &insights.strong_pairs {
        table.add_row(vec![
            Cell::new(display_name(&pair.first)),
            Cell::new(display_name(&pair.second)),
            correlation_cell(Some(pair.correlation)),
            Cell::new(match pair.relationship {
                Relationship::Positive => "Positive",
                Relationship::Negative => "Negative",
            }),
        ]);
    }
    print_table(&table);
}
