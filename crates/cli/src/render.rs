//! Plain-text rendering of query results.

use colored::Colorize;
use dashboard::{ColumnInfo, SeriesComparison};
use pipeline::{AggregatedRow, AggregatedTable, RowKind};

/// Format a metric value; absent values print as `-`
pub fn format_value(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e12 => format!("{v:.0}"),
        Some(v) if v.abs() < 1.0 => format!("{v:.3}"),
        Some(v) => format!("{v:.2}"),
    }
}

fn row_label(row: &AggregatedRow) -> String {
    match row.kind {
        RowKind::Group => row.label.clone(),
        RowKind::Other => format!("{} (collapsed)", row.label),
        RowKind::Custom => format!("* {}", row.label),
    }
}

pub fn print_columns(columns: &[ColumnInfo]) {
    println!("{}", "Numeric columns:".bold().blue());
    for info in columns {
        let range = match info.range {
            Some(r) => format!("[{}, {}]", format_value(Some(r.min)), format_value(Some(r.max))),
            None => "no values".to_string(),
        };
        let bound = match info.bound {
            Some(b) if b.is_inverted() => format!(
                "filtered to [{}, {}] (no matching games)",
                format_value(Some(b.min)),
                format_value(Some(b.max))
            )
            .red()
            .to_string(),
            Some(b) => format!(
                "filtered to [{}, {}]",
                format_value(Some(b.min)),
                format_value(Some(b.max))
            )
            .green()
            .to_string(),
            None => "not filtered".dimmed().to_string(),
        };
        println!("{}{:<18} {:<24} {}", "• ".cyan(), info.column.name(), range, bound);
    }
}

/// Print a table: one line per row, size first, then each metric.
///
/// Normalized values are shown in brackets next to the raw value.
pub fn print_table(title: &str, table: &AggregatedTable) {
    println!("{}", format!("{title} by {}", table.group_by).bold().blue());
    if table.is_empty() {
        println!("  {}", "No matching games".yellow());
        return;
    }

    let width = table
        .rows
        .iter()
        .map(|r| row_label(r).len())
        .max()
        .unwrap_or(0)
        .max(5);
    let mut header = format!("  {:<width$} {:>8}", "Group", "Size");
    for metric in &table.metrics {
        header.push_str(&format!(" {:>22}", metric.name()));
    }
    println!("{}", header.bold());

    for row in &table.rows {
        let mut line = format!("  {:<width$} {:>8}", row_label(row), row.size);
        for i in 0..table.metrics.len() {
            let cell = match row.normalized_value(i) {
                Some(n) => format!("{} [{:.2}]", format_value(row.value(i)), n),
                None => format_value(row.value(i)),
            };
            line.push_str(&format!(" {cell:>22}"));
        }
        match row.kind {
            RowKind::Group => println!("{line}"),
            RowKind::Other => println!("{}", line.dimmed()),
            RowKind::Custom => println!("{}", line.magenta()),
        }
    }
    println!(
        "  {} group memberships across {} rows",
        table.total_size,
        table.rows.len()
    );
}

pub fn print_series(comparisons: &[SeriesComparison]) {
    for comparison in comparisons {
        let series = &comparison.series;
        println!(
            "{}",
            format!("{} ({} points, {})", comparison.label, series.len(), series.granularity)
                .bold()
                .blue()
        );
        if series.is_empty() {
            println!("  {}", "No matching records".yellow());
            continue;
        }
        let mut header = format!("  {:<8} {:>8}", "Period", "Released");
        for column in &series.columns {
            header.push_str(&format!(" {:>18}", column.name()));
        }
        println!("{}", header.bold());
        for point in &series.points {
            let mut line = format!("  {:<8} {:>8}", point.label(), point.games_released);
            for value in &point.values {
                line.push_str(&format!(" {:>18}", format_value(Some(*value))));
            }
            if point.games_released == 0 {
                println!("{}", line.dimmed());
            } else {
                println!("{line}");
            }
        }
    }
}
