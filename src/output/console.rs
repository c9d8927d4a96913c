//! Terminal rendering of metric tables and summaries.

use crate::aggregator::{MetricTable, SummaryVector};
use colored::*;

const MISSING: &str = "NaN";

/// Heading followed by the traces x configurations table
pub fn render_metric_table(table: &MetricTable) -> String {
    let mut out = heading(&format!("{} (detailed)", table.kind().title()));

    let mut header = vec!["trace".to_string()];
    header.extend(table.configs().map(str::to_string));

    let rows: Vec<Vec<String>> = table
        .traces()
        .map(|trace| {
            let mut cells = vec![trace.to_string()];
            cells.extend(table.configs().map(|config| format_value(table.get(trace, config))));
            cells
        })
        .collect();

    out.push_str(&render_grid(&header, &rows));
    out
}

/// Heading followed by one line per configuration
pub fn render_summary(summary: &SummaryVector) -> String {
    let mut out = heading(&format!("{} (average)", summary.metric.title()));

    let header = vec!["prefetch".to_string(), summary.metric.file_stem().to_string()];
    let rows: Vec<Vec<String>> = summary
        .values
        .iter()
        .map(|(config, value)| vec![config.clone(), format_value(*value)])
        .collect();

    out.push_str(&render_grid(&header, &rows));
    out
}

fn heading(title: &str) -> String {
    format!("\n{}\n", title.magenta().bold())
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}", v),
        None => MISSING.to_string(),
    }
}

/// First column left-aligned, the rest right-aligned
fn render_grid(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    for line in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                if i == 0 {
                    format!("{:<width$}", cell, width = *width)
                } else {
                    format!("{:>width$}", cell, width = *width)
                }
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{summarize, MetricKind};
    use pretty_assertions::assert_eq;

    fn table() -> MetricTable {
        let mut table = MetricTable::new(MetricKind::Speedup);
        table.insert("trace1", "FDIP", Some(2.0));
        table.insert("long-trace", "FDIP", None);
        table
    }

    #[test]
    fn test_render_metric_table() {
        colored::control::set_override(false);
        let text = render_metric_table(&table());

        assert_eq!(
            text,
            "\nSpeedup (detailed)\n\
             trace           FDIP\n\
             long-trace       NaN\n\
             trace1      2.000000\n"
        );
    }

    #[test]
    fn test_render_summary() {
        colored::control::set_override(false);
        let text = render_summary(&summarize(&table()));

        assert!(text.contains("Speedup (average)"));
        assert!(text.contains("prefetch"));
        // geometric mean over a column with a missing trace
        assert_eq!(text.lines().last(), Some("FDIP          NaN"));
    }
}
