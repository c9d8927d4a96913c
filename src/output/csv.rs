//! Delimited text exports of metric tables and summary vectors.

use crate::aggregator::{MetricTable, SummaryVector};
use crate::utils::error::OutputError;
use csv::Writer;

/// `trace,<config...>` followed by one line per trace; missing cells are empty
pub fn metric_csv(table: &MetricTable) -> Result<Vec<u8>, OutputError> {
    let configs: Vec<&str> = table.configs().collect();
    let mut writer = Writer::from_writer(Vec::new());

    let mut header = vec!["trace"];
    header.extend(&configs);
    writer.write_record(&header)?;

    for trace in table.traces() {
        let mut record = vec![trace.to_string()];
        record.extend(
            configs
                .iter()
                .map(|config| format_cell(table.get(trace, config))),
        );
        writer.write_record(&record)?;
    }

    finish(writer)
}

/// `prefetch,<metric>` followed by one line per configuration
pub fn summary_csv(summary: &SummaryVector) -> Result<Vec<u8>, OutputError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["prefetch", summary.metric.file_stem()])?;

    for (config, value) in &summary.values {
        writer.write_record([config.clone(), format_cell(*value)])?;
    }

    finish(writer)
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>, OutputError> {
    writer
        .into_inner()
        .map_err(|e| OutputError::WriteFailed(e.into_error()))
}
