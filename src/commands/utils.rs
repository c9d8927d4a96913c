use crate::parser::{load_stats_file, KeyFilter};
use crate::table::{flatten, pad_paths};
use crate::utils::config::{AnalysisConfig, SCHEMA_VERSION};
use anyhow::{Context, Result};
use std::path::Path;

/// Flattened, padded view of one stats file, one `path = value` per line
pub fn inspect_file(path: &Path, config: &AnalysisConfig) -> Result<String> {
    let filter = KeyFilter::from_config(&config.loader).context("Invalid key pattern")?;
    let record = load_stats_file(path, &filter)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    let padded = pad_paths(&flatten(&record, &[]));
    let width = padded
        .keys()
        .map(|k| k.to_string().chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (key, value) in &padded {
        out.push_str(&format!(
            "{:<width$}  = {}\n",
            key.to_string(),
            value,
            width = width
        ));
    }
    Ok(out)
}

/// Display the effective configuration
pub fn print_config(config: &AnalysisConfig) -> Result<()> {
    let text = config.to_toml().context("Failed to render configuration")?;
    print!("{}", text);
    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("simstats v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Summarizes simulator statistics into tables, spreadsheets and charts.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inspect_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.trace1.100.10.stats");
        std::fs::write(
            &path,
            r#"{"roi-stats": {"cpu0": {"ipc-cumulative": 1.5, "L1I": {"load": {"miss": 3}}}}, "finished": true}"#,
        )
        .unwrap();

        let text = inspect_file(&path, &AnalysisConfig::default()).unwrap();

        assert_eq!(
            text,
            "roi-stats.cpu0.L1I / load / miss       = 3\n\
             roi-stats.cpu0.ipc-cumulative / - / -  = 1.5\n"
        );
    }

    #[test]
    fn test_inspect_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(inspect_file(&dir.path().join("nope.stats"), &AnalysisConfig::default()).is_err());
    }
}
