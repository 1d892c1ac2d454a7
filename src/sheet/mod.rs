//! Spreadsheet input: the four column slices the campaign is built from

pub mod reader;
pub mod validation;

pub use reader::{SheetSource, read_rows};
pub use validation::validate;

use log::info;

use crate::config::SheetConfig;
use crate::error::ProvisionError;

/// Keywords, headlines, descriptions and callouts read from the sheet.
///
/// Every value is trimmed and non-empty, and each list is already cut at its
/// configured maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetData {
    pub keywords: Vec<String>,
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
    pub callouts: Vec<String>,
}

impl SheetData {
    /// Build from data rows (header already removed)
    pub fn from_rows(rows: &[Vec<String>], config: &SheetConfig) -> Self {
        let columns = &config.columns;
        let limits = &config.limits;

        Self {
            keywords: extract_column(rows, columns.keywords, limits.max_keywords),
            headlines: extract_column(rows, columns.headlines, limits.max_headlines),
            descriptions: extract_column(rows, columns.descriptions, limits.max_descriptions),
            callouts: extract_column(rows, columns.callouts, limits.max_callouts),
        }
    }

    /// Read the configured source; unreadable input is a configuration error
    pub async fn load(config: &SheetConfig) -> Result<Self, ProvisionError> {
        let source = SheetSource::parse(&config.source)
            .map_err(|e| ProvisionError::Configuration(format!("{:#}", e)))?;

        let rows = read_rows(&source, &config.sheet_name)
            .await
            .map_err(|e| ProvisionError::Configuration(format!("{:#}", e)))?;

        let data = Self::from_rows(&rows, config);
        info!("Loaded sheet {}: {}", config.source, data.summary());
        Ok(data)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} keywords, {} headlines, {} descriptions, {} callouts",
            self.keywords.len(),
            self.headlines.len(),
            self.descriptions.len(),
            self.callouts.len()
        )
    }
}

/// Non-empty trimmed values of one column, in row order, at most `max_items`
pub fn extract_column(rows: &[Vec<String>], column: usize, max_items: usize) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get(column))
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .take(max_items)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnConfig, LimitConfig};

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_extract_column_skips_blank_and_trims() {
        let rows = vec![
            row(&["  running shoes ", "x"]),
            row(&["", "y"]),
            row(&["   "]),
            row(&["trail shoes"]),
        ];

        assert_eq!(extract_column(&rows, 0, 10), vec!["running shoes", "trail shoes"]);
    }

    #[test]
    fn test_extract_column_truncates_at_max() {
        let rows: Vec<Vec<String>> = (0..10).map(|i| row(&[&format!("kw{}", i)])).collect();
        assert_eq!(extract_column(&rows, 0, 3), vec!["kw0", "kw1", "kw2"]);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let rows = vec![row(&["a"]), row(&["b", "", "", "", "", "callout"])];
        assert_eq!(extract_column(&rows, 5, 20), vec!["callout"]);
    }

    #[test]
    fn test_from_rows_uses_configured_columns() {
        let config = SheetConfig {
            source: "unused.csv".to_string(),
            sheet_name: String::new(),
            columns: ColumnConfig::default(),
            limits: LimitConfig {
                max_headlines: 2,
                ..LimitConfig::default()
            },
        };
        let rows = vec![
            row(&["kw1", "H1", "", "D1", "", "C1"]),
            row(&["kw2", "H2", "", "D2"]),
            row(&["", "H3"]),
        ];

        let data = SheetData::from_rows(&rows, &config);
        assert_eq!(data.keywords, vec!["kw1", "kw2"]);
        assert_eq!(data.headlines, vec!["H1", "H2"]);
        assert_eq!(data.descriptions, vec!["D1", "D2"]);
        assert_eq!(data.callouts, vec!["C1"]);
        assert_eq!(data.summary(), "2 keywords, 2 headlines, 2 descriptions, 1 callouts");
    }
}
