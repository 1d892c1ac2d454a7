use anyhow::{Context, Result, anyhow};
use calamine::{Reader, open_workbook_auto};
use csv::ReaderBuilder;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Where the campaign rows come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSource {
    /// .xlsx / .xlsm / .xls / .ods workbook
    Workbook(PathBuf),
    Csv(PathBuf),
    /// Google Sheets document, fetched through its CSV export
    GoogleSheet {
        spreadsheet_id: String,
        gid: Option<String>,
    },
}

impl SheetSource {
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.trim();

        if source.starts_with("http://") || source.starts_with("https://") {
            let spreadsheet_id = source
                .split("/spreadsheets/d/")
                .nth(1)
                .and_then(|rest| rest.split(['/', '?', '#']).next())
                .filter(|id| !id.is_empty())
                .ok_or_else(|| anyhow!("Not a Google Sheets URL: {}", source))?;

            let gid = source
                .split(['#', '?', '&'])
                .find_map(|part| part.strip_prefix("gid="))
                .map(|gid| gid.to_string());

            return Ok(Self::GoogleSheet {
                spreadsheet_id: spreadsheet_id.to_string(),
                gid,
            });
        }

        let path = PathBuf::from(source);
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv(path)),
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(Self::Workbook(path)),
            _ => Err(anyhow!(
                "Unsupported sheet source '{}': expected .xlsx, .xls, .ods, .csv or a Google Sheets URL",
                source
            )),
        }
    }

    /// CSV export URL for a Google Sheets document
    pub fn export_url(&self, sheet_name: &str) -> Option<String> {
        match self {
            Self::GoogleSheet { spreadsheet_id, gid } => Some(if !sheet_name.is_empty() {
                format!(
                    "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv&sheet={}",
                    spreadsheet_id,
                    urlencoding::encode(sheet_name)
                )
            } else {
                format!(
                    "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
                    spreadsheet_id,
                    gid.as_deref().unwrap_or("0")
                )
            }),
            _ => None,
        }
    }
}

/// Read the data rows (header row removed) of the configured sheet
pub async fn read_rows(source: &SheetSource, sheet_name: &str) -> Result<Vec<Vec<String>>> {
    let rows = match source {
        SheetSource::Workbook(path) => read_workbook(path, sheet_name)?,
        SheetSource::Csv(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
            parse_csv(&content)?
        }
        SheetSource::GoogleSheet { .. } => {
            let url = source
                .export_url(sheet_name)
                .ok_or_else(|| anyhow!("No export URL for {:?}", source))?;
            info!("Fetching sheet export: {}", url);

            let content = reqwest::get(&url)
                .await
                .with_context(|| format!("Failed to fetch sheet: {}", url))?
                .error_for_status()
                .context("Sheet is not accessible; check that it is shared for link viewing")?
                .text()
                .await?;
            parse_csv(&content)?
        }
    };

    debug!("Read {} data rows from {:?}", rows.len(), source);
    Ok(rows)
}

fn read_workbook(path: &Path, sheet_name: &str) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheets = workbook.sheet_names().to_owned();
    let name = if sheet_name.is_empty() {
        sheets
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("Workbook contains no sheets"))?
    } else if sheets.iter().any(|s| s == sheet_name) {
        sheet_name.to_string()
    } else {
        return Err(anyhow!(
            "Sheet \"{}\" not found (available: {})",
            sheet_name,
            sheets.join(", ")
        ));
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| anyhow!("Error reading sheet '{}': {}", name, e))?;

    Ok(range
        .rows()
        .skip(1)
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect())
}

/// Parse CSV content, dropping the header row
pub fn parse_csv(content: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV at data row {}", index + 1))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(rows)
}
