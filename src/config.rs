use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::constants::normalize_customer_id;
use crate::error::ProvisionError;

/// Immutable run configuration, loaded once and passed into the provisioner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub account: AccountConfig,
    pub sheet: SheetConfig,
    pub campaign: CampaignConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Client account id, with or without dashes
    pub customer_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Local .xlsx/.xls/.ods/.csv path or a Google Sheets URL
    pub source: String,
    /// Worksheet to read; first sheet when empty
    #[serde(default)]
    pub sheet_name: String,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub limits: LimitConfig,
}

/// Zero-based column indexes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_keywords_column")]
    pub keywords: usize,
    #[serde(default = "default_headlines_column")]
    pub headlines: usize,
    #[serde(default = "default_descriptions_column")]
    pub descriptions: usize,
    #[serde(default = "default_callouts_column")]
    pub callouts: usize,
}

fn default_keywords_column() -> usize {
    0
}

fn default_headlines_column() -> usize {
    1
}

fn default_descriptions_column() -> usize {
    3
}

fn default_callouts_column() -> usize {
    5
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords_column(),
            headlines: default_headlines_column(),
            descriptions: default_descriptions_column(),
            callouts: default_callouts_column(),
        }
    }
}

/// Maximum number of values read from each column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
    #[serde(default = "default_max_headlines")]
    pub max_headlines: usize,
    #[serde(default = "default_max_descriptions")]
    pub max_descriptions: usize,
    #[serde(default = "default_max_callouts")]
    pub max_callouts: usize,
}

fn default_max_keywords() -> usize {
    50
}

fn default_max_headlines() -> usize {
    15
}

fn default_max_descriptions() -> usize {
    4
}

fn default_max_callouts() -> usize {
    20
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_keywords: default_max_keywords(),
            max_headlines: default_max_headlines(),
            max_descriptions: default_max_descriptions(),
            max_callouts: default_max_callouts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Full campaign name as it will appear in the account
    pub name: String,
    pub ad_group_name: String,
    pub final_url: String,
    /// Daily budget in account currency units
    pub daily_budget: f64,
    /// Geo target constant, 2203 = Czech Republic
    #[serde(default = "default_location_id")]
    pub location_id: u64,
    /// Language constant, 1021 = Czech
    #[serde(default = "default_language_id")]
    pub language_id: u64,
}

fn default_location_id() -> u64 {
    2203
}

fn default_language_id() -> u64 {
    1021
}

impl CampaignConfig {
    pub fn budget_name(&self) -> String {
        format!("Budget - {}", self.name)
    }

    /// Daily budget in micros
    pub fn daily_budget_micros(&self) -> i64 {
        (self.daily_budget * 1_000_000.0).round() as i64
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Webhook receiving a JSON `{subject, text}` message; disabled when unset
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl NotificationConfig {
    pub fn enabled(&self) -> bool {
        self.webhook_url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

pub const CONFIG_TEMPLATE: &str = r#"[account]
# Client account id (dashes optional)
customer_id = "123-456-7890"

[sheet]
# Local .xlsx / .xls / .ods / .csv file, or a Google Sheets URL
source = "campaign.xlsx"
# Leave empty for the first sheet
sheet_name = ""

[sheet.columns]
keywords = 0
headlines = 1
descriptions = 3
callouts = 5

[sheet.limits]
max_keywords = 50
max_headlines = 15
max_descriptions = 4
max_callouts = 20

[campaign]
name = "SEA_Campaign_Name"
ad_group_name = "AdGroupName"
final_url = "https://example.com"
daily_budget = 200
location_id = 2203
language_id = 1021

[notifications]
# webhook_url = "https://hooks.example.com/campaigns"
"#;

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("search-campaign-cli")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".search-campaign-cli")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the given path, or the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path()?,
        };
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found: {}. Run 'search-campaign-cli init' to create one.",
                config_path.display()
            );
        }

        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config = Self::from_toml_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!("Loaded config for campaign '{}'", config.campaign.name);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Write the commented template to `path`, refusing to overwrite
    pub fn write_template(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists: {}", path.display());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
                info!("Created config directory: {:?}", parent);
            }
        }

        fs::write(path, CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        info!("Config template written to {:?}", path);
        Ok(())
    }

    /// Customer id with dashes stripped
    pub fn customer_id(&self) -> String {
        normalize_customer_id(&self.account.customer_id)
    }

    /// Reject values that would only fail later against the API
    pub fn validate(&self) -> Result<(), ProvisionError> {
        let mut problems = Vec::new();

        let customer_id = self.customer_id();
        if customer_id.len() != 10 || !customer_id.chars().all(|c| c.is_ascii_digit()) {
            problems.push(format!(
                "account.customer_id '{}' must be a 10-digit id",
                self.account.customer_id
            ));
        }

        if self.sheet.source.trim().is_empty() {
            problems.push("sheet.source is empty".to_string());
        }

        if self.campaign.name.trim().is_empty() {
            problems.push("campaign.name is empty".to_string());
        }

        if self.campaign.ad_group_name.trim().is_empty() {
            problems.push("campaign.ad_group_name is empty".to_string());
        }

        let url = self.campaign.final_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            problems.push(format!(
                "campaign.final_url '{}' must start with http:// or https://",
                self.campaign.final_url
            ));
        }

        if !(self.campaign.daily_budget.is_finite() && self.campaign.daily_budget > 0.0) {
            problems.push("campaign.daily_budget must be greater than zero".to_string());
        }

        let limits = &self.sheet.limits;
        if limits.max_keywords == 0
            || limits.max_headlines == 0
            || limits.max_descriptions == 0
            || limits.max_callouts == 0
        {
            problems.push("sheet.limits must all be greater than zero".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ProvisionError::Configuration(problems.join("; ")))
        }
    }
}
