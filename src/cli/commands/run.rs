use anyhow::Result;
use colored::*;
use log::{error, info};
use std::path::Path;

use crate::account::select_account;
use crate::api::{ApiLogger, ClientManager, GoogleAdsClient, MonitoringConfig};
use crate::cli::app::RunArgs;
use crate::config::Config;
use crate::error::ProvisionError;
use crate::notify::{self, Notifier, WebhookNotifier};
use crate::provision::{CampaignProvisioner, ProvisionOutcome};
use crate::sheet::{self, SheetData};
use crate::ui;

use super::{print_report, print_violations};

/// Provision the configured campaign.
///
/// Returns `Ok(false)` when the run stopped on a provisioning error; the
/// error has been reported and, when enabled, notified.
pub async fn run_command(config_path: Option<&Path>, args: RunArgs) -> Result<bool> {
    info!("Executing run command");

    let config = Config::load(config_path)?;
    let webhook = WebhookNotifier::from_config(&config);
    let notifier = webhook.as_ref().map(|n| n as &dyn Notifier);

    if let Err(err) = config.validate() {
        return Ok(report_early_failure(err, &config, notifier).await);
    }

    println!("Reading {}...", config.sheet.source.bright_yellow());
    let data = match SheetData::load(&config.sheet).await {
        Ok(data) => data,
        Err(err) => return Ok(report_early_failure(err, &config, notifier).await),
    };
    println!("  Loaded {}", data.summary());

    if let Err(err) = sheet::validate(&data, &config.sheet.columns) {
        return Ok(report_early_failure(err, &config, notifier).await);
    }

    let (manager, client) = match connect(ClientManager::from_env()).await {
        Ok(connected) => connected,
        Err(err) => return Ok(report_early_failure(err, &config, notifier).await),
    };

    let account = match select_account(&client, &config.customer_id(), manager.login_customer_id()).await {
        Ok(account) => account,
        Err(err) => return Ok(report_early_failure(err, &config, notifier).await),
    };
    println!("  Account: {}", account.to_string().bright_yellow());
    println!();

    if !args.yes && !ui::confirm_campaign_creation(&config.campaign.name, &account.to_string())? {
        println!("{} Cancelled.", "❌".bright_red().bold());
        return Ok(true);
    }

    println!("Creating campaign {}...", config.campaign.name.bright_yellow().bold());
    let result = CampaignProvisioner::new(&client, account, &config).run(&data).await;

    match &result {
        Ok(outcome) => {
            print_report(outcome);
            println!();
            print_summary(outcome);
        }
        Err(aborted) => {
            print_report(&aborted.outcome);
            println!();
            println!("{} {}", "✗".bright_red().bold(), aborted.to_string().red());
            if aborted.outcome.budget_ref.is_some() {
                println!(
                    "  {}",
                    "Entities created before the failure were left in the account.".yellow()
                );
            }
        }
    }

    if let Some(notifier) = notifier {
        notify::notify_result(notifier, &result, &config).await;
    }

    Ok(result.is_ok())
}

fn print_summary(outcome: &ProvisionOutcome) {
    println!("{} Campaign created", "✓".bright_green().bold());
    println!("  Campaign:     {}", outcome.campaign_name.bright_yellow().bold());
    println!("  Ad group:     {}", outcome.ad_group_name);
    println!("  Keywords:     {}", outcome.keywords_accepted);
    if outcome.keywords_rejected > 0 {
        println!(
            "  {}",
            format!("{} keywords rejected by policy", outcome.keywords_rejected).yellow()
        );
    }
    println!("  Headlines:    {}", outcome.headlines);
    println!("  Descriptions: {}", outcome.descriptions);
    println!("  Callouts:     {}", outcome.callouts_linked);
    println!();
    println!(
        "{} The campaign is {}. Enable it manually after review.",
        "⚠️".bright_yellow().bold(),
        "PAUSED".bright_yellow().bold()
    );
}

/// Authenticate and build the API client.
///
/// Missing credentials and a refused token exchange are configuration
/// problems, reported like any other failure before provisioning.
async fn connect(
    manager: Result<ClientManager>,
) -> Result<(ClientManager, GoogleAdsClient), ProvisionError> {
    let to_configuration = |e: anyhow::Error| ProvisionError::Configuration(format!("{:#}", e));

    let mut manager = manager.map_err(to_configuration)?;
    manager.authenticate().await.map_err(to_configuration)?;
    let client = manager
        .get_client()
        .map_err(to_configuration)?
        .with_logger(ApiLogger::new(MonitoringConfig::default()));

    Ok((manager, client))
}

/// Report a failure that happened before anything was submitted
async fn report_early_failure(
    err: ProvisionError,
    config: &Config,
    notifier: Option<&dyn Notifier>,
) -> bool {
    error!("Run stopped before provisioning: {}", err);

    match &err {
        ProvisionError::Validation(violations) => print_violations(violations),
        other => println!("{} {}", "✗".bright_red().bold(), other.to_string().red()),
    }

    if let Some(notifier) = notifier {
        let notification = notify::format_failure(&err, None, config);
        notify::notify(notifier, &notification).await;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiCredentials, CredentialSet};
    use crate::notify::Notification;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        sent: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl Notifier for Recorder {
        async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn config() -> Config {
        Config::from_toml_str(
            r#"
            [account]
            customer_id = "123-456-7890"
            [sheet]
            source = "campaign.csv"
            [campaign]
            name = "SEA_Shoes"
            ad_group_name = "Running"
            final_url = "https://example.com"
            daily_budget = 200
            "#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_credentials_are_configuration_errors() {
        let err = connect(Err(anyhow::anyhow!("GOOGLE_ADS_DEVELOPER_TOKEN is not set")))
            .await
            .err()
            .unwrap();

        match err {
            ProvisionError::Configuration(message) => {
                assert!(message.contains("GOOGLE_ADS_DEVELOPER_TOKEN"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connect_with_access_token() {
        let manager = ClientManager::new(
            ApiCredentials {
                developer_token: "dev-token".to_string(),
                login_customer_id: Some("9998887777".to_string()),
                credentials: CredentialSet::AccessToken {
                    access_token: "token".to_string(),
                },
            },
            "http://127.0.0.1:9",
        );

        let (manager, _client) = connect(manager).await.unwrap();
        assert_eq!(manager.login_customer_id(), Some("9998887777"));
    }

    #[tokio::test]
    async fn test_credential_failure_is_notified() {
        let recorder = Recorder {
            sent: Mutex::new(Vec::new()),
        };
        let config = config();
        let err = connect(Err(anyhow::anyhow!("GOOGLE_ADS_REFRESH_TOKEN is not set")))
            .await
            .err()
            .unwrap();

        let succeeded = report_early_failure(err, &config, Some(&recorder)).await;

        assert!(!succeeded);
        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].subject.contains("SEA_Shoes"));
        assert!(sent[0].text.contains("GOOGLE_ADS_REFRESH_TOKEN"));
    }
}
