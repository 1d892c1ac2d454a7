//! Run notifications

use anyhow::Context;
use async_trait::async_trait;
use log::{info, warn};
use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::error::ProvisionError;
use crate::provision::{Aborted, ProvisionOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Posts `{"subject", "text"}` JSON to a webhook URL
pub struct WebhookNotifier {
    url: String,
    http_client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            url: url.into(),
            http_client,
        })
    }

    /// Notifier for the configured webhook, if one is set
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.notifications.enabled() {
            return None;
        }
        let url = config.notifications.webhook_url.as_deref()?.trim();
        match Self::new(url) {
            Ok(notifier) => Some(notifier),
            Err(e) => {
                warn!("Notifications disabled: {:#}", e);
                None
            }
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        self.http_client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .with_context(|| format!("Failed to reach webhook {}", self.url))?
            .error_for_status()
            .context("Webhook rejected the notification")?;
        Ok(())
    }
}

pub fn format_success(outcome: &ProvisionOutcome, config: &Config) -> Notification {
    let mut text = format!(
        "Campaign created successfully.\n\n\
         Account: {}\n\
         Campaign: {}\n\
         Ad group: {}\n\
         Keywords: {}\n\
         Headlines: {}\n\
         Descriptions: {}\n\
         Callouts: {}\n\n\
         Budget: {} per day\n\
         Location: {}\n\
         Language: {}\n",
        outcome.account,
        outcome.campaign_name,
        outcome.ad_group_name,
        outcome.keywords_accepted,
        outcome.headlines,
        outcome.descriptions,
        outcome.callouts_linked,
        outcome.daily_budget,
        config.campaign.location_id,
        config.campaign.language_id,
    );

    let warnings: Vec<String> = outcome.warnings().map(ToString::to_string).collect();
    if !warnings.is_empty() {
        text.push_str(&format!("\nWarnings ({}):\n", warnings.len()));
        for line in warnings {
            text.push_str(&format!("- {}\n", line));
        }
    }

    text.push_str("\nNOTE: the campaign was created PAUSED. Enable it manually after review.");

    Notification {
        subject: format!("Campaign created: {}", outcome.campaign_name),
        text,
    }
}

pub fn format_failure(error: &ProvisionError, outcome: Option<&ProvisionOutcome>, config: &Config) -> Notification {
    let mut text = format!(
        "Campaign creation failed.\n\n\
         Account: {}\n\
         Campaign: {}\n\
         Error: {} ({})\n",
        config.account.customer_id,
        config.campaign.name,
        error,
        error.kind(),
    );

    if let Some(outcome) = outcome {
        if let Some(step) = &outcome.failed_step {
            text.push_str(&format!("Failed step: {}\n", step));
        }
        if !outcome.report.is_empty() {
            text.push_str("\nReport:\n");
            for line in outcome.report_lines() {
                text.push_str(&format!("{}\n", line));
            }
        }
        if outcome.campaign_ref.is_some() || outcome.budget_ref.is_some() {
            text.push_str("\nEntities created before the failure were not removed.\n");
        }
    }

    Notification {
        subject: format!("Campaign creation failed: {}", config.campaign.name),
        text,
    }
}

/// Send a notification; failures are logged and never returned
pub async fn notify(notifier: &dyn Notifier, notification: &Notification) {
    match notifier.send(notification).await {
        Ok(()) => info!("Notification sent: {}", notification.subject),
        Err(e) => warn!("Failed to send notification '{}': {:#}", notification.subject, e),
    }
}

/// Notify about a finished run, success or abort
pub async fn notify_result(
    notifier: &dyn Notifier,
    result: &Result<ProvisionOutcome, Aborted>,
    config: &Config,
) {
    let notification = match result {
        Ok(outcome) => format_success(outcome, config),
        Err(aborted) => format_failure(&aborted.error, Some(&aborted.outcome), config),
    };
    notify(notifier, &notification).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountContext;
    use crate::api::OperationKind;
    use crate::provision::Classification;
    use std::sync::Mutex;

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

    struct Recorder {
        sent: Mutex<Vec<Notification>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for Recorder {
        async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("webhook down");
            }
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    #[test]
    fn test_success_message() {
        let config = config();
        let mut outcome =
            ProvisionOutcome::new(&AccountContext::new("1234567890", "Shop"), &config.campaign);
        outcome.headlines = 3;
        outcome.descriptions = 2;
        outcome.record("Phase 2", "Keyword: a", OperationKind::Keyword, Classification::Success);
        outcome.record(
            "Phase 2",
            "Keyword: b",
            OperationKind::Keyword,
            Classification::Warning("policy".into()),
        );

        let notification = format_success(&outcome, &config);
        assert_eq!(notification.subject, "Campaign created: SEA_Shoes");
        assert!(notification.text.contains("Account: Shop (123-456-7890)"));
        assert!(notification.text.contains("Keywords: 1"));
        assert!(notification.text.contains("Budget: 200 per day"));
        assert!(notification.text.contains("Keyword: b: WARN - policy"));
        assert!(notification.text.contains("PAUSED"));
    }

    #[test]
    fn test_failure_message_without_outcome() {
        let config = config();
        let error = ProvisionError::Validation(vec!["minimum 3 headlines required, found 2".into()]);

        let notification = format_failure(&error, None, &config);
        assert!(notification.text.contains("ValidationError"));
        assert!(notification.text.contains("minimum 3 headlines"));
    }

    #[tokio::test]
    async fn test_send_failure_is_swallowed() {
        let recorder = Recorder {
            sent: Mutex::new(Vec::new()),
            fail: true,
        };
        let notification = Notification {
            subject: "s".into(),
            text: "t".into(),
        };

        notify(&recorder, &notification).await;
        assert!(recorder.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_success() {
        let recorder = Recorder {
            sent: Mutex::new(Vec::new()),
            fail: false,
        };
        let notification = Notification {
            subject: "s".into(),
            text: "t".into(),
        };

        notify(&recorder, &notification).await;
        assert_eq!(recorder.sent.lock().unwrap().len(), 1);
    }
}
