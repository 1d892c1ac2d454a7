//! Builds the labeled operation lists for both provisioning phases

use crate::api::{
    Criterion, EntityRef, EntityStatus, MatchType, Operation, Operations, ProvisionalTokens,
};
use crate::config::CampaignConfig;
use crate::sheet::SheetData;

/// Turns campaign settings and sheet data into create operations.
///
/// Pure: no validation and no I/O. Provisional ids come from the run-wide
/// [`ProvisionalTokens`] allocator so none is ever reused.
pub struct OperationBuilder<'a> {
    campaign: &'a CampaignConfig,
}

impl<'a> OperationBuilder<'a> {
    pub fn new(campaign: &'a CampaignConfig) -> Self {
        Self { campaign }
    }

    /// Budget followed by the campaign that spends it.
    ///
    /// The campaign points at the budget's provisional id; rebind it to the
    /// durable id once the budget is committed.
    pub fn build_phase1(&self, tokens: &mut ProvisionalTokens) -> Operations {
        let budget_id = tokens.next();
        let campaign_id = tokens.next();
        let budget_name = self.campaign.budget_name();

        Operations::new()
            .add(
                format!("Budget: {}", budget_name),
                Operation::CampaignBudget {
                    id: budget_id,
                    name: budget_name,
                    amount_micros: self.campaign.daily_budget_micros(),
                    delivery_method: "STANDARD".to_string(),
                    explicitly_shared: false,
                },
            )
            .add(
                format!("Campaign: {}", self.campaign.name),
                Operation::Campaign {
                    id: campaign_id,
                    name: self.campaign.name.clone(),
                    status: EntityStatus::Paused,
                    budget: budget_id,
                },
            )
    }

    /// Targeting, ad group, keywords, ad and callouts for a committed campaign.
    ///
    /// Order: location, language, ad group, keywords, responsive search ad,
    /// callout assets, callout links.
    pub fn build_phase2(
        &self,
        campaign: EntityRef,
        ad_group: EntityRef,
        sheet: &SheetData,
        tokens: &mut ProvisionalTokens,
    ) -> Operations {
        let mut operations = Operations::new()
            .add(
                format!("Location: {}", self.campaign.location_id),
                Operation::CampaignCriterion {
                    campaign,
                    criterion: Criterion::Location(self.campaign.location_id),
                    negative: false,
                },
            )
            .add(
                format!("Language: {}", self.campaign.language_id),
                Operation::CampaignCriterion {
                    campaign,
                    criterion: Criterion::Language(self.campaign.language_id),
                    negative: false,
                },
            )
            .add(
                format!("Ad group: {}", self.campaign.ad_group_name),
                Operation::AdGroup {
                    id: ad_group,
                    campaign,
                    name: self.campaign.ad_group_name.clone(),
                    status: EntityStatus::Enabled,
                },
            );

        for keyword in &sheet.keywords {
            operations.push(
                format!("Keyword: {}", keyword),
                Operation::Keyword {
                    ad_group,
                    text: keyword.clone(),
                    match_type: MatchType::Phrase,
                    status: EntityStatus::Enabled,
                },
            );
        }

        operations.push(
            format!(
                "Ad: responsive search ad ({} headlines, {} descriptions)",
                sheet.headlines.len(),
                sheet.descriptions.len()
            ),
            Operation::ResponsiveSearchAd {
                ad_group,
                final_urls: vec![self.campaign.final_url.clone()],
                headlines: sheet.headlines.clone(),
                descriptions: sheet.descriptions.clone(),
                status: EntityStatus::Enabled,
            },
        );

        let assets: Vec<(EntityRef, &String)> = sheet
            .callouts
            .iter()
            .map(|text| (tokens.next(), text))
            .collect();

        for (asset, text) in &assets {
            operations.push(
                format!("Callout asset: {}", text),
                Operation::CalloutAsset {
                    id: *asset,
                    text: (*text).clone(),
                },
            );
        }

        for (asset, text) in &assets {
            operations.push(
                format!("Callout link: {}", text),
                Operation::CampaignAsset {
                    campaign,
                    asset: *asset,
                },
            );
        }

        operations
    }
}
