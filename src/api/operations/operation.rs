//! Typed create operations for the Google Ads mutate endpoint

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::entity_ref::EntityRef;

/// Kind of entity an operation creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    CampaignBudget,
    Campaign,
    CampaignCriterion,
    AdGroup,
    Keyword,
    AdGroupAd,
    CalloutAsset,
    CampaignAsset,
}

impl OperationKind {
    /// Resource collection used in resource names
    pub fn collection(&self) -> &'static str {
        match self {
            Self::CampaignBudget => "campaignBudgets",
            Self::Campaign => "campaigns",
            Self::CampaignCriterion => "campaignCriteria",
            Self::AdGroup => "adGroups",
            Self::Keyword => "adGroupCriteria",
            Self::AdGroupAd => "adGroupAds",
            Self::CalloutAsset => "assets",
            Self::CampaignAsset => "campaignAssets",
        }
    }

    /// Key of the operation inside a `MutateOperation`
    pub fn operation_key(&self) -> &'static str {
        match self {
            Self::CampaignBudget => "campaignBudgetOperation",
            Self::Campaign => "campaignOperation",
            Self::CampaignCriterion => "campaignCriterionOperation",
            Self::AdGroup => "adGroupOperation",
            Self::Keyword => "adGroupCriterionOperation",
            Self::AdGroupAd => "adGroupAdOperation",
            Self::CalloutAsset => "assetOperation",
            Self::CampaignAsset => "campaignAssetOperation",
        }
    }

    /// Key of the result inside a `MutateOperationResponse`
    pub fn result_key(&self) -> &'static str {
        match self {
            Self::CampaignBudget => "campaignBudgetResult",
            Self::Campaign => "campaignResult",
            Self::CampaignCriterion => "campaignCriterionResult",
            Self::AdGroup => "adGroupResult",
            Self::Keyword => "adGroupCriterionResult",
            Self::AdGroupAd => "adGroupAdResult",
            Self::CalloutAsset => "assetResult",
            Self::CampaignAsset => "campaignAssetResult",
        }
    }

    /// GAQL resource name, used when looking an entity up by name
    pub fn gaql_resource(&self) -> &'static str {
        match self {
            Self::CampaignBudget => "campaign_budget",
            Self::Campaign => "campaign",
            Self::CampaignCriterion => "campaign_criterion",
            Self::AdGroup => "ad_group",
            Self::Keyword => "ad_group_criterion",
            Self::AdGroupAd => "ad_group_ad",
            Self::CalloutAsset => "asset",
            Self::CampaignAsset => "campaign_asset",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignBudget => "budget",
            Self::Campaign => "campaign",
            Self::CampaignCriterion => "campaign_criterion",
            Self::AdGroup => "ad_group",
            Self::Keyword => "keyword",
            Self::AdGroupAd => "ad",
            Self::CalloutAsset => "callout_asset",
            Self::CampaignAsset => "campaign_asset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityStatus {
    Enabled,
    Paused,
}

impl EntityStatus {
    pub fn as_api(&self) -> &'static str {
        match self {
            Self::Enabled => "ENABLED",
            Self::Paused => "PAUSED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

impl MatchType {
    pub fn as_api(&self) -> &'static str {
        match self {
            Self::Exact => "EXACT",
            Self::Phrase => "PHRASE",
            Self::Broad => "BROAD",
        }
    }
}

/// Campaign-level targeting criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Criterion {
    /// Geo target constant id (e.g. 2203 for Czechia)
    Location(u64),
    /// Language constant id (e.g. 1021 for Czech)
    Language(u64),
}

/// A single create operation against the mutate endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Daily campaign budget
    CampaignBudget {
        /// Provisional id of the budget
        id: EntityRef,
        name: String,
        /// Amount in micros of the account currency
        amount_micros: i64,
        /// Always "STANDARD" for budgets built here
        delivery_method: String,
        explicitly_shared: bool,
    },
    /// Search campaign with Maximize Clicks bidding
    Campaign {
        id: EntityRef,
        name: String,
        status: EntityStatus,
        budget: EntityRef,
    },
    /// Location or language targeting on a campaign
    CampaignCriterion {
        campaign: EntityRef,
        criterion: Criterion,
        negative: bool,
    },
    AdGroup {
        id: EntityRef,
        campaign: EntityRef,
        name: String,
        status: EntityStatus,
    },
    /// Keyword criterion on an ad group
    Keyword {
        ad_group: EntityRef,
        text: String,
        match_type: MatchType,
        status: EntityStatus,
    },
    /// Responsive search ad
    ResponsiveSearchAd {
        ad_group: EntityRef,
        final_urls: Vec<String>,
        headlines: Vec<String>,
        descriptions: Vec<String>,
        status: EntityStatus,
    },
    CalloutAsset {
        id: EntityRef,
        text: String,
    },
    /// Links a callout asset to a campaign
    CampaignAsset {
        campaign: EntityRef,
        asset: EntityRef,
    },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CampaignBudget { .. } => OperationKind::CampaignBudget,
            Self::Campaign { .. } => OperationKind::Campaign,
            Self::CampaignCriterion { .. } => OperationKind::CampaignCriterion,
            Self::AdGroup { .. } => OperationKind::AdGroup,
            Self::Keyword { .. } => OperationKind::Keyword,
            Self::ResponsiveSearchAd { .. } => OperationKind::AdGroupAd,
            Self::CalloutAsset { .. } => OperationKind::CalloutAsset,
            Self::CampaignAsset { .. } => OperationKind::CampaignAsset,
        }
    }

    /// The id this operation assigns to the entity it creates, if other
    /// operations can reference it
    pub fn created_ref(&self) -> Option<EntityRef> {
        match self {
            Self::CampaignBudget { id, .. }
            | Self::Campaign { id, .. }
            | Self::AdGroup { id, .. }
            | Self::CalloutAsset { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Entities this operation points at
    pub fn references(&self) -> Vec<EntityRef> {
        match self {
            Self::CampaignBudget { .. } | Self::CalloutAsset { .. } => Vec::new(),
            Self::Campaign { budget, .. } => vec![*budget],
            Self::CampaignCriterion { campaign, .. } | Self::AdGroup { campaign, .. } => {
                vec![*campaign]
            }
            Self::Keyword { ad_group, .. } | Self::ResponsiveSearchAd { ad_group, .. } => {
                vec![*ad_group]
            }
            Self::CampaignAsset { campaign, asset } => vec![*campaign, *asset],
        }
    }

    /// Replace every reference to `from` with `to`
    pub fn rebind(mut self, from: EntityRef, to: EntityRef) -> Self {
        let swap = |r: &mut EntityRef| {
            if *r == from {
                *r = to;
            }
        };

        match &mut self {
            Self::CampaignBudget { .. } | Self::CalloutAsset { .. } => {}
            Self::Campaign { budget, .. } => swap(budget),
            Self::CampaignCriterion { campaign, .. } | Self::AdGroup { campaign, .. } => {
                swap(campaign)
            }
            Self::Keyword { ad_group, .. } | Self::ResponsiveSearchAd { ad_group, .. } => {
                swap(ad_group)
            }
            Self::CampaignAsset { campaign, asset } => {
                swap(campaign);
                swap(asset);
            }
        }

        self
    }

    /// Render as a `MutateOperation` JSON object for the given customer
    pub fn to_mutate_operation(&self, customer_id: &str) -> Value {
        let create = match self {
            Self::CampaignBudget {
                id,
                name,
                amount_micros,
                delivery_method,
                explicitly_shared,
            } => json!({
                "resourceName": id.resource_name(customer_id, "campaignBudgets"),
                "name": name,
                "amountMicros": amount_micros.to_string(),
                "deliveryMethod": delivery_method,
                "explicitlyShared": explicitly_shared,
            }),
            Self::Campaign {
                id,
                name,
                status,
                budget,
            } => json!({
                "resourceName": id.resource_name(customer_id, "campaigns"),
                "name": name,
                "status": status.as_api(),
                "advertisingChannelType": "SEARCH",
                "campaignBudget": budget.resource_name(customer_id, "campaignBudgets"),
                "targetSpend": {},
                "networkSettings": {
                    "targetGoogleSearch": true,
                    "targetSearchNetwork": false,
                    "targetContentNetwork": false,
                    "targetPartnerSearchNetwork": false,
                },
                "geoTargetTypeSetting": {
                    "positiveGeoTargetType": "PRESENCE",
                    "negativeGeoTargetType": "PRESENCE_OR_INTEREST",
                },
            }),
            Self::CampaignCriterion {
                campaign,
                criterion,
                negative,
            } => {
                let mut body = json!({
                    "campaign": campaign.resource_name(customer_id, "campaigns"),
                    "negative": negative,
                });
                match criterion {
                    Criterion::Location(id) => {
                        body["location"] =
                            json!({ "geoTargetConstant": format!("geoTargetConstants/{}", id) });
                    }
                    Criterion::Language(id) => {
                        body["language"] =
                            json!({ "languageConstant": format!("languageConstants/{}", id) });
                    }
                }
                body
            }
            Self::AdGroup {
                id,
                campaign,
                name,
                status,
            } => json!({
                "resourceName": id.resource_name(customer_id, "adGroups"),
                "campaign": campaign.resource_name(customer_id, "campaigns"),
                "name": name,
                "status": status.as_api(),
                "type": "SEARCH_STANDARD",
            }),
            Self::Keyword {
                ad_group,
                text,
                match_type,
                status,
            } => json!({
                "adGroup": ad_group.resource_name(customer_id, "adGroups"),
                "status": status.as_api(),
                "keyword": {
                    "text": text,
                    "matchType": match_type.as_api(),
                },
            }),
            Self::ResponsiveSearchAd {
                ad_group,
                final_urls,
                headlines,
                descriptions,
                status,
            } => json!({
                "adGroup": ad_group.resource_name(customer_id, "adGroups"),
                "status": status.as_api(),
                "ad": {
                    "finalUrls": final_urls,
                    "responsiveSearchAd": {
                        "headlines": headlines.iter().map(|t| json!({ "text": t })).collect::<Vec<_>>(),
                        "descriptions": descriptions.iter().map(|t| json!({ "text": t })).collect::<Vec<_>>(),
                    },
                },
            }),
            Self::CalloutAsset { id, text } => json!({
                "resourceName": id.resource_name(customer_id, "assets"),
                "calloutAsset": { "calloutText": text },
            }),
            Self::CampaignAsset { campaign, asset } => json!({
                "campaign": campaign.resource_name(customer_id, "campaigns"),
                "asset": asset.resource_name(customer_id, "assets"),
                "fieldType": "CALLOUT",
            }),
        };

        let mut operation = Map::new();
        operation.insert(
            self.kind().operation_key().to_string(),
            json!({ "create": create }),
        );
        Value::Object(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_payload() {
        let op = Operation::Keyword {
            ad_group: EntityRef::Provisional(-3),
            text: "running shoes".to_string(),
            match_type: MatchType::Phrase,
            status: EntityStatus::Enabled,
        };

        let payload = op.to_mutate_operation("1234567890");
        let create = &payload["adGroupCriterionOperation"]["create"];
        assert_eq!(create["adGroup"], "customers/1234567890/adGroups/-3");
        assert_eq!(create["keyword"]["text"], "running shoes");
        assert_eq!(create["keyword"]["matchType"], "PHRASE");
    }

    #[test]
    fn test_budget_amount_is_string_micros() {
        let op = Operation::CampaignBudget {
            id: EntityRef::Provisional(-1),
            name: "Budget - SEA_Test".to_string(),
            amount_micros: 200_000_000,
            delivery_method: "STANDARD".to_string(),
            explicitly_shared: false,
        };

        let payload = op.to_mutate_operation("1");
        let create = &payload["campaignBudgetOperation"]["create"];
        assert_eq!(create["amountMicros"], "200000000");
        assert_eq!(create["explicitlyShared"], false);
        assert_eq!(create["resourceName"], "customers/1/campaignBudgets/-1");
    }

    #[test]
    fn test_criterion_payloads() {
        let campaign = EntityRef::Durable(55);
        let location = Operation::CampaignCriterion {
            campaign,
            criterion: Criterion::Location(2203),
            negative: false,
        }
        .to_mutate_operation("1");
        let language = Operation::CampaignCriterion {
            campaign,
            criterion: Criterion::Language(1021),
            negative: false,
        }
        .to_mutate_operation("1");

        assert_eq!(
            location["campaignCriterionOperation"]["create"]["location"]["geoTargetConstant"],
            "geoTargetConstants/2203"
        );
        assert_eq!(
            language["campaignCriterionOperation"]["create"]["language"]["languageConstant"],
            "languageConstants/1021"
        );
        assert_eq!(
            language["campaignCriterionOperation"]["create"]["campaign"],
            "customers/1/campaigns/55"
        );
    }

    #[test]
    fn test_rebind_replaces_only_matching_refs() {
        let op = Operation::CampaignAsset {
            campaign: EntityRef::Provisional(-2),
            asset: EntityRef::Provisional(-5),
        };

        let rebound = op.rebind(EntityRef::Provisional(-2), EntityRef::Durable(77));
        assert_eq!(
            rebound.references(),
            vec![EntityRef::Durable(77), EntityRef::Provisional(-5)]
        );
    }

    #[test]
    fn test_created_ref() {
        let asset = Operation::CalloutAsset {
            id: EntityRef::Provisional(-4),
            text: "Free shipping".to_string(),
        };
        assert_eq!(asset.created_ref(), Some(EntityRef::Provisional(-4)));

        let link = Operation::CampaignAsset {
            campaign: EntityRef::Durable(1),
            asset: EntityRef::Provisional(-4),
        };
        assert_eq!(link.created_ref(), None);
        assert_eq!(link.kind(), OperationKind::CampaignAsset);
    }
}
