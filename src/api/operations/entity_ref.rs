//! Provisional and durable entity identities
//!
//! Inside one mutate request the API resolves negative ids in resource names
//! against entities created earlier in the same request. Once a request has
//! committed, other requests must use the positive id the server assigned.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a single logical entity in the remote account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    /// Batch-local placeholder, always negative
    Provisional(i64),
    /// Server-assigned id, always positive
    Durable(i64),
}

impl EntityRef {
    /// Raw id as it appears in a resource name
    pub fn id(&self) -> i64 {
        match self {
            Self::Provisional(id) | Self::Durable(id) => *id,
        }
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, Self::Provisional(_))
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, Self::Durable(_))
    }

    /// Build `customers/{customer}/{collection}/{id}`
    pub fn resource_name(&self, customer_id: &str, collection: &str) -> String {
        format!("customers/{}/{}/{}", customer_id, collection, self.id())
    }

    /// Parse the trailing id of a resource name such as `customers/1/campaigns/42`.
    ///
    /// Negative ids come back as provisional, positive ones as durable. Composite
    /// ids (`customers/1/adGroupCriteria/5~7`) are not entity refs and yield `None`.
    pub fn from_resource_name(resource_name: &str) -> Option<Self> {
        let mut parts = resource_name.split('/');
        if parts.next()? != "customers" {
            return None;
        }
        parts.next()?;
        parts.next()?;
        let id: i64 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }

        match id {
            id if id < 0 => Some(Self::Provisional(id)),
            id if id > 0 => Some(Self::Durable(id)),
            _ => None,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provisional(id) => write!(f, "provisional({})", id),
            Self::Durable(id) => write!(f, "{}", id),
        }
    }
}

/// Hands out provisional tokens for one provisioning run.
///
/// Tokens count down from -1 and are never handed out twice, so a token can
/// never leak from one submission into another.
#[derive(Debug)]
pub struct ProvisionalTokens {
    next: i64,
}

impl ProvisionalTokens {
    pub fn new() -> Self {
        Self { next: -1 }
    }

    pub fn next(&mut self) -> EntityRef {
        let token = EntityRef::Provisional(self.next);
        self.next -= 1;
        token
    }

    /// Number of tokens issued so far
    pub fn issued(&self) -> usize {
        (-1 - self.next) as usize
    }
}

impl Default for ProvisionalTokens {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_count_down_and_never_repeat() {
        let mut tokens = ProvisionalTokens::new();
        let issued: Vec<EntityRef> = (0..4).map(|_| tokens.next()).collect();

        assert_eq!(
            issued,
            vec![
                EntityRef::Provisional(-1),
                EntityRef::Provisional(-2),
                EntityRef::Provisional(-3),
                EntityRef::Provisional(-4),
            ]
        );
        assert_eq!(tokens.issued(), 4);
    }

    #[test]
    fn test_resource_name_format() {
        let budget = EntityRef::Provisional(-1);
        assert_eq!(
            budget.resource_name("1234567890", "campaignBudgets"),
            "customers/1234567890/campaignBudgets/-1"
        );

        let campaign = EntityRef::Durable(987);
        assert_eq!(
            campaign.resource_name("1234567890", "campaigns"),
            "customers/1234567890/campaigns/987"
        );
    }

    #[test]
    fn test_from_resource_name() {
        assert_eq!(
            EntityRef::from_resource_name("customers/1/campaigns/42"),
            Some(EntityRef::Durable(42))
        );
        assert_eq!(
            EntityRef::from_resource_name("customers/1/assets/-7"),
            Some(EntityRef::Provisional(-7))
        );
        assert_eq!(EntityRef::from_resource_name("customers/1/adGroupCriteria/5~7"), None);
        assert_eq!(EntityRef::from_resource_name("geoTargetConstants/2203"), None);
        assert_eq!(EntityRef::from_resource_name("customers/1/campaigns/42/extra"), None);
    }
}
