// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription offerings and entitlement state from the purchase provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A purchasable package inside an offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub identifier: String,
    pub platform_product_identifier: String,
}

/// A named set of packages presented together (e.g. "default").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    pub identifier: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub packages: Vec<Package>,
}

/// One granted entitlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    pub product_identifier: String,
    /// ISO 8601; `None` for lifetime purchases
    #[serde(default)]
    pub expires_date: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<String>,
}

impl Entitlement {
    /// Active when non-expiring or expiring after `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self.expires_date.as_deref() {
            None => true,
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|exp| exp.with_timezone(&Utc) > now)
                .unwrap_or(false),
        }
    }
}

/// Customer entitlement snapshot, keyed by the app user id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub original_app_user_id: String,
    #[serde(default)]
    pub entitlements: HashMap<String, Entitlement>,
}

/// Subscription details shown on the settings screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionInfo {
    pub product_identifier: String,
    pub expires_date: Option<String>,
    pub is_active: bool,
}

impl CustomerInfo {
    pub fn is_entitled(&self, entitlement_id: &str, now: DateTime<Utc>) -> bool {
        self.entitlements
            .get(entitlement_id)
            .is_some_and(|e| e.is_active(now))
    }

    pub fn subscription_info(
        &self,
        entitlement_id: &str,
        now: DateTime<Utc>,
    ) -> Option<SubscriptionInfo> {
        self.entitlements
            .get(entitlement_id)
            .map(|e| SubscriptionInfo {
                product_identifier: e.product_identifier.clone(),
                expires_date: e.expires_date.clone(),
                is_active: e.is_active(now),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(expires: Option<&str>) -> CustomerInfo {
        let mut entitlements = HashMap::new();
        entitlements.insert(
            "premium".to_string(),
            Entitlement {
                product_identifier: "premium_monthly".to_string(),
                expires_date: expires.map(String::from),
                purchase_date: None,
            },
        );
        CustomerInfo {
            original_app_user_id: "u1".to_string(),
            entitlements,
        }
    }

    #[test]
    fn test_entitlement_expiry() {
        let now = DateTime::parse_from_rfc3339("2024-06-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert!(info(Some("2024-06-30T00:00:00Z")).is_entitled("premium", now));
        assert!(!info(Some("2024-05-30T00:00:00Z")).is_entitled("premium", now));
        assert!(info(None).is_entitled("premium", now));
        assert!(!info(None).is_entitled("pro", now));
    }

    #[test]
    fn test_subscription_info() {
        let now = Utc::now();
        let sub = info(None).subscription_info("premium", now).unwrap();
        assert_eq!(sub.product_identifier, "premium_monthly");
        assert!(sub.is_active);
        assert!(info(None).subscription_info("pro", now).is_none());
    }
}
