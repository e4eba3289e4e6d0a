// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outbound data aggregates handed to the native SDK.
//
// Each aggregate documents which members are required. Required members that
// the host may legitimately fail to supply are `Option`s so that "missing" is
// representable; `missing_fields` reports them and the dispatch facade refuses
// to forward an incomplete aggregate.

use serde::{Deserialize, Serialize};

/// A key/value pair attached to a tracked package.
pub type Parameter = (String, String);

/// A custom event defined in the attribution dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Required. Token of the event as configured in the dashboard.
    pub event_token: String,
    pub revenue: Option<f64>,
    pub currency: Option<String>,
    /// Used for revenue deduplication.
    pub transaction_id: Option<String>,
    /// Echoed back in the event success/failure payloads.
    pub callback_id: Option<String>,
    /// iOS only, forwarded as-is elsewhere.
    pub product_id: Option<String>,
    pub receipt: Option<String>,
    /// Android only.
    pub purchase_token: Option<String>,
    pub callback_parameters: Vec<Parameter>,
    pub partner_parameters: Vec<Parameter>,
}

impl Event {
    pub fn new(event_token: impl Into<String>) -> Self {
        Self {
            event_token: event_token.into(),
            ..Default::default()
        }
    }

    pub fn set_revenue(&mut self, amount: f64, currency: impl Into<String>) {
        self.revenue = Some(amount);
        self.currency = Some(currency.into());
    }

    pub fn add_callback_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.callback_parameters.push((key.into(), value.into()));
    }

    pub fn add_partner_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.partner_parameters.push((key.into(), value.into()));
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.event_token.trim().is_empty() {
            missing.push("eventToken");
        }
        if self.revenue.is_some() && self.currency.as_deref().is_none_or(str::is_empty) {
            missing.push("currency");
        }
        missing
    }
}

/// Revenue earned from showing an ad, reported by a mediation source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdRevenue {
    /// Required. Mediation source identifier, e.g. `applovin_max_sdk`.
    pub source: String,
    pub revenue: Option<f64>,
    pub currency: Option<String>,
    pub ad_impressions_count: Option<u32>,
    pub ad_revenue_network: Option<String>,
    pub ad_revenue_unit: Option<String>,
    pub ad_revenue_placement: Option<String>,
    pub callback_parameters: Vec<Parameter>,
    pub partner_parameters: Vec<Parameter>,
}

impl AdRevenue {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn set_revenue(&mut self, amount: f64, currency: impl Into<String>) {
        self.revenue = Some(amount);
        self.currency = Some(currency.into());
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        if self.source.trim().is_empty() {
            vec!["source"]
        } else {
            Vec::new()
        }
    }
}

/// An auto-renewable App Store subscription purchase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStoreSubscription {
    /// Required. Price as a decimal string, e.g. `"9.99"`.
    pub price: Option<String>,
    /// Required.
    pub currency: Option<String>,
    /// Required.
    pub transaction_id: Option<String>,
    /// Required. Base64 receipt.
    pub receipt: Option<String>,
    /// Milliseconds since the epoch, as a string.
    pub transaction_date: Option<String>,
    pub sales_region: Option<String>,
    pub callback_parameters: Vec<Parameter>,
    pub partner_parameters: Vec<Parameter>,
}

impl AppStoreSubscription {
    pub fn new(
        price: impl Into<String>,
        currency: impl Into<String>,
        transaction_id: impl Into<String>,
        receipt: impl Into<String>,
    ) -> Self {
        Self {
            price: Some(price.into()),
            currency: Some(currency.into()),
            transaction_id: Some(transaction_id.into()),
            receipt: Some(receipt.into()),
            ..Default::default()
        }
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        collect_missing(&[
            ("price", &self.price),
            ("currency", &self.currency),
            ("transactionId", &self.transaction_id),
            ("receipt", &self.receipt),
        ])
    }
}

/// A Google Play subscription purchase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayStoreSubscription {
    /// Required. Price in micros, as a string.
    pub price: Option<String>,
    pub currency: Option<String>,
    pub sku: Option<String>,
    pub order_id: Option<String>,
    pub signature: Option<String>,
    pub purchase_token: Option<String>,
    /// Milliseconds since the epoch, as a string.
    pub purchase_time: Option<String>,
    pub callback_parameters: Vec<Parameter>,
    pub partner_parameters: Vec<Parameter>,
}

impl PlayStoreSubscription {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        collect_missing(&[
            ("price", &self.price),
            ("currency", &self.currency),
            ("sku", &self.sku),
            ("orderId", &self.order_id),
            ("signature", &self.signature),
            ("purchaseToken", &self.purchase_token),
        ])
    }
}

/// Third-party data sharing preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPartySharing {
    /// `None` leaves the global sharing state untouched and only sends the
    /// granular options.
    pub is_enabled: Option<bool>,
    /// `(partner, key, value)` triples.
    pub granular_options: Vec<(String, String, String)>,
    /// `(partner, key, enabled)` triples.
    pub partner_sharing_settings: Vec<(String, String, bool)>,
}

impl ThirdPartySharing {
    pub fn new(is_enabled: Option<bool>) -> Self {
        Self {
            is_enabled,
            ..Default::default()
        }
    }

    pub fn add_granular_option(
        &mut self,
        partner: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.granular_options
            .push((partner.into(), key.into(), value.into()));
    }

    pub fn add_partner_sharing_setting(
        &mut self,
        partner: impl Into<String>,
        key: impl Into<String>,
        enabled: bool,
    ) {
        self.partner_sharing_settings
            .push((partner.into(), key.into(), enabled));
    }
}

/// An App Store purchase to be verified server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStorePurchase {
    pub transaction_id: Option<String>,
    pub product_id: Option<String>,
    pub receipt: Option<String>,
}

impl AppStorePurchase {
    pub fn new(
        transaction_id: impl Into<String>,
        product_id: impl Into<String>,
        receipt: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: Some(transaction_id.into()),
            product_id: Some(product_id.into()),
            receipt: Some(receipt.into()),
        }
    }

    /// All three members are required.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        collect_missing(&[
            ("transactionId", &self.transaction_id),
            ("productId", &self.product_id),
            ("receipt", &self.receipt),
        ])
    }
}

/// A Google Play purchase to be verified server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayStorePurchase {
    pub product_id: Option<String>,
    pub purchase_token: Option<String>,
}

impl PlayStorePurchase {
    pub fn new(product_id: impl Into<String>, purchase_token: impl Into<String>) -> Self {
        Self {
            product_id: Some(product_id.into()),
            purchase_token: Some(purchase_token.into()),
        }
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        collect_missing(&[
            ("productId", &self.product_id),
            ("purchaseToken", &self.purchase_token),
        ])
    }
}

fn collect_missing(fields: &[(&'static str, &Option<String>)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_requires_token() {
        assert_eq!(Event::new("  ").missing_fields(), vec!["eventToken"]);
        assert!(Event::new("abc123").missing_fields().is_empty());
    }

    #[test]
    fn event_revenue_needs_currency() {
        let mut event = Event::new("abc123");
        event.revenue = Some(0.99);
        assert_eq!(event.missing_fields(), vec!["currency"]);

        event.set_revenue(0.99, "EUR");
        assert!(event.missing_fields().is_empty());
    }

    #[test]
    fn purchase_reports_every_missing_member() {
        let purchase = AppStorePurchase {
            product_id: Some("gems_100".into()),
            ..Default::default()
        };
        assert_eq!(purchase.missing_fields(), vec!["transactionId", "receipt"]);

        let play = PlayStorePurchase::new("gems_100", "token");
        assert!(play.missing_fields().is_empty());
    }

    #[test]
    fn event_serializes_camel_case_with_parameter_pairs() {
        let mut event = Event::new("abc123");
        event.add_callback_parameter("level", "7");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["eventToken"], "abc123");
        assert_eq!(json["callbackParameters"][0][0], "level");
        assert_eq!(json["callbackParameters"][0][1], "7");
    }
}
