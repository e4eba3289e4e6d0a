// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed payloads delivered by the native SDK, and their decoders.
//
// Native layers hand results over as JSON text. They are not consistent about
// scalar encoding: booleans and numbers sometimes arrive as strings, and
// `jsonResponse` may be an object or an object serialized into a string. The
// decoders below accept every one of those shapes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{BridgeError, Result};

/// Attribution data for the current install.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attribution {
    pub tracker_token: Option<String>,
    pub tracker_name: Option<String>,
    pub network: Option<String>,
    pub campaign: Option<String>,
    pub adgroup: Option<String>,
    pub creative: Option<String>,
    pub click_label: Option<String>,
    pub adid: Option<String>,
    pub cost_type: Option<String>,
    #[serde(deserialize_with = "lenient::opt_float")]
    pub cost_amount: Option<f64>,
    pub cost_currency: Option<String>,
    /// Android only.
    pub fb_install_referrer: Option<String>,
}

/// A tracked event was accepted by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventSuccess {
    pub adid: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
    pub event_token: Option<String>,
    pub callback_id: Option<String>,
    #[serde(deserialize_with = "lenient::json_object")]
    pub json_response: Option<Map<String, Value>>,
}

/// A tracked event was rejected or could not be sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventFailure {
    pub adid: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
    pub event_token: Option<String>,
    pub callback_id: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub will_retry: bool,
    #[serde(deserialize_with = "lenient::json_object")]
    pub json_response: Option<Map<String, Value>>,
}

/// A session was accepted by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSuccess {
    pub adid: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
    #[serde(deserialize_with = "lenient::json_object")]
    pub json_response: Option<Map<String, Value>>,
}

/// A session was rejected or could not be sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionFailure {
    pub adid: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub will_retry: bool,
    #[serde(deserialize_with = "lenient::json_object")]
    pub json_response: Option<Map<String, Value>>,
}

/// SKAdNetwork 4 conversion value update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skad4ConversionUpdate {
    #[serde(deserialize_with = "lenient::int")]
    pub fine_value: i32,
    #[serde(default)]
    pub coarse_value: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub lock_window: bool,
}

/// Result of a server-side purchase verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurchaseVerificationInfo {
    #[serde(deserialize_with = "lenient::int")]
    pub code: i32,
    pub message: String,
    pub verification_status: String,
}

/// Decode a JSON object payload into `T`.
pub fn decode_json<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BridgeError::Decode("empty payload".into()));
    }
    serde_json::from_str(raw).map_err(|e| BridgeError::Decode(e.to_string()))
}

/// Decode a bare integer payload such as an authorization status.
pub fn decode_int(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|e| BridgeError::Decode(format!("expected integer, got {raw:?}: {e}")))
}

/// Decode a plain conversion value. `-1` is the native "no value" marker and
/// decodes to `None`.
pub fn decode_conversion_value(raw: &str) -> Result<Option<i32>> {
    let value = decode_int(raw)?;
    Ok((value != -1).then_some(value))
}

mod lenient {
    use super::*;

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
            Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
            _ => false,
        })
    }

    pub fn int<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<i32, D::Error> {
        let value = Value::deserialize(d)?;
        let parsed = match &value {
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| serde::de::Error::custom(format!("expected integer, got {value}")))
    }

    pub fn opt_float<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn json_object<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<Map<String, Value>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Object(map) => Some(map),
            Value::String(s) => match serde_json::from_str::<Value>(&s) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            },
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_success_keeps_known_fields() {
        let success: EventSuccess =
            decode_json(r#"{"callbackId":"abc","message":"ok"}"#).unwrap();
        assert_eq!(
            success,
            EventSuccess {
                callback_id: Some("abc".into()),
                message: Some("ok".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn will_retry_accepts_string_encoding() {
        let failure: EventFailure =
            decode_json(r#"{"eventToken":"t0k","willRetry":"true"}"#).unwrap();
        assert!(failure.will_retry);

        let failure: SessionFailure = decode_json(r#"{"willRetry":false}"#).unwrap();
        assert!(!failure.will_retry);
    }

    #[test]
    fn json_response_may_be_nested_string() {
        let success: SessionSuccess =
            decode_json(r#"{"jsonResponse":"{\"ask_in\":5000}"}"#).unwrap();
        let response = success.json_response.unwrap();
        assert_eq!(response["ask_in"], 5000);
    }

    #[test]
    fn attribution_cost_amount_from_string() {
        let attribution: Attribution =
            decode_json(r#"{"trackerName":"Organic","costAmount":"1.25"}"#).unwrap();
        assert_eq!(attribution.tracker_name.as_deref(), Some("Organic"));
        assert_eq!(attribution.cost_amount, Some(1.25));
    }

    #[test]
    fn skad4_update_decodes() {
        let update: Skad4ConversionUpdate =
            decode_json(r#"{"fineValue":"12","coarseValue":"high","lockWindow":"1"}"#).unwrap();
        assert_eq!(update.fine_value, 12);
        assert_eq!(update.coarse_value, "high");
        assert!(update.lock_window);
    }

    #[test]
    fn malformed_payloads_are_decode_errors() {
        assert!(matches!(
            decode_json::<EventSuccess>("{not json"),
            Err(BridgeError::Decode(_))
        ));
        assert!(matches!(decode_json::<Attribution>(""), Err(BridgeError::Decode(_))));
        assert!(matches!(
            decode_json::<Skad4ConversionUpdate>(r#"{"coarseValue":"low"}"#),
            Err(BridgeError::Decode(_))
        ));
        assert!(matches!(decode_int("three"), Err(BridgeError::Decode(_))));
    }

    #[test]
    fn conversion_value_minus_one_means_none() {
        assert_eq!(decode_conversion_value("-1").unwrap(), None);
        assert_eq!(decode_conversion_value(" 42 ").unwrap(), Some(42));
    }
}
