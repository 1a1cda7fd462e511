//! Patient record model
//!
//! A loosely-typed view of the patient resources returned by the record
//! provider. Only the fields the anonymization pipeline touches are modeled
//! explicitly; everything else is carried opaquely in `extra` and passed
//! through unchanged. Identifying fields that must be dropped outright
//! (addresses, telecoms, contacts, photos, raw identifiers) are modeled so
//! they are captured on input and can be omitted on output.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A human name as it appears on an anonymized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HumanName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub family: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
}

/// One source or anonymized patient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// The resource identifier. Replaced by a salted pseudo-UUID during
    /// anonymization.
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<HumanName>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_boolean: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_date_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_birth_boolean: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_birth_integer: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub managing_organization: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_provider: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Value>,

    // Dropped entirely by anonymization: captured here so the input parses
    // and the anonymizer can leave them out of the output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telecom: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Value>,

    /// Non-PII fields not modeled above, passed through unchanged.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
