pub mod lenient;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Row shape of the hosted `leads` table.
///
/// Every column is optional. Deserialization goes through the [`lenient`]
/// helpers so any JSON object produces a record; normalization to the domain
/// shape happens in [`crate::mapper`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // Contact
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub tax_residence: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub language: Option<String>,

    // Classification
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub pipeline_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub assigned_to: Option<String>,

    // Search criteria
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub property_types: Option<Vec<String>>,
    /// Scalar in the current schema; legacy rows may hold an array
    #[serde(default)]
    pub bedrooms: Option<Value>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub bathrooms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub surface_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub budget_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub desired_location: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub views: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub property_reference: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub property_url: Option<String>,

    // Timeline
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub last_contacted_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub next_follow_up_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub purchase_timeframe: Option<String>,

    // Free text
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,

    /// Written through its own channel, never by the primary upsert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_history: Option<Value>,
}

impl LeadRecord {
    /// Build a record from an arbitrary JSON value. Never fails: a value that
    /// is not an object gives an empty record.
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }
}
