use crate::dates;
use crate::record::lenient;
use serde::{Deserialize, Serialize};

/// Kind of follow-up task scheduled against a lead
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    Call,
    Email,
    Whatsapp,
    Visit,
    Meeting,
    Proposal,
    FollowUp,
    Other(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Call => "call",
            Self::Email => "email",
            Self::Whatsapp => "whatsapp",
            Self::Visit => "visit",
            Self::Meeting => "meeting",
            Self::Proposal => "proposal",
            Self::FollowUp => "follow-up",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ActionType {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "call" | "appel" | "phone" => Self::Call,
            "email" | "mail" => Self::Email,
            "whatsapp" | "sms" => Self::Whatsapp,
            "visit" | "visite" => Self::Visit,
            "meeting" | "rdv" | "rendez-vous" => Self::Meeting,
            "proposal" | "proposition" => Self::Proposal,
            "follow-up" | "followup" | "relance" => Self::FollowUp,
            _ => Self::Other(raw),
        }
    }
}

impl From<ActionType> for String {
    fn from(action_type: ActionType) -> Self {
        match action_type {
            ActionType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// One scheduled or completed follow-up task.
///
/// `completed_date` is the only completion flag: an action with a non-empty
/// completed date is done, every other action is pending no matter where its
/// scheduled date falls. Stored inside the lead's `action_history` JSON
/// column, camelCase keys (snake_case keys from older rows are accepted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(
        alias = "action_type",
        alias = "type",
        default = "default_action_type",
        deserialize_with = "lenient_action_type"
    )]
    pub action_type: ActionType,
    #[serde(
        alias = "scheduled_date",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub scheduled_date: Option<String>,
    #[serde(
        alias = "completed_date",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub notes: String,
    #[serde(alias = "created_at", default, deserialize_with = "lenient::string")]
    pub created_at: String,
}

fn default_action_type() -> ActionType {
    ActionType::FollowUp
}

fn lenient_action_type<'de, D>(deserializer: D) -> Result<ActionType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(lenient::opt_string(deserializer)?
        .map(ActionType::from)
        .unwrap_or_else(default_action_type))
}

impl Action {
    pub fn is_completed(&self) -> bool {
        self.completed_date
            .as_deref()
            .map(|d| !d.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn is_pending(&self) -> bool {
        !self.is_completed()
    }

    /// Scheduled instant, if the stored value parses
    pub fn scheduled_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        dates::parse_opt(self.scheduled_date.as_deref())
    }

    /// Rebuild an action list from the raw `action_history` column.
    ///
    /// Anything that is not a JSON array gives an empty list, and array items
    /// that are not objects are skipped.
    pub fn list_from_value(value: Option<&serde_json::Value>) -> Vec<Action> {
        let Some(serde_json::Value::Array(items)) = value else {
            return Vec::new();
        };

        items
            .iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect()
    }
}
