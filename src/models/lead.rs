use crate::dates;
use super::action::{Action, ActionType};
use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Currency assumed when a lead carries none
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Bedroom multi-select value meaning "8 or more" (rental screens)
pub const BEDROOMS_OVERFLOW_EIGHT: u32 = 8;
/// Bedroom multi-select value meaning "10 or more" (purchase screens)
pub const BEDROOMS_OVERFLOW_TEN: u32 = 10;

/// Sales pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Visit,
    Offer,
    Deposit,
    /// Compromis signed
    Signed,
    Won,
    Lost,
    Other(String),
}

impl LeadStatus {
    /// Kanban column order
    pub const PIPELINE: [LeadStatus; 10] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Proposal,
        LeadStatus::Visit,
        LeadStatus::Offer,
        LeadStatus::Deposit,
        LeadStatus::Signed,
        LeadStatus::Won,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Qualified => "Qualified",
            Self::Proposal => "Proposal",
            Self::Visit => "Visit",
            Self::Offer => "Offer",
            Self::Deposit => "Deposit",
            Self::Signed => "Signed",
            Self::Won => "Gagné",
            Self::Lost => "Perdu",
            Self::Other(raw) => raw,
        }
    }

    /// Won or lost
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl From<String> for LeadStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "new" | "nouveau" => Self::New,
            "contacted" | "contacté" | "contacte" | "en contact" => Self::Contacted,
            "qualified" | "qualifié" | "qualifie" => Self::Qualified,
            "proposal" | "proposition" => Self::Proposal,
            "visit" | "visite" | "visit scheduled" | "visite programmée" => Self::Visit,
            "offer" | "offre" => Self::Offer,
            "deposit" | "dépôt" | "depot" | "acompte" => Self::Deposit,
            "signed" | "signé" | "signe" | "compromis" | "compromis signé" => Self::Signed,
            "won" | "gagné" | "gagne" => Self::Won,
            "lost" | "perdu" => Self::Lost,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for LeadStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<LeadStatus> for String {
    fn from(status: LeadStatus) -> Self {
        match status {
            LeadStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative label used for prioritization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tag {
    Vip,
    Hot,
    Serious,
    Cold,
    NoResponse,
    NoPhone,
    Fake,
    Other(String),
}

impl Tag {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Vip => "Vip",
            Self::Hot => "Hot",
            Self::Serious => "Serious",
            Self::Cold => "Cold",
            Self::NoResponse => "No response",
            Self::NoPhone => "No phone",
            Self::Fake => "Fake",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Tag {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "vip" => Self::Vip,
            "hot" | "chaud" => Self::Hot,
            "serious" | "sérieux" | "serieux" => Self::Serious,
            "cold" | "froid" => Self::Cold,
            "no response" | "noresponse" | "pas de réponse" | "ne répond pas" => Self::NoResponse,
            "no phone" | "nophone" | "pas de téléphone" | "sans téléphone" => Self::NoPhone,
            "fake" | "faux" => Self::Fake,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for Tag {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Which pipeline a lead is tracked in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineType {
    Purchase,
    Rental,
    Owners,
}

impl PipelineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Rental => "rental",
            Self::Owners => "owners",
        }
    }

    /// Lenient parse used on stored values; unknown text gives `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "purchase" | "achat" | "buy" => Some(Self::Purchase),
            "rental" | "location" | "rent" => Some(Self::Rental),
            "owners" | "owner" | "propriétaires" => Some(Self::Owners),
            _ => None,
        }
    }
}

impl FromStr for PipelineType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::parse(s) {
            Some(pipeline) => Ok(pipeline),
            None => bail!("unknown pipeline '{}' (expected purchase, rental or owners)", s),
        }
    }
}

/// Sales, rental or ownership prospect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Lead {
    pub id: String,

    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub nationality: String,
    pub tax_residence: String,
    pub country: String,
    pub language: String,

    pub status: LeadStatus,
    pub tags: Vec<Tag>,
    pub source: String,
    pub pipeline_type: Option<PipelineType>,
    pub assigned_to: Option<String>,

    /// Legacy single value, superseded by `property_types` when that is non-empty
    pub property_type: Option<String>,
    pub property_types: Vec<String>,
    /// Multi-select: any of these counts. The highest screen value
    /// ([`BEDROOMS_OVERFLOW_EIGHT`] or [`BEDROOMS_OVERFLOW_TEN`]) means "or more".
    pub bedrooms: Option<Vec<u32>>,
    pub bathrooms: Option<u32>,
    pub surface_min: Option<f64>,
    pub budget: Option<f64>,
    pub budget_min: Option<f64>,
    pub currency: String,
    pub desired_location: String,
    pub views: Vec<String>,
    pub amenities: Vec<String>,
    pub property_reference: Option<String>,
    pub property_url: Option<String>,

    pub created_at: String,
    pub last_contacted_at: Option<String>,
    pub next_follow_up_date: Option<String>,
    pub purchase_timeframe: String,

    pub message: String,
    pub notes: String,

    pub action_history: Vec<Action>,
}

impl Default for Lead {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
            nationality: String::new(),
            tax_residence: String::new(),
            country: String::new(),
            language: String::new(),
            status: LeadStatus::default(),
            tags: Vec::new(),
            source: String::new(),
            pipeline_type: None,
            assigned_to: None,
            property_type: None,
            property_types: Vec::new(),
            bedrooms: None,
            bathrooms: None,
            surface_min: None,
            budget: None,
            budget_min: None,
            currency: DEFAULT_CURRENCY.to_string(),
            desired_location: String::new(),
            views: Vec::new(),
            amenities: Vec::new(),
            property_reference: None,
            property_url: None,
            created_at: String::new(),
            last_contacted_at: None,
            next_follow_up_date: None,
            purchase_timeframe: String::new(),
            message: String::new(),
            notes: String::new(),
            action_history: Vec::new(),
        }
    }
}

impl Lead {
    /// Fresh lead with a random id, created at `now`
    pub fn new(name: impl Into<String>, pipeline_type: PipelineType, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            pipeline_type: Some(pipeline_type),
            created_at: dates::format_instant(now),
            ..Default::default()
        }
    }

    /// Property types the lead is searching for, multi-value first
    pub fn wanted_property_types(&self) -> Vec<&str> {
        if !self.property_types.is_empty() {
            return self.property_types.iter().map(String::as_str).collect();
        }
        self.property_type.as_deref().into_iter().collect()
    }

    pub fn in_pipeline(&self, pipeline: PipelineType) -> bool {
        self.pipeline_type == Some(pipeline)
    }

    /// Whether a property with `count` bedrooms fits the lead's selection.
    /// `overflow` is the screen's "or more" value. No selection matches anything.
    pub fn accepts_bedrooms(&self, count: u32, overflow: u32) -> bool {
        match &self.bedrooms {
            None => true,
            Some(selected) if selected.is_empty() => true,
            Some(selected) => selected
                .iter()
                .any(|&b| b == count || (b >= overflow && count >= overflow)),
        }
    }

    pub fn created_at_instant(&self) -> Option<DateTime<Utc>> {
        dates::parse_instant(&self.created_at)
    }

    pub fn pending_actions(&self) -> impl Iterator<Item = &Action> {
        self.action_history.iter().filter(|a| a.is_pending())
    }

    /// Append a pending action and return its id.
    ///
    /// Logging an action counts as contact: `last_contacted_at` moves to
    /// `now` and the next follow-up date is recomputed.
    pub fn add_action(
        &mut self,
        action_type: ActionType,
        scheduled_date: Option<String>,
        notes: impl Into<String>,
        now: DateTime<Utc>,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        self.action_history.push(Action {
            id: id.clone(),
            action_type,
            scheduled_date,
            completed_date: None,
            notes: notes.into(),
            created_at: dates::format_instant(now),
        });
        self.last_contacted_at = Some(dates::format_instant(now));
        self.refresh_next_follow_up();
        id
    }

    /// Change the date and notes of an existing action
    pub fn edit_action(&mut self, id: &str, scheduled_date: Option<String>, notes: impl Into<String>) -> bool {
        let Some(action) = self.action_history.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        action.scheduled_date = scheduled_date;
        action.notes = notes.into();
        self.refresh_next_follow_up();
        true
    }

    pub fn complete_action(&mut self, id: &str, completed_at: DateTime<Utc>) -> bool {
        let Some(action) = self.action_history.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        action.completed_date = Some(dates::format_instant(completed_at));
        self.refresh_next_follow_up();
        true
    }

    pub fn remove_action(&mut self, id: &str) -> bool {
        let before = self.action_history.len();
        self.action_history.retain(|a| a.id != id);
        if self.action_history.len() == before {
            return false;
        }
        self.refresh_next_follow_up();
        true
    }

    // Earliest parseable scheduled date among pending actions.
    fn refresh_next_follow_up(&mut self) {
        self.next_follow_up_date = self
            .pending_actions()
            .filter_map(|a| a.scheduled_at().map(|at| (at, a.scheduled_date.clone())))
            .min_by_key(|(at, _)| *at)
            .and_then(|(_, raw)| raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_status_aliases_and_display() {
        assert_eq!(LeadStatus::from("Perdu"), LeadStatus::Lost);
        assert_eq!(LeadStatus::from("won"), LeadStatus::Won);
        assert_eq!(LeadStatus::from("Compromis signé"), LeadStatus::Signed);
        assert_eq!(LeadStatus::from(" deposit "), LeadStatus::Deposit);
        assert_eq!(
            LeadStatus::from("Archived"),
            LeadStatus::Other("Archived".to_string())
        );
        assert_eq!(LeadStatus::Won.to_string(), "Gagné");
        assert!(LeadStatus::Lost.is_closed());
        assert!(!LeadStatus::Deposit.is_closed());
    }

    #[test]
    fn test_tag_aliases() {
        assert_eq!(Tag::from("VIP"), Tag::Vip);
        assert_eq!(Tag::from("no-response"), Tag::NoResponse);
        assert_eq!(Tag::from("Pas de téléphone"), Tag::NoPhone);
        assert_eq!(Tag::from("Investor"), Tag::Other("Investor".to_string()));
        assert_eq!(String::from(Tag::NoPhone), "No phone");
    }

    #[test]
    fn test_pipeline_parse() {
        assert_eq!("Rental".parse::<PipelineType>().unwrap(), PipelineType::Rental);
        assert_eq!(PipelineType::parse("achat"), Some(PipelineType::Purchase));
        assert!("lease".parse::<PipelineType>().is_err());
    }

    #[test]
    fn test_new_lead_has_identity_and_creation_time() {
        let lead = Lead::new("Camille Durand", PipelineType::Purchase, now());
        assert!(!lead.id.is_empty());
        assert_eq!(lead.created_at_instant(), Some(now()));
        assert_eq!(lead.currency, DEFAULT_CURRENCY);
        assert_eq!(lead.status, LeadStatus::New);
        assert!(lead.in_pipeline(PipelineType::Purchase));

        let other = Lead::new("Camille Durand", PipelineType::Purchase, now());
        assert_ne!(lead.id, other.id);
    }

    #[test]
    fn test_wanted_property_types_prefers_multi_value() {
        let mut lead = Lead {
            property_type: Some("Apartment".to_string()),
            ..Default::default()
        };
        assert_eq!(lead.wanted_property_types(), vec!["Apartment"]);

        lead.property_types = vec!["Villa".to_string(), "Penthouse".to_string()];
        assert_eq!(lead.wanted_property_types(), vec!["Villa", "Penthouse"]);
    }

    #[test]
    fn test_accepts_bedrooms_with_overflow() {
        let mut lead = Lead::default();
        assert!(lead.accepts_bedrooms(3, BEDROOMS_OVERFLOW_TEN));

        lead.bedrooms = Some(vec![3, BEDROOMS_OVERFLOW_TEN]);
        assert!(lead.accepts_bedrooms(3, BEDROOMS_OVERFLOW_TEN));
        assert!(!lead.accepts_bedrooms(4, BEDROOMS_OVERFLOW_TEN));
        assert!(lead.accepts_bedrooms(12, BEDROOMS_OVERFLOW_TEN));

        lead.bedrooms = Some(vec![BEDROOMS_OVERFLOW_EIGHT]);
        assert!(lead.accepts_bedrooms(9, BEDROOMS_OVERFLOW_EIGHT));
        assert!(!lead.accepts_bedrooms(7, BEDROOMS_OVERFLOW_EIGHT));
    }

    #[test]
    fn test_action_lifecycle_updates_follow_up() {
        let mut lead = Lead::new("Camille Durand", PipelineType::Purchase, now());

        let visit = lead.add_action(
            ActionType::Visit,
            Some("2026-10-25T14:00:00Z".to_string()),
            "Villa Cap Ferrat",
            now(),
        );
        let call = lead.add_action(ActionType::Call, Some("2026-10-21".to_string()), "", now());
        lead.add_action(ActionType::Email, None, "Brochure", now());

        assert_eq!(lead.action_history.len(), 3);
        assert_eq!(lead.action_history[0].id, visit);
        assert_eq!(lead.last_contacted_at.as_deref(), Some("2026-10-19T09:00:00.000Z"));
        assert_eq!(lead.next_follow_up_date.as_deref(), Some("2026-10-21"));

        assert!(lead.complete_action(&call, now()));
        assert!(lead.action_history[1].is_completed());
        assert_eq!(lead.next_follow_up_date.as_deref(), Some("2026-10-25T14:00:00Z"));

        assert!(lead.edit_action(&visit, Some("2026-10-23".to_string()), "Moved"));
        assert_eq!(lead.next_follow_up_date.as_deref(), Some("2026-10-23"));
        assert_eq!(lead.action_history[0].notes, "Moved");

        assert!(lead.remove_action(&visit));
        assert!(lead.next_follow_up_date.is_none());
        assert_eq!(lead.pending_actions().count(), 1);
    }

    #[test]
    fn test_action_mutations_on_unknown_id() {
        let mut lead = Lead::default();
        assert!(!lead.edit_action("missing", None, ""));
        assert!(!lead.complete_action("missing", now()));
        assert!(!lead.remove_action("missing"));
    }
}
