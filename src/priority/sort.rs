use crate::dates;
use crate::models::{Lead, LeadStatus};
use super::scoring::LeadScore;
use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Ordering applied to a lead list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Stage + tags + urgency
    #[default]
    Priority,
    Stage,
    Urgency,
    Tags,
    Newest,
    Oldest,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Stage => "stage",
            Self::Urgency => "urgency",
            Self::Tags => "tags",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "priority" => Self::Priority,
            "stage" => Self::Stage,
            "urgency" | "action" => Self::Urgency,
            "tags" | "tag" => Self::Tags,
            "newest" => Self::Newest,
            "oldest" => Self::Oldest,
            other => bail!(
                "unknown sort mode '{}' (expected priority, stage, urgency, tags, newest or oldest)",
                other
            ),
        })
    }
}

/// A lead together with the score that placed it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedLead {
    pub score: LeadScore,
    pub total: u32,
    pub lead: Lead,
}

/// One kanban column
#[derive(Debug, Clone, Serialize)]
pub struct StageColumn {
    pub status: LeadStatus,
    pub leads: Vec<RankedLead>,
}

struct SortKey {
    score: LeadScore,
    // Missing or unparseable creation dates sort as the oldest possible.
    created: Option<DateTime<Utc>>,
    due: Option<DateTime<Utc>>,
}

impl SortKey {
    fn of(lead: &Lead, now: DateTime<Utc>) -> Self {
        Self {
            score: LeadScore::of(lead, now),
            created: lead.created_at_instant(),
            due: dates::parse_opt(lead.next_follow_up_date.as_deref()),
        }
    }
}

fn newest_first(a: &SortKey, b: &SortKey) -> Ordering {
    b.created.cmp(&a.created)
}

// Dated follow-ups first, earliest first.
fn earliest_due_first(a: &SortKey, b: &SortKey) -> Ordering {
    match (a.due, b.due) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(mode: SortMode, a: &SortKey, b: &SortKey) -> Ordering {
    match mode {
        SortMode::Priority => b
            .score
            .total()
            .cmp(&a.score.total())
            .then_with(|| newest_first(a, b)),
        SortMode::Stage => b.score.stage.cmp(&a.score.stage).then_with(|| newest_first(a, b)),
        SortMode::Urgency => b
            .score
            .urgency
            .cmp(&a.score.urgency)
            .then_with(|| earliest_due_first(a, b))
            .then_with(|| newest_first(a, b)),
        SortMode::Tags => b.score.tags.cmp(&a.score.tags).then_with(|| newest_first(a, b)),
        SortMode::Newest => newest_first(a, b),
        SortMode::Oldest => a.created.cmp(&b.created),
    }
}

/// Order leads by `mode`, keeping each lead's score.
///
/// The sort is stable: leads that compare equal keep their input order.
pub fn rank(leads: &[Lead], mode: SortMode, now: DateTime<Utc>) -> Vec<RankedLead> {
    let mut keyed: Vec<(SortKey, &Lead)> = leads
        .iter()
        .map(|lead| (SortKey::of(lead, now), lead))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare(mode, a, b));

    keyed
        .into_iter()
        .map(|(key, lead)| RankedLead {
            score: key.score,
            total: key.score.total(),
            lead: lead.clone(),
        })
        .collect()
}

/// Order leads by `mode`. Returns a new list, the input is untouched.
pub fn score_and_sort(leads: &[Lead], mode: SortMode, now: DateTime<Utc>) -> Vec<Lead> {
    rank(leads, mode, now)
        .into_iter()
        .map(|ranked| ranked.lead)
        .collect()
}

/// Kanban view: one column per pipeline stage in funnel order, each sorted
/// by `mode`, followed by a column for every unrecognised status in order
/// of first appearance. Empty pipeline columns are kept.
pub fn group_by_stage(leads: &[Lead], mode: SortMode, now: DateTime<Utc>) -> Vec<StageColumn> {
    let mut columns: Vec<StageColumn> = LeadStatus::PIPELINE
        .iter()
        .map(|status| StageColumn {
            status: status.clone(),
            leads: Vec::new(),
        })
        .collect();

    for ranked in rank(leads, mode, now) {
        match columns.iter_mut().find(|c| c.status == ranked.lead.status) {
            Some(column) => column.leads.push(ranked),
            None => columns.push(StageColumn {
                status: ranked.lead.status.clone(),
                leads: vec![ranked],
            }),
        }
    }

    columns
}
