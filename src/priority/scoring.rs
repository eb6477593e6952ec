use crate::dates;
use crate::models::{Lead, LeadStatus, Tag};
use chrono::{DateTime, Days, Utc};
use serde::Serialize;

/// Weight of a status outside the known pipeline: above closed leads,
/// below fresh ones.
pub const UNKNOWN_STAGE_WEIGHT: u32 = 150;

/// Follow-ups due within this many days count as "this week"
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

/// Stage weights dominate the other two signals: a lead one band further
/// down the funnel outranks any tag plus urgency combination from a lower
/// band.
pub fn stage_weight(status: &LeadStatus) -> u32 {
    match status {
        LeadStatus::Deposit | LeadStatus::Signed => 500,
        LeadStatus::Visit | LeadStatus::Offer => 400,
        LeadStatus::Qualified | LeadStatus::Proposal => 300,
        LeadStatus::New | LeadStatus::Contacted => 200,
        LeadStatus::Won | LeadStatus::Lost => 50,
        LeadStatus::Other(_) => UNKNOWN_STAGE_WEIGHT,
    }
}

pub fn tag_weight(tag: &Tag) -> u32 {
    match tag {
        Tag::Vip => 100,
        Tag::Hot => 80,
        Tag::Serious => 60,
        Tag::Cold => 30,
        Tag::NoResponse => 20,
        Tag::NoPhone => 10,
        Tag::Fake => 5,
        Tag::Other(_) => 0,
    }
}

/// Where a follow-up date falls relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Unscheduled,
    Later,
    ThisWeek,
    Today,
    Overdue,
}

impl Urgency {
    /// Compare calendar days, so "today" holds all day long.
    pub fn of(next_follow_up: Option<&str>, now: DateTime<Utc>) -> Self {
        let Some(due) = next_follow_up.and_then(dates::parse_day) else {
            return Self::Unscheduled;
        };
        let today = now.date_naive();

        if due < today {
            Self::Overdue
        } else if due == today {
            Self::Today
        } else if today
            .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
            .map_or(false, |limit| due <= limit)
        {
            Self::ThisWeek
        } else {
            Self::Later
        }
    }

    pub fn weight(self) -> u32 {
        match self {
            Self::Overdue => 150,
            Self::Today => 120,
            Self::ThisWeek => 80,
            Self::Later => 40,
            Self::Unscheduled => 0,
        }
    }
}

/// Per-signal breakdown of a lead's priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeadScore {
    pub stage: u32,
    pub tags: u32,
    pub urgency: u32,
}

impl LeadScore {
    pub fn of(lead: &Lead, now: DateTime<Utc>) -> Self {
        Self {
            stage: stage_score(lead),
            tags: tag_score(lead),
            urgency: urgency_score(lead, now),
        }
    }

    pub fn total(&self) -> u32 {
        self.stage + self.tags + self.urgency
    }
}

pub fn stage_score(lead: &Lead) -> u32 {
    stage_weight(&lead.status)
}

/// Best single tag. Several weak tags never add up past one strong tag.
pub fn tag_score(lead: &Lead) -> u32 {
    lead.tags.iter().map(tag_weight).max().unwrap_or(0)
}

pub fn urgency_score(lead: &Lead, now: DateTime<Utc>) -> u32 {
    Urgency::of(lead.next_follow_up_date.as_deref(), now).weight()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 23, 30, 0).unwrap()
    }

    fn tagged(tags: &[Tag]) -> Lead {
        Lead {
            tags: tags.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn test_stage_bands_are_ordered() {
        let ordered = [
            LeadStatus::Deposit,
            LeadStatus::Visit,
            LeadStatus::Qualified,
            LeadStatus::New,
            LeadStatus::Other("Archived".to_string()),
            LeadStatus::Lost,
        ];
        for pair in ordered.windows(2) {
            assert!(stage_weight(&pair[0]) > stage_weight(&pair[1]), "{:?}", pair);
        }
        assert_eq!(stage_weight(&LeadStatus::Signed), stage_weight(&LeadStatus::Deposit));
        assert_eq!(stage_weight(&LeadStatus::Won), stage_weight(&LeadStatus::Lost));
        assert!(UNKNOWN_STAGE_WEIGHT > 0);
    }

    #[test]
    fn test_tag_score_takes_max_not_sum() {
        let cold_fake = tagged(&[Tag::Cold, Tag::Fake]);
        let hot = tagged(&[Tag::Hot]);
        assert_eq!(tag_score(&cold_fake), tag_weight(&Tag::Cold));
        assert!(tag_score(&cold_fake) < tag_score(&hot));

        let many_weak = tagged(&[Tag::Cold, Tag::NoResponse, Tag::NoPhone, Tag::Fake]);
        assert!(tag_score(&many_weak) < tag_score(&tagged(&[Tag::Serious])));
    }

    #[test]
    fn test_tag_weights_are_ordered() {
        let ordered = [
            Tag::Vip,
            Tag::Hot,
            Tag::Serious,
            Tag::Cold,
            Tag::NoResponse,
            Tag::NoPhone,
            Tag::Fake,
        ];
        for pair in ordered.windows(2) {
            assert!(tag_weight(&pair[0]) > tag_weight(&pair[1]), "{:?}", pair);
        }
        assert_eq!(tag_score(&tagged(&[])), 0);
        assert_eq!(tag_score(&tagged(&[Tag::Other("Investor".to_string())])), 0);
    }

    #[test]
    fn test_urgency_uses_calendar_days() {
        assert_eq!(Urgency::of(Some("2026-10-18"), now()), Urgency::Overdue);
        // Earlier today, hours ago: still "today", not overdue.
        assert_eq!(Urgency::of(Some("2026-10-19T00:15:00Z"), now()), Urgency::Today);
        assert_eq!(Urgency::of(Some("2026-10-19"), now()), Urgency::Today);
        assert_eq!(Urgency::of(Some("2026-10-20T00:05:00Z"), now()), Urgency::ThisWeek);
        assert_eq!(Urgency::of(Some("2026-10-26"), now()), Urgency::ThisWeek);
        assert_eq!(Urgency::of(Some("2026-10-27"), now()), Urgency::Later);
        assert_eq!(Urgency::of(None, now()), Urgency::Unscheduled);
        assert_eq!(Urgency::of(Some("soon"), now()), Urgency::Unscheduled);
    }

    #[test]
    fn test_urgency_weights_are_ordered() {
        let ordered = [
            Urgency::Overdue,
            Urgency::Today,
            Urgency::ThisWeek,
            Urgency::Later,
            Urgency::Unscheduled,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].weight() > pair[1].weight());
        }
        assert_eq!(Urgency::Unscheduled.weight(), 0);
    }

    #[test]
    fn test_lead_score_sums_signals() {
        let lead = Lead {
            status: LeadStatus::Qualified,
            tags: vec![Tag::Hot, Tag::Cold],
            next_follow_up_date: Some("2026-10-19".to_string()),
            ..Default::default()
        };
        let score = LeadScore::of(&lead, now());
        assert_eq!(score, LeadScore { stage: 300, tags: 80, urgency: 120 });
        assert_eq!(score.total(), 500);
    }

    #[test]
    fn test_empty_lead_scores_lowest_possible() {
        let lead = Lead {
            status: LeadStatus::Lost,
            ..Default::default()
        };
        assert_eq!(LeadScore::of(&lead, now()).total(), 50);
    }
}
