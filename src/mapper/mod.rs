use crate::dates;
use crate::models::{Action, Lead, LeadStatus, PipelineType, Tag, DEFAULT_CURRENCY};
use crate::record::{lenient, LeadRecord};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Read a stored row, using the system clock for a missing `created_at`
pub fn to_domain(record: &LeadRecord) -> Lead {
    to_domain_at(record, Utc::now())
}

/// Read a stored row. `now` only stands in for a missing `created_at`.
pub fn to_domain_at(record: &LeadRecord, now: DateTime<Utc>) -> Lead {
    Lead {
        id: text(&record.id),
        name: text(&record.name),
        email: text(&record.email),
        phone: text(&record.phone),
        location: text(&record.location),
        nationality: text(&record.nationality),
        tax_residence: text(&record.tax_residence),
        country: text(&record.country),
        language: text(&record.language),

        status: record
            .status
            .clone()
            .map(LeadStatus::from)
            .unwrap_or_default(),
        tags: record
            .tags
            .iter()
            .flatten()
            .cloned()
            .map(Tag::from)
            .collect(),
        source: text(&record.source),
        pipeline_type: record.pipeline_type.as_deref().and_then(PipelineType::parse),
        assigned_to: record.assigned_to.clone(),

        property_type: record.property_type.clone(),
        property_types: list(&record.property_types),
        bedrooms: bedrooms_from_column(record.bedrooms.as_ref()),
        bathrooms: record.bathrooms.and_then(|b| u32::try_from(b).ok()),
        surface_min: record.surface_min,
        budget: record.budget,
        budget_min: record.budget_min,
        currency: record
            .currency
            .clone()
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        desired_location: text(&record.desired_location),
        views: list(&record.views),
        amenities: list(&record.amenities),
        property_reference: record.property_reference.clone(),
        property_url: record.property_url.clone(),

        created_at: record
            .created_at
            .clone()
            .unwrap_or_else(|| dates::format_instant(now)),
        last_contacted_at: record.last_contacted_at.clone(),
        next_follow_up_date: record.next_follow_up_date.clone(),
        purchase_timeframe: text(&record.purchase_timeframe),

        message: text(&record.message),
        notes: text(&record.notes),

        action_history: Action::list_from_value(record.action_history.as_ref()),
    }
}

/// Build the row written by the primary upsert.
///
/// `action_history` is never part of it. `bedrooms` keeps only the first
/// selected value.
pub fn to_persisted(lead: &Lead) -> LeadRecord {
    LeadRecord {
        id: non_empty(&lead.id),
        name: non_empty(&lead.name),
        email: non_empty(&lead.email),
        phone: non_empty(&lead.phone),
        location: non_empty(&lead.location),
        nationality: non_empty(&lead.nationality),
        tax_residence: non_empty(&lead.tax_residence),
        country: non_empty(&lead.country),
        language: non_empty(&lead.language),

        status: Some(lead.status.clone().into()),
        tags: Some(lead.tags.iter().cloned().map(String::from).collect()),
        source: non_empty(&lead.source),
        pipeline_type: lead.pipeline_type.map(|p| p.as_str().to_string()),
        assigned_to: lead.assigned_to.clone(),

        property_type: lead.property_type.clone(),
        property_types: Some(lead.property_types.clone()),
        bedrooms: lead
            .bedrooms
            .as_ref()
            .and_then(|selected| selected.first())
            .map(|&first| Value::from(first)),
        bathrooms: lead.bathrooms.map(i64::from),
        surface_min: lead.surface_min,
        budget: lead.budget,
        budget_min: lead.budget_min,
        currency: Some(
            non_empty(&lead.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        ),
        desired_location: non_empty(&lead.desired_location),
        views: Some(lead.views.clone()),
        amenities: Some(lead.amenities.clone()),
        property_reference: lead.property_reference.clone(),
        property_url: lead.property_url.clone(),

        created_at: non_empty(&lead.created_at),
        last_contacted_at: lead.last_contacted_at.clone(),
        next_follow_up_date: lead.next_follow_up_date.clone(),
        purchase_timeframe: non_empty(&lead.purchase_timeframe),

        message: non_empty(&lead.message),
        notes: non_empty(&lead.notes),

        action_history: None,
    }
}

/// Serialize an action list for the `action_history` column
pub fn action_history_value(actions: &[Action]) -> Value {
    Value::Array(
        actions
            .iter()
            .filter_map(|a| serde_json::to_value(a).ok())
            .collect(),
    )
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn list(value: &Option<Vec<String>>) -> Vec<String> {
    value.clone().unwrap_or_default()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// Scalar becomes a one-element selection; arrays keep their non-negative
// whole numbers.
fn bedrooms_from_column(value: Option<&Value>) -> Option<Vec<u32>> {
    match value? {
        Value::Array(items) => Some(items.iter().filter_map(bedroom_count).collect()),
        scalar => bedroom_count(scalar).map(|count| vec![count]),
    }
}

fn bedroom_count(value: &Value) -> Option<u32> {
    lenient::number(value)
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32)
}
