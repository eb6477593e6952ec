use chrono::Utc;
use lead_pipeline::config::{AppConfig, LeadSource};
use lead_pipeline::mapper;
use lead_pipeline::models::Lead;
use lead_pipeline::priority;
use lead_pipeline::store::{JsonFileStore, LeadStore, RestLeadStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Lead Pipeline");
    info!("================");

    let config = AppConfig::from_env()?;

    let store: Box<dyn LeadStore> = match &config.source {
        LeadSource::Backend(params) => Box::new(RestLeadStore::new(params.clone())?),
        LeadSource::File(path) => Box::new(JsonFileStore::new(path.clone())),
    };

    info!("Loading leads from {}...", store.source_name());
    let records = store.fetch_records().await?;

    let now = Utc::now();
    let leads: Vec<Lead> = records
        .iter()
        .map(|record| mapper::to_domain_at(record, now))
        .filter(|lead| config.pipeline.map_or(true, |p| lead.in_pipeline(p)))
        .collect();

    if let Some(pipeline) = config.pipeline {
        info!("Keeping {} of {} leads in the {} pipeline", leads.len(), records.len(), pipeline.as_str());
    }

    let ranked = priority::rank(&leads, config.sort_mode, now);

    // Display results
    info!("✅ Ranked {} leads by {}\n", ranked.len(), config.sort_mode);

    for (i, entry) in ranked.iter().enumerate() {
        let lead = &entry.lead;
        println!("{}. {} [{}] score {}", i + 1, display_name(lead), lead.status, entry.total);
        println!(
            "   stage {} + tags {} + urgency {}",
            entry.score.stage, entry.score.tags, entry.score.urgency
        );
        if !lead.tags.is_empty() {
            let tags: Vec<&str> = lead.tags.iter().map(|t| t.as_str()).collect();
            println!("   Tags: {}", tags.join(", "));
        }
        if let Some(next) = &lead.next_follow_up_date {
            println!("   Next follow-up: {}", next);
        }
        if let Some(budget) = lead.budget {
            println!("   Budget: {:.0} {}", budget, lead.currency);
        }
        println!("   ID: {}", lead.id);
        println!();
    }

    let json = serde_json::to_string_pretty(&ranked)?;
    tokio::fs::write(&config.output, json).await?;
    info!("💾 Saved ranked leads to {}", config.output.display());

    Ok(())
}

fn display_name(lead: &Lead) -> &str {
    if lead.name.is_empty() {
        "(no name)"
    } else {
        &lead.name
    }
}
