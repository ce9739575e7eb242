use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use matchday_core::error::CoreError;
use matchday_core::models::ActivityType;
use matchday_core::query::ActivityFilter;
use matchday_core::repository::Repository;
use std::collections::HashMap;
use uuid::Uuid;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::parser;
use crate::views::table::{display_occurrences, ViewOccurrence};

pub async fn list_window(
    repo: &impl Repository,
    command: ListCommand,
    config: &Config,
) -> Result<()> {
    let from = match &command.from {
        Some(from) => parser::parse_datetime(from)?,
        None => Utc::now(),
    };
    let to = match &command.to {
        Some(to) => parser::parse_datetime(to)?,
        None => from + Duration::days(config.default_window_days),
    };

    let mut filters = Vec::new();
    if let Some(team_name) = &command.team {
        let team = repo.find_team_by_name(team_name).await?.ok_or_else(|| {
            anyhow!(CoreError::NotFound(format!("Team '{}' not found", team_name)))
        })?;
        filters.push(ActivityFilter::Team(team.id));
    }
    if let Some(kind) = &command.kind {
        filters.push(ActivityFilter::Kind(kind.parse::<ActivityType>()?));
    }

    let mut occurrences = repo.list_occurrences(from, to, &filters).await?;
    // The engine makes no ordering promise; the view wants chronological
    occurrences.sort_by_key(|o| o.start_at);

    if command.json {
        println!("{}", serde_json::to_string_pretty(&occurrences)?);
        return Ok(());
    }

    let team_names: HashMap<Uuid, String> = repo
        .find_teams()
        .await?
        .into_iter()
        .map(|team| (team.id, team.name))
        .collect();

    let view_occurrences: Vec<ViewOccurrence> = occurrences
        .into_iter()
        .map(|o| ViewOccurrence {
            key: o.key(),
            title: o.activity.title.clone(),
            kind: o.activity.kind,
            start_at: o.start_at,
            end_at: o.end_at,
            location: o.activity.location.clone(),
            team_name: o
                .activity
                .team_id
                .and_then(|id| team_names.get(&id).cloned()),
            is_derived: o.is_derived,
        })
        .collect();

    display_occurrences(&view_occurrences);

    Ok(())
}
