use anyhow::{anyhow, Result};
use matchday_core::error::CoreError;
use matchday_core::models::{
    ActivityType, RepeatKind, RepeatRule, UpdateActivityData, Visibility, WeekdaySet,
};
use matchday_core::repository::Repository;

use crate::cli::EditCommand;
use crate::parser;
use crate::util::resolve_activity_id;

pub async fn edit_activity(repo: &impl Repository, command: EditCommand) -> Result<()> {
    let id = resolve_activity_id(repo, &command.id).await?;
    let current = repo
        .find_activity_by_id(id)
        .await?
        .ok_or_else(|| anyhow!(CoreError::NotFound(format!("Activity '{}' not found", id))))?;

    let mut data = UpdateActivityData {
        title: command.title,
        ..Default::default()
    };

    if command.description_clear {
        data.description = Some(None);
    } else if let Some(description) = command.description {
        data.description = Some(Some(description));
    }

    if command.location_clear {
        data.location = Some(None);
    } else if let Some(location) = command.location {
        data.location = Some(Some(location));
    }

    if let Some(start) = &command.start {
        data.start_at = Some(parser::parse_datetime(start)?);
    }

    if command.end_clear {
        data.end_at = Some(None);
    } else if let Some(end) = &command.end {
        data.end_at = Some(Some(parser::parse_datetime(end)?));
    }

    if let Some(kind) = &command.kind {
        data.kind = Some(kind.parse::<ActivityType>()?);
    }
    if let Some(visibility) = &command.visibility {
        data.visibility = Some(visibility.parse::<Visibility>()?);
    }

    if command.team_clear {
        data.team_id = Some(None);
    } else if let Some(team_name) = &command.team {
        let team = repo.find_team_by_name(team_name).await?.ok_or_else(|| {
            anyhow!(CoreError::NotFound(format!("Team '{}' not found", team_name)))
        })?;
        data.team_id = Some(Some(team.id));
    }

    if command.no_repeat {
        data.repeat = Some(None);
    } else if command.every.is_some() || command.on.is_some() || command.until.is_some() {
        // Merge partial flags with the rule already on the record
        let current_rule = current.repeat_rule().unwrap_or(None);
        let kind = match &command.every {
            Some(every) => every.parse::<RepeatKind>()?,
            None => current_rule
                .map(|rule| rule.kind)
                .ok_or_else(|| anyhow!("use --every to make this activity repeat"))?,
        };
        let until = match &command.until {
            Some(until) => parser::parse_date(until)?,
            None => current_rule
                .map(|rule| rule.until)
                .ok_or_else(|| anyhow!("--until is required for a new repeat rule"))?,
        };
        let days = match &command.on {
            Some(on) => Some(on.parse::<WeekdaySet>()?),
            None => current_rule.and_then(|rule| rule.days),
        };
        data.repeat = Some(Some(RepeatRule { kind, days, until }));
    }

    let updated = repo.update_activity(id, data).await?;
    println!("Updated '{}'", updated.title);

    Ok(())
}
