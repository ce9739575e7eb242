use anyhow::{anyhow, Result};
use chrono::Duration;
use matchday_core::models::{
    ActivityType, NewActivityData, RepeatKind, RepeatRule, Visibility, WeekdaySet,
};
use matchday_core::repository::Repository;

use crate::cli::AddCommand;
use crate::parser;

pub async fn add_activity(repo: &impl Repository, command: AddCommand) -> Result<()> {
    let start_at = parser::parse_datetime(&command.start)?;
    let end_at = match (&command.end, command.duration) {
        (Some(end), _) => Some(parser::parse_datetime(end)?),
        (None, Some(minutes)) => Some(start_at + Duration::minutes(minutes)),
        (None, None) => None,
    };

    let kind = match &command.kind {
        Some(kind) => kind.parse::<ActivityType>()?,
        None => ActivityType::Training,
    };
    let visibility = match &command.visibility {
        Some(visibility) => visibility.parse::<Visibility>()?,
        None => Visibility::Team,
    };

    let repeat = match &command.every {
        Some(every) => {
            let kind = every.parse::<RepeatKind>()?;
            let until = command
                .until
                .as_deref()
                .ok_or_else(|| anyhow!("--every requires --until"))?;
            let days = match &command.on {
                Some(on) => Some(on.parse::<WeekdaySet>()?),
                None => None,
            };
            Some(RepeatRule {
                kind,
                days,
                until: parser::parse_date(until)?,
            })
        }
        None => None,
    };

    let data = NewActivityData {
        title: command.title,
        description: command.description,
        location: command.location,
        kind,
        visibility,
        start_at,
        end_at,
        team_name: command.team,
        repeat,
        ..Default::default()
    };

    let activity = repo.add_activity(data).await?;

    println!(
        "Added '{}' starting {}",
        activity.title,
        activity.start_at.format("%a %Y-%m-%d %H:%M")
    );
    if let (Some(kind), Some(until)) = (activity.repeat_kind, activity.repeat_until) {
        match activity.repeat_days {
            Some(days) => println!("Repeats {} on {} until {}", kind, days, until),
            None => println!("Repeats {} until {}", kind, until),
        }
    }

    Ok(())
}
