use anyhow::{anyhow, Result};
use matchday_core::error::CoreError;
use matchday_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::ShowCommand;

pub async fn show_occurrence(repo: &impl Repository, command: ShowCommand) -> Result<()> {
    let occurrence = repo
        .find_occurrence_by_key(&command.key)
        .await?
        .ok_or_else(|| {
            anyhow!(CoreError::NotFound(format!(
                "No occurrence matches '{}'",
                command.key
            )))
        })?;

    println!("{}", occurrence.activity.title.bold());
    println!("  Key:      {}", occurrence.key());
    match occurrence.end_at {
        Some(end) => println!(
            "  When:     {} - {}",
            occurrence.start_at.format("%a %Y-%m-%d %H:%M"),
            end.format("%H:%M")
        ),
        None => println!("  When:     {}", occurrence.start_at.format("%a %Y-%m-%d %H:%M")),
    }
    println!("  Kind:     {}", occurrence.activity.kind);
    if let Some(location) = &occurrence.activity.location {
        println!("  Where:    {}", location);
    }
    if let Some(description) = &occurrence.activity.description {
        println!("  Details:  {}", description);
    }
    if let Some(parent) = occurrence.parent_activity_id {
        println!("  Instance of series {}", parent.to_string().dimmed());
    }
    if let (Some(kind), Some(until)) =
        (occurrence.activity.repeat_kind, occurrence.activity.repeat_until)
    {
        match occurrence.activity.repeat_days {
            Some(days) => println!("  Repeats:  {} on {} until {}", kind, days, until),
            None => println!("  Repeats:  {} until {}", kind, until),
        }
    }

    Ok(())
}
