use anyhow::{anyhow, Result};
use dialoguer::Confirm;
use matchday_core::error::CoreError;
use matchday_core::repository::Repository;

use crate::cli::DeleteCommand;
use crate::util::resolve_activity_id;

pub async fn delete_activity(repo: &impl Repository, command: DeleteCommand) -> Result<()> {
    let id = resolve_activity_id(repo, &command.id).await?;
    let activity = repo
        .find_activity_by_id(id)
        .await?
        .ok_or_else(|| anyhow!(CoreError::NotFound(format!("Activity '{}' not found", id))))?;

    if !command.force {
        let prompt = if activity.is_repeating {
            format!(
                "Delete '{}' and its whole repeating series?",
                activity.title
            )
        } else {
            format!("Delete '{}'?", activity.title)
        };
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    repo.delete_activity(id).await?;
    println!("Deleted '{}'", activity.title);

    Ok(())
}
