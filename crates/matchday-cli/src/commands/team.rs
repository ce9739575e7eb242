use anyhow::Result;
use dialoguer::Confirm;
use matchday_core::repository::Repository;

use crate::cli::{TeamAction, TeamCommand};
use crate::views::table::display_teams;

pub async fn team_command(repo: &impl Repository, command: TeamCommand) -> Result<()> {
    match command.action {
        TeamAction::Add { name, description } => {
            let team = repo.add_team(name, description).await?;
            println!("Created team '{}'", team.name);
        }
        TeamAction::List => {
            let teams = repo.find_teams().await?;
            display_teams(&teams);
        }
        TeamAction::Delete { name, force } => {
            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete team '{}'?", name))
                    .default(false)
                    .interact()
                    .unwrap_or(false);
                if !confirmed {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }
            repo.delete_team(name.clone()).await?;
            println!("Deleted team '{}'", name);
        }
    }
    Ok(())
}
