use anyhow::{anyhow, Result};
use matchday_core::error::CoreError;
use matchday_core::repository::Repository;
use uuid::Uuid;

pub async fn resolve_activity_id(repo: &impl Repository, short_id: &str) -> Result<Uuid> {
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    let activities = repo.find_activities_by_short_id_prefix(short_id).await?;
    if activities.len() == 1 {
        Ok(activities[0].id)
    } else if activities.is_empty() {
        Err(anyhow!(CoreError::NotFound(format!(
            "No activity found with ID prefix '{}'",
            short_id
        ))))
    } else {
        let activity_info: Vec<(String, String)> = activities
            .into_iter()
            .map(|a| (a.id.to_string(), a.title))
            .collect();
        Err(anyhow!(CoreError::AmbiguousId(activity_info)))
    }
}
