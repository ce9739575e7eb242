use crate::error::CoreError;
use crate::models::Team;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

#[async_trait]
impl super::TeamRepository for SqliteRepository {
    async fn add_team(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Team, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "Team name cannot be empty".to_string(),
            ));
        }

        let mut tx = self.pool().begin().await?;

        let team = sqlx::query_as(
            r#"INSERT INTO teams (id, name, description, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .bind(description)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(team)
    }

    async fn find_team_by_id(&self, id: Uuid) -> Result<Option<Team>, CoreError> {
        let team = sqlx::query_as("SELECT * FROM teams WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(team)
    }

    async fn find_team_by_name(&self, name: &str) -> Result<Option<Team>, CoreError> {
        let team = sqlx::query_as("SELECT * FROM teams WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;
        Ok(team)
    }

    async fn find_teams(&self) -> Result<Vec<Team>, CoreError> {
        let teams = sqlx::query_as("SELECT id, name, description, created_at FROM teams ORDER BY name")
            .fetch_all(self.pool())
            .await?;
        Ok(teams)
    }

    async fn delete_team(&self, name: String) -> Result<(), CoreError> {
        // First, check if the team exists and get its ID
        let team: Option<Team> = sqlx::query_as("SELECT * FROM teams WHERE name = $1")
            .bind(&name)
            .fetch_optional(self.pool())
            .await?;

        let team = team.ok_or_else(|| CoreError::NotFound("Team not found".to_string()))?;

        // Refuse while activities still reference this team
        let activity_count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM activities WHERE team_id = $1")
                .bind(team.id)
                .fetch_one(self.pool())
                .await?;

        if activity_count.0 > 0 {
            return Err(CoreError::InvalidInput(format!(
                "Cannot delete team '{}' because it has {} associated activit{}. Delete or move them first.",
                name,
                activity_count.0,
                if activity_count.0 == 1 { "y" } else { "ies" }
            )));
        }

        let result = sqlx::query("DELETE FROM teams WHERE name = $1")
            .bind(name)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound("Team not found".to_string()));
        }
        Ok(())
    }
}
