use crate::error::CoreError;
use crate::models::{Activity, NewActivityData, RepeatKind, RepeatRule, Team, UpdateActivityData};
use crate::query::ActivityFilter;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

/// Normalizes a repeat rule before it is stored: an empty weekday set means
/// "same weekday as the anchor" and is persisted as NULL.
fn normalize_repeat(repeat: Option<RepeatRule>) -> Option<RepeatRule> {
    repeat.map(|rule| RepeatRule {
        days: rule.days.filter(|d| !d.is_empty()),
        ..rule
    })
}

/// Invariant checks shared by create and update.
fn validate_schedule(
    start_at: DateTime<Utc>,
    end_at: Option<DateTime<Utc>>,
    repeat: Option<&RepeatRule>,
) -> Result<(), CoreError> {
    if let Some(end) = end_at {
        if end < start_at {
            return Err(CoreError::InvalidInput(
                "Activity cannot end before it starts".to_string(),
            ));
        }
    }
    if let Some(rule) = repeat {
        if rule.until < start_at.date_naive() {
            return Err(CoreError::InvalidInput(format!(
                "Repeat end date {} is before the first session",
                rule.until
            )));
        }
        if rule.days.is_some() && rule.kind != RepeatKind::Weekly {
            return Err(CoreError::InvalidInput(
                "Weekday lists only apply to weekly repeats".to_string(),
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl super::ActivityRepository for SqliteRepository {
    async fn add_activity(&self, data: NewActivityData) -> Result<Activity, CoreError> {
        if data.title.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "Activity title cannot be empty".to_string(),
            ));
        }
        let repeat = normalize_repeat(data.repeat);
        validate_schedule(data.start_at, data.end_at, repeat.as_ref())?;

        let mut tx = self.pool().begin().await?;

        // Resolve the owning team: an explicit id must exist, a name is
        // looked up for CLI convenience.
        let team_id = match (data.team_id, data.team_name.as_deref()) {
            (Some(id), _) => {
                let team: Option<Team> = sqlx::query_as("SELECT * FROM teams WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;
                if team.is_none() {
                    return Err(CoreError::NotFound(format!("Team with id {} not found", id)));
                }
                Some(id)
            }
            (None, Some(name)) => {
                let team: Option<Team> = sqlx::query_as("SELECT * FROM teams WHERE name = $1")
                    .bind(name)
                    .fetch_optional(&mut *tx)
                    .await?;
                Some(
                    team.ok_or_else(|| CoreError::NotFound(format!("Team '{}' not found", name)))?
                        .id,
                )
            }
            (None, None) => None,
        };

        let now = Utc::now();
        let activity = Activity {
            id: Uuid::now_v7(),
            title: data.title,
            description: data.description,
            location: data.location,
            kind: data.kind,
            visibility: data.visibility,
            start_at: data.start_at,
            end_at: data.end_at,
            team_id,
            created_by: data.created_by,
            is_repeating: repeat.is_some(),
            repeat_kind: repeat.map(|r| r.kind),
            repeat_days: repeat.and_then(|r| r.days),
            repeat_until: repeat.map(|r| r.until),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO activities (
                id, title, description, location, kind, visibility,
                start_at, end_at, team_id, created_by,
                is_repeating, repeat_kind, repeat_days, repeat_until,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"#,
        )
        .bind(activity.id)
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(&activity.location)
        .bind(activity.kind)
        .bind(activity.visibility)
        .bind(activity.start_at)
        .bind(activity.end_at)
        .bind(activity.team_id)
        .bind(activity.created_by)
        .bind(activity.is_repeating)
        .bind(activity.repeat_kind)
        .bind(activity.repeat_days)
        .bind(activity.repeat_until)
        .bind(activity.created_at)
        .bind(activity.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(activity)
    }

    async fn find_activity_by_id(&self, id: Uuid) -> Result<Option<Activity>, CoreError> {
        let activity = sqlx::query_as("SELECT * FROM activities WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(activity)
    }

    async fn find_activities_by_short_id_prefix(
        &self,
        short_id: &str,
    ) -> Result<Vec<Activity>, CoreError> {
        // Ids are stored as 16-byte blobs; the hyphenated form only exists in
        // memory, so prefix matching happens here rather than in SQL.
        let activities: Vec<Activity> =
            sqlx::query_as("SELECT * FROM activities ORDER BY start_at")
                .fetch_all(self.pool())
                .await?;
        let prefix = short_id.to_lowercase();
        Ok(activities
            .into_iter()
            .filter(|a| a.id.to_string().starts_with(&prefix))
            .collect())
    }

    async fn find_activities(
        &self,
        filters: &[ActivityFilter],
    ) -> Result<Vec<Activity>, CoreError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM activities");
        let mut first = true;
        for filter in filters {
            qb.push(if first { " WHERE " } else { " AND " });
            match filter {
                ActivityFilter::Team(id) => {
                    qb.push("team_id = ");
                    qb.push_bind(*id);
                }
                ActivityFilter::Kind(kind) => {
                    qb.push("kind = ");
                    qb.push_bind(*kind);
                }
                ActivityFilter::Visibility(visibility) => {
                    qb.push("visibility = ");
                    qb.push_bind(*visibility);
                }
            }
            first = false;
        }
        qb.push(" ORDER BY start_at");

        let activities = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(activities)
    }

    async fn update_activity(
        &self,
        id: Uuid,
        data: UpdateActivityData,
    ) -> Result<Activity, CoreError> {
        let mut tx = self.pool().begin().await?;

        let current: Activity = sqlx::query_as("SELECT * FROM activities WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Activity with id {} not found", id)))?;

        // Validate the record as it will look after the update. A malformed
        // stored rule that is not being touched does not block other edits.
        let effective_start = data.start_at.unwrap_or(current.start_at);
        let effective_end = match data.end_at {
            Some(end) => end,
            None => current.end_at,
        };
        let effective_repeat = match data.repeat {
            Some(repeat) => normalize_repeat(repeat),
            None => current.repeat_rule().unwrap_or(None),
        };
        validate_schedule(effective_start, effective_end, effective_repeat.as_ref())?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE activities SET ");
        let mut updated = false;

        if let Some(title) = &data.title {
            if title.trim().is_empty() {
                return Err(CoreError::InvalidInput(
                    "Activity title cannot be empty".to_string(),
                ));
            }
            qb.push("title = ");
            qb.push_bind(title);
            updated = true;
        }

        if let Some(description) = &data.description {
            if updated {
                qb.push(", ");
            }
            qb.push("description = ");
            qb.push_bind(description.clone());
            updated = true;
        }

        if let Some(location) = &data.location {
            if updated {
                qb.push(", ");
            }
            qb.push("location = ");
            qb.push_bind(location.clone());
            updated = true;
        }

        if let Some(kind) = data.kind {
            if updated {
                qb.push(", ");
            }
            qb.push("kind = ");
            qb.push_bind(kind);
            updated = true;
        }

        if let Some(visibility) = data.visibility {
            if updated {
                qb.push(", ");
            }
            qb.push("visibility = ");
            qb.push_bind(visibility);
            updated = true;
        }

        if let Some(start_at) = data.start_at {
            if updated {
                qb.push(", ");
            }
            qb.push("start_at = ");
            qb.push_bind(start_at);
            updated = true;
        }

        if let Some(end_at) = data.end_at {
            if updated {
                qb.push(", ");
            }
            qb.push("end_at = ");
            qb.push_bind(end_at);
            updated = true;
        }

        if let Some(team_id) = data.team_id {
            if let Some(team_id) = team_id {
                let team: Option<Team> = sqlx::query_as("SELECT * FROM teams WHERE id = $1")
                    .bind(team_id)
                    .fetch_optional(&mut *tx)
                    .await?;
                if team.is_none() {
                    return Err(CoreError::NotFound(format!(
                        "Team with id {} not found",
                        team_id
                    )));
                }
            }
            if updated {
                qb.push(", ");
            }
            qb.push("team_id = ");
            qb.push_bind(team_id);
            updated = true;
        }

        if let Some(repeat) = data.repeat {
            let repeat = normalize_repeat(repeat);
            if updated {
                qb.push(", ");
            }
            qb.push("is_repeating = ");
            qb.push_bind(repeat.is_some());
            qb.push(", repeat_kind = ");
            qb.push_bind(repeat.map(|r| r.kind));
            qb.push(", repeat_days = ");
            qb.push_bind(repeat.and_then(|r| r.days));
            qb.push(", repeat_until = ");
            qb.push_bind(repeat.map(|r| r.until));
            updated = true;
        }

        if !updated {
            return Ok(current);
        }

        qb.push(", updated_at = ");
        qb.push_bind(Utc::now());
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.build().execute(&mut *tx).await?;

        let activity: Activity = sqlx::query_as("SELECT * FROM activities WHERE id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(activity)
    }

    async fn delete_activity(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
