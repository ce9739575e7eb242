use crate::error::CoreError;
use crate::identity::OccurrenceId;
use crate::models::{Activity, Occurrence};
use crate::query::ActivityFilter;
use crate::recurrence::RecurrenceExpander;
use crate::repository::{ActivityRepository, SqliteRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::{debug, warn};

#[async_trait]
impl super::OccurrenceRepository for SqliteRepository {
    async fn list_occurrences(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        filters: &[ActivityFilter],
    ) -> Result<Vec<Occurrence>, CoreError> {
        if window_start > window_end {
            return Err(CoreError::InvalidInput(format!(
                "Window start {} is after window end {}",
                window_start, window_end
            )));
        }

        // Loose candidate fetch: anything anchored in or after the window,
        // plus any series still alive at the window start. Necessary but not
        // sufficient; the exact date filter below does the bounding. With
        // repeat_until mandatory on repeating rows, a live series always
        // satisfies the second arm.
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM activities WHERE (start_at >= ");
        qb.push_bind(window_start);
        qb.push(" OR repeat_until >= ");
        qb.push_bind(window_start.date_naive());
        qb.push(")");
        for filter in filters {
            qb.push(" AND ");
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
        }

        // Rows decode individually: a corrupt record (say an unrecognized
        // repeat kind written by another client) is skipped with a warning
        // instead of failing the whole listing.
        let rows = qb.build().fetch_all(self.pool()).await?;
        let activities: Vec<Activity> = rows
            .iter()
            .filter_map(|row| match Activity::from_row(row) {
                Ok(activity) => Some(activity),
                Err(err) => {
                    warn!(error = %err, "skipping undecodable activity row");
                    None
                }
            })
            .collect();

        let mut occurrences = Vec::with_capacity(activities.len());
        for activity in activities {
            if activity.is_repeating {
                match RecurrenceExpander::new(activity.clone()) {
                    Ok(expander) => {
                        occurrences.extend(expander.occurrences_between(window_start, window_end));
                    }
                    // One bad record must not break the whole listing; the
                    // series simply contributes no derived occurrences.
                    Err(err) => {
                        warn!(activity_id = %activity.id, error = %err, "skipping malformed repeat rule");
                    }
                }
            }
            // Every fetched template's own anchor occurrence
            occurrences.push(Occurrence::anchor(activity));
        }

        // Exact window bounding: drop anchors the loose fetch pulled in that
        // fall outside the window.
        let window_start = window_start.date_naive();
        let window_end = window_end.date_naive();
        occurrences.retain(|occurrence| {
            let date = occurrence.date();
            date >= window_start && date <= window_end
        });

        Ok(occurrences)
    }

    async fn find_occurrence(
        &self,
        id: &OccurrenceId,
    ) -> Result<Option<Occurrence>, CoreError> {
        let Some(activity) = self.find_activity_by_id(id.activity_id()).await? else {
            return Ok(None);
        };

        match id {
            OccurrenceId::Plain(_) => Ok(Some(Occurrence::anchor(activity))),
            OccurrenceId::Derived { date, .. } => {
                // Reconstruct the occurrence directly from the template; the
                // range generator never runs for a point lookup.
                let rule = match activity.repeat_rule() {
                    Ok(Some(rule)) => rule,
                    Ok(None) => return Ok(None),
                    Err(err) => {
                        warn!(activity_id = %activity.id, error = %err, "malformed repeat rule on lookup");
                        return Ok(None);
                    }
                };
                if *date <= activity.anchor_date() || *date > rule.until {
                    return Ok(None);
                }
                Ok(Some(Occurrence::derived(activity, *date)))
            }
        }
    }

    async fn find_occurrence_by_key(&self, key: &str) -> Result<Option<Occurrence>, CoreError> {
        match key.parse::<OccurrenceId>() {
            Ok(id) => self.find_occurrence(&id).await,
            Err(err) => {
                debug!(key, error = %err, "occurrence key did not parse");
                Ok(None)
            }
        }
    }
}
