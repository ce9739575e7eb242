use crate::db::DbPool;
use crate::error::CoreError;
use crate::identity::OccurrenceId;
use crate::models::{Activity, NewActivityData, Occurrence, Team, UpdateActivityData};
use crate::query::ActivityFilter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

// Re-export domain modules
pub mod activities;
pub mod occurrences;
pub mod teams;

// Traits are defined in this module and implemented in respective domain modules

/// Domain-specific trait for activity template operations
#[async_trait]
pub trait ActivityRepository {
    async fn add_activity(&self, data: NewActivityData) -> Result<Activity, CoreError>;
    async fn find_activity_by_id(&self, id: Uuid) -> Result<Option<Activity>, CoreError>;
    async fn find_activities_by_short_id_prefix(
        &self,
        short_id: &str,
    ) -> Result<Vec<Activity>, CoreError>;
    async fn find_activities(
        &self,
        filters: &[ActivityFilter],
    ) -> Result<Vec<Activity>, CoreError>;
    async fn update_activity(
        &self,
        id: Uuid,
        data: UpdateActivityData,
    ) -> Result<Activity, CoreError>;
    async fn delete_activity(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Domain-specific trait for team operations
#[async_trait]
pub trait TeamRepository {
    async fn add_team(&self, name: String, description: Option<String>)
        -> Result<Team, CoreError>;
    async fn find_team_by_id(&self, id: Uuid) -> Result<Option<Team>, CoreError>;
    async fn find_team_by_name(&self, name: &str) -> Result<Option<Team>, CoreError>;
    async fn find_teams(&self) -> Result<Vec<Team>, CoreError>;
    async fn delete_team(&self, name: String) -> Result<(), CoreError>;
}

/// Domain-specific trait for occurrence window queries and lookups.
///
/// All operations are read-only: occurrences are computed from templates on
/// every call and never stored, so concurrent callers cannot interfere.
#[async_trait]
pub trait OccurrenceRepository {
    /// Every occurrence whose calendar date lies within
    /// `[window_start, window_end]`, both inclusive: anchors of all matching
    /// templates plus the expanded instances of repeating ones. No ordering
    /// guarantee; callers sort as needed.
    async fn list_occurrences(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        filters: &[ActivityFilter],
    ) -> Result<Vec<Occurrence>, CoreError>;

    /// Resolves a single occurrence by identity without running a window
    /// query, for consumers holding a stored occurrence key.
    async fn find_occurrence(&self, id: &OccurrenceId)
        -> Result<Option<Occurrence>, CoreError>;

    /// Like [`find_occurrence`](Self::find_occurrence), but from the wire
    /// string. A malformed key resolves to `None` rather than an error.
    async fn find_occurrence_by_key(&self, key: &str) -> Result<Option<Occurrence>, CoreError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository: ActivityRepository + TeamRepository + OccurrenceRepository {
    // This trait automatically composes all domain-specific repositories
    // Individual domain operations are defined in their respective traits
}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
