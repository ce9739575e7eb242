//! # Matchday Core Library
//!
//! Scheduling core for a sports-club manager: activity templates with
//! daily/weekly/monthly repeat rules, on-demand expansion of repeating
//! activities into concrete occurrences, and window queries that make a
//! generated occurrence look exactly like a stored record.
//!
//! ## Features
//!
//! - **Template-Based Series**: one persisted activity record anchors a whole
//!   repeating series; generated occurrences are never written back
//! - **Stable Occurrence Identity**: every occurrence carries a deterministic
//!   composite key (`<activity-id>-YYYYMMDD`) that round-trips back to its
//!   template and date, so attendance and reports can be keyed per occurrence
//! - **Window Queries**: fetch everything happening between two instants,
//!   anchors and derived instances merged, filtered to the exact window
//! - **Graceful Degradation**: one malformed template record costs its own
//!   series, never the whole listing
//! - **Type Safety**: compile-time checked models over sqlx/SQLite
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`identity`]: The occurrence identity codec
//! - [`recurrence`]: Repeat-rule expansion
//! - [`repository`]: Data access layer with Repository pattern
//! - [`query`]: Listing filters
//! - [`error`]: Error types with context
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::{Duration, Utc};
//! use matchday_core::{
//!     db,
//!     models::NewActivityData,
//!     repository::{ActivityRepository, OccurrenceRepository, SqliteRepository},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), matchday_core::error::CoreError> {
//!     let pool = db::establish_connection("club.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     let activity = repo
//!         .add_activity(NewActivityData {
//!             title: "U12 evening training".to_string(),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Created activity: {}", activity.title);
//!
//!     let week = repo
//!         .list_occurrences(Utc::now(), Utc::now() + Duration::days(7), &[])
//!         .await?;
//!     for occurrence in week {
//!         println!("{} {}", occurrence.start_at, occurrence.activity.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod identity;
pub mod models;
pub mod query;
pub mod recurrence;
pub mod repository;
