use uuid::Uuid;

use crate::models::{ActivityType, Visibility};

/// A filter on template fetches and window listings.
///
/// Filters are AND-composed; each variant maps to one predicate the store
/// applies when selecting candidate templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityFilter {
    /// Only activities owned by this team.
    Team(Uuid),
    /// Only activities of this kind.
    Kind(ActivityType),
    /// Only activities with this visibility.
    Visibility(Visibility),
}
