//! Occurrence identity: the composite key that addresses one concrete
//! happening of an activity.
//!
//! Internally an occurrence identity is a tagged value; the string form
//! (`<uuid>` for an anchor, `<uuid>-YYYYMMDD` for a derived occurrence) only
//! exists at the store boundary. Consumers that persist per-occurrence data
//! (attendance records, reports) key it by this exact string.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Length of a hyphenated uuid string, the fixed prefix of every composite key.
const UUID_LEN: usize = 36;
/// Length of the `YYYYMMDD` suffix.
const DATE_LEN: usize = 8;

/// Identity of a single occurrence.
///
/// `Plain` addresses the activity record itself: a non-repeating activity, or
/// the anchor occurrence of a repeating one. `Derived` addresses one generated
/// occurrence of a repeating activity on a concrete calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OccurrenceId {
    Plain(Uuid),
    Derived { activity_id: Uuid, date: NaiveDate },
}

impl OccurrenceId {
    /// The owning activity, regardless of variant.
    pub fn activity_id(&self) -> Uuid {
        match self {
            OccurrenceId::Plain(id) => *id,
            OccurrenceId::Derived { activity_id, .. } => *activity_id,
        }
    }

    /// The encoded calendar date, if this is a derived occurrence.
    pub fn occurrence_date(&self) -> Option<NaiveDate> {
        match self {
            OccurrenceId::Plain(_) => None,
            OccurrenceId::Derived { date, .. } => Some(*date),
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, OccurrenceId::Derived { .. })
    }
}

impl fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccurrenceId::Plain(id) => write!(f, "{}", id),
            OccurrenceId::Derived { activity_id, date } => {
                write!(f, "{}-{}", activity_id, date.format("%Y%m%d"))
            }
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid occurrence id: {0}")]
pub struct ParseOccurrenceIdError(String);

impl FromStr for OccurrenceId {
    type Err = ParseOccurrenceIdError;

    /// Decodes an occurrence key.
    ///
    /// The uuid prefix has a fixed length, so the date suffix is recovered by
    /// position, never by splitting on `-` (uuids contain the separator
    /// themselves). A bare uuid decodes to `Plain`; anything else must be a
    /// hyphenated uuid followed by `-` and eight digits forming a real
    /// calendar date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = Uuid::try_parse(s) {
            return Ok(OccurrenceId::Plain(id));
        }

        if !s.is_ascii() || s.len() != UUID_LEN + 1 + DATE_LEN {
            return Err(ParseOccurrenceIdError(s.to_string()));
        }

        let (prefix, suffix) = s.split_at(UUID_LEN);
        let activity_id = Uuid::try_parse(prefix)
            .map_err(|_| ParseOccurrenceIdError(s.to_string()))?;

        let digits = suffix
            .strip_prefix('-')
            .filter(|d| d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| ParseOccurrenceIdError(s.to_string()))?;

        let err = || ParseOccurrenceIdError(s.to_string());
        let year: i32 = digits[..4].parse().map_err(|_| err())?;
        let month: u32 = digits[4..6].parse().map_err(|_| err())?;
        let day: u32 = digits[6..8].parse().map_err(|_| err())?;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| ParseOccurrenceIdError(s.to_string()))?;

        Ok(OccurrenceId::Derived { activity_id, date })
    }
}
