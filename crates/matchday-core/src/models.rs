use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;
use crate::identity::OccurrenceId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Training,
    Game,
    Tournament,
    Other,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid activity type: {0}")]
pub struct ParseActivityTypeError(String);

impl FromStr for ActivityType {
    type Err = ParseActivityTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "training" => Ok(ActivityType::Training),
            "game" | "match" => Ok(ActivityType::Game),
            "tournament" => Ok(ActivityType::Tournament),
            "other" => Ok(ActivityType::Other),
            _ => Err(ParseActivityTypeError(s.to_string())),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityType::Training => write!(f, "training"),
            ActivityType::Game => write!(f, "game"),
            ActivityType::Tournament => write!(f, "tournament"),
            ActivityType::Other => write!(f, "other"),
        }
    }
}

/// Who an activity is shown to: the whole club, or only the owning team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Club,
    Team,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid visibility: {0}")]
pub struct ParseVisibilityError(String);

impl FromStr for Visibility {
    type Err = ParseVisibilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "club" => Ok(Visibility::Club),
            "team" => Ok(Visibility::Team),
            _ => Err(ParseVisibilityError(s.to_string())),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Club => write!(f, "club"),
            Visibility::Team => write!(f, "team"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RepeatKind {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid repeat kind: {0}")]
pub struct ParseRepeatKindError(String);

impl FromStr for RepeatKind {
    type Err = ParseRepeatKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(RepeatKind::Daily),
            "weekly" => Ok(RepeatKind::Weekly),
            "monthly" => Ok(RepeatKind::Monthly),
            _ => Err(ParseRepeatKindError(s.to_string())),
        }
    }
}

impl fmt::Display for RepeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatKind::Daily => write!(f, "daily"),
            RepeatKind::Weekly => write!(f, "weekly"),
            RepeatKind::Monthly => write!(f, "monthly"),
        }
    }
}

/// A set of weekdays, numbered 0 = Sunday through 6 = Saturday.
///
/// Stored as a 7-bit mask in a single INTEGER column. Only meaningful for
/// weekly repeat rules, where it selects which weekdays of each week produce
/// an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct WeekdaySet(u8);

const WEEKDAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    pub fn from_days<I: IntoIterator<Item = u8>>(days: I) -> Result<Self, ParseWeekdaySetError> {
        let mut mask = 0u8;
        for day in days {
            if day > 6 {
                return Err(ParseWeekdaySetError(day.to_string()));
            }
            mask |= 1 << day;
        }
        Ok(WeekdaySet(mask))
    }

    pub fn contains(self, day: u8) -> bool {
        day <= 6 && self.0 & (1 << day) != 0
    }

    pub fn contains_date(self, date: NaiveDate) -> bool {
        self.contains(date.weekday().num_days_from_sunday() as u8)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn days(self) -> Vec<u8> {
        (0u8..7).filter(|day| self.contains(*day)).collect()
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid weekday: {0}")]
pub struct ParseWeekdaySetError(String);

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for day in self.days() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}", WEEKDAY_NAMES[day as usize])?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for WeekdaySet {
    type Err = ParseWeekdaySetError;

    /// Parses a comma-separated weekday list: names (`mon,wed,fri`) or
    /// numbers (`1,3,5`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = 0u8;
        for part in s.split(',') {
            let part = part.trim().to_lowercase();
            if part.is_empty() {
                continue;
            }
            let day = if let Ok(n) = part.parse::<u8>() {
                n
            } else {
                WEEKDAY_NAMES
                    .iter()
                    .position(|name| part.starts_with(name))
                    .map(|i| i as u8)
                    .ok_or_else(|| ParseWeekdaySetError(part.clone()))?
            };
            if day > 6 {
                return Err(ParseWeekdaySetError(part));
            }
            mask |= 1 << day;
        }
        Ok(WeekdaySet(mask))
    }
}

/// The validated repeat rule of a repeating activity.
///
/// `days` is only carried for weekly rules; absence means "the anchor's own
/// weekday, every week". `until` is the inclusive last date of the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatRule {
    pub kind: RepeatKind,
    pub days: Option<WeekdaySet>,
    pub until: NaiveDate,
}

/// The persisted activity record a coach or admin creates.
///
/// `start_at` is the anchor of the series: the activity's own first (and for
/// non-repeating activities, only) occurrence. The three `repeat_*` columns
/// are flat in storage; [`Activity::repeat_rule`] is the validated view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub kind: ActivityType,
    pub visibility: Visibility,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub team_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub is_repeating: bool,
    pub repeat_kind: Option<RepeatKind>,
    pub repeat_days: Option<WeekdaySet>,
    pub repeat_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Calendar date of the anchor occurrence.
    pub fn anchor_date(&self) -> NaiveDate {
        self.start_at.date_naive()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.end_at.map(|end| end - self.start_at)
    }

    /// The validated repeat rule, or `None` for a one-off activity.
    ///
    /// A repeating row that is missing its kind or end date, or whose end
    /// date precedes the anchor, is malformed; callers treat the error as
    /// "no series" rather than failing the whole listing.
    pub fn repeat_rule(&self) -> Result<Option<RepeatRule>, CoreError> {
        if !self.is_repeating {
            return Ok(None);
        }
        let kind = self.repeat_kind.ok_or_else(|| {
            CoreError::InvalidRecurrence("repeating activity has no repeat kind".to_string())
        })?;
        let until = self.repeat_until.ok_or_else(|| {
            CoreError::InvalidRecurrence("repeating activity has no end date".to_string())
        })?;
        if until < self.anchor_date() {
            return Err(CoreError::InvalidRecurrence(format!(
                "series ends {} before its first session {}",
                until,
                self.anchor_date()
            )));
        }
        let days = match kind {
            RepeatKind::Weekly => self.repeat_days.filter(|d| !d.is_empty()),
            _ => None,
        };
        Ok(Some(RepeatRule { kind, days, until }))
    }
}

impl Default for Activity {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            title: String::new(),
            description: None,
            location: None,
            kind: ActivityType::Other,
            visibility: Visibility::Team,
            start_at: Utc::now(),
            end_at: None,
            team_id: None,
            created_by: None,
            is_repeating: false,
            repeat_kind: None,
            repeat_days: None,
            repeat_until: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewActivityData {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub kind: ActivityType,
    pub visibility: Visibility,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub team_name: Option<String>, // Kept for CLI convenience
    pub team_id: Option<Uuid>,     // Used internally
    pub created_by: Option<Uuid>,
    /// When present the activity becomes a repeating series.
    pub repeat: Option<RepeatRule>,
}

impl Default for NewActivityData {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            location: None,
            kind: ActivityType::Other,
            visibility: Visibility::Team,
            start_at: Utc::now(),
            end_at: None,
            team_name: None,
            team_id: None,
            created_by: None,
            repeat: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateActivityData {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub kind: Option<ActivityType>,
    pub visibility: Option<Visibility>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<Option<DateTime<Utc>>>,
    pub team_id: Option<Option<Uuid>>,
    /// `Some(None)` converts the series back to a one-off activity.
    pub repeat: Option<Option<RepeatRule>>,
}

/// One concrete happening of an activity, produced on demand and never
/// persisted.
///
/// Anchors carry the template's own timestamps and a `Plain` identity.
/// Derived occurrences shift the anchor timestamps by whole elapsed days,
/// which keeps the stored time-of-day exact regardless of month lengths, and
/// carry the composite identity plus a back-reference to the template.
#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct Occurrence {
    #[serde_as(as = "DisplayFromStr")]
    pub id: OccurrenceId,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub parent_activity_id: Option<Uuid>,
    pub is_derived: bool,
    pub activity: Activity,
}

impl Occurrence {
    /// The occurrence an activity record implies by itself.
    pub fn anchor(activity: Activity) -> Self {
        Self {
            id: OccurrenceId::Plain(activity.id),
            start_at: activity.start_at,
            end_at: activity.end_at,
            parent_activity_id: None,
            is_derived: false,
            activity,
        }
    }

    /// A generated occurrence of `activity` on `date`.
    pub fn derived(activity: Activity, date: NaiveDate) -> Self {
        let elapsed = date.signed_duration_since(activity.anchor_date());
        Self {
            id: OccurrenceId::Derived {
                activity_id: activity.id,
                date,
            },
            start_at: activity.start_at + elapsed,
            end_at: activity.end_at.map(|end| end + elapsed),
            parent_activity_id: Some(activity.id),
            is_derived: true,
            activity,
        }
    }

    /// Calendar date this occurrence falls on.
    pub fn date(&self) -> NaiveDate {
        self.start_at.date_naive()
    }

    /// The wire-format key consumers persist per-occurrence data under.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod weekday_set_tests {
        use super::*;

        #[test]
        fn from_days_and_contains() {
            let set = WeekdaySet::from_days([1, 3, 5]).unwrap();
            assert!(set.contains(1));
            assert!(set.contains(3));
            assert!(set.contains(5));
            assert!(!set.contains(0));
            assert!(!set.contains(6));
            assert_eq!(set.days(), vec![1, 3, 5]);
        }

        #[test]
        fn from_days_rejects_out_of_range() {
            assert!(WeekdaySet::from_days([7]).is_err());
        }

        #[test]
        fn contains_date_uses_sunday_based_numbering() {
            let mondays = WeekdaySet::from_days([1]).unwrap();
            // 2024-01-01 was a Monday.
            assert!(mondays.contains_date(date(2024, 1, 1)));
            assert!(!mondays.contains_date(date(2024, 1, 2)));
        }

        #[rstest]
        #[case("mon,wed,fri", vec![1, 3, 5])]
        #[case("1,3,5", vec![1, 3, 5])]
        #[case("Sun, Sat", vec![0, 6])]
        #[case("tuesday,thursday", vec![2, 4])]
        fn parses_names_and_numbers(#[case] input: &str, #[case] expected: Vec<u8>) {
            let set: WeekdaySet = input.parse().unwrap();
            assert_eq!(set.days(), expected);
        }

        #[test]
        fn rejects_unknown_names() {
            assert!("mon,blursday".parse::<WeekdaySet>().is_err());
            assert!("8".parse::<WeekdaySet>().is_err());
        }

        #[test]
        fn display_round_trips() {
            let set = WeekdaySet::from_days([1, 3, 5]).unwrap();
            assert_eq!(set.to_string(), "mon,wed,fri");
            assert_eq!(set.to_string().parse::<WeekdaySet>().unwrap(), set);
        }
    }

    mod repeat_rule_tests {
        use super::*;
        use chrono::TimeZone;

        fn repeating_activity() -> Activity {
            Activity {
                start_at: Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap(),
                is_repeating: true,
                repeat_kind: Some(RepeatKind::Weekly),
                repeat_until: Some(date(2024, 3, 1)),
                ..Default::default()
            }
        }

        #[test]
        fn non_repeating_has_no_rule() {
            let activity = Activity::default();
            assert!(activity.repeat_rule().unwrap().is_none());
        }

        #[test]
        fn valid_rule_is_returned() {
            let rule = repeating_activity().repeat_rule().unwrap().unwrap();
            assert_eq!(rule.kind, RepeatKind::Weekly);
            assert_eq!(rule.until, date(2024, 3, 1));
            assert_eq!(rule.days, None);
        }

        #[test]
        fn missing_kind_is_malformed() {
            let mut activity = repeating_activity();
            activity.repeat_kind = None;
            assert!(matches!(
                activity.repeat_rule(),
                Err(CoreError::InvalidRecurrence(_))
            ));
        }

        #[test]
        fn missing_until_is_malformed() {
            let mut activity = repeating_activity();
            activity.repeat_until = None;
            assert!(matches!(
                activity.repeat_rule(),
                Err(CoreError::InvalidRecurrence(_))
            ));
        }

        #[test]
        fn until_before_anchor_is_malformed() {
            let mut activity = repeating_activity();
            activity.repeat_until = Some(date(2023, 12, 31));
            assert!(matches!(
                activity.repeat_rule(),
                Err(CoreError::InvalidRecurrence(_))
            ));
        }

        #[test]
        fn weekday_set_ignored_outside_weekly() {
            let mut activity = repeating_activity();
            activity.repeat_kind = Some(RepeatKind::Daily);
            activity.repeat_days = Some(WeekdaySet::from_days([1]).unwrap());
            let rule = activity.repeat_rule().unwrap().unwrap();
            assert_eq!(rule.days, None);
        }

        #[test]
        fn empty_weekday_set_treated_as_absent() {
            let mut activity = repeating_activity();
            activity.repeat_days = Some(WeekdaySet::EMPTY);
            let rule = activity.repeat_rule().unwrap().unwrap();
            assert_eq!(rule.days, None);
        }
    }

    mod occurrence_tests {
        use super::*;
        use chrono::TimeZone;

        #[test]
        fn anchor_keeps_template_timestamps() {
            let activity = Activity {
                start_at: Utc.with_ymd_and_hms(2024, 1, 1, 18, 30, 0).unwrap(),
                end_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap()),
                ..Default::default()
            };
            let id = activity.id;
            let occurrence = Occurrence::anchor(activity);
            assert_eq!(occurrence.id, OccurrenceId::Plain(id));
            assert!(!occurrence.is_derived);
            assert_eq!(occurrence.parent_activity_id, None);
            assert_eq!(occurrence.date(), date(2024, 1, 1));
        }

        #[test]
        fn derived_shifts_by_whole_days_preserving_time_of_day() {
            let activity = Activity {
                start_at: Utc.with_ymd_and_hms(2024, 1, 31, 18, 30, 0).unwrap(),
                end_at: Some(Utc.with_ymd_and_hms(2024, 1, 31, 20, 0, 0).unwrap()),
                ..Default::default()
            };
            let id = activity.id;
            let occurrence = Occurrence::derived(activity, date(2024, 2, 29));
            assert_eq!(
                occurrence.start_at,
                Utc.with_ymd_and_hms(2024, 2, 29, 18, 30, 0).unwrap()
            );
            assert_eq!(
                occurrence.end_at,
                Some(Utc.with_ymd_and_hms(2024, 2, 29, 20, 0, 0).unwrap())
            );
            assert!(occurrence.is_derived);
            assert_eq!(occurrence.parent_activity_id, Some(id));
            assert_eq!(occurrence.key(), format!("{}-20240229", id));
        }
    }
}
