//! Expansion of repeating activities into concrete occurrences.
//!
//! The expander is pure: it performs no I/O and never mutates the template.
//! Occurrences exist only for the duration of a query; per-occurrence data is
//! keyed externally by the occurrence identity, so nothing generated here is
//! ever written back.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};

use crate::error::CoreError;
use crate::models::{Activity, Occurrence, RepeatKind, RepeatRule};

/// RecurrenceExpander: turns one repeating activity into the occurrences that
/// fall inside a query window.
///
/// Construction validates the repeat rule; a malformed rule (missing kind or
/// end date, end date before the anchor) is an error here so that callers can
/// skip the series and keep the rest of a listing intact.
#[derive(Debug)]
pub struct RecurrenceExpander {
    activity: Activity,
    rule: RepeatRule,
}

impl RecurrenceExpander {
    pub fn new(activity: Activity) -> Result<Self, CoreError> {
        let rule = activity.repeat_rule()?.ok_or_else(|| {
            CoreError::InvalidRecurrence("activity does not repeat".to_string())
        })?;
        Ok(Self { activity, rule })
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn rule(&self) -> &RepeatRule {
        &self.rule
    }

    /// Candidate dates after the anchor, ascending, unbounded.
    ///
    /// The anchor date itself is never produced: the template record is the
    /// anchor occurrence and must not be duplicated by expansion. Monthly
    /// steps are always computed from the anchor (anchor + n months) so that
    /// chrono's clamp-to-last-day behavior for short months does not
    /// accumulate: Jan 31 steps to Feb 29 (leap), Mar 31, Apr 30.
    fn candidate_dates(&self) -> Box<dyn Iterator<Item = NaiveDate> + '_> {
        let anchor = self.activity.anchor_date();
        match self.rule.kind {
            RepeatKind::Daily => Box::new((1i64..).map(move |n| anchor + Duration::days(n))),
            RepeatKind::Weekly => match self.rule.days {
                // Explicit weekday set: walk day by day and keep the members,
                // so "every Mon/Wed/Fri" is one template.
                Some(days) => Box::new(
                    (1i64..)
                        .map(move |n| anchor + Duration::days(n))
                        .filter(move |d| days.contains_date(*d)),
                ),
                None => Box::new((1i64..).map(move |n| anchor + Duration::weeks(n))),
            },
            RepeatKind::Monthly => Box::new(
                (1u32..).filter_map(move |n| anchor.checked_add_months(Months::new(n))),
            ),
        }
    }

    /// Generates the derived occurrences whose calendar dates fall within
    /// `[window_start, window_end]`, both inclusive by date.
    ///
    /// The anchor occurrence is not part of the output; the caller seeds it
    /// from the template record. Timestamps are the anchor's shifted by whole
    /// elapsed days, preserving the stored time-of-day exactly.
    pub fn occurrences_between(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Vec<Occurrence> {
        let window_start = window_start.date_naive();
        let window_end = window_end.date_naive();
        if window_start > window_end {
            return Vec::new();
        }
        // Fast path: the series cannot intersect the window. The stepping
        // loop below would produce nothing either way.
        if self.activity.anchor_date() > window_end || window_start > self.rule.until {
            return Vec::new();
        }

        self.candidate_dates()
            .take_while(|date| *date <= self.rule.until)
            .filter(|date| *date >= window_start && *date <= window_end)
            .map(|date| Occurrence::derived(self.activity.clone(), date))
            .collect()
    }

    /// First occurrence strictly after the given instant, or `None` if the
    /// series has ended by then.
    pub fn next_occurrence_after(&self, after: DateTime<Utc>) -> Option<Occurrence> {
        self.candidate_dates()
            .take_while(|date| *date <= self.rule.until)
            .map(|date| Occurrence::derived(self.activity.clone(), date))
            .find(|occurrence| occurrence.start_at > after)
    }

    /// Up to `count` upcoming occurrences starting at `from`.
    pub fn preview_occurrences(&self, from: DateTime<Utc>, count: usize) -> Vec<Occurrence> {
        self.candidate_dates()
            .take_while(|date| *date <= self.rule.until)
            .map(|date| Occurrence::derived(self.activity.clone(), date))
            .filter(|occurrence| occurrence.start_at >= from)
            .take(count)
            .collect()
    }
}
