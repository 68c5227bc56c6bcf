//! # History Filters
//!
//! Decides which sales a user may see and which days are in view.
//!
//! ## Scoping Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ?inicio=&fim=&barbeiro=                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DateRange::from_query                                                  │
//! │       ├── both blank?   → today..today  (daily reset)                   │
//! │       └── otherwise     → parse each present bound, absent = open       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleFilter::scoped                                                     │
//! │       ├── barbeiro role → barber = self, always                         │
//! │       └── admin role    → barber = ?barbeiro, or everyone               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::Role;
use crate::validation::{normalize_username, parse_date, ValidationResult};

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive range of sale dates. `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// A range covering only `day`.
    pub const fn single_day(day: NaiveDate) -> Self {
        DateRange {
            start: Some(day),
            end: Some(day),
        }
    }

    /// Builds the range from the raw `inicio`/`fim` query values.
    ///
    /// Blank strings count as missing. When both are missing the range is
    /// `today`, so the history page starts each day empty.
    ///
    /// ## Example
    /// ```rust
    /// use barber_core::filter::DateRange;
    /// use chrono::NaiveDate;
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
    ///
    /// let range = DateRange::from_query(None, Some(""), today).unwrap();
    /// assert_eq!(range, DateRange::single_day(today));
    ///
    /// let range = DateRange::from_query(Some("2026-10-01"), None, today).unwrap();
    /// assert_eq!(range.end, None);
    /// ```
    pub fn from_query(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> ValidationResult<Self> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());

        if start.is_none() && end.is_none() {
            return Ok(DateRange::single_day(today));
        }

        Ok(DateRange {
            start: start.map(|s| parse_date("inicio", s)).transpose()?,
            end: end.map(|s| parse_date("fim", s)).transpose()?,
        })
    }

    /// ISO strings for echoing the bounds back into the filter form.
    pub fn query_values(&self) -> (String, String) {
        let fmt = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());
        (
            fmt(self.start).unwrap_or_default(),
            fmt(self.end).unwrap_or_default(),
        )
    }
}

/// First day of the month containing `today`.
///
/// ## Example
/// ```rust
/// use barber_core::filter::month_start;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
/// assert_eq!(month_start(today), NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
/// ```
pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

// =============================================================================
// Sale Filter
// =============================================================================

/// What the repository should return for a history or export request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleFilter {
    /// Restrict to one barber; `None` = every barber.
    pub barber: Option<String>,
    pub range: DateRange,
}

impl SaleFilter {
    /// Applies role scoping on top of a date range.
    ///
    /// A barber only ever sees their own sales, whatever they ask for.
    /// An admin sees everyone, or a single barber when `requested_barber`
    /// is non-blank.
    pub fn scoped(
        username: &str,
        role: Role,
        range: DateRange,
        requested_barber: Option<&str>,
    ) -> Self {
        let barber = if role.is_admin() {
            requested_barber
                .map(normalize_username)
                .filter(|b| !b.is_empty())
        } else {
            Some(username.to_string())
        };

        SaleFilter { barber, range }
    }

    /// Whose sales count towards the day/month totals.
    ///
    /// Totals follow the role only; the admin's barber filter narrows the
    /// table, not the shop-wide totals.
    pub fn totals_scope(username: &str, role: Role) -> Option<String> {
        (!role.is_admin()).then(|| username.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
