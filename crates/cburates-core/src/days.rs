//! Inclusive calendar-day ranges.

use chrono::NaiveDate;

use crate::CoreError;

/// A validated inclusive span of calendar days.
///
/// Construction rejects `end < start`, so every `DayRange` yields at least one
/// day. Iterating borrows nothing, so the same range can be walked any number
/// of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DayRange {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRange`] when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, both endpoints included.
    #[must_use]
    pub fn len(&self) -> u64 {
        // end >= start is guaranteed by `new`
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    /// Always `false`; present to pair with [`DayRange::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn iter(&self) -> Days {
        Days {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DayRange {
    type Item = NaiveDate;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.iter()
    }
}

impl IntoIterator for &DayRange {
    type Item = NaiveDate;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.iter()
    }
}

/// Lazy iterator over the days of a [`DayRange`].
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        // current < end past this check, so succ_opt cannot run off NaiveDate::MAX
        self.next = if current == self.end {
            None
        } else {
            current.succ_opt()
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.next.map_or(0, |next| {
            usize::try_from((self.end - next).num_days() + 1).unwrap_or(0)
        });
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Days {}

impl std::iter::FusedIterator for Days {}
