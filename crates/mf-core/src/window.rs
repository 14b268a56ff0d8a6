//! Half-open archive row window for a configured date range.

use core::ops::Range;

use chrono::NaiveDateTime;

use crate::error::{CoreError, CoreResult};
use crate::time::TimeAxis;

/// Rows `[start, end)` of an hourly archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub start: usize,
    pub end: usize,
}

impl RowWindow {
    /// Compute the row window for `start..end` on `axis`.
    ///
    /// `end = None` selects the single row at `start`. Both offsets are
    /// floored to whole hours.
    pub fn for_dates(
        axis: &TimeAxis,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    ) -> CoreResult<Self> {
        let start_row = axis.hour_offset(start);
        if start_row < 0 {
            return Err(CoreError::NegativeOffset {
                what: "start date precedes archive time origin",
                offset: start_row,
            });
        }

        let end_row = match end {
            None => start_row + 1,
            Some(end) => axis.hour_offset(end),
        };
        if end_row < start_row {
            return Err(CoreError::InvalidWindow {
                what: "end date precedes start date",
            });
        }

        Ok(Self {
            start: start_row as usize,
            end: end_row as usize,
        })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// True when every row of the window exists in an archive of `row_count` rows.
    pub fn fits(&self, row_count: usize) -> bool {
        self.end <= row_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;

    fn axis() -> TimeAxis {
        TimeAxis::parse("hours since 2007-01-01T00:00:00").unwrap()
    }

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn default_window_rows() {
        let w = RowWindow::for_dates(
            &axis(),
            ts("2007-01-01T05:00:00"),
            Some(ts("2007-01-10T05:00:00")),
        )
        .unwrap();
        assert_eq!(w, RowWindow { start: 5, end: 221 });
        assert_eq!(w.len(), 216);
        assert!(w.fits(221));
        assert!(!w.fits(220));
    }

    #[test]
    fn single_instant_is_one_row() {
        let w = RowWindow::for_dates(&axis(), ts("2007-01-02T00:00:00"), None).unwrap();
        assert_eq!(w.range(), 24..25);
    }

    #[test]
    fn start_before_origin_fails() {
        let err = RowWindow::for_dates(&axis(), ts("2006-12-31T23:00:00"), None).unwrap_err();
        assert!(matches!(err, CoreError::NegativeOffset { offset: -1, .. }));
    }

    #[test]
    fn reversed_dates_fail() {
        let err = RowWindow::for_dates(
            &axis(),
            ts("2007-01-02T00:00:00"),
            Some(ts("2007-01-01T00:00:00")),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidWindow { .. }));
    }

    #[test]
    fn equal_dates_give_empty_window() {
        let t = ts("2007-01-02T00:00:00");
        let w = RowWindow::for_dates(&axis(), t, Some(t)).unwrap();
        assert!(w.is_empty());
    }
}
