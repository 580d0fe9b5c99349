//! Daily signing blackout window
//!
//! The back end refuses signatures during a configured time range each day
//! (maintenance of the timestamping service). The range is read in the
//! registry office's time zone. Both ends are excluded and the range never
//! wraps past midnight: a start after the end blocks nothing.

use chrono::{DateTime, FixedOffset, NaiveTime, Offset, Utc};
use std::str::FromStr;

use crate::types::{Result, SigningError};

/// Time range during which signing is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningWindow {
    start: NaiveTime,
    end: NaiveTime,
    /// UTC offset of the registry office
    offset: FixedOffset,
}

impl SigningWindow {
    /// Window read in UTC until [`with_offset`](Self::with_offset) says otherwise
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            offset: Utc.fix(),
        }
    }

    /// Parse two `HH:MM` times
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(parse_time(start)?, parse_time(end)?))
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Strictly after start and strictly before end, on the office's clock
    pub fn is_blocked(&self, time: NaiveTime) -> bool {
        time > self.start && time < self.end
    }

    pub fn is_blocked_at(&self, now: DateTime<Utc>) -> bool {
        self.is_blocked(now.with_timezone(&self.offset).time())
    }
}

impl FromStr for SigningWindow {
    type Err = SigningError;

    /// `"HH:MM-HH:MM"`
    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| SigningError::InvalidWindow(format!("expected START-END, got '{}'", s)))?;
        Self::parse(start.trim(), end.trim())
    }
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| SigningError::InvalidWindow(format!("'{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_same_day_window_excludes_both_ends() {
        let window = SigningWindow::parse("12:00", "14:00").unwrap();
        assert!(!window.is_blocked(t(11, 59)));
        assert!(!window.is_blocked(t(12, 0)));
        assert!(window.is_blocked(t(12, 1)));
        assert!(window.is_blocked(t(13, 30)));
        assert!(!window.is_blocked(t(14, 0)));
    }

    #[test]
    fn test_start_after_end_never_blocks() {
        let window: SigningWindow = "22:00-06:00".parse().unwrap();
        assert!(!window.is_blocked(t(23, 0)));
        assert!(!window.is_blocked(t(0, 0)));
        assert!(!window.is_blocked(t(5, 59)));
        assert!(!window.is_blocked(t(12, 0)));
    }

    #[test]
    fn test_blocked_at_uses_office_offset() {
        // 12:30 UTC is 13:30 in a UTC+1 office
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 30, 0).unwrap();
        let window = SigningWindow::parse("13:00", "14:00").unwrap();
        assert!(!window.is_blocked_at(now));

        let window = window.with_offset(FixedOffset::east_opt(3600).unwrap());
        assert!(window.is_blocked_at(now));
    }

    #[test]
    fn test_empty_window() {
        let window = SigningWindow::parse("03:00", "03:00").unwrap();
        assert!(!window.is_blocked(t(3, 0)));
        assert!(!window.is_blocked(t(15, 0)));
    }

    #[test]
    fn test_invalid_window() {
        assert!(matches!(
            "25:00-26:00".parse::<SigningWindow>(),
            Err(SigningError::InvalidWindow(_))
        ));
        assert!(matches!(
            "noon".parse::<SigningWindow>(),
            Err(SigningError::InvalidWindow(_))
        ));
    }
}
