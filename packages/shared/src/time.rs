//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current time with the local UTC offset attached
    fn now(&self) -> DateTime<FixedOffset>;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<FixedOffset>,
}

impl FixedClock {
    /// Create a new fixed clock with the given instant
    pub fn new(fixed_time: DateTime<FixedOffset>) -> Self {
        Self { fixed_time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.fixed_time
    }
}

/// Format an instant as ISO-8601 (RFC 3339) with microseconds and offset.
///
/// `2024-05-01T20:15:03.123456+09:00`
pub fn to_iso8601(instant: &DateTime<FixedOffset>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Parse an ISO-8601 (RFC 3339) timestamp.
pub fn parse_iso8601(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

/// Short wall-clock form for terminal display, in the instant's own offset.
pub fn to_clock_time(instant: &DateTime<FixedOffset>) -> String {
    instant.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_instant() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2023-01-01T09:30:15.123456+09:00").unwrap()
    }

    #[test]
    fn test_system_clock_returns_increasing_timestamps() {
        // テスト項目: SystemClock が単調に進む時刻を返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let first = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = clock.now();

        // then (期待する結果):
        assert!(second >= first);
    }

    #[test]
    fn test_fixed_clock_returns_consistent_timestamp() {
        // テスト項目: FixedClock が何度呼んでも同じ時刻を返す
        // given (前提条件):
        let clock = FixedClock::new(sample_instant());

        // when (操作):
        let first = clock.now();
        let second = clock.now();

        // then (期待する結果):
        assert_eq!(first, sample_instant());
        assert_eq!(second, sample_instant());
    }

    #[test]
    fn test_to_iso8601_keeps_micros_and_offset() {
        // テスト項目: マイクロ秒とオフセットを含む ISO-8601 文字列になる
        // given (前提条件):
        let instant = sample_instant();

        // when (操作):
        let result = to_iso8601(&instant);

        // then (期待する結果):
        assert_eq!(result, "2023-01-01T09:30:15.123456+09:00");
    }

    #[test]
    fn test_parse_iso8601_accepts_formatted_output() {
        // テスト項目: to_iso8601 の出力を再び解釈できる
        // given (前提条件):
        let formatted = to_iso8601(&sample_instant());

        // when (操作):
        let parsed = parse_iso8601(&formatted);

        // then (期待する結果):
        assert_eq!(parsed, Some(sample_instant()));
    }

    #[test]
    fn test_parse_iso8601_rejects_garbage() {
        // テスト項目: ISO-8601 でない文字列は None になる
        assert_eq!(parse_iso8601("yesterday"), None);
    }

    #[test]
    fn test_to_clock_time_uses_hours_and_minutes() {
        // テスト項目: 端末表示用に時:分だけを返す
        assert_eq!(to_clock_time(&sample_instant()), "09:30");
    }
}
