//! 시계 어댑터.
//!
//! `Clock` 포트 구현.

use appusage_core::ports::signals::Clock;
use chrono::{DateTime, FixedOffset, Local};

/// 시스템 로컬 시계
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// 고정 시각을 돌려주는 시계 (재현 가능한 수집용)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn system_clock_hour_in_range() {
        let hour = SystemClock.now().hour();
        assert!(hour < 24);
    }

    #[test]
    fn fixed_clock_keeps_local_hour() {
        // UTC+9 14시 = UTC 05시
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let at = kst.with_ymd_and_hms(2026, 5, 4, 14, 0, 0).unwrap();
        let clock = FixedClock(at);

        assert_eq!(clock.now().hour(), 14);
        assert_eq!(clock.now().with_timezone(&chrono::Utc).hour(), 5);
    }
}
