//! Open-now evaluation against a weekly schedule.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use nearby_core::{LiveStatus, OperatingHours};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Source of the current instant. Injected so open-now is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenState {
    Open,
    Closed,
    /// Schedule entry exists but its times could not be read.
    OpenByDefault,
}

impl OpenState {
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, OpenState::Open | OpenState::OpenByDefault)
    }
}

/// Decides whether a business is open at local wall time `now`.
///
/// An offline business is always closed. Overnight windows (close earlier
/// than open) wrap past midnight.
#[must_use]
pub fn evaluate(hours: &OperatingHours, status: LiveStatus, now: NaiveDateTime) -> OpenState {
    if status != LiveStatus::Online {
        return OpenState::Closed;
    }

    let Some(day) = hours.day(now.weekday()) else {
        return OpenState::Closed;
    };
    if day.closed {
        return OpenState::Closed;
    }

    let open = day.open.as_deref().and_then(parse_hhmm);
    let close = day.close.as_deref().and_then(parse_hhmm);
    let (Some(open), Some(close)) = (open, close) else {
        return OpenState::OpenByDefault;
    };

    let minute = now.hour() * 60 + now.minute();
    let is_open = if close < open {
        minute >= open || minute <= close
    } else {
        open <= minute && minute <= close
    };

    if is_open {
        OpenState::Open
    } else {
        OpenState::Closed
    }
}

/// Minutes since midnight for `HH:MM` or `HH:MM:SS`. `24:00` is end of day.
fn parse_hhmm(raw: &str) -> Option<u32> {
    let mut parts = raw.trim().split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes: u32 = parts.next()?.trim().parse().ok()?;
    if let Some(seconds) = parts.next() {
        let seconds: u32 = seconds.trim().parse().ok()?;
        if seconds >= 60 {
            return None;
        }
    }
    if parts.next().is_some() || minutes >= 60 {
        return None;
    }

    let total = hours.checked_mul(60)?.checked_add(minutes)?;
    (total <= MINUTES_PER_DAY).then_some(total)
}
