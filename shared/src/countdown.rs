//! Festival countdown: a days/hours/minutes/seconds duration that loses one
//! second per tick and stops at zero.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DEFAULT_COUNTDOWN_DAYS;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountdownError {
    #[error("hours must be below 24, got {0}")]
    HoursOutOfRange(u32),
    #[error("minutes must be below 60, got {0}")]
    MinutesOutOfRange(u32),
    #[error("seconds must be below 60, got {0}")]
    SecondsOutOfRange(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Countdown {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            days: DEFAULT_COUNTDOWN_DAYS,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

impl Countdown {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub fn new(days: u32, hours: u32, minutes: u32, seconds: u32) -> Result<Self, CountdownError> {
        let countdown = Self {
            days,
            hours,
            minutes,
            seconds,
        };
        countdown.validate()?;
        Ok(countdown)
    }

    #[must_use]
    pub fn from_total_seconds(total: u64) -> Self {
        let days = u32::try_from(total / SECS_PER_DAY).unwrap_or(u32::MAX);
        let rem = total % SECS_PER_DAY;
        // The remainders are bounded by the unit sizes, so these never truncate.
        #[allow(clippy::cast_possible_truncation)]
        Self {
            days,
            hours: (rem / SECS_PER_HOUR) as u32,
            minutes: ((rem % SECS_PER_HOUR) / SECS_PER_MINUTE) as u32,
            seconds: (rem % SECS_PER_MINUTE) as u32,
        }
    }

    pub fn validate(&self) -> Result<(), CountdownError> {
        if self.hours >= 24 {
            return Err(CountdownError::HoursOutOfRange(self.hours));
        }
        if self.minutes >= 60 {
            return Err(CountdownError::MinutesOutOfRange(self.minutes));
        }
        if self.seconds >= 60 {
            return Err(CountdownError::SecondsOutOfRange(self.seconds));
        }
        Ok(())
    }

    #[must_use]
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.days) * SECS_PER_DAY
            + u64::from(self.hours) * SECS_PER_HOUR
            + u64::from(self.minutes) * SECS_PER_MINUTE
            + u64::from(self.seconds)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        *self == Self::ZERO
    }

    /// Removes one second, borrowing seconds from minutes, minutes from hours
    /// and hours from days. Returns `false` (and changes nothing) at zero.
    pub fn tick(&mut self) -> bool {
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else if self.hours > 0 {
            self.hours -= 1;
            self.minutes = 59;
            self.seconds = 59;
        } else if self.days > 0 {
            self.days -= 1;
            self.hours = 23;
            self.minutes = 59;
            self.seconds = 59;
        } else {
            return false;
        }
        true
    }
}
