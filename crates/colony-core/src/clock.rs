//! World clock for the Colony simulation.
//!
//! The tick counter is the single source of truth for time. Hour of day
//! and day number are derived from it and the [`TimeConfig`], never stored.
//! All derivations use checked arithmetic.

use crate::config::TimeConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid time configuration (e.g. zero ticks per hour).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Tick counter with derived hour of day and day number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldClock {
    /// Current tick (0 before the first tick runs).
    tick: u64,

    /// Ticks in one in-game hour.
    ticks_per_hour: u64,

    /// Hours in one in-game day.
    hours_per_day: u64,
}

impl WorldClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if either rate is zero or a
    /// day's length in ticks overflows.
    pub fn new(config: &TimeConfig) -> Result<Self, ClockError> {
        Self::from_parts(0, config.ticks_per_hour, config.hours_per_day)
    }

    /// Create a clock at an arbitrary tick (for tests and restores).
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_parts(
        tick: u64,
        ticks_per_hour: u64,
        hours_per_day: u64,
    ) -> Result<Self, ClockError> {
        if ticks_per_hour == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "ticks_per_hour must be at least 1".to_owned(),
            });
        }
        if hours_per_day == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "hours_per_day must be at least 1".to_owned(),
            });
        }
        if ticks_per_hour.checked_mul(hours_per_day).is_none() {
            return Err(ClockError::InvalidConfig {
                reason: "ticks per day overflow".to_owned(),
            });
        }
        Ok(Self {
            tick,
            ticks_per_hour,
            hours_per_day,
        })
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] at `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Current tick.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Ticks in one hour.
    pub const fn ticks_per_hour(&self) -> u64 {
        self.ticks_per_hour
    }

    /// Hours in one day.
    pub const fn hours_per_day(&self) -> u64 {
        self.hours_per_day
    }

    /// Ticks in one day.
    pub const fn ticks_per_day(&self) -> u64 {
        // Checked at construction.
        self.ticks_per_hour.saturating_mul(self.hours_per_day)
    }

    /// Hour of the current day, from 0.
    pub const fn hour_of_day(&self) -> u64 {
        let Some(hours) = self.tick.checked_div(self.ticks_per_hour) else {
            return 0;
        };
        match hours.checked_rem(self.hours_per_day) {
            Some(hour) => hour,
            None => 0,
        }
    }

    /// Day number, from 0.
    pub const fn day(&self) -> u64 {
        match self.tick.checked_div(self.ticks_per_day()) {
            Some(day) => day,
            None => 0,
        }
    }

    /// Ticks left until the next day starts.
    pub const fn ticks_until_next_day(&self) -> u64 {
        let per_day = self.ticks_per_day();
        let within = match self.tick.checked_rem(per_day) {
            Some(within) => within,
            None => 0,
        };
        per_day.saturating_sub(within)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn make_clock() -> WorldClock {
        WorldClock::new(&TimeConfig {
            ticks_per_hour: 10,
            hours_per_day: 24,
        })
        .unwrap()
    }

    #[test]
    fn clock_starts_at_tick_zero() {
        let clock = make_clock();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.hour_of_day(), 0);
        assert_eq!(clock.day(), 0);
    }

    #[test]
    fn clock_advances() {
        let mut clock = make_clock();
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn hours_and_days_roll_over() {
        let clock = WorldClock::from_parts(245, 10, 24).unwrap();
        // 245 ticks = 24 full hours and a half.
        assert_eq!(clock.hour_of_day(), 0);
        assert_eq!(clock.day(), 1);

        let clock = WorldClock::from_parts(239, 10, 24).unwrap();
        assert_eq!(clock.hour_of_day(), 23);
        assert_eq!(clock.day(), 0);
        assert_eq!(clock.ticks_until_next_day(), 1);
    }

    #[test]
    fn ticks_per_day_is_derived() {
        assert_eq!(make_clock().ticks_per_day(), 240);
    }

    #[test]
    fn overflow_is_an_error() {
        let mut clock = WorldClock::from_parts(u64::MAX, 10, 24).unwrap();
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
        assert_eq!(clock.tick(), u64::MAX);
    }

    #[test]
    fn zero_rates_are_rejected() {
        assert!(WorldClock::from_parts(0, 0, 24).is_err());
        assert!(WorldClock::from_parts(0, 10, 0).is_err());
        assert!(WorldClock::from_parts(0, u64::MAX, 2).is_err());
    }
}
