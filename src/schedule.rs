use chrono::{NaiveDateTime, TimeDelta, Timelike};
use std::time::Duration;

/// Second within the minute at which ticks fire, leaving the producer a moment to append.
pub const TICK_SECOND: u32 = 1;

/// Next `HH:MM:01` strictly after the current minute, e.g. 12:03:47 -> 12:04:01.
pub fn next_tick_after(now: NaiveDateTime) -> NaiveDateTime {
    let next_minute = now + TimeDelta::minutes(1);
    next_minute
        .with_second(TICK_SECOND)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(next_minute)
}

pub fn delay_until_next_tick(now: NaiveDateTime) -> Duration {
    (next_tick_after(now) - now).to_std().unwrap_or_default()
}
