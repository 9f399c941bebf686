//! Slot grid computation
//!
//! A slot is a start time on a fixed-step grid inside a working-hour window.
//! Windows are inclusive at both ends: a 10:00-14:00 window with a 15 minute
//! step yields 10:00, 10:15, ..., 14:00.

use std::collections::{BTreeSet, HashSet};

use chrono::{Duration, NaiveTime};

use crate::models::schedule::{hhmm, TimeWindow};

/// Ticks of one window, from `start` while not past `end`
pub fn window_ticks(window: &TimeWindow, step: Duration) -> Vec<NaiveTime> {
    let mut ticks = Vec::new();
    if step <= Duration::zero() {
        return ticks;
    }

    let mut current = window.start;
    while current <= window.end {
        ticks.push(current);
        let (next, wrapped) = current.overflowing_add_signed(step);
        // Stop at midnight instead of wrapping into the next day
        if wrapped != 0 {
            break;
        }
        current = next;
    }
    ticks
}

/// Union of the ticks of every window, ascending and without duplicates
pub fn slot_grid<'a, I>(windows: I, step: Duration) -> BTreeSet<NaiveTime>
where
    I: IntoIterator<Item = &'a TimeWindow>,
{
    windows
        .into_iter()
        .flat_map(|window| window_ticks(window, step))
        .collect()
}

/// Grid minus reserved times, still ascending
pub fn free_slots(grid: &BTreeSet<NaiveTime>, reserved: &HashSet<NaiveTime>) -> Vec<NaiveTime> {
    grid.iter()
        .filter(|tick| !reserved.contains(tick))
        .copied()
        .collect()
}

pub fn labels(slots: &[NaiveTime]) -> Vec<String> {
    slots.iter().map(|t| hhmm::label(*t)).collect()
}
