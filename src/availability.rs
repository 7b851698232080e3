use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};

/// Bookable start times, one per hour of the business day.
pub const DAILY_SLOTS: [NaiveTime; 8] = [
    slot(9),
    slot(10),
    slot(11),
    slot(12),
    slot(13),
    slot(14),
    slot(15),
    slot(16),
];

const fn slot(hour: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(time) => time,
        None => panic!("slot hour out of range"),
    }
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn is_daily_slot(time: NaiveTime) -> bool {
    DAILY_SLOTS.contains(&time)
}

/// Slots of `daily` not present in `booked`, in `daily` order.
///
/// An empty result means the day is fully booked.
pub fn available_slots(booked: &HashSet<NaiveTime>, daily: &[NaiveTime]) -> Vec<NaiveTime> {
    daily
        .iter()
        .copied()
        .filter(|time| !booked.contains(time))
        .collect()
}

/// Convenience over raw `HH:MM` strings from the booking table. Unparseable
/// entries are ignored.
pub fn available_from_strings<S: AsRef<str>>(booked: &[S]) -> Vec<NaiveTime> {
    let booked: HashSet<NaiveTime> = booked
        .iter()
        .filter_map(|value| parse_time(value.as_ref()))
        .collect();
    available_slots(&booked, &DAILY_SLOTS)
}
