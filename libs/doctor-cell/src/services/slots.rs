//! Pure slot arithmetic over a doctor's working window.
//!
//! No I/O and no shared state; everything here is a deterministic function of
//! its arguments, safe to call from any number of concurrent requests.

use std::collections::HashSet;

use chrono::{Duration, NaiveTime};
use thiserror::Error;

const HHMM: &str = "%H:%M";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid time format (expected HH:MM): {0}")]
    Format(String),
}

/// Strict "HH:MM" parse. Either succeeds or the input is rejected; callers
/// turn the failure into a user-facing validation error.
pub fn parse_hhmm(value: &str) -> Result<NaiveTime, SlotError> {
    NaiveTime::parse_from_str(value, HHMM).map_err(|_| SlotError::Format(value.to_string()))
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format(HHMM).to_string()
}

/// Candidate appointment start times inside [start, end].
///
/// Emits start, start+d, start+2d, ... while the slot still ends on or before
/// `end` (a slot ending exactly at `end` is included). A trailing remainder
/// shorter than one slot is dropped; no partial slots are produced. A window
/// shorter than one slot yields an empty sequence.
pub fn generate_slots(start: NaiveTime, end: NaiveTime, slot: Duration) -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    if slot <= Duration::zero() {
        return slots;
    }

    let mut current = start;
    loop {
        // overflowing_add_signed reports seconds wrapped past midnight;
        // a wrapped slot end can never fit inside a same-day window.
        let (slot_end, wrapped) = current.overflowing_add_signed(slot);
        if wrapped != 0 || slot_end > end {
            break;
        }
        slots.push(current);
        current = slot_end;
    }

    slots
}

/// Order-preserving subsequence of `slots` not already booked.
pub fn filter_available(slots: &[NaiveTime], booked: &HashSet<NaiveTime>) -> Vec<NaiveTime> {
    slots
        .iter()
        .copied()
        .filter(|slot| !booked.contains(slot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(value: &str) -> NaiveTime {
        parse_hhmm(value).unwrap()
    }

    fn forty() -> Duration {
        Duration::minutes(40)
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert_eq!(parse_hhmm("9am"), Err(SlotError::Format("9am".to_string())));
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("09:60").is_err());
        assert!(parse_hhmm("").is_err());
        assert_eq!(parse_hhmm("09:00").unwrap(), t("09:00"));
    }

    #[test]
    fn generates_forty_minute_grid() {
        let slots = generate_slots(t("09:00"), t("11:00"), forty());
        assert_eq!(slots, vec![t("09:00"), t("09:40"), t("10:20")]);
    }

    #[test]
    fn last_slot_may_end_exactly_at_window_end() {
        // 08:00-10:30 holds three slots; a 10:00 slot would end at 10:40 and
        // overrun, so the 30-minute tail is dropped.
        let slots = generate_slots(t("08:00"), t("10:30"), forty());
        assert_eq!(slots, vec![t("08:00"), t("08:40"), t("09:20")]);

        // Exact multiple: 09:40 + 40min == 10:20 == end, still included.
        let slots = generate_slots(t("09:00"), t("10:20"), forty());
        assert_eq!(slots, vec![t("09:00"), t("09:40")]);
    }

    #[test]
    fn window_shorter_than_one_slot_is_empty() {
        assert!(generate_slots(t("09:00"), t("09:30"), forty()).is_empty());
        assert!(generate_slots(t("23:00"), t("23:39"), forty()).is_empty());
    }

    #[test]
    fn never_wraps_past_midnight() {
        // 23:40 + 40min wraps to 00:20; the wrapped value must not compare
        // "before end" and restart the grid, so only 23:00 fits.
        let slots = generate_slots(t("23:00"), t("23:59"), forty());
        assert_eq!(slots, vec![t("23:00")]);

        let slots = generate_slots(t("23:50"), t("23:59"), forty());
        assert!(slots.is_empty());
    }

    #[test]
    fn first_slot_equals_window_start() {
        for (start, end) in [("07:15", "12:00"), ("09:00", "09:40"), ("00:00", "06:00")] {
            let slots = generate_slots(t(start), t(end), forty());
            assert_eq!(slots.first(), Some(&t(start)));
        }
    }

    #[test]
    fn no_slot_overruns_window_end() {
        let start = t("08:05");
        let end = t("17:30");
        for slot in generate_slots(start, end, forty()) {
            assert!(slot + forty() <= end);
        }
    }

    #[test]
    fn slots_strictly_increase_by_duration() {
        let slots = generate_slots(t("08:00"), t("18:00"), forty());
        for pair in slots.windows(2) {
            assert_eq!(pair[1] - pair[0], forty());
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_slots(t("09:00"), t("14:00"), forty());
        let b = generate_slots(t("09:00"), t("14:00"), forty());
        assert_eq!(a, b);
    }

    #[test]
    fn filter_with_no_bookings_is_identity() {
        let slots = generate_slots(t("09:00"), t("11:00"), forty());
        assert_eq!(filter_available(&slots, &HashSet::new()), slots);
    }

    #[test]
    fn filter_with_everything_booked_is_empty() {
        let slots = generate_slots(t("09:00"), t("11:00"), forty());
        let booked: HashSet<_> = slots.iter().copied().collect();
        assert!(filter_available(&slots, &booked).is_empty());
    }

    #[test]
    fn filter_preserves_order_of_survivors() {
        let slots = vec![t("09:00"), t("09:40"), t("10:20")];
        let booked: HashSet<_> = [t("09:40")].into_iter().collect();
        assert_eq!(filter_available(&slots, &booked), vec![t("09:00"), t("10:20")]);
    }

    #[test]
    fn bookings_outside_the_grid_are_ignored() {
        let slots = vec![t("09:00"), t("09:40")];
        let booked: HashSet<_> = [t("09:15")].into_iter().collect();
        assert_eq!(filter_available(&slots, &booked), slots);
    }
}
