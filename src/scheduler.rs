use crate::config::ReminderConfig;
use crate::models::{Period, ReminderSlot, TimeOfDay, MINUTES_PER_DAY};
use chrono::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextReminder {
    pub slot: ReminderSlot,
    /// The slot has already passed today and this is tomorrow's occurrence.
    pub tomorrow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Upcoming,
    Active,
    Completed,
}

/// The slot whose time is exactly `now`, if reminders are enabled.
pub fn check_active(now: TimeOfDay, config: &ReminderConfig) -> Option<ReminderSlot> {
    check_active_within(now, config, 0)
}

/// Like [`check_active`], but a slot within `window_mins` of `now` (either
/// side, across midnight) also counts. Ties go to declaration order.
pub fn check_active_within(
    now: TimeOfDay,
    config: &ReminderConfig,
    window_mins: u16,
) -> Option<ReminderSlot> {
    if !config.enabled {
        return None;
    }
    Period::ALL
        .iter()
        .find(|p| circular_distance(now, config.time_of(**p)) <= window_mins)
        .map(|p| config.slot(*p))
}

/// Nearest slot strictly after `now`; wraps to tomorrow's earliest slot,
/// treating the day as circular. Does not look at `config.enabled`.
pub fn next_reminder(now: TimeOfDay, config: &ReminderConfig) -> NextReminder {
    // min_by_key keeps the first of equal keys, so ties fall to declaration order.
    let later_today = Period::ALL
        .iter()
        .copied()
        .filter(|p| config.time_of(*p) > now)
        .min_by_key(|p| config.time_of(*p));

    match later_today {
        Some(period) => NextReminder {
            slot: config.slot(period),
            tomorrow: false,
        },
        None => {
            let earliest = Period::ALL
                .iter()
                .copied()
                .min_by_key(|p| config.time_of(*p))
                .unwrap_or(Period::Morning);
            NextReminder {
                slot: config.slot(earliest),
                tomorrow: true,
            }
        }
    }
}

/// `target - now` on a 24h circle, always in `[0, 24h)`.
pub fn time_until(now: TimeOfDay, target: TimeOfDay) -> Duration {
    let diff = (target.minutes() as i64 - now.minutes() as i64).rem_euclid(MINUTES_PER_DAY as i64);
    Duration::minutes(diff)
}

pub fn slot_status(now: TimeOfDay, slot_time: TimeOfDay) -> SlotStatus {
    if now < slot_time {
        SlotStatus::Upcoming
    } else if now == slot_time {
        SlotStatus::Active
    } else {
        SlotStatus::Completed
    }
}

fn circular_distance(a: TimeOfDay, b: TimeOfDay) -> u16 {
    let diff = a.minutes().abs_diff(b.minutes());
    diff.min(MINUTES_PER_DAY - diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    #[test]
    fn test_check_active_exact_match() {
        let config = ReminderConfig::default();
        for slot in config.slots() {
            let active = check_active(slot.time, &config).unwrap();
            assert_eq!(active, slot);
        }
        assert!(check_active(t(8, 1), &config).is_none());
        assert!(check_active(t(7, 59), &config).is_none());
    }

    #[test]
    fn test_check_active_disabled() {
        let config = ReminderConfig {
            enabled: false,
            ..ReminderConfig::default()
        };
        for minute in 0..MINUTES_PER_DAY {
            assert!(check_active(TimeOfDay::from_minutes(minute as i64), &config).is_none());
        }
    }

    #[test]
    fn test_check_active_tie_break() {
        let mut config = ReminderConfig::default();
        config.set_time(Period::Night, t(13, 0));
        let active = check_active(t(13, 0), &config).unwrap();
        assert_eq!(active.period, Period::Afternoon);

        config.set_time(Period::Morning, t(13, 0));
        assert_eq!(check_active(t(13, 0), &config).unwrap().period, Period::Morning);
    }

    #[test]
    fn test_check_active_within_window() {
        let config = ReminderConfig::default();
        assert_eq!(
            check_active_within(t(12, 55), &config, 5).unwrap().period,
            Period::Afternoon
        );
        assert!(check_active_within(t(12, 54), &config, 5).is_none());
        assert_eq!(
            check_active_within(t(19, 35), &config, 5).unwrap().period,
            Period::Night
        );

        let mut late = ReminderConfig::default();
        late.set_time(Period::Night, t(23, 58));
        assert_eq!(
            check_active_within(t(0, 2), &late, 5).unwrap().period,
            Period::Night
        );
    }

    #[test]
    fn test_next_reminder_midday() {
        let config = ReminderConfig::default();
        let next = next_reminder(t(12, 0), &config);
        assert_eq!(next.slot.period, Period::Afternoon);
        assert_eq!(next.slot.time, t(13, 0));
        assert_eq!(next.slot.medicines, vec!["DPP-4 Inhibitors", "SGLT2 Inhibitors"]);
        assert!(!next.tomorrow);
        assert_eq!(time_until(t(12, 0), next.slot.time), Duration::hours(1));
    }

    #[test]
    fn test_next_reminder_wraps_after_last_slot() {
        let config = ReminderConfig::default();
        let next = next_reminder(t(20, 0), &config);
        assert_eq!(next.slot.period, Period::Morning);
        assert_eq!(next.slot.time, t(8, 0));
        assert!(next.tomorrow);
        assert_eq!(time_until(t(20, 0), next.slot.time), Duration::hours(12));
    }

    #[test]
    fn test_next_reminder_skips_active_slot() {
        let config = ReminderConfig::default();
        let next = next_reminder(t(13, 0), &config);
        assert_eq!(next.slot.period, Period::Night);
    }

    #[test]
    fn test_next_reminder_ignores_enabled_flag() {
        let config = ReminderConfig {
            enabled: false,
            ..ReminderConfig::default()
        };
        assert_eq!(next_reminder(t(9, 0), &config).slot.period, Period::Afternoon);
    }

    #[test]
    fn test_next_reminder_unordered_slots() {
        let mut config = ReminderConfig::default();
        config.set_time(Period::Morning, t(22, 0));
        config.set_time(Period::Afternoon, t(6, 0));
        config.set_time(Period::Night, t(18, 0));

        assert_eq!(next_reminder(t(7, 0), &config).slot.period, Period::Night);
        let wrapped = next_reminder(t(23, 0), &config);
        assert_eq!(wrapped.slot.period, Period::Afternoon);
        assert!(wrapped.tomorrow);
    }

    #[test]
    fn test_next_reminder_shared_time_tie_break() {
        let mut config = ReminderConfig::default();
        config.set_time(Period::Night, t(13, 0));
        assert_eq!(next_reminder(t(9, 0), &config).slot.period, Period::Afternoon);

        config.set_time(Period::Morning, t(13, 0));
        let wrapped = next_reminder(t(14, 0), &config);
        assert_eq!(wrapped.slot.period, Period::Morning);
        assert!(wrapped.tomorrow);
    }

    #[test]
    fn test_next_reminder_is_later_or_wrapped_minimum() {
        let config = ReminderConfig::default();
        let earliest = config.slots().iter().map(|s| s.time).min().unwrap();
        let latest = config.slots().iter().map(|s| s.time).max().unwrap();
        for minute in 0..MINUTES_PER_DAY {
            let now = TimeOfDay::from_minutes(minute as i64);
            let next = next_reminder(now, &config);
            if next.tomorrow {
                assert_eq!(next.slot.time, earliest);
                assert!(now >= latest);
            } else {
                assert!(next.slot.time > now);
            }
        }
    }

    #[test]
    fn test_time_until_wraps_midnight() {
        assert_eq!(time_until(t(23, 59), t(0, 1)), Duration::minutes(2));
        assert_eq!(time_until(t(8, 0), t(7, 59)), Duration::minutes(24 * 60 - 1));
        assert_eq!(time_until(t(10, 30), t(10, 30)), Duration::zero());
    }

    #[test]
    fn test_time_until_range() {
        let targets = [t(0, 0), t(8, 0), t(13, 0), t(19, 30), t(23, 59)];
        for minute in (0..MINUTES_PER_DAY).step_by(7) {
            let now = TimeOfDay::from_minutes(minute as i64);
            for target in targets {
                let d = time_until(now, target);
                assert!(d >= Duration::zero() && d < Duration::hours(24));
                assert_eq!(d == Duration::zero(), target == now);
            }
        }
    }

    #[test]
    fn test_slot_status() {
        assert_eq!(slot_status(t(7, 0), t(8, 0)), SlotStatus::Upcoming);
        assert_eq!(slot_status(t(8, 0), t(8, 0)), SlotStatus::Active);
        assert_eq!(slot_status(t(8, 1), t(8, 0)), SlotStatus::Completed);
    }
}
