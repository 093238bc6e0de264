use crate::config::Config;
use crate::export::export_csv;
use crate::intake::IntakeLog;
use crate::models::{IntakeRecord, Period, ReminderSlot, Status, TimeOfDay};
use crate::scheduler::{self, NextReminder};
use crate::storage::Storage;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;
use std::collections::HashSet;
use std::path::PathBuf;

pub const QUOTES: [&str; 8] = [
    "You're doing the best you can, and that starts with taking your medicine.",
    "Every pill you take is a step toward better health. Keep going!",
    "Your health is an investment, not an expense. Take your medicine today!",
    "Small steps every day lead to big changes. Don't skip your medication!",
    "You deserve to feel your best. Take your medicine on time!",
    "Consistency is key. Your future self will thank you!",
    "Taking care of yourself is not selfish, it's essential.",
    "You're stronger than you think. Keep up with your medication!",
];

const SLOT_STEP_MINS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    History,
    Reminders,
    Emergency,
    About,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Home,
        View::History,
        View::Reminders,
        View::Emergency,
        View::About,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::History => "History",
            View::Reminders => "Reminders",
            View::Emergency => "Emergency Contact",
            View::About => "About",
        }
    }

    pub fn index(&self) -> usize {
        View::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn prev(&self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextView,
    PrevView,
    NextPeriod,
    PrevPeriod,
    Log(Status),
    Snooze,
    ToggleStatusFilter(Status),
    TogglePeriodFilter(Period),
    Export,
    RequestClear,
    ConfirmClear,
    CancelClear,
    ToggleEnabled,
    ToggleSound,
    NextSlot,
    PrevSlot,
    LaterSlot,
    EarlierSlot,
    ResetDefaults,
    SaveSettings,
    TestAlert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snooze {
    pub period: Period,
    pub until: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub slot: ReminderSlot,
    pub snoozed: bool,
}

/// All state for one interactive session. The intake log lives only here.
pub struct Session {
    pub config: Config,
    pub log: IntakeLog,
    pub view: View,
    pub selected_period: Period,
    pub selected_slot: Period,
    pub status_filter: HashSet<Status>,
    pub period_filter: HashSet<Period>,
    pub snooze: Option<Snooze>,
    pub confirm_clear: bool,
    pub test_alert: bool,
    pub message: Option<String>,
    pub quote_index: usize,
    last_alert: Option<(NaiveDate, Period, Option<NaiveDateTime>)>,
    bell: bool,
    storage: Storage,
    export_dir: PathBuf,
}

impl Session {
    pub fn new(config: Config, storage: Storage, export_dir: PathBuf) -> Self {
        Self {
            config,
            log: IntakeLog::new(),
            view: View::Home,
            selected_period: Period::Morning,
            selected_slot: Period::Morning,
            status_filter: Status::ALL.into_iter().collect(),
            period_filter: Period::ALL.into_iter().collect(),
            snooze: None,
            confirm_clear: false,
            test_alert: false,
            message: None,
            quote_index: random_quote(),
            last_alert: None,
            bell: false,
            storage,
            export_dir,
        }
    }

    pub fn quote(&self) -> &'static str {
        QUOTES[self.quote_index % QUOTES.len()]
    }

    /// What the reminder banner should show at `now`, if anything.
    /// A slot that is active right now wins; otherwise an expired snooze
    /// re-raises its slot until a dose for it is logged.
    pub fn banner(&self, now: NaiveDateTime) -> Option<Banner> {
        let reminders = &self.config.reminders;
        if !reminders.enabled {
            return None;
        }

        if let Some(slot) =
            scheduler::check_active_within(now.into(), reminders, reminders.window_mins)
        {
            if self.snooze.map_or(true, |s| s.period != slot.period) {
                return Some(Banner {
                    slot,
                    snoozed: false,
                });
            }
        }

        let snooze = self.snooze?;
        if now < snooze.until {
            return None;
        }
        Some(Banner {
            slot: reminders.slot(snooze.period),
            snoozed: true,
        })
    }

    pub fn next_reminder(&self, now: NaiveDateTime) -> (NextReminder, Duration) {
        let now: TimeOfDay = now.into();
        let next = scheduler::next_reminder(now, &self.config.reminders);
        let until = scheduler::time_until(now, next.slot.time);
        (next, until)
    }

    /// Raises each banner occurrence once; rings when sound is on.
    pub fn tick(&mut self, now: NaiveDateTime) {
        let Some(banner) = self.banner(now) else {
            return;
        };
        let snoozed_until = self.snooze.filter(|_| banner.snoozed).map(|s| s.until);
        let key = (now.date(), banner.slot.period, snoozed_until);
        if self.last_alert == Some(key) {
            return;
        }
        log::info!(
            "Reminder raised for {} ({})",
            banner.slot.period,
            banner.slot.time
        );
        self.last_alert = Some(key);
        if self.config.reminders.sound_enabled {
            self.bell = true;
        }
    }

    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    pub fn filtered_records(&self) -> Vec<IntakeRecord> {
        self.log.filter(&self.status_filter, &self.period_filter)
    }

    pub fn apply(&mut self, action: Action, now: NaiveDateTime) {
        if action != Action::TestAlert {
            self.test_alert = false;
        }
        if !matches!(action, Action::RequestClear | Action::ConfirmClear) {
            self.confirm_clear = false;
        }

        match action {
            Action::NextView => self.show(self.view.next()),
            Action::PrevView => self.show(self.view.prev()),
            Action::NextPeriod => self.selected_period = self.selected_period.next(),
            Action::PrevPeriod => self.selected_period = self.selected_period.prev(),
            Action::Log(status) => self.log_dose(status, now),
            Action::Snooze => self.snooze_banner(now),
            Action::ToggleStatusFilter(status) => toggle(&mut self.status_filter, status),
            Action::TogglePeriodFilter(period) => toggle(&mut self.period_filter, period),
            Action::Export => self.export(now.date()),
            Action::RequestClear => {
                if self.log.is_empty() {
                    self.message = Some("History is already empty.".to_string());
                } else {
                    self.confirm_clear = true;
                    self.message =
                        Some("Clear all history? This cannot be undone. (y/n)".to_string());
                }
            }
            Action::ConfirmClear => {
                if self.confirm_clear {
                    self.log.clear();
                    self.confirm_clear = false;
                    log::info!("Intake history cleared");
                    self.message = Some("History cleared.".to_string());
                }
            }
            Action::CancelClear => self.message = None,
            Action::ToggleEnabled => {
                let reminders = &mut self.config.reminders;
                reminders.enabled = !reminders.enabled;
                log::info!("Reminders enabled: {}", reminders.enabled);
                if !reminders.enabled {
                    self.snooze = None;
                }
            }
            Action::ToggleSound => {
                let reminders = &mut self.config.reminders;
                reminders.sound_enabled = !reminders.sound_enabled;
                log::info!("Sound alerts enabled: {}", reminders.sound_enabled);
            }
            Action::NextSlot => self.selected_slot = self.selected_slot.next(),
            Action::PrevSlot => self.selected_slot = self.selected_slot.prev(),
            Action::LaterSlot => self.shift_slot(SLOT_STEP_MINS),
            Action::EarlierSlot => self.shift_slot(-SLOT_STEP_MINS),
            Action::ResetDefaults => {
                self.config.reminders.reset_times();
                log::info!("Reminder times reset to defaults");
                self.message = Some("Reminder times reset to defaults.".to_string());
            }
            Action::SaveSettings => match self.storage.save(&self.config) {
                Ok(()) => self.message = Some("Reminder settings saved successfully!".to_string()),
                Err(e) => {
                    log::error!("Saving settings failed: {:#}", e);
                    self.message = Some(format!("Saving settings failed: {}", e));
                }
            },
            Action::TestAlert => {
                self.test_alert = true;
                if self.config.reminders.sound_enabled {
                    self.bell = true;
                }
            }
        }
    }

    fn show(&mut self, view: View) {
        self.view = view;
        self.message = None;
    }

    fn log_dose(&mut self, status: Status, now: NaiveDateTime) {
        let period = self.selected_period;
        let slot = self.config.reminders.slot(period);
        self.log.append(now, period, &slot.medicines, status);

        if self.snooze.map_or(false, |s| s.period == period) {
            self.snooze = None;
        }
        let name = &self.config.profile.name;
        self.message = Some(match status {
            Status::Taken => format!(
                "Great job, {}! You took your medicine correctly. Keep going!",
                name
            ),
            Status::Missed => format!(
                "Don't give up, {}! Good days are ahead. Remember to set a reminder for next time!",
                name
            ),
        });
        self.quote_index = random_quote();
    }

    fn snooze_banner(&mut self, now: NaiveDateTime) {
        let Some(banner) = self.banner(now) else {
            self.message = Some("No active reminder to snooze.".to_string());
            return;
        };
        let mins = self.config.reminders.snooze_mins;
        let until = now + Duration::minutes(mins as i64);
        log::info!("Snoozed {} reminder until {}", banner.slot.period, until);
        self.snooze = Some(Snooze {
            period: banner.slot.period,
            until,
        });
        self.message = Some(format!(
            "{} reminder snoozed for {} minutes.",
            banner.slot.period, mins
        ));
    }

    fn shift_slot(&mut self, delta_mins: i64) {
        let period = self.selected_slot;
        let reminders = &mut self.config.reminders;
        let time = reminders.time_of(period).add_minutes(delta_mins);
        reminders.set_time(period, time);
        log::info!("{} reminder moved to {}", period, time);
    }

    fn export(&mut self, today: NaiveDate) {
        match export_csv(self.log.records(), &self.export_dir, today) {
            Ok(path) => self.message = Some(format!("History exported to {}", path.display())),
            Err(e) => {
                log::error!("Export failed: {:#}", e);
                self.message = Some(format!("Export failed: {}", e));
            }
        }
    }
}

fn toggle<T: std::hash::Hash + Eq>(set: &mut HashSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

fn random_quote() -> usize {
    rand::thread_rng().gen_range(0..QUOTES.len())
}
