use crate::error::{Error, Result};
use crate::models::{Period, ReminderSlot, TimeOfDay};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default = "default_contacts")]
    pub contacts: Vec<EmergencyContact>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reminders: ReminderConfig::default(),
            profile: Profile::default(),
            contacts: default_contacts(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReminderConfig {
    pub enabled: bool,
    pub sound_enabled: bool,
    pub morning: TimeOfDay,
    pub afternoon: TimeOfDay,
    pub night: TimeOfDay,
    /// Minutes either side of a slot that still count as active. 0 = exact minute.
    #[serde(default)]
    pub window_mins: u16,
    #[serde(default = "default_snooze_mins")]
    pub snooze_mins: u16,
}

fn default_snooze_mins() -> u16 {
    10
}

impl ReminderConfig {
    pub const MAX_WINDOW_MINS: u16 = 60;
    pub const MAX_SNOOZE_MINS: u16 = 240;

    pub fn validate(&self) -> Result<()> {
        if self.window_mins > Self::MAX_WINDOW_MINS {
            return Err(Error::InvalidArgument(format!(
                "window_mins {} exceeds {} minutes",
                self.window_mins,
                Self::MAX_WINDOW_MINS
            )));
        }
        if self.snooze_mins > Self::MAX_SNOOZE_MINS {
            return Err(Error::InvalidArgument(format!(
                "snooze_mins {} exceeds {} minutes",
                self.snooze_mins,
                Self::MAX_SNOOZE_MINS
            )));
        }
        Ok(())
    }

    pub fn default_time(period: Period) -> TimeOfDay {
        let (h, m) = match period {
            Period::Morning => (8, 0),
            Period::Afternoon => (13, 0),
            Period::Night => (19, 30),
        };
        TimeOfDay::from_minutes(h * 60 + m)
    }

    pub fn time_of(&self, period: Period) -> TimeOfDay {
        match period {
            Period::Morning => self.morning,
            Period::Afternoon => self.afternoon,
            Period::Night => self.night,
        }
    }

    pub fn set_time(&mut self, period: Period, time: TimeOfDay) {
        match period {
            Period::Morning => self.morning = time,
            Period::Afternoon => self.afternoon = time,
            Period::Night => self.night = time,
        }
    }

    pub fn slot(&self, period: Period) -> ReminderSlot {
        ReminderSlot {
            period,
            time: self.time_of(period),
            medicines: period.medicines().iter().map(|m| m.to_string()).collect(),
        }
    }

    /// All three slots in period declaration order.
    pub fn slots(&self) -> Vec<ReminderSlot> {
        Period::ALL.iter().map(|p| self.slot(*p)).collect()
    }

    /// Restores the default slot times; toggles are left untouched.
    pub fn reset_times(&mut self) {
        for period in Period::ALL {
            self.set_time(period, Self::default_time(period));
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_enabled: true,
            morning: Self::default_time(Period::Morning),
            afternoon: Self::default_time(Period::Afternoon),
            night: Self::default_time(Period::Night),
            window_mins: 0,
            snooze_mins: default_snooze_mins(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub gp: String,
    pub condition: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Dave".to_string(),
            gp: "Dr. Satish".to_string(),
            condition: "Diabetic".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmergencyContact {
    pub label: String,
    pub phone: String,
}

fn default_contacts() -> Vec<EmergencyContact> {
    [
        ("Hospital Emergency", "+91 123-456-7890"),
        ("Dr. Satish (GP)", "+91 987-654-3210"),
        ("Pharmacy 24/7", "+91 112-233-4455"),
        ("Ambulance", "108"),
    ]
    .iter()
    .map(|(label, phone)| EmergencyContact {
        label: label.to_string(),
        phone: phone.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slots() {
        let config = ReminderConfig::default();
        let slots = config.slots();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].time.to_string(), "08:00");
        assert_eq!(slots[1].time.to_string(), "13:00");
        assert_eq!(slots[2].time.to_string(), "19:30");
        assert_eq!(slots[1].medicines, vec!["DPP-4 Inhibitors", "SGLT2 Inhibitors"]);
        assert!(config.enabled);
        assert_eq!(config.window_mins, 0);
    }

    #[test]
    fn test_reset_times_keeps_toggles() {
        let mut config = ReminderConfig {
            enabled: false,
            ..ReminderConfig::default()
        };
        config.set_time(Period::Night, TimeOfDay::from_minutes(22 * 60));
        config.reset_times();
        assert_eq!(config.night.to_string(), "19:30");
        assert!(!config.enabled);
    }

    #[test]
    fn test_validate_limits() {
        let mut config = ReminderConfig::default();
        assert!(config.validate().is_ok());

        config.window_mins = ReminderConfig::MAX_WINDOW_MINS;
        config.snooze_mins = ReminderConfig::MAX_SNOOZE_MINS;
        assert!(config.validate().is_ok());

        config.window_mins = 720;
        assert!(matches!(config.validate(), Err(Error::InvalidArgument(_))));

        config.window_mins = 0;
        config.snooze_mins = 241;
        assert!(matches!(config.validate(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_partial_config_file_fills_defaults() {
        let json = r#"{ "reminders": { "enabled": false, "sound_enabled": true,
            "morning": "07:15", "afternoon": "12:00", "night": "21:00" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(!config.reminders.enabled);
        assert_eq!(config.reminders.morning.to_string(), "07:15");
        assert_eq!(config.reminders.snooze_mins, 10);
        assert_eq!(config.profile.name, "Dave");
        assert_eq!(config.contacts.len(), 4);
    }
}
