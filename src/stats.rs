use crate::intake::{compliance_rate, IntakeLog};
use crate::models::{IntakeRecord, Period, Status};
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Default, Clone, Debug, PartialEq)]
pub struct DayStats {
    pub taken: u32,
    pub missed: u32,
}

impl DayStats {
    pub fn compliance_rate(&self) -> f64 {
        compliance_rate(self.taken as usize, self.missed as usize)
    }
}

#[derive(Default, Clone, Debug, PartialEq)]
pub struct SummaryStats {
    pub total: u32,
    pub taken: u32,
    pub missed: u32,
    pub compliance_rate: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComplianceTier {
    Excellent,
    Good,
    NeedsEncouragement,
}

impl ComplianceTier {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 80.0 {
            ComplianceTier::Excellent
        } else if rate >= 60.0 {
            ComplianceTier::Good
        } else {
            ComplianceTier::NeedsEncouragement
        }
    }

    pub fn message(&self, name: &str, taken: u32) -> String {
        match self {
            ComplianceTier::Excellent => format!(
                "Excellent work, {}! You took your medicine {} times correctly. Keep up the fantastic work!",
                name, taken
            ),
            ComplianceTier::Good => format!(
                "Good job, {}! You took your medicine {} times. Let's aim even higher!",
                name, taken
            ),
            ComplianceTier::NeedsEncouragement => format!(
                "You took your medicine {} times. Don't give up, {}! Every day is a new opportunity.",
                taken, name
            ),
        }
    }
}

pub struct Stats {
    pub daily_stats: BTreeMap<NaiveDate, DayStats>,
    pub period_stats: BTreeMap<Period, DayStats>,
    pub overall: SummaryStats,
    pub today_summary: SummaryStats,
    pub today: NaiveDate,
}

pub fn calculate_summary(records: &[IntakeRecord]) -> SummaryStats {
    let mut summary = SummaryStats::default();

    for record in records {
        summary.total += 1;
        match record.status {
            Status::Taken => summary.taken += 1,
            Status::Missed => summary.missed += 1,
        }
    }
    summary.compliance_rate = compliance_rate(summary.taken as usize, summary.missed as usize);

    summary
}

pub fn calculate_stats(log: &IntakeLog, today: NaiveDate) -> Stats {
    let mut daily_stats: BTreeMap<NaiveDate, DayStats> = BTreeMap::new();
    let mut period_stats: BTreeMap<Period, DayStats> = BTreeMap::new();
    let mut today_records = Vec::new();

    for record in log.records() {
        let date = record.timestamp.date();
        let day = daily_stats.entry(date).or_default();
        let period = period_stats.entry(record.period).or_default();
        match record.status {
            Status::Taken => {
                day.taken += 1;
                period.taken += 1;
            }
            Status::Missed => {
                day.missed += 1;
                period.missed += 1;
            }
        }

        if date == today {
            today_records.push(record.clone());
        }
    }

    Stats {
        daily_stats,
        period_stats,
        overall: calculate_summary(log.records()),
        today_summary: calculate_summary(&today_records),
        today,
    }
}
