use crate::models::{IntakeRecord, Period, Status};
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Append-only log of doses for the current session. Never written to disk.
#[derive(Debug, Default, Clone)]
pub struct IntakeLog {
    records: Vec<IntakeRecord>,
    taken_count: usize,
    missed_count: usize,
}

impl IntakeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        at: NaiveDateTime,
        period: Period,
        medicines: &[String],
        status: Status,
    ) -> &IntakeRecord {
        log::debug!("Logging {} dose as {} at {}", period, status, at);
        match status {
            Status::Taken => self.taken_count += 1,
            Status::Missed => self.missed_count += 1,
        }
        self.records.push(IntakeRecord::new(at, period, medicines, status));
        &self.records[self.records.len() - 1]
    }

    /// Records matching both sets, in insertion order. Empty sets match nothing.
    pub fn filter(
        &self,
        statuses: &HashSet<Status>,
        periods: &HashSet<Period>,
    ) -> Vec<IntakeRecord> {
        filter_records(&self.records, statuses, periods)
    }

    /// Percentage of logged doses that were taken; 0.0 for an empty log.
    pub fn compliance_rate(&self) -> f64 {
        compliance_rate(self.taken_count, self.missed_count)
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.taken_count = 0;
        self.missed_count = 0;
    }

    pub fn records(&self) -> &[IntakeRecord] {
        &self.records
    }

    pub fn taken_count(&self) -> usize {
        self.taken_count
    }

    pub fn missed_count(&self) -> usize {
        self.missed_count
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn filter_records(
    records: &[IntakeRecord],
    statuses: &HashSet<Status>,
    periods: &HashSet<Period>,
) -> Vec<IntakeRecord> {
    records
        .iter()
        .filter(|r| statuses.contains(&r.status) && periods.contains(&r.period))
        .cloned()
        .collect()
}

pub fn compliance_rate(taken: usize, missed: usize) -> f64 {
    let total = taken + missed;
    if total == 0 {
        return 0.0;
    }
    taken as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn base_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn meds(period: Period) -> Vec<String> {
        period.medicines().iter().map(|m| m.to_string()).collect()
    }

    fn all_statuses() -> HashSet<Status> {
        Status::ALL.into_iter().collect()
    }

    fn all_periods() -> HashSet<Period> {
        Period::ALL.into_iter().collect()
    }

    fn sample_log() -> IntakeLog {
        let mut log = IntakeLog::new();
        let t = base_time();
        log.append(t, Period::Morning, &meds(Period::Morning), Status::Taken);
        log.append(
            t + Duration::hours(5),
            Period::Afternoon,
            &meds(Period::Afternoon),
            Status::Missed,
        );
        log.append(
            t + Duration::hours(11),
            Period::Night,
            &meds(Period::Night),
            Status::Taken,
        );
        log.append(
            t + Duration::hours(24),
            Period::Morning,
            &meds(Period::Morning),
            Status::Taken,
        );
        log
    }

    #[test]
    fn test_compliance_rate_three_of_four() {
        let log = sample_log();
        assert_eq!(log.taken_count(), 3);
        assert_eq!(log.missed_count(), 1);
        assert_eq!(log.compliance_rate(), 75.0);
    }

    #[test]
    fn test_compliance_rate_empty() {
        assert_eq!(IntakeLog::new().compliance_rate(), 0.0);
    }

    #[test]
    fn test_counts_track_records() {
        let mut log = IntakeLog::new();
        let statuses = [
            Status::Missed,
            Status::Taken,
            Status::Missed,
            Status::Missed,
            Status::Taken,
        ];
        for (i, status) in statuses.iter().enumerate() {
            log.append(
                base_time() + Duration::minutes(i as i64),
                Period::Night,
                &meds(Period::Night),
                *status,
            );
            assert_eq!(log.taken_count() + log.missed_count(), log.len());
        }
        assert_eq!(log.compliance_rate(), 40.0);
    }

    #[test]
    fn test_append_returns_record() {
        let mut log = IntakeLog::new();
        let record = log.append(base_time(), Period::Morning, &meds(Period::Morning), Status::Taken);
        assert_eq!(record.timestamp, base_time());
        assert_eq!(record.note, "Medication taken on time");
        assert_eq!(record.medicines, vec!["Metformin", "Sulfonylureas"]);
    }

    #[test]
    fn test_append_empty_medicines_allowed() {
        let mut log = IntakeLog::new();
        log.append(base_time(), Period::Night, &[], Status::Missed);
        assert_eq!(log.len(), 1);
        assert!(log.records()[0].medicines.is_empty());
    }

    #[test]
    fn test_record_is_a_snapshot() {
        let mut log = IntakeLog::new();
        let mut list = meds(Period::Morning);
        log.append(base_time(), Period::Morning, &list, Status::Taken);
        list.push("Insulin".to_string());
        assert_eq!(log.records()[0].medicines.len(), 2);
    }

    #[test]
    fn test_filter_by_status_and_period() {
        let log = sample_log();

        let taken: HashSet<Status> = [Status::Taken].into_iter().collect();
        let morning: HashSet<Period> = [Period::Morning].into_iter().collect();
        let result = log.filter(&taken, &morning);
        assert_eq!(result.len(), 2);
        assert!(result[0].timestamp < result[1].timestamp);

        let all = log.filter(&all_statuses(), &all_periods());
        assert_eq!(all, log.records());
    }

    #[test]
    fn test_filter_empty_sets_match_nothing() {
        let log = sample_log();
        assert!(log.filter(&HashSet::new(), &all_periods()).is_empty());
        assert!(log.filter(&all_statuses(), &HashSet::new()).is_empty());
    }

    #[test]
    fn test_filter_idempotent() {
        let log = sample_log();
        let statuses = all_statuses();
        let periods: HashSet<Period> = [Period::Afternoon, Period::Night].into_iter().collect();
        let once = log.filter(&statuses, &periods);
        let twice = filter_records(&once, &statuses, &periods);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clear() {
        let mut log = sample_log();
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.taken_count(), 0);
        assert_eq!(log.missed_count(), 0);
        assert!(log.filter(&all_statuses(), &all_periods()).is_empty());
        assert_eq!(log.compliance_rate(), 0.0);
    }
}
