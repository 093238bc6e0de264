use crate::intake::IntakeLog;
use crate::models::Period;
use crate::stats::{calculate_stats, ComplianceTier};
use std::io::{self, Write};

pub struct Reporter<'a> {
    log: &'a IntakeLog,
    name: &'a str,
}

impl<'a> Reporter<'a> {
    pub fn new(log: &'a IntakeLog, name: &'a str) -> Self {
        Self { log, name }
    }

    pub fn report(&self) -> io::Result<()> {
        let stdout = io::stdout();
        self.write_report(&mut stdout.lock(), chrono::Local::now().date_naive())
    }

    pub fn write_report<W: Write>(&self, out: &mut W, today: chrono::NaiveDate) -> io::Result<()> {
        if self.log.is_empty() {
            writeln!(out, "No doses logged this session.")?;
            return Ok(());
        }

        let stats_data = calculate_stats(self.log, today);

        writeln!(out, "Medication Report")?;
        writeln!(out, "=================")?;

        for (date, stats) in &stats_data.daily_stats {
            let date_str = if *date == stats_data.today {
                format!("{} (Today)", date)
            } else {
                date.to_string()
            };

            writeln!(out, "\nDate: {}", date_str)?;
            writeln!(out, "  Taken:           {}", stats.taken)?;
            writeln!(out, "  Missed:          {}", stats.missed)?;
            writeln!(out, "  Compliance Rate: {:.1}%", stats.compliance_rate())?;
        }

        writeln!(out, "\nBy Time of Day")?;
        writeln!(out, "--------------")?;
        for period in Period::ALL {
            if let Some(stats) = stats_data.period_stats.get(&period) {
                writeln!(
                    out,
                    "  {:<10} taken {}, missed {}",
                    period.name(),
                    stats.taken,
                    stats.missed
                )?;
            }
        }

        let overall = &stats_data.overall;
        writeln!(out, "\nSession Summary")?;
        writeln!(out, "---------------")?;
        writeln!(out, "Total Records:   {}", overall.total)?;
        writeln!(out, "Taken:           {}", overall.taken)?;
        writeln!(out, "Missed:          {}", overall.missed)?;
        writeln!(out, "Compliance Rate: {:.1}%", overall.compliance_rate)?;
        writeln!(
            out,
            "\n{}",
            ComplianceTier::from_rate(overall.compliance_rate).message(self.name, overall.taken)
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use chrono::NaiveDate;

    #[test]
    fn test_report_empty() -> io::Result<()> {
        let log = IntakeLog::new();
        let mut out = Vec::new();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Reporter::new(&log, "Dave").write_report(&mut out, today)?;
        assert_eq!(String::from_utf8_lossy(&out), "No doses logged this session.\n");
        Ok(())
    }

    #[test]
    fn test_report_summary() -> io::Result<()> {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut log = IntakeLog::new();
        for (hour, status) in [(8, Status::Taken), (13, Status::Taken), (19, Status::Missed)] {
            let at = today.and_hms_opt(hour, 0, 0).unwrap();
            log.append(at, Period::Morning, &[], status);
        }

        let mut out = Vec::new();
        Reporter::new(&log, "Dave").write_report(&mut out, today)?;
        let text = String::from_utf8_lossy(&out);

        assert!(text.contains("2024-03-01 (Today)"));
        assert!(text.contains("Compliance Rate: 66.7%"));
        assert!(text.contains("Good job, Dave!"));
        Ok(())
    }
}
