use chrono::Duration;

pub fn split_hours_minutes(duration: Duration) -> (i64, i64) {
    let mins = duration.num_minutes().max(0);
    (mins / 60, mins % 60)
}

/// `"1 hours and 5 minutes"`, as shown next to the upcoming reminder.
pub fn format_countdown(duration: Duration) -> String {
    let (hours, mins) = split_hours_minutes(duration);
    format!("{} hours and {} minutes", hours, mins)
}

pub fn format_hm(duration: Duration) -> String {
    let (hours, mins) = split_hours_minutes(duration);
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

pub fn join_medicines(medicines: &[String]) -> String {
    medicines.join(", ")
}
