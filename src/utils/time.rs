use chrono::Utc;

const YEAR: f64 = 31_536_000.0;
const MONTH: f64 = 2_592_000.0;
const DAY: f64 = 86_400.0;
const HOUR: f64 = 3_600.0;
const MINUTE: f64 = 60.0;

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Italian relative time ("3 ore fa") between `timestamp` and `now`, both in
/// milliseconds. A unit is used only once more than one whole unit has
/// passed, so 90 seconds reads "1 minuti fa" and 60 seconds "60 secondi fa".
pub fn format_time_ago(timestamp: Option<i64>, now: i64) -> String {
    let timestamp = match timestamp {
        Some(timestamp) => timestamp,
        None => return "data non disponibile".to_string(),
    };

    let seconds = ((now - timestamp).max(0) / 1000) as f64;

    let units = [
        (YEAR, "anni"),
        (MONTH, "mesi"),
        (DAY, "giorni"),
        (HOUR, "ore"),
        (MINUTE, "minuti"),
    ];

    for (length, label) in units {
        let interval = seconds / length;
        if interval > 1.0 {
            return format!("{} {} fa", interval.floor() as i64, label);
        }
    }

    format!("{} secondi fa", seconds as i64)
}
