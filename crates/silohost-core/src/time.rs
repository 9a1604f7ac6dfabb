use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the unix epoch. Status stamps and lead timestamps share
/// this clock; resolver logic itself must stay wall-clock free.
#[must_use]
pub fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}
