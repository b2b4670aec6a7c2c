use rand::{Rng, distr::Alphanumeric};

/// Length of the random `state` sent with the authorization request.
const STATE_LENGTH: usize = 32;

/// Formats milliseconds as `mm:ss`, or `hh:mm:ss` once there is an hour.
///
/// Sub-second precision is dropped.
pub fn duration_to_s(duration_ms: u64) -> String {
    let secs = duration_ms / 1000;
    let (mins, secs) = (secs / 60, secs % 60);
    let (hours, mins) = (mins / 60, mins % 60);

    if hours == 0 {
        format!("{mins:02}:{secs:02}")
    } else {
        format!("{hours:02}:{mins:02}:{secs:02}")
    }
}

/// Parses `ss`, `mm:ss` or `hh:mm:ss` into milliseconds.
pub fn time_to_ms(time: &str) -> Result<u64, String> {
    let time = time.trim();
    if time.is_empty() {
        return Err("empty timestamp".to_string());
    }

    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() > 3 {
        return Err(format!("'{time}' has too many components, use mm:ss or hh:mm:ss"));
    }

    let out_of_range = || format!("'{time}' is out of range");
    let secs = parts.iter().try_fold(0u64, |acc, part| {
        let n = part
            .parse::<u64>()
            .map_err(|_| format!("'{part}' in '{time}' is not a number"))?;
        acc.checked_mul(60)
            .and_then(|v| v.checked_add(n))
            .ok_or_else(out_of_range)
    })?;

    secs.checked_mul(1000).ok_or_else(out_of_range)
}

/// Tracks imported from local files have URIs like `spotify:local:...`.
pub fn is_local_track(uri: &str) -> bool {
    uri.split(':').nth(1) == Some("local")
}

/// Random value binding an authorization request to its callback.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}
