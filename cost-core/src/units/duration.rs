use crate::error::ParseError;

/// A time value as it may appear in an accounting dataset.
///
/// Raw `sacct` output is always text, but pre-processed datasets sometimes
/// already carry plain hour counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeValue<'a> {
    Text(&'a str),
    Hours(f64),
}

impl<'a> From<&'a str> for TimeValue<'a> {
    fn from(value: &'a str) -> Self {
        TimeValue::Text(value)
    }
}

impl From<f64> for TimeValue<'_> {
    fn from(value: f64) -> Self {
        TimeValue::Hours(value)
    }
}

impl From<u32> for TimeValue<'_> {
    fn from(value: u32) -> Self {
        TimeValue::Hours(value as f64)
    }
}

/// Convert a `[days-]HH:MM:SS` string, a plain hour count, or a number into hours.
pub fn parse_hours<'a>(value: impl Into<TimeValue<'a>>) -> Result<f64, ParseError> {
    match value.into() {
        TimeValue::Hours(hours) => Ok(hours),
        TimeValue::Text(text) => parse_text(text),
    }
}

fn parse_text(raw: &str) -> Result<f64, ParseError> {
    let text = raw.trim();

    if !text.contains(':') {
        return text
            .parse::<f64>()
            .map_err(|_| invalid(raw, "expected [days-]HH:MM:SS or a number of hours".to_string()));
    }

    let (days, clock) = match text.split_once('-') {
        Some((days, clock)) => (component(raw, days, "days")?, clock),
        None => (0, text),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return Err(invalid(
            raw,
            format!("expected HH:MM:SS, found {} components", parts.len()),
        ));
    };

    let hours = component(raw, hours, "hours")?;
    let minutes = component(raw, minutes, "minutes")?;
    let seconds = component(raw, seconds, "seconds")?;

    Ok(days as f64 * 24.0 + hours as f64 + minutes as f64 / 60.0 + seconds as f64 / 3600.0)
}

fn component(raw: &str, part: &str, name: &str) -> Result<u64, ParseError> {
    part.parse::<u64>()
        .map_err(|_| invalid(raw, format!("{} component {:?} is not an integer", name, part)))
}

fn invalid(raw: &str, reason: String) -> ParseError {
    ParseError::Duration {
        field: "duration",
        value: raw.to_string(),
        reason,
    }
}
