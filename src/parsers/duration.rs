use crate::error::ExtractError;
use crate::lookup::Lookup;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_8601: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^P(?:(?P<days>\d+(?:\.\d+)?)D)?(?:T(?:(?P<hours>\d+(?:\.\d+)?)H)?(?:(?P<minutes>\d+(?:\.\d+)?)M)?(?:(?P<seconds>\d+(?:\.\d+)?)S)?)?$",
    )
    .unwrap()
});

static NATURAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)",
        r"(?:\D*(?P<days>\d+)\s*(?:days|day|d))?",
        r"(?:\D*(?P<hours>\d*\s?[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞]|\d+\s+\d+/\d+|\d+/\d+|\d+(?:\.\d+)?)",
        r"\s*(?:hours|hour|hrs|hr|h|óra))?",
        r"(?:\D*(?P<minutes>\d+)\s*(?:minutes|minute|mins|min|m|perc))?",
        r"(?:\D*(?P<seconds>\d+)\s*(?:seconds|second|secs|sec|s))?",
    ))
    .unwrap()
});

fn vulgar_fraction(c: char) -> Option<f64> {
    let value = match c {
        '½' => 1.0 / 2.0,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '¼' => 1.0 / 4.0,
        '¾' => 3.0 / 4.0,
        '⅕' => 1.0 / 5.0,
        '⅖' => 2.0 / 5.0,
        '⅗' => 3.0 / 5.0,
        '⅘' => 4.0 / 5.0,
        '⅙' => 1.0 / 6.0,
        '⅚' => 5.0 / 6.0,
        '⅛' => 1.0 / 8.0,
        '⅜' => 3.0 / 8.0,
        '⅝' => 5.0 / 8.0,
        '⅞' => 7.0 / 8.0,
        _ => return None,
    };
    Some(value)
}

/// Evaluate "1½", "½", "1 1/2", "3/4" or "1.5" to a float.
pub fn parse_fraction(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some((index, value)) = text
        .char_indices()
        .find_map(|(i, c)| vulgar_fraction(c).map(|v| (i, v)))
    {
        let whole = text[..index].trim();
        let whole = if whole.is_empty() {
            0.0
        } else {
            whole.parse::<f64>().ok()?
        };
        return Some(whole + value);
    }

    if text.contains('/') {
        let mut total = 0.0;
        for part in text.split_whitespace() {
            match part.split_once('/') {
                Some((numerator, denominator)) => {
                    let numerator: f64 = numerator.parse().ok()?;
                    let denominator: f64 = denominator.parse().ok()?;
                    if denominator == 0.0 {
                        return None;
                    }
                    total += numerator / denominator;
                }
                None => total += part.parse::<f64>().ok()?,
            }
        }
        return Some(total);
    }

    text.parse::<f64>().ok()
}

fn number(captures: &regex::Captures, name: &str) -> Option<f64> {
    captures
        .name(name)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
}

/// Combine components into whole minutes. A zero total means "no duration";
/// a total that does not fit in a `u32` is rejected rather than clamped.
fn total_minutes(text: &str, days: f64, hours: f64, minutes: f64, seconds: f64) -> Lookup<u32> {
    let total = (minutes + hours * 60.0 + days * 24.0 * 60.0 + seconds / 60.0).round();
    if total <= 0.0 {
        Lookup::NotFound
    } else if total > f64::from(u32::MAX) {
        debug!("Duration {:?} is {} minutes, out of range", text, total);
        Lookup::Failed(ExtractError::InvalidDurationText(text.to_string()))
    } else {
        Lookup::Found(total as u32)
    }
}

/// "PT15-20M" style values that are not strict ISO 8601.
fn looks_like_iso(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() > 1
        && matches!(bytes[0], b'P' | b'p')
        && (bytes[1].is_ascii_digit() || matches!(bytes[1], b'T' | b't'))
}

fn parse_iso(text: &str) -> Option<Lookup<u32>> {
    let captures = ISO_8601.captures(text)?;
    let has_component = ["days", "hours", "minutes", "seconds"]
        .iter()
        .any(|name| captures.name(name).is_some());
    if !has_component {
        return Some(Lookup::Failed(ExtractError::InvalidDurationText(
            text.to_string(),
        )));
    }
    Some(total_minutes(
        text,
        number(&captures, "days").unwrap_or(0.0),
        number(&captures, "hours").unwrap_or(0.0),
        number(&captures, "minutes").unwrap_or(0.0),
        number(&captures, "seconds").unwrap_or(0.0),
    ))
}

/// Parse time text into whole minutes.
///
/// Accepts plain integers, ISO 8601 durations and natural language such as
/// "1 hour 30 minutes" or "1½ hrs". A range like "10-15 minutes" resolves
/// to its upper bound. A total of zero is reported as `NotFound`.
pub fn parse_minutes(text: &str) -> Lookup<u32> {
    let text = text.trim();
    if text.is_empty() {
        return Lookup::NotFound;
    }

    if text.chars().all(|c| c.is_ascii_digit()) {
        return match text.parse::<u32>() {
            Ok(0) => Lookup::NotFound,
            Ok(minutes) => Lookup::Found(minutes),
            Err(_) => Lookup::Failed(ExtractError::InvalidDurationText(text.to_string())),
        };
    }

    if let Some(minutes) = parse_iso(text) {
        return minutes;
    }

    let mut time_text = text;
    if looks_like_iso(time_text) {
        if let Some((_, rest)) = time_text.split_once(['T', 't']) {
            time_text = rest;
        }
    }
    if let Some((_, upper)) = time_text.split_once(['-', '–']) {
        time_text = upper;
    }
    if let Some((_, upper)) = time_text.split_once(" to ") {
        time_text = upper;
    }

    let Some(captures) = NATURAL.captures(time_text) else {
        return Lookup::Failed(ExtractError::InvalidDurationText(text.to_string()));
    };

    let hours = match captures.name("hours") {
        Some(m) => match parse_fraction(m.as_str()) {
            Some(hours) => Some(hours),
            None => {
                debug!("Could not evaluate hour component {:?}", m.as_str());
                return Lookup::Failed(ExtractError::InvalidDurationText(text.to_string()));
            }
        },
        None => None,
    };
    let days = number(&captures, "days");
    let minutes = number(&captures, "minutes");
    let seconds = number(&captures, "seconds");

    if days.is_none() && hours.is_none() && minutes.is_none() && seconds.is_none() {
        return Lookup::Failed(ExtractError::InvalidDurationText(text.to_string()));
    }

    total_minutes(
        text,
        days.unwrap_or(0.0),
        hours.unwrap_or(0.0),
        minutes.unwrap_or(0.0),
        seconds.unwrap_or(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_hours_and_minutes() {
        for hours in 0..6u32 {
            for minutes in [0u32, 1, 15, 30, 59] {
                let text = format!("PT{hours}H{minutes}M");
                let expected = hours * 60 + minutes;
                if expected == 0 {
                    assert_eq!(parse_minutes(&text), Lookup::NotFound);
                } else {
                    assert_eq!(parse_minutes(&text), Lookup::Found(expected), "{text}");
                }
            }
        }
    }

    #[test]
    fn test_iso_variants() {
        assert_eq!(parse_minutes("PT30M"), Lookup::Found(30));
        assert_eq!(parse_minutes("PT1H"), Lookup::Found(60));
        assert_eq!(parse_minutes("P1DT2H"), Lookup::Found(1560));
        assert_eq!(parse_minutes("PT5400.0S"), Lookup::Found(90));
        assert_eq!(parse_minutes("PT300S"), Lookup::Found(5));
        assert_eq!(parse_minutes("pt20m"), Lookup::Found(20));
        assert_eq!(parse_minutes("PT15-20M"), Lookup::Found(20));
    }

    #[test]
    fn test_zero_is_not_found() {
        assert_eq!(parse_minutes("PT0M"), Lookup::NotFound);
        assert_eq!(parse_minutes("0"), Lookup::NotFound);
        assert_eq!(parse_minutes("0 minutes"), Lookup::NotFound);
        assert_eq!(parse_minutes(""), Lookup::NotFound);
    }

    #[test]
    fn test_plain_number() {
        assert_eq!(parse_minutes("45"), Lookup::Found(45));
        assert_eq!(parse_minutes(" 12 "), Lookup::Found(12));
    }

    #[test]
    fn test_ranges_use_upper_bound() {
        assert_eq!(parse_minutes("10-15 minutes"), Lookup::Found(15));
        assert_eq!(parse_minutes("10 to 15 minutes"), Lookup::Found(15));
        assert_eq!(parse_minutes("12-15 minutes"), Lookup::Found(15));
        assert_eq!(parse_minutes("1-2 hours"), Lookup::Found(120));
    }

    #[test]
    fn test_natural_language() {
        assert_eq!(parse_minutes("1 hour 30 minutes"), Lookup::Found(90));
        assert_eq!(parse_minutes("2 hrs 5 mins"), Lookup::Found(125));
        assert_eq!(parse_minutes("Prep: 25 min"), Lookup::Found(25));
        assert_eq!(parse_minutes("1 day 2 hours"), Lookup::Found(1560));
        assert_eq!(parse_minutes("90 seconds"), Lookup::Found(2));
        assert_eq!(parse_minutes("2 Hours"), Lookup::Found(120));
    }

    #[test]
    fn test_fractional_hours() {
        assert_eq!(parse_minutes("1½ hours"), Lookup::Found(90));
        assert_eq!(parse_minutes("½ hour"), Lookup::Found(30));
        assert_eq!(parse_minutes("1 1/2 hours"), Lookup::Found(90));
        assert_eq!(parse_minutes("3/4 hour"), Lookup::Found(45));
        assert_eq!(parse_minutes("1.5 hours"), Lookup::Found(90));
        assert_eq!(parse_minutes("2¼ hours"), Lookup::Found(135));
    }

    #[test]
    fn test_unrecognised_text() {
        assert!(matches!(
            parse_minutes("overnight"),
            Lookup::Failed(ExtractError::InvalidDurationText(_))
        ));
        assert!(matches!(
            parse_minutes("PT"),
            Lookup::Failed(ExtractError::InvalidDurationText(_))
        ));
    }

    #[test]
    fn test_totals_beyond_u32_are_rejected() {
        assert_eq!(parse_minutes("PT4294967295M"), Lookup::Found(u32::MAX));
        assert!(matches!(
            parse_minutes("PT99999999999M"),
            Lookup::Failed(ExtractError::InvalidDurationText(_))
        ));
        assert!(matches!(
            parse_minutes("99999999999 days"),
            Lookup::Failed(ExtractError::InvalidDurationText(_))
        ));
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_fraction("1½"), Some(1.5));
        assert_eq!(parse_fraction("⅓"), Some(1.0 / 3.0));
        assert_eq!(parse_fraction("1 1/2"), Some(1.5));
        assert_eq!(parse_fraction("3/4"), Some(0.75));
        assert_eq!(parse_fraction("2"), Some(2.0));
        assert_eq!(parse_fraction("1/0"), None);
        assert_eq!(parse_fraction(""), None);
    }
}
