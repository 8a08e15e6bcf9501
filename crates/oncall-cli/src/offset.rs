//! Signed time offsets such as `-1h`, `30m`, `2d12h` or `0`, relative to now.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;

/// A parsed offset that remembers how it was written, for error messages.
#[derive(Debug, Clone)]
pub struct Offset {
    raw: String,
    duration: Duration,
}

impl Offset {
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Offset {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            raw: input.to_string(),
            duration: parse_offset(input)?,
        })
    }
}

/// Parse a sequence of `<number><unit>` parts, optionally signed.
///
/// Units: `s`, `m`, `h`, `d`, `w`. A bare `0` is accepted.
fn parse_offset(input: &str) -> Result<Duration, String> {
    let trimmed = input.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    if body == "0" {
        return Ok(Duration::zero());
    }
    if body.is_empty() {
        return Err(format!("invalid offset {input:?}: empty"));
    }

    let mut total = Duration::zero();
    let mut digits = String::new();

    for c in body.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return Err(format!(
                "invalid offset {input:?}: expected a number before '{c}'"
            ));
        }

        let n: i64 = digits
            .parse()
            .map_err(|_| format!("invalid offset {input:?}: {digits} is too large"))?;
        let part = match c {
            's' => Duration::try_seconds(n),
            'm' => Duration::try_minutes(n),
            'h' => Duration::try_hours(n),
            'd' => Duration::try_days(n),
            'w' => Duration::try_weeks(n),
            _ => {
                return Err(format!(
                    "invalid offset {input:?}: unknown unit '{c}' (expected s, m, h, d or w)"
                ))
            }
        };
        total = part
            .and_then(|part| total.checked_add(&part))
            .ok_or_else(|| format!("invalid offset {input:?}: out of range"))?;
        digits.clear();
    }

    if !digits.is_empty() {
        return Err(format!(
            "invalid offset {input:?}: missing unit after {digits}"
        ));
    }

    Ok(if negative { -total } else { total })
}
