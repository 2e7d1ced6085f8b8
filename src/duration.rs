//! Fire period durations.
//!
//! Promsaint parses these values with Go's `time.ParseDuration`, so input
//! accepts the same grammar (`1h30m`, `1.5s`, `300ms`) and output follows the
//! rendering of Go's `Duration.String()` (`0s`, `1m30s`, `1h0m0s`).

use std::fmt::{self, Write};
use std::str::FromStr;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("negative duration {0:?} is not supported")]
    Negative(String),

    #[error("duration {0:?} is out of range")]
    Overflow(String),
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parses a duration such as `5m`, `1h30m` or `0.5s`.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());

    let mut rest = input;
    match rest.chars().next() {
        Some('-') => {
            // "-0" is still zero
            return match parse_duration(&rest[1..]) {
                Ok(d) if d.is_zero() => Ok(Duration::ZERO),
                Ok(_) => Err(DurationError::Negative(input.to_string())),
                Err(_) => Err(invalid()),
            };
        }
        Some('+') => rest = &rest[1..],
        Some(_) => {}
        None => return Err(invalid()),
    }

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let whole_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let whole = &rest[..whole_len];
        rest = &rest[whole_len..];

        let mut fraction = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            fraction = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];
        if unit.is_empty() {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        let overflow = || DurationError::Overflow(input.to_string());
        let whole_value: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut value = whole_value.checked_mul(scale).ok_or_else(overflow)?;

        // Digits past nanosecond precision cannot contribute.
        let mut divisor: u128 = 1;
        let mut frac_value: u128 = 0;
        for digit in fraction.bytes().take(20) {
            frac_value = frac_value * 10 + u128::from(digit - b'0');
            divisor *= 10;
        }
        value += frac_value * scale / divisor;

        total = total.checked_add(value).ok_or_else(overflow)?;
        if total > u128::from(u64::MAX) {
            return Err(overflow());
        }
    }

    let secs = (total / NANOS_PER_SEC) as u64;
    let nanos = (total % NANOS_PER_SEC) as u32;
    Ok(Duration::new(secs, nanos))
}

/// Renders `value / scale` in decimal with trailing fractional zeros removed.
fn fixed_point(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let width = scale.ilog10() as usize;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Formats a duration the way Promsaint expects to read it back.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < NANOS_PER_SEC {
        return if nanos < 1_000 {
            format!("{nanos}ns")
        } else if nanos < 1_000_000 {
            format!("{}µs", fixed_point(nanos, 1_000))
        } else {
            format!("{}ms", fixed_point(nanos, 1_000_000))
        };
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = u128::from(total_secs % 60) * NANOS_PER_SEC + u128::from(duration.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{hours}h{minutes}m");
    } else if minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    out.push_str(&fixed_point(seconds, NANOS_PER_SEC));
    out.push('s');
    out
}

/// A fire period as given on the command line. Go durations are signed, so
/// `-5m` is accepted and forwarded as `-5m0s`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirePeriod {
    pub negative: bool,
    pub length: Duration,
}

impl From<Duration> for FirePeriod {
    fn from(length: Duration) -> Self {
        FirePeriod {
            negative: false,
            length,
        }
    }
}

impl FromStr for FirePeriod {
    type Err = DurationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.strip_prefix('-') {
            Some(magnitude) => {
                let length = parse_duration(magnitude)?;
                Ok(FirePeriod {
                    negative: !length.is_zero(),
                    length,
                })
            }
            None => parse_duration(input).map(FirePeriod::from),
        }
    }
}

impl fmt::Display for FirePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&format_duration(self.length))
    }
}

pub fn parse_fire_period(input: &str) -> Result<FirePeriod, DurationError> {
    input.parse()
}
