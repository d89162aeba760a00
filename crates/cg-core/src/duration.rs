//! Parsing for the compact duration strings used in the config file
//! (`"5m"`, `"10s"`, `"1h30m"`, `"250ms"`, `"1.5h"`).

use crate::error::{Error, Result};
use std::time::Duration;

/// Parse a duration string made of one or more `<number><unit>` groups.
///
/// Supported units are `ms`, `s`, `m` and `h`. A bare `"0"` is accepted.
pub fn parse_duration(input: &str) -> Result<Duration> {
  let s = input.trim();
  if s.is_empty() {
    return Err(Error::Config("empty duration".to_string()));
  }
  if s == "0" {
    return Ok(Duration::ZERO);
  }

  let mut total_secs = 0f64;
  let mut rest = s;

  while !rest.is_empty() {
    let num_len = rest.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(rest.len());
    if num_len == 0 {
      return Err(Error::Config(format!("invalid duration '{}': expected a number", input)));
    }
    let value: f64 = rest[..num_len]
      .parse()
      .map_err(|_| Error::Config(format!("invalid duration '{}'", input)))?;
    rest = &rest[num_len..];

    let unit_len = rest.find(|c: char| c.is_ascii_digit() || c == '.').unwrap_or(rest.len());
    let factor = match &rest[..unit_len] {
      "ms" => 0.001,
      "s" => 1.0,
      "m" => 60.0,
      "h" => 3600.0,
      "" => return Err(Error::Config(format!("invalid duration '{}': missing unit", input))),
      unit => {
        return Err(Error::Config(format!("invalid duration '{}': unknown unit '{}'", input, unit)))
      }
    };
    rest = &rest[unit_len..];
    total_secs += value * factor;
  }

  Duration::try_from_secs_f64(total_secs)
    .map_err(|_| Error::Config(format!("duration '{}' out of range", input)))
}

/// Format a duration back into the compact form, picking the largest exact unit.
pub fn format_duration(duration: Duration) -> String {
  let millis = duration.as_millis();
  if millis == 0 {
    "0s".to_string()
  } else if millis % 3_600_000 == 0 {
    format!("{}h", millis / 3_600_000)
  } else if millis % 60_000 == 0 {
    format!("{}m", millis / 60_000)
  } else if millis % 1000 == 0 {
    format!("{}s", millis / 1000)
  } else {
    format!("{}ms", millis)
  }
}
