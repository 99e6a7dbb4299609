//! Article date handling without timezone dependencies.
//!
//! Article headers carry dates like `2025-09-19` or `2025-09-19 10:20`.
//! Only the calendar fields matter for exported files and save-as paths,
//! so the time part is parsed for validation and otherwise kept as-is.
//!
//! # Examples
//!
//! ```ignore
//! let date = ArticleDate::parse("2025-09-19 10:20").unwrap();
//! assert_eq!(date.ymd(), "2025-09-19");
//! assert_eq!(date.format_spec('m'), Some("09".to_string()));
//! ```

use anyhow::{Result, bail};

/// Calendar date with an optional wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ArticleDate {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Parse `YYYY-MM-DD`, optionally followed by ` HH:MM[:SS]` or
    /// `THH:MM[:SS][Z]`.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.trim().as_bytes();
        if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        let month = parse_u8(&bytes[5..7])?;
        let day = parse_u8(&bytes[8..10])?;

        let (hour, minute, second) = match &bytes[10..] {
            [] => (0, 0, 0),
            [b' ' | b'T', time @ ..] => parse_time(time.strip_suffix(b"Z").unwrap_or(time))?,
            _ => return None,
        };

        let date = Self::new(year, month, day, hour, minute, second);
        date.validate().ok()?;
        Some(date)
    }

    pub fn validate(&self) -> Result<()> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = *self;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }
        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }
        if hour > 23 {
            bail!("hour is invalid: {hour}");
        }
        if minute > 59 {
            bail!("minute is invalid: {minute}");
        }
        if second > 59 {
            bail!("second is invalid: {second}");
        }
        Ok(())
    }

    #[inline]
    #[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// `YYYY-MM-DD`
    pub fn ymd(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// Render one strftime conversion (`%Y`, `%m`, `%d`, `%H`, `%M`, `%S`).
    pub fn format_spec(self, spec: char) -> Option<String> {
        let out = match spec {
            'Y' => format!("{:04}", self.year),
            'm' => format!("{:02}", self.month),
            'd' => format!("{:02}", self.day),
            'H' => format!("{:02}", self.hour),
            'M' => format!("{:02}", self.minute),
            'S' => format!("{:02}", self.second),
            _ => return None,
        };
        Some(out)
    }
}

fn parse_time(bytes: &[u8]) -> Option<(u8, u8, u8)> {
    match bytes {
        [h1, h2, b':', m1, m2] => Some((parse_u8(&[*h1, *h2])?, parse_u8(&[*m1, *m2])?, 0)),
        [h1, h2, b':', m1, m2, b':', s1, s2] => Some((
            parse_u8(&[*h1, *h2])?,
            parse_u8(&[*m1, *m2])?,
            parse_u8(&[*s1, *s2])?,
        )),
        _ => None,
    }
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}
