use std::fmt;

use crate::error::FeeError;

/// `HH:mm`形式のテキストから取り出した時と分。
///
/// 範囲チェックは行わないため、`25:99`のような値もそのまま保持する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: i64,
    pub minute: i64,
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// 時刻のテキストを`ClockTime`にパースする。
///
/// `:`で分割して、ちょうど2つのセグメントがそれぞれ整数として読めることだけを確認する。
///
/// # Arguments
///
/// * `text` - `HH:mm`形式の時刻
///
/// # Examples
///
/// ```
/// use parking_calculator::parse_clock_time;
///
/// let time = parse_clock_time("08:30").unwrap();
/// assert_eq!(time.hour, 8);
/// ```
pub fn parse_clock_time(text: &str) -> Result<ClockTime, FeeError> {
    let malformed = || FeeError::MalformedTime(text.to_string());

    let segments: Vec<&str> = text.split(':').collect();
    let [hour, minute] = segments.as_slice() else {
        return Err(malformed());
    };

    Ok(ClockTime {
        hour: parse_leading_integer(hour).ok_or_else(malformed)?,
        minute: parse_leading_integer(minute).ok_or_else(malformed)?,
    })
}

/// セグメント先頭の整数を読み取る。
///
/// 先頭の空白と符号を許容し、数字が1つ以上続けば残りの文字は無視する。
/// `0x`で始まる場合は16進数として読む。
fn parse_leading_integer(segment: &str) -> Option<i64> {
    let trimmed = segment.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };
    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -value } else { value })
}
