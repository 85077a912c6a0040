//! Custom duration draft typed into the configuration dialog

use serde::{Deserialize, Serialize};

/// Minutes and seconds text pending validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationDraft {
    #[serde(default)]
    pub minutes: String,
    #[serde(default)]
    pub seconds: String,
}

impl DurationDraft {
    pub fn new(minutes: impl Into<String>, seconds: impl Into<String>) -> Self {
        Self {
            minutes: minutes.into(),
            seconds: seconds.into(),
        }
    }

    pub fn minutes_value(&self) -> i64 {
        parse_leading_int(&self.minutes)
    }

    pub fn seconds_value(&self) -> i64 {
        parse_leading_int(&self.seconds)
    }

    /// Signed total; only positive totals are ever committed
    pub fn total_seconds(&self) -> i128 {
        i128::from(self.minutes_value()) * 60 + i128::from(self.seconds_value())
    }
}

/// Lenient integer parse: leading whitespace, optional sign, then as many digits
/// as are present. Text without leading digits counts as 0.
fn parse_leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });

    if negative { -magnitude } else { magnitude }
}
