//! Decimal and temporal conversion.
//!
//! Drivers hand decimals over in their textual form and temporals as chrono
//! values. These functions turn them into [`RowValue`]s without going
//! through floating point.

use crate::value::RowValue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error during value conversion.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Invalid decimal literal: {0:?}")]
    InvalidDecimal(String),
    #[error("Invalid date/time value: {0}")]
    InvalidTemporal(String),
    #[error("Unknown holdability code: {0}")]
    UnknownHoldability(i32),
}

/// How date, time and timestamp columns are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalMode {
    /// Keep chrono values.
    #[default]
    Native,
    /// Milliseconds since the Unix epoch, reading naive values as UTC.
    /// Times become milliseconds since midnight.
    EpochMillis,
}

/// Convert a driver's textual decimal.
///
/// Values that fit a 96-bit decimal exactly become [`RowValue::Decimal`];
/// anything wider is kept as validated text so no digit is lost.
pub fn decimal_from_text(text: &str) -> Result<RowValue, ConversionError> {
    let text = text.trim();
    if !is_decimal_literal(text) {
        return Err(ConversionError::InvalidDecimal(text.to_string()));
    }

    let exact = if text.contains(['e', 'E']) {
        // from_scientific rounds long mantissas instead of failing.
        Decimal::from_scientific(text)
            .ok()
            .filter(|d| same_digits(text, d))
    } else {
        Decimal::from_str_exact(text).ok()
    };

    Ok(match exact {
        Some(d) => RowValue::Decimal(d),
        None => RowValue::DecimalText(text.to_string()),
    })
}

/// Whether `d` carries exactly the significant digits of the literal `text`.
fn same_digits(text: &str, d: &Decimal) -> bool {
    let mantissa = match text.find(['e', 'E']) {
        Some(idx) => &text[..idx],
        None => text,
    };
    let literal: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let parsed = d.mantissa().unsigned_abs().to_string();
    significant(&literal) == significant(&parsed)
}

fn significant(digits: &str) -> &str {
    digits.trim_start_matches('0').trim_end_matches('0')
}

/// Convert a DATE value.
pub fn date_to_value(date: NaiveDate, mode: TemporalMode) -> Result<RowValue, ConversionError> {
    match mode {
        TemporalMode::Native => Ok(RowValue::Date(date)),
        TemporalMode::EpochMillis => {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| ConversionError::InvalidTemporal(date.to_string()))?;
            Ok(RowValue::Long(midnight.and_utc().timestamp_millis()))
        }
    }
}

/// Convert a TIME value.
pub fn time_to_value(time: NaiveTime, mode: TemporalMode) -> Result<RowValue, ConversionError> {
    match mode {
        TemporalMode::Native => Ok(RowValue::Time(time)),
        TemporalMode::EpochMillis => {
            let millis = i64::from(time.num_seconds_from_midnight()) * 1000
                + i64::from(time.nanosecond()) / 1_000_000;
            Ok(RowValue::Long(millis))
        }
    }
}

/// Convert a TIMESTAMP value.
pub fn timestamp_to_value(
    ts: NaiveDateTime,
    mode: TemporalMode,
) -> Result<RowValue, ConversionError> {
    match mode {
        TemporalMode::Native => Ok(RowValue::Timestamp(ts)),
        TemporalMode::EpochMillis => Ok(RowValue::Long(ts.and_utc().timestamp_millis())),
    }
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`, with at least one mantissa digit.
fn is_decimal_literal(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && all_digits(exp)
        }
    }
}
