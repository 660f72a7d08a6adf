//! Transform pipeline
//!
//! Pure post-validation normalization. A transform only ever sees a value
//! that already passed its structural and refinement checks, and its output
//! is embedded in the validated result without being validated again.
//!
//! Every transform is idempotent: applying it to its own output returns the
//! same output. A transform that cannot produce a canonical value returns an
//! error message, which the validator records as a transform violation.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::refine;

type TransformFn = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;

/// A named, pure normalization step.
#[derive(Clone)]
pub struct Transform {
    name: Cow<'static, str>,
    apply: Arc<TransformFn>,
}

impl Transform {
    /// Creates a transform from a function.
    pub fn new(
        name: &'static str,
        apply: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            apply: Arc::new(apply),
        }
    }

    /// Returns the transform name. Composed transforms join names with `+`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the transform.
    pub fn apply(&self, value: &Value) -> Result<Value, String> {
        (self.apply)(value)
    }

    /// Composes two transforms: `next` runs on the output of `self`.
    pub fn then(self, next: Transform) -> Transform {
        let name = format!("{}+{}", self.name, next.name);
        let first = self.apply;
        let second = next.apply;
        Transform {
            name: Cow::Owned(name),
            apply: Arc::new(move |value| {
                let intermediate = first(value)?;
                second(&intermediate)
            }),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform").field("name", &self.name).finish()
    }
}

/// Parses `YYYY-MM-DD` (or an already canonical `YYYY-MM-DDT00:00:00Z`)
/// into UTC midnight of that calendar day.
///
/// Components are read digit by digit; no locale or timezone-aware parser is
/// involved, so the result never shifts with the host environment. Dates that
/// do not exist on the calendar (`2023-02-30`) are rejected, not rolled over.
pub fn parse_date_only(s: &str) -> Result<DateTime<Utc>, String> {
    if !refine::is_date_only(s) && !refine::is_utc_midnight(s) {
        return Err("Date must be in format YYYY-MM-DD".into());
    }

    // Both shapes start with ten ASCII bytes `YYYY-MM-DD`
    let bytes = s.as_bytes();
    let year = ascii_number(&bytes[0..4]);
    let month = ascii_number(&bytes[5..7]);
    let day = ascii_number(&bytes[8..10]);

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| format!("Invalid calendar date: {}", &s[0..10]))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("Invalid calendar date: {}", &s[0..10]))?;

    Ok(Utc.from_utc_datetime(&midnight))
}

/// Formats a timestamp in the canonical form produced by [`date_only_to_utc`].
pub fn format_utc(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn ascii_number(digits: &[u8]) -> u32 {
    digits
        .iter()
        .fold(0, |acc, d| acc * 10 + u32::from(d - b'0'))
}

/// Date-only string to canonical UTC midnight timestamp string.
pub fn date_only_to_utc() -> Transform {
    Transform::new("date_only_to_utc", |value| {
        let s = value.as_str().ok_or("Expected date string")?;
        let ts = parse_date_only(s)?;
        Ok(Value::String(format_utc(&ts)))
    })
}

/// Strips leading and trailing whitespace.
pub fn trim() -> Transform {
    Transform::new("trim", |value| {
        let s = value.as_str().ok_or("Expected string")?;
        Ok(Value::String(s.trim().to_string()))
    })
}

pub fn lowercase() -> Transform {
    Transform::new("lowercase", |value| {
        let s = value.as_str().ok_or("Expected string")?;
        Ok(Value::String(s.to_lowercase()))
    })
}

/// Names accepted by [`lookup`].
pub const TRANSFORM_NAMES: &[&str] = &["date_only_to_utc", "trim", "lowercase"];

/// Resolves a built-in transform by name.
pub fn lookup(name: &str) -> Option<Transform> {
    match name {
        "date_only_to_utc" => Some(date_only_to_utc()),
        "trim" => Some(trim()),
        "lowercase" => Some(lowercase()),
        _ => None,
    }
}
