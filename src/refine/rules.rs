//! Refinement records and the built-in refinement library.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::patterns;

type Predicate = dyn Fn(&Value) -> bool + Send + Sync;

/// A pure predicate over a single value plus the message reported when it fails.
///
/// Cloning is cheap: the predicate is shared behind an `Arc`.
#[derive(Clone)]
pub struct Refinement {
    name: &'static str,
    message: Cow<'static, str>,
    predicate: Arc<Predicate>,
}

impl Refinement {
    /// Creates a refinement over any JSON value.
    pub fn new(
        name: &'static str,
        message: impl Into<Cow<'static, str>>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            message: message.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Creates a refinement over string values. Non-strings never satisfy it.
    pub fn on_str(
        name: &'static str,
        message: impl Into<Cow<'static, str>>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, message, move |value| {
            value.as_str().map_or(false, |s| predicate(s))
        })
    }

    /// Creates a refinement over numeric values. Non-numbers never satisfy it.
    pub fn on_number(
        name: &'static str,
        message: impl Into<Cow<'static, str>>,
        predicate: impl Fn(f64) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, message, move |value| {
            value.as_f64().map_or(false, |n| predicate(n))
        })
    }

    /// Returns the refinement name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Evaluates the predicate, returning the failure message on rejection.
    pub fn check(&self, value: &Value) -> Result<(), &str> {
        if (self.predicate)(value) {
            Ok(())
        } else {
            Err(self.message.as_ref())
        }
    }
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish()
    }
}

/// US mobile phone number.
pub fn phone() -> Refinement {
    Refinement::on_str("phone", "Must be valid phone number", patterns::is_phone)
}

/// US postal code.
pub fn zip() -> Refinement {
    Refinement::on_str("zip", "Must be valid Zip code", patterns::is_zip)
}

/// Fully-qualified domain name, or URL with an explicit protocol.
pub fn domain() -> Refinement {
    Refinement::on_str("domain", "Must be valid domain", patterns::is_domain)
}

/// URL with or without protocol. Accepts everything [`domain`] accepts, and more.
pub fn url_or_domain() -> Refinement {
    Refinement::on_str(
        "url_or_domain",
        "Must be valid URL or domain",
        patterns::is_url_or_domain,
    )
}

/// Employer Identification Number.
pub fn ein() -> Refinement {
    Refinement::on_str("ein", "EIN must be in format XX-XXXXXXX", patterns::is_ein)
}

/// Zero-padded `YYYY-MM-DD`. Calendar validity is checked by the date transform.
pub fn date_only() -> Refinement {
    Refinement::on_str(
        "date_only",
        "Date must be in format YYYY-MM-DD",
        patterns::is_date_only,
    )
}

/// Canonical UTC midnight timestamp, the output shape of the date transform.
pub fn utc_midnight() -> Refinement {
    Refinement::on_str(
        "utc_midnight",
        "Date must be a UTC midnight timestamp",
        patterns::is_utc_midnight,
    )
}

pub fn email() -> Refinement {
    Refinement::on_str("email", "Must be valid email", patterns::is_email)
}

pub fn non_empty() -> Refinement {
    Refinement::on_str("non_empty", "Must not be empty", |s| !s.trim().is_empty())
}

pub fn positive() -> Refinement {
    Refinement::on_number("positive", "Number must be greater than 0", |n| n > 0.0)
}

/// Minimum length in characters.
pub fn min_length(min: usize) -> Refinement {
    Refinement::on_str(
        "min_length",
        format!("String must contain at least {} character(s)", min),
        move |s| s.chars().count() >= min,
    )
}

/// Maximum length in characters.
pub fn max_length(max: usize) -> Refinement {
    Refinement::on_str(
        "max_length",
        format!("String must contain at most {} character(s)", max),
        move |s| s.chars().count() <= max,
    )
}

/// Password strength rules. Each failing rule reports its own message.
pub fn password() -> Vec<Refinement> {
    vec![
        Refinement::on_str(
            "password_length",
            "Password must be at least 8 characters",
            |s| s.chars().count() >= 8,
        ),
        Refinement::on_str(
            "password_letter",
            "Password must contain at least one letter",
            |s| s.chars().any(|c| c.is_ascii_alphabetic()),
        ),
        Refinement::on_str(
            "password_digit",
            "Password must contain at least one number",
            |s| s.chars().any(|c| c.is_ascii_digit()),
        ),
    ]
}

/// Names accepted by [`lookup`]. `min_length` and `max_length` take an
/// argument: `min_length:3`.
pub const REFINEMENT_NAMES: &[&str] = &[
    "phone",
    "zip",
    "domain",
    "url_or_domain",
    "ein",
    "date_only",
    "utc_midnight",
    "email",
    "non_empty",
    "positive",
    "password",
    "min_length",
    "max_length",
];

/// Resolves a refinement by name. Returns `None` for unknown names or a
/// malformed argument.
pub fn lookup(name: &str) -> Option<Vec<Refinement>> {
    let (base, arg) = match name.split_once(':') {
        Some((base, arg)) => (base, Some(arg)),
        None => (name, None),
    };

    let found = match (base, arg) {
        ("phone", None) => vec![phone()],
        ("zip", None) => vec![zip()],
        ("domain", None) => vec![domain()],
        ("url_or_domain", None) => vec![url_or_domain()],
        ("ein", None) => vec![ein()],
        ("date_only", None) => vec![date_only()],
        ("utc_midnight", None) => vec![utc_midnight()],
        ("email", None) => vec![email()],
        ("non_empty", None) => vec![non_empty()],
        ("positive", None) => vec![positive()],
        ("password", None) => password(),
        ("min_length", Some(n)) => vec![min_length(n.trim().parse().ok()?)],
        ("max_length", Some(n)) => vec![max_length(n.trim().parse().ok()?)],
        _ => return None,
    };

    Some(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failures(rules: &[Refinement], value: &Value) -> Vec<String> {
        rules
            .iter()
            .filter_map(|r| r.check(value).err().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            phone().check(&json!("not a phone")),
            Err("Must be valid phone number")
        );
        assert_eq!(zip().check(&json!("1234")), Err("Must be valid Zip code"));
        assert_eq!(
            ein().check(&json!("123456789")),
            Err("EIN must be in format XX-XXXXXXX")
        );
    }

    #[test]
    fn test_ein_examples() {
        let rule = ein();
        assert!(rule.check(&json!("12-3456789")).is_ok());
        for bad in ["123456789", "12-345678", "AB-1234567"] {
            assert!(rule.check(&json!(bad)).is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_string_refinement_rejects_non_string() {
        assert!(zip().check(&json!(10001)).is_err());
    }

    #[test]
    fn test_password_reports_each_failing_rule() {
        let rules = password();

        assert!(failures(&rules, &json!("hunter22x")).is_empty());

        let msgs = failures(&rules, &json!("abc"));
        assert_eq!(
            msgs,
            vec![
                "Password must be at least 8 characters",
                "Password must contain at least one number",
            ]
        );

        let msgs = failures(&rules, &json!("12345678"));
        assert_eq!(msgs, vec!["Password must contain at least one letter"]);

        assert_eq!(failures(&rules, &json!("")).len(), 3);
    }

    #[test]
    fn test_length_bounds_count_characters() {
        assert!(min_length(3).check(&json!("héé")).is_ok());
        assert!(max_length(2).check(&json!("héé")).is_err());
        assert_eq!(
            min_length(3).message(),
            "String must contain at least 3 character(s)"
        );
    }

    #[test]
    fn test_positive() {
        assert!(positive().check(&json!(1)).is_ok());
        assert!(positive().check(&json!(0)).is_err());
        assert!(positive().check(&json!("1")).is_err());
    }

    #[test]
    fn test_lookup() {
        for name in REFINEMENT_NAMES {
            let lookup_name = match *name {
                "min_length" | "max_length" => format!("{}:4", name),
                _ => name.to_string(),
            };
            assert!(lookup(&lookup_name).is_some(), "lookup failed for {}", lookup_name);
        }
        assert_eq!(lookup("password").map(|r| r.len()), Some(3));
        assert!(lookup("min_length").is_none());
        assert!(lookup("min_length:abc").is_none());
        assert!(lookup("zip:5").is_none());
        assert!(lookup("ssn").is_none());
    }

    #[test]
    fn test_refinements_are_shareable_across_threads() {
        let rule = zip();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let rule = rule.clone();
                std::thread::spawn(move || rule.check(&json!("10001")).is_ok())
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
    }
}
