//! Compiled patterns backing the string refinements.
//!
//! Patterns are compiled on first use and cached for the process lifetime.
//! Digit classes are spelled `[0-9]` because `\d` matches any Unicode digit.

use regex::Regex;
use std::sync::OnceLock;

const PHONE: &str =
    r"^(?:(?:\+1|1)[ -]?)?(?:\([2-9][0-9]{2}\)|[2-9][0-9]{2})[ -]?[2-9][0-9]{2}[ -]?[0-9]{4}$";

const ZIP: &str = r"^[0-9]{5}(?:-[0-9]{4})?$";

/// Bare FQDN, or an http(s) URL whose host is an FQDN.
const DOMAIN: &str = r"(?i)^(?:(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}|https?://(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}(?::[0-9]{1,5})?(?:[/?#]\S*)?)$";

/// Protocol is optional, and a path may follow a bare host.
const URL_OR_DOMAIN: &str = r"(?i)^(?:https?://)?(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}(?::[0-9]{1,5})?(?:[/?#]\S*)?$";

const EIN: &str = r"^[0-9]{2}-[0-9]{7}$";

const DATE_ONLY: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$";

const UTC_MIDNIGHT: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T00:00:00(?:\.0+)?Z$";

const EMAIL: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("refinement pattern must compile"))
}

macro_rules! pattern_fn {
    ($(#[$doc:meta])* $name:ident, $pattern:ident) => {
        $(#[$doc])*
        pub fn $name(s: &str) -> bool {
            static RE: OnceLock<Regex> = OnceLock::new();
            cached(&RE, $pattern).is_match(s)
        }
    };
}

pattern_fn!(
    /// Valid US mobile number, with optional `+1`/`1` prefix and separators.
    is_phone,
    PHONE
);
pattern_fn!(
    /// Five-digit US postal code with optional `-DDDD` suffix.
    is_zip,
    ZIP
);
pattern_fn!(
    /// FQDN, or a URL that names its protocol.
    is_domain,
    DOMAIN
);
pattern_fn!(
    /// URL with or without protocol.
    is_url_or_domain,
    URL_OR_DOMAIN
);
pattern_fn!(
    /// Exactly `DD-DDDDDDD`.
    is_ein,
    EIN
);
pattern_fn!(
    /// Exactly `YYYY-MM-DD`, zero padded.
    is_date_only,
    DATE_ONLY
);
pattern_fn!(
    /// A canonical UTC midnight timestamp such as `2023-06-15T00:00:00Z`.
    is_utc_midnight,
    UTC_MIDNIGHT
);
pattern_fn!(is_email, EMAIL);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        for pattern in [
            PHONE,
            ZIP,
            DOMAIN,
            URL_OR_DOMAIN,
            EIN,
            DATE_ONLY,
            UTC_MIDNIGHT,
            EMAIL,
        ] {
            assert!(Regex::new(pattern).is_ok(), "pattern failed: {}", pattern);
        }
    }

    #[test]
    fn test_phone_accepts_us_mobile_formats() {
        for ok in [
            "2025550143",
            "202-555-0143",
            "(202) 555-0143",
            "+1 202 555 0143",
            "1-202-555-0143",
            "+12025550143",
        ] {
            assert!(is_phone(ok), "expected phone to accept {}", ok);
        }
    }

    #[test]
    fn test_phone_rejects_invalid() {
        for bad in [
            "",
            "555-0143",
            "102-555-0143",
            "202-155-0143",
            "+44 20 7946 0958",
            "202555014",
            "phone",
            "٢٠٢٥٥٥٠١٤٣",
        ] {
            assert!(!is_phone(bad), "expected phone to reject {}", bad);
        }
    }

    #[test]
    fn test_zip() {
        assert!(is_zip("10001"));
        assert!(is_zip("10001-1234"));
        assert!(!is_zip("1000"));
        assert!(!is_zip("10001-12"));
        assert!(!is_zip("ABCDE"));
    }

    #[test]
    fn test_domain_vs_url_or_domain_asymmetry() {
        // Both accept a bare FQDN and a full URL
        for s in ["example.com", "sub.example.co.uk", "https://example.com/about"] {
            assert!(is_domain(s), "domain should accept {}", s);
            assert!(is_url_or_domain(s), "url_or_domain should accept {}", s);
        }

        // Only url_or_domain accepts a host with a path but no protocol
        assert!(!is_domain("example.com/about"));
        assert!(is_url_or_domain("example.com/about"));

        // Neither accepts bare words
        for s in ["localhost", "not a domain", "example", "http://"] {
            assert!(!is_domain(s), "domain should reject {}", s);
            assert!(!is_url_or_domain(s), "url_or_domain should reject {}", s);
        }
    }

    #[test]
    fn test_ein() {
        assert!(is_ein("12-3456789"));
        assert!(!is_ein("123456789"));
        assert!(!is_ein("12-345678"));
        assert!(!is_ein("AB-1234567"));
        assert!(!is_ein(" 12-3456789"));
    }

    #[test]
    fn test_date_only_requires_zero_padding() {
        assert!(is_date_only("2023-06-15"));
        assert!(!is_date_only("2023-6-15"));
        assert!(!is_date_only("2023-06-15T00:00:00Z"));
        assert!(!is_date_only("15/06/2023"));
    }

    #[test]
    fn test_utc_midnight() {
        assert!(is_utc_midnight("2023-06-15T00:00:00Z"));
        assert!(is_utc_midnight("2023-06-15T00:00:00.000Z"));
        assert!(!is_utc_midnight("2023-06-15T01:00:00Z"));
        assert!(!is_utc_midnight("2023-06-15T00:00:00+02:00"));
    }
}
