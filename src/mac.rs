//! Textual MAC address check used before any user lookup or update.
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

fn mac_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[0-9a-f]{2}([-:][0-9a-f]{2}){5}$").expect("static MAC pattern")
    })
}

/// Returns true when `mac` is six hex pairs separated by `:` or `-`.
/// Separators may be mixed; case is ignored.
pub fn is_valid_mac(mac: &str) -> bool {
    mac_pattern().is_match(mac)
}

/// Rejects anything `is_valid_mac` does not accept with a usage error.
pub fn validate_mac_address(mac: &str) -> Result<()> {
    if is_valid_mac(mac) {
        Ok(())
    } else {
        Err(Error::usage("Invalid MAC address specified"))
    }
}
