use std::str::FromStr;

use crate::models::Address;

/// Parse an address from string, with better error messages
pub fn parse_address(s: &str) -> anyhow::Result<Address> {
    Address::from_str(s).map_err(|e| anyhow::anyhow!("Invalid address {}: {}", s, e))
}

/// Format an address for display (truncated)
pub fn format_address(address: &Address) -> String {
    let s = address.to_string();
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}

/// Truncate a string to a maximum length
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_display() {
        let address = parse_address("0xabcdef0123456789abcdef0123456789abcdef01").unwrap();
        assert_eq!(format_address(&address), "0xabcd...ef01");
    }

    #[test]
    fn truncates_long_strings() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a very long vault name", 10), "a very ...");
    }
}
