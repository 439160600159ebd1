/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Keeps only the ASCII digits of a phone number, e.g. "+91 98765-43210" becomes "919876543210".
pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// True if `s` is a record page id: 32 hex digits, optionally grouped with dashes.
pub fn is_page_id(s: &str) -> bool {
    let mut digits = 0;
    for c in s.chars() {
        match c {
            '-' => {},
            c if c.is_ascii_hexdigit() => digits += 1,
            _ => return false,
        }
    }
    digits == 32
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn boolean_flags() {
        assert!(parse_boolean_flag(Some("TRUE".into()), false));
        assert!(parse_boolean_flag(Some(" on ".into()), false));
        assert!(!parse_boolean_flag(Some("0".into()), true));
        assert!(parse_boolean_flag(Some("maybe".into()), true));
        assert!(!parse_boolean_flag(None, false));
    }

    #[test]
    fn phone_digits() {
        assert_eq!(digits_only("+91 98765-43210"), "919876543210");
        assert_eq!(digits_only("(022) 555 0101"), "0225550101");
        assert_eq!(digits_only("n/a"), "");
    }

    #[test]
    fn page_ids() {
        assert!(is_page_id("1a2b3c4d5e6f40718293a4b5c6d7e8f9"));
        assert!(is_page_id("9f8e7d6c-5b4a-4392-8170-6f5e4d3c2b1a"));
        assert!(!is_page_id("1a2b3c4d5e6f40718293a4b5c6d7e8f"));
        assert!(!is_page_id("../databases/1a2b3c4d5e6f40718293a4b5c6d7e8f9"));
        assert!(!is_page_id("1a2b3c4d5e6f40718293a4b5c6d7e8f9?archived=true"));
        assert!(!is_page_id(""));
    }
}
