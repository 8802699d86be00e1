/// Country code assumed for local subscriber numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "55";

/// Shortest accepted number: country code + area code + subscriber number.
pub const MIN_PHONE_DIGITS: usize = 12;

/// Canonicalizes a free-form phone value into a digit string.
///
/// Every non-digit is dropped. Local numbers (10 or 11 digits, with or without
/// the mobile prefix) get the default country code prepended; anything else is
/// returned as-is and left for [`is_valid`] to judge.
pub fn normalize(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 || digits.len() == 11 {
        format!("{}{}", DEFAULT_COUNTRY_CODE, digits)
    } else {
        digits
    }
}

pub fn is_valid(normalized: &str) -> bool {
    normalized.len() >= MIN_PHONE_DIGITS
}

/// Drops a leading default country code, if any.
pub fn strip_country_code(phone: &str) -> &str {
    phone.strip_prefix(DEFAULT_COUNTRY_CODE).unwrap_or(phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mobile_number_gets_country_code() {
        assert_eq!(normalize("11987654321"), "5511987654321");
        assert!(is_valid(&normalize("11987654321")));
    }

    #[test]
    fn local_landline_number_gets_country_code() {
        assert_eq!(normalize("1133334444"), "551133334444");
        assert!(is_valid(&normalize("1133334444")));
    }

    #[test]
    fn formatting_is_stripped() {
        assert_eq!(normalize("(11) 98765-4321"), "5511987654321");
        assert_eq!(normalize("+55 11 98765-4321"), "5511987654321");
    }

    #[test]
    fn other_lengths_pass_through() {
        assert_eq!(normalize("5511987654321"), "5511987654321");
        assert_eq!(normalize("12345"), "12345");
        assert_eq!(normalize("447911123456"), "447911123456");
    }

    #[test]
    fn non_digit_input_is_empty() {
        assert_eq!(normalize("abc"), "");
        assert_eq!(normalize(""), "");
        assert!(!is_valid(""));
    }

    #[test]
    fn short_numbers_are_invalid() {
        assert!(!is_valid(&normalize("987654321")));
        assert!(!is_valid("55119876"));
    }

    #[test]
    fn strips_only_leading_country_code() {
        assert_eq!(strip_country_code("5511987654321"), "11987654321");
        assert_eq!(strip_country_code("447911123456"), "447911123456");
    }
}
