/// What an empty phone field shows on focus.
pub const PHONE_PREFIX: &str = "+7 ";

/// Reformats free-form input as `+7 (XXX) XXX-XX-XX`, filling in as far as
/// the digits go.
///
/// Non-digits are dropped, a leading country digit `7` or `8` is discarded and
/// at most ten national digits are kept. Returns `None` when no national
/// digits remain; the field is then left as typed.
pub fn format_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let national = digits
        .strip_prefix('7')
        .or_else(|| digits.strip_prefix('8'))
        .unwrap_or(&digits);
    if national.is_empty() {
        return None;
    }

    let part = |from: usize, to: usize| national.get(from..to.min(national.len())).unwrap_or("");
    let n = national.len();

    let mut out = format!("+7 ({}", part(0, 3));
    if n > 3 {
        out.push_str(") ");
        out.push_str(part(3, 6));
    }
    if n > 6 {
        out.push('-');
        out.push_str(part(6, 8));
    }
    if n > 8 {
        out.push('-');
        out.push_str(part(8, 10));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_progressively() {
        assert_eq!(format_phone("9").as_deref(), Some("+7 (9"));
        assert_eq!(format_phone("912").as_deref(), Some("+7 (912"));
        assert_eq!(format_phone("9123").as_deref(), Some("+7 (912) 3"));
        assert_eq!(format_phone("9123456").as_deref(), Some("+7 (912) 345-6"));
        assert_eq!(format_phone("912345678").as_deref(), Some("+7 (912) 345-67-8"));
        assert_eq!(format_phone("9123456789").as_deref(), Some("+7 (912) 345-67-89"));
    }

    #[test]
    fn strips_country_digit_and_noise() {
        assert_eq!(format_phone("8 912 345 67 89").as_deref(), Some("+7 (912) 345-67-89"));
        assert_eq!(format_phone("+7 (912) 345-67-891").as_deref(), Some("+7 (912) 345-67-89"));
        // Re-formatting already formatted text is stable.
        assert_eq!(format_phone("+7 (912) 3").as_deref(), Some("+7 (912) 3"));
    }

    #[test]
    fn prefix_alone_is_left_alone() {
        assert_eq!(format_phone(PHONE_PREFIX), None);
        assert_eq!(format_phone(""), None);
        assert_eq!(format_phone("abc"), None);
    }
}
