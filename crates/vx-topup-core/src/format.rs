//! Input formatters and Rupiah rendering.
//!
//! Every formatter is idempotent: feeding its own output back yields the same text.

pub const CARD_NUMBER_MAX_LEN: usize = 19;
const EXPIRY_MAX_DIGITS: usize = 4;

pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// `"4111111111111111"` → `"4111 1111 1111 1111"`.
pub fn format_card_number(raw: &str) -> String {
    let digits = digits_only(raw);
    let mut out = String::with_capacity(CARD_NUMBER_MAX_LEN);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(digit);
    }
    out.truncate(CARD_NUMBER_MAX_LEN);
    out
}

/// `"1229"` → `"12/29"`; the slash appears as soon as the month is complete.
pub fn format_expiry(raw: &str) -> String {
    let digits: String = digits_only(raw).chars().take(EXPIRY_MAX_DIGITS).collect();
    if digits.len() < 2 {
        return digits;
    }
    let (month, year) = digits.split_at(2);
    format!("{month}/{year}")
}

pub fn format_cvv(raw: &str) -> String {
    digits_only(raw)
}

/// Parses the digits of `raw`, saturating instead of overflowing, and clamps to `max`.
/// No digits at all parses as 0.
pub fn parse_amount(raw: &str, max: u64) -> u64 {
    raw.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)))
        .min(max)
}

/// Normalises free-text amount input into its stored value and its displayed text.
pub fn format_amount_input(raw: &str, max: u64) -> (u64, String) {
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return (0, String::new());
    }
    let amount = parse_amount(raw, max);
    (amount, format_grouped(amount))
}

/// Integer with `.` thousands separators, as written in id-ID.
pub fn format_grouped(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(digit);
    }
    out
}

/// Rupiah with no fraction digits, e.g. `Rp 51.450` (non-breaking space).
pub fn format_idr(amount: u64) -> String {
    format!("Rp\u{a0}{}", format_grouped(amount))
}
