use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a user-entered price.
///
/// Anything that is not a non-negative number becomes zero; the engine is
/// only ever handed sanitized amounts.
pub fn parse_price(input: &str) -> Decimal {
    let trimmed = input.trim().trim_start_matches('$').replace(',', "");
    match Decimal::from_str(&trimmed) {
        Ok(price) if price.is_sign_negative() => Decimal::ZERO,
        Ok(price) => price,
        Err(_) => Decimal::ZERO,
    }
}

/// `12345` or `12345-6789`
pub fn is_valid_zip(zip: &str) -> bool {
    let bytes = zip.as_bytes();
    let digits = |s: &[u8]| s.iter().all(u8::is_ascii_digit);
    match bytes.len() {
        5 => digits(bytes),
        10 => digits(&bytes[..5]) && bytes[5] == b'-' && digits(&bytes[6..]),
        _ => false,
    }
}

/// Format as US dollars, e.g. `$1,234.50`
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}${}.{}", sign, grouped, cents)
}

/// Format a percentage rate with three decimals, e.g. `8.875%`
pub fn format_rate(rate: Decimal) -> String {
    format!("{:.3}%", rate)
}
