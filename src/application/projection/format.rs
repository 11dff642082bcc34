//! Display formatters shared by the screen projections

use rust_decimal::{Decimal, RoundingStrategy};

/// `HH:MM:SS`; negative durations clamp to zero, hours may exceed 99.
pub fn format_duration_hhmmss(total_secs: i64) -> String {
    let secs = total_secs.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Amount rounded to cents with the unit's symbol.
///
/// Unknown units fall back to the ISO code as a suffix.
pub fn format_currency(amount: Decimal, unit: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let value = format!("{:.2}", rounded);
    match unit.to_ascii_uppercase().as_str() {
        "EUR" => format!("{} €", value),
        "USD" => format!("${}", value),
        "GBP" => format!("£{}", value),
        "JPY" => format!("¥{}", value),
        other => format!("{} {}", value, other),
    }
}

/// Energy in kWh with two decimals from a Wh reading
pub fn format_kwh(wh: f64) -> String {
    format!("{:.2}", (wh / 10.0).round() / 100.0)
}

/// Connector letter from its 1-based id: 1 → A, 2 → B...
pub fn connector_letter(connector_id: u32) -> Option<char> {
    match connector_id {
        1..=26 => char::from_u32('A' as u32 + connector_id - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_hhmmss() {
        assert_eq!(format_duration_hhmmss(3725), "01:02:05");
        assert_eq!(format_duration_hhmmss(0), "00:00:00");
        assert_eq!(format_duration_hhmmss(59), "00:00:59");
        assert_eq!(format_duration_hhmmss(-10), "00:00:00");
        assert_eq!(format_duration_hhmmss(100 * 3600), "100:00:00");
    }

    #[test]
    fn test_currency_units() {
        assert_eq!(format_currency(Decimal::new(12345, 3), "EUR"), "12.35 €");
        assert_eq!(format_currency(Decimal::new(5, 0), "usd"), "$5.00");
        assert_eq!(format_currency(Decimal::new(-1005, 3), "GBP"), "£-1.01");
        assert_eq!(format_currency(Decimal::new(250, 0), "UZS"), "250.00 UZS");
    }

    #[test]
    fn test_kwh_rounding() {
        assert_eq!(format_kwh(12_345.0), "12.35");
        assert_eq!(format_kwh(0.0), "0.00");
        assert_eq!(format_kwh(999.0), "1.00");
    }

    #[test]
    fn test_connector_letters() {
        assert_eq!(connector_letter(1), Some('A'));
        assert_eq!(connector_letter(3), Some('C'));
        assert_eq!(connector_letter(0), None);
        assert_eq!(connector_letter(27), None);
    }
}
