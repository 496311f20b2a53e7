//! Presentation helpers for money amounts.

pub const DEFAULT_SYMBOL: &str = "$";

/// Renders `amount` with two fraction digits behind the currency symbol,
/// e.g. `$1200.00` or `-$400.00`.
pub fn format_amount(amount: f64, symbol: &str) -> String {
    let body = format!("{:.2}", amount.abs());
    if amount < 0.0 && body != "0.00" {
        format!("-{symbol}{body}")
    } else {
        format!("{symbol}{body}")
    }
}

/// Like [`format_amount`] but always carries an explicit sign, used for balances.
pub fn format_signed(amount: f64, symbol: &str) -> String {
    if amount > 0.0 && format!("{:.2}", amount) != "0.00" {
        format!("+{}", format_amount(amount, symbol))
    } else {
        format_amount(amount, symbol)
    }
}

/// Parses a user supplied amount, accepting an optional leading symbol.
pub fn parse_amount(raw: &str, symbol: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(symbol).unwrap_or(trimmed);
    let value: f64 = trimmed.replace(',', "").parse().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_fraction_digits() {
        assert_eq!(format_amount(1200.0, "$"), "$1200.00");
        assert_eq!(format_amount(18.5, "$"), "$18.50");
        assert_eq!(format_amount(-400.0, "$"), "-$400.00");
    }

    #[test]
    fn negative_zero_is_not_signed() {
        assert_eq!(format_amount(-0.001, "$"), "$0.00");
        assert_eq!(format_signed(0.0, "$"), "$0.00");
    }

    #[test]
    fn signed_balances() {
        assert_eq!(format_signed(600.0, "$"), "+$600.00");
        assert_eq!(format_signed(-600.0, "$"), "-$600.00");
    }

    #[test]
    fn parses_with_symbol_and_grouping() {
        assert_eq!(parse_amount("$1,200.50", "$"), Some(1200.5));
        assert_eq!(parse_amount("42", "$"), Some(42.0));
        assert_eq!(parse_amount("abc", "$"), None);
        assert_eq!(parse_amount("inf", "$"), None);
    }
}
