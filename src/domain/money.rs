use thiserror::Error;

/// Money is represented as integer cents (minor units) to avoid floating-point drift.
/// For USD/EUR, 1 unit = 100 cents, so $50.00 = 5000 cents.
pub type Cents = i64;

/// Currency used when nothing else is configured.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Largest single amount accepted: 100 billion major units.
/// Keeps the sum of any realistic ledger far from `i64` overflow.
pub const MAX_AMOUNT_CENTS: Cents = 10_000_000_000_000;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    #[error("Please enter an amount.")]
    Missing,

    #[error("Enter a positive number for amount.")]
    Invalid,
}

/// Parse a user-entered amount into cents.
///
/// The input is trimmed, must be a finite decimal number greater than zero,
/// and is scaled by 100 using exact decimal arithmetic, rounding half away
/// from zero: "12.345" -> 1235, "12.344" -> 1234, "0.005" -> 1.
/// A positive input that still rounds to zero cents, or exceeds
/// [`MAX_AMOUNT_CENTS`], is rejected.
pub fn parse_amount(input: &str) -> Result<Cents, AmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountError::Missing);
    }

    let value: f64 = input.parse().map_err(|_| AmountError::Invalid)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(AmountError::Invalid);
    }

    match decimal_to_cents(input) {
        Some(cents) if cents > 0 && cents <= MAX_AMOUNT_CENTS => Ok(cents),
        _ => Err(AmountError::Invalid),
    }
}

/// Scale a non-negative decimal literal by 100, rounding half away from zero.
/// Returns None on unexpected syntax or overflow.
fn decimal_to_cents(literal: &str) -> Option<Cents> {
    let unsigned = literal.strip_prefix('+').unwrap_or(literal);

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(index) => (&unsigned[..index], unsigned[index + 1..].parse::<i64>().ok()?),
        None => (unsigned, 0),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: Vec<i64> = whole
        .bytes()
        .chain(fraction.bytes())
        .map(|b| i64::from(b - b'0'))
        .collect();

    // Index into `digits` where the decimal point sits once scaled to cents.
    let point = i64::try_from(whole.len())
        .ok()?
        .checked_add(exponent)?
        .checked_add(2)?;
    let len = i64::try_from(digits.len()).ok()?;

    let mut cents: Cents = 0;
    for &digit in digits.iter().take(point.clamp(0, len) as usize) {
        cents = cents.checked_mul(10)?.checked_add(digit)?;
    }
    for _ in len..point {
        cents = cents.checked_mul(10)?;
    }

    let rounding_digit = if (0..len).contains(&point) {
        digits[point as usize]
    } else {
        0
    };
    if rounding_digit >= 5 {
        cents = cents.checked_add(1)?;
    }

    Some(cents)
}

/// Convert cents to major units. Formatting always starts from major units.
pub fn to_major_units(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// Currency-aware rendering of an amount in major units.
pub trait MoneyFormatter {
    fn format_major(&self, amount: f64) -> String;

    fn format_cents(&self, cents: Cents) -> String {
        self.format_major(to_major_units(cents))
    }
}

/// Formatter for a single ISO 4217 currency code.
/// Example (USD): 123456 cents -> "$1,234.56", -14000 cents -> "-$140.00"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormatter {
    code: String,
}

impl CurrencyFormatter {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into().trim().to_uppercase(),
        }
    }

    fn prefix(&self) -> String {
        match self.code.as_str() {
            "USD" | "CAD" | "AUD" => "$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            "JPY" => "¥".to_string(),
            other => format!("{} ", other),
        }
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

impl MoneyFormatter for CurrencyFormatter {
    fn format_major(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let fixed = format!("{:.2}", amount.abs());
        let (units, decimals) = fixed.split_once('.').unwrap_or((&fixed, "00"));
        format!(
            "{}{}{}.{}",
            sign,
            self.prefix(),
            group_thousands(units),
            decimals
        )
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
