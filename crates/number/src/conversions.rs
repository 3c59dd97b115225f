use {
    anyhow::{Context, Result},
    bigdecimal::BigDecimal,
    num::{BigInt, BigRational, rational::Ratio},
    std::{ops::Neg, str::FromStr},
};

pub fn rational_to_big_decimal<T>(value: &Ratio<T>) -> BigDecimal
where
    T: Clone,
    BigInt: From<T>,
{
    let numer = BigInt::from(value.numer().clone());
    let denom = BigInt::from(value.denom().clone());
    BigDecimal::new(numer, 0) / BigDecimal::new(denom, 0)
}

/// Converts a decimal string (e.g., `"1.05"`) to an exact `BigRational`.
///
/// Going through `f64` would leak its binary representation into the
/// rational, which then shows up in fixed-point contract arguments. Only
/// ASCII digits with at most one `.` and a single leading `-` are accepted.
pub fn big_rational_from_decimal_str(s: &str) -> Result<BigRational> {
    let s = s.trim();
    let (is_negative, s) = match s.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, s),
    };
    let (integer, fraction) = s.split_once('.').unwrap_or((s, ""));
    anyhow::ensure!(
        !(integer.is_empty() && fraction.is_empty()),
        "missing digits in decimal number"
    );
    anyhow::ensure!(
        integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()),
        "invalid decimal number {s:?}"
    );

    let numerator =
        BigInt::from_str(&format!("{integer}{fraction}")).context("unable to parse digits")?;
    let exponent = u32::try_from(fraction.len()).context("too many fractional digits")?;
    let ratio = BigRational::new(numerator, BigInt::from(10u32).pow(exponent));
    Ok(if is_negative { ratio.neg() } else { ratio })
}
