//! Extension trait for U256 arithmetic operations.

use {
    alloy::primitives::U256,
    anyhow::Result,
    num::{BigInt, BigRational, BigUint, Integer, Zero},
};

/// Extension trait for U256 to add utility methods.
pub trait U256Ext: Sized {
    /// Computes `floor(self * numerator / denominator)` with an unbounded
    /// intermediate product. Returns `None` on a zero denominator or if the
    /// result does not fit into 256 bits.
    fn checked_mul_div(&self, numerator: &Self, denominator: &Self) -> Option<Self>;

    /// Like [`U256Ext::checked_mul_div`] but rounds up.
    fn checked_mul_div_ceil(&self, numerator: &Self, denominator: &Self) -> Option<Self>;

    /// Convert to BigInt.
    fn to_big_int(&self) -> BigInt;

    /// Convert to BigUint.
    fn to_big_uint(&self) -> BigUint;

    /// Convert to BigRational.
    fn to_big_rational(&self) -> BigRational;

    /// Create from BigInt.
    fn from_big_int(input: &BigInt) -> Result<Self>;

    /// Create from BigUint.
    fn from_big_uint(input: &BigUint) -> Result<Self>;

    /// Create from BigRational, truncating towards zero.
    fn from_big_rational(value: &BigRational) -> Result<Self>;
}

impl U256Ext for U256 {
    fn checked_mul_div(&self, numerator: &Self, denominator: &Self) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let product = self.to_big_uint() * numerator.to_big_uint();
        Self::from_big_uint(&(product / denominator.to_big_uint())).ok()
    }

    fn checked_mul_div_ceil(&self, numerator: &Self, denominator: &Self) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let product = self.to_big_uint() * numerator.to_big_uint();
        Self::from_big_uint(&product.div_ceil(&denominator.to_big_uint())).ok()
    }

    fn to_big_int(&self) -> BigInt {
        BigInt::from_biguint(num::bigint::Sign::Plus, self.to_big_uint())
    }

    fn to_big_uint(&self) -> BigUint {
        BigUint::from_bytes_be(self.to_be_bytes::<32>().as_slice())
    }

    fn to_big_rational(&self) -> BigRational {
        BigRational::new(self.to_big_int(), 1.into())
    }

    fn from_big_int(input: &BigInt) -> Result<Self> {
        anyhow::ensure!(input.sign() != num::bigint::Sign::Minus, "negative");
        Self::from_big_uint(input.magnitude())
    }

    fn from_big_uint(input: &BigUint) -> Result<Self> {
        let bytes = input.to_bytes_be();
        anyhow::ensure!(bytes.len() <= 32, "too large");
        Ok(U256::from_be_slice(&bytes))
    }

    fn from_big_rational(value: &BigRational) -> Result<Self> {
        anyhow::ensure!(!value.denom().is_zero(), "zero denominator");
        Self::from_big_int(&(value.numer() / value.denom()))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::str::FromStr};

    #[test]
    fn mul_div_does_not_overflow_intermediate_product() {
        let big = U256::MAX / U256::from(2);
        assert_eq!(big.checked_mul_div(&big, &big), Some(big));
        assert_eq!(
            U256::MAX.checked_mul_div(&U256::from(3), &U256::from(3)),
            Some(U256::MAX)
        );
        // Result does not fit.
        assert_eq!(U256::MAX.checked_mul_div(&U256::from(2), &U256::ONE), None);
        assert_eq!(U256::ONE.checked_mul_div(&U256::ONE, &U256::ZERO), None);
    }

    #[test]
    fn mul_div_rounding_directions() {
        let seven = U256::from(7);
        let two = U256::from(2);
        let three = U256::from(3);
        assert_eq!(seven.checked_mul_div(&two, &three), Some(U256::from(4)));
        assert_eq!(seven.checked_mul_div_ceil(&two, &three), Some(U256::from(5)));
        // Exact division is the same in both directions.
        assert_eq!(
            U256::from(9).checked_mul_div_ceil(&two, &three),
            Some(U256::from(6))
        );
    }

    #[test]
    fn big_int_round_trip() {
        assert_eq!(U256::MAX.to_big_int().to_string(), U256::MAX.to_string());
        assert_eq!(
            U256::from_big_int(&U256::MAX.to_big_int()).unwrap(),
            U256::MAX
        );
        assert!(U256::from_big_int(&BigInt::from(-1)).is_err());
        assert!(U256::from_big_uint(&(U256::MAX.to_big_uint() + 1u32)).is_err());
    }

    #[test]
    fn from_big_rational_truncates() {
        let value = BigRational::new(BigInt::from(7), BigInt::from(2));
        assert_eq!(U256::from_big_rational(&value).unwrap(), U256::from(3));
        let value = BigRational::from_str("1/3").unwrap();
        assert_eq!(U256::from_big_rational(&value).unwrap(), U256::ZERO);
    }
}
