//! Closed-form pool calculations. Everything that has to agree with on-chain
//! integer arithmetic works on `U256` with explicit rounding; ratios are
//! exact rationals and only the impermanent-loss estimate uses decimals.

use {
    alloy::primitives::U256,
    bigdecimal::BigDecimal,
    num::{BigInt, BigRational, One, Zero},
    number::{
        U256Ext,
        conversions::{big_rational_from_decimal_str, rational_to_big_decimal},
    },
    std::{fmt, str::FromStr},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("pool has no liquidity tokens in circulation")]
    NoLiquidity,
    #[error("pool holds no sCELO, so there is no price to match")]
    NoPrice,
    #[error("invalid reserve ratio {0}")]
    InvalidRatio(String),
    #[error("result does not fit into 256 bits")]
    Overflow,
}

/// Pool reserves in the smallest unit of each token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReservePair {
    pub celo: U256,
    pub savings: U256,
}

impl ReservePair {
    /// An uninitialized pool.
    pub fn is_empty(&self) -> bool {
        self.celo.is_zero() && self.savings.is_zero()
    }
}

/// How far the pool drifted away from a 1:1 value balance. Always `>= 1`
/// regardless of which side is ahead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReserveRatio {
    Finite(BigRational),
    /// One side of the pool is empty while the other is not.
    Unbounded,
}

impl ReserveRatio {
    pub fn one() -> Self {
        Self::Finite(BigRational::one())
    }

    /// Computes the ratio from the CELO reserve and the sCELO reserve already
    /// converted into CELO.
    pub fn from_values(celo: U256, savings_as_celo: U256) -> Self {
        match (celo.is_zero(), savings_as_celo.is_zero()) {
            (true, true) => Self::one(),
            (true, false) | (false, true) => Self::Unbounded,
            (false, false) => {
                let celo = celo.to_big_rational();
                let savings = savings_as_celo.to_big_rational();
                Self::Finite(std::cmp::max(&celo / &savings, &savings / &celo))
            }
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    pub fn to_big_decimal(&self) -> Option<BigDecimal> {
        match self {
            Self::Finite(ratio) => Some(rational_to_big_decimal(ratio)),
            Self::Unbounded => None,
        }
    }

    /// Maximum impermanent loss when providing liquidity at this ratio. An
    /// unbounded ratio yields the limit of 1.
    pub fn max_loss(&self) -> Result<BigDecimal, MathError> {
        match self.to_big_decimal() {
            Some(ratio) => max_loss_from_price_change(&ratio),
            None => Ok(BigDecimal::one()),
        }
    }
}

impl fmt::Display for ReserveRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_big_decimal() {
            Some(ratio) => write!(f, "{}", ratio.round(18).normalized()),
            None => f.write_str("unbounded"),
        }
    }
}

/// Upper bound on the reserve ratio accepted by the wrapper's
/// `addLiquidity`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaxReserveRatio(BigRational);

impl MaxReserveRatio {
    pub fn new(ratio: BigRational) -> Result<Self, MathError> {
        if ratio < BigRational::one() {
            return Err(MathError::InvalidRatio(ratio.to_string()));
        }
        Ok(Self(ratio))
    }

    /// The contract expects the ratio as an 18 decimals fixed point number.
    pub fn to_contract_arg(&self) -> Result<U256, MathError> {
        let scaled = &self.0 * BigRational::from_integer(BigInt::from(10).pow(18));
        U256::from_big_rational(&scaled).map_err(|_| MathError::Overflow)
    }
}

impl FromStr for MaxReserveRatio {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ratio =
            big_rational_from_decimal_str(s).map_err(|_| MathError::InvalidRatio(s.to_string()))?;
        Self::new(ratio)
    }
}

/// A liquidity provider's LP balance and the reserves it can be redeemed for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiquidityPosition {
    pub liquidity: U256,
    pub celo: U256,
    pub savings: U256,
}

/// Values `liquidity` LP tokens against the pool reserves, rounding down like
/// the pair contract does on burn.
pub fn liquidity_position(
    liquidity: U256,
    total_supply: U256,
    reserves: &ReservePair,
) -> Result<LiquidityPosition, MathError> {
    if total_supply.is_zero() {
        return Err(MathError::NoLiquidity);
    }
    let share_of = |reserve: &U256| {
        liquidity
            .checked_mul_div(reserve, &total_supply)
            .ok_or(MathError::Overflow)
    };
    Ok(LiquidityPosition {
        liquidity,
        celo: share_of(&reserves.celo)?,
        savings: share_of(&reserves.savings)?,
    })
}

/// Minimum amount of CELO needed to complement `savings` sCELO when adding
/// liquidity at the current pool ratio. Rounds up since supplying too little
/// CELO gets rejected by the ratio guard while excess is harmless.
pub fn min_celo_to_add_liquidity(savings: U256, reserves: &ReservePair) -> Result<U256, MathError> {
    if reserves.savings.is_zero() {
        return Err(MathError::NoPrice);
    }
    savings
        .checked_mul_div_ceil(&reserves.celo, &reserves.savings)
        .ok_or(MathError::Overflow)
}

/// Maximum potential loss ("impermanent loss") from pool price changes when
/// providing liquidity at `reserve_ratio`.
///
/// Liquidity starts at `(r0, ratio * r0)` and ends at
/// `(sqrt(ratio) * r0, sqrt(ratio) * r0)`, so the loss is
/// `(r0 + ratio * r0 - 2 * sqrt(ratio) * r0) / (r0 + ratio * r0)`. It is
/// evaluated as `(sqrt(ratio) - 1)^2 / (ratio + 1)` which keeps precision
/// for ratios close to 1.
///
/// ratio = 1.01 => 0.000012376
/// ratio = 1.05 => 0.000297486
/// ratio = 1.10 => 0.00113443
pub fn max_loss_from_price_change(reserve_ratio: &BigDecimal) -> Result<BigDecimal, MathError> {
    if reserve_ratio <= &BigDecimal::zero() {
        return Err(MathError::InvalidRatio(reserve_ratio.to_string()));
    }
    if reserve_ratio == &BigDecimal::one() {
        return Ok(BigDecimal::zero());
    }
    let root = reserve_ratio
        .sqrt()
        .ok_or_else(|| MathError::InvalidRatio(reserve_ratio.to_string()))?;
    let distance = root - BigDecimal::one();
    Ok(&distance * &distance / (reserve_ratio + BigDecimal::one()))
}

/// Amount of sCELO missing to hold `wanted` when the balance is `have`.
pub fn savings_shortfall(have: U256, wanted: U256) -> Option<U256> {
    wanted.checked_sub(have).filter(|missing| !missing.is_zero())
}
