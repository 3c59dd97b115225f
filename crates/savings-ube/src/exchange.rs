use {
    crate::math::{ReservePair, ReserveRatio},
    alloy::primitives::U256,
    anyhow::{Context, Result},
    contracts::alloy::SavingsCELO,
};

/// Conversion between CELO and sCELO as implemented by the SavingsCELO
/// contract. The rate accrues over time, so conversions are monotonic but
/// not exact inverses of each other.
#[mockall::automock]
#[async_trait::async_trait]
pub trait SavingsExchange: Send + Sync {
    async fn savings_to_celo(&self, savings: U256) -> Result<U256>;

    async fn celo_to_savings(&self, celo: U256) -> Result<U256>;
}

#[async_trait::async_trait]
impl SavingsExchange for SavingsCELO::Instance {
    async fn savings_to_celo(&self, savings: U256) -> Result<U256> {
        self.savingsToCELO(savings)
            .call()
            .await
            .context("savingsToCELO")
    }

    async fn celo_to_savings(&self, celo: U256) -> Result<U256> {
        self.celoToSavings(celo).call().await.context("celoToSavings")
    }
}

/// Reserve ratio of the pool with the sCELO side valued in CELO.
pub async fn reserve_ratio(
    reserves: &ReservePair,
    exchange: &dyn SavingsExchange,
) -> Result<ReserveRatio> {
    if reserves.is_empty() {
        return Ok(ReserveRatio::one());
    }
    // One-sided pools are unbounded even when the sCELO side rounds to zero
    // CELO.
    if reserves.celo.is_zero() || reserves.savings.is_zero() {
        return Ok(ReserveRatio::Unbounded);
    }
    let savings_as_celo = exchange.savings_to_celo(reserves.savings).await?;
    Ok(ReserveRatio::from_values(reserves.celo, savings_as_celo))
}
