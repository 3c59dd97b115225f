//! Sequenced flow for providing liquidity from a single account. Every
//! transaction is mined before the next one is sent since later steps depend
//! on the balances and allowances set up by earlier ones.

use {
    crate::{
        approvals::ApprovalPolicy,
        exchange::SavingsExchange,
        kit::{self, SavingsCeloWithUbeKit},
        math::{self, LiquidityPosition, MaxReserveRatio},
    },
    alloy::primitives::{Address, U256},
    anyhow::{Context, Result},
};

/// CELO to deposit into SavingsCELO so that a balance of `have` sCELO grows
/// to at least `wanted`. The extra wei makes up for rounding in the
/// conversion.
pub async fn top_up_deposit(
    have: U256,
    wanted: U256,
    exchange: &dyn SavingsExchange,
) -> Result<Option<U256>> {
    let Some(missing) = math::savings_shortfall(have, wanted) else {
        return Ok(None);
    };
    let celo = exchange
        .savings_to_celo(missing)
        .await?
        .checked_add(U256::from(1))
        .context("top up deposit overflows")?;
    Ok(Some(celo))
}

impl SavingsCeloWithUbeKit {
    /// Deposits CELO into SavingsCELO until `from` holds at least `wanted`
    /// sCELO. Returns the deposited amount of CELO.
    pub async fn top_up_savings(&self, from: Address, wanted: U256) -> Result<Option<U256>> {
        let have = self
            .savings
            .balanceOf(from)
            .call()
            .await
            .context("sCELO balanceOf")?;
        let Some(celo) = top_up_deposit(have, wanted, &self.savings).await? else {
            return Ok(None);
        };
        tracing::debug!(?from, %have, %wanted, %celo, "topping up sCELO balance");
        let pending = self
            .savings
            .deposit()
            .value(celo)
            .from(from)
            .send()
            .await
            .context("send SavingsCELO deposit")?;
        kit::confirm(pending).await?;
        Ok(Some(celo))
    }

    /// Adds `celo` CELO and `savings` sCELO to the pool on behalf of `from`,
    /// depositing the missing sCELO and granting allowances first.
    pub async fn provide_liquidity(
        &self,
        from: Address,
        celo: U256,
        savings: U256,
        max_reserve_ratio: &MaxReserveRatio,
        policy: ApprovalPolicy,
    ) -> Result<LiquidityPosition> {
        self.top_up_savings(from, savings).await?;

        let approvals = self
            .approve_add_liquidity(from, celo, savings, policy)
            .await?;
        tracing::debug!(count = approvals.len(), "submitting approvals");
        self.submit_all(approvals).await?;

        let pending = self
            .add_liquidity(celo, savings, max_reserve_ratio)?
            .from(from)
            .send()
            .await
            .context("send addLiquidity")?;
        kit::confirm(pending).await?;

        let position = self.liquidity_balance_of(from).await?;
        tracing::info!(
            ?from,
            liquidity = %position.liquidity,
            celo = %position.celo,
            savings = %position.savings,
            "provided liquidity"
        );
        Ok(position)
    }
}
