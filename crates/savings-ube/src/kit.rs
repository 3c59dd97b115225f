use {
    crate::{
        approvals::{self, AllowanceRequest, Approval, ApprovalPolicy},
        exchange,
        math::{self, LiquidityPosition, MaxReserveRatio, ReservePair, ReserveRatio},
    },
    alloy::{
        contract::SolCallBuilder,
        network::{Ethereum, TransactionBuilder},
        primitives::{Address, U256},
        providers::{DynProvider, PendingTransactionBuilder, Provider},
        rpc::types::{Log, TransactionReceipt, TransactionRequest},
    },
    anyhow::{Context, Result},
    chrono::{DateTime, Utc},
    contracts::alloy::{
        CELO_REGISTRY,
        IERC20,
        IUniswapV2Pair,
        IUniswapV2Router,
        Registry,
        SavingsCELO,
        SavingsCELOWithUbeV1,
    },
};

/// Seconds a router transaction stays valid after it was built.
pub const DEADLINE_SECS: u64 = 60;

/// Bundles the wrapper contract with the SavingsCELO, Ubeswap router and pair
/// contracts it is wired to.
#[derive(Clone)]
pub struct SavingsCeloWithUbeKit {
    pub provider: DynProvider,
    pub contract: SavingsCELOWithUbeV1::Instance,
    pub savings: SavingsCELO::Instance,
    pub router: IUniswapV2Router::Instance,
    pub pair: IUniswapV2Pair::Instance,
    /// GoldToken, the ERC20 interface of native CELO.
    pub celo: Address,
}

/// Looks up the GoldToken address in the Celo registry.
pub async fn resolve_celo(provider: &DynProvider) -> Result<Address> {
    Registry::Instance::new(CELO_REGISTRY, provider.clone())
        .getAddressForString("GoldToken".to_string())
        .call()
        .await
        .context("resolve GoldToken in registry")
}

impl SavingsCeloWithUbeKit {
    /// Binds the kit to the wrapper deployed at `address`, reading the
    /// addresses of the contracts it uses from the wrapper itself.
    pub async fn new(provider: DynProvider, address: Address) -> Result<Self> {
        let contract = SavingsCELOWithUbeV1::Instance::new(address, provider.clone());
        let (router, pair, savings, celo) = futures::try_join!(
            async { contract.ubeRouter().call().await.context("ubeRouter") },
            async { contract.ubePair().call().await.context("ubePair") },
            async { contract.savingsCELO().call().await.context("savingsCELO") },
            resolve_celo(&provider),
        )?;
        tracing::debug!(
            wrapper = ?address,
            ?router,
            ?pair,
            ?savings,
            ?celo,
            "bound savings ube kit"
        );
        Ok(Self::from_parts(provider, address, savings, router, pair, celo))
    }

    /// Binds the kit to known addresses without touching the node.
    pub fn from_parts(
        provider: DynProvider,
        wrapper: Address,
        savings: Address,
        router: Address,
        pair: Address,
        celo: Address,
    ) -> Self {
        Self {
            contract: SavingsCELOWithUbeV1::Instance::new(wrapper, provider.clone()),
            savings: SavingsCELO::Instance::new(savings, provider.clone()),
            router: IUniswapV2Router::Instance::new(router, provider.clone()),
            pair: IUniswapV2Pair::Instance::new(pair, provider.clone()),
            celo,
            provider,
        }
    }

    pub fn celo_token(&self) -> IERC20::Instance {
        IERC20::Instance::new(self.celo, self.provider.clone())
    }

    /// Pool reserves as reported by the wrapper, already in CELO/sCELO order.
    pub async fn reserves(&self) -> Result<ReservePair> {
        let reserves = self
            .contract
            .ubeGetReserves()
            .call()
            .await
            .context("ubeGetReserves")?;
        Ok(ReservePair {
            celo: reserves.reserve_CELO,
            savings: reserves.reserve_sCELO,
        })
    }

    pub async fn reserve_ratio(&self) -> Result<ReserveRatio> {
        let reserves = self.reserves().await?;
        exchange::reserve_ratio(&reserves, &self.savings).await
    }

    /// LP balance of `owner` and the reserves it currently redeems for.
    pub async fn liquidity_balance_of(&self, owner: Address) -> Result<LiquidityPosition> {
        let (liquidity, total_supply, reserves) = futures::try_join!(
            async { self.pair.balanceOf(owner).call().await.context("pair balanceOf") },
            async { self.pair.totalSupply().call().await.context("pair totalSupply") },
            self.reserves(),
        )?;
        Ok(math::liquidity_position(liquidity, total_supply, &reserves)?)
    }

    pub async fn min_celo_to_add_liquidity(&self, savings: U256) -> Result<U256> {
        let reserves = self.reserves().await?;
        Ok(math::min_celo_to_add_liquidity(savings, &reserves)?)
    }

    /// Deposits `value` CELO through the wrapper, which picks whichever of
    /// minting and buying sCELO yields more.
    pub fn deposit(
        &self,
        value: U256,
    ) -> SolCallBuilder<&DynProvider, SavingsCELOWithUbeV1::depositCall> {
        self.contract.deposit().value(value)
    }

    pub fn add_liquidity(
        &self,
        celo: U256,
        savings: U256,
        max_reserve_ratio: &MaxReserveRatio,
    ) -> Result<SolCallBuilder<&DynProvider, SavingsCELOWithUbeV1::addLiquidityCall>> {
        Ok(self
            .contract
            .addLiquidity(celo, savings, max_reserve_ratio.to_contract_arg()?))
    }

    /// Burns `liquidity` LP tokens through the router. The router needs an
    /// allowance on the pair, see [`Self::approve_remove_liquidity`].
    pub fn remove_liquidity(
        &self,
        liquidity: U256,
        min_celo: U256,
        min_savings: U256,
        to: Address,
        deadline: U256,
    ) -> SolCallBuilder<&DynProvider, IUniswapV2Router::removeLiquidityCall> {
        self.router.removeLiquidity(
            self.celo,
            *self.savings.address(),
            liquidity,
            min_celo,
            min_savings,
            to,
            deadline,
        )
    }

    /// Approvals `from` needs before calling [`Self::add_liquidity`], in the
    /// order they have to be submitted.
    pub async fn approve_add_liquidity(
        &self,
        from: Address,
        celo: U256,
        savings: U256,
        policy: ApprovalPolicy,
    ) -> Result<Vec<TransactionRequest>> {
        let spender = *self.contract.address();
        let celo_token = self.celo_token();
        let (celo_allowance, savings_allowance) = futures::try_join!(
            async {
                celo_token
                    .allowance(from, spender)
                    .call()
                    .await
                    .context("CELO allowance")
            },
            async {
                self.savings
                    .allowance(from, spender)
                    .call()
                    .await
                    .context("sCELO allowance")
            },
        )?;
        let approvals = approvals::plan_add_liquidity(
            &AllowanceRequest {
                token: self.celo,
                spender,
                current: celo_allowance,
                required: celo,
                policy,
            },
            &AllowanceRequest {
                token: *self.savings.address(),
                spender,
                current: savings_allowance,
                required: savings,
                policy,
            },
        );
        Ok(transactions_from(from, &approvals))
    }

    /// Approval `from` needs before calling [`Self::remove_liquidity`].
    pub async fn approve_remove_liquidity(
        &self,
        from: Address,
        liquidity: U256,
        policy: ApprovalPolicy,
    ) -> Result<Vec<TransactionRequest>> {
        let spender = *self.router.address();
        let current = self
            .pair
            .allowance(from, spender)
            .call()
            .await
            .context("pair allowance")?;
        let approvals = approvals::plan_remove_liquidity(&AllowanceRequest {
            token: *self.pair.address(),
            spender,
            current,
            required: liquidity,
            policy,
        });
        Ok(transactions_from(from, &approvals))
    }

    /// Sends the transactions one after another, waiting for each to be mined
    /// successfully before sending the next.
    pub async fn submit_all(&self, transactions: Vec<TransactionRequest>) -> Result<()> {
        for tx in transactions {
            let pending = self
                .provider
                .send_transaction(tx)
                .await
                .context("send transaction")?;
            confirm(pending).await?;
        }
        Ok(())
    }

    /// The `Deposited` event the wrapper emitted in `receipt`, if any.
    pub fn deposited_event(
        &self,
        receipt: &TransactionReceipt,
    ) -> Option<SavingsCELOWithUbeV1::Deposited> {
        deposited_event(*self.contract.address(), receipt.inner.logs())
    }
}

fn transactions_from(from: Address, approvals: &[Approval]) -> Vec<TransactionRequest> {
    approvals
        .iter()
        .map(|approval| approval.to_transaction_request().with_from(from))
        .collect()
}

/// Waits for a sent transaction and fails if it reverted.
pub async fn confirm(pending: PendingTransactionBuilder<Ethereum>) -> Result<TransactionReceipt> {
    let hash = *pending.tx_hash();
    let receipt = pending
        .get_receipt()
        .await
        .with_context(|| format!("receipt of {hash}"))?;
    anyhow::ensure!(receipt.status(), "transaction {hash} reverted");
    tracing::debug!(?hash, gas_used = receipt.gas_used, "transaction mined");
    Ok(receipt)
}

/// Decodes the last `Deposited` event emitted by `wrapper` among `logs`.
pub fn deposited_event(wrapper: Address, logs: &[Log]) -> Option<SavingsCELOWithUbeV1::Deposited> {
    logs.iter()
        .rev()
        .filter(|log| log.address() == wrapper)
        .find_map(|log| log.log_decode::<SavingsCELOWithUbeV1::Deposited>().ok())
        .map(|log| log.inner.data)
}

/// Router deadline for a transaction built now.
pub fn ube_deadline() -> U256 {
    deadline_from(Utc::now())
}

pub fn deadline_from(now: DateTime<Utc>) -> U256 {
    U256::from(now.timestamp().unsigned_abs() + DEADLINE_SECS)
}
