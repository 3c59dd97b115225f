use {
    crate::nodes::{NODE_HOST, Resetter},
    alloy::{
        network::TransactionBuilder,
        primitives::{Address, Bytes, U256},
        providers::{DynProvider, Provider},
        rpc::types::TransactionRequest,
        sol_types::SolValue,
    },
    anyhow::Result,
    contracts::alloy::{IERC20, IUniswapV2Router, SavingsCELO},
    deployer::artifact::Artifact,
    futures::FutureExt,
    savings_ube::{
        ApprovalPolicy,
        LiquidityPosition,
        MaxReserveRatio,
        SavingsCeloWithUbeKit,
        kit,
    },
    std::{
        future::Future,
        panic::{self, AssertUnwindSafe},
        path::PathBuf,
        sync::Mutex,
    },
};

static NODE_MUTEX: Mutex<()> = Mutex::new(());

/// *Testing* function that takes a closure and runs it on the local devchain.
/// Before each test, it creates a snapshot of the current state of the chain.
/// The saved state is restored at the end of the test.
///
/// Note that tests calling with this function will not be run simultaneously.
pub async fn run_test<F, Fut>(f: F)
where
    F: FnOnce(DynProvider) -> Fut,
    Fut: Future<Output = ()>,
{
    observe::tracing::initialize_reentrant("warn,e2e=debug,savings_ube=debug,deployer=debug");

    // The mutex is expected to become poisoned if a test panics. Only the
    // locked state matters, not the data.
    let _lock = NODE_MUTEX.lock();

    let provider = ethrpc::alloy::provider(NODE_HOST, "e2e").expect("valid node url");
    let resetter = Resetter::new(&provider).await;

    // The closure may be unwind unsafe and `catch_unwind` does not catch every
    // panic. In those cases the node state is not restored.
    let result = AssertUnwindSafe(f(provider)).catch_unwind().await;

    resetter.reset().await;

    if let Err(err) = result {
        panic::resume_unwind(err);
    }
}

/// Loads `<name>.json` from `$ARTIFACTS_DIR` (default `artifacts`).
pub async fn artifact(name: &str) -> Artifact {
    let dir = std::env::var("ARTIFACTS_DIR").unwrap_or_else(|_| "artifacts".to_string());
    Artifact::load(&PathBuf::from(dir).join(format!("{name}.json")))
        .await
        .unwrap()
}

pub async fn deploy_contract(
    provider: &DynProvider,
    from: Address,
    name: &str,
    code: Bytes,
) -> Address {
    tracing::info!(%name, "deploying");
    let tx = TransactionRequest::default()
        .with_from(from)
        .with_deploy_code(code);
    let pending = provider.send_transaction(tx).await.unwrap();
    let address = kit::confirm(pending)
        .await
        .unwrap()
        .contract_address
        .unwrap();
    tracing::info!(%name, ?address, "deployed");
    address
}

fn with_args(artifact: Artifact, args: impl SolValue) -> Bytes {
    [artifact.bytecode.as_ref(), args.abi_encode().as_slice()]
        .concat()
        .into()
}

/// Fresh SavingsCELO and Ubeswap deployments on the devchain.
pub struct Onchain {
    pub provider: DynProvider,
    pub accounts: Vec<Address>,
    pub router: IUniswapV2Router::Instance,
    pub savings: SavingsCELO::Instance,
    pub celo: IERC20::Instance,
}

impl Onchain {
    pub async fn deploy(provider: DynProvider) -> Self {
        let accounts = provider.get_accounts().await.unwrap();
        let deployer = accounts[0];

        let factory = deploy_contract(
            &provider,
            deployer,
            "Ubeswap:Factory",
            with_args(artifact("UniswapV2Factory").await, (deployer,)),
        )
        .await;
        let router = deploy_contract(
            &provider,
            deployer,
            "Ubeswap:Router",
            with_args(artifact("UniswapV2Router02").await, (factory,)),
        )
        .await;
        let savings = deploy_contract(
            &provider,
            deployer,
            "SavingsCELO",
            artifact("SavingsCELO").await.bytecode,
        )
        .await;
        let celo = kit::resolve_celo(&provider).await.unwrap();

        Self {
            router: IUniswapV2Router::Instance::new(router, provider.clone()),
            savings: SavingsCELO::Instance::new(savings, provider.clone()),
            celo: IERC20::Instance::new(celo, provider.clone()),
            accounts,
            provider,
        }
    }

    /// Deploys the wrapper on top of the contracts and binds a kit to it.
    pub async fn wrapper_kit(&self) -> SavingsCeloWithUbeKit {
        let wrapper = deployer::deploy_wrapper(
            &self.provider,
            self.accounts[0],
            &artifact("SavingsCELOWithUbeV1").await.bytecode,
            *self.savings.address(),
            *self.celo.address(),
            *self.router.address(),
        )
        .await
        .unwrap();
        SavingsCeloWithUbeKit::new(self.provider.clone(), wrapper)
            .await
            .unwrap()
    }
}

/// Seeds the pool directly through the router with exactly the given
/// reserves.
pub async fn setup_liquidity(
    kit: &SavingsCeloWithUbeKit,
    from: Address,
    reserve_celo: U256,
    reserve_savings: U256,
) {
    let router = *kit.router.address();
    let savings = *kit.savings.address();
    kit.top_up_savings(from, reserve_savings).await.unwrap();

    let pending = kit
        .celo_token()
        .increaseAllowance(router, reserve_celo)
        .from(from)
        .send()
        .await
        .unwrap();
    kit::confirm(pending).await.unwrap();
    let pending = kit
        .savings
        .increaseAllowance(router, reserve_savings)
        .from(from)
        .send()
        .await
        .unwrap();
    kit::confirm(pending).await.unwrap();

    let pending = kit
        .router
        .addLiquidity(
            kit.celo,
            savings,
            reserve_celo,
            reserve_savings,
            reserve_celo,
            reserve_savings,
            from,
            kit::ube_deadline(),
        )
        .from(from)
        .send()
        .await
        .unwrap();
    kit::confirm(pending).await.unwrap();

    let reserves = kit.reserves().await.unwrap();
    assert_eq!(reserves.celo, reserve_celo);
    assert_eq!(reserves.savings, reserve_savings);
    tracing::info!(%reserve_celo, %reserve_savings, "liquidity set up");
}

/// Provides liquidity through the wrapper and logs the resulting position.
pub async fn add_liquidity(
    kit: &SavingsCeloWithUbeKit,
    from: Address,
    celo: U256,
    savings: U256,
    max_reserve_ratio: &str,
) -> Result<LiquidityPosition> {
    let max_reserve_ratio: MaxReserveRatio = max_reserve_ratio.parse()?;
    let position = kit
        .provide_liquidity(from, celo, savings, &max_reserve_ratio, ApprovalPolicy::Exact)
        .await?;
    tracing::info!(
        celo = %position.celo,
        savings = %position.savings,
        ratio = %kit.reserve_ratio().await?,
        "liquidity"
    );
    Ok(position)
}
