use {
    crate::{arguments::Arguments, artifact::Artifact, cache::AddressCache},
    alloy::{
        network::TransactionBuilder,
        primitives::{Address, Bytes},
        providers::Provider,
        rpc::types::TransactionRequest,
        sol_types::SolValue,
    },
    anyhow::{Context, Result},
    clap::Parser,
    contracts::alloy::{IUniswapV2Router, InstanceExt, SavingsCELO},
    ethrpc::AlloyProvider,
    savings_ube::{SavingsCeloWithUbeKit, kit},
};

/// Name under which the wrapper deployment is cached.
pub const WRAPPER_CONTRACT: &str = "SavingsCELOWithUbeV1";

pub async fn start(args: impl Iterator<Item = String>) -> Result<()> {
    let args = Arguments::parse_from(args);
    observe::tracing::initialize(&observe::Config::new(
        &args.log_filter,
        None,
        args.json_logs,
    ));
    tracing::info!("running deployer with validated arguments:\n{}", args);
    run(args).await
}

pub async fn run(args: Arguments) -> Result<()> {
    let url = args.node_url();
    let (provider, from) = match args.private_key.clone() {
        Some(signer) => {
            let from = signer.address();
            (
                ethrpc::alloy::provider_with_signer(&url, "deployer", signer)?,
                from,
            )
        }
        None => {
            let provider = ethrpc::alloy::provider(&url, "deployer")?;
            let accounts = provider
                .get_accounts()
                .await
                .context("fetch node accounts")?;
            let from = *accounts
                .first()
                .context("node has no unlocked account to deploy from")?;
            (provider, from)
        }
    };
    tracing::debug!(?from, %url, "connected");

    let cache = AddressCache::new(&args.cache_dir, args.network);
    let wrapper = cache
        .get_or_deploy(WRAPPER_CONTRACT, async {
            let artifact = Artifact::load(&args.artifact).await?;
            artifact.ensure_contract(WRAPPER_CONTRACT)?;
            tracing::debug!(
                path = %args.artifact.display(),
                bytes = artifact.bytecode.len(),
                "loaded wrapper artifact"
            );
            let (savings, router) = dependencies(&provider, &args).await?;
            let celo = kit::resolve_celo(&provider).await?;
            deploy_wrapper(&provider, from, &artifact.bytecode, savings, celo, router).await
        })
        .await?;

    let kit = SavingsCeloWithUbeKit::new(provider, wrapper).await?;
    let reserves = kit.reserves().await?;
    tracing::info!(
        ?wrapper,
        savings = ?kit.savings.address(),
        router = ?kit.router.address(),
        pair = ?kit.pair.address(),
        reserve_celo = %reserves.celo,
        reserve_savings = %reserves.savings,
        "wrapper ready"
    );
    Ok(())
}

/// SavingsCELO and Ubeswap router the wrapper gets wired to, either passed
/// explicitly or taken from the known deployments of the connected chain.
async fn dependencies(provider: &AlloyProvider, args: &Arguments) -> Result<(Address, Address)> {
    let savings = match args.savings_celo {
        Some(address) => address,
        None => *SavingsCELO::Instance::deployed(provider)
            .await
            .context("no SavingsCELO deployment known, pass --savings-celo")?
            .address(),
    };
    let router = match args.ube_router {
        Some(address) => address,
        None => *IUniswapV2Router::Instance::deployed(provider)
            .await
            .context("no Ubeswap router deployment known, pass --ube-router")?
            .address(),
    };
    Ok((savings, router))
}

/// Creation code of the wrapper: the compiled bytecode followed by the
/// encoded `(savingsCELO, CELO, ubeRouter)` constructor arguments.
pub fn deploy_code(bytecode: &Bytes, savings: Address, celo: Address, router: Address) -> Bytes {
    [
        bytecode.as_ref(),
        (savings, celo, router).abi_encode_params().as_slice(),
    ]
    .concat()
    .into()
}

pub async fn deploy_wrapper(
    provider: &AlloyProvider,
    from: Address,
    bytecode: &Bytes,
    savings: Address,
    celo: Address,
    router: Address,
) -> Result<Address> {
    let tx = TransactionRequest::default()
        .with_from(from)
        .with_deploy_code(deploy_code(bytecode, savings, celo, router));
    let pending = provider
        .send_transaction(tx)
        .await
        .context("send wrapper deployment")?;
    let receipt = kit::confirm(pending).await?;
    receipt
        .contract_address
        .context("deployment receipt has no contract address")
}
