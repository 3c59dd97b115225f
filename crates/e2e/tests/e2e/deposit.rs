use {
    alloy::{primitives::U256, providers::DynProvider},
    e2e::setup::*,
    number::units::CeloUnit,
    savings_ube::{exchange::SavingsExchange, kit},
};

#[tokio::test]
#[ignore]
async fn local_node_deposit_in_empty_pool() {
    run_test(deposit_in_empty_pool).await;
}

#[tokio::test]
#[ignore]
async fn local_node_non_direct_deposit() {
    run_test(non_direct_deposit).await;
}

async fn deposit_in_empty_pool(provider: DynProvider) {
    let onchain = Onchain::deploy(provider).await;
    let kit = onchain.wrapper_kit().await;
    let from = onchain.accounts[1];

    let pending = kit.deposit(500u64.celo()).from(from).send().await.unwrap();
    let receipt = kit::confirm(pending).await.unwrap();

    // Without a pool SavingsCELO is the only option.
    let deposited = kit.deposited_event(&receipt).unwrap();
    assert!(deposited.direct);
    assert_eq!(deposited.from, from);
    assert_eq!(deposited.celoAmount, 500u64.celo());
}

async fn non_direct_deposit(provider: DynProvider) {
    let onchain = Onchain::deploy(provider).await;
    let kit = onchain.wrapper_kit().await;
    let from = onchain.accounts[1];

    let pending = kit.deposit(500u64.celo()).from(from).send().await.unwrap();
    kit::confirm(pending).await.unwrap();
    add_liquidity(&kit, from, 2_000u64.celo(), U256::ZERO, "1.05")
        .await
        .unwrap();

    // Selling sCELO into the pool makes it cheaper to buy there than to mint.
    let to_trade = kit.savings.celo_to_savings(500u64.celo()).await.unwrap();
    let pending = kit
        .savings
        .increaseAllowance(*kit.router.address(), to_trade)
        .from(from)
        .send()
        .await
        .unwrap();
    kit::confirm(pending).await.unwrap();
    let before = onchain.celo.balanceOf(from).call().await.unwrap();
    let pending = kit
        .router
        .swapExactTokensForTokens(
            to_trade,
            U256::ZERO,
            vec![*kit.savings.address(), kit.celo],
            from,
            kit::ube_deadline(),
        )
        .from(from)
        .send()
        .await
        .unwrap();
    kit::confirm(pending).await.unwrap();
    let received = onchain.celo.balanceOf(from).call().await.unwrap() - before;
    tracing::info!(ratio = %kit.reserve_ratio().await.unwrap(), %received, "traded");

    let pending = kit.deposit(received).from(from).send().await.unwrap();
    let receipt = kit::confirm(pending).await.unwrap();
    let deposited = kit.deposited_event(&receipt).unwrap();
    assert!(!deposited.direct);
    tracing::info!(
        ratio = %kit.reserve_ratio().await.unwrap(),
        celo = %deposited.celoAmount,
        savings = %deposited.savingsAmount,
        "deposited"
    );

    let minted = kit.savings.celo_to_savings(received).await.unwrap();
    assert!(minted <= deposited.savingsAmount);
}
