use {
    alloy::{primitives::U256, providers::DynProvider},
    e2e::setup::*,
    number::units::CeloUnit,
    savings_ube::{ApprovalPolicy, SavingsCeloWithUbeKit, exchange::SavingsExchange, kit},
};

#[tokio::test]
#[ignore]
async fn local_node_balanced_pool() {
    run_test(balanced_pool).await;
}

#[tokio::test]
#[ignore]
async fn local_node_indivisible_savings_rate() {
    run_test(indivisible_savings_rate).await;
}

#[tokio::test]
#[ignore]
async fn local_node_skewed_pool() {
    run_test(skewed_pool).await;
}

#[tokio::test]
#[ignore]
async fn local_node_remove_liquidity() {
    run_test(remove_liquidity).await;
}

/// Deploys the wrapper and mints the first sCELO so the savings rate is
/// defined.
async fn prepare(provider: DynProvider) -> (Onchain, SavingsCeloWithUbeKit) {
    let onchain = Onchain::deploy(provider).await;
    let kit = onchain.wrapper_kit().await;
    let pending = kit
        .savings
        .deposit()
        .value(1u64.celo())
        .from(onchain.accounts[0])
        .send()
        .await
        .unwrap();
    kit::confirm(pending).await.unwrap();
    (onchain, kit)
}

async fn balanced_pool(provider: DynProvider) {
    let (onchain, kit) = prepare(provider).await;
    let from = onchain.accounts[1];
    setup_liquidity(&kit, from, 1u64.celo(), 65_536u64.celo()).await;

    add_liquidity(&kit, from, 1u64.celo(), U256::ZERO, "1.05")
        .await
        .unwrap();
    let matching = kit.savings.celo_to_savings(1u64.celo()).await.unwrap();
    add_liquidity(&kit, from, 1u64.celo(), matching, "1.05")
        .await
        .unwrap();

    // One wei of sCELO too much pushes the pool past what 1 CELO can balance.
    let matching = kit.savings.celo_to_savings(1u64.celo()).await.unwrap();
    assert!(
        add_liquidity(&kit, from, 1u64.celo(), matching + U256::from(1), "1.05")
            .await
            .is_err()
    );

    let matching = kit.savings.celo_to_savings(1u64.celo()).await.unwrap();
    add_liquidity(&kit, from, 1u64.celo(), matching - U256::from(1), "1.05")
        .await
        .unwrap();
    let half = kit
        .savings
        .celo_to_savings(U256::from(500_000_000_000_000_000u64))
        .await
        .unwrap();
    add_liquidity(&kit, from, 1u64.celo(), half, "1.05")
        .await
        .unwrap();
}

async fn indivisible_savings_rate(provider: DynProvider) {
    let (onchain, kit) = prepare(provider).await;
    let from = onchain.accounts[1];
    setup_liquidity(
        &kit,
        from,
        U256::from(509_283_024_364_244_884u64),
        U256::from(32_752_522_070_346_078_080_538u128),
    )
    .await;

    add_liquidity(&kit, from, 1u64.celo(), U256::ZERO, "1.05")
        .await
        .unwrap();
    mess_up_savings_rate(&kit, from).await;
    let half = kit
        .savings
        .celo_to_savings(U256::from(500_000_000_000_000_000u64))
        .await
        .unwrap();
    add_liquidity(&kit, from, 1u64.celo(), half, "1.05")
        .await
        .unwrap();
}

async fn skewed_pool(provider: DynProvider) {
    let (onchain, kit) = prepare(provider).await;
    let from = onchain.accounts[1];
    // Reserve ratio of roughly 1.16.
    setup_liquidity(
        &kit,
        from,
        U256::from(509_783_004_364_244_884u64),
        U256::from(38_752_522_070_346_078_080_538u128),
    )
    .await;

    assert!(
        add_liquidity(&kit, from, 1u64.celo(), U256::ZERO, "1.05")
            .await
            .is_err()
    );
    add_liquidity(&kit, from, 1u64.celo(), U256::ZERO, "1.16")
        .await
        .unwrap();
    mess_up_savings_rate(&kit, from).await;
    let half = kit
        .savings
        .celo_to_savings(U256::from(500_000_000_000_000_000u64))
        .await
        .unwrap();
    add_liquidity(&kit, from, 1u64.celo(), half, "1.16")
        .await
        .unwrap();
}

async fn remove_liquidity(provider: DynProvider) {
    let (onchain, kit) = prepare(provider).await;
    let from = onchain.accounts[1];
    setup_liquidity(&kit, from, 1u64.celo(), 65_536u64.celo()).await;
    let position = kit.liquidity_balance_of(from).await.unwrap();
    assert!(!position.liquidity.is_zero());

    let approvals = kit
        .approve_remove_liquidity(from, position.liquidity, ApprovalPolicy::Exact)
        .await
        .unwrap();
    assert_eq!(approvals.len(), 1);
    kit.submit_all(approvals).await.unwrap();
    // The router allowance now covers the whole position.
    assert!(
        kit.approve_remove_liquidity(from, position.liquidity, ApprovalPolicy::Exact)
            .await
            .unwrap()
            .is_empty()
    );

    let savings_before = kit.savings.balanceOf(from).call().await.unwrap();
    let pending = kit
        .remove_liquidity(
            position.liquidity,
            U256::ZERO,
            U256::ZERO,
            from,
            kit::ube_deadline(),
        )
        .from(from)
        .send()
        .await
        .unwrap();
    kit::confirm(pending).await.unwrap();

    let after = kit.liquidity_balance_of(from).await.unwrap();
    assert!(after.liquidity.is_zero());
    // Redeeming pays out the valuation computed beforehand. CELO also pays
    // for gas, so only the sCELO side is compared.
    let savings_after = kit.savings.balanceOf(from).call().await.unwrap();
    assert_eq!(savings_after - savings_before, position.savings);
}

/// Deposits an odd amount so CELO and sCELO no longer convert evenly.
async fn mess_up_savings_rate(kit: &SavingsCeloWithUbeKit, from: alloy::primitives::Address) {
    let pending = kit
        .savings
        .deposit()
        .value(U256::from(17))
        .from(from)
        .send()
        .await
        .unwrap();
    kit::confirm(pending).await.unwrap();
}
