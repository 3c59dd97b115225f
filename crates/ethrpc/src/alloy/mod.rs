mod instrumentation;

#[cfg(any(test, feature = "test-util"))]
use alloy::providers::mock::Asserter;
use {
    crate::AlloyProvider,
    alloy::{
        network::EthereumWallet,
        providers::{Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
        signers::local::PrivateKeySigner,
    },
    anyhow::{Context, Result},
    instrumentation::{InstrumentationLayer, LabelingLayer},
};

/// Creates a provider that relies on the node to sign transactions, e.g. the
/// unlocked accounts of a local devchain. `label` tags the requests in logs.
pub fn provider(url: &str, label: &str) -> Result<AlloyProvider> {
    let rpc = ClientBuilder::default()
        .layer(LabelingLayer {
            label: label.into(),
        })
        .layer(InstrumentationLayer)
        .http(url.parse().context("invalid node url")?);
    Ok(ProviderBuilder::new().connect_client(rpc).erased())
}

/// Creates a provider that signs transactions locally with `signer`.
pub fn provider_with_signer(
    url: &str,
    label: &str,
    signer: PrivateKeySigner,
) -> Result<AlloyProvider> {
    let rpc = ClientBuilder::default()
        .layer(LabelingLayer {
            label: label.into(),
        })
        .layer(InstrumentationLayer)
        .http(url.parse().context("invalid node url")?);
    let wallet = EthereumWallet::new(signer);

    Ok(ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(rpc)
        .erased())
}

/// Provider answering requests from a queue of canned responses.
#[cfg(any(test, feature = "test-util"))]
pub fn mock_provider() -> (AlloyProvider, Asserter) {
    let asserter = Asserter::new();
    let provider = ProviderBuilder::new()
        .connect_mocked_client(asserter.clone())
        .erased();
    (provider, asserter)
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::U256};

    #[tokio::test]
    async fn mock_provider_replays_responses() {
        let (provider, asserter) = mock_provider();
        asserter.push_success(&U256::from(42220));
        assert_eq!(provider.get_chain_id().await.unwrap(), 42220);
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(provider("not a url", "test").is_err());
    }
}
