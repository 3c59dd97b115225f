use alloy::{
    primitives::U256,
    providers::{DynProvider, Provider},
};

/// Celo devchain started with unlocked, funded accounts.
pub const NODE_HOST: &str = "http://127.0.0.1:7545";

/// Restores the chain state captured on creation.
pub struct Resetter {
    provider: DynProvider,
    snapshot_id: U256,
}

impl Resetter {
    pub async fn new(provider: &DynProvider) -> Self {
        let snapshot_id = provider
            .raw_request("evm_snapshot".into(), ())
            .await
            .expect("Test network must support evm_snapshot");
        Self {
            provider: provider.clone(),
            snapshot_id,
        }
    }

    pub async fn reset(&self) {
        let reverted: bool = self
            .provider
            .raw_request("evm_revert".into(), (self.snapshot_id,))
            .await
            .expect("Test network must support evm_revert");
        assert!(reverted, "evm_revert rejected snapshot {}", self.snapshot_id);
    }
}
