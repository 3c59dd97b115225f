use alloy::primitives::{U256, utils::Unit};

/// CELO and sCELO both use 18 decimals, so amounts scale like ether.
pub trait CeloUnit: std::marker::Sized {
    /// Returns the current amount in the smallest unit.
    fn wei(self) -> U256;

    /// Returns the current whole-token amount as wei (i.e. 1e18 wei).
    fn celo(self) -> U256 {
        self.wei() * Unit::ETHER.wei()
    }
}

impl CeloUnit for u64 {
    fn wei(self) -> U256 {
        U256::from(self)
    }
}

impl CeloUnit for u128 {
    fn wei(self) -> U256 {
        U256::from(self)
    }
}
