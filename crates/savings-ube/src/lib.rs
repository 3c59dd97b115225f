//! Client side of the SavingsCELO + Ubeswap liquidity wrapper: pool math,
//! approval planning and a kit bundling the contract calls.

pub mod approvals;
pub mod exchange;
pub mod kit;
pub mod liquidity;
pub mod math;

pub use {
    approvals::{Approval, ApprovalPolicy},
    kit::SavingsCeloWithUbeKit,
    math::{LiquidityPosition, MaxReserveRatio, ReservePair, ReserveRatio},
};
