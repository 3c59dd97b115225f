//! Contract bindings for SavingsCELO, the SavingsCELOWithUbe wrapper and the
//! Ubeswap (Uniswap V2) pair and router.
pub mod alloy;
