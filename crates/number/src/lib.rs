//! Big number helpers shared by the savings toolkit.
//!
//! On-chain amounts are `alloy` [`U256`](alloy::primitives::U256) values.
//! Anything that needs exact fractions or decimal output goes through `num`
//! and `bigdecimal`, never through floating point.
pub mod conversions;
pub mod u256_ext;
pub mod units;

pub use u256_ext::U256Ext;
