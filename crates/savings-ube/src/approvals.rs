//! Decides which allowance transactions have to be mined before a liquidity
//! operation. Planning is pure; submitting the resulting transactions in order
//! is up to the caller.

use {
    alloy::{
        network::TransactionBuilder,
        primitives::{Address, U256},
        rpc::types::TransactionRequest,
        sol_types::SolCall,
    },
    contracts::alloy::IERC20,
};

/// Allowance granted for [`ApprovalAmount::Unbounded`]: `0xff` followed by
/// 31 zero bytes, which the token contracts treat as practically unlimited.
pub const INFINITE_ALLOWANCE: U256 = U256::from_limbs([0, 0, 0, 0xff00_0000_0000_0000]);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApprovalPolicy {
    /// Approve only what the operation needs.
    #[default]
    Exact,
    /// Approve once so later operations need no further approvals.
    Infinite,
}

/// Which ERC20 entry point the approval goes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalMethod {
    /// `increaseAllowance(spender, delta)`: the amount is added on top of the
    /// current allowance.
    IncreaseAllowance,
    /// `approve(spender, amount)`: the amount replaces the current allowance.
    Approve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalAmount {
    Exact(U256),
    Unbounded,
}

impl ApprovalAmount {
    /// The value passed to the token contract.
    pub fn value(&self) -> U256 {
        match self {
            Self::Exact(amount) => *amount,
            Self::Unbounded => INFINITE_ALLOWANCE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllowanceRequest {
    pub token: Address,
    pub spender: Address,
    pub current: U256,
    pub required: U256,
    pub policy: ApprovalPolicy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Approval {
    pub token: Address,
    pub spender: Address,
    pub method: ApprovalMethod,
    pub amount: ApprovalAmount,
}

impl AllowanceRequest {
    /// Returns the approval needed to cover `required`, if any.
    pub fn plan(&self, method: ApprovalMethod) -> Option<Approval> {
        if self.current >= self.required {
            return None;
        }
        let amount = match (self.policy, method) {
            (ApprovalPolicy::Infinite, _) => ApprovalAmount::Unbounded,
            (ApprovalPolicy::Exact, ApprovalMethod::IncreaseAllowance) => {
                ApprovalAmount::Exact(self.required - self.current)
            }
            (ApprovalPolicy::Exact, ApprovalMethod::Approve) => {
                ApprovalAmount::Exact(self.required)
            }
        };
        Some(Approval {
            token: self.token,
            spender: self.spender,
            method,
            amount,
        })
    }
}

/// Approvals needed before the wrapper can pull CELO and sCELO for
/// `addLiquidity`. CELO comes first.
pub fn plan_add_liquidity(celo: &AllowanceRequest, savings: &AllowanceRequest) -> Vec<Approval> {
    [celo, savings]
        .into_iter()
        .filter_map(|request| request.plan(ApprovalMethod::IncreaseAllowance))
        .collect()
}

/// Approval needed before the router can burn LP tokens in
/// `removeLiquidity`.
pub fn plan_remove_liquidity(liquidity: &AllowanceRequest) -> Vec<Approval> {
    liquidity
        .plan(ApprovalMethod::Approve)
        .into_iter()
        .collect()
}

impl Approval {
    /// Unsigned transaction calling the token contract. The sender still has
    /// to be set.
    pub fn to_transaction_request(&self) -> TransactionRequest {
        let calldata = match self.method {
            ApprovalMethod::IncreaseAllowance => IERC20::increaseAllowanceCall {
                spender: self.spender,
                addedValue: self.amount.value(),
            }
            .abi_encode(),
            ApprovalMethod::Approve => IERC20::approveCall {
                spender: self.spender,
                value: self.amount.value(),
            }
            .abi_encode(),
        };
        TransactionRequest::default()
            .with_to(self.token)
            .with_input(calldata)
    }
}
