pub mod networks {
    pub const CELO_MAINNET: u64 = 42220;
    pub const ALFAJORES: u64 = 44787;
    pub const BAKLAVA: u64 = 62320;
}

pub use alloy::providers::DynProvider as Provider;

/// Address of the Celo core contract registry on every Celo network,
/// including local devchains.
pub const CELO_REGISTRY: alloy::primitives::Address =
    alloy::primitives::address!("0x000000000000000000000000000000000000ce10");

/// Extension trait to attach some useful functions to the contract instance.
pub trait InstanceExt: Sized {
    /// Crates a contract instance at the expected address for the current
    /// network.
    fn deployed(
        provider: &Provider,
    ) -> impl std::future::Future<Output = anyhow::Result<Self>> + Send;
}

/// Generates `#[sol(rpc)]` bindings for an inline interface and wraps them in
/// a module that exposes an `Instance` alias bound to [`Provider`]. When
/// deployment info is given the instance also implements [`InstanceExt`].
#[macro_export]
macro_rules! bindings {
    ($contract:ident { $($abi:tt)* } $(, $deployment_info:expr)?) => {
        paste::paste! {
            // Generate the main bindings in a private module. That allows
            // us to re-export all items in our own module while also adding
            // some items ourselves.
            #[allow(non_snake_case)]
            mod [<$contract Private>] {
                alloy::sol! {
                    #[allow(missing_docs)]
                    #[sol(rpc)]
                    interface $contract {
                        $($abi)*
                    }
                }
            }

            #[allow(non_snake_case)]
            pub mod $contract {
                use alloy::providers::DynProvider;

                pub use super::[<$contract Private>]::$contract::*;
                pub type Instance = [<$contract Instance>]<DynProvider>;

                $(
                #[allow(unused_imports)]
                use {
                    std::{sync::LazyLock, collections::HashMap},
                    alloy::{
                        providers::Provider,
                        primitives::{address, Address},
                    },
                    anyhow::{Context, Result},
                    $crate::alloy::networks::*,
                };

                pub static DEPLOYMENT_INFO: LazyLock<HashMap<u64, Address>> = LazyLock::new(|| {
                    $deployment_info
                });

                impl $crate::alloy::InstanceExt for Instance {
                    fn deployed(provider: &DynProvider) -> impl Future<Output = Result<Self>> + Send {
                        async move {
                            let chain_id = provider
                                .get_chain_id()
                                .await
                                .context("could not fetch current chain id")?;
                            let address = DEPLOYMENT_INFO
                                .get(&chain_id)
                                .with_context(|| format!("no deployment info for chain {chain_id:?}"))?;

                            Ok(Instance::new(
                                *address,
                                provider.clone(),
                            ))
                        }
                    }
                }
                )*
            }
        }
    };
}

crate::bindings!(
    Registry {
        function getAddressForString(string calldata identifier) external view returns (address);
    },
    maplit::hashmap! {
        CELO_MAINNET => crate::alloy::CELO_REGISTRY,
        ALFAJORES => crate::alloy::CELO_REGISTRY,
        BAKLAVA => crate::alloy::CELO_REGISTRY,
    }
);

// Subset of ERC20 used for allowances. CELO itself (GoldToken) is an ERC20
// with `increaseAllowance`.
crate::bindings!(IERC20 {
    function totalSupply() external view returns (uint256);
    function balanceOf(address owner) external view returns (uint256);
    function allowance(address owner, address spender) external view returns (uint256);
    function approve(address spender, uint256 value) external returns (bool);
    function increaseAllowance(address spender, uint256 addedValue) external returns (bool);
    function transfer(address to, uint256 value) external returns (bool);
});

crate::bindings!(
    SavingsCELO {
        function deposit() external payable returns (uint256);
        function savingsToCELO(uint256 savingsAmount) external view returns (uint256);
        function celoToSavings(uint256 celoAmount) external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function increaseAllowance(address spender, uint256 addedValue) external returns (bool);
    },
    maplit::hashmap! {
        CELO_MAINNET => address!("0x2879BFD5e7c4EF331384E908aaA3Bd3014b703fA"),
    }
);

crate::bindings!(SavingsCELOWithUbeV1 {
    event Deposited(address indexed from, uint256 celoAmount, uint256 savingsAmount, bool direct);

    function savingsCELO() external view returns (address);
    function ubeRouter() external view returns (address);
    function ubePair() external view returns (address);
    function ubeGetReserves() external view returns (uint256 reserve_CELO, uint256 reserve_sCELO);
    function deposit() external payable;
    function addLiquidity(uint256 amount_CELO, uint256 amount_sCELO, uint256 maxReserveRatio) external;
});

crate::bindings!(IUniswapV2Pair {
    function token0() external view returns (address);
    function token1() external view returns (address);
    function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
    function totalSupply() external view returns (uint256);
    function balanceOf(address owner) external view returns (uint256);
    function allowance(address owner, address spender) external view returns (uint256);
    function approve(address spender, uint256 value) external returns (bool);
});

crate::bindings!(
    IUniswapV2Router {
        function factory() external view returns (address);
        function addLiquidity(
            address tokenA,
            address tokenB,
            uint256 amountADesired,
            uint256 amountBDesired,
            uint256 amountAMin,
            uint256 amountBMin,
            address to,
            uint256 deadline
        ) external returns (uint256 amountA, uint256 amountB, uint256 liquidity);
        function removeLiquidity(
            address tokenA,
            address tokenB,
            uint256 liquidity,
            uint256 amountAMin,
            uint256 amountBMin,
            address to,
            uint256 deadline
        ) external returns (uint256 amountA, uint256 amountB);
        function swapExactTokensForTokens(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);
    },
    maplit::hashmap! {
        CELO_MAINNET => address!("0xE3D8bd6Aed4F159bc8000a9cD47CffDb95F96121"),
        ALFAJORES => address!("0xE3D8bd6Aed4F159bc8000a9cD47CffDb95F96121"),
    }
);
