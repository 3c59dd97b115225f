//! CLI arguments for the `deployer` binary.

use {
    alloy::{primitives::Address, signers::local::PrivateKeySigner},
    std::{fmt, path::PathBuf},
    url::Url,
};

/// Deploys the SavingsCELO + Ubeswap wrapper unless the address cache already
/// knows a deployment for the network.
#[derive(clap::Parser, Debug)]
#[command(version)]
pub struct Arguments {
    #[clap(long, env, default_value = "warn,deployer=debug,savings_ube=debug,ethrpc=debug")]
    pub log_filter: String,

    /// Emit logs as JSON.
    #[clap(long, env)]
    pub json_logs: bool,

    /// The network to deploy to.
    #[clap(long, env, value_enum, default_value = "devchain")]
    pub network: Network,

    /// Overrides the node URL implied by `--network`.
    #[clap(long, env)]
    pub node_url: Option<Url>,

    /// Compiled wrapper contract JSON with a `bytecode` field.
    #[clap(long, env, default_value = "artifacts/SavingsCELOWithUbeV1.json")]
    pub artifact: PathBuf,

    /// Directory holding `<network>.<Contract>.addr.json` files.
    #[clap(long, env, default_value = "deployments")]
    pub cache_dir: PathBuf,

    /// SavingsCELO address. Defaults to the known deployment of the network.
    /// Only mainnet has one, so alfajores, baklava and devchain need it set.
    #[clap(long, env)]
    pub savings_celo: Option<Address>,

    /// Ubeswap router address. Defaults to the known deployment of the
    /// network.
    #[clap(long, env)]
    pub ube_router: Option<Address>,

    /// Key used to sign the deployment. Without it the node has to sign with
    /// its first unlocked account.
    #[clap(long, env)]
    pub private_key: Option<PrivateKeySigner>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum Network {
    Devchain,
    Alfajores,
    Baklava,
    Mainnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Devchain => "devchain",
            Self::Alfajores => "alfajores",
            Self::Baklava => "baklava",
            Self::Mainnet => "mainnet",
        }
    }

    pub fn default_node_url(&self) -> &'static str {
        match self {
            Self::Devchain => "http://127.0.0.1:7545",
            Self::Alfajores => "https://alfajores-forno.celo-testnet.org",
            Self::Baklava => "https://baklava-forno.celo-testnet.org",
            Self::Mainnet => "https://forno.celo.org",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Arguments {
    pub fn node_url(&self) -> String {
        self.node_url
            .as_ref()
            .map(Url::to_string)
            .unwrap_or_else(|| self.network.default_node_url().to_string())
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "log_filter: {}", self.log_filter)?;
        writeln!(f, "json_logs: {}", self.json_logs)?;
        writeln!(f, "network: {}", self.network)?;
        writeln!(f, "node_url: {}", self.node_url())?;
        writeln!(f, "artifact: {}", self.artifact.display())?;
        writeln!(f, "cache_dir: {}", self.cache_dir.display())?;
        writeln!(f, "savings_celo: {:?}", self.savings_celo)?;
        writeln!(f, "ube_router: {:?}", self.ube_router)?;
        writeln!(
            f,
            "private_key: {}",
            self.private_key
                .as_ref()
                .map(|signer| format!("SECRET ({})", signer.address()))
                .unwrap_or_else(|| "none".to_string())
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::address, clap::Parser};

    // Well known devchain key, never holds real funds.
    const KEY: &str = "0x4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d";

    #[test]
    fn defaults_to_devchain() {
        let args = Arguments::try_parse_from(["deployer"]).unwrap();
        assert_eq!(args.network, Network::Devchain);
        assert_eq!(
            args.artifact,
            PathBuf::from("artifacts/SavingsCELOWithUbeV1.json")
        );
        assert_eq!(args.node_url(), "http://127.0.0.1:7545");
        assert_eq!(args.cache_dir, PathBuf::from("deployments"));
        assert!(args.private_key.is_none());
        assert!(args.savings_celo.is_none());
    }

    #[test]
    fn parses_network_and_overrides() {
        let args = Arguments::try_parse_from([
            "deployer",
            "--network",
            "alfajores",
            "--artifact",
            "Wrapper.json",
            "--savings-celo",
            "0x2879BFD5e7c4EF331384E908aaA3Bd3014b703fA",
            "--node-url",
            "http://localhost:8545",
        ])
        .unwrap();
        assert_eq!(args.network, Network::Alfajores);
        assert_eq!(
            args.savings_celo,
            Some(address!("0x2879BFD5e7c4EF331384E908aaA3Bd3014b703fA"))
        );
        assert_eq!(args.node_url(), "http://localhost:8545/");
    }

    #[test]
    fn rejects_unknown_network() {
        assert!(
            Arguments::try_parse_from([
                "deployer",
                "--network",
                "ropsten",
                "--artifact",
                "Wrapper.json"
            ])
            .is_err()
        );
    }

    #[test]
    fn display_redacts_private_key() {
        let args = Arguments::try_parse_from([
            "deployer",
            "--artifact",
            "Wrapper.json",
            "--private-key",
            KEY,
        ])
        .unwrap();
        let signer = args.private_key.as_ref().unwrap();
        let shown = args.to_string();
        assert!(!shown.contains(&KEY[2..]));
        assert!(shown.contains(&format!("SECRET ({})", signer.address())));
    }
}
