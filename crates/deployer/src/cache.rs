//! File backed store of deployed contract addresses so that repeated runs
//! reuse earlier deployments. Each entry lives in its own
//! `<network>.<Contract>.addr.json` file.

use {
    crate::arguments::Network,
    alloy::primitives::Address,
    anyhow::{Context, Result},
    serde::{Deserialize, Serialize},
    std::{future::Future, io::ErrorKind, path::PathBuf},
};

#[derive(Debug, Deserialize, Serialize)]
struct Entry {
    address: Address,
}

#[derive(Clone, Debug)]
pub struct AddressCache {
    dir: PathBuf,
    network: Network,
}

impl AddressCache {
    pub fn new(dir: impl Into<PathBuf>, network: Network) -> Self {
        Self {
            dir: dir.into(),
            network,
        }
    }

    pub fn path(&self, contract: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{contract}.addr.json", self.network))
    }

    pub async fn get(&self, contract: &str) -> Result<Option<Address>> {
        let path = self.path(contract);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", path.display()));
            }
        };
        let entry: Entry = serde_json::from_str(&json)
            .with_context(|| format!("malformed address cache {}", path.display()))?;
        Ok(Some(entry.address))
    }

    pub async fn store(&self, contract: &str, address: Address) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create {}", self.dir.display()))?;
        let path = self.path(contract);
        let json = serde_json::to_string(&Entry { address })?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("write {}", path.display()))
    }

    /// Returns the cached address of `contract`. Only when there is none yet
    /// `deploy` gets polled and its result cached.
    pub async fn get_or_deploy(
        &self,
        contract: &str,
        deploy: impl Future<Output = Result<Address>>,
    ) -> Result<Address> {
        if let Some(address) = self.get(contract).await? {
            tracing::info!(%contract, ?address, network = %self.network, "using cached deployment");
            return Ok(address);
        }
        let address = deploy.await?;
        self.store(contract, address).await?;
        tracing::info!(%contract, ?address, network = %self.network, "deployed");
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::address};

    const WRAPPER: Address = address!("0x1111111111111111111111111111111111111111");

    #[tokio::test]
    async fn missing_entry_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AddressCache::new(dir.path(), Network::Devchain);
        assert_eq!(cache.get("SavingsCELOWithUbeV1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn stores_entry_under_network_and_contract() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AddressCache::new(dir.path().join("deployments"), Network::Alfajores);
        cache.store("SavingsCELOWithUbeV1", WRAPPER).await.unwrap();

        let path = dir
            .path()
            .join("deployments/alfajores.SavingsCELOWithUbeV1.addr.json");
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"address": "0x1111111111111111111111111111111111111111"})
        );
        assert_eq!(
            cache.get("SavingsCELOWithUbeV1").await.unwrap(),
            Some(WRAPPER)
        );

        // Entries are per network.
        let mainnet = AddressCache::new(dir.path().join("deployments"), Network::Mainnet);
        assert_eq!(mainnet.get("SavingsCELOWithUbeV1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn deploys_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AddressCache::new(dir.path(), Network::Devchain);

        let first = cache
            .get_or_deploy("SavingsCELOWithUbeV1", async { Ok(WRAPPER) })
            .await
            .unwrap();
        assert_eq!(first, WRAPPER);

        let second = cache
            .get_or_deploy("SavingsCELOWithUbeV1", async {
                Err(anyhow::anyhow!("must not deploy again"))
            })
            .await
            .unwrap();
        assert_eq!(second, WRAPPER);
    }

    #[tokio::test]
    async fn failed_deployment_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AddressCache::new(dir.path(), Network::Devchain);

        assert!(
            cache
                .get_or_deploy("SavingsCELOWithUbeV1", async {
                    Err(anyhow::anyhow!("out of gas"))
                })
                .await
                .is_err()
        );
        assert_eq!(cache.get("SavingsCELOWithUbeV1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn malformed_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = AddressCache::new(dir.path(), Network::Devchain);
        std::fs::write(cache.path("SavingsCELOWithUbeV1"), "{}").unwrap();
        assert!(cache.get("SavingsCELOWithUbeV1").await.is_err());
    }
}
