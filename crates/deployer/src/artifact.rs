use {
    alloy::primitives::Bytes,
    anyhow::{Context, Result},
    serde::Deserialize,
    std::path::Path,
};

/// The part of a compiled contract artifact needed for deployment.
#[derive(Debug, Deserialize)]
pub struct Artifact {
    #[serde(rename = "contractName", default)]
    pub contract_name: Option<String>,
    pub bytecode: Bytes,
}

impl Artifact {
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: Self = serde_json::from_str(json).context("invalid contract artifact")?;
        anyhow::ensure!(!artifact.bytecode.is_empty(), "artifact has no bytecode");
        Ok(artifact)
    }

    /// Fails if the artifact names a contract other than `name`. Artifacts
    /// without a name are trusted.
    pub fn ensure_contract(&self, name: &str) -> Result<()> {
        match self.contract_name.as_deref() {
            Some(actual) if actual != name => {
                anyhow::bail!("artifact is for {actual}, expected {name}")
            }
            _ => Ok(()),
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read artifact {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parse artifact {}", path.display()))
    }
}
