use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::core::metadata::WalletMetadata;

/// Holder settings consulted when authenticating a verifier.
///
/// Implementations usually read persisted user settings; failures are
/// reported to the caller of the authentication.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Whether the verifier's client identifier must be validated.
    async fn client_validation_required(&self) -> Result<bool>;

    /// Wallet metadata override. `None` selects [WalletMetadata::default].
    async fn wallet_metadata(&self) -> Result<Option<WalletMetadata>>;
}

/// Static holder configuration.
///
/// ```json
/// {
///   "app_id": "io.example.wallet",
///   "client_validation_required": false,
///   "wallet_metadata": { "vp_formats_supported": { "ldp_vc": {} } }
/// }
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HolderConfig {
    /// Application identity the protocol engine is initialized with.
    pub app_id: String,
    #[serde(default = "client_validation_required_default")]
    pub client_validation_required: bool,
    #[serde(default)]
    pub wallet_metadata: Option<WalletMetadata>,
}

fn client_validation_required_default() -> bool {
    true
}

impl HolderConfig {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            client_validation_required: client_validation_required_default(),
            wallet_metadata: None,
        }
    }

    pub fn with_client_validation_required(mut self, required: bool) -> Self {
        self.client_validation_required = required;
        self
    }

    pub fn with_wallet_metadata(mut self, metadata: WalletMetadata) -> Self {
        self.wallet_metadata = Some(metadata);
        self
    }
}

#[async_trait]
impl ConfigProvider for HolderConfig {
    async fn client_validation_required(&self) -> Result<bool> {
        Ok(self.client_validation_required)
    }

    async fn wallet_metadata(&self) -> Result<Option<WalletMetadata>> {
        Ok(self.wallet_metadata.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::credential_format::ClaimFormatDesignation;

    #[test]
    fn defaults() {
        let config: HolderConfig =
            serde_json::from_value(json!({ "app_id": "io.example.wallet" })).unwrap();

        assert_eq!(config, HolderConfig::new("io.example.wallet"));
        assert!(config.client_validation_required);
        assert!(config.wallet_metadata.is_none());
    }

    #[test]
    fn metadata_override() {
        let config: HolderConfig = serde_json::from_value(json!({
            "app_id": "io.example.wallet",
            "client_validation_required": false,
            "wallet_metadata": {
                "vp_formats_supported": {
                    "mso_mdoc": { "alg_values_supported": ["ES256"] }
                }
            }
        }))
        .unwrap();

        assert!(!config.client_validation_required);
        let metadata = config.wallet_metadata.unwrap();
        assert!(metadata
            .vp_formats_supported()
            .is_claim_format_supported(&ClaimFormatDesignation::MsoMDoc));
        assert!(!metadata
            .vp_formats_supported()
            .is_claim_format_supported(&ClaimFormatDesignation::LdpVc));
    }
}
