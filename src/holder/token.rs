use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::core::credential_format::ClaimFormatDesignation;

use super::error::DataIntegrityError;

/// Signing algorithm used for VP token proofs when the wallet has no other
/// preference.
pub const DEFAULT_PROOF_SIGNING_ALGORITHM: &str = "EdDSA";

/// The material a holder must sign for one credential format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnsignedVpToken {
    /// Detached payload of a W3C or SD-JWT presentation.
    DataToSign {
        #[serde(rename = "dataToSign")]
        data_to_sign: String,
    },
    /// ISO 18013-7 device authentication bytes, per document type.
    DeviceAuthentication {
        #[serde(rename = "docTypeToDeviceAuthenticationBytes")]
        doc_type_to_device_authentication_bytes: BTreeMap<String, String>,
    },
    /// Any other object, passed to the signer as is. Only accepted for
    /// formats other than `ldp_vc` and `mso_mdoc`.
    Other(Map<String, Json>),
}

impl UnsignedVpToken {
    pub fn data_to_sign(&self) -> Option<&str> {
        match self {
            Self::DataToSign { data_to_sign } => Some(data_to_sign),
            Self::DeviceAuthentication { .. } | Self::Other(_) => None,
        }
    }

    pub fn device_authentication_bytes(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::DeviceAuthentication {
                doc_type_to_device_authentication_bytes,
            } => Some(doc_type_to_device_authentication_bytes),
            Self::DataToSign { .. } | Self::Other(_) => None,
        }
    }
}

/// Unsigned VP tokens returned by the protocol engine, one per credential
/// format present in the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedVpTokens(HashMap<ClaimFormatDesignation, UnsignedVpToken>);

impl UnsignedVpTokens {
    pub(crate) fn from_engine_response(response: &str) -> Result<Self, DataIntegrityError> {
        let de = &mut serde_json::Deserializer::from_str(response);
        let tokens: Self = serde_path_to_error::deserialize(de)
            .map_err(|e| DataIntegrityError::schema("unsigned VP tokens", e))?;

        for (format, token) in tokens.iter() {
            let expected = match format {
                ClaimFormatDesignation::LdpVc => "`dataToSign`",
                ClaimFormatDesignation::MsoMDoc => "`docTypeToDeviceAuthenticationBytes`",
                _ => continue,
            };
            let matches = matches!(
                (format, token),
                (ClaimFormatDesignation::LdpVc, UnsignedVpToken::DataToSign { .. })
                    | (
                        ClaimFormatDesignation::MsoMDoc,
                        UnsignedVpToken::DeviceAuthentication { .. }
                    )
            );
            if !matches {
                return Err(DataIntegrityError::Schema {
                    document: "unsigned VP tokens",
                    path: format.to_string(),
                    message: format!("expected {expected}"),
                });
            }
        }

        Ok(tokens)
    }

    pub fn get(&self, format: &ClaimFormatDesignation) -> Option<&UnsignedVpToken> {
        self.0.get(format)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClaimFormatDesignation, &UnsignedVpToken)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Signatures produced by the holder's signer for each unsigned VP token.
///
/// The content of each result is owned by the signer and the protocol
/// engine; for `ldp_vc` it typically carries `jws`, `signatureAlgorithm`
/// and `publicKey`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VpTokenSigningResults(HashMap<ClaimFormatDesignation, Json>);

impl VpTokenSigningResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, format: impl Into<ClaimFormatDesignation>, result: Json) -> Self {
        self.0.insert(format.into(), result);
        self
    }

    pub fn get(&self, format: &ClaimFormatDesignation) -> Option<&Json> {
        self.0.get(format)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn engine_response_per_format() {
        let response = json!({
            "ldp_vc": { "dataToSign": "eyJAY29udGV4dCI6WyJodHRwczovL3d3dy53My5vcmcvMjAxOC9jcmVkZW50aWFscy92MSJdfQ" },
            "mso_mdoc": {
                "docTypeToDeviceAuthenticationBytes": {
                    "org.iso.18013.5.1.mDL": "d818590..."
                }
            }
        })
        .to_string();

        let tokens = UnsignedVpTokens::from_engine_response(&response).unwrap();

        assert_eq!(tokens.len(), 2);
        assert!(tokens
            .get(&ClaimFormatDesignation::LdpVc)
            .and_then(UnsignedVpToken::data_to_sign)
            .is_some());
        let mdoc = tokens.get(&ClaimFormatDesignation::MsoMDoc).unwrap();
        assert_eq!(mdoc.data_to_sign(), None);
        assert_eq!(
            mdoc.device_authentication_bytes().unwrap()["org.iso.18013.5.1.mDL"],
            "d818590..."
        );
    }

    #[test]
    fn unknown_token_shape_is_a_fault() {
        let response = json!({ "ldp_vc": { "signature": "..." } }).to_string();

        let err = UnsignedVpTokens::from_engine_response(&response).unwrap_err();

        assert!(matches!(
            err,
            DataIntegrityError::Schema { document: "unsigned VP tokens", ref path, .. }
                if path == "ldp_vc"
        ));
    }

    #[test]
    fn mdoc_token_must_carry_device_authentication_bytes() {
        let response = json!({ "mso_mdoc": { "dataToSign": "..." } }).to_string();

        assert!(UnsignedVpTokens::from_engine_response(&response).is_err());
    }

    #[test]
    fn sd_jwt_token_shape_is_passed_through() {
        let response = json!({
            "dc+sd-jwt": { "sdJwt": "eyJhbGciOiJFUzI1NiJ9.e30.c2ln~", "keyBindingJwtHeader": {} },
            "vc+sd-jwt": { "dataToSign": "ZGF0YQ" }
        })
        .to_string();

        let tokens = UnsignedVpTokens::from_engine_response(&response).unwrap();

        let UnsignedVpToken::Other(token) = tokens.get(&ClaimFormatDesignation::DcSdJwt).unwrap()
        else {
            panic!("unexpected token shape")
        };
        assert!(token.contains_key("sdJwt"));
        assert_eq!(
            tokens
                .get(&ClaimFormatDesignation::VcSdJwt)
                .and_then(UnsignedVpToken::data_to_sign),
            Some("ZGF0YQ")
        );
    }

    #[test]
    fn signing_results_wire_shape() {
        let results = VpTokenSigningResults::new().insert(
            "ldp_vc",
            json!({
                "jws": "eyJhbGciOiJFZERTQSJ9..c2lnbmF0dXJl",
                "signatureAlgorithm": DEFAULT_PROOF_SIGNING_ALGORITHM,
                "publicKey": "did:jwk:eyJrdHkiOiJPS1AifQ#0"
            }),
        );

        let value = serde_json::to_value(&results).unwrap();

        assert_eq!(value["ldp_vc"]["signatureAlgorithm"], "EdDSA");
        assert_eq!(
            serde_json::from_value::<VpTokenSigningResults>(value).unwrap(),
            results
        );
    }
}
