use crate::core::{
    credential_format::{ClaimFormatDesignation, ClaimFormatMap, ClaimFormatPayload},
    object::TypedParameter,
};

use anyhow::{bail, Error, Result};
use serde_json::{Map, Value as Json};

pub const CLIENT_ID_SCHEME_REDIRECT_URI: &str = "redirect_uri";
pub const CLIENT_ID_SCHEME_DID: &str = "did";
pub const CLIENT_ID_SCHEME_PRE_REGISTERED: &str = "pre-registered";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationDefinitionUriSupported(pub bool);

impl TypedParameter for PresentationDefinitionUriSupported {
    const KEY: &'static str = "presentation_definition_uri_supported";
}

impl TryFrom<Json> for PresentationDefinitionUriSupported {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self, Self::Error> {
        let Json::Bool(b) = value else {
            bail!("expected JSON boolean")
        };
        Ok(Self(b))
    }
}

impl From<PresentationDefinitionUriSupported> for Json {
    fn from(value: PresentationDefinitionUriSupported) -> Json {
        Json::Bool(value.0)
    }
}

impl Default for PresentationDefinitionUriSupported {
    fn default() -> Self {
        Self(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpFormatsSupported(pub ClaimFormatMap);

impl TypedParameter for VpFormatsSupported {
    const KEY: &'static str = "vp_formats_supported";
}

impl TryFrom<Json> for VpFormatsSupported {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self, Self::Error> {
        let map: ClaimFormatMap = serde_json::from_value(value)?;
        if map.is_empty() {
            bail!("at least one presentation format must be supported")
        }
        Ok(Self(map))
    }
}

impl From<VpFormatsSupported> for Json {
    fn from(value: VpFormatsSupported) -> Json {
        let formats = value
            .0
            .into_iter()
            .map(|(designation, payload)| {
                let payload = match payload {
                    ClaimFormatPayload::ProofTypeValuesSupported(v) => {
                        Json::Object(Map::from_iter([(
                            "proof_type_values_supported".to_owned(),
                            v.into(),
                        )]))
                    }
                    ClaimFormatPayload::AlgValuesSupported(v) => Json::Object(Map::from_iter([(
                        "alg_values_supported".to_owned(),
                        v.into(),
                    )])),
                    ClaimFormatPayload::Other(other) => other,
                };
                (String::from(designation), payload)
            })
            .collect();
        Json::Object(formats)
    }
}

impl Default for VpFormatsSupported {
    fn default() -> Self {
        Self(ClaimFormatMap::from_iter([
            (
                ClaimFormatDesignation::LdpVc,
                ClaimFormatPayload::ProofTypeValuesSupported(vec![
                    "Ed25519Signature2020".into(),
                    "Ed25519Signature2018".into(),
                    "JsonWebSignature2020".into(),
                    "RsaSignature2018".into(),
                ]),
            ),
            (
                ClaimFormatDesignation::MsoMDoc,
                ClaimFormatPayload::AlgValuesSupported(vec!["ES256".into()]),
            ),
        ]))
    }
}

impl VpFormatsSupported {
    pub fn is_claim_format_supported(&self, designation: &ClaimFormatDesignation) -> bool {
        self.0.contains_key(designation)
    }
}

/// Declares a metadata parameter holding a list of strings.
macro_rules! string_list_parameter {
    ($(#[$meta:meta])* $name:ident, $key:literal, [$($default:expr),* $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(pub Vec<String>);

        impl TypedParameter for $name {
            const KEY: &'static str = $key;
        }

        impl TryFrom<Json> for $name {
            type Error = Error;

            fn try_from(value: Json) -> Result<Self, Self::Error> {
                Ok(Self(serde_json::from_value(value)?))
            }
        }

        impl From<$name> for Json {
            fn from(value: $name) -> Json {
                Json::Array(value.0.into_iter().map(Json::from).collect())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self(vec![$(String::from($default)),*])
            }
        }
    };
}

string_list_parameter!(
    /// Client identifier schemes the wallet accepts from verifiers.
    ClientIdSchemesSupported,
    "client_id_schemes_supported",
    [
        CLIENT_ID_SCHEME_REDIRECT_URI,
        CLIENT_ID_SCHEME_DID,
        CLIENT_ID_SCHEME_PRE_REGISTERED,
    ]
);

string_list_parameter!(
    RequestObjectSigningAlgValuesSupported,
    "request_object_signing_alg_values_supported",
    ["EdDSA"]
);

string_list_parameter!(
    AuthorizationEncryptionAlgValuesSupported,
    "authorization_encryption_alg_values_supported",
    ["ECDH-ES"]
);

string_list_parameter!(
    AuthorizationEncryptionEncValuesSupported,
    "authorization_encryption_enc_values_supported",
    ["A256GCM"]
);

#[cfg(test)]
mod test {
    use serde_json::json;

    use crate::core::object::UntypedObject;

    use super::*;

    fn metadata() -> UntypedObject {
        serde_json::from_value(json!({
            "presentation_definition_uri_supported": false,
            "vp_formats_supported": {
                "mso_mdoc": {
                    "alg_values_supported": ["ES256"]
                }
            },
            "client_id_schemes_supported": [
                "did"
            ],
            "request_object_signing_alg_values_supported": [
                "ES256"
            ]
        }))
        .unwrap()
    }

    #[test]
    fn presentation_definition_uri_supported() {
        let PresentationDefinitionUriSupported(b) = metadata().get().unwrap().unwrap();
        assert!(!b);
    }

    #[test]
    fn vp_formats_supported() {
        let formats: VpFormatsSupported = metadata().get().unwrap().unwrap();
        assert_eq!(formats.0.len(), 1);
        assert!(formats.is_claim_format_supported(&ClaimFormatDesignation::MsoMDoc));
        assert!(!formats.is_claim_format_supported(&ClaimFormatDesignation::LdpVc));
    }

    #[test]
    fn empty_vp_formats_supported_is_rejected() {
        assert!(VpFormatsSupported::try_from(json!({})).is_err());
    }

    #[test]
    fn vp_formats_supported_to_json() {
        let json = Json::from(VpFormatsSupported::default());
        assert_eq!(
            json,
            json!({
                "ldp_vc": {
                    "proof_type_values_supported": [
                        "Ed25519Signature2020",
                        "Ed25519Signature2018",
                        "JsonWebSignature2020",
                        "RsaSignature2018"
                    ]
                },
                "mso_mdoc": {
                    "alg_values_supported": ["ES256"]
                }
            })
        );
    }

    #[test]
    fn string_lists_and_defaults() {
        let ClientIdSchemesSupported(v) = metadata().get().unwrap().unwrap();
        assert_eq!(v, ["did"]);

        let RequestObjectSigningAlgValuesSupported(v) = metadata().get().unwrap().unwrap();
        assert_eq!(v, ["ES256"]);

        assert!(metadata()
            .get_optional::<AuthorizationEncryptionEncValuesSupported>()
            .unwrap()
            .is_none());
        assert_eq!(AuthorizationEncryptionEncValuesSupported::default().0, ["A256GCM"]);
    }
}
