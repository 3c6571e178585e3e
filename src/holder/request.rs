use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use url::Url;

use crate::core::presentation_definition::PresentationDefinition;

use super::error::DataIntegrityError;

/// A verifier the holder trusts ahead of time, identified by its client id
/// and the endpoints it may receive presentations on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedVerifier {
    pub client_id: String,
    #[serde(default)]
    pub response_uris: Vec<Url>,
}

impl TrustedVerifier {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            response_uris: Vec::new(),
        }
    }

    pub fn with_response_uri(mut self, uri: Url) -> Self {
        self.response_uris.push(uri);
        self
    }
}

/// An authorization request that passed verifier authentication, as returned
/// by the protocol engine.
///
/// It drives the credential selection UI and is checked against the
/// selection when unsigned tokens are constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedRequest {
    client_id: String,
    presentation_definition: PresentationDefinition,
    nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response_uri: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    redirect_uri: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_metadata: Option<Json>,
}

impl AuthenticatedRequest {
    pub(crate) fn from_engine_response(response: &str) -> Result<Self, DataIntegrityError> {
        let de = &mut serde_json::Deserializer::from_str(response);
        serde_path_to_error::deserialize(de)
            .map_err(|e| DataIntegrityError::schema("authorization request", e))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn presentation_definition(&self) -> &PresentationDefinition {
        &self.presentation_definition
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn response_type(&self) -> Option<&str> {
        self.response_type.as_deref()
    }

    pub fn response_mode(&self) -> Option<&str> {
        self.response_mode.as_deref()
    }

    /// Where the presentation will be delivered: the `response_uri` for
    /// `direct_post` modes, the `redirect_uri` otherwise.
    pub fn return_uri(&self) -> Option<&Url> {
        self.response_uri.as_ref().or(self.redirect_uri.as_ref())
    }

    pub fn client_metadata(&self) -> Option<&Json> {
        self.client_metadata.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn engine_response() {
        let response = json!({
            "clientId": "https://verifier.example.org",
            "responseType": "vp_token",
            "responseMode": "direct_post",
            "responseUri": "https://verifier.example.org/response",
            "nonce": "bMHvX1HGhbh8zqlSWf/fuQ==",
            "state": "fsnC8ixCs6mWyV+00k23Qg==",
            "presentationDefinition": {
                "id": "649d581c-f891-4969-9cd5-2c27385a348f",
                "input_descriptors": [
                    {
                        "id": "idcardcredential",
                        "format": { "ldp_vc": { "proof_type": ["Ed25519Signature2020"] } }
                    }
                ]
            },
            "clientIdScheme": "pre-registered"
        })
        .to_string();

        let request = AuthenticatedRequest::from_engine_response(&response).unwrap();

        assert_eq!(request.client_id(), "https://verifier.example.org");
        assert_eq!(request.nonce(), "bMHvX1HGhbh8zqlSWf/fuQ==");
        assert_eq!(request.state(), Some("fsnC8ixCs6mWyV+00k23Qg=="));
        assert_eq!(
            request.return_uri().map(Url::as_str),
            Some("https://verifier.example.org/response")
        );
        assert_eq!(
            request.presentation_definition().input_descriptors()[0].id(),
            "idcardcredential"
        );
    }

    #[test]
    fn schema_mismatch_names_the_field() {
        let response = json!({
            "clientId": "https://verifier.example.org",
            "nonce": "n",
            "presentationDefinition": { "id": 42 }
        })
        .to_string();

        let err = AuthenticatedRequest::from_engine_response(&response).unwrap_err();

        let DataIntegrityError::Schema { document, path, .. } = &err else {
            panic!("unexpected error: {err}")
        };
        assert_eq!(*document, "authorization request");
        assert_eq!(path, "presentationDefinition.id");
    }

    #[test]
    fn not_json_is_a_fault() {
        assert!(AuthenticatedRequest::from_engine_response("not json").is_err());
    }

    #[test]
    fn trusted_verifier_wire_shape() {
        let verifier: TrustedVerifier = serde_json::from_value(json!({
            "clientId": "mock-client",
            "responseUris": ["https://mock-verifier.example/response"]
        }))
        .unwrap();

        assert_eq!(
            verifier,
            TrustedVerifier::new("mock-client")
                .with_response_uri("https://mock-verifier.example/response".parse().unwrap())
        );
    }
}
