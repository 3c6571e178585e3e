use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use anyhow::{bail, Result};
use async_trait::async_trait;
use openid4vp_holder::{
    core::metadata::WalletMetadata,
    holder::{ErrorCode, GroupedCredentials, ProtocolBinding, TrustedVerifier, VpTokenSigningResults},
};
use serde_json::{json, Value};

pub fn authorization_request() -> Value {
    json!({
        "clientId": "https://verifier.example.org",
        "clientIdScheme": "pre-registered",
        "responseType": "vp_token",
        "responseMode": "direct_post",
        "responseUri": "https://verifier.example.org/verifier/vp-response",
        "nonce": "VbRRB/LTxLiXmVNZuyMO8A==",
        "state": "+mRQe1d6pBoJqF6Ab28klg==",
        "presentationDefinition": {
            "id": "c4822b58-7fb4-454e-b827-f8758fe27f9a",
            "input_descriptors": [
                {
                    "id": "input1",
                    "format": { "ldp_vc": { "proof_type": ["Ed25519Signature2020"] } }
                },
                {
                    "id": "input2",
                    "format": { "mso_mdoc": { "alg": ["ES256"] } }
                }
            ]
        }
    })
}

pub fn unsigned_tokens() -> Value {
    json!({
        "ldp_vc": { "dataToSign": "eyJAY29udGV4dCI6W119" },
        "mso_mdoc": {
            "docTypeToDeviceAuthenticationBytes": { "org.iso.18013.5.1.mDL": "d8185902" }
        }
    })
}

#[derive(Debug, Default)]
pub struct Calls {
    pub authenticate: Vec<(String, Vec<TrustedVerifier>, WalletMetadata, bool)>,
    pub construct: Vec<(GroupedCredentials, String, String)>,
    pub share: Vec<VpTokenSigningResults>,
    pub send_error: Vec<(String, ErrorCode)>,
}

/// Protocol engine double answering with canned documents and recording
/// every call it receives.
pub struct MockEngine {
    pub init_calls: AtomicUsize,
    pub fail_init: bool,
    pub authentication: Result<Value, String>,
    pub tokens: Result<Value, String>,
    pub share: Result<String, String>,
    pub fail_send_error: bool,
    pub calls: Mutex<Calls>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self {
            init_calls: AtomicUsize::new(0),
            fail_init: false,
            authentication: Ok(authorization_request()),
            tokens: Ok(unsigned_tokens()),
            share: Ok("Verifiable Presentation shared successfully".to_owned()),
            fail_send_error: false,
            calls: Mutex::new(Calls::default()),
        }
    }
}

#[async_trait]
impl ProtocolBinding for MockEngine {
    async fn init(&self, app_id: &str) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        // Let concurrent callers pile up on the initialization.
        tokio::task::yield_now().await;
        if self.fail_init {
            bail!("native module unavailable for {app_id}")
        }
        Ok(())
    }

    async fn authenticate(
        &self,
        request: &str,
        trusted_verifiers: &[TrustedVerifier],
        wallet_metadata: &WalletMetadata,
        validate_client: bool,
    ) -> Result<String> {
        self.calls.lock().unwrap().authenticate.push((
            request.to_owned(),
            trusted_verifiers.to_vec(),
            wallet_metadata.clone(),
            validate_client,
        ));
        match &self.authentication {
            Ok(response) => Ok(response.to_string()),
            Err(e) => bail!("{e}"),
        }
    }

    async fn construct_unsigned_token(
        &self,
        credentials: &GroupedCredentials,
        holder_id: &str,
        signature_algorithm: &str,
    ) -> Result<String> {
        self.calls.lock().unwrap().construct.push((
            credentials.clone(),
            holder_id.to_owned(),
            signature_algorithm.to_owned(),
        ));
        match &self.tokens {
            Ok(response) => Ok(response.to_string()),
            Err(e) => bail!("{e}"),
        }
    }

    async fn share_presentation(&self, signing_results: &VpTokenSigningResults) -> Result<String> {
        self.calls.lock().unwrap().share.push(signing_results.clone());
        match &self.share {
            Ok(response) => Ok(response.clone()),
            Err(e) => bail!("{e}"),
        }
    }

    async fn send_error(&self, message: &str, code: &ErrorCode) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .send_error
            .push((message.to_owned(), code.clone()));
        if self.fail_send_error {
            bail!("network unreachable")
        }
        Ok(())
    }
}
