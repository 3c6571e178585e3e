use std::ops::Deref;

use anyhow::Error;
use serde::{Deserialize, Serialize};

use self::parameters::wallet::{
    AuthorizationEncryptionAlgValuesSupported, AuthorizationEncryptionEncValuesSupported,
    ClientIdSchemesSupported, PresentationDefinitionUriSupported,
    RequestObjectSigningAlgValuesSupported, VpFormatsSupported,
};

use super::object::{ParsingErrorContext, UntypedObject};

pub mod parameters;

/// Capabilities of the holder's wallet, passed to the protocol engine when a
/// verifier is authenticated.
///
/// `vp_formats_supported` is required; every other parameter is carried only
/// when present, so an override reaches the engine exactly as configured.
/// [WalletMetadata::default] is the compiled-in wallet metadata, used when no
/// override has been configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UntypedObject", into = "UntypedObject")]
pub struct WalletMetadata {
    other: UntypedObject,
    presentation_definition_uri_supported: Option<PresentationDefinitionUriSupported>,
    vp_formats_supported: VpFormatsSupported,
    client_id_schemes_supported: Option<ClientIdSchemesSupported>,
    request_object_signing_alg_values_supported: Option<RequestObjectSigningAlgValuesSupported>,
    authorization_encryption_alg_values_supported:
        Option<AuthorizationEncryptionAlgValuesSupported>,
    authorization_encryption_enc_values_supported:
        Option<AuthorizationEncryptionEncValuesSupported>,
}

impl WalletMetadata {
    /// Metadata advertising only `vp_formats_supported`.
    pub fn new(vp_formats_supported: VpFormatsSupported) -> Self {
        Self {
            other: UntypedObject::default(),
            presentation_definition_uri_supported: None,
            vp_formats_supported,
            client_id_schemes_supported: None,
            request_object_signing_alg_values_supported: None,
            authorization_encryption_alg_values_supported: None,
            authorization_encryption_enc_values_supported: None,
        }
    }

    pub fn with_presentation_definition_uri_supported(mut self, supported: bool) -> Self {
        self.presentation_definition_uri_supported =
            Some(PresentationDefinitionUriSupported(supported));
        self
    }

    pub fn with_client_id_schemes_supported(mut self, schemes: ClientIdSchemesSupported) -> Self {
        self.client_id_schemes_supported = Some(schemes);
        self
    }

    pub fn with_request_object_signing_alg_values_supported(
        mut self,
        algs: RequestObjectSigningAlgValuesSupported,
    ) -> Self {
        self.request_object_signing_alg_values_supported = Some(algs);
        self
    }

    pub fn with_authorization_encryption_alg_values_supported(
        mut self,
        algs: AuthorizationEncryptionAlgValuesSupported,
    ) -> Self {
        self.authorization_encryption_alg_values_supported = Some(algs);
        self
    }

    pub fn with_authorization_encryption_enc_values_supported(
        mut self,
        encs: AuthorizationEncryptionEncValuesSupported,
    ) -> Self {
        self.authorization_encryption_enc_values_supported = Some(encs);
        self
    }

    pub fn presentation_definition_uri_supported(&self) -> Option<bool> {
        self.presentation_definition_uri_supported.map(|p| p.0)
    }

    pub fn vp_formats_supported(&self) -> &VpFormatsSupported {
        &self.vp_formats_supported
    }

    pub fn client_id_schemes_supported(&self) -> Option<&ClientIdSchemesSupported> {
        self.client_id_schemes_supported.as_ref()
    }

    pub fn request_object_signing_alg_values_supported(
        &self,
    ) -> Option<&RequestObjectSigningAlgValuesSupported> {
        self.request_object_signing_alg_values_supported.as_ref()
    }

    pub fn authorization_encryption_alg_values_supported(
        &self,
    ) -> Option<&AuthorizationEncryptionAlgValuesSupported> {
        self.authorization_encryption_alg_values_supported.as_ref()
    }

    pub fn authorization_encryption_enc_values_supported(
        &self,
    ) -> Option<&AuthorizationEncryptionEncValuesSupported> {
        self.authorization_encryption_enc_values_supported.as_ref()
    }
}

impl Default for WalletMetadata {
    fn default() -> Self {
        Self::new(VpFormatsSupported::default())
            .with_presentation_definition_uri_supported(
                PresentationDefinitionUriSupported::default().0,
            )
            .with_client_id_schemes_supported(Default::default())
            .with_request_object_signing_alg_values_supported(Default::default())
            .with_authorization_encryption_alg_values_supported(Default::default())
            .with_authorization_encryption_enc_values_supported(Default::default())
    }
}

impl From<WalletMetadata> for UntypedObject {
    fn from(value: WalletMetadata) -> Self {
        let mut inner = value.other;
        inner.insert(value.vp_formats_supported);
        if let Some(p) = value.presentation_definition_uri_supported {
            inner.insert(p);
        }
        if let Some(p) = value.client_id_schemes_supported {
            inner.insert(p);
        }
        if let Some(p) = value.request_object_signing_alg_values_supported {
            inner.insert(p);
        }
        if let Some(p) = value.authorization_encryption_alg_values_supported {
            inner.insert(p);
        }
        if let Some(p) = value.authorization_encryption_enc_values_supported {
            inner.insert(p);
        }
        inner
    }
}

impl TryFrom<UntypedObject> for WalletMetadata {
    type Error = Error;

    fn try_from(value: UntypedObject) -> Result<Self, Self::Error> {
        Ok(Self {
            presentation_definition_uri_supported: value.get_optional()?,
            vp_formats_supported: value.get().parsing_error()?,
            client_id_schemes_supported: value.get_optional()?,
            request_object_signing_alg_values_supported: value.get_optional()?,
            authorization_encryption_alg_values_supported: value.get_optional()?,
            authorization_encryption_enc_values_supported: value.get_optional()?,
            other: value,
        })
    }
}

impl Deref for WalletMetadata {
    type Target = UntypedObject;

    fn deref(&self) -> &Self::Target {
        &self.other
    }
}
