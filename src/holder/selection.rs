use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::core::credential_format::ClaimFormatDesignation;

use super::error::DataIntegrityError;

/// A credential the holder picked for an input descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedCredential {
    format: ClaimFormatDesignation,
    credential: Json,
}

impl SelectedCredential {
    /// `format` is normalized, so a known format spelled as
    /// [ClaimFormatDesignation::Other] becomes its named variant.
    pub fn new(format: impl Into<ClaimFormatDesignation>, credential: Json) -> Self {
        Self {
            format: String::from(format.into()).into(),
            credential,
        }
    }

    pub fn format(&self) -> &ClaimFormatDesignation {
        &self.format
    }

    /// Raw credential payload, in its format-dependent representation.
    pub fn credential(&self) -> &Json {
        &self.credential
    }

    /// Decode a wallet credential record:
    ///
    /// ```json
    /// { "vcMetadata": { "format": "ldp_vc" }, "verifiableCredential": { "credential": {} } }
    /// ```
    fn from_wallet_record(
        record: &Json,
        input_descriptor_id: &str,
        index: usize,
    ) -> Result<Self, DataIntegrityError> {
        let format = record
            .pointer("/vcMetadata/format")
            .and_then(Json::as_str)
            .filter(|f| !f.is_empty())
            .ok_or_else(|| DataIntegrityError::MissingFormat {
                input_descriptor_id: input_descriptor_id.to_owned(),
                index,
            })?;

        let credential = record
            .pointer("/verifiableCredential/credential")
            .filter(|c| !c.is_null())
            .ok_or_else(|| DataIntegrityError::MissingPayload {
                input_descriptor_id: input_descriptor_id.to_owned(),
                index,
            })?;

        Ok(Self::new(format, credential.clone()))
    }
}

/// Credentials chosen by the holder, per input descriptor id, in the order
/// they were picked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialSelection(BTreeMap<String, Vec<SelectedCredential>>);

impl CredentialSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a credential for an input descriptor.
    pub fn select(
        mut self,
        input_descriptor_id: impl Into<String>,
        credential: SelectedCredential,
    ) -> Self {
        self.0
            .entry(input_descriptor_id.into())
            .or_default()
            .push(credential);
        self
    }

    /// Register an input descriptor for which nothing was picked.
    pub fn skip(mut self, input_descriptor_id: impl Into<String>) -> Self {
        self.0.entry(input_descriptor_id.into()).or_default();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SelectedCredential])> {
        self.0.iter().map(|(id, creds)| (id.as_str(), creds.as_slice()))
    }

    /// Credentials picked for an input descriptor; empty when none were.
    pub fn credentials(&self, input_descriptor_id: &str) -> &[SelectedCredential] {
        self.0
            .get(input_descriptor_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of selected credentials across all input descriptors.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Decode the selection produced by the wallet UI: an object mapping each
    /// input descriptor id to an array of wallet credential records.
    ///
    /// A record without a format or a payload is reported, never skipped.
    pub fn from_wallet_json(value: &Json) -> Result<Self, DataIntegrityError> {
        let Json::Object(entries) = value else {
            return Err(DataIntegrityError::Schema {
                document: "credential selection",
                path: ".".to_owned(),
                message: "expected an object keyed by input descriptor id".to_owned(),
            });
        };

        let mut selection = Self::new();
        for (input_descriptor_id, records) in entries {
            let Json::Array(records) = records else {
                return Err(DataIntegrityError::Schema {
                    document: "credential selection",
                    path: input_descriptor_id.clone(),
                    message: "expected an array of credentials".to_owned(),
                });
            };

            selection = selection.skip(input_descriptor_id.as_str());
            for (index, record) in records.iter().enumerate() {
                let credential =
                    SelectedCredential::from_wallet_record(record, input_descriptor_id, index)?;
                selection = selection.select(input_descriptor_id.as_str(), credential);
            }
        }

        Ok(selection)
    }
}

/// Raw credentials regrouped by input descriptor id, then by format, in the
/// shape the protocol engine expects:
///
/// ```json
/// { "input1": { "ldp_vc": [ {..}, {..} ] }, "input2": { "mso_mdoc": [ ".." ] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedCredentials(BTreeMap<String, BTreeMap<ClaimFormatDesignation, Vec<Json>>>);

impl GroupedCredentials {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Payloads of one format selected for an input descriptor.
    pub fn get(
        &self,
        input_descriptor_id: &str,
        format: &ClaimFormatDesignation,
    ) -> Option<&[Json]> {
        self.0.get(input_descriptor_id)?.get(format).map(Vec::as_slice)
    }

    pub fn input_descriptor_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn formats(
        &self,
        input_descriptor_id: &str,
    ) -> impl Iterator<Item = &ClaimFormatDesignation> {
        self.0
            .get(input_descriptor_id)
            .into_iter()
            .flat_map(BTreeMap::keys)
    }

    /// Total number of payloads across all groups.
    pub fn len(&self) -> usize {
        self.0
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }
}

/// Regroup a selection by (input descriptor id, format).
///
/// Payloads keep the order in which they appear in the selection. An input
/// descriptor with no selected credential produces no group.
pub fn group(selection: CredentialSelection) -> GroupedCredentials {
    let mut grouped = GroupedCredentials::default();

    for (input_descriptor_id, credentials) in selection.0 {
        for SelectedCredential { format, credential } in credentials {
            grouped
                .0
                .entry(input_descriptor_id.clone())
                .or_default()
                .entry(format)
                .or_default()
                .push(credential);
        }
    }

    grouped
}
