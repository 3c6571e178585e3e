use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// A GroupId represents a unique identifier for a group of Input Descriptors.
pub type GroupId = String;

/// What a verifier requires of the holder, as decoded from an authorization
/// request.
///
/// Constraints, formats and submission requirements are evaluated by the
/// protocol engine; they are kept here untyped so that they can be shown to
/// the holder and echoed back without loss.
///
/// See: <https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-definition>
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PresentationDefinition {
    id: String,
    #[serde(default)]
    input_descriptors: Vec<InputDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    submission_requirements: Option<Vec<Json>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Json>,
}

impl PresentationDefinition {
    pub fn new(id: String) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn add_input_descriptor(mut self, input_descriptor: InputDescriptor) -> Self {
        self.input_descriptors.push(input_descriptor);
        self
    }

    pub fn set_submission_requirements(mut self, submission_requirements: Vec<Json>) -> Self {
        self.submission_requirements = Some(submission_requirements);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn input_descriptors(&self) -> &[InputDescriptor] {
        &self.input_descriptors
    }

    pub fn input_descriptor(&self, id: &str) -> Option<&InputDescriptor> {
        self.input_descriptors.iter().find(|d| d.id == id)
    }

    pub fn submission_requirements(&self) -> Option<&[Json]> {
        self.submission_requirements.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref()
    }

    pub fn format(&self) -> Option<&Json> {
        self.format.as_ref()
    }

    /// Ids of the input descriptors that must each be satisfied by at least
    /// one credential.
    ///
    /// All input descriptors are mandatory unless submission requirements
    /// are present, in which case `None` is returned: which descriptors are
    /// needed then depends on the `pick` rules.
    pub fn mandatory_input_descriptors(&self) -> Option<impl Iterator<Item = &str>> {
        if self.submission_requirements.is_some() {
            return None;
        }
        Some(self.input_descriptors.iter().map(|d| d.id.as_str()))
    }
}

/// A single credential requirement of a [PresentationDefinition].
///
/// See: <https://identity.foundation/presentation-exchange/spec/v2.0.0/#input-descriptor-object>
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct InputDescriptor {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Json>,
    #[serde(default, skip_serializing_if = "Json::is_null")]
    constraints: Json,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    group: Vec<GroupId>,
}

impl InputDescriptor {
    pub fn new(id: String) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn set_format(mut self, format: Json) -> Self {
        self.format = Some(format);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref()
    }

    pub fn format(&self) -> Option<&Json> {
        self.format.as_ref()
    }

    pub fn constraints(&self) -> &Json {
        &self.constraints
    }

    pub fn groups(&self) -> &[GroupId] {
        &self.group
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_example() {
        let definition: PresentationDefinition = serde_json::from_value(json!({
            "id": "vp token example",
            "purpose": "Relying party is requesting your digital ID for the purpose of Self-Authentication",
            "input_descriptors": [
                {
                    "id": "id card credential",
                    "format": {
                        "ldp_vc": {
                            "proof_type": ["Ed25519Signature2020"]
                        }
                    },
                    "constraints": {
                        "fields": [
                            {
                                "path": ["$.type"],
                                "filter": { "type": "object", "pattern": "MOSIPVerifiableCredential" }
                            }
                        ]
                    }
                },
                { "id": "mdl", "format": { "mso_mdoc": { "alg": ["ES256"] } } }
            ]
        }))
        .unwrap();

        assert_eq!(definition.id(), "vp token example");
        assert_eq!(definition.input_descriptors().len(), 2);
        assert!(definition.input_descriptor("mdl").is_some());
        assert!(definition.input_descriptor("passport").is_none());
        assert_eq!(
            definition
                .mandatory_input_descriptors()
                .unwrap()
                .collect::<Vec<_>>(),
            ["id card credential", "mdl"]
        );
    }

    #[test]
    fn submission_requirements_relax_mandatory_descriptors() {
        let definition: PresentationDefinition = serde_json::from_value(json!({
            "id": "pick one",
            "submission_requirements": [
                { "rule": "pick", "count": 1, "from": "A" }
            ],
            "input_descriptors": [
                { "id": "citizenship_input_1", "group": ["A"] },
                { "id": "citizenship_input_2", "group": ["A"] }
            ]
        }))
        .unwrap();

        assert!(definition.mandatory_input_descriptors().is_none());
        assert_eq!(definition.input_descriptors()[1].groups(), ["A"]);
    }
}
