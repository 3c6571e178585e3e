pub mod credential_format;
pub mod metadata;
pub mod object;
pub mod presentation_definition;
