/// Vocabulary profiles: source format, validation and loading.

use indexmap::IndexMap;
use ron::extensions::Extensions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::template::{Template, TemplateError};

/// Load-time failure. Every variant names the offending profile.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("profile not found: {id}")]
    NotFound { id: String },
    #[error("profile {id} missing '{field}' field")]
    MissingField { id: String, field: &'static str },
    #[error("profile {id} declares no templates")]
    EmptyTemplates { id: String },
    #[error("profile {id} declares no pools")]
    EmptyPools { id: String },
    #[error("profile {id}: pool '{slot}' is empty")]
    EmptyPool { id: String, slot: String },
    #[error("profile {id}: template {index} is invalid: {source}")]
    InvalidTemplate {
        id: String,
        index: usize,
        source: TemplateError,
    },
    #[error("profile {id} is malformed: {reason}")]
    Malformed { id: String, reason: String },
    #[error("profile {id}: unsupported source format (expected .json or .ron)")]
    UnsupportedFormat { id: String },
    #[error("profile {id}: IO error: {source}")]
    Io {
        id: String,
        source: std::io::Error,
    },
}

impl ConfigurationError {
    /// Identifier of the profile that failed to load.
    pub fn profile_id(&self) -> &str {
        match self {
            Self::NotFound { id }
            | Self::MissingField { id, .. }
            | Self::EmptyTemplates { id }
            | Self::EmptyPools { id }
            | Self::EmptyPool { id, .. }
            | Self::InvalidTemplate { id, .. }
            | Self::Malformed { id, .. }
            | Self::UnsupportedFormat { id }
            | Self::Io { id, .. } => id,
        }
    }
}

/// Serialization format of a profile source, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    Json,
    Ron,
}

impl ProfileFormat {
    pub fn from_id(id: &str) -> Option<ProfileFormat> {
        match Path::new(id).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(ProfileFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Some(ProfileFormat::Ron),
            _ => None,
        }
    }
}

/// A profile exactly as it appears in a source file.
///
/// `templates` and `pools` are optional here so that their absence is
/// reported as a missing field rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub templates: Option<Vec<String>>,
    #[serde(default)]
    pub pools: Option<IndexMap<String, Vec<String>>>,
}

/// Descriptive profile fields; never consulted during generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
}

/// A validated, immutable vocabulary: ordered templates plus slot pools.
///
/// The declaration order of `pools` fixes each slot's hashing coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyConfiguration {
    metadata: ProfileMetadata,
    templates: Vec<Template>,
    pools: IndexMap<String, Vec<String>>,
}

impl VocabularyConfiguration {
    /// Validate a source document. Nothing usable is produced on failure.
    pub fn from_document(
        id: &str,
        doc: ProfileDocument,
    ) -> Result<VocabularyConfiguration, ConfigurationError> {
        let raw_templates = doc.templates.ok_or_else(|| ConfigurationError::MissingField {
            id: id.to_string(),
            field: "templates",
        })?;
        let pools = doc.pools.ok_or_else(|| ConfigurationError::MissingField {
            id: id.to_string(),
            field: "pools",
        })?;

        if raw_templates.is_empty() {
            return Err(ConfigurationError::EmptyTemplates { id: id.to_string() });
        }
        if pools.is_empty() {
            return Err(ConfigurationError::EmptyPools { id: id.to_string() });
        }
        if let Some((slot, _)) = pools.iter().find(|(_, items)| items.is_empty()) {
            return Err(ConfigurationError::EmptyPool {
                id: id.to_string(),
                slot: slot.clone(),
            });
        }

        let mut templates = Vec::with_capacity(raw_templates.len());
        for (index, text) in raw_templates.iter().enumerate() {
            let template = Template::parse(text).map_err(|source| {
                ConfigurationError::InvalidTemplate {
                    id: id.to_string(),
                    index,
                    source,
                }
            })?;
            templates.push(template);
        }

        Ok(VocabularyConfiguration {
            metadata: ProfileMetadata {
                name: doc.name,
                description: doc.description,
                version: doc.version,
            },
            templates,
            pools,
        })
    }

    /// Parse a profile from source text in the given format.
    pub fn parse(
        id: &str,
        input: &str,
        format: ProfileFormat,
    ) -> Result<VocabularyConfiguration, ConfigurationError> {
        let doc: ProfileDocument = match format {
            ProfileFormat::Json => {
                serde_json::from_str(input).map_err(|e| ConfigurationError::Malformed {
                    id: id.to_string(),
                    reason: e.to_string(),
                })?
            }
            ProfileFormat::Ron => {
                // Optional fields are written bare, with or without the header.
                ron::Options::default()
                    .with_default_extension(Extensions::IMPLICIT_SOME)
                    .from_str(input)
                    .map_err(|e| ConfigurationError::Malformed {
                        id: id.to_string(),
                        reason: e.to_string(),
                    })?
            }
        };
        Self::from_document(id, doc)
    }

    pub fn parse_json(id: &str, input: &str) -> Result<VocabularyConfiguration, ConfigurationError> {
        Self::parse(id, input, ProfileFormat::Json)
    }

    pub fn parse_ron(id: &str, input: &str) -> Result<VocabularyConfiguration, ConfigurationError> {
        Self::parse(id, input, ProfileFormat::Ron)
    }

    /// Load a profile file. Its file name is used as the identifier.
    pub fn load(path: &Path) -> Result<VocabularyConfiguration, ConfigurationError> {
        let id = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        let format =
            ProfileFormat::from_id(&id).ok_or_else(|| ConfigurationError::UnsupportedFormat {
                id: id.clone(),
            })?;
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigurationError::NotFound { id: id.clone() }
            } else {
                ConfigurationError::Io {
                    id: id.clone(),
                    source,
                }
            }
        })?;
        Self::parse(&id, &contents, format)
    }

    /// Convert back to the source-document shape.
    pub fn to_document(&self) -> ProfileDocument {
        ProfileDocument {
            name: self.metadata.name.clone(),
            description: self.metadata.description.clone(),
            version: self.metadata.version.clone(),
            templates: Some(self.templates.iter().map(|t| t.source().to_string()).collect()),
            pools: Some(self.pools.clone()),
        }
    }

    pub fn metadata(&self) -> &ProfileMetadata {
        &self.metadata
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Pools in declaration order.
    pub fn pools(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.pools.iter().map(|(slot, items)| (slot.as_str(), items.as_slice()))
    }

    pub fn pool(&self, slot: &str) -> Option<&[String]> {
        self.pools.get(slot).map(Vec::as_slice)
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Slot names in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    /// 0-based declaration rank of a slot.
    pub fn slot_position(&self, slot: &str) -> Option<usize> {
        self.pools.get_index_of(slot)
    }

    /// `(template index, slot name)` for every placeholder with no pool.
    pub fn unresolved_placeholders(&self) -> Vec<(usize, &str)> {
        let mut out = Vec::new();
        for (index, template) in self.templates.iter().enumerate() {
            for name in template.placeholders() {
                if !self.pools.contains_key(name) {
                    out.push((index, name));
                }
            }
        }
        out
    }

    /// Slots that no template references.
    pub fn unused_slots(&self) -> Vec<&str> {
        self.slots()
            .filter(|slot| {
                !self
                    .templates
                    .iter()
                    .any(|t| t.placeholders().any(|name| name == *slot))
            })
            .collect()
    }
}
