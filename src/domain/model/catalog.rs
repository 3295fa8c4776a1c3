//! Known model identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Identifier of a model as understood by the upstream provider.
///
/// Provider-scoped names such as `fireworks-ai/kimi-k2-instruct-0905` are
/// valid, so no character restrictions apply beyond being non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModelId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ModelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The enumerated set of models a step may reference
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: Vec<ModelId>,
}

impl ModelCatalog {
    /// Build a catalog, dropping blank and duplicate entries
    pub fn new<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::default();

        for model in models {
            let model = model.into().trim().to_string();

            if model.is_empty() || catalog.contains(&model) {
                continue;
            }

            catalog.models.push(ModelId(model));
        }

        catalog
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.iter().any(|m| m.as_str() == model)
    }

    pub fn models(&self) -> &[ModelId] {
        &self.models
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Reject identifiers that are not part of the catalog
    pub fn validate(&self, model: &ModelId) -> Result<(), DomainError> {
        if self.contains(model.as_str()) {
            return Ok(());
        }

        Err(DomainError::validation(format!(
            "Unknown model '{}'. Known models: {}",
            model,
            self.models
                .iter()
                .map(ModelId::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_id_serializes_as_plain_string() {
        let id = ModelId::new("fireworks-ai/kimi-k2-instruct-0905");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"fireworks-ai/kimi-k2-instruct-0905\"");

        let back: ModelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_catalog_drops_blank_and_duplicate_entries() {
        let catalog = ModelCatalog::new(["gpt-4o", "  ", "gpt-4o", " m1 "]);

        let names: Vec<&str> = catalog.models().iter().map(ModelId::as_str).collect();
        assert_eq!(names, vec!["gpt-4o", "m1"]);
    }

    #[test]
    fn test_catalog_validation() {
        let catalog = ModelCatalog::new(["m1", "m2"]);

        assert!(catalog.validate(&ModelId::new("m1")).is_ok());

        let err = catalog.validate(&ModelId::new("M1")).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(err.to_string().contains("Unknown model 'M1'"));
        assert!(err.to_string().contains("m1, m2"));
    }
}
