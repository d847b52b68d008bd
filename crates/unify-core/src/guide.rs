//! Typed schemas for responses from the external generative-AI service.
//!
//! The service itself is not called from this workspace. Whatever adapter
//! talks to it hands the raw response here, and anything that does not match
//! the declared shape is rejected with [`Error::SchemaMismatch`] before it can
//! reach the vault or a view.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// A titled link, used both for official links in a guide and for grounded
/// citations (web or maps) attached to a free-text answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Link {
    pub title: String,
    pub uri: String,
}

/// Step as declared in the response schema.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
struct GuideStepResponse {
    label: String,
    description: String,
}

/// Guide as declared in the response schema.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct GuideResponse {
    title: String,
    steps: Vec<GuideStepResponse>,
    official_links: Vec<Link>,
}

/// One step of a bureaucratic guide, with local completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideStep {
    pub label: String,
    pub description: String,
    pub completed: bool,
}

/// Step-by-step guide produced by the AI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepGuide {
    pub title: String,
    pub steps: Vec<GuideStep>,
    pub official_links: Vec<Link>,
}

impl StepGuide {
    /// JSON schema the service is asked to honour.
    pub fn response_schema() -> JsonValue {
        // RootSchema always serializes
        serde_json::to_value(schema_for!(GuideResponse)).unwrap_or(JsonValue::Null)
    }

    /// Validate a raw JSON response text into a guide.
    ///
    /// Every step starts out not completed.
    pub fn from_response(text: &str) -> Result<Self> {
        let response: GuideResponse = serde_json::from_str(text.trim())
            .map_err(|e| Error::SchemaMismatch(format!("guide: {}", e)))?;

        if response.title.trim().is_empty() {
            return Err(Error::SchemaMismatch("guide: empty title".to_string()));
        }

        Ok(Self {
            title: response.title,
            steps: response
                .steps
                .into_iter()
                .map(|s| GuideStep {
                    label: s.label,
                    description: s.description,
                    completed: false,
                })
                .collect(),
            official_links: response.official_links,
        })
    }

    /// Flip the completion state of one step. Out-of-range indices are ignored.
    pub fn toggle_step(&mut self, index: usize) {
        if let Some(step) = self.steps.get_mut(index) {
            step.completed = !step.completed;
        }
    }

    pub fn completed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.completed).count()
    }
}

/// Coerce a grounded-citation list (`[{title, uri}, ...]`) into links.
pub fn links_from_response(value: JsonValue) -> Result<Vec<Link>> {
    serde_json::from_value(value).map_err(|e| Error::SchemaMismatch(format!("links: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const GUIDE: &str = r#"{
        "title": "Pedido de NIF",
        "steps": [
            {"label": "Reunir documentos", "description": "Passaporte e comprovativo de morada"},
            {"label": "Ir às Finanças", "description": "Marcar atendimento"}
        ],
        "officialLinks": [{"title": "Portal das Finanças", "uri": "https://www.portaldasfinancas.gov.pt"}]
    }"#;

    #[test]
    fn test_from_response_valid() {
        let guide = StepGuide::from_response(GUIDE).unwrap();
        assert_eq!(guide.title, "Pedido de NIF");
        assert_eq!(guide.steps.len(), 2);
        assert!(guide.steps.iter().all(|s| !s.completed));
        assert_eq!(guide.official_links[0].title, "Portal das Finanças");
    }

    #[test]
    fn test_from_response_missing_field() {
        let err = StepGuide::from_response(r#"{"title": "x", "steps": []}"#).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));
    }

    #[test]
    fn test_from_response_wrong_type() {
        let err =
            StepGuide::from_response(r#"{"title": "x", "steps": "one", "officialLinks": []}"#)
                .unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));
    }

    #[test]
    fn test_from_response_empty_title() {
        let err = StepGuide::from_response(r#"{"title": " ", "steps": [], "officialLinks": []}"#)
            .unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));
    }

    #[test]
    fn test_toggle_step() {
        let mut guide = StepGuide::from_response(GUIDE).unwrap();
        guide.toggle_step(1);
        assert!(guide.steps[1].completed);
        assert_eq!(guide.completed_count(), 1);
        guide.toggle_step(1);
        guide.toggle_step(99);
        assert_eq!(guide.completed_count(), 0);
    }

    #[test]
    fn test_response_schema_lists_required_fields() {
        let schema = StepGuide::response_schema();
        let required = schema["required"].as_array().unwrap();
        for field in ["title", "steps", "officialLinks"] {
            assert!(required.contains(&json!(field)), "missing {}", field);
        }
    }

    #[test]
    fn test_links_from_response() {
        let links = links_from_response(json!([
            {"title": "Centro de apoio", "uri": "https://example.org"}
        ]))
        .unwrap();
        assert_eq!(links.len(), 1);

        let err = links_from_response(json!([{"title": "no uri"}])).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));
    }
}
