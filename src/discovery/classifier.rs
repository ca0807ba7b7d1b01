//! Completion-backed classification of a candidate into a directory entry.
//!
//! The model is asked for a single JSON object. Its answer is validated
//! against a strict schema: required fields must be present and well-typed,
//! pricing must be a known tier and name/description must not be blank.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::api::{ApiError, CompletionApi, CompletionRequest};
use crate::tool::{Category, Pricing, determine_category};
use crate::util::compile_static_regex;

use super::Candidate;

const SYSTEM_PROMPT: &str =
    "You are a JSON generator. Return ONLY valid JSON, no markdown formatting, no explanation.";
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 500;

/// Features kept from the model answer.
pub const MAX_FEATURES: usize = 5;

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"```(?:json)?\s*\n?([\s\S]*?)\n?```"));

/// Reasons a candidate did not come back as a valid tool.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The completion call itself failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The answer contained no JSON object.
    #[error("completion answer contains no JSON object")]
    NoJson,

    /// The extracted text is not valid JSON for the expected shape.
    #[error("completion answer is not valid classifier JSON: {0}")]
    Parse(String),

    /// A field is present but unusable.
    #[error("classifier answer field `{field}` {reason}")]
    Schema {
        field: &'static str,
        reason: String,
    },

    /// The model judged the candidate not to be a genuine AI tool.
    #[error("model flagged the candidate as not a genuine AI tool")]
    NotATool,
}

/// Wire shape of the model answer. Required fields have no serde default.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifierResponse {
    name: String,
    description: String,
    pricing: String,
    #[serde(default)]
    features: Vec<String>,
    #[serde(rename = "isValidAITool")]
    is_valid_ai_tool: bool,
    #[serde(default)]
    suggested_category: Option<String>,
}

/// Validated classification of one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub name: String,
    pub description: String,
    pub pricing: Pricing,
    pub features: Vec<String>,
    pub category: Category,
    /// `false` when the category came from the keyword scorer.
    pub category_suggested: bool,
}

/// Builds the user prompt for `candidate`.
#[must_use]
pub fn build_classifier_prompt(candidate: &Candidate) -> String {
    format!(
        r#"You are an AI tool curator. Analyze this potential AI tool and return ONLY a valid JSON object (no markdown, no explanation, just JSON).

Tool to analyze:
- Name: {name}
- URL: {url}
- Description: {description}

Return a JSON object with these exact fields:
{{
    "name": "Official product name (clean, no extra text)",
    "description": "Clear 1-2 sentence description (max 150 chars)",
    "pricing": "free" or "freemium" or "paid",
    "features": ["feature1", "feature2", "feature3", "feature4", "feature5"],
    "isValidAITool": true or false,
    "suggestedCategory": "one of: {categories}"
}}

Make sure the tool is actually an AI tool. Return isValidAITool: false if it's not.
Also return isValidAITool: false if the page is an article, blog post, review, "best of" list or directory of other tools, or if you can only give a generic description."#,
        name = candidate.name,
        url = candidate.url,
        description = candidate.description,
        categories = Category::ALL.map(Category::as_str).join(", "),
    )
}

/// Extracts the JSON object from a completion answer.
///
/// Markdown code fences are unwrapped first; remaining prose around the object
/// is dropped by taking the outermost `{...}`.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let unfenced = CODE_FENCE_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str().trim());

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    (start < end).then(|| &unfenced[start..=end])
}

/// Parses and validates a completion answer.
///
/// # Errors
///
/// Returns [`ClassifyError`] when no JSON is found, the JSON does not match the
/// schema, a field is invalid, or the model rejected the candidate.
pub fn parse_classification(text: &str) -> Result<Classification, ClassifyError> {
    let json = extract_json_object(text).ok_or(ClassifyError::NoJson)?;
    let response: ClassifierResponse =
        serde_json::from_str(json).map_err(|e| ClassifyError::Parse(e.to_string()))?;

    if !response.is_valid_ai_tool {
        return Err(ClassifyError::NotATool);
    }

    let name = response.name.trim().to_string();
    if name.is_empty() {
        return Err(ClassifyError::Schema {
            field: "name",
            reason: "is blank".to_string(),
        });
    }
    let description = response.description.trim().to_string();
    if description.is_empty() {
        return Err(ClassifyError::Schema {
            field: "description",
            reason: "is blank".to_string(),
        });
    }
    let pricing: Pricing = response
        .pricing
        .parse()
        .map_err(|reason| ClassifyError::Schema {
            field: "pricing",
            reason,
        })?;

    let features: Vec<String> = response
        .features
        .into_iter()
        .map(|feature| feature.trim().to_string())
        .filter(|feature| !feature.is_empty())
        .take(MAX_FEATURES)
        .collect();

    let suggested = response
        .suggested_category
        .as_deref()
        .and_then(|label| label.parse::<Category>().ok());
    let (category, category_suggested) = match suggested {
        Some(category) => (category, true),
        None => (determine_category(&name, &description), false),
    };

    Ok(Classification {
        name,
        description,
        pricing,
        features,
        category,
        category_suggested,
    })
}

/// Asks the completion service to classify `candidate`.
///
/// # Errors
///
/// Returns [`ClassifyError`] on API failure or an unusable answer.
#[instrument(skip(api, candidate), fields(candidate = %candidate.name))]
pub async fn classify(
    api: &dyn CompletionApi,
    candidate: &Candidate,
) -> Result<Classification, ClassifyError> {
    let request =
        CompletionRequest::new(build_classifier_prompt(candidate), TEMPERATURE, MAX_TOKENS)
            .with_system(SYSTEM_PROMPT);
    let answer = api.complete(&request).await?;
    let classification = parse_classification(&answer)?;
    debug!(
        name = %classification.name,
        category = %classification.category,
        suggested = classification.category_suggested,
        "Candidate classified"
    );
    Ok(classification)
}
