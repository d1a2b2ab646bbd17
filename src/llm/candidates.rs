//! Candidate matrix: which (model, endpoint format) pairs to try, in order.
//!
//! Endpoint formats are plain records: a URL template, a body builder and the
//! response shape the endpoint is expected to return. The matrix is
//! model-major: every format of the primary model is tried before the first
//! fallback model.

use serde::Serialize;
use serde_json::Value;

use crate::config::{EndpointsConfig, GenerationConfig};

use super::ChatMessage;

/// Placeholder replaced by the model id in URL templates.
const MODEL_PLACEHOLDER: &str = "{model}";

/// Builds the JSON request body for one candidate.
pub type BodyBuilder = fn(&str, &[ChatMessage], &GenerationConfig) -> Result<Value, serde_json::Error>;

/// What a successful body is expected to look like. Extraction is tolerant
/// of either shape; the tag is carried for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    ChatCompletion,
    RawGeneration,
}

/// One way of calling the inference provider.
#[derive(Debug, Clone)]
pub struct EndpointFormat {
    pub name: &'static str,
    pub url_template: String,
    pub build_body: BodyBuilder,
    pub shape: ResponseShape,
}

impl EndpointFormat {
    /// Resolve the URL for `model`. Templates without a placeholder are fixed.
    pub fn url_for(&self, model: &str) -> String {
        self.url_template.replace(MODEL_PLACEHOLDER, model)
    }
}

/// The three formats, in the order they are tried for each model.
pub fn endpoint_formats(endpoints: &EndpointsConfig) -> Vec<EndpointFormat> {
    vec![
        EndpointFormat {
            name: "chat-completion",
            url_template: endpoints.chat_url.clone(),
            build_body: chat_completion_body,
            shape: ResponseShape::ChatCompletion,
        },
        EndpointFormat {
            name: "raw-generation",
            url_template: endpoints.generation_url.clone(),
            build_body: raw_generation_body,
            shape: ResponseShape::RawGeneration,
        },
        EndpointFormat {
            name: "routed-raw-generation",
            url_template: endpoints.routed_generation_url.clone(),
            build_body: raw_generation_body,
            shape: ResponseShape::RawGeneration,
        },
    ]
}

/// Primary model first, then fallbacks; blanks and duplicates dropped.
pub fn model_order(primary: &str, fallbacks: &[String]) -> Vec<String> {
    let mut models: Vec<String> = Vec::with_capacity(fallbacks.len() + 1);
    for m in std::iter::once(primary).chain(fallbacks.iter().map(String::as_str)) {
        let m = m.trim();
        if !m.is_empty() && !models.iter().any(|existing| existing == m) {
            models.push(m.to_string());
        }
    }
    models
}

/// A single attempt: one model through one endpoint format.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub model: &'a str,
    pub format: &'a EndpointFormat,
}

impl Candidate<'_> {
    pub fn url(&self) -> String {
        self.format.url_for(self.model)
    }
}

/// Cross `models` with `formats`, model-major.
pub fn build_matrix<'a>(models: &'a [String], formats: &'a [EndpointFormat]) -> Vec<Candidate<'a>> {
    models
        .iter()
        .flat_map(move |model| formats.iter().map(move |format| Candidate { model, format }))
        .collect()
}

// ── Body builders ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    repetition_penalty: f32,
    stream: bool,
}

#[derive(Serialize)]
struct GenerationRequest {
    inputs: String,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    repetition_penalty: f32,
    return_full_text: bool,
}

fn chat_completion_body(
    model: &str,
    messages: &[ChatMessage],
    params: &GenerationConfig,
) -> Result<Value, serde_json::Error> {
    serde_json::to_value(ChatCompletionRequest {
        model,
        messages,
        max_tokens: params.max_new_tokens,
        temperature: params.temperature,
        top_p: params.top_p,
        repetition_penalty: params.repetition_penalty,
        stream: false,
    })
}

fn raw_generation_body(
    _model: &str,
    messages: &[ChatMessage],
    params: &GenerationConfig,
) -> Result<Value, serde_json::Error> {
    serde_json::to_value(GenerationRequest {
        inputs: flatten_prompt(messages),
        parameters: GenerationParameters {
            max_new_tokens: params.max_new_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            repetition_penalty: params.repetition_penalty,
            return_full_text: false,
        },
    })
}

/// Render the message list as a single completion prompt ending in an open
/// assistant line.
pub fn flatten_prompt(messages: &[ChatMessage]) -> String {
    let mut out = String::new();
    for m in messages {
        match m.role.as_str() {
            "system" => {
                out.push_str(&m.content);
                out.push_str("\n\n");
            }
            "assistant" => {
                out.push_str("Assistant: ");
                out.push_str(&m.content);
                out.push('\n');
            }
            _ => {
                out.push_str("User: ");
                out.push_str(&m.content);
                out.push('\n');
            }
        }
    }
    out.push_str("Assistant:");
    out
}
