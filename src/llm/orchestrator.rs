//! Inference orchestrator: prompt assembly, candidate walk, classification.
//!
//! One [`Orchestrator::get_response`] call:
//!   1. reads the user's history,
//!   2. builds `[system] ++ history ++ [user]`,
//!   3. tries each (model, format) candidate strictly in sequence until the
//!      first 2xx,
//!   4. turns the outcome into a [`CallResult`],
//!   5. appends the exchange to history on success only.
//!
//! Every candidate is tried at most once per call; there is no retry loop
//! beyond the matrix itself.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::{GenerationConfig, InferenceConfig};
use crate::conversation::{HistoryStore, Turn};
use crate::error::AppError;

use super::candidates::{self, Candidate, EndpointFormat};
use super::extract::{self, truncate_chars};
use super::transport::{HttpTransport, RawResponse, Transport};
use super::{CallResult, ChatMessage, ErrorType};

/// Longest message content (in chars) placed in a request body.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Error code a serving layer returns when it cannot run a model at all.
const MODEL_NOT_SUPPORTED: &str = "model_not_supported";

/// Substrings of a machine-readable error code that mark a quota or billing
/// rejection, e.g. `insufficient_quota` or `billing_hard_limit_reached`.
const QUOTA_CODE_MARKERS: &[&str] =
    &["quota", "billing", "payment", "credit", "insufficient_balance", "insufficient_funds"];

/// Whole phrases in a free-text error message that mark the same. Single
/// words are too loose: "load balancer" and "insufficient GPU memory" are
/// ordinary server errors.
const QUOTA_PHRASES: &[&str] = &[
    "insufficient balance",
    "insufficient credit",
    "insufficient funds",
    "quota exceeded",
    "exceeded your quota",
    "included credits",
    "payment required",
];

const EMPTY_RESPONSE: &str = "empty response from provider";
const WARMING_UP: &str = "model warming up, try again shortly";

pub struct Orchestrator<T = HttpTransport> {
    transport: T,
    store: Arc<dyn HistoryStore>,
    /// `None` disables the orchestrator entirely.
    api_key: Option<String>,
    system_prompt: String,
    models: Vec<String>,
    formats: Vec<EndpointFormat>,
    generation: GenerationConfig,
}

impl Orchestrator<HttpTransport> {
    /// Production constructor: reqwest transport with the configured timeout.
    pub fn from_config(
        config: &InferenceConfig,
        api_key: Option<String>,
        system_prompt: String,
        store: Arc<dyn HistoryStore>,
    ) -> Result<Self, AppError> {
        let transport = HttpTransport::new(config.timeout_seconds)
            .map_err(|e| AppError::Inference(e.to_string()))?;
        Ok(Self::new(transport, store, config, api_key, system_prompt))
    }
}

impl<T: Transport> Orchestrator<T> {
    pub fn new(
        transport: T,
        store: Arc<dyn HistoryStore>,
        config: &InferenceConfig,
        api_key: Option<String>,
        system_prompt: String,
    ) -> Self {
        Self {
            transport,
            store,
            api_key,
            system_prompt,
            models: candidates::model_order(&config.model, &config.fallback_models),
            formats: candidates::endpoint_formats(&config.endpoints),
            generation: config.generation.clone(),
        }
    }

    /// `false` when no credential is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// The full candidate matrix, in traversal order.
    pub fn candidates(&self) -> Vec<Candidate<'_>> {
        candidates::build_matrix(&self.models, &self.formats)
    }

    /// Generate a reply to `user_message` in `user_id`'s conversation.
    ///
    /// Returns `None` when the orchestrator is disabled (no credential); no
    /// request is made and history is not touched. Otherwise always returns
    /// a [`CallResult`]; errors never escape.
    pub async fn get_response(&self, user_id: i64, user_message: &str) -> Option<CallResult> {
        let api_key = self.api_key.as_deref()?;

        let result = match self.exchange(api_key, user_id, user_message).await {
            Ok(result) => result,
            Err(e) => {
                error!(user_id, error = %e, "inference call failed unexpectedly");
                CallResult::failure(ErrorType::Unknown, e.to_string())
            }
        };
        Some(result)
    }

    /// Drop `user_id`'s history. Never fails.
    pub fn clear_history(&self, user_id: i64) {
        self.store.clear(user_id);
    }

    async fn exchange(&self, api_key: &str, user_id: i64, user_message: &str) -> Result<CallResult, AppError> {
        let history = self.store.get(user_id)?;
        let messages = build_messages(&self.system_prompt, &history, user_message);
        debug!(user_id, history_turns = history.len(), "prompt assembled");

        let result = match self.walk(api_key, user_id, &messages).await? {
            Walk::Answered { body } => match extract::extract_text_from_body(&body) {
                Some(message) => CallResult::Success { message },
                None => {
                    warn!(user_id, body = %truncate_chars(&body, extract::MAX_ERROR_BODY_CHARS), "2xx without generated text");
                    CallResult::failure(ErrorType::ApiError, EMPTY_RESPONSE)
                }
            },
            Walk::Exhausted(failures) => classify_exhausted(&failures),
        };

        if let CallResult::Success { message } = &result {
            self.store
                .append(user_id, Turn::user(user_message), Turn::assistant(message.clone()))?;
        }
        Ok(result)
    }

    /// Try candidates in order until the first 2xx.
    async fn walk(&self, api_key: &str, user_id: i64, messages: &[ChatMessage]) -> Result<Walk, AppError> {
        let mut failures = Failures::default();
        let mut skipped_model: Option<&str> = None;

        for candidate in self.candidates() {
            if skipped_model == Some(candidate.model) {
                continue;
            }

            let model = candidate.model;
            let format = candidate.format.name;
            let url = candidate.url();
            let body = (candidate.format.build_body)(model, messages, &self.generation)
                .map_err(|e| AppError::Inference(format!("cannot build {format} body: {e}")))?;

            failures.attempts += 1;
            debug!(user_id, model, format, %url, attempt = failures.attempts, "trying candidate");

            let response = match self.transport.post_json(&url, api_key, &body).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(user_id, model, format, error = %e, "candidate unreachable");
                    failures.last_transport = Some(e.to_string());
                    continue;
                }
            };

            if response.is_success() {
                info!(
                    user_id,
                    model,
                    format,
                    shape = ?candidate.format.shape,
                    attempts = failures.attempts,
                    "inference candidate answered"
                );
                return Ok(Walk::Answered { body: response.body });
            }

            match response.status {
                503 => warn!(user_id, model, format, "model warming up, trying next candidate"),
                410 => debug!(user_id, model, format, "endpoint retired"),
                404 => debug!(user_id, model, format, "model or route not found"),
                400 if is_model_not_supported(&response) => {
                    info!(user_id, model, "model not supported by provider, skipping its remaining formats");
                    skipped_model = Some(model);
                }
                status => warn!(
                    user_id,
                    model,
                    format,
                    status,
                    body = %truncate_chars(&response.body, extract::MAX_ERROR_BODY_CHARS),
                    "candidate rejected"
                ),
            }
            failures.last_http = Some(response);
        }

        warn!(user_id, attempts = failures.attempts, "inference candidates exhausted");
        Ok(Walk::Exhausted(failures))
    }
}

/// How a candidate walk ended.
enum Walk {
    Answered { body: String },
    Exhausted(Failures),
}

/// Most recent failures seen while walking the matrix.
#[derive(Debug, Default)]
struct Failures {
    attempts: usize,
    /// Last non-2xx HTTP response.
    last_http: Option<RawResponse>,
    /// Last error where no response arrived.
    last_transport: Option<String>,
}

/// `[system] ++ history ++ [user]`, each content clipped to
/// [`MAX_MESSAGE_CHARS`].
pub fn build_messages(system_prompt: &str, history: &[Turn], user_message: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(truncate_chars(system_prompt, MAX_MESSAGE_CHARS)));
    messages.extend(history.iter().map(|turn| {
        let mut m = ChatMessage::from_turn(turn);
        m.content = truncate_chars(&m.content, MAX_MESSAGE_CHARS);
        m
    }));
    messages.push(ChatMessage::user(truncate_chars(user_message, MAX_MESSAGE_CHARS)));
    messages
}

fn is_model_not_supported(response: &RawResponse) -> bool {
    response.status == 400
        && extract::error_code(&response.body).as_deref() == Some(MODEL_NOT_SUPPORTED)
}

/// 401/402/403, a quota/billing error code, or a message with a quota phrase.
fn is_quota_rejection(response: &RawResponse) -> bool {
    if matches!(response.status, 401..=403) {
        return true;
    }
    let code = extract::error_code(&response.body).unwrap_or_default().to_lowercase();
    if QUOTA_CODE_MARKERS.iter().any(|marker| code.contains(marker)) {
        return true;
    }
    let message = extract::error_message(&response.body).to_lowercase();
    QUOTA_PHRASES.iter().any(|phrase| message.contains(phrase))
}

fn classify_exhausted(failures: &Failures) -> CallResult {
    match &failures.last_http {
        None => {
            let detail = failures.last_transport.as_deref().unwrap_or("no candidates configured");
            CallResult::failure(
                ErrorType::ProviderUnavailable,
                format!("no inference endpoint reachable: {detail}"),
            )
        }
        Some(r) if r.status == 503 => CallResult::failure(ErrorType::ProviderUnavailable, WARMING_UP),
        Some(r) if is_quota_rejection(r) => {
            CallResult::failure(ErrorType::InsufficientBalance, extract::error_message(&r.body))
        }
        Some(r) => CallResult::failure(ErrorType::ApiError, extract::error_message(&r.body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::{Value, json};

    use crate::config::inference_config_for;
    use crate::conversation::InMemoryHistory;
    use crate::llm::ProviderError;

    const SYSTEM: &str = "You are Mira.";

    /// Replays canned outcomes in order and records every request.
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<RawResponse, ProviderError>>>,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<RawResponse, ProviderError>>) -> Self {
            Self { script: Mutex::new(script.into()), calls: Mutex::new(Vec::new()) }
        }

        fn replying(responses: Vec<RawResponse>) -> Self {
            Self::new(responses.into_iter().map(Ok).collect())
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        async fn post_json(&self, url: &str, _bearer: &str, body: &Value) -> Result<RawResponse, ProviderError> {
            self.calls.lock().unwrap().push((url.to_string(), body.clone()));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RawResponse::new(500, "unscripted")))
        }
    }

    impl Transport for Arc<ScriptedTransport> {
        async fn post_json(&self, url: &str, bearer: &str, body: &Value) -> Result<RawResponse, ProviderError> {
            self.as_ref().post_json(url, bearer, body).await
        }
    }

    /// A store whose reads always fail.
    struct BrokenStore;

    impl HistoryStore for BrokenStore {
        fn get(&self, _user_id: i64) -> Result<Vec<Turn>, AppError> {
            Err(AppError::Memory("history lock poisoned".into()))
        }
        fn append(&self, _: i64, _: Turn, _: Turn) -> Result<(), AppError> {
            Err(AppError::Memory("history lock poisoned".into()))
        }
        fn clear(&self, _user_id: i64) {}
    }

    fn chat_ok(text: &str) -> RawResponse {
        RawResponse::new(200, json!({"choices": [{"message": {"content": text}}]}).to_string())
    }

    fn model_not_supported() -> RawResponse {
        RawResponse::new(
            400,
            json!({"error": {"message": "model not supported", "code": "model_not_supported"}}).to_string(),
        )
    }

    fn setup(
        script: Vec<RawResponse>,
        fallbacks: &[&str],
    ) -> (Orchestrator<Arc<ScriptedTransport>>, Arc<ScriptedTransport>, Arc<InMemoryHistory>) {
        setup_with_key(script, fallbacks, Some("hf_test"))
    }

    fn setup_with_key(
        script: Vec<RawResponse>,
        fallbacks: &[&str],
        key: Option<&str>,
    ) -> (Orchestrator<Arc<ScriptedTransport>>, Arc<ScriptedTransport>, Arc<InMemoryHistory>) {
        let transport = Arc::new(ScriptedTransport::replying(script));
        let store = Arc::new(InMemoryHistory::new(10));
        let config = inference_config_for("http://mock", "model-a", fallbacks);
        let orch = Orchestrator::new(
            Arc::clone(&transport),
            store.clone(),
            &config,
            key.map(str::to_string),
            SYSTEM.to_string(),
        );
        (orch, transport, store)
    }

    #[tokio::test]
    async fn disabled_without_credential() {
        let (orch, transport, store) = setup_with_key(vec![chat_ok("hi")], &[], None);
        store.append(1, Turn::user("earlier"), Turn::assistant("kept")).unwrap();
        let before = store.get(1).unwrap();

        assert!(!orch.is_enabled());
        assert_eq!(orch.get_response(1, "hello").await, None);
        assert!(transport.calls().is_empty());
        assert_eq!(store.get(1).unwrap(), before);
    }

    #[tokio::test]
    async fn first_message_is_system_plus_user() {
        let (orch, transport, _) = setup(vec![chat_ok("Hey!")], &[]);
        let result = orch.get_response(5, "hello").await.unwrap();
        assert_eq!(result, CallResult::Success { message: "Hey!".into() });

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "http://mock/v1/chat/completions");
        assert_eq!(
            calls[0].1["messages"],
            json!([
                {"role": "system", "content": SYSTEM},
                {"role": "user", "content": "hello"},
            ])
        );
    }

    #[tokio::test]
    async fn history_feeds_next_call_and_stays_bounded() {
        let replies: Vec<RawResponse> = (0..8).map(|i| chat_ok(&format!("reply {i}"))).collect();
        let (orch, transport, store) = setup(replies, &[]);

        for i in 0..8 {
            let result = orch.get_response(9, &format!("msg {i}")).await.unwrap();
            assert!(result.is_success());
            assert!(store.get(9).unwrap().len() <= 10);
        }

        let history = store.get(9).unwrap();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0], Turn::user("msg 3"));
        assert_eq!(history[9], Turn::assistant("reply 7"));

        // The last request carried the 10 turns held before it.
        let last = transport.calls().pop().unwrap().1;
        let sent = last["messages"].as_array().unwrap();
        assert_eq!(sent.len(), 1 + 10 + 1);
        assert_eq!(sent[1]["content"], "msg 2");
        assert_eq!(sent[11]["content"], "msg 7");
    }

    #[tokio::test]
    async fn stops_at_first_success() {
        let (orch, transport, store) = setup(
            vec![
                RawResponse::new(503, r#"{"error":"Model is currently loading"}"#),
                RawResponse::new(404, "Not Found"),
                RawResponse::new(200, r#"[{"generated_text":" From the third. "}]"#),
                chat_ok("never"),
            ],
            &["model-b"],
        );

        let result = orch.get_response(1, "hi").await.unwrap();
        assert_eq!(result, CallResult::Success { message: "From the third.".into() });

        let urls: Vec<String> = transport.calls().into_iter().map(|(url, _)| url).collect();
        assert_eq!(
            urls,
            vec![
                "http://mock/v1/chat/completions",
                "http://mock/models/model-a",
                "http://mock/hf-inference/models/model-a",
            ]
        );
        assert_eq!(store.get(1).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unsupported_model_skips_to_next_model() {
        let (orch, transport, _) = setup(vec![model_not_supported(), chat_ok("from b")], &["model-b"]);

        let result = orch.get_response(1, "hi").await.unwrap();
        assert_eq!(result, CallResult::Success { message: "from b".into() });

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, "http://mock/v1/chat/completions");
        assert_eq!(calls[1].1["model"], "model-b");
    }

    #[tokio::test]
    async fn plain_400_does_not_skip_model() {
        let (orch, transport, _) = setup(
            vec![RawResponse::new(400, r#"{"error":"bad input"}"#), chat_ok("second format")],
            &["model-b"],
        );
        let result = orch.get_response(1, "hi").await.unwrap();
        assert!(result.is_success());
        assert_eq!(transport.calls()[1].0, "http://mock/models/model-a");
    }

    #[tokio::test]
    async fn final_503_is_provider_unavailable() {
        let (orch, transport, store) = setup(
            vec![
                RawResponse::new(404, "nope"),
                RawResponse::new(410, "gone"),
                RawResponse::new(503, r#"{"error":"loading"}"#),
            ],
            &[],
        );
        store.append(3, Turn::user("earlier"), Turn::assistant("kept")).unwrap();
        let before = store.get(3).unwrap();

        let result = orch.get_response(3, "hi").await.unwrap();
        assert_eq!(result.error_type(), Some(ErrorType::ProviderUnavailable));
        assert_eq!(transport.calls().len(), 3);
        assert_eq!(store.get(3).unwrap(), before);
    }

    #[tokio::test]
    async fn empty_success_body_is_api_error() {
        let (orch, _, store) = setup(vec![RawResponse::new(200, "{}")], &[]);
        store.append(4, Turn::user("before"), Turn::assistant("kept")).unwrap();
        let before = store.get(4).unwrap();

        let result = orch.get_response(4, "hi").await.unwrap();
        match result {
            CallResult::Failure { error, error_type } => {
                assert_eq!(error_type, ErrorType::ApiError);
                assert!(error.contains("empty response"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(store.get(4).unwrap(), before);
    }

    #[tokio::test]
    async fn exhausted_uses_last_error_body() {
        let (orch, _, _) = setup(
            vec![
                RawResponse::new(503, "warming"),
                RawResponse::new(500, "internal"),
                RawResponse::new(429, r#"{"error":"Rate limit reached"}"#),
            ],
            &[],
        );
        let result = orch.get_response(1, "hi").await.unwrap();
        assert_eq!(result, CallResult::failure(ErrorType::ApiError, "Rate limit reached"));
    }

    #[tokio::test]
    async fn quota_rejection_is_insufficient_balance() {
        let (orch, _, _) = setup(
            vec![
                RawResponse::new(402, r#"{"error":"You have exceeded your monthly included credits"}"#),
                RawResponse::new(402, r#"{"error":"You have exceeded your monthly included credits"}"#),
                RawResponse::new(402, r#"{"error":"You have exceeded your monthly included credits"}"#),
            ],
            &[],
        );
        let result = orch.get_response(1, "hi").await.unwrap();
        assert_eq!(result.error_type(), Some(ErrorType::InsufficientBalance));
    }

    #[tokio::test]
    async fn quota_code_in_body_is_insufficient_balance() {
        let body = json!({"error": {"message": "quota exhausted", "type": "insufficient_quota"}}).to_string();
        let (orch, _, _) = setup(
            vec![RawResponse::new(429, body.clone()), RawResponse::new(429, body.clone()), RawResponse::new(429, body)],
            &[],
        );
        let result = orch.get_response(1, "hi").await.unwrap();
        assert_eq!(result.error_type(), Some(ErrorType::InsufficientBalance));
    }

    #[test]
    fn server_errors_mentioning_balance_or_insufficient_are_api_errors() {
        for response in [
            RawResponse::new(502, r#"{"error":"upstream load balancer timeout"}"#),
            RawResponse::new(500, r#"{"error":"Insufficient GPU memory to load model"}"#),
            RawResponse::new(500, r#"{"error":{"message":"bad gateway","code":"load_balancer_error"}}"#),
        ] {
            let failures = Failures { attempts: 1, last_http: Some(response), last_transport: None };
            assert_eq!(classify_exhausted(&failures).error_type(), Some(ErrorType::ApiError));
        }
    }

    #[test]
    fn quota_phrases_in_message_are_insufficient_balance() {
        for body in [
            r#"{"error":"Insufficient balance on this account"}"#,
            r#"{"message":"Monthly quota exceeded"}"#,
            r#"{"error":"You have exceeded your monthly included credits"}"#,
        ] {
            let failures =
                Failures { attempts: 1, last_http: Some(RawResponse::new(429, body)), last_transport: None };
            assert_eq!(classify_exhausted(&failures).error_type(), Some(ErrorType::InsufficientBalance));
        }
    }

    #[tokio::test]
    async fn gone_after_warming_up_reports_last_error() {
        // 410 is recorded like any other non-2xx, so it outranks an earlier 503.
        let (orch, transport, _) = setup(
            vec![
                RawResponse::new(503, r#"{"error":"loading"}"#),
                RawResponse::new(410, "gone"),
                RawResponse::new(410, "gone"),
            ],
            &[],
        );
        let result = orch.get_response(1, "hi").await.unwrap();
        assert_eq!(result, CallResult::failure(ErrorType::ApiError, "gone"));
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn only_transport_errors_is_provider_unavailable() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(ProviderError::Request("connect error".into())),
            Err(ProviderError::Request("timeout error".into())),
            Err(ProviderError::Request("connect error".into())),
        ]));
        let store = Arc::new(InMemoryHistory::default());
        let config = inference_config_for("http://mock", "model-a", &[]);
        let orch = Orchestrator::new(Arc::clone(&transport), store, &config, Some("k".into()), SYSTEM.into());

        let result = orch.get_response(1, "hi").await.unwrap();
        assert_eq!(result.error_type(), Some(ErrorType::ProviderUnavailable));
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn last_http_outcome_wins_over_later_transport_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(RawResponse::new(404, r#"{"message":"Model not found"}"#)),
            Err(ProviderError::Request("timeout error".into())),
            Err(ProviderError::Request("timeout error".into())),
        ]));
        let store = Arc::new(InMemoryHistory::default());
        let config = inference_config_for("http://mock", "model-a", &[]);
        let orch = Orchestrator::new(transport, store, &config, Some("k".into()), SYSTEM.into());

        let result = orch.get_response(1, "hi").await.unwrap();
        assert_eq!(result, CallResult::failure(ErrorType::ApiError, "Model not found"));
    }

    #[tokio::test]
    async fn store_failure_is_unknown() {
        let transport = Arc::new(ScriptedTransport::replying(vec![chat_ok("hi")]));
        let config = inference_config_for("http://mock", "model-a", &[]);
        let orch = Orchestrator::new(
            Arc::clone(&transport),
            Arc::new(BrokenStore),
            &config,
            Some("k".into()),
            SYSTEM.into(),
        );
        let result = orch.get_response(1, "hi").await.unwrap();
        assert_eq!(result.error_type(), Some(ErrorType::Unknown));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn clear_history_unknown_user_is_noop() {
        let (orch, _, store) = setup(vec![chat_ok("hi")], &[]);
        orch.get_response(1, "hello").await.unwrap();
        orch.clear_history(12345);
        assert_eq!(store.user_count(), 1);
        orch.clear_history(1);
        assert!(store.get(1).unwrap().is_empty());
    }

    #[test]
    fn long_messages_are_clipped() {
        let long = "x".repeat(MAX_MESSAGE_CHARS + 50);
        let messages = build_messages(SYSTEM, &[Turn::assistant(long.clone())], &long);
        assert_eq!(messages.len(), 3);
        assert!(messages[0].is_system());
        assert_eq!(messages[1].content.chars().count(), MAX_MESSAGE_CHARS);
        assert_eq!(messages[2].content.chars().count(), MAX_MESSAGE_CHARS);
    }

    #[test]
    fn matrix_covers_every_model_and_format() {
        let (orch, _, _) = setup(vec![], &["model-b", "model-a"]);
        let matrix = orch.candidates();
        assert_eq!(matrix.len(), 6);
        assert_eq!(matrix[0].model, "model-a");
        assert_eq!(matrix[3].model, "model-b");
    }
}
