//! Chat models and stateful chat sessions.
//!
//! A [`ChatSession`] owns its conversation history exclusively; the `&mut
//! self` receivers on the sending methods are the concurrency contract:
//! one logical turn at a time per session, enforced by the borrow checker
//! rather than by locks. History is only ever appended by a successful
//! commit. A transport error, a parse error, or an abandoned stream leaves
//! the session exactly as it was, so retrying is always safe.

use std::sync::Arc;

use async_stream::try_stream;
use futures::{Stream, StreamExt};

use super::{ModelCapabilities, ModelInner};
use crate::config::PlatformConfig;
use crate::error::PlatformError;
use crate::service::PredictionService;
use crate::transform;
use crate::tuning::{ReinforcementTuningOptions, TuningOptions, TuningRequest};
use crate::types::{
    ChatMessage, CodeChatOptions, CountTokensResponse, InputOutputTextPair, MessageOptions,
    MultiCandidateResponse, PredictionRequest, SamplingParams, TextGenerationResponse,
};

/// A language model capable of multi-turn chat.
///
/// ```rust,ignore
/// let model = ChatModel::new(service, config, "chat-bison@001");
/// let mut chat = model
///     .start_chat()
///     .context("My name is Ned. You are my personal assistant.")
///     .temperature(0.3)
///     .build();
/// let response = chat.send_message("Any cool events this weekend?", MessageOptions::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ChatModel {
    inner: ModelInner,
}

impl ChatModel {
    /// Creates a handle for the given chat model id.
    pub fn new(
        service: Arc<dyn PredictionService>,
        config: PlatformConfig,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            inner: ModelInner::new(service, config, model_id.into(), ModelCapabilities::chat()),
        }
    }

    /// The model id this handle was created with.
    pub fn model_id(&self) -> &str {
        &self.inner.model_id
    }

    /// The capability set fixed at construction time.
    pub fn capabilities(&self) -> ModelCapabilities {
        self.inner.capabilities
    }

    /// Starts configuring a new chat session against this model.
    pub fn start_chat(&self) -> ChatSessionBuilder {
        ChatSessionBuilder {
            inner: self.inner.clone(),
            context: None,
            examples: Vec::new(),
            defaults: SamplingParams::new(),
            history: Vec::new(),
        }
    }

    /// Assembles and validates a supervised tuning request for this model.
    pub fn build_tuning_request(
        &self,
        training_data_uri: &str,
        options: &TuningOptions,
    ) -> Result<TuningRequest, PlatformError> {
        self.inner.build_tuning_request(training_data_uri, options)
    }

    /// Assembles and validates a reinforcement tuning request for this model.
    pub fn build_reinforcement_tuning_request(
        &self,
        options: &ReinforcementTuningOptions,
    ) -> Result<TuningRequest, PlatformError> {
        self.inner.build_reinforcement_tuning_request(options)
    }
}

/// Builder for a [`ChatSession`].
#[derive(Debug)]
pub struct ChatSessionBuilder {
    inner: ModelInner,
    context: Option<String>,
    examples: Vec<InputOutputTextPair>,
    defaults: SamplingParams,
    history: Vec<ChatMessage>,
}

impl ChatSessionBuilder {
    /// Context shapes how the model responds throughout the conversation.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Few-shot examples the model learns the response style from.
    pub fn examples(mut self, examples: Vec<InputOutputTextPair>) -> Self {
        self.examples = examples;
        self
    }

    /// Append one few-shot example.
    pub fn example(mut self, example: InputOutputTextPair) -> Self {
        self.examples.push(example);
        self
    }

    /// Session default for max output tokens.
    pub const fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.defaults.max_output_tokens = Some(tokens);
        self
    }

    /// Session default for temperature.
    pub const fn temperature(mut self, temperature: f64) -> Self {
        self.defaults.temperature = Some(temperature);
        self
    }

    /// Session default for top_k.
    pub const fn top_k(mut self, top_k: u32) -> Self {
        self.defaults.top_k = Some(top_k);
        self
    }

    /// Session default for top_p.
    pub const fn top_p(mut self, top_p: f64) -> Self {
        self.defaults.top_p = Some(top_p);
        self
    }

    /// Session default stop sequences.
    pub fn stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.defaults.stop_sequences = Some(sequences);
        self
    }

    /// Seed the session with previously exchanged messages.
    pub fn message_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    /// Builds the session.
    pub fn build(self) -> ChatSession {
        ChatSession {
            inner: self.inner,
            context: self.context,
            examples: self.examples,
            defaults: self.defaults,
            history: self.history,
        }
    }
}

/// A stateful chat session with a language model.
///
/// Within a session the model keeps context and remembers the previous
/// conversation. Each session is exclusively owned by one logical caller;
/// nothing here locks, and the `&mut self` receivers make concurrent turns
/// on one session unrepresentable in safe code.
#[derive(Debug)]
pub struct ChatSession {
    inner: ModelInner,
    context: Option<String>,
    examples: Vec<InputOutputTextPair>,
    defaults: SamplingParams,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    /// Read-only view of the committed conversation history.
    pub fn message_history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// The session context, if one was set.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// The session's few-shot examples.
    pub fn examples(&self) -> &[InputOutputTextPair] {
        &self.examples
    }

    /// The session-level sampling defaults.
    pub fn defaults(&self) -> &SamplingParams {
        &self.defaults
    }

    /// Builds the prediction request for one turn: merges the call options
    /// over the session defaults and folds the full history plus the new
    /// user message into the instance.
    pub(crate) fn prepare_request(
        &self,
        message: &str,
        options: &MessageOptions,
    ) -> PredictionRequest {
        let effective = options.merged_over(&self.defaults);
        transform::chat_request(
            message,
            &self.history,
            self.context.as_deref(),
            &self.examples,
            &effective,
            &self.inner.config,
        )
    }

    fn commit_turn(&mut self, message: String, reply: String) {
        self.history.push(ChatMessage::user(message));
        self.history.push(ChatMessage::model(reply));
        tracing::debug!(turns = self.history.len(), "committed conversation turn");
    }

    /// Sends a message to the model and returns its response.
    ///
    /// On success the user message and the primary candidate's text are
    /// appended to the history as one atomic exchange. On any error the
    /// history is unchanged.
    pub async fn send_message(
        &mut self,
        message: impl Into<String>,
        options: MessageOptions,
    ) -> Result<MultiCandidateResponse, PlatformError> {
        let message = message.into();
        let request = self.prepare_request(&message, &options);
        tracing::debug!(model = %self.inner.model_id, "dispatching chat turn");

        let response = self
            .inner
            .service
            .predict(&self.inner.endpoint, vec![request.instance], request.parameters)
            .await?;
        let parsed = transform::parse_chat_response(&response)?;

        self.commit_turn(message, parsed.text.clone());
        Ok(parsed)
    }

    /// Sends a message and streams the response as it is generated.
    ///
    /// Partial responses are yielded as they arrive. The exchange is
    /// committed to the history only once the stream has been drained to the
    /// end; a stream dropped mid-way leaves the history untouched, so a
    /// truncated answer can never corrupt the conversation.
    pub fn send_message_streaming(
        &mut self,
        message: impl Into<String>,
        options: MessageOptions,
    ) -> impl Stream<Item = Result<TextGenerationResponse, PlatformError>> + Send + '_ {
        let message = message.into();
        try_stream! {
            let request = self.prepare_request(&message, &options);
            tracing::debug!(model = %self.inner.model_id, "dispatching streaming chat turn");

            let mut chunks = self
                .inner
                .service
                .predict_streaming(&self.inner.endpoint, request.instance, request.parameters)
                .await?;

            let mut reply = String::new();
            while let Some(chunk) = chunks.next().await {
                let parsed = transform::parse_chat_prediction(&chunk?)?;
                let partial = parsed.into_primary();
                reply.push_str(&partial.text);
                yield partial;
            }

            self.commit_turn(message, reply);
        }
    }

    /// Counts the tokens and billable characters for the given message plus
    /// everything the session would send with it: the committed history, the
    /// context, and the examples.
    ///
    /// This does not run a prediction; it only counts the request.
    pub async fn count_tokens(
        &self,
        message: &str,
    ) -> Result<CountTokensResponse, PlatformError> {
        self.inner.require_token_counting()?;
        let request = self.prepare_request(message, &MessageOptions::default());
        self.inner
            .service
            .count_tokens(&self.inner.endpoint, vec![request.instance])
            .await
    }
}

/// A model capable of code-focused chat.
#[derive(Debug, Clone)]
pub struct CodeChatModel {
    inner: ModelInner,
}

impl CodeChatModel {
    /// Creates a handle for the given code chat model id.
    pub fn new(
        service: Arc<dyn PredictionService>,
        config: PlatformConfig,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            inner: ModelInner::new(
                service,
                config,
                model_id.into(),
                ModelCapabilities::code_chat(),
            ),
        }
    }

    /// The model id this handle was created with.
    pub fn model_id(&self) -> &str {
        &self.inner.model_id
    }

    /// The capability set fixed at construction time.
    pub fn capabilities(&self) -> ModelCapabilities {
        self.inner.capabilities
    }

    /// Starts configuring a new code chat session against this model.
    pub fn start_chat(&self) -> CodeChatSessionBuilder {
        CodeChatSessionBuilder {
            inner: self.inner.clone(),
            context: None,
            defaults: SamplingParams::new(),
            history: Vec::new(),
        }
    }

    /// Assembles and validates a supervised tuning request for this model.
    pub fn build_tuning_request(
        &self,
        training_data_uri: &str,
        options: &TuningOptions,
    ) -> Result<TuningRequest, PlatformError> {
        self.inner.build_tuning_request(training_data_uri, options)
    }
}

/// Builder for a [`CodeChatSession`].
///
/// Code chat exposes the narrower configuration surface its models accept:
/// no nucleus/top-k defaults and no few-shot examples.
#[derive(Debug)]
pub struct CodeChatSessionBuilder {
    inner: ModelInner,
    context: Option<String>,
    defaults: SamplingParams,
    history: Vec<ChatMessage>,
}

impl CodeChatSessionBuilder {
    /// Context shapes how the model responds throughout the conversation.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Session default for max output tokens.
    pub const fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.defaults.max_output_tokens = Some(tokens);
        self
    }

    /// Session default for temperature.
    pub const fn temperature(mut self, temperature: f64) -> Self {
        self.defaults.temperature = Some(temperature);
        self
    }

    /// Session default stop sequences.
    pub fn stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.defaults.stop_sequences = Some(sequences);
        self
    }

    /// Seed the session with previously exchanged messages.
    pub fn message_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    /// Builds the session.
    pub fn build(self) -> CodeChatSession {
        CodeChatSession {
            session: ChatSession {
                inner: self.inner,
                context: self.context,
                examples: Vec::new(),
                defaults: self.defaults,
                history: self.history,
            },
        }
    }
}

/// A stateful chat session with a code chat model.
///
/// Shares the commit semantics of [`ChatSession`]: a turn only reaches the
/// history after the response was fully read.
#[derive(Debug)]
pub struct CodeChatSession {
    session: ChatSession,
}

impl CodeChatSession {
    /// Read-only view of the committed conversation history.
    pub fn message_history(&self) -> &[ChatMessage] {
        self.session.message_history()
    }

    /// The session context, if one was set.
    pub fn context(&self) -> Option<&str> {
        self.session.context()
    }

    /// Sends a message to the model and returns its response.
    pub async fn send_message(
        &mut self,
        message: impl Into<String>,
        options: CodeChatOptions,
    ) -> Result<MultiCandidateResponse, PlatformError> {
        self.session
            .send_message(message, options.into_message_options())
            .await
    }

    /// Sends a message and streams the response as it is generated.
    pub fn send_message_streaming(
        &mut self,
        message: impl Into<String>,
        options: CodeChatOptions,
    ) -> impl Stream<Item = Result<TextGenerationResponse, PlatformError>> + Send + '_ {
        self.session
            .send_message_streaming(message, options.into_message_options())
    }

    /// Counts tokens for the given message plus the session state.
    pub async fn count_tokens(
        &self,
        message: &str,
    ) -> Result<CountTokensResponse, PlatformError> {
        self.session.count_tokens(message).await
    }
}
