//! Synchronous wrappers over the async client.
//!
//! Each wrapper owns a current-thread runtime and delegates to the async
//! implementation, so blocking callers get the exact same request shaping,
//! parsing, and history-commit semantics — there is no second coordinator.
//!
//! These types must not be used from inside an async runtime; like
//! `reqwest::blocking`, they are for plain synchronous programs and threads.

use std::pin::Pin;

use futures::{Stream, StreamExt};
use tokio::runtime::Runtime;

use crate::error::PlatformError;
use crate::types::{
    CountTokensResponse, MessageOptions, MultiCandidateResponse, TextGenerationParams,
    TextGenerationResponse,
};

fn new_runtime() -> Result<Runtime, PlatformError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| PlatformError::Internal(format!("failed to build blocking runtime: {e}")))
}

/// Iterator adapter that pulls a stream to completion one blocking step at a
/// time. Dropping it early behaves exactly like dropping the stream.
struct BlockingIter<'a, T> {
    stream: Pin<Box<dyn Stream<Item = T> + Send + 'a>>,
    runtime: &'a Runtime,
}

impl<T> Iterator for BlockingIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.runtime.block_on(self.stream.next())
    }
}

/// Blocking facade over [`crate::TextGenerationModel`].
#[derive(Debug)]
pub struct TextGenerationModel {
    inner: crate::TextGenerationModel,
    runtime: Runtime,
}

impl TextGenerationModel {
    /// Wraps an async model handle.
    pub fn new(inner: crate::TextGenerationModel) -> Result<Self, PlatformError> {
        Ok(Self {
            inner,
            runtime: new_runtime()?,
        })
    }

    /// Gets the model response for a single prompt, blocking until it
    /// arrives.
    pub fn predict(
        &self,
        prompt: &str,
        params: &TextGenerationParams,
    ) -> Result<MultiCandidateResponse, PlatformError> {
        self.runtime.block_on(self.inner.predict(prompt, params))
    }

    /// Streams the model response, yielding partial responses as a blocking
    /// iterator.
    pub fn predict_streaming(
        &self,
        prompt: &str,
        params: &TextGenerationParams,
    ) -> Result<impl Iterator<Item = Result<TextGenerationResponse, PlatformError>> + '_, PlatformError>
    {
        let stream = self
            .runtime
            .block_on(self.inner.predict_streaming(prompt, params))?;
        Ok(BlockingIter {
            stream,
            runtime: &self.runtime,
        })
    }

    /// Counts tokens for the given prompts, blocking until the count
    /// arrives.
    pub fn count_tokens(
        &self,
        prompts: Vec<String>,
    ) -> Result<CountTokensResponse, PlatformError> {
        self.runtime.block_on(self.inner.count_tokens(prompts))
    }
}

/// Blocking facade over [`crate::ChatSession`].
///
/// Commit semantics are inherited from the wrapped session: a failed call or
/// an abandoned streaming iterator leaves the history untouched.
#[derive(Debug)]
pub struct ChatSession {
    inner: crate::ChatSession,
    runtime: Runtime,
}

impl ChatSession {
    /// Wraps an async chat session.
    pub fn new(inner: crate::ChatSession) -> Result<Self, PlatformError> {
        Ok(Self {
            inner,
            runtime: new_runtime()?,
        })
    }

    /// Read-only view of the committed conversation history.
    pub fn message_history(&self) -> &[crate::ChatMessage] {
        self.inner.message_history()
    }

    /// Sends a message and blocks until the response arrives.
    pub fn send_message(
        &mut self,
        message: impl Into<String>,
        options: MessageOptions,
    ) -> Result<MultiCandidateResponse, PlatformError> {
        let Self { inner, runtime } = self;
        runtime.block_on(inner.send_message(message, options))
    }

    /// Sends a message and returns a blocking iterator over the partial
    /// responses. The turn is committed only when the iterator is drained to
    /// the end.
    pub fn send_message_streaming(
        &mut self,
        message: impl Into<String>,
        options: MessageOptions,
    ) -> impl Iterator<Item = Result<TextGenerationResponse, PlatformError>> + '_ {
        let Self { inner, runtime } = self;
        BlockingIter {
            stream: Box::pin(inner.send_message_streaming(message, options)),
            runtime,
        }
    }

    /// Counts tokens for the message plus the session state, blocking until
    /// the count arrives.
    pub fn count_tokens(&self, message: &str) -> Result<CountTokensResponse, PlatformError> {
        self.runtime.block_on(self.inner.count_tokens(message))
    }
}
