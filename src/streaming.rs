//! Streaming response types.

use std::pin::Pin;

use futures::Stream;

use crate::error::PlatformError;
use crate::types::TextGenerationResponse;

/// A lazy, single-pass stream of partial generation responses.
///
/// Items arrive in generation order. The stream can be consumed exactly
/// once; dropping it early cancels the underlying remote call, and — for
/// session streams — leaves the conversation history untouched.
pub type TextGenerationStream =
    Pin<Box<dyn Stream<Item = Result<TextGenerationResponse, PlatformError>> + Send>>;
