//! palaver
//!
//! Typed async client for hosted text-generation platforms.
//!
//! The crate is organized around a small set of concrete model types
//! ([`TextGenerationModel`], [`ChatModel`], [`CodeGenerationModel`],
//! [`CodeChatModel`]) that talk to an opaque remote prediction endpoint
//! through the [`PredictionService`] seam. Request shaping and response
//! parsing are pure functions in [`transform`]; conversational state lives in
//! [`ChatSession`], which commits a turn to its history only after the
//! response has been fully materialized.
#![deny(unsafe_code)]

pub mod blocking;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod service;
pub mod streaming;
pub mod transform;
pub mod tuning;
pub mod types;

pub use config::PlatformConfig;
pub use error::{ErrorCategory, PlatformError};
pub use models::{
    ChatModel, ChatSession, CodeChatModel, CodeChatSession, CodeGenerationModel,
    ModelCapabilities, TextGenerationModel,
};
pub use service::{PredictionResponse, PredictionService, PredictionStream};
pub use streaming::TextGenerationStream;
pub use types::{
    ChatMessage, CountTokensResponse, GroundingCitation, GroundingMetadata, GroundingSource,
    InputOutputTextPair, MessageAuthor, MultiCandidateResponse, PredictionRequest,
    TextGenerationResponse,
};
