//! Data model shared across the crate.

mod grounding;
mod message;
mod request;
mod response;

pub use grounding::{
    GroundingCitation, GroundingMetadata, GroundingSource, InlineContext, VertexAiSearch,
    WebSearch,
};
pub use message::{ChatMessage, InputOutputTextPair, MessageAuthor};
pub use request::{
    CodeChatOptions, CodeGenerationParams, MessageOptions, PredictionRequest, SamplingParams,
    TextGenerationParams,
};
pub use response::{CountTokensResponse, MultiCandidateResponse, TextGenerationResponse};
