//! Pure request shaping and response parsing.
//!
//! Nothing in this module touches the network or any session state; both
//! halves are plain data transformations, which is what makes the turn
//! coordinator's commit semantics easy to reason about and to test.

pub mod request;
pub mod response;

pub use request::{chat_request, code_generation_request, text_generation_request};
pub use response::{
    parse_chat_prediction, parse_chat_response, parse_multi_candidate, parse_text_prediction,
};
