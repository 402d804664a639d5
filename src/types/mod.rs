//! Public types for the Tonepicker API.

mod chat;
mod message;
mod tone;

pub use chat::{ChatRequest, extract_content};
pub use message::{Message, Role};
pub use tone::{Formality, ToneCoordinate, Warmth, instruction_for};
