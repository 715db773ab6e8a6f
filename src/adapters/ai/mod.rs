//! Generation Adapters.
//!
//! Implementations of the GenerationPort.
//!
//! ## Available Adapters
//!
//! - `MockGenerationProvider` - Configurable mock for testing
//! - `GeminiProvider` - Google Gemini models via the `generateContent` API

mod gemini_provider;
mod mock_provider;

pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use mock_provider::{MockGenerationProvider, MockResponse, RecordedCall, DEFAULT_MOCK_RESPONSE};
