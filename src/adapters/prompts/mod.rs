//! Prompt Store Adapters.
//!
//! - `InMemoryPromptStore` - map-backed store (tests, built-in personas)
//! - `FilePromptStore` - reads `<id>.md` files from a directory

mod builtin;
mod file_store;
mod in_memory;

pub use builtin::builtin_personas;
pub use file_store::FilePromptStore;
pub use in_memory::InMemoryPromptStore;
