//! Application layer - Flows and their orchestration.
//!
//! Flows depend only on ports. The dispatcher is the single entry point
//! transports use to run a flow by name.

pub mod dispatcher;
pub mod flows;
pub mod personas;
pub mod structured;

pub use dispatcher::FlowDispatcher;
pub use flows::{FailureKind, Flow, FlowError, FlowServices};
pub use personas::{Persona, PersonaResolver, PersonaSource, PromptUnavailable, FALLBACK_PERSONA};
pub use structured::{StructuredOutputAdapter, StructuredOutputError};
