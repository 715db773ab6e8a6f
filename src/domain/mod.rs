//! Domain layer - request-scoped value types and pure policies.
//!
//! Nothing here performs I/O. Flows in `application` combine these types with
//! the ports in `ports`.

pub mod classification;
pub mod flow_name;
pub mod messages;
pub mod plan;
pub mod structured_output;

pub use classification::{ClassificationLabel, UnrecognizedClassification};
pub use flow_name::FlowName;
pub use messages::{ChatRole, ChatTurn, Message, MessageSequence, Role};
pub use plan::{Plan, PlanError};
pub use structured_output::{parse_fenced_json, strip_code_fence, SchemaId};
