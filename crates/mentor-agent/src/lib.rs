//! Mentor Agent - Persona-clarifying tutor built on a single generic ask cycle

pub mod agent;
pub mod history;
pub mod self_reference;
pub mod tutor;

pub use agent::{Agent, AgentSettings, CallProfile, EmptyReply, NO_RESPONSE_FALLBACK};
pub use history::HistoryManager;
pub use self_reference::SelfReference;
pub use tutor::{PersonaPolicy, Tutor};
