//! The Heimdall command pipeline.
//!
//! A command flows through four stages, driven by [`Engine`]:
//!
//! 1. **Parse** the raw text into an optional backend token and a body
//! 2. **Gather context** from the active document and workspace
//! 3. **Route** to one backend, explicitly or by heuristic scoring
//! 4. **Dispatch** through the adapter registry and wrap the reply
//!
//! Only context gathering degrades silently; every other failure is
//! returned to the caller.

pub mod context;
pub mod engine;
pub mod parser;
pub mod router;

pub use context::{ContextBuilder, FileDocument, LocalWorkspace, language_for_path};
pub use engine::{Engine, RoutePlan};
pub use parser::parse;
pub use router::{ModelRouter, RoutingDecision, RuleTable, Scores};
