//! # Heimdall Core
//!
//! Domain types, traits, and error definitions for the Heimdall command router.
//! This crate has **no runtime dependencies** beyond serialization: it defines
//! the domain model that the router, the backend adapters and the CLI host all
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator the router talks to is a trait here:
//! - [`BackendAdapter`]: per-backend wire mapping
//! - [`Transport`]: the HTTP boundary
//! - [`WorkspaceProvider`] / [`ActiveDocument`]: caller-side context sources
//!
//! Implementations live in their respective crates, so tests can swap any of
//! them for a scripted stand-in.

pub mod adapter;
pub mod backend;
pub mod command;
pub mod context;
pub mod error;
pub mod response;
pub mod transport;

// Re-export key types at crate root for ergonomics
pub use adapter::{BackendAdapter, PreparedCall};
pub use backend::{BackendConfig, BackendId, BackendOptions};
pub use command::ParsedCommand;
pub use context::{ActiveDocument, FileInfo, RepoStatus, WorkingContext, WorkspaceProvider, WorkspaceSummary};
pub use error::{BackendRequestError, Error, Result, TransportError, WorkspaceError};
pub use response::ModelResponse;
pub use transport::{HttpRequest, HttpResponse, Transport};
