//! Backend adapters for Heimdall.
//!
//! All adapters implement the `heimdall_core::BackendAdapter` trait.
//! The registry selects the adapter for a resolved backend and drives the
//! call through a `heimdall_core::Transport`.

pub mod aider;
mod chat;
pub mod claude;
pub mod deepseek;
pub mod registry;
pub mod transport;

pub use aider::AiderAdapter;
pub use claude::ClaudeAdapter;
pub use deepseek::DeepseekAdapter;
pub use registry::AdapterRegistry;
pub use transport::HttpTransport;
