//! Boundary ports: traits implemented outside the core.
//!
//! The pipeline consumes these contracts; adapters in [`crate::adapter`]
//! provide in-process implementations for demos and tests, and real
//! deployments inject provider-backed ones.

mod audit;
mod directory;
mod renderer;
mod sender;

pub use audit::AuditSink;
pub use directory::CustomerDirectory;
pub use renderer::{ContentRenderer, RenderedContent};
pub use sender::{ChannelSender, SendContext, SendReceipt};
