//! Concrete implementations of the ports.
//!
//! All adapters here are in-process: simulated channel senders, the
//! template-backed renderer, an in-memory customer directory, and a
//! bounded in-memory audit log. Production deployments swap these for
//! provider-backed implementations behind the same traits.

mod audit;
mod directory;
mod renderer;
mod sender;
mod simulator;

pub use audit::MemoryAuditLog;
pub use directory::InMemoryDirectory;
pub use renderer::TemplateRenderer;
pub use sender::{SenderBehavior, SimulatedSender};
pub use simulator::TransactionSimulator;
