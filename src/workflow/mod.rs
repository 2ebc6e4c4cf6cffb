pub mod audit_ctx;
pub mod audit_flow;

pub use audit_ctx::AuditCtx;
pub use audit_flow::{AuditFlow, AuditOutcome};
