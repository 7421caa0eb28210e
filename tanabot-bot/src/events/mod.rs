/// Error-to-reply rendering.
pub mod error_report;
/// Per-message router: workflow first, then the command pipeline.
pub mod message;
/// The tanabata DM submission workflow.
pub mod tanabata;
