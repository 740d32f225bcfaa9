//! Domain layer containing core business logic.
//!
//! This module contains:
//! - Event, message and verdict types
//! - Diagnostics and the log sink they are written to
//! - Server membership lookups
//! - Rule trait, rule implementations and the decision engine

mod diagnostic;
mod engine;
mod error;
pub mod logger;
pub mod membership;
pub mod rules;
mod types;

pub use diagnostic::{emit, emit_all, Diagnostic, Severity, LOG_PREFIX, LOG_TARGET};
pub use engine::FilterEngine;
pub use error::{GuardError, MembershipError};
pub use membership::{FailurePolicy, ServerDirectory, StaticDirectory};
pub use types::{CancelReason, Evaluation, Event, HookKind, HookOutput, Message, User, Verdict};
