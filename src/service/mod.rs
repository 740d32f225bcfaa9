//! Service layer: plugin startup, hook dispatch and stdin/stdout processing.

pub mod adapter;
mod hook_service;
mod hooks;
mod plugin;

pub use hook_service::HookService;
pub use hooks::{EventHandler, HookRegistry, HookTable};
pub use plugin::{init, Startup};
