//! Application runtime composition modules.

pub(crate) mod config_manager;
pub(crate) mod config_runtime;
pub(crate) mod exit_handler;
pub(crate) mod input_processor;
pub(crate) mod progress_manager;
pub(crate) mod resolution_orchestrator;
pub(crate) mod runtime;
pub(crate) mod structure_export;
pub(crate) mod terminal;
pub(crate) mod validation;
