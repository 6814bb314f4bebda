//! # Workflows
//!
//! Named operations registered with the [`Engine`]: the visible `ca`
//! workflow and the hidden `internal.cleanup` workflow run at shutdown.

pub mod ca;
pub mod cleanup;
pub mod engine;

pub use ca::{ca_id, init_ca_workflow, WORKFLOW_ID_CA};
pub use cleanup::{global_cleanup_id, init_cleanup, WORKFLOW_ID_GLOBAL_CLEANUP};
pub use engine::{
    ConfigurationOptions, Engine, InvocationContext, WorkflowData, WorkflowEntry,
    WorkflowHandler, WorkflowIdentifier,
};
