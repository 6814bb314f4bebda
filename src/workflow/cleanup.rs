//! Hidden shutdown workflow: drop the CA, then the temporary directory.

use std::sync::Arc;

use crate::resources::GlobalResources;
use crate::workflow::{
    ConfigurationOptions, Engine, InvocationContext, WorkflowData, WorkflowIdentifier,
};
use crate::Result;

pub const WORKFLOW_ID_GLOBAL_CLEANUP: &str = "internal.cleanup";

pub fn global_cleanup_id() -> WorkflowIdentifier {
    WorkflowIdentifier::new(WORKFLOW_ID_GLOBAL_CLEANUP)
}

/// Register the cleanup workflow as hidden, with no options.
pub fn init_cleanup(engine: &mut Engine, resources: Arc<GlobalResources>) -> Result<()> {
    let entry = engine.register(
        global_cleanup_id(),
        ConfigurationOptions::empty(),
        move |invocation, input| global_cleanup_workflow(&resources, invocation, input),
    )?;
    entry.set_visibility(false);

    Ok(())
}

/// Both steps swallow their own failures, so this always succeeds with no output.
pub fn global_cleanup_workflow(
    resources: &GlobalResources,
    invocation: &InvocationContext,
    _input: Vec<WorkflowData>,
) -> Result<Vec<WorkflowData>> {
    resources.ca().cleanup();
    resources.temp_directory().cleanup(invocation.configuration());

    Ok(Vec::new())
}
