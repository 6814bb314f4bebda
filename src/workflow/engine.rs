//! A synchronous registry of named workflows.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Configuration;
use crate::{workflow_span, Error, Result};

const IDENTIFIER_SCHEME: &str = "flw";

/// Stable, dotted workflow name such as `internal.cleanup`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkflowIdentifier(String);

impl WorkflowIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", IDENTIFIER_SCHEME, self.0)
    }
}

/// Option names a workflow accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationOptions {
    names: BTreeSet<String>,
}

impl ConfigurationOptions {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A unit of workflow input or output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowData {
    pub content_type: String,
    pub payload: serde_json::Value,
}

impl WorkflowData {
    pub fn json(payload: serde_json::Value) -> Self {
        Self { content_type: "application/json".to_string(), payload }
    }
}

/// What a handler gets to see of the engine.
#[derive(Debug)]
pub struct InvocationContext {
    workflow_id: WorkflowIdentifier,
    configuration: Configuration,
}

impl InvocationContext {
    pub fn workflow_id(&self) -> &WorkflowIdentifier {
        &self.workflow_id
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }
}

/// Workflow body: `(invocation context, input list) -> output list`.
pub type WorkflowHandler =
    Box<dyn Fn(&InvocationContext, Vec<WorkflowData>) -> Result<Vec<WorkflowData>> + Send + Sync>;

pub struct WorkflowEntry {
    identifier: WorkflowIdentifier,
    options: ConfigurationOptions,
    visible: bool,
    handler: WorkflowHandler,
}

impl WorkflowEntry {
    pub fn identifier(&self) -> &WorkflowIdentifier {
        &self.identifier
    }

    pub fn options(&self) -> &ConfigurationOptions {
        &self.options
    }

    /// Hidden workflows are callable but excluded from user-facing listings.
    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl fmt::Debug for WorkflowEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowEntry")
            .field("identifier", &self.identifier)
            .field("options", &self.options)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

/// Holds registered workflows and the configuration they are invoked with.
#[derive(Debug)]
pub struct Engine {
    configuration: Configuration,
    entries: HashMap<WorkflowIdentifier, WorkflowEntry>,
}

impl Engine {
    pub fn new(configuration: Configuration) -> Self {
        Self { configuration, entries: HashMap::new() }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Register a workflow. Entries start out visible.
    pub fn register<F>(
        &mut self,
        identifier: WorkflowIdentifier,
        options: ConfigurationOptions,
        handler: F,
    ) -> Result<&mut WorkflowEntry>
    where
        F: Fn(&InvocationContext, Vec<WorkflowData>) -> Result<Vec<WorkflowData>>
            + Send
            + Sync
            + 'static,
    {
        match self.entries.entry(identifier.clone()) {
            Entry::Occupied(_) => {
                Err(Error::workflow(format!("Workflow {} is already registered", identifier)))
            }
            Entry::Vacant(slot) => {
                debug!(workflow = %identifier, "Registered workflow");
                Ok(slot.insert(WorkflowEntry {
                    identifier,
                    options,
                    visible: true,
                    handler: Box::new(handler),
                }))
            }
        }
    }

    pub fn get(&self, identifier: &WorkflowIdentifier) -> Option<&WorkflowEntry> {
        self.entries.get(identifier)
    }

    /// Visible workflows, sorted by name.
    pub fn visible_workflows(&self) -> Vec<&WorkflowIdentifier> {
        let mut visible: Vec<_> = self
            .entries
            .values()
            .filter(|entry| entry.visible)
            .map(WorkflowEntry::identifier)
            .collect();
        visible.sort();
        visible
    }

    /// Run a workflow synchronously on the calling thread.
    pub fn invoke(
        &self,
        identifier: &WorkflowIdentifier,
        input: Vec<WorkflowData>,
    ) -> Result<Vec<WorkflowData>> {
        let entry = self
            .entries
            .get(identifier)
            .ok_or_else(|| Error::workflow(format!("Workflow {} is not registered", identifier)))?;

        let span = workflow_span!(identifier);
        let _entered = span.enter();
        debug!(input_count = input.len(), "Invoking workflow");

        let context = InvocationContext {
            workflow_id: identifier.clone(),
            configuration: self.configuration.clone(),
        };
        (entry.handler)(&context, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> Engine {
        Engine::new(Configuration::from_overrides(Vec::<(&str, String)>::new()).unwrap())
    }

    fn echo(_: &InvocationContext, input: Vec<WorkflowData>) -> Result<Vec<WorkflowData>> {
        Ok(input)
    }

    #[test]
    fn test_identifier_display() {
        let id = WorkflowIdentifier::new("internal.cleanup");
        assert_eq!(id.name(), "internal.cleanup");
        assert_eq!(id.to_string(), "flw://internal.cleanup");
    }

    #[test]
    fn test_register_and_invoke() {
        let mut engine = engine();
        let id = WorkflowIdentifier::new("echo");
        engine.register(id.clone(), ConfigurationOptions::empty(), echo).unwrap();

        let input = vec![WorkflowData::json(json!({ "hello": "world" }))];
        let output = engine.invoke(&id, input.clone()).unwrap();
        assert_eq!(output, input);
        assert!(engine.get(&id).unwrap().options().is_empty());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut engine = engine();
        let id = WorkflowIdentifier::new("echo");
        engine.register(id.clone(), ConfigurationOptions::empty(), echo).unwrap();

        let result = engine.register(id, ConfigurationOptions::empty(), echo);
        assert!(matches!(result, Err(Error::Workflow(_))));
    }

    #[test]
    fn test_unknown_workflow() {
        let result = engine().invoke(&WorkflowIdentifier::new("nope"), Vec::new());
        assert!(matches!(result, Err(Error::Workflow(_))));
    }

    #[test]
    fn test_hidden_workflows_are_not_listed() {
        let mut engine = engine();
        engine
            .register(WorkflowIdentifier::new("b.visible"), ConfigurationOptions::empty(), echo)
            .unwrap();
        engine
            .register(WorkflowIdentifier::new("a.visible"), ConfigurationOptions::empty(), echo)
            .unwrap();
        engine
            .register(WorkflowIdentifier::new("hidden"), ConfigurationOptions::empty(), echo)
            .unwrap()
            .set_visibility(false);

        let names: Vec<_> = engine.visible_workflows().iter().map(|id| id.name()).collect();
        assert_eq!(names, ["a.visible", "b.visible"]);
        assert!(engine.invoke(&WorkflowIdentifier::new("hidden"), Vec::new()).is_ok());
    }

    #[test]
    fn test_context_exposes_configuration() {
        let mut engine = engine();
        let id = WorkflowIdentifier::new("cache");
        engine
            .register(id.clone(), ConfigurationOptions::empty(), |ctx, _| {
                let cache = ctx.configuration().cache_path();
                Ok(vec![WorkflowData::json(json!({
                    "workflow": ctx.workflow_id().name(),
                    "cache_path": cache.display().to_string(),
                }))])
            })
            .unwrap();

        let output = engine.invoke(&id, Vec::new()).unwrap();
        assert_eq!(output[0].payload["workflow"], "cache");
        assert_eq!(
            output[0].payload["cache_path"],
            engine.configuration().cache_path().display().to_string()
        );
    }
}
