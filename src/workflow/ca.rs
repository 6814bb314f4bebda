//! User-facing workflow that materializes the interception CA.

use std::sync::Arc;

use serde_json::json;

use crate::resources::GlobalResources;
use crate::workflow::{ConfigurationOptions, Engine, WorkflowData, WorkflowIdentifier};
use crate::Result;

pub const WORKFLOW_ID_CA: &str = "ca";

pub fn ca_id() -> WorkflowIdentifier {
    WorkflowIdentifier::new(WORKFLOW_ID_CA)
}

/// Register the visible `ca` workflow. Its single output describes the CA:
/// `cert_file_path`, `cert_pem` and the `version` the CA was created for.
///
/// Everything in the output comes from the one record `get_or_create`
/// returned, so a concurrent cleanup cannot make it inconsistent.
pub fn init_ca_workflow(engine: &mut Engine, resources: Arc<GlobalResources>) -> Result<()> {
    engine.register(ca_id(), ConfigurationOptions::empty(), move |invocation, _input| {
        let record = resources.certificate_authority(invocation.configuration())?;
        let pem = record.cert_pem_str().unwrap_or_default();

        Ok(vec![WorkflowData::json(json!({
            "cert_file_path": record.cert_file_path().display().to_string(),
            "cert_pem": pem,
            "version": resources.ca().version(),
        }))])
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configuration, CACHE_PATH};
    use tempfile::TempDir;

    #[test]
    fn test_ca_workflow_output() {
        let temp_dir = TempDir::new().unwrap();
        let config =
            Configuration::from_overrides([(CACHE_PATH, temp_dir.path().display().to_string())])
                .unwrap();
        let resources = Arc::new(GlobalResources::with_rcgen("1.0.0"));
        let mut engine = Engine::new(config);
        init_ca_workflow(&mut engine, resources.clone()).unwrap();

        assert_eq!(engine.visible_workflows(), vec![&ca_id()]);

        let output = engine.invoke(&ca_id(), Vec::new()).unwrap();
        let payload = &output[0].payload;
        assert_eq!(payload["version"], "1.0.0");
        assert!(payload.get("state").is_none());
        assert!(payload["cert_pem"].as_str().unwrap().contains("BEGIN CERTIFICATE"));

        let path = payload["cert_file_path"].as_str().unwrap();
        assert!(std::path::Path::new(path).exists());

        resources.ca().cleanup();
    }

    #[test]
    fn test_ca_workflow_output_matches_returned_record_after_cleanup() {
        let temp_dir = TempDir::new().unwrap();
        let config =
            Configuration::from_overrides([(CACHE_PATH, temp_dir.path().display().to_string())])
                .unwrap();
        let resources = Arc::new(GlobalResources::with_rcgen("1.0.0"));
        let mut engine = Engine::new(config);
        init_ca_workflow(&mut engine, resources.clone()).unwrap();

        let output = engine.invoke(&ca_id(), Vec::new()).unwrap();
        resources.ca().cleanup();

        // The payload is a snapshot of the record, not of later manager state.
        let payload = &output[0].payload;
        assert!(payload["cert_pem"].as_str().unwrap().contains("BEGIN CERTIFICATE"));
        assert!(!payload["cert_file_path"].as_str().unwrap().is_empty());
        assert_eq!(payload.as_object().unwrap().len(), 3);
    }
}
