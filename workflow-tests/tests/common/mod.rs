//! Common setup for workflow tests.

use workflow_tests::WorkflowTestContext;

/// Create a fresh workflow test context.
pub fn setup() -> WorkflowTestContext {
    WorkflowTestContext::new().expect("Failed to create workflow test context")
}
