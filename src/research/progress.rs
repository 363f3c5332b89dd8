//! Progress notifications for a running workflow
//!
//! Purely observational: a sink never influences scheduling or outcomes.

/// Workflow stage boundaries reported to a [`ProgressSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    Dispatching,
    Aggregating,
    Synthesizing,
}

impl WorkflowStage {
    pub fn description(&self) -> &'static str {
        match self {
            WorkflowStage::Dispatching => "Dispatching market searches",
            WorkflowStage::Aggregating => "Aggregating results",
            WorkflowStage::Synthesizing => "Generating cross-market analysis",
        }
    }
}

/// Receives progress updates while a workflow runs
pub trait ProgressSink: Send + Sync {
    /// Called once per region as soon as its outcome is known
    fn region_completed(&self, region: &str, completed: usize, total: usize);

    /// Called when the workflow enters a new stage
    fn stage_changed(&self, _stage: WorkflowStage) {}
}

impl<F> ProgressSink for F
where
    F: Fn(&str, usize, usize) + Send + Sync,
{
    fn region_completed(&self, region: &str, completed: usize, total: usize) {
        self(region, completed, total)
    }
}
