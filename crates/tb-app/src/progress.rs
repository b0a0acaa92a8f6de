use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStage {
    Reading,
    Reducing,
    Appending,
    Skipped,
    Completed,
}

impl BatchStage {
    pub fn label(&self) -> &'static str {
        match self {
            BatchStage::Reading => "reading",
            BatchStage::Reducing => "reducing",
            BatchStage::Appending => "appending",
            BatchStage::Skipped => "skipped",
            BatchStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchProgressEvent {
    pub stage: BatchStage,
    /// Input being processed; `None` for batch-wide events
    pub input: Option<PathBuf>,
    pub finished: usize,
    pub total: usize,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl BatchProgressEvent {
    pub fn fraction_complete(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.finished as f64 / self.total as f64
        }
    }
}
