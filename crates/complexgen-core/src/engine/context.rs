use super::config::GenerationConfig;
use super::progress::ProgressReporter;

#[derive(Clone, Copy)]
pub struct GenerationContext<'a> {
    pub config: &'a GenerationConfig,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(config: &'a GenerationConfig, reporter: &'a ProgressReporter<'a>) -> Self {
        Self { config, reporter }
    }

    /// The pass budget of one fixpoint phase.
    pub fn iteration_budget(&self) -> Option<usize> {
        self.config.max_iterations
    }
}
