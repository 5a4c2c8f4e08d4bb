/// Events emitted while a generation workflow runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    PhaseStart {
        name: &'static str,
    },
    PhaseFinish,

    /// A fixpoint pass begins; `reactors` passes are announced by `ReactorProcessed`.
    PassStart {
        iteration: usize,
        reactors: u64,
    },
    ReactorProcessed,
    PassFinish {
        iteration: usize,
        new_reactions: usize,
        new_species: usize,
    },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `work` between a `PhaseStart` and a `PhaseFinish` event.
    ///
    /// The finish event is emitted whether or not `work` succeeds, so a renderer
    /// never stays stuck on a failed phase.
    pub fn phase<T>(&self, name: &'static str, work: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart { name });
        let result = work();
        self.report(Progress::PhaseFinish);
        result
    }
}
