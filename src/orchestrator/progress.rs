use crate::orchestrator::LoadingKind;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadingStage {
    Analyzing,
    Generating,
    Finalizing,
}

impl LoadingStage {
    pub fn message(&self) -> &'static str {
        match self {
            LoadingStage::Analyzing => "Analyzing your request...",
            LoadingStage::Generating => "Generating your logo...",
            LoadingStage::Finalizing => "Almost done! Finalizing...",
        }
    }

    pub fn percent(&self) -> u8 {
        match self {
            LoadingStage::Analyzing => 33,
            LoadingStage::Generating => 66,
            LoadingStage::Finalizing => 90,
        }
    }
}

/// How long each stage is shown before moving on. The last stage holds
/// until the call completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingSchedule {
    pub analyzing: Duration,
    pub generating: Duration,
}

impl LoadingSchedule {
    pub fn for_kind(kind: LoadingKind) -> Self {
        match kind {
            LoadingKind::Generate => Self {
                analyzing: Duration::from_secs(2),
                generating: Duration::from_secs(8),
            },
            LoadingKind::Preview | LoadingKind::Improve => Self {
                analyzing: Duration::from_secs(1),
                generating: Duration::from_secs(3),
            },
        }
    }

    pub fn stage_at(&self, elapsed: Duration) -> LoadingStage {
        if elapsed < self.analyzing {
            LoadingStage::Analyzing
        } else if elapsed < self.analyzing + self.generating {
            LoadingStage::Generating
        } else {
            LoadingStage::Finalizing
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoadingProgress {
    started: Instant,
    schedule: LoadingSchedule,
}

impl LoadingProgress {
    pub fn start(kind: LoadingKind) -> Self {
        Self {
            started: Instant::now(),
            schedule: LoadingSchedule::for_kind(kind),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn stage(&self) -> LoadingStage {
        self.schedule.stage_at(self.elapsed())
    }
}
