// file: src/utils/telemetry.rs
// description: wall-clock timing for external tool invocations
// reference: Production observability best practices

use crate::pipeline::Stage;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Times one stage and emits start/finish events.
pub struct StageTimer {
    stage: Stage,
    start: Instant,
}

impl StageTimer {
    pub fn start(stage: Stage) -> Self {
        info!("{}. {}", stage.index(), stage.title());
        Self {
            stage,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self, succeeded: bool) -> Duration {
        let elapsed = self.elapsed();
        if succeeded {
            info!(
                "Completed stage {} in {:.2}s",
                self.stage,
                elapsed.as_secs_f64()
            );
        } else {
            warn!(
                "Stage {} ended unsuccessfully after {:.2}s",
                self.stage,
                elapsed.as_secs_f64()
            );
        }
        elapsed
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {:02}m {:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}
