use std::sync::mpsc::Sender;
use std::time::Duration;

/// Snapshot pushed to the progress sink after every generation.
#[derive(Debug, Clone)]
pub struct GenerationUpdate {
    /// Index of the population run this update belongs to.
    pub run: usize,
    pub generation: usize,
    /// Best fitness observed so far in this run.
    pub best_fitness: f64,
    pub gens_since_improvement: usize,
    pub elapsed: Duration,
}

/// Observer for optimization progress. Purely observational: the loop
/// behaves identically whether or not anyone is listening.
pub trait ProgressCallback: Send {
    fn on_run_start(&mut self, _run: usize, _total_runs: usize) {}

    fn on_generation_complete(&mut self, update: &GenerationUpdate);
}

/// Sink for callers that don't care about progress.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn on_generation_complete(&mut self, _update: &GenerationUpdate) {}
}

/// Logs progress every `log_every` generations.
pub struct ConsoleProgress {
    pub log_every: usize,
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self { log_every: 10 }
    }
}

impl ProgressCallback for ConsoleProgress {
    fn on_run_start(&mut self, run: usize, total_runs: usize) {
        if total_runs > 1 {
            log::info!("Starting population {}/{}", run + 1, total_runs);
        }
    }

    fn on_generation_complete(&mut self, update: &GenerationUpdate) {
        if update.generation % self.log_every == 0 {
            log::info!(
                "Gen {}: best fitness {:.6}, {} generation(s) since improvement",
                update.generation,
                update.best_fitness,
                update.gens_since_improvement
            );
        }
    }
}

/// Forwards every update over a channel, e.g. to a UI thread. Send errors
/// are ignored: a dropped receiver must not abort the optimization.
pub struct ChannelProgress {
    sender: Sender<GenerationUpdate>,
}

impl ChannelProgress {
    pub fn new(sender: Sender<GenerationUpdate>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgress {
    fn on_generation_complete(&mut self, update: &GenerationUpdate) {
        let _ = self.sender.send(update.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn channel_progress_forwards_updates() {
        let (tx, rx) = channel();
        let mut progress = ChannelProgress::new(tx);
        progress.on_generation_complete(&GenerationUpdate {
            run: 0,
            generation: 3,
            best_fitness: 0.5,
            gens_since_improvement: 1,
            elapsed: Duration::from_millis(10),
        });

        let update = rx.recv().unwrap();
        assert_eq!(update.generation, 3);
        assert_eq!(update.gens_since_improvement, 1);
    }

    #[test]
    fn channel_progress_survives_a_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);
        let mut progress = ChannelProgress::new(tx);
        progress.on_generation_complete(&GenerationUpdate {
            run: 0,
            generation: 0,
            best_fitness: 0.0,
            gens_since_improvement: 0,
            elapsed: Duration::ZERO,
        });
    }
}
