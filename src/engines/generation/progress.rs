use super::evolution_engine::ProgressCallback;
use super::history::GenerationRecord;

/// Reports progress through the `log` facade
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::info!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, record: &GenerationRecord) {
        let analysis = &record.population_analysis;
        log::info!(
            "Generation {} complete. Best fitness: {:.4}, average: {:.4}, diversity: {:.3}",
            record.index + 1,
            analysis.max_fitness,
            analysis.average_fitness,
            analysis.diversity_score
        );
    }

    fn on_candidate_evaluated(&mut self, current: usize, total: usize) {
        if current % 10 == 0 || current == total {
            log::debug!("  Evaluated {}/{} patterns", current, total);
        }
    }
}

/// Ignores every event
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _record: &GenerationRecord) {}
    fn on_candidate_evaluated(&mut self, _current: usize, _total: usize) {}
}

// For front ends listening on another thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete { generation: usize, best_fitness: f64, average_fitness: f64 },
    CandidateEvaluated { current: usize, total: usize },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, record: &GenerationRecord) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation: record.index,
            best_fitness: record.population_analysis.max_fitness,
            average_fitness: record.population_analysis.average_fitness,
        });
    }

    fn on_candidate_evaluated(&mut self, current: usize, total: usize) {
        let _ = self.sender.send(ProgressMessage::CandidateEvaluated { current, total });
    }
}
