//! Recognition accuracy per block
//!
//! Tallies each trial into one of the four signal-detection outcomes:
//! - hit: target, answered congruent
//! - miss: target, answered incongruent
//! - false alarm: distractor, answered congruent
//! - correct rejection: distractor, answered incongruent

use super::block::Stage;
use super::results::{Response, TrialRecord};

/// Outcome counts and response times for one block (or the whole session)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutcomeCounts {
    pub hits: u32,
    pub misses: u32,
    pub false_alarms: u32,
    pub correct_rejections: u32,
    total_response_time: f64,
}

impl OutcomeCounts {
    pub fn record(&mut self, record: &TrialRecord) {
        match (record.target_response, record.response) {
            (Response::Congruent, Response::Congruent) => self.hits += 1,
            (Response::Congruent, Response::Incongruent) => self.misses += 1,
            (Response::Incongruent, Response::Congruent) => self.false_alarms += 1,
            (Response::Incongruent, Response::Incongruent) => self.correct_rejections += 1,
        }
        self.total_response_time += record.response_time;
    }

    pub fn trials(&self) -> u32 {
        self.hits + self.misses + self.false_alarms + self.correct_rejections
    }

    /// Fraction of correct answers (1.0 when nothing was recorded)
    pub fn accuracy(&self) -> f32 {
        let trials = self.trials();
        if trials == 0 {
            1.0
        } else {
            (self.hits + self.correct_rejections) as f32 / trials as f32
        }
    }

    /// Fraction of targets recognized
    pub fn hit_rate(&self) -> f32 {
        ratio(self.hits, self.hits + self.misses)
    }

    /// Fraction of distractors wrongly recognized
    pub fn false_alarm_rate(&self) -> f32 {
        ratio(self.false_alarms, self.false_alarms + self.correct_rejections)
    }

    pub fn mean_response_time(&self) -> f64 {
        let trials = self.trials();
        if trials == 0 {
            0.0
        } else {
            self.total_response_time / trials as f64
        }
    }

    fn merge(&mut self, other: &OutcomeCounts) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.false_alarms += other.false_alarms;
        self.correct_rejections += other.correct_rejections;
        self.total_response_time += other.total_response_time;
    }
}

fn ratio(part: u32, whole: u32) -> f32 {
    if whole == 0 {
        0.0
    } else {
        part as f32 / whole as f32
    }
}

/// Tracks outcomes for every block of a session, in run order
#[derive(Clone, Debug, Default)]
pub struct AccuracyTracker {
    blocks: Vec<(Stage, OutcomeCounts)>,
}

impl AccuracyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: &TrialRecord) {
        match self.blocks.iter_mut().find(|(stage, _)| *stage == record.block) {
            Some((_, counts)) => counts.record(record),
            None => {
                let mut counts = OutcomeCounts::default();
                counts.record(record);
                self.blocks.push((record.block, counts));
            }
        }
    }

    #[cfg(test)]
    pub fn block(&self, stage: Stage) -> Option<&OutcomeCounts> {
        self.blocks
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, counts)| counts)
    }

    pub fn blocks(&self) -> &[(Stage, OutcomeCounts)] {
        &self.blocks
    }

    /// All blocks combined
    pub fn overall(&self) -> OutcomeCounts {
        let mut total = OutcomeCounts::default();
        for (_, counts) in &self.blocks {
            total.merge(counts);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn trial(block: Stage, target: Response, response: Response, rt: f64) -> TrialRecord {
        TrialRecord {
            timestamp: Local::now(),
            block,
            trial: 1,
            response_time: rt,
            target_response: target,
            response,
        }
    }

    #[test]
    fn test_outcome_classification() {
        use Response::*;
        let mut counts = OutcomeCounts::default();
        counts.record(&trial(Stage::Word, Congruent, Congruent, 1.0));
        counts.record(&trial(Stage::Word, Congruent, Incongruent, 2.0));
        counts.record(&trial(Stage::Word, Incongruent, Congruent, 3.0));
        counts.record(&trial(Stage::Word, Incongruent, Incongruent, 2.0));
        counts.record(&trial(Stage::Word, Incongruent, Incongruent, 2.0));

        assert_eq!(counts.hits, 1);
        assert_eq!(counts.misses, 1);
        assert_eq!(counts.false_alarms, 1);
        assert_eq!(counts.correct_rejections, 2);
        assert_eq!(counts.trials(), 5);
        assert!((counts.accuracy() - 0.6).abs() < 1e-6);
        assert!((counts.hit_rate() - 0.5).abs() < 1e-6);
        assert!((counts.false_alarm_rate() - 1.0 / 3.0).abs() < 1e-6);
        assert!((counts.mean_response_time() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_counts() {
        let counts = OutcomeCounts::default();
        assert_eq!(counts.accuracy(), 1.0);
        assert_eq!(counts.hit_rate(), 0.0);
        assert_eq!(counts.false_alarm_rate(), 0.0);
        assert_eq!(counts.mean_response_time(), 0.0);
    }

    #[test]
    fn test_tracker_keeps_block_order_and_totals() {
        use Response::*;
        let mut tracker = AccuracyTracker::new();
        tracker.record(&trial(Stage::Word, Congruent, Congruent, 1.0));
        tracker.record(&trial(Stage::Number, Incongruent, Congruent, 1.0));
        tracker.record(&trial(Stage::Word, Incongruent, Incongruent, 1.0));

        let order: Vec<Stage> = tracker.blocks().iter().map(|(s, _)| *s).collect();
        assert_eq!(order, vec![Stage::Word, Stage::Number]);
        assert_eq!(tracker.block(Stage::Word).map(|c| c.trials()), Some(2));
        assert!(tracker.block(Stage::Pair).is_none());

        let overall = tracker.overall();
        assert_eq!(overall.trials(), 3);
        assert_eq!(overall.false_alarms, 1);
    }
}
