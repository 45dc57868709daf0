//! Session flow: menu, instructions, the three blocks, credits
//!
//! The flow talks to the screen and keyboard only through [`Presenter`], so
//! the same sequence runs against the terminal or a scripted stand-in.

use chrono::Local;
use rand::Rng;
use std::time::{Duration, Instant};

use super::accuracy::AccuracyTracker;
use super::block::{BlockPlan, Stage};
use super::errors::{ExperimentError, Result};
use super::pools::ItemPools;
use super::protocol::ProtocolConfig;
use super::results::{Response, ResultLog, TrialRecord};

/// Screen background
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backdrop {
    /// Near-black, used for the menu and instructions
    Dark,
    /// Used while targets and trials are on screen
    Grey,
}

/// Keys the session reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Space,
    Left,
    Right,
}

/// Screen and keyboard as seen by the session
pub trait Presenter {
    /// Replace whatever is on screen with `text`
    fn show(&mut self, backdrop: Backdrop, text: &str) -> Result<()>;

    /// Keep the current screen up for `duration`
    fn pause(&mut self, duration: Duration) -> Result<()>;

    /// Block until one of `accepted` is pressed. Keys pressed before the call
    /// are discarded. Returns [`ExperimentError::Aborted`] on escape.
    fn wait_for_key(&mut self, accepted: &[Key]) -> Result<Key>;
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn show(&mut self, backdrop: Backdrop, text: &str) -> Result<()> {
        (**self).show(backdrop, text)
    }

    fn pause(&mut self, duration: Duration) -> Result<()> {
        (**self).pause(duration)
    }

    fn wait_for_key(&mut self, accepted: &[Key]) -> Result<Key> {
        (**self).wait_for_key(accepted)
    }
}

/// One run of the recognition task
pub struct Session<P, R> {
    config: ProtocolConfig,
    pools: ItemPools,
    log: ResultLog,
    presenter: P,
    rng: R,
    tracker: AccuracyTracker,
}

impl<P: Presenter, R: Rng> Session<P, R> {
    /// Fails early if any pool cannot fill a block
    pub fn new(
        config: ProtocolConfig,
        pools: ItemPools,
        log: ResultLog,
        presenter: P,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;
        for stage in Stage::ALL {
            let available = pools.for_stage(stage).len();
            if available < config.trial_count {
                return Err(ExperimentError::PoolTooSmall {
                    stage,
                    needed: config.trial_count,
                    available,
                });
            }
        }

        Ok(Session {
            config,
            pools,
            log,
            presenter,
            rng,
            tracker: AccuracyTracker::new(),
        })
    }

    /// Run the whole sequence and hand back the outcome tallies
    pub fn run(mut self) -> Result<AccuracyTracker> {
        tracing::info!(
            protocol = self.config.protocol.label(),
            results = %self.log.path().display(),
            "session started"
        );

        self.menu_page()?;
        self.instructions_page()?;
        self.run_blocks()?;
        self.show_credits()?;

        tracing::info!(
            trials = self.tracker.overall().trials(),
            accuracy = self.tracker.overall().accuracy(),
            "session finished"
        );
        Ok(self.tracker)
    }

    fn menu_page(&mut self) -> Result<()> {
        self.presenter.show(Backdrop::Dark, &self.config.title)?;
        self.presenter.pause(self.config.menu_time())
    }

    fn instructions_page(&mut self) -> Result<()> {
        self.presenter.show(Backdrop::Dark, &self.config.instructions)?;
        self.presenter.wait_for_key(&[Key::Space])?;
        self.presenter.show(Backdrop::Dark, "")
    }

    fn run_blocks(&mut self) -> Result<()> {
        for stage in Stage::ALL {
            self.presenter.show(Backdrop::Grey, &self.config.get_ready_text)?;
            self.presenter.pause(self.config.get_ready_time())?;
            self.block(stage)?;
        }
        Ok(())
    }

    fn block(&mut self, stage: Stage) -> Result<()> {
        let plan = BlockPlan::sample(
            stage,
            self.pools.for_stage(stage),
            self.config.target_count,
            self.config.trial_count,
            &mut self.rng,
        )?;
        tracing::info!(block = %stage, targets = ?plan.targets, "block started");

        self.present_targets(&plan)?;

        for (index, item) in plan.trials.iter().enumerate() {
            self.present_trial(&plan, index + 1, item)?;
        }
        Ok(())
    }

    fn present_targets(&mut self, plan: &BlockPlan) -> Result<()> {
        self.presenter.show(Backdrop::Grey, &plan.targets.join("\n\n"))?;
        self.presenter.pause(self.config.presentation_time(plan.stage))
    }

    fn present_trial(&mut self, plan: &BlockPlan, trial: usize, item: &str) -> Result<()> {
        self.presenter.show(Backdrop::Grey, item)?;
        let shown_at = Instant::now();
        let key = self.presenter.wait_for_key(&[Key::Left, Key::Right])?;
        let response_time = shown_at.elapsed().as_secs_f64();

        let record = TrialRecord {
            timestamp: Local::now(),
            block: plan.stage,
            trial,
            response_time,
            target_response: Response::from_membership(plan.is_target(item)),
            response: Response::from_membership(key == Key::Right),
        };
        tracing::debug!(
            block = %plan.stage,
            trial,
            item,
            response_time,
            correct = record.is_correct(),
            "trial recorded"
        );

        self.log.append(&record)?;
        self.tracker.record(&record);
        Ok(())
    }

    fn show_credits(&mut self) -> Result<()> {
        self.presenter.show(Backdrop::Grey, &self.config.credits_text)?;
        self.presenter.pause(self.config.credits_time())
    }
}
