//! Explicit scenario runner for server-level orchestration.
//!
//! Steps are registered as plain data - a name, a `should_run` predicate,
//! and a body - grouped into setup, test, and teardown phases. The runner
//! walks the lists in order over caller-owned state; no markers, no
//! introspection. Step failures are recorded per step and never stop the
//! walk, so teardown always gets its turn.

use anyhow::Result;
use tracing::{debug, error};

/// Which phase a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Test,
    Teardown,
}

/// What happened to one step.
#[derive(Debug)]
pub enum StepStatus {
    Passed,
    Skipped,
    Failed(anyhow::Error),
}

type StepFn<S> = Box<dyn FnMut(&mut S) -> Result<()>>;
type Predicate<S> = Box<dyn Fn(&S) -> bool>;

/// A named unit of work over scenario state `S`.
pub struct Step<S> {
    name: String,
    should_run: Predicate<S>,
    run: StepFn<S>,
}

impl<S> Step<S> {
    pub fn new(name: impl Into<String>, run: impl FnMut(&mut S) -> Result<()> + 'static) -> Self {
        Self {
            name: name.into(),
            should_run: Box::new(|_| true),
            run: Box::new(run),
        }
    }

    /// Gate the step on a plain predicate over the scenario state.
    pub fn when(mut self, predicate: impl Fn(&S) -> bool + 'static) -> Self {
        self.should_run = Box::new(predicate);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Result of one executed (or skipped) step.
#[derive(Debug)]
pub struct StepOutcome {
    pub phase: Phase,
    pub name: String,
    pub status: StepStatus,
}

/// Everything the runner observed, phase by phase, in execution order.
#[derive(Debug, Default)]
pub struct ScenarioReport {
    pub outcomes: Vec<StepOutcome>,
}

impl ScenarioReport {
    pub fn passed(&self) -> usize {
        self.count(|s| matches!(s, StepStatus::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, StepStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, StepStatus::Skipped))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&StepStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Ordered step lists for the three phases.
#[derive(Default)]
pub struct Scenario<S> {
    setup: Vec<Step<S>>,
    tests: Vec<Step<S>>,
    teardown: Vec<Step<S>>,
}

impl<S> Scenario<S> {
    pub fn new() -> Self {
        Self {
            setup: Vec::new(),
            tests: Vec::new(),
            teardown: Vec::new(),
        }
    }

    pub fn setup(mut self, step: Step<S>) -> Self {
        self.setup.push(step);
        self
    }

    pub fn test(mut self, step: Step<S>) -> Self {
        self.tests.push(step);
        self
    }

    pub fn teardown(mut self, step: Step<S>) -> Self {
        self.teardown.push(step);
        self
    }

    /// Execute setup, then tests, then teardown, in registration order.
    /// Failures are isolated per step; every registered step is visited.
    pub fn run(&mut self, state: &mut S) -> ScenarioReport {
        let mut report = ScenarioReport::default();
        for (phase, steps) in [
            (Phase::Setup, &mut self.setup),
            (Phase::Test, &mut self.tests),
            (Phase::Teardown, &mut self.teardown),
        ] {
            for step in steps {
                let status = if (step.should_run)(state) {
                    match (step.run)(state) {
                        Ok(()) => {
                            debug!(step = %step.name, ?phase, "step passed");
                            StepStatus::Passed
                        }
                        Err(err) => {
                            error!(step = %step.name, ?phase, %err, "step failed");
                            StepStatus::Failed(err)
                        }
                    }
                } else {
                    StepStatus::Skipped
                };
                report.outcomes.push(StepOutcome {
                    phase,
                    name: step.name.clone(),
                    status,
                });
            }
        }
        report
    }
}
