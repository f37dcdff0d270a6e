//! A headless driver that repeatedly steps a machine.
//!
//! The engine itself has no run loop; this is the caller side of the contract.
//! It stops as soon as a step reports a terminal status, or when its step budget
//! runs out.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::machine::TuringMachine;
use crate::types::{Configuration, Outcome, Status, MAX_EXECUTION_STEPS};

/// Settings for a [`Driver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Maximum number of `step` calls before giving up.
    pub max_steps: usize,
    /// Record a configuration after every step.
    pub record_trace: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_steps: MAX_EXECUTION_STEPS,
            record_trace: false,
        }
    }
}

/// The result of driving a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Status returned by the last `step` call.
    pub status: Status,
    /// The machine's outcome, or `Undetermined` if the budget ran out first.
    pub outcome: Outcome,
    /// Number of `step` calls made by the driver.
    pub steps: usize,
    /// The final configuration.
    pub last: Configuration,
    /// The initial configuration followed by one entry per step, when recorded.
    pub trace: Vec<Configuration>,
}

#[derive(Debug, Clone, Default)]
pub struct Driver {
    config: DriverConfig,
}

impl Driver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// Steps `machine` from its current configuration until it halts or the
    /// budget is exhausted.
    pub fn run(&self, machine: &mut TuringMachine) -> RunReport {
        self.run_with(machine, |_, _| {})
    }

    /// Like [`run`](Self::run), calling `observer` with the status and the machine
    /// after every step.
    pub fn run_with<F>(&self, machine: &mut TuringMachine, mut observer: F) -> RunReport
    where
        F: FnMut(Status, &TuringMachine),
    {
        let mut trace = Vec::new();
        if self.config.record_trace {
            trace.push(machine.snapshot());
        }

        let mut status = if machine.is_halted() {
            Status::Halt
        } else {
            Status::Running
        };
        let mut steps = 0;

        while !status.is_terminal() && steps < self.config.max_steps {
            status = machine.step();
            steps += 1;

            if self.config.record_trace {
                trace.push(machine.snapshot());
            }
            observer(status, machine);
        }

        let outcome = match machine.outcome() {
            Some(outcome) => {
                info!(
                    machine = %machine.program().name,
                    steps,
                    %outcome,
                    "run finished"
                );
                outcome
            }
            None => {
                warn!(
                    machine = %machine.program().name,
                    max_steps = self.config.max_steps,
                    "step budget exhausted before the machine halted"
                );
                Outcome::Undetermined
            }
        };

        RunReport {
            status,
            outcome,
            steps,
            last: machine.snapshot(),
            trace,
        }
    }
}
