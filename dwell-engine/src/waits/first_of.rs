// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Poll several predicates and run the callback paired with the first one that
//! returns `true`.
//!
//! Every poll samples the predicates in order and stops at the first `true`,
//! so when several are true at once the lowest index wins.
//!
//! If the very first poll finds a true predicate its callback runs
//! immediately. Otherwise a poll that finds one records the winner and the
//! callback runs when the task next resumes, one interval later.

use log::debug;

use crate::task::{Progress, Resume, StepContext, TaskState, WaitTask};
use crate::types::{Predicate, Then, WaitError, WaitResult};
use crate::wait_error;

pub struct WaitFirstOf {
    predicates: Vec<Predicate>,
    thens: Vec<Option<Then>>,
    interval_secs: f64,
    polled: bool,
    winner: Option<usize>,
    progress: Progress,
}

impl WaitFirstOf {
    #[must_use]
    pub fn new(interval_secs: f64) -> Self {
        Self {
            predicates: Vec::new(),
            thens: Vec::new(),
            interval_secs,
            polled: false,
            winner: None,
            progress: Progress::new(),
        }
    }

    /// Build from parallel lists of predicates and callbacks.
    ///
    /// `thens` may be omitted altogether; when given it must have one
    /// callback per predicate.
    pub fn from_lists(
        predicates: Vec<Predicate>,
        interval_secs: f64,
        thens: Option<Vec<Then>>,
    ) -> Result<Self, WaitError> {
        let thens = match thens {
            Some(thens) => {
                if thens.len() != predicates.len() {
                    return wait_error!(format!(
                        "wait_first_of: {} predicates but {} callbacks",
                        predicates.len(),
                        thens.len()
                    ));
                }
                thens.into_iter().map(Some).collect()
            }
            None => predicates.iter().map(|_| None).collect(),
        };
        Ok(Self {
            predicates,
            thens,
            ..Self::new(interval_secs)
        })
    }

    /// Add a predicate and the callback to run if it is the first to be true.
    #[must_use]
    pub fn branch(
        mut self,
        predicate: impl FnMut() -> bool + 'static,
        then: impl FnOnce() -> WaitResult + 'static,
    ) -> Self {
        self.predicates.push(Box::new(predicate));
        self.thens.push(Some(Box::new(then)));
        self
    }

    /// Add a predicate with no callback.
    #[must_use]
    pub fn branch_silent(mut self, predicate: impl FnMut() -> bool + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self.thens.push(None);
        self
    }

    /// Index of the winning predicate, once one has been found.
    #[must_use]
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    fn first_true(&mut self) -> Option<usize> {
        self.predicates.iter_mut().position(|predicate| predicate())
    }

    fn finish(&mut self, index: usize) -> Result<Resume, WaitError> {
        debug!("wait_first_of: predicate {index} won");
        let then = self.thens.get_mut(index).and_then(Option::take);
        self.progress.complete(then)
    }
}

impl WaitTask for WaitFirstOf {
    fn name(&self) -> &str {
        "wait_first_of"
    }

    fn state(&self) -> TaskState {
        self.progress.state()
    }

    fn step(&mut self, _cx: &StepContext) -> Result<Resume, WaitError> {
        self.progress.ensure_running(self.name())?;
        if let Some(index) = self.winner {
            return self.finish(index);
        }

        self.winner = self.first_true();
        let first_poll = !self.polled;
        self.polled = true;
        match self.winner {
            Some(index) if first_poll => self.finish(index),
            _ => Ok(Resume::Sleep(self.interval_secs)),
        }
    }
}
