//! Voting rule resolution.
//!
//! The voting subsystem itself is external; the engine only sees [`VotingRuleResolver`].
//! Two adapters sit in front of it:
//! - [`MemoizingResolver`] pins each rule's outcome for the duration of one judgement.
//! - [`TimeoutResolver`] bounds a blocking query and degrades to `Pending` on expiry.

use darc_types::{VoteOutcome, VotingRuleId};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;
use tracing::{trace, warn};

pub trait VotingRuleResolver {
    /// Current outcome of `rule`. Unknown rules are `Pending`.
    fn resolve(&self, rule: VotingRuleId) -> VoteOutcome;
}

impl<R: VotingRuleResolver + ?Sized> VotingRuleResolver for &R {
    fn resolve(&self, rule: VotingRuleId) -> VoteOutcome {
        (**self).resolve(rule)
    }
}

impl<R: VotingRuleResolver + ?Sized> VotingRuleResolver for Arc<R> {
    fn resolve(&self, rule: VotingRuleId) -> VoteOutcome {
        (**self).resolve(rule)
    }
}

impl<R: VotingRuleResolver + ?Sized> VotingRuleResolver for Box<R> {
    fn resolve(&self, rule: VotingRuleId) -> VoteOutcome {
        (**self).resolve(rule)
    }
}

/// A fixed view of vote outcomes, e.g. loaded from a file or captured from the voting subsystem.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteSnapshot {
    outcomes: BTreeMap<VotingRuleId, VoteOutcome>,
}

impl VoteSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: VotingRuleId, outcome: VoteOutcome) -> Self {
        self.outcomes.insert(rule, outcome);
        self
    }

    pub fn set(&mut self, rule: VotingRuleId, outcome: VoteOutcome) {
        self.outcomes.insert(rule, outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl From<BTreeMap<VotingRuleId, VoteOutcome>> for VoteSnapshot {
    fn from(outcomes: BTreeMap<VotingRuleId, VoteOutcome>) -> Self {
        Self { outcomes }
    }
}

impl VotingRuleResolver for VoteSnapshot {
    fn resolve(&self, rule: VotingRuleId) -> VoteOutcome {
        self.outcomes
            .get(&rule)
            .copied()
            .unwrap_or(VoteOutcome::Pending)
    }
}

/// Per-judgement cache: the first answer for a rule is the only answer for that judgement.
///
/// Not `Sync`; every judgement builds its own.
pub struct MemoizingResolver<'a, R: ?Sized> {
    inner: &'a R,
    seen: RefCell<BTreeMap<VotingRuleId, VoteOutcome>>,
}

impl<'a, R: VotingRuleResolver + ?Sized> MemoizingResolver<'a, R> {
    pub fn new(inner: &'a R) -> Self {
        Self {
            inner,
            seen: RefCell::new(BTreeMap::new()),
        }
    }

    /// Outcomes resolved so far.
    pub fn into_results(self) -> BTreeMap<VotingRuleId, VoteOutcome> {
        self.seen.into_inner()
    }
}

impl<R: VotingRuleResolver + ?Sized> VotingRuleResolver for MemoizingResolver<'_, R> {
    fn resolve(&self, rule: VotingRuleId) -> VoteOutcome {
        if let Some(outcome) = self.seen.borrow().get(&rule) {
            return *outcome;
        }
        let outcome = self.inner.resolve(rule);
        trace!(%rule, %outcome, "voting rule resolved");
        self.seen.borrow_mut().insert(rule, outcome);
        outcome
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("{rule} did not resolve within {after:?}")]
    Timeout { rule: VotingRuleId, after: Duration },

    #[error("{rule} resolver worker failed: {reason}")]
    Worker { rule: VotingRuleId, reason: String },
}

type Query = (VotingRuleId, mpsc::Sender<VoteOutcome>);

/// Forwards queries to one dedicated worker thread and waits at most `timeout` for each answer.
///
/// A query that overruns reads as `Pending` and the worker finishes it in the background.
/// Queries are served one at a time: while the backend is stuck, later queries queue behind it
/// and time out as well, but the resolver never holds more than one thread. The worker exits
/// once the resolver is dropped and its current query returns.
pub struct TimeoutResolver {
    queries: mpsc::Sender<Query>,
    timeout: Duration,
}

impl TimeoutResolver {
    pub fn new<R>(inner: Arc<R>, timeout: Duration) -> io::Result<Self>
    where
        R: VotingRuleResolver + Send + Sync + ?Sized + 'static,
    {
        let (queries, incoming) = mpsc::channel::<Query>();
        thread::Builder::new()
            .name("darc-vote-resolver".to_string())
            .spawn(move || {
                for (rule, reply) in incoming {
                    // The caller is gone if it already timed out; nothing to report then.
                    let _ = reply.send(inner.resolve(rule));
                }
            })?;
        Ok(Self { queries, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn try_resolve(&self, rule: VotingRuleId) -> Result<VoteOutcome, ResolveError> {
        let (reply, answer) = mpsc::channel();
        self.queries
            .send((rule, reply))
            .map_err(|_| ResolveError::Worker {
                rule,
                reason: "worker thread has exited".to_string(),
            })?;

        answer.recv_timeout(self.timeout).map_err(|e| match e {
            mpsc::RecvTimeoutError::Timeout => ResolveError::Timeout {
                rule,
                after: self.timeout,
            },
            mpsc::RecvTimeoutError::Disconnected => ResolveError::Worker {
                rule,
                reason: "worker exited without an answer".to_string(),
            },
        })
    }
}

impl VotingRuleResolver for TimeoutResolver {
    fn resolve(&self, rule: VotingRuleId) -> VoteOutcome {
        match self.try_resolve(rule) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%rule, error = %err, "voting rule treated as pending");
                VoteOutcome::Pending
            }
        }
    }
}
