use chrono::{Duration, NaiveDate};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::progress::{parse_count, ProgressState, Snapshot};
use crate::store::StateStore;

/// Handle returned by [`ProgressModel::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut()>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeadlineParseError {
    #[error("expected YYYY-MM-DD, +DAYS or \"clear\", got {0:?}")]
    Unrecognized(String),
    #[error("deadline offset {0} is out of range")]
    OutOfRange(i64),
}

/// What a line of deadline text asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineInput {
    Date(NaiveDate),
    Clear,
}

/// Accepts `2025-12-31`, `+10` (days from `today`), or empty / `none` / `clear`
pub fn parse_deadline(text: &str, today: NaiveDate) -> Result<DeadlineInput, DeadlineParseError> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("none") || text.eq_ignore_ascii_case("clear") {
        return Ok(DeadlineInput::Clear);
    }

    if let Some(offset) = text.strip_prefix('+') {
        let days = offset
            .parse::<i64>()
            .map_err(|_| DeadlineParseError::Unrecognized(text.to_string()))?;
        return Duration::try_days(days)
            .and_then(|d| today.checked_add_signed(d))
            .map(DeadlineInput::Date)
            .ok_or(DeadlineParseError::OutOfRange(days));
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(DeadlineInput::Date)
        .map_err(|_| DeadlineParseError::Unrecognized(text.to_string()))
}

/// Single source of truth for the tracker.
///
/// Every setter runs the same sequence: compare with the current value, and
/// only if it differs write it, persist it, then notify subscribers. By the
/// time a subscriber runs, [`ProgressModel::snapshot`] reflects the saved
/// state. Save failures are logged and kept in [`ProgressModel::last_save_error`]
/// but never surface as setter errors.
pub struct ProgressModel<S: StateStore, C: Clock> {
    state: ProgressState,
    store: S,
    clock: C,
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_subscription: u64,
    last_save_error: Option<String>,
}

impl<S: StateStore, C: Clock> ProgressModel<S, C> {
    /// Load whatever the store has (default state on any failure)
    pub fn load(store: S, clock: C) -> Self {
        let state = store.load();
        info!(
            word_count = state.word_count,
            word_goal = state.word_goal,
            deadline = ?state.deadline_date,
            "progress model ready"
        );
        Self {
            state,
            store,
            clock,
            subscribers: Vec::new(),
            next_subscription: 0,
            last_save_error: None,
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(self.clock.today())
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut() + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn set_word_count(&mut self, n: u64) -> bool {
        self.update(|s| s.word_count = n)
    }

    pub fn set_word_goal(&mut self, n: u64) -> bool {
        self.update(|s| s.word_goal = n)
    }

    pub fn set_word_count_text(&mut self, text: &str) -> bool {
        self.set_word_count(parse_count(text))
    }

    pub fn set_word_goal_text(&mut self, text: &str) -> bool {
        self.set_word_goal(parse_count(text))
    }

    pub fn add_words(&mut self, n: u64) -> bool {
        let total = self.state.word_count.saturating_add(n);
        self.set_word_count(total)
    }

    /// Past dates are fine; they just make `days_left` negative
    pub fn set_deadline(&mut self, date: NaiveDate) -> bool {
        self.update(|s| s.deadline_date = Some(date))
    }

    pub fn clear_deadline(&mut self) -> bool {
        self.update(|s| s.deadline_date = None)
    }

    /// Moves the deadline by `days`, starting from today when none is set
    pub fn shift_deadline(&mut self, days: i64) -> bool {
        let base = self.state.deadline_date.unwrap_or_else(|| self.clock.today());
        match Duration::try_days(days).and_then(|d| base.checked_add_signed(d)) {
            Some(date) => self.set_deadline(date),
            None => false,
        }
    }

    /// Unlike counts, unparseable dates are rejected and the state is left as is
    pub fn set_deadline_text(&mut self, text: &str) -> Result<bool, DeadlineParseError> {
        match parse_deadline(text, self.clock.today())? {
            DeadlineInput::Date(date) => Ok(self.set_deadline(date)),
            DeadlineInput::Clear => Ok(self.clear_deadline()),
        }
    }

    fn update(&mut self, mutate: impl FnOnce(&mut ProgressState)) -> bool {
        let old = self.state;
        let mut new = old;
        mutate(&mut new);
        if new == old {
            return false;
        }

        self.state = new;
        debug!(?old, ?new, "progress state changed");
        self.persist();
        self.notify();
        true
    }

    fn persist(&mut self) {
        match self.store.save(&self.state) {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                error!(error = %e, "failed to save progress");
                self.last_save_error = Some(e.to_string());
            }
        }
    }

    fn notify(&mut self) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback();
        }
    }
}
