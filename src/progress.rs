use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The persisted part of the tracker: what the user typed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub word_count: u64,
    pub word_goal: u64,
    pub deadline_date: Option<NaiveDate>,
}

/// Stored fields plus everything derived from them for a given day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub word_count: u64,
    pub word_goal: u64,
    pub deadline_date: Option<NaiveDate>,
    pub words_remaining: u64,
    pub days_left: i64,
    pub percent_achieved: f64,
    pub words_per_day_needed: u64,
}

impl ProgressState {
    pub fn snapshot(&self, today: NaiveDate) -> Snapshot {
        let days_left = days_left(self.deadline_date, today);
        let words_remaining = words_remaining(self.word_count, self.word_goal);

        Snapshot {
            word_count: self.word_count,
            word_goal: self.word_goal,
            deadline_date: self.deadline_date,
            words_remaining,
            days_left,
            percent_achieved: percent_achieved(self.word_count, self.word_goal),
            words_per_day_needed: words_per_day_needed(words_remaining, days_left),
        }
    }
}

impl Snapshot {
    pub fn goal_met(&self) -> bool {
        self.word_goal > 0 && self.word_count >= self.word_goal
    }

    /// Fill level for gauges and the jar, clamped to 0..=1
    pub fn progress_ratio(&self) -> f64 {
        (self.percent_achieved / 100.0).clamp(0.0, 1.0)
    }
}

pub fn words_remaining(word_count: u64, word_goal: u64) -> u64 {
    word_goal.saturating_sub(word_count)
}

/// Signed whole days until the deadline, 0 when none is set
pub fn days_left(deadline: Option<NaiveDate>, today: NaiveDate) -> i64 {
    deadline
        .map(|date| date.signed_duration_since(today).num_days())
        .unwrap_or(0)
}

/// An empty goal counts as 0% rather than undefined
pub fn percent_achieved(word_count: u64, word_goal: u64) -> f64 {
    match word_goal {
        0 => 0.0,
        goal => word_count as f64 / goal as f64 * 100.0,
    }
}

/// Rounded up rather than to the nearest integer: 1000 words over 3 days is
/// 334 a day, because 333 a day falls one word short of the goal.
/// A deadline that is today or already gone means everything is due now.
pub fn words_per_day_needed(words_remaining: u64, days_left: i64) -> u64 {
    match days_left {
        days if days > 0 => words_remaining.div_ceil(days as u64),
        _ => words_remaining,
    }
}

/// Lenient count parsing for raw text input: anything that isn't a
/// non-negative integer becomes 0
pub fn parse_count(text: &str) -> u64 {
    text.trim().parse::<u64>().unwrap_or(0)
}
