use std::cell::Cell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::clock::Clock;
use crate::config::Config;
use crate::model::ProgressModel;
use crate::store::StateStore;

/// Editable rows, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Field {
    #[strum(to_string = "Word Goal")]
    Goal,
    #[strum(to_string = "Word Count")]
    Count,
    #[strum(to_string = "Deadline")]
    Deadline,
}

impl Field {
    const ALL: [Field; 3] = [Field::Goal, Field::Count, Field::Deadline];

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Typing a deadline into the date prompt
    DeadlinePrompt { input: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Counts can't usefully be longer than a u64
const MAX_DIGITS: usize = 19;

/// Presentation state around the model: what is focused and what the user
/// is currently typing
pub struct App<S: StateStore, C: Clock> {
    pub model: ProgressModel<S, C>,
    pub config: Config,
    pub focus: Field,
    pub mode: Mode,
    pub goal_input: String,
    pub count_input: String,
    pub message: Option<String>,
    changed: Rc<Cell<bool>>,
}

impl<S: StateStore, C: Clock> App<S, C> {
    pub fn new(mut model: ProgressModel<S, C>, config: Config) -> Self {
        let changed = Rc::new(Cell::new(false));
        let flag = changed.clone();
        model.subscribe(move || flag.set(true));

        let state = *model.state();
        Self {
            model,
            config,
            focus: Field::Goal,
            mode: Mode::Normal,
            goal_input: state.word_goal.to_string(),
            count_input: state.word_count.to_string(),
            message: None,
            changed,
        }
    }

    /// True once after the model reported a change
    pub fn take_changed(&self) -> bool {
        self.changed.replace(false)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match &mut self.mode {
            Mode::DeadlinePrompt { input } => {
                match key.code {
                    KeyCode::Esc => self.mode = Mode::Normal,
                    KeyCode::Enter => {
                        let text = std::mem::take(input);
                        self.mode = Mode::Normal;
                        self.commit_deadline(&text);
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Char(c) if c.is_ascii_alphanumeric() || c == '-' || c == '+' => {
                        input.push(c);
                    }
                    _ => {}
                }
                Action::Continue
            }
            Mode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Tab | KeyCode::Down => self.move_focus(self.focus.next()),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(self.focus.prev()),
            _ => match self.focus {
                Field::Goal | Field::Count => self.edit_count(key.code),
                Field::Deadline => self.edit_deadline(key.code),
            },
        }
        Action::Continue
    }

    fn move_focus(&mut self, to: Field) {
        self.focus = to;
        self.message = None;
        self.sync_inputs();
    }

    fn edit_count(&mut self, code: KeyCode) {
        let field = self.focus;
        let buffer = match field {
            Field::Goal => &mut self.goal_input,
            _ => &mut self.count_input,
        };

        match code {
            KeyCode::Char(c) if c.is_ascii_digit() && buffer.len() < MAX_DIGITS => {
                if buffer == "0" {
                    buffer.clear();
                }
                buffer.push(c);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Delete => buffer.clear(),
            _ => return,
        }

        let text = buffer.clone();
        match field {
            Field::Goal => self.model.set_word_goal_text(&text),
            _ => self.model.set_word_count_text(&text),
        };
    }

    fn edit_deadline(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Char('d') => {
                let input = self
                    .model
                    .state()
                    .deadline_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                self.mode = Mode::DeadlinePrompt { input };
            }
            KeyCode::Char('+') | KeyCode::Right => {
                self.model.shift_deadline(1);
            }
            KeyCode::Char('-') | KeyCode::Left => {
                self.model.shift_deadline(-1);
            }
            KeyCode::Char('c') | KeyCode::Delete => {
                self.model.clear_deadline();
            }
            _ => {}
        }
    }

    fn commit_deadline(&mut self, text: &str) {
        match self.model.set_deadline_text(text) {
            Ok(_) => self.message = None,
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    /// Show stored values in the fields that aren't being typed into
    fn sync_inputs(&mut self) {
        let state = *self.model.state();
        if self.focus != Field::Goal {
            self.goal_input = state.word_goal.to_string();
        }
        if self.focus != Field::Count {
            self.count_input = state.word_count.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::FileStateStore;
    use chrono::NaiveDate;
    use tempfile::{tempdir, TempDir};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 5).unwrap()
    }

    fn app() -> (App<FileStateStore, FixedClock>, TempDir) {
        let dir = tempdir().unwrap();
        let store = FileStateStore::with_path(dir.path().join("writing_data.json"));
        let model = ProgressModel::load(store, FixedClock::new(today()));
        (App::new(model, Config::default()), dir)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App<FileStateStore, FixedClock>, s: &str) {
        for c in s.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_digits_updates_model_live() {
        let (mut app, _dir) = app();
        type_str(&mut app, "2000");
        assert_eq!(app.goal_input, "2000");
        assert_eq!(app.model.state().word_goal, 2000);
        assert!(app.take_changed());
        assert!(!app.take_changed());

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Field::Count);
        type_str(&mut app, "5x00");
        assert_eq!(app.model.state().word_count, 500);
        assert_eq!(app.model.snapshot().percent_achieved, 25.0);
    }

    #[test]
    fn clearing_a_field_counts_as_zero() {
        let (mut app, _dir) = app();
        type_str(&mut app, "12");
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.goal_input, "");
        assert_eq!(app.model.state().word_goal, 0);
    }

    #[test]
    fn focus_wraps_both_ways() {
        let (mut app, _dir) = app();
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus, Field::Deadline);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.focus, Field::Goal);
    }

    #[test]
    fn deadline_prompt_sets_date() {
        let (mut app, _dir) = app();
        app.focus = Field::Deadline;
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::DeadlinePrompt { input: String::new() });
        type_str(&mut app, "+10");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.model.snapshot().days_left, 10);
        assert_eq!(app.message, None);
    }

    #[test]
    fn bad_deadline_shows_message() {
        let (mut app, _dir) = app();
        app.focus = Field::Deadline;
        app.handle_key(key(KeyCode::Enter));
        type_str(&mut app, "soon");
        app.handle_key(key(KeyCode::Enter));
        assert!(app.message.is_some());
        assert_eq!(app.model.state().deadline_date, None);
    }

    #[test]
    fn esc_cancels_prompt_then_quits() {
        let (mut app, _dir) = app();
        app.focus = Field::Deadline;
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Action::Continue);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn plus_minus_nudge_deadline() {
        let (mut app, _dir) = app();
        app.focus = Field::Deadline;
        app.handle_key(key(KeyCode::Char('+')));
        app.handle_key(key(KeyCode::Char('+')));
        app.handle_key(key(KeyCode::Char('-')));
        assert_eq!(app.model.snapshot().days_left, 1);
        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.model.state().deadline_date, None);
    }

    #[test]
    fn ctrl_c_quits_from_prompt() {
        let (mut app, _dir) = app();
        app.mode = Mode::DeadlinePrompt {
            input: String::new(),
        };
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ev), Action::Quit);
    }
}
