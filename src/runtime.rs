use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::debug;

use crate::clock::Clock;

/// What the widget reacts to
#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// The date moved on while idle, so days left and words per day changed
    NewDay(NaiveDate),
    /// Nothing happened within the poll interval
    Idle,
}

/// Inbox for terminal input plus a watch on the calendar date.
///
/// Anything can feed it through [`EventLoop::sender`]; production wires the
/// crossterm reader in with [`EventLoop::listen_to_terminal`].
pub struct EventLoop<C: Clock> {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
    poll: Duration,
    clock: C,
    day: NaiveDate,
}

impl<C: Clock> EventLoop<C> {
    pub fn new(clock: C, poll: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let day = clock.today();
        Self {
            tx,
            rx,
            poll,
            clock,
            day,
        }
    }

    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }

    /// Forward key presses and resizes from the terminal on a reader thread
    pub fn listen_to_terminal(&self) {
        let tx = self.sender();
        std::thread::spawn(move || {
            while let Ok(ev) = event::read() {
                let forwarded = match ev {
                    // Windows reports releases too; only presses edit anything
                    Event::Key(key) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                    Event::Resize(_, _) => AppEvent::Resize,
                    _ => continue,
                };
                if tx.send(forwarded).is_err() {
                    break;
                }
            }
        });
    }

    /// Waits up to the poll interval for input; on a quiet interval checks
    /// whether midnight has passed
    pub fn next(&mut self) -> AppEvent {
        match self.rx.recv_timeout(self.poll) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                let today = self.clock.today();
                if today != self.day {
                    debug!(%today, "day rolled over");
                    self.day = today;
                    AppEvent::NewDay(today)
                } else {
                    AppEvent::Idle
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct ManualClock(Rc<Cell<NaiveDate>>);

    impl Clock for ManualClock {
        fn today(&self) -> NaiveDate {
            self.0.get()
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    #[test]
    fn quiet_interval_on_same_day_is_idle() {
        let mut events = EventLoop::new(FixedClock::new(day(9)), Duration::from_millis(1));
        assert_eq!(events.next(), AppEvent::Idle);
    }

    #[test]
    fn queued_input_comes_first() {
        let mut events = EventLoop::new(FixedClock::new(day(9)), Duration::from_millis(10));
        let key = KeyEvent::new(KeyCode::Char('7'), KeyModifiers::NONE);
        events.sender().send(AppEvent::Key(key)).unwrap();
        events.sender().send(AppEvent::Resize).unwrap();

        assert_eq!(events.next(), AppEvent::Key(key));
        assert_eq!(events.next(), AppEvent::Resize);
    }

    #[test]
    fn midnight_is_reported_once() {
        let date = Rc::new(Cell::new(day(9)));
        let mut events = EventLoop::new(ManualClock(date.clone()), Duration::from_millis(1));
        assert_eq!(events.next(), AppEvent::Idle);

        date.set(day(10));
        assert_eq!(events.next(), AppEvent::NewDay(day(10)));
        assert_eq!(events.next(), AppEvent::Idle);
    }
}
