use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::info;

use wordjar::{
    app::{Action, App},
    app_dirs::AppDirs,
    clock::{Clock, SystemClock},
    config::{ConfigStore, FileConfigStore},
    logging,
    model::ProgressModel,
    runtime::{AppEvent, EventLoop},
    store::{FileStateStore, StateStore},
    ui::labels,
};

const POLL_INTERVAL_MS: u64 = 1000;

/// tiny terminal widget that tracks a writing goal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Keep a word count, a word goal and a deadline; see how far along you are and how many words a day it takes to get there."
)]
pub struct Cli {
    /// state file to read and write instead of the default location
    #[clap(long, global = true)]
    state_file: Option<PathBuf>,

    /// config file to use instead of the default location
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// print the current progress
    Status {
        /// print as JSON
        #[clap(long)]
        json: bool,
    },
    /// set the current word count (anything non-numeric counts as 0)
    Count {
        #[clap(allow_hyphen_values = true)]
        value: String,
    },
    /// set the word goal (anything non-numeric counts as 0)
    Goal {
        #[clap(allow_hyphen_values = true)]
        value: String,
    },
    /// add words written since the last update
    Add { words: u64 },
    /// set the deadline: YYYY-MM-DD, +DAYS, or "clear"
    Deadline {
        #[clap(allow_hyphen_values = true)]
        value: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    logging::init(&AppDirs::log_path());

    let config_store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let config = config_store.load();
    let state_path = config.resolve_state_path(cli.state_file.as_deref());
    info!(state = %state_path.display(), "starting");

    let model = ProgressModel::load(FileStateStore::with_path(&state_path), SystemClock);

    match cli.command.clone() {
        Some(command) => run_command(command, model),
        None => {
            if !stdin().is_tty() {
                let mut cmd = Cli::command();
                cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
            }
            run_tui(App::new(model, config))
        }
    }
}

fn run_command<S: StateStore, C: Clock>(
    command: Command,
    mut model: ProgressModel<S, C>,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Status { json } => {
            print_status(&model, json)?;
            return Ok(());
        }
        Command::Count { value } => {
            model.set_word_count_text(&value);
        }
        Command::Goal { value } => {
            model.set_word_goal_text(&value);
        }
        Command::Add { words } => {
            model.add_words(words);
        }
        Command::Deadline { value } => {
            model.set_deadline_text(&value)?;
        }
    }

    if let Some(err) = model.last_save_error() {
        return Err(format!("could not save progress: {err}").into());
    }
    print_status(&model, false)
}

fn print_status<S: StateStore, C: Clock>(
    model: &ProgressModel<S, C>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let snap = model.snapshot();
    if json {
        let value = serde_json::json!({
            "word_count": snap.word_count,
            "word_goal": snap.word_goal,
            "deadline_date": snap.deadline_date,
            "words_remaining": snap.words_remaining,
            "days_left": snap.days_left,
            "percent_achieved": snap.percent_achieved,
            "words_per_day_needed": snap.words_per_day_needed,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Word Count: {}", snap.word_count);
        println!("Word Goal: {}", snap.word_goal);
        println!("{}", labels::days_left_label(&snap));
        println!(
            "Percent of Goal Achieved: {}",
            labels::format_percent(snap.percent_achieved)
        );
        println!("{}", labels::words_per_day_label(&snap));
    }
    Ok(())
}

fn run_tui<S: StateStore, C: Clock>(mut app: App<S, C>) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend, S: StateStore, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, C>,
) -> Result<(), Box<dyn Error>> {
    let mut events = EventLoop::new(SystemClock, Duration::from_millis(POLL_INTERVAL_MS));
    events.listen_to_terminal();

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let redraw = match events.next() {
            AppEvent::Idle => false,
            AppEvent::Resize | AppEvent::NewDay(_) => true,
            AppEvent::Key(key) => {
                if app.handle_key(key) == Action::Quit {
                    break;
                }
                // Focus and prompt changes don't go through the model
                true
            }
        };

        if app.take_changed() || redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    info!("exiting");
    Ok(())
}
