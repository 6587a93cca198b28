mod app;
mod domain;
mod error;
mod input;
mod report;
mod session;
mod store;
mod ticker;
mod ui;

use anyhow::{bail, Context, Result};
use app::AppState;
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{SummaryPeriod, TaskRecord, Theme};
use env_logger::{Env, Target};
use ratatui::{backend::CrosstermBackend, Terminal};
use session::Session;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use store::{database_path, init_local_data_dir, log_file_for, TaskStore, DEFAULT_HISTORY_LIMIT};

#[derive(Parser)]
#[command(name = "timepunch")]
#[command(about = "A single-user time tracker with a terminal UI and hour summaries", long_about = None)]
struct Cli {
    /// Database file to use instead of the discovered data directory
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .timepunch directory in the current directory
    Init,
    /// Start tracking a new task
    Start {
        name: String,
        /// Comma-separated tags
        #[arg(short, long, default_value = "")]
        tags: String,
    },
    /// Stop the running task
    Stop,
    /// Stop the running task, or start NAME when idle
    Toggle {
        name: String,
        #[arg(short, long, default_value = "")]
        tags: String,
    },
    /// Show the running task and its elapsed time
    Status,
    /// List recent tasks, newest first
    List {
        #[arg(short = 'n', long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a stopped task. Omitted fields keep their current value.
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        tags: Option<String>,
        /// Start time (YYYY-MM-DD HH:MM:SS)
        #[arg(long)]
        start: Option<String>,
        /// End time (YYYY-MM-DD HH:MM:SS)
        #[arg(long)]
        end: Option<String>,
    },
    /// Delete a recorded task
    Delete { id: i64 },
    /// List every known tag
    Tags,
    /// Print an hour summary
    Summary {
        #[arg(value_enum)]
        period: PeriodArg,
        /// Month (1-12) for the `month` period. Defaults to the current month.
        #[arg(long)]
        month: Option<u32>,
        /// Year for the `month` period. Defaults to the current year.
        #[arg(long)]
        year: Option<i32>,
        /// Write the summary to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show or set the colour theme
    Theme {
        #[arg(value_enum)]
        theme: Option<ThemeArg>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PeriodArg {
    Daily,
    Weekly,
    Monthly,
    Month,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // init must not create a database in the directory it is about to replace
    if let Some(Commands::Init) = cli.command {
        init_logging(None);
        return init_data_dir();
    }

    let db_path = database_path(cli.db)?;

    match cli.command {
        None => {
            init_logging(Some(&log_file_for(&db_path)));
            run_tui(&db_path)
        }
        Some(command) => {
            init_logging(None);
            let mut session = open_session(&db_path)?;
            run_command(&mut session, command)
        }
    }
}

fn init_data_dir() -> Result<()> {
    let data_dir = init_local_data_dir()?;
    println!("Initialized timepunch directory: {}", data_dir.display());
    println!();
    println!("timepunch will now use this local directory for its database.");
    println!("Run 'timepunch' to start tracking time.");
    Ok(())
}

/// Configure env_logger. With a log file the output is piped there so the TUI stays intact.
fn init_logging(log_file: Option<&Path>) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));

    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Could not open log file {}: {}", path.display(), e);
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    // A second init (tests) is harmless
    let _ = builder.try_init();
}

fn open_session(db_path: &Path) -> Result<Session> {
    let store = TaskStore::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    let session = Session::open(store).context("Failed to read running task")?;
    log::debug!("opened {} (tracking: {})", db_path.display(), session.is_tracking());
    Ok(session)
}

fn run_command(session: &mut Session, command: Commands) -> Result<()> {
    match command {
        Commands::Init => init_data_dir()?,
        Commands::Start { name, tags } => {
            let id = session.start(&name, &tags)?;
            log::info!("started task {}", id);
            println!("Started: {} (#{})", name.trim(), id);
        }
        Commands::Stop => match session.stop()? {
            Some(id) => {
                log::info!("stopped task {}", id);
                print_stopped(session, id)?;
            }
            None => println!("No task is running."),
        },
        Commands::Toggle { name, tags } => {
            let previous = session.current_task_id();
            if session.toggle(&name, &tags)? {
                println!("Started: {}", name.trim());
            } else if let Some(id) = previous {
                print_stopped(session, id)?;
            }
        }
        Commands::Status => print_status(session)?,
        Commands::List { limit, json } => {
            let tasks = session.store().get_all_tasks(limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print_task_table(&tasks);
            }
        }
        Commands::Edit {
            id,
            name,
            tags,
            start,
            end,
        } => {
            let Some(task) = session.store().get_task(id)? else {
                bail!("No task with id {}", id);
            };
            let Some(stored_end) = task.end_time.as_deref().filter(|_| !task.is_running) else {
                bail!("Task {} is still running; stop it before editing", id);
            };
            let name = name.as_deref().unwrap_or(&task.name).trim();
            if name.is_empty() {
                bail!("Please enter a task name.");
            }
            session.store().update_task(
                id,
                name,
                tags.as_deref().map(str::trim).unwrap_or(&task.tags),
                start.as_deref().unwrap_or(&task.start_time),
                end.as_deref().unwrap_or(stored_end),
            )?;
            log::info!("edited task {}", id);
            println!("Updated task #{}", id);
        }
        Commands::Delete { id } => {
            session.store().delete_task(id)?;
            session.recover()?;
            log::info!("deleted task {}", id);
            println!("Deleted task #{}", id);
        }
        Commands::Tags => {
            for tag in session.store().get_all_tags()? {
                println!("{}", tag);
            }
        }
        Commands::Summary {
            period,
            month,
            year,
            output,
        } => {
            let today = chrono::Local::now().date_naive();
            let text = session.summary_for(summary_period(period, month, year, today), today)?;
            match output {
                Some(path) => {
                    let written = report::save_summary(&path, &text)?;
                    println!("Summary written: {}", written.display());
                }
                None => println!("{}", text),
            }
        }
        Commands::Theme { theme } => {
            let store = session.store();
            if let Some(theme) = theme {
                store.set_theme(theme.into())?;
            }
            println!("{}", store.theme()?.name());
        }
    }
    Ok(())
}

fn summary_period(
    period: PeriodArg,
    month: Option<u32>,
    year: Option<i32>,
    today: chrono::NaiveDate,
) -> SummaryPeriod {
    use chrono::Datelike;

    match period {
        PeriodArg::Daily => SummaryPeriod::Daily,
        PeriodArg::Weekly => SummaryPeriod::Weekly,
        PeriodArg::Monthly => SummaryPeriod::Monthly,
        PeriodArg::Month => SummaryPeriod::Month {
            month: month.unwrap_or_else(|| today.month()),
            year: year.unwrap_or_else(|| today.year()),
        },
    }
}

fn print_stopped(session: &Session, id: i64) -> Result<()> {
    match session.store().get_task(id)? {
        Some(task) => println!("Stopped: {} ({})", task.name, task.duration_display()),
        None => println!("Stopped task #{}", id),
    }
    Ok(())
}

fn print_status(session: &Session) -> Result<()> {
    let Some(task) = session.store().get_running_task()? else {
        println!("Idle. No task is running.");
        return Ok(());
    };
    let elapsed = task
        .elapsed_at(chrono::Local::now().naive_local())
        .unwrap_or(0);
    println!("Tracking: {} (#{})", task.name, task.id);
    if !task.tags.trim().is_empty() {
        println!("Tags:     {}", task.tag_list().join(", "));
    }
    println!("Elapsed:  {}", domain::format_hms(elapsed));
    Ok(())
}

fn print_task_table(tasks: &[TaskRecord]) {
    if tasks.is_empty() {
        println!("No tasks recorded yet.");
        return;
    }
    println!(
        "{:>5}  {:<24} {:<16} {:<11} {:<11} {:>9}",
        "ID", "TASK", "TAGS", "START", "END", "DURATION"
    );
    for task in tasks {
        println!(
            "{:>5}  {:<24} {:<16} {:<11} {:<11} {:>9}",
            task.id,
            task.name,
            task.tags,
            task.start_display(),
            task.end_display(),
            task.duration_display()
        );
    }
}

fn run_tui(db_path: &Path) -> Result<()> {
    let session = open_session(db_path)?;
    let mut app = AppState::new(session)?;
    log::info!("starting TUI with database {}", db_path.display());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // A running task stays running in the store and is picked up next launch
    if let Err(err) = result {
        log::warn!("TUI exited with error: {:#}", err);
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Wake up in time for the next display tick
        let timeout = app.session.ticker().poll_timeout(Instant::now());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        app.tick(Instant::now());
    }
}
