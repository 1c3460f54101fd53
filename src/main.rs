// gorou: terminal browser for Go goroutine dumps

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use gorou::config::{self, FileConfig, Overrides, Settings};
use gorou::grouping::GroupBy;
use gorou::parser;
use gorou::ui::App;

#[derive(Parser)]
#[command(name = "gorou")]
#[command(about = "Browse Go goroutine dumps in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Goroutine dump to open
    trace_file: PathBuf,

    /// Show captured paths under SRC as DEST (repeatable)
    #[arg(short = 'd', long = "dir", value_name = "SRC=DEST", value_parser = parse_dir)]
    dirs: Vec<(String, String)>,

    /// Keep only goroutines whose block contains TEXT (repeatable)
    #[arg(short = 'f', long = "filter", value_name = "TEXT")]
    filters: Vec<String>,

    /// Drop goroutines whose block contains TEXT (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "TEXT")]
    excludes: Vec<String>,

    /// Prefer frames from this package in the goroutine list
    #[arg(short = 'p', long, value_name = "TEXT")]
    pkg: Option<String>,

    /// How to group goroutines
    #[arg(short = 'g', long, value_enum, conflicts_with = "age")]
    group: Option<GroupBy>,

    /// Group goroutines by age (same as --group age)
    #[arg(long)]
    age: bool,

    /// Frames shown per ancestor; negative shows all
    #[arg(short = 'A', long, value_name = "N", allow_negative_numbers = true)]
    ancestor_frames: Option<i64>,

    /// Write log records to PATH instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            dirs: self.dirs.clone(),
            filters: self.filters.clone(),
            excludes: self.excludes.clone(),
            pkg: self.pkg.clone(),
            group: if self.age { Some(GroupBy::Age) } else { self.group },
            ancestor_frames: self.ancestor_frames,
        }
    }
}

fn parse_dir(value: &str) -> Result<(String, String), String> {
    config::parse_dir_mapping(value).map_err(|e| e.to_string())
}

fn init_logging(log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let file_config = FileConfig::discover(&cwd).context("Failed to load configuration")?;
    let settings = Settings::resolve(file_config, cli.overrides());
    log::debug!("settings: {:?}", settings);

    let trace = parser::parse_file(&cli.trace_file, &settings.filters)
        .with_context(|| format!("Failed to load trace {}", cli.trace_file.display()))?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let source_name = cli.trace_file.display().to_string();
    let mut app = App::new(&trace, settings, source_name);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.context("Terminal UI failed")
}
