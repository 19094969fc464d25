use std::env;
use std::io::{self, Stdout};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;

use sqlview::app::App;
use sqlview::config;
use sqlview::db::Database;
use sqlview::logging;

fn print_version() {
    println!("sqlview {}", env!("CARGO_PKG_VERSION"));
}

fn print_usage() {
    eprintln!("sqlview - browse and edit SQLite tables");
    eprintln!();
    eprintln!("Usage: sqlview [OPTIONS] [DB_PATH]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [DB_PATH]          Path to the SQLite database file");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config PATH  Config file (default: {})", config::DEFAULT_CONFIG_FILE);
    eprintln!("  -h, --help         Print this help message");
    eprintln!("  -V, --version      Print version information");
    eprintln!();
    eprintln!("Environment Variables:");
    eprintln!("  SQLVIEW_DB         Database path if not provided as argument");
    eprintln!("  SQLVIEW_CONFIG     Config file if --config is not given");
    eprintln!("  RUST_LOG           Log filter, overrides [Logging] level");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  sqlview ./app.db");
    eprintln!("  SQLVIEW_DB=./app.db sqlview");
}

struct Args {
    db_path: Option<String>,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args {
        db_path: None,
        config: None,
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = iter.next().context("--config requires a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => bail!("unknown option: {flag}"),
            path if parsed.db_path.is_none() => parsed.db_path = Some(path.to_string()),
            extra => bail!("unexpected argument: {extra}"),
        }
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    if args.iter().any(|a| a == "-V" || a == "--version") {
        print_version();
        return Ok(());
    }

    let args = parse_args(&args)?;

    let config_path = args.config.unwrap_or_else(config::config_path);
    let cfg = config::load_config_from(&config_path)?;

    let log_path = logging::init(&cfg.logging)?;
    tracing::info!(config = %config_path.display(), log = %log_path.display(), "starting sqlview");

    // Database path priority: CLI arg > SQLVIEW_DB env var > config file
    let db_path = args
        .db_path
        .or_else(|| env::var("SQLVIEW_DB").ok())
        .or_else(|| cfg.database.db_location.clone());
    let Some(db_path) = db_path else {
        print_usage();
        bail!(
            "no database given; pass DB_PATH, set SQLVIEW_DB, or set db_location under [Database] in {}",
            config_path.display()
        );
    };

    let rt = Runtime::new().context("failed to initialize tokio runtime")?;
    let db = rt
        .block_on(Database::open(&db_path))
        .with_context(|| format!("failed to open {db_path}"))?;

    let mut terminal =
        init_terminal().context("failed to initialize terminal; are you running in a real TTY?")?;

    let mut app = App::new(rt.handle().clone(), db.clone(), cfg);
    let res = app.run(&mut terminal);

    restore_terminal(terminal)?;
    drop(app);
    rt.block_on(db.close());
    tracing::info!("sqlview exited");

    res
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
