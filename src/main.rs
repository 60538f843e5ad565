//! gideon CLI: intent router and restricted calculator with a keyword gate.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use gideon::config::GideonConfig;
use gideon::conversation::Speaker;
use gideon::error::SessionError;
use gideon::intent::IntentRouter;
use gideon::lock::{FileLockStore, LockStore};
use gideon::math;
use gideon::paths::GideonPaths;
use gideon::render::{RenderSurface, TerminalSurface};
use gideon::session::{GateOutcome, UnlockOutcome};

#[derive(Parser)]
#[command(name = "gideon", version, about = "Personal assistant with a panic lock")]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/gideon/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config template.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },

    /// Start an interactive session.
    Chat,

    /// Show how an utterance would be routed, without calling any provider.
    Route {
        /// The utterance.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Evaluate an arithmetic expression.
    Eval {
        /// The expression, e.g. `2 * (3 + 4)`.
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,
    },

    /// Show configuration and lock status.
    Status,

    /// Clear the panic lock with the SOS code.
    Unlock,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => GideonPaths::resolve()?.config_file(),
    };

    match cli.command {
        Commands::Init { force } => {
            if config_path.exists() && !force {
                println!(
                    "Config already exists: {} (use --force to overwrite)",
                    config_path.display()
                );
                return Ok(());
            }
            GideonConfig::template().save(&config_path)?;
            if let Ok(paths) = GideonPaths::resolve() {
                paths.ensure_dirs()?;
            }
            println!("Wrote {}", config_path.display());
            println!("Fill in [access] sos_code and the identity keywords before running `gideon chat`.");
        }

        Commands::Chat => {
            let config = load_config(&config_path)?;
            config.require_secrets()?;
            chat(&config)?;
        }

        Commands::Route { text } => {
            let config = load_config(&config_path)?;
            let router = IntentRouter::new(config.weather.default_city.clone());
            let intent = router.route(&text.join(" "));
            println!("{}", serde_json::to_string_pretty(&intent).into_diagnostic()?);
        }

        Commands::Eval { expression } => {
            let expression = expression.join(" ");
            let value = math::evaluate(&expression)?;
            println!("{}", math::format_number(value));
        }

        Commands::Status => {
            let config = load_config(&config_path)?;
            let lock_path = config.lock_file()?;
            let store = FileLockStore::new(&lock_path);
            let state = store.try_load();

            println!("gideon {}", env!("CARGO_PKG_VERSION"));
            println!("  Config:       {}", config_path.display());
            println!("  Lock file:    {}", lock_path.display());
            match state {
                Ok(state) if state.locked => println!("  State:        LOCKED"),
                Ok(_) => println!("  State:        unlocked"),
                Err(e) => println!("  State:        unlocked (unreadable lock file: {e})"),
            }
            println!("  Identities:   {}", config.access.identities.len());
            println!(
                "  SOS code:     {}",
                if config.access.sos_code.is_empty() { "not set" } else { "set" }
            );
            println!(
                "  Weather key:  {}",
                if config.weather.api_key.is_empty() { "not set" } else { "set" }
            );
            println!("  Default city: {}", config.weather.default_city);
        }

        Commands::Unlock => {
            let config = load_config(&config_path)?;
            config.require_secrets()?;
            let gate = config.gate(Box::new(FileLockStore::new(config.lock_file()?)));
            let mut session = gate.open_session();
            if !session.is_locked() {
                println!("System is not locked.");
                return Ok(());
            }
            let code = rpassword::prompt_password("SOS code: ").into_diagnostic()?;
            match gate.unlock(&mut session, code.trim()) {
                UnlockOutcome::Unlocked => println!("System unlocked."),
                UnlockOutcome::NotLocked => println!("System is not locked."),
                UnlockOutcome::WrongCode => {
                    return Err(miette::miette!(
                        code = "gideon::unlock::wrong_code",
                        "wrong SOS code; the system stays locked"
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Load the config (defaults if the file is absent) and apply env overrides.
fn load_config(path: &std::path::Path) -> Result<GideonConfig> {
    let mut config = GideonConfig::load_or_default(path)?;
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

const LOCKED_NOTICE: &str = "System is locked. Run `gideon unlock` with the SOS code.";

fn chat(config: &GideonConfig) -> Result<()> {
    let store: Box<dyn LockStore> = Box::new(FileLockStore::new(config.lock_file()?));
    let assistant = config.build_assistant(store);
    let gate = assistant.gate();
    let mut session = gate.open_session();
    let mut surface = TerminalSurface::new(std::io::stdout(), config.render.typing_delay());

    if session.is_locked() {
        println!("{LOCKED_NOTICE}");
        return Ok(());
    }

    // Keyword gate. Blank input just asks again.
    loop {
        let keyword = rpassword::prompt_password("Keyword: ").into_diagnostic()?;
        match gate.present_keyword(&mut session, keyword.trim()) {
            Ok(GateOutcome::Granted { .. }) => break,
            Ok(GateOutcome::Ignored) => continue,
            Ok(GateOutcome::Locked) | Err(SessionError::Locked) => {
                println!("Access denied. System locked.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(greeting) = session.take_greeting() {
        surface
            .display(Speaker::Assistant, &greeting)
            .into_diagnostic()?;
    }
    println!("(type `/history` to replay this session, `exit` to leave)");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush().into_diagnostic()?;
        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.into_diagnostic()?;
        let input = line.trim();

        match input.to_lowercase().as_str() {
            "exit" | "quit" => break,
            "/history" => {
                for turn in session.transcript().turns() {
                    surface.replay(turn).into_diagnostic()?;
                }
                continue;
            }
            _ => {}
        }

        // Another process may have triggered SOS since the last message.
        gate.refresh(&mut session);
        match assistant.respond(&mut session, input) {
            Ok(Some(reply)) => surface
                .display(Speaker::Assistant, &reply.text)
                .into_diagnostic()?,
            Ok(None) => continue,
            Err(SessionError::Locked) => {
                println!("{LOCKED_NOTICE}");
                break;
            }
            Err(e) => return Err(e.into()),
        }

        if session.is_locked() {
            break;
        }
    }

    Ok(())
}
