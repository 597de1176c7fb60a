//! devsh entry point.
//!
//! Reads commands from stdin (or from `-c` arguments) and runs them against
//! the devices declared in `devsh.toml`. Type `help` for the command forms.

mod repl;
mod setup;

use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use devsh_platform::{
    FileScriptFactory, FlagRunLoop, LogSink, MemberInvoker, MemoryRegistry, MemoryTaskMonitor,
    sink::OUTPUT_TARGET,
};
use devsh_terminal::{Interpreter, Services};
use devsh_types::config::{DEFAULT_CONFIG_FILE, ShellConfig};

/// Interactive device shell
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Config file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the script directory from the config
    #[arg(long, value_name = "DIR")]
    script_dir: Option<PathBuf>,

    /// Run these commands and exit instead of reading stdin
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    commands: Vec<String>,

    /// Register the demo devices even when the config declares some
    #[arg(long)]
    demo: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            if record.target() == OUTPUT_TARGET && record.level() == log::Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args())
            }
        })
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ShellConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = cli.script_dir {
        config.scripts.dir = dir;
    }

    let level = match cli.verbose {
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    init_logger(level);
    log::debug!("config: {config:?}");

    let registry = MemoryRegistry::new();
    setup::populate_devices(&registry, &config.devices);
    if cli.demo || config.devices.is_empty() {
        setup::populate_demo_devices(&registry);
    }
    log::info!(
        "devsh {}: {} device(s), scripts in {}",
        env!("CARGO_PKG_VERSION"),
        registry.len(),
        config.scripts.dir.display()
    );

    let monitor = MemoryTaskMonitor::new();
    let run_loop = FlagRunLoop::new();
    let primary = FileScriptFactory::new(&config.scripts.dir, &config.scripts.primary_extension);
    let secondary =
        FileScriptFactory::new(&config.scripts.dir, &config.scripts.secondary_extension);
    let secondary_suffix = config.scripts.secondary_suffix();
    let interp = Interpreter::new(Services {
        registry: &registry,
        invoker: &MemberInvoker,
        monitor: &monitor,
        sink: &LogSink,
        run_loop: &run_loop,
        primary_factory: &primary,
        secondary_factory: &secondary,
        secondary_suffix: &secondary_suffix,
    });

    let summary = if cli.commands.is_empty() {
        let stdin = std::io::stdin();
        let prompt = stdin.is_terminal().then_some(config.prompt.as_str());
        repl::run(&interp, &run_loop, stdin.lock(), std::io::stdout(), prompt)?
    } else {
        let script = cli.commands.join("\n");
        repl::run(&interp, &run_loop, script.as_bytes(), std::io::sink(), None)?
    };
    log::debug!("session: {summary:?}");

    if summary.failed > 0 && !cli.commands.is_empty() {
        anyhow::bail!("{} command(s) failed", summary.failed);
    }
    Ok(())
}
