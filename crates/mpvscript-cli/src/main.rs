use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::info;

use mpvscript_cli::BindingsFile;
use mpvscript_client::config::{ConfigLoadError, MpvScriptConfig, ProjectPaths};
use mpvscript_client::{LogLevel, MemoryHost};
use mpvscript_events::{CompoundKey, HostEvent};
use mpvscript_runner::{BridgeRunner, DEFAULT_BUS_CAPACITY, init_logging};
use mpvscript_scripting_host::{ScriptContext, ScriptRunner, loader};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show where mpvscript keeps its files
    Paths,
    /// Write an example config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// List configured scripts and the client identity each one gets
    Scripts,
    /// Compile a bindings file into input sections and print them
    Sections {
        bindings: PathBuf,
    },
    /// Replay key releases against a bindings file
    Dispatch {
        bindings: PathBuf,
        /// Targets as <identity>___<name>
        #[arg(required = true)]
        targets: Vec<String>,
        /// Key state sent with each target
        #[arg(long, default_value = "u-")]
        state: String,
    },
}

const EXAMPLE_CONFIG: &str = r#"# mpvscript configuration

[scripting]
enabled = true
# Explicit script paths, loaded before the script directory
scripts = []
# Request client-message delivery for scripts with bindings
enable_client_message = true

[logging]
file = false
"#;

fn config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config.clone().or_else(MpvScriptConfig::config_path)
}

fn load_config(cli: &Cli) -> Result<MpvScriptConfig, Box<dyn Error>> {
    let Some(path) = config_path(cli) else {
        return Ok(MpvScriptConfig::default());
    };
    match MpvScriptConfig::load_from(&path) {
        Ok(config) => Ok(config),
        Err(ConfigLoadError::NotFound) => Ok(MpvScriptConfig::default()),
        Err(e) => Err(e.into()),
    }
}

fn create_example_config(path: &Path, force: bool) -> Result<(), Box<dyn Error>> {
    if path.exists() && !force {
        return Err(format!("{} already exists, pass --force to overwrite", path.display()).into());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, EXAMPLE_CONFIG)?;
    info!("Created example config at {}", path.display());
    println!("Config file created at: {}", path.display());
    Ok(())
}

fn show_paths(cli: &Cli, config: &MpvScriptConfig) {
    let display = |path: Option<PathBuf>| {
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unavailable>".to_string())
    };
    let paths = ProjectPaths::new("mpvscript");
    println!("config:  {}", display(config_path(cli)));
    println!("scripts: {}", config.scripting.script_dir().display());
    println!("logs:    {}", display(paths.map(|p| p.data_dir().join("logs"))));
}

fn list_scripts(config: &MpvScriptConfig) {
    let runner = ScriptRunner::new(Arc::new(MemoryHost::new()), config.scripting.clone());
    let paths = runner.configured_paths();
    if paths.is_empty() {
        println!("no scripts configured");
        return;
    }
    for path in paths {
        match loader::read_script(&path) {
            Ok(script) => println!("{:<20} {}", script.identity, script.path.display()),
            Err(e) => println!("{:<20} {}", "-", e),
        }
    }
}

fn load_bindings(path: &Path, host: Arc<MemoryHost>) -> Result<ScriptContext, Box<dyn Error>> {
    let file = BindingsFile::load(path)?;
    let identity = file
        .identity(path)
        .ok_or_else(|| format!("cannot derive an identity from {}", path.display()))?;
    let mut ctx = ScriptContext::new(identity, host);
    file.register(&mut ctx)?;
    Ok(ctx)
}

fn print_sections(path: &Path) -> Result<(), Box<dyn Error>> {
    let ctx = load_bindings(path, Arc::new(MemoryHost::new()))?;
    let sections = ctx.build_input_sections();
    if sections.is_empty() {
        println!("no key bindings in {}", path.display());
    }
    for section in sections.sections() {
        println!(
            "[{}] location={} builtin={} owner={}",
            section.name, section.location, section.builtin, section.owner
        );
        for line in &section.lines {
            println!("  {}", line);
        }
    }
    for observed in ctx.observed().iter() {
        println!("observe {} as {}", observed.key, observed.format);
    }
    Ok(())
}

async fn dispatch(path: &Path, targets: &[String], state: &str) -> Result<(), Box<dyn Error>> {
    let host = Arc::new(MemoryHost::new());
    let ctx = load_bindings(path, host.clone())?;
    ctx.flush(true);
    host.clear_calls();

    let bridge = BridgeRunner::from_contexts(vec![ctx], DEFAULT_BUS_CAPACITY);
    let (tx, rx) = mpsc::unbounded_channel();
    for target in targets {
        let key = CompoundKey::parse(target)
            .ok_or_else(|| format!("{} is not of the form <identity>___<name>", target))?;
        tx.send(HostEvent::key_binding(&key, state))?;
    }
    drop(tx);

    for report in bridge.run(rx).await? {
        println!(
            "{}: {} event(s), {} invoked, {} failed",
            report.identity, report.events, report.invoked, report.failed
        );
    }
    for line in host.logs(LogLevel::Info) {
        println!("  {}", line);
    }
    for line in host.logs(LogLevel::Error) {
        println!("  error: {}", line);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let _guard = init_logging("cli", &config.logging)?;

    match &cli.command {
        Command::Paths => show_paths(&cli, &config),
        Command::Init { force } => {
            let path = config_path(&cli).ok_or("Failed to determine config directory")?;
            create_example_config(&path, *force)?;
        }
        Command::Scripts => list_scripts(&config),
        Command::Sections { bindings } => print_sections(bindings)?,
        Command::Dispatch {
            bindings,
            targets,
            state,
        } => dispatch(bindings, targets, state).await?,
    }

    Ok(())
}
