use anyhow::{Context, Result};
use std::io;

use hbnb_console::{
    ClassRegistry, Console, ConsoleConfig, FileStorage, LineSource, ScriptInput, TerminalInput,
    COMMANDS,
};

fn main() -> Result<()> {
    init_tracing()?;

    let config = ConsoleConfig::detect();
    let registry = ClassRegistry::new();

    let mut store = FileStorage::open(&config.file_path);
    store.reload(&registry).with_context(|| {
        format!("cannot load objects from {}", config.file_path.display())
    })?;
    tracing::debug!(count = store.len(), "console starting");

    if config.interactive {
        let mut input = TerminalInput::new(
            COMMANDS.iter().map(|(name, _)| *name),
            registry.names(),
        )
        .context("failed to initialise terminal input")?;
        run(&mut store, &registry, config, &mut input)
    } else {
        let mut input = ScriptInput::new(io::stdin().lock());
        run(&mut store, &registry, config, &mut input)
    }
}

fn run<S: LineSource>(
    store: &mut FileStorage,
    registry: &ClassRegistry,
    config: ConsoleConfig,
    input: &mut S,
) -> Result<()> {
    let mut console = Console::new(store, registry, config, io::stdout());
    console.run(input).context("console stopped")?;
    Ok(())
}

/// Logs go to stderr so stdout carries only console output
fn init_tracing() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
