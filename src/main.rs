use anyhow::{bail, Context};
use patternevo::engines::generation::ConsoleProgressCallback;
use patternevo::{ConfigManager, EvolutionEngine, EvolutionSession, Pattern};

const USAGE: &str = "usage: pattern-evolve [--config <file>] [--seed <n>] <pattern code>";

struct Args {
    config: Option<String>,
    seed: Option<u64>,
    pattern: String,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut config = None;
    let mut seed = None;
    let mut words = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(args.next().context("--config needs a file")?),
            "--seed" => {
                let value = args.next().context("--seed needs a number")?;
                seed = Some(value.parse().with_context(|| format!("invalid seed {:?}", value))?);
            }
            "-h" | "--help" => bail!(USAGE),
            _ => words.push(arg),
        }
    }
    if words.is_empty() {
        bail!(USAGE);
    }
    Ok(Args {
        config,
        seed,
        pattern: words.join(" "),
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let manager = ConfigManager::new();
    match &args.config {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("loading {}", path))?,
        None => manager.load_from_env()?,
    }
    if let Some(seed) = args.seed {
        manager.update(|config| config.evolution.seed = Some(seed))?;
    }

    let mut engine = EvolutionEngine::from_app_config(&manager.get());
    let mut session = EvolutionSession::new();
    let outcome = engine.evolve(&Pattern::new(args.pattern), &mut session, ConsoleProgressCallback)?;

    println!("{}", serde_json::to_string_pretty(&outcome.evolved)?);
    Ok(())
}
