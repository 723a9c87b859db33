use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;

use blocksmith::app::{App, Flow};
use blocksmith::collaborators::{BlueprintDir, ChallengeDeck};
use blocksmith::commands::parse_command;
use blocksmith::config::SessionConfig;

#[derive(Parser, Debug)]
#[command(name = "blocksmith", about = "Headless voxel building session")]
struct Cli {
    /// Config file (defaults to ./blocksmith.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Read commands from this file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,
    /// Directory holding <prompt-slug>.json blueprints
    #[arg(long)]
    blueprints: Option<PathBuf>,
    /// Start with an empty world
    #[arg(long)]
    empty: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let mut cfg = SessionConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.blueprints {
        cfg.blueprint_dir = dir;
    }
    if cli.empty {
        cfg.starter_scene = false;
    }

    let generator = BlueprintDir::new(cfg.blueprint_dir.clone());
    let challenges = ChallengeDeck::new(cfg.challenges.clone());
    let mut app = App::new(&cfg, generator, challenges)?;

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };

    for line in input.lines() {
        let line = line?;
        let flow = match parse_command(&line, &app.palette) {
            Ok(Some(cmd)) => app.execute(cmd),
            Ok(None) => {
                app.step();
                Flow::Continue
            }
            Err(e) => {
                println!("error: {e}");
                Flow::Continue
            }
        };
        for msg in app.take_messages() {
            println!("{msg}");
        }
        if flow == Flow::Quit {
            return Ok(());
        }
    }

    if app.is_busy() {
        app.wait_all();
        app.step();
        for msg in app.take_messages() {
            println!("{msg}");
        }
    }
    Ok(())
}
