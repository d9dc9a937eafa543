//! Custom Info CLI
//!
//! Usage:
//!   custom-info [OPTIONS] --scene <FILE>
//!
//! Options:
//!   -s, --scene <FILE>        Scene description (TOML format)
//!   -c, --config <FILE>       Engine configuration (TOML format)
//!   -t, --template <TEXT>     Template to render instead of the configured one
//!   -d, --decimals <N>        Decimal places for floating point values
//!   -q, --query <EXPR>        Evaluate a single expression, e.g. Player.Speed
//!   --no-methods              Disallow method calls while rendering
//!   -h, --help                Print help

use std::path::PathBuf;

use clap::Parser;

use custom_info::{load, InfoEngine};

#[derive(Parser)]
#[command(name = "custom-info")]
#[command(about = "Render live text templates against a scene description")]
struct Cli {
    /// Scene description (TOML format)
    #[arg(short, long)]
    scene: PathBuf,

    /// Engine configuration (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template to render instead of the configured one
    #[arg(short, long)]
    template: Option<String>,

    /// Decimal places for floating point values
    #[arg(short, long)]
    decimals: Option<usize>,

    /// Evaluate expressions one at a time instead of rendering the template
    #[arg(short, long)]
    query: Vec<String>,

    /// Disallow method calls while rendering
    #[arg(long)]
    no_methods: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let (mut world, mut config) = match load(&cli.scene, cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(template) = cli.template {
        config = config.with_template(template);
    }
    if let Some(decimals) = cli.decimals {
        config = config.with_decimals(decimals);
    }
    if cli.no_methods {
        world.set_methods_disabled(true);
    }

    let mut engine = InfoEngine::new(config, &world);
    if cli.query.is_empty() {
        println!("{}", engine.get_info(&world, None));
        return;
    }
    for query in &cli.query {
        println!("{}", engine.run_query(&world, query));
    }
}
