use anyhow::Result;
use clap::Parser;
use kaidex::cli::{AppContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr so table/JSON output stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
    };

    match cli.command {
        Commands::Validate(args) => kaidex::core::validate::run(args, &ctx),
        Commands::List(args) => kaidex::core::query::list(args, &ctx),
        Commands::Related(args) => kaidex::core::query::related(args, &ctx),
        Commands::Show(args) => kaidex::core::query::show(args, &ctx),
        Commands::Latest(args) => kaidex::core::query::latest(args, &ctx),
        Commands::Init(args) => kaidex::infra::config::init(args, &ctx),
        Commands::Completions(args) => kaidex::completion::run(args, &ctx),
    }
}
