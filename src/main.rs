use clap::Parser;
use gitvault::cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose when set.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Init => gitvault::cli::commands::init::execute(&cli),
        Commands::Close => gitvault::cli::commands::close::execute(&cli),
        Commands::Open => gitvault::cli::commands::open::execute(&cli),
        Commands::List => gitvault::cli::commands::list::execute(&cli),
        Commands::Completions { shell } => gitvault::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        gitvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
