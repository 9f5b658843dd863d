use std::io;

use admin_cli::commands::{render_cmd, resolve_cmd};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// admin-views CLI: render admin pages and forms from templates
#[derive(Parser)]
#[command(name = "admin-views")]
#[command(about = "Render admin pages and forms from templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page or partial for a record
    Render(render_cmd::RenderArgs),

    /// Show the file a template name resolves to
    Resolve(resolve_cmd::ResolveArgs),

    /// Show the CLI version
    Version,
}

fn main() {
    // Logs go to stderr so rendered pages can be piped
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_env("ADMIN_VIEWS_LOG"))
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Render(args) => render_cmd::execute(args, io::stdout().lock()),
        Commands::Resolve(args) => resolve_cmd::execute(args, io::stdout().lock()).map(|_| ()),
        Commands::Version => {
            println!("admin-views version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("Error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
