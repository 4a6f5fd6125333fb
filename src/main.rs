use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use sequin::config::{CheckArgs, LoadArgs, LoadConfig, StoreConfig, env_var, resolve_key_field};

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Sequin: sequential CSV ingest, bulk-loads delimited files into a DynamoDB table one numbered row at a time
#[derive(Parser)]
#[command(name = "sequin", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source configuration and AWS credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load rows from delimited files into the table, numbering them 1..N
    Load(LoadArgs),

    /// Test credentials and connectivity by describing the table
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dotenv = dotenvy::from_filename(&cli.env);

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match dotenv {
        Ok(path) => log::debug!("Sourced environment from {}", path.display()),
        Err(e) if e.not_found() => log::debug!("No dotenv file at {}", cli.env),
        Err(e) => return Err(e.into()),
    }

    match cli.command {
        Commands::Load(args) => {
            let config = LoadConfig::from_env(&args)?;
            log::info!(
                "Loading {} file(s), keyed by {}",
                config.files.len().cyan(),
                config.key_field.cyan()
            );
            let summary = sequin::cli::load(&config).await?;
            log::info!(
                "✓ Wrote {} item(s) from {} file(s)",
                summary.written.green(),
                summary.files
            );
        }
        Commands::Check(args) => {
            let store = StoreConfig::resolve(&args.store, env_var)?;
            let key_field = resolve_key_field(args.key_field.as_deref(), env_var);
            sequin::cli::check(&store, &key_field).await?;
            log::info!("✓ Table is reachable");
        }
    }

    Ok(())
}
