use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "getset", version, about = "GETSET recharge planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recharge rules
    Rule {
        #[command(subcommand)]
        action: commands::rule::RuleAction,
    },
    /// Recharge activities on offer
    Recharge {
        #[command(subcommand)]
        action: commands::recharge::RechargeAction,
    },
    /// Free time between calendar events
    Gaps(commands::gaps::GapsArgs),
    /// Balance score for a day
    Balance(commands::balance::BalanceArgs),
    /// Schedule load for a day
    Load(commands::load::LoadArgs),
    /// Suggest recharges for the rest of the day
    Suggest(commands::suggest::SuggestArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    // Logs go to stderr so JSON on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Rule { action } => commands::rule::run(action),
        Commands::Recharge { action } => commands::recharge::run(action),
        Commands::Gaps(args) => commands::gaps::run(args),
        Commands::Balance(args) => commands::balance::run(args),
        Commands::Load(args) => commands::load::run(args),
        Commands::Suggest(args) => commands::suggest::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
