use clap::Subcommand;
use getset_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting (e.g. "gaps.min_gap_minutes", "calendar.holidays")
    Get {
        /// Dotted key
        key: String,
    },
    /// Change one setting and save; rejected if the result fails validation
    Set {
        /// Dotted key
        key: String,
        /// New value; JSON for lists (e.g. '["2024-12-25"]')
        value: String,
    },
    /// Show the whole configuration as stored in config.toml
    List {
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Overwrite config.toml with the defaults
    Reset,
    /// Print the path of config.toml
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", config.to_toml()?);
            }
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("defaults written to {}", Config::path()?.display());
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
    }
    Ok(())
}
