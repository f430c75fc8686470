use std::path::PathBuf;

use clap::Subcommand;
use getset_core::{Catalog, Config};

use super::input;

#[derive(Subcommand)]
pub enum RechargeAction {
    /// List recharges allowed by the active rule, in its order
    List {
        /// Catalog JSON file
        #[arg(long)]
        catalog: PathBuf,
        /// Evaluate at this local time instead of now
        #[arg(long)]
        at: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: RechargeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RechargeAction::List { catalog, at, json } => {
            let config = Config::load_or_default();
            let catalog = Catalog::load(&catalog)?;
            let now = input::at_or_now(at.as_deref())?;
            let candidates = catalog.candidates(&config.rule_selector(), now);

            if json {
                println!("{}", serde_json::to_string_pretty(&candidates)?);
            } else if candidates.is_empty() {
                println!("no recharges");
            } else {
                for action in &candidates {
                    println!(
                        "{}\t{}\t{} min\trecovery {}",
                        action.label,
                        action.category,
                        action.duration_minutes(),
                        action.recovery
                    );
                }
            }
        }
    }
    Ok(())
}
