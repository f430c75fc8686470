use std::path::PathBuf;

use clap::Subcommand;
use getset_core::{Catalog, Config};

use super::input;

#[derive(Subcommand)]
pub enum RuleAction {
    /// Show the rule in effect
    Active {
        /// Catalog JSON file
        #[arg(long)]
        catalog: PathBuf,
        /// Evaluate at this local time instead of now (e.g. "2024-01-01T12:00")
        #[arg(long)]
        at: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: RuleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RuleAction::Active { catalog, at, json } => {
            let config = Config::load_or_default();
            let catalog = Catalog::load(&catalog)?;
            let now = input::at_or_now(at.as_deref())?;
            let selector = config.rule_selector();
            let rule = catalog.active_rule(&selector, now);

            if json {
                println!("{}", serde_json::to_string_pretty(&rule)?);
                return Ok(());
            }
            let (day_type, phase) = selector.classifier().bucket(now);
            match rule {
                Some(rule) => println!("{} ({day_type}/{phase}, priority {})", rule.id, rule.priority),
                None => println!("no active rule ({day_type}/{phase})"),
            }
        }
    }
    Ok(())
}
