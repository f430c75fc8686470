use std::path::PathBuf;

use clap::Args;
use getset_core::{Catalog, Config, RechargePlanner, SlotBook};

use super::input;

#[derive(Args)]
pub struct SuggestArgs {
    /// Catalog JSON file
    #[arg(long)]
    catalog: PathBuf,
    /// Calendar events JSON file
    #[arg(long)]
    events: PathBuf,
    /// Plan from this local time instead of now
    #[arg(long)]
    at: Option<String>,
    /// Maximum number of suggestions
    #[arg(long, default_value_t = 3)]
    limit: usize,
    /// Put every suggestion on the calendar and print the placed slots
    #[arg(long)]
    place: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let catalog = Catalog::load(&args.catalog)?;
    let events = input::read_timeline(&args.events)?;
    let now = input::at_or_now(args.at.as_deref())?;

    let planner = RechargePlanner::from_config(&config).with_max_suggestions(args.limit);
    let mut slots = SlotBook::new();
    let suggestions = planner.suggest(now, &catalog, &events, &slots);

    if args.place {
        let placed = suggestions
            .iter()
            .map(|s| planner.place(s, &mut slots))
            .collect::<Result<Vec<_>, _>>()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&placed)?);
        } else {
            for slot in &placed {
                println!(
                    "{}\t{}-{}\t{}",
                    slot.id,
                    slot.start.format("%H:%M"),
                    slot.end.format("%H:%M"),
                    slot.label.as_deref().unwrap_or(&slot.category)
                );
            }
        }
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else if suggestions.is_empty() {
        println!("no suggestions");
    } else {
        for s in &suggestions {
            println!(
                "{}-{}\t{}\t{}",
                s.start.format("%H:%M"),
                s.end.format("%H:%M"),
                s.action.label,
                s.action.category
            );
        }
    }
    Ok(())
}
