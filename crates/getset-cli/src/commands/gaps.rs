use std::path::PathBuf;

use clap::Args;
use getset_core::Config;

use super::input;

#[derive(Args)]
pub struct GapsArgs {
    /// Calendar events JSON file (array of event documents)
    #[arg(long)]
    events: PathBuf,
    /// Minimum gap length in minutes (defaults to gaps.min_gap_minutes).
    /// Zero-length gaps are never reported, even with --min 0.
    #[arg(long)]
    min: Option<i64>,
    /// Merge overlapping events before searching
    #[arg(long)]
    coalesce: bool,
    /// Day to search when the file has no events (defaults to today)
    #[arg(long)]
    date: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: GapsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut detector = config.gap_detector();
    if let Some(min) = args.min {
        detector = detector.with_min_gap(min);
    }
    if args.coalesce {
        detector = detector.with_coalescing(true);
    }

    let events = input::read_timeline(&args.events)?;
    let date = input::date_or_today(args.date.as_deref())?;
    let gaps = detector.find_gaps(&events, date);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&gaps)?);
    } else if gaps.is_empty() {
        println!("no free time");
    } else {
        for gap in &gaps {
            println!(
                "{}-{}\t{} min\t{}",
                gap.start.format("%H:%M"),
                gap.end.format("%H:%M"),
                gap.duration_minutes(),
                gap.size.as_str()
            );
        }
    }
    Ok(())
}
