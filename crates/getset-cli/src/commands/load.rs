use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Args;
use getset_core::{CalendarEvent, DayLoad, EventBook, EventSource};

use super::input;

#[derive(Args)]
pub struct LoadArgs {
    /// Calendar events JSON file
    #[arg(long)]
    events: PathBuf,
    /// Day to summarise (defaults to today)
    #[arg(long)]
    date: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Summarise the events of one day from a calendar file.
pub(super) fn day_load(events: &Path, date: Option<&str>) -> Result<DayLoad, Box<dyn std::error::Error>> {
    let date = input::date_or_today(date)?;

    let mut by_source: BTreeMap<EventSource, Vec<CalendarEvent>> = BTreeMap::new();
    for event in input::read_events(events)? {
        by_source.entry(event.source).or_default().push(event);
    }
    let mut book = EventBook::new();
    for (source, events) in by_source {
        book.replace_source(source, events);
    }
    Ok(DayLoad::from_events(date, book.on_date(date)))
}

pub fn run(args: LoadArgs) -> Result<(), Box<dyn std::error::Error>> {
    let load = day_load(&args.events, args.date.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&load)?);
        return Ok(());
    }
    println!("date:      {}", load.date);
    println!("events:    {}", load.event_count);
    println!("hours:     {:.1}", load.total_hours());
    match load.peak_intensity {
        Some(peak) => println!("peak:      {} ({})", peak.value(), peak.label()),
        None => println!("peak:      -"),
    }
    println!("mean:      {:.1}", load.mean_intensity);
    Ok(())
}
