use std::path::PathBuf;

use clap::Args;
use getset_core::Config;

#[derive(Args)]
pub struct BalanceArgs {
    /// Hours slept last night (defaults to balance.default_sleep_hours)
    #[arg(long)]
    sleep: Option<f64>,
    /// Number of events today
    #[arg(long, conflicts_with = "calendar")]
    events: Option<u32>,
    /// Total hours of events today
    #[arg(long, conflicts_with = "calendar")]
    hours: Option<f64>,
    /// Take event count and hours from a calendar file instead
    #[arg(long)]
    calendar: Option<PathBuf>,
    /// Day to read from the calendar file (defaults to today)
    #[arg(long, requires = "calendar")]
    date: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: BalanceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let calculator = config.balance_calculator();
    let sleep = args.sleep.unwrap_or(config.balance.default_sleep_hours);

    let status = match &args.calendar {
        Some(path) => super::load::day_load(path, args.date.as_deref())?.balance(sleep, &calculator),
        None => calculator.calculate(sleep, args.events.unwrap_or(0), args.hours.unwrap_or(0.0)),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }
    println!("score:     {} ({})", status.score, status.status);
    println!("sleep:     {:.1}", status.sleep_score);
    println!("events:    {:.1}", status.event_count_score);
    println!("schedule:  {:.1}", status.schedule_score);
    Ok(())
}
