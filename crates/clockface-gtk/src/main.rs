use anyhow::Context;
use clap::Parser;
use clockface::{ClockFace, TimeValue, ZoneOffset};
use clockface_gtk::config::{self, Overrides};
use clockface_gtk::gui::app::{AppInit, AppModel};
use clockface_gtk::sys::runtime;
use relm4::prelude::*;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Time to start at, as HH:MM (defaults to the current UTC time)
    #[arg(short = 't', long, value_parser = parse_time)]
    time: Option<TimeValue>,

    /// Offset of the displayed time, e.g. "+05:30" or "-8"
    #[arg(short = 'o', long, allow_hyphen_values = true)]
    offset: Option<ZoneOffset>,

    /// Let the minute hand rest between minutes while dragging
    #[arg(short = 's', long)]
    smooth: bool,

    /// Write the default config file and exit
    #[arg(long)]
    write_config: bool,
}

fn parse_time(s: &str) -> Result<TimeValue, String> {
    let (hour, minute) = s
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM, got '{}'", s))?;
    let hour: i64 = hour.trim().parse().map_err(|e| format!("bad hour: {}", e))?;
    let minute: i64 = minute
        .trim()
        .parse()
        .map_err(|e| format!("bad minute: {}", e))?;
    Ok(TimeValue::new(hour, minute))
}

fn current_utc_time() -> TimeValue {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    TimeValue::new(0, (seconds / 60 % 1440) as i64)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.write_config {
        let path = config::write_default_config().context("Failed to write default config")?;
        println!("{}", path.display());
        return Ok(());
    }

    let overrides = Overrides {
        offset: args.offset,
        smooth: args.smooth,
    };
    let mut config = config::load_or_default();
    overrides.apply(&mut config);

    let mut face =
        ClockFace::new(config.style, config.behavior).context("Invalid clock settings")?;
    face.set_time_value(args.time.unwrap_or_else(current_utc_time), false);

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    // clap has already consumed the arguments
    let app = RelmApp::new("org.clockface.demo").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        face,
        overrides,
        rx,
    });
    Ok(())
}
