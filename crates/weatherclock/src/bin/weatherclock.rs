//! Weather Clock CLI
//!
//! Usage:
//!   weatherclock [render] [-o clock.svg]     # Draw the clock, SVG to stdout or file
//!   weatherclock forecast [-f table|json]    # Show the forecasts that would be drawn
//!   weatherclock numerals [-r radius]        # Print the static hour labels
//!   weatherclock --lat 59.33 --lon 18.07 ... # Skip IP geolocation

use argh::FromArgs;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use weatherclock::placement::{place_forecasts, WeatherPlacement};
use weatherclock::render::numeral_elements;
use weatherclock::{fetch_forecast, render_clock, Config};

/// Clock face showing the weather forecast for the next twelve hours
#[derive(FromArgs)]
struct Args {
    /// show version information
    #[argh(switch, short = 'V')]
    version: bool,

    /// path to the configuration file (default: <config dir>/weatherclock/config.yaml)
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// latitude to fetch the forecast for, overrides the config file
    #[argh(option)]
    lat: Option<f64>,

    /// longitude to fetch the forecast for, overrides the config file
    #[argh(option)]
    lon: Option<f64>,

    #[argh(subcommand)]
    command: Option<Command>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Render(RenderArgs),
    Forecast(ForecastArgs),
    Numerals(NumeralsArgs),
}

/// Draw the clock as SVG (default command)
#[derive(FromArgs, Default)]
#[argh(subcommand, name = "render")]
struct RenderArgs {
    /// write the SVG to this file instead of stdout
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

/// Show the forecasts in the display window
#[derive(FromArgs)]
#[argh(subcommand, name = "forecast")]
struct ForecastArgs {
    /// output format: table, json (default: table)
    #[argh(option, short = 'f', default = "OutputFormat::Table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format '{}', must be table or json", s)),
        }
    }
}

/// Print the twelve hour labels as SVG text elements
#[derive(FromArgs)]
#[argh(subcommand, name = "numerals")]
struct NumeralsArgs {
    /// distance of the labels from the clock center (default: from config)
    #[argh(option, short = 'r')]
    radius: Option<f64>,
}

fn load_config(args: &Args) -> weatherclock::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => match Config::default_path().filter(|p| p.exists()) {
            Some(path) => {
                log::info!("Using config file {}", path.display());
                Config::from_file(path)?
            }
            None => {
                log::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    if args.lat.is_some() || args.lon.is_some() {
        config.location.latitude = args.lat.or(config.location.latitude);
        config.location.longitude = args.lon.or(config.location.longitude);
        config.validate()?;
    }

    Ok(config)
}

fn print_numerals(radius: f64) {
    for (hour, element) in numeral_elements(radius).iter().enumerate() {
        if hour % 3 == 0 {
            println!();
        }
        println!("   {}", element.to_svg());
    }
}

fn print_forecast_table(placements: &[WeatherPlacement], now: &DateTime<Local>) {
    println!(
        "{:<6} {:>6} {:>7} {:>8} {:>7}",
        "TIME", "SPAN", "TEMP", "WIND", "SYMBOL"
    );
    let tz = now.timezone();
    for placement in placements {
        let time = DateTime::from_timestamp(placement.timestamp, 0)
            .map(|t| t.with_timezone(&tz).format("%H:%M").to_string())
            .unwrap_or_else(|| "?".to_string());
        let forecast = &placement.forecast;
        println!(
            "{:<6} {:>5}h {:>7} {:>8} {:>7}",
            time,
            forecast.span_hours,
            forecast
                .celsius
                .map(|c| format!("{:.1}°C", c))
                .unwrap_or_else(|| "-".to_string()),
            forecast
                .wind_m_s
                .map(|w| format!("{:.1}m/s", w))
                .unwrap_or_else(|| "-".to_string()),
            forecast
                .symbol
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }
}

async fn run(args: Args) -> weatherclock::Result<()> {
    let config = load_config(&args)?;

    match args.command.unwrap_or(Command::Render(RenderArgs::default())) {
        Command::Numerals(numerals) => {
            print_numerals(numerals.radius.unwrap_or(config.render.hour_radius));
        }
        Command::Forecast(forecast) => {
            let (_, table) = fetch_forecast(&config).await?;
            let now = Local::now();
            let placements = place_forecasts(&table, &now);
            match forecast.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&placements)?),
                OutputFormat::Table => print_forecast_table(&placements, &now),
            }
        }
        Command::Render(render) => {
            let (_, table) = fetch_forecast(&config).await?;
            let svg = render_clock(&table, &Local::now(), &config);
            match render.output {
                Some(path) => {
                    std::fs::write(&path, svg)?;
                    log::info!("Wrote clock to {}", path.display());
                }
                None => print!("{}", svg),
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Logs go to stderr, keeping stdout for the SVG.
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();

    if args.version {
        println!("weatherclock {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(e) = run(args).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
