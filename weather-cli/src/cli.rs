use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use route_weather_core::{
    Config, ForecastHorizon, LocationQuery, Route, client_from_config, route::fetch_route,
};

use crate::charts;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "route-weather", version, about = "Compare weather along a route")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the AccuWeather API key and language.
    Configure,

    /// Show current conditions and whether the weather is good or bad.
    Current {
        /// City name or "lat,lon".
        location: String,
    },

    /// Show the daily forecast.
    Forecast {
        /// City name or "lat,lon".
        location: String,

        /// Number of days, at most 5.
        #[arg(long, default_value_t = 5)]
        days: usize,
    },

    /// Compare forecasts along a route and render charts.
    Route {
        /// Origin city.
        #[arg(long)]
        from: String,

        /// Intermediate cities, comma-separated.
        #[arg(long)]
        via: Option<String>,

        /// Destination city.
        #[arg(long)]
        to: String,

        /// Forecast horizon: 1, 3 or 5 days.
        #[arg(long, default_value = "1", value_parser = parse_horizon)]
        days: ForecastHorizon,

        /// Directory for the charts and index.html.
        #[arg(long, default_value = "route-weather")]
        out: PathBuf,
    },
}

fn parse_horizon(s: &str) -> Result<ForecastHorizon, String> {
    let days: u8 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number of days"))?;
    ForecastHorizon::try_from(days).map_err(|e| e.to_string())
}

impl Cli {
    /// `configure` must still work when the stored config is unreadable, since
    /// it is how the file gets rewritten. Every other command needs it intact.
    pub fn config_for(&self, loaded: anyhow::Result<Config>) -> anyhow::Result<Config> {
        match (&self.command, loaded) {
            (_, Ok(config)) => Ok(config),
            (Command::Configure, Err(e)) => {
                eprintln!("Warning: ignoring unreadable configuration: {e:#}");
                Ok(Config::default())
            }
            (_, Err(e)) => Err(e),
        }
    }

    pub async fn run(self, mut config: Config) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => {
                let api_key = Password::new("AccuWeather API key:")
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;
                let language = Text::new("Language for condition descriptions:")
                    .with_default(&config.language)
                    .prompt()
                    .context("Failed to read language")?;

                config.set_api_key(api_key);
                config.language = language.trim().to_string();
                config.save()?;

                let path = Config::config_file_path()?;
                println!("Saved configuration to {}", path.display());
            }
            Command::Current { location } => {
                let client = client_from_config(&config)?;
                let query: LocationQuery = location.parse()?;
                let current = client.get_current(&query).await?;
                let s = &current.snapshot;

                println!("{} ({})", current.location.name, current.location.key);
                println!("  Temperature:  {:.1} °C", s.temperature_c);
                println!("  Humidity:     {:.0} %", s.humidity_pct);
                println!("  Wind:         {:.1} km/h", s.wind_speed_kmh);
                println!("  Rain chance:  {:.0} %", s.rain_probability);
                println!("  {}", s.summary());
            }
            Command::Forecast { location, days } => {
                let client = client_from_config(&config)?;
                let query: LocationQuery = location.parse()?;
                let forecast = client.get_forecast(&query, days).await?;

                println!("{} ({})", forecast.location.name, forecast.location.key);
                for e in &forecast.entries {
                    print!(
                        "  {}  {:>5.1}..{:<5.1} °C",
                        e.date, e.temp_min_c, e.temp_max_c
                    );
                    print!("  wind {:>5.1} km/h", e.wind_speed_kmh);
                    print!("  rain {:>3.0} %", e.rain_probability);
                    println!("  humidity {:>3.0} %  {}", e.humidity_pct, e.description);
                }
            }
            Command::Route {
                from,
                via,
                to,
                days,
                out,
            } => {
                let route = Route::parse(&from, via.as_deref(), &to)?;
                let client = client_from_config(&config)?;

                let report = fetch_route(&client, &route, days).await?;
                let index = charts::render_report(&report, &out)?;

                println!("Route: {}", route.cities().join(" -> "));
                println!("Dashboard written to {}", index.display());
            }
        }

        Ok(())
    }
}
