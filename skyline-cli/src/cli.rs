use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, Select};
use skyline_core::{
    Config, Coordinates, Dashboard, FixedPosition, GeolocationResolver, HealthLevel, NoPosition,
    OpenWeatherClient, WeatherSource,
    cities::{self, MAP_CITIES, SUPPORTED_CITIES},
    load_aqi_map,
    provider::provider_from_config,
    view::pollutant_rows,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyline", version, about = "Weather and air-quality dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default city.
    Configure,

    /// Show current weather, AQI and forecast.
    Show {
        /// City to show; must be one of the supported cities.
        #[arg(long)]
        city: Option<String>,

        /// Latitude used to auto-detect the city.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude used to auto-detect the city.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Skip auto-detection and start from the default city.
        #[arg(long)]
        no_detect: bool,
    },

    /// AQI snapshot for the map cities.
    Map,

    /// Pollutant breakdown for any city name.
    Pollutants {
        /// City name, resolved through geocoding.
        city: String,
    },

    /// List supported cities.
    Cities,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                lat,
                lon,
                no_detect,
            } => {
                let config = Config::load()?;
                let position = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                show(&config, city.as_deref(), position, no_detect).await
            }
            Command::Map => {
                let client = provider_from_config(&Config::load()?)?;
                let map = load_aqi_map(&client, MAP_CITIES).await;
                print!("{}", render::aqi_map(&map));
                Ok(())
            }
            Command::Pollutants { city } => {
                let client = provider_from_config(&Config::load()?)?;
                pollutants(&client, &city).await
            }
            Command::Cities => {
                for city in SUPPORTED_CITIES {
                    println!("{city}");
                }
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let start = SUPPORTED_CITIES
        .iter()
        .position(|c| *c == config.initial_city())
        .unwrap_or(0);
    let city = Select::new("Default city:", SUPPORTED_CITIES.to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read default city")?;
    config.set_default_city(city)?;

    let set_home = Confirm::new("Set a home position for city auto-detect?")
        .with_default(config.home.is_some())
        .prompt()?;
    config.home = if set_home {
        let lat = CustomType::<f64>::new("Latitude:").prompt()?;
        let lon = CustomType::<f64>::new("Longitude:").prompt()?;
        Some(Coordinates::new(lat, lon))
    } else {
        None
    };

    config.save()?;
    tracing::debug!(
        default_city = config.initial_city(),
        home = ?config.home,
        "Stored configuration"
    );
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    config: &Config,
    city: Option<&str>,
    position: Option<Coordinates>,
    no_detect: bool,
) -> anyhow::Result<()> {
    let selected = city
        .map(|c| {
            cities::canonical(c).ok_or_else(|| {
                anyhow!(
                    "Unsupported city '{c}'. Supported cities: {}.",
                    SUPPORTED_CITIES.join(", ")
                )
            })
        })
        .transpose()?;

    let client = Arc::new(provider_from_config(config)?);
    let mut dashboard = Dashboard::new(Arc::clone(&client), config.initial_city());
    dashboard.start();

    if no_detect {
        tracing::debug!("City auto-detect disabled");
    } else {
        match detect_position(position, config.home) {
            Some(coordinates) => {
                dashboard.spawn_auto_detect(GeolocationResolver::new(
                    FixedPosition(coordinates),
                    Arc::clone(&client),
                ));
            }
            None => {
                dashboard.spawn_auto_detect(GeolocationResolver::new(
                    NoPosition,
                    Arc::clone(&client),
                ));
            }
        }
    }

    if let Some(city) = selected {
        dashboard.select_city(city);
    }

    dashboard.settle().await;
    print!("{}", render::dashboard(&dashboard.view()));
    Ok(())
}

/// Position used for auto-detect; command-line coordinates win over `home`.
fn detect_position(flags: Option<Coordinates>, home: Option<Coordinates>) -> Option<Coordinates> {
    let position = flags.or(home);
    match (position, flags.is_some()) {
        (Some(coordinates), true) => {
            tracing::debug!(?coordinates, "Auto-detect position from command line")
        }
        (Some(coordinates), false) => {
            tracing::debug!(?coordinates, "Auto-detect position from configured home")
        }
        (None, _) => tracing::debug!("No position available for city auto-detect"),
    }
    position
}

async fn pollutants(client: &OpenWeatherClient, city: &str) -> anyhow::Result<()> {
    let coordinates = client
        .geocode_city(city)
        .await
        .with_context(|| format!("Failed to locate '{city}'"))?;
    let reading = client
        .fetch_aqi(coordinates)
        .await
        .with_context(|| format!("Failed to fetch AQI for '{city}'"))?;

    let aqi = reading.normalized();
    let health = aqi
        .is_known()
        .then(|| HealthLevel::from_index(aqi.index.into()));
    let rows = pollutant_rows(Some(&reading.components));
    tracing::debug!(city, category = reading.category, "Fetched pollutant breakdown");

    print!("{}", render::pollutants(city, &aqi, health, &rows));
    Ok(())
}
