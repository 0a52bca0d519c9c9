//! Dashboard state controller.
//!
//! [`DashboardState`] is the only owner of mutable dashboard state. It is
//! driven by [`Message`]s and answers with [`Command`]s (network fetches) that
//! [`Dashboard`] runs as tasks. Every fetch carries the generation it was
//! issued for; a result whose generation is no longer current belongs to a
//! previous city selection and is dropped.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::{
    cities,
    error::FetchError,
    geolocation::{GeolocationResolver, PositionSource},
    model::{AqiReading, Coordinates, ForecastPoint, WeatherSnapshot},
    provider::{ReverseGeocoder, WeatherSource},
    view::DashboardView,
};

/// Progress of one piece of dashboard data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Load<T> {
    #[default]
    Pending,
    Ready(T),
    /// The fetch failed; shown as a placeholder, never as old data.
    Unavailable,
}

impl<T> Load<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Load::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Load::Pending)
    }
}

#[derive(Debug)]
pub enum Message {
    /// Outcome of the one-time startup auto-detect.
    CityDetected(Option<String>),
    CitySelected(String),
    WeatherLoaded {
        generation: u64,
        result: Result<WeatherSnapshot, FetchError>,
    },
    AqiLoaded {
        generation: u64,
        result: Result<AqiReading, FetchError>,
    },
    ForecastLoaded {
        generation: u64,
        result: Result<Vec<ForecastPoint>, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchWeather { generation: u64, city: String },
    FetchForecast { generation: u64, city: String },
    FetchAqi { generation: u64, coordinates: Coordinates },
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    selected_city: String,
    generation: u64,
    auto_detect_done: bool,
    manually_selected: bool,
    weather: Load<WeatherSnapshot>,
    reading: Load<AqiReading>,
    forecast: Load<Vec<ForecastPoint>>,
}

impl DashboardState {
    pub fn new(initial_city: impl Into<String>) -> Self {
        Self {
            selected_city: initial_city.into(),
            generation: 0,
            auto_detect_done: false,
            manually_selected: false,
            weather: Load::Pending,
            reading: Load::Pending,
            forecast: Load::Pending,
        }
    }

    pub fn selected_city(&self) -> &str {
        &self.selected_city
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn weather(&self) -> &Load<WeatherSnapshot> {
        &self.weather
    }

    pub fn reading(&self) -> &Load<AqiReading> {
        &self.reading
    }

    pub fn forecast(&self) -> &Load<Vec<ForecastPoint>> {
        &self.forecast
    }

    /// Initial load for the starting city.
    pub fn start(&mut self) -> Vec<Command> {
        self.begin_load()
    }

    pub fn update(&mut self, msg: Message) -> Vec<Command> {
        match msg {
            Message::CityDetected(detected) => self.on_detected(detected),
            Message::CitySelected(city) => {
                self.manually_selected = true;
                self.select(city)
            }
            Message::WeatherLoaded { generation, result } => {
                if self.is_stale(generation, "weather") {
                    return Vec::new();
                }
                match result {
                    Ok(weather) => {
                        let coordinates = weather.coordinates;
                        self.weather = Load::Ready(weather);
                        vec![Command::FetchAqi {
                            generation,
                            coordinates,
                        }]
                    }
                    Err(err) => {
                        // AQI needs the weather coordinates; it stays pending.
                        tracing::error!(
                            city = %self.selected_city,
                            error = %err,
                            "Error fetching weather"
                        );
                        self.weather = Load::Unavailable;
                        Vec::new()
                    }
                }
            }
            Message::AqiLoaded { generation, result } => {
                if self.is_stale(generation, "aqi") {
                    return Vec::new();
                }
                self.reading = match result {
                    Ok(reading) => Load::Ready(reading),
                    Err(err) => {
                        tracing::error!(
                            city = %self.selected_city,
                            error = %err,
                            "Error fetching AQI"
                        );
                        Load::Unavailable
                    }
                };
                Vec::new()
            }
            Message::ForecastLoaded { generation, result } => {
                if self.is_stale(generation, "forecast") {
                    return Vec::new();
                }
                self.forecast = match result {
                    Ok(points) => Load::Ready(points),
                    Err(err) => {
                        tracing::error!(
                            city = %self.selected_city,
                            error = %err,
                            "Error fetching forecast"
                        );
                        Load::Unavailable
                    }
                };
                Vec::new()
            }
        }
    }

    fn on_detected(&mut self, detected: Option<String>) -> Vec<Command> {
        if self.auto_detect_done {
            tracing::debug!("Ignoring repeated auto-detect result");
            return Vec::new();
        }
        self.auto_detect_done = true;

        let Some(city) = detected else {
            return Vec::new();
        };
        if self.manually_selected {
            tracing::debug!(city = %city, "City already chosen, ignoring auto-detect");
            return Vec::new();
        }
        if !cities::is_supported(&city) {
            tracing::info!(
                city = %city,
                "Detected city is not supported, keeping {}",
                self.selected_city
            );
            return Vec::new();
        }
        self.select(city)
    }

    fn select(&mut self, city: String) -> Vec<Command> {
        if city == self.selected_city {
            return Vec::new();
        }
        tracing::info!(from = %self.selected_city, to = %city, "City changed");
        self.selected_city = city;
        self.begin_load()
    }

    fn begin_load(&mut self) -> Vec<Command> {
        self.generation += 1;
        self.weather = Load::Pending;
        self.reading = Load::Pending;
        self.forecast = Load::Pending;

        vec![
            Command::FetchWeather {
                generation: self.generation,
                city: self.selected_city.clone(),
            },
            Command::FetchForecast {
                generation: self.generation,
                city: self.selected_city.clone(),
            },
        ]
    }

    fn is_stale(&self, generation: u64, what: &'static str) -> bool {
        let stale = generation != self.generation;
        if stale {
            tracing::debug!(
                what,
                generation,
                current = self.generation,
                "Discarding stale result"
            );
        }
        stale
    }
}

/// Reports one task's message back to the dashboard. A task that dies before
/// sending (a panic) reports `None` on drop so it is still counted as done.
struct Completion {
    tx: mpsc::UnboundedSender<Option<Message>>,
    sent: bool,
}

impl Completion {
    fn new(tx: &mpsc::UnboundedSender<Option<Message>>) -> Self {
        Self {
            tx: tx.clone(),
            sent: false,
        }
    }

    fn send(mut self, msg: Message) {
        self.sent = true;
        // Receiver lives as long as the dashboard.
        let _ = self.tx.send(Some(msg));
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if !self.sent {
            let _ = self.tx.send(None);
        }
    }
}

/// Runs [`DashboardState`] commands on the tokio runtime.
#[derive(Debug)]
pub struct Dashboard<S> {
    source: Arc<S>,
    state: DashboardState,
    tx: mpsc::UnboundedSender<Option<Message>>,
    rx: mpsc::UnboundedReceiver<Option<Message>>,
    in_flight: usize,
}

impl<S: WeatherSource + 'static> Dashboard<S> {
    pub fn new(source: Arc<S>, initial_city: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            state: DashboardState::new(initial_city),
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::from_state(&self.state)
    }

    /// Kick off loading the initial city.
    pub fn start(&mut self) {
        let commands = self.state.start();
        self.run_all(commands);
    }

    /// Run auto-detect once in the background; its result arrives as a message.
    pub fn spawn_auto_detect<P, G>(&mut self, resolver: GeolocationResolver<P, G>)
    where
        P: PositionSource + 'static,
        G: ReverseGeocoder + 'static,
    {
        self.in_flight += 1;
        let done = Completion::new(&self.tx);
        tokio::spawn(async move {
            let detected = resolver.detect_city().await;
            done.send(Message::CityDetected(detected));
        });
    }

    pub fn select_city(&mut self, city: impl Into<String>) {
        self.apply(Message::CitySelected(city.into()));
    }

    pub fn apply(&mut self, msg: Message) {
        let commands = self.state.update(msg);
        self.run_all(commands);
    }

    /// Handle the next finished task. Returns `false` once nothing is in flight.
    pub async fn next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(Some(msg)) => {
                self.in_flight -= 1;
                self.apply(msg);
                true
            }
            Some(None) => {
                self.in_flight -= 1;
                tracing::error!("Dashboard task ended without a result");
                true
            }
            None => false,
        }
    }

    /// Handle messages until every issued fetch has reported back.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    fn run_all(&mut self, commands: Vec<Command>) {
        for command in commands {
            self.run(command);
        }
    }

    fn run(&mut self, command: Command) {
        self.in_flight += 1;
        let source = Arc::clone(&self.source);
        let done = Completion::new(&self.tx);

        tokio::spawn(async move {
            let msg = match command {
                Command::FetchWeather { generation, city } => Message::WeatherLoaded {
                    generation,
                    result: source.fetch_weather(&city).await,
                },
                Command::FetchForecast { generation, city } => Message::ForecastLoaded {
                    generation,
                    result: source.fetch_forecast(&city).await,
                },
                Command::FetchAqi {
                    generation,
                    coordinates,
                } => Message::AqiLoaded {
                    generation,
                    result: source.fetch_aqi(coordinates).await,
                },
            };
            done.send(msg);
        });
    }
}
