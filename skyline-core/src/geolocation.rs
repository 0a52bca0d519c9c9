//! Auto-detection of the user's city.
//!
//! Detection never fails outward: every error collapses to "no city".

use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

use crate::{error::GeolocationError, model::Coordinates, provider::ReverseGeocoder};

/// Upper bound on waiting for a position fix.
pub const POSITION_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// No location service on this host.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPosition;

#[async_trait]
impl PositionSource for NoPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unavailable)
    }
}

/// Position supplied up front, e.g. from the command line or config.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

#[derive(Debug)]
pub struct GeolocationResolver<P, G> {
    position: P,
    geocoder: G,
    timeout: Duration,
}

impl<P: PositionSource, G: ReverseGeocoder> GeolocationResolver<P, G> {
    pub fn new(position: P, geocoder: G) -> Self {
        Self {
            position,
            geocoder,
            timeout: POSITION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Name of the place the host is at, or `None` if it can't be told.
    pub async fn detect_city(&self) -> Option<String> {
        let coordinates = match self.locate().await {
            Ok(c) => c,
            Err(err) => {
                tracing::debug!(error = %err, "No position for city auto-detect");
                return None;
            }
        };

        match self.geocoder.reverse_geocode(coordinates).await {
            Ok(Some(name)) => {
                tracing::info!(city = %name, "Auto-detected city");
                Some(name)
            }
            Ok(None) => {
                tracing::debug!(?coordinates, "Reverse geocode returned no place");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "Reverse geocode failed");
                None
            }
        }
    }

    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        tokio::time::timeout(self.timeout, self.position.current_position())
            .await
            .map_err(|_| GeolocationError::Timeout)?
    }
}
