//! Gateway shared state.

use std::sync::Arc;

use tannoy_agent::Announcer;
use tannoy_core::config::Config;
use tannoy_core::error::Result;
use tannoy_media::PcmFormat;

/// Read-only state shared by all requests.
pub struct GatewayState {
    pub config: Arc<Config>,
    pub announcer: Announcer,
    pub format: PcmFormat,
}

impl GatewayState {
    /// Fails if the config has errors (e.g. a zero channel count), so the
    /// gateway never advertises a format it cannot decode.
    pub fn new(config: Arc<Config>, announcer: Announcer) -> Result<Self> {
        config.ensure_valid()?;
        let format = PcmFormat::from_config(&config);
        Ok(Self {
            config,
            announcer,
            format,
        })
    }

    /// Build the state with Gemini clients from `config`.
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        config.ensure_valid()?;
        let announcer = Announcer::from_config(&config);
        Self::new(config, announcer)
    }
}
