use std::sync::Arc;

use roster::{AppsScriptSource, FieldMapping, RecordSource, UpstreamError};
use tracing::{info, warn};

use super::config::Config;

pub struct State {
    pub config: Config,
    pub mapping: FieldMapping,
    pub source: Option<Arc<dyn RecordSource>>,
}

impl State {
    pub fn new(config: Config) -> Result<Arc<Self>, UpstreamError> {
        let source: Option<Arc<dyn RecordSource>> = match &config.apps_script_url {
            Some(url) => {
                let remote = AppsScriptSource::new(url.as_str(), config.upstream_timeout)?;
                info!("Refreshing from {}", remote.url());

                Some(Arc::new(remote))
            }
            None => {
                warn!("APPS_SCRIPT_URL not set, /update will fail");
                None
            }
        };

        if config.api_key.is_none() {
            warn!("API_KEY not set, /update will reject every request");
        }

        Ok(Self::with_source(config, source))
    }

    pub fn with_source(config: Config, source: Option<Arc<dyn RecordSource>>) -> Arc<Self> {
        Arc::new(Self {
            config,
            mapping: FieldMapping::default(),
            source,
        })
    }
}
