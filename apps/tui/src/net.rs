use std::time::Duration;

use census_map_core::config::CensusConfig;
use census_map_core::geojson::FeatureCollection;
use census_map_core::overlay::parse_feature_collection;
use census_map_core::{LanguageTable, LoadError, LookupError, LookupOutcome, LookupQuery};

use crate::config::LayerSource;

/// Native HTTP side of the map: overlay documents and census lookups.
#[derive(Debug, Clone)]
pub struct CensusClient {
    http: reqwest::Client,
    census: CensusConfig,
}

impl CensusClient {
    pub fn new(census: CensusConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(census.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, census })
    }

    pub async fn fetch_layer(&self, source: &LayerSource) -> Result<FeatureCollection, LoadError> {
        let text = match source {
            LayerSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| LoadError::Network(format!("{}: {e}", path.display())))?,
            LayerSource::Http(url) => {
                let response = self
                    .http
                    .get(url)
                    .header("Content-Type", "application/json")
                    .send()
                    .await
                    .map_err(|e| LoadError::Network(e.to_string()))?;
                if !response.status().is_success() {
                    return Err(LoadError::Network(format!("{url}: HTTP {}", response.status())));
                }
                response
                    .text()
                    .await
                    .map_err(|e| LoadError::Network(e.to_string()))?
            }
        };

        parse_feature_collection(&text)
    }

    /// One best-effort request; failures come back as the `Err` arm.
    pub async fn lookup(&self, query: &LookupQuery) -> LookupOutcome {
        let url = query.url(&self.census);
        log::debug!("census lookup {}", query.scope());

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(LookupError::Network(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        // The API answers unknown geographies with a 4xx and a plain-text body.
        if status.is_client_error() {
            return Err(LookupError::Parse(format!("HTTP {status}: {}", body.trim())));
        }

        LanguageTable::from_response(&body, &query.scope())
    }
}
