use std::sync::Arc;

use slotwise_core::{SlotwiseConnector, SlotwiseError};
use slotwise_middleware::ConnectorBuilder as GenericConnectorBuilder;
use slotwise_types::CacheConfig;

use crate::OctopusConnector;

/// Builder type alias specialized for Octopus connectors.
pub type OctopusConnectorBuilder = GenericConnectorBuilder;

impl OctopusConnector {
    /// Returns an unconfigured builder around the default connector.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn builder() -> Result<OctopusConnectorBuilder, SlotwiseError> {
        let raw: Arc<dyn SlotwiseConnector> = Arc::new(Self::new_default()?);
        Ok(GenericConnectorBuilder::new(raw))
    }

    /// Returns a builder with the response cache enabled using default TTLs.
    ///
    /// Agile rates for the next day are published once, so repeated runs
    /// within the tariff TTL reuse the first answer.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn cached() -> Result<OctopusConnectorBuilder, SlotwiseError> {
        Ok(Self::builder()?.with_cache(&CacheConfig::default()))
    }
}
