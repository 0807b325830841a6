use hllrcon_registry::{MapCatalog, parse_map_list};
use hllrcon_types::{DispatchOutcome, HttpMethod, OutboundRequest};
use tracing::{info, warn};

use crate::transport::RequestTransport;

pub const MAPS_PATH: &str = "/api/v2/maps";

/// Fetch the map-name list and publish it to `catalog`.
///
/// Returns the parsed names. A failed fetch leaves the catalog untouched and
/// is only logged; map selectors stay pending.
pub async fn load_maps(transport: &dyn RequestTransport, catalog: &MapCatalog) -> Result<Vec<String>, String> {
    let outcome = transport.send(&OutboundRequest::new(HttpMethod::Get, MAPS_PATH)).await;
    let body = match outcome {
        DispatchOutcome::Success { body, .. } => body,
        DispatchOutcome::HttpError { status, .. } => {
            warn!(status, "failed to load map list");
            return Err(format!("map list request failed with status {status}"));
        }
        DispatchOutcome::TransportError { message } => {
            warn!(error = %message, "failed to load map list");
            return Err(message);
        }
    };

    let maps = parse_map_list(&body);
    info!(count = maps.len(), "map list loaded");
    catalog.replace(maps.clone());
    Ok(maps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::RecordingTransport;

    #[tokio::test]
    async fn publishes_parsed_list() {
        let transport = RecordingTransport::replying([DispatchOutcome::from_status(200, "foy_warfare\n\nkursk_warfare\nfoy_warfare\n".into())]);
        let catalog = MapCatalog::new();

        let maps = load_maps(&transport, &catalog).await.expect("load");

        assert_eq!(maps, vec!["foy_warfare", "kursk_warfare"]);
        assert_eq!(catalog.snapshot().as_deref(), Some(&maps[..]));
        assert_eq!(transport.requests()[0].path, MAPS_PATH);
    }

    #[tokio::test]
    async fn failure_leaves_catalog_unloaded() {
        let transport = RecordingTransport::replying([DispatchOutcome::TransportError {
            message: "connection refused".into(),
        }]);
        let catalog = MapCatalog::new();

        assert!(load_maps(&transport, &catalog).await.is_err());
        assert!(!catalog.is_loaded());
    }
}
