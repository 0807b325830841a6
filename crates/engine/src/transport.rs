use async_trait::async_trait;
use hllrcon_api::ConsoleClient;
use hllrcon_types::{DispatchOutcome, OutboundRequest};
use hllrcon_util::send_request;

/// Issues exactly one HTTP request and classifies the result.
#[async_trait]
pub trait RequestTransport: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> DispatchOutcome;
}

#[async_trait]
impl RequestTransport for ConsoleClient {
    async fn send(&self, request: &OutboundRequest) -> DispatchOutcome {
        send_request(self, request).await
    }
}
