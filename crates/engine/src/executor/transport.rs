//! The seam between the engine and the network.

use async_trait::async_trait;
use http_resource_api::ResourceClient;
use http_resource_types::{InvocationResult, TransportRequest};

use crate::error::ResourceError;

/// Issue one request and return the raw status and body.
///
/// Implementations must not retry and must not judge the status code; both
/// are the runner's concern.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &TransportRequest) -> Result<InvocationResult, ResourceError>;
}

/// Transport backed by [`ResourceClient`], built per request for its TLS mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &TransportRequest) -> Result<InvocationResult, ResourceError> {
        let client = ResourceClient::new(&request.tls)?;
        Ok(client.execute(request).await?)
    }
}
