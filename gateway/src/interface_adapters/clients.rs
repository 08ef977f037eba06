use crate::domain::{ApiRequest, ApiResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

// The clients defined here are reqwest clients talking to the backend.
// Thin wrapper that turns domain requests into reqwest calls.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let res = builder.send().await.map_err(map_error)?;
        let status = res.status();
        let headers = res.headers().clone();

        // Buffer the body so callers can inspect it after a retry decision.
        let body = res.bytes().await.map_err(map_error)?;

        Ok(ApiResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn map_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
