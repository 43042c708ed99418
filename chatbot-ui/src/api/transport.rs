//! Fetch-based HTTP transport

use async_trait::async_trait;
use gloo_net::http::Request;

use chatbot::api::{HttpRequest, HttpResponse, HttpTransport, Method};

/// Sends requests with the browser fetch API
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
        };

        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        let request = match &request.body {
            Some(body) => builder
                .json(body)
                .map_err(|e| format!("Request build error: {}", e))?,
            None => builder
                .build()
                .map_err(|e| format!("Request build error: {}", e))?,
        };

        let response = request
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {}", e))?;

        Ok(HttpResponse::new(status, body))
    }
}
