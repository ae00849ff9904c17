//! Blocking `Transport` backed by ureq.
//!
//! Status codes are returned as data (`http_status_as_error(false)`) so the
//! normalizer, not ureq, decides what a failure looks like.

use ureq::{Agent, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::OperationError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::provider::Transport;

#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.request_timeout())
            .build()
            .new_agent();
        Self { agent }
    }
}

fn decorate<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.query_pairs(
        request
            .query
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    )
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, OperationError> {
        let url = request.path.as_str();
        let body = request.body.as_deref().unwrap_or_default().as_bytes();
        let result = match request.method {
            HttpMethod::Get => decorate(self.agent.get(url), &request).call(),
            HttpMethod::Delete => decorate(self.agent.delete(url), &request).call(),
            HttpMethod::Post => decorate(self.agent.post(url), &request).send(body),
            HttpMethod::Patch => decorate(self.agent.patch(url), &request).send(body),
        };
        let mut response = result.map_err(|e| {
            OperationError::no_response(format!("{} {url} failed: {e}", request.method))
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        // An unreadable body on a failed status still classifies by status.
        let body = match response.body_mut().read_to_string() {
            Ok(body) => body,
            Err(_) if !(200..300).contains(&status) => String::new(),
            Err(e) => {
                return Err(OperationError::no_response(format!(
                    "{} {url} body unreadable: {e}",
                    request.method
                )))
            }
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
