//! Embedder backed by an HTTP model server.
//!
//! Speaks the text-embeddings-inference `/embed` protocol: the request body is
//! `{"inputs": "<text>"}` and the response is a list with one vector per input.

use crate::embedder::Embedder;
use harfzaar_core::{Error, Result, Vector};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a str,
}

pub struct RemoteEmbedder {
    client: reqwest::blocking::Client,
    endpoint: String,
    dim: usize,
    model: String,
}

impl RemoteEmbedder {
    /// `base_url` is the server root; requests go to `{base_url}/embed`.
    pub fn new(base_url: &str, dim: usize, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("embedding client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embed", base_url.trim_end_matches('/')),
            dim,
            model: base_url.to_string(),
        })
    }
}

impl Embedder for RemoteEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        debug!("Requesting embedding from {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest { inputs: text })
            .send()
            .map_err(|e| Error::Internal(format!("embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Internal(format!(
                "embedding server returned HTTP {}",
                response.status()
            )));
        }

        let body: Vec<Vec<f32>> = response
            .json()
            .map_err(|e| Error::Internal(format!("invalid embedding response: {}", e)))?;

        first_embedding(body, self.dim)
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn first_embedding(body: Vec<Vec<f32>>, dim: usize) -> Result<Vector> {
    let data = body
        .into_iter()
        .next()
        .ok_or_else(|| Error::Internal("embedding server returned no vectors".to_string()))?;

    if data.len() != dim {
        return Err(Error::InvalidDimension {
            expected: dim,
            actual: data.len(),
        });
    }
    Ok(Vector::new(data))
}
