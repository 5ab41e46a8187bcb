use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::TemplateError;

// 1. TemplateSource Contract
/// TemplateSource
///
/// Resolves a route's template path to its HTML fragment. A non-success
/// answer is an error, never an empty page.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn fetch(&self, template_path: &str) -> Result<String, TemplateError>;
}

// 2. The Real Implementation (HTTP)
/// HttpTemplateSource
///
/// Fetches templates from the server that hosts the `views/` directory.
#[derive(Clone)]
pub struct HttpTemplateSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTemplateSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, template_path: &str) -> String {
        format!("{}/{}", self.base_url, template_path.trim_start_matches('/'))
    }
}

#[async_trait]
impl TemplateSource for HttpTemplateSource {
    async fn fetch(&self, template_path: &str) -> Result<String, TemplateError> {
        let url = self.url_for(template_path);
        let transport = |source| TemplateError::Transport {
            path: template_path.to_string(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TemplateError::Status {
                path: template_path.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}

// 3. The In-Memory Implementation
/// StaticTemplateSource
///
/// Serves templates from a fixed map. Used by tests and by embedders that
/// bundle their views into the binary.
#[derive(Clone, Default)]
pub struct StaticTemplateSource {
    templates: HashMap<String, String>,
}

impl StaticTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, template_path: &str, html: &str) -> Self {
        self.templates
            .insert(template_path.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl TemplateSource for StaticTemplateSource {
    async fn fetch(&self, template_path: &str) -> Result<String, TemplateError> {
        self.templates
            .get(template_path)
            .cloned()
            .ok_or_else(|| TemplateError::Missing(template_path.to_string()))
    }
}

/// TemplateState
///
/// The concrete type used to share a template source with the content loader.
pub type TemplateState = Arc<dyn TemplateSource>;
