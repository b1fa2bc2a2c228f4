//! Best-effort player image existence checks.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::view::{PageView, SectionBody};

/// Decides whether an image URL should be shown or replaced by a placeholder.
pub trait ImageProbe: Send + Sync {
    /// `true` when the image is reachable. Never fails: any error is `false`.
    fn exists<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>>;
}

/// HEAD request probe backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpImageProbe {
    client: Arc<reqwest::Client>,
    timeout: Duration,
}

impl HttpImageProbe {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent(concat!("fcdash/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
            timeout,
        }
    }
}

impl ImageProbe for HttpImageProbe {
    fn exists<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            match self.client.head(url).timeout(self.timeout).send().await {
                Ok(response) => response.status().is_success(),
                Err(error) => {
                    debug!(url, %error, "image probe failed");
                    false
                }
            }
        })
    }
}

/// Probe that accepts every URL, for offline rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeExists;

impl ImageProbe for AssumeExists {
    fn exists<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        let _ = url;
        Box::pin(async { true })
    }
}

/// Replace every unreachable image of `view` with `placeholder`.
pub async fn resolve_images(view: &mut PageView, probe: &dyn ImageProbe, placeholder: &str) {
    for section in &mut view.sections {
        match &mut section.body {
            SectionBody::Images(cards) => {
                for card in cards {
                    if !probe.exists(&card.url).await {
                        card.url = placeholder.to_string();
                    }
                }
            }
            SectionBody::Players(picker) => {
                if let Some(detail) = &mut picker.detail {
                    if !probe.exists(&detail.action_image.url).await {
                        detail.action_image.url = placeholder.to_string();
                    }
                }
            }
            _ => {}
        }
    }
}
