//! Manifest fetching.

use std::sync::Arc;

use tanbur_net::{Headers, Net};
use tracing::debug;
use url::Url;

use crate::{
    error::BuildResult,
    parsing::{Manifest, ManifestParser},
};

/// Fetches and parses the manifest for one build.
pub struct ManifestFetcher {
    net: Arc<dyn Net>,
    parser: Arc<dyn ManifestParser>,
    url: Url,
    headers: Option<Headers>,
}

impl ManifestFetcher {
    pub fn new(
        net: Arc<dyn Net>,
        parser: Arc<dyn ManifestParser>,
        url: Url,
        user_agent: &str,
    ) -> Self {
        let mut headers = Headers::new();
        headers.insert("User-Agent", user_agent);
        Self {
            net,
            parser,
            url,
            headers: Some(headers),
        }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// One round trip: GET the manifest and parse it.
    pub async fn fetch(&self) -> BuildResult<Manifest> {
        debug!(url = %self.url, "fetching manifest");
        let body = self
            .net
            .get_bytes(self.url.clone(), self.headers.clone())
            .await?;
        let manifest = self.parser.parse(&body)?;
        debug!(
            url = %self.url,
            master = manifest.is_master(),
            "manifest parsed"
        );
        Ok(manifest)
    }
}
