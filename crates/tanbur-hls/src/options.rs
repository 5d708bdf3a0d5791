//! Build configuration.

use tanbur_net::NetOptions;
use url::Url;

use crate::source::LoadControl;

/// Configuration for one renderer build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Manifest URL (master or media).
    pub url: Url,
    /// Sent as `User-Agent` on every request of this build.
    pub user_agent: String,
    /// Optional out-of-band WebVTT document.
    pub sidecar_url: Option<Url>,
    /// Optional restriction to a subset of variant indices.
    pub allow_list: Option<Vec<usize>>,
    pub load_control: LoadControl,
    pub net: NetOptions,
}

impl BuildConfig {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            user_agent: format!("tanbur/{}", env!("CARGO_PKG_VERSION")),
            sidecar_url: None,
            allow_list: None,
            load_control: LoadControl::default(),
            net: NetOptions::default(),
        }
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_sidecar_url(mut self, url: Url) -> Self {
        self.sidecar_url = Some(url);
        self
    }

    #[must_use]
    pub fn with_allow_list(mut self, indices: Vec<usize>) -> Self {
        self.allow_list = Some(indices);
        self
    }

    #[must_use]
    pub fn with_load_control(mut self, load_control: LoadControl) -> Self {
        self.load_control = load_control;
        self
    }

    #[must_use]
    pub fn with_net(mut self, net: NetOptions) -> Self {
        self.net = net;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = BuildConfig::new(Url::parse("https://cdn.example.com/main.m3u8").unwrap());
        assert!(config.user_agent.starts_with("tanbur/"));
        assert!(config.sidecar_url.is_none());
        assert!(config.allow_list.is_none());
        assert_eq!(config.load_control, LoadControl::default());
    }

    #[test]
    fn builder_style_overrides() {
        let config = BuildConfig::new(Url::parse("https://cdn.example.com/main.m3u8").unwrap())
            .with_user_agent("player/1.0")
            .with_sidecar_url(Url::parse("https://cdn.example.com/subs.vtt").unwrap())
            .with_allow_list(vec![0, 2]);

        assert_eq!(config.user_agent, "player/1.0");
        assert!(config.sidecar_url.is_some());
        assert_eq!(config.allow_list.as_deref(), Some(&[0, 2][..]));
    }
}
