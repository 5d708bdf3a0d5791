use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use url::Url;

use crate::{error::NetError, types::Headers};

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, NetError>> + Send>>;

#[cfg_attr(any(test, feature = "test-utils"), unimock::unimock(api = NetMock))]
#[async_trait]
pub trait Net: Send + Sync {
    /// Get all bytes from a URL.
    async fn get_bytes(&self, url: Url, headers: Option<Headers>) -> Result<Bytes, NetError>;

    /// Stream bytes from a URL.
    async fn stream(&self, url: Url, headers: Option<Headers>) -> Result<ByteStream, NetError>;
}
