#![forbid(unsafe_code)]

mod client;
mod error;
mod traits;
mod types;

pub use client::HttpClient;
pub use error::{NetError, NetResult};
pub use traits::{ByteStream, Net};
pub use types::{Headers, NetOptions};

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    pub use crate::traits::NetMock;
}
