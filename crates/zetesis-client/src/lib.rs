pub mod blocking;
pub mod client;
pub mod config;
mod response;
mod retry;
pub mod streaming;

pub use client::AsyncClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use streaming::{Fragment, FragmentStream, Fragments};
