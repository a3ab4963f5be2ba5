//! SWE-Compass evaluation harness
//!
//! Prepares a host for benchmark evaluation by fetching the per-instance
//! Docker evaluation images ahead of time.
//!
//! ## Module Structure
//!
//! - `image`: image reference parsing
//! - `image_list`: line-delimited image list files
//! - `dataset`: derive an image list from a dataset JSONL
//! - `fetcher`: fetch capability and the Docker implementation
//! - `puller`: bounded-concurrency batch puller
//! - `summary`: outcomes and run counters
//! - `config`: TOML configuration
//! - `error`: error types

pub mod config;
pub mod dataset;
pub mod error;
pub mod fetcher;
pub mod image;
pub mod image_list;
pub mod puller;
pub mod summary;

pub use config::{HarnessConfig, PullConfig, PullOverrides};
pub use dataset::{collect_images, DatasetFilter, ImageListReport};
pub use error::{ConfigError, DatasetError, FetchError, ImageListError};
pub use fetcher::{DockerFetcher, Fetcher};
pub use image::ImageRef;
pub use image_list::{read_image_list, write_image_list, ListEntry};
pub use puller::{ImagePuller, NoopReporter, PullEvent, PullOptions, PullReporter};
pub use summary::{FetchOutcome, PullSummary};
