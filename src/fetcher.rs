//! Image fetch backends
//!
//! The puller only talks to a [`Fetcher`]. [`DockerFetcher`] is the real
//! implementation backed by the local Docker daemon.

use anyhow::Result;
use async_trait::async_trait;
use bollard::errors::Error as DockerError;
use bollard::image::CreateImageOptions;
use bollard::Docker;
use futures::StreamExt;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::image::ImageRef;

/// Capability to check for and fetch images into local storage
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Whether the image is already available locally
    async fn is_present(&self, image: &ImageRef) -> Result<bool, FetchError>;

    /// Fetch the image from its registry
    async fn fetch(&self, image: &ImageRef) -> Result<(), FetchError>;
}

/// Fetcher backed by the Docker Engine API
#[derive(Clone)]
pub struct DockerFetcher {
    docker: Docker,
}

impl DockerFetcher {
    /// Connect to the local Docker daemon and verify it responds
    pub async fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| anyhow::anyhow!("Failed to connect to Docker: {}", e))?;

        docker
            .ping()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to ping Docker: {}", e))?;

        info!("Connected to Docker daemon");
        Ok(Self { docker })
    }
}

#[async_trait]
impl Fetcher for DockerFetcher {
    async fn is_present(&self, image: &ImageRef) -> Result<bool, FetchError> {
        match self.docker.inspect_image(image.as_str()).await {
            Ok(_) => Ok(true),
            Err(DockerError::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(false),
            Err(e) => Err(FetchError::Docker(e)),
        }
    }

    async fn fetch(&self, image: &ImageRef) -> Result<(), FetchError> {
        let options = CreateImageOptions {
            from_image: image.repository(),
            tag: image.tag(),
            ..Default::default()
        };

        let mut stream = self.docker.create_image(Some(options), None, None);
        while let Some(result) = stream.next().await {
            match result {
                Ok(info) => {
                    if let Some(message) = info.error {
                        return Err(FetchError::Pull {
                            image: image.to_string(),
                            message,
                        });
                    }
                    if let Some(status) = info.status {
                        debug!("{}: {}", image, status);
                    }
                }
                Err(DockerError::DockerStreamError { error }) => {
                    return Err(FetchError::Pull {
                        image: image.to_string(),
                        message: error,
                    });
                }
                Err(e) => return Err(FetchError::Docker(e)),
            }
        }

        Ok(())
    }
}
