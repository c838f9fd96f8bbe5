//! Offline road data from a saved Overpass `[out:json]` document.

use std::path::PathBuf;

use tracing::info;

use rr_core::BoundingBox;
use rr_spatial::RoadElement;

use crate::overpass::parse_elements;
use crate::{ProviderResult, RoadDataSource};

/// Serves the same element set for every request.
///
/// The bounding box is ignored: the file is assumed to already cover the
/// area of interest.  The file is re-read on every call so it can be
/// swapped without restarting.
#[derive(Debug, Clone)]
pub struct FileRoadSource {
    path: PathBuf,
}

impl FileRoadSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and decode the file synchronously.
    pub fn load(&self) -> ProviderResult<Vec<RoadElement>> {
        let body = std::fs::read(&self.path)?;
        parse_elements(&body)
    }
}

impl RoadDataSource for FileRoadSource {
    async fn fetch_elements(&self, bbox: BoundingBox) -> ProviderResult<Vec<RoadElement>> {
        let body = tokio::fs::read(&self.path).await?;
        let elements = parse_elements(&body)?;
        info!(path = %self.path.display(), %bbox, elements = elements.len(), "loaded road data from file");
        Ok(elements)
    }
}
