//! Configuration for the media catalog

use serde::{Deserialize, Serialize};

use crate::source::SourceFilter;

/// Configuration for the catalog engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Request image records from the source
    /// (animated images arrive as image records with a gif content type)
    pub include_images: bool,

    /// Request video records from the source
    pub include_videos: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            include_images: true,
            include_videos: true,
        }
    }
}

impl CatalogConfig {
    /// Create a config builder
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::new()
    }

    /// Derive the row filter handed to the storage source
    pub fn source_filter(&self) -> SourceFilter {
        SourceFilter {
            images: self.include_images,
            videos: self.include_videos,
        }
    }
}

/// Builder for CatalogConfig
#[derive(Debug, Default)]
pub struct CatalogConfigBuilder {
    config: CatalogConfig,
}

impl CatalogConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Request only image records (includes animated images)
    pub fn images_only(mut self) -> Self {
        self.config.include_images = true;
        self.config.include_videos = false;
        self
    }

    /// Request only video records
    pub fn videos_only(mut self) -> Self {
        self.config.include_images = false;
        self.config.include_videos = true;
        self
    }

    /// Enable or disable image records
    pub fn include_images(mut self, enabled: bool) -> Self {
        self.config.include_images = enabled;
        self
    }

    /// Enable or disable video records
    pub fn include_videos(mut self, enabled: bool) -> Self {
        self.config.include_videos = enabled;
        self
    }

    /// Build the config
    pub fn build(self) -> CatalogConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert!(config.include_images);
        assert!(config.include_videos);
        let filter = config.source_filter();
        assert!(filter.images && filter.videos);
    }

    #[test]
    fn test_config_builder() {
        let config = CatalogConfig::builder().videos_only().build();
        assert!(!config.include_images);
        assert!(config.include_videos);

        let config = CatalogConfig::builder().images_only().build();
        assert!(config.include_images);
        assert!(!config.include_videos);

        let config = CatalogConfig::builder()
            .include_images(false)
            .include_videos(false)
            .build();
        assert!(!config.source_filter().images);
        assert!(!config.source_filter().videos);
    }
}
