//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::ConvertService;
use crate::config::Settings;
use crate::infrastructure::archive::ZipExtractor;
use crate::infrastructure::traits::{
    ArchiveExtractor, DocumentParser, FileSystem, RealFileSystem,
};
use crate::infrastructure::xml::QuickXmlParser;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Package extraction
    pub extractor: Arc<dyn ArchiveExtractor>,

    /// Model document parser
    pub parser: Arc<dyn DocumentParser>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(ZipExtractor),
            Arc::new(QuickXmlParser),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        extractor: Arc<dyn ArchiveExtractor>,
        parser: Arc<dyn DocumentParser>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            extractor,
            parser,
        }
    }

    pub fn convert_service(&self) -> ConvertService {
        ConvertService::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.extractor),
            Arc::clone(&self.parser),
            Arc::clone(&self.settings),
        )
    }
}
