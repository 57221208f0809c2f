//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, ArchiveExtractor,
//! DocumentParser) but are themselves concrete structs, not traits.

mod artifacts;
mod convert;

pub use artifacts::{
    ArtifactWriter, IconReport, Metadata, WriteSummary, DEFAULTS_FILE, FIELDS_DIR, ICONS_DIR,
    METADATA_FILE, PRESETS_DIR, RAW_MODEL_FILE,
};
pub use convert::{ConvertReport, ConvertService, LoadedModel};
