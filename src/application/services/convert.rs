//! Conversion service
//!
//! Stages a SMART package (zip, extracted directory, or a bare model file),
//! parses the model, runs the transformation and hands the result to the
//! artifact writer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tracing::{debug, info, instrument};

use crate::application::error_ext::IoResultExt;
use crate::application::hash::project_key;
use crate::application::services::artifacts::{ArtifactWriter, Metadata, WriteSummary};
use crate::application::transform::{transform, TransformOutput};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::UnresolvedReference;
use crate::infrastructure::traits::{ArchiveExtractor, DocumentParser, FileSystem};

/// Where the model comes from after staging.
#[derive(Debug)]
enum StagedSource {
    /// A directory holding the package contents
    Directory(PathBuf),
    /// A model file given directly; its directory holds the assets
    Document(PathBuf),
}

/// A parsed and transformed model together with its package location.
#[derive(Debug)]
pub struct LoadedModel {
    pub output: TransformOutput,
    /// Model document that was read
    pub model_path: PathBuf,
    /// Directory the package contents (icons) live in
    pub source_dir: PathBuf,
    /// Deterministic key derived from the model bytes
    pub project_key: String,
    /// Package name, from the source file name
    pub name: String,
    /// Extraction directory left on disk after the run
    pub kept_work_dir: Option<PathBuf>,
    // Held so a temporary extraction directory lives as long as the model
    _temp_dir: Option<TempDir>,
}

/// Extraction target for an archive.
enum WorkDir {
    Temporary(TempDir),
    Kept(PathBuf),
}

impl WorkDir {
    fn path(&self) -> &Path {
        match self {
            WorkDir::Temporary(temp) => temp.path(),
            WorkDir::Kept(dir) => dir,
        }
    }
}

/// Summary of one conversion.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub language: String,
    pub dest: PathBuf,
    pub written: WriteSummary,
    pub unresolved: Vec<UnresolvedReference>,
    /// Extraction directory left on disk, if any
    pub kept_work_dir: Option<PathBuf>,
}

/// Service converting SMART packages into preset artifacts.
pub struct ConvertService {
    fs: Arc<dyn FileSystem>,
    extractor: Arc<dyn ArchiveExtractor>,
    parser: Arc<dyn DocumentParser>,
    settings: Arc<Settings>,
}

impl ConvertService {
    /// Create a new conversion service.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        extractor: Arc<dyn ArchiveExtractor>,
        parser: Arc<dyn DocumentParser>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            fs,
            extractor,
            parser,
            settings,
        }
    }

    /// Convert `source` and write all artifacts below `dest`.
    #[instrument(skip(self))]
    pub fn convert(
        &self,
        source: &Path,
        dest: &Path,
        keep_work_dir: bool,
    ) -> ApplicationResult<ConvertReport> {
        let loaded = self.load(source, keep_work_dir)?;
        let metadata = Metadata {
            dataset_id: self.settings.dataset_id.clone(),
            name: loaded.name.clone(),
            project_key: loaded.project_key.clone(),
        };

        let writer = ArtifactWriter::new(Arc::clone(&self.fs), Arc::clone(&self.settings));
        let written = writer.write_all(&loaded.output, &loaded.source_dir, dest, &metadata)?;

        Ok(ConvertReport {
            language: loaded.output.language.clone(),
            dest: dest.to_path_buf(),
            written,
            unresolved: loaded.output.unresolved.clone(),
            kept_work_dir: loaded.kept_work_dir.clone(),
        })
    }

    /// Stage, parse and transform `source` without writing anything.
    #[instrument(skip(self))]
    pub fn load(&self, source: &Path, keep_work_dir: bool) -> ApplicationResult<LoadedModel> {
        if !self.fs.exists(source) {
            return Err(ApplicationError::SourceNotFound(source.to_path_buf()));
        }

        let (staged, work_dir) = self.stage(source, keep_work_dir)?;
        let (kept_work_dir, temp_dir) = match work_dir {
            Some(WorkDir::Kept(dir)) => (Some(dir), None),
            Some(WorkDir::Temporary(temp)) => (None, Some(temp)),
            None => (None, None),
        };
        let (model_path, source_dir) = match staged {
            StagedSource::Document(path) => {
                let dir = source_parent(&path);
                (path, dir)
            }
            StagedSource::Directory(dir) => (self.locate_model(&dir)?, dir),
        };
        info!("Reading model {}", model_path.display());

        let bytes = self
            .fs
            .read(&model_path)
            .with_path_context("read model", &model_path)?;
        let content = String::from_utf8(bytes).map_err(|e| ApplicationError::InvalidDocument {
            path: model_path.clone(),
            message: e.to_string(),
        })?;
        let document = self
            .parser
            .parse(&content)
            .map_err(|message| ApplicationError::InvalidDocument {
                path: model_path.clone(),
                message,
            })?;

        let output = transform(document, &self.settings.fallback_language)?;
        debug!(
            "load: {} presets, {} fields, {} unresolved",
            output.presets.len(),
            output.fields.len(),
            output.unresolved.len()
        );

        Ok(LoadedModel {
            output,
            project_key: project_key(content.as_bytes()),
            name: package_name(source),
            model_path,
            source_dir,
            kept_work_dir,
            _temp_dir: temp_dir,
        })
    }

    /// Decide how to read `source`, extracting archives into a work directory.
    fn stage(
        &self,
        source: &Path,
        keep_work_dir: bool,
    ) -> ApplicationResult<(StagedSource, Option<WorkDir>)> {
        if self.fs.is_dir(source) {
            return Ok((StagedSource::Directory(source.to_path_buf()), None));
        }
        if has_extension(source, "xml") {
            return Ok((StagedSource::Document(source.to_path_buf()), None));
        }

        let work_dir = self.work_dir_for(source, keep_work_dir)?;
        let dir = work_dir.path().to_path_buf();
        info!("Extracting {} to {}", source.display(), dir.display());
        let files = self
            .extractor
            .extract(source, &dir)
            .with_path_context("extract package", source)?;
        debug!("stage: extracted {} files", files.len());

        Ok((StagedSource::Directory(dir), Some(work_dir)))
    }

    /// Configured or kept work directories persist; otherwise a temporary one is used.
    fn work_dir_for(
        &self,
        source: &Path,
        keep_work_dir: bool,
    ) -> ApplicationResult<WorkDir> {
        let name = package_name(source);
        let persistent = match &self.settings.work_dir {
            Some(base) => Some(base.join(&name)),
            None if keep_work_dir => Some(std::env::temp_dir().join(format!("smart2mapeo-{name}"))),
            None => None,
        };

        match persistent {
            Some(dir) => {
                self.fs
                    .create_dir_all(&dir)
                    .with_path_context("create work directory", &dir)?;
                Ok(WorkDir::Kept(dir))
            }
            None => {
                let temp = tempfile::Builder::new()
                    .prefix("smart2mapeo-")
                    .tempdir()
                    .with_path_context("create temporary directory", &std::env::temp_dir())?;
                Ok(WorkDir::Temporary(temp))
            }
        }
    }

    /// The configured model file at the root of `dir`, or anywhere below it.
    fn locate_model(&self, dir: &Path) -> ApplicationResult<PathBuf> {
        let file = &self.settings.model_file;
        let direct = dir.join(file);
        if self.fs.is_file(&direct) {
            return Ok(direct);
        }
        self.fs
            .find_file(dir, file)
            .ok_or_else(|| ApplicationError::ModelNotFound {
                file: file.clone(),
                dir: dir.to_path_buf(),
            })
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
}

fn source_parent(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Package name from the source path: file stem, or directory name.
fn package_name(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "smart".to_string())
}
