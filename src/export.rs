//! Export orchestration: one call per output format, bytes handed to a sink
//! only after rendering has fully succeeded.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use std::time::Instant;

use crate::builder::build;
use crate::config::RenderConfig;
use crate::error::Error;
use crate::tree::FormDataTree;
use crate::{docx, pdf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Paginated PDF.
    Fixed,
    /// Reflowable DOCX.
    Flow,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Fixed => "pdf",
            ExportFormat::Flow => "docx",
        }
    }
}

/// Destination for finished documents.
pub trait FileSink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), Error>;
}

/// Writes into a directory through a temporary file, so a reader never sees
/// a half-written document.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    fn partial_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(format!(".{file_name}.partial"))
    }

    /// Write every file to a partial first and rename them into place only
    /// once all partials are on disk. A failure removes every partial still
    /// left, so no final name ever holds a half-written document.
    pub fn save_all(&mut self, files: &[(String, Vec<u8>)]) -> Result<(), Error> {
        std::fs::create_dir_all(&self.dir)?;
        let partials: Vec<PathBuf> = files.iter().map(|(name, _)| self.partial_path(name)).collect();
        let discard = |from: usize| {
            for partial in &partials[from..] {
                let _ = std::fs::remove_file(partial);
            }
        };

        for ((_, bytes), partial) in files.iter().zip(&partials) {
            if let Err(e) = std::fs::write(partial, bytes) {
                discard(0);
                return Err(e.into());
            }
        }
        for (i, ((name, bytes), partial)) in files.iter().zip(&partials).enumerate() {
            let target = self.path_for(name);
            if let Err(e) = std::fs::rename(partial, &target) {
                discard(i);
                return Err(e.into());
            }
            log::debug!("wrote {} ({} bytes)", target.display(), bytes.len());
        }
        Ok(())
    }
}

impl FileSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), Error> {
        self.save_all(&[(file_name.to_string(), bytes.to_vec())])
    }
}

/// A render running on a worker thread.
pub struct ExportHandle {
    format: ExportFormat,
    handle: JoinHandle<Result<Vec<u8>, Error>>,
}

impl ExportHandle {
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn join(self) -> Result<Vec<u8>, Error> {
        self.handle.join().map_err(|_| Error::Worker)?
    }
}

#[derive(Clone, Debug, Default)]
pub struct Exporter {
    config: RenderConfig,
}

impl Exporter {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Build the content model and render it. The model lives only for the
    /// duration of this call.
    pub fn render(&self, tree: &FormDataTree, format: ExportFormat) -> Result<Vec<u8>, Error> {
        render_tree(tree, format, &self.config)
    }

    /// Render and hand the result to `sink` as `<base_name>.<ext>`. Returns
    /// the file name used. Nothing reaches the sink if rendering fails.
    pub fn export(
        &self,
        tree: &FormDataTree,
        format: ExportFormat,
        sink: &mut dyn FileSink,
        base_name: &str,
    ) -> Result<String, Error> {
        let bytes = self.render(tree, format)?;
        let file_name = format!("{base_name}.{}", format.extension());
        sink.save(&file_name, &bytes)?;
        Ok(file_name)
    }

    /// Render on a worker thread from a snapshot of `tree` taken now; later
    /// edits to the caller's tree do not affect the output.
    pub fn spawn(&self, tree: &FormDataTree, format: ExportFormat) -> ExportHandle {
        let snapshot = tree.clone();
        let config = self.config.clone();
        let handle = std::thread::spawn(move || render_tree(&snapshot, format, &config));
        ExportHandle { format, handle }
    }
}

fn render_tree(
    tree: &FormDataTree,
    format: ExportFormat,
    config: &RenderConfig,
) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();
    let model = build(tree);
    let t_build = t0.elapsed();

    let bytes = match format {
        ExportFormat::Fixed => pdf::render(&model, config)?,
        ExportFormat::Flow => docx::render(&model, config)?,
    };
    let t_total = t0.elapsed();

    log::info!(
        "Timing ({}): build={:.1}ms, render={:.1}ms, total={:.1}ms (output {} bytes)",
        format.extension(),
        t_build.as_secs_f64() * 1000.0,
        (t_total - t_build).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );
    Ok(bytes)
}

/// Base name for outputs derived from an input or output path.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("statement")
        .to_string()
}
