//! Financial statement rendering: one content model, two output formats.
//!
//! A [`FormDataTree`] is turned into a [`ContentModel`] by [`build`]; every
//! total is computed there, once. The fixed-layout (PDF) and flow-layout
//! (DOCX) renderers only format what the model holds, so both documents
//! always print the same figures.

pub mod aggregate;
pub mod builder;
pub mod catalog;
pub mod config;
mod docx;
mod error;
pub mod export;
mod fonts;
pub mod model;
pub mod money;
mod pdf;
pub mod present;
pub mod tree;

pub use builder::build;
pub use config::RenderConfig;
pub use error::Error;
pub use export::{DirectorySink, ExportFormat, ExportHandle, Exporter, FileSink};
pub use model::ContentModel;
pub use pdf::{LayoutReport, RowPlacement};
pub use tree::FormDataTree;

/// Render the statement as PDF with the default configuration.
pub fn export_fixed(tree: &FormDataTree) -> Result<Vec<u8>, Error> {
    export_fixed_with(tree, &RenderConfig::default())
}

/// Render the statement as DOCX with the default configuration.
pub fn export_flow(tree: &FormDataTree) -> Result<Vec<u8>, Error> {
    export_flow_with(tree, &RenderConfig::default())
}

pub fn export_fixed_with(tree: &FormDataTree, config: &RenderConfig) -> Result<Vec<u8>, Error> {
    Exporter::new(config.clone()).render(tree, ExportFormat::Fixed)
}

pub fn export_flow_with(tree: &FormDataTree, config: &RenderConfig) -> Result<Vec<u8>, Error> {
    Exporter::new(config.clone()).render(tree, ExportFormat::Flow)
}

/// PDF bytes plus where every table row landed.
pub fn render_fixed_with_report(
    model: &ContentModel,
    config: &RenderConfig,
) -> Result<(Vec<u8>, LayoutReport), Error> {
    pdf::render_with_report(model, config)
}

pub fn render_fixed(model: &ContentModel, config: &RenderConfig) -> Result<Vec<u8>, Error> {
    pdf::render(model, config)
}

pub fn render_flow(model: &ContentModel, config: &RenderConfig) -> Result<Vec<u8>, Error> {
    docx::render(model, config)
}
