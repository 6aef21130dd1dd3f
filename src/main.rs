use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};

use statement_render::export::base_name;
use statement_render::{
    DirectorySink, Error, ExportFormat, Exporter, FormDataTree, RenderConfig, build,
};

#[derive(Parser)]
#[command(name = "statement-render")]
#[command(version)]
#[command(about = "Render a financial statement to PDF and DOCX with identical totals", long_about = None)]
struct Cli {
    /// Form data JSON file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file, or a directory (required shape when rendering both formats)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "pdf")]
    format: FormatArg,

    /// Rendering configuration JSON; unset fields keep their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the content model as JSON instead of rendering
    #[arg(long)]
    dump_model: bool,

    /// -v for info, -vv for debug (RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Pdf,
    Docx,
    Both,
}

impl FormatArg {
    fn formats(self) -> &'static [ExportFormat] {
        match self {
            FormatArg::Pdf => &[ExportFormat::Fixed],
            FormatArg::Docx => &[ExportFormat::Flow],
            FormatArg::Both => &[ExportFormat::Fixed, ExportFormat::Flow],
        }
    }
}

/// Directory and base file name for the outputs.
fn output_target(input: &Path, output: Option<&Path>) -> (PathBuf, String) {
    let parent_or_cwd = |p: &Path| {
        p.parent()
            .filter(|d| !d.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    };
    match output {
        None => (parent_or_cwd(input), base_name(input)),
        Some(p) if p.is_dir() || p.extension().is_none() => (p.to_path_buf(), base_name(input)),
        Some(p) => (parent_or_cwd(p), base_name(p)),
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = match &cli.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    }
    .with_env_overrides();

    let tree = FormDataTree::from_json_slice(&std::fs::read(&cli.input)?)?;

    if cli.dump_model {
        let model = build(&tree);
        println!("{}", serde_json::to_string_pretty(&model)?);
        return Ok(());
    }

    let (dir, base) = output_target(&cli.input, cli.output.as_deref());
    let exporter = Exporter::new(config);
    let mut sink = DirectorySink::new(&dir);

    // formats render in parallel; files are written only once both succeed
    let handles: Vec<_> = cli
        .format
        .formats()
        .iter()
        .map(|&format| exporter.spawn(&tree, format))
        .collect();
    let mut rendered = Vec::with_capacity(handles.len());
    for handle in handles {
        let format = handle.format();
        rendered.push((format, handle.join()?));
    }
    let files: Vec<(String, Vec<u8>)> = rendered
        .into_iter()
        .map(|(format, bytes)| (format!("{base}.{}", format.extension()), bytes))
        .collect();
    sink.save_all(&files)?;
    for (file_name, _) in &files {
        println!("{}", sink.path_for(file_name).display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
