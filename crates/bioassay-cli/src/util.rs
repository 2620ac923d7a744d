use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Args, ValueEnum};

use crate::schema::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable tables
    Text,
    /// JSON report with generation metadata
    Json,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct OutputArg {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the result to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl OutputArg {
    /// Writes `report` as a JSON envelope, or through `render_text` in text format.
    pub fn emit<T, F>(&self, report: T, render_text: F) -> anyhow::Result<()>
    where
        T: serde::Serialize,
        F: FnOnce(&mut Output, &T) -> io::Result<()>,
    {
        let mut out = Output::create(self.output.as_deref())?;
        let written = match self.format {
            OutputFormat::Json => serde_json::to_writer_pretty(&mut out, &Report::new(report))
                .map_err(io::Error::from)
                .and_then(|()| writeln!(out)),
            OutputFormat::Text => render_text(&mut out, &report),
        };
        written
            .and_then(|()| out.flush())
            .with_context(|| format!("Failed to write report to {}", out.label()))?;

        if let Output::File { path, .. } = &out {
            log::info!("Report saved to {}", path.display());
        }
        Ok(())
    }
}

/// Destination of a report: locked stdout or a buffered file.
#[derive(Debug)]
pub(crate) enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Output::Stdout(io::stdout().lock()));
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    fn label(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(writer) => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(writer) => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Reads and deserializes a JSON configuration file.
pub(crate) fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))?;
    log::info!("Loaded {file_kind} from {}", path.display());
    Ok(value)
}

/// Formats an optional number, printing `-` when absent.
pub(crate) fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v:.precision$}"))
}

/// Formats a p-value, switching to scientific notation for small values.
pub(crate) fn fmt_p_value(p: f64) -> String {
    if p < 1e-4 {
        format!("{p:.2e}")
    } else {
        format!("{p:.4}")
    }
}
