use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;

use super::DocumentFormat;

/// Where a rendered snapshot or schema goes.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }

    /// `-` is stdout, anything else a file path.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "" => bail!("output destination cannot be empty"),
            "-" => Ok(OutputDestination::Stdout),
            path => Ok(OutputDestination::file(path)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    /// Options for `destinations`, taking the format from the file extensions unless
    /// `format` is given. Files that disagree on their format are an error.
    pub fn for_destinations(
        destinations: Vec<OutputDestination>,
        format: Option<DocumentFormat>,
    ) -> Result<Self> {
        let format = match format {
            Some(format) => format,
            None => infer_format(&destinations)?.unwrap_or_default(),
        };
        let destinations = if destinations.is_empty() {
            vec![OutputDestination::Stdout]
        } else {
            destinations
        };
        Ok(Self::new(format).with_destinations(destinations))
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

fn infer_format(destinations: &[OutputDestination]) -> Result<Option<DocumentFormat>> {
    let mut detected: Option<(DocumentFormat, &Path)> = None;
    for destination in destinations {
        let OutputDestination::File(path) = destination else {
            continue;
        };
        let Some(format) = DocumentFormat::from_path(path) else {
            bail!(
                "cannot infer the format of {}; use a supported extension or pass a format",
                path.display()
            );
        };
        match detected {
            Some((existing, first)) if existing != format => bail!(
                "{} is {format} but {} is {existing}; align the extensions",
                path.display(),
                first.display()
            ),
            Some(_) => {}
            None => detected = Some((format, path.as_path())),
        }
    }
    Ok(detected.map(|(format, _)| format))
}

/// Render `value` and write it to every configured destination.
pub fn emit<T: Serialize + ?Sized>(value: &T, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let payload = render(value, options.format, options.pretty)?;
    for destination in &options.destinations {
        match destination {
            OutputDestination::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{payload}")
                    .and_then(|()| stdout.flush())
                    .context("failed to write to stdout")?;
            }
            OutputDestination::File(path) => fs::write(path, format!("{payload}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?,
        }
    }
    Ok(())
}

pub fn render<T: Serialize + ?Sized>(
    value: &T,
    format: DocumentFormat,
    pretty: bool,
) -> Result<String> {
    match format {
        DocumentFormat::Json if pretty => {
            serde_json::to_string_pretty(value).context("failed to serialize JSON")
        }
        DocumentFormat::Json => serde_json::to_string(value).context("failed to serialize JSON"),
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(value).context("failed to serialize YAML"),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml if pretty => {
            toml::to_string_pretty(value).context("failed to serialize TOML")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::to_string(value).context("failed to serialize TOML"),
    }
}
