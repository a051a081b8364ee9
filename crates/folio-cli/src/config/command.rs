//! Subcommands and their arguments.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result as AnyhowResult, anyhow, bail};
use clap::{Args, Subcommand, ValueEnum};
use folio_core::{AnnotationKind, PointF};

/// Output format for command reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One human readable line per file.
    #[default]
    Text,
    /// A JSON array of reports.
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the detected kinds and the engine route for each path.
    Detect(DetectArgs),
    /// Open a document and report the engine that accepted it.
    Open(OpenArgs),
    /// List annotations, or find the one at a page position.
    Annotations(AnnotationsArgs),
}

impl Command {
    /// Subcommand name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Detect(_) => "detect",
            Self::Open(_) => "open",
            Self::Annotations(_) => "annotations",
        }
    }

    pub fn validate(&self) -> AnyhowResult<()> {
        match self {
            Self::Annotations(args) => args.validate(),
            Self::Detect(_) | Self::Open(_) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct DetectArgs {
    /// Files or folders to inspect.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct OpenArgs {
    /// Document to open.
    pub path: PathBuf,

    /// Password for encrypted PDFs.
    #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct AnnotationsArgs {
    #[clap(flatten)]
    pub open: OpenArgs,

    /// 1-based page for the position lookup.
    #[arg(long)]
    pub page: Option<usize>,

    /// Page position as `x,y`; returns the annotation under it.
    #[arg(long)]
    pub at: Option<Position>,

    /// Only consider these annotation kinds.
    #[arg(long = "kind", value_delimiter = ',')]
    pub kinds: Vec<AnnotationKind>,
}

impl AnnotationsArgs {
    /// Validates the position lookup arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if `--at` is given without `--page`, or the page is 0.
    pub fn validate(&self) -> AnyhowResult<()> {
        match (self.page, self.at) {
            (Some(0), _) => Err(anyhow!("Page numbers start at 1")),
            (None, Some(_)) => Err(anyhow!("--at requires --page")),
            _ => Ok(()),
        }
    }

    /// The kind filter, `None` when every kind is allowed.
    pub fn allowed_kinds(&self) -> Option<&[AnnotationKind]> {
        (!self.kinds.is_empty()).then_some(self.kinds.as_slice())
    }
}

/// A page position parsed from `x,y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub PointF);

impl FromStr for Position {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> AnyhowResult<Self> {
        let Some((x, y)) = s.split_once(',') else {
            bail!("expected `x,y`, got `{s}`");
        };
        let x: f32 = x.trim().parse().map_err(|_| anyhow!("invalid x coordinate `{x}`"))?;
        let y: f32 = y.trim().parse().map_err(|_| anyhow!("invalid y coordinate `{y}`"))?;
        Ok(Self(PointF::new(x, y)))
    }
}
