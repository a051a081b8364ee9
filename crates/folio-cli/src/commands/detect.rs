use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use folio_core::sniff::{DefaultSniffer, FileTypeSniffer, is_xps_directory};
use folio_core::{DispatchOptions, EngineKind, Kind, Route, route};
use serde::Serialize;

use super::emit;
use crate::TRACING_TARGET_COMMAND;
use crate::config::DetectArgs;

/// What the sniffers and the routing table say about one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct DetectReport {
    pub path: PathBuf,
    pub name_kind: Kind,
    pub content_kind: Kind,
    pub supported: bool,
    /// Family the name kind routes to, tried first when opening.
    pub name_engine: Option<EngineKind>,
    /// Family the content kind routes to, tried when the name route fails.
    pub content_engine: Option<EngineKind>,
}

impl DetectReport {
    pub fn new(path: &Path, options: &DispatchOptions) -> Self {
        let sniffer = DefaultSniffer;
        let name_kind = sniffer.guess_from_name(path);
        let content_kind = sniffer.guess_from_content(path);

        Self {
            path: path.to_path_buf(),
            name_kind,
            content_kind,
            supported: options.is_supported(name_kind) || options.is_supported(content_kind),
            name_engine: resolve(path, name_kind, options),
            content_engine: resolve(path, content_kind, options),
        }
    }
}

fn resolve(path: &Path, kind: Kind, options: &DispatchOptions) -> Option<EngineKind> {
    match route(kind, options)? {
        Route::Engine(family) => Some(family),
        Route::Directory if is_xps_directory(path) => Some(EngineKind::Xps),
        Route::Directory => Some(EngineKind::ImageDir),
    }
}

impl fmt::Display for DetectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: name={} content={} supported={}",
            self.path.display(),
            self.name_kind,
            self.content_kind,
            if self.supported { "yes" } else { "no" },
        )?;
        write_engine(f, "name_engine", self.name_engine)?;
        write_engine(f, "content_engine", self.content_engine)
    }
}

fn write_engine(f: &mut fmt::Formatter<'_>, label: &str, engine: Option<EngineKind>) -> fmt::Result {
    match engine {
        Some(engine) => write!(f, " {label}={}", engine.display_name()),
        None => write!(f, " {label}=none"),
    }
}

pub(super) fn run<W: Write>(
    args: &DetectArgs,
    options: &DispatchOptions,
    out: &mut W,
) -> anyhow::Result<()> {
    let reports: Vec<DetectReport> = args
        .paths
        .iter()
        .map(|path| DetectReport::new(path, options))
        .collect();

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        count = reports.len(),
        "detected file kinds"
    );

    emit(args.format, &reports, out)
}
