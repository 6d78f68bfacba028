//! Best-effort hand-off of a rendered receipt to a viewer for printing.

use std::{
    env, fs,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    thread::{self, JoinHandle},
};

use tracing::{debug, info, warn};

/// What happened when a receipt was presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentOutcome {
    Opened(PathBuf),
    Skipped(String),
}

impl PresentOutcome {
    pub fn was_opened(&self) -> bool {
        matches!(self, PresentOutcome::Opened(_))
    }
}

/// A display surface able to show (and print) PDF bytes.
pub trait Presenter {
    fn show(&self, pdf: &[u8], file_name: &str) -> PresentOutcome;
}

/// For environments without any display; always skips.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPresenter;

impl Presenter for HeadlessPresenter {
    fn show(&self, _pdf: &[u8], file_name: &str) -> PresentOutcome {
        info!(file_name, "headless presenter, print skipped");
        PresentOutcome::Skipped("no display surface configured".into())
    }
}

/// Writes the PDF to a staging directory and opens it with the platform viewer
/// (or an explicit viewer command).
#[derive(Debug, Clone)]
pub struct SystemPresenter {
    staging_dir: PathBuf,
    viewer: Option<String>,
}

impl Default for SystemPresenter {
    fn default() -> Self {
        Self {
            staging_dir: env::temp_dir().join("parish_receipts"),
            viewer: None,
        }
    }
}

impl SystemPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    /// Viewer command line; the PDF path is appended as the last argument.
    pub fn with_viewer(mut self, command: impl Into<String>) -> Self {
        let command = command.into();
        self.viewer = if command.trim().is_empty() {
            None
        } else {
            Some(command)
        };
        self
    }

    fn stage(&self, pdf: &[u8], file_name: &str) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.staging_dir)?;
        let path = self.staging_dir.join(file_name);
        fs::write(&path, pdf)?;
        Ok(path)
    }

    fn launch(&self, path: &Path) -> std::io::Result<()> {
        let (program, args) = match &self.viewer {
            Some(command) => {
                let mut parts = command.split_whitespace().map(str::to_string);
                let program = parts.next().unwrap_or_default();
                (program, parts.collect::<Vec<_>>())
            }
            None => platform_viewer(),
        };
        Command::new(program)
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|child| {
                reap_in_background(child);
            })
    }
}

/// Viewers may outlive the print call; a watcher thread collects the exit
/// status so no zombie is left behind.
fn reap_in_background(mut child: Child) -> Option<JoinHandle<()>> {
    let spawned = thread::Builder::new()
        .name("viewer-reaper".into())
        .spawn(move || match child.wait() {
            Ok(status) => debug!(%status, "viewer exited"),
            Err(err) => warn!(error = %err, "could not wait on viewer"),
        });
    match spawned {
        Ok(handle) => Some(handle),
        Err(err) => {
            warn!(error = %err, "could not watch viewer process");
            None
        }
    }
}

impl Presenter for SystemPresenter {
    fn show(&self, pdf: &[u8], file_name: &str) -> PresentOutcome {
        if self.viewer.is_none() && !display_available() {
            info!(file_name, "no display available, print skipped");
            return PresentOutcome::Skipped("no display available".into());
        }
        let path = match self.stage(pdf, file_name) {
            Ok(path) => path,
            Err(err) => {
                warn!(file_name, error = %err, "could not stage receipt for printing");
                return PresentOutcome::Skipped(format!("staging failed: {err}"));
            }
        };
        match self.launch(&path) {
            Ok(()) => {
                info!(path = %path.display(), "receipt handed to viewer");
                PresentOutcome::Opened(path)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "viewer could not be launched");
                PresentOutcome::Skipped(format!("viewer unavailable: {err}"))
            }
        }
    }
}

fn display_available() -> bool {
    if cfg!(any(target_os = "macos", target_os = "windows")) {
        return true;
    }
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|key| env::var_os(key).map_or(false, |value| !value.is_empty()))
}

fn platform_viewer() -> (String, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("open".into(), Vec::new())
    } else if cfg!(target_os = "windows") {
        (
            "cmd".into(),
            vec!["/C".into(), "start".into(), String::new()],
        )
    } else {
        ("xdg-open".into(), Vec::new())
    }
}
