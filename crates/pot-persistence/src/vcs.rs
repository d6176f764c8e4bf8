//! Inicialización de control de versiones en el directorio del proyecto.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::PersistenceError;

pub trait VersionControl: std::fmt::Debug {
    fn name(&self) -> &'static str;
    /// Inicializa un repositorio en `dir` (que ya existe).
    fn init(&self, dir: &Path) -> Result<(), PersistenceError>;
}

/// `git init` a través del binario del sistema.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    /// `true` si hay un `git` ejecutable en el PATH.
    pub fn available() -> bool {
        Command::new("git").arg("--version")
                           .output()
                           .map(|o| o.status.success())
                           .unwrap_or(false)
    }
}

impl VersionControl for GitCli {
    fn name(&self) -> &'static str {
        "git"
    }

    fn init(&self, dir: &Path) -> Result<(), PersistenceError> {
        let output = Command::new("git").args(["init", "--quiet"])
                                        .current_dir(dir)
                                        .output()
                                        .map_err(|e| PersistenceError::Vcs(format!("failed to run git: {e}")))?;
        if !output.status.success() {
            return Err(PersistenceError::Vcs(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }
        debug!("git repository initialized in {}", dir.display());
        Ok(())
    }
}

/// Sin control de versiones.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVcs;

impl VersionControl for NoVcs {
    fn name(&self) -> &'static str {
        "none"
    }

    fn init(&self, _dir: &Path) -> Result<(), PersistenceError> {
        Ok(())
    }
}
