//! Proyecto temporal aislado para tests.
//!
//! `ScratchProject::create` copia el fichero fuente del test llamador a un
//! directorio temporal nuevo, inicializa VCS (git si está disponible) y los
//! metadatos del proyecto. El directorio se borra al soltar el valor.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use tempfile::TempDir;

use crate::config::{ProjectConfig, VcsKind};
use crate::project::Project;
use crate::vcs::GitCli;
use crate::PersistenceError;

#[derive(Debug)]
pub struct ScratchProject {
    dir: TempDir,
    config: ProjectConfig,
    project: Project,
}

impl ScratchProject {
    pub fn create(caller_file: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let dir = tempfile::Builder::new().prefix("potflow-")
                                          .tempdir()
                                          .map_err(PersistenceError::io(std::env::temp_dir()))?;
        copy_into(caller_file.as_ref(), dir.path())?;

        let mut config = ProjectConfig::default();
        if !GitCli::available() {
            warn!("git not found; scratch project created without version control");
            config = config.with_vcs(VcsKind::None);
        }
        let project = Project::init(dir.path(), &config)?;
        Ok(Self { dir, config, project })
    }

    /// Copia un fichero auxiliar a la raíz del proyecto (mismo nombre).
    pub fn with_aux(self, path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        copy_into(path.as_ref(), self.dir.path())?;
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Handle nuevo sobre el mismo directorio (recarga desde disco).
    pub fn reopen(&self) -> Result<Project, PersistenceError> {
        Project::open_with(self.dir.path(), &self.config)
    }
}

fn copy_into(file: &Path, dir: &Path) -> Result<PathBuf, PersistenceError> {
    let name = file.file_name()
                   .ok_or_else(|| PersistenceError::Config(format!("{} has no file name", file.display())))?;
    let target = dir.join(name);
    fs::copy(file, &target).map_err(PersistenceError::io(file))?;
    Ok(target)
}
