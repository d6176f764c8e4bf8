//! Configuración del proyecto desde variables de entorno.
//! Convención `POTFLOW_*`; el fichero `.env` se carga una sola vez.

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::PersistenceError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsKind {
    Git,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Directorio de nodos, relativo a la raíz (`nodes`).
    pub nodes_dir: PathBuf,
    /// Metadatos del proyecto, relativo a la raíz (`.potflow`).
    pub meta_dir: PathBuf,
    pub vcs: VcsKind,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { nodes_dir: PathBuf::from("nodes"),
               meta_dir: PathBuf::from(".potflow"),
               vcs: VcsKind::Git }
    }
}

impl ProjectConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        let defaults = Self::default();
        let nodes_dir = env::var("POTFLOW_NODES_DIR").map(PathBuf::from).unwrap_or(defaults.nodes_dir);
        let meta_dir = env::var("POTFLOW_META_DIR").map(PathBuf::from).unwrap_or(defaults.meta_dir);
        let vcs = match env::var("POTFLOW_VCS").ok().as_deref() {
            None | Some("git") => VcsKind::Git,
            Some("none") => VcsKind::None,
            Some(other) => return Err(PersistenceError::Config(format!("POTFLOW_VCS must be 'git' or 'none', got '{other}'"))),
        };
        Ok(Self { nodes_dir,
                  meta_dir,
                  vcs })
    }

    pub fn with_vcs(mut self, vcs: VcsKind) -> Self {
        self.vcs = vcs;
        self
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
