//! `FsArtifactStore`: cache direccionada por contenido
//! (`<meta>/cache/<hash>.json`). Escribir dos veces el mismo hash es no-op.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use pot_core::{Artifact, ArtifactStore, CoreEngineError};

use crate::PersistenceError;

#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, hash: &str) -> PathBuf {
        self.dir.join(format!("{hash}.json"))
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.path_for(hash).is_file()
    }

    fn write(&self, artifact: &Artifact) -> Result<bool, PersistenceError> {
        let path = self.path_for(&artifact.hash);
        if path.is_file() {
            return Ok(false);
        }
        fs::create_dir_all(&self.dir).map_err(PersistenceError::io(&self.dir))?;
        let bytes = serde_json::to_vec(artifact).map_err(PersistenceError::json(&path))?;
        // escribir a temporal y renombrar: nunca queda un fichero a medias
        let tmp = self.dir.join(format!("{}.json.tmp", artifact.hash));
        fs::write(&tmp, bytes).map_err(PersistenceError::io(&tmp))?;
        fs::rename(&tmp, &path).map_err(PersistenceError::io(&path))?;
        Ok(true)
    }

    pub fn load(&self, hash: &str) -> Result<Option<Artifact>, PersistenceError> {
        let path = self.path_for(hash);
        if !path.is_file() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(PersistenceError::io(&path))?;
        let artifact: Artifact = serde_json::from_slice(&bytes).map_err(PersistenceError::json(&path))?;
        if artifact.hash != hash || !artifact.verify() {
            warn!("artifact {hash}: payload does not match its hash");
            return Err(PersistenceError::Engine(CoreEngineError::Storage(format!("corrupted artifact {hash}"))));
        }
        Ok(Some(artifact))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn put(&mut self, artifact: &Artifact) -> Result<(), CoreEngineError> {
        if artifact.hash.is_empty() {
            return Err(CoreEngineError::Storage("artifact without hash".into()));
        }
        let written = self.write(artifact)?;
        debug!("put hash={} written={written}", artifact.hash);
        Ok(())
    }

    fn get(&self, hash: &str) -> Result<Option<Artifact>, CoreEngineError> {
        let found = self.load(hash)?;
        debug!("get hash={hash} found={}", found.is_some());
        Ok(found)
    }
}
