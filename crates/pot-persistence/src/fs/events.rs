//! `FsEventStore`: log append-only de eventos, un fichero JSON lines por
//! flujo (`<meta>/events/<flow_id>.jsonl`).

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, error};
use pot_core::{CoreEngineError, EventStore, FlowEvent, FlowEventKind};
use uuid::Uuid;

use crate::PersistenceError;

#[derive(Debug, Clone)]
pub struct FsEventStore {
    dir: PathBuf,
}

impl FsEventStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, flow_id: Uuid) -> PathBuf {
        self.dir.join(format!("{flow_id}.jsonl"))
    }

    fn read(&self, flow_id: Uuid) -> Result<Vec<FlowEvent>, PersistenceError> {
        let path = self.path_for(flow_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path).map_err(PersistenceError::io(&path))?;
        text.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str::<FlowEvent>(l).map_err(PersistenceError::json(&path)))
            .collect()
    }

    /// Flujos con log en disco (orden por nombre de fichero).
    pub fn flows(&self) -> Result<Vec<Uuid>, PersistenceError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(PersistenceError::io(&self.dir))? {
            let entry = entry.map_err(PersistenceError::io(&self.dir))?;
            let name = entry.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".jsonl")) else {
                continue;
            };
            if let Ok(id) = Uuid::parse_str(stem) {
                out.push(id);
            }
        }
        out.sort();
        Ok(out)
    }

    fn append(&self, flow_id: Uuid, kind: FlowEventKind) -> Result<FlowEvent, PersistenceError> {
        fs::create_dir_all(&self.dir).map_err(PersistenceError::io(&self.dir))?;
        let seq = self.read(flow_id)?.len() as u64;
        let event = FlowEvent { seq,
                                flow_id,
                                kind,
                                ts: Utc::now() };
        let path = self.path_for(flow_id);
        let line = serde_json::to_string(&event).map_err(PersistenceError::json(&path))?;
        let mut file = OpenOptions::new().create(true)
                                         .append(true)
                                         .open(&path)
                                         .map_err(PersistenceError::io(&path))?;
        writeln!(file, "{line}").map_err(PersistenceError::io(&path))?;
        Ok(event)
    }
}

impl EventStore for FsEventStore {
    fn append_kind(&mut self, flow_id: Uuid, kind: FlowEventKind) -> Result<FlowEvent, CoreEngineError> {
        debug!("append_kind:start flow_id={flow_id} kind={}", kind.variant_name());
        let event = self.append(flow_id, kind).map_err(|e| {
                                                  error!("append_kind:error flow_id={flow_id} err={e}");
                                                  CoreEngineError::from(e)
                                              })?;
        debug!("append_kind:done flow_id={flow_id} seq={}", event.seq);
        Ok(event)
    }

    fn list(&self, flow_id: Uuid) -> Result<Vec<FlowEvent>, CoreEngineError> {
        debug!("list:start flow_id={flow_id}");
        let events = self.read(flow_id)?;
        debug!("list:done flow_id={flow_id} count={}", events.len());
        Ok(events)
    }
}
