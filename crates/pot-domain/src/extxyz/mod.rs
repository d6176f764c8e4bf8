//! Codec de texto *extended XYZ* para secuencias de `StructureRecord`.
//!
//! Cada frame ocupa `2 + n` líneas: número de átomos, línea de comentario con
//! pares `clave=valor` (`Lattice`, `Properties`, `energy`,
//! `energy_uncertainty`, `pbc`) y una línea por átomo con las columnas
//! declaradas en `Properties`. Los ficheros se escriben una sola vez.

mod error;
mod reader;
mod writer;

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub use error::ExtxyzError;
pub use reader::read;
pub use writer::write;

use crate::StructureRecord;

/// Lee todos los frames de un fichero.
pub fn read_path(path: impl AsRef<Path>) -> Result<Vec<StructureRecord>, ExtxyzError> {
    let file = File::open(path.as_ref())?;
    read(BufReader::new(file))
}

/// Escribe los frames en un fichero nuevo; falla si el fichero ya existe.
pub fn write_path(path: impl AsRef<Path>, records: &[StructureRecord]) -> Result<(), ExtxyzError> {
    let file = OpenOptions::new().write(true).create_new(true).open(path.as_ref())?;
    let mut out = BufWriter::new(file);
    write(&mut out, records)?;
    out.flush()?;
    Ok(())
}
