use std::io::Write;

use super::ExtxyzError;
use crate::{StructureRecord, Vec3};

pub fn write<W: Write>(mut writer: W, records: &[StructureRecord]) -> Result<(), ExtxyzError> {
    for record in records {
        let structure = record.structure();
        let labels = record.labels();

        writeln!(writer, "{}", structure.len())?;

        let lattice = structure.cell()
                               .iter()
                               .flatten()
                               .map(|v| v.to_string())
                               .collect::<Vec<_>>()
                               .join(" ");
        let mut properties = String::from("species:S:1:pos:R:3");
        if labels.forces.is_some() {
            properties.push_str(":forces:R:3");
        }
        if labels.forces_uncertainty.is_some() {
            properties.push_str(":forces_uncertainty:R:3");
        }
        write!(writer, "Lattice=\"{lattice}\" Properties={properties}")?;
        if let Some(e) = labels.energy {
            write!(writer, " energy={e}")?;
        }
        if let Some(u) = labels.energy_uncertainty {
            write!(writer, " energy_uncertainty={u}")?;
        }
        let pbc = structure.pbc()
                           .iter()
                           .map(|p| if *p { "T" } else { "F" })
                           .collect::<Vec<_>>()
                           .join(" ");
        writeln!(writer, " pbc=\"{pbc}\"")?;

        for (i, (element, pos)) in structure.elements().iter().zip(structure.positions()).enumerate() {
            write!(writer, "{:<2}", element.symbol())?;
            write_vec(&mut writer, pos)?;
            if let Some(f) = &labels.forces {
                write_vec(&mut writer, &f[i])?;
            }
            if let Some(u) = &labels.forces_uncertainty {
                write_vec(&mut writer, &u[i])?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn write_vec<W: Write>(writer: &mut W, v: &Vec3) -> Result<(), ExtxyzError> {
    write!(writer, " {} {} {}", v[0], v[1], v[2])?;
    Ok(())
}
