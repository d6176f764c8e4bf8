use std::collections::BTreeMap;
use std::io::BufRead;

use super::ExtxyzError;
use crate::{Cell, Element, Labels, Structure, StructureRecord, Vec3};

/// Columna por átomo declarada en `Properties`.
#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    width: usize,
}

pub fn read<R: BufRead>(reader: R) -> Result<Vec<StructureRecord>, ExtxyzError> {
    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        lines.push((i + 1, line?));
    }

    let mut records = Vec::new();
    let mut cursor = 0;
    while cursor < lines.len() {
        let (ln, count_line) = &lines[cursor];
        if count_line.trim().is_empty() {
            cursor += 1;
            continue;
        }
        let natoms = count_line.trim()
                               .parse::<usize>()
                               .map_err(|_| ExtxyzError::parse(*ln, "expected atom count"))?;
        let Some((comment_ln, comment)) = lines.get(cursor + 1) else {
            return Err(ExtxyzError::parse(*ln, "frame ended before the comment line"));
        };
        let frame_end = cursor + 2 + natoms;
        if frame_end > lines.len() {
            return Err(ExtxyzError::parse(*ln, format!("frame declares {natoms} atoms but the input ends early")));
        }
        let record = parse_frame(*ln, *comment_ln, comment, &lines[cursor + 2..frame_end])?;
        records.push(record);
        cursor = frame_end;
    }
    Ok(records)
}

fn parse_frame(frame_ln: usize,
               comment_ln: usize,
               comment: &str,
               atom_lines: &[(usize, String)])
               -> Result<StructureRecord, ExtxyzError> {
    let info = parse_info(comment_ln, comment)?;

    let cell = match info.get("Lattice") {
        Some(raw) => parse_lattice(comment_ln, raw)?,
        None => [[0.0; 3]; 3],
    };
    let pbc = match info.get("pbc") {
        Some(raw) => parse_pbc(comment_ln, raw)?,
        None => [info.contains_key("Lattice"); 3],
    };
    let columns = match info.get("Properties") {
        Some(raw) => parse_properties(comment_ln, raw)?,
        None => vec![Column { name: "species".into(),
                              width: 1 },
                     Column { name: "pos".into(),
                              width: 3 }],
    };

    let mut elements = Vec::with_capacity(atom_lines.len());
    let mut positions = Vec::with_capacity(atom_lines.len());
    let mut forces = Vec::new();
    let mut forces_uncertainty = Vec::new();
    let has = |name: &str| columns.iter().any(|c| c.name == name);

    for (ln, raw) in atom_lines {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let mut at = 0;
        for column in &columns {
            let Some(fields) = tokens.get(at..at + column.width) else {
                return Err(ExtxyzError::parse(*ln, format!("missing values for column '{}'", column.name)));
            };
            match column.name.as_str() {
                "species" => {
                    let element = Element::from_symbol(fields[0]).map_err(|source| ExtxyzError::Invalid { line: *ln,
                                                                                                          source })?;
                    elements.push(element);
                }
                "pos" => positions.push(parse_vec3(*ln, fields, "pos")?),
                "forces" => forces.push(parse_vec3(*ln, fields, "forces")?),
                "forces_uncertainty" => forces_uncertainty.push(parse_vec3(*ln, fields, "forces_uncertainty")?),
                _ => {}
            }
            at += column.width;
        }
    }

    if !has("species") || !has("pos") {
        return Err(ExtxyzError::parse(comment_ln, "Properties must declare species and pos"));
    }

    let labels = Labels { energy: parse_opt_f64(comment_ln, &info, "energy")?,
                          forces: has("forces").then_some(forces),
                          energy_uncertainty: parse_opt_f64(comment_ln, &info, "energy_uncertainty")?,
                          forces_uncertainty: has("forces_uncertainty").then_some(forces_uncertainty) };
    let structure = Structure::new(elements, positions, cell, pbc).map_err(|source| ExtxyzError::Invalid { line: frame_ln,
                                                                                                         source })?;
    StructureRecord::new(structure, labels).map_err(|source| ExtxyzError::Invalid { line: frame_ln,
                                                                                    source })
}

/// Pares `clave=valor` de la línea de comentario; los valores pueden ir entre
/// comillas dobles. Los tokens sin `=` se ignoran.
fn parse_info(line: usize, comment: &str) -> Result<BTreeMap<String, String>, ExtxyzError> {
    let mut out = BTreeMap::new();
    let mut chars = comment.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }
        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_whitespace() && *c != '=') {
            key.push(c);
        }
        if chars.next_if_eq(&'=').is_none() {
            continue;
        }
        let mut value = String::new();
        if chars.next_if_eq(&'"').is_some() {
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some(c) => value.push(c),
                    None => return Err(ExtxyzError::parse(line, format!("unterminated quote in value of '{key}'"))),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                value.push(c);
            }
        }
        out.insert(key, value);
    }
    Ok(out)
}

fn parse_lattice(line: usize, raw: &str) -> Result<Cell, ExtxyzError> {
    let values = raw.split_whitespace()
                    .map(|t| t.parse::<f64>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| ExtxyzError::parse(line, "Lattice values must be numbers"))?;
    if values.len() != 9 {
        return Err(ExtxyzError::parse(line, format!("Lattice needs 9 values, found {}", values.len())));
    }
    let mut cell = [[0.0; 3]; 3];
    for (k, v) in values.into_iter().enumerate() {
        cell[k / 3][k % 3] = v;
    }
    Ok(cell)
}

fn parse_pbc(line: usize, raw: &str) -> Result<[bool; 3], ExtxyzError> {
    let flags = raw.split_whitespace()
                   .map(|t| match t {
                       "T" | "True" | "true" | "1" => Ok(true),
                       "F" | "False" | "false" | "0" => Ok(false),
                       other => Err(ExtxyzError::parse(line, format!("invalid pbc flag '{other}'"))),
                   })
                   .collect::<Result<Vec<_>, _>>()?;
    match flags.as_slice() {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => Err(ExtxyzError::parse(line, "pbc needs 3 flags")),
    }
}

fn parse_properties(line: usize, raw: &str) -> Result<Vec<Column>, ExtxyzError> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() % 3 != 0 {
        return Err(ExtxyzError::parse(line, "Properties must be name:type:count triples"));
    }
    parts.chunks(3)
         .map(|chunk| {
             let width = chunk[2].parse::<usize>()
                                 .map_err(|_| ExtxyzError::parse(line, format!("invalid column count in '{}'", chunk.join(":"))))?;
             Ok(Column { name: chunk[0].to_string(),
                         width })
         })
         .collect()
}

fn parse_vec3(line: usize, fields: &[&str], column: &str) -> Result<Vec3, ExtxyzError> {
    let mut v = [0.0; 3];
    for (slot, raw) in v.iter_mut().zip(fields) {
        *slot = raw.parse::<f64>()
                   .map_err(|_| ExtxyzError::parse(line, format!("invalid number '{raw}' in column '{column}'")))?;
    }
    if fields.len() != 3 {
        return Err(ExtxyzError::parse(line, format!("column '{column}' must have 3 components")));
    }
    Ok(v)
}

fn parse_opt_f64(line: usize, info: &BTreeMap<String, String>, key: &str) -> Result<Option<f64>, ExtxyzError> {
    info.get(key)
        .map(|raw| {
                 raw.parse::<f64>()
                    .map_err(|_| ExtxyzError::parse(line, format!("invalid value for '{key}': {raw}")))
             })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_tokens_support_quotes_and_bare_flags() {
        let info = parse_info(2, r#"Lattice="1 0 0 0 1 0 0 0 1" energy=-1.5 converged pbc="T F T""#).unwrap();
        assert_eq!(info["Lattice"], "1 0 0 0 1 0 0 0 1");
        assert_eq!(info["energy"], "-1.5");
        assert_eq!(parse_pbc(2, &info["pbc"]).unwrap(), [true, false, true]);
        assert!(!info.contains_key("converged"));
    }

    #[test]
    fn unknown_columns_are_skipped_by_width() {
        let text = "1\nProperties=species:S:1:tags:I:1:pos:R:3:magmoms:R:3 energy=2\nC 7 0.1 0.2 0.3 9 9 9\n";
        let records = read(text.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].structure().positions()[0], [0.1, 0.2, 0.3]);
        assert_eq!(records[0].energy(), Some(2.0));
        assert_eq!(records[0].structure().pbc(), [false; 3]);
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        let text = "2\nProperties=species:S:1:pos:R:3\nC 0 0 0\nO 0 0 x\n";
        match read(text.as_bytes()) {
            Err(ExtxyzError::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn truncated_frame_is_rejected() {
        let text = "3\ncomment\nC 0 0 0\n";
        assert!(matches!(read(text.as_bytes()), Err(ExtxyzError::Parse { line: 1, .. })));
    }
}
