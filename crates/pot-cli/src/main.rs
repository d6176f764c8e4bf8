use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::exit;

use pot_domain::{extxyz, generate, SyntheticConfig};
use pot_persistence::{PersistenceError, Project, ProjectConfig, VcsKind};

const USAGE: &str = "\
Uso:
  potflow init [--path <DIR>] [--no-vcs]
  potflow generate --out <FILE> [--n <N>] [--seed <SEED>]
  potflow status [--path <DIR>]
  potflow show --node <NAME> [--port <PORT>] [--path <DIR>]";

// Códigos de salida: 0 ok, 2 uso, 4 no encontrado, 5 error de ejecución.
const EXIT_USAGE: i32 = 2;
const EXIT_NOT_FOUND: i32 = 4;
const EXIT_RUNTIME: i32 = 5;

fn main() {
    // .env antes que el logger para que RUST_LOG pueda venir de ahí
    pot_persistence::init_dotenv();
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        eprintln!("{USAGE}");
        exit(EXIT_USAGE);
    };
    let flags = match parse_flags(&args[2..], &["--no-vcs"]) {
        Ok(f) => f,
        Err(msg) => {
            eprintln!("[potflow {command}] {msg}\n{USAGE}");
            exit(EXIT_USAGE);
        }
    };
    log::debug!("potflow {command} {flags:?}");
    let code = match command.as_str() {
        "init" => cmd_init(&flags),
        "generate" => cmd_generate(&flags),
        "status" => cmd_status(&flags),
        "show" => cmd_show(&flags),
        "-h" | "--help" | "help" => {
            println!("{USAGE}");
            0
        }
        other => {
            eprintln!("[potflow] comando desconocido: {other}\n{USAGE}");
            EXIT_USAGE
        }
    };
    exit(code);
}

/// `--clave valor` y banderas sin valor (las listadas en `switches`).
fn parse_flags(args: &[String], switches: &[&str]) -> Result<BTreeMap<String, String>, String> {
    let mut out = BTreeMap::new();
    let mut i = 0;
    while i < args.len() {
        let key = &args[i];
        if !key.starts_with("--") {
            return Err(format!("argumento inesperado: {key}"));
        }
        if switches.contains(&key.as_str()) {
            out.insert(key.clone(), String::new());
            i += 1;
            continue;
        }
        let Some(value) = args.get(i + 1) else {
            return Err(format!("falta el valor de {key}"));
        };
        out.insert(key.clone(), value.clone());
        i += 2;
    }
    Ok(out)
}

fn project_path(flags: &BTreeMap<String, String>) -> PathBuf {
    flags.get("--path").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

fn exit_code_for(e: &PersistenceError) -> i32 {
    match e {
        PersistenceError::NotInitialized(_)
        | PersistenceError::MissingManifest(_)
        | PersistenceError::UnknownPort { .. }
        | PersistenceError::MissingArtifact { .. } => EXIT_NOT_FOUND,
        _ => EXIT_RUNTIME,
    }
}

fn cmd_init(flags: &BTreeMap<String, String>) -> i32 {
    let mut config = match ProjectConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[potflow init] {e}");
            return EXIT_RUNTIME;
        }
    };
    if flags.contains_key("--no-vcs") {
        config = config.with_vcs(VcsKind::None);
    }
    let path = project_path(flags);
    match Project::init(&path, &config) {
        Ok(p) => {
            println!("initialized project '{}' at {}", p.meta().name, path.display());
            0
        }
        Err(e) => {
            eprintln!("[potflow init] {e}");
            exit_code_for(&e)
        }
    }
}

fn cmd_generate(flags: &BTreeMap<String, String>) -> i32 {
    let Some(out) = flags.get("--out") else {
        eprintln!("[potflow generate] falta --out <FILE>\n{USAGE}");
        return EXIT_USAGE;
    };
    let mut config = SyntheticConfig::default();
    if let Some(n) = flags.get("--n") {
        match n.parse() {
            Ok(n) => config = config.with_n(n),
            Err(_) => {
                eprintln!("[potflow generate] --n inválido: {n}");
                return EXIT_USAGE;
            }
        }
    }
    if let Some(seed) = flags.get("--seed") {
        match seed.parse() {
            Ok(s) => config = config.with_seed(s),
            Err(_) => {
                eprintln!("[potflow generate] --seed inválido: {seed}");
                return EXIT_USAGE;
            }
        }
    }
    let written = generate(&config).map_err(|e| e.to_string())
                                   .and_then(|records| {
                                       extxyz::write_path(out, &records).map(|_| records.len())
                                                                        .map_err(|e| e.to_string())
                                   });
    match written {
        Ok(n) => {
            println!("wrote {n} structures to {out}");
            0
        }
        Err(e) => {
            eprintln!("[potflow generate] {e}");
            EXIT_RUNTIME
        }
    }
}

fn cmd_status(flags: &BTreeMap<String, String>) -> i32 {
    let result = Project::open(project_path(flags)).and_then(|p| p.manifests());
    match result {
        Ok(manifests) if manifests.is_empty() => {
            println!("no nodes have run yet");
            0
        }
        Ok(manifests) => {
            for m in manifests {
                let ports: Vec<String> = m.outputs
                                          .iter()
                                          .map(|(port, hash)| format!("{port}={}", short_hash(hash)))
                                          .collect();
                println!("{:<24} flow={} {}", m.node, m.flow_id, ports.join(" "));
            }
            0
        }
        Err(e) => {
            eprintln!("[potflow status] {e}");
            exit_code_for(&e)
        }
    }
}

fn cmd_show(flags: &BTreeMap<String, String>) -> i32 {
    let Some(node) = flags.get("--node") else {
        eprintln!("[potflow show] falta --node <NAME>\n{USAGE}");
        return EXIT_USAGE;
    };
    let project = match Project::open(project_path(flags)) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[potflow show] {e}");
            return exit_code_for(&e);
        }
    };
    let rendered = match flags.get("--port") {
        Some(port) => project.load_artifact(node, port).map(|a| serde_json::to_string_pretty(&a.payload)),
        None => project.load_outputs(node).map(|m| serde_json::to_string_pretty(&m)),
    };
    match rendered {
        Ok(Ok(text)) => {
            println!("{text}");
            0
        }
        Ok(Err(e)) => {
            eprintln!("[potflow show] {e}");
            EXIT_RUNTIME
        }
        Err(e) => {
            eprintln!("[potflow show] {e}");
            exit_code_for(&e)
        }
    }
}

/// Prefijo de 12 caracteres para listados.
fn short_hash(hash: &str) -> String {
    hash.chars().take(12).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_accept_values_and_switches() {
        let f = parse_flags(&args(&["--path", "proj", "--no-vcs"]), &["--no-vcs"]).unwrap();
        assert_eq!(f["--path"], "proj");
        assert!(f.contains_key("--no-vcs"));
    }

    #[test]
    fn missing_value_is_a_usage_error() {
        assert!(parse_flags(&args(&["--out"]), &[]).is_err());
        assert!(parse_flags(&args(&["stray"]), &[]).is_err());
    }

    #[test]
    fn not_found_errors_map_to_exit_4() {
        assert_eq!(exit_code_for(&PersistenceError::MissingManifest("x".into())), EXIT_NOT_FOUND);
        assert_eq!(exit_code_for(&PersistenceError::Vcs("boom".into())), EXIT_RUNTIME);
    }

    #[test]
    fn short_hash_counts_characters() {
        assert_eq!(short_hash("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_hash("abc"), "abc");
        assert_eq!(short_hash("ééééééééééééé"), "éééééééééééé");
    }
}
