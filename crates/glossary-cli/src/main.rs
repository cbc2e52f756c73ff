//! `glossary-cli`: operaciones del glosario y carga de fixtures contra
//! Postgres (`DATABASE_URL`). Toda salida exitosa es JSON por stdout.
//!
//! Códigos de salida: 0 ok, 2 uso, 4 no encontrado / validación, 5 backend.

use std::path::PathBuf;

use glossary_core::constants::DEFAULT_FIXTURES_DIR;
use glossary_core::loader::discover_fixtures;
use glossary_core::{FixtureLoader, FixtureResult};
use glossary_domain::{DomainError, GlossaryService, GlossaryTermPatch, NewGlossaryTerm, DEFAULT_PAGE_LIMIT};
use glossary_persistence::{namespace, PgFixtureSession, PgGlossaryRepository, PoolProvider};
use serde::Serialize;

const USAGE: &str = "uso: glossary-cli <comando>
  load [--dir <DIR>] [--ignore-errors] [--dry-run]
  list [--limit <N>] [--offset <N>]
  search <QUERY> [--limit <N>] [--offset <N>]
  get <ID>
  create --term <TERM> --definition <DEF>
  update <ID> [--term <TERM>] [--definition <DEF>]
  delete <ID>";

#[derive(Debug, PartialEq)]
enum Command {
    Load { dir: PathBuf, ignore_errors: bool, dry_run: bool },
    List { limit: i64, offset: i64 },
    Search { query: String, limit: i64, offset: i64 },
    Get { id: i64 },
    Create { term: String, definition: String },
    Update { id: i64, patch: GlossaryTermPatch },
    Delete { id: i64 },
}

/// Posicionales y opciones `--clave valor` / `--bandera`.
#[derive(Default)]
struct Args {
    positional: Vec<String>,
    options: Vec<(String, Option<String>)>,
}

const FLAGS: &[&str] = &["--ignore-errors", "--dry-run"];

impl Args {
    fn parse(raw: &[String]) -> Result<Self, String> {
        let mut args = Args::default();
        let mut i = 0;
        while i < raw.len() {
            let a = &raw[i];
            if FLAGS.contains(&a.as_str()) {
                args.options.push((a.clone(), None));
            } else if a.starts_with("--") {
                i += 1;
                let value = raw.get(i).ok_or_else(|| format!("falta valor para {a}"))?;
                args.options.push((a.clone(), Some(value.clone())));
            } else {
                args.positional.push(a.clone());
            }
            i += 1;
        }
        Ok(args)
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_deref())
    }

    fn flag(&self, name: &str) -> bool {
        self.options.iter().any(|(k, _)| k == name)
    }

    fn number(&self, name: &str, default: i64) -> Result<i64, String> {
        match self.value(name) {
            None => Ok(default),
            Some(v) => v.parse().map_err(|_| format!("{name} debe ser entero, recibido '{v}'")),
        }
    }

    fn id(&self) -> Result<i64, String> {
        let raw = self.positional.first().ok_or("falta <ID>")?;
        raw.parse().map_err(|_| format!("<ID> debe ser entero, recibido '{raw}'"))
    }
}

fn parse_command(raw: &[String]) -> Result<Command, String> {
    let (name, rest) = raw.split_first().ok_or("falta comando")?;
    let args = Args::parse(rest)?;
    let cmd = match name.as_str() {
        "load" => Command::Load { dir: PathBuf::from(args.value("--dir").unwrap_or(DEFAULT_FIXTURES_DIR)),
                                  ignore_errors: args.flag("--ignore-errors"),
                                  dry_run: args.flag("--dry-run") },
        "list" => Command::List { limit: args.number("--limit", DEFAULT_PAGE_LIMIT)?,
                                  offset: args.number("--offset", 0)? },
        "search" => Command::Search { query: args.positional.first().cloned().ok_or("falta <QUERY>")?,
                                      limit: args.number("--limit", DEFAULT_PAGE_LIMIT)?,
                                      offset: args.number("--offset", 0)? },
        "get" => Command::Get { id: args.id()? },
        "create" => Command::Create { term: args.value("--term").ok_or("falta --term")?.to_string(),
                                      definition: args.value("--definition").ok_or("falta --definition")?.to_string() },
        "update" => Command::Update { id: args.id()?,
                                      patch: GlossaryTermPatch { term: args.value("--term").map(str::to_string),
                                                                 definition: args.value("--definition")
                                                                                 .map(str::to_string) } },
        "delete" => Command::Delete { id: args.id()? },
        other => return Err(format!("comando desconocido: {other}")),
    };
    Ok(cmd)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => {
            eprintln!("[glossary-cli] error serializando salida: {e}");
            std::process::exit(5);
        }
    }
}

fn exit_for(e: &DomainError) -> i32 {
    if e.status_code() >= 500 { 5 } else { 4 }
}

fn run(cmd: Command, provider: PoolProvider) -> Result<(), DomainError> {
    if let Command::Load { dir, ignore_errors, .. } = &cmd {
        let session = PgFixtureSession::from_provider(&provider)?;
        let mut loader = FixtureLoader::new(session, namespace());
        loader.load_all_fixtures(dir, *ignore_errors);
        print_json(&loader.summary());
        return Ok(());
    }

    let mut svc = GlossaryService::new(PgGlossaryRepository::new(provider));
    match cmd {
        Command::List { limit, offset } => print_json(&svc.list(limit, offset)?),
        Command::Search { query, limit, offset } => print_json(&svc.search(&query, limit, offset)?),
        Command::Get { id } => print_json(&svc.get(id)?),
        Command::Create { term, definition } => print_json(&svc.create(NewGlossaryTerm::new(term, definition))?),
        Command::Update { id, patch } => print_json(&svc.update(id, patch)?),
        Command::Delete { id } => print_json(&svc.delete(id)?),
        Command::Load { .. } => {}
    }
    Ok(())
}

/// Lista los fixtures que se cargarían, sin tocar la base.
fn dry_run(dir: &std::path::Path) {
    let files = match discover_fixtures(dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("[glossary-cli] no se pudo listar {}: {e}", dir.display());
            std::process::exit(5);
        }
    };
    let planned: Vec<FixtureResult> = files.iter()
                                           .filter_map(|p| p.file_name())
                                           .map(|n| FixtureResult::skipped(n.to_string_lossy()))
                                           .collect();
    print_json(&planned);
}

fn main() {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = match parse_command(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[glossary-cli] {e}\n{USAGE}");
            std::process::exit(2);
        }
    };

    if let Command::Load { dir, dry_run: true, .. } = &cmd {
        dry_run(dir);
        return;
    }

    let pool = match glossary_persistence::build_dev_pool_from_env() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[glossary-cli] pool error: {e}");
            std::process::exit(5);
        }
    };

    if let Err(e) = run(cmd, PoolProvider { pool }) {
        let body = serde_json::json!({ "status_code": e.status_code(), "detail": e.to_string(), "errors": e.field_errors() });
        eprintln!("{body}");
        std::process::exit(exit_for(&e));
    }
}
