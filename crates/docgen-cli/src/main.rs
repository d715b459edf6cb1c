//! docgen CLI - knowledge document generator

mod args;
mod config;
mod output;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use docgen_core::encoding::decode_lines;
use docgen_core::schema::{split_statements, SchemaBuilder};
use docgen_core::render::{render_json, render_markdown};
use docgen_core::{KnowledgeBase, Severity, SqlDialect};
use miette::{IntoDiagnostic, Result};

use crate::args::{Args, Command, DocumentFormat, MessageFormat};
use crate::config::Config;
use crate::output::{OutputFormatter, Stream};

const DEFAULT_OUTPUT_DIR: &str = "docs";

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    match run(args) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else {
        match verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<bool> {
    let quiet = args.quiet;
    match args.command {
        Command::Generate {
            root,
            localpath,
            output,
            format,
            dialect,
            config: config_path,
            keep_going,
            message_format,
            stdout,
        } => {
            let config = match config_path {
                Some(path) => Config::from_file(&path)?,
                None => Config::find_and_load()?.unwrap_or_default(),
            };
            let config = config.merge_with_args(
                root.or(localpath).as_deref(),
                output.as_deref(),
                format,
                dialect.as_deref(),
                keep_going,
            );

            generate(&config, message_format, stdout, quiet)
        }

        Command::Schema { files, dialect } => {
            let dialect: SqlDialect = dialect.parse().map_err(|e: String| miette::miette!(e))?;
            let mut builder = SchemaBuilder::with_dialect(dialect);
            for file in &files {
                let bytes = fs::read(file).into_diagnostic()?;
                builder.parse_bytes(&file.display().to_string(), &bytes);
            }
            let (catalog, diagnostics) = builder.build();
            OutputFormatter::new(MessageFormat::Human).print_diagnostics(&diagnostics);

            println!("Schema Information:");
            println!("==================");
            for table in catalog.sorted_tables() {
                match &table.comment {
                    Some(comment) => println!("\nTable: {} ({})", table.name, comment),
                    None => println!("\nTable: {}", table.name),
                }
                for column in &table.columns {
                    match &column.comment {
                        Some(comment) => {
                            println!("  - {} {} -- {}", column.name, column.data_type, comment)
                        }
                        None => println!("  - {} {}", column.name, column.data_type),
                    }
                }
            }

            Ok(false)
        }

        Command::Statements { file } => {
            let bytes = fs::read(&file).into_diagnostic()?;
            let sql = decode_lines(&bytes);
            for stmt in split_statements(&sql) {
                println!("{:>4} [{:?}] {}", stmt.line, stmt.kind, stmt.text);
            }
            Ok(false)
        }
    }
}

fn generate(
    config: &Config,
    message_format: MessageFormat,
    stdout: bool,
    quiet: bool,
) -> Result<bool> {
    let root = PathBuf::from(config.root.as_deref().unwrap_or("."));
    let output_dir = PathBuf::from(config.output.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR));
    let format: DocumentFormat = match &config.format {
        Some(f) => f.parse().map_err(|e: String| miette::miette!(e))?,
        None => DocumentFormat::default(),
    };
    let dialect: SqlDialect = match &config.dialect {
        Some(d) => d.parse().map_err(|e: String| miette::miette!(e))?,
        None => SqlDialect::default(),
    };

    if !root.is_dir() {
        miette::bail!("{} is not a directory", root.display());
    }

    let mut kb = KnowledgeBase::with_dialect(dialect)?;
    let mut scanned = 0usize;

    // Go sources first, then SQL, so the document does not depend on walk order
    for extension in ["go", "sql"] {
        for path in collect_files(&root, extension)? {
            let relative = path.strip_prefix(&root).unwrap_or(&path).display().to_string();
            let bytes = fs::read(&path).into_diagnostic()?;

            match kb.ingest_file(&relative, &bytes) {
                Ok(true) => scanned += 1,
                Ok(false) => {}
                Err(e) if config.keep_going => kb.record_error(&e),
                Err(e) => return Err(e.into()),
            }
        }
    }

    let (enums, catalog, diagnostics) = kb.finish();
    diagnostics_formatter(message_format, stdout).print_diagnostics(&diagnostics);
    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);

    let document = match format {
        DocumentFormat::Markdown => render_markdown(&enums, &catalog),
        DocumentFormat::Json => render_json(&enums, &catalog).into_diagnostic()?,
    };

    if stdout {
        print!("{}", document);
        return Ok(has_errors);
    }

    let project = project_name(&root)?;
    fs::create_dir_all(&output_dir).into_diagnostic()?;
    let target = output_dir.join(format!("knowledge_{}.{}", project, format.extension()));
    fs::write(&target, document).into_diagnostic()?;

    if !quiet {
        eprintln!(
            "Wrote {} ({} enum group(s), {} table(s) from {} file(s))",
            target.display(),
            enums.len(),
            catalog.len(),
            scanned
        );
    }

    Ok(has_errors)
}

/// Diagnostics never share stdout with a document printed there
fn diagnostics_formatter(format: MessageFormat, stdout: bool) -> OutputFormatter {
    let stream = if stdout { Stream::Stderr } else { Stream::Stdout };
    OutputFormatter::new(format).with_json_stream(stream)
}

/// Regular files under `root` with the given extension, in sorted order
fn collect_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&root.display().to_string());
    let pattern = format!("{}/**/*.{}", base, extension);

    let mut files = Vec::new();
    for entry in glob::glob(&pattern).into_diagnostic()? {
        let path = entry.into_diagnostic()?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Base name of the scanned root, resolved so that `.` names the directory
fn project_name(root: &Path) -> Result<String> {
    let resolved = root.canonicalize().into_diagnostic()?;
    Ok(resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, rel: &str, contents: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn config_for(root: &Path, output: &Path) -> Config {
        Config {
            root: Some(root.display().to_string()),
            output: Some(output.display().to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_collect_files_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b/z.go", b"package b");
        write(dir.path(), "a/y.go", b"package a");
        write(dir.path(), "a/readme.md", b"# a");
        fs::create_dir_all(dir.path().join("dir.go")).unwrap();

        let files = collect_files(dir.path(), "go").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["a/y.go", "b/z.go"]);
    }

    #[test]
    fn test_generate_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("shop");
        write(
            &root,
            "order/status.go",
            b"package order\n\n// @ai order state\nconst (\n\tOrderPaid = 1 // paid\n)\n",
        );
        write(
            &root,
            "db/schema.sql",
            b"CREATE TABLE orders (id bigint);\nCOMMENT ON TABLE orders IS 'orders';\n",
        );
        let out = dir.path().join("out");

        let has_errors =
            generate(&config_for(&root, &out), MessageFormat::Human, false, true).unwrap();
        assert!(!has_errors);

        let doc = fs::read_to_string(out.join("knowledge_shop.md")).unwrap();
        assert!(doc.contains("## Order order state"));
        assert!(doc.contains("| OrderPaid | 1 | paid |"));
        assert!(doc.contains("## orders（orders）"));
    }

    #[test]
    fn test_generate_aborts_on_broken_go_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("svc");
        write(&root, "bad.go", b"package p\nconst (\n");
        let out = dir.path().join("out");

        let config = config_for(&root, &out);
        assert!(generate(&config, MessageFormat::Human, false, true).is_err());
        assert!(!out.exists());

        let config = Config {
            keep_going: true,
            ..config
        };
        let has_errors = generate(&config, MessageFormat::Json, false, true).unwrap();
        assert!(has_errors);
        assert!(out.join("knowledge_svc.md").exists());
    }

    #[test]
    fn test_stdout_document_moves_diagnostics_to_stderr() {
        let json = diagnostics_formatter(MessageFormat::Json, true);
        assert_eq!(json.stream(), Stream::Stderr);
        assert_eq!(diagnostics_formatter(MessageFormat::Json, false).stream(), Stream::Stdout);
        assert_eq!(diagnostics_formatter(MessageFormat::Human, false).stream(), Stream::Stderr);
    }

    #[test]
    fn test_generate_skips_unrelated_files_and_keeps_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("mixed");
        write(&root, "README.md", b"# not scanned");
        write(&root, "notes.txt", b"CREATE TABLE nope (id int);");
        write(&root, "db/comments.sql", b"COMMENT ON COLUMN ghost.id IS 'lost';\n");
        let out = dir.path().join("out");

        let config = Config {
            format: Some("json".to_string()),
            ..config_for(&root, &out)
        };
        assert!(!generate(&config, MessageFormat::Human, false, true).unwrap());

        let json = fs::read_to_string(out.join("knowledge_mixed.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let tables = value["tables"].as_array().unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0]["name"], "ghost");
        assert_eq!(tables[0]["columns"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_generate_json_format() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("proj");
        write(&root, "t.sql", b"CREATE TABLE t (id int);");
        let out = dir.path().join("out");

        let config = Config {
            format: Some("json".to_string()),
            ..config_for(&root, &out)
        };
        generate(&config, MessageFormat::Human, false, true).unwrap();

        let json = fs::read_to_string(out.join("knowledge_proj.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tables"][0]["name"], "t");
    }
}
