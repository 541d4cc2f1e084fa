//! Strata CLI

use std::fs;
use std::path::PathBuf;
use std::process::{Command as Process, ExitCode};

use clap::{Parser, Subcommand};
use strata_catalog::Catalog;
use strata_codegen::Codegen;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod frame;
mod queries;

#[derive(Parser)]
#[command(name = "strata")]
#[command(version = "0.1.0")]
#[command(about = "A push-based query compiler for columnar TPC-H data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import TPC-H .tbl files into binary column files
    Import {
        /// Directory containing the .tbl files
        tbl_dir: PathBuf,
        /// Output directory for column files
        #[arg(long, default_value = "data")]
        out: PathBuf,
    },
    /// Compile a built-in query to a C++ program
    Compile {
        /// Query name (see `strata queries`)
        query: String,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// How many times the program repeats the query body
        #[arg(long, default_value_t = 1)]
        repeat: u32,
        /// Emit only the query body, without the program frame
        #[arg(long)]
        body_only: bool,
    },
    /// Compile a query, build it with the system C++ compiler, and run it
    Run {
        /// Query name (see `strata queries`)
        query: String,
        /// Directory containing imported column files
        data_dir: PathBuf,
        #[arg(long, default_value_t = 1)]
        repeat: u32,
    },
    /// List built-in queries
    Queries,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::tpch();

    match cli.command {
        Command::Import { tbl_dir, out } => {
            let stats = strata_storage::import_all(&catalog, &tbl_dir, &out)?;
            info!(
                relations = stats.rows.len(),
                rows = stats.total_rows(),
                "import finished"
            );
            Ok(())
        }
        Command::Compile {
            query,
            out,
            repeat,
            body_only,
        } => {
            let program = compile(&catalog, &query, repeat, body_only)?;
            match out {
                Some(path) => fs::write(path, program)?,
                None => print!("{program}"),
            }
            Ok(())
        }
        Command::Run {
            query,
            data_dir,
            repeat,
        } => {
            let program = compile(&catalog, &query, repeat, false)?;

            let workdir = tempfile::tempdir()?;
            let source = workdir.path().join("query.cpp");
            let binary = workdir.path().join("query");
            fs::write(&source, program)?;

            let cxx = std::env::var("CXX").unwrap_or_else(|_| "c++".to_string());
            debug!(compiler = %cxx, "building query program");
            let status = Process::new(&cxx)
                .arg("-O2")
                .arg("-std=c++20")
                .arg(&source)
                .arg("-o")
                .arg(&binary)
                .status()?;
            if !status.success() {
                return Err(format!("{cxx} failed with {status}").into());
            }

            info!(query = %query, "running");
            let status = Process::new(&binary).arg(&data_dir).status()?;
            if !status.success() {
                return Err(format!("query program failed with {status}").into());
            }
            Ok(())
        }
        Command::Queries => {
            for (name, about) in queries::QUERIES {
                println!("{name:<22} {about}");
            }
            Ok(())
        }
    }
}

fn compile(
    catalog: &Catalog,
    query: &str,
    repeat: u32,
    body_only: bool,
) -> Result<String, queries::QueryError> {
    let mut gen = Codegen::new();
    queries::emit(&mut gen, catalog, query, repeat)?;
    let body = gen.finish();
    debug!(query, bytes = body.len(), "emitted query body");
    if body_only {
        Ok(body)
    } else {
        Ok(frame::wrap_program(catalog, &body))
    }
}
