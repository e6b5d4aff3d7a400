use miette::Diagnostic;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::{debug, info};

use crate::bytecode::{IrError, OpQueue, optimize};
use crate::codegen::{CodegenConfig, CodegenError, generate};
use crate::frontend::scan;
use crate::runtime::RuntimeError;

#[derive(Debug, Error, Diagnostic)]
pub enum DriverError {
    #[error("failed to read '{}': {source}", .path.display())]
    #[diagnostic(code(bfgo::read))]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{}': {source}", .path.display())]
    #[diagnostic(code(bfgo::write))]
    Write { path: PathBuf, source: io::Error },

    #[error("input program contains no instructions")]
    #[diagnostic(
        code(bfgo::empty_program),
        help("a program needs at least one of the characters > < + - . , [ ]")
    )]
    EmptyProgram,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    #[diagnostic(code(bfgo::runtime))]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    #[diagnostic(code(bfgo::ir))]
    Ir(#[from] IrError),

    #[error("'{tool}' was not found in PATH")]
    #[diagnostic(
        code(bfgo::tool_not_found),
        help("install the tool or add its directory to PATH")
    )]
    ToolNotFound { tool: String, source: which::Error },

    #[error("failed to start '{tool}': {source}")]
    #[diagnostic(code(bfgo::spawn))]
    Spawn { tool: String, source: io::Error },

    #[error("'{tool}' exited with {status}")]
    #[diagnostic(code(bfgo::tool_failed))]
    ToolFailed { tool: String, status: ExitStatus },

    #[error("failed to create a temporary directory: {0}")]
    #[diagnostic(code(bfgo::tempdir))]
    TempDir(io::Error),
}

// =============================================================================
// Pipeline
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub optimize: bool,
    pub codegen: CodegenConfig,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            codegen: CodegenConfig::default(),
        }
    }
}

pub fn read_source(path: &Path) -> Result<String, DriverError> {
    fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Scan and (optionally) optimize. A program with no instructions at all is
/// rejected here rather than compiled into an empty Go program.
pub fn compile_ops(source: &str, options: &PipelineOptions) -> Result<OpQueue, DriverError> {
    info!("scanning");
    let scanned = scan(source);
    if scanned.is_empty() {
        return Err(DriverError::EmptyProgram);
    }
    debug!(ops = scanned.len(), "scanned");

    if options.optimize {
        info!("optimizing");
        Ok(optimize(scanned))
    } else {
        Ok(scanned)
    }
}

/// Full pipeline: source text to Go source text.
pub fn compile(source: &str, options: &PipelineOptions) -> Result<String, DriverError> {
    let ops = compile_ops(source, options)?;
    info!(ops = ops.len(), "generating go source");
    Ok(generate(ops, &options.codegen)?)
}

/// `out` with a `.go` suffix appended unless it already has one.
pub fn go_path(out: &Path) -> PathBuf {
    if out.extension().and_then(|e| e.to_str()) == Some("go") {
        return out.to_path_buf();
    }
    let mut name = OsString::from(out.as_os_str());
    name.push(".go");
    PathBuf::from(name)
}

pub fn write_file(path: &Path, contents: &[u8]) -> Result<(), DriverError> {
    fs::write(path, contents).map_err(|source| DriverError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write generated Go next to `out` and return the path written.
pub fn export(go_source: &str, out: &Path) -> Result<PathBuf, DriverError> {
    let path = go_path(out);
    write_file(&path, go_source.as_bytes())?;
    info!(path = %path.display(), "exported");
    Ok(path)
}

// =============================================================================
// Go toolchain
// =============================================================================

pub struct Toolchain {
    go: PathBuf,
}

impl Toolchain {
    /// Find `go` on PATH.
    pub fn locate() -> Result<Self, DriverError> {
        Ok(Self {
            go: locate_tool("go")?,
        })
    }

    /// `go build -ldflags "-s -w" -o <exe> <go_file>`
    pub fn build(&self, go_file: &Path, exe: &Path) -> Result<(), DriverError> {
        info!(source = %go_file.display(), exe = %exe.display(), "building");
        let mut cmd = Command::new(&self.go);
        cmd.args(["build", "-ldflags", "-s -w", "-o"])
            .arg(exe)
            .arg(go_file);
        run_command("go", cmd)
    }

    /// `go run <go_file>` with the terminal's stdio.
    pub fn run(&self, go_file: &Path) -> Result<(), DriverError> {
        info!(source = %go_file.display(), "running");
        let mut cmd = Command::new(&self.go);
        cmd.arg("run").arg(go_file);
        run_command("go", cmd)
    }

    /// Write `go_source` into a scratch directory, run it, then clean up.
    pub fn run_source(&self, go_source: &str) -> Result<(), DriverError> {
        let dir = tempfile::tempdir().map_err(DriverError::TempDir)?;
        let go_file = dir.path().join("main.go");
        write_file(&go_file, go_source.as_bytes())?;
        self.run(&go_file)
    }
}

/// Shrink a built executable with `upx --brute`.
pub fn compress(exe: &Path) -> Result<(), DriverError> {
    let upx = locate_tool("upx")?;
    info!(exe = %exe.display(), "compressing");
    let mut cmd = Command::new(upx);
    cmd.arg("--brute").arg(exe);
    run_command("upx", cmd)
}

fn locate_tool(tool: &str) -> Result<PathBuf, DriverError> {
    which::which(tool).map_err(|source| DriverError::ToolNotFound {
        tool: tool.to_string(),
        source,
    })
}

/// Blocks until the child exits; there is no timeout.
fn run_command(tool: &str, mut cmd: Command) -> Result<(), DriverError> {
    debug!(?cmd, "spawning");
    let status = cmd.status().map_err(|source| DriverError::Spawn {
        tool: tool.to_string(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(DriverError::ToolFailed {
            tool: tool.to_string(),
            status,
        })
    }
}
