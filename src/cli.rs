use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::bytecode::{ProgramIr, disasm};
use crate::codegen::CodegenConfig;
use crate::codegen::config::DEFAULT_TAPE_SIZE;
use crate::driver::{self, DriverError, PipelineOptions, Toolchain};
use crate::frontend::Scanner;
use crate::frontend::op_dumper::OpDumper;
use crate::runtime::{Vm, VmConfig};

#[derive(Parser, Debug)]
#[command(name = "bfgo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(after_help = "# Examples:\n\n\
    ## Write hello.go:\n\
    bfgo export hello.bf hello\n\n\
    ## Build a stripped executable:\n\
    bfgo build hello.bf hello --compress\n\n\
    ## Compile and run through the Go toolchain:\n\
    bfgo run hello.bf")]
#[command(about = "Compiles Brainfuck programs to Go.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Args, Debug, Clone)]
struct PipelineArgs {
    /// Skip the peephole optimizer
    #[arg(long, default_value_t = false)]
    no_optimize: bool,

    /// Number of tape cells
    #[arg(long, default_value_t = DEFAULT_TAPE_SIZE)]
    tape_size: usize,
}

impl PipelineArgs {
    fn options(&self) -> PipelineOptions {
        PipelineOptions {
            optimize: !self.no_optimize,
            codegen: CodegenConfig::new().with_tape_size(self.tape_size),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the generated Go source to <OUTPUT>.go
    Export {
        source: PathBuf,
        output: PathBuf,
        #[clap(flatten)]
        pipeline: PipelineArgs,
    },
    /// Build an executable with `go build`
    Build {
        source: PathBuf,
        output: PathBuf,
        /// Compress the executable with `upx --brute`
        #[arg(long, default_value_t = false)]
        compress: bool,
        #[clap(flatten)]
        pipeline: PipelineArgs,
    },
    /// Compile to a temporary Go file and `go run` it
    Run {
        source: PathBuf,
        #[clap(flatten)]
        pipeline: PipelineArgs,
    },
    /// Print the generated Go source to stdout
    Emit {
        source: PathBuf,
        #[clap(flatten)]
        pipeline: PipelineArgs,
    },
    /// Execute with the built-in interpreter
    Interpret {
        #[arg(required_unless_present = "ir")]
        source: Option<PathBuf>,
        /// Load a saved opcode stream instead of a source file
        #[arg(long, conflicts_with = "source")]
        ir: Option<PathBuf>,
        /// Abort after this many executed opcodes
        #[arg(long)]
        max_steps: Option<usize>,
        #[clap(flatten)]
        pipeline: PipelineArgs,
    },
    /// List the opcode stream
    Ops {
        source: PathBuf,
        /// Show scanner output with source positions
        #[arg(long, default_value_t = false)]
        raw: bool,
        #[arg(long, default_value_t = false)]
        no_color: bool,
        /// Mnemonic form instead of Debug form (with --raw)
        #[arg(long, default_value_t = false)]
        pretty: bool,
        /// Print opcode frequencies
        #[arg(long, default_value_t = false)]
        stats: bool,
        /// Save the stream to this file
        #[arg(long)]
        emit: Option<PathBuf>,
        #[clap(flatten)]
        pipeline: PipelineArgs,
    },
}

impl Cli {
    pub fn run(self) -> miette::Result<()> {
        init_tracing(self.verbose);

        match self.command {
            Commands::Export {
                source,
                output,
                pipeline,
            } => {
                let go = compile_file(&source, &pipeline)?;
                let written = driver::export(&go, &output)?;
                eprintln!("Exported {}", written.display());
            }
            Commands::Build {
                source,
                output,
                compress,
                pipeline,
            } => {
                let go = compile_file(&source, &pipeline)?;
                let toolchain = Toolchain::locate()?;
                let go_file = driver::export(&go, &output)?;
                let exe = executable_path(&output);
                toolchain.build(&go_file, &exe)?;
                if compress {
                    driver::compress(&exe)?;
                }
                eprintln!("Built {}", exe.display());
            }
            Commands::Run { source, pipeline } => {
                let go = compile_file(&source, &pipeline)?;
                Toolchain::locate()?.run_source(&go)?;
            }
            Commands::Emit { source, pipeline } => {
                let go = compile_file(&source, &pipeline)?;
                let mut stdout = io::stdout().lock();
                stdout.write_all(go.as_bytes()).into_diagnostic()?;
            }
            Commands::Interpret {
                source,
                ir,
                max_steps,
                pipeline,
            } => {
                let ops = match (ir, source) {
                    (Some(ir_path), _) => load_ir(&ir_path)?.ops,
                    (None, Some(source)) => {
                        let text = driver::read_source(&source)?;
                        driver::compile_ops(&text, &pipeline.options())?.into_vec()
                    }
                    (None, None) => return Err(miette::miette!("no program given")),
                };

                let mut vm = Vm::with_config(VmConfig {
                    tape_size: pipeline.tape_size,
                    max_steps,
                });
                let mut input = io::stdin().lock();
                let mut output = BufWriter::new(io::stdout().lock());
                vm.run(&ops, &mut input, &mut output)
                    .map_err(DriverError::from)?;
            }
            Commands::Ops {
                source,
                raw,
                no_color,
                pretty,
                stats,
                emit,
                pipeline,
            } => {
                let text = driver::read_source(&source)?;

                if raw {
                    let mut dumper = OpDumper::new();
                    if no_color {
                        dumper = dumper.no_color();
                    }
                    if pretty {
                        dumper = dumper.pretty();
                    }
                    dumper.dump(&Scanner::new(&text).scan_spanned());
                }

                let options = pipeline.options();
                let ops = driver::compile_ops(&text, &options)?.into_vec();

                if !raw {
                    disasm::print_ops(&ops);
                }
                if stats {
                    disasm::print_stats(&ops);
                }
                if let Some(path) = emit {
                    let ir = ProgramIr::new(ops, options.optimize);
                    let bytes = ir.to_bytes().map_err(DriverError::from)?;
                    driver::write_file(&path, &bytes)?;
                    info!(path = %path.display(), "opcode stream saved");
                }
            }
        }

        Ok(())
    }
}

fn compile_file(path: &Path, pipeline: &PipelineArgs) -> Result<String, DriverError> {
    let source = driver::read_source(path)?;
    driver::compile(&source, &pipeline.options())
}

fn load_ir(path: &Path) -> Result<ProgramIr, DriverError> {
    let bytes = std::fs::read(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ProgramIr::from_bytes(&bytes)?)
}

/// `prog.go` builds `prog`; anything else is used as given.
fn executable_path(output: &Path) -> PathBuf {
    if output.extension().and_then(|e| e.to_str()) == Some("go") {
        output.with_extension("")
    } else {
        output.to_path_buf()
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // ignore the error when a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
