//! # bfgo
//!
//! Compiles Brainfuck to Go.
//!
//! The pipeline is strictly linear, and each stage takes ownership of the
//! queue produced by the one before it:
//!
//! ```text
//! source text -> scan -> OpQueue -> optimize -> OpQueue -> generate -> Go source
//! ```
//!
//! The driver and CLI around it read files and hand the generated text to the
//! Go toolchain.

pub mod bytecode;
pub mod cli;
pub mod codegen;
pub mod driver;
pub mod frontend;
pub mod runtime;

pub use bytecode::{Op, OpQueue, optimize};
pub use codegen::{CodegenConfig, CodegenError, generate};
pub use frontend::scan;

/// Scan, optimize and generate in one call. Unlike the driver this accepts a
/// program without instructions and produces an empty Go program for it.
pub fn transpile(source: &str, config: &CodegenConfig) -> Result<String, CodegenError> {
    generate(optimize(scan(source)), config)
}
