pub mod codegen_error;
pub mod config;
pub mod go;

pub use codegen_error::CodegenError;
pub use config::CodegenConfig;
pub use go::{GoGenerator, generate};
