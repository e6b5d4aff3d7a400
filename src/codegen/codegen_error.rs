use miette::Diagnostic;
use thiserror::Error;

/// Structural problems found while generating code. Generation stops at the
/// first one and no text is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CodegenError {
    /// A `]` with no open loop
    #[error("mismatched loop close: ']' at op {index} has no matching '['")]
    #[diagnostic(
        code(bfgo::codegen::unmatched_loop_end),
        help("remove the extra ']' or add a '[' before it")
    )]
    UnmatchedLoopEnd { index: usize },

    /// A `[` still open when the stream ran out
    #[error("unclosed loop: '[' at op {index} is never closed ({depth} loop(s) open at end)")]
    #[diagnostic(
        code(bfgo::codegen::unclosed_loop),
        help("add the missing ']' at the end of the loop body")
    )]
    UnclosedLoop { index: usize, depth: usize },

    /// A compressible op with a repetition count of zero
    #[error("op {index} has a repetition count of zero")]
    #[diagnostic(
        code(bfgo::codegen::empty_run),
        help("opcode streams built by hand must use counts of 1 or more")
    )]
    EmptyRun { index: usize },
}

impl CodegenError {
    /// Index into the opcode stream where the problem was found.
    pub fn index(&self) -> usize {
        match self {
            CodegenError::UnmatchedLoopEnd { index }
            | CodegenError::UnclosedLoop { index, .. }
            | CodegenError::EmptyRun { index } => *index,
        }
    }
}
