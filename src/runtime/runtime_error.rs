use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime error: loop bracket at op {index} has no partner")]
    UnmatchedLoop { index: usize },

    #[error("runtime error: pointer moved out of the tape at op {index} (tape size {tape_size})")]
    PointerOutOfBounds { index: usize, tape_size: usize },

    #[error("runtime error: execution step limit exceeded ({0})")]
    StepLimit(usize),

    #[error("runtime error: i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
