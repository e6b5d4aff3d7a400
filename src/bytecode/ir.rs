use crate::bytecode::Op;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAGIC: [u8; 4] = *b"BFGO";
const VERSION: u16 = 1;

/// An opcode stream in a form that can be written to disk and loaded back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramIr {
    magic: [u8; 4],
    version: u16,
    /// Whether the peephole pass has already run over `ops`.
    pub optimized: bool,
    pub ops: Vec<Op>,
}

#[derive(Debug, Error)]
pub enum IrError {
    #[error("failed to encode opcode stream: {0}")]
    Encode(postcard::Error),
    #[error("failed to decode opcode stream: {0}")]
    Decode(postcard::Error),
    #[error("not an opcode stream file (bad magic)")]
    BadMagic,
    #[error("unsupported opcode stream version {0} (expected {expected})", expected = VERSION)]
    UnsupportedVersion(u16),
}

impl ProgramIr {
    pub fn new(ops: Vec<Op>, optimized: bool) -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            optimized,
            ops,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, IrError> {
        postcard::to_allocvec(self).map_err(IrError::Encode)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IrError> {
        let ir: ProgramIr = postcard::from_bytes(bytes).map_err(IrError::Decode)?;

        if ir.magic != MAGIC {
            return Err(IrError::BadMagic);
        }
        if ir.version != VERSION {
            return Err(IrError::UnsupportedVersion(ir.version));
        }

        Ok(ir)
    }
}
