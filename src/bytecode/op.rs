use serde::{Deserialize, Serialize};

// =============================================================================
// OP - Brainfuck opcodes
// =============================================================================

/// One instruction of the intermediate representation.
///
/// The four tape-arithmetic kinds carry a repetition count produced by
/// run-length compression. The count is always at least 1 when the op comes
/// out of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    // pointer movement
    MovePtrForward(u32),
    MovePtrBackward(u32),

    // cell arithmetic (mod 256)
    IncrementCell(u32),
    DecrementCell(u32),

    // I/O
    OutputCell,
    InputCell,

    // control flow
    LoopBegin,
    LoopEnd,

    /// Produced only by the optimizer from the `[-]` idiom.
    ClearCell,
}

impl Op {
    /// Map a source character to a fresh op with a count of 1.
    /// Returns None for characters that are not instructions.
    pub fn from_char(ch: char) -> Option<Op> {
        Some(match ch {
            '>' => Op::MovePtrForward(1),
            '<' => Op::MovePtrBackward(1),
            '+' => Op::IncrementCell(1),
            '-' => Op::DecrementCell(1),
            '.' => Op::OutputCell,
            ',' => Op::InputCell,
            '[' => Op::LoopBegin,
            ']' => Op::LoopEnd,
            _ => return None,
        })
    }

    /// Repetition count, only for run-length compressible kinds.
    pub fn count(&self) -> Option<u32> {
        match self {
            Op::MovePtrForward(n)
            | Op::MovePtrBackward(n)
            | Op::IncrementCell(n)
            | Op::DecrementCell(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_compressible(&self) -> bool {
        self.count().is_some()
    }

    /// True when `other` is the same compressible kind, ignoring counts.
    pub fn same_run_kind(&self, other: &Op) -> bool {
        matches!(
            (self, other),
            (Op::MovePtrForward(_), Op::MovePtrForward(_))
                | (Op::MovePtrBackward(_), Op::MovePtrBackward(_))
                | (Op::IncrementCell(_), Op::IncrementCell(_))
                | (Op::DecrementCell(_), Op::DecrementCell(_))
        )
    }

    /// Copy of this op with its count bumped by one. `None` for
    /// non-compressible ops and for a count already at `u32::MAX`; the
    /// caller starts a fresh run instead.
    pub fn extended(self) -> Option<Op> {
        match self {
            Op::MovePtrForward(n) => n.checked_add(1).map(Op::MovePtrForward),
            Op::MovePtrBackward(n) => n.checked_add(1).map(Op::MovePtrBackward),
            Op::IncrementCell(n) => n.checked_add(1).map(Op::IncrementCell),
            Op::DecrementCell(n) => n.checked_add(1).map(Op::DecrementCell),
            _ => None,
        }
    }

    /// Short upper-case mnemonic used by the listings.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::MovePtrForward(_) => "FWD",
            Op::MovePtrBackward(_) => "BACK",
            Op::IncrementCell(_) => "INC",
            Op::DecrementCell(_) => "DEC",
            Op::OutputCell => "OUT",
            Op::InputCell => "IN",
            Op::LoopBegin => "LOOP",
            Op::LoopEnd => "END",
            Op::ClearCell => "CLEAR",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.count() {
            Some(n) => write!(f, "{} {}", self.mnemonic(), n),
            None => write!(f, "{}", self.mnemonic()),
        }
    }
}
