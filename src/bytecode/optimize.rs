use tracing::debug;

use crate::bytecode::{Op, OpQueue};

// =============================================================================
// Peephole pass
// =============================================================================

/// Rewrite every `[-]` in the stream into a single `ClearCell`.
///
/// Single left-to-right pass. When a `LoopBegin` is seen, the next two ops are
/// inspected in place. On a match all three are consumed; otherwise only the
/// `LoopBegin` is committed and the two lookahead ops stay in the source queue,
/// in order, to be visited next. Missing lookahead (a truncated program) is
/// simply a non-match.
pub fn optimize(mut source: OpQueue) -> OpQueue {
    let mut output = OpQueue::new();
    let mut rewrites = 0usize;

    while let Some(op) = source.pop_head() {
        if op == Op::LoopBegin && is_clear_idiom(&source) {
            source.pop_head();
            source.pop_head();
            output.push_tail(Op::ClearCell);
            rewrites += 1;
            continue;
        }

        output.push_tail(op);
    }

    debug!(rewrites, ops = output.len(), "peephole pass finished");
    output
}

/// Checks the two ops following an already-consumed `LoopBegin`.
fn is_clear_idiom(rest: &OpQueue) -> bool {
    matches!(
        (rest.peek_at(0), rest.peek_at(1)),
        (Some(Op::DecrementCell(1)), Some(Op::LoopEnd))
    )
}
