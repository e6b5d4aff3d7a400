use std::collections::VecDeque;

use crate::bytecode::Op;

/// Ordered, owned sequence of opcodes handed from one pipeline stage to the
/// next. Insertion order is program order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpQueue {
    ops: VecDeque<Op>,
}

impl OpQueue {
    pub fn new() -> Self {
        Self {
            ops: VecDeque::new(),
        }
    }

    pub fn push_tail(&mut self, op: Op) {
        self.ops.push_back(op);
    }

    /// Put an op back in front of everything else.
    pub fn push_head(&mut self, op: Op) {
        self.ops.push_front(op);
    }

    /// None means the queue is drained, which is the normal way a stage ends.
    pub fn pop_head(&mut self) -> Option<Op> {
        self.ops.pop_front()
    }

    pub fn pop_tail(&mut self) -> Option<Op> {
        self.ops.pop_back()
    }

    /// Look `offset` elements past the front without removing anything.
    /// Out of range yields None.
    pub fn peek_at(&self, offset: usize) -> Option<&Op> {
        self.ops.get(offset)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter()
    }

    pub fn contains(&self, op: &Op) -> bool {
        self.ops.contains(op)
    }

    pub fn into_vec(self) -> Vec<Op> {
        self.ops.into()
    }
}

impl FromIterator<Op> for OpQueue {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Op>> for OpQueue {
    fn from(ops: Vec<Op>) -> Self {
        Self { ops: ops.into() }
    }
}

/// Draining iterator; each pop is consumed exactly once.
impl Iterator for OpQueue {
    type Item = Op;

    fn next(&mut self) -> Option<Op> {
        self.pop_head()
    }
}
