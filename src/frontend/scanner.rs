use tracing::debug;

use crate::bytecode::{Op, OpQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

/// An op together with the position of the first character of its run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub op: Op,
    pub span: Span,
}

/// Single-pass scanner with run-length compression.
///
/// Consecutive `>`, `<`, `+` or `-` collapse into one op carrying a count.
/// `.`, `,`, `[` and `]` are never merged. Every other character is a comment.
pub struct Scanner {
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current();
        if ch == Some('\n') {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.pos += 1;
        ch
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            col: self.col,
        }
    }

    /// Scan the whole source, keeping the position of every op.
    pub fn scan_spanned(&mut self) -> Vec<Spanned> {
        let mut out = Vec::new();
        // the run being accumulated; None is the "no run" sentinel
        let mut run: Option<Spanned> = None;

        while self.current().is_some() {
            let span = self.span();
            let Some(ch) = self.advance() else { break };
            let Some(op) = Op::from_char(ch) else {
                continue;
            };

            if op.is_compressible() {
                let grown = run
                    .as_mut()
                    .filter(|current| current.op.same_run_kind(&op))
                    .and_then(|current| current.op.extended().map(|next| current.op = next));

                // a full run closes and the same kind starts over in a new one
                if grown.is_none() {
                    out.extend(run.take());
                    run = Some(Spanned { op, span });
                }
            } else {
                out.extend(run.take());
                out.push(Spanned { op, span });
            }
        }

        out.extend(run.take());
        out
    }

    /// Scan the whole source into an instruction queue.
    pub fn scan(&mut self) -> OpQueue {
        let queue: OpQueue = self.scan_spanned().into_iter().map(|s| s.op).collect();
        debug!(ops = queue.len(), "scan finished");
        queue
    }
}

/// Shorthand for `Scanner::new(source).scan()`.
pub fn scan(source: &str) -> OpQueue {
    Scanner::new(source).scan()
}
