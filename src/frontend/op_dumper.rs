use crate::bytecode::Op;
use crate::frontend::scanner::Spanned;

pub struct OpDumper {
    pub color: bool,
    pub show_debug_repr: bool, // if false, prints the mnemonic form
}

impl Default for OpDumper {
    fn default() -> Self {
        Self {
            color: true,
            show_debug_repr: true,
        }
    }
}

impl OpDumper {
    // ANSI colors
    const RESET: &'static str = "\x1b[0m";
    const GRN: &'static str = "\x1b[32m";
    const YEL: &'static str = "\x1b[33m";
    const CYN: &'static str = "\x1b[36m";
    const MAG: &'static str = "\x1b[35m";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn pretty(mut self) -> Self {
        self.show_debug_repr = false;
        self
    }

    pub fn dump(&self, ops: &[Spanned]) {
        print!("{}", self.render(ops));
    }

    pub fn render(&self, ops: &[Spanned]) -> String {
        ops.iter().map(|s| self.render_one(s)).collect()
    }

    fn render_one(&self, s: &Spanned) -> String {
        let line = s.span.line;
        let col = s.span.col;

        let kind = self.kind(&s.op);
        let colr = if self.color { self.color(&s.op) } else { "" };
        let reset = if self.color { Self::RESET } else { "" };

        if self.show_debug_repr {
            format!(
                "[{:02}:{:02}] {}{:<6} {:?}{}\n",
                line, col, colr, kind, s.op, reset
            )
        } else {
            format!(
                "[{:02}:{:02}] {}{:<6} {}{}\n",
                line, col, colr, kind, s.op, reset
            )
        }
    }

    fn kind(&self, op: &Op) -> &'static str {
        match op {
            Op::MovePtrForward(_) | Op::MovePtrBackward(_) => "MOVE",
            Op::IncrementCell(_) | Op::DecrementCell(_) | Op::ClearCell => "ARITH",
            Op::OutputCell | Op::InputCell => "IO",
            Op::LoopBegin | Op::LoopEnd => "LOOP",
        }
    }

    fn color(&self, op: &Op) -> &'static str {
        match op {
            Op::MovePtrForward(_) | Op::MovePtrBackward(_) => Self::YEL,
            Op::IncrementCell(_) | Op::DecrementCell(_) | Op::ClearCell => Self::CYN,
            Op::OutputCell | Op::InputCell => Self::GRN,
            Op::LoopBegin | Op::LoopEnd => Self::MAG,
        }
    }
}
