use tracing::debug;

use crate::bytecode::{Op, OpQueue};
use crate::codegen::{CodegenConfig, CodegenError};

/// Go source generator.
///
/// Text is accumulated privately and only handed out once the whole stream
/// has been expanded, so a structural error never leaks partial output.
pub struct GoGenerator<'a> {
    config: &'a CodegenConfig,
    out: String,
    /// Base indentation of the function body.
    base: usize,
    /// Op indices of the loops currently open, innermost last.
    open_loops: Vec<usize>,
    has_output: bool,
    has_input: bool,
}

impl<'a> GoGenerator<'a> {
    pub fn new(config: &'a CodegenConfig) -> Self {
        Self {
            config,
            out: String::new(),
            base: 0,
            open_loops: Vec::new(),
            has_output: false,
            has_input: false,
        }
    }

    /// Expand the whole queue into a Go program.
    pub fn generate(mut self, queue: OpQueue) -> Result<String, CodegenError> {
        self.has_output = queue.contains(&Op::OutputCell);
        self.has_input = queue.contains(&Op::InputCell);

        self.emit_preamble();

        for (index, op) in queue.enumerate() {
            self.emit_op(index, op)?;
        }

        if let Some(&index) = self.open_loops.last() {
            return Err(CodegenError::UnclosedLoop {
                index,
                depth: self.open_loops.len(),
            });
        }

        self.emit_epilogue();

        debug!(bytes = self.out.len(), "go source generated");
        Ok(self.out)
    }

    fn line(&mut self, text: &str) {
        let level = self.base + self.open_loops.len();
        for _ in 0..level {
            self.out.push_str(&self.config.indent);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    // =========================================================================
    // Program frame
    // =========================================================================

    fn emit_preamble(&mut self) {
        self.line(&format!("package {}", self.config.package_name));
        self.line("");

        let imports = self.imports();
        if !imports.is_empty() {
            self.line("import (");
            self.base += 1;
            for import in imports {
                self.line(&format!("\"{}\"", import));
            }
            self.base -= 1;
            self.line(")");
            self.line("");
        }

        self.line("func main() {");
        self.base += 1;
        self.line(&format!("buffer := make([]byte, {})", self.config.tape_size));
        self.line("ptr := 0");
        if self.has_output {
            self.line("out := bufio.NewWriter(os.Stdout)");
            self.line("defer out.Flush()");
        }
        if self.has_input {
            self.line("b := make([]byte, 1)");
        }
    }

    fn emit_epilogue(&mut self) {
        self.line("_ = buffer");
        self.line("_ = ptr");
        self.base -= 1;
        self.line("}");
    }

    /// Go refuses unused imports, so only pull in what the stream needs.
    fn imports(&self) -> Vec<&'static str> {
        let mut imports = Vec::new();
        if self.has_output {
            imports.push("bufio");
        }
        if self.has_output || self.has_input {
            imports.push("os");
        }
        imports
    }

    // =========================================================================
    // Ops
    // =========================================================================

    fn emit_op(&mut self, index: usize, op: Op) -> Result<(), CodegenError> {
        if op.count() == Some(0) {
            return Err(CodegenError::EmptyRun { index });
        }

        match op {
            Op::MovePtrForward(n) => self.line(&format!("ptr += {}", n)),
            Op::MovePtrBackward(n) => self.line(&format!("ptr -= {}", n)),
            Op::IncrementCell(n) => self.line(&format!("buffer[ptr] += byte({})", n % 256)),
            Op::DecrementCell(n) => self.line(&format!("buffer[ptr] -= byte({})", n % 256)),
            Op::OutputCell => self.line("out.WriteByte(buffer[ptr])"),
            Op::InputCell => {
                // flush pending output so prompts appear before blocking on stdin
                if self.has_output {
                    self.line("out.Flush()");
                }
                self.line("if n, _ := os.Stdin.Read(b); n == 1 {");
                self.base += 1;
                self.line("buffer[ptr] = b[0]");
                self.base -= 1;
                self.line("}");
            }
            Op::ClearCell => self.line("buffer[ptr] = 0"),
            Op::LoopBegin => {
                self.line("for buffer[ptr] != 0 {");
                self.open_loops.push(index);
            }
            Op::LoopEnd => {
                if self.open_loops.pop().is_none() {
                    return Err(CodegenError::UnmatchedLoopEnd { index });
                }
                self.line("}");
            }
        }

        Ok(())
    }
}

/// Generate a Go program for `queue` with the given settings.
pub fn generate(queue: OpQueue, config: &CodegenConfig) -> Result<String, CodegenError> {
    GoGenerator::new(config).generate(queue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen_ops(ops: Vec<Op>) -> Result<String, CodegenError> {
        generate(ops.into(), &CodegenConfig::default())
    }

    #[test]
    fn test_empty_program() {
        let text = gen_ops(Vec::new()).unwrap();
        assert_eq!(
            text,
            "package main\n\
             \n\
             func main() {\n\
             \tbuffer := make([]byte, 32767)\n\
             \tptr := 0\n\
             \t_ = buffer\n\
             \t_ = ptr\n\
             }\n"
        );
    }

    #[test]
    fn test_arithmetic_and_moves() {
        let text = gen_ops(vec![
            Op::MovePtrForward(3),
            Op::IncrementCell(5),
            Op::MovePtrBackward(2),
            Op::DecrementCell(1),
        ])
        .unwrap();

        assert!(text.contains("\tptr += 3\n"));
        assert!(text.contains("\tbuffer[ptr] += byte(5)\n"));
        assert!(text.contains("\tptr -= 2\n"));
        assert!(text.contains("\tbuffer[ptr] -= byte(1)\n"));
    }

    #[test]
    fn test_cell_counts_wrap_mod_256() {
        let text = gen_ops(vec![Op::IncrementCell(300), Op::DecrementCell(256)]).unwrap();
        assert!(text.contains("buffer[ptr] += byte(44)"));
        assert!(text.contains("buffer[ptr] -= byte(0)"));
    }

    #[test]
    fn test_output_imports_and_writer() {
        let text = gen_ops(vec![Op::OutputCell]).unwrap();

        assert!(text.contains("import (\n\t\"bufio\"\n\t\"os\"\n)\n"));
        assert!(text.contains("\tout := bufio.NewWriter(os.Stdout)\n\tdefer out.Flush()\n"));
        assert!(text.contains("\tout.WriteByte(buffer[ptr])\n"));
        assert!(!text.contains("b := make([]byte, 1)"));
    }

    #[test]
    fn test_input_only_imports_os() {
        let text = gen_ops(vec![Op::InputCell]).unwrap();

        assert!(text.contains("import (\n\t\"os\"\n)\n"));
        assert!(!text.contains("bufio"));
        assert!(text.contains("\tb := make([]byte, 1)\n"));
        assert!(text.contains(
            "\tif n, _ := os.Stdin.Read(b); n == 1 {\n\t\tbuffer[ptr] = b[0]\n\t}\n"
        ));
    }

    #[test]
    fn test_input_flushes_pending_output() {
        let text = gen_ops(vec![Op::OutputCell, Op::InputCell]).unwrap();
        assert!(text.contains("\tout.Flush()\n\tif n, _ := os.Stdin.Read(b)"));
    }

    #[test]
    fn test_clear_cell() {
        let text = gen_ops(vec![Op::ClearCell]).unwrap();
        assert!(text.contains("\tbuffer[ptr] = 0\n"));
        assert!(!text.contains("for "));
    }

    #[test]
    fn test_loop_nesting_indentation() {
        let text = gen_ops(vec![
            Op::LoopBegin,
            Op::LoopBegin,
            Op::DecrementCell(1),
            Op::LoopEnd,
            Op::LoopEnd,
        ])
        .unwrap();

        assert!(text.contains(
            "\tfor buffer[ptr] != 0 {\n\
             \t\tfor buffer[ptr] != 0 {\n\
             \t\t\tbuffer[ptr] -= byte(1)\n\
             \t\t}\n\
             \t}\n"
        ));
    }

    #[test]
    fn test_unmatched_loop_end() {
        let err = gen_ops(vec![Op::IncrementCell(1), Op::LoopEnd]).unwrap_err();
        assert_eq!(err, CodegenError::UnmatchedLoopEnd { index: 1 });
    }

    #[test]
    fn test_unclosed_loop_reports_innermost() {
        let err = gen_ops(vec![Op::LoopBegin, Op::OutputCell, Op::LoopBegin]).unwrap_err();
        assert_eq!(err, CodegenError::UnclosedLoop { index: 2, depth: 2 });
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = gen_ops(vec![Op::OutputCell, Op::MovePtrForward(0)]).unwrap_err();
        assert_eq!(err, CodegenError::EmptyRun { index: 1 });
    }

    #[test]
    fn test_custom_config() {
        let config = CodegenConfig::new().with_tape_size(100).with_indent("  ");
        let text = generate(vec![Op::ClearCell].into(), &config).unwrap();

        assert!(text.contains("  buffer := make([]byte, 100)\n"));
        assert!(text.contains("  buffer[ptr] = 0\n"));
    }

    #[test]
    fn test_braces_balance() {
        let text = gen_ops(vec![
            Op::InputCell,
            Op::LoopBegin,
            Op::OutputCell,
            Op::LoopBegin,
            Op::ClearCell,
            Op::LoopEnd,
            Op::LoopEnd,
        ])
        .unwrap();

        let opens = text.matches('{').count();
        let closes = text.matches('}').count();
        assert_eq!(opens, closes);
    }
}
