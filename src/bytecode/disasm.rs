use crate::bytecode::Op;
use std::collections::HashMap;

/// Print disassembly of an opcode stream
pub fn print_ops(ops: &[Op]) {
    println!("════════════════════════════════════════");
    println!(" main");
    println!(" {} instructions", ops.len());
    println!("════════════════════════════════════════");
    print!("{}", disassemble_to_string(ops));
}

/// For every loop bracket, the index of its partner. Unmatched brackets are
/// left out.
pub fn loop_partners(ops: &[Op]) -> HashMap<usize, usize> {
    let mut partners = HashMap::new();
    let mut open = Vec::new();

    for (ip, op) in ops.iter().enumerate() {
        match op {
            Op::LoopBegin => open.push(ip),
            Op::LoopEnd => {
                if let Some(begin) = open.pop() {
                    partners.insert(begin, ip);
                    partners.insert(ip, begin);
                }
            }
            _ => {}
        }
    }

    partners
}

// =============================================================================
// String output (for testing/logging)
// =============================================================================

/// Return disassembly as a String. Loop bodies are indented by nesting depth.
pub fn disassemble_to_string(ops: &[Op]) -> String {
    let partners = loop_partners(ops);
    let mut output = String::new();
    let mut depth = 0usize;

    for (ip, op) in ops.iter().enumerate() {
        if *op == Op::LoopEnd {
            depth = depth.saturating_sub(1);
        }

        output.push_str(&format!("{:04} {}", ip, "  ".repeat(depth)));
        output.push_str(&format_op_string(op, partners.get(&ip).copied()));
        output.push('\n');

        if *op == Op::LoopBegin {
            depth += 1;
        }
    }

    output
}

fn format_op_string(op: &Op, partner: Option<usize>) -> String {
    match op {
        Op::LoopBegin | Op::LoopEnd => match partner {
            Some(target) => format!("{:<6} (↔ {:04})", op.mnemonic(), target),
            None => format!("{:<6} (unmatched)", op.mnemonic()),
        },
        Op::ClearCell => format!("{:<6} ; [-]", op.mnemonic()),
        other => match other.count() {
            Some(n) => format!("{:<6} {}", other.mnemonic(), n),
            None => other.mnemonic().to_string(),
        },
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Print opcode statistics
pub fn print_stats(ops: &[Op]) {
    println!("=== OPCODE STATISTICS ===\n");
    println!("Instructions: {}", ops.len());
    println!();

    println!("Op frequency:");
    let op_counts = count_ops(ops);
    let mut counts: Vec<_> = op_counts.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    for (op, count) in counts {
        let pct = (*count as f64 / ops.len() as f64) * 100.0;
        println!("  {:<8} {:>6} ({:>5.1}%)", op, count, pct);
    }
}

fn count_ops(ops: &[Op]) -> HashMap<&'static str, usize> {
    let mut counts = HashMap::new();
    for op in ops {
        *counts.entry(op.mnemonic()).or_insert(0) += 1;
    }
    counts
}
