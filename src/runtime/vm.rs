use crate::bytecode::Op;
use crate::codegen::config::DEFAULT_TAPE_SIZE;
use crate::runtime::runtime_error::RuntimeError;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmConfig {
    pub tape_size: usize,
    pub max_steps: Option<usize>,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            tape_size: DEFAULT_TAPE_SIZE,
            max_steps: None,
        }
    }
}

/// Reference interpreter for opcode streams.
///
/// Uses the same machine model as the generated Go program: a zeroed byte
/// tape, pointer at 0, wrapping cell arithmetic, and a cell left untouched
/// when input is exhausted.
pub struct Vm {
    tape: Vec<u8>,
    ptr: usize,
    config: VmConfig,
    steps: usize,
}

impl Vm {
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self {
            tape: vec![0; config.tape_size],
            ptr: 0,
            config,
            steps: 0,
        }
    }

    pub fn tape(&self) -> &[u8] {
        &self.tape
    }

    pub fn ptr(&self) -> usize {
        self.ptr
    }

    pub fn reset_execution_state(&mut self) {
        self.tape.iter_mut().for_each(|c| *c = 0);
        self.ptr = 0;
        self.steps = 0;
    }

    pub fn run<R: Read, W: Write>(
        &mut self,
        ops: &[Op],
        input: &mut R,
        output: &mut W,
    ) -> Result<(), RuntimeError> {
        self.reset_execution_state();
        let jumps = jump_table(ops)?;
        let mut ip: usize = 0;

        while ip < ops.len() {
            self.check_limits()?;

            match ops[ip] {
                Op::MovePtrForward(n) => {
                    self.ptr = self
                        .ptr
                        .checked_add(n as usize)
                        .filter(|p| *p < self.tape.len())
                        .ok_or(RuntimeError::PointerOutOfBounds {
                            index: ip,
                            tape_size: self.tape.len(),
                        })?;
                }
                Op::MovePtrBackward(n) => {
                    self.ptr = self.ptr.checked_sub(n as usize).ok_or(
                        RuntimeError::PointerOutOfBounds {
                            index: ip,
                            tape_size: self.tape.len(),
                        },
                    )?;
                }
                Op::IncrementCell(n) => {
                    let cell = self.cell_mut(ip)?;
                    *cell = cell.wrapping_add((n % 256) as u8);
                }
                Op::DecrementCell(n) => {
                    let cell = self.cell_mut(ip)?;
                    *cell = cell.wrapping_sub((n % 256) as u8);
                }
                Op::ClearCell => {
                    *self.cell_mut(ip)? = 0;
                }
                Op::OutputCell => {
                    let byte = *self.cell_mut(ip)?;
                    output.write_all(&[byte])?;
                }
                Op::InputCell => {
                    output.flush()?;
                    let mut buf = [0u8; 1];
                    if input.read(&mut buf)? == 1 {
                        *self.cell_mut(ip)? = buf[0];
                    }
                }
                Op::LoopBegin => {
                    if *self.cell_mut(ip)? == 0 {
                        ip = jumps[ip];
                    }
                }
                Op::LoopEnd => {
                    if *self.cell_mut(ip)? != 0 {
                        ip = jumps[ip];
                    }
                }
            }

            ip += 1;
        }

        output.flush()?;
        Ok(())
    }

    fn cell_mut(&mut self, ip: usize) -> Result<&mut u8, RuntimeError> {
        let tape_size = self.tape.len();
        self.tape
            .get_mut(self.ptr)
            .ok_or(RuntimeError::PointerOutOfBounds {
                index: ip,
                tape_size,
            })
    }

    fn check_limits(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;

        if let Some(max) = self.config.max_steps {
            if self.steps > max {
                return Err(RuntimeError::StepLimit(max));
            }
        }

        Ok(())
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

/// Partner index for each bracket; other slots are unused.
fn jump_table(ops: &[Op]) -> Result<Vec<usize>, RuntimeError> {
    let mut table = vec![0; ops.len()];
    let mut open = Vec::new();

    for (ip, op) in ops.iter().enumerate() {
        match op {
            Op::LoopBegin => open.push(ip),
            Op::LoopEnd => {
                let begin = open.pop().ok_or(RuntimeError::UnmatchedLoop { index: ip })?;
                table[begin] = ip;
                table[ip] = begin;
            }
            _ => {}
        }
    }

    match open.pop() {
        Some(index) => Err(RuntimeError::UnmatchedLoop { index }),
        None => Ok(table),
    }
}
