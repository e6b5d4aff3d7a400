pub mod disasm;
pub mod ir;
pub mod op;
pub mod optimize;
pub mod queue;

pub use ir::{IrError, ProgramIr};
pub use op::Op;
pub use optimize::optimize;
pub use queue::OpQueue;
