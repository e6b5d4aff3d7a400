pub mod op_dumper;
pub mod scanner;

pub use scanner::{Scanner, Span, Spanned, scan};
