use serde::{Deserialize, Serialize};

/// Number of tape cells, the largest positive `i16`.
pub const DEFAULT_TAPE_SIZE: usize = i16::MAX as usize;

pub const DEFAULT_INDENT: &str = "\t";

/// Settings for the Go generator. Built once and passed by reference; nothing
/// mutates it while a program is being generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodegenConfig {
    pub tape_size: usize,
    /// One level of indentation in the emitted text.
    pub indent: String,
    pub package_name: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        CodegenConfig {
            tape_size: DEFAULT_TAPE_SIZE,
            indent: DEFAULT_INDENT.to_string(),
            package_name: "main".to_string(),
        }
    }
}

impl CodegenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tape_size(mut self, tape_size: usize) -> Self {
        self.tape_size = tape_size;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodegenConfig::default();
        assert_eq!(config.tape_size, 32767);
        assert_eq!(config.indent, "\t");
        assert_eq!(config.package_name, "main");
    }

    #[test]
    fn test_builders() {
        let config = CodegenConfig::new().with_tape_size(30000).with_indent("    ");
        assert_eq!(config.tape_size, 30000);
        assert_eq!(config.indent, "    ");
    }
}
