use crate::parser::DEFAULT_MAX_DEPTH;

pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// parenthesis and subquery nesting limit, `None` for no limit
    pub max_nesting_depth: Option<usize>,
    /// source length limit in bytes
    pub max_source_length: Option<usize>,
    pub format_version: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: Some(DEFAULT_MAX_DEPTH),
            max_source_length: None,
            format_version: FORMAT_VERSION.to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unbounded() -> Self {
        Self { max_nesting_depth: None, ..Self::default() }
    }

    pub fn with_max_nesting_depth(max_nesting_depth: usize) -> Self {
        Self { max_nesting_depth: Some(max_nesting_depth), ..Self::default() }
    }

    pub fn with_max_source_length(mut self, max_source_length: usize) -> Self {
        self.max_source_length = Some(max_source_length);
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::config::CompilerConfig;

    #[test]
    pub fn test_defaults() {
        let config = CompilerConfig::new();
        assert_eq!(config.max_nesting_depth, Some(64));
        assert_eq!(config.max_source_length, None);
        assert_eq!(config.format_version, "1.0");

        assert_eq!(CompilerConfig::unbounded().max_nesting_depth, None);
        assert_eq!(CompilerConfig::with_max_nesting_depth(3).with_max_source_length(10).max_source_length, Some(10));
    }
}
