//! Configuration for SVG rendering

/// Configuration options for SVG output
#[derive(Debug, Clone, PartialEq)]
pub struct SvgConfig {
    /// Whether to prepend an XML declaration
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Decimal places kept for coordinates
    pub precision: usize,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            standalone: false,
            pretty_print: true,
            precision: 2,
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether output carries an XML declaration
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the coordinate precision
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SvgConfig::default();
        assert!(!config.standalone);
        assert!(config.pretty_print);
        assert_eq!(config.precision, 2);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SvgConfig::new()
            .with_standalone(true)
            .with_pretty_print(false)
            .with_precision(1);

        assert!(config.standalone);
        assert!(!config.pretty_print);
        assert_eq!(config.precision, 1);
    }
}
