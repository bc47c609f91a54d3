/// Configuration for a generation pass.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratorConfig {
    /// Run resolution and per-directive generation on a rayon pool.
    pub parallel: bool,
    /// Maximum number of errors reported (0 = unlimited).
    pub error_limit: usize,
    /// Start every unit with an `// <auto-generated/>` banner.
    pub emit_header: bool,
    /// One level of indentation in generated text.
    pub indent: String,
    /// Appended to every hint name.
    pub hint_suffix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            parallel: true,
            error_limit: 0,
            emit_header: true,
            indent: "    ".to_string(),
            hint_suffix: ".g.cs".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Single-threaded configuration, mostly for tests.
    pub fn sequential() -> Self {
        GeneratorConfig {
            parallel: false,
            ..Self::default()
        }
    }
}
