/// Per-stack settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StackOpts {
    /// Drop inputs the compiler can prove invisible in a chunk. Output
    /// pixels are identical either way.
    pub eliminate_dead_layers: bool,
}

impl Default for StackOpts {
    fn default() -> Self {
        Self {
            eliminate_dead_layers: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stack/opts.rs"]
mod tests;
