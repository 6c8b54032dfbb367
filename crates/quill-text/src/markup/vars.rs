use hashbrown::HashMap;

/// Variable table consulted by `{VAR=name}` substitution.
///
/// Typically per-label; hosts that want process-wide variables share one
/// table. Unresolved names render as empty string, so live-edited markup
/// never fails on a missing variable.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    entries: HashMap<String, String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or overwrite a variable. Names are case-insensitive.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.entries.insert(name.to_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.remove(&name.to_lowercase());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        let mut vars = VariableTable::new();
        vars.set("Hero", "Tuft");
        assert_eq!(vars.get("hero"), Some("Tuft"));
        assert_eq!(vars.get("HERO"), Some("Tuft"));
        vars.remove("hero");
        assert!(vars.get("Hero").is_none());
    }
}
