use std::fmt;

/// Dotted path of field names leading from the comparison root to a field.
///
/// Paths are built while the comparator walks nested mappings and are only
/// used in diagnostics. They are never parsed back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    /// The path of the top-level mapping itself.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// The path of `name` nested under this path.
    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_owned())
        } else {
            Self(format!("{}.{}", self.0, name))
        }
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw dotted form. Empty for the root; `Display` renders the root
    /// as `(root)` instead.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
