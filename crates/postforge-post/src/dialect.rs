//! Output dialect definitions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PostError;

/// Target program syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Generic numerical-control G-code.
    #[default]
    Gcode,
    /// ABB RAPID module.
    Rapid,
    /// KUKA Robot Language source.
    Krl,
    /// FANUC TP program in ASCII (LS) form.
    Fanuc,
}

impl Dialect {
    /// Every supported dialect.
    pub fn all() -> [Dialect; 4] {
        [Dialect::Gcode, Dialect::Rapid, Dialect::Krl, Dialect::Fanuc]
    }

    /// Look up a dialect by name or alias (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gcode" | "g-code" | "generic" | "nc" => Some(Dialect::Gcode),
            "rapid" | "abb" => Some(Dialect::Rapid),
            "krl" | "kuka" => Some(Dialect::Krl),
            "fanuc" | "tp" | "ls" => Some(Dialect::Fanuc),
            _ => None,
        }
    }

    /// Canonical lowercase key.
    pub fn key(&self) -> &'static str {
        match self {
            Dialect::Gcode => "gcode",
            Dialect::Rapid => "rapid",
            Dialect::Krl => "krl",
            Dialect::Fanuc => "fanuc",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Dialect::Gcode => "G-code",
            Dialect::Rapid => "ABB RAPID",
            Dialect::Krl => "KUKA KRL",
            Dialect::Fanuc => "FANUC TP",
        }
    }

    /// File extension without the leading dot.
    pub fn file_extension(&self) -> &'static str {
        match self {
            Dialect::Gcode => "gcode",
            Dialect::Rapid => "mod",
            Dialect::Krl => "src",
            Dialect::Fanuc => "ls",
        }
    }

    /// Does this dialect carry tool orientation in its motion targets?
    pub fn carries_orientation(&self) -> bool {
        !matches!(self, Dialect::Gcode)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Dialect {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::from_name(s).ok_or_else(|| PostError::UnknownDialect(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(Dialect::from_name("ABB"), Some(Dialect::Rapid));
        assert_eq!(Dialect::from_name(" kuka "), Some(Dialect::Krl));
        assert_eq!(Dialect::from_name("generic"), Some(Dialect::Gcode));
        assert_eq!(Dialect::from_name("tp"), Some(Dialect::Fanuc));
        assert_eq!(Dialect::from_name("staubli"), None);
    }

    #[test]
    fn test_keys_round_trip() {
        for dialect in Dialect::all() {
            assert_eq!(Dialect::from_name(dialect.key()), Some(dialect));
            assert_eq!(dialect.key().parse::<Dialect>().unwrap(), dialect);
        }
    }

    #[test]
    fn test_unknown_dialect_error() {
        let err = "motoman".parse::<Dialect>().unwrap_err();
        assert!(matches!(err, PostError::UnknownDialect(ref name) if name == "motoman"));
    }

    #[test]
    fn test_extensions_are_distinct() {
        let mut exts: Vec<_> = Dialect::all().iter().map(|d| d.file_extension()).collect();
        exts.sort();
        exts.dedup();
        assert_eq!(exts.len(), 4);
    }
}
