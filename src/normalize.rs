use serde::{Deserialize, Serialize};

/// How names and queries are folded before they touch the index.
///
/// The same policy must be used when building the index and when querying
/// it, otherwise exact hits silently stop matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// Unicode lower-casing.
    #[default]
    Lowercase,
    /// Names are indexed as typed.
    Exact,
}

impl Normalization {
    pub fn apply(self, text: &str) -> String {
        match self {
            Normalization::Lowercase => text.to_lowercase(),
            Normalization::Exact => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase() {
        assert_eq!(Normalization::Lowercase.apply("Green TEA"), "green tea");
        assert_eq!(Normalization::Lowercase.apply("ÉCLAIR"), "éclair");
    }

    #[test]
    fn test_exact_keeps_input() {
        assert_eq!(Normalization::Exact.apply("Green TEA"), "Green TEA");
    }

    #[test]
    fn test_deserialize_from_config_value() {
        let n: Normalization = serde_json::from_str("\"exact\"").unwrap();
        assert_eq!(n, Normalization::Exact);
    }
}
