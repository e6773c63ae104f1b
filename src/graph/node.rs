//! Meta-informatie die naast de pinwaarden aan een component wordt
//! meegegeven.

use std::collections::BTreeMap;

/// Waarde die meta-informatie over een component beschrijft (bv. een
/// tolerantie of een schakelaar).
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Number(f64),
    Integer(i64),
    Boolean(bool),
    Text(String),
}

impl MetaValue {
    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        if let Self::Boolean(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Numerieke interpretatie; gehele getallen worden omgezet.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Alias voor een verzameling meta-informatie.
pub type MetaMap = BTreeMap<String, MetaValue>;

/// Hulpfuncties voor case-insensitieve meta-opzoekingen.
pub trait MetaLookupExt {
    /// Zoek een meta-item op zonder hoofdlettergevoeligheid.
    fn get_normalized(&self, key: &str) -> Option<&MetaValue>;
}

impl MetaLookupExt for MetaMap {
    fn get_normalized(&self, key: &str) -> Option<&MetaValue> {
        if let Some(value) = self.get(key) {
            return Some(value);
        }

        let lower = key.to_ascii_lowercase();
        self.iter()
            .find(|(candidate, _)| candidate.to_ascii_lowercase() == lower)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::{MetaLookupExt, MetaMap, MetaValue};

    #[test]
    fn lookup_ignores_case() {
        let mut meta = MetaMap::new();
        meta.insert("Epsilon".to_owned(), MetaValue::from(0.01));
        meta.insert("unbounded".to_owned(), MetaValue::from(true));

        assert_eq!(
            meta.get_normalized("epsilon").and_then(MetaValue::as_number),
            Some(0.01)
        );
        assert_eq!(
            meta.get_normalized("Unbounded").and_then(MetaValue::as_boolean),
            Some(true)
        );
        assert!(meta.get_normalized("missing").is_none());
    }

    #[test]
    fn integers_read_as_numbers() {
        assert_eq!(MetaValue::from(3_i64).as_number(), Some(3.0));
        assert_eq!(MetaValue::from("x").as_number(), None);
    }
}
