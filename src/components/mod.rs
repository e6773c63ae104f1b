//! Component registry en evaluatie-logica.

use std::collections::HashMap;
use std::fmt;

use crate::geom::ReflectError;
use crate::graph::node::MetaMap;
use crate::graph::value::{Value, ValueError};

pub mod coerce;
pub mod reflect;

/// Output-map van een component: pinnickname → waarde.
pub type OutputMap = std::collections::BTreeMap<String, Value>;

/// Fouttype voor component-evaluaties.
#[derive(Debug, Clone)]
pub enum ComponentError {
    /// Een generieke fout met een bericht.
    Message(String),
}

impl ComponentError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Message(s) => s,
        }
    }
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for ComponentError {}

impl From<ValueError> for ComponentError {
    fn from(err: ValueError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<ReflectError> for ComponentError {
    fn from(err: ReflectError) -> Self {
        Self::new(err.to_string())
    }
}

/// Resultaat van een component-executie.
pub type ComponentResult = Result<OutputMap, ComponentError>;

/// Trait die alle componentimplementaties dienen te implementeren.
pub trait Component {
    fn evaluate(&self, inputs: &[Value], meta: &MetaMap) -> ComponentResult;
}

/// Beschikbare componenttypen binnen de registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Reflect(reflect::ComponentKind),
}

impl ComponentKind {
    pub fn evaluate(&self, inputs: &[Value], meta: &MetaMap) -> ComponentResult {
        match self {
            Self::Reflect(component) => component.evaluate(inputs, meta),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reflect(component) => component.name(),
        }
    }
}

/// Registry die componentimplementaties opzoekt op GUID of naam.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    by_guid: HashMap<String, ComponentKind>,
    by_name: HashMap<String, ComponentKind>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        let mut registry = Self::new();

        for registration in reflect::REGISTRATIONS {
            let kind = ComponentKind::Reflect(registration.kind);
            for guid in registration.guids {
                registry.register_guid(guid, kind);
            }
            registry.register_names(registration.names, kind);
        }

        registry
    }
}

impl ComponentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_guid: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn register_guid(&mut self, guid: impl AsRef<str>, kind: ComponentKind) {
        let key = normalize_guid(guid.as_ref());
        self.by_guid.insert(key, kind);
    }

    pub fn register_names(&mut self, names: &[&str], kind: ComponentKind) {
        for name in names {
            let key = normalize_name(name);
            self.by_name.insert(key, kind);
        }
    }

    /// Zoekt eerst op GUID, dan op naam en tot slot op nickname.
    #[must_use]
    pub fn resolve(
        &self,
        guid: Option<&str>,
        name: Option<&str>,
        nickname: Option<&str>,
    ) -> Option<ComponentKind> {
        if let Some(component) = guid.and_then(|guid| self.by_guid.get(&normalize_guid(guid))) {
            return Some(*component);
        }

        [name, nickname]
            .into_iter()
            .flatten()
            .find_map(|name| self.by_name.get(&normalize_name(name)).copied())
    }
}

fn normalize_guid(guid: &str) -> String {
    guid.trim_matches(|c| c == '{' || c == '}').to_lowercase()
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{ComponentKind, ComponentRegistry, reflect};

    #[test]
    fn lookup_by_guid_and_name() {
        let registry = ComponentRegistry::default();
        let expected = ComponentKind::Reflect(reflect::ComponentKind::Reflect);

        let by_guid = registry
            .resolve(Some("{6E0A5AE8-4C78-4211-8EC3-D26302152E71}"), None, None)
            .unwrap();
        assert_eq!(by_guid, expected);

        let by_name = registry.resolve(None, Some(" Reflect "), None).unwrap();
        assert_eq!(by_name, expected);

        let by_nickname = registry.resolve(Some("unknown"), None, Some("refl")).unwrap();
        assert_eq!(by_nickname, expected);
        assert_eq!(by_nickname.name(), "Reflect");

        assert!(registry.resolve(None, Some("Mirror"), None).is_none());
    }
}
