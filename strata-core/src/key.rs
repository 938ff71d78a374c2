use serde::{Deserialize, Serialize};

/// One segment of a hierarchical key path: a kind plus either a numeric id
/// or a string name. An element with neither (zero id, empty name) is
/// incomplete and only valid as the final segment of a key handed to an
/// auto-id insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathElement {
    pub kind: String,
    pub id: i64,
    pub name: String,
}

impl PathElement {
    /// An incomplete element: the store assigns an id on insert.
    pub fn incomplete(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: 0,
            name: String::new(),
        }
    }

    pub fn with_id(kind: impl Into<String>, id: i64) -> Self {
        Self {
            kind: kind.into(),
            id,
            name: String::new(),
        }
    }

    pub fn with_name(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: 0,
            name: name.into(),
        }
    }

    /// An element is complete iff it carries a non-empty name or a non-zero id.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() || self.id != 0
    }
}

/// Hierarchical key naming an entity: an ordered path of kind/identifier
/// segments, optionally scoped to a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub namespace: Option<String>,
    pub path: Vec<PathElement>,
}

impl Key {
    /// Root-level incomplete key for `kind`.
    pub fn incomplete(kind: impl Into<String>) -> Self {
        Self {
            namespace: None,
            path: vec![PathElement::incomplete(kind)],
        }
    }

    /// Root-level key identified by numeric id.
    pub fn with_id(kind: impl Into<String>, id: i64) -> Self {
        Self {
            namespace: None,
            path: vec![PathElement::with_id(kind, id)],
        }
    }

    /// Root-level key identified by string name.
    pub fn with_name(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            path: vec![PathElement::with_name(kind, name)],
        }
    }

    /// Scope this key to a namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Append a child path element, making this key the parent path.
    pub fn child(mut self, element: PathElement) -> Self {
        self.path.push(element);
        self
    }

    /// Kind of the entity this key names (the final path element's kind).
    pub fn kind(&self) -> Option<&str> {
        self.path.last().map(|e| e.kind.as_str())
    }

    /// Numeric id of the final path element, if it has one.
    pub fn id(&self) -> Option<i64> {
        match self.path.last() {
            Some(e) if e.id != 0 => Some(e.id),
            _ => None,
        }
    }

    /// String name of the final path element, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self.path.last() {
            Some(e) if !e.name.is_empty() => Some(e.name.as_str()),
            _ => None,
        }
    }

    /// A key is complete iff its final path element carries a non-empty
    /// name or a non-zero id. Incomplete keys are only valid as input to
    /// an auto-id insert; lookup, upsert and delete require complete keys.
    pub fn is_complete(&self) -> bool {
        self.path.last().is_some_and(|e| e.is_complete())
    }
}
