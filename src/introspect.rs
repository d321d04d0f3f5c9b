//! Host-supplied knowledge about types.
//!
//! The synthesizer never reflects on anything itself. It asks a
//! [`TypeIntrospector`] for members and enum literals, and a
//! [`MemberRefinements`] for per-member validation and documentation hints.

use crate::common::generic::base_type;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A declared member of a composite type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(rename = "type")]
    pub type_token: String,
}

impl Member {
    pub fn new(name: impl Into<String>, type_token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_token: type_token.into(),
        }
    }
}

/// Member-level refinements, usually derived from validation and API-doc annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Refinement {
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub not_empty: bool,
    pub email: bool,
    pub format: Option<String>,
    pub description: Option<String>,
    pub example: Option<String>,
    pub deprecated: bool,
}

pub trait TypeIntrospector {
    /// Declared members of a composite type, or `None` when the type is unknown.
    fn members(&self, type_token: &str) -> Option<Vec<Member>>;

    fn is_enum(&self, type_token: &str) -> bool;

    fn enum_values(&self, type_token: &str) -> Vec<String>;

    /// Whether the type declares its own type parameters.
    fn is_generic(&self, _type_token: &str) -> bool {
        false
    }
}

pub trait MemberRefinements {
    fn refinements_for(&self, declaring_type: &str, member: &str) -> Option<Refinement>;
}

/// Knows nothing: every composite resolves by metadata alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIntrospection;

impl TypeIntrospector for NoIntrospection {
    fn members(&self, _type_token: &str) -> Option<Vec<Member>> {
        None
    }

    fn is_enum(&self, _type_token: &str) -> bool {
        false
    }

    fn enum_values(&self, _type_token: &str) -> Vec<String> {
        Vec::new()
    }
}

impl MemberRefinements for NoIntrospection {
    fn refinements_for(&self, _declaring_type: &str, _member: &str) -> Option<Refinement> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Enum,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogMember {
    pub name: String,
    #[serde(rename = "type")]
    pub type_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refinements: Option<Refinement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeInfo {
    pub kind: TypeKind,
    pub members: Vec<CatalogMember>,
    pub values: Vec<String>,
    pub generic: bool,
}

/// A pre-baked type catalogue, typically produced by a build-time extractor.
///
/// ```json
/// {"types": {
///   "com.example.Pool": {"members": [{"name": "maxSize", "type": "int",
///                                     "refinements": {"minimum": 1}}]},
///   "com.example.Mode": {"kind": "enum", "values": ["FAST", "SAFE"]}
/// }}
/// ```
///
/// Lookups ignore type arguments, so `Box<T>` finds `Box`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeCatalog {
    pub types: BTreeMap<String, TypeInfo>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(origin: &str, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| Error::Catalog {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&path.display().to_string(), &text)
    }

    pub fn with_class(mut self, name: &str, members: &[(&str, &str)]) -> Self {
        self.types.insert(
            name.to_string(),
            TypeInfo {
                kind: TypeKind::Class,
                members: members
                    .iter()
                    .map(|(member, type_token)| CatalogMember {
                        name: member.to_string(),
                        type_token: type_token.to_string(),
                        refinements: None,
                    })
                    .collect(),
                ..TypeInfo::default()
            },
        );
        self
    }

    pub fn with_enum(mut self, name: &str, values: &[&str]) -> Self {
        self.types.insert(
            name.to_string(),
            TypeInfo {
                kind: TypeKind::Enum,
                values: values.iter().map(|v| v.to_string()).collect(),
                ..TypeInfo::default()
            },
        );
        self
    }

    /// Mark an already declared type as generic.
    pub fn with_generic(mut self, name: &str) -> Self {
        if let Some(info) = self.types.get_mut(name) {
            info.generic = true;
        }
        self
    }

    /// Attach refinements to an already declared member.
    pub fn with_refinement(mut self, type_name: &str, member: &str, refinement: Refinement) -> Self {
        if let Some(m) = self
            .types
            .get_mut(type_name)
            .and_then(|info| info.members.iter_mut().find(|m| m.name == member))
        {
            m.refinements = Some(refinement);
        }
        self
    }

    fn lookup(&self, type_token: &str) -> Option<&TypeInfo> {
        self.types
            .get(type_token.trim())
            .or_else(|| self.types.get(base_type(type_token)))
    }
}

impl TypeIntrospector for TypeCatalog {
    fn members(&self, type_token: &str) -> Option<Vec<Member>> {
        let info = self.lookup(type_token)?;
        if info.kind != TypeKind::Class {
            return None;
        }
        Some(
            info.members
                .iter()
                .map(|m| Member::new(m.name.clone(), m.type_token.clone()))
                .collect(),
        )
    }

    fn is_enum(&self, type_token: &str) -> bool {
        self.lookup(type_token)
            .is_some_and(|info| info.kind == TypeKind::Enum)
    }

    fn enum_values(&self, type_token: &str) -> Vec<String> {
        match self.lookup(type_token) {
            Some(info) if info.kind == TypeKind::Enum => info.values.clone(),
            _ => Vec::new(),
        }
    }

    fn is_generic(&self, type_token: &str) -> bool {
        self.lookup(type_token).is_some_and(|info| info.generic)
    }
}

impl MemberRefinements for TypeCatalog {
    fn refinements_for(&self, declaring_type: &str, member: &str) -> Option<Refinement> {
        self.lookup(declaring_type)?
            .members
            .iter()
            .find(|m| m.name == member)?
            .refinements
            .clone()
    }
}
