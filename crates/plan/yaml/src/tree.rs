//! Identifier-injected YAML tree
//!
//! Parsing converts a yaml document into an owned, immutable tree in which
//! every node carries a generated uuid and its fully-qualified slash path.
//! The uuids become the handles under which plan nodes and dependency
//! entries are registered; the paths anchor yaml patches.
//!
//! The tree is read-only after parsing. Navigation never fails loudly:
//! missing fields and out-of-range indexes are `None`, matching how the
//! assembler probes for optional subtrees.

use crate::error::{YamlTreeError, YamlTreeResult};
use serde::Serialize;
use serde_yaml::Value;
use uuid::Uuid;

/// The shape of one tree position
#[derive(Clone, Debug, PartialEq)]
pub enum YamlValue {
    /// Scalars are kept in their string rendering; the assembler never
    /// needs typed scalar access
    Scalar(String),
    Sequence(Vec<YamlNode>),
    Mapping(Vec<(String, YamlNode)>),
}

/// An addressable position in the parsed yaml document
#[derive(Clone, Debug, PartialEq)]
pub struct YamlNode {
    uuid: String,
    path: String,
    value: YamlValue,
}

/// A named position: the field name plus the node under it
#[derive(Clone, Copy, Debug)]
pub struct YamlField<'a> {
    pub name: &'a str,
    pub node: &'a YamlNode,
}

impl YamlNode {
    fn build(path: String, value: &Value) -> YamlTreeResult<Self> {
        let converted = match value {
            Value::Null => YamlValue::Scalar(String::new()),
            Value::Bool(b) => YamlValue::Scalar(b.to_string()),
            Value::Number(n) => YamlValue::Scalar(n.to_string()),
            Value::String(s) => YamlValue::Scalar(s.clone()),
            Value::Sequence(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for (index, item) in seq.iter().enumerate() {
                    let child_path = format!("{}/{}", path, index);
                    items.push(YamlNode::build(child_path, item)?);
                }
                YamlValue::Sequence(items)
            }
            Value::Mapping(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, item) in map {
                    let key = scalar_key(key).ok_or_else(|| YamlTreeError::UnsupportedKey {
                        path: path.clone(),
                    })?;
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}/{}", path, key)
                    };
                    entries.push((key, YamlNode::build(child_path, item)?));
                }
                YamlValue::Mapping(entries)
            }
            Value::Tagged(tagged) => return YamlNode::build(path, &tagged.value),
        };

        Ok(Self {
            uuid: Uuid::new_v4().to_string(),
            path,
            value: converted,
        })
    }

    /// The injected identifier of this node
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Fully-qualified slash path from the document root
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> &YamlValue {
        &self.value
    }

    /// Look up a mapping entry by field name
    pub fn field(&self, name: &str) -> Option<YamlField<'_>> {
        match &self.value {
            YamlValue::Mapping(entries) => entries
                .iter()
                .find(|(key, _)| key == name)
                .map(|(key, node)| YamlField { name: key, node }),
            _ => None,
        }
    }

    /// Look up a sequence entry by index
    pub fn index(&self, index: usize) -> Option<&YamlNode> {
        match &self.value {
            YamlValue::Sequence(items) => items.get(index),
            _ => None,
        }
    }

    /// Navigate a slash-separated path of field names and indexes
    pub fn at(&self, path: &str) -> Option<&YamlNode> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = match segment.parse::<usize>() {
                Ok(index) => current.index(index)?,
                Err(_) => current.field(segment)?.node,
            };
        }
        Some(current)
    }

    /// Scalar rendering, if this node is a scalar
    pub fn as_scalar(&self) -> Option<&str> {
        match &self.value {
            YamlValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this node is a collection with no entries
    pub fn is_empty_collection(&self) -> bool {
        match &self.value {
            YamlValue::Sequence(items) => items.is_empty(),
            YamlValue::Mapping(entries) => entries.is_empty(),
            YamlValue::Scalar(_) => false,
        }
    }
}

fn scalar_key(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A parsed, identifier-injected yaml document
#[derive(Clone, Debug, PartialEq)]
pub struct YamlTree {
    root: YamlNode,
}

impl YamlTree {
    /// Parse a yaml document and inject identifiers into every node.
    ///
    /// This is the only constructor; the tree is immutable afterwards, so
    /// the injected identifiers are stable for the tree's lifetime.
    pub fn parse(text: &str) -> YamlTreeResult<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        Ok(Self {
            root: YamlNode::build(String::new(), &value)?,
        })
    }

    pub fn root(&self) -> &YamlNode {
        &self.root
    }

    /// Top-level field lookup
    pub fn field(&self, name: &str) -> Option<YamlField<'_>> {
        self.root.field(name)
    }
}

/// Render a configuration value as yaml patch text
pub fn to_yaml_text<T: Serialize>(value: &T) -> YamlTreeResult<String> {
    Ok(serde_yaml::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const SERVICE_YAML: &str = r#"
service:
  serviceRef: web
  serviceDefinition:
    type: Kubernetes
    spec:
      manifests:
        - identifier: base
          type: K8sManifest
        - identifier: values
          type: Values
"#;

    #[test]
    fn test_navigation_by_name_and_index() {
        let tree = YamlTree::parse(SERVICE_YAML).unwrap();
        let service = tree.field("service").unwrap();
        assert_eq!(service.name, "service");

        let manifests = service
            .node
            .at("serviceDefinition/spec/manifests")
            .unwrap();
        assert_eq!(manifests.index(0).unwrap().field("identifier").unwrap().node.as_scalar(), Some("base"));
        assert_eq!(manifests.index(1).unwrap().field("type").unwrap().node.as_scalar(), Some("Values"));
        assert!(manifests.index(2).is_none());
    }

    #[test]
    fn test_every_node_gets_a_distinct_uuid() {
        let tree = YamlTree::parse(SERVICE_YAML).unwrap();
        let mut seen = HashSet::new();

        fn walk<'a>(node: &'a YamlNode, seen: &mut HashSet<&'a str>) {
            assert!(seen.insert(node.uuid()), "duplicate uuid injected");
            match node.value() {
                YamlValue::Sequence(items) => items.iter().for_each(|n| walk(n, seen)),
                YamlValue::Mapping(entries) => entries.iter().for_each(|(_, n)| walk(n, seen)),
                YamlValue::Scalar(_) => {}
            }
        }
        walk(tree.root(), &mut seen);
        assert!(seen.len() > 10);
    }

    #[test]
    fn test_paths_are_fully_qualified() {
        let tree = YamlTree::parse(SERVICE_YAML).unwrap();
        let manifests = tree
            .root()
            .at("service/serviceDefinition/spec/manifests")
            .unwrap();
        assert_eq!(manifests.path(), "service/serviceDefinition/spec/manifests");
        assert_eq!(
            manifests.index(0).unwrap().path(),
            "service/serviceDefinition/spec/manifests/0"
        );
    }

    #[test]
    fn test_missing_field_is_none() {
        let tree = YamlTree::parse(SERVICE_YAML).unwrap();
        assert!(tree.field("pipeline").is_none());
        assert!(tree.root().at("service/stageOverrides/manifests").is_none());
    }

    #[test]
    fn test_empty_collection_detection() {
        let tree = YamlTree::parse("spec:\n  manifests: []\n").unwrap();
        let manifests = tree.root().at("spec/manifests").unwrap();
        assert!(manifests.is_empty_collection());
    }

    #[test]
    fn test_yaml_text_rendering() {
        #[derive(Serialize)]
        struct Patch {
            identifier: String,
        }
        let text = to_yaml_text(&Patch {
            identifier: "values".into(),
        })
        .unwrap();
        assert!(text.contains("identifier: values"));
    }
}
