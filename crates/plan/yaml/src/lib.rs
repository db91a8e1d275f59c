//! Identifier-injected YAML tree facade
//!
//! The plan assembler consumes stage yaml as an immutable tree in which
//! every node already carries a stable unique identifier. This crate is
//! that facade: parse once, navigate by field name or index, read the
//! injected uuid and fully-qualified path of any node, and render patch
//! text for values the assembler synthesizes.
//!
//! The yaml grammar itself is serde_yaml's concern; nothing here inspects
//! syntax beyond the parsed value tree.

#![deny(unsafe_code)]

pub mod error;
pub mod tree;

pub use error::{YamlTreeError, YamlTreeResult};
pub use tree::{to_yaml_text, YamlField, YamlNode, YamlTree, YamlValue};
