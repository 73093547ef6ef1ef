//! Patterns for `instanceof` and `case` labels

use super::{
    max_version, Identifier, JavaVersion, ModifierNode, Node, NodeKind, PatternNode,
    SourceWriter, TypeNode,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Pattern {
    /// `final String s`
    Type {
        modifiers: Vec<ModifierNode>,
        pattern_type: Box<TypeNode>,
        name: Identifier,
    },
    /// `Point(int x, var y)`
    Record {
        record_type: Box<TypeNode>,
        components: Vec<PatternNode>,
    },
    /// `_` inside a record pattern
    Unnamed,
}

impl Pattern {
    /// Name bound by a type pattern
    pub fn binding(&self) -> Option<&str> {
        match self {
            Pattern::Type { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl Node for Pattern {
    fn kind(&self) -> NodeKind {
        match self {
            Pattern::Type { .. } => NodeKind::TypePattern,
            Pattern::Record { .. } => NodeKind::RecordPattern,
            Pattern::Unnamed => NodeKind::UnnamedPattern,
        }
    }

    fn min_version(&self) -> JavaVersion {
        match self {
            Pattern::Type { name, .. } if name == "_" => JavaVersion::Java22,
            Pattern::Type { .. } => JavaVersion::Java16,
            Pattern::Record { components, .. } => {
                max_version(components).max(JavaVersion::Java21)
            }
            Pattern::Unnamed => JavaVersion::Java22,
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        match self {
            Pattern::Type {
                modifiers,
                pattern_type,
                name,
            } => {
                w.prefix_list(modifiers);
                pattern_type.write(w);
                w.write(" ");
                w.write(name);
            }
            Pattern::Record {
                record_type,
                components,
            } => {
                record_type.write(w);
                w.paren_list(components);
            }
            Pattern::Unnamed => w.write("_"),
        }
    }
}
