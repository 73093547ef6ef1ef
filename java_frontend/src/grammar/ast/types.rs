//! Type syntax: primitive, class, array, wildcard, intersection and union
//! types, plus type parameters

use super::{
    max_version, AnnotationNode, Identifier, JavaVersion, Node, NodeKind, SourceWriter, TypeNode,
};
use crate::grammar::keywords::Keyword;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        let primitive = match keyword {
            Keyword::Boolean => Self::Boolean,
            Keyword::Byte => Self::Byte,
            Keyword::Char => Self::Char,
            Keyword::Short => Self::Short,
            Keyword::Int => Self::Int,
            Keyword::Long => Self::Long,
            Keyword::Float => Self::Float,
            Keyword::Double => Self::Double,
            _ => return None,
        };
        Some(primitive)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// One dotted segment of a class type: `@A Outer<T>` in `@A Outer<T>.Inner`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassTypeSegment {
    pub annotations: Vec<AnnotationNode>,
    pub name: Identifier,
    /// `None` for no arguments, `Some(vec![])` for the diamond `<>`
    pub type_arguments: Option<Vec<TypeNode>>,
}

impl ClassTypeSegment {
    pub fn simple(name: impl Into<Identifier>) -> Self {
        Self {
            annotations: Vec::new(),
            name: name.into(),
            type_arguments: None,
        }
    }
}

/// One `[]` of an array type with its annotations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimension {
    pub annotations: Vec<AnnotationNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WildcardBound {
    Extends(Box<TypeNode>),
    Super(Box<TypeNode>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Type {
    Primitive {
        annotations: Vec<AnnotationNode>,
        primitive: PrimitiveType,
    },
    Void,
    Class {
        segments: Vec<ClassTypeSegment>,
    },
    Array {
        element: Box<TypeNode>,
        dimensions: Vec<Dimension>,
    },
    Wildcard {
        annotations: Vec<AnnotationNode>,
        bound: Option<WildcardBound>,
    },
    /// `A & B`, in casts and type parameter bounds
    Intersection {
        bounds: Vec<TypeNode>,
    },
    /// `A | B`, in multi-catch clauses
    Union {
        alternatives: Vec<TypeNode>,
    },
    /// Inferred local variable type
    Var,
}

impl Type {
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive { .. })
    }

    /// Simple name of the last segment of a class type
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            Type::Class { segments } => segments.last().map(|s| s.name.as_str()),
            _ => None,
        }
    }

    /// Dotted name of a class type without annotations or arguments
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            Type::Class { segments } => Some(
                segments
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join("."),
            ),
            _ => None,
        }
    }
}

impl Node for Type {
    fn kind(&self) -> NodeKind {
        match self {
            Type::Primitive { .. } => NodeKind::PrimitiveType,
            Type::Void => NodeKind::VoidType,
            Type::Class { .. } => NodeKind::ClassType,
            Type::Array { .. } => NodeKind::ArrayType,
            Type::Wildcard { .. } => NodeKind::WildcardType,
            Type::Intersection { .. } => NodeKind::IntersectionType,
            Type::Union { .. } => NodeKind::UnionType,
            Type::Var => NodeKind::VarType,
        }
    }

    fn min_version(&self) -> JavaVersion {
        match self {
            Type::Primitive { annotations, .. } if !annotations.is_empty() => JavaVersion::Java8,
            Type::Class { segments } => segments
                .iter()
                .map(|segment| {
                    if !segment.annotations.is_empty() {
                        JavaVersion::Java8
                    } else {
                        match &segment.type_arguments {
                            Some(args) if args.is_empty() => JavaVersion::Java7,
                            Some(args) => max_version(args).max(JavaVersion::Java5),
                            None => JavaVersion::Java1,
                        }
                    }
                })
                .max()
                .unwrap_or(JavaVersion::Java1),
            Type::Array { element, .. } => element.min_version(),
            Type::Wildcard { .. } | Type::Intersection { .. } => JavaVersion::Java5,
            Type::Union { .. } => JavaVersion::Java7,
            Type::Var => JavaVersion::Java10,
            _ => JavaVersion::Java1,
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        match self {
            Type::Primitive {
                annotations,
                primitive,
            } => {
                w.prefix_list(annotations);
                w.write(primitive.as_str());
            }
            Type::Void => w.write("void"),
            Type::Class { segments } => {
                for (i, segment) in segments.iter().enumerate() {
                    if i > 0 {
                        w.write(".");
                    }
                    w.prefix_list(&segment.annotations);
                    w.write(&segment.name);
                    match &segment.type_arguments {
                        Some(args) if args.is_empty() => w.write("<>"),
                        Some(args) => w.angle_list(args),
                        None => {}
                    }
                }
            }
            Type::Array {
                element,
                dimensions,
            } => {
                element.write(w);
                for dimension in dimensions {
                    if !dimension.annotations.is_empty() {
                        w.write(" ");
                        w.join(&dimension.annotations, " ");
                        w.write(" ");
                    }
                    w.write("[]");
                }
            }
            Type::Wildcard { annotations, bound } => {
                w.prefix_list(annotations);
                w.write("?");
                match bound {
                    Some(WildcardBound::Extends(t)) => {
                        w.write(" extends ");
                        t.write(w);
                    }
                    Some(WildcardBound::Super(t)) => {
                        w.write(" super ");
                        t.write(w);
                    }
                    None => {}
                }
            }
            Type::Intersection { bounds } => w.join(bounds, " & "),
            Type::Union { alternatives } => w.join(alternatives, " | "),
            Type::Var => w.write("var"),
        }
    }
}

/// `<T extends A & B>` entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeParameter {
    pub annotations: Vec<AnnotationNode>,
    pub name: Identifier,
    pub bounds: Vec<TypeNode>,
}

impl Node for TypeParameter {
    fn kind(&self) -> NodeKind {
        NodeKind::TypeParameter
    }

    fn min_version(&self) -> JavaVersion {
        JavaVersion::Java5
    }

    fn write(&self, w: &mut SourceWriter) {
        w.prefix_list(&self.annotations);
        w.write(&self.name);
        if !self.bounds.is_empty() {
            w.write(" extends ");
            w.join(&self.bounds, " & ");
        }
    }
}
