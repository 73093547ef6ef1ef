//! Abstract syntax tree for Java source
//!
//! Each syntactic category is a closed enum whose variants hold their own
//! fields. A parsed node is wrapped in [`Syntax<T>`], which adds the span and
//! the exact source text the node was built from. Nodes own their children;
//! there are no back-references.
//!
//! - [`Node::kind`] tags every node with a [`NodeKind`]
//! - [`Node::min_version`] names the first Java release with the construct
//! - [`Node::generate`] regenerates canonical source from the node's fields

pub mod declarations;
pub mod expressions;
pub mod generate;
pub mod patterns;
pub mod statements;
pub mod types;

use crate::utils::Span;
use serde::Serialize;
use std::fmt;
use std::ops::Deref;

pub use declarations::*;
pub use expressions::*;
pub use generate::SourceWriter;
pub use patterns::*;
pub use statements::*;
pub use types::*;

/// Simple Java identifier
pub type Identifier = String;

/// A parsed node: payload, span and verbatim source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Syntax<T> {
    pub node: T,
    pub span: Span,
    pub source: String,
}

impl<T> Syntax<T> {
    pub fn new(node: T, span: Span, source: impl Into<String>) -> Self {
        Self {
            node,
            span,
            source: source.into(),
        }
    }

    pub fn into_inner(self) -> T {
        self.node
    }

    pub fn map<U, F>(self, f: F) -> Syntax<U>
    where
        F: FnOnce(T) -> U,
    {
        Syntax {
            node: f(self.node),
            span: self.span,
            source: self.source,
        }
    }
}

impl<T> Deref for Syntax<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.node
    }
}

impl<T: Node> Node for Syntax<T> {
    fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    fn min_version(&self) -> JavaVersion {
        self.node.min_version()
    }

    fn write(&self, w: &mut SourceWriter) {
        self.node.write(w)
    }
}

pub type ExpressionNode = Syntax<Expression>;
pub type StatementNode = Syntax<Statement>;
pub type TypeNode = Syntax<Type>;
pub type PatternNode = Syntax<Pattern>;
pub type DirectiveNode = Syntax<Directive>;
pub type CaseLabelNode = Syntax<CaseLabel>;
pub type TypeDeclarationNode = Syntax<TypeDeclaration>;
pub type MemberNode = Syntax<Member>;
pub type AnnotationNode = Syntax<Annotation>;
pub type ModifierNode = Syntax<Modifier>;
pub type ParameterNode = Syntax<Parameter>;
pub type VariableDeclaratorNode = Syntax<VariableDeclarator>;
pub type CatchClauseNode = Syntax<CatchClause>;
pub type ResourceNode = Syntax<Resource>;
pub type SwitchLabelNode = Syntax<SwitchLabel>;
pub type SwitchRuleNode = Syntax<SwitchRule>;
pub type SwitchGroupNode = Syntax<SwitchGroup>;
pub type EnumConstantNode = Syntax<EnumConstant>;
pub type TypeParameterNode = Syntax<TypeParameter>;
pub type ImportDeclarationNode = Syntax<ImportDeclaration>;
pub type PackageDeclarationNode = Syntax<PackageDeclaration>;
pub type ModuleDeclarationNode = Syntax<ModuleDeclaration>;
pub type BlockNode = Syntax<Block>;
pub type CompilationUnitNode = Syntax<CompilationUnit>;

/// Behavior shared by every node payload
pub trait Node {
    fn kind(&self) -> NodeKind;

    /// First Java release that accepts this construct
    fn min_version(&self) -> JavaVersion {
        JavaVersion::Java1
    }

    /// Append canonical source for this node
    fn write(&self, w: &mut SourceWriter);

    fn generate(&self) -> String {
        let mut writer = SourceWriter::new();
        self.write(&mut writer);
        writer.finish()
    }

    fn is_expression(&self) -> bool {
        self.kind().category() == NodeCategory::Expression
    }

    fn is_statement(&self) -> bool {
        self.kind().category() == NodeCategory::Statement
    }

    fn is_type(&self) -> bool {
        self.kind().category() == NodeCategory::Type
    }

    fn is_pattern(&self) -> bool {
        self.kind().category() == NodeCategory::Pattern
    }

    fn is_directive(&self) -> bool {
        self.kind().category() == NodeCategory::Directive
    }

    fn is_case_label(&self) -> bool {
        self.kind().category() == NodeCategory::CaseLabel
    }

    fn is_declaration(&self) -> bool {
        self.kind().category() == NodeCategory::Declaration
    }
}

/// Java releases that introduced syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum JavaVersion {
    Java1,
    Java1_4,
    Java5,
    Java7,
    Java8,
    Java9,
    Java10,
    Java11,
    Java14,
    Java15,
    Java16,
    Java17,
    Java21,
    Java22,
}

impl JavaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Java1 => "1.0",
            Self::Java1_4 => "1.4",
            Self::Java5 => "5",
            Self::Java7 => "7",
            Self::Java8 => "8",
            Self::Java9 => "9",
            Self::Java10 => "10",
            Self::Java11 => "11",
            Self::Java14 => "14",
            Self::Java15 => "15",
            Self::Java16 => "16",
            Self::Java17 => "17",
            Self::Java21 => "21",
            Self::Java22 => "22",
        }
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Java {}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeCategory {
    Expression,
    Statement,
    Type,
    Pattern,
    Directive,
    CaseLabel,
    Declaration,
    /// Records that only appear inside other nodes
    Support,
}

/// Tag for every concrete node variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    // Expressions
    Literal,
    Name,
    This,
    Super,
    FieldAccess,
    ArrayAccess,
    MethodCall,
    ObjectCreation,
    ArrayCreation,
    ArrayInitializer,
    Unary,
    Binary,
    Assignment,
    Conditional,
    InstanceOf,
    Cast,
    Lambda,
    MethodReference,
    ClassLiteral,
    Parenthesized,
    SwitchExpression,

    // Statements
    Block,
    EmptyStatement,
    ExpressionStatement,
    LocalVariable,
    LocalClass,
    If,
    While,
    DoWhile,
    For,
    ForEach,
    Switch,
    Return,
    Break,
    Continue,
    Throw,
    Try,
    Synchronized,
    Labeled,
    Assert,
    Yield,
    ConstructorInvocation,

    // Types
    PrimitiveType,
    VoidType,
    ClassType,
    ArrayType,
    WildcardType,
    IntersectionType,
    UnionType,
    VarType,

    // Patterns
    TypePattern,
    RecordPattern,
    UnnamedPattern,

    // Module directives
    Requires,
    Exports,
    Opens,
    Uses,
    Provides,

    // Case labels
    ConstantLabel,
    PatternLabel,
    NullLabel,
    DefaultLabel,

    // Declarations
    ClassDeclaration,
    InterfaceDeclaration,
    AnnotationTypeDeclaration,
    EnumDeclaration,
    RecordDeclaration,
    FieldDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    CompactConstructorDeclaration,
    InitializerDeclaration,
    MemberTypeDeclaration,
    EmptyDeclaration,
    EnumConstant,
    PackageDeclaration,
    ImportDeclaration,
    ModuleDeclaration,

    // Support records
    Annotation,
    Modifier,
    Parameter,
    VariableDeclarator,
    CatchClause,
    Resource,
    SwitchLabel,
    SwitchRule,
    SwitchGroup,
    TypeParameter,
    CompilationUnit,
}

impl NodeKind {
    pub fn category(&self) -> NodeCategory {
        use NodeKind::*;
        match self {
            Literal | Name | This | Super | FieldAccess | ArrayAccess | MethodCall
            | ObjectCreation | ArrayCreation | ArrayInitializer | Unary | Binary | Assignment
            | Conditional | InstanceOf | Cast | Lambda | MethodReference | ClassLiteral
            | Parenthesized | SwitchExpression => NodeCategory::Expression,

            Block | EmptyStatement | ExpressionStatement | LocalVariable | LocalClass | If
            | While | DoWhile | For | ForEach | Switch | Return | Break | Continue | Throw
            | Try | Synchronized | Labeled | Assert | Yield | ConstructorInvocation => {
                NodeCategory::Statement
            }

            PrimitiveType | VoidType | ClassType | ArrayType | WildcardType
            | IntersectionType | UnionType | VarType => NodeCategory::Type,

            TypePattern | RecordPattern | UnnamedPattern => NodeCategory::Pattern,

            Requires | Exports | Opens | Uses | Provides => NodeCategory::Directive,

            ConstantLabel | PatternLabel | NullLabel | DefaultLabel => NodeCategory::CaseLabel,

            ClassDeclaration | InterfaceDeclaration | AnnotationTypeDeclaration
            | EnumDeclaration | RecordDeclaration | FieldDeclaration | MethodDeclaration
            | ConstructorDeclaration | CompactConstructorDeclaration
            | InitializerDeclaration | MemberTypeDeclaration | EmptyDeclaration
            | EnumConstant | PackageDeclaration | ImportDeclaration | ModuleDeclaration => {
                NodeCategory::Declaration
            }

            Annotation | Modifier | Parameter | VariableDeclarator | CatchClause | Resource
            | SwitchLabel | SwitchRule | SwitchGroup | TypeParameter | CompilationUnit => {
                NodeCategory::Support
            }
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Highest `min_version` over a set of nodes
pub(crate) fn max_version<'a, N, I>(nodes: I) -> JavaVersion
where
    N: Node + 'a,
    I: IntoIterator<Item = &'a N>,
{
    nodes
        .into_iter()
        .map(Node::min_version)
        .max()
        .unwrap_or(JavaVersion::Java1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(NodeKind::Lambda.category(), NodeCategory::Expression);
        assert_eq!(NodeKind::Try.category(), NodeCategory::Statement);
        assert_eq!(NodeKind::UnionType.category(), NodeCategory::Type);
        assert_eq!(NodeKind::RecordPattern.category(), NodeCategory::Pattern);
        assert_eq!(NodeKind::Provides.category(), NodeCategory::Directive);
        assert_eq!(NodeKind::DefaultLabel.category(), NodeCategory::CaseLabel);
        assert_eq!(NodeKind::RecordDeclaration.category(), NodeCategory::Declaration);
        assert_eq!(NodeKind::CatchClause.category(), NodeCategory::Support);
    }

    #[test]
    fn test_version_ordering() {
        assert!(JavaVersion::Java10 > JavaVersion::Java8);
        assert!(JavaVersion::Java1_4 < JavaVersion::Java5);
        assert_eq!(JavaVersion::Java21.to_string(), "Java 21");
    }

    #[test]
    fn test_syntax_wrapper_derefs_to_payload() {
        let node = Syntax::new(
            Expression::Name {
                name: "count".to_string(),
            },
            Span::from_offsets(0, 5),
            "count",
        );
        assert!(matches!(&*node, Expression::Name { name } if name == "count"));
        assert_eq!(node.kind(), NodeKind::Name);
        assert!(node.is_expression());
        assert!(!node.is_statement());
        assert_eq!(node.generate(), "count");
    }
}
