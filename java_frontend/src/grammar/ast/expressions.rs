//! Expression nodes and operator tables

use super::{
    AnnotationNode, BlockNode, ExpressionNode, Identifier, JavaVersion, MemberNode, Node, NodeKind,
    ParameterNode, PatternNode, SourceWriter, SwitchBody, TypeNode,
};
use crate::tokens::{LiteralValue, TokenKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    TextBlock,
    Boolean,
    Null,
}

impl LiteralKind {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let literal = match kind {
            TokenKind::IntLiteral => Self::Int,
            TokenKind::LongLiteral => Self::Long,
            TokenKind::FloatLiteral => Self::Float,
            TokenKind::DoubleLiteral => Self::Double,
            TokenKind::CharLiteral => Self::Char,
            TokenKind::StringLiteral => Self::String,
            TokenKind::TextBlock => Self::TextBlock,
            TokenKind::True | TokenKind::False => Self::Boolean,
            TokenKind::Null => Self::Null,
            _ => return None,
        };
        Some(literal)
    }
}

/// Literal with its decoded value and original spelling. Generation uses
/// the spelling, so radix prefixes and escapes survive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub kind: LiteralKind,
    pub value: Option<LiteralValue>,
    pub text: String,
}

impl Literal {
    fn min_version(&self) -> JavaVersion {
        let text = self.text.to_ascii_lowercase();
        match self.kind {
            LiteralKind::TextBlock => JavaVersion::Java15,
            LiteralKind::Int | LiteralKind::Long
                if text.contains('_') || text.starts_with("0b") =>
            {
                JavaVersion::Java7
            }
            LiteralKind::Float | LiteralKind::Double if text.contains('_') => JavaVersion::Java7,
            LiteralKind::Float | LiteralKind::Double if text.starts_with("0x") => {
                JavaVersion::Java5
            }
            _ => JavaVersion::Java1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    BitwiseNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOperator {
    pub fn prefix_from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => Self::Plus,
            TokenKind::Minus => Self::Minus,
            TokenKind::Bang => Self::Not,
            TokenKind::Tilde => Self::BitwiseNot,
            TokenKind::PlusPlus => Self::PreIncrement,
            TokenKind::MinusMinus => Self::PreDecrement,
            _ => return None,
        };
        Some(op)
    }

    pub fn postfix_from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::PlusPlus => Some(Self::PostIncrement),
            TokenKind::MinusMinus => Some(Self::PostDecrement),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "!",
            Self::BitwiseNot => "~",
            Self::PreIncrement | Self::PostIncrement => "++",
            Self::PreDecrement | Self::PostDecrement => "--",
        }
    }

    pub fn is_postfix(&self) -> bool {
        matches!(self, Self::PostIncrement | Self::PostDecrement)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

/// Binding power of `instanceof`, shared with the relational operators
pub const INSTANCEOF_PRECEDENCE: u8 = 7;

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::OrOr => Self::Or,
            TokenKind::AndAnd => Self::And,
            TokenKind::Pipe => Self::BitOr,
            TokenKind::Caret => Self::BitXor,
            TokenKind::Amp => Self::BitAnd,
            TokenKind::EqEq => Self::Equal,
            TokenKind::NotEq => Self::NotEqual,
            TokenKind::Lt => Self::Less,
            TokenKind::Gt => Self::Greater,
            TokenKind::LtEq => Self::LessEqual,
            TokenKind::GtEq => Self::GreaterEqual,
            TokenKind::Shl => Self::ShiftLeft,
            TokenKind::Shr => Self::ShiftRight,
            TokenKind::UShr => Self::UnsignedShiftRight,
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Subtract,
            TokenKind::Star => Self::Multiply,
            TokenKind::Slash => Self::Divide,
            TokenKind::Percent => Self::Remainder,
            _ => return None,
        };
        Some(op)
    }

    /// Higher binds tighter. All binary operators are left-associative.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::BitOr => 3,
            Self::BitXor => 4,
            Self::BitAnd => 5,
            Self::Equal | Self::NotEqual => 6,
            Self::Less | Self::Greater | Self::LessEqual | Self::GreaterEqual => {
                INSTANCEOF_PRECEDENCE
            }
            Self::ShiftLeft | Self::ShiftRight | Self::UnsignedShiftRight => 8,
            Self::Add | Self::Subtract => 9,
            Self::Multiply | Self::Divide | Self::Remainder => 10,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitAnd => "&",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::UnsignedShiftRight => ">>>",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssignmentOperator {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
}

impl AssignmentOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Assign => Self::Assign,
            TokenKind::PlusEq => Self::Add,
            TokenKind::MinusEq => Self::Subtract,
            TokenKind::StarEq => Self::Multiply,
            TokenKind::SlashEq => Self::Divide,
            TokenKind::PercentEq => Self::Remainder,
            TokenKind::AmpEq => Self::BitAnd,
            TokenKind::PipeEq => Self::BitOr,
            TokenKind::CaretEq => Self::BitXor,
            TokenKind::ShlEq => Self::ShiftLeft,
            TokenKind::ShrEq => Self::ShiftRight,
            TokenKind::UShrEq => Self::UnsignedShiftRight,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Subtract => "-=",
            Self::Multiply => "*=",
            Self::Divide => "/=",
            Self::Remainder => "%=",
            Self::BitAnd => "&=",
            Self::BitOr => "|=",
            Self::BitXor => "^=",
            Self::ShiftLeft => "<<=",
            Self::ShiftRight => ">>=",
            Self::UnsignedShiftRight => ">>>=",
        }
    }
}

/// Right-hand side of `instanceof`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InstanceOfTarget {
    Type(Box<TypeNode>),
    Pattern(Box<PatternNode>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LambdaParameters {
    /// `x`, `(x)` or `(a, b)`
    Implicit {
        names: Vec<Identifier>,
        parenthesized: bool,
    },
    /// `(int a, final String b)`
    Explicit(Vec<ParameterNode>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LambdaBody {
    Expression(Box<ExpressionNode>),
    Block(BlockNode),
}

/// Left-hand side of `::`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReferenceTarget {
    Expression(Box<ExpressionNode>),
    Type(Box<TypeNode>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Literal(Literal),
    Name {
        name: Identifier,
    },
    This {
        qualifier: Option<Box<ExpressionNode>>,
    },
    /// Only valid as the target of a field access, call or reference
    Super {
        qualifier: Option<Box<ExpressionNode>>,
    },
    FieldAccess {
        target: Box<ExpressionNode>,
        name: Identifier,
    },
    ArrayAccess {
        array: Box<ExpressionNode>,
        index: Box<ExpressionNode>,
    },
    MethodCall {
        target: Option<Box<ExpressionNode>>,
        type_arguments: Vec<TypeNode>,
        name: Identifier,
        arguments: Vec<ExpressionNode>,
    },
    ObjectCreation {
        outer: Option<Box<ExpressionNode>>,
        type_arguments: Vec<TypeNode>,
        class_type: Box<TypeNode>,
        arguments: Vec<ExpressionNode>,
        /// Anonymous class body
        body: Option<Vec<MemberNode>>,
    },
    ArrayCreation {
        element: Box<TypeNode>,
        dimensions: Vec<ExpressionNode>,
        extra_dimensions: usize,
        /// Type annotations before each `[`, sized dimensions first
        dimension_annotations: Vec<Vec<AnnotationNode>>,
        initializer: Option<Box<ExpressionNode>>,
    },
    ArrayInitializer {
        elements: Vec<ExpressionNode>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<ExpressionNode>,
    },
    Binary {
        left: Box<ExpressionNode>,
        operator: BinaryOperator,
        right: Box<ExpressionNode>,
    },
    Assignment {
        target: Box<ExpressionNode>,
        operator: AssignmentOperator,
        value: Box<ExpressionNode>,
    },
    Conditional {
        condition: Box<ExpressionNode>,
        then_value: Box<ExpressionNode>,
        else_value: Box<ExpressionNode>,
    },
    InstanceOf {
        expression: Box<ExpressionNode>,
        target: InstanceOfTarget,
    },
    Cast {
        target_type: Box<TypeNode>,
        expression: Box<ExpressionNode>,
    },
    Lambda {
        parameters: LambdaParameters,
        body: LambdaBody,
    },
    /// `name` is `new` for constructor references
    MethodReference {
        target: ReferenceTarget,
        type_arguments: Vec<TypeNode>,
        name: Identifier,
    },
    ClassLiteral {
        class_type: Box<TypeNode>,
    },
    Parenthesized {
        expression: Box<ExpressionNode>,
    },
    Switch {
        selector: Box<ExpressionNode>,
        body: SwitchBody,
    },
}

impl Expression {
    /// Dotted name for `a`, `a.b`, `a.b.c`
    pub fn qualified_name(&self) -> Option<Vec<Identifier>> {
        match self {
            Expression::Name { name } => Some(vec![name.clone()]),
            Expression::FieldAccess { target, name } => {
                let mut names = target.qualified_name()?;
                names.push(name.clone());
                Some(names)
            }
            _ => None,
        }
    }

    fn starts_with_symbol(&self, symbol: char) -> bool {
        match self {
            Expression::Unary { operator, .. } if !operator.is_postfix() => {
                operator.symbol().starts_with(symbol)
            }
            _ => false,
        }
    }
}

impl Node for Expression {
    fn kind(&self) -> NodeKind {
        match self {
            Expression::Literal(_) => NodeKind::Literal,
            Expression::Name { .. } => NodeKind::Name,
            Expression::This { .. } => NodeKind::This,
            Expression::Super { .. } => NodeKind::Super,
            Expression::FieldAccess { .. } => NodeKind::FieldAccess,
            Expression::ArrayAccess { .. } => NodeKind::ArrayAccess,
            Expression::MethodCall { .. } => NodeKind::MethodCall,
            Expression::ObjectCreation { .. } => NodeKind::ObjectCreation,
            Expression::ArrayCreation { .. } => NodeKind::ArrayCreation,
            Expression::ArrayInitializer { .. } => NodeKind::ArrayInitializer,
            Expression::Unary { .. } => NodeKind::Unary,
            Expression::Binary { .. } => NodeKind::Binary,
            Expression::Assignment { .. } => NodeKind::Assignment,
            Expression::Conditional { .. } => NodeKind::Conditional,
            Expression::InstanceOf { .. } => NodeKind::InstanceOf,
            Expression::Cast { .. } => NodeKind::Cast,
            Expression::Lambda { .. } => NodeKind::Lambda,
            Expression::MethodReference { .. } => NodeKind::MethodReference,
            Expression::ClassLiteral { .. } => NodeKind::ClassLiteral,
            Expression::Parenthesized { .. } => NodeKind::Parenthesized,
            Expression::Switch { .. } => NodeKind::SwitchExpression,
        }
    }

    fn min_version(&self) -> JavaVersion {
        match self {
            Expression::Literal(literal) => literal.min_version(),
            Expression::MethodCall { type_arguments, .. }
            | Expression::ObjectCreation { type_arguments, .. }
                if !type_arguments.is_empty() =>
            {
                JavaVersion::Java5
            }
            Expression::InstanceOf {
                target: InstanceOfTarget::Pattern(pattern),
                ..
            } => pattern.min_version().max(JavaVersion::Java16),
            Expression::Lambda {
                parameters: LambdaParameters::Explicit(parameters),
                ..
            } if parameters.iter().any(|p| p.is_var()) => JavaVersion::Java11,
            Expression::Lambda { .. } | Expression::MethodReference { .. } => JavaVersion::Java8,
            Expression::ArrayCreation {
                dimension_annotations,
                ..
            } if dimension_annotations.iter().any(|a| !a.is_empty()) => JavaVersion::Java8,
            Expression::Switch { .. } => JavaVersion::Java14,
            _ => JavaVersion::Java1,
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        match self {
            Expression::Literal(literal) => w.write(&literal.text),
            Expression::Name { name } => w.write(name),
            Expression::This { qualifier } => {
                if let Some(q) = qualifier {
                    q.write(w);
                    w.write(".");
                }
                w.write("this");
            }
            Expression::Super { qualifier } => {
                if let Some(q) = qualifier {
                    q.write(w);
                    w.write(".");
                }
                w.write("super");
            }
            Expression::FieldAccess { target, name } => {
                target.write(w);
                w.write(".");
                w.write(name);
            }
            Expression::ArrayAccess { array, index } => {
                array.write(w);
                w.write("[");
                index.write(w);
                w.write("]");
            }
            Expression::MethodCall {
                target,
                type_arguments,
                name,
                arguments,
            } => {
                if let Some(t) = target {
                    t.write(w);
                    w.write(".");
                }
                w.angle_list(type_arguments);
                w.write(name);
                w.paren_list(arguments);
            }
            Expression::ObjectCreation {
                outer,
                type_arguments,
                class_type,
                arguments,
                body,
            } => {
                if let Some(o) = outer {
                    o.write(w);
                    w.write(".");
                }
                w.write("new ");
                w.angle_list(type_arguments);
                class_type.write(w);
                w.paren_list(arguments);
                if let Some(members) = body {
                    w.write(" ");
                    w.braced_lines(members);
                }
            }
            Expression::ArrayCreation {
                element,
                dimensions,
                extra_dimensions,
                dimension_annotations,
                initializer,
            } => {
                w.write("new ");
                element.write(w);
                let mut annotations = dimension_annotations.iter();
                let mut write_annotations = |w: &mut SourceWriter| {
                    if let Some(list) = annotations.next().filter(|list| !list.is_empty()) {
                        w.write(" ");
                        w.prefix_list(list);
                    }
                };
                for dimension in dimensions {
                    write_annotations(w);
                    w.write("[");
                    dimension.write(w);
                    w.write("]");
                }
                for _ in 0..*extra_dimensions {
                    write_annotations(w);
                    w.write("[]");
                }
                if let Some(init) = initializer {
                    w.write(" ");
                    init.write(w);
                }
            }
            Expression::ArrayInitializer { elements } => {
                w.write("{");
                w.join(elements, ", ");
                w.write("}");
            }
            Expression::Unary { operator, operand } => {
                if operator.is_postfix() {
                    operand.write(w);
                    w.write(operator.symbol());
                } else {
                    w.write(operator.symbol());
                    let symbol = operator.symbol().chars().next().unwrap_or(' ');
                    if operand.starts_with_symbol(symbol) {
                        w.write(" ");
                    }
                    operand.write(w);
                }
            }
            Expression::Binary {
                left,
                operator,
                right,
            } => {
                left.write(w);
                w.write(" ");
                w.write(operator.symbol());
                w.write(" ");
                right.write(w);
            }
            Expression::Assignment {
                target,
                operator,
                value,
            } => {
                target.write(w);
                w.write(" ");
                w.write(operator.symbol());
                w.write(" ");
                value.write(w);
            }
            Expression::Conditional {
                condition,
                then_value,
                else_value,
            } => {
                condition.write(w);
                w.write(" ? ");
                then_value.write(w);
                w.write(" : ");
                else_value.write(w);
            }
            Expression::InstanceOf { expression, target } => {
                expression.write(w);
                w.write(" instanceof ");
                match target {
                    InstanceOfTarget::Type(t) => t.write(w),
                    InstanceOfTarget::Pattern(p) => p.write(w),
                }
            }
            Expression::Cast {
                target_type,
                expression,
            } => {
                w.write("(");
                target_type.write(w);
                w.write(") ");
                expression.write(w);
            }
            Expression::Lambda { parameters, body } => {
                match parameters {
                    LambdaParameters::Implicit {
                        names,
                        parenthesized,
                    } => {
                        if *parenthesized || names.len() != 1 {
                            w.write("(");
                            w.write(&names.join(", "));
                            w.write(")");
                        } else {
                            w.write(&names[0]);
                        }
                    }
                    LambdaParameters::Explicit(parameters) => w.paren_list(parameters),
                }
                w.write(" -> ");
                match body {
                    LambdaBody::Expression(e) => e.write(w),
                    LambdaBody::Block(b) => b.write(w),
                }
            }
            Expression::MethodReference {
                target,
                type_arguments,
                name,
            } => {
                match target {
                    ReferenceTarget::Expression(e) => e.write(w),
                    ReferenceTarget::Type(t) => t.write(w),
                }
                w.write("::");
                w.angle_list(type_arguments);
                w.write(name);
            }
            Expression::ClassLiteral { class_type } => {
                class_type.write(w);
                w.write(".class");
            }
            Expression::Parenthesized { expression } => {
                w.write("(");
                expression.write(w);
                w.write(")");
            }
            Expression::Switch { selector, body } => {
                w.write("switch (");
                selector.write(w);
                w.write(") ");
                body.write(w);
            }
        }
    }
}
