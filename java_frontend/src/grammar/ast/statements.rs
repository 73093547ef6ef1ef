//! Statement nodes, blocks and switch bodies

use super::{
    max_version, BlockNode, CaseLabelNode, CatchClauseNode, ExpressionNode, Identifier,
    JavaVersion, ModifierNode, Node, NodeKind, PatternNode, ResourceNode, SourceWriter,
    StatementNode, SwitchGroupNode, SwitchLabelNode, SwitchRuleNode, Type, TypeDeclarationNode,
    TypeNode, VariableDeclaratorNode,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<StatementNode>,
}

impl Node for Block {
    fn kind(&self) -> NodeKind {
        NodeKind::Block
    }

    fn min_version(&self) -> JavaVersion {
        max_version(&self.statements)
    }

    fn write(&self, w: &mut SourceWriter) {
        w.braced_lines(&self.statements);
    }
}

/// `final int a = 1, b[]` without the terminating semicolon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalVariableDeclaration {
    pub modifiers: Vec<ModifierNode>,
    pub var_type: TypeNode,
    pub declarators: Vec<VariableDeclaratorNode>,
}

impl LocalVariableDeclaration {
    fn write(&self, w: &mut SourceWriter) {
        w.prefix_list(&self.modifiers);
        self.var_type.write(w);
        w.write(" ");
        w.join(&self.declarators, ", ");
    }

    fn min_version(&self) -> JavaVersion {
        self.var_type.min_version()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ForInit {
    Declaration(LocalVariableDeclaration),
    Expressions(Vec<ExpressionNode>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConstructorCallKind {
    This,
    Super,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Block(Block),
    Empty,
    Expression {
        expression: ExpressionNode,
    },
    LocalVariable(LocalVariableDeclaration),
    LocalClass {
        declaration: Box<TypeDeclarationNode>,
    },
    If {
        condition: ExpressionNode,
        then_branch: Box<StatementNode>,
        else_branch: Option<Box<StatementNode>>,
    },
    While {
        condition: ExpressionNode,
        body: Box<StatementNode>,
    },
    DoWhile {
        body: Box<StatementNode>,
        condition: ExpressionNode,
    },
    For {
        init: Option<ForInit>,
        condition: Option<ExpressionNode>,
        update: Vec<ExpressionNode>,
        body: Box<StatementNode>,
    },
    ForEach {
        modifiers: Vec<ModifierNode>,
        var_type: TypeNode,
        name: Identifier,
        iterable: ExpressionNode,
        body: Box<StatementNode>,
    },
    Switch {
        selector: ExpressionNode,
        body: SwitchBody,
    },
    Return {
        value: Option<ExpressionNode>,
    },
    Break {
        label: Option<Identifier>,
    },
    Continue {
        label: Option<Identifier>,
    },
    Throw {
        exception: ExpressionNode,
    },
    Try {
        resources: Vec<ResourceNode>,
        block: BlockNode,
        catches: Vec<CatchClauseNode>,
        finally: Option<BlockNode>,
    },
    Synchronized {
        lock: ExpressionNode,
        block: BlockNode,
    },
    Labeled {
        label: Identifier,
        statement: Box<StatementNode>,
    },
    Assert {
        condition: ExpressionNode,
        message: Option<ExpressionNode>,
    },
    Yield {
        value: ExpressionNode,
    },
    /// `this(...)` or `super(...)` at the start of a constructor body
    ConstructorInvocation {
        qualifier: Option<Box<ExpressionNode>>,
        type_arguments: Vec<TypeNode>,
        kind: ConstructorCallKind,
        arguments: Vec<ExpressionNode>,
    },
}

/// Body of a nested statement: blocks stay on the header line
fn write_body(w: &mut SourceWriter, body: &StatementNode) {
    w.write(" ");
    body.write(w);
}

impl Node for Statement {
    fn kind(&self) -> NodeKind {
        match self {
            Statement::Block(_) => NodeKind::Block,
            Statement::Empty => NodeKind::EmptyStatement,
            Statement::Expression { .. } => NodeKind::ExpressionStatement,
            Statement::LocalVariable(_) => NodeKind::LocalVariable,
            Statement::LocalClass { .. } => NodeKind::LocalClass,
            Statement::If { .. } => NodeKind::If,
            Statement::While { .. } => NodeKind::While,
            Statement::DoWhile { .. } => NodeKind::DoWhile,
            Statement::For { .. } => NodeKind::For,
            Statement::ForEach { .. } => NodeKind::ForEach,
            Statement::Switch { .. } => NodeKind::Switch,
            Statement::Return { .. } => NodeKind::Return,
            Statement::Break { .. } => NodeKind::Break,
            Statement::Continue { .. } => NodeKind::Continue,
            Statement::Throw { .. } => NodeKind::Throw,
            Statement::Try { .. } => NodeKind::Try,
            Statement::Synchronized { .. } => NodeKind::Synchronized,
            Statement::Labeled { .. } => NodeKind::Labeled,
            Statement::Assert { .. } => NodeKind::Assert,
            Statement::Yield { .. } => NodeKind::Yield,
            Statement::ConstructorInvocation { .. } => NodeKind::ConstructorInvocation,
        }
    }

    fn min_version(&self) -> JavaVersion {
        match self {
            Statement::LocalVariable(declaration) => declaration.min_version(),
            Statement::LocalClass { declaration } => declaration.min_version(),
            Statement::ForEach { var_type, .. } => {
                var_type.min_version().max(JavaVersion::Java5)
            }
            Statement::Switch { body, .. } => body.min_version(),
            Statement::Try {
                resources, catches, ..
            } => max_version(resources).max(max_version(catches)),
            Statement::Assert { .. } => JavaVersion::Java1_4,
            Statement::Yield { .. } => JavaVersion::Java14,
            _ => JavaVersion::Java1,
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        match self {
            Statement::Block(block) => block.write(w),
            Statement::Empty => w.write(";"),
            Statement::Expression { expression } => {
                expression.write(w);
                w.write(";");
            }
            Statement::LocalVariable(declaration) => {
                declaration.write(w);
                w.write(";");
            }
            Statement::LocalClass { declaration } => declaration.write(w),
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                w.write("if (");
                condition.write(w);
                w.write(")");
                write_body(w, then_branch);
                if let Some(else_branch) = else_branch {
                    w.write(" else");
                    write_body(w, else_branch);
                }
            }
            Statement::While { condition, body } => {
                w.write("while (");
                condition.write(w);
                w.write(")");
                write_body(w, body);
            }
            Statement::DoWhile { body, condition } => {
                w.write("do");
                write_body(w, body);
                w.write(" while (");
                condition.write(w);
                w.write(");");
            }
            Statement::For {
                init,
                condition,
                update,
                body,
            } => {
                w.write("for (");
                match init {
                    Some(ForInit::Declaration(declaration)) => declaration.write(w),
                    Some(ForInit::Expressions(expressions)) => w.join(expressions, ", "),
                    None => {}
                }
                w.write(";");
                if let Some(condition) = condition {
                    w.write(" ");
                    condition.write(w);
                }
                w.write(";");
                if !update.is_empty() {
                    w.write(" ");
                    w.join(update, ", ");
                }
                w.write(")");
                write_body(w, body);
            }
            Statement::ForEach {
                modifiers,
                var_type,
                name,
                iterable,
                body,
            } => {
                w.write("for (");
                w.prefix_list(modifiers);
                var_type.write(w);
                w.write(" ");
                w.write(name);
                w.write(" : ");
                iterable.write(w);
                w.write(")");
                write_body(w, body);
            }
            Statement::Switch { selector, body } => {
                w.write("switch (");
                selector.write(w);
                w.write(") ");
                body.write(w);
            }
            Statement::Return { value } => {
                w.write("return");
                if let Some(value) = value {
                    w.write(" ");
                    value.write(w);
                }
                w.write(";");
            }
            Statement::Break { label } => {
                w.write("break");
                if let Some(label) = label {
                    w.write(" ");
                    w.write(label);
                }
                w.write(";");
            }
            Statement::Continue { label } => {
                w.write("continue");
                if let Some(label) = label {
                    w.write(" ");
                    w.write(label);
                }
                w.write(";");
            }
            Statement::Throw { exception } => {
                w.write("throw ");
                exception.write(w);
                w.write(";");
            }
            Statement::Try {
                resources,
                block,
                catches,
                finally,
            } => {
                w.write("try");
                if !resources.is_empty() {
                    w.write(" (");
                    w.join(resources, "; ");
                    w.write(")");
                }
                w.write(" ");
                block.write(w);
                for catch in catches {
                    w.write(" ");
                    catch.write(w);
                }
                if let Some(finally) = finally {
                    w.write(" finally ");
                    finally.write(w);
                }
            }
            Statement::Synchronized { lock, block } => {
                w.write("synchronized (");
                lock.write(w);
                w.write(") ");
                block.write(w);
            }
            Statement::Labeled { label, statement } => {
                w.write(label);
                w.write(":");
                write_body(w, statement);
            }
            Statement::Assert { condition, message } => {
                w.write("assert ");
                condition.write(w);
                if let Some(message) = message {
                    w.write(" : ");
                    message.write(w);
                }
                w.write(";");
            }
            Statement::Yield { value } => {
                w.write("yield ");
                value.write(w);
                w.write(";");
            }
            Statement::ConstructorInvocation {
                qualifier,
                type_arguments,
                kind,
                arguments,
            } => {
                if let Some(qualifier) = qualifier {
                    qualifier.write(w);
                    w.write(".");
                }
                w.angle_list(type_arguments);
                w.write(match kind {
                    ConstructorCallKind::This => "this",
                    ConstructorCallKind::Super => "super",
                });
                w.paren_list(arguments);
                w.write(";");
            }
        }
    }
}

/// `catch (final IOException | SQLException e) { ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchClause {
    pub modifiers: Vec<ModifierNode>,
    /// One or more alternatives
    pub types: Vec<TypeNode>,
    pub name: Identifier,
    pub block: BlockNode,
}

impl Node for CatchClause {
    fn kind(&self) -> NodeKind {
        NodeKind::CatchClause
    }

    fn min_version(&self) -> JavaVersion {
        if self.types.len() > 1 {
            JavaVersion::Java7
        } else {
            JavaVersion::Java1
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        w.write("catch (");
        w.prefix_list(&self.modifiers);
        w.join(&self.types, " | ");
        w.write(" ");
        w.write(&self.name);
        w.write(") ");
        self.block.write(w);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Resource {
    /// `InputStream in = open()`
    Declaration {
        modifiers: Vec<ModifierNode>,
        var_type: TypeNode,
        name: Identifier,
        initializer: ExpressionNode,
    },
    /// An effectively final variable or field access
    Expression(ExpressionNode),
}

impl Node for Resource {
    fn kind(&self) -> NodeKind {
        NodeKind::Resource
    }

    fn min_version(&self) -> JavaVersion {
        match self {
            Resource::Declaration { var_type, .. } => {
                var_type.min_version().max(JavaVersion::Java7)
            }
            Resource::Expression(_) => JavaVersion::Java9,
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        match self {
            Resource::Declaration {
                modifiers,
                var_type,
                name,
                initializer,
            } => {
                w.prefix_list(modifiers);
                var_type.write(w);
                w.write(" ");
                w.write(name);
                w.write(" = ");
                initializer.write(w);
            }
            Resource::Expression(expression) => expression.write(w),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CaseLabel {
    /// Constant expression or enum constant name
    Expression(ExpressionNode),
    Pattern(PatternNode),
    Null,
    Default,
}

impl Node for CaseLabel {
    fn kind(&self) -> NodeKind {
        match self {
            CaseLabel::Expression(_) => NodeKind::ConstantLabel,
            CaseLabel::Pattern(_) => NodeKind::PatternLabel,
            CaseLabel::Null => NodeKind::NullLabel,
            CaseLabel::Default => NodeKind::DefaultLabel,
        }
    }

    fn min_version(&self) -> JavaVersion {
        match self {
            CaseLabel::Pattern(pattern) => pattern.min_version().max(JavaVersion::Java21),
            CaseLabel::Null => JavaVersion::Java21,
            _ => JavaVersion::Java1,
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        match self {
            CaseLabel::Expression(expression) => expression.write(w),
            CaseLabel::Pattern(pattern) => pattern.write(w),
            CaseLabel::Null => w.write("null"),
            CaseLabel::Default => w.write("default"),
        }
    }
}

/// `case A, B when guard` or `default`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchLabel {
    pub labels: Vec<CaseLabelNode>,
    pub guard: Option<ExpressionNode>,
}

impl SwitchLabel {
    /// A lone `default`, written without `case`
    pub fn is_default(&self) -> bool {
        matches!(self.labels.as_slice(), [label] if matches!(label.node, CaseLabel::Default))
    }
}

impl Node for SwitchLabel {
    fn kind(&self) -> NodeKind {
        NodeKind::SwitchLabel
    }

    fn min_version(&self) -> JavaVersion {
        let labels = max_version(&self.labels);
        if self.guard.is_some() {
            labels.max(JavaVersion::Java21)
        } else if self.labels.len() > 1 {
            labels.max(JavaVersion::Java14)
        } else {
            labels
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        if self.is_default() {
            w.write("default");
            return;
        }
        w.write("case ");
        w.join(&self.labels, ", ");
        if let Some(guard) = &self.guard {
            w.write(" when ");
            guard.write(w);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RuleBody {
    Expression(ExpressionNode),
    Block(BlockNode),
    Throw(Box<StatementNode>),
}

/// `case 1 -> body`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchRule {
    pub label: SwitchLabelNode,
    pub body: RuleBody,
}

impl Node for SwitchRule {
    fn kind(&self) -> NodeKind {
        NodeKind::SwitchRule
    }

    fn min_version(&self) -> JavaVersion {
        self.label.min_version().max(JavaVersion::Java14)
    }

    fn write(&self, w: &mut SourceWriter) {
        self.label.write(w);
        w.write(" -> ");
        match &self.body {
            RuleBody::Expression(expression) => {
                expression.write(w);
                w.write(";");
            }
            RuleBody::Block(block) => block.write(w),
            RuleBody::Throw(statement) => statement.write(w),
        }
    }
}

/// `case 1: case 2: statements`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchGroup {
    pub labels: Vec<SwitchLabelNode>,
    pub statements: Vec<StatementNode>,
}

impl Node for SwitchGroup {
    fn kind(&self) -> NodeKind {
        NodeKind::SwitchGroup
    }

    fn min_version(&self) -> JavaVersion {
        max_version(&self.labels).max(max_version(&self.statements))
    }

    fn write(&self, w: &mut SourceWriter) {
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                w.newline();
            }
            label.write(w);
            w.write(":");
        }
        w.indent();
        for statement in &self.statements {
            w.newline();
            statement.write(w);
        }
        w.dedent();
    }
}

/// Arrow rules or colon groups; a switch never mixes the two
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SwitchBody {
    Rules(Vec<SwitchRuleNode>),
    Groups(Vec<SwitchGroupNode>),
}

impl SwitchBody {
    pub fn min_version(&self) -> JavaVersion {
        match self {
            SwitchBody::Rules(rules) => max_version(rules).max(JavaVersion::Java14),
            SwitchBody::Groups(groups) => max_version(groups),
        }
    }

    pub fn write(&self, w: &mut SourceWriter) {
        match self {
            SwitchBody::Rules(rules) => w.braced_lines(rules),
            SwitchBody::Groups(groups) => w.braced_lines(groups),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SwitchBody::Rules(rules) => rules.is_empty(),
            SwitchBody::Groups(groups) => groups.is_empty(),
        }
    }
}

impl Statement {
    /// Whether the declared local type is `var`
    pub fn declares_var(&self) -> bool {
        match self {
            Statement::LocalVariable(declaration) => matches!(declaration.var_type.node, Type::Var),
            _ => false,
        }
    }
}
