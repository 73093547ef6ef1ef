//! Declarations: modifiers and annotations, type and member declarations,
//! module directives and the compilation unit

use super::generate::dotted;
use super::{
    max_version, AnnotationNode, BlockNode, DirectiveNode, EnumConstantNode, ExpressionNode,
    Identifier, ImportDeclarationNode, JavaVersion, MemberNode, ModifierNode,
    ModuleDeclarationNode, Node, NodeKind, PackageDeclarationNode, ParameterNode, SourceWriter,
    Type, TypeDeclarationNode, TypeNode, TypeParameterNode, VariableDeclaratorNode,
};
use crate::grammar::keywords::Keyword;
use serde::Serialize;

// === MODIFIERS AND ANNOTATIONS ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ElementValue {
    Expression(ExpressionNode),
    Annotation(Box<AnnotationNode>),
    /// `{a, b}`
    Array(Vec<ElementValue>),
}

impl ElementValue {
    fn write(&self, w: &mut SourceWriter) {
        match self {
            ElementValue::Expression(expression) => expression.write(w),
            ElementValue::Annotation(annotation) => annotation.write(w),
            ElementValue::Array(values) => {
                w.write("{");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        w.write(", ");
                    }
                    value.write(w);
                }
                w.write("}");
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementValuePair {
    pub name: Identifier,
    pub value: ElementValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AnnotationArguments {
    /// `@Override`
    Marker,
    /// `@SuppressWarnings("unchecked")`
    Single(ElementValue),
    /// `@Retention(value = RUNTIME)`, possibly empty
    Named(Vec<ElementValuePair>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub name: Vec<Identifier>,
    pub arguments: AnnotationArguments,
}

impl Node for Annotation {
    fn kind(&self) -> NodeKind {
        NodeKind::Annotation
    }

    fn min_version(&self) -> JavaVersion {
        JavaVersion::Java5
    }

    fn write(&self, w: &mut SourceWriter) {
        w.write("@");
        w.write(&dotted(&self.name));
        match &self.arguments {
            AnnotationArguments::Marker => {}
            AnnotationArguments::Single(value) => {
                w.write("(");
                value.write(w);
                w.write(")");
            }
            AnnotationArguments::Named(pairs) => {
                w.write("(");
                for (i, pair) in pairs.iter().enumerate() {
                    if i > 0 {
                        w.write(", ");
                    }
                    w.write(&pair.name);
                    w.write(" = ");
                    pair.value.write(w);
                }
                w.write(")");
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Modifier {
    Keyword(Keyword),
    Sealed,
    NonSealed,
    Annotation(Annotation),
}

impl Modifier {
    pub fn is_annotation(&self) -> bool {
        matches!(self, Modifier::Annotation(_))
    }
}

impl Node for Modifier {
    fn kind(&self) -> NodeKind {
        NodeKind::Modifier
    }

    fn min_version(&self) -> JavaVersion {
        match self {
            Modifier::Sealed | Modifier::NonSealed => JavaVersion::Java17,
            Modifier::Annotation(_) => JavaVersion::Java5,
            Modifier::Keyword(Keyword::Default) => JavaVersion::Java8,
            Modifier::Keyword(_) => JavaVersion::Java1,
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        match self {
            Modifier::Keyword(keyword) => w.write(keyword.as_str()),
            Modifier::Sealed => w.write("sealed"),
            Modifier::NonSealed => w.write("non-sealed"),
            Modifier::Annotation(annotation) => annotation.write(w),
        }
    }
}

pub fn has_modifier(modifiers: &[ModifierNode], keyword: Keyword) -> bool {
    modifiers
        .iter()
        .any(|m| matches!(m.node, Modifier::Keyword(k) if k == keyword))
}

// === VARIABLES AND PARAMETERS ===

/// Formal parameter, record component or explicit lambda parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub modifiers: Vec<ModifierNode>,
    pub param_type: TypeNode,
    pub varargs: bool,
    pub name: Identifier,
    /// Trailing `[]` after the name
    pub dimensions: usize,
    /// `A this` or `A Outer.this`; `name` holds the `this` form
    pub receiver: bool,
}

impl Parameter {
    pub fn is_var(&self) -> bool {
        matches!(self.param_type.node, Type::Var)
    }
}

impl Node for Parameter {
    fn kind(&self) -> NodeKind {
        NodeKind::Parameter
    }

    fn min_version(&self) -> JavaVersion {
        let version = self.param_type.min_version();
        if self.receiver {
            version.max(JavaVersion::Java8)
        } else if self.varargs {
            version.max(JavaVersion::Java5)
        } else {
            version
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        w.prefix_list(&self.modifiers);
        self.param_type.write(w);
        if self.varargs {
            w.write("...");
        }
        w.write(" ");
        w.write(&self.name);
        for _ in 0..self.dimensions {
            w.write("[]");
        }
    }
}

/// `name[] = initializer` within a field or local declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclarator {
    pub name: Identifier,
    pub dimensions: usize,
    pub initializer: Option<ExpressionNode>,
}

impl Node for VariableDeclarator {
    fn kind(&self) -> NodeKind {
        NodeKind::VariableDeclarator
    }

    fn write(&self, w: &mut SourceWriter) {
        w.write(&self.name);
        for _ in 0..self.dimensions {
            w.write("[]");
        }
        if let Some(initializer) = &self.initializer {
            w.write(" = ");
            initializer.write(w);
        }
    }
}

// === TYPE DECLARATIONS ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeDeclaration {
    Class {
        modifiers: Vec<ModifierNode>,
        name: Identifier,
        type_parameters: Vec<TypeParameterNode>,
        extends: Option<TypeNode>,
        implements: Vec<TypeNode>,
        permits: Vec<TypeNode>,
        body: Vec<MemberNode>,
    },
    Interface {
        modifiers: Vec<ModifierNode>,
        name: Identifier,
        type_parameters: Vec<TypeParameterNode>,
        extends: Vec<TypeNode>,
        permits: Vec<TypeNode>,
        body: Vec<MemberNode>,
    },
    AnnotationType {
        modifiers: Vec<ModifierNode>,
        name: Identifier,
        body: Vec<MemberNode>,
    },
    Enum {
        modifiers: Vec<ModifierNode>,
        name: Identifier,
        implements: Vec<TypeNode>,
        constants: Vec<EnumConstantNode>,
        body: Vec<MemberNode>,
    },
    Record {
        modifiers: Vec<ModifierNode>,
        name: Identifier,
        type_parameters: Vec<TypeParameterNode>,
        components: Vec<ParameterNode>,
        implements: Vec<TypeNode>,
        body: Vec<MemberNode>,
    },
}

impl TypeDeclaration {
    pub fn name(&self) -> &str {
        match self {
            TypeDeclaration::Class { name, .. }
            | TypeDeclaration::Interface { name, .. }
            | TypeDeclaration::AnnotationType { name, .. }
            | TypeDeclaration::Enum { name, .. }
            | TypeDeclaration::Record { name, .. } => name,
        }
    }

    pub fn modifiers(&self) -> &[ModifierNode] {
        match self {
            TypeDeclaration::Class { modifiers, .. }
            | TypeDeclaration::Interface { modifiers, .. }
            | TypeDeclaration::AnnotationType { modifiers, .. }
            | TypeDeclaration::Enum { modifiers, .. }
            | TypeDeclaration::Record { modifiers, .. } => modifiers,
        }
    }

    pub fn members(&self) -> &[MemberNode] {
        match self {
            TypeDeclaration::Class { body, .. }
            | TypeDeclaration::Interface { body, .. }
            | TypeDeclaration::AnnotationType { body, .. }
            | TypeDeclaration::Enum { body, .. }
            | TypeDeclaration::Record { body, .. } => body,
        }
    }

    fn write_enum_body(constants: &[EnumConstantNode], body: &[MemberNode], w: &mut SourceWriter) {
        if constants.is_empty() && body.is_empty() {
            w.write("{}");
            return;
        }
        w.open_brace();
        for (i, constant) in constants.iter().enumerate() {
            if i > 0 {
                w.write(",");
                w.newline();
            }
            constant.write(w);
        }
        if !body.is_empty() {
            w.write(";");
            w.newline();
            for member in body {
                member.write(w);
                w.newline();
            }
        } else {
            w.newline();
        }
        w.close_brace();
    }
}

impl Node for TypeDeclaration {
    fn kind(&self) -> NodeKind {
        match self {
            TypeDeclaration::Class { .. } => NodeKind::ClassDeclaration,
            TypeDeclaration::Interface { .. } => NodeKind::InterfaceDeclaration,
            TypeDeclaration::AnnotationType { .. } => NodeKind::AnnotationTypeDeclaration,
            TypeDeclaration::Enum { .. } => NodeKind::EnumDeclaration,
            TypeDeclaration::Record { .. } => NodeKind::RecordDeclaration,
        }
    }

    fn min_version(&self) -> JavaVersion {
        let modifiers = max_version(self.modifiers());
        let own = match self {
            TypeDeclaration::Class {
                type_parameters,
                permits,
                ..
            }
            | TypeDeclaration::Interface {
                type_parameters,
                permits,
                ..
            } => {
                if !permits.is_empty() {
                    JavaVersion::Java17
                } else if !type_parameters.is_empty() {
                    JavaVersion::Java5
                } else {
                    JavaVersion::Java1
                }
            }
            TypeDeclaration::AnnotationType { .. } | TypeDeclaration::Enum { .. } => {
                JavaVersion::Java5
            }
            TypeDeclaration::Record { .. } => JavaVersion::Java16,
        };
        own.max(modifiers)
    }

    fn write(&self, w: &mut SourceWriter) {
        w.prefix_list(self.modifiers());
        match self {
            TypeDeclaration::Class {
                name,
                type_parameters,
                extends,
                implements,
                permits,
                body,
                ..
            } => {
                w.write("class ");
                w.write(name);
                w.angle_list(type_parameters);
                if let Some(superclass) = extends {
                    w.write(" extends ");
                    superclass.write(w);
                }
                w.clause("implements", implements);
                w.clause("permits", permits);
                w.write(" ");
                w.braced_lines(body);
            }
            TypeDeclaration::Interface {
                name,
                type_parameters,
                extends,
                permits,
                body,
                ..
            } => {
                w.write("interface ");
                w.write(name);
                w.angle_list(type_parameters);
                w.clause("extends", extends);
                w.clause("permits", permits);
                w.write(" ");
                w.braced_lines(body);
            }
            TypeDeclaration::AnnotationType { name, body, .. } => {
                w.write("@interface ");
                w.write(name);
                w.write(" ");
                w.braced_lines(body);
            }
            TypeDeclaration::Enum {
                name,
                implements,
                constants,
                body,
                ..
            } => {
                w.write("enum ");
                w.write(name);
                w.clause("implements", implements);
                w.write(" ");
                Self::write_enum_body(constants, body, w);
            }
            TypeDeclaration::Record {
                name,
                type_parameters,
                components,
                implements,
                body,
                ..
            } => {
                w.write("record ");
                w.write(name);
                w.angle_list(type_parameters);
                w.paren_list(components);
                w.clause("implements", implements);
                w.write(" ");
                w.braced_lines(body);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumConstant {
    pub annotations: Vec<AnnotationNode>,
    pub name: Identifier,
    pub arguments: Option<Vec<ExpressionNode>>,
    pub body: Option<Vec<MemberNode>>,
}

impl Node for EnumConstant {
    fn kind(&self) -> NodeKind {
        NodeKind::EnumConstant
    }

    fn min_version(&self) -> JavaVersion {
        JavaVersion::Java5
    }

    fn write(&self, w: &mut SourceWriter) {
        w.prefix_list(&self.annotations);
        w.write(&self.name);
        if let Some(arguments) = &self.arguments {
            w.paren_list(arguments);
        }
        if let Some(body) = &self.body {
            w.write(" ");
            w.braced_lines(body);
        }
    }
}

// === MEMBERS ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Member {
    Field {
        modifiers: Vec<ModifierNode>,
        field_type: TypeNode,
        declarators: Vec<VariableDeclaratorNode>,
    },
    /// Also annotation type elements, which carry `default_value`
    Method {
        modifiers: Vec<ModifierNode>,
        type_parameters: Vec<TypeParameterNode>,
        return_type: TypeNode,
        name: Identifier,
        parameters: Vec<ParameterNode>,
        dimensions: usize,
        throws: Vec<TypeNode>,
        default_value: Option<ElementValue>,
        body: Option<BlockNode>,
    },
    Constructor {
        modifiers: Vec<ModifierNode>,
        type_parameters: Vec<TypeParameterNode>,
        name: Identifier,
        parameters: Vec<ParameterNode>,
        throws: Vec<TypeNode>,
        body: BlockNode,
    },
    /// Record constructor without a parameter list
    CompactConstructor {
        modifiers: Vec<ModifierNode>,
        name: Identifier,
        body: BlockNode,
    },
    Initializer {
        is_static: bool,
        body: BlockNode,
    },
    Type(Box<TypeDeclarationNode>),
    Empty,
}

impl Member {
    pub fn name(&self) -> Option<&str> {
        match self {
            Member::Method { name, .. }
            | Member::Constructor { name, .. }
            | Member::CompactConstructor { name, .. } => Some(name),
            Member::Type(declaration) => Some(declaration.name()),
            _ => None,
        }
    }
}

impl Node for Member {
    fn kind(&self) -> NodeKind {
        match self {
            Member::Field { .. } => NodeKind::FieldDeclaration,
            Member::Method { .. } => NodeKind::MethodDeclaration,
            Member::Constructor { .. } => NodeKind::ConstructorDeclaration,
            Member::CompactConstructor { .. } => NodeKind::CompactConstructorDeclaration,
            Member::Initializer { .. } => NodeKind::InitializerDeclaration,
            Member::Type(_) => NodeKind::MemberTypeDeclaration,
            Member::Empty => NodeKind::EmptyDeclaration,
        }
    }

    fn min_version(&self) -> JavaVersion {
        match self {
            Member::Field { modifiers, .. } => max_version(modifiers),
            Member::Method {
                modifiers,
                type_parameters,
                parameters,
                ..
            } => {
                let generic = if type_parameters.is_empty() {
                    JavaVersion::Java1
                } else {
                    JavaVersion::Java5
                };
                generic
                    .max(max_version(modifiers))
                    .max(max_version(parameters))
            }
            Member::Constructor {
                modifiers,
                parameters,
                ..
            } => max_version(modifiers).max(max_version(parameters)),
            Member::CompactConstructor { .. } => JavaVersion::Java16,
            Member::Type(declaration) => declaration.min_version(),
            Member::Initializer { .. } | Member::Empty => JavaVersion::Java1,
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        match self {
            Member::Field {
                modifiers,
                field_type,
                declarators,
            } => {
                w.prefix_list(modifiers);
                field_type.write(w);
                w.write(" ");
                w.join(declarators, ", ");
                w.write(";");
            }
            Member::Method {
                modifiers,
                type_parameters,
                return_type,
                name,
                parameters,
                dimensions,
                throws,
                default_value,
                body,
            } => {
                w.prefix_list(modifiers);
                if !type_parameters.is_empty() {
                    w.angle_list(type_parameters);
                    w.write(" ");
                }
                return_type.write(w);
                w.write(" ");
                w.write(name);
                w.paren_list(parameters);
                for _ in 0..*dimensions {
                    w.write("[]");
                }
                w.clause("throws", throws);
                if let Some(value) = default_value {
                    w.write(" default ");
                    value.write(w);
                }
                match body {
                    Some(block) => {
                        w.write(" ");
                        block.write(w);
                    }
                    None => w.write(";"),
                }
            }
            Member::Constructor {
                modifiers,
                type_parameters,
                name,
                parameters,
                throws,
                body,
            } => {
                w.prefix_list(modifiers);
                if !type_parameters.is_empty() {
                    w.angle_list(type_parameters);
                    w.write(" ");
                }
                w.write(name);
                w.paren_list(parameters);
                w.clause("throws", throws);
                w.write(" ");
                body.write(w);
            }
            Member::CompactConstructor {
                modifiers,
                name,
                body,
            } => {
                w.prefix_list(modifiers);
                w.write(name);
                w.write(" ");
                body.write(w);
            }
            Member::Initializer { is_static, body } => {
                if *is_static {
                    w.write("static ");
                }
                body.write(w);
            }
            Member::Type(declaration) => declaration.write(w),
            Member::Empty => w.write(";"),
        }
    }
}

// === MODULES ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RequiresModifier {
    Transitive,
    Static,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Directive {
    Requires {
        modifiers: Vec<RequiresModifier>,
        module: Vec<Identifier>,
    },
    Exports {
        package: Vec<Identifier>,
        modules: Vec<Vec<Identifier>>,
    },
    Opens {
        package: Vec<Identifier>,
        modules: Vec<Vec<Identifier>>,
    },
    Uses {
        service: TypeNode,
    },
    Provides {
        service: TypeNode,
        implementations: Vec<TypeNode>,
    },
}

fn write_targets(w: &mut SourceWriter, modules: &[Vec<Identifier>]) {
    if !modules.is_empty() {
        let names: Vec<String> = modules.iter().map(|m| dotted(m)).collect();
        w.write(" to ");
        w.write(&names.join(", "));
    }
}

impl Node for Directive {
    fn kind(&self) -> NodeKind {
        match self {
            Directive::Requires { .. } => NodeKind::Requires,
            Directive::Exports { .. } => NodeKind::Exports,
            Directive::Opens { .. } => NodeKind::Opens,
            Directive::Uses { .. } => NodeKind::Uses,
            Directive::Provides { .. } => NodeKind::Provides,
        }
    }

    fn min_version(&self) -> JavaVersion {
        JavaVersion::Java9
    }

    fn write(&self, w: &mut SourceWriter) {
        match self {
            Directive::Requires { modifiers, module } => {
                w.write("requires ");
                for modifier in modifiers {
                    w.write(match modifier {
                        RequiresModifier::Transitive => "transitive ",
                        RequiresModifier::Static => "static ",
                    });
                }
                w.write(&dotted(module));
            }
            Directive::Exports { package, modules } => {
                w.write("exports ");
                w.write(&dotted(package));
                write_targets(w, modules);
            }
            Directive::Opens { package, modules } => {
                w.write("opens ");
                w.write(&dotted(package));
                write_targets(w, modules);
            }
            Directive::Uses { service } => {
                w.write("uses ");
                service.write(w);
            }
            Directive::Provides {
                service,
                implementations,
            } => {
                w.write("provides ");
                service.write(w);
                w.clause("with", implementations);
            }
        }
        w.write(";");
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleDeclaration {
    pub annotations: Vec<AnnotationNode>,
    pub open: bool,
    pub name: Vec<Identifier>,
    pub directives: Vec<DirectiveNode>,
}

impl Node for ModuleDeclaration {
    fn kind(&self) -> NodeKind {
        NodeKind::ModuleDeclaration
    }

    fn min_version(&self) -> JavaVersion {
        JavaVersion::Java9
    }

    fn write(&self, w: &mut SourceWriter) {
        w.prefix_list(&self.annotations);
        if self.open {
            w.write("open ");
        }
        w.write("module ");
        w.write(&dotted(&self.name));
        w.write(" ");
        w.braced_lines(&self.directives);
    }
}

// === COMPILATION UNIT ===

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageDeclaration {
    pub annotations: Vec<AnnotationNode>,
    pub name: Vec<Identifier>,
}

impl Node for PackageDeclaration {
    fn kind(&self) -> NodeKind {
        NodeKind::PackageDeclaration
    }

    fn write(&self, w: &mut SourceWriter) {
        w.prefix_list(&self.annotations);
        w.write("package ");
        w.write(&dotted(&self.name));
        w.write(";");
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDeclaration {
    pub is_static: bool,
    pub name: Vec<Identifier>,
    /// Trailing `.*`
    pub on_demand: bool,
}

impl Node for ImportDeclaration {
    fn kind(&self) -> NodeKind {
        NodeKind::ImportDeclaration
    }

    fn min_version(&self) -> JavaVersion {
        if self.is_static {
            JavaVersion::Java5
        } else {
            JavaVersion::Java1
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        w.write("import ");
        if self.is_static {
            w.write("static ");
        }
        w.write(&dotted(&self.name));
        if self.on_demand {
            w.write(".*");
        }
        w.write(";");
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilationUnit {
    pub package: Option<PackageDeclarationNode>,
    pub imports: Vec<ImportDeclarationNode>,
    pub types: Vec<TypeDeclarationNode>,
    pub module: Option<ModuleDeclarationNode>,
}

/// Blank line between top-level sections
fn section_break(w: &mut SourceWriter, started: &mut bool) {
    if *started {
        w.newline();
        w.newline();
    }
    *started = true;
}

impl Node for CompilationUnit {
    fn kind(&self) -> NodeKind {
        NodeKind::CompilationUnit
    }

    fn min_version(&self) -> JavaVersion {
        let module = self
            .module
            .as_ref()
            .map(Node::min_version)
            .unwrap_or(JavaVersion::Java1);
        max_version(&self.imports)
            .max(max_version(&self.types))
            .max(module)
    }

    fn write(&self, w: &mut SourceWriter) {
        let mut started = false;
        if let Some(package) = &self.package {
            section_break(w, &mut started);
            package.write(w);
        }
        if !self.imports.is_empty() {
            section_break(w, &mut started);
            for (i, import) in self.imports.iter().enumerate() {
                if i > 0 {
                    w.newline();
                }
                import.write(w);
            }
        }
        for declaration in &self.types {
            section_break(w, &mut started);
            declaration.write(w);
        }
        if let Some(module) = &self.module {
            section_break(w, &mut started);
            module.write(w);
        }
    }
}
