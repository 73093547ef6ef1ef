//! Declaration builders: modifiers and annotations, type declarations and
//! their members, and the compilation unit with its package, imports and
//! module declaration

use super::atomic::{
    at_non_sealed, guarded, node, parse_empty_dimensions, parse_qualified_name, Parser,
};
use super::expressions::{parse_arguments, parse_expression, parse_variable_initializer};
use super::statements::parse_block;
use super::types::{
    parse_class_type, parse_class_type_list, parse_result_type, parse_type,
    parse_type_parameters,
};
use crate::grammar::ast::{
    Annotation, AnnotationArguments, AnnotationNode, CompilationUnit, CompilationUnitNode,
    Directive, DirectiveNode, ElementValue, ElementValuePair, EnumConstant, EnumConstantNode,
    Identifier, ImportDeclaration, ImportDeclarationNode, Member, MemberNode, Modifier,
    ModifierNode, ModuleDeclaration, ModuleDeclarationNode, PackageDeclaration,
    PackageDeclarationNode, Parameter, ParameterNode, RequiresModifier, TypeDeclaration,
    TypeDeclarationNode, TypeNode, VariableDeclarator, VariableDeclaratorNode,
};
use crate::grammar::keywords::Keyword;
use crate::syntax::{SyntaxError, SyntaxResult};
use crate::tokens::TokenKind;

// === ANNOTATIONS AND MODIFIERS ===

fn at_annotation(parser: &mut dyn Parser) -> SyntaxResult<bool> {
    Ok(parser.check(TokenKind::At)?
        && parser.peek_kind(1)? != TokenKind::Keyword(Keyword::Interface))
}

/// Annotations up to the first non-annotation, `@interface` excluded
pub fn parse_annotations(parser: &mut dyn Parser) -> SyntaxResult<Vec<AnnotationNode>> {
    let mut annotations = Vec::new();
    while at_annotation(parser)? {
        annotations.push(parse_annotation(parser)?);
    }
    Ok(annotations)
}

/// `@Name`, `@Name(value)` or `@Name(key = value, ...)`
pub fn parse_annotation(parser: &mut dyn Parser) -> SyntaxResult<AnnotationNode> {
    guarded(parser, "annotation", |parser| {
        let start = parser.save_position();
        parser.expect(TokenKind::At)?;
        let name = parse_qualified_name(parser)?;

        let arguments = if parser.eat(TokenKind::LParen)? {
            let arguments = if parser.check(TokenKind::RParen)? {
                AnnotationArguments::Named(Vec::new())
            } else if parser.check(TokenKind::Identifier)?
                && parser.peek_kind(1)? == TokenKind::Assign
            {
                let mut pairs = Vec::new();
                loop {
                    let name = parser.expect_identifier()?;
                    parser.expect(TokenKind::Assign)?;
                    let value = parse_element_value(parser)?;
                    pairs.push(ElementValuePair { name, value });
                    if !parser.eat(TokenKind::Comma)? {
                        break;
                    }
                }
                AnnotationArguments::Named(pairs)
            } else {
                AnnotationArguments::Single(parse_element_value(parser)?)
            };
            parser.expect(TokenKind::RParen)?;
            arguments
        } else {
            AnnotationArguments::Marker
        };

        Ok(node(parser, start, Annotation { name, arguments }))
    })
}

fn parse_element_value(parser: &mut dyn Parser) -> SyntaxResult<ElementValue> {
    match parser.current_kind()? {
        TokenKind::At => Ok(ElementValue::Annotation(Box::new(parse_annotation(parser)?))),
        TokenKind::LBrace => guarded(parser, "element value", |parser| {
            parser.advance()?;
            let mut values = Vec::new();
            while !parser.check(TokenKind::RBrace)? {
                values.push(parse_element_value(parser)?);
                if !parser.eat(TokenKind::Comma)? {
                    break;
                }
            }
            parser.expect(TokenKind::RBrace)?;
            Ok(ElementValue::Array(values))
        }),
        _ => Ok(ElementValue::Expression(parse_expression(parser)?)),
    }
}

/// Keyword modifiers, `sealed`, `non-sealed` and annotations, in any order
pub fn parse_modifiers(parser: &mut dyn Parser) -> SyntaxResult<Vec<ModifierNode>> {
    let mut modifiers = Vec::new();
    loop {
        let start = parser.save_position();
        let modifier = match parser.current_kind()? {
            TokenKind::At if at_annotation(parser)? => {
                Modifier::Annotation(parse_annotation(parser)?.into_inner())
            }
            // `default:` and `default ->` are switch labels
            TokenKind::Keyword(Keyword::Default)
                if matches!(parser.peek_kind(1)?, TokenKind::Colon | TokenKind::Arrow) =>
            {
                break;
            }
            TokenKind::Keyword(Keyword::Synchronized)
                if parser.peek_kind(1)? == TokenKind::LParen =>
            {
                break;
            }
            TokenKind::Keyword(keyword) if keyword.is_modifier() => {
                parser.advance()?;
                Modifier::Keyword(keyword)
            }
            TokenKind::Identifier
                if parser.check_word("sealed")?
                    && matches!(
                        parser.peek_kind(1)?,
                        TokenKind::Identifier | TokenKind::Keyword(_) | TokenKind::At
                    ) =>
            {
                parser.advance()?;
                Modifier::Sealed
            }
            TokenKind::Identifier if at_non_sealed(parser)? => {
                parser.advance()?;
                parser.advance()?;
                parser.advance()?;
                Modifier::NonSealed
            }
            _ => break,
        };
        modifiers.push(node(parser, start, modifier));
    }
    Ok(modifiers)
}

// === VARIABLES AND PARAMETERS ===

/// `(Type a, final Type... rest)`
pub fn parse_formal_parameters(parser: &mut dyn Parser) -> SyntaxResult<Vec<ParameterNode>> {
    parser.expect(TokenKind::LParen)?;
    let mut parameters = Vec::new();
    if !parser.check(TokenKind::RParen)? {
        loop {
            let receiver_allowed = parameters.is_empty();
            parameters.push(parse_parameter(parser, receiver_allowed)?);
            if !parser.eat(TokenKind::Comma)? {
                break;
            }
        }
    }
    parser.expect(TokenKind::RParen)?;
    Ok(parameters)
}

fn parse_parameter(
    parser: &mut dyn Parser,
    receiver_allowed: bool,
) -> SyntaxResult<ParameterNode> {
    let start = parser.save_position();
    let modifiers = parse_modifiers(parser)?;
    let param_type = parse_type(parser)?;
    let varargs = parser.eat(TokenKind::Ellipsis)?;

    if !varargs && at_receiver(parser)? {
        if !receiver_allowed {
            let token = parser.peek(0)?;
            return Err(SyntaxError::grammar_violation(
                "receiver parameter must come first",
                token,
            ));
        }
        let mut name = String::new();
        if parser.check(TokenKind::Identifier)? {
            name.push_str(&parser.expect_identifier()?);
            parser.expect(TokenKind::Dot)?;
            name.push('.');
        }
        parser.expect_keyword(Keyword::This)?;
        name.push_str("this");
        return Ok(node(
            parser,
            start,
            Parameter {
                modifiers,
                param_type,
                varargs,
                name,
                dimensions: 0,
                receiver: true,
            },
        ));
    }

    let name = parser.expect_identifier()?;
    let dimensions = parse_empty_dimensions(parser)?;
    Ok(node(
        parser,
        start,
        Parameter {
            modifiers,
            param_type,
            varargs,
            name,
            dimensions,
            receiver: false,
        },
    ))
}

/// `this` or `Outer.this` in parameter name position
fn at_receiver(parser: &mut dyn Parser) -> SyntaxResult<bool> {
    if parser.check_keyword(Keyword::This)? {
        return Ok(true);
    }
    Ok(parser.check(TokenKind::Identifier)?
        && parser.peek_kind(1)? == TokenKind::Dot
        && parser.peek_kind(2)? == TokenKind::Keyword(Keyword::This))
}

/// `a = 1, b[], c = {2}`
pub fn parse_variable_declarators(
    parser: &mut dyn Parser,
) -> SyntaxResult<Vec<VariableDeclaratorNode>> {
    let mut declarators = Vec::new();
    loop {
        let start = parser.save_position();
        let name = parser.expect_identifier()?;
        let dimensions = parse_empty_dimensions(parser)?;
        let initializer = if parser.eat(TokenKind::Assign)? {
            Some(parse_variable_initializer(parser)?)
        } else {
            None
        };
        declarators.push(node(
            parser,
            start,
            VariableDeclarator {
                name,
                dimensions,
                initializer,
            },
        ));
        if !parser.eat(TokenKind::Comma)? {
            return Ok(declarators);
        }
    }
}

// === TYPE DECLARATIONS ===

/// Current token starts a class, interface, `@interface`, enum or record
pub fn at_type_declaration(parser: &mut dyn Parser) -> SyntaxResult<bool> {
    Ok(match parser.current_kind()? {
        TokenKind::Keyword(Keyword::Class | Keyword::Interface | Keyword::Enum) => true,
        TokenKind::At => parser.peek_kind(1)? == TokenKind::Keyword(Keyword::Interface),
        TokenKind::Identifier => {
            parser.check_word("record")?
                && parser.peek_kind(1)? == TokenKind::Identifier
                && matches!(parser.peek_kind(2)?, TokenKind::LParen | TokenKind::Lt)
        }
        _ => false,
    })
}

/// Type declaration after its modifiers. `start` is where the modifiers began.
pub fn parse_type_declaration(
    parser: &mut dyn Parser,
    start: usize,
    modifiers: Vec<ModifierNode>,
) -> SyntaxResult<TypeDeclarationNode> {
    guarded(parser, "type declaration", |parser| {
        let declaration = match parser.current_kind()? {
            TokenKind::Keyword(Keyword::Class) => parse_class(parser, modifiers)?,
            TokenKind::Keyword(Keyword::Interface) => parse_interface(parser, modifiers)?,
            TokenKind::Keyword(Keyword::Enum) => parse_enum(parser, modifiers)?,
            TokenKind::At => parse_annotation_type(parser, modifiers)?,
            TokenKind::Identifier if parser.check_word("record")? => {
                parse_record(parser, modifiers)?
            }
            _ => return Err(parser.unexpected("type declaration")),
        };
        Ok(node(parser, start, declaration))
    })
}

fn parse_class(
    parser: &mut dyn Parser,
    modifiers: Vec<ModifierNode>,
) -> SyntaxResult<TypeDeclaration> {
    parser.expect_keyword(Keyword::Class)?;
    let name = parser.expect_type_identifier()?;
    let type_parameters = parse_type_parameters(parser)?;
    let extends = if parser.eat(TokenKind::Keyword(Keyword::Extends))? {
        Some(parse_class_type(parser)?)
    } else {
        None
    };
    let implements = parse_implements(parser)?;
    let permits = parse_permits(parser)?;
    let body = parse_class_body(parser, Some(&name))?;
    Ok(TypeDeclaration::Class {
        modifiers,
        name,
        type_parameters,
        extends,
        implements,
        permits,
        body,
    })
}

fn parse_interface(
    parser: &mut dyn Parser,
    modifiers: Vec<ModifierNode>,
) -> SyntaxResult<TypeDeclaration> {
    parser.expect_keyword(Keyword::Interface)?;
    let name = parser.expect_type_identifier()?;
    let type_parameters = parse_type_parameters(parser)?;
    let extends = if parser.eat(TokenKind::Keyword(Keyword::Extends))? {
        parse_class_type_list(parser)?
    } else {
        Vec::new()
    };
    let permits = parse_permits(parser)?;
    let body = parse_class_body(parser, None)?;
    Ok(TypeDeclaration::Interface {
        modifiers,
        name,
        type_parameters,
        extends,
        permits,
        body,
    })
}

fn parse_annotation_type(
    parser: &mut dyn Parser,
    modifiers: Vec<ModifierNode>,
) -> SyntaxResult<TypeDeclaration> {
    parser.expect(TokenKind::At)?;
    parser.expect_keyword(Keyword::Interface)?;
    let name = parser.expect_type_identifier()?;
    let body = parse_class_body(parser, None)?;
    Ok(TypeDeclaration::AnnotationType {
        modifiers,
        name,
        body,
    })
}

fn parse_enum(
    parser: &mut dyn Parser,
    modifiers: Vec<ModifierNode>,
) -> SyntaxResult<TypeDeclaration> {
    parser.expect_keyword(Keyword::Enum)?;
    let name = parser.expect_type_identifier()?;
    let implements = parse_implements(parser)?;

    parser.expect(TokenKind::LBrace)?;
    let mut constants = Vec::new();
    while !matches!(
        parser.current_kind()?,
        TokenKind::Semicolon | TokenKind::RBrace
    ) {
        constants.push(parse_enum_constant(parser)?);
        if !parser.eat(TokenKind::Comma)? {
            break;
        }
    }
    let body = if parser.eat(TokenKind::Semicolon)? {
        parse_members(parser, Some(&name))?
    } else {
        Vec::new()
    };
    parser.expect(TokenKind::RBrace)?;

    Ok(TypeDeclaration::Enum {
        modifiers,
        name,
        implements,
        constants,
        body,
    })
}

fn parse_enum_constant(parser: &mut dyn Parser) -> SyntaxResult<EnumConstantNode> {
    let start = parser.save_position();
    let annotations = parse_annotations(parser)?;
    let name = parser.expect_identifier()?;
    let arguments = if parser.check(TokenKind::LParen)? {
        Some(parse_arguments(parser)?)
    } else {
        None
    };
    let body = if parser.check(TokenKind::LBrace)? {
        Some(parse_class_body(parser, None)?)
    } else {
        None
    };
    Ok(node(
        parser,
        start,
        EnumConstant {
            annotations,
            name,
            arguments,
            body,
        },
    ))
}

fn parse_record(
    parser: &mut dyn Parser,
    modifiers: Vec<ModifierNode>,
) -> SyntaxResult<TypeDeclaration> {
    parser.expect_word("record")?;
    let name = parser.expect_type_identifier()?;
    let type_parameters = parse_type_parameters(parser)?;
    let components = parse_formal_parameters(parser)?;
    let implements = parse_implements(parser)?;
    let body = parse_class_body(parser, Some(&name))?;
    Ok(TypeDeclaration::Record {
        modifiers,
        name,
        type_parameters,
        components,
        implements,
        body,
    })
}

fn parse_implements(parser: &mut dyn Parser) -> SyntaxResult<Vec<TypeNode>> {
    if parser.eat(TokenKind::Keyword(Keyword::Implements))? {
        parse_class_type_list(parser)
    } else {
        Ok(Vec::new())
    }
}

fn parse_permits(parser: &mut dyn Parser) -> SyntaxResult<Vec<TypeNode>> {
    if parser.check_word("permits")? {
        parser.advance()?;
        parse_class_type_list(parser)
    } else {
        Ok(Vec::new())
    }
}

fn parse_throws(parser: &mut dyn Parser) -> SyntaxResult<Vec<TypeNode>> {
    if parser.eat(TokenKind::Keyword(Keyword::Throws))? {
        parse_class_type_list(parser)
    } else {
        Ok(Vec::new())
    }
}

// === MEMBERS ===

/// `{ member* }`. `class_name` lets constructors be recognized; anonymous
/// bodies pass `None`.
pub fn parse_class_body(
    parser: &mut dyn Parser,
    class_name: Option<&str>,
) -> SyntaxResult<Vec<MemberNode>> {
    guarded(parser, "class body", |parser| {
        parser.expect(TokenKind::LBrace)?;
        let members = parse_members(parser, class_name)?;
        parser.expect(TokenKind::RBrace)?;
        Ok(members)
    })
}

fn parse_members(
    parser: &mut dyn Parser,
    class_name: Option<&str>,
) -> SyntaxResult<Vec<MemberNode>> {
    let mut members = Vec::new();
    while !parser.check(TokenKind::RBrace)? {
        members.push(parse_member(parser, class_name)?);
    }
    Ok(members)
}

fn parse_member(parser: &mut dyn Parser, class_name: Option<&str>) -> SyntaxResult<MemberNode> {
    let start = parser.save_position();
    if parser.eat(TokenKind::Semicolon)? {
        return Ok(node(parser, start, Member::Empty));
    }

    let is_static = parser.check_keyword(Keyword::Static)?
        && parser.peek_kind(1)? == TokenKind::LBrace;
    if is_static || parser.check(TokenKind::LBrace)? {
        if is_static {
            parser.advance()?;
        }
        let body = parse_block(parser)?;
        return Ok(node(parser, start, Member::Initializer { is_static, body }));
    }

    let modifiers = parse_modifiers(parser)?;
    if at_type_declaration(parser)? {
        let declaration = parse_type_declaration(parser, start, modifiers)?;
        return Ok(node(parser, start, Member::Type(Box::new(declaration))));
    }

    let type_parameters = parse_type_parameters(parser)?;

    let names_class = match class_name {
        Some(class_name) => {
            parser.check(TokenKind::Identifier)? && parser.peek(0)?.source == class_name
        }
        None => false,
    };
    if names_class {
        match parser.peek_kind(1)? {
            TokenKind::LParen => {
                let name = parser.expect_identifier()?;
                let parameters = parse_formal_parameters(parser)?;
                let throws = parse_throws(parser)?;
                let body = parse_block(parser)?;
                return Ok(node(
                    parser,
                    start,
                    Member::Constructor {
                        modifiers,
                        type_parameters,
                        name,
                        parameters,
                        throws,
                        body,
                    },
                ));
            }
            TokenKind::LBrace if type_parameters.is_empty() => {
                let name = parser.expect_identifier()?;
                let body = parse_block(parser)?;
                return Ok(node(
                    parser,
                    start,
                    Member::CompactConstructor {
                        modifiers,
                        name,
                        body,
                    },
                ));
            }
            _ => {}
        }
    }

    let member_type = parse_result_type(parser)?;
    if parser.check(TokenKind::Identifier)? && parser.peek_kind(1)? == TokenKind::LParen {
        let name = parser.expect_identifier()?;
        let parameters = parse_formal_parameters(parser)?;
        let dimensions = parse_empty_dimensions(parser)?;
        let throws = parse_throws(parser)?;
        let default_value = if parser.eat(TokenKind::Keyword(Keyword::Default))? {
            Some(parse_element_value(parser)?)
        } else {
            None
        };
        let body = if parser.eat(TokenKind::Semicolon)? {
            None
        } else {
            Some(parse_block(parser)?)
        };
        return Ok(node(
            parser,
            start,
            Member::Method {
                modifiers,
                type_parameters,
                return_type: member_type,
                name,
                parameters,
                dimensions,
                throws,
                default_value,
                body,
            },
        ));
    }

    let declarators = parse_variable_declarators(parser)?;
    parser.expect(TokenKind::Semicolon)?;
    Ok(node(
        parser,
        start,
        Member::Field {
            modifiers,
            field_type: member_type,
            declarators,
        },
    ))
}

// === COMPILATION UNIT ===

/// package? import* (module | type_declaration*) EOF
pub fn parse_compilation_unit(parser: &mut dyn Parser) -> SyntaxResult<CompilationUnitNode> {
    let start = parser.save_position();

    let leading = parser.save_position();
    let annotations = parse_annotations(parser)?;
    let package = if parser.check_keyword(Keyword::Package)? {
        Some(parse_package(parser, leading, annotations)?)
    } else {
        parser.restore_position(leading);
        None
    };

    let mut imports = Vec::new();
    loop {
        if parser.eat(TokenKind::Semicolon)? {
            continue;
        }
        if !parser.check_keyword(Keyword::Import)? {
            break;
        }
        imports.push(parse_import(parser)?);
    }

    let mut types = Vec::new();
    let mut module = None;
    if at_module_declaration(parser)? {
        module = Some(parse_module(parser)?);
    } else {
        while !parser.check(TokenKind::Eof)? {
            if parser.eat(TokenKind::Semicolon)? {
                continue;
            }
            let type_start = parser.save_position();
            let modifiers = parse_modifiers(parser)?;
            if !at_type_declaration(parser)? {
                return Err(parser.unexpected("type declaration"));
            }
            types.push(parse_type_declaration(parser, type_start, modifiers)?);
        }
    }

    Ok(node(
        parser,
        start,
        CompilationUnit {
            package,
            imports,
            types,
            module,
        },
    ))
}

fn parse_package(
    parser: &mut dyn Parser,
    start: usize,
    annotations: Vec<AnnotationNode>,
) -> SyntaxResult<PackageDeclarationNode> {
    parser.expect_keyword(Keyword::Package)?;
    let name = parse_qualified_name(parser)?;
    parser.expect(TokenKind::Semicolon)?;
    Ok(node(parser, start, PackageDeclaration { annotations, name }))
}

/// `import [static] a.b.C;` or `import a.b.*;`
fn parse_import(parser: &mut dyn Parser) -> SyntaxResult<ImportDeclarationNode> {
    let start = parser.save_position();
    parser.expect_keyword(Keyword::Import)?;
    let is_static = parser.eat(TokenKind::Keyword(Keyword::Static))?;
    let mut name = vec![parser.expect_identifier()?];
    let mut on_demand = false;
    while parser.eat(TokenKind::Dot)? {
        if parser.eat(TokenKind::Star)? {
            on_demand = true;
            break;
        }
        name.push(parser.expect_identifier()?);
    }
    parser.expect(TokenKind::Semicolon)?;
    Ok(node(
        parser,
        start,
        ImportDeclaration {
            is_static,
            name,
            on_demand,
        },
    ))
}

fn at_module_declaration(parser: &mut dyn Parser) -> SyntaxResult<bool> {
    let position = parser.save_position();
    parse_annotations(parser)?;
    let found = if parser.check_word("open")? {
        parser.peek_is_word(1, "module")?
    } else {
        parser.check_word("module")? && parser.peek_kind(1)? == TokenKind::Identifier
    };
    parser.restore_position(position);
    Ok(found)
}

fn parse_module(parser: &mut dyn Parser) -> SyntaxResult<ModuleDeclarationNode> {
    guarded(parser, "module", |parser| {
        let start = parser.save_position();
        let annotations = parse_annotations(parser)?;
        let open = if parser.check_word("open")? {
            parser.advance()?;
            true
        } else {
            false
        };
        parser.expect_word("module")?;
        let name = parse_qualified_name(parser)?;
        parser.expect(TokenKind::LBrace)?;
        let mut directives = Vec::new();
        while !parser.check(TokenKind::RBrace)? {
            directives.push(parse_directive(parser)?);
        }
        parser.expect(TokenKind::RBrace)?;
        Ok(node(
            parser,
            start,
            ModuleDeclaration {
                annotations,
                open,
                name,
                directives,
            },
        ))
    })
}

fn parse_directive(parser: &mut dyn Parser) -> SyntaxResult<DirectiveNode> {
    let start = parser.save_position();
    let directive = if parser.check_word("requires")? {
        parser.advance()?;
        let mut modifiers = Vec::new();
        loop {
            if parser.check_word("transitive")?
                && parser.peek_kind(1)? == TokenKind::Identifier
            {
                parser.advance()?;
                modifiers.push(RequiresModifier::Transitive);
            } else if parser.eat(TokenKind::Keyword(Keyword::Static))? {
                modifiers.push(RequiresModifier::Static);
            } else {
                break;
            }
        }
        let module = parse_qualified_name(parser)?;
        Directive::Requires { modifiers, module }
    } else if parser.check_word("exports")? {
        parser.advance()?;
        let (package, modules) = parse_package_target(parser)?;
        Directive::Exports { package, modules }
    } else if parser.check_word("opens")? {
        parser.advance()?;
        let (package, modules) = parse_package_target(parser)?;
        Directive::Opens { package, modules }
    } else if parser.check_word("uses")? {
        parser.advance()?;
        Directive::Uses {
            service: parse_type(parser)?,
        }
    } else if parser.check_word("provides")? {
        parser.advance()?;
        let service = parse_type(parser)?;
        parser.expect_word("with")?;
        let mut implementations = vec![parse_type(parser)?];
        while parser.eat(TokenKind::Comma)? {
            implementations.push(parse_type(parser)?);
        }
        Directive::Provides {
            service,
            implementations,
        }
    } else {
        return Err(parser.unexpected("module directive"));
    };
    parser.expect(TokenKind::Semicolon)?;
    Ok(node(parser, start, directive))
}

/// `pkg [to m1, m2]`
fn parse_package_target(
    parser: &mut dyn Parser,
) -> SyntaxResult<(Vec<Identifier>, Vec<Vec<Identifier>>)> {
    let package = parse_qualified_name(parser)?;
    let mut modules = Vec::new();
    if parser.check_word("to")? {
        parser.advance()?;
        modules.push(parse_qualified_name(parser)?);
        while parser.eat(TokenKind::Comma)? {
            modules.push(parse_qualified_name(parser)?);
        }
    }
    Ok((package, modules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::{has_modifier, JavaVersion, Node, NodeKind};
    use crate::syntax::{JavaParser, SyntaxError};
    use assert_matches::assert_matches;

    fn unit(text: &str) -> CompilationUnitNode {
        let mut parser = JavaParser::new(text);
        parse_compilation_unit(&mut parser).unwrap()
    }

    fn single_type(text: &str) -> TypeDeclarationNode {
        let mut parsed = unit(text).into_inner();
        assert_eq!(parsed.types.len(), 1);
        parsed.types.remove(0)
    }

    #[test]
    fn test_package_and_imports() {
        let parsed = unit("@Generated package com.example;\nimport java.util.*;\nimport static java.lang.Math.max;\nclass A {}");
        let package = parsed.package.as_ref().unwrap();
        assert_eq!(package.name, vec!["com", "example"]);
        assert_eq!(package.annotations.len(), 1);
        assert_eq!(parsed.imports.len(), 2);
        assert!(parsed.imports[0].on_demand);
        assert!(parsed.imports[1].is_static);
        assert_eq!(parsed.types.len(), 1);
    }

    #[test]
    fn test_class_members() {
        let declaration = single_type(
            "public final class Box<T extends Number> extends Base implements Comparable<Box<T>> {
                private static final int LIMIT = 10, OTHER[] = {1};
                static { init(); }
                { count++; }
                public Box(T value) throws IOException { super(); }
                <R> R map(Function<T, R> f) { return f.apply(value); }
                abstract int[] table()[];
                class Inner {}
                ;
            }",
        );
        assert_eq!(declaration.name(), "Box");
        assert!(has_modifier(declaration.modifiers(), Keyword::Final));
        let kinds: Vec<NodeKind> = declaration.members().iter().map(|m| m.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::FieldDeclaration,
                NodeKind::InitializerDeclaration,
                NodeKind::InitializerDeclaration,
                NodeKind::ConstructorDeclaration,
                NodeKind::MethodDeclaration,
                NodeKind::MethodDeclaration,
                NodeKind::MemberTypeDeclaration,
                NodeKind::EmptyDeclaration,
            ]
        );
    }

    #[test]
    fn test_receiver_parameters() {
        let mut parser = JavaParser::new("(A this, int x)");
        let parameters = parse_formal_parameters(&mut parser).unwrap();
        assert!(parameters[0].receiver);
        assert_eq!(parameters[0].name, "this");
        assert_eq!(parameters[0].generate(), "A this");
        assert!(!parameters[1].receiver);

        let mut parser = JavaParser::new("(@ReadOnly Outer Outer.this)");
        let parameters = parse_formal_parameters(&mut parser).unwrap();
        assert_eq!(parameters[0].name, "Outer.this");
        assert_eq!(parameters[0].min_version(), JavaVersion::Java8);
        assert_eq!(parameters[0].generate(), "@ReadOnly Outer Outer.this");

        let mut parser = JavaParser::new("(int x, A this)");
        assert_matches!(
            parse_formal_parameters(&mut parser),
            Err(SyntaxError::GrammarViolation { .. })
        );

        let declaration = single_type("class A { void m(A this) {} }");
        assert!(declaration.generate().contains("m(A this)"));
    }

    #[test]
    fn test_enum_with_bodies() {
        let declaration = single_type(
            "enum Op implements IntBinaryOperator {
                PLUS(\"+\") { public int applyAsInt(int a, int b) { return a + b; } },
                @Deprecated MINUS(\"-\");
                private final String symbol;
                Op(String symbol) { this.symbol = symbol; }
            }",
        );
        assert_matches!(
            &declaration.node,
            TypeDeclaration::Enum { constants, body, .. }
                if constants.len() == 2 && constants[0].body.is_some() && body.len() == 2
        );
    }

    #[test]
    fn test_records_interfaces_and_annotation_types() {
        let record = single_type("record Range(int lo, int hi) implements Serializable { Range { check(lo, hi); } }");
        assert_matches!(
            &record.node,
            TypeDeclaration::Record { components, body, .. }
                if components.len() == 2 && body[0].kind() == NodeKind::CompactConstructorDeclaration
        );
        assert_eq!(record.min_version(), JavaVersion::Java16);

        let interface = single_type("public sealed interface Shape permits Circle, Square { default double area() { return 0; } }");
        assert_matches!(
            &interface.node,
            TypeDeclaration::Interface { permits, modifiers, .. }
                if permits.len() == 2 && matches!(modifiers[1].node, Modifier::Sealed)
        );

        let annotation = single_type("@Retention(RUNTIME) @interface Tag { String value() default \"\"; int[] ids() default {1, 2}; }");
        assert_matches!(&annotation.node, TypeDeclaration::AnnotationType { body, .. } if body.len() == 2);
    }

    #[test]
    fn test_non_sealed_modifier() {
        let declaration = single_type("non-sealed class Leaf extends Node {}");
        assert_matches!(declaration.modifiers()[0].node, Modifier::NonSealed);
        assert_eq!(declaration.generate(), "non-sealed class Leaf extends Node {}");
    }

    #[test]
    fn test_annotation_arguments() {
        let mut parser = JavaParser::new("@SuppressWarnings({\"a\", \"b\"}) @Config(name = \"x\", retries = 3) @Marker");
        let annotations = parse_annotations(&mut parser).unwrap();
        assert_matches!(&annotations[0].arguments, AnnotationArguments::Single(ElementValue::Array(values)) if values.len() == 2);
        assert_matches!(&annotations[1].arguments, AnnotationArguments::Named(pairs) if pairs.len() == 2);
        assert_matches!(annotations[2].arguments, AnnotationArguments::Marker);
    }

    #[test]
    fn test_module_declaration() {
        let parsed = unit(
            "open module com.example.app {
                requires transitive java.sql;
                requires static lombok;
                exports com.example.api to com.example.client, other;
                uses com.example.spi.Plugin;
                provides com.example.spi.Plugin with com.example.impl.Default;
            }",
        );
        let module = parsed.module.as_ref().unwrap();
        assert!(module.open);
        assert_eq!(module.directives.len(), 5);
        assert_matches!(
            &module.directives[0].node,
            Directive::Requires { modifiers, .. } if modifiers == &vec![RequiresModifier::Transitive]
        );
        assert!(parsed.types.is_empty());
    }

    #[test]
    fn test_restricted_type_names() {
        let mut parser = JavaParser::new("class permits {}");
        assert_matches!(
            parse_compilation_unit(&mut parser),
            Err(SyntaxError::ContextualKeyword { .. })
        );
        let mut parser = JavaParser::new("int permits;");
        assert!(parse_compilation_unit(&mut parser).is_err());
    }
}
