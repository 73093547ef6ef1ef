//! Type builders: class, primitive and array types, type arguments and
//! type parameters

use super::atomic::{expect_closing_angle, guarded, node, Parser};
use super::declarations::parse_annotations;
use crate::grammar::ast::{
    AnnotationNode, ClassTypeSegment, Dimension, PrimitiveType, Type, TypeNode, TypeParameter,
    TypeParameterNode, WildcardBound,
};
use crate::grammar::keywords::{is_restricted_type_name, Keyword};
use crate::syntax::{SyntaxError, SyntaxResult};
use crate::tokens::TokenKind;

/// type ::= annotation* (primitive | class_type | "var") dims
pub fn parse_type(parser: &mut dyn Parser) -> SyntaxResult<TypeNode> {
    guarded(parser, "type", |parser| {
        let start = parser.save_position();
        let element = parse_element_type(parser, true)?;
        parse_array_suffix(parser, start, element)
    })
}

/// `void` or a type
pub fn parse_result_type(parser: &mut dyn Parser) -> SyntaxResult<TypeNode> {
    if parser.check_keyword(Keyword::Void)? {
        let start = parser.save_position();
        parser.advance()?;
        return Ok(node(parser, start, Type::Void));
    }
    parse_type(parser)
}

/// Type without trailing dims, as after `new`
pub fn parse_creation_type(parser: &mut dyn Parser) -> SyntaxResult<TypeNode> {
    guarded(parser, "type", |parser| parse_element_type(parser, false))
}

/// annotation* class_type, as in `extends` and `implements` clauses
pub fn parse_class_type(parser: &mut dyn Parser) -> SyntaxResult<TypeNode> {
    let start = parser.save_position();
    let annotations = parse_annotations(parser)?;
    parse_class_type_from(parser, start, annotations)
}

/// Comma-separated class types
pub fn parse_class_type_list(parser: &mut dyn Parser) -> SyntaxResult<Vec<TypeNode>> {
    let mut types = vec![parse_class_type(parser)?];
    while parser.eat(TokenKind::Comma)? {
        types.push(parse_class_type(parser)?);
    }
    Ok(types)
}

/// `A | B` in a catch clause. A single alternative stays a plain type.
pub fn parse_catch_type(parser: &mut dyn Parser) -> SyntaxResult<Vec<TypeNode>> {
    let mut alternatives = vec![parse_type(parser)?];
    while parser.eat(TokenKind::Pipe)? {
        alternatives.push(parse_type(parser)?);
    }
    Ok(alternatives)
}

/// Cast target: a type, or an intersection `A & B`
pub fn parse_cast_type(parser: &mut dyn Parser) -> SyntaxResult<TypeNode> {
    let start = parser.save_position();
    let first = parse_type(parser)?;
    if !parser.check(TokenKind::Amp)? {
        return Ok(first);
    }
    let mut bounds = vec![first];
    while parser.eat(TokenKind::Amp)? {
        bounds.push(parse_type(parser)?);
    }
    Ok(node(parser, start, Type::Intersection { bounds }))
}

fn parse_element_type(parser: &mut dyn Parser, allow_var: bool) -> SyntaxResult<TypeNode> {
    let start = parser.save_position();
    let annotations = parse_annotations(parser)?;

    if let TokenKind::Keyword(keyword) = parser.current_kind()? {
        if let Some(primitive) = PrimitiveType::from_keyword(keyword) {
            parser.advance()?;
            return Ok(node(
                parser,
                start,
                Type::Primitive {
                    annotations,
                    primitive,
                },
            ));
        }
    }

    if allow_var
        && annotations.is_empty()
        && parser.check_word("var")?
        && !matches!(parser.peek_kind(1)?, TokenKind::Dot | TokenKind::Lt)
    {
        parser.advance()?;
        return Ok(node(parser, start, Type::Var));
    }

    parse_class_type_from(parser, start, annotations)
}

fn parse_class_type_from(
    parser: &mut dyn Parser,
    start: usize,
    annotations: Vec<AnnotationNode>,
) -> SyntaxResult<TypeNode> {
    let mut last = parser.peek(0)?.clone();
    let mut segments = vec![parse_segment(parser, annotations)?];

    while parser.check(TokenKind::Dot)?
        && matches!(parser.peek_kind(1)?, TokenKind::Identifier | TokenKind::At)
    {
        parser.advance()?;
        let annotations = parse_annotations(parser)?;
        last = parser.peek(0)?.clone();
        segments.push(parse_segment(parser, annotations)?);
    }

    // Only the simple name of the type is restricted
    if is_restricted_type_name(&last.source) {
        return Err(SyntaxError::contextual_keyword(&last));
    }
    Ok(node(parser, start, Type::Class { segments }))
}

fn parse_segment(
    parser: &mut dyn Parser,
    annotations: Vec<AnnotationNode>,
) -> SyntaxResult<ClassTypeSegment> {
    let name = parser.expect_identifier()?;
    let type_arguments = if parser.check(TokenKind::Lt)? {
        Some(parse_type_arguments(parser)?)
    } else {
        None
    };
    Ok(ClassTypeSegment {
        annotations,
        name,
        type_arguments,
    })
}

/// Trailing `[]` pairs, each with optional annotations
fn parse_array_suffix(
    parser: &mut dyn Parser,
    start: usize,
    element: TypeNode,
) -> SyntaxResult<TypeNode> {
    let mut dimensions = Vec::new();
    while matches!(parser.current_kind()?, TokenKind::LBracket | TokenKind::At) {
        let position = parser.save_position();
        let annotations = parse_annotations(parser)?;
        if parser.check(TokenKind::LBracket)? && parser.peek_kind(1)? == TokenKind::RBracket {
            parser.advance()?;
            parser.advance()?;
            dimensions.push(Dimension { annotations });
        } else {
            parser.restore_position(position);
            break;
        }
    }

    if dimensions.is_empty() {
        return Ok(element);
    }
    Ok(node(
        parser,
        start,
        Type::Array {
            element: Box::new(element),
            dimensions,
        },
    ))
}

/// `<A, ? extends B>`. An empty list is the diamond `<>`.
pub fn parse_type_arguments(parser: &mut dyn Parser) -> SyntaxResult<Vec<TypeNode>> {
    parser.expect(TokenKind::Lt)?;
    let mut arguments = Vec::new();
    if parser.split_greater()? {
        parser.advance()?;
        return Ok(arguments);
    }
    loop {
        arguments.push(parse_type_argument(parser)?);
        if !parser.eat(TokenKind::Comma)? {
            break;
        }
    }
    expect_closing_angle(parser)?;
    Ok(arguments)
}

fn parse_type_argument(parser: &mut dyn Parser) -> SyntaxResult<TypeNode> {
    let start = parser.save_position();
    let annotations = parse_annotations(parser)?;
    if !parser.eat(TokenKind::Question)? {
        parser.restore_position(start);
        return parse_type(parser);
    }

    let bound = if parser.eat(TokenKind::Keyword(Keyword::Extends))? {
        Some(WildcardBound::Extends(Box::new(parse_type(parser)?)))
    } else if parser.eat(TokenKind::Keyword(Keyword::Super))? {
        Some(WildcardBound::Super(Box::new(parse_type(parser)?)))
    } else {
        None
    };
    Ok(node(parser, start, Type::Wildcard { annotations, bound }))
}

/// `<T, U extends A & B>`, or nothing when no `<` follows
pub fn parse_type_parameters(parser: &mut dyn Parser) -> SyntaxResult<Vec<TypeParameterNode>> {
    let mut parameters = Vec::new();
    if !parser.eat(TokenKind::Lt)? {
        return Ok(parameters);
    }
    loop {
        let start = parser.save_position();
        let annotations = parse_annotations(parser)?;
        let name = parser.expect_type_identifier()?;
        let mut bounds = Vec::new();
        if parser.eat(TokenKind::Keyword(Keyword::Extends))? {
            bounds.push(parse_type(parser)?);
            while parser.eat(TokenKind::Amp)? {
                bounds.push(parse_type(parser)?);
            }
        }
        parameters.push(node(
            parser,
            start,
            TypeParameter {
                annotations,
                name,
                bounds,
            },
        ));
        if !parser.eat(TokenKind::Comma)? {
            break;
        }
    }
    expect_closing_angle(parser)?;
    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::Node;
    use crate::syntax::JavaParser;
    use assert_matches::assert_matches;

    fn type_of(text: &str) -> TypeNode {
        let mut parser = JavaParser::new(text);
        let parsed = parse_type(&mut parser).unwrap();
        assert!(parser.current_kind().unwrap() == TokenKind::Eof, "trailing input in {text}");
        parsed
    }

    #[test]
    fn test_nested_type_arguments_split_shift_tokens() {
        let parsed = type_of("Map<String, List<List<Integer>>>");
        assert_eq!(parsed.generate(), "Map<String, List<List<Integer>>>");
        assert_matches!(&parsed.node, Type::Class { segments } if segments.len() == 1);
    }

    #[test]
    fn test_array_and_annotated_dimensions() {
        let parsed = type_of("int @NonNull [] []");
        assert_matches!(&parsed.node, Type::Array { dimensions, .. } if dimensions.len() == 2);
        assert_eq!(parsed.generate(), "int @NonNull [][]");
    }

    #[test]
    fn test_wildcards_and_qualified_segments() {
        let parsed = type_of("java.util.Map.Entry<? extends K, ?>");
        assert_eq!(parsed.qualified_name().as_deref(), Some("java.util.Map.Entry"));
        assert_eq!(parsed.generate(), "java.util.Map.Entry<? extends K, ?>");
    }

    #[test]
    fn test_var_and_restricted_names() {
        assert_matches!(type_of("var").node, Type::Var);

        let mut parser = JavaParser::new("permits");
        assert_matches!(
            parse_type(&mut parser),
            Err(SyntaxError::ContextualKeyword { word, .. }) if word == "permits"
        );
    }

    #[test]
    fn test_type_parameters() {
        let mut parser = JavaParser::new("<T extends Comparable<T> & Serializable, U>");
        let parameters = parse_type_parameters(&mut parser).unwrap();
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].bounds.len(), 2);
        assert_eq!(parameters[0].generate(), "T extends Comparable<T> & Serializable");
    }
}
