//! Expression builders
//!
//! Assignment and the conditional are handled first, then binary operators
//! by precedence climbing, then prefix operators, casts and lambdas, then
//! primaries followed by any number of selectors.

use super::atomic::{guarded, node, parse_identifier_list, parse_literal, with_lambdas, Parser};
use super::declarations::{
    parse_annotations, parse_class_body, parse_formal_parameters, parse_modifiers,
};
use super::helpers::{classify_paren, is_pattern_start, type_primary, ParenKind};
use super::statements::{parse_block, parse_statement};
use super::types::{
    parse_cast_type, parse_creation_type, parse_result_type, parse_type, parse_type_arguments,
};
use crate::grammar::ast::{
    AssignmentOperator, BinaryOperator, CaseLabel, CaseLabelNode, ClassTypeSegment, Expression,
    ExpressionNode, InstanceOfTarget, LambdaBody, LambdaParameters, Pattern, PatternNode,
    ReferenceTarget, RuleBody, SwitchBody, SwitchGroup, SwitchGroupNode, SwitchLabel,
    SwitchLabelNode, SwitchRule, SwitchRuleNode, Syntax, Type, TypeNode, UnaryOperator,
    INSTANCEOF_PRECEDENCE,
};
use crate::grammar::keywords::Keyword;
use crate::syntax::SyntaxResult;
use crate::tokens::TokenKind;

/// expression ::= conditional (assignment_operator expression)?
pub fn parse_expression(parser: &mut dyn Parser) -> SyntaxResult<ExpressionNode> {
    guarded(parser, "expression", parse_assignment)
}

fn parse_assignment(parser: &mut dyn Parser) -> SyntaxResult<ExpressionNode> {
    let start = parser.save_position();
    let target = parse_conditional(parser)?;
    let Some(operator) = AssignmentOperator::from_token(parser.current_kind()?) else {
        return Ok(target);
    };
    parser.advance()?;
    let value = parse_expression(parser)?;
    Ok(node(
        parser,
        start,
        Expression::Assignment {
            target: Box::new(target),
            operator,
            value: Box::new(value),
        },
    ))
}

fn parse_conditional(parser: &mut dyn Parser) -> SyntaxResult<ExpressionNode> {
    let start = parser.save_position();
    let condition = parse_binary(parser, 1)?;
    if !parser.eat(TokenKind::Question)? {
        return Ok(condition);
    }
    let then_value = parse_expression(parser)?;
    parser.expect(TokenKind::Colon)?;
    let else_value = guarded(parser, "expression", parse_conditional)?;
    Ok(node(
        parser,
        start,
        Expression::Conditional {
            condition: Box::new(condition),
            then_value: Box::new(then_value),
            else_value: Box::new(else_value),
        },
    ))
}

/// Left-associative binary operators binding at least `min_precedence`
fn parse_binary(parser: &mut dyn Parser, min_precedence: u8) -> SyntaxResult<ExpressionNode> {
    let start = parser.save_position();
    let mut left = parse_unary(parser)?;

    loop {
        let kind = parser.current_kind()?;
        if kind == TokenKind::Keyword(Keyword::Instanceof) {
            if INSTANCEOF_PRECEDENCE < min_precedence {
                break;
            }
            parser.advance()?;
            let target = parse_instanceof_target(parser)?;
            left = node(
                parser,
                start,
                Expression::InstanceOf {
                    expression: Box::new(left),
                    target,
                },
            );
            continue;
        }

        let Some(operator) = BinaryOperator::from_token(kind) else {
            break;
        };
        let precedence = operator.precedence();
        if precedence < min_precedence {
            break;
        }
        parser.advance()?;
        let right = parse_binary(parser, precedence + 1)?;
        left = node(
            parser,
            start,
            Expression::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
        );
    }
    Ok(left)
}

fn parse_instanceof_target(parser: &mut dyn Parser) -> SyntaxResult<InstanceOfTarget> {
    if is_pattern_start(parser)? {
        Ok(InstanceOfTarget::Pattern(Box::new(parse_pattern(parser)?)))
    } else {
        Ok(InstanceOfTarget::Type(Box::new(parse_type(parser)?)))
    }
}

/// Type pattern `final T name` or record pattern `R(p, q)`
pub fn parse_pattern(parser: &mut dyn Parser) -> SyntaxResult<PatternNode> {
    guarded(parser, "pattern", |parser| {
        let start = parser.save_position();
        if parser.check_word("_")?
            && matches!(parser.peek_kind(1)?, TokenKind::Comma | TokenKind::RParen)
        {
            parser.advance()?;
            return Ok(node(parser, start, Pattern::Unnamed));
        }

        let modifiers = parse_modifiers(parser)?;
        let pattern_type = parse_type(parser)?;
        if modifiers.is_empty() && parser.eat(TokenKind::LParen)? {
            let mut components = Vec::new();
            if !parser.check(TokenKind::RParen)? {
                loop {
                    components.push(parse_pattern(parser)?);
                    if !parser.eat(TokenKind::Comma)? {
                        break;
                    }
                }
            }
            parser.expect(TokenKind::RParen)?;
            return Ok(node(
                parser,
                start,
                Pattern::Record {
                    record_type: Box::new(pattern_type),
                    components,
                },
            ));
        }

        let name = parser.expect_identifier()?;
        Ok(node(
            parser,
            start,
            Pattern::Type {
                modifiers,
                pattern_type: Box::new(pattern_type),
                name,
            },
        ))
    })
}

fn parse_unary(parser: &mut dyn Parser) -> SyntaxResult<ExpressionNode> {
    let start = parser.save_position();
    let kind = parser.current_kind()?;

    if kind == TokenKind::Minus
        && matches!(parser.peek_kind(1)?, TokenKind::IntLiteral | TokenKind::LongLiteral)
    {
        parser.advance()?;
        let literal_start = parser.save_position();
        let literal = parse_literal(parser, true)?;
        let operand = node(parser, literal_start, Expression::Literal(literal));
        return Ok(node(
            parser,
            start,
            Expression::Unary {
                operator: UnaryOperator::Minus,
                operand: Box::new(operand),
            },
        ));
    }

    if let Some(operator) = UnaryOperator::prefix_from_token(kind) {
        parser.advance()?;
        let operand = guarded(parser, "expression", parse_unary)?;
        return Ok(node(
            parser,
            start,
            Expression::Unary {
                operator,
                operand: Box::new(operand),
            },
        ));
    }

    if kind == TokenKind::LParen {
        match classify_paren(parser)? {
            ParenKind::Cast => return parse_cast(parser, start),
            paren if paren.is_lambda() && parser.lambdas_allowed() => {
                return parse_lambda(parser, start, paren);
            }
            _ => {}
        }
    }

    let primary = parse_primary(parser)?;
    parse_selectors(parser, start, primary)
}

fn parse_cast(parser: &mut dyn Parser, start: usize) -> SyntaxResult<ExpressionNode> {
    parser.expect(TokenKind::LParen)?;
    let target_type = parse_cast_type(parser)?;
    parser.expect(TokenKind::RParen)?;
    let expression = guarded(parser, "expression", parse_unary)?;
    Ok(node(
        parser,
        start,
        Expression::Cast {
            target_type: Box::new(target_type),
            expression: Box::new(expression),
        },
    ))
}

fn parse_lambda(
    parser: &mut dyn Parser,
    start: usize,
    kind: ParenKind,
) -> SyntaxResult<ExpressionNode> {
    let parameters = if kind == ParenKind::ExplicitLambda {
        LambdaParameters::Explicit(parse_formal_parameters(parser)?)
    } else {
        parser.expect(TokenKind::LParen)?;
        let names = if parser.check(TokenKind::RParen)? {
            Vec::new()
        } else {
            parse_identifier_list(parser)?
        };
        parser.expect(TokenKind::RParen)?;
        LambdaParameters::Implicit {
            names,
            parenthesized: true,
        }
    };
    finish_lambda(parser, start, parameters)
}

fn finish_lambda(
    parser: &mut dyn Parser,
    start: usize,
    parameters: LambdaParameters,
) -> SyntaxResult<ExpressionNode> {
    parser.expect(TokenKind::Arrow)?;
    let body = with_lambdas(parser, true, |parser| {
        if parser.check(TokenKind::LBrace)? {
            Ok(LambdaBody::Block(parse_block(parser)?))
        } else {
            Ok(LambdaBody::Expression(Box::new(parse_expression(parser)?)))
        }
    })?;
    Ok(node(parser, start, Expression::Lambda { parameters, body }))
}

// === PRIMARIES ===

fn parse_primary(parser: &mut dyn Parser) -> SyntaxResult<ExpressionNode> {
    let start = parser.save_position();
    let kind = parser.current_kind()?;
    if kind.is_literal() {
        let literal = parse_literal(parser, false)?;
        return Ok(node(parser, start, Expression::Literal(literal)));
    }

    match kind {
        TokenKind::Identifier => parse_name_primary(parser, start),
        TokenKind::LParen => {
            parser.advance()?;
            let expression = with_lambdas(parser, true, parse_expression)?;
            parser.expect(TokenKind::RParen)?;
            Ok(node(
                parser,
                start,
                Expression::Parenthesized {
                    expression: Box::new(expression),
                },
            ))
        }
        TokenKind::Keyword(Keyword::This) => {
            parser.advance()?;
            Ok(node(parser, start, Expression::This { qualifier: None }))
        }
        TokenKind::Keyword(Keyword::Super) => {
            parser.advance()?;
            Ok(node(parser, start, Expression::Super { qualifier: None }))
        }
        TokenKind::Keyword(Keyword::New) => parse_creation(parser, start, None),
        TokenKind::Keyword(Keyword::Switch) => {
            let (selector, body) = parse_switch(parser)?;
            Ok(node(
                parser,
                start,
                Expression::Switch {
                    selector: Box::new(selector),
                    body,
                },
            ))
        }
        TokenKind::Keyword(keyword) if keyword.is_primitive_type() || keyword == Keyword::Void => {
            let primary_type = parse_result_type(parser)?;
            finish_type_primary(parser, start, primary_type)
        }
        _ => Err(parser.unexpected("expression")),
    }
}

fn parse_name_primary(parser: &mut dyn Parser, start: usize) -> SyntaxResult<ExpressionNode> {
    let next = parser.peek_kind(1)?;
    if next == TokenKind::Arrow && parser.lambdas_allowed() {
        let name = parser.expect_identifier()?;
        let parameters = LambdaParameters::Implicit {
            names: vec![name],
            parenthesized: false,
        };
        return finish_lambda(parser, start, parameters);
    }

    if matches!(next, TokenKind::Lt | TokenKind::LBracket | TokenKind::Dot)
        && type_primary(parser)?.is_some()
    {
        let primary_type = parse_type(parser)?;
        return finish_type_primary(parser, start, primary_type);
    }

    let name = parser.expect_identifier()?;
    if parser.check(TokenKind::LParen)? {
        let arguments = parse_arguments(parser)?;
        return Ok(node(
            parser,
            start,
            Expression::MethodCall {
                target: None,
                type_arguments: Vec::new(),
                name,
                arguments,
            },
        ));
    }
    Ok(node(parser, start, Expression::Name { name }))
}

/// `Type::name` or `Type.class` after a type in primary position
fn finish_type_primary(
    parser: &mut dyn Parser,
    start: usize,
    primary_type: TypeNode,
) -> SyntaxResult<ExpressionNode> {
    if parser.check(TokenKind::ColonColon)? {
        return parse_method_reference(parser, start, ReferenceTarget::Type(Box::new(primary_type)));
    }
    parser.expect(TokenKind::Dot)?;
    parser.expect_keyword(Keyword::Class)?;
    Ok(node(
        parser,
        start,
        Expression::ClassLiteral {
            class_type: Box::new(primary_type),
        },
    ))
}

// === SELECTORS ===

fn parse_selectors(
    parser: &mut dyn Parser,
    start: usize,
    mut expression: ExpressionNode,
) -> SyntaxResult<ExpressionNode> {
    loop {
        expression = match parser.current_kind()? {
            TokenKind::Dot => {
                parser.advance()?;
                parse_dot_selector(parser, start, expression)?
            }
            TokenKind::LBracket => {
                parser.advance()?;
                let index = with_lambdas(parser, true, parse_expression)?;
                parser.expect(TokenKind::RBracket)?;
                node(
                    parser,
                    start,
                    Expression::ArrayAccess {
                        array: Box::new(expression),
                        index: Box::new(index),
                    },
                )
            }
            TokenKind::ColonColon => parse_method_reference(
                parser,
                start,
                ReferenceTarget::Expression(Box::new(expression)),
            )?,
            kind => {
                let Some(operator) = UnaryOperator::postfix_from_token(kind) else {
                    return Ok(expression);
                };
                parser.advance()?;
                node(
                    parser,
                    start,
                    Expression::Unary {
                        operator,
                        operand: Box::new(expression),
                    },
                )
            }
        };
    }
}

fn parse_dot_selector(
    parser: &mut dyn Parser,
    start: usize,
    target: ExpressionNode,
) -> SyntaxResult<ExpressionNode> {
    match parser.current_kind()? {
        TokenKind::Lt => {
            let type_arguments = parse_type_arguments(parser)?;
            let name = parser.expect_identifier()?;
            let arguments = parse_arguments(parser)?;
            Ok(node(
                parser,
                start,
                Expression::MethodCall {
                    target: Some(Box::new(target)),
                    type_arguments,
                    name,
                    arguments,
                },
            ))
        }
        TokenKind::Keyword(Keyword::This) => {
            parser.advance()?;
            Ok(node(
                parser,
                start,
                Expression::This {
                    qualifier: Some(Box::new(target)),
                },
            ))
        }
        TokenKind::Keyword(Keyword::Super) => {
            parser.advance()?;
            Ok(node(
                parser,
                start,
                Expression::Super {
                    qualifier: Some(Box::new(target)),
                },
            ))
        }
        TokenKind::Keyword(Keyword::New) => parse_creation(parser, start, Some(target)),
        TokenKind::Keyword(Keyword::Class) => {
            let Some(names) = target.qualified_name() else {
                return Err(parser.unexpected("identifier"));
            };
            parser.advance()?;
            let class_type = Syntax::new(
                Type::Class {
                    segments: names.into_iter().map(ClassTypeSegment::simple).collect(),
                },
                target.span,
                target.source,
            );
            Ok(node(
                parser,
                start,
                Expression::ClassLiteral {
                    class_type: Box::new(class_type),
                },
            ))
        }
        _ => {
            let name = parser.expect_identifier()?;
            if parser.check(TokenKind::LParen)? {
                let arguments = parse_arguments(parser)?;
                return Ok(node(
                    parser,
                    start,
                    Expression::MethodCall {
                        target: Some(Box::new(target)),
                        type_arguments: Vec::new(),
                        name,
                        arguments,
                    },
                ));
            }
            Ok(node(
                parser,
                start,
                Expression::FieldAccess {
                    target: Box::new(target),
                    name,
                },
            ))
        }
    }
}

fn parse_method_reference(
    parser: &mut dyn Parser,
    start: usize,
    target: ReferenceTarget,
) -> SyntaxResult<ExpressionNode> {
    parser.expect(TokenKind::ColonColon)?;
    let type_arguments = if parser.check(TokenKind::Lt)? {
        parse_type_arguments(parser)?
    } else {
        Vec::new()
    };
    let name = if parser.eat(TokenKind::Keyword(Keyword::New))? {
        "new".to_string()
    } else {
        parser.expect_identifier()?
    };
    Ok(node(
        parser,
        start,
        Expression::MethodReference {
            target,
            type_arguments,
            name,
        },
    ))
}

// === CREATION ===

/// `new` expressions. `outer` is the qualifying instance of `outer.new Inner()`.
fn parse_creation(
    parser: &mut dyn Parser,
    start: usize,
    outer: Option<ExpressionNode>,
) -> SyntaxResult<ExpressionNode> {
    parser.expect_keyword(Keyword::New)?;
    let type_arguments = if parser.check(TokenKind::Lt)? {
        parse_type_arguments(parser)?
    } else {
        Vec::new()
    };
    let created = parse_creation_type(parser)?;

    if outer.is_none()
        && type_arguments.is_empty()
        && (parser.check(TokenKind::LBracket)? || parser.check(TokenKind::At)?)
    {
        return parse_array_creation(parser, start, created);
    }

    let arguments = parse_arguments(parser)?;
    let body = if parser.check(TokenKind::LBrace)? {
        Some(with_lambdas(parser, true, |parser| parse_class_body(parser, None))?)
    } else {
        None
    };
    Ok(node(
        parser,
        start,
        Expression::ObjectCreation {
            outer: outer.map(Box::new),
            type_arguments,
            class_type: Box::new(created),
            arguments,
            body,
        },
    ))
}

fn parse_array_creation(
    parser: &mut dyn Parser,
    start: usize,
    element: TypeNode,
) -> SyntaxResult<ExpressionNode> {
    let mut dimensions = Vec::new();
    let mut extra_dimensions = 0;
    let mut dimension_annotations = Vec::new();
    loop {
        let position = parser.save_position();
        let annotations = parse_annotations(parser)?;
        if !parser.check(TokenKind::LBracket)? {
            if annotations.is_empty() {
                break;
            }
            return Err(parser.unexpected("'['"));
        }
        if parser.peek_kind(1)? == TokenKind::RBracket {
            parser.advance()?;
            parser.advance()?;
            extra_dimensions += 1;
        } else if extra_dimensions == 0 {
            parser.advance()?;
            dimensions.push(with_lambdas(parser, true, parse_expression)?);
            parser.expect(TokenKind::RBracket)?;
        } else {
            // `new int[2][]` followed by an index is an array access
            parser.restore_position(position);
            break;
        }
        dimension_annotations.push(annotations);
    }

    let initializer = if dimensions.is_empty() {
        Some(Box::new(parse_array_initializer(parser)?))
    } else {
        None
    };
    Ok(node(
        parser,
        start,
        Expression::ArrayCreation {
            element: Box::new(element),
            dimensions,
            extra_dimensions,
            dimension_annotations,
            initializer,
        },
    ))
}

/// `(a, b)` call arguments
pub fn parse_arguments(parser: &mut dyn Parser) -> SyntaxResult<Vec<ExpressionNode>> {
    parser.expect(TokenKind::LParen)?;
    with_lambdas(parser, true, |parser| {
        let mut arguments = Vec::new();
        if !parser.check(TokenKind::RParen)? {
            loop {
                arguments.push(parse_expression(parser)?);
                if !parser.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        parser.expect(TokenKind::RParen)?;
        Ok(arguments)
    })
}

/// `{a, {b, c}, }`
pub fn parse_array_initializer(parser: &mut dyn Parser) -> SyntaxResult<ExpressionNode> {
    guarded(parser, "array initializer", |parser| {
        let start = parser.save_position();
        parser.expect(TokenKind::LBrace)?;
        let elements = with_lambdas(parser, true, |parser| {
            let mut elements = Vec::new();
            while !parser.check(TokenKind::RBrace)? {
                elements.push(parse_variable_initializer(parser)?);
                if !parser.eat(TokenKind::Comma)? {
                    break;
                }
            }
            Ok(elements)
        })?;
        parser.expect(TokenKind::RBrace)?;
        Ok(node(parser, start, Expression::ArrayInitializer { elements }))
    })
}

/// Expression or array initializer after `=`
pub fn parse_variable_initializer(parser: &mut dyn Parser) -> SyntaxResult<ExpressionNode> {
    if parser.check(TokenKind::LBrace)? {
        parse_array_initializer(parser)
    } else {
        parse_expression(parser)
    }
}

// === SWITCH ===

/// `switch (selector) { ... }`, shared by the statement and the expression
pub fn parse_switch(parser: &mut dyn Parser) -> SyntaxResult<(ExpressionNode, SwitchBody)> {
    parser.expect_keyword(Keyword::Switch)?;
    parser.expect(TokenKind::LParen)?;
    let selector = with_lambdas(parser, true, parse_expression)?;
    parser.expect(TokenKind::RParen)?;
    parser.expect(TokenKind::LBrace)?;
    let body = guarded(parser, "switch", |parser| {
        with_lambdas(parser, true, parse_switch_body)
    })?;
    parser.expect(TokenKind::RBrace)?;
    Ok((selector, body))
}

/// The first label decides between arrow rules and colon groups
fn parse_switch_body(parser: &mut dyn Parser) -> SyntaxResult<SwitchBody> {
    if parser.check(TokenKind::RBrace)? {
        return Ok(SwitchBody::Groups(Vec::new()));
    }
    let start = parser.save_position();
    let label = parse_switch_label(parser)?;
    if parser.check(TokenKind::Arrow)? {
        let mut rules = vec![parse_rule(parser, start, label)?];
        while !parser.check(TokenKind::RBrace)? {
            let start = parser.save_position();
            let label = parse_switch_label(parser)?;
            rules.push(parse_rule(parser, start, label)?);
        }
        Ok(SwitchBody::Rules(rules))
    } else {
        parse_groups(parser, start, label).map(SwitchBody::Groups)
    }
}

fn parse_rule(
    parser: &mut dyn Parser,
    start: usize,
    label: SwitchLabelNode,
) -> SyntaxResult<SwitchRuleNode> {
    parser.expect(TokenKind::Arrow)?;
    let body = match parser.current_kind()? {
        TokenKind::LBrace => RuleBody::Block(parse_block(parser)?),
        TokenKind::Keyword(Keyword::Throw) => RuleBody::Throw(Box::new(parse_statement(parser)?)),
        _ => {
            let expression = parse_expression(parser)?;
            parser.expect(TokenKind::Semicolon)?;
            RuleBody::Expression(expression)
        }
    };
    Ok(node(parser, start, SwitchRule { label, body }))
}

fn parse_groups(
    parser: &mut dyn Parser,
    first_start: usize,
    first_label: SwitchLabelNode,
) -> SyntaxResult<Vec<SwitchGroupNode>> {
    let mut groups = Vec::new();
    let mut start = first_start;
    let mut labels = vec![first_label];
    parser.expect(TokenKind::Colon)?;

    loop {
        while at_switch_label(parser)? {
            labels.push(parse_switch_label(parser)?);
            parser.expect(TokenKind::Colon)?;
        }
        let mut statements = Vec::new();
        while !at_switch_label(parser)? && !parser.check(TokenKind::RBrace)? {
            statements.push(parse_statement(parser)?);
        }
        groups.push(node(
            parser,
            start,
            SwitchGroup {
                labels: std::mem::take(&mut labels),
                statements,
            },
        ));

        if parser.check(TokenKind::RBrace)? {
            return Ok(groups);
        }
        start = parser.save_position();
        labels.push(parse_switch_label(parser)?);
        parser.expect(TokenKind::Colon)?;
    }
}

fn at_switch_label(parser: &mut dyn Parser) -> SyntaxResult<bool> {
    if parser.check_keyword(Keyword::Case)? {
        return Ok(true);
    }
    Ok(parser.check_keyword(Keyword::Default)?
        && matches!(parser.peek_kind(1)?, TokenKind::Colon | TokenKind::Arrow))
}

/// `default` or `case label, label [when guard]`
fn parse_switch_label(parser: &mut dyn Parser) -> SyntaxResult<SwitchLabelNode> {
    let start = parser.save_position();
    if parser.check_keyword(Keyword::Default)? {
        parser.advance()?;
        let labels = vec![node(parser, start, CaseLabel::Default)];
        return Ok(node(parser, start, SwitchLabel { labels, guard: None }));
    }

    parser.expect_keyword(Keyword::Case)?;
    with_lambdas(parser, false, |parser| {
        let mut labels = vec![parse_case_label(parser)?];
        while parser.eat(TokenKind::Comma)? {
            labels.push(parse_case_label(parser)?);
        }
        let guard = if parser.check_word("when")? {
            parser.advance()?;
            Some(parse_expression(parser)?)
        } else {
            None
        };
        Ok(node(parser, start, SwitchLabel { labels, guard }))
    })
}

fn parse_case_label(parser: &mut dyn Parser) -> SyntaxResult<CaseLabelNode> {
    let start = parser.save_position();
    let label = if parser.check(TokenKind::Null)?
        && matches!(
            parser.peek_kind(1)?,
            TokenKind::Comma | TokenKind::Arrow | TokenKind::Colon
        ) {
        parser.advance()?;
        CaseLabel::Null
    } else if parser.eat(TokenKind::Keyword(Keyword::Default))? {
        CaseLabel::Default
    } else if is_pattern_start(parser)? {
        CaseLabel::Pattern(parse_pattern(parser)?)
    } else {
        CaseLabel::Expression(guarded(parser, "expression", parse_conditional)?)
    };
    Ok(node(parser, start, label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::{LiteralKind, Node};
    use crate::syntax::{JavaParser, SyntaxError};
    use assert_matches::assert_matches;

    fn expression(text: &str) -> ExpressionNode {
        let mut parser = JavaParser::new(text);
        let parsed = parse_expression(&mut parser).unwrap();
        assert_eq!(parser.current_kind().unwrap(), TokenKind::Eof, "trailing input in {text}");
        parsed
    }

    #[test]
    fn test_precedence_and_associativity() {
        let parsed = expression("a + b * c - d");
        assert_matches!(
            &parsed.node,
            Expression::Binary { operator: BinaryOperator::Subtract, left, .. }
                if matches!(left.node, Expression::Binary { operator: BinaryOperator::Add, .. })
        );

        let parsed = expression("a = b += c");
        assert_matches!(
            &parsed.node,
            Expression::Assignment { operator: AssignmentOperator::Assign, value, .. }
                if matches!(value.node, Expression::Assignment { .. })
        );

        let parsed = expression("a || b && c");
        assert_matches!(&parsed.node, Expression::Binary { operator: BinaryOperator::Or, .. });
    }

    #[test]
    fn test_conditional_nests_to_the_right() {
        let parsed = expression("a ? b : c ? d : e");
        assert_matches!(
            &parsed.node,
            Expression::Conditional { else_value, .. }
                if matches!(else_value.node, Expression::Conditional { .. })
        );
    }

    #[test]
    fn test_casts_lambdas_and_parentheses() {
        assert_matches!(expression("(int) x").node, Expression::Cast { .. });
        assert_matches!(expression("(String) !x").node, Expression::Cast { .. });
        assert_matches!(expression("(a) - b").node, Expression::Binary { .. });
        assert_matches!(
            expression("(a, b) -> a + b").node,
            Expression::Lambda { parameters: LambdaParameters::Implicit { ref names, parenthesized: true }, .. }
                if names.len() == 2
        );
        assert_matches!(
            expression("(int a) -> { return a; }").node,
            Expression::Lambda { parameters: LambdaParameters::Explicit(_), body: LambdaBody::Block(_) }
        );
        assert_matches!(
            expression("x -> x").node,
            Expression::Lambda { parameters: LambdaParameters::Implicit { parenthesized: false, .. }, .. }
        );
    }

    #[test]
    fn test_instanceof_patterns() {
        let parsed = expression("o instanceof String s && s.isEmpty()");
        assert_matches!(
            &parsed.node,
            Expression::Binary { left, operator: BinaryOperator::And, .. }
                if matches!(left.node, Expression::InstanceOf { target: InstanceOfTarget::Pattern(_), .. })
        );
        let parsed = expression("o instanceof Point(int x, var y)");
        assert_matches!(
            &parsed.node,
            Expression::InstanceOf { target: InstanceOfTarget::Pattern(pattern), .. }
                if matches!(&pattern.node, Pattern::Record { components, .. } if components.len() == 2)
        );
        assert_matches!(
            expression("o instanceof List<?>").node,
            Expression::InstanceOf { target: InstanceOfTarget::Type(_), .. }
        );
    }

    #[test]
    fn test_selectors_and_references() {
        let parsed = expression("a.b().c[0]++");
        assert_matches!(parsed.node, Expression::Unary { operator: UnaryOperator::PostIncrement, .. });
        assert_matches!(expression("String[]::new").node, Expression::MethodReference { ref name, .. } if name == "new");
        assert_matches!(expression("List<String>::size").node, Expression::MethodReference { .. });
        assert_matches!(expression("java.util.List.class").node, Expression::ClassLiteral { .. });
        assert_matches!(expression("int[].class").node, Expression::ClassLiteral { .. });
        assert_matches!(expression("Outer.this.x").node, Expression::FieldAccess { .. });
        assert_matches!(
            expression("Collections.<String>emptyList()").node,
            Expression::MethodCall { ref type_arguments, .. } if type_arguments.len() == 1
        );
        assert_eq!(expression("a < b").generate(), "a < b");
        assert_eq!(expression("x >>> 2").generate(), "x >>> 2");
    }

    #[test]
    fn test_creation() {
        assert_matches!(
            expression("new int[3][]").node,
            Expression::ArrayCreation { ref dimensions, extra_dimensions: 1, initializer: None, .. }
                if dimensions.len() == 1
        );
        assert_matches!(
            expression("new String[] {\"a\", \"b\"}").node,
            Expression::ArrayCreation { initializer: Some(_), .. }
        );
        let annotated = expression("new int @NonNull [3] @Size(2) []");
        assert_matches!(
            &annotated.node,
            Expression::ArrayCreation { dimension_annotations, extra_dimensions: 1, .. }
                if dimension_annotations.len() == 2 && dimension_annotations[0].len() == 1
        );
        assert_eq!(annotated.generate(), "new int @NonNull [3] @Size(2) []");
        assert_matches!(
            expression("new ArrayList<>()").node,
            Expression::ObjectCreation { body: None, .. }
        );
        assert_matches!(
            expression("new Runnable() { public void run() {} }").node,
            Expression::ObjectCreation { body: Some(ref members), .. } if members.len() == 1
        );
        assert_matches!(
            expression("outer.new Inner()").node,
            Expression::ObjectCreation { outer: Some(_), .. }
        );
    }

    #[test]
    fn test_negated_boundary_literals() {
        let parsed = expression("-2147483648");
        assert_matches!(
            &parsed.node,
            Expression::Unary { operator: UnaryOperator::Minus, operand }
                if matches!(&operand.node, Expression::Literal(l) if l.kind == LiteralKind::Int)
        );
        let mut parser = JavaParser::new("2147483648");
        assert_matches!(
            parse_expression(&mut parser),
            Err(SyntaxError::GrammarViolation { .. })
        );
    }

    #[test]
    fn test_switch_expression() {
        let parsed = expression("switch (k) { case 1, 2 -> \"low\"; case Integer i when i > 9 -> \"high\"; default -> { yield \"mid\"; } }");
        assert_matches!(
            &parsed.node,
            Expression::Switch { body: SwitchBody::Rules(rules), .. } if rules.len() == 3
        );

        let parsed = expression("switch (c) { case A: case B: yield 1; default: yield 2; }");
        assert_matches!(
            &parsed.node,
            Expression::Switch { body: SwitchBody::Groups(groups), .. }
                if groups.len() == 2 && groups[0].labels.len() == 2
        );
    }

    #[test]
    fn test_case_labels_do_not_start_lambdas() {
        let parsed = expression("switch (x) { case a -> 1; case (b) -> 2; default -> 3; }");
        let Expression::Switch { body: SwitchBody::Rules(rules), .. } = &parsed.node else {
            panic!("expected switch rules");
        };
        assert_matches!(
            &rules[0].label.labels[0].node,
            CaseLabel::Expression(e) if matches!(e.node, Expression::Name { .. })
        );
        assert_matches!(
            &rules[1].label.labels[0].node,
            CaseLabel::Expression(e) if matches!(e.node, Expression::Parenthesized { .. })
        );
    }

    #[test]
    fn test_unexpected_token_names_source() {
        let mut parser = JavaParser::new("a + ;");
        let error = parse_expression(&mut parser).unwrap_err();
        assert_eq!(error.found(), ";");
        assert_eq!(error.offset(), 4);
    }
}
