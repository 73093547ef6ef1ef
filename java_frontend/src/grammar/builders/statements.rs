//! Statement builders

use super::atomic::{at_non_sealed, guarded, node, Parser};
use super::declarations::{
    at_type_declaration, parse_modifiers, parse_type_declaration, parse_variable_declarators,
};
use super::expressions::{parse_arguments, parse_expression, parse_switch};
use super::helpers::{is_enhanced_for, is_local_variable_declaration, is_yield_statement};
use super::types::{parse_catch_type, parse_type, parse_type_arguments};
use crate::grammar::ast::{
    Block, BlockNode, CatchClause, CatchClauseNode, ConstructorCallKind, Expression,
    ExpressionNode, ForInit, LocalVariableDeclaration, ModifierNode, Resource, ResourceNode,
    Statement, StatementNode,
};
use crate::grammar::keywords::Keyword;
use crate::syntax::{SyntaxError, SyntaxResult};
use crate::tokens::TokenKind;

/// `{ statement* }`
pub fn parse_block(parser: &mut dyn Parser) -> SyntaxResult<BlockNode> {
    guarded(parser, "block", |parser| {
        let start = parser.save_position();
        parser.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !parser.check(TokenKind::RBrace)? {
            statements.push(parse_statement(parser)?);
        }
        parser.expect(TokenKind::RBrace)?;
        Ok(node(parser, start, Block { statements }))
    })
}

/// Any block statement, local declarations included
pub fn parse_statement(parser: &mut dyn Parser) -> SyntaxResult<StatementNode> {
    guarded(parser, "statement", |parser| {
        let start = parser.save_position();
        let statement = parse_statement_kind(parser)?;
        Ok(node(parser, start, statement))
    })
}

fn parse_statement_kind(parser: &mut dyn Parser) -> SyntaxResult<Statement> {
    match parser.current_kind()? {
        TokenKind::LBrace => Ok(Statement::Block(parse_block(parser)?.into_inner())),
        TokenKind::Semicolon => {
            parser.advance()?;
            Ok(Statement::Empty)
        }
        TokenKind::Keyword(Keyword::If) => parse_if(parser),
        TokenKind::Keyword(Keyword::While) => {
            parser.advance()?;
            let condition = parse_condition(parser)?;
            let body = Box::new(parse_statement(parser)?);
            Ok(Statement::While { condition, body })
        }
        TokenKind::Keyword(Keyword::Do) => {
            parser.advance()?;
            let body = Box::new(parse_statement(parser)?);
            parser.expect_keyword(Keyword::While)?;
            let condition = parse_condition(parser)?;
            parser.expect(TokenKind::Semicolon)?;
            Ok(Statement::DoWhile { body, condition })
        }
        TokenKind::Keyword(Keyword::For) => parse_for(parser),
        TokenKind::Keyword(Keyword::Switch) => {
            let (selector, body) = parse_switch(parser)?;
            Ok(Statement::Switch { selector, body })
        }
        TokenKind::Keyword(Keyword::Return) => {
            parser.advance()?;
            let value = if parser.check(TokenKind::Semicolon)? {
                None
            } else {
                Some(parse_expression(parser)?)
            };
            parser.expect(TokenKind::Semicolon)?;
            Ok(Statement::Return { value })
        }
        TokenKind::Keyword(Keyword::Break) => {
            parser.advance()?;
            let label = parse_optional_label(parser)?;
            Ok(Statement::Break { label })
        }
        TokenKind::Keyword(Keyword::Continue) => {
            parser.advance()?;
            let label = parse_optional_label(parser)?;
            Ok(Statement::Continue { label })
        }
        TokenKind::Keyword(Keyword::Throw) => {
            parser.advance()?;
            let exception = parse_expression(parser)?;
            parser.expect(TokenKind::Semicolon)?;
            Ok(Statement::Throw { exception })
        }
        TokenKind::Keyword(Keyword::Try) => parse_try(parser),
        TokenKind::Keyword(Keyword::Synchronized)
            if parser.peek_kind(1)? == TokenKind::LParen =>
        {
            parser.advance()?;
            let lock = parse_condition(parser)?;
            let block = parse_block(parser)?;
            Ok(Statement::Synchronized { lock, block })
        }
        TokenKind::Keyword(Keyword::Assert) => {
            parser.advance()?;
            let condition = parse_expression(parser)?;
            let message = if parser.eat(TokenKind::Colon)? {
                Some(parse_expression(parser)?)
            } else {
                None
            };
            parser.expect(TokenKind::Semicolon)?;
            Ok(Statement::Assert { condition, message })
        }
        TokenKind::Keyword(Keyword::This) | TokenKind::Keyword(Keyword::Super)
            if parser.peek_kind(1)? == TokenKind::LParen =>
        {
            parse_constructor_invocation(parser, None)
        }
        TokenKind::Lt => parse_constructor_invocation(parser, None),
        _ => parse_declaration_or_expression(parser),
    }
}

fn parse_declaration_or_expression(parser: &mut dyn Parser) -> SyntaxResult<Statement> {
    if at_type_declaration(parser)? || at_local_modifiers(parser)? {
        let start = parser.save_position();
        let modifiers = parse_modifiers(parser)?;
        if at_type_declaration(parser)? {
            let declaration = parse_type_declaration(parser, start, modifiers)?;
            return Ok(Statement::LocalClass {
                declaration: Box::new(declaration),
            });
        }
        let declaration = parse_local_variable(parser, modifiers)?;
        parser.expect(TokenKind::Semicolon)?;
        return Ok(Statement::LocalVariable(declaration));
    }

    if parser.check(TokenKind::Identifier)? {
        if is_yield_statement(parser)? {
            parser.advance()?;
            let value = parse_expression(parser)?;
            parser.expect(TokenKind::Semicolon)?;
            return Ok(Statement::Yield { value });
        }
        if parser.peek_kind(1)? == TokenKind::Colon {
            let label = parser.expect_identifier()?;
            parser.advance()?;
            let statement = Box::new(parse_statement(parser)?);
            return Ok(Statement::Labeled { label, statement });
        }
    }

    if is_local_variable_declaration(parser)? {
        let declaration = parse_local_variable(parser, Vec::new())?;
        parser.expect(TokenKind::Semicolon)?;
        return Ok(Statement::LocalVariable(declaration));
    }

    let expression = parse_expression(parser)?;
    if let Expression::Super {
        qualifier: Some(_),
    } = &expression.node
    {
        if parser.check(TokenKind::LParen)? {
            return finish_qualified_super_call(parser, expression);
        }
    }
    parser.expect(TokenKind::Semicolon)?;
    Ok(Statement::Expression { expression })
}

/// Modifiers that can only start a local declaration
fn at_local_modifiers(parser: &mut dyn Parser) -> SyntaxResult<bool> {
    Ok(match parser.current_kind()? {
        TokenKind::Keyword(
            Keyword::Final | Keyword::Abstract | Keyword::Static | Keyword::Strictfp,
        )
        | TokenKind::At => true,
        TokenKind::Identifier => {
            (parser.check_word("sealed")?
                && matches!(
                    parser.peek_kind(1)?,
                    TokenKind::Keyword(_) | TokenKind::Identifier
                ))
                || at_non_sealed(parser)?
        }
        _ => false,
    })
}

/// `[modifiers] Type name = value, ...` without the semicolon
pub fn parse_local_variable(
    parser: &mut dyn Parser,
    modifiers: Vec<ModifierNode>,
) -> SyntaxResult<LocalVariableDeclaration> {
    let var_type = parse_type(parser)?;
    let declarators = parse_variable_declarators(parser)?;
    Ok(LocalVariableDeclaration {
        modifiers,
        var_type,
        declarators,
    })
}

/// `( expression )`
fn parse_condition(parser: &mut dyn Parser) -> SyntaxResult<ExpressionNode> {
    parser.expect(TokenKind::LParen)?;
    let condition = parse_expression(parser)?;
    parser.expect(TokenKind::RParen)?;
    Ok(condition)
}

fn parse_optional_label(parser: &mut dyn Parser) -> SyntaxResult<Option<String>> {
    let label = if parser.check(TokenKind::Identifier)? {
        Some(parser.expect_identifier()?)
    } else {
        None
    };
    parser.expect(TokenKind::Semicolon)?;
    Ok(label)
}

/// `else if` chains are read iteratively and nested afterwards, so they do
/// not count against the depth limit
fn parse_if(parser: &mut dyn Parser) -> SyntaxResult<Statement> {
    parser.expect_keyword(Keyword::If)?;
    let condition = parse_condition(parser)?;
    let then_branch = parse_statement(parser)?;

    let mut arms = Vec::new();
    let mut trailing = None;
    while parser.eat(TokenKind::Keyword(Keyword::Else))? {
        if !parser.check_keyword(Keyword::If)? {
            trailing = Some(parse_statement(parser)?);
            break;
        }
        let arm_start = parser.save_position();
        parser.advance()?;
        let arm_condition = parse_condition(parser)?;
        let arm_then = parse_statement(parser)?;
        arms.push((arm_start, arm_condition, arm_then));
    }

    let mut else_branch = trailing.map(Box::new);
    while let Some((arm_start, arm_condition, arm_then)) = arms.pop() {
        let nested = Statement::If {
            condition: arm_condition,
            then_branch: Box::new(arm_then),
            else_branch,
        };
        else_branch = Some(Box::new(node(parser, arm_start, nested)));
    }
    Ok(Statement::If {
        condition,
        then_branch: Box::new(then_branch),
        else_branch,
    })
}

fn parse_for(parser: &mut dyn Parser) -> SyntaxResult<Statement> {
    parser.expect_keyword(Keyword::For)?;
    parser.expect(TokenKind::LParen)?;

    if is_enhanced_for(parser)? {
        let modifiers = parse_modifiers(parser)?;
        let var_type = parse_type(parser)?;
        let name = parser.expect_identifier()?;
        parser.expect(TokenKind::Colon)?;
        let iterable = parse_expression(parser)?;
        parser.expect(TokenKind::RParen)?;
        let body = Box::new(parse_statement(parser)?);
        return Ok(Statement::ForEach {
            modifiers,
            var_type,
            name,
            iterable,
            body,
        });
    }

    let init = if parser.check(TokenKind::Semicolon)? {
        None
    } else if matches!(
        parser.current_kind()?,
        TokenKind::Keyword(Keyword::Final) | TokenKind::At
    ) || is_local_variable_declaration(parser)?
    {
        let modifiers = parse_modifiers(parser)?;
        Some(ForInit::Declaration(parse_local_variable(parser, modifiers)?))
    } else {
        Some(ForInit::Expressions(parse_expression_list(parser)?))
    };
    parser.expect(TokenKind::Semicolon)?;

    let condition = if parser.check(TokenKind::Semicolon)? {
        None
    } else {
        Some(parse_expression(parser)?)
    };
    parser.expect(TokenKind::Semicolon)?;

    let update = if parser.check(TokenKind::RParen)? {
        Vec::new()
    } else {
        parse_expression_list(parser)?
    };
    parser.expect(TokenKind::RParen)?;

    let body = Box::new(parse_statement(parser)?);
    Ok(Statement::For {
        init,
        condition,
        update,
        body,
    })
}

fn parse_expression_list(parser: &mut dyn Parser) -> SyntaxResult<Vec<ExpressionNode>> {
    let mut expressions = vec![parse_expression(parser)?];
    while parser.eat(TokenKind::Comma)? {
        expressions.push(parse_expression(parser)?);
    }
    Ok(expressions)
}

// === TRY ===

fn parse_try(parser: &mut dyn Parser) -> SyntaxResult<Statement> {
    let try_token = parser.expect_keyword(Keyword::Try)?;
    let resources = if parser.check(TokenKind::LParen)? {
        parse_resources(parser)?
    } else {
        Vec::new()
    };
    let block = parse_block(parser)?;

    let mut catches = Vec::new();
    while parser.check_keyword(Keyword::Catch)? {
        catches.push(parse_catch(parser)?);
    }
    let finally = if parser.eat(TokenKind::Keyword(Keyword::Finally))? {
        Some(parse_block(parser)?)
    } else {
        None
    };

    if resources.is_empty() && catches.is_empty() && finally.is_none() {
        return Err(SyntaxError::grammar_violation(
            "'try' requires a catch clause, a finally block or resources",
            &try_token,
        ));
    }
    Ok(Statement::Try {
        resources,
        block,
        catches,
        finally,
    })
}

/// `(r1; r2;)`, trailing semicolon optional
fn parse_resources(parser: &mut dyn Parser) -> SyntaxResult<Vec<ResourceNode>> {
    parser.expect(TokenKind::LParen)?;
    let mut resources = vec![parse_resource(parser)?];
    while parser.eat(TokenKind::Semicolon)? {
        if parser.check(TokenKind::RParen)? {
            break;
        }
        resources.push(parse_resource(parser)?);
    }
    parser.expect(TokenKind::RParen)?;
    Ok(resources)
}

fn parse_resource(parser: &mut dyn Parser) -> SyntaxResult<ResourceNode> {
    let start = parser.save_position();
    let declares = matches!(
        parser.current_kind()?,
        TokenKind::Keyword(Keyword::Final) | TokenKind::At
    ) || is_local_variable_declaration(parser)?;

    let resource = if declares {
        let modifiers = parse_modifiers(parser)?;
        let var_type = parse_type(parser)?;
        let name = parser.expect_identifier()?;
        parser.expect(TokenKind::Assign)?;
        let initializer = parse_expression(parser)?;
        Resource::Declaration {
            modifiers,
            var_type,
            name,
            initializer,
        }
    } else {
        Resource::Expression(parse_expression(parser)?)
    };
    Ok(node(parser, start, resource))
}

fn parse_catch(parser: &mut dyn Parser) -> SyntaxResult<CatchClauseNode> {
    let start = parser.save_position();
    parser.expect_keyword(Keyword::Catch)?;
    parser.expect(TokenKind::LParen)?;
    let modifiers = parse_modifiers(parser)?;
    let types = parse_catch_type(parser)?;
    let name = parser.expect_identifier()?;
    parser.expect(TokenKind::RParen)?;
    let block = parse_block(parser)?;
    Ok(node(
        parser,
        start,
        CatchClause {
            modifiers,
            types,
            name,
            block,
        },
    ))
}

// === CONSTRUCTOR INVOCATION ===

/// `[<T>] this(...)` or `[<T>] super(...)`
fn parse_constructor_invocation(
    parser: &mut dyn Parser,
    qualifier: Option<Box<ExpressionNode>>,
) -> SyntaxResult<Statement> {
    let type_arguments = if parser.check(TokenKind::Lt)? {
        parse_type_arguments(parser)?
    } else {
        Vec::new()
    };
    let kind = if parser.eat(TokenKind::Keyword(Keyword::This))? {
        ConstructorCallKind::This
    } else {
        parser.expect_keyword(Keyword::Super)?;
        ConstructorCallKind::Super
    };
    let arguments = parse_arguments(parser)?;
    parser.expect(TokenKind::Semicolon)?;
    Ok(Statement::ConstructorInvocation {
        qualifier,
        type_arguments,
        kind,
        arguments,
    })
}

/// `outer.super(...)`, after the expression parser has read `outer.super`
fn finish_qualified_super_call(
    parser: &mut dyn Parser,
    expression: ExpressionNode,
) -> SyntaxResult<Statement> {
    let Expression::Super { qualifier } = expression.node else {
        return Err(parser.unexpected("'super'"));
    };
    let arguments = parse_arguments(parser)?;
    parser.expect(TokenKind::Semicolon)?;
    Ok(Statement::ConstructorInvocation {
        qualifier,
        type_arguments: Vec::new(),
        kind: ConstructorCallKind::Super,
        arguments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::{Node, SwitchBody, Type};
    use crate::syntax::JavaParser;
    use assert_matches::assert_matches;

    fn statement(text: &str) -> StatementNode {
        let mut parser = JavaParser::new(text);
        let parsed = parse_statement(&mut parser).unwrap();
        assert_eq!(parser.current_kind().unwrap(), TokenKind::Eof, "trailing input in {text}");
        parsed
    }

    fn statement_error(text: &str) -> SyntaxError {
        let mut parser = JavaParser::new(text);
        parse_statement(&mut parser).unwrap_err()
    }

    #[test]
    fn test_local_variables() {
        let parsed = statement("final List<String> names = new ArrayList<>(), rest;");
        assert_matches!(
            &parsed.node,
            Statement::LocalVariable(declaration)
                if declaration.modifiers.len() == 1 && declaration.declarators.len() == 2
        );
        assert!(statement("var count = 0;").declares_var());
        assert_matches!(statement("int[] a = {1, 2}, b[];").node, Statement::LocalVariable(_));
        assert_matches!(statement("a.b.C<D> x;").node, Statement::LocalVariable(_));
    }

    #[test]
    fn test_expression_statements() {
        assert_matches!(statement("x = y;").node, Statement::Expression { .. });
        assert_matches!(statement("list.add(1);").node, Statement::Expression { .. });
        assert_matches!(statement("i++;").node, Statement::Expression { .. });
        assert_matches!(statement("a < b;").node, Statement::Expression { .. });
    }

    #[test]
    fn test_control_flow() {
        assert_matches!(statement("if (a) b(); else if (c) d(); else e();").node, Statement::If { else_branch: Some(_), .. });
        assert_matches!(statement("while (true) {}").node, Statement::While { .. });
        assert_matches!(statement("do x++; while (x < 3);").node, Statement::DoWhile { .. });
        assert_matches!(statement("for (int i = 0, j = 1; i < j; i++, j--) {}").node, Statement::For { init: Some(ForInit::Declaration(_)), .. });
        assert_matches!(statement("for (;;) break;").node, Statement::For { init: None, condition: None, .. });
        assert_matches!(statement("for (final var s : items) {}").node, Statement::ForEach { ref var_type, .. } if matches!(var_type.node, Type::Var));
        assert_matches!(statement("outer: for (;;) continue outer;").node, Statement::Labeled { ref label, .. } if label == "outer");
        assert_matches!(statement("synchronized (lock) { n++; }").node, Statement::Synchronized { .. });
        assert_matches!(statement("assert x > 0 : \"positive\";").node, Statement::Assert { message: Some(_), .. });
        assert_matches!(statement("return;").node, Statement::Return { value: None });
        assert_matches!(statement("throw new IllegalStateException();").node, Statement::Throw { .. });
        assert_matches!(statement(";").node, Statement::Empty);
    }

    #[test]
    fn test_long_else_if_chain() {
        let mut text = String::from("if (x == 0) a();");
        for i in 1..200 {
            text.push_str(&format!(" else if (x == {i}) a();"));
        }
        let parsed = statement(&text);
        assert_matches!(parsed.node, Statement::If { else_branch: Some(_), .. });
    }

    #[test]
    fn test_switch_statement() {
        let parsed = statement("switch (day) { case MONDAY: case FRIDAY: work(); break; default: rest(); }");
        assert_matches!(
            &parsed.node,
            Statement::Switch { body: SwitchBody::Groups(groups), .. } if groups.len() == 2
        );
        let parsed = statement("switch (day) { case MONDAY -> work(); default -> throw new X(); }");
        assert_matches!(&parsed.node, Statement::Switch { body: SwitchBody::Rules(rules), .. } if rules.len() == 2);
    }

    #[test]
    fn test_try_forms() {
        assert_matches!(statement("try { a(); } catch (IOException | RuntimeException e) { }").node,
            Statement::Try { ref catches, .. } if catches[0].types.len() == 2);
        assert_matches!(statement("try (var in = open(); out) { }").node,
            Statement::Try { ref resources, .. } if resources.len() == 2);
        assert_matches!(statement("try { } finally { }").node, Statement::Try { finally: Some(_), .. });
    }

    #[test]
    fn test_bare_try_is_rejected() {
        let error = statement_error("try {}");
        assert_matches!(error, SyntaxError::GrammarViolation { .. });
        assert_eq!(error.found(), "try");
        assert_eq!(error.offset(), 0);
    }

    #[test]
    fn test_local_declarations_and_yield() {
        assert_matches!(statement("record Point(int x, int y) {}").node, Statement::LocalClass { .. });
        assert_matches!(statement("final class Helper {}").node, Statement::LocalClass { .. });
        assert_matches!(statement("enum Mode { ON, OFF }").node, Statement::LocalClass { .. });
        assert_matches!(statement("yield result;").node, Statement::Yield { .. });
        assert_eq!(statement("yield ++x;").generate(), "yield ++x;");
        assert_matches!(statement("yield --x;").node, Statement::Yield { .. });
        assert_matches!(statement("yield++;").node, Statement::Expression { .. });
        assert_matches!(statement("yield = 1;").node, Statement::Expression { .. });
        assert_matches!(statement("record = 1;").node, Statement::Expression { .. });
    }

    #[test]
    fn test_constructor_invocations() {
        assert_matches!(statement("this(1, 2);").node, Statement::ConstructorInvocation { kind: ConstructorCallKind::This, .. });
        assert_matches!(statement("super();").node, Statement::ConstructorInvocation { kind: ConstructorCallKind::Super, qualifier: None, .. });
        assert_matches!(statement("outer.super();").node, Statement::ConstructorInvocation { qualifier: Some(_), .. });
        assert_matches!(statement("<T>this(t);").node, Statement::ConstructorInvocation { ref type_arguments, .. } if type_arguments.len() == 1);
    }

    #[test]
    fn test_block_generation() {
        let parsed = statement("{int x=1;if(x>0){x--;}}");
        assert_eq!(parsed.generate(), "{\n    int x = 1;\n    if (x > 0) {\n        x--;\n    }\n}");
    }
}
