//! Public entry points: text in, AST or error out
//!
//! Each function builds a fresh [`JavaParser`] over the input, parses one
//! production and requires the whole input to be consumed. Lexer failures
//! raised while parsing surface as [`PipelineError::Lexical`].

mod error;
mod validation;

pub use error::PipelineError;
pub use validation::validate_pipeline;

use crate::grammar::ast::{
    CompilationUnitNode, ExpressionNode, JavaVersion, Node, NodeKind, StatementNode, TypeNode,
};
use crate::grammar::ast::SourceWriter;
use crate::grammar::builders::{ParenKind, Parser};
use crate::lexical;
use crate::logging::{self, codes};
use crate::syntax::JavaParser;
use crate::tokens::{reconstruct, TokenKind};
use crate::utils::Span;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Entry production for [`parse`]. Tokenization is the same in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParseMode {
    CompilationUnit,
    Statement,
    Expression,
    Type,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::CompilationUnit => "compilation-unit",
            ParseMode::Statement => "statement",
            ParseMode::Expression => "expression",
            ParseMode::Type => "type",
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compilation-unit" | "unit" | "file" => Ok(ParseMode::CompilationUnit),
            "statement" | "stmt" => Ok(ParseMode::Statement),
            "expression" | "expr" => Ok(ParseMode::Expression),
            "type" => Ok(ParseMode::Type),
            other => Err(format!("unknown parse mode '{}'", other)),
        }
    }
}

/// Result of [`parse`], one variant per mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParsedNode {
    CompilationUnit(CompilationUnitNode),
    Statement(StatementNode),
    Expression(ExpressionNode),
    Type(TypeNode),
}

impl ParsedNode {
    pub fn mode(&self) -> ParseMode {
        match self {
            ParsedNode::CompilationUnit(_) => ParseMode::CompilationUnit,
            ParsedNode::Statement(_) => ParseMode::Statement,
            ParsedNode::Expression(_) => ParseMode::Expression,
            ParsedNode::Type(_) => ParseMode::Type,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ParsedNode::CompilationUnit(node) => node.span,
            ParsedNode::Statement(node) => node.span,
            ParsedNode::Expression(node) => node.span,
            ParsedNode::Type(node) => node.span,
        }
    }
}

impl Node for ParsedNode {
    fn kind(&self) -> NodeKind {
        match self {
            ParsedNode::CompilationUnit(node) => node.kind(),
            ParsedNode::Statement(node) => node.kind(),
            ParsedNode::Expression(node) => node.kind(),
            ParsedNode::Type(node) => node.kind(),
        }
    }

    fn min_version(&self) -> JavaVersion {
        match self {
            ParsedNode::CompilationUnit(node) => node.min_version(),
            ParsedNode::Statement(node) => node.min_version(),
            ParsedNode::Expression(node) => node.min_version(),
            ParsedNode::Type(node) => node.min_version(),
        }
    }

    fn write(&self, w: &mut SourceWriter) {
        match self {
            ParsedNode::CompilationUnit(node) => node.write(w),
            ParsedNode::Statement(node) => node.write(w),
            ParsedNode::Expression(node) => node.write(w),
            ParsedNode::Type(node) => node.write(w),
        }
    }
}

/// Parse `text` with the entry production `mode` selects
pub fn parse(text: &str, mode: ParseMode) -> Result<ParsedNode, PipelineError> {
    let parsed = match mode {
        ParseMode::CompilationUnit => ParsedNode::CompilationUnit(parse_compilation_unit(text)?),
        ParseMode::Statement => ParsedNode::Statement(parse_statement(text)?),
        ParseMode::Expression => ParsedNode::Expression(parse_expression(text)?),
        ParseMode::Type => ParsedNode::Type(parse_type(text)?),
    };
    Ok(parsed)
}

pub fn parse_compilation_unit(text: &str) -> Result<CompilationUnitNode, PipelineError> {
    Ok(JavaParser::new(text).parse_compilation_unit()?)
}

pub fn parse_statement(text: &str) -> Result<StatementNode, PipelineError> {
    Ok(JavaParser::new(text).parse_statement()?)
}

pub fn parse_expression(text: &str) -> Result<ExpressionNode, PipelineError> {
    Ok(JavaParser::new(text).parse_expression()?)
}

pub fn parse_type(text: &str) -> Result<TypeNode, PipelineError> {
    Ok(JavaParser::new(text).parse_type()?)
}

/// Classify the parenthesized prefix that starts `text`
pub fn classify_parenthesized(text: &str) -> Result<ParenKind, PipelineError> {
    let mut parser = JavaParser::new(text);
    if !parser.check(TokenKind::LParen)? {
        return Err(parser.unexpected("'('").into());
    }
    Ok(parser.classify_paren()?)
}

/// Load a source file and parse it as a compilation unit
pub fn parse_file(path: &Path) -> Result<CompilationUnitNode, PipelineError> {
    logging::with_file_context(path, || {
        crate::log_info!("Parsing source file", "file" => path.display());
        let file = crate::file_processor::process_file(path)?;
        parse_compilation_unit(&file.source)
    })
}

/// Outcome of [`check_round_trip`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundTripReport {
    pub token_count: usize,
    /// Tokens with their affiliations reproduce the input byte for byte
    pub lossless: bool,
    /// Generating, reparsing and generating again yields the same text
    pub idempotent: bool,
}

impl RoundTripReport {
    pub fn passed(&self) -> bool {
        self.lossless && self.idempotent
    }
}

/// Tokenize and parse `text`, then verify token reconstruction and generation
pub fn check_round_trip(text: &str, mode: ParseMode) -> Result<RoundTripReport, PipelineError> {
    let tokens = lexical::tokenize(text)?;
    let lossless = reconstruct(&tokens) == text;

    let generated = parse(text, mode)?.generate();
    let regenerated = parse(&generated, mode)?.generate();
    let report = RoundTripReport {
        token_count: tokens.len(),
        lossless,
        idempotent: generated == regenerated,
    };

    if report.passed() {
        crate::log_success!(
            codes::success::ROUND_TRIP_VERIFIED,
            "Round trip verified",
            "mode" => mode,
            "tokens" => report.token_count
        );
    } else {
        crate::log_warning!(
            "Round trip mismatch",
            "lossless" => report.lossless,
            "idempotent" => report.idempotent
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::{Expression, Statement, TypeDeclaration};
    use crate::syntax::SyntaxError;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
package com.example.shapes;

import java.util.*;
import static java.lang.Math.PI;

public sealed interface Shape permits Circle, Square {
    double area();

    default String describe() {
        return switch (this) {
            case Circle c when c.radius() > 10 -> "large circle";
            case Circle c -> "circle";
            case Square(double side) -> "square " + side;
        };
    }
}

record Circle(double radius) implements Shape {
    Circle {
        if (radius < 0) throw new IllegalArgumentException("negative");
    }

    public double area() { return PI * radius * radius; }
}

final class Registry<K extends Comparable<K>, V> {
    private final Map<K, List<V>> entries = new HashMap<>();

    @SuppressWarnings("unchecked")
    public <R> List<R> map(K key, Function<? super V, ? extends R> f) {
        List<R> out = new ArrayList<>();
        for (V v : entries.getOrDefault(key, List.of())) {
            out.add(f.apply(v));
        }
        entries.forEach((k, vs) -> System.out.println(k + "=" + vs.size()));
        int[] counts = new int[] {1, 2, 3};
        outer:
        for (int i = 0, j = counts.length - 1; i < j; i++, j--) {
            if (counts[i] == (int) 'x') break outer;
            else continue;
        }
        try (var in = open()) {
            in.read();
        } catch (IOException | RuntimeException e) {
            throw e;
        } finally {
            out.clear();
        }
        return out;
    }
}
"#;

    #[test]
    fn test_generation_is_idempotent() {
        let first = parse_compilation_unit(SAMPLE).unwrap().generate();
        let second = parse_compilation_unit(&first).unwrap().generate();
        assert_eq!(first, second);
        assert!(first.contains("public sealed interface Shape permits Circle, Square"));
    }

    #[test]
    fn test_parse_modes_select_entry_production() {
        assert_eq!(
            parse("a.b(c)", ParseMode::Expression).unwrap().kind(),
            NodeKind::MethodCall
        );
        assert_eq!(parse("a.b(c);", ParseMode::Statement).unwrap().kind(), NodeKind::ExpressionStatement);
        assert_eq!(parse("a.b", ParseMode::Type).unwrap().kind(), NodeKind::ClassType);
        assert_eq!(parse("", ParseMode::CompilationUnit).unwrap().kind(), NodeKind::CompilationUnit);
        assert!(parse("a.b(c)", ParseMode::Type).is_err());
        assert_eq!("expr".parse::<ParseMode>().unwrap(), ParseMode::Expression);
        assert!("program".parse::<ParseMode>().is_err());
    }

    #[test]
    fn test_paren_disambiguation() {
        assert_eq!(classify_parenthesized("(1 + 2)").unwrap(), ParenKind::Parenthesized);
        assert_eq!(classify_parenthesized("(int)").unwrap(), ParenKind::Cast);
        assert_eq!(classify_parenthesized("(a, b)").unwrap(), ParenKind::ImplicitLambda);
        assert_eq!(classify_parenthesized("(Integer i)").unwrap(), ParenKind::ExplicitLambda);
        assert_eq!(classify_parenthesized("(String) b").unwrap(), ParenKind::Cast);
        assert_matches!(
            classify_parenthesized("x"),
            Err(PipelineError::Syntax(SyntaxError::UnexpectedToken { .. }))
        );
    }

    #[test]
    fn test_contextual_keyword_rejection() {
        assert_matches!(
            parse_type("permits"),
            Err(PipelineError::Syntax(SyntaxError::ContextualKeyword { .. }))
        );
        assert_matches!(parse_expression("permits").unwrap().node, Expression::Name { .. });
        assert!(parse_statement("int record = 1;").is_ok());
    }

    #[test]
    fn test_try_requires_catch_finally_or_resources() {
        let error = parse_statement("try {}").unwrap_err();
        assert_matches!(error, PipelineError::Syntax(SyntaxError::GrammarViolation { .. }));
        assert_eq!(error.offset(), Some(0));

        assert_matches!(
            parse_statement("try (r) {}").unwrap().node,
            Statement::Try { .. }
        );
    }

    #[test]
    fn test_lexical_errors_surface_as_lexical() {
        let error = parse_expression("a + #").unwrap_err();
        assert!(error.is_lexical());
        assert_eq!(error.offset(), Some(4));
        assert_eq!(error.error_code().as_str(), "E020");
    }

    #[test]
    fn test_deep_nesting_is_bounded() {
        // Debug builds need more than the default test thread stack
        let handle = std::thread::Builder::new()
            .stack_size(64 << 20)
            .spawn(|| {
                let text = format!("{}1{}", "(".repeat(200), ")".repeat(200));
                assert_matches!(
                    parse_expression(&text),
                    Err(PipelineError::Syntax(SyntaxError::MaxRecursionDepth { .. }))
                );

                let chain: String = (0..200).map(|i| format!("if (x == {i}) y = {i}; else ")).collect();
                assert!(parse_statement(&format!("{chain}y = -1;")).is_ok());
            })
            .unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_parse_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Point.java");
        fs::write(&path, "public record Point(int x, int y) {}\n").unwrap();

        let unit = parse_file(&path).unwrap();
        assert_matches!(&unit.types[0].node, TypeDeclaration::Record { name, .. } if name == "Point");

        assert_matches!(
            parse_file(&dir.path().join("Missing.java")),
            Err(PipelineError::FileProcessing(_))
        );
    }

    #[test]
    fn test_round_trip_report() {
        let report = check_round_trip(SAMPLE, ParseMode::CompilationUnit).unwrap();
        assert!(report.passed());
        assert!(report.token_count > 100);

        let report = check_round_trip("/* c */ a+b // tail", ParseMode::Expression).unwrap();
        assert!(report.lossless);
        assert!(report.idempotent);
    }

    #[test]
    fn test_parsed_node_serializes() {
        let parsed = parse("x -> x + 1", ParseMode::Expression).unwrap();
        let json = serde_json::to_string(&parsed).unwrap();
        assert!(json.contains("Lambda"));
        assert_eq!(parsed.mode(), ParseMode::Expression);
        assert_eq!(parsed.span().len(), 10);
    }
}
