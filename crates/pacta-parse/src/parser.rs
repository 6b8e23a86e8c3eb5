//! Recursive-descent parser from token stream to [`Contract`] tree.
//!
//! Grammar:
//!
//! ```text
//! top        := clauses EOF                  ; >1 clause => Composite
//! clauses    := or_expr ("," or_expr)*
//! or_expr    := unary ("|" unary)*
//! unary      := "!" unary | primary
//! primary    := "(" clauses ")"              ; >1 clause => AND group
//!             | comparison | collection | "*" | IDENT
//! comparison := VAR? cmpop (NUMBER | VAR)
//! collection := ("list"|"tuple"|"set"|"map") size? elems?
//! size       := "[" (INT | VAR) "]"
//! elems      := "(" clauses ")" | "(" or_expr ":" clauses ")"
//! ```
//!
//! A single uppercase ASCII letter is a symbolic variable; any other
//! identifier that is not a collection keyword is an extension reference.
//! `seq` and the other shape aliases are extensions, so they take no
//! suffixes. Parsing is total: anything outside the grammar is a
//! [`ParseError`], never a best-effort tree.

use std::ops::Range;

use logos::Logos;

use pacta_core::{CmpOp, CollectionKind, Contract, Number, Operand};

use crate::error::ParseError;
use crate::lexer::Token;

pub struct Parser<'a> {
    src: &'a str,
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
}

fn collection_keyword(name: &str) -> Option<CollectionKind> {
    match name {
        "list" => Some(CollectionKind::List),
        "tuple" => Some(CollectionKind::Tuple),
        "set" => Some(CollectionKind::Set),
        "map" => Some(CollectionKind::Map),
        _ => None,
    }
}

/// Symbolic variables are single uppercase ASCII letters (`N`, `M`, ...).
fn is_variable(name: &str) -> bool {
    name.len() == 1 && name.as_bytes()[0].is_ascii_uppercase()
}

fn cmp_op(token: &Token) -> Option<CmpOp> {
    match token {
        Token::Lt => Some(CmpOp::Lt),
        Token::Le => Some(CmpOp::Le),
        Token::Gt => Some(CmpOp::Gt),
        Token::Ge => Some(CmpOp::Ge),
        Token::Eq | Token::EqEq => Some(CmpOp::Eq),
        Token::Ne => Some(CmpOp::Ne),
        _ => None,
    }
}

impl<'a> Parser<'a> {
    /// Tokenizes the input. An unrecognized character is reported here with
    /// its position.
    pub fn new(src: &'a str) -> Result<Self, ParseError> {
        let mut tokens = Vec::new();
        let mut lexer = Token::lexer(src);
        while let Some(result) = lexer.next() {
            let span = lexer.span();
            match result {
                Ok(token) => tokens.push((token, span)),
                Err(()) => {
                    return Err(ParseError::new(
                        "unrecognized character",
                        span.start,
                        &src[span],
                    ));
                }
            }
        }
        Ok(Parser { src, tokens, pos: 0 })
    }

    pub fn parse_top(mut self) -> Result<Contract, ParseError> {
        let mut clauses = self.parse_clauses()?;
        if let Some((token, span)) = self.tokens.get(self.pos) {
            return Err(ParseError::new(
                format!("unexpected {}", token.describe()),
                span.start,
                &self.src[span.clone()],
            ));
        }
        if clauses.len() == 1 {
            Ok(clauses.remove(0))
        } else {
            Ok(Contract::Composite { clauses })
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn bump(&mut self) -> Option<(Token, Range<usize>)> {
        let item = self.tokens.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    /// Position and snippet of the current token, for error reporting.
    fn here(&self) -> (usize, String) {
        match self.tokens.get(self.pos) {
            Some((_, span)) => (span.start, self.src[span.clone()].to_string()),
            None => (self.src.len(), "end of input".to_string()),
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let (position, snippet) = self.here();
        ParseError::new(message, position, snippet)
    }

    fn expect(&mut self, want: Token, message: &str) -> Result<(), ParseError> {
        match self.peek() {
            Some(t) if *t == want => {
                self.bump();
                Ok(())
            }
            _ => Err(self.error(message)),
        }
    }

    fn parse_clauses(&mut self) -> Result<Vec<Contract>, ParseError> {
        let mut clauses = vec![self.parse_or()?];
        while self.peek() == Some(&Token::Comma) {
            self.bump();
            clauses.push(self.parse_or()?);
        }
        Ok(clauses)
    }

    fn parse_or(&mut self) -> Result<Contract, ParseError> {
        let mut items = vec![self.parse_unary()?];
        while self.peek() == Some(&Token::Pipe) {
            self.bump();
            items.push(self.parse_unary()?);
        }
        if items.len() == 1 {
            Ok(items.remove(0))
        } else {
            Ok(Contract::or(items))
        }
    }

    fn parse_unary(&mut self) -> Result<Contract, ParseError> {
        if self.peek() == Some(&Token::Bang) {
            self.bump();
            Ok(Contract::negate(self.parse_unary()?))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Result<Contract, ParseError> {
        let token = match self.peek() {
            Some(t) => t.clone(),
            None => return Err(self.error("expected a contract clause")),
        };
        match token {
            _ if cmp_op(&token).is_some() => self.parse_comparison(None),
            Token::Ident(name) => {
                if let Some(kind) = collection_keyword(&name) {
                    self.bump();
                    self.parse_collection(kind)
                } else if is_variable(&name) {
                    self.bump();
                    if self.peek().map_or(false, |t| cmp_op(t).is_some()) {
                        self.parse_comparison(Some(name))
                    } else {
                        Ok(Contract::Binding { name })
                    }
                } else {
                    self.bump();
                    Ok(Contract::ExtensionRef { name })
                }
            }
            Token::Star => {
                self.bump();
                Ok(Contract::ExtensionRef { name: "*".to_string() })
            }
            Token::LParen => {
                self.bump();
                let mut clauses = self.parse_clauses()?;
                self.expect(Token::RParen, "expected ')' to close the group")?;
                if clauses.len() == 1 {
                    Ok(clauses.remove(0))
                } else {
                    Ok(Contract::and(clauses))
                }
            }
            Token::Int(_) | Token::Float(_) => {
                Err(self.error("a bare number is not a contract clause"))
            }
            other => Err(self.error(format!(
                "expected a contract clause, found {}",
                other.describe()
            ))),
        }
    }

    fn parse_comparison(&mut self, lhs: Option<String>) -> Result<Contract, ParseError> {
        let op = match self.bump() {
            Some((token, _)) => match cmp_op(&token) {
                Some(op) => op,
                None => return Err(self.error("expected a comparison operator")),
            },
            None => return Err(self.error("expected a comparison operator")),
        };
        let rhs = match self.peek() {
            Some(Token::Int(n)) => {
                let n = *n;
                self.bump();
                Operand::Literal(Number::Int(n))
            }
            Some(Token::Float(x)) => {
                let x = *x;
                self.bump();
                Operand::Literal(Number::Float(x))
            }
            Some(Token::Ident(name)) if is_variable(name) => {
                let name = name.clone();
                self.bump();
                Operand::Variable(name)
            }
            _ => {
                return Err(self.error(
                    "expected a number or symbolic variable after the comparison operator",
                ))
            }
        };
        Ok(Contract::Comparison { lhs, op, rhs })
    }

    fn parse_collection(&mut self, kind: CollectionKind) -> Result<Contract, ParseError> {
        let mut size_binding = None;
        let mut exact_size = None;
        if self.peek() == Some(&Token::LBracket) {
            self.bump();
            match self.peek() {
                Some(Token::Int(n)) => {
                    let n = *n;
                    if n < 0 {
                        return Err(self.error("collection size must be non-negative"));
                    }
                    self.bump();
                    exact_size = Some(n as u64);
                }
                Some(Token::Ident(name)) if is_variable(name) => {
                    size_binding = Some(name.clone());
                    self.bump();
                }
                _ => {
                    return Err(
                        self.error("expected a size literal or symbolic variable inside '[...]'")
                    )
                }
            }
            self.expect(Token::RBracket, "expected ']' to close the size suffix")?;
        }

        let mut key = None;
        let mut element = None;
        if self.peek() == Some(&Token::LParen) {
            self.bump();
            if kind == CollectionKind::Map {
                key = Some(Box::new(self.parse_or()?));
                self.expect(
                    Token::Colon,
                    "map elements are written 'map(key:value)'",
                )?;
                element = Some(Box::new(fold_clauses(self.parse_clauses()?)));
            } else {
                element = Some(Box::new(fold_clauses(self.parse_clauses()?)));
            }
            self.expect(Token::RParen, "expected ')' to close the element contract")?;
        }

        Ok(Contract::Collection {
            kind,
            key,
            element,
            size_binding,
            exact_size,
        })
    }
}

/// A comma list inside a suffix is an AND group.
fn fold_clauses(mut clauses: Vec<Contract>) -> Contract {
    if clauses.len() == 1 {
        clauses.remove(0)
    } else {
        Contract::and(clauses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacta_core::LogicalOp;

    fn parse(input: &str) -> Contract {
        Parser::new(input).unwrap().parse_top().unwrap()
    }

    fn fails(input: &str) -> ParseError {
        Parser::new(input)
            .and_then(|p| p.parse_top())
            .expect_err(input)
    }

    #[test]
    fn top_level_commas_build_a_composite() {
        let c = parse("int,>0");
        match &c {
            Contract::Composite { clauses } => assert_eq!(clauses.len(), 2),
            other => panic!("expected composite, got {:?}", other),
        }
    }

    #[test]
    fn single_clause_is_not_wrapped() {
        assert_eq!(parse("int"), Contract::extension("int"));
    }

    #[test]
    fn parenthesized_commas_build_an_and_group() {
        let c = parse("(int,>0)");
        match &c {
            Contract::Logical { op: LogicalOp::And, children } => assert_eq!(children.len(), 2),
            other => panic!("expected AND group, got {:?}", other),
        }
    }

    #[test]
    fn or_chain_flattens() {
        let c = parse("int|str|none");
        match &c {
            Contract::Logical { op: LogicalOp::Or, children } => assert_eq!(children.len(), 3),
            other => panic!("expected OR, got {:?}", other),
        }
    }

    #[test]
    fn grouped_or_nests() {
        let c = parse("int|(str|none)");
        match &c {
            Contract::Logical { op: LogicalOp::Or, children } => {
                assert_eq!(children.len(), 2);
                assert!(matches!(
                    children[1],
                    Contract::Logical { op: LogicalOp::Or, .. }
                ));
            }
            other => panic!("expected OR, got {:?}", other),
        }
    }

    #[test]
    fn not_binds_tighter_than_or() {
        let c = parse("!int|str");
        match &c {
            Contract::Logical { op: LogicalOp::Or, children } => {
                assert!(matches!(
                    children[0],
                    Contract::Logical { op: LogicalOp::Not, .. }
                ));
            }
            other => panic!("expected OR, got {:?}", other),
        }
    }

    #[test]
    fn sized_list_with_element_contract() {
        let c = parse("list[N](int)");
        match &c {
            Contract::Collection {
                kind: CollectionKind::List,
                key: None,
                element: Some(elem),
                size_binding: Some(var),
                exact_size: None,
            } => {
                assert_eq!(var, "N");
                assert_eq!(**elem, Contract::extension("int"));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn exact_size_suffix() {
        let c = parse("tuple[3]");
        match &c {
            Contract::Collection {
                kind: CollectionKind::Tuple,
                exact_size: Some(3),
                size_binding: None,
                ..
            } => {}
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn map_key_value_contracts() {
        let c = parse("map(str:seq)");
        match &c {
            Contract::Collection {
                kind: CollectionKind::Map,
                key: Some(k),
                element: Some(v),
                ..
            } => {
                assert_eq!(**k, Contract::extension("str"));
                assert_eq!(**v, Contract::extension("seq"));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn comma_in_element_contract_is_an_and() {
        let c = parse("list(int,>0)");
        match &c {
            Contract::Collection { element: Some(elem), .. } => {
                assert!(matches!(
                    **elem,
                    Contract::Logical { op: LogicalOp::And, .. }
                ));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn variable_comparison_keeps_the_lhs() {
        let c = parse("N>0");
        assert_eq!(
            c,
            Contract::Comparison {
                lhs: Some("N".into()),
                op: CmpOp::Gt,
                rhs: Operand::Literal(Number::Int(0)),
            }
        );
    }

    #[test]
    fn standalone_variable_is_a_binding() {
        assert_eq!(parse("N"), Contract::Binding { name: "N".into() });
    }

    #[test]
    fn lowercase_identifier_is_an_extension() {
        assert_eq!(parse("seq"), Contract::extension("seq"));
        assert_eq!(parse("my_predicate"), Contract::extension("my_predicate"));
    }

    #[test]
    fn star_is_the_anything_extension() {
        assert_eq!(parse("*"), Contract::extension("*"));
        assert_eq!(
            parse("map(str:*)"),
            Contract::Collection {
                kind: CollectionKind::Map,
                key: Some(Box::new(Contract::extension("str"))),
                element: Some(Box::new(Contract::extension("*"))),
                size_binding: None,
                exact_size: None,
            }
        );
    }

    #[test]
    fn double_equals_is_an_alias() {
        assert_eq!(parse("==5"), parse("=5"));
    }

    #[test]
    fn variable_against_variable() {
        let c = parse("N==M");
        assert_eq!(
            c,
            Contract::Comparison {
                lhs: Some("N".into()),
                op: CmpOp::Eq,
                rhs: Operand::Variable("M".into()),
            }
        );
    }

    #[test]
    fn syntax_failures() {
        for input in [
            "",
            ",",
            "int,",
            "int,,str",
            "list[",
            "list[N",
            "list[-1]",
            "list[1.5]",
            "list(",
            "map(int)",
            "map(:int)",
            "seq[N]",
            "(int",
            "int)",
            "5",
            ">",
            ">x",
            ">foo",
            "N>",
            "!|int",
            "int|",
            "int@",
            "list(str:int)",
        ] {
            let err = fails(input);
            assert!(!err.message.is_empty(), "no message for {:?}", input);
        }
    }

    #[test]
    fn error_reports_position_and_snippet() {
        let err = fails("int,@");
        assert_eq!(err.position, 4);
        assert_eq!(err.snippet, "@");

        let err = fails("list[");
        assert_eq!(err.position, 5);
        assert_eq!(err.snippet, "end of input");
    }
}
