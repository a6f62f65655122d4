//! Parser for the Bhagwad language
//!
//! Recursive descent with precedence climbing for expressions. Every
//! construct is disambiguated by its leading token; there is no
//! backtracking. The public [`parse`] entry point also runs the semantic
//! pass, so a returned [`Program`] is fully validated.

use crate::frontend::ast::*;
use crate::frontend::semantic::SemanticAnalyzer;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// Parse a token stream into a validated program
pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    let eof_span = tokens.last().map(|t| t.span).unwrap_or(Span::dummy());
    let mut parser = Parser::from_tokens(tokens);
    let program = parser.parse_program()?;
    SemanticAnalyzer::new().analyze(&program, eof_span)?;
    Ok(program)
}

/// The parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a parser from a token stream
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    // ==================== Helper Methods ====================

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| {
            self.tokens.last().expect("tokens should not be empty")
        })
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    /// One token past the lookahead, used only to split `[type] name` heads
    fn peek_next_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos + 1).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(Error::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current_kind().to_string(),
                span: self.current().span,
            })
        }
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        Error::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current_kind().to_string(),
            span: self.current().span,
        }
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Ident { name, span: token.span })
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    // ==================== Items ====================

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut items = Vec::new();

        while !self.is_at_end() {
            match self.current_kind() {
                TokenKind::Yuga => items.push(Item::Namespace(self.parse_namespace()?)),
                TokenKind::Shloka => items.push(Item::Function(self.parse_function()?)),
                TokenKind::Arjuna => items.push(Item::Entry(self.parse_entry()?)),
                _ => return Err(self.unexpected("'yuga', 'shloka', or 'arjuna'")),
            }
        }

        Ok(Program { items })
    }

    /// Parse a namespace (`yuga`) definition
    fn parse_namespace(&mut self) -> Result<NamespaceDef> {
        let start = self.expect(TokenKind::Yuga)?.span;
        let name = self.parse_ident()?;
        self.expect(TokenKind::LBrace)?;

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.check(&TokenKind::Shloka) {
                members.push(self.parse_function()?);
            } else {
                return Err(self.unexpected("'shloka' or '}'"));
            }
        }
        self.expect(TokenKind::RBrace)?;

        Ok(NamespaceDef { name, members, span: start })
    }

    /// Parse a function (`shloka`) definition
    fn parse_function(&mut self) -> Result<Function> {
        let start = self.expect(TokenKind::Shloka)?.span;
        let name = self.parse_ident()?;

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            params.push(self.parse_param()?);
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        let ret_type = if self.consume(&TokenKind::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;

        Ok(Function { name, params, ret_type, body, span: start })
    }

    fn parse_param(&mut self) -> Result<Param> {
        let span = self.current().span;
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;
        Ok(Param { name, ty, span })
    }

    /// Parse the entry block (`arjuna`)
    fn parse_entry(&mut self) -> Result<EntryBlock> {
        let span = self.expect(TokenKind::Arjuna)?.span;
        let body = self.parse_block()?;
        Ok(EntryBlock { body, span })
    }

    // ==================== Types ====================

    fn parse_type(&mut self) -> Result<Type> {
        let span = self.current().span;
        match self.current_kind().clone() {
            TokenKind::Sattva => {
                self.advance();
                Ok(Type::Scalar(ScalarType::Sattva, span))
            }
            TokenKind::Rajas => {
                self.advance();
                Ok(Type::Scalar(ScalarType::Rajas, span))
            }
            TokenKind::Tamas => {
                self.advance();
                Ok(Type::Scalar(ScalarType::Tamas, span))
            }
            TokenKind::Cosmic => {
                self.advance();
                let elem = self.parse_element_type()?;
                self.expect(TokenKind::LBracket)?;
                self.expect(TokenKind::RBracket)?;
                let mut dims = 1;
                while self.consume(&TokenKind::LBracket) {
                    self.expect(TokenKind::RBracket)?;
                    dims += 1;
                }
                Ok(Type::Array { elem: Box::new(elem), dims, span })
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Type::Named(name, span))
            }
            _ => Err(self.unexpected("type")),
        }
    }

    /// Array element types are scalar or named, never nested arrays
    fn parse_element_type(&mut self) -> Result<Type> {
        let span = self.current().span;
        match self.current_kind().clone() {
            TokenKind::Sattva => {
                self.advance();
                Ok(Type::Scalar(ScalarType::Sattva, span))
            }
            TokenKind::Rajas => {
                self.advance();
                Ok(Type::Scalar(ScalarType::Rajas, span))
            }
            TokenKind::Tamas => {
                self.advance();
                Ok(Type::Scalar(ScalarType::Tamas, span))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Type::Named(name, span))
            }
            _ => Err(self.unexpected("array element type")),
        }
    }

    /// Whether the current token begins a type annotation inside a
    /// `maya`/`sankalpa` declaration. A lone identifier is a type only if
    /// the variable name follows it.
    fn at_type_annotation(&self) -> bool {
        match self.current_kind() {
            TokenKind::Sattva | TokenKind::Rajas | TokenKind::Tamas | TokenKind::Cosmic => true,
            TokenKind::Ident(_) => {
                matches!(self.peek_next_kind(), Some(TokenKind::Ident(_)))
            }
            _ => false,
        }
    }

    // ==================== Statements ====================

    fn parse_block(&mut self) -> Result<Block> {
        let span = self.expect(TokenKind::LBrace)?.span;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            // Statement terminators are optional
            if self.consume(&TokenKind::Semicolon) {
                continue;
            }
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;

        Ok(Block { stmts, span })
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        match self.current_kind() {
            TokenKind::Maya => self.parse_var_decl(false),
            TokenKind::Sankalpa => self.parse_var_decl(true),
            TokenKind::Dharma => self.parse_if(),
            TokenKind::Karma => self.parse_loop(),
            TokenKind::Manifest => self.parse_print(),
            TokenKind::Moksha => self.parse_return(),
            TokenKind::Meditation => self.parse_try_catch(),
            _ => self.parse_expr_or_assign(),
        }
    }

    fn parse_var_decl(&mut self, constant: bool) -> Result<Stmt> {
        let span = self.advance().span;

        let ty = if self.at_type_annotation() {
            Some(self.parse_type()?)
        } else {
            None
        };
        let name = self.parse_ident()?;

        self.expect(TokenKind::Eq)?;
        let value = self.parse_expr()?;

        Ok(Stmt::Var { name, ty, value, constant, span })
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        let span = self.expect(TokenKind::Dharma)?.span;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;

        let then_block = self.parse_block()?;

        // An else clause only ever attaches here, to the dharma it follows
        let else_block = if self.consume(&TokenKind::Adharma) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::If { cond, then_block, else_block, span })
    }

    fn parse_loop(&mut self) -> Result<Stmt> {
        let span = self.expect(TokenKind::Karma)?.span;

        if self.consume(&TokenKind::While) {
            self.expect(TokenKind::LParen)?;
            let cond = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_block()?;
            return Ok(Stmt::WhileLoop { cond, body, span });
        }

        let var = self.parse_ident()?;
        if self.consume(&TokenKind::From) {
            let from = self.parse_expr()?;
            self.expect(TokenKind::To)?;
            let to = self.parse_expr()?;
            let body = self.parse_block()?;
            Ok(Stmt::RangeLoop { var, from, to, body, span })
        } else if self.consume(&TokenKind::In) {
            let iter = self.parse_expr()?;
            let body = self.parse_block()?;
            Ok(Stmt::ForIn { var, iter, body, span })
        } else {
            Err(self.unexpected("'while', 'from', or 'in'"))
        }
    }

    fn parse_print(&mut self) -> Result<Stmt> {
        let span = self.expect(TokenKind::Manifest)?.span;
        let expr = self.parse_expr()?;
        Ok(Stmt::Print { expr, span })
    }

    fn parse_return(&mut self) -> Result<Stmt> {
        let span = self.expect(TokenKind::Moksha)?.span;
        let value = if self.current_kind().starts_expr() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Stmt::Return { value, span })
    }

    fn parse_try_catch(&mut self) -> Result<Stmt> {
        let span = self.expect(TokenKind::Meditation)?.span;
        let try_block = self.parse_block()?;

        self.expect(TokenKind::Disturbance)?;
        self.expect(TokenKind::LParen)?;
        let err_name = self.parse_ident()?;
        self.expect(TokenKind::RParen)?;
        let catch_block = self.parse_block()?;

        Ok(Stmt::TryCatch { try_block, err_name, catch_block, span })
    }

    /// An identifier-led statement parses one expression; a following `=`
    /// reinterprets it as the target of an assignment.
    fn parse_expr_or_assign(&mut self) -> Result<Stmt> {
        let expr = self.parse_expr()?;

        if self.check(&TokenKind::Eq) {
            let span = self.advance().span;
            let target = Self::expr_to_lvalue(expr)?;
            let value = self.parse_expr()?;
            Ok(Stmt::Assign { target, value, span })
        } else {
            Ok(Stmt::Expr(expr))
        }
    }

    /// Reinterpret a parsed expression as an assignment target
    fn expr_to_lvalue(expr: Expr) -> Result<LValue> {
        match expr {
            Expr::Ident(id) => Ok(LValue::Ident(id)),
            Expr::Index { base, index, span } => Ok(LValue::Index {
                base: Box::new(Self::expr_to_lvalue(*base)?),
                index: *index,
                span,
            }),
            Expr::Field { base, field, span } => Ok(LValue::Field {
                base: Box::new(Self::expr_to_lvalue(*base)?),
                field,
                span,
            }),
            other => Err(Error::InvalidAssignTarget { span: other.span() }),
        }
    }

    // ==================== Expressions ====================

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_expr_bp(0)
    }

    /// Parse an expression with a minimum binding power
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let Some(bp) = self.current_kind().binary_precedence() else {
                break;
            };
            if bp < min_bp {
                break;
            }

            let op_token = self.advance();
            let op = Self::token_to_binop(&op_token.kind);
            let right = self.parse_expr_bp(bp + 1)?;
            let span = left.span();
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn token_to_binop(kind: &TokenKind) -> BinOp {
        match kind {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Percent => BinOp::Mod,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::Ne => BinOp::Ne,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Le => BinOp::Le,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::Ge => BinOp::Ge,
            _ => unreachable!("binary_precedence admits only binary operators"),
        }
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let span = self.current().span;
        let op = match self.current_kind() {
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Not => Some(UnOp::Not),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let expr = self.parse_unary()?;
            return Ok(Expr::Unary { op, expr: Box::new(expr), span });
        }

        self.parse_postfix()
    }

    /// Parse a primary followed by any chain of calls, indexing, and
    /// field accesses.
    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.current_kind() {
                TokenKind::LParen => {
                    // Only identifiers and field chains are callable
                    if !matches!(expr, Expr::Ident(_) | Expr::Field { .. }) {
                        return Err(Error::InvalidCallTarget { span: expr.span() });
                    }
                    let span = self.advance().span;
                    let mut args = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        args.push(self.parse_expr()?);
                        while self.consume(&TokenKind::Comma) {
                            args.push(self.parse_expr()?);
                        }
                    }
                    self.expect(TokenKind::RParen)?;
                    expr = Expr::Call { callee: Box::new(expr), args, span };
                }
                TokenKind::LBracket => {
                    let span = self.advance().span;
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                        span,
                    };
                }
                TokenKind::Dot => {
                    let span = self.advance().span;
                    let field = self.parse_ident()?;
                    expr = Expr::Field { base: Box::new(expr), field, span };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let span = self.current().span;
        match self.current_kind().clone() {
            TokenKind::IntLit(v) => {
                self.advance();
                Ok(Expr::Literal(Literal::Int(v, span)))
            }
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(Expr::Literal(Literal::Str(s, span)))
            }
            TokenKind::BoolLit(b) => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(b, span)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Ident(Ident { name, span }))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(&TokenKind::RBracket) {
                    elements.push(self.parse_expr()?);
                    while self.consume(&TokenKind::Comma) {
                        elements.push(self.parse_expr()?);
                    }
                }
                self.expect(TokenKind::RBracket)?;
                Ok(Expr::Array { elements, span })
            }
            _ => Err(self.unexpected("expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer;

    fn parse_source(source: &str) -> Result<Program> {
        let mut parser = Parser::from_tokens(lexer::tokenize(source).unwrap());
        parser.parse_program()
    }

    fn entry_stmts(program: &Program) -> &[Stmt] {
        for item in &program.items {
            if let Item::Entry(entry) = item {
                return &entry.body.stmts;
            }
        }
        panic!("no entry block");
    }

    #[test]
    fn test_function_signature() {
        let program = parse_source(
            "shloka add(sattva a, sattva b) -> sattva { moksha a + b }",
        )
        .unwrap();

        let Item::Function(f) = &program.items[0] else {
            panic!("expected function");
        };
        assert_eq!(f.name.name, "add");
        assert_eq!(f.params.len(), 2);
        assert!(matches!(f.params[0].ty, Type::Scalar(ScalarType::Sattva, _)));
        assert!(matches!(f.ret_type, Some(Type::Scalar(ScalarType::Sattva, _))));
        assert!(matches!(f.body.stmts[0], Stmt::Return { value: Some(_), .. }));
    }

    #[test]
    fn test_namespace_members() {
        let program = parse_source(
            "yuga Math { shloka double(sattva n) -> sattva { moksha n * 2 } }",
        )
        .unwrap();

        let Item::Namespace(ns) = &program.items[0] else {
            panic!("expected namespace");
        };
        assert_eq!(ns.name.name, "Math");
        assert_eq!(ns.members.len(), 1);
    }

    #[test]
    fn test_namespace_rejects_non_functions() {
        let err = parse_source("yuga Bad { maya x = 1 }").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { .. }));
    }

    #[test]
    fn test_range_loop() {
        let program = parse_source("arjuna { karma i from 1 to 10 { manifest i } }").unwrap();

        let Stmt::RangeLoop { var, from, to, .. } = &entry_stmts(&program)[0] else {
            panic!("expected range loop");
        };
        assert_eq!(var.name, "i");
        assert!(matches!(from, Expr::Literal(Literal::Int(1, _))));
        assert!(matches!(to, Expr::Literal(Literal::Int(10, _))));
    }

    #[test]
    fn test_while_and_for_in_loops() {
        let program = parse_source(
            "arjuna { karma while (x < 3) { x = x + 1 } karma n in nums { manifest n } }",
        )
        .unwrap();

        let stmts = entry_stmts(&program);
        assert!(matches!(stmts[0], Stmt::WhileLoop { .. }));
        assert!(matches!(stmts[1], Stmt::ForIn { .. }));
    }

    #[test]
    fn test_else_attaches_to_nearest_if() {
        let program = parse_source(
            "arjuna { dharma (a) { dharma (b) { manifest 1 } adharma { manifest 2 } } }",
        )
        .unwrap();

        let Stmt::If { then_block, else_block, .. } = &entry_stmts(&program)[0] else {
            panic!("expected if");
        };
        assert!(else_block.is_none());
        assert!(matches!(
            then_block.stmts[0],
            Stmt::If { else_block: Some(_), .. }
        ));
    }

    #[test]
    fn test_precedence() {
        let program = parse_source("arjuna { manifest 1 + 2 * 3 == 7 }").unwrap();

        // ((1 + (2 * 3)) == 7)
        let Stmt::Print { expr, .. } = &entry_stmts(&program)[0] else {
            panic!("expected print");
        };
        let Expr::Binary { op: BinOp::Eq, left, .. } = expr else {
            panic!("expected equality at the root, got {expr:?}");
        };
        let Expr::Binary { op: BinOp::Add, right, .. } = left.as_ref() else {
            panic!("expected addition under equality");
        };
        assert!(matches!(right.as_ref(), Expr::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn test_assignment_targets() {
        let program = parse_source("arjuna { x = 1 nums[0] = 2 p.x = 3 }").unwrap();

        let stmts = entry_stmts(&program);
        assert!(matches!(
            &stmts[0],
            Stmt::Assign { target: LValue::Ident(id), .. } if id.name == "x"
        ));
        assert!(matches!(&stmts[1], Stmt::Assign { target: LValue::Index { .. }, .. }));
        assert!(matches!(&stmts[2], Stmt::Assign { target: LValue::Field { .. }, .. }));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = parse_source("arjuna { f() = 1 }").unwrap_err();
        assert!(matches!(err, Error::InvalidAssignTarget { .. }));
    }

    #[test]
    fn test_call_targets() {
        let program = parse_source("arjuna { greet(\"om\") Math.add(1, 2) }").unwrap();

        let stmts = entry_stmts(&program);
        assert!(matches!(&stmts[0], Stmt::Expr(Expr::Call { .. })));
        let Stmt::Expr(Expr::Call { callee, args, .. }) = &stmts[1] else {
            panic!("expected call");
        };
        assert!(matches!(callee.as_ref(), Expr::Field { .. }));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_array_literal_and_index() {
        let program = parse_source("arjuna { maya nums = [1, 2, 3] manifest nums[0] }").unwrap();

        let stmts = entry_stmts(&program);
        let Stmt::Var { value: Expr::Array { elements, .. }, .. } = &stmts[0] else {
            panic!("expected array literal");
        };
        assert_eq!(elements.len(), 3);
        assert!(matches!(&stmts[1], Stmt::Print { expr: Expr::Index { .. }, .. }));
    }

    #[test]
    fn test_cosmic_array_type() {
        let program = parse_source("arjuna { maya cosmic sattva[] nums = [] }").unwrap();

        let Stmt::Var { ty: Some(Type::Array { dims, elem, .. }), .. } = &entry_stmts(&program)[0]
        else {
            panic!("expected typed array declaration");
        };
        assert_eq!(*dims, 1);
        assert!(matches!(elem.as_ref(), Type::Scalar(ScalarType::Sattva, _)));
    }

    #[test]
    fn test_named_type_is_opaque() {
        let program = parse_source(
            "shloka link(Node parent) -> Node { moksha parent } arjuna { }",
        )
        .unwrap();

        let Item::Function(f) = &program.items[0] else {
            panic!("expected function");
        };
        assert!(matches!(&f.params[0].ty, Type::Named(n, _) if n == "Node"));
        assert!(matches!(&f.ret_type, Some(Type::Named(n, _)) if n == "Node"));
    }

    #[test]
    fn test_bare_return() {
        let program = parse_source("shloka quit() { moksha }\narjuna { }").unwrap();

        let Item::Function(f) = &program.items[0] else {
            panic!("expected function");
        };
        assert!(matches!(f.body.stmts[0], Stmt::Return { value: None, .. }));
    }

    #[test]
    fn test_try_catch() {
        let program = parse_source(
            "arjuna { meditation { manifest 1 } disturbance (err) { manifest err } }",
        )
        .unwrap();

        let Stmt::TryCatch { err_name, .. } = &entry_stmts(&program)[0] else {
            panic!("expected try/catch");
        };
        assert_eq!(err_name.name, "err");
    }

    #[test]
    fn test_error_position_reported() {
        let err = parse_source("arjuna {\n  dharma 1 { }\n}").unwrap_err();
        let Error::UnexpectedToken { expected, span, .. } = err else {
            panic!("expected syntax error");
        };
        assert_eq!(expected, "'('");
        assert_eq!(span, Span::new(2, 10));
    }

    #[test]
    fn test_top_level_rejects_statements() {
        let err = parse_source("manifest 1").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { .. }));
    }
}
