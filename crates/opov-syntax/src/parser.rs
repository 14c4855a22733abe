//! Recursive descent parser for the JavaScript subset.
//!
//! Statements are parsed by recursive descent; expressions by precedence
//! climbing over [`TokenKind::binary_precedence`], with assignment,
//! conditional, and arrow functions layered on top. Parentheses are not kept
//! in the tree: the printer re-derives them from precedence.
//!
//! Automatic semicolon insertion follows the usual rules: a statement ends
//! at `;`, before `}`, at end of input, or before a token on a new line.
//! Postfix `++`/`--` and the operand of `return` must stay on the same line.
//!
//! Nesting is bounded by [`MAX_NESTING_DEPTH`]. Nested statements and
//! expressions count one level each, and so does every link of a
//! left-associative operator, call, or member chain, since each link nests
//! the tree one level deeper. Everything downstream (passes, printer,
//! evaluator) walks the tree recursively and relies on this bound.

use crate::ast::{
    ArrowBody, ArrowFunction, AssignOp, BinaryOp, Block, Declarator, Directive, Expr, Fixity,
    ForInit, Function, ImportDecl, MemberProp, Program, PropKey, Property, Stmt, UnaryOp,
    UpdateOp, VarDecl, VarKind,
};
use crate::error::{ParserError, ParserResult};
use crate::span::{Span, Spanned};
use crate::token::{Token, TokenKind};
use opov_mem::{StringInterner, Symbol};

/// Minimum precedence for parsing binary operators.
const MIN_PRECEDENCE: u8 = 1;

/// Default limit on syntactic nesting.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parser over a lexed token stream.
pub struct Parser {
    /// Token stream from the lexer, always terminated by `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Interner that resolves the tokens' symbols
    interner: StringInterner,
    /// Current nesting depth
    depth: usize,
    /// Nesting limit
    max_depth: usize,
}

impl Parser {
    /// Creates a new parser.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>, interner: StringInterner) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::EOF) {
            let end = tokens.last().map_or(Span::point(0, 1, 1), |t| t.span);
            tokens.push(Token::new(
                TokenKind::EOF,
                Span::point(end.end, end.end_line, end.end_col),
            ));
        }
        Self {
            tokens,
            pos: 0,
            interner,
            depth: 0,
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    /// Sets the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Consumes the parser and returns its interner.
    #[must_use]
    pub fn into_interner(self) -> StringInterner {
        self.interner
    }

    /// Returns a reference to the interner.
    #[must_use]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    fn current(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens[(self.pos + offset).min(self.tokens.len() - 1)].kind
    }

    fn bump(&mut self) -> Token {
        let token = self.current();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn prev_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .map_or_else(|| self.current().span, |idx| self.tokens[idx].span)
    }

    fn span_from(&self, start: Span) -> Span {
        Span::merge(start, self.prev_span())
    }

    /// Checks if the current token matches the given kind.
    #[must_use]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn is_at_eof(&self) -> bool {
        self.check(TokenKind::EOF)
    }

    fn unexpected(&self, expected: &[&str]) -> ParserError {
        let token = self.current();
        ParserError::UnexpectedToken {
            expected: expected.iter().map(ToString::to_string).collect(),
            found: token.kind.to_string(),
            span: token.span,
        }
    }

    /// Expects the current token to be of the given kind.
    fn expect(&mut self, kind: TokenKind) -> ParserResult<Span> {
        if self.check(kind) {
            Ok(self.bump().span)
        } else {
            Err(self.unexpected(&[&kind.to_string()]))
        }
    }

    /// Expects a closing delimiter, reporting a missing one at end of input.
    fn expect_closing(&mut self, kind: TokenKind, delimiter: &str) -> ParserResult<Span> {
        if self.is_at_eof() {
            return Err(ParserError::MissingDelimiter {
                delimiter: delimiter.to_string(),
                span: self.current().span,
            });
        }
        self.expect(kind)
    }

    fn expect_identifier(&mut self) -> ParserResult<Symbol> {
        match self.kind() {
            TokenKind::Ident(name) => {
                self.bump();
                Ok(name)
            }
            _ => Err(self.unexpected(&["identifier"])),
        }
    }

    /// Identifier or keyword, as after `.` in a member expression.
    fn expect_property_name(&mut self) -> ParserResult<Symbol> {
        let kind = self.kind();
        if let TokenKind::Ident(name) = kind {
            self.bump();
            return Ok(name);
        }
        if let Some(text) = kind.keyword_text() {
            self.bump();
            return Ok(self.interner.intern(text));
        }
        Err(self.unexpected(&["property name"]))
    }

    /// Enters one more level of nesting.
    fn descend(&mut self) -> ParserResult<()> {
        if self.depth >= self.max_depth {
            return Err(ParserError::NestingTooDeep {
                limit: self.max_depth,
                span: self.current().span,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParserResult<T>) -> ParserResult<T> {
        self.descend()?;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Runs a chain parser, releasing the levels its links took.
    fn chain<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParserResult<T>) -> ParserResult<T> {
        let depth = self.depth;
        let result = parse(self);
        self.depth = depth;
        result
    }

    /// Ends a statement: `;`, or an inserted semicolon before `}`, at end of
    /// input, or at a line break.
    fn consume_semicolon(&mut self) -> ParserResult<()> {
        if self.eat(TokenKind::Semicolon) {
            return Ok(());
        }
        let token = self.current();
        if matches!(token.kind, TokenKind::RBrace | TokenKind::EOF) || token.newline_before {
            return Ok(());
        }
        Err(self.unexpected(&["';'"]))
    }

    // ===== Program and statements =====

    /// Parses a whole compile unit.
    ///
    /// # Errors
    ///
    /// Returns the first syntax error.
    pub fn parse_program(&mut self) -> ParserResult<Program> {
        let start = self.current().span;
        let directives = self.parse_directives()?;

        let mut body = Vec::new();
        while !self.is_at_eof() {
            body.push(self.parse_stmt()?);
        }

        Ok(Program {
            directives,
            body,
            span: Span::merge(start, self.current().span),
        })
    }

    /// Parses the directive prologue: leading string-literal statements.
    fn parse_directives(&mut self) -> ParserResult<Vec<Directive>> {
        let mut directives = Vec::new();
        while let TokenKind::StringLiteral(value) = self.kind() {
            if !self.string_is_whole_statement() {
                break;
            }
            let span = self.bump().span;
            self.consume_semicolon()?;
            directives.push(Directive { value, span });
        }
        Ok(directives)
    }

    /// Returns `true` if the string literal at the cursor is a statement on
    /// its own rather than the start of a larger expression.
    fn string_is_whole_statement(&self) -> bool {
        let next = self.tokens[(self.pos + 1).min(self.tokens.len() - 1)];
        match next.kind {
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::EOF => true,
            kind => {
                next.newline_before
                    && kind.binary_precedence().is_none()
                    && !kind.is_assign_op()
                    && !matches!(
                        kind,
                        TokenKind::Dot
                            | TokenKind::LBracket
                            | TokenKind::LParen
                            | TokenKind::Question
                            | TokenKind::Comma
                    )
            }
        }
    }

    fn parse_stmt(&mut self) -> ParserResult<Stmt> {
        self.nested(Self::parse_stmt_kind)
    }

    fn parse_stmt_kind(&mut self) -> ParserResult<Stmt> {
        match self.kind() {
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let decl = self.parse_var_decl()?;
                self.consume_semicolon()?;
                Ok(Stmt::VarDecl(decl))
            }
            TokenKind::Function => Ok(Stmt::Function(self.parse_function(true)?)),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break | TokenKind::Continue => {
                let token = self.bump();
                self.consume_semicolon()?;
                Ok(if token.kind == TokenKind::Break {
                    Stmt::Break { span: token.span }
                } else {
                    Stmt::Continue { span: token.span }
                })
            }
            TokenKind::Import => self.parse_import(),
            TokenKind::Semicolon => Ok(Stmt::Empty {
                span: self.bump().span,
            }),
            _ => {
                let start = self.current().span;
                let expr = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(Stmt::Expr {
                    expr,
                    span: self.span_from(start),
                })
            }
        }
    }

    /// Parses `{ directives; statements }`.
    fn parse_block(&mut self) -> ParserResult<Block> {
        let start = self.expect(TokenKind::LBrace)?;
        let directives = self.parse_directives()?;

        let mut body = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_eof() {
            body.push(self.parse_stmt()?);
        }
        self.expect_closing(TokenKind::RBrace, "}")?;

        Ok(Block {
            directives,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_var_decl(&mut self) -> ParserResult<VarDecl> {
        let token = self.bump();
        let kind = match token.kind {
            TokenKind::Var => VarKind::Var,
            TokenKind::Let => VarKind::Let,
            _ => VarKind::Const,
        };

        let mut declarators = Vec::new();
        loop {
            let start = self.current().span;
            let name = self.expect_identifier()?;
            let init = if self.eat(TokenKind::Eq) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            declarators.push(Declarator {
                name,
                init,
                span: self.span_from(start),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        Ok(VarDecl {
            kind,
            declarators,
            span: self.span_from(token.span),
        })
    }

    fn parse_if_stmt(&mut self) -> ParserResult<Stmt> {
        let start = self.bump().span;
        self.expect(TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.expect_closing(TokenKind::RParen, ")")?;
        let consequent = Box::new(self.parse_stmt()?);
        let alternate = if self.eat(TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };

        Ok(Stmt::If {
            test,
            consequent,
            alternate,
            span: self.span_from(start),
        })
    }

    fn parse_while_stmt(&mut self) -> ParserResult<Stmt> {
        let start = self.bump().span;
        self.expect(TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.expect_closing(TokenKind::RParen, ")")?;
        let body = Box::new(self.parse_stmt()?);

        Ok(Stmt::While {
            test,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_for_stmt(&mut self) -> ParserResult<Stmt> {
        let start = self.bump().span;
        self.expect(TokenKind::LParen)?;

        let init = match self.kind() {
            TokenKind::Semicolon => None,
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                Some(ForInit::VarDecl(self.parse_var_decl()?))
            }
            _ => Some(ForInit::Expr(self.parse_expression()?)),
        };
        self.expect(TokenKind::Semicolon)?;

        let test = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semicolon)?;

        let update = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_closing(TokenKind::RParen, ")")?;

        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::For {
            init,
            test,
            update,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_return_stmt(&mut self) -> ParserResult<Stmt> {
        let start = self.bump().span;
        let next = self.current();
        let value = if matches!(
            next.kind,
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::EOF
        ) || next.newline_before
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;

        Ok(Stmt::Return {
            value,
            span: self.span_from(start),
        })
    }

    /// Parses `import "m";` or `import name from "m";`.
    fn parse_import(&mut self) -> ParserResult<Stmt> {
        let start = self.bump().span;

        let default = match self.kind() {
            TokenKind::Ident(name) => {
                self.bump();
                match self.kind() {
                    TokenKind::Ident(word) if self.interner.resolve(word) == Some("from") => {
                        self.bump();
                    }
                    _ => return Err(self.unexpected(&["'from'"])),
                }
                Some(name)
            }
            _ => None,
        };

        let TokenKind::StringLiteral(source) = self.kind() else {
            return Err(self.unexpected(&["module specifier"]));
        };
        self.bump();
        self.consume_semicolon()?;

        Ok(Stmt::Import(ImportDecl {
            default,
            source,
            span: self.span_from(start),
        }))
    }

    /// Parses `function name(params) { body }`; the name is required for
    /// declarations.
    fn parse_function(&mut self, is_decl: bool) -> ParserResult<Function> {
        let start = self.expect(TokenKind::Function)?;
        let name = match self.kind() {
            TokenKind::Ident(name) => {
                self.bump();
                Some(name)
            }
            _ if is_decl => return Err(self.unexpected(&["identifier"])),
            _ => None,
        };
        let params = self.parse_params()?;
        let body = self.parse_block()?;

        Ok(Function {
            name,
            params,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_params(&mut self) -> ParserResult<Vec<Symbol>> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) {
            params.push(self.expect_identifier()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing(TokenKind::RParen, ")")?;
        Ok(params)
    }

    // ===== Expressions =====

    /// Parses a full expression, including comma sequences.
    ///
    /// # Errors
    ///
    /// Returns the first syntax error.
    pub fn parse_expression(&mut self) -> ParserResult<Expr> {
        let start = self.current().span;
        let first = self.parse_assignment()?;
        if !self.check(TokenKind::Comma) {
            return Ok(first);
        }

        let mut exprs = vec![first];
        while self.eat(TokenKind::Comma) {
            exprs.push(self.parse_assignment()?);
        }
        Ok(Expr::Sequence {
            exprs,
            span: self.span_from(start),
        })
    }

    fn parse_assignment(&mut self) -> ParserResult<Expr> {
        self.nested(Self::parse_assignment_expr)
    }

    fn parse_assignment_expr(&mut self) -> ParserResult<Expr> {
        if self.is_arrow_start() {
            return self.parse_arrow();
        }

        let start = self.current().span;
        let left = self.parse_conditional()?;

        let Some(op) = assign_op(self.kind()) else {
            return Ok(left);
        };
        if !left.is_valid_target() {
            return Err(ParserError::InvalidAssignmentTarget { span: left.span() });
        }
        self.bump();
        let value = self.parse_assignment()?;

        Ok(Expr::Assign {
            op,
            target: Box::new(left),
            value: Box::new(value),
            span: self.span_from(start),
        })
    }

    /// Looks ahead for `ident =>` or `( ... ) =>`.
    fn is_arrow_start(&self) -> bool {
        match self.kind() {
            TokenKind::Ident(_) => self.peek_kind(1) == TokenKind::FatArrow,
            TokenKind::LParen => {
                let mut depth = 0usize;
                let mut offset = 0;
                loop {
                    match self.peek_kind(offset) {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => {
                            depth -= 1;
                            if depth == 0 {
                                return self.peek_kind(offset + 1) == TokenKind::FatArrow;
                            }
                        }
                        TokenKind::EOF => return false,
                        _ => {}
                    }
                    offset += 1;
                }
            }
            _ => false,
        }
    }

    fn parse_arrow(&mut self) -> ParserResult<Expr> {
        let start = self.current().span;
        let params = if let TokenKind::Ident(name) = self.kind() {
            self.bump();
            vec![name]
        } else {
            self.parse_params()?
        };
        self.expect(TokenKind::FatArrow)?;

        let body = if self.check(TokenKind::LBrace) {
            ArrowBody::Block(self.parse_block()?)
        } else {
            ArrowBody::Expr(Box::new(self.parse_assignment()?))
        };

        Ok(Expr::Arrow(Box::new(ArrowFunction {
            params,
            body,
            span: self.span_from(start),
        })))
    }

    fn parse_conditional(&mut self) -> ParserResult<Expr> {
        let start = self.current().span;
        let test = self.parse_binary(MIN_PRECEDENCE)?;
        if !self.eat(TokenKind::Question) {
            return Ok(test);
        }

        let consequent = self.parse_assignment()?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_assignment()?;

        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span: self.span_from(start),
        })
    }

    /// Precedence climbing over binary operators. `**` is right-associative;
    /// everything else associates to the left.
    fn parse_binary(&mut self, min_precedence: u8) -> ParserResult<Expr> {
        self.chain(|parser| parser.parse_binary_links(min_precedence))
    }

    fn parse_binary_links(&mut self, min_precedence: u8) -> ParserResult<Expr> {
        let start = self.current().span;
        let unary_base = unary_op(self.kind()).is_some();
        let mut left = self.parse_unary()?;

        loop {
            let kind = self.kind();
            let (Some(precedence), Some(op)) = (kind.binary_precedence(), binary_op(kind)) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            // `-a ** b` is ambiguous and rejected; `(-a) ** b` is fine.
            if op == BinaryOp::Exp && unary_base && matches!(left, Expr::Unary { .. }) {
                return Err(ParserError::UnaryBeforeExponent { span: left.span() });
            }
            self.bump();
            self.descend()?;

            let next_min = if op == BinaryOp::Exp {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_binary(next_min)?;
            left = Expr::binary(op, left, right, self.span_from(start));
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParserResult<Expr> {
        let start = self.current().span;
        let kind = self.kind();

        if let Some(op) = unary_op(kind) {
            self.bump();
            let operand = self.nested(Self::parse_unary)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                span: self.span_from(start),
            });
        }

        if let Some(op) = update_op(kind) {
            self.bump();
            let target = self.nested(Self::parse_unary)?;
            if !target.is_valid_target() {
                return Err(ParserError::InvalidAssignmentTarget {
                    span: target.span(),
                });
            }
            return Ok(Expr::Update {
                op,
                fixity: Fixity::Prefix,
                target: Box::new(target),
                span: self.span_from(start),
            });
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> ParserResult<Expr> {
        let start = self.current().span;
        let expr = self.parse_call_member()?;

        let token = self.current();
        let Some(op) = update_op(token.kind) else {
            return Ok(expr);
        };
        if token.newline_before {
            return Ok(expr);
        }
        if !expr.is_valid_target() {
            return Err(ParserError::InvalidAssignmentTarget { span: expr.span() });
        }
        self.bump();

        Ok(Expr::Update {
            op,
            fixity: Fixity::Postfix,
            target: Box::new(expr),
            span: self.span_from(start),
        })
    }

    fn parse_call_member(&mut self) -> ParserResult<Expr> {
        self.chain(Self::parse_call_member_links)
    }

    fn parse_call_member_links(&mut self) -> ParserResult<Expr> {
        let start = self.current().span;
        let mut expr = if self.check(TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            if matches!(self.kind(), TokenKind::Dot | TokenKind::LBracket | TokenKind::LParen) {
                self.descend()?;
            }
            match self.kind() {
                TokenKind::Dot | TokenKind::LBracket => {
                    expr = self.parse_member_suffix(expr, start)?;
                }
                TokenKind::LParen => {
                    let args = self.parse_arguments()?;
                    expr = Expr::call(expr, args, self.span_from(start));
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_member_suffix(&mut self, object: Expr, start: Span) -> ParserResult<Expr> {
        if self.eat(TokenKind::Dot) {
            let name = self.expect_property_name()?;
            return Ok(Expr::member(object, name, self.span_from(start)));
        }

        self.expect(TokenKind::LBracket)?;
        let key = self.parse_expression()?;
        self.expect_closing(TokenKind::RBracket, "]")?;
        Ok(Expr::Member {
            object: Box::new(object),
            property: MemberProp::Computed(Box::new(key)),
            span: self.span_from(start),
        })
    }

    /// `new Callee(args)`; the callee is a member chain without calls.
    fn parse_new(&mut self) -> ParserResult<Expr> {
        self.chain(Self::parse_new_links)
    }

    fn parse_new_links(&mut self) -> ParserResult<Expr> {
        let start = self.expect(TokenKind::New)?;
        let mut callee = if self.check(TokenKind::New) {
            self.nested(Self::parse_new)?
        } else {
            self.parse_primary()?
        };
        while matches!(self.kind(), TokenKind::Dot | TokenKind::LBracket) {
            self.descend()?;
            callee = self.parse_member_suffix(callee, start)?;
        }

        let args = if self.check(TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Expr::New {
            callee: Box::new(callee),
            args,
            span: self.span_from(start),
        })
    }

    fn parse_arguments(&mut self) -> ParserResult<Vec<Expr>> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) {
            args.push(self.parse_assignment()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing(TokenKind::RParen, ")")?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> ParserResult<Expr> {
        let token = self.current();
        let span = token.span;

        let expr = match token.kind {
            TokenKind::NumberLiteral(raw) => Expr::Number { raw, span },
            TokenKind::StringLiteral(value) => Expr::String { value, span },
            TokenKind::BoolLiteral(value) => Expr::Bool { value, span },
            TokenKind::Null => Expr::Null { span },
            TokenKind::Ident(name) => Expr::Identifier { name, span },
            TokenKind::This => Expr::This { span },
            TokenKind::LParen => {
                self.bump();
                let inner = self.nested(Self::parse_expression)?;
                self.expect_closing(TokenKind::RParen, ")")?;
                return Ok(inner);
            }
            TokenKind::LBracket => return self.parse_array(),
            TokenKind::LBrace => return self.parse_object(),
            TokenKind::Function => return Ok(Expr::Function(Box::new(self.parse_function(false)?))),
            _ => return Err(ParserError::ExpectedExpression { span }),
        };

        self.bump();
        Ok(expr)
    }

    fn parse_array(&mut self) -> ParserResult<Expr> {
        let start = self.expect(TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while !self.check(TokenKind::RBracket) {
            elements.push(self.parse_assignment()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing(TokenKind::RBracket, "]")?;

        Ok(Expr::Array {
            elements,
            span: self.span_from(start),
        })
    }

    fn parse_object(&mut self) -> ParserResult<Expr> {
        let start = self.expect(TokenKind::LBrace)?;
        let mut props = Vec::new();
        while !self.check(TokenKind::RBrace) {
            props.push(self.parse_property()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing(TokenKind::RBrace, "}")?;

        Ok(Expr::Object {
            props,
            span: self.span_from(start),
        })
    }

    fn parse_property(&mut self) -> ParserResult<Property> {
        let start = self.current().span;
        let kind = self.kind();

        let key = match kind {
            TokenKind::StringLiteral(value) => {
                self.bump();
                PropKey::String(value)
            }
            TokenKind::NumberLiteral(raw) => {
                self.bump();
                PropKey::Number(raw)
            }
            TokenKind::LBracket => {
                self.bump();
                let key = self.parse_assignment()?;
                self.expect_closing(TokenKind::RBracket, "]")?;
                PropKey::Computed(Box::new(key))
            }
            _ => PropKey::Named(self.expect_property_name()?),
        };

        if self.check(TokenKind::LParen) {
            let fn_start = self.current().span;
            let params = self.parse_params()?;
            let body = self.parse_block()?;
            let value = Expr::Function(Box::new(Function {
                name: None,
                params,
                body,
                span: self.span_from(fn_start),
            }));
            return Ok(Property {
                key,
                value,
                method: true,
                span: self.span_from(start),
            });
        }

        let value = if self.eat(TokenKind::Colon) {
            self.parse_assignment()?
        } else if let (PropKey::Named(name), TokenKind::Ident(_)) = (&key, kind) {
            // `{ x }` shorthand
            Expr::Identifier { name: *name, span: start }
        } else {
            return Err(self.unexpected(&["':'"]));
        };

        Ok(Property {
            key,
            value,
            method: false,
            span: self.span_from(start),
        })
    }
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        TokenKind::StarStar => BinaryOp::Exp,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::UShr => BinaryOp::UShr,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::Le,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::Ge,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::BangEq => BinaryOp::NotEq,
        TokenKind::EqEqEq => BinaryOp::StrictEq,
        TokenKind::BangEqEq => BinaryOp::StrictNotEq,
        TokenKind::AmpAmp => BinaryOp::And,
        TokenKind::PipePipe => BinaryOp::Or,
        TokenKind::QuestionQuestion => BinaryOp::Nullish,
        TokenKind::In => BinaryOp::In,
        TokenKind::Instanceof => BinaryOp::InstanceOf,
        _ => return None,
    })
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Rem,
        TokenKind::StarStarEq => AssignOp::Exp,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        TokenKind::ShlEq => AssignOp::Shl,
        TokenKind::ShrEq => AssignOp::Shr,
        TokenKind::UShrEq => AssignOp::UShr,
        TokenKind::AmpAmpEq => AssignOp::And,
        TokenKind::PipePipeEq => AssignOp::Or,
        TokenKind::QuestionQuestionEq => AssignOp::Nullish,
        _ => return None,
    })
}

fn unary_op(kind: TokenKind) -> Option<UnaryOp> {
    Some(match kind {
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Minus => UnaryOp::Minus,
        TokenKind::Tilde => UnaryOp::BitNot,
        TokenKind::Bang => UnaryOp::Not,
        TokenKind::Typeof => UnaryOp::Typeof,
        TokenKind::Void => UnaryOp::Void,
        TokenKind::Delete => UnaryOp::Delete,
        _ => return None,
    })
}

fn update_op(kind: TokenKind) -> Option<UpdateOp> {
    match kind {
        TokenKind::PlusPlus => Some(UpdateOp::Increment),
        TokenKind::MinusMinus => Some(UpdateOp::Decrement),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> (Program, StringInterner) {
        let (tokens, interner) = Lexer::new(source).lex_with_interner().unwrap();
        let mut parser = Parser::new(tokens, interner);
        let program = parser.parse_program().unwrap();
        (program, parser.into_interner())
    }

    fn parse_err(source: &str) -> ParserError {
        let (tokens, interner) = Lexer::new(source).lex_with_interner().unwrap();
        Parser::new(tokens, interner).parse_program().unwrap_err()
    }

    fn expr_of(program: &Program) -> &Expr {
        match &program.body[0] {
            Stmt::Expr { expr, .. } => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_binary_precedence() {
        let (program, _) = parse("a + b * c;");
        let Expr::Binary { op, right, .. } = expr_of(&program) else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(**right, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_parse_left_associative() {
        let (program, _) = parse("a - b - c;");
        let Expr::Binary { left, .. } = expr_of(&program) else {
            panic!("expected binary");
        };
        assert!(matches!(**left, Expr::Binary { op: BinaryOp::Sub, .. }));
    }

    #[test]
    fn test_parse_exponent_right_associative() {
        let (program, _) = parse("a ** b ** c;");
        let Expr::Binary { op, left, right, .. } = expr_of(&program) else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Exp);
        assert!(matches!(**left, Expr::Identifier { .. }));
        assert!(matches!(**right, Expr::Binary { op: BinaryOp::Exp, .. }));
    }

    #[test]
    fn test_parse_parens_override_precedence() {
        let (program, _) = parse("(a + b) * c;");
        let Expr::Binary { op, left, .. } = expr_of(&program) else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Mul);
        assert!(matches!(**left, Expr::Binary { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn test_parse_compound_assignment_right_associative() {
        let (program, _) = parse("a += b -= c;");
        let Expr::Assign { op, value, .. } = expr_of(&program) else {
            panic!("expected assignment");
        };
        assert_eq!(*op, AssignOp::Add);
        assert!(matches!(**value, Expr::Assign { op: AssignOp::Sub, .. }));
    }

    #[test]
    fn test_parse_update_fixity() {
        let (program, _) = parse("++a; b--; -c++;");
        assert!(matches!(
            &program.body[0],
            Stmt::Expr { expr: Expr::Update { fixity: Fixity::Prefix, op: UpdateOp::Increment, .. }, .. }
        ));
        assert!(matches!(
            &program.body[1],
            Stmt::Expr { expr: Expr::Update { fixity: Fixity::Postfix, op: UpdateOp::Decrement, .. }, .. }
        ));
        let Stmt::Expr { expr: Expr::Unary { operand, .. }, .. } = &program.body[2] else {
            panic!("expected unary");
        };
        assert!(matches!(**operand, Expr::Update { fixity: Fixity::Postfix, .. }));
    }

    #[test]
    fn test_parse_postfix_needs_same_line() {
        let (program, _) = parse("a\n++b");
        assert_eq!(program.body.len(), 2);
        assert!(matches!(
            &program.body[1],
            Stmt::Expr { expr: Expr::Update { fixity: Fixity::Prefix, .. }, .. }
        ));
    }

    #[test]
    fn test_parse_invalid_targets() {
        assert!(matches!(
            parse_err("a + b = c;"),
            ParserError::InvalidAssignmentTarget { .. }
        ));
        assert!(matches!(
            parse_err("++(a + b);"),
            ParserError::InvalidAssignmentTarget { .. }
        ));
        assert!(matches!(
            parse_err("f()++;"),
            ParserError::InvalidAssignmentTarget { .. }
        ));
    }

    #[test]
    fn test_parse_directives() {
        let (program, interner) = parse("'operator-overload enabled'\n\"use strict\";\nx;");
        assert_eq!(program.directives.len(), 2);
        assert_eq!(
            interner.resolve(program.directives[0].value),
            Some("operator-overload enabled")
        );
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_string_expression_is_not_directive() {
        let (program, _) = parse("'a' + b;");
        assert!(program.directives.is_empty());
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_directive_prologue_ends_at_first_statement() {
        let (program, _) = parse("x; 'not a directive';");
        assert!(program.directives.is_empty());
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_parse_block_directives() {
        let (program, interner) = parse("function f() { 'operator-overload disabled'; return a + b; }");
        let Stmt::Function(func) = &program.body[0] else {
            panic!("expected function");
        };
        assert_eq!(func.body.directives.len(), 1);
        assert_eq!(
            interner.resolve(func.body.directives[0].value),
            Some("operator-overload disabled")
        );
        assert_eq!(func.body.body.len(), 1);
    }

    #[test]
    fn test_parse_arrows() {
        let (program, _) = parse("const f = (a, b) => a + b; const g = x => { return x; }; (() => 1)();");
        let Stmt::VarDecl(decl) = &program.body[0] else {
            panic!("expected declaration");
        };
        let Some(Expr::Arrow(arrow)) = &decl.declarators[0].init else {
            panic!("expected arrow");
        };
        assert_eq!(arrow.params.len(), 2);
        assert!(matches!(arrow.body, ArrowBody::Expr(_)));

        let Stmt::Expr { expr: Expr::Call { callee, .. }, .. } = &program.body[2] else {
            panic!("expected call");
        };
        assert!(matches!(**callee, Expr::Arrow(_)));
    }

    #[test]
    fn test_parse_member_call_new() {
        let (program, interner) = parse("new Point(1, 2).add(o[k]).x;");
        let Expr::Member { object, property: MemberProp::Named(x), .. } = expr_of(&program) else {
            panic!("expected member");
        };
        assert_eq!(interner.resolve(*x), Some("x"));
        let Expr::Call { callee, args, .. } = &**object else {
            panic!("expected call");
        };
        assert!(matches!(args[0], Expr::Member { property: MemberProp::Computed(_), .. }));
        let Expr::Member { object, .. } = &**callee else {
            panic!("expected member");
        };
        assert!(matches!(**object, Expr::New { .. }));
    }

    #[test]
    fn test_parse_keyword_property_names() {
        let (program, interner) = parse("Symbol.for('+');");
        let Expr::Call { callee, .. } = expr_of(&program) else {
            panic!("expected call");
        };
        let Expr::Member { property: MemberProp::Named(name), .. } = &**callee else {
            panic!("expected member");
        };
        assert_eq!(interner.resolve(*name), Some("for"));
    }

    #[test]
    fn test_parse_object_literal() {
        let (program, _) = parse("x = { a: 1, 'b': 2, [k]: 3, m() { return 4; }, y };");
        let Expr::Assign { value, .. } = expr_of(&program) else {
            panic!("expected assignment");
        };
        let Expr::Object { props, .. } = &**value else {
            panic!("expected object");
        };
        assert_eq!(props.len(), 5);
        assert!(matches!(props[1].key, PropKey::String(_)));
        assert!(matches!(props[2].key, PropKey::Computed(_)));
        assert!(props[3].method);
        assert!(matches!(props[4].value, Expr::Identifier { .. }));
    }

    #[test]
    fn test_parse_statements() {
        let (program, _) = parse(
            "import 'operator-overload-polyfills';\n\
             import lib from 'lib';\n\
             let i = 0, j;\n\
             for (let k = 0; k < 3; k++) { if (k) continue; else break; }\n\
             while (i < 10) i += 1;\n\
             ;",
        );
        assert_eq!(program.body.len(), 6);
        assert!(matches!(&program.body[0], Stmt::Import(ImportDecl { default: None, .. })));
        assert!(matches!(&program.body[1], Stmt::Import(ImportDecl { default: Some(_), .. })));
        let Stmt::VarDecl(decl) = &program.body[2] else {
            panic!("expected declaration");
        };
        assert_eq!(decl.declarators.len(), 2);
        assert!(matches!(&program.body[3], Stmt::For { update: Some(_), .. }));
        assert!(matches!(&program.body[5], Stmt::Empty { .. }));
    }

    #[test]
    fn test_parse_return_asi() {
        let (program, _) = parse("function f() { return\n1 }");
        let Stmt::Function(func) = &program.body[0] else {
            panic!("expected function");
        };
        assert!(matches!(func.body.body[0], Stmt::Return { value: None, .. }));
        assert_eq!(func.body.body.len(), 2);
    }

    #[test]
    fn test_parse_sequence_and_conditional() {
        let (program, _) = parse("a ? b : c, d;");
        let Expr::Sequence { exprs, .. } = expr_of(&program) else {
            panic!("expected sequence");
        };
        assert_eq!(exprs.len(), 2);
        assert!(matches!(exprs[0], Expr::Conditional { .. }));
    }

    #[test]
    fn test_parse_missing_delimiter() {
        assert!(matches!(
            parse_err("function f() { return 1;"),
            ParserError::MissingDelimiter { .. }
        ));
        assert!(matches!(
            parse_err("f(a, b"),
            ParserError::MissingDelimiter { .. }
        ));
    }

    #[test]
    fn test_parse_missing_semicolon() {
        let err = parse_err("a b");
        assert!(matches!(err, ParserError::UnexpectedToken { .. }));
        assert_eq!(err.to_string(), "expected ';', found identifier");
    }

    #[test]
    fn test_unary_base_of_exponent_rejected() {
        for source in ["-x ** 2;", "typeof a ** b;", "a * ~b ** 2;", "!a ** 2;"] {
            assert!(
                matches!(parse_err(source), ParserError::UnaryBeforeExponent { .. }),
                "{source}"
            );
        }
        for source in ["(-x) ** 2;", "-(x ** 2);", "2 ** -x;", "++x ** 2;", "x++ ** 2;"] {
            parse(source);
        }
    }

    #[test]
    fn test_long_operator_chain_hits_nesting_limit() {
        let terms = vec!["a"; 3_000].join(" + ");
        let err = parse_err(&format!("x = {terms};"));
        assert_eq!(
            err,
            ParserError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                span: err.span(),
            }
        );
        assert_eq!(err.to_string(), "nesting exceeds the limit of 256 levels");

        let terms = vec!["a"; 100].join(" + ");
        parse(&format!("x = {terms};"));
    }

    #[test]
    fn test_nesting_limit_covers_every_construct() {
        let parse_limited = |source: &str| {
            let (tokens, interner) = Lexer::new(source).lex_with_interner().unwrap();
            Parser::new(tokens, interner).with_max_depth(16).parse_program()
        };
        let deep = [
            format!("{}a{};", "(".repeat(20), ")".repeat(20)),
            format!("{}a;", "-".repeat(20).replace('-', "- ")),
            format!("{}{};", "{".repeat(20), "}".repeat(20)),
            format!("f{};", "()".repeat(20)),
            format!("o{};", ".p".repeat(20)),
            format!("x = {};", vec!["y"; 20].join(" = ")),
        ];
        for source in &deep {
            assert!(
                matches!(parse_limited(source), Err(ParserError::NestingTooDeep { limit: 16, .. })),
                "{source}"
            );
        }
        assert!(parse_limited("f(a + b, [c, { d: e }]);").is_ok());
    }

    #[test]
    fn test_expression_spans() {
        let (program, _) = parse("x +\n  y;");
        let expr = expr_of(&program);
        assert_eq!(expr.span().start_line, 1);
        assert_eq!(expr.span().end_line, 2);
        assert_eq!(expr.span().end_col, 4);
    }
}
