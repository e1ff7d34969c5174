//! Statement, declaration and module-item parsing.
//!
//! Every statement form has a dedicated method and `parse_statement`
//! dispatches on the current token. Statement lists track the names their
//! items declare so lexical redeclarations are rejected at parse time, and
//! labels are resolved lazily so `continue` can verify that its target
//! denotes an iteration statement.

use rustc_hash::FxHashSet;

use crate::ast::{
    BlockStatement, BreakStatement, CatchClause, ContinueStatement, DebuggerStatement,
    DoWhileStatement, EmptyStatement, ExportAllDeclaration, ExportDefaultDeclaration,
    ExportDefaultKind, ExportNamedDeclaration, ExportSpecifier, Expression, ExpressionStatement,
    ForInStatement, ForInit, ForOfStatement, ForStatement, ForTarget, Identifier, IfStatement,
    ImportDeclaration, ImportDeclarationSpecifier, ImportDefaultSpecifier,
    ImportNamespaceSpecifier, ImportSpecifier, LabeledStatement, Literal, LiteralValue,
    ModuleExportName, Pattern, ReturnStatement, SequenceExpression, Span, Statement, SwitchCase,
    SwitchStatement, ThrowStatement, TryStatement, VariableDeclaration, VariableDeclarator,
    VariableKind, WhileStatement, WithStatement,
};
use crate::context::Context;
use crate::error::{messages, Result, SourceLocation};
use crate::lexer::{Keyword, TokenKind, TokenValue};

use super::{CoverState, Parser};

/// Names declared by the items of one statement list
///
/// Lexical names may not repeat and may not collide with var-scoped names
/// declared in the same list.
#[derive(Default)]
struct BindingScope {
    lexical: FxHashSet<String>,
    vars: FxHashSet<String>,
}

impl BindingScope {
    /// Record the names a statement-list item declares, rejecting lexical
    /// redeclarations and lexical/var clashes
    fn declare(&mut self, parser: &Parser<'_>, ctx: Context, statement: &Statement) -> Result<()> {
        let mut lexical = Vec::new();
        let mut vars = Vec::new();
        collect_declared_names(statement, ctx.has_strict(), &mut lexical, &mut vars);
        if lexical.is_empty() && vars.is_empty() {
            return Ok(());
        }
        let location = statement.span().start;
        for name in lexical {
            if self.vars.contains(&name) || !self.lexical.insert(name.clone()) {
                return Err(parser.early_error(messages::duplicate_binding(&name), location));
            }
        }
        for name in vars {
            if self.lexical.contains(&name) {
                return Err(parser.early_error(messages::duplicate_binding(&name), location));
            }
            self.vars.insert(name);
        }
        Ok(())
    }
}

/// Collect the names a statement-list item declares into lexical and
/// var-scoped buckets
///
/// Sloppy-mode function declarations hoist like `var` and may repeat; in
/// strict mode they are lexical.
fn collect_declared_names(
    statement: &Statement,
    strict: bool,
    lexical: &mut Vec<String>,
    vars: &mut Vec<String>,
) {
    match statement {
        Statement::VariableDeclaration(declaration) => {
            let bucket = if declaration.kind == VariableKind::Var {
                vars
            } else {
                lexical
            };
            for declarator in &declaration.declarations {
                declarator.id.bound_names(bucket);
            }
        }
        Statement::FunctionDeclaration(function) => {
            if let Some(id) = &function.id {
                if strict {
                    lexical.push(id.name.clone());
                } else {
                    vars.push(id.name.clone());
                }
            }
        }
        Statement::ClassDeclaration(class) => {
            if let Some(id) = &class.id {
                lexical.push(id.name.clone());
            }
        }
        Statement::Import(import) => {
            for specifier in &import.specifiers {
                let local = match specifier {
                    ImportDeclarationSpecifier::Named(specifier) => &specifier.local,
                    ImportDeclarationSpecifier::Default(specifier) => &specifier.local,
                    ImportDeclarationSpecifier::Namespace(specifier) => &specifier.local,
                };
                lexical.push(local.name.clone());
            }
        }
        Statement::ExportNamed(export) => {
            if let Some(declaration) = &export.declaration {
                collect_declared_names(declaration, strict, lexical, vars);
            }
        }
        Statement::ExportDefault(export) => {
            if let ExportDefaultKind::Declaration(declaration) = &export.declaration {
                collect_declared_names(declaration, strict, lexical, vars);
            }
        }
        Statement::Labeled(labeled) => {
            collect_declared_names(&labeled.body, strict, lexical, vars);
        }
        _ => {}
    }
}

impl<'src> Parser<'src> {
    // ========== Statement lists ==========

    /// Parse statement-list items until `}` or end of input
    pub(crate) fn parse_statement_list(
        &mut self,
        ctx: Context,
        body: &mut Vec<Statement>,
    ) -> Result<()> {
        let mut bindings = BindingScope::default();
        while !matches!(self.token.kind, TokenKind::RightBrace | TokenKind::Eof) {
            let statement = self.parse_statement_list_item(ctx)?;
            bindings.declare(self, ctx, &statement)?;
            body.push(statement);
        }
        Ok(())
    }

    /// A statement-list item: a declaration or a statement
    fn parse_statement_list_item(&mut self, ctx: Context) -> Result<Statement> {
        let kind = self.token.kind;
        match kind {
            TokenKind::Keyword(Keyword::Function) => {
                let start = self.token.location;
                self.parse_function_declaration(ctx, start, false, false)
            }
            TokenKind::Keyword(Keyword::Class) => self.parse_class_declaration(ctx, false),
            TokenKind::Keyword(Keyword::Const) => {
                self.parse_variable_statement(ctx, VariableKind::Const)
            }
            TokenKind::Keyword(Keyword::Let) if self.peek_lexical_declaration(ctx)? => {
                self.parse_variable_statement(ctx, VariableKind::Let)
            }
            TokenKind::Keyword(Keyword::Async) if !self.token.escaped => {
                let start = self.token.location;
                let saved = self.save_state();
                self.bump(ctx)?;
                if self.at_keyword(Keyword::Function) && !self.token.newline_before {
                    self.parse_function_declaration(ctx, start, true, false)
                } else {
                    self.load_state(saved);
                    self.parse_statement(ctx, true)
                }
            }
            TokenKind::Keyword(Keyword::Import) => self.parse_import_statement(ctx),
            TokenKind::Keyword(Keyword::Export) => self.parse_export_statement(ctx),
            _ => self.parse_statement(ctx, true),
        }
    }

    // ========== Statements ==========

    /// Parse a single statement
    ///
    /// `allow_labeled_function` admits the legacy `label: function f() {}`
    /// form, which is only valid directly inside a statement list.
    pub(crate) fn parse_statement(
        &mut self,
        ctx: Context,
        allow_labeled_function: bool,
    ) -> Result<Statement> {
        let kind = self.token.kind;
        match kind {
            TokenKind::LeftBrace => Ok(Statement::Block(self.parse_block_statement(ctx)?)),
            TokenKind::Semicolon => {
                let start = self.token.location;
                self.bump(ctx)?;
                Ok(Statement::Empty(EmptyStatement {
                    meta: self.meta("EmptyStatement", start),
                }))
            }
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(ctx),
            TokenKind::Keyword(Keyword::Do) => self.parse_do_while_statement(ctx),
            TokenKind::Keyword(Keyword::While) => self.parse_while_statement(ctx),
            TokenKind::Keyword(Keyword::For) => self.parse_for_statement(ctx),
            TokenKind::Keyword(Keyword::Switch) => self.parse_switch_statement(ctx),
            TokenKind::Keyword(Keyword::Continue) => self.parse_continue_statement(ctx),
            TokenKind::Keyword(Keyword::Break) => self.parse_break_statement(ctx),
            TokenKind::Keyword(Keyword::Return) => self.parse_return_statement(ctx),
            TokenKind::Keyword(Keyword::With) => self.parse_with_statement(ctx),
            TokenKind::Keyword(Keyword::Throw) => self.parse_throw_statement(ctx),
            TokenKind::Keyword(Keyword::Try) => self.parse_try_statement(ctx),
            TokenKind::Keyword(Keyword::Debugger) => self.parse_debugger_statement(ctx),
            TokenKind::Keyword(Keyword::Var) => {
                self.parse_variable_statement(ctx, VariableKind::Var)
            }
            TokenKind::Keyword(Keyword::Function) => Err(self.error(
                messages::FUNCTION_SINGLE_STATEMENT,
                self.token.location,
            )),
            TokenKind::Keyword(Keyword::Class) => Err(self.unexpected()),
            TokenKind::Keyword(Keyword::Const) => Err(self.error(
                messages::LEXICAL_SINGLE_STATEMENT,
                self.token.location,
            )),
            TokenKind::Keyword(Keyword::Let) if self.peek_lexical_declaration(ctx)? => Err(self
                .error(messages::LEXICAL_SINGLE_STATEMENT, self.token.location)),
            _ => {
                let is_name = matches!(self.token.kind, TokenKind::Identifier)
                    || matches!(self.token.kind, TokenKind::Keyword(keyword) if !keyword.is_reserved());
                if is_name {
                    if let Some(labeled) =
                        self.try_parse_labeled_statement(ctx, allow_labeled_function)?
                    {
                        return Ok(labeled);
                    }
                }
                if self.at_keyword(Keyword::Async) && !self.token.escaped {
                    let start = self.token.location;
                    let saved = self.save_state();
                    self.bump(ctx)?;
                    let is_function =
                        self.at_keyword(Keyword::Function) && !self.token.newline_before;
                    self.load_state(saved);
                    if is_function {
                        return Err(self.error(messages::FUNCTION_SINGLE_STATEMENT, start));
                    }
                }
                self.parse_expression_statement(ctx)
            }
        }
    }

    /// Attempt `label: statement`, restoring the scanner when the candidate
    /// identifier turns out not to be followed by a colon
    fn try_parse_labeled_statement(
        &mut self,
        ctx: Context,
        allow_function: bool,
    ) -> Result<Option<Statement>> {
        let saved = self.save_state();
        let label_token = self.bump(ctx)?;
        if !self.at(TokenKind::Colon) {
            self.load_state(saved);
            return Ok(None);
        }
        self.check_identifier_token(&label_token, ctx)?;
        let label = self.identifier_node(&label_token);
        let start = label_token.location;
        if self.labels.contains_key(&label.name) {
            return Err(self.early_error(messages::duplicate_label(&label.name), start));
        }
        self.labels.insert(label.name.clone(), None);
        self.bump(ctx)?;

        // whether `continue label` is legal depends on the body, which is
        // not known until it has been parsed
        let body_starts_iteration = matches!(
            self.token.kind,
            TokenKind::Keyword(Keyword::While | Keyword::Do | Keyword::For)
        );
        self.last_label_was_iteration = false;

        let body = if self.at_keyword(Keyword::Function) {
            if ctx.has_strict() || !allow_function {
                return Err(self.error(
                    messages::FUNCTION_SINGLE_STATEMENT,
                    self.token.location,
                ));
            }
            self.parse_single_statement_function(ctx)?
        } else {
            self.parse_statement(ctx, allow_function)?
        };

        let is_iteration = body_starts_iteration || self.last_label_was_iteration;
        if let Some(Some(continue_location)) = self.labels.remove(&label.name) {
            if !is_iteration {
                return Err(self.error(
                    messages::CONTINUE_LABEL_NOT_ITERATION,
                    continue_location,
                ));
            }
        }
        self.last_label_was_iteration = is_iteration;

        Ok(Some(Statement::Labeled(Box::new(LabeledStatement {
            meta: self.meta("LabeledStatement", start),
            label,
            body,
        }))))
    }

    /// A sloppy-mode function declaration in a single-statement position;
    /// generators never qualify
    fn parse_single_statement_function(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        let declaration = self.parse_function_declaration(ctx, start, false, false)?;
        if matches!(&declaration, Statement::FunctionDeclaration(function) if function.is_generator)
        {
            return Err(self.error(messages::FUNCTION_SINGLE_STATEMENT, start));
        }
        Ok(declaration)
    }

    /// Parse `{ statements }`
    fn parse_block_statement(&mut self, ctx: Context) -> Result<BlockStatement> {
        let start = self.token.location;
        self.expect(ctx, TokenKind::LeftBrace)?;
        let mut body = Vec::new();
        self.parse_statement_list(ctx.and_top_level(false), &mut body)?;
        self.expect(ctx, TokenKind::RightBrace)?;
        Ok(BlockStatement {
            meta: self.meta("BlockStatement", start),
            body,
        })
    }

    fn parse_if_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;
        self.expect(ctx, TokenKind::LeftParen)?;
        let test = self.parse_expression(ctx)?;
        self.expect(ctx, TokenKind::RightParen)?;
        let consequent = self.parse_if_body(ctx)?;
        let alternate = if self.consume_keyword(ctx, Keyword::Else)? {
            Some(self.parse_if_body(ctx)?)
        } else {
            None
        };
        Ok(Statement::If(Box::new(IfStatement {
            meta: self.meta("IfStatement", start),
            test,
            consequent,
            alternate,
        })))
    }

    /// An `if`/`else` branch; sloppy-mode web compatibility admits a bare
    /// function declaration here
    fn parse_if_body(&mut self, ctx: Context) -> Result<Statement> {
        if self.at_keyword(Keyword::Function) && self.options.web_compat && !ctx.has_strict() {
            return self.parse_single_statement_function(ctx);
        }
        self.parse_statement(ctx, false)
    }

    // ========== Loops ==========

    fn parse_while_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;
        self.expect(ctx, TokenKind::LeftParen)?;
        let test = self.parse_expression(ctx)?;
        self.expect(ctx, TokenKind::RightParen)?;
        let body = self.parse_statement(ctx.and_iteration(true), false)?;
        Ok(Statement::While(Box::new(WhileStatement {
            meta: self.meta("WhileStatement", start),
            test,
            body,
        })))
    }

    fn parse_do_while_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;
        let body = self.parse_statement(ctx.and_iteration(true), false)?;
        self.expect_keyword(ctx, Keyword::While)?;
        self.expect(ctx, TokenKind::LeftParen)?;
        let test = self.parse_expression(ctx)?;
        self.expect(ctx, TokenKind::RightParen)?;
        // the closing semicolon is always insertable, newline or not
        if self.at(TokenKind::Semicolon) {
            self.bump(ctx)?;
        } else {
            self.notify_inserted_semicolon();
        }
        Ok(Statement::DoWhile(Box::new(DoWhileStatement {
            meta: self.meta("DoWhileStatement", start),
            body,
            test,
        })))
    }

    /// Parse `for`, `for`-`in`, `for`-`of` and `for await` loops
    ///
    /// The three forms share their head prefix: the left-hand side is parsed
    /// first with `in` disabled, and the loop form is decided by the token
    /// that follows it.
    fn parse_for_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;

        let mut is_await = false;
        if self.at_keyword(Keyword::Await) {
            if !ctx.has_await() {
                return Err(self.error(messages::AWAIT_OUTSIDE_ASYNC, self.token.location));
            }
            is_await = true;
            self.bump(ctx)?;
        }
        self.expect(ctx, TokenKind::LeftParen)?;

        let head_ctx = ctx.and_in(false);

        if self.at(TokenKind::Semicolon) {
            if is_await {
                return Err(self.error(messages::FOR_AWAIT_OF, self.token.location));
            }
            self.bump(ctx)?;
            return self.parse_for_tail(ctx, start, None);
        }

        let token_kind = self.token.kind;
        let declaration_kind = match token_kind {
            TokenKind::Keyword(Keyword::Var) => Some(VariableKind::Var),
            TokenKind::Keyword(Keyword::Const) => Some(VariableKind::Const),
            TokenKind::Keyword(Keyword::Let) if self.peek_lexical_declaration(head_ctx)? => {
                Some(VariableKind::Let)
            }
            _ => None,
        };

        if let Some(kind) = declaration_kind {
            let declaration_start = self.token.location;
            self.bump(head_ctx)?;
            let declarations = self.parse_variable_declarators(head_ctx, kind)?;
            let declaration = VariableDeclaration {
                meta: self.meta("VariableDeclaration", declaration_start),
                kind,
                declarations,
            };

            if self.at_keyword(Keyword::In) && !is_await {
                self.check_for_target_declaration(ctx, &declaration, false)?;
                self.bump(ctx)?;
                let right = self.parse_expression(ctx)?;
                self.expect(ctx, TokenKind::RightParen)?;
                let body = self.parse_statement(ctx.and_iteration(true), false)?;
                return Ok(Statement::ForIn(Box::new(ForInStatement {
                    meta: self.meta("ForInStatement", start),
                    left: ForTarget::VariableDeclaration(declaration),
                    right,
                    body,
                })));
            }
            if self.at_keyword(Keyword::Of) {
                self.check_for_target_declaration(ctx, &declaration, true)?;
                self.bump(ctx)?;
                let right = self.parse_assignment_expression(ctx)?;
                self.expect(ctx, TokenKind::RightParen)?;
                let body = self.parse_statement(ctx.and_iteration(true), false)?;
                return Ok(Statement::ForOf(Box::new(ForOfStatement {
                    meta: self.meta("ForOfStatement", start),
                    left: ForTarget::VariableDeclaration(declaration),
                    right,
                    body,
                    is_await,
                })));
            }
            if is_await {
                return Err(self.error(messages::FOR_AWAIT_OF, self.token.location));
            }
            self.check_declarator_initializers(kind, &declaration.declarations)?;
            self.expect(ctx, TokenKind::Semicolon)?;
            return self.parse_for_tail(ctx, start, Some(ForInit::VariableDeclaration(declaration)));
        }

        // expression head
        let lhs_starts_with_let = self.at_keyword(Keyword::Let);
        let init_start = self.token.location;
        let cover_before = self.cover;
        let first = self.parse_assignment_element(head_ctx)?;

        if self.at_keyword(Keyword::In) && !is_await {
            let left = self.for_target_from_expression(ctx, first, init_start, cover_before)?;
            self.bump(ctx)?;
            let right = self.parse_expression(ctx)?;
            self.expect(ctx, TokenKind::RightParen)?;
            let body = self.parse_statement(ctx.and_iteration(true), false)?;
            return Ok(Statement::ForIn(Box::new(ForInStatement {
                meta: self.meta("ForInStatement", start),
                left,
                right,
                body,
            })));
        }
        if self.at_keyword(Keyword::Of) {
            if lhs_starts_with_let {
                return Err(self.error(messages::FOR_OF_LET, init_start));
            }
            // a plain `for` head may not begin with the exact word `async`,
            // which would be ambiguous with `for await`
            if !is_await
                && matches!(&first, Expression::Identifier(identifier)
                    if identifier.name == "async"
                        && identifier.meta.span.start.offset == init_start.offset)
            {
                return Err(self.error(messages::FOR_OF_ASYNC, init_start));
            }
            let left = self.for_target_from_expression(ctx, first, init_start, cover_before)?;
            self.bump(ctx)?;
            let right = self.parse_assignment_expression(ctx)?;
            self.expect(ctx, TokenKind::RightParen)?;
            let body = self.parse_statement(ctx.and_iteration(true), false)?;
            return Ok(Statement::ForOf(Box::new(ForOfStatement {
                meta: self.meta("ForOfStatement", start),
                left,
                right,
                body,
                is_await,
            })));
        }
        if is_await {
            return Err(self.error(messages::FOR_AWAIT_OF, self.token.location));
        }

        // a comma sequence can no longer be a destructuring target, so any
        // deferred shorthand initializer in the first item is an error now
        self.check_cover_initializers(cover_before)?;
        let init = if self.at(TokenKind::Comma) {
            let mut expressions = vec![first];
            while self.consume(head_ctx, TokenKind::Comma)? {
                expressions.push(self.parse_assignment_expression(head_ctx)?);
            }
            Expression::Sequence(Box::new(SequenceExpression {
                meta: self.meta("SequenceExpression", init_start),
                expressions,
            }))
        } else {
            first
        };
        self.expect(ctx, TokenKind::Semicolon)?;
        self.parse_for_tail(ctx, start, Some(ForInit::Expression(init)))
    }

    /// The `test; update) body` tail shared by all plain `for` forms; the
    /// first semicolon has already been consumed
    fn parse_for_tail(
        &mut self,
        ctx: Context,
        start: SourceLocation,
        init: Option<ForInit>,
    ) -> Result<Statement> {
        let test = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression(ctx)?)
        };
        self.expect(ctx, TokenKind::Semicolon)?;
        let update = if self.at(TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression(ctx)?)
        };
        self.expect(ctx, TokenKind::RightParen)?;
        let body = self.parse_statement(ctx.and_iteration(true), false)?;
        Ok(Statement::For(Box::new(ForStatement {
            meta: self.meta("ForStatement", start),
            init,
            test,
            update,
            body,
        })))
    }

    /// Reinterpret an expression head as a `for`-`in`/`of` assignment target
    ///
    /// Destructuring targets must appear unparenthesized; a parenthesized
    /// identifier or member expression is still fine.
    fn for_target_from_expression(
        &mut self,
        ctx: Context,
        expression: Expression,
        init_start: SourceLocation,
        cover_before: CoverState,
    ) -> Result<ForTarget> {
        let parenthesized = expression.span().start.offset != init_start.offset;
        let pattern = self.reinterpret_as_pattern(ctx, expression)?;
        self.cover = cover_before;
        match &pattern {
            Pattern::Identifier(_) | Pattern::Member(_) => {}
            Pattern::Array(_) | Pattern::Object(_) if !parenthesized => {}
            _ => {
                return Err(
                    self.early_error(messages::INVALID_DESTRUCTURING_TARGET, init_start)
                )
            }
        }
        Ok(ForTarget::Pattern(pattern))
    }

    /// `for`-`in`/`of` declarations bind exactly one name and carry no
    /// initializer, except the legacy sloppy `var` initializer in `for`-`in`
    fn check_for_target_declaration(
        &self,
        ctx: Context,
        declaration: &VariableDeclaration,
        is_of: bool,
    ) -> Result<()> {
        if declaration.declarations.len() != 1 {
            return Err(self.error(
                messages::FOR_IN_OF_DECLARATIONS,
                declaration.meta.span.start,
            ));
        }
        let declarator = &declaration.declarations[0];
        if declarator.init.is_some() {
            let legacy_var_init = !is_of
                && self.options.web_compat
                && !ctx.has_strict()
                && declaration.kind == VariableKind::Var
                && matches!(declarator.id, Pattern::Identifier(_));
            if !legacy_var_init {
                let message = if is_of {
                    messages::FOR_OF_LOOP_INIT
                } else {
                    messages::FOR_IN_LOOP_INIT
                };
                return Err(self.error(message, declarator.meta.span.start));
            }
        }
        Ok(())
    }

    // ========== Variable declarations ==========

    /// Parse a `var`/`let`/`const` statement, keyword included
    fn parse_variable_statement(&mut self, ctx: Context, kind: VariableKind) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;
        let declarations = self.parse_variable_declarators(ctx, kind)?;
        self.check_declarator_initializers(kind, &declarations)?;
        self.consume_semicolon(ctx)?;
        Ok(Statement::VariableDeclaration(VariableDeclaration {
            meta: self.meta("VariableDeclaration", start),
            kind,
            declarations,
        }))
    }

    /// The comma-separated declarator list after `var`/`let`/`const`
    fn parse_variable_declarators(
        &mut self,
        ctx: Context,
        kind: VariableKind,
    ) -> Result<Vec<VariableDeclarator>> {
        let mut declarations = Vec::new();
        loop {
            let declarator_start = self.token.location;
            let id = self.parse_binding_pattern(ctx)?;
            if kind != VariableKind::Var {
                let mut names = Vec::new();
                id.bound_names(&mut names);
                if names.iter().any(|name| name == "let") {
                    return Err(self.early_error(messages::LET_LEXICAL_BINDING, declarator_start));
                }
            }
            let init = if self.consume(ctx, TokenKind::Equals)? {
                Some(self.parse_assignment_expression(ctx)?)
            } else {
                None
            };
            declarations.push(VariableDeclarator {
                meta: self.meta("VariableDeclarator", declarator_start),
                id,
                init,
            });
            if !self.consume(ctx, TokenKind::Comma)? {
                break;
            }
        }
        Ok(declarations)
    }

    /// `const` declarators and destructuring declarators require initializers
    fn check_declarator_initializers(
        &self,
        kind: VariableKind,
        declarations: &[VariableDeclarator],
    ) -> Result<()> {
        for declarator in declarations {
            if declarator.init.is_none() {
                if kind == VariableKind::Const {
                    return Err(self.error(
                        messages::CONST_WITHOUT_INIT,
                        declarator.meta.span.start,
                    ));
                }
                if !matches!(declarator.id, Pattern::Identifier(_)) {
                    return Err(self.error(
                        messages::DESTRUCTURING_WITHOUT_INIT,
                        declarator.meta.span.start,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Whether a `let` token opens a lexical declaration here
    ///
    /// `let` is only reserved when followed by something that can begin a
    /// binding; otherwise sloppy mode treats it as an ordinary identifier.
    fn peek_lexical_declaration(&mut self, ctx: Context) -> Result<bool> {
        let saved = self.save_state();
        self.bump(ctx)?;
        let lexical = matches!(
            self.token.kind,
            TokenKind::Identifier | TokenKind::LeftBracket | TokenKind::LeftBrace
        ) || matches!(self.token.kind, TokenKind::Keyword(keyword) if !keyword.is_reserved());
        self.load_state(saved);
        Ok(lexical)
    }

    // ========== Control transfer ==========

    fn parse_switch_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;
        self.expect(ctx, TokenKind::LeftParen)?;
        let discriminant = self.parse_expression(ctx)?;
        self.expect(ctx, TokenKind::RightParen)?;
        self.expect(ctx, TokenKind::LeftBrace)?;

        // the whole case block shares one lexical scope
        let case_ctx = ctx.and_switch(true).and_top_level(false);
        let mut bindings = BindingScope::default();
        let mut cases = Vec::new();
        let mut default_seen = false;
        while !matches!(self.token.kind, TokenKind::RightBrace | TokenKind::Eof) {
            let case_start = self.token.location;
            let test = if self.consume_keyword(case_ctx, Keyword::Case)? {
                Some(self.parse_expression(case_ctx)?)
            } else {
                self.expect_keyword(case_ctx, Keyword::Default)?;
                if default_seen {
                    return Err(self.error(messages::MULTIPLE_DEFAULTS, case_start));
                }
                default_seen = true;
                None
            };
            self.expect(case_ctx, TokenKind::Colon)?;
            let mut consequent = Vec::new();
            while !matches!(
                self.token.kind,
                TokenKind::RightBrace
                    | TokenKind::Eof
                    | TokenKind::Keyword(Keyword::Case | Keyword::Default)
            ) {
                let statement = self.parse_statement_list_item(case_ctx)?;
                bindings.declare(self, case_ctx, &statement)?;
                consequent.push(statement);
            }
            cases.push(SwitchCase {
                meta: self.meta("SwitchCase", case_start),
                test,
                consequent,
            });
        }
        self.expect(ctx, TokenKind::RightBrace)?;
        Ok(Statement::Switch(SwitchStatement {
            meta: self.meta("SwitchStatement", start),
            discriminant,
            cases,
        }))
    }

    fn parse_continue_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;
        let label = self.parse_optional_label(ctx)?;
        match &label {
            Some(identifier) => match self.labels.get_mut(&identifier.name) {
                // record where the label was targeted; the enclosing labeled
                // statement checks that it denotes an iteration statement
                Some(entry) => {
                    if entry.is_none() {
                        *entry = Some(identifier.meta.span.start);
                    }
                }
                None => {
                    return Err(self.error(
                        messages::undefined_label(&identifier.name),
                        identifier.meta.span.start,
                    ))
                }
            },
            None => {
                if !ctx.has_iteration() {
                    return Err(self.error(messages::ILLEGAL_CONTINUE, start));
                }
            }
        }
        self.consume_semicolon(ctx)?;
        Ok(Statement::Continue(ContinueStatement {
            meta: self.meta("ContinueStatement", start),
            label,
        }))
    }

    fn parse_break_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;
        let label = self.parse_optional_label(ctx)?;
        match &label {
            Some(identifier) => {
                if !self.labels.contains_key(&identifier.name) {
                    return Err(self.error(
                        messages::undefined_label(&identifier.name),
                        identifier.meta.span.start,
                    ));
                }
            }
            None => {
                if !ctx.has_iteration() && !ctx.has_switch() {
                    return Err(self.error(messages::ILLEGAL_BREAK, start));
                }
            }
        }
        self.consume_semicolon(ctx)?;
        Ok(Statement::Break(BreakStatement {
            meta: self.meta("BreakStatement", start),
            label,
        }))
    }

    /// The optional label after `break`/`continue`; a line terminator before
    /// it triggers semicolon insertion instead
    fn parse_optional_label(&mut self, ctx: Context) -> Result<Option<Identifier>> {
        if self.token.newline_before {
            return Ok(None);
        }
        let is_name = matches!(self.token.kind, TokenKind::Identifier)
            || matches!(self.token.kind, TokenKind::Keyword(keyword) if !keyword.is_reserved());
        if !is_name {
            return Ok(None);
        }
        self.check_identifier(ctx)?;
        let token = self.bump(ctx)?;
        Ok(Some(self.identifier_node(&token)))
    }

    fn parse_return_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        if !ctx.has_return() {
            return Err(self.error(messages::ILLEGAL_RETURN, start));
        }
        self.bump(ctx)?;
        let argument = if self.token.newline_before
            || matches!(
                self.token.kind,
                TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
            ) {
            None
        } else {
            Some(self.parse_expression(ctx)?)
        };
        self.consume_semicolon(ctx)?;
        Ok(Statement::Return(ReturnStatement {
            meta: self.meta("ReturnStatement", start),
            argument,
        }))
    }

    // ========== Other statements ==========

    fn parse_with_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        if ctx.has_strict() {
            return Err(self.early_error(messages::STRICT_WITH, start));
        }
        self.bump(ctx)?;
        self.expect(ctx, TokenKind::LeftParen)?;
        let object = self.parse_expression(ctx)?;
        self.expect(ctx, TokenKind::RightParen)?;
        let body = self.parse_statement(ctx, false)?;
        Ok(Statement::With(Box::new(WithStatement {
            meta: self.meta("WithStatement", start),
            object,
            body,
        })))
    }

    fn parse_throw_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;
        if self.token.newline_before {
            return Err(self.error(messages::NEWLINE_AFTER_THROW, self.prev_token_end));
        }
        let argument = self.parse_expression(ctx)?;
        self.consume_semicolon(ctx)?;
        Ok(Statement::Throw(ThrowStatement {
            meta: self.meta("ThrowStatement", start),
            argument,
        }))
    }

    fn parse_try_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;
        let block = self.parse_block_statement(ctx)?;

        let handler = if self.at_keyword(Keyword::Catch) {
            let catch_start = self.token.location;
            self.bump(ctx)?;
            // the binding is optional since ES2019
            let param = if self.consume(ctx, TokenKind::LeftParen)? {
                let pattern = self.parse_binding_pattern(ctx)?;
                let mut names = Vec::new();
                pattern.bound_names(&mut names);
                let mut seen = FxHashSet::default();
                for name in &names {
                    if !seen.insert(name.as_str()) {
                        return Err(self.early_error(
                            messages::duplicate_binding(name),
                            pattern.span().start,
                        ));
                    }
                }
                self.expect(ctx, TokenKind::RightParen)?;
                Some(pattern)
            } else {
                None
            };
            let body = self.parse_block_statement(ctx)?;
            Some(CatchClause {
                meta: self.meta("CatchClause", catch_start),
                param,
                body,
            })
        } else {
            None
        };

        let finalizer = if self.consume_keyword(ctx, Keyword::Finally)? {
            Some(self.parse_block_statement(ctx)?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.error(messages::MISSING_CATCH_OR_FINALLY, self.token.location));
        }
        Ok(Statement::Try(Box::new(TryStatement {
            meta: self.meta("TryStatement", start),
            block,
            handler,
            finalizer,
        })))
    }

    fn parse_debugger_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;
        self.consume_semicolon(ctx)?;
        Ok(Statement::Debugger(DebuggerStatement {
            meta: self.meta("DebuggerStatement", start),
        }))
    }

    fn parse_expression_statement(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        let expression = self.parse_expression(ctx)?;
        self.consume_semicolon(ctx)?;
        Ok(Statement::Expression(ExpressionStatement {
            meta: self.meta("ExpressionStatement", start),
            expression,
            directive: None,
        }))
    }

    // ========== Modules ==========

    /// Dispatch an `import` token: expression forms parse in any goal,
    /// declarations only at the top level of a module
    fn parse_import_statement(&mut self, ctx: Context) -> Result<Statement> {
        // `import(...)` and `import.meta` are expressions
        let saved = self.save_state();
        self.bump(ctx)?;
        let is_expression = matches!(self.token.kind, TokenKind::LeftParen | TokenKind::Dot);
        self.load_state(saved);
        if is_expression {
            return self.parse_expression_statement(ctx);
        }
        if !ctx.has_module() {
            return Err(self.goal_error(messages::IMPORT_OUTSIDE_MODULE, self.token.location));
        }
        if !ctx.has_top_level() {
            return Err(self.error(messages::MODULE_ITEM_NOT_TOP_LEVEL, self.token.location));
        }
        self.parse_import_declaration(ctx)
    }

    fn parse_export_statement(&mut self, ctx: Context) -> Result<Statement> {
        if !ctx.has_module() {
            return Err(self.goal_error(messages::EXPORT_OUTSIDE_MODULE, self.token.location));
        }
        if !ctx.has_top_level() {
            return Err(self.error(messages::MODULE_ITEM_NOT_TOP_LEVEL, self.token.location));
        }
        self.parse_export_declaration(ctx)
    }

    fn parse_import_declaration(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;

        let mut specifiers = Vec::new();
        if self.at(TokenKind::StringLiteral) {
            // side-effect import
            let source = self.finish_string_literal(ctx)?;
            self.consume_semicolon(ctx)?;
            return Ok(Statement::Import(Box::new(ImportDeclaration {
                meta: self.meta("ImportDeclaration", start),
                specifiers,
                source,
            })));
        }

        if matches!(self.token.kind, TokenKind::Star | TokenKind::LeftBrace) {
            self.parse_import_clause_tail(ctx, &mut specifiers)?;
        } else {
            let local = self.parse_binding_identifier(ctx)?;
            let span = local.meta.span;
            specifiers.push(ImportDeclarationSpecifier::Default(ImportDefaultSpecifier {
                meta: self.meta_at("ImportDefaultSpecifier", span),
                local,
            }));
            if self.consume(ctx, TokenKind::Comma)? {
                self.parse_import_clause_tail(ctx, &mut specifiers)?;
            }
        }

        self.expect_keyword(ctx, Keyword::From)?;
        let source = self.parse_module_specifier(ctx)?;
        self.consume_semicolon(ctx)?;
        Ok(Statement::Import(Box::new(ImportDeclaration {
            meta: self.meta("ImportDeclaration", start),
            specifiers,
            source,
        })))
    }

    /// The namespace or named-imports part of an import clause
    fn parse_import_clause_tail(
        &mut self,
        ctx: Context,
        specifiers: &mut Vec<ImportDeclarationSpecifier>,
    ) -> Result<()> {
        if self.at(TokenKind::Star) {
            let star_start = self.token.location;
            self.bump(ctx)?;
            self.expect_keyword(ctx, Keyword::As)?;
            let local = self.parse_binding_identifier(ctx)?;
            specifiers.push(ImportDeclarationSpecifier::Namespace(
                ImportNamespaceSpecifier {
                    meta: self.meta("ImportNamespaceSpecifier", star_start),
                    local,
                },
            ));
            return Ok(());
        }

        self.expect(ctx, TokenKind::LeftBrace)?;
        while !self.at(TokenKind::RightBrace) {
            let specifier_start = self.token.location;
            let imported_token = self.token.clone();
            let imported = self.parse_module_export_name(ctx)?;
            let local = if self.consume_keyword(ctx, Keyword::As)? {
                self.parse_binding_identifier(ctx)?
            } else {
                // without a rename the imported name doubles as the local
                // binding, so it must be a valid one
                match &imported {
                    ModuleExportName::Literal(literal) => {
                        return Err(self.error(
                            messages::unexpected_token("string"),
                            literal.meta.span.start,
                        ));
                    }
                    ModuleExportName::Identifier(identifier) => {
                        self.check_identifier_token(&imported_token, ctx)?;
                        if matches!(identifier.name.as_str(), "eval" | "arguments") {
                            return Err(self.early_error(
                                messages::UNEXPECTED_EVAL_ARGUMENTS,
                                identifier.meta.span.start,
                            ));
                        }
                        identifier.clone()
                    }
                }
            };
            specifiers.push(ImportDeclarationSpecifier::Named(ImportSpecifier {
                meta: self.meta("ImportSpecifier", specifier_start),
                local,
                imported,
            }));
            if !self.at(TokenKind::RightBrace) {
                self.expect(ctx, TokenKind::Comma)?;
            }
        }
        self.expect(ctx, TokenKind::RightBrace)?;
        Ok(())
    }

    fn parse_export_declaration(&mut self, ctx: Context) -> Result<Statement> {
        let start = self.token.location;
        self.bump(ctx)?;

        // `export * from "m"` and `export * as name from "m"`
        if self.at(TokenKind::Star) {
            self.bump(ctx)?;
            let exported = if self.at_keyword(Keyword::As) {
                if !self.options.next {
                    return Err(self.unexpected());
                }
                self.bump(ctx)?;
                let name = self.parse_module_export_name(ctx)?;
                self.register_export(name.as_name(), name.span().start)?;
                Some(name)
            } else {
                None
            };
            self.expect_keyword(ctx, Keyword::From)?;
            let source = self.parse_module_specifier(ctx)?;
            self.consume_semicolon(ctx)?;
            return Ok(Statement::ExportAll(ExportAllDeclaration {
                meta: self.meta("ExportAllDeclaration", start),
                source,
                exported,
            }));
        }

        // `export default ...`
        if self.at_keyword(Keyword::Default) {
            let default_location = self.token.location;
            self.bump(ctx)?;
            self.register_export("default", default_location)?;
            let declaration = if self.at_keyword(Keyword::Function) {
                let function_start = self.token.location;
                ExportDefaultKind::Declaration(Box::new(self.parse_function_declaration(
                    ctx,
                    function_start,
                    false,
                    true,
                )?))
            } else if self.at_keyword(Keyword::Class) {
                ExportDefaultKind::Declaration(Box::new(self.parse_class_declaration(ctx, true)?))
            } else if self.at_keyword(Keyword::Async) && !self.token.escaped {
                let async_start = self.token.location;
                let saved = self.save_state();
                self.bump(ctx)?;
                if self.at_keyword(Keyword::Function) && !self.token.newline_before {
                    ExportDefaultKind::Declaration(Box::new(self.parse_function_declaration(
                        ctx,
                        async_start,
                        true,
                        true,
                    )?))
                } else {
                    self.load_state(saved);
                    let expression = self.parse_assignment_expression(ctx)?;
                    self.consume_semicolon(ctx)?;
                    ExportDefaultKind::Expression(Box::new(expression))
                }
            } else {
                let expression = self.parse_assignment_expression(ctx)?;
                self.consume_semicolon(ctx)?;
                ExportDefaultKind::Expression(Box::new(expression))
            };
            return Ok(Statement::ExportDefault(Box::new(
                ExportDefaultDeclaration {
                    meta: self.meta("ExportDefaultDeclaration", start),
                    declaration,
                },
            )));
        }

        // `export <declaration>`
        let declaration = match self.token.kind {
            TokenKind::Keyword(Keyword::Var) => {
                Some(self.parse_variable_statement(ctx, VariableKind::Var)?)
            }
            TokenKind::Keyword(Keyword::Let) => {
                Some(self.parse_variable_statement(ctx, VariableKind::Let)?)
            }
            TokenKind::Keyword(Keyword::Const) => {
                Some(self.parse_variable_statement(ctx, VariableKind::Const)?)
            }
            TokenKind::Keyword(Keyword::Function) => {
                let function_start = self.token.location;
                Some(self.parse_function_declaration(ctx, function_start, false, false)?)
            }
            TokenKind::Keyword(Keyword::Class) => Some(self.parse_class_declaration(ctx, false)?),
            TokenKind::Keyword(Keyword::Async) if !self.token.escaped => {
                let async_start = self.token.location;
                self.bump(ctx)?;
                if !self.at_keyword(Keyword::Function) || self.token.newline_before {
                    return Err(self.unexpected());
                }
                Some(self.parse_function_declaration(ctx, async_start, true, false)?)
            }
            _ => None,
        };
        if let Some(declaration) = declaration {
            // every name the declaration binds is exported under itself
            let mut lexical = Vec::new();
            let mut vars = Vec::new();
            collect_declared_names(&declaration, ctx.has_strict(), &mut lexical, &mut vars);
            let location = declaration.span().start;
            for name in lexical.iter().chain(vars.iter()) {
                self.register_export(name, location)?;
            }
            return Ok(Statement::ExportNamed(Box::new(ExportNamedDeclaration {
                meta: self.meta("ExportNamedDeclaration", start),
                declaration: Some(declaration),
                specifiers: Vec::new(),
                source: None,
            })));
        }

        // `export { ... }` with an optional `from` clause
        self.expect(ctx, TokenKind::LeftBrace)?;
        let mut specifiers = Vec::new();
        // a local spelled as a string or a reserved word is only valid when
        // the list re-exports from another module
        let mut requires_from: Option<(SourceLocation, String)> = None;
        while !self.at(TokenKind::RightBrace) {
            let local_token = self.token.clone();
            let local = self.parse_module_export_name(ctx)?;
            match &local {
                ModuleExportName::Literal(literal) => {
                    if requires_from.is_none() {
                        requires_from = Some((literal.meta.span.start, "string".to_string()));
                    }
                }
                ModuleExportName::Identifier(identifier) => {
                    if requires_from.is_none()
                        && self.check_identifier_token(&local_token, ctx).is_err()
                    {
                        requires_from =
                            Some((identifier.meta.span.start, identifier.name.clone()));
                    }
                }
            }
            let specifier_start = local.span().start;
            let exported = if self.consume_keyword(ctx, Keyword::As)? {
                self.parse_module_export_name(ctx)?
            } else {
                local.clone()
            };
            self.register_export(exported.as_name(), exported.span().start)?;
            specifiers.push(ExportSpecifier {
                meta: self.meta("ExportSpecifier", specifier_start),
                local,
                exported,
            });
            if !self.at(TokenKind::RightBrace) {
                self.expect(ctx, TokenKind::Comma)?;
            }
        }
        self.expect(ctx, TokenKind::RightBrace)?;
        let source = if self.consume_keyword(ctx, Keyword::From)? {
            Some(self.parse_module_specifier(ctx)?)
        } else {
            if let Some((location, name)) = requires_from {
                return Err(self.error(messages::unexpected_token(&name), location));
            }
            None
        };
        self.consume_semicolon(ctx)?;
        Ok(Statement::ExportNamed(Box::new(ExportNamedDeclaration {
            meta: self.meta("ExportNamedDeclaration", start),
            declaration: None,
            specifiers,
            source,
        })))
    }

    /// Track an exported name, rejecting duplicates across the module
    fn register_export(&mut self, name: &str, location: SourceLocation) -> Result<()> {
        if !self.exported_names.insert(name.to_string()) {
            return Err(self.early_error(messages::duplicate_export(name), location));
        }
        Ok(())
    }

    /// A module export name: an identifier name, or a string literal when
    /// recent-standard features are enabled
    fn parse_module_export_name(&mut self, ctx: Context) -> Result<ModuleExportName> {
        if self.at(TokenKind::StringLiteral) {
            if !self.options.next {
                return Err(self.unexpected());
            }
            let literal = self.finish_string_literal(ctx)?;
            return Ok(ModuleExportName::Literal(literal));
        }
        Ok(ModuleExportName::Identifier(
            self.parse_identifier_name(ctx)?,
        ))
    }

    /// The string literal naming a requested module
    fn parse_module_specifier(&mut self, ctx: Context) -> Result<Literal> {
        if !self.at(TokenKind::StringLiteral) {
            return Err(self.unexpected());
        }
        self.finish_string_literal(ctx)
    }

    /// Consume the current string-literal token into a node
    fn finish_string_literal(&mut self, ctx: Context) -> Result<Literal> {
        let token = self.expect(ctx, TokenKind::StringLiteral)?;
        let span = Span::new(token.location, self.prev_token_end);
        let value = match token.value {
            TokenValue::String(string) => string,
            _ => String::new(),
        };
        Ok(Literal {
            meta: self.meta_at("Literal", span),
            value: LiteralValue::String(value),
            raw: self.raw(span),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{
        ExportDefaultKind, Expression, ForInit, ForTarget, ImportDeclarationSpecifier, Pattern,
        Program, Statement, VariableKind,
    };
    use crate::error::{messages, Error};
    use crate::options::Options;
    use crate::parser::{parse_module, parse_script};

    fn script(source: &str) -> Program {
        parse_script(source, Options::default()).unwrap()
    }

    fn script_err(source: &str) -> Error {
        parse_script(source, Options::default()).unwrap_err()
    }

    fn module_err(source: &str) -> Error {
        parse_module(source, Options::default()).unwrap_err()
    }

    #[test]
    fn parses_blocks_and_empty_statements() {
        let program = script("{ ; }");
        assert_eq!(program.body.len(), 1);
        let Statement::Block(block) = &program.body[0] else {
            panic!("expected block");
        };
        assert!(matches!(block.body[0], Statement::Empty(_)));
    }

    #[test]
    fn parses_if_else_chain() {
        let program = script("if (a) b(); else if (c) d(); else e();");
        let Statement::If(outer) = &program.body[0] else {
            panic!("expected if");
        };
        assert!(matches!(outer.alternate, Some(Statement::If(_))));
    }

    #[test]
    fn rejects_lexical_declaration_as_if_body() {
        let err = script_err("if (a) let [b] = c;");
        assert_eq!(err.message(), messages::LEXICAL_SINGLE_STATEMENT);
        let err = script_err("if (a) const b = 1;");
        assert_eq!(err.message(), messages::LEXICAL_SINGLE_STATEMENT);
    }

    #[test]
    fn rejects_function_declaration_as_loop_body() {
        let err = script_err("while (a) function f() {}");
        assert_eq!(err.message(), messages::FUNCTION_SINGLE_STATEMENT);
    }

    #[test]
    fn sloppy_mode_treats_let_as_identifier() {
        let program = script("let = 1; let.prop = 2; let;");
        assert_eq!(program.body.len(), 3);
        assert!(program
            .body
            .iter()
            .all(|statement| matches!(statement, Statement::Expression(_))));
    }

    #[test]
    fn do_while_inserts_its_own_semicolon() {
        let program = script("do f(); while (a) g();");
        assert_eq!(program.body.len(), 2);
        assert!(matches!(program.body[0], Statement::DoWhile(_)));
    }

    #[test]
    fn rejects_newline_after_throw() {
        let err = script_err("throw\nx;");
        assert_eq!(err.message(), messages::NEWLINE_AFTER_THROW);
        assert!(script("throw x;").body.len() == 1);
    }

    #[test]
    fn parses_try_with_optional_catch_binding() {
        let program = script("try { f(); } catch { g(); } finally { h(); }");
        let Statement::Try(try_statement) = &program.body[0] else {
            panic!("expected try");
        };
        let handler = try_statement.handler.as_ref().unwrap();
        assert!(handler.param.is_none());
        assert!(try_statement.finalizer.is_some());
    }

    #[test]
    fn rejects_try_without_catch_or_finally() {
        let err = script_err("try { f(); }");
        assert_eq!(err.message(), messages::MISSING_CATCH_OR_FINALLY);
    }

    #[test]
    fn rejects_duplicate_catch_parameter_bindings() {
        let err = script_err("try {} catch ([a, a]) {}");
        assert_eq!(err.message(), messages::duplicate_binding("a"));
    }

    #[test]
    fn parses_switch_cases() {
        let program = script("switch (a) { case 1: f(); break; default: g(); }");
        let Statement::Switch(switch_statement) = &program.body[0] else {
            panic!("expected switch");
        };
        assert_eq!(switch_statement.cases.len(), 2);
        assert!(switch_statement.cases[0].test.is_some());
        assert!(switch_statement.cases[1].test.is_none());
    }

    #[test]
    fn rejects_multiple_default_clauses() {
        let err = script_err("switch (a) { default: f(); default: g(); }");
        assert_eq!(err.message(), messages::MULTIPLE_DEFAULTS);
    }

    #[test]
    fn switch_cases_share_one_lexical_scope() {
        let err = script_err("switch (a) { case 1: let x; default: let x; }");
        assert_eq!(err.message(), messages::duplicate_binding("x"));
    }

    #[test]
    fn parses_nested_labels_with_break_and_continue() {
        let source = "outer: while (a) { inner: while (b) { break outer; continue inner; } }";
        let program = script(source);
        assert!(matches!(program.body[0], Statement::Labeled(_)));
    }

    #[test]
    fn continue_reaches_chained_iteration_labels() {
        assert!(parse_script("a: b: while (x) continue a;", Options::default()).is_ok());
    }

    #[test]
    fn rejects_continue_targeting_non_iteration_label() {
        let err = script_err("lbl: { continue lbl; }");
        assert_eq!(err.message(), messages::CONTINUE_LABEL_NOT_ITERATION);
    }

    #[test]
    fn rejects_undefined_and_duplicate_labels() {
        let err = script_err("lbl: {} break lbl;");
        assert_eq!(err.message(), messages::undefined_label("lbl"));
        let err = script_err("a: a: f();");
        assert_eq!(err.message(), messages::duplicate_label("a"));
    }

    #[test]
    fn rejects_break_and_continue_outside_their_statements() {
        assert_eq!(script_err("continue;").message(), messages::ILLEGAL_CONTINUE);
        assert_eq!(script_err("break;").message(), messages::ILLEGAL_BREAK);
        // break is fine in a switch, continue is not
        assert!(parse_script("switch (a) { case 1: break; }", Options::default()).is_ok());
        let err = script_err("switch (a) { case 1: continue; }");
        assert_eq!(err.message(), messages::ILLEGAL_CONTINUE);
    }

    #[test]
    fn return_requires_an_enclosing_function() {
        assert_eq!(script_err("return;").message(), messages::ILLEGAL_RETURN);
        let options = Options {
            global_return: true,
            ..Options::default()
        };
        assert!(parse_script("return 1;", options).is_ok());
    }

    #[test]
    fn parses_all_for_forms() {
        let program = script("for (;;) break; for (var i = 0; i < n; i++) f(); for (x in y) f(); for (x of y) f();");
        assert!(matches!(program.body[0], Statement::For(_)));
        let Statement::For(for_statement) = &program.body[1] else {
            panic!("expected for");
        };
        assert!(matches!(
            for_statement.init,
            Some(ForInit::VariableDeclaration(_))
        ));
        assert!(matches!(program.body[2], Statement::ForIn(_)));
        assert!(matches!(program.body[3], Statement::ForOf(_)));
    }

    #[test]
    fn for_in_of_heads_declare_exactly_one_binding() {
        let err = script_err("for (var a, b in c) f();");
        assert_eq!(err.message(), messages::FOR_IN_OF_DECLARATIONS);
        let err = script_err("for (let a, b of c) f();");
        assert_eq!(err.message(), messages::FOR_IN_OF_DECLARATIONS);
    }

    #[test]
    fn for_in_var_initializer_requires_web_compat() {
        let err = script_err("for (var a = 1 in b) f();");
        assert_eq!(err.message(), messages::FOR_IN_LOOP_INIT);
        let options = Options {
            web_compat: true,
            ..Options::default()
        };
        assert!(parse_script("for (var a = 1 in b) f();", options).is_ok());
        // never in for-of
        let options = Options {
            web_compat: true,
            ..Options::default()
        };
        let err = parse_script("for (var a = 1 of b) f();", options).unwrap_err();
        assert_eq!(err.message(), messages::FOR_OF_LOOP_INIT);
    }

    #[test]
    fn for_of_left_hand_side_may_not_start_with_let() {
        let err = script_err("for (let.a of x) f();");
        assert_eq!(err.message(), messages::FOR_OF_LET);
    }

    #[test]
    fn for_await_requires_an_async_context() {
        let err = script_err("for await (const x of y) f();");
        assert_eq!(err.message(), messages::AWAIT_OUTSIDE_ASYNC);
        // top-level await is available in modules
        let program = parse_module("for await (const x of y) f();", Options::default()).unwrap();
        let Statement::ForOf(for_of) = &program.body[0] else {
            panic!("expected for-of");
        };
        assert!(for_of.is_await);
    }

    #[test]
    fn rejects_for_await_over_non_of_loops() {
        let err = module_err("for await (x in y) f();");
        assert_eq!(err.message(), messages::FOR_AWAIT_OF);
        let err = module_err("for await (;;) f();");
        assert_eq!(err.message(), messages::FOR_AWAIT_OF);
    }

    #[test]
    fn const_requires_an_initializer_outside_loop_heads() {
        let err = script_err("const x;");
        assert_eq!(err.message(), messages::CONST_WITHOUT_INIT);
        assert!(parse_script("for (const x of y) f();", Options::default()).is_ok());
    }

    #[test]
    fn destructuring_declarations_require_initializers() {
        let err = script_err("var [a];");
        assert_eq!(err.message(), messages::DESTRUCTURING_WITHOUT_INIT);
    }

    #[test]
    fn let_cannot_name_a_lexical_binding() {
        let err = script_err("let let = 1;");
        assert_eq!(err.message(), messages::LET_LEXICAL_BINDING);
        // var is unaffected in sloppy mode
        let program = script("var let = 1;");
        let Statement::VariableDeclaration(declaration) = &program.body[0] else {
            panic!("expected declaration");
        };
        assert_eq!(declaration.kind, VariableKind::Var);
    }

    #[test]
    fn rejects_lexical_redeclarations_in_one_scope() {
        let err = script_err("let a; var a;");
        assert_eq!(err.message(), messages::duplicate_binding("a"));
        let err = script_err("let a; let a;");
        assert_eq!(err.message(), messages::duplicate_binding("a"));
        assert!(parse_script("var a; var a;", Options::default()).is_ok());
        // shadowing in an inner block is fine
        assert!(parse_script("let a; { let a; }", Options::default()).is_ok());
    }

    #[test]
    fn function_redeclaration_is_sloppy_only() {
        assert!(parse_script(
            "function f() {} function f() {}",
            Options::default()
        )
        .is_ok());
        let err = module_err("function f() {} function f() {}");
        assert_eq!(err.message(), messages::duplicate_binding("f"));
    }

    #[test]
    fn labeled_function_declarations_are_sloppy_only() {
        let program = script("a: function f() {}");
        assert!(matches!(program.body[0], Statement::Labeled(_)));
        let err = script_err("while (x) a: function f() {}");
        assert_eq!(err.message(), messages::FUNCTION_SINGLE_STATEMENT);
        let err = module_err("a: function f() {}");
        assert_eq!(err.message(), messages::FUNCTION_SINGLE_STATEMENT);
    }

    #[test]
    fn if_body_function_declarations_require_web_compat() {
        let err = script_err("if (a) function f() {}");
        assert_eq!(err.message(), messages::FUNCTION_SINGLE_STATEMENT);
        let options = Options {
            web_compat: true,
            ..Options::default()
        };
        let program = parse_script("if (a) function f() {}", options).unwrap();
        let Statement::If(if_statement) = &program.body[0] else {
            panic!("expected if");
        };
        assert!(matches!(
            if_statement.consequent,
            Statement::FunctionDeclaration(_)
        ));
    }

    #[test]
    fn with_statements_are_sloppy_only() {
        let program = script("with (a) f();");
        assert!(matches!(program.body[0], Statement::With(_)));
        let err = parse_script(
            "with (a) f();",
            Options {
                implied_strict: true,
                ..Options::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.message(), messages::STRICT_WITH);
    }

    #[test]
    fn parses_import_declaration_forms() {
        let source = r#"
            import "effects";
            import d from "a";
            import * as ns from "b";
            import d2, { x, y as z, default as dflt } from "c";
        "#;
        let program = parse_module(source, Options::default()).unwrap();
        let Statement::Import(side_effect) = &program.body[0] else {
            panic!("expected import");
        };
        assert!(side_effect.specifiers.is_empty());
        let Statement::Import(combined) = &program.body[3] else {
            panic!("expected import");
        };
        assert_eq!(combined.specifiers.len(), 4);
        assert!(matches!(
            combined.specifiers[0],
            ImportDeclarationSpecifier::Default(_)
        ));
        assert!(matches!(
            combined.specifiers[1],
            ImportDeclarationSpecifier::Named(_)
        ));
    }

    #[test]
    fn rejects_reserved_import_names_without_rename() {
        let err = module_err(r#"import { default } from "m";"#);
        assert_eq!(err.message(), messages::UNEXPECTED_RESERVED_WORD);
    }

    #[test]
    fn import_declarations_are_module_only() {
        let err = script_err(r#"import x from "m";"#);
        assert!(matches!(err, Error::GoalError { .. }));
        assert_eq!(err.message(), messages::IMPORT_OUTSIDE_MODULE);
        // dynamic import stays available in scripts
        assert!(parse_script(r#"import("m");"#, Options::default()).is_ok());
    }

    #[test]
    fn module_items_must_sit_at_the_top_level() {
        let err = module_err(r#"{ import x from "m"; }"#);
        assert_eq!(err.message(), messages::MODULE_ITEM_NOT_TOP_LEVEL);
        let err = module_err("function f() { export var x; }");
        assert_eq!(err.message(), messages::MODULE_ITEM_NOT_TOP_LEVEL);
    }

    #[test]
    fn parses_export_declaration_forms() {
        let source = r#"
            export var a = 1;
            export function f() {}
            export { a as b, f as g };
            export { c } from "m";
            export * from "n";
            export default 42;
        "#;
        let program = parse_module(source, Options::default()).unwrap();
        assert_eq!(program.body.len(), 6);
        let Statement::ExportDefault(default_export) = &program.body[5] else {
            panic!("expected default export");
        };
        assert!(matches!(
            default_export.declaration,
            ExportDefaultKind::Expression(_)
        ));
    }

    #[test]
    fn rejects_duplicate_exported_names() {
        let err = module_err("export var a; export { b as a };");
        assert_eq!(err.message(), messages::duplicate_export("a"));
        let err = module_err("export default 1; export { x as default };");
        assert_eq!(err.message(), messages::duplicate_export("default"));
    }

    #[test]
    fn export_star_as_namespace_requires_next() {
        assert!(parse_module(r#"export * from "m";"#, Options::default()).is_ok());
        assert!(parse_module(r#"export * as ns from "m";"#, Options::default()).is_err());
        let options = Options {
            next: true,
            ..Options::default()
        };
        let program = parse_module(r#"export * as ns from "m";"#, options).unwrap();
        let Statement::ExportAll(export_all) = &program.body[0] else {
            panic!("expected export all");
        };
        assert!(export_all.exported.is_some());
    }

    #[test]
    fn reserved_export_locals_need_a_from_clause() {
        let err = module_err("export { default };");
        assert_eq!(err.message(), messages::unexpected_token("default"));
        assert!(parse_module(r#"export { default } from "m";"#, Options::default()).is_ok());
    }

    #[test]
    fn export_default_function_keeps_its_local_name() {
        let program =
            parse_module("export default function f() {} f();", Options::default()).unwrap();
        let Statement::ExportDefault(default_export) = &program.body[0] else {
            panic!("expected default export");
        };
        let ExportDefaultKind::Declaration(declaration) = &default_export.declaration else {
            panic!("expected declaration");
        };
        let Statement::FunctionDeclaration(function) = declaration.as_ref() else {
            panic!("expected function");
        };
        assert_eq!(function.id.as_ref().unwrap().name, "f");
    }

    #[test]
    fn for_head_expressions_become_patterns() {
        let program = script("for ([a, b] of pairs) f();");
        let Statement::ForOf(for_of) = &program.body[0] else {
            panic!("expected for-of");
        };
        assert!(matches!(
            for_of.left,
            ForTarget::Pattern(Pattern::Array(_))
        ));
    }

    #[test]
    fn for_head_sequences_stay_expressions() {
        let program = script("for (a = 0, b = n; a < b; a++, b--) f();");
        let Statement::For(for_statement) = &program.body[0] else {
            panic!("expected for");
        };
        assert!(matches!(
            for_statement.init,
            Some(ForInit::Expression(Expression::Sequence(_)))
        ));
    }
}
