//! Expression parsing.
//!
//! A single precedence-climbing loop handles binary and logical operators;
//! everything tighter binding than that (unary, update, member access,
//! calls) is plain recursive descent. Constructs that might turn out to be
//! destructuring patterns are parsed as expressions first and reinterpreted
//! once the surrounding construct commits; syntax that is only legal inside
//! a pattern is recorded in [`CoverState`] while parsing and rejected by the
//! nearest caller that knows no pattern can follow.

use rustc_hash::FxHashSet;

use crate::ast::{
    ArrayExpression, ArrayPattern, AssignmentExpression, AssignmentOperator, AssignmentPattern,
    AssignmentTarget, AwaitExpression, BinaryExpression, BinaryOperator, BlockStatement,
    CallExpression, ChainExpression, Class, ClassBody, ClassElement, ConditionalExpression,
    Expression, Function, FunctionBody, Identifier, ImportExpression, Literal, LiteralValue,
    LogicalExpression, LogicalOperator, MemberExpression, MetaProperty, MethodDefinition,
    MethodKind, NewExpression, ObjectExpression, ObjectPattern, ObjectPatternProperty,
    ObjectPropertyKind, ParenthesizedExpression, Pattern, PrivateIdentifier, Property,
    PropertyDefinition, PropertyKey, PropertyKind, PropertyValue, RestElement, SequenceExpression,
    Span, SpreadElement, Statement, StaticBlock, Super, TaggedTemplate, TemplateElement,
    TemplateLiteral, TemplateValue, ThisExpression, UnaryExpression, UnaryOperator,
    UpdateExpression, UpdateOperator, YieldExpression,
};
use crate::context::Context;
use crate::error::{messages, Result, SourceLocation};
use crate::lexer::{Keyword, TokenKind, TokenValue};

use super::{CoverState, Parser, PrivateScope};

/// Precedence of `<`, `in` and `instanceof`; a private name may open a
/// binary expression only when this tier is still reachable
const RELATIONAL_PRECEDENCE: u8 = 10;

/// A binary-position operator, split by the node it produces
#[derive(Debug, Clone, Copy, PartialEq)]
enum BinaryKind {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

/// Accessor-shape bits for a private-name declaration
///
/// A getter and a setter of the same staticness may share a name; every
/// other combination collides. Returns the bit the declaration occupies and
/// the mask of bits it conflicts with.
fn private_shape(is_static: bool, accessor: PropertyKind) -> (u8, u8) {
    const INSTANCE_GET: u8 = 1;
    const INSTANCE_SET: u8 = 1 << 1;
    const STATIC_GET: u8 = 1 << 2;
    const STATIC_SET: u8 = 1 << 3;
    const OTHER: u8 = 1 << 4;
    const ALL: u8 = 0b1_1111;
    match (is_static, accessor) {
        (false, PropertyKind::Get) => (INSTANCE_GET, ALL & !INSTANCE_SET),
        (false, PropertyKind::Set) => (INSTANCE_SET, ALL & !INSTANCE_GET),
        (true, PropertyKind::Get) => (STATIC_GET, ALL & !STATIC_SET),
        (true, PropertyKind::Set) => (STATIC_SET, ALL & !STATIC_GET),
        _ => (OTHER, ALL),
    }
}

impl<'src> Parser<'src> {
    // ========== Entry points ==========

    /// Parse a full expression, including comma sequences
    pub(crate) fn parse_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token.location;
        let first = self.parse_assignment_expression(ctx)?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.consume(ctx, TokenKind::Comma)? {
            expressions.push(self.parse_assignment_expression(ctx)?);
        }
        Ok(Expression::Sequence(Box::new(SequenceExpression {
            meta: self.meta("SequenceExpression", start),
            expressions,
        })))
    }

    /// Parse an assignment expression in a position where no enclosing
    /// construct can reinterpret it as a pattern
    pub(crate) fn parse_assignment_expression(&mut self, ctx: Context) -> Result<Expression> {
        let cover_before = self.cover;
        let expression = self.parse_assignment_element(ctx)?;
        self.check_cover_initializers(cover_before)?;
        Ok(expression)
    }

    /// Reject pattern-only syntax recorded since `before` was captured
    ///
    /// Callers that may still reinterpret the expression as a pattern keep
    /// deferring instead; the recorded positions reach the next checked
    /// boundary through `self.cover`.
    pub(crate) fn check_cover_initializers(&mut self, before: CoverState) -> Result<()> {
        if before.shorthand_init.is_none() {
            if let Some(location) = self.cover.shorthand_init {
                return Err(self.error(messages::SHORTHAND_INITIALIZER, location));
            }
        }
        if before.duplicate_proto.is_none() {
            if let Some(location) = self.cover.duplicate_proto {
                return Err(self.early_error(messages::DUPLICATE_PROTO, location));
            }
        }
        Ok(())
    }

    // ========== Assignment ==========

    /// Parse an assignment expression, leaving pattern-only syntax for the
    /// caller to judge
    pub(crate) fn parse_assignment_element(&mut self, ctx: Context) -> Result<Expression> {
        if let TokenKind::Keyword(Keyword::Yield) = self.token.kind {
            if ctx.has_yield() {
                return self.parse_yield_expression(ctx);
            }
        }
        if let Some(arrow) = self.try_parse_arrow_function(ctx)? {
            return Ok(arrow);
        }

        let start = self.token.location;
        let cover_before = self.cover;
        let left = self.parse_conditional_expression(ctx)?;

        let Some(operator) = self.assignment_operator() else {
            return Ok(left);
        };

        let unparenthesized = left.span().start.offset == start.offset;
        let left = if operator == AssignmentOperator::Assign
            && unparenthesized
            && matches!(left, Expression::Array(_) | Expression::Object(_))
        {
            let pattern = self.reinterpret_as_pattern(ctx, left)?;
            self.cover = cover_before;
            AssignmentTarget::Pattern(Box::new(pattern))
        } else if matches!(left, Expression::Chain(_)) {
            return Err(self.early_error(messages::OPTIONAL_CHAIN_ASSIGNMENT, start));
        } else if left.is_valid_assignment_target() {
            self.check_simple_assignment_target(ctx, &left)?;
            AssignmentTarget::Expression(Box::new(left))
        } else {
            return Err(self.early_error(messages::INVALID_LEFT_HAND_SIDE, start));
        };

        self.bump(ctx)?;
        let right = self.parse_assignment_expression(ctx)?;
        Ok(Expression::Assignment(Box::new(AssignmentExpression {
            meta: self.meta("AssignmentExpression", start),
            operator,
            left,
            right,
        })))
    }

    /// The assignment operator at the current token, if any
    fn assignment_operator(&self) -> Option<AssignmentOperator> {
        let operator = match self.token.kind {
            TokenKind::Equals => AssignmentOperator::Assign,
            TokenKind::PlusEquals => AssignmentOperator::AddAssign,
            TokenKind::MinusEquals => AssignmentOperator::SubtractAssign,
            TokenKind::StarEquals => AssignmentOperator::MultiplyAssign,
            TokenKind::SlashEquals => AssignmentOperator::DivideAssign,
            TokenKind::PercentEquals => AssignmentOperator::ModuloAssign,
            TokenKind::StarStarEquals => AssignmentOperator::ExponentAssign,
            TokenKind::LessLessEquals => AssignmentOperator::ShiftLeftAssign,
            TokenKind::GreaterGreaterEquals => AssignmentOperator::ShiftRightAssign,
            TokenKind::GreaterGreaterGreaterEquals => AssignmentOperator::ShiftRightUnsignedAssign,
            TokenKind::AmpersandEquals => AssignmentOperator::BitwiseAndAssign,
            TokenKind::PipeEquals => AssignmentOperator::BitwiseOrAssign,
            TokenKind::CaretEquals => AssignmentOperator::BitwiseXorAssign,
            TokenKind::AmpersandAmpersandEquals => AssignmentOperator::LogicalAndAssign,
            TokenKind::PipePipeEquals => AssignmentOperator::LogicalOrAssign,
            TokenKind::QuestionQuestionEquals => AssignmentOperator::NullishAssign,
            _ => return None,
        };
        Some(operator)
    }

    /// Reject `eval` and `arguments` as strict-mode assignment targets
    fn check_simple_assignment_target(&self, ctx: Context, target: &Expression) -> Result<()> {
        if !ctx.has_strict() {
            return Ok(());
        }
        let mut expression = target;
        while let Expression::Parenthesized(parenthesized) = expression {
            expression = &parenthesized.expression;
        }
        if let Expression::Identifier(identifier) = expression {
            if matches!(identifier.name.as_str(), "eval" | "arguments") {
                return Err(self.early_error(
                    messages::UNEXPECTED_EVAL_ARGUMENTS,
                    identifier.meta.span.start,
                ));
            }
        }
        Ok(())
    }

    // ========== Yield ==========

    /// Parse a `yield` or `yield*` expression
    fn parse_yield_expression(&mut self, ctx: Context) -> Result<Expression> {
        let token = self.expect_keyword(ctx, Keyword::Yield)?;
        if ctx.has_parameters() {
            return Err(self.early_error(messages::YIELD_IN_PARAMETERS, token.location));
        }
        let delegate = !self.token.newline_before && self.consume(ctx, TokenKind::Star)?;
        let argument = if delegate || (!self.token.newline_before && self.at_expression_start()) {
            Some(self.parse_assignment_expression(ctx)?)
        } else {
            None
        };
        Ok(Expression::Yield(Box::new(YieldExpression {
            meta: self.meta("YieldExpression", token.location),
            argument,
            delegate,
        })))
    }

    /// Could the current token begin an expression? Decides whether `yield`
    /// has an operand.
    fn at_expression_start(&self) -> bool {
        match self.token.kind {
            TokenKind::NumberLiteral
            | TokenKind::BigIntLiteral
            | TokenKind::StringLiteral
            | TokenKind::TemplateLiteral
            | TokenKind::TemplateHead
            | TokenKind::RegexLiteral
            | TokenKind::Identifier
            | TokenKind::PrivateName
            | TokenKind::LeftParen
            | TokenKind::LeftBracket
            | TokenKind::LeftBrace
            | TokenKind::Slash
            | TokenKind::SlashEquals
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Tilde
            | TokenKind::Bang
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus => true,
            TokenKind::Less => self.options.jsx,
            TokenKind::Keyword(keyword) => matches!(
                keyword,
                Keyword::This
                    | Keyword::Super
                    | Keyword::New
                    | Keyword::Function
                    | Keyword::Class
                    | Keyword::Typeof
                    | Keyword::Void
                    | Keyword::Delete
                    | Keyword::Import
                    | Keyword::Null
                    | Keyword::True
                    | Keyword::False
            ) || !keyword.is_reserved(),
            _ => false,
        }
    }

    // ========== Conditional and binary operators ==========

    fn parse_conditional_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token.location;
        let test = self.parse_binary_expression(ctx, 0)?;
        if !self.at(TokenKind::Question) {
            return Ok(test);
        }
        self.bump(ctx)?;
        // the consequent always re-admits `in`
        let consequent = self.parse_assignment_expression(ctx.and_in(true))?;
        self.expect(ctx, TokenKind::Colon)?;
        let alternate = self.parse_assignment_expression(ctx)?;
        Ok(Expression::Conditional(Box::new(ConditionalExpression {
            meta: self.meta("ConditionalExpression", start),
            test,
            consequent,
            alternate,
        })))
    }

    /// Precedence-climbing loop for binary and logical operators
    ///
    /// `**` is right-associative and rejects an unparenthesized unary or
    /// await operand on its left. `??` refuses to associate with `&&`/`||`
    /// without parentheses; its right side starts above the `&&` tier so a
    /// mixed right operand surfaces as the left of the next iteration.
    fn parse_binary_expression(&mut self, ctx: Context, min_precedence: u8) -> Result<Expression> {
        let start = self.token.location;
        let mut left = if self.at(TokenKind::PrivateName)
            && min_precedence <= RELATIONAL_PRECEDENCE
            && ctx.has_in()
        {
            // `#field in obj` brand check; valid only directly left of `in`
            let text = self.token.text;
            let location = self.token.location;
            let private = self.parse_private_identifier(ctx)?;
            if !self.at_keyword(Keyword::In) {
                return Err(self.error(messages::unexpected_token(text), location));
            }
            Expression::Private(private)
        } else {
            self.parse_unary_expression(ctx)?
        };

        loop {
            let Some((kind, precedence, right_assoc)) = self.binary_operator(ctx) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }

            let unparenthesized = left.span().start.offset == start.offset;
            if kind == BinaryKind::Binary(BinaryOperator::Exponent)
                && unparenthesized
                && matches!(left, Expression::Unary(_) | Expression::Await(_))
            {
                return Err(self.error(messages::INVALID_EXPONENTIATION, start));
            }
            if let BinaryKind::Logical(operator) = kind {
                if unparenthesized && self.mixes_nullish(&left, operator) {
                    return Err(self.error(messages::NULLISH_WITH_LOGICAL, self.token.location));
                }
            }

            self.bump(ctx)?;
            let next_min = if right_assoc {
                precedence
            } else if kind == BinaryKind::Logical(LogicalOperator::NullishCoalescing) {
                precedence + 2
            } else {
                precedence + 1
            };
            let right = self.parse_binary_expression(ctx, next_min)?;

            left = match kind {
                BinaryKind::Binary(operator) => Expression::Binary(Box::new(BinaryExpression {
                    meta: self.meta("BinaryExpression", start),
                    operator,
                    left,
                    right,
                })),
                BinaryKind::Logical(operator) => Expression::Logical(Box::new(LogicalExpression {
                    meta: self.meta("LogicalExpression", start),
                    operator,
                    left,
                    right,
                })),
            };
        }

        Ok(left)
    }

    /// Would combining `left` with `operator` mix `??` with `&&`/`||`?
    fn mixes_nullish(&self, left: &Expression, operator: LogicalOperator) -> bool {
        let Expression::Logical(logical) = left else {
            return false;
        };
        match operator {
            LogicalOperator::NullishCoalescing => {
                logical.operator != LogicalOperator::NullishCoalescing
            }
            _ => logical.operator == LogicalOperator::NullishCoalescing,
        }
    }

    /// The binary or logical operator at the current token, with its
    /// precedence and associativity
    fn binary_operator(&self, ctx: Context) -> Option<(BinaryKind, u8, bool)> {
        let (kind, precedence) = match self.token.kind {
            TokenKind::QuestionQuestion => {
                (BinaryKind::Logical(LogicalOperator::NullishCoalescing), 4)
            }
            TokenKind::PipePipe => (BinaryKind::Logical(LogicalOperator::Or), 4),
            TokenKind::AmpersandAmpersand => (BinaryKind::Logical(LogicalOperator::And), 5),
            TokenKind::Pipe => (BinaryKind::Binary(BinaryOperator::BitwiseOr), 6),
            TokenKind::Caret => (BinaryKind::Binary(BinaryOperator::BitwiseXor), 7),
            TokenKind::Ampersand => (BinaryKind::Binary(BinaryOperator::BitwiseAnd), 8),
            TokenKind::EqualsEquals => (BinaryKind::Binary(BinaryOperator::Equal), 9),
            TokenKind::BangEquals => (BinaryKind::Binary(BinaryOperator::NotEqual), 9),
            TokenKind::EqualsEqualsEquals => (BinaryKind::Binary(BinaryOperator::StrictEqual), 9),
            TokenKind::BangEqualsEquals => {
                (BinaryKind::Binary(BinaryOperator::StrictNotEqual), 9)
            }
            TokenKind::Less => (BinaryKind::Binary(BinaryOperator::LessThan), 10),
            TokenKind::Greater => (BinaryKind::Binary(BinaryOperator::GreaterThan), 10),
            TokenKind::LessEquals => (BinaryKind::Binary(BinaryOperator::LessThanEqual), 10),
            TokenKind::GreaterEquals => {
                (BinaryKind::Binary(BinaryOperator::GreaterThanEqual), 10)
            }
            TokenKind::Keyword(Keyword::Instanceof) if !self.token.escaped => {
                (BinaryKind::Binary(BinaryOperator::Instanceof), 10)
            }
            TokenKind::Keyword(Keyword::In) if !self.token.escaped && ctx.has_in() => (
                BinaryKind::Binary(BinaryOperator::In),
                RELATIONAL_PRECEDENCE,
            ),
            TokenKind::LessLess => (BinaryKind::Binary(BinaryOperator::ShiftLeft), 11),
            TokenKind::GreaterGreater => (BinaryKind::Binary(BinaryOperator::ShiftRight), 11),
            TokenKind::GreaterGreaterGreater => {
                (BinaryKind::Binary(BinaryOperator::ShiftRightUnsigned), 11)
            }
            TokenKind::Plus => (BinaryKind::Binary(BinaryOperator::Add), 12),
            TokenKind::Minus => (BinaryKind::Binary(BinaryOperator::Subtract), 12),
            TokenKind::Star => (BinaryKind::Binary(BinaryOperator::Multiply), 13),
            TokenKind::Slash => (BinaryKind::Binary(BinaryOperator::Divide), 13),
            TokenKind::Percent => (BinaryKind::Binary(BinaryOperator::Modulo), 13),
            TokenKind::StarStar => (BinaryKind::Binary(BinaryOperator::Exponent), 14),
            _ => return None,
        };
        let right_assoc = kind == BinaryKind::Binary(BinaryOperator::Exponent);
        Some((kind, precedence, right_assoc))
    }

    // ========== Unary and update operators ==========

    fn parse_unary_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token.location;

        let operator = match self.token.kind {
            TokenKind::Plus => Some(UnaryOperator::Plus),
            TokenKind::Minus => Some(UnaryOperator::Minus),
            TokenKind::Tilde => Some(UnaryOperator::BitwiseNot),
            TokenKind::Bang => Some(UnaryOperator::Not),
            TokenKind::Keyword(Keyword::Typeof) if !self.token.escaped => {
                Some(UnaryOperator::Typeof)
            }
            TokenKind::Keyword(Keyword::Void) if !self.token.escaped => Some(UnaryOperator::Void),
            TokenKind::Keyword(Keyword::Delete) if !self.token.escaped => {
                Some(UnaryOperator::Delete)
            }
            _ => None,
        };
        if let Some(operator) = operator {
            self.bump(ctx)?;
            let argument = self.parse_unary_expression(ctx)?;
            if operator == UnaryOperator::Delete {
                self.check_delete_target(ctx, &argument)?;
            }
            return Ok(Expression::Unary(Box::new(UnaryExpression {
                meta: self.meta("UnaryExpression", start),
                operator,
                argument,
                prefix: true,
            })));
        }

        if matches!(self.token.kind, TokenKind::PlusPlus | TokenKind::MinusMinus) {
            let operator = if self.at(TokenKind::PlusPlus) {
                UpdateOperator::Increment
            } else {
                UpdateOperator::Decrement
            };
            self.bump(ctx)?;
            let argument = self.parse_unary_expression(ctx)?;
            self.check_update_target(ctx, &argument, true)?;
            return Ok(Expression::Update(Box::new(UpdateExpression {
                meta: self.meta("UpdateExpression", start),
                operator,
                argument,
                prefix: true,
            })));
        }

        if self.at_keyword(Keyword::Await) && ctx.has_await() {
            return self.parse_await_expression(ctx);
        }

        self.parse_postfix_expression(ctx)
    }

    /// Parse a left-hand-side expression and an optional postfix `++`/`--`
    ///
    /// A line break before the operator detaches it, so `a\n++b` is two
    /// statements once semicolons are inserted.
    fn parse_postfix_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token.location;
        let expression = self.parse_left_hand_side_expression(ctx)?;
        if matches!(self.token.kind, TokenKind::PlusPlus | TokenKind::MinusMinus)
            && !self.token.newline_before
        {
            self.check_update_target(ctx, &expression, false)?;
            let operator = if self.at(TokenKind::PlusPlus) {
                UpdateOperator::Increment
            } else {
                UpdateOperator::Decrement
            };
            self.bump(ctx)?;
            return Ok(Expression::Update(Box::new(UpdateExpression {
                meta: self.meta("UpdateExpression", start),
                operator,
                argument: expression,
                prefix: false,
            })));
        }
        Ok(expression)
    }

    fn parse_await_expression(&mut self, ctx: Context) -> Result<Expression> {
        let token = self.expect_keyword(ctx, Keyword::Await)?;
        if ctx.has_parameters() {
            return Err(self.early_error(messages::AWAIT_IN_PARAMETERS, token.location));
        }
        let argument = self.parse_unary_expression(ctx)?;
        Ok(Expression::Await(Box::new(AwaitExpression {
            meta: self.meta("AwaitExpression", token.location),
            argument,
        })))
    }

    /// Reject `delete ident` in strict mode and `delete obj.#x` everywhere
    fn check_delete_target(&self, ctx: Context, argument: &Expression) -> Result<()> {
        let mut target = argument;
        loop {
            match target {
                Expression::Parenthesized(parenthesized) => target = &parenthesized.expression,
                Expression::Chain(chain) => target = &chain.expression,
                _ => break,
            }
        }
        match target {
            Expression::Identifier(identifier) if ctx.has_strict() => Err(self.early_error(
                messages::STRICT_DELETE,
                identifier.meta.span.start,
            )),
            Expression::Member(member) => {
                if let Expression::Private(private) = &member.property {
                    return Err(self.early_error(
                        messages::DELETE_PRIVATE_NAME,
                        private.meta.span.start,
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// An update operand must be a simple assignment target
    fn check_update_target(&self, ctx: Context, argument: &Expression, prefix: bool) -> Result<()> {
        if !argument.is_valid_assignment_target() {
            let message = if prefix {
                messages::INVALID_ASSIGNMENT_PREFIX
            } else {
                messages::INVALID_ASSIGNMENT_POSTFIX
            };
            return Err(self.early_error(message, argument.span().start));
        }
        self.check_simple_assignment_target(ctx, argument)
    }

    // ========== Member access, calls and new ==========

    fn parse_left_hand_side_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token.location;
        let expression = if self.at_keyword(Keyword::New) {
            self.parse_new_expression(ctx)?
        } else {
            self.parse_primary_expression(ctx)?
        };
        self.parse_call_tail(ctx, expression, start)
    }

    /// Extend an expression with member accesses, calls, tagged templates
    /// and optional-chain links, wrapping the result in a ChainExpression
    /// when any link used `?.`
    fn parse_call_tail(
        &mut self,
        ctx: Context,
        mut expression: Expression,
        start: SourceLocation,
    ) -> Result<Expression> {
        let mut in_chain = false;
        loop {
            match self.token.kind {
                TokenKind::Dot => {
                    self.bump(ctx)?;
                    let property = self.parse_member_property(ctx)?;
                    expression = Expression::Member(Box::new(MemberExpression {
                        meta: self.meta("MemberExpression", start),
                        object: expression,
                        property,
                        computed: false,
                        optional: false,
                    }));
                }
                TokenKind::LeftBracket => {
                    self.bump(ctx)?;
                    let property = self.parse_expression(ctx.and_in(true))?;
                    self.expect(ctx, TokenKind::RightBracket)?;
                    expression = Expression::Member(Box::new(MemberExpression {
                        meta: self.meta("MemberExpression", start),
                        object: expression,
                        property,
                        computed: true,
                        optional: false,
                    }));
                }
                TokenKind::LeftParen => {
                    let arguments = self.parse_arguments(ctx)?;
                    expression = Expression::Call(Box::new(CallExpression {
                        meta: self.meta("CallExpression", start),
                        callee: expression,
                        arguments,
                        optional: false,
                    }));
                }
                TokenKind::QuestionDot => {
                    in_chain = true;
                    self.bump(ctx)?;
                    match self.token.kind {
                        TokenKind::LeftParen => {
                            let arguments = self.parse_arguments(ctx)?;
                            expression = Expression::Call(Box::new(CallExpression {
                                meta: self.meta("CallExpression", start),
                                callee: expression,
                                arguments,
                                optional: true,
                            }));
                        }
                        TokenKind::LeftBracket => {
                            self.bump(ctx)?;
                            let property = self.parse_expression(ctx.and_in(true))?;
                            self.expect(ctx, TokenKind::RightBracket)?;
                            expression = Expression::Member(Box::new(MemberExpression {
                                meta: self.meta("MemberExpression", start),
                                object: expression,
                                property,
                                computed: true,
                                optional: true,
                            }));
                        }
                        TokenKind::TemplateLiteral | TokenKind::TemplateHead => {
                            return Err(self.error(
                                messages::TAGGED_TEMPLATE_IN_CHAIN,
                                self.token.location,
                            ));
                        }
                        _ => {
                            let property = self.parse_member_property(ctx)?;
                            expression = Expression::Member(Box::new(MemberExpression {
                                meta: self.meta("MemberExpression", start),
                                object: expression,
                                property,
                                computed: false,
                                optional: true,
                            }));
                        }
                    }
                }
                TokenKind::TemplateLiteral | TokenKind::TemplateHead => {
                    if in_chain {
                        return Err(self.error(
                            messages::TAGGED_TEMPLATE_IN_CHAIN,
                            self.token.location,
                        ));
                    }
                    let quasi = self.parse_template_literal(ctx, true)?;
                    expression = Expression::TaggedTemplate(Box::new(TaggedTemplate {
                        meta: self.meta("TaggedTemplateExpression", start),
                        tag: expression,
                        quasi,
                    }));
                }
                _ => break,
            }
        }
        if in_chain {
            expression = Expression::Chain(Box::new(ChainExpression {
                meta: self.meta("ChainExpression", start),
                expression,
            }));
        }
        Ok(expression)
    }

    /// The property after `.` or `?.`: an identifier name or a private name
    fn parse_member_property(&mut self, ctx: Context) -> Result<Expression> {
        if self.at(TokenKind::PrivateName) {
            return Ok(Expression::Private(self.parse_private_identifier(ctx)?));
        }
        Ok(Expression::Identifier(self.parse_identifier_name(ctx)?))
    }

    /// Parse a parenthesized argument list, spreads and trailing comma
    /// included
    fn parse_arguments(&mut self, ctx: Context) -> Result<Vec<Expression>> {
        self.expect(ctx, TokenKind::LeftParen)?;
        let ctx = ctx.and_in(true);
        let mut arguments = Vec::new();
        while !self.at(TokenKind::RightParen) {
            let argument = if self.at(TokenKind::DotDotDot) {
                let start = self.token.location;
                self.bump(ctx)?;
                let inner = self.parse_assignment_expression(ctx)?;
                Expression::Spread(Box::new(SpreadElement {
                    meta: self.meta("SpreadElement", start),
                    argument: inner,
                }))
            } else {
                self.parse_assignment_expression(ctx)?
            };
            arguments.push(argument);
            if !self.at(TokenKind::RightParen) {
                self.expect(ctx, TokenKind::Comma)?;
            }
        }
        self.expect(ctx, TokenKind::RightParen)?;
        Ok(arguments)
    }

    /// Parse `new` with its callee and optional arguments, or `new.target`
    fn parse_new_expression(&mut self, ctx: Context) -> Result<Expression> {
        let new_token = self.expect_keyword(ctx, Keyword::New)?;
        let start = new_token.location;

        if self.at(TokenKind::Dot) {
            let meta_ident = self.identifier_node(&new_token);
            self.bump(ctx)?;
            let property_token = self.bump(ctx)?;
            if property_token.kind != TokenKind::Keyword(Keyword::Target) || property_token.escaped
            {
                return Err(self.error(
                    messages::unexpected_token(property_token.kind.as_display_str()),
                    property_token.location,
                ));
            }
            let property = self.identifier_node(&property_token);
            if !ctx.has_function() {
                return Err(self.early_error(messages::NEW_TARGET_OUTSIDE_FUNCTION, start));
            }
            return Ok(Expression::MetaProperty(MetaProperty {
                meta: self.meta("MetaProperty", start),
                meta_ident,
                property,
            }));
        }

        let callee = self.parse_new_callee(ctx)?;
        if matches!(callee, Expression::Import(_)) {
            return Err(self.error(messages::unexpected_token("import"), callee.span().start));
        }
        let arguments = if self.at(TokenKind::LeftParen) {
            self.parse_arguments(ctx)?
        } else {
            Vec::new()
        };
        Ok(Expression::New(Box::new(NewExpression {
            meta: self.meta("NewExpression", start),
            callee,
            arguments,
        })))
    }

    /// The callee of `new`: a member expression without call links
    fn parse_new_callee(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token.location;
        let mut expression = if self.at_keyword(Keyword::New) {
            self.parse_new_expression(ctx)?
        } else {
            self.parse_primary_expression(ctx)?
        };
        loop {
            match self.token.kind {
                TokenKind::Dot => {
                    self.bump(ctx)?;
                    let property = self.parse_member_property(ctx)?;
                    expression = Expression::Member(Box::new(MemberExpression {
                        meta: self.meta("MemberExpression", start),
                        object: expression,
                        property,
                        computed: false,
                        optional: false,
                    }));
                }
                TokenKind::LeftBracket => {
                    self.bump(ctx)?;
                    let property = self.parse_expression(ctx.and_in(true))?;
                    self.expect(ctx, TokenKind::RightBracket)?;
                    expression = Expression::Member(Box::new(MemberExpression {
                        meta: self.meta("MemberExpression", start),
                        object: expression,
                        property,
                        computed: true,
                        optional: false,
                    }));
                }
                TokenKind::TemplateLiteral | TokenKind::TemplateHead => {
                    let quasi = self.parse_template_literal(ctx, true)?;
                    expression = Expression::TaggedTemplate(Box::new(TaggedTemplate {
                        meta: self.meta("TaggedTemplateExpression", start),
                        tag: expression,
                        quasi,
                    }));
                }
                TokenKind::QuestionDot => {
                    return Err(self.error(messages::NEW_OPTIONAL_CHAIN, self.token.location));
                }
                _ => break,
            }
        }
        Ok(expression)
    }

    /// `super` is valid only as `super(...)` in a derived constructor or as
    /// `super.x`/`super[x]` in a method; judged by the following token
    fn parse_super_expression(&mut self, ctx: Context) -> Result<Expression> {
        let token = self.expect_keyword(ctx, Keyword::Super)?;
        match self.token.kind {
            TokenKind::LeftParen if ctx.has_super_call() => {}
            TokenKind::Dot | TokenKind::LeftBracket if ctx.has_method() => {}
            _ => return Err(self.error(messages::SUPER_OUTSIDE_METHOD, token.location)),
        }
        Ok(Expression::Super(Super {
            meta: self.meta("Super", token.location),
        }))
    }

    /// `import.meta`, or a dynamic `import(specifier)` call
    fn parse_import_expression_or_meta(&mut self, ctx: Context) -> Result<Expression> {
        let import_token = self.expect_keyword(ctx, Keyword::Import)?;
        let start = import_token.location;

        if self.at(TokenKind::Dot) {
            let meta_ident = self.identifier_node(&import_token);
            self.bump(ctx)?;
            let property_token = self.bump(ctx)?;
            if property_token.kind != TokenKind::Keyword(Keyword::Meta) || property_token.escaped {
                return Err(self.error(
                    messages::unexpected_token(property_token.kind.as_display_str()),
                    property_token.location,
                ));
            }
            let property = self.identifier_node(&property_token);
            if !ctx.has_module() {
                return Err(self.goal_error(messages::IMPORT_META_OUTSIDE_MODULE, start));
            }
            return Ok(Expression::MetaProperty(MetaProperty {
                meta: self.meta("MetaProperty", start),
                meta_ident,
                property,
            }));
        }

        self.expect(ctx, TokenKind::LeftParen)?;
        if self.at(TokenKind::DotDotDot) {
            return Err(self.unexpected());
        }
        let source = self.parse_assignment_expression(ctx.and_in(true))?;
        self.consume(ctx, TokenKind::Comma)?;
        self.expect(ctx, TokenKind::RightParen)?;
        Ok(Expression::Import(Box::new(ImportExpression {
            meta: self.meta("ImportExpression", start),
            source,
        })))
    }

    // ========== Primary expressions ==========

    fn parse_primary_expression(&mut self, ctx: Context) -> Result<Expression> {
        match self.token.kind {
            TokenKind::NumberLiteral
            | TokenKind::BigIntLiteral
            | TokenKind::StringLiteral
            | TokenKind::Keyword(Keyword::Null)
            | TokenKind::Keyword(Keyword::True)
            | TokenKind::Keyword(Keyword::False) => {
                Ok(Expression::Literal(self.parse_literal(ctx)?))
            }
            TokenKind::Slash | TokenKind::SlashEquals => self.parse_regex_literal(ctx),
            TokenKind::TemplateLiteral | TokenKind::TemplateHead => Ok(
                Expression::TemplateLiteral(self.parse_template_literal(ctx, false)?),
            ),
            TokenKind::Keyword(Keyword::This) => {
                let token = self.expect_keyword(ctx, Keyword::This)?;
                Ok(Expression::This(ThisExpression {
                    meta: self.meta("ThisExpression", token.location),
                }))
            }
            TokenKind::LeftBracket => self.parse_array_literal(ctx),
            TokenKind::LeftBrace => self.parse_object_literal(ctx),
            TokenKind::LeftParen => self.parse_parenthesized_expression(ctx),
            TokenKind::Keyword(Keyword::Function) => {
                let start = self.token.location;
                self.parse_function_expression(ctx, start, false)
            }
            TokenKind::Keyword(Keyword::Class) => self.parse_class_expression(ctx),
            TokenKind::Keyword(Keyword::Super) => self.parse_super_expression(ctx),
            TokenKind::Keyword(Keyword::Import) => self.parse_import_expression_or_meta(ctx),
            TokenKind::Keyword(Keyword::Async) if !self.token.escaped => {
                // `async function ...`; a bare `async` is a plain reference
                let start = self.token.location;
                let saved = self.save_state();
                self.bump(ctx)?;
                if self.at_keyword(Keyword::Function) && !self.token.newline_before {
                    return self.parse_function_expression(ctx, start, true);
                }
                self.load_state(saved);
                Ok(Expression::Identifier(self.parse_identifier_reference(ctx)?))
            }
            TokenKind::Less if self.options.jsx => self.parse_jsx_element_or_fragment(ctx),
            TokenKind::Identifier | TokenKind::Keyword(_) => {
                Ok(Expression::Identifier(self.parse_identifier_reference(ctx)?))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Parse one literal token into a node, keeping the raw text when asked
    fn parse_literal(&mut self, ctx: Context) -> Result<Literal> {
        if let TokenKind::Keyword(_) = self.token.kind {
            if self.token.escaped {
                return Err(self.error(messages::KEYWORD_ESCAPE, self.token.location));
            }
        }
        let token = self.bump(ctx)?;
        let span = Span::new(token.location, self.prev_token_end);
        let value = match (&token.kind, &token.value) {
            (TokenKind::Keyword(Keyword::Null), _) => LiteralValue::Null,
            (TokenKind::Keyword(Keyword::True), _) => LiteralValue::Boolean(true),
            (TokenKind::Keyword(Keyword::False), _) => LiteralValue::Boolean(false),
            (TokenKind::NumberLiteral, TokenValue::Number(number)) => LiteralValue::Number(*number),
            (TokenKind::BigIntLiteral, TokenValue::BigInt(bigint)) => {
                LiteralValue::BigInt(bigint.clone())
            }
            (TokenKind::StringLiteral, TokenValue::String(string)) => {
                LiteralValue::String(string.clone())
            }
            _ => {
                return Err(self.error(
                    messages::unexpected_token(token.kind.as_display_str()),
                    token.location,
                ))
            }
        };
        Ok(Literal {
            meta: self.meta_at("Literal", span),
            value,
            raw: self.raw(span),
        })
    }

    /// Rescan the `/` under regex rules and build the literal
    fn parse_regex_literal(&mut self, ctx: Context) -> Result<Expression> {
        self.relex_regex(ctx)?;
        let token = self.bump(ctx)?;
        let span = Span::new(token.location, self.prev_token_end);
        let TokenValue::Regex { pattern, flags } = token.value else {
            return Err(self.error(
                messages::unexpected_token(token.kind.as_display_str()),
                token.location,
            ));
        };
        Ok(Expression::Literal(Literal {
            meta: self.meta_at("Literal", span),
            value: LiteralValue::Regex { pattern, flags },
            raw: self.raw(span),
        }))
    }

    fn parse_array_literal(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token.location;
        self.bump(ctx)?;
        let ctx = ctx.and_in(true);
        let mut elements = Vec::new();
        while !self.at(TokenKind::RightBracket) {
            if self.consume(ctx, TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            let element = if self.at(TokenKind::DotDotDot) {
                let spread_start = self.token.location;
                self.bump(ctx)?;
                let argument = self.parse_assignment_element(ctx)?;
                Expression::Spread(Box::new(SpreadElement {
                    meta: self.meta("SpreadElement", spread_start),
                    argument,
                }))
            } else {
                self.parse_assignment_element(ctx)?
            };
            elements.push(Some(element));
            if !self.at(TokenKind::RightBracket) {
                self.expect(ctx, TokenKind::Comma)?;
            }
        }
        self.expect(ctx, TokenKind::RightBracket)?;
        Ok(Expression::Array(ArrayExpression {
            meta: self.meta("ArrayExpression", start),
            elements,
        }))
    }

    /// Parse `( ... )` as grouping or a comma sequence
    ///
    /// Arrow heads never reach this method; the assignment level routes
    /// them through [`Parser::try_parse_arrow_function`] first.
    fn parse_parenthesized_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token.location;
        self.bump(ctx)?;
        let inner_ctx = ctx.and_in(true);
        let first_start = self.token.location;
        let cover_before = self.cover;
        let mut expression = self.parse_assignment_element(inner_ctx)?;
        if self.at(TokenKind::Comma) {
            // a sequence can no longer become a pattern
            self.check_cover_initializers(cover_before)?;
            let mut expressions = vec![expression];
            while self.consume(inner_ctx, TokenKind::Comma)? {
                expressions.push(self.parse_assignment_expression(inner_ctx)?);
            }
            expression = Expression::Sequence(Box::new(SequenceExpression {
                meta: self.meta_at(
                    "SequenceExpression",
                    Span::new(first_start, self.prev_token_end),
                ),
                expressions,
            }));
        }
        self.expect(ctx, TokenKind::RightParen)?;
        if self.options.preserve_parens {
            return Ok(Expression::Parenthesized(Box::new(
                ParenthesizedExpression {
                    meta: self.meta("ParenthesizedExpression", start),
                    expression,
                },
            )));
        }
        Ok(expression)
    }

    // ========== Object literals ==========

    fn parse_object_literal(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token.location;
        self.bump(ctx)?;
        let ctx = ctx.and_in(true);
        let mut properties = Vec::new();
        let mut seen_proto = false;
        while !self.at(TokenKind::RightBrace) {
            if self.at(TokenKind::DotDotDot) {
                let spread_start = self.token.location;
                self.bump(ctx)?;
                let argument = self.parse_assignment_element(ctx)?;
                properties.push(ObjectPropertyKind::Spread(Box::new(SpreadElement {
                    meta: self.meta("SpreadElement", spread_start),
                    argument,
                })));
            } else {
                let property = self.parse_object_property(ctx)?;
                // a second plain `__proto__: value` is an error unless the
                // literal turns out to be a destructuring pattern
                if property.kind == PropertyKind::Init
                    && !property.computed
                    && !property.shorthand
                    && !property.method
                    && property.key.static_name() == Some("__proto__")
                {
                    if seen_proto && self.cover.duplicate_proto.is_none() {
                        self.cover.duplicate_proto = Some(property.key.span().start);
                    }
                    seen_proto = true;
                }
                properties.push(ObjectPropertyKind::Property(Box::new(property)));
            }
            if !self.at(TokenKind::RightBrace) {
                self.expect(ctx, TokenKind::Comma)?;
            }
        }
        self.expect(ctx, TokenKind::RightBrace)?;
        Ok(Expression::Object(ObjectExpression {
            meta: self.meta("ObjectExpression", start),
            properties,
        }))
    }

    /// One object-literal entry: plain property, shorthand, method or
    /// accessor
    fn parse_object_property(&mut self, ctx: Context) -> Result<Property> {
        let start = self.token.location;

        if self.at(TokenKind::Star) {
            self.bump(ctx)?;
            let (key, computed) = self.parse_property_key(ctx, false)?;
            return self.finish_object_method(ctx, start, key, computed, false, true, PropertyKind::Init);
        }

        let first_token = self.token.clone();
        let (mut key, mut computed) = self.parse_property_key(ctx, false)?;

        // `async`, `get` and `set` are modifiers only when a key follows
        let mut kind = PropertyKind::Init;
        let mut is_async = false;
        let mut is_generator = false;
        if !computed && !first_token.escaped {
            match first_token.kind {
                TokenKind::Keyword(Keyword::Async)
                    if !self.token.newline_before
                        && (self.at(TokenKind::Star) || self.at_property_key(false)) =>
                {
                    is_async = true;
                    is_generator = self.consume(ctx, TokenKind::Star)?;
                    (key, computed) = self.parse_property_key(ctx, false)?;
                }
                TokenKind::Keyword(Keyword::Get) if self.at_property_key(false) => {
                    kind = PropertyKind::Get;
                    (key, computed) = self.parse_property_key(ctx, false)?;
                }
                TokenKind::Keyword(Keyword::Set) if self.at_property_key(false) => {
                    kind = PropertyKind::Set;
                    (key, computed) = self.parse_property_key(ctx, false)?;
                }
                _ => {}
            }
        }

        if self.at(TokenKind::LeftParen) {
            return self.finish_object_method(ctx, start, key, computed, is_async, is_generator, kind);
        }
        if kind != PropertyKind::Init || is_async || is_generator {
            return Err(self.unexpected());
        }

        if self.consume(ctx, TokenKind::Colon)? {
            let value = self.parse_assignment_element(ctx)?;
            return Ok(Property {
                meta: self.meta("Property", start),
                key,
                value: PropertyValue::Expression(value),
                kind: PropertyKind::Init,
                computed,
                shorthand: false,
                method: false,
            });
        }
        if computed {
            return Err(self.error(
                messages::expected_token(":", self.token.kind.as_display_str()),
                self.token.location,
            ));
        }

        // shorthand; the key doubles as a reference
        let PropertyKey::Identifier(identifier) = &key else {
            return Err(self.error(
                messages::expected_token(":", self.token.kind.as_display_str()),
                self.token.location,
            ));
        };
        self.check_identifier_token(&first_token, ctx)?;
        let reference = Expression::Identifier(identifier.clone());
        let value = if self.at(TokenKind::Equals) {
            // legal only if the literal becomes a destructuring pattern
            if self.cover.shorthand_init.is_none() {
                self.cover.shorthand_init = Some(self.token.location);
            }
            self.bump(ctx)?;
            let right = self.parse_assignment_expression(ctx)?;
            Expression::Assignment(Box::new(AssignmentExpression {
                meta: self.meta("AssignmentExpression", start),
                operator: AssignmentOperator::Assign,
                left: AssignmentTarget::Expression(Box::new(reference)),
                right,
            }))
        } else {
            reference
        };
        Ok(Property {
            meta: self.meta("Property", start),
            key,
            value: PropertyValue::Expression(value),
            kind: PropertyKind::Init,
            computed: false,
            shorthand: true,
            method: false,
        })
    }

    fn finish_object_method(
        &mut self,
        ctx: Context,
        start: SourceLocation,
        key: PropertyKey,
        computed: bool,
        is_async: bool,
        is_generator: bool,
        kind: PropertyKind,
    ) -> Result<Property> {
        let value = self.parse_method_value(ctx, is_async, is_generator, kind, false)?;
        Ok(Property {
            meta: self.meta("Property", start),
            key,
            value: PropertyValue::Expression(value),
            kind,
            computed,
            shorthand: false,
            method: kind == PropertyKind::Init,
        })
    }

    /// Could the current token begin a property key?
    fn at_property_key(&self, allow_private: bool) -> bool {
        match self.token.kind {
            TokenKind::Identifier
            | TokenKind::Keyword(_)
            | TokenKind::StringLiteral
            | TokenKind::NumberLiteral
            | TokenKind::BigIntLiteral
            | TokenKind::LeftBracket => true,
            TokenKind::PrivateName => allow_private,
            _ => false,
        }
    }

    /// Parse a property key, reporting whether it was computed
    fn parse_property_key(
        &mut self,
        ctx: Context,
        allow_private: bool,
    ) -> Result<(PropertyKey, bool)> {
        match self.token.kind {
            TokenKind::LeftBracket => {
                self.bump(ctx)?;
                let expression = self.parse_assignment_expression(ctx.and_in(true))?;
                self.expect(ctx, TokenKind::RightBracket)?;
                Ok((PropertyKey::Computed(Box::new(expression)), true))
            }
            TokenKind::StringLiteral | TokenKind::NumberLiteral | TokenKind::BigIntLiteral => {
                Ok((PropertyKey::Literal(self.parse_literal(ctx)?), false))
            }
            TokenKind::PrivateName if allow_private => Ok((
                PropertyKey::Private(self.private_identifier_node(ctx)?),
                false,
            )),
            TokenKind::Identifier | TokenKind::Keyword(_) => {
                let token = self.bump(ctx)?;
                Ok((PropertyKey::Identifier(self.identifier_node(&token)), false))
            }
            _ => Err(self.unexpected()),
        }
    }

    // ========== Template literals ==========

    /// Parse a template literal; `tagged` relaxes invalid escapes into
    /// undefined cooked values
    fn parse_template_literal(&mut self, ctx: Context, tagged: bool) -> Result<TemplateLiteral> {
        let start = self.token.location;
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();

        let single = self.at(TokenKind::TemplateLiteral);
        quasis.push(self.parse_template_element(ctx, tagged)?);
        if !single {
            loop {
                expressions.push(self.parse_expression(ctx.and_in(true))?);
                if !self.at(TokenKind::RightBrace) {
                    return Err(self.error(
                        messages::expected_token("}", self.token.kind.as_display_str()),
                        self.token.location,
                    ));
                }
                self.bump_template()?;
                let tail = self.at(TokenKind::TemplateTail);
                quasis.push(self.parse_template_element(ctx, tagged)?);
                if tail {
                    break;
                }
            }
        }

        Ok(TemplateLiteral {
            meta: self.meta("TemplateLiteral", start),
            quasis,
            expressions,
        })
    }

    /// Build a TemplateElement from the current chunk token
    ///
    /// The element's span excludes the delimiters: the leading backtick or
    /// `}` and the trailing backtick or `${`.
    fn parse_template_element(&mut self, ctx: Context, tagged: bool) -> Result<TemplateElement> {
        if let Some(error) = self.lexer.take_template_error() {
            if !tagged {
                return Err(error);
            }
        }
        let token = self.token.clone();
        let end = self.token_end;
        let tail = matches!(
            token.kind,
            TokenKind::TemplateLiteral | TokenKind::TemplateTail
        );
        let trailing = if tail { 1 } else { 2 };
        let cooked = match &token.value {
            TokenValue::Template(cooked) => cooked.clone(),
            _ => None,
        };
        let raw_text = &token.text[1..token.text.len() - trailing];
        let inner = Span::new(
            SourceLocation {
                offset: token.location.offset + 1,
                line: token.location.line,
                column: token.location.column + 1,
            },
            SourceLocation {
                offset: end.offset - trailing,
                line: end.line,
                column: end.column - trailing as u32,
            },
        );
        self.bump(ctx)?;
        Ok(TemplateElement {
            meta: self.meta_at("TemplateElement", inner),
            value: TemplateValue {
                raw: raw_text.to_string(),
                cooked,
            },
            tail,
        })
    }

    // ========== Arrow functions ==========

    /// Commit to an arrow function if one starts here
    ///
    /// The decision needs bounded lookahead: a parenthesized head is only an
    /// arrow head if `=>` follows the closing parenthesis, and `async` is
    /// only a modifier when an arrow head follows on the same line.
    fn try_parse_arrow_function(&mut self, ctx: Context) -> Result<Option<Expression>> {
        match self.token.kind {
            TokenKind::LeftParen => {
                if self.peek_arrow_after_parens(ctx)? {
                    let start = self.token.location;
                    return Ok(Some(self.parse_arrow_function(ctx, start, false)?));
                }
                Ok(None)
            }
            TokenKind::Keyword(Keyword::Async) if !self.token.escaped => {
                let start = self.token.location;
                let saved = self.save_state();
                self.bump(ctx)?;
                if !self.token.newline_before {
                    if self.at(TokenKind::LeftParen) {
                        if self.peek_arrow_after_parens(ctx)? {
                            return Ok(Some(self.parse_arrow_function(ctx, start, true)?));
                        }
                    } else if self.at_arrow_parameter_name() && self.identifier_arrow_ahead(ctx)? {
                        return Ok(Some(self.parse_arrow_function(ctx, start, true)?));
                    }
                }
                self.load_state(saved);
                self.try_parse_identifier_arrow(ctx)
            }
            _ => self.try_parse_identifier_arrow(ctx),
        }
    }

    /// `name => ...` with a single unparenthesized parameter
    fn try_parse_identifier_arrow(&mut self, ctx: Context) -> Result<Option<Expression>> {
        if !self.at_arrow_parameter_name() {
            return Ok(None);
        }
        let start = self.token.location;
        if !self.identifier_arrow_ahead(ctx)? {
            return Ok(None);
        }
        Ok(Some(self.parse_arrow_function(ctx, start, false)?))
    }

    /// Identifier-like tokens that could name an arrow parameter
    fn at_arrow_parameter_name(&self) -> bool {
        match self.token.kind {
            TokenKind::Identifier => true,
            TokenKind::Keyword(keyword) => !keyword.is_reserved(),
            _ => false,
        }
    }

    /// Is the current identifier-like token directly followed by `=>`?
    fn identifier_arrow_ahead(&mut self, ctx: Context) -> Result<bool> {
        let saved = self.save_state();
        let found = match self.bump(ctx) {
            Ok(_) => self.at(TokenKind::Arrow),
            Err(_) => false,
        };
        if found && self.token.newline_before {
            return Err(self.error(messages::NEWLINE_AFTER_ARROW_HEAD, self.token.location));
        }
        self.load_state(saved);
        Ok(found)
    }

    /// Skim a balanced `( ... )` group and report whether `=>` follows
    ///
    /// Only the head shape is decided here; the parameters are parsed for
    /// real afterwards. A scan error inside the group answers no and the
    /// non-arrow parse reports it properly.
    fn peek_arrow_after_parens(&mut self, ctx: Context) -> Result<bool> {
        let saved = self.save_state();
        let mut depth = 0usize;
        let result = loop {
            match self.token.kind {
                TokenKind::Eof => break false,
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let found = match self.bump(ctx) {
                            Ok(_) => self.at(TokenKind::Arrow),
                            Err(_) => false,
                        };
                        if found && self.token.newline_before {
                            return Err(self.error(
                                messages::NEWLINE_AFTER_ARROW_HEAD,
                                self.token.location,
                            ));
                        }
                        break found;
                    }
                }
                _ => {}
            }
            if self.bump(ctx).is_err() {
                break false;
            }
        };
        self.load_state(saved);
        Ok(result)
    }

    /// Parse a committed arrow function starting at the parameter list
    fn parse_arrow_function(
        &mut self,
        ctx: Context,
        start: SourceLocation,
        is_async: bool,
    ) -> Result<Expression> {
        // parameters read `yield` and `await` under the enclosing rules
        let param_ctx = ctx.union_await_if(is_async).and_parameters(true);
        let (params, simple) = if self.at(TokenKind::LeftParen) {
            self.parse_formal_parameters(param_ctx)?
        } else {
            let identifier = self.parse_binding_identifier(param_ctx)?;
            (vec![Pattern::Identifier(identifier)], true)
        };
        self.check_parameter_names(&params, true)?;
        self.expect(ctx, TokenKind::Arrow)?;

        let body_ctx = ctx.for_arrow_body(is_async);
        if self.at(TokenKind::LeftBrace) {
            let block = self.parse_function_block(ctx, body_ctx, None, &params, simple)?;
            return Ok(Expression::Arrow(Box::new(Function {
                meta: self.meta("ArrowFunctionExpression", start),
                id: None,
                params,
                body: FunctionBody::Block(block),
                is_async,
                is_generator: false,
                expression: false,
            })));
        }
        let body = self.parse_assignment_expression(body_ctx)?;
        Ok(Expression::Arrow(Box::new(Function {
            meta: self.meta("ArrowFunctionExpression", start),
            id: None,
            params,
            body: FunctionBody::Expression(Box::new(body)),
            is_async,
            is_generator: false,
            expression: true,
        })))
    }

    // ========== Functions ==========

    /// Parse a function declaration; the caller has consumed any `async`
    /// and positioned `start` accordingly
    pub(crate) fn parse_function_declaration(
        &mut self,
        ctx: Context,
        start: SourceLocation,
        is_async: bool,
        allow_anonymous: bool,
    ) -> Result<Statement> {
        self.expect_keyword(ctx, Keyword::Function)?;
        let is_generator = self.consume(ctx, TokenKind::Star)?;
        let id = if allow_anonymous && self.at(TokenKind::LeftParen) {
            None
        } else {
            let identifier = self.parse_binding_identifier(ctx)?;
            if (is_generator && identifier.name == "yield")
                || (is_async && identifier.name == "await")
            {
                return Err(self.error(
                    messages::UNEXPECTED_RESERVED_WORD,
                    identifier.meta.span.start,
                ));
            }
            Some(identifier)
        };
        let base = ctx.for_function_body(is_async, is_generator);
        let function = self.parse_function_rest(
            ctx,
            base,
            start,
            "FunctionDeclaration",
            id,
            is_async,
            is_generator,
            false,
        )?;
        Ok(Statement::FunctionDeclaration(Box::new(function)))
    }

    /// Parse a function expression; the name, if any, lives in the
    /// function's own scope
    fn parse_function_expression(
        &mut self,
        ctx: Context,
        start: SourceLocation,
        is_async: bool,
    ) -> Result<Expression> {
        self.expect_keyword(ctx, Keyword::Function)?;
        let is_generator = self.consume(ctx, TokenKind::Star)?;
        let id = if self.at(TokenKind::LeftParen) {
            None
        } else {
            let name_ctx = ctx.and_yield(is_generator).and_await(is_async);
            Some(self.parse_binding_identifier(name_ctx)?)
        };
        let base = ctx.for_function_body(is_async, is_generator);
        let function = self.parse_function_rest(
            ctx,
            base,
            start,
            "FunctionExpression",
            id,
            is_async,
            is_generator,
            false,
        )?;
        Ok(Expression::Function(Box::new(function)))
    }

    /// Parse a method body as a function expression starting at `(`,
    /// enforcing accessor arity
    fn parse_method_value(
        &mut self,
        ctx: Context,
        is_async: bool,
        is_generator: bool,
        accessor: PropertyKind,
        super_call: bool,
    ) -> Result<Expression> {
        let start = self.token.location;
        let base = ctx
            .for_function_body(is_async, is_generator)
            .and_method(true)
            .and_super_call(super_call);
        let function = self.parse_function_rest(
            ctx,
            base,
            start,
            "FunctionExpression",
            None,
            is_async,
            is_generator,
            true,
        )?;
        match accessor {
            PropertyKind::Get => {
                if !function.params.is_empty() {
                    return Err(self.error(messages::GETTER_NO_PARAMS, start));
                }
            }
            PropertyKind::Set => {
                if function.params.len() != 1 {
                    return Err(self.error(messages::SETTER_ONE_PARAM, start));
                }
                if matches!(function.params[0], Pattern::Rest(_)) {
                    return Err(self.error(messages::SETTER_REST_PARAM, start));
                }
            }
            PropertyKind::Init => {}
        }
        Ok(Expression::Function(Box::new(function)))
    }

    /// Parse `(params) { body }` under `base` and build the function node
    fn parse_function_rest(
        &mut self,
        ctx: Context,
        base: Context,
        start: SourceLocation,
        kind: &'static str,
        id: Option<Identifier>,
        is_async: bool,
        is_generator: bool,
        forbid_duplicate_params: bool,
    ) -> Result<Function> {
        let param_ctx = base.and_parameters(true);
        let (params, simple) = self.parse_formal_parameters(param_ctx)?;
        let forbid = forbid_duplicate_params || base.has_strict() || !simple;
        self.check_parameter_names(&params, forbid)?;
        let body = self.parse_function_block(ctx, base, id.as_ref(), &params, simple)?;
        Ok(Function {
            meta: self.meta(kind, start),
            id,
            params,
            body: FunctionBody::Block(body),
            is_async,
            is_generator,
            expression: false,
        })
    }

    /// Parse a `{ ... }` function body with its directive prologue
    ///
    /// A late `"use strict"` re-judges the header: the parameter list must
    /// then be simple and free of strict-mode violations.
    fn parse_function_block(
        &mut self,
        ctx: Context,
        base: Context,
        id: Option<&Identifier>,
        params: &[Pattern],
        simple: bool,
    ) -> Result<BlockStatement> {
        let body_start = self.token.location;
        self.expect(ctx, TokenKind::LeftBrace)?;
        let saved_labels = std::mem::take(&mut self.labels);
        let mut body = Vec::new();
        let body_ctx = self.parse_directive_prologue(base, &mut body)?;
        if body_ctx.has_strict() && !base.has_strict() {
            if !simple {
                return Err(self.error(messages::USE_STRICT_NON_SIMPLE, body_start));
            }
            self.recheck_strict_parameters(id, params)?;
        }
        self.parse_statement_list(body_ctx, &mut body)?;
        self.expect(ctx, TokenKind::RightBrace)?;
        self.labels = saved_labels;
        Ok(BlockStatement {
            meta: self.meta("BlockStatement", body_start),
            body,
        })
    }

    /// Parse a parenthesized parameter list; reports whether every
    /// parameter is a plain identifier
    fn parse_formal_parameters(&mut self, ctx: Context) -> Result<(Vec<Pattern>, bool)> {
        self.expect(ctx, TokenKind::LeftParen)?;
        let mut params = Vec::new();
        let mut simple = true;
        while !self.at(TokenKind::RightParen) {
            if self.at(TokenKind::DotDotDot) {
                simple = false;
                params.push(self.parse_rest_element(ctx)?);
                if self.at(TokenKind::Comma) {
                    return Err(self.error(
                        messages::TRAILING_COMMA_AFTER_REST,
                        self.token.location,
                    ));
                }
                break;
            }
            let element = self.parse_binding_element(ctx)?;
            if !matches!(element, Pattern::Identifier(_)) {
                simple = false;
            }
            params.push(element);
            if !self.at(TokenKind::RightParen) {
                self.expect(ctx, TokenKind::Comma)?;
            }
        }
        self.expect(ctx, TokenKind::RightParen)?;
        Ok((params, simple))
    }

    /// Reject duplicate bound names across a parameter list
    fn check_parameter_names(&self, params: &[Pattern], forbid_duplicates: bool) -> Result<()> {
        if !forbid_duplicates {
            return Ok(());
        }
        let mut seen = FxHashSet::default();
        for param in params {
            let mut names = Vec::new();
            param.bound_names(&mut names);
            for name in names {
                if !seen.insert(name) {
                    return Err(
                        self.early_error(messages::DUPLICATE_PARAMETER, param.span().start)
                    );
                }
            }
        }
        Ok(())
    }

    /// Re-judge a sloppy-parsed header after its body turned strict
    fn recheck_strict_parameters(
        &self,
        id: Option<&Identifier>,
        params: &[Pattern],
    ) -> Result<()> {
        let check = |name: &str, location: SourceLocation| -> Result<()> {
            match name {
                "eval" | "arguments" => {
                    Err(self.early_error(messages::UNEXPECTED_EVAL_ARGUMENTS, location))
                }
                "yield" | "let" | "static" | "implements" | "interface" | "package"
                | "private" | "protected" | "public" => {
                    Err(self.early_error(messages::UNEXPECTED_STRICT_RESERVED, location))
                }
                _ => Ok(()),
            }
        };
        if let Some(identifier) = id {
            check(&identifier.name, identifier.meta.span.start)?;
        }
        for param in params {
            let mut names = Vec::new();
            param.bound_names(&mut names);
            for name in names {
                check(&name, param.span().start)?;
            }
        }
        self.check_parameter_names(params, true)
    }

    // ========== Classes ==========

    /// Parse a class declaration; `allow_anonymous` admits the nameless
    /// `export default class` form
    pub(crate) fn parse_class_declaration(
        &mut self,
        ctx: Context,
        allow_anonymous: bool,
    ) -> Result<Statement> {
        let start = self.token.location;
        self.expect_keyword(ctx, Keyword::Class)?;
        let class_ctx = ctx.union_strict_if(true);
        let id = if self.at(TokenKind::LeftBrace) || self.at_keyword(Keyword::Extends) {
            if !allow_anonymous {
                return Err(self.error(
                    messages::expected_token("identifier", self.token.kind.as_display_str()),
                    self.token.location,
                ));
            }
            None
        } else {
            Some(self.parse_binding_identifier(class_ctx)?)
        };
        let class = self.parse_class_tail(class_ctx, start, "ClassDeclaration", id)?;
        Ok(Statement::ClassDeclaration(Box::new(class)))
    }

    fn parse_class_expression(&mut self, ctx: Context) -> Result<Expression> {
        let start = self.token.location;
        self.expect_keyword(ctx, Keyword::Class)?;
        let class_ctx = ctx.union_strict_if(true);
        let id = if self.at(TokenKind::LeftBrace) || self.at_keyword(Keyword::Extends) {
            None
        } else {
            Some(self.parse_binding_identifier(class_ctx)?)
        };
        let class = self.parse_class_tail(class_ctx, start, "ClassExpression", id)?;
        Ok(Expression::Class(Box::new(class)))
    }

    /// Parse the heritage clause and class body; `ctx` is already strict
    fn parse_class_tail(
        &mut self,
        ctx: Context,
        start: SourceLocation,
        kind: &'static str,
        id: Option<Identifier>,
    ) -> Result<Class> {
        let super_class = if self.consume_keyword(ctx, Keyword::Extends)? {
            Some(Box::new(self.parse_left_hand_side_expression(ctx)?))
        } else {
            None
        };
        let is_derived = super_class.is_some();
        let body_ctx = ctx.and_class(true);

        let body_start = self.token.location;
        self.expect(ctx, TokenKind::LeftBrace)?;
        self.private_scopes.push(PrivateScope::default());
        let mut elements = Vec::new();
        let mut seen_constructor = false;
        while !self.at(TokenKind::RightBrace) {
            if self.consume(body_ctx, TokenKind::Semicolon)? {
                continue;
            }
            let element = self.parse_class_element(body_ctx, is_derived)?;
            if let ClassElement::Method(method) = &element {
                if method.kind == MethodKind::Constructor {
                    if seen_constructor {
                        return Err(self.early_error(
                            messages::DUPLICATE_CONSTRUCTOR,
                            method.key.span().start,
                        ));
                    }
                    seen_constructor = true;
                }
            }
            elements.push(element);
        }
        self.expect(ctx, TokenKind::RightBrace)?;
        self.finish_private_scope()?;

        Ok(Class {
            meta: self.meta(kind, start),
            id,
            super_class,
            body: ClassBody {
                meta: self.meta("ClassBody", body_start),
                body: elements,
            },
        })
    }

    /// One class element: method, accessor, field or static block
    fn parse_class_element(&mut self, ctx: Context, is_derived: bool) -> Result<ClassElement> {
        let start = self.token.location;

        // `static` is a modifier unless it is itself the key
        let mut is_static = false;
        if self.at_keyword(Keyword::Static) {
            let saved = self.save_state();
            self.bump(ctx)?;
            if matches!(
                self.token.kind,
                TokenKind::LeftParen
                    | TokenKind::Equals
                    | TokenKind::Semicolon
                    | TokenKind::RightBrace
            ) {
                self.load_state(saved);
            } else {
                is_static = true;
            }
        }

        if is_static && self.at(TokenKind::LeftBrace) {
            return self.parse_static_block(ctx, start);
        }

        let mut is_async = false;
        let mut is_generator = false;
        let mut accessor = PropertyKind::Init;
        let (key, computed) = if self.at(TokenKind::Star) {
            is_generator = true;
            self.bump(ctx)?;
            self.parse_property_key(ctx, true)?
        } else {
            let first_token = self.token.clone();
            let (mut key, mut computed) = self.parse_property_key(ctx, true)?;
            if !computed && !first_token.escaped {
                match first_token.kind {
                    TokenKind::Keyword(Keyword::Async)
                        if !self.token.newline_before
                            && (self.at(TokenKind::Star) || self.at_property_key(true)) =>
                    {
                        is_async = true;
                        is_generator = self.consume(ctx, TokenKind::Star)?;
                        (key, computed) = self.parse_property_key(ctx, true)?;
                    }
                    TokenKind::Keyword(Keyword::Get) if self.at_property_key(true) => {
                        accessor = PropertyKind::Get;
                        (key, computed) = self.parse_property_key(ctx, true)?;
                    }
                    TokenKind::Keyword(Keyword::Set) if self.at_property_key(true) => {
                        accessor = PropertyKind::Set;
                        (key, computed) = self.parse_property_key(ctx, true)?;
                    }
                    _ => {}
                }
            }
            (key, computed)
        };

        if self.at(TokenKind::LeftParen) {
            return self.finish_class_method(
                ctx,
                start,
                key,
                computed,
                is_static,
                is_async,
                is_generator,
                accessor,
                is_derived,
            );
        }
        if accessor != PropertyKind::Init || is_async || is_generator {
            return Err(self.unexpected());
        }
        if !self.options.next {
            return Err(self.unexpected());
        }

        self.check_field_name(&key, computed, is_static)?;
        let value = if self.consume(ctx, TokenKind::Equals)? {
            // initializers run with `this` bound, method style, and may not
            // contain `return`
            let init_ctx = ctx
                .for_function_body(false, false)
                .and_method(true)
                .and_return(false);
            Some(self.parse_assignment_expression(init_ctx)?)
        } else {
            None
        };
        self.consume_semicolon(ctx)?;
        Ok(ClassElement::Property(Box::new(PropertyDefinition {
            meta: self.meta("PropertyDefinition", start),
            key,
            value,
            computed,
            is_static,
        })))
    }

    fn finish_class_method(
        &mut self,
        ctx: Context,
        start: SourceLocation,
        key: PropertyKey,
        computed: bool,
        is_static: bool,
        is_async: bool,
        is_generator: bool,
        accessor: PropertyKind,
        is_derived: bool,
    ) -> Result<ClassElement> {
        let private = matches!(key, PropertyKey::Private(_));
        let is_constructor =
            !is_static && !computed && !private && key.static_name() == Some("constructor");
        if is_constructor && (is_async || is_generator || accessor != PropertyKind::Init) {
            return Err(self.early_error(messages::CONSTRUCTOR_SPECIAL_METHOD, start));
        }
        if is_static && !computed && !private && key.static_name() == Some("prototype") {
            return Err(self.early_error(messages::CLASS_STATIC_PROTOTYPE, key.span().start));
        }
        if let PropertyKey::Private(private) = &key {
            if private.name == "constructor" {
                return Err(self.early_error(
                    messages::CLASS_PRIVATE_CONSTRUCTOR,
                    private.meta.span.start,
                ));
            }
            self.declare_private(
                private.name.clone(),
                private.meta.span.start,
                is_static,
                accessor,
            )?;
        }

        let kind = if is_constructor {
            MethodKind::Constructor
        } else {
            match accessor {
                PropertyKind::Get => MethodKind::Get,
                PropertyKind::Set => MethodKind::Set,
                PropertyKind::Init => MethodKind::Method,
            }
        };
        let value = self.parse_method_value(
            ctx,
            is_async,
            is_generator,
            accessor,
            is_constructor && is_derived,
        )?;
        Ok(ClassElement::Method(Box::new(MethodDefinition {
            meta: self.meta("MethodDefinition", start),
            key,
            value,
            kind,
            computed,
            is_static,
        })))
    }

    /// Field names may not collide with `constructor` or static `prototype`
    fn check_field_name(
        &mut self,
        key: &PropertyKey,
        computed: bool,
        is_static: bool,
    ) -> Result<()> {
        if let PropertyKey::Private(private) = key {
            if private.name == "constructor" {
                return Err(self.early_error(
                    messages::CLASS_PRIVATE_CONSTRUCTOR,
                    private.meta.span.start,
                ));
            }
            let name = private.name.clone();
            let location = private.meta.span.start;
            return self.declare_private(name, location, is_static, PropertyKind::Init);
        }
        if computed {
            return Ok(());
        }
        match key.static_name() {
            Some("constructor") => {
                Err(self.early_error(messages::CLASS_FIELD_CONSTRUCTOR, key.span().start))
            }
            Some("prototype") if is_static => {
                Err(self.early_error(messages::CLASS_STATIC_PROTOTYPE, key.span().start))
            }
            _ => Ok(()),
        }
    }

    /// Parse a `static { ... }` initialization block
    fn parse_static_block(&mut self, ctx: Context, start: SourceLocation) -> Result<ClassElement> {
        if !self.options.next {
            return Err(self.unexpected());
        }
        let block_ctx = ctx
            .for_function_body(false, false)
            .and_method(true)
            .and_return(false)
            .and_static_block(true);
        self.expect(ctx, TokenKind::LeftBrace)?;
        let saved_labels = std::mem::take(&mut self.labels);
        let mut body = Vec::new();
        self.parse_statement_list(block_ctx, &mut body)?;
        self.expect(ctx, TokenKind::RightBrace)?;
        self.labels = saved_labels;
        Ok(ClassElement::StaticBlock(StaticBlock {
            meta: self.meta("StaticBlock", start),
            body,
        }))
    }

    // ========== Private names ==========

    /// Parse a `#name` reference and record the use for resolution when the
    /// enclosing class closes
    fn parse_private_identifier(&mut self, ctx: Context) -> Result<PrivateIdentifier> {
        let private = self.private_identifier_node(ctx)?;
        if self.private_scopes.is_empty() {
            return Err(
                self.early_error(messages::PRIVATE_OUTSIDE_CLASS, private.meta.span.start)
            );
        }
        if let Some(scope) = self.private_scopes.last_mut() {
            scope
                .used
                .push((private.name.clone(), private.meta.span.start));
        }
        Ok(private)
    }

    /// Build a PrivateIdentifier node from the current `#name` token
    fn private_identifier_node(&mut self, ctx: Context) -> Result<PrivateIdentifier> {
        if !self.options.next {
            return Err(self.unexpected());
        }
        let token = self.expect(ctx, TokenKind::PrivateName)?;
        let name = token.identifier_name().trim_start_matches('#').to_string();
        Ok(PrivateIdentifier {
            meta: self.meta("PrivateIdentifier", token.location),
            name,
        })
    }

    /// Record a private-name declaration on the innermost class
    fn declare_private(
        &mut self,
        name: String,
        location: SourceLocation,
        is_static: bool,
        accessor: PropertyKind,
    ) -> Result<()> {
        let (shape, conflicts) = private_shape(is_static, accessor);
        let duplicate = match self.private_scopes.last_mut() {
            Some(scope) => {
                let bits = scope.declared.entry(name.clone()).or_insert(0);
                if *bits & conflicts != 0 {
                    true
                } else {
                    *bits |= shape;
                    false
                }
            }
            None => return Err(self.error(messages::PRIVATE_OUTSIDE_CLASS, location)),
        };
        if duplicate {
            return Err(self.early_error(messages::duplicate_private_name(&name), location));
        }
        Ok(())
    }

    /// Close the innermost class: resolve its private-name uses against its
    /// declarations, handing leftovers to the enclosing class
    fn finish_private_scope(&mut self) -> Result<()> {
        let Some(scope) = self.private_scopes.pop() else {
            return Ok(());
        };
        let mut unresolved = Vec::new();
        for (name, location) in scope.used {
            if !scope.declared.contains_key(&name) {
                unresolved.push((name, location));
            }
        }
        match self.private_scopes.last_mut() {
            Some(parent) => parent.used.extend(unresolved),
            None => {
                if let Some((name, location)) = unresolved.into_iter().next() {
                    return Err(
                        self.early_error(messages::undefined_private_name(&name), location)
                    );
                }
            }
        }
        Ok(())
    }

    // ========== Binding patterns ==========

    /// Parse a binding pattern: identifier, array pattern or object pattern
    pub(crate) fn parse_binding_pattern(&mut self, ctx: Context) -> Result<Pattern> {
        match self.token.kind {
            TokenKind::LeftBracket => self.parse_array_binding_pattern(ctx),
            TokenKind::LeftBrace => self.parse_object_binding_pattern(ctx),
            _ => Ok(Pattern::Identifier(self.parse_binding_identifier(ctx)?)),
        }
    }

    /// A binding pattern with an optional `= default`
    fn parse_binding_element(&mut self, ctx: Context) -> Result<Pattern> {
        let start = self.token.location;
        let pattern = self.parse_binding_pattern(ctx)?;
        if !self.at(TokenKind::Equals) {
            return Ok(pattern);
        }
        self.bump(ctx)?;
        let right = self.parse_assignment_expression(ctx.and_in(true))?;
        Ok(Pattern::Assignment(Box::new(AssignmentPattern {
            meta: self.meta("AssignmentPattern", start),
            left: pattern,
            right,
        })))
    }

    /// `...binding`; a default on the rest target is rejected
    fn parse_rest_element(&mut self, ctx: Context) -> Result<Pattern> {
        let start = self.token.location;
        self.bump(ctx)?;
        let argument = self.parse_binding_pattern(ctx)?;
        if self.at(TokenKind::Equals) {
            return Err(self.error(messages::REST_DEFAULT_INIT, self.token.location));
        }
        Ok(Pattern::Rest(Box::new(RestElement {
            meta: self.meta("RestElement", start),
            argument,
        })))
    }

    fn parse_array_binding_pattern(&mut self, ctx: Context) -> Result<Pattern> {
        let start = self.token.location;
        self.bump(ctx)?;
        let mut elements = Vec::new();
        while !self.at(TokenKind::RightBracket) {
            if self.consume(ctx, TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            if self.at(TokenKind::DotDotDot) {
                elements.push(Some(self.parse_rest_element(ctx)?));
                if self.at(TokenKind::Comma) {
                    return Err(self.error(
                        messages::TRAILING_COMMA_AFTER_REST,
                        self.token.location,
                    ));
                }
                break;
            }
            elements.push(Some(self.parse_binding_element(ctx)?));
            if !self.at(TokenKind::RightBracket) {
                self.expect(ctx, TokenKind::Comma)?;
            }
        }
        self.expect(ctx, TokenKind::RightBracket)?;
        Ok(Pattern::Array(Box::new(ArrayPattern {
            meta: self.meta("ArrayPattern", start),
            elements,
        })))
    }

    fn parse_object_binding_pattern(&mut self, ctx: Context) -> Result<Pattern> {
        let start = self.token.location;
        self.bump(ctx)?;
        let mut properties = Vec::new();
        while !self.at(TokenKind::RightBrace) {
            if self.at(TokenKind::DotDotDot) {
                let rest_start = self.token.location;
                self.bump(ctx)?;
                // object rest binds a plain identifier only
                let argument = Pattern::Identifier(self.parse_binding_identifier(ctx)?);
                properties.push(ObjectPatternProperty::Rest(Box::new(RestElement {
                    meta: self.meta("RestElement", rest_start),
                    argument,
                })));
                if self.at(TokenKind::Comma) {
                    return Err(self.error(
                        messages::TRAILING_COMMA_AFTER_REST,
                        self.token.location,
                    ));
                }
                break;
            }
            properties.push(self.parse_binding_property(ctx)?);
            if !self.at(TokenKind::RightBrace) {
                self.expect(ctx, TokenKind::Comma)?;
            }
        }
        self.expect(ctx, TokenKind::RightBrace)?;
        Ok(Pattern::Object(Box::new(ObjectPattern {
            meta: self.meta("ObjectPattern", start),
            properties,
        })))
    }

    /// `key: binding`, or shorthand `name` with an optional default
    fn parse_binding_property(&mut self, ctx: Context) -> Result<ObjectPatternProperty> {
        let start = self.token.location;
        let key_token = self.token.clone();
        let (key, computed) = self.parse_property_key(ctx, false)?;
        let (value, shorthand) = if self.consume(ctx, TokenKind::Colon)? {
            (self.parse_binding_element(ctx)?, false)
        } else {
            let PropertyKey::Identifier(identifier) = &key else {
                return Err(self.error(
                    messages::expected_token(":", self.token.kind.as_display_str()),
                    self.token.location,
                ));
            };
            self.check_identifier_token(&key_token, ctx)?;
            if ctx.has_strict() && matches!(identifier.name.as_str(), "eval" | "arguments") {
                return Err(self.early_error(
                    messages::UNEXPECTED_EVAL_ARGUMENTS,
                    identifier.meta.span.start,
                ));
            }
            let binding = Pattern::Identifier(identifier.clone());
            let pattern = if self.at(TokenKind::Equals) {
                self.bump(ctx)?;
                let right = self.parse_assignment_expression(ctx.and_in(true))?;
                Pattern::Assignment(Box::new(AssignmentPattern {
                    meta: self.meta("AssignmentPattern", start),
                    left: binding,
                    right,
                }))
            } else {
                binding
            };
            (pattern, true)
        };
        Ok(ObjectPatternProperty::Property(Box::new(Property {
            meta: self.meta("Property", start),
            key,
            value: PropertyValue::Pattern(value),
            kind: PropertyKind::Init,
            computed,
            shorthand,
            method: false,
        })))
    }

    // ========== Patterns from expressions ==========

    /// Reinterpret an already-parsed expression as a destructuring pattern
    ///
    /// Array and object literals rewrite their node kinds in place; nested
    /// values recurse. Anything that cannot be a target is rejected here,
    /// which is where deferred cover-grammar syntax gets its final verdict.
    pub(crate) fn reinterpret_as_pattern(
        &mut self,
        ctx: Context,
        expression: Expression,
    ) -> Result<Pattern> {
        match expression {
            Expression::Identifier(identifier) => {
                if ctx.has_strict() && matches!(identifier.name.as_str(), "eval" | "arguments") {
                    return Err(self.early_error(
                        messages::UNEXPECTED_EVAL_ARGUMENTS,
                        identifier.meta.span.start,
                    ));
                }
                Ok(Pattern::Identifier(identifier))
            }
            Expression::Member(member) => Ok(Pattern::Member(member)),
            Expression::Array(array) => {
                let ArrayExpression { mut meta, elements } = array;
                meta.kind = "ArrayPattern";
                let count = elements.len();
                let mut patterns = Vec::with_capacity(count);
                for (index, element) in elements.into_iter().enumerate() {
                    match element {
                        None => patterns.push(None),
                        Some(Expression::Spread(spread)) => {
                            if index + 1 != count {
                                return Err(self.early_error(
                                    messages::REST_MUST_BE_LAST,
                                    spread.meta.span.start,
                                ));
                            }
                            let rest = self.reinterpret_rest(ctx, *spread, false)?;
                            patterns.push(Some(Pattern::Rest(Box::new(rest))));
                        }
                        Some(element) => {
                            patterns.push(Some(self.reinterpret_element(ctx, element)?));
                        }
                    }
                }
                Ok(Pattern::Array(Box::new(ArrayPattern {
                    meta,
                    elements: patterns,
                })))
            }
            Expression::Object(object) => {
                let ObjectExpression {
                    mut meta,
                    properties,
                } = object;
                meta.kind = "ObjectPattern";
                let count = properties.len();
                let mut pattern_properties = Vec::with_capacity(count);
                for (index, property) in properties.into_iter().enumerate() {
                    match property {
                        ObjectPropertyKind::Spread(spread) => {
                            if index + 1 != count {
                                return Err(self.early_error(
                                    messages::REST_MUST_BE_LAST,
                                    spread.meta.span.start,
                                ));
                            }
                            let rest = self.reinterpret_rest(ctx, *spread, true)?;
                            pattern_properties
                                .push(ObjectPatternProperty::Rest(Box::new(rest)));
                        }
                        ObjectPropertyKind::Property(property) => {
                            pattern_properties.push(ObjectPatternProperty::Property(Box::new(
                                self.reinterpret_property(ctx, *property)?,
                            )));
                        }
                    }
                }
                Ok(Pattern::Object(Box::new(ObjectPattern {
                    meta,
                    properties: pattern_properties,
                })))
            }
            Expression::Parenthesized(parenthesized) => {
                // parentheses may wrap only simple targets inside patterns
                let start = parenthesized.meta.span.start;
                let inner = self.reinterpret_as_pattern(ctx, parenthesized.expression)?;
                if matches!(inner, Pattern::Identifier(_) | Pattern::Member(_)) {
                    Ok(inner)
                } else {
                    Err(self.early_error(messages::INVALID_DESTRUCTURING_TARGET, start))
                }
            }
            other => Err(self.early_error(
                messages::INVALID_DESTRUCTURING_TARGET,
                other.span().start,
            )),
        }
    }

    /// A pattern element: a target, or `target = default`
    fn reinterpret_element(&mut self, ctx: Context, expression: Expression) -> Result<Pattern> {
        match expression {
            Expression::Assignment(assignment)
                if assignment.operator == AssignmentOperator::Assign =>
            {
                let AssignmentExpression {
                    mut meta,
                    left,
                    right,
                    ..
                } = *assignment;
                meta.kind = "AssignmentPattern";
                let target = match left {
                    AssignmentTarget::Expression(expression) => {
                        self.reinterpret_as_pattern(ctx, *expression)?
                    }
                    AssignmentTarget::Pattern(pattern) => *pattern,
                };
                Ok(Pattern::Assignment(Box::new(AssignmentPattern {
                    meta,
                    left: target,
                    right,
                })))
            }
            other => self.reinterpret_as_pattern(ctx, other),
        }
    }

    /// A spread element becomes a rest pattern; object rest targets must be
    /// simple
    fn reinterpret_rest(
        &mut self,
        ctx: Context,
        spread: SpreadElement,
        object_rest: bool,
    ) -> Result<RestElement> {
        let SpreadElement { mut meta, argument } = spread;
        meta.kind = "RestElement";
        let target = self.reinterpret_element(ctx, argument)?;
        if matches!(target, Pattern::Assignment(_)) {
            return Err(self.early_error(messages::REST_DEFAULT_INIT, meta.span.start));
        }
        if object_rest && !matches!(target, Pattern::Identifier(_) | Pattern::Member(_)) {
            return Err(
                self.early_error(messages::INVALID_DESTRUCTURING_TARGET, meta.span.start)
            );
        }
        Ok(RestElement {
            meta,
            argument: target,
        })
    }

    fn reinterpret_property(&mut self, ctx: Context, property: Property) -> Result<Property> {
        let Property {
            meta,
            key,
            value,
            kind,
            computed,
            shorthand,
            method,
        } = property;
        if method || kind != PropertyKind::Init {
            return Err(self.early_error(messages::INVALID_DESTRUCTURING_TARGET, meta.span.start));
        }
        let value = match value {
            PropertyValue::Expression(expression) => self.reinterpret_element(ctx, expression)?,
            PropertyValue::Pattern(pattern) => pattern,
        };
        Ok(Property {
            meta,
            key,
            value: PropertyValue::Pattern(value),
            kind,
            computed,
            shorthand,
            method,
        })
    }
}
