//! Expression AST nodes

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::{
    Class, Function, Identifier, JsxElement, JsxFragment, NodeMeta, Pattern, PrivateIdentifier,
    PropertyKey, Span, TemplateElement,
};

/// An expression node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Expression {
    /// Identifier reference
    Identifier(Identifier),
    /// `#name in obj` left operand
    Private(PrivateIdentifier),
    /// Literal value (null, boolean, number, bigint, string, regex)
    Literal(Literal),
    /// Template literal
    TemplateLiteral(TemplateLiteral),
    /// Tagged template
    TaggedTemplate(Box<TaggedTemplate>),
    /// Array literal
    Array(ArrayExpression),
    /// Object literal
    Object(ObjectExpression),
    /// Function expression
    Function(Box<Function>),
    /// Arrow function
    Arrow(Box<Function>),
    /// Class expression
    Class(Box<Class>),
    /// `this`
    This(ThisExpression),
    /// `super` (only valid as callee or member object)
    Super(Super),
    /// Member access (dot, bracket, or private)
    Member(Box<MemberExpression>),
    /// Optional chain wrapper around members/calls with `?.`
    Chain(Box<ChainExpression>),
    /// Function call
    Call(Box<CallExpression>),
    /// `new` expression
    New(Box<NewExpression>),
    /// Unary operation
    Unary(Box<UnaryExpression>),
    /// Prefix or postfix `++`/`--`
    Update(Box<UpdateExpression>),
    /// Binary operation
    Binary(Box<BinaryExpression>),
    /// Logical operation (`&&`, `||`, `??`)
    Logical(Box<LogicalExpression>),
    /// Assignment
    Assignment(Box<AssignmentExpression>),
    /// Ternary conditional
    Conditional(Box<ConditionalExpression>),
    /// Comma-separated sequence
    Sequence(Box<SequenceExpression>),
    /// Spread element (in arrays and call arguments)
    Spread(Box<SpreadElement>),
    /// `yield` expression
    Yield(Box<YieldExpression>),
    /// `await` expression
    Await(Box<AwaitExpression>),
    /// `new.target` or `import.meta`
    MetaProperty(MetaProperty),
    /// Dynamic `import()`
    Import(Box<ImportExpression>),
    /// Parenthesized expression, kept when `preserve_parens` is on
    Parenthesized(Box<ParenthesizedExpression>),
    /// JSX element
    JsxElement(Box<JsxElement>),
    /// JSX fragment
    JsxFragment(Box<JsxFragment>),
}

impl Expression {
    /// Get the span of this expression
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier(id) => id.meta.span,
            Expression::Private(p) => p.meta.span,
            Expression::Literal(lit) => lit.meta.span,
            Expression::TemplateLiteral(t) => t.meta.span,
            Expression::TaggedTemplate(t) => t.meta.span,
            Expression::Array(a) => a.meta.span,
            Expression::Object(o) => o.meta.span,
            Expression::Function(f) | Expression::Arrow(f) => f.meta.span,
            Expression::Class(c) => c.meta.span,
            Expression::This(t) => t.meta.span,
            Expression::Super(s) => s.meta.span,
            Expression::Member(m) => m.meta.span,
            Expression::Chain(c) => c.meta.span,
            Expression::Call(c) => c.meta.span,
            Expression::New(n) => n.meta.span,
            Expression::Unary(u) => u.meta.span,
            Expression::Update(u) => u.meta.span,
            Expression::Binary(b) => b.meta.span,
            Expression::Logical(l) => l.meta.span,
            Expression::Assignment(a) => a.meta.span,
            Expression::Conditional(c) => c.meta.span,
            Expression::Sequence(s) => s.meta.span,
            Expression::Spread(s) => s.meta.span,
            Expression::Yield(y) => y.meta.span,
            Expression::Await(a) => a.meta.span,
            Expression::MetaProperty(m) => m.meta.span,
            Expression::Import(i) => i.meta.span,
            Expression::Parenthesized(p) => p.meta.span,
            Expression::JsxElement(e) => e.meta.span,
            Expression::JsxFragment(f) => f.meta.span,
        }
    }

    /// Check if this expression is a valid simple assignment target
    pub fn is_valid_assignment_target(&self) -> bool {
        match self {
            Expression::Identifier(_) | Expression::Member(_) => true,
            Expression::Parenthesized(p) => p.expression.is_valid_assignment_target(),
            _ => false,
        }
    }
}

/// A literal value
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub meta: NodeMeta,
    /// The literal value
    pub value: LiteralValue,
    /// Raw source text, kept when the `raw` option is on
    pub raw: Option<String>,
}

/// The value of a literal
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// null literal
    Null,
    /// Boolean literal
    Boolean(bool),
    /// Numeric literal
    Number(f64),
    /// BigInt literal (arbitrary precision)
    BigInt(num_bigint::BigInt),
    /// String literal (cooked)
    String(String),
    /// Regular expression literal
    Regex { pattern: String, flags: String },
}

#[derive(Serialize)]
struct RegexValue<'a> {
    pattern: &'a str,
    flags: &'a str,
}

// Literals serialize by hand: in the ESTree JSON shape bigints and regexes
// carry `value: null` plus a sibling `bigint`/`regex` field, which a derive
// cannot express.
impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.meta.kind)?;
        if let Some(start) = self.meta.start {
            map.serialize_entry("start", &start)?;
        }
        if let Some(end) = self.meta.end {
            map.serialize_entry("end", &end)?;
        }
        if let Some(loc) = &self.meta.loc {
            map.serialize_entry("loc", loc)?;
        }
        match &self.value {
            LiteralValue::Null => map.serialize_entry("value", &())?,
            LiteralValue::Boolean(b) => map.serialize_entry("value", b)?,
            LiteralValue::Number(n) => map.serialize_entry("value", n)?,
            LiteralValue::String(s) => map.serialize_entry("value", s)?,
            LiteralValue::BigInt(v) => {
                map.serialize_entry("value", &())?;
                map.serialize_entry("bigint", &v.to_string())?;
            }
            LiteralValue::Regex { pattern, flags } => {
                map.serialize_entry("value", &())?;
                map.serialize_entry("regex", &RegexValue { pattern, flags })?;
            }
        }
        if let Some(raw) = &self.raw {
            map.serialize_entry("raw", raw)?;
        }
        map.end()
    }
}

/// A template literal (`` `a${b}c` ``)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateLiteral {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The static parts
    pub quasis: Vec<TemplateElement>,
    /// The interpolated expressions
    pub expressions: Vec<Expression>,
}

/// A tagged template (`` tag`a${b}` ``)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedTemplate {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The tag function
    pub tag: Expression,
    /// The template
    pub quasi: TemplateLiteral,
}

/// An array literal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Elements; None for holes (elisions)
    pub elements: Vec<Option<Expression>>,
}

/// An object literal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Properties
    pub properties: Vec<ObjectPropertyKind>,
}

/// A property or spread inside an object literal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectPropertyKind {
    Property(Box<Property>),
    Spread(Box<SpreadElement>),
}

/// An object property, also used inside object patterns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Property key
    pub key: PropertyKey,
    /// Property value (a pattern when inside a destructuring target)
    pub value: PropertyValue,
    /// `init` for plain properties and methods, `get`/`set` for accessors
    pub kind: PropertyKind,
    /// Is the key computed?
    pub computed: bool,
    /// Shorthand property (`{a}`)
    pub shorthand: bool,
    /// Method shorthand (`{a() {}}`)
    pub method: bool,
}

/// Value of an object property
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Expression(Expression),
    Pattern(Pattern),
}

impl PropertyValue {
    /// Get the span of the value
    pub fn span(&self) -> Span {
        match self {
            PropertyValue::Expression(e) => e.span(),
            PropertyValue::Pattern(p) => p.span(),
        }
    }
}

/// Kind of object property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

/// `this`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThisExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// `super`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Super {
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// A member access (`a.b`, `a[b]`, `a.#b`, `a?.b`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The object
    pub object: Expression,
    /// The property; an arbitrary expression when computed
    pub property: Expression,
    /// Bracket access?
    pub computed: bool,
    /// Does this link use `?.`?
    pub optional: bool,
}

/// Wrapper marking the outermost expression of an optional chain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The chained member/call expression
    pub expression: Expression,
}

/// A function call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The function being called
    pub callee: Expression,
    /// Arguments; spreads appear as SpreadElement
    pub arguments: Vec<Expression>,
    /// Does this call use `?.(`?
    pub optional: bool,
}

/// A `new` expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The constructor
    pub callee: Expression,
    /// Arguments
    pub arguments: Vec<Expression>,
}

/// A unary operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The operator
    pub operator: UnaryOperator,
    /// The operand
    pub argument: Expression,
    /// Always true; unary operators have no postfix form
    pub prefix: bool,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "~")]
    BitwiseNot,
    #[serde(rename = "typeof")]
    Typeof,
    #[serde(rename = "void")]
    Void,
    #[serde(rename = "delete")]
    Delete,
}

impl UnaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitwiseNot => "~",
            UnaryOperator::Typeof => "typeof",
            UnaryOperator::Void => "void",
            UnaryOperator::Delete => "delete",
        }
    }
}

/// A prefix or postfix increment/decrement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The operator
    pub operator: UpdateOperator,
    /// The operand
    pub argument: Expression,
    /// Prefix form?
    pub prefix: bool,
}

/// Update operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateOperator {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

impl UpdateOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOperator::Increment => "++",
            UpdateOperator::Decrement => "--",
        }
    }
}

/// A binary operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The operator
    pub operator: BinaryOperator,
    /// Left operand; a private name for `#x in obj`
    pub left: Expression,
    /// Right operand
    pub right: Expression,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "===")]
    StrictEqual,
    #[serde(rename = "!==")]
    StrictNotEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanEqual,
    #[serde(rename = "<<")]
    ShiftLeft,
    #[serde(rename = ">>")]
    ShiftRight,
    #[serde(rename = ">>>")]
    ShiftRightUnsigned,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "%")]
    Modulo,
    #[serde(rename = "**")]
    Exponent,
    #[serde(rename = "|")]
    BitwiseOr,
    #[serde(rename = "^")]
    BitwiseXor,
    #[serde(rename = "&")]
    BitwiseAnd,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "instanceof")]
    Instanceof,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::StrictEqual => "===",
            BinaryOperator::StrictNotEqual => "!==",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanEqual => ">=",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::ShiftRightUnsigned => ">>>",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Exponent => "**",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "^",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::In => "in",
            BinaryOperator::Instanceof => "instanceof",
        }
    }
}

/// A logical operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The operator
    pub operator: LogicalOperator,
    /// Left operand
    pub left: Expression,
    /// Right operand
    pub right: Expression,
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOperator {
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "??")]
    NullishCoalescing,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::Or => "||",
            LogicalOperator::And => "&&",
            LogicalOperator::NullishCoalescing => "??",
        }
    }
}

/// An assignment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The operator
    pub operator: AssignmentOperator,
    /// The target; a pattern for destructuring assignments
    pub left: AssignmentTarget,
    /// The value
    pub right: Expression,
}

/// Target of an assignment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AssignmentTarget {
    Expression(Box<Expression>),
    Pattern(Box<Pattern>),
}

impl AssignmentTarget {
    /// Get the span of the target
    pub fn span(&self) -> Span {
        match self {
            AssignmentTarget::Expression(e) => e.span(),
            AssignmentTarget::Pattern(p) => p.span(),
        }
    }
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignmentOperator {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    AddAssign,
    #[serde(rename = "-=")]
    SubtractAssign,
    #[serde(rename = "*=")]
    MultiplyAssign,
    #[serde(rename = "/=")]
    DivideAssign,
    #[serde(rename = "%=")]
    ModuloAssign,
    #[serde(rename = "**=")]
    ExponentAssign,
    #[serde(rename = "<<=")]
    ShiftLeftAssign,
    #[serde(rename = ">>=")]
    ShiftRightAssign,
    #[serde(rename = ">>>=")]
    ShiftRightUnsignedAssign,
    #[serde(rename = "|=")]
    BitwiseOrAssign,
    #[serde(rename = "^=")]
    BitwiseXorAssign,
    #[serde(rename = "&=")]
    BitwiseAndAssign,
    #[serde(rename = "&&=")]
    LogicalAndAssign,
    #[serde(rename = "||=")]
    LogicalOrAssign,
    #[serde(rename = "??=")]
    NullishAssign,
}

impl AssignmentOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentOperator::Assign => "=",
            AssignmentOperator::AddAssign => "+=",
            AssignmentOperator::SubtractAssign => "-=",
            AssignmentOperator::MultiplyAssign => "*=",
            AssignmentOperator::DivideAssign => "/=",
            AssignmentOperator::ModuloAssign => "%=",
            AssignmentOperator::ExponentAssign => "**=",
            AssignmentOperator::ShiftLeftAssign => "<<=",
            AssignmentOperator::ShiftRightAssign => ">>=",
            AssignmentOperator::ShiftRightUnsignedAssign => ">>>=",
            AssignmentOperator::BitwiseOrAssign => "|=",
            AssignmentOperator::BitwiseXorAssign => "^=",
            AssignmentOperator::BitwiseAndAssign => "&=",
            AssignmentOperator::LogicalAndAssign => "&&=",
            AssignmentOperator::LogicalOrAssign => "||=",
            AssignmentOperator::NullishAssign => "??=",
        }
    }

    /// Is this the plain `=` operator?
    pub fn is_simple(&self) -> bool {
        matches!(self, AssignmentOperator::Assign)
    }

    /// `&&=`, `||=` and `??=` only accept simple targets
    pub fn is_logical(&self) -> bool {
        matches!(
            self,
            AssignmentOperator::LogicalAndAssign
                | AssignmentOperator::LogicalOrAssign
                | AssignmentOperator::NullishAssign
        )
    }
}

/// A ternary conditional
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionalExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The condition
    pub test: Expression,
    /// Value when truthy
    pub consequent: Expression,
    /// Value when falsy
    pub alternate: Expression,
}

/// A comma sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The expressions in order
    pub expressions: Vec<Expression>,
}

/// A spread element (`...x`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadElement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The spread operand
    pub argument: Expression,
}

/// A `yield` expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The yielded value
    pub argument: Option<Expression>,
    /// `yield*` form?
    pub delegate: bool,
}

/// An `await` expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwaitExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The awaited value
    pub argument: Expression,
}

/// `new.target` or `import.meta`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaProperty {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The meta object (`new` or `import`)
    #[serde(rename = "meta")]
    pub meta_ident: Identifier,
    /// The property (`target` or `meta`)
    pub property: Identifier,
}

/// A dynamic `import(source)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The module specifier expression
    pub source: Expression,
}

/// A parenthesized expression, only emitted under `preserve_parens`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParenthesizedExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The inner expression
    pub expression: Expression,
}
