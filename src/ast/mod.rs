//! Abstract Syntax Tree (AST) types for ECMAScript
//!
//! This module defines the AST node types that represent parsed source code.
//! The AST follows the ESTree specification with some modifications for Rust
//! idioms. Every node serializes to the ESTree JSON shape: the `"type"` tag
//! and the optional `start`/`end`/`loc` metadata live in a flattened
//! [`NodeMeta`], so a single node struct can serialize under different ESTree
//! type names (e.g. [`Function`] as `FunctionDeclaration`,
//! `FunctionExpression` or `ArrowFunctionExpression`) depending on where the
//! parser built it.

mod expr;
mod jsx;
mod pattern;
mod stmt;

pub use expr::*;
pub use jsx::*;
pub use pattern::*;
pub use stmt::*;

use serde::Serialize;

use crate::error::SourceLocation;
use crate::lexer::{Comment, TokenRecord};

/// A span in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start location
    pub start: SourceLocation,
    /// End location
    pub end: SourceLocation,
}

impl Span {
    /// Create a new span
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: if self.start.offset < other.start.offset {
                self.start
            } else {
                other.start
            },
            end: if self.end.offset > other.end.offset {
                self.end
            } else {
                other.end
            },
        }
    }
}

/// A line/column position (1-indexed line, 0-indexed column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl From<SourceLocation> for Position {
    fn from(location: SourceLocation) -> Self {
        Position {
            line: location.line,
            column: location.column,
        }
    }
}

/// A line/column range attached to nodes when location tracking is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Loc {
    pub start: Position,
    pub end: Position,
}

impl From<Span> for Loc {
    fn from(span: Span) -> Self {
        Loc {
            start: span.start.into(),
            end: span.end.into(),
        }
    }
}

/// Schema tag and position metadata shared by every node
///
/// `span` is always tracked for diagnostics and containment checks but never
/// serialized; `start`/`end` and `loc` are populated by the node factory only
/// when the corresponding option requests them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMeta {
    /// ESTree node type name
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Span in source
    #[serde(skip)]
    pub span: Span,
    /// Start byte offset, when range tracking is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    /// End byte offset, when range tracking is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
    /// Line/column range, when location tracking is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Loc>,
}

impl NodeMeta {
    /// Metadata carrying only the internal span, no serialized positions
    pub fn bare(kind: &'static str, span: Span) -> Self {
        NodeMeta {
            kind,
            span,
            start: None,
            end: None,
            loc: None,
        }
    }
}

/// A complete program
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Source type (script or module)
    #[serde(rename = "sourceType")]
    pub source_type: SourceType,
    /// The statements in the program body
    pub body: Vec<Statement>,
    /// Flat token stream, captured when the `tokens` option is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<TokenRecord>>,
    /// Skipped comments, captured when the `comments` option is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

impl Program {
    /// Get the span of the whole program
    pub fn span(&self) -> Span {
        self.meta.span
    }
}

/// Source type of the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Script goal (no import/export)
    #[default]
    Script,
    /// Module goal (import/export allowed, always strict)
    Module,
}

/// An identifier reference or binding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The name of the identifier
    pub name: String,
}

/// A `#private` name in a class body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivateIdentifier {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The name without the leading `#`
    pub name: String,
}

/// Variable declaration kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// var declaration
    Var,
    /// let declaration
    Let,
    /// const declaration
    Const,
}

impl VariableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

/// A single variable declarator (id = init)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclarator {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The binding pattern
    pub id: Pattern,
    /// Optional initializer expression
    pub init: Option<Expression>,
}

/// A variable declaration (`let x = 1, y = 2`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclaration {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The kind of variable declaration
    pub kind: VariableKind,
    /// The declarators
    pub declarations: Vec<VariableDeclarator>,
}

/// A function (declaration, expression, arrow, or method value)
///
/// The ESTree type name lives in `meta.kind`; arrows use an expression body
/// and set `expression` when the body is not a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Optional function name
    pub id: Option<Identifier>,
    /// Parameter list; a rest parameter appears as a trailing RestElement
    pub params: Vec<Pattern>,
    /// Function body
    pub body: FunctionBody,
    /// Is this an async function?
    #[serde(rename = "async")]
    pub is_async: bool,
    /// Is this a generator function?
    #[serde(rename = "generator")]
    pub is_generator: bool,
    /// Does an arrow body consist of a bare expression?
    pub expression: bool,
}

/// Function body - either a block or a single expression (arrows only)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FunctionBody {
    /// Block statement body
    Block(BlockStatement),
    /// Expression body (arrow functions only)
    Expression(Box<Expression>),
}

/// A class definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Class {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Optional class name
    pub id: Option<Identifier>,
    /// Superclass expression
    #[serde(rename = "superClass")]
    pub super_class: Option<Box<Expression>>,
    /// Class body
    pub body: ClassBody,
}

/// Class body containing methods, fields and static blocks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassBody {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Class elements
    pub body: Vec<ClassElement>,
}

/// A class element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClassElement {
    /// Method definition
    Method(Box<MethodDefinition>),
    /// Field definition
    Property(Box<PropertyDefinition>),
    /// Static initialization block
    StaticBlock(StaticBlock),
}

/// A method definition in a class body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDefinition {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Method key
    pub key: PropertyKey,
    /// Method value; always a function expression
    pub value: Expression,
    /// Method kind
    pub kind: MethodKind,
    /// Is this a computed key?
    pub computed: bool,
    /// Is this a static method?
    #[serde(rename = "static")]
    pub is_static: bool,
}

/// Kind of method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    /// Regular method
    Method,
    /// Getter method
    Get,
    /// Setter method
    Set,
    /// Constructor
    Constructor,
}

/// A field definition in a class body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDefinition {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Field key
    pub key: PropertyKey,
    /// Field initializer
    pub value: Option<Expression>,
    /// Is this a computed key?
    pub computed: bool,
    /// Is this a static field?
    #[serde(rename = "static")]
    pub is_static: bool,
}

/// A static initialization block in a class body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticBlock {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Block contents
    pub body: Vec<Statement>,
}

/// Property key in objects and classes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyKey {
    /// Identifier key (`{a: 1}`)
    Identifier(Identifier),
    /// Private name key (`#x = 1`)
    Private(PrivateIdentifier),
    /// String or numeric literal key (`{"a": 1}`, `{0: 1}`)
    Literal(Literal),
    /// Computed key (`{[expr]: 1}`)
    Computed(Box<Expression>),
}

impl PropertyKey {
    /// Get the span of this key
    pub fn span(&self) -> Span {
        match self {
            PropertyKey::Identifier(id) => id.meta.span,
            PropertyKey::Private(p) => p.meta.span,
            PropertyKey::Literal(lit) => lit.meta.span,
            PropertyKey::Computed(e) => e.span(),
        }
    }

    /// The key text used for early-error checks, when statically known
    pub fn static_name(&self) -> Option<&str> {
        match self {
            PropertyKey::Identifier(id) => Some(&id.name),
            PropertyKey::Private(p) => Some(&p.name),
            PropertyKey::Literal(lit) => match &lit.value {
                LiteralValue::String(s) => Some(s),
                _ => None,
            },
            PropertyKey::Computed(_) => None,
        }
    }
}

/// The raw/cooked pair of one template chunk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateValue {
    /// Raw source text between the delimiters
    pub raw: String,
    /// Cooked value; None when an escape is only valid in tagged position
    pub cooked: Option<String>,
}

/// Template literal element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateElement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Raw and cooked forms
    pub value: TemplateValue,
    /// Is this the last element?
    pub tail: bool,
}

/// Switch case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCase {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Test expression (None for `default:`)
    pub test: Option<Expression>,
    /// Consequent statements
    pub consequent: Vec<Statement>,
}

/// Catch clause
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchClause {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Catch parameter (optional since ES2019)
    pub param: Option<Pattern>,
    /// Catch body
    pub body: BlockStatement,
}

/// An exported or imported name: identifier, or string literal under `next`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModuleExportName {
    Identifier(Identifier),
    Literal(Literal),
}

impl ModuleExportName {
    /// The bound text of the name
    pub fn as_name(&self) -> &str {
        match self {
            ModuleExportName::Identifier(id) => &id.name,
            ModuleExportName::Literal(lit) => match &lit.value {
                LiteralValue::String(s) => s,
                _ => "",
            },
        }
    }

    /// Get the span of this name
    pub fn span(&self) -> Span {
        match self {
            ModuleExportName::Identifier(id) => id.meta.span,
            ModuleExportName::Literal(lit) => lit.meta.span,
        }
    }
}

/// `import { a as b } from "m"`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSpecifier {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Local binding
    pub local: Identifier,
    /// Imported name
    pub imported: ModuleExportName,
}

/// `import a from "m"`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDefaultSpecifier {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Local binding
    pub local: Identifier,
}

/// `import * as a from "m"`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportNamespaceSpecifier {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Local binding
    pub local: Identifier,
}

/// Any specifier of an import declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImportDeclarationSpecifier {
    Named(ImportSpecifier),
    Default(ImportDefaultSpecifier),
    Namespace(ImportNamespaceSpecifier),
}

/// `export { a as b }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSpecifier {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Local name
    pub local: ModuleExportName,
    /// Exported name
    pub exported: ModuleExportName,
}
