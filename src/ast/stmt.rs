//! Statement and declaration AST nodes

use serde::Serialize;

use super::{
    CatchClause, Class, Expression, Function, Identifier, ImportDeclarationSpecifier, Literal,
    ModuleExportName, NodeMeta, Pattern, Span, SwitchCase, VariableDeclaration,
};

/// A statement or declaration node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Statement {
    /// Expression statement
    Expression(ExpressionStatement),
    /// Block statement `{ ... }`
    Block(BlockStatement),
    /// Empty statement `;`
    Empty(EmptyStatement),
    /// `debugger;`
    Debugger(DebuggerStatement),
    /// `with (obj) stmt` (sloppy mode only)
    With(Box<WithStatement>),
    /// `return expr;`
    Return(ReturnStatement),
    /// `label: stmt`
    Labeled(Box<LabeledStatement>),
    /// `break label?;`
    Break(BreakStatement),
    /// `continue label?;`
    Continue(ContinueStatement),
    /// `if` statement
    If(Box<IfStatement>),
    /// `switch` statement
    Switch(SwitchStatement),
    /// `throw expr;`
    Throw(ThrowStatement),
    /// `try`/`catch`/`finally`
    Try(Box<TryStatement>),
    /// `while` loop
    While(Box<WhileStatement>),
    /// `do`/`while` loop
    DoWhile(Box<DoWhileStatement>),
    /// C-style `for` loop
    For(Box<ForStatement>),
    /// `for (x in obj)` loop
    ForIn(Box<ForInStatement>),
    /// `for (x of iter)` loop
    ForOf(Box<ForOfStatement>),
    /// `var`/`let`/`const` declaration
    VariableDeclaration(VariableDeclaration),
    /// Function declaration
    FunctionDeclaration(Box<Function>),
    /// Class declaration
    ClassDeclaration(Box<Class>),
    /// `import ... from "m"`
    Import(Box<ImportDeclaration>),
    /// `export { ... }` or `export decl`
    ExportNamed(Box<ExportNamedDeclaration>),
    /// `export default ...`
    ExportDefault(Box<ExportDefaultDeclaration>),
    /// `export * from "m"`
    ExportAll(ExportAllDeclaration),
}

impl Statement {
    /// Get the span of this statement
    pub fn span(&self) -> Span {
        match self {
            Statement::Expression(s) => s.meta.span,
            Statement::Block(s) => s.meta.span,
            Statement::Empty(s) => s.meta.span,
            Statement::Debugger(s) => s.meta.span,
            Statement::With(s) => s.meta.span,
            Statement::Return(s) => s.meta.span,
            Statement::Labeled(s) => s.meta.span,
            Statement::Break(s) => s.meta.span,
            Statement::Continue(s) => s.meta.span,
            Statement::If(s) => s.meta.span,
            Statement::Switch(s) => s.meta.span,
            Statement::Throw(s) => s.meta.span,
            Statement::Try(s) => s.meta.span,
            Statement::While(s) => s.meta.span,
            Statement::DoWhile(s) => s.meta.span,
            Statement::For(s) => s.meta.span,
            Statement::ForIn(s) => s.meta.span,
            Statement::ForOf(s) => s.meta.span,
            Statement::VariableDeclaration(s) => s.meta.span,
            Statement::FunctionDeclaration(s) => s.meta.span,
            Statement::ClassDeclaration(s) => s.meta.span,
            Statement::Import(s) => s.meta.span,
            Statement::ExportNamed(s) => s.meta.span,
            Statement::ExportDefault(s) => s.meta.span,
            Statement::ExportAll(s) => s.meta.span,
        }
    }

    /// Is this a declaration rather than a plain statement?
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Statement::VariableDeclaration(_)
                | Statement::FunctionDeclaration(_)
                | Statement::ClassDeclaration(_)
        )
    }
}

/// An expression used as a statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The expression
    pub expression: Expression,
    /// Directive text for prologue members (`"use strict"`), unescaped raw
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<String>,
}

/// A block of statements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Statements in the block
    pub body: Vec<Statement>,
}

/// An empty statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// A debugger statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebuggerStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// A with statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Scope object
    pub object: Expression,
    /// Body statement
    pub body: Statement,
}

/// A return statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Optional return value
    pub argument: Option<Expression>,
}

/// A labeled statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The label
    pub label: Identifier,
    /// The labeled body
    pub body: Statement,
}

/// A break statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Optional label
    pub label: Option<Identifier>,
}

/// A continue statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinueStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Optional label
    pub label: Option<Identifier>,
}

/// An if statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The condition
    pub test: Expression,
    /// Taken when truthy
    pub consequent: Statement,
    /// Optional else branch
    pub alternate: Option<Statement>,
}

/// A switch statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The switched value
    pub discriminant: Expression,
    /// The cases, in source order
    pub cases: Vec<SwitchCase>,
}

/// A throw statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThrowStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The thrown value
    pub argument: Expression,
}

/// A try statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TryStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The try block
    pub block: BlockStatement,
    /// Optional catch clause
    pub handler: Option<CatchClause>,
    /// Optional finally block
    pub finalizer: Option<BlockStatement>,
}

/// A while loop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Loop condition
    pub test: Expression,
    /// Loop body
    pub body: Statement,
}

/// A do-while loop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoWhileStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Loop body
    pub body: Statement,
    /// Loop condition
    pub test: Expression,
}

/// A C-style for loop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Initializer
    pub init: Option<ForInit>,
    /// Condition
    pub test: Option<Expression>,
    /// Update expression
    pub update: Option<Expression>,
    /// Loop body
    pub body: Statement,
}

/// The init clause of a for loop
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForInit {
    VariableDeclaration(VariableDeclaration),
    Expression(Expression),
}

/// The left side of a for-in/for-of loop
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForTarget {
    VariableDeclaration(VariableDeclaration),
    Pattern(Pattern),
}

impl ForTarget {
    /// Get the span of the target
    pub fn span(&self) -> Span {
        match self {
            ForTarget::VariableDeclaration(d) => d.meta.span,
            ForTarget::Pattern(p) => p.span(),
        }
    }
}

/// A for-in loop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForInStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Loop target
    pub left: ForTarget,
    /// Enumerated object
    pub right: Expression,
    /// Loop body
    pub body: Statement,
}

/// A for-of loop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForOfStatement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Loop target
    pub left: ForTarget,
    /// Iterated value
    pub right: Expression,
    /// Loop body
    pub body: Statement,
    /// `for await (... of ...)` form?
    #[serde(rename = "await")]
    pub is_await: bool,
}

/// An import declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDeclaration {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The imported bindings, empty for bare `import "m"`
    pub specifiers: Vec<ImportDeclarationSpecifier>,
    /// The module specifier
    pub source: Literal,
}

/// `export { a } from "m"`, `export { a }`, or `export decl`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportNamedDeclaration {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// An exported declaration (`export let x = 1`)
    pub declaration: Option<Statement>,
    /// Exported specifiers (`export { a as b }`)
    pub specifiers: Vec<super::ExportSpecifier>,
    /// Re-export source
    pub source: Option<Literal>,
}

/// `export default expr-or-decl`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDefaultDeclaration {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The exported declaration or expression
    pub declaration: ExportDefaultKind,
}

/// Payload of a default export
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportDefaultKind {
    /// Function or class declaration (possibly anonymous)
    Declaration(Box<Statement>),
    /// Any other expression
    Expression(Box<Expression>),
}

/// `export * from "m"` or `export * as ns from "m"`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportAllDeclaration {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The re-exported module
    pub source: Literal,
    /// Optional namespace name (`as ns`)
    pub exported: Option<ModuleExportName>,
}
