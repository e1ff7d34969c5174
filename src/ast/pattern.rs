//! Binding and destructuring pattern AST nodes

use serde::Serialize;

use super::{Expression, Identifier, MemberExpression, NodeMeta, Span};

/// A binding pattern (variable declarations, parameters, destructuring)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Pattern {
    /// Simple identifier binding
    Identifier(Identifier),
    /// Array destructuring `[a, , b = 1, ...rest]`
    Array(Box<ArrayPattern>),
    /// Object destructuring `{a, b: c, ...rest}`
    Object(Box<ObjectPattern>),
    /// Default value `a = expr`
    Assignment(Box<AssignmentPattern>),
    /// Rest binding `...a`
    Rest(Box<RestElement>),
    /// Member expression target (`[a.b] = c`); assignment patterns only
    Member(Box<MemberExpression>),
}

impl Pattern {
    /// Get the span of this pattern
    pub fn span(&self) -> Span {
        match self {
            Pattern::Identifier(id) => id.meta.span,
            Pattern::Array(a) => a.meta.span,
            Pattern::Object(o) => o.meta.span,
            Pattern::Assignment(a) => a.meta.span,
            Pattern::Rest(r) => r.meta.span,
            Pattern::Member(m) => m.meta.span,
        }
    }

    /// Collect the names this pattern binds, in source order
    pub fn bound_names(&self, out: &mut Vec<String>) {
        match self {
            Pattern::Identifier(id) => out.push(id.name.clone()),
            Pattern::Array(a) => {
                for element in a.elements.iter().flatten() {
                    element.bound_names(out);
                }
            }
            Pattern::Object(o) => {
                for property in &o.properties {
                    match property {
                        ObjectPatternProperty::Property(p) => {
                            if let super::PropertyValue::Pattern(pattern) = &p.value {
                                pattern.bound_names(out);
                            }
                        }
                        ObjectPatternProperty::Rest(r) => r.argument.bound_names(out),
                    }
                }
            }
            Pattern::Assignment(a) => a.left.bound_names(out),
            Pattern::Rest(r) => r.argument.bound_names(out),
            Pattern::Member(_) => {}
        }
    }
}

/// An array destructuring pattern
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayPattern {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Elements; None for holes
    pub elements: Vec<Option<Pattern>>,
}

/// An object destructuring pattern
///
/// Properties reuse [`super::Property`] with pattern values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectPattern {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Destructured properties
    pub properties: Vec<ObjectPatternProperty>,
}

/// A property or rest element inside an object pattern
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectPatternProperty {
    Property(Box<super::Property>),
    Rest(Box<RestElement>),
}

/// A rest element (`...target`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestElement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The bound target
    pub argument: Pattern,
}

/// A pattern with a default value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentPattern {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The bound target
    pub left: Pattern,
    /// The default value
    pub right: Expression,
}
