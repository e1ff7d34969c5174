//! JSX AST nodes, produced only when the `jsx` option is enabled

use serde::Serialize;

use super::{Expression, Literal, NodeMeta, Span};

/// A JSX element (`<a x="1">...</a>`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxElement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Opening tag
    #[serde(rename = "openingElement")]
    pub opening_element: JsxOpeningElement,
    /// Child nodes
    pub children: Vec<JsxChild>,
    /// Closing tag; None when self-closing
    #[serde(rename = "closingElement")]
    pub closing_element: Option<JsxClosingElement>,
}

/// A JSX fragment (`<>...</>`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxFragment {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// `<>`
    #[serde(rename = "openingFragment")]
    pub opening_fragment: JsxOpeningFragment,
    /// Child nodes
    pub children: Vec<JsxChild>,
    /// `</>`
    #[serde(rename = "closingFragment")]
    pub closing_fragment: JsxClosingFragment,
}

/// The opening tag of a JSX element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxOpeningElement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Element name
    pub name: JsxElementName,
    /// Attributes in source order
    pub attributes: Vec<JsxAttributeItem>,
    /// `<a />` form?
    #[serde(rename = "selfClosing")]
    pub self_closing: bool,
}

/// The closing tag of a JSX element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxClosingElement {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Element name; must match the opening tag
    pub name: JsxElementName,
}

/// `<>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxOpeningFragment {
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// `</>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxClosingFragment {
    #[serde(flatten)]
    pub meta: NodeMeta,
}

/// The name of a JSX element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsxElementName {
    /// Plain name (`<div>`)
    Identifier(JsxIdentifier),
    /// Dotted name (`<A.B.C>`)
    Member(Box<JsxMemberExpression>),
    /// Namespaced name (`<ns:tag>`)
    Namespaced(Box<JsxNamespacedName>),
}

impl JsxElementName {
    /// Source text of the name, used to match closing tags
    pub fn as_text(&self) -> String {
        match self {
            JsxElementName::Identifier(id) => id.name.clone(),
            JsxElementName::Member(m) => {
                format!("{}.{}", m.object.as_text(), m.property.name)
            }
            JsxElementName::Namespaced(n) => {
                format!("{}:{}", n.namespace.name, n.name.name)
            }
        }
    }

    /// Get the span of this name
    pub fn span(&self) -> Span {
        match self {
            JsxElementName::Identifier(id) => id.meta.span,
            JsxElementName::Member(m) => m.meta.span,
            JsxElementName::Namespaced(n) => n.meta.span,
        }
    }
}

/// An identifier in JSX name position (hyphens allowed)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxIdentifier {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The name text
    pub name: String,
}

/// A dotted JSX name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxMemberExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Left part
    pub object: JsxElementName,
    /// Right part
    pub property: JsxIdentifier,
}

/// A namespaced JSX name (`ns:tag`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxNamespacedName {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Namespace part
    pub namespace: JsxIdentifier,
    /// Local part
    pub name: JsxIdentifier,
}

/// An attribute or spread inside an opening tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsxAttributeItem {
    Attribute(JsxAttribute),
    Spread(JsxSpreadAttribute),
}

/// A JSX attribute (`x="1"`, `x={expr}`, bare `x`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxAttribute {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Attribute name
    pub name: JsxAttributeName,
    /// Attribute value; None for bare attributes
    pub value: Option<JsxAttributeValue>,
}

/// Name of a JSX attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsxAttributeName {
    Identifier(JsxIdentifier),
    Namespaced(Box<JsxNamespacedName>),
}

/// Value of a JSX attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsxAttributeValue {
    /// String literal value
    Literal(Literal),
    /// `{expr}` value
    Container(Box<JsxExpressionContainer>),
    /// Nested element value
    Element(Box<JsxElement>),
    /// Nested fragment value
    Fragment(Box<JsxFragment>),
}

/// A spread attribute (`{...props}`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxSpreadAttribute {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The spread operand
    pub argument: Expression,
}

/// A child of a JSX element or fragment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsxChild {
    /// Raw text between tags
    Text(JsxText),
    /// `{expr}` child
    Container(JsxExpressionContainer),
    /// Nested element
    Element(Box<JsxElement>),
    /// Nested fragment
    Fragment(Box<JsxFragment>),
}

/// Raw text inside a JSX element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxText {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The text value
    pub value: String,
    /// Raw source text, kept when the `raw` option is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// An expression embedded in JSX (`{expr}`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxExpressionContainer {
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// The contained expression
    pub expression: JsxContainedExpression,
}

/// Contents of a JSX expression container
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsxContainedExpression {
    /// A real expression
    Expression(Box<Expression>),
    /// An empty container (`{}` or `{/* comment */}`)
    Empty(JsxEmptyExpression),
}

/// The hole inside an empty JSX container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxEmptyExpression {
    #[serde(flatten)]
    pub meta: NodeMeta,
}
