//! JSX element and fragment parsing, active only under the `jsx` option.
//!
//! JSX needs its own scanning rules: raw text between tags, hyphenated
//! identifiers and escape-free strings inside tags. The scanner exposes a
//! child mode and a tag mode for those regions; this module drives the mode
//! switches, dropping back to ordinary expression scanning inside `{ ... }`
//! containers. The token that follows a finished element depends on where
//! the element appeared, so every tag-closing `>` is consumed with the mode
//! its surroundings need next.

use crate::ast::{
    Expression, JsxAttribute, JsxAttributeItem, JsxAttributeName, JsxAttributeValue, JsxChild,
    JsxClosingElement, JsxClosingFragment, JsxContainedExpression, JsxElement, JsxElementName,
    JsxEmptyExpression, JsxExpressionContainer, JsxFragment, JsxIdentifier, JsxMemberExpression,
    JsxNamespacedName, JsxOpeningElement, JsxOpeningFragment, JsxSpreadAttribute, JsxText,
    Literal, LiteralValue, Span,
};
use crate::context::Context;
use crate::error::{messages, Result, SourceLocation};
use crate::lexer::{Token, TokenKind, TokenValue};

use super::Parser;

/// Scanning mode for the token after an element's final `>`
#[derive(Debug, Clone, Copy, PartialEq)]
enum JsxExit {
    /// The element sits in ordinary expression position
    Expression,
    /// The element is a child of another element
    Child,
    /// The element is a JSX attribute value
    Tag,
}

/// An element or fragment, before the caller picks the node type
enum JsxNode {
    Element(JsxElement),
    Fragment(JsxFragment),
}

impl<'src> Parser<'src> {
    // ========== Entry point ==========

    /// Parse the JSX element or fragment starting at the current `<`
    pub(crate) fn parse_jsx_element_or_fragment(&mut self, ctx: Context) -> Result<Expression> {
        match self.parse_jsx_node(ctx, JsxExit::Expression)? {
            JsxNode::Element(element) => Ok(Expression::JsxElement(Box::new(element))),
            JsxNode::Fragment(fragment) => Ok(Expression::JsxFragment(Box::new(fragment))),
        }
    }

    // ========== Elements and fragments ==========

    fn parse_jsx_node(&mut self, ctx: Context, exit: JsxExit) -> Result<JsxNode> {
        let start = self.token.location;
        self.bump_jsx_tag()?;
        self.parse_jsx_node_rest(ctx, start, exit)
    }

    /// Parse an element or fragment whose `<` is already consumed
    fn parse_jsx_node_rest(
        &mut self,
        ctx: Context,
        start: SourceLocation,
        exit: JsxExit,
    ) -> Result<JsxNode> {
        if self.at(TokenKind::Greater) {
            return self.parse_jsx_fragment_rest(ctx, start, exit);
        }

        let name = self.parse_jsx_element_name()?;
        let mut attributes = Vec::new();
        loop {
            match self.token.kind {
                TokenKind::Identifier => {
                    attributes.push(JsxAttributeItem::Attribute(
                        self.parse_jsx_attribute(ctx)?,
                    ));
                }
                TokenKind::LeftBrace => {
                    attributes.push(JsxAttributeItem::Spread(
                        self.parse_jsx_spread_attribute(ctx)?,
                    ));
                }
                TokenKind::Slash => {
                    self.bump_jsx_tag()?;
                    if !self.at(TokenKind::Greater) {
                        return Err(self.error(
                            messages::expected_token(">", self.token.kind.as_display_str()),
                            self.token.location,
                        ));
                    }
                    self.bump_jsx_exit(ctx, exit)?;
                    let span = Span::new(start, self.prev_token_end);
                    return Ok(JsxNode::Element(JsxElement {
                        meta: self.meta_at("JSXElement", span),
                        opening_element: JsxOpeningElement {
                            meta: self.meta_at("JSXOpeningElement", span),
                            name,
                            attributes,
                            self_closing: true,
                        },
                        children: Vec::new(),
                        closing_element: None,
                    }));
                }
                TokenKind::Greater => break,
                _ => return Err(self.unexpected()),
            }
        }

        // children follow; the `>` switches the scanner to child mode
        self.bump_jsx_child()?;
        let opening_element = JsxOpeningElement {
            meta: self.meta_at("JSXOpeningElement", Span::new(start, self.prev_token_end)),
            name,
            attributes,
            self_closing: false,
        };

        let mut children = Vec::new();
        let closing_start = self.parse_jsx_children(ctx, &mut children)?;

        self.bump_jsx_tag()?;
        let closing_name = self.parse_jsx_element_name()?;
        let opening_text = opening_element.name.as_text();
        if closing_name.as_text() != opening_text {
            return Err(self.error(
                messages::jsx_mismatched_closing(&opening_text),
                closing_name.span().start,
            ));
        }
        if !self.at(TokenKind::Greater) {
            return Err(self.error(
                messages::expected_token(">", self.token.kind.as_display_str()),
                self.token.location,
            ));
        }
        self.bump_jsx_exit(ctx, exit)?;
        let closing_element = JsxClosingElement {
            meta: self.meta_at(
                "JSXClosingElement",
                Span::new(closing_start, self.prev_token_end),
            ),
            name: closing_name,
        };

        Ok(JsxNode::Element(JsxElement {
            meta: self.meta("JSXElement", start),
            opening_element,
            children,
            closing_element: Some(closing_element),
        }))
    }

    /// Parse a fragment whose `<` is consumed and whose `>` is current
    fn parse_jsx_fragment_rest(
        &mut self,
        ctx: Context,
        start: SourceLocation,
        exit: JsxExit,
    ) -> Result<JsxNode> {
        self.bump_jsx_child()?;
        let opening_fragment = JsxOpeningFragment {
            meta: self.meta_at("JSXOpeningFragment", Span::new(start, self.prev_token_end)),
        };

        let mut children = Vec::new();
        let closing_start = self.parse_jsx_children(ctx, &mut children)?;

        self.bump_jsx_tag()?;
        if !self.at(TokenKind::Greater) {
            return Err(self.error(messages::jsx_mismatched_closing(""), self.token.location));
        }
        self.bump_jsx_exit(ctx, exit)?;
        let closing_fragment = JsxClosingFragment {
            meta: self.meta_at(
                "JSXClosingFragment",
                Span::new(closing_start, self.prev_token_end),
            ),
        };

        Ok(JsxNode::Fragment(JsxFragment {
            meta: self.meta("JSXFragment", start),
            opening_fragment,
            children,
            closing_fragment,
        }))
    }

    /// Collect children until the `</` of the closing tag
    ///
    /// Returns the location of that `<` and leaves the `/` current, scanned
    /// in tag mode.
    fn parse_jsx_children(
        &mut self,
        ctx: Context,
        children: &mut Vec<JsxChild>,
    ) -> Result<SourceLocation> {
        loop {
            match self.token.kind {
                TokenKind::JsxText => {
                    let span = self.token_span();
                    let value = match &self.token.value {
                        TokenValue::String(text) => text.clone(),
                        _ => self.token.text.to_string(),
                    };
                    children.push(JsxChild::Text(JsxText {
                        meta: self.meta_at("JSXText", span),
                        value,
                        raw: self.raw(span),
                    }));
                    self.bump_jsx_child()?;
                }
                TokenKind::LeftBrace => {
                    children.push(JsxChild::Container(self.parse_jsx_container_child(ctx)?));
                }
                TokenKind::Less => {
                    let less_start = self.token.location;
                    self.bump_jsx_tag()?;
                    if self.at(TokenKind::Slash) {
                        return Ok(less_start);
                    }
                    match self.parse_jsx_node_rest(ctx, less_start, JsxExit::Child)? {
                        JsxNode::Element(element) => {
                            children.push(JsxChild::Element(Box::new(element)));
                        }
                        JsxNode::Fragment(fragment) => {
                            children.push(JsxChild::Fragment(Box::new(fragment)));
                        }
                    }
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    /// Parse a `{ ... }` child; `{}` and `{/* comment */}` stay empty
    fn parse_jsx_container_child(&mut self, ctx: Context) -> Result<JsxExpressionContainer> {
        let start = self.token.location;
        self.bump(ctx)?;
        let expression = if self.at(TokenKind::RightBrace) {
            let empty_span = Span::new(self.prev_token_end, self.token.location);
            JsxContainedExpression::Empty(JsxEmptyExpression {
                meta: self.meta_at("JSXEmptyExpression", empty_span),
            })
        } else {
            let expression = self.parse_expression(ctx.and_in(true))?;
            JsxContainedExpression::Expression(Box::new(expression))
        };
        if !self.at(TokenKind::RightBrace) {
            return Err(self.error(
                messages::expected_token("}", self.token.kind.as_display_str()),
                self.token.location,
            ));
        }
        self.bump_jsx_child()?;
        Ok(JsxExpressionContainer {
            meta: self.meta("JSXExpressionContainer", start),
            expression,
        })
    }

    // ========== Names and attributes ==========

    /// Parse an element name: plain, dotted, or `ns:name`
    fn parse_jsx_element_name(&mut self) -> Result<JsxElementName> {
        let start = self.token.location;
        let first_token = self.expect_jsx_identifier()?;
        let first = self.jsx_identifier_from(&first_token);

        if self.at(TokenKind::Colon) {
            self.bump_jsx_tag()?;
            let local_token = self.expect_jsx_identifier()?;
            let local = self.jsx_identifier_from(&local_token);
            return Ok(JsxElementName::Namespaced(Box::new(JsxNamespacedName {
                meta: self.meta_at("JSXNamespacedName", Span::new(start, self.prev_token_end)),
                namespace: first,
                name: local,
            })));
        }

        let mut name = JsxElementName::Identifier(first);
        while self.at(TokenKind::Dot) {
            self.bump_jsx_tag()?;
            let property_token = self.expect_jsx_identifier()?;
            let property = self.jsx_identifier_from(&property_token);
            name = JsxElementName::Member(Box::new(JsxMemberExpression {
                meta: self.meta_at("JSXMemberExpression", Span::new(start, self.prev_token_end)),
                object: name,
                property,
            }));
        }
        Ok(name)
    }

    /// Parse one attribute: `name`, `name="text"`, `name={expr}` or a
    /// nested element value
    fn parse_jsx_attribute(&mut self, ctx: Context) -> Result<JsxAttribute> {
        let start = self.token.location;
        let first_token = self.expect_jsx_identifier()?;
        let first = self.jsx_identifier_from(&first_token);
        let name = if self.at(TokenKind::Colon) {
            self.bump_jsx_tag()?;
            let local_token = self.expect_jsx_identifier()?;
            let local = self.jsx_identifier_from(&local_token);
            JsxAttributeName::Namespaced(Box::new(JsxNamespacedName {
                meta: self.meta_at("JSXNamespacedName", Span::new(start, self.prev_token_end)),
                namespace: first,
                name: local,
            }))
        } else {
            JsxAttributeName::Identifier(first)
        };

        let value = if self.at(TokenKind::Equals) {
            self.bump_jsx_tag()?;
            Some(self.parse_jsx_attribute_value(ctx)?)
        } else {
            None
        };
        Ok(JsxAttribute {
            meta: self.meta("JSXAttribute", start),
            name,
            value,
        })
    }

    fn parse_jsx_attribute_value(&mut self, ctx: Context) -> Result<JsxAttributeValue> {
        match self.token.kind {
            TokenKind::StringLiteral => {
                let token = self.bump_jsx_tag()?;
                let span = Span::new(token.location, self.prev_token_end);
                let text = match token.value {
                    TokenValue::String(text) => text,
                    _ => String::new(),
                };
                Ok(JsxAttributeValue::Literal(Literal {
                    meta: self.meta_at("Literal", span),
                    value: LiteralValue::String(text),
                    raw: self.raw(span),
                }))
            }
            TokenKind::LeftBrace => {
                let start = self.token.location;
                self.bump(ctx)?;
                if self.at(TokenKind::RightBrace) {
                    return Err(self.error(messages::JSX_EMPTY_ATTRIBUTE, start));
                }
                let expression = self.parse_expression(ctx.and_in(true))?;
                if !self.at(TokenKind::RightBrace) {
                    return Err(self.error(
                        messages::expected_token("}", self.token.kind.as_display_str()),
                        self.token.location,
                    ));
                }
                self.bump_jsx_tag()?;
                Ok(JsxAttributeValue::Container(Box::new(
                    JsxExpressionContainer {
                        meta: self.meta("JSXExpressionContainer", start),
                        expression: JsxContainedExpression::Expression(Box::new(expression)),
                    },
                )))
            }
            TokenKind::Less => match self.parse_jsx_node(ctx, JsxExit::Tag)? {
                JsxNode::Element(element) => Ok(JsxAttributeValue::Element(Box::new(element))),
                JsxNode::Fragment(fragment) => Ok(JsxAttributeValue::Fragment(Box::new(fragment))),
            },
            _ => Err(self.unexpected()),
        }
    }

    /// `{...expr}` inside an opening tag
    fn parse_jsx_spread_attribute(&mut self, ctx: Context) -> Result<JsxSpreadAttribute> {
        let start = self.token.location;
        self.bump(ctx)?;
        self.expect(ctx, TokenKind::DotDotDot)?;
        let argument = self.parse_assignment_expression(ctx.and_in(true))?;
        if !self.at(TokenKind::RightBrace) {
            return Err(self.error(
                messages::expected_token("}", self.token.kind.as_display_str()),
                self.token.location,
            ));
        }
        self.bump_jsx_tag()?;
        Ok(JsxSpreadAttribute {
            meta: self.meta("JSXSpreadAttribute", start),
            argument,
        })
    }

    // ========== Scanning helpers ==========

    /// Consume an element's final `>` with the scan mode its position needs
    fn bump_jsx_exit(&mut self, ctx: Context, exit: JsxExit) -> Result<()> {
        match exit {
            JsxExit::Expression => {
                self.bump(ctx)?;
            }
            JsxExit::Child => {
                self.bump_jsx_child()?;
            }
            JsxExit::Tag => {
                self.bump_jsx_tag()?;
            }
        }
        Ok(())
    }

    fn expect_jsx_identifier(&mut self) -> Result<Token<'src>> {
        if self.at(TokenKind::Identifier) {
            self.bump_jsx_tag()
        } else {
            Err(self.error(
                messages::expected_token("identifier", self.token.kind.as_display_str()),
                self.token.location,
            ))
        }
    }

    /// Build a JSX identifier from a just-consumed tag-mode token
    fn jsx_identifier_from(&self, token: &Token<'src>) -> JsxIdentifier {
        JsxIdentifier {
            meta: self.meta_at(
                "JSXIdentifier",
                Span::new(token.location, self.prev_token_end),
            ),
            name: token.text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{
        Expression, JsxAttributeItem, JsxAttributeName, JsxAttributeValue, JsxChild,
        JsxContainedExpression, JsxElementName, Program, Statement,
    };
    use crate::error::{messages, Error};
    use crate::options::Options;
    use crate::parser::parse_script;

    fn jsx_options() -> Options {
        Options {
            jsx: true,
            ..Options::default()
        }
    }

    fn jsx(source: &str) -> Program {
        parse_script(source, jsx_options()).unwrap()
    }

    fn jsx_err(source: &str) -> Error {
        parse_script(source, jsx_options()).unwrap_err()
    }

    fn jsx_expression(source: &str) -> Expression {
        let program = jsx(source);
        let Some(Statement::Expression(statement)) = program.body.into_iter().next() else {
            panic!("expected expression statement");
        };
        statement.expression
    }

    #[test]
    fn parses_jsx_element() {
        let Expression::JsxElement(element) = jsx_expression("<div id=\"main\">hello</div>")
        else {
            panic!("expected JSX element");
        };
        let JsxElementName::Identifier(name) = &element.opening_element.name else {
            panic!("expected plain name");
        };
        assert_eq!(name.name, "div");
        assert!(!element.opening_element.self_closing);
        assert_eq!(element.opening_element.attributes.len(), 1);
        let JsxAttributeItem::Attribute(attribute) = &element.opening_element.attributes[0]
        else {
            panic!("expected attribute");
        };
        let JsxAttributeName::Identifier(attr_name) = &attribute.name else {
            panic!("expected plain attribute name");
        };
        assert_eq!(attr_name.name, "id");
        assert!(matches!(
            &attribute.value,
            Some(JsxAttributeValue::Literal(_))
        ));
        assert_eq!(element.children.len(), 1);
        let JsxChild::Text(text) = &element.children[0] else {
            panic!("expected text child");
        };
        assert_eq!(text.value, "hello");
        assert!(element.closing_element.is_some());
    }

    #[test]
    fn parses_jsx_nesting_and_member_names() {
        let Expression::JsxElement(element) = jsx_expression("<div><br/><A.B.C/></div>") else {
            panic!("expected JSX element");
        };
        assert_eq!(element.children.len(), 2);
        let JsxChild::Element(first) = &element.children[0] else {
            panic!("expected element child");
        };
        assert!(first.opening_element.self_closing);
        assert!(first.closing_element.is_none());
        let JsxChild::Element(second) = &element.children[1] else {
            panic!("expected element child");
        };
        assert_eq!(second.opening_element.name.as_text(), "A.B.C");
        assert!(matches!(
            second.opening_element.name,
            JsxElementName::Member(_)
        ));
    }

    #[test]
    fn parses_jsx_fragment() {
        let Expression::JsxFragment(fragment) = jsx_expression("<>text{value}</>") else {
            panic!("expected JSX fragment");
        };
        assert_eq!(fragment.children.len(), 2);
        assert!(matches!(fragment.children[0], JsxChild::Text(_)));
        let JsxChild::Container(container) = &fragment.children[1] else {
            panic!("expected container child");
        };
        assert!(matches!(
            &container.expression,
            JsxContainedExpression::Expression(expression)
                if matches!(expression.as_ref(), Expression::Identifier(_))
        ));
    }

    #[test]
    fn parses_jsx_expression_containers() {
        let Expression::JsxElement(element) = jsx_expression("<div>{1 + 2}{}</div>") else {
            panic!("expected JSX element");
        };
        assert_eq!(element.children.len(), 2);
        let JsxChild::Container(full) = &element.children[0] else {
            panic!("expected container");
        };
        assert!(matches!(
            &full.expression,
            JsxContainedExpression::Expression(expression)
                if matches!(expression.as_ref(), Expression::Binary(_))
        ));
        let JsxChild::Container(empty) = &element.children[1] else {
            panic!("expected container");
        };
        assert!(matches!(
            empty.expression,
            JsxContainedExpression::Empty(_)
        ));
    }

    #[test]
    fn parses_jsx_attribute_forms() {
        let Expression::JsxElement(element) = jsx_expression(
            "<input data-value={x} ns:role=\"tab\" disabled {...rest} frame=<svg:rect/> />",
        ) else {
            panic!("expected JSX element");
        };
        assert!(element.opening_element.self_closing);
        let attributes = &element.opening_element.attributes;
        assert_eq!(attributes.len(), 5);

        let JsxAttributeItem::Attribute(hyphenated) = &attributes[0] else {
            panic!("expected attribute");
        };
        let JsxAttributeName::Identifier(name) = &hyphenated.name else {
            panic!("expected plain attribute name");
        };
        assert_eq!(name.name, "data-value");
        assert!(matches!(
            &hyphenated.value,
            Some(JsxAttributeValue::Container(_))
        ));

        let JsxAttributeItem::Attribute(namespaced) = &attributes[1] else {
            panic!("expected attribute");
        };
        assert!(matches!(&namespaced.name, JsxAttributeName::Namespaced(_)));

        let JsxAttributeItem::Attribute(bare) = &attributes[2] else {
            panic!("expected attribute");
        };
        assert!(bare.value.is_none());

        assert!(matches!(&attributes[3], JsxAttributeItem::Spread(_)));

        let JsxAttributeItem::Attribute(nested) = &attributes[4] else {
            panic!("expected attribute");
        };
        assert!(matches!(
            &nested.value,
            Some(JsxAttributeValue::Element(_))
        ));
    }

    #[test]
    fn rejects_mismatched_closing_tags() {
        assert_eq!(
            jsx_err("<div>text</span>").message(),
            messages::jsx_mismatched_closing("div")
        );
        assert_eq!(
            jsx_err("<>text</div>").message(),
            messages::jsx_mismatched_closing("")
        );
        assert_eq!(
            jsx_err("<A.B></A.C>").message(),
            messages::jsx_mismatched_closing("A.B")
        );
    }

    #[test]
    fn rejects_empty_attribute_expression() {
        assert_eq!(
            jsx_err("<div x={} />").message(),
            messages::JSX_EMPTY_ATTRIBUTE
        );
    }

    #[test]
    fn jsx_stays_off_by_default() {
        assert!(parse_script("<div/>", Options::default()).is_err());
        // `<` keeps working as an operator with the option on
        let program = jsx("a < b");
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn parses_jsx_in_expression_positions() {
        let program = jsx("const node = ready ? <a/> : <b>alt</b>;");
        assert_eq!(program.body.len(), 1);
        let program = jsx("f(<div>{items}</div>, 1)");
        assert_eq!(program.body.len(), 1);
    }
}
