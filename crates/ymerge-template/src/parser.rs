/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template parser.
//!
//! A single left-to-right scan over the source. Literal runs between tags
//! become [`Literal`] nodes; sections are tracked on an explicit stack so
//! nesting depth is bounded only by memory.

use crate::ast::{Comment, Literal, Section, TemplateNode, VariableRef};
use crate::error::{TemplateError, TemplateResult};
use std::path::Path;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const TRIPLE_OPEN: &str = "{{{";
const TRIPLE_CLOSE: &str = "}}}";

/// A compiled template ready for evaluation.
#[derive(Debug, Clone)]
pub struct Template {
    /// The parsed template AST.
    pub(crate) nodes: Vec<TemplateNode>,
}

impl Template {
    /// Compile a template from source text.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::ParseError`] for unclosed tags, unbalanced
    /// sections, empty tags, partials and delimiter changes.
    pub fn compile(source: &str) -> TemplateResult<Self> {
        let nodes = Parser::new(source).parse()?;
        Ok(Self { nodes })
    }

    /// Compile a template read from a file.
    pub fn compile_from_file(path: &Path) -> TemplateResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::compile(&source)
    }

    /// Get the parsed AST nodes.
    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }

    /// Names of all variables referenced by interpolations and sections,
    /// in first-seen order, without duplicates.
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_variables(&self.nodes, &mut names);
        names
    }
}

fn collect_variables<'a>(nodes: &'a [TemplateNode], names: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            TemplateNode::Variable(var) => push_unique(names, &var.name),
            TemplateNode::Section(section) => {
                push_unique(names, &section.name);
                collect_variables(&section.children, names);
            }
            TemplateNode::Literal(_) | TemplateNode::Comment(_) => {}
        }
    }
}

fn push_unique<'a>(names: &mut Vec<&'a str>, name: &'a str) {
    if !names.contains(&name) {
        names.push(name);
    }
}

/// A single `{{...}}` tag, classified by its sigil.
#[derive(Debug)]
enum Tag<'a> {
    Variable(&'a str),
    Open { name: &'a str, inverted: bool },
    Close(&'a str),
    Comment(&'a str),
}

/// A section whose closing tag has not been seen yet.
struct OpenSection {
    name: String,
    inverted: bool,
    offset: usize,
    /// Nodes of the enclosing scope, restored when the section closes.
    parent: Vec<TemplateNode>,
}

struct Parser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn parse(mut self) -> TemplateResult<Vec<TemplateNode>> {
        let source = self.source;
        let mut open: Vec<OpenSection> = Vec::new();
        let mut nodes = Vec::new();

        while let Some(found) = source[self.pos..].find(OPEN) {
            let tag_start = self.pos + found;
            push_literal(&mut nodes, &source[self.pos..tag_start], self.pos);

            match self.read_tag(tag_start)? {
                Tag::Variable(name) => nodes.push(TemplateNode::Variable(VariableRef {
                    name: name.to_string(),
                    offset: tag_start,
                })),
                Tag::Comment(text) => nodes.push(TemplateNode::Comment(Comment {
                    text: text.to_string(),
                    offset: tag_start,
                })),
                Tag::Open { name, inverted } => open.push(OpenSection {
                    name: name.to_string(),
                    inverted,
                    offset: tag_start,
                    parent: std::mem::take(&mut nodes),
                }),
                Tag::Close(name) => {
                    let Some(section) = open.pop() else {
                        return Err(TemplateError::parse(
                            format!("closing tag for `{}` without a matching section", name),
                            tag_start,
                        ));
                    };
                    if section.name != name {
                        return Err(TemplateError::parse(
                            format!("section `{}` closed by `{}`", section.name, name),
                            tag_start,
                        ));
                    }
                    let children = std::mem::replace(&mut nodes, section.parent);
                    nodes.push(TemplateNode::Section(Section {
                        name: section.name,
                        inverted: section.inverted,
                        children,
                        offset: section.offset,
                    }));
                }
            }
        }

        push_literal(&mut nodes, &source[self.pos..], self.pos);

        if let Some(section) = open.pop() {
            return Err(TemplateError::parse(
                format!("unclosed section `{}`", section.name),
                section.offset,
            ));
        }

        Ok(nodes)
    }

    /// Read the tag starting at `start` and advance past its closing delimiter.
    fn read_tag(&mut self, start: usize) -> TemplateResult<Tag<'a>> {
        let source = self.source;

        if source[start..].starts_with(TRIPLE_OPEN) {
            let inner_start = start + TRIPLE_OPEN.len();
            let close = source[inner_start..]
                .find(TRIPLE_CLOSE)
                .ok_or_else(|| TemplateError::parse("unclosed tag, expected `}}}`", start))?;
            self.pos = inner_start + close + TRIPLE_CLOSE.len();
            let name = tag_name(&source[inner_start..inner_start + close], start)?;
            return Ok(Tag::Variable(name));
        }

        let inner_start = start + OPEN.len();
        let close = source[inner_start..]
            .find(CLOSE)
            .ok_or_else(|| TemplateError::parse("unclosed tag, expected `}}`", start))?;
        self.pos = inner_start + close + CLOSE.len();

        let inner = source[inner_start..inner_start + close].trim();
        // Sigils are all single-byte ASCII, so `inner[1..]` is a char boundary.
        match inner.chars().next() {
            Some('!') => Ok(Tag::Comment(inner[1..].trim())),
            Some('#') => Ok(Tag::Open {
                name: tag_name(&inner[1..], start)?,
                inverted: false,
            }),
            Some('^') => Ok(Tag::Open {
                name: tag_name(&inner[1..], start)?,
                inverted: true,
            }),
            Some('/') => Ok(Tag::Close(tag_name(&inner[1..], start)?)),
            Some('&') => Ok(Tag::Variable(tag_name(&inner[1..], start)?)),
            Some('>') => Err(TemplateError::parse("partials are not supported", start)),
            Some('=') => Err(TemplateError::parse(
                "changing delimiters is not supported",
                start,
            )),
            _ => Ok(Tag::Variable(tag_name(inner, start)?)),
        }
    }
}

/// Validate and trim a variable name.
///
/// Any other text is a plain lookup key, so `{{ .Values.x | quote }}` just
/// names a variable that is never defined.
fn tag_name(raw: &str, offset: usize) -> TemplateResult<&str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(TemplateError::parse("empty tag", offset));
    }
    if name.contains(['{', '}']) {
        return Err(TemplateError::parse(
            format!("invalid variable name `{}`", name),
            offset,
        ));
    }
    Ok(name)
}

fn push_literal(nodes: &mut Vec<TemplateNode>, text: &str, offset: usize) {
    if !text.is_empty() {
        nodes.push(TemplateNode::Literal(Literal {
            text: text.to_string(),
            offset,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error_offset(source: &str) -> usize {
        match Template::compile(source) {
            Err(TemplateError::ParseError { offset, .. }) => offset,
            other => panic!("expected parse error for {:?}, got {:?}", source, other),
        }
    }

    #[test]
    fn test_plain_text_is_single_literal() {
        let template = Template::compile("key: value\nother: 1\n").unwrap();
        assert_eq!(template.nodes().len(), 1);
        assert!(matches!(
            &template.nodes()[0],
            TemplateNode::Literal(Literal { text, offset: 0 }) if text == "key: value\nother: 1\n"
        ));
    }

    #[test]
    fn test_empty_source() {
        let template = Template::compile("").unwrap();
        assert!(template.nodes().is_empty());
    }

    #[test]
    fn test_variable_with_colon_suffix() {
        let template = Template::compile("host: {{ENV_VAR}}:22133").unwrap();
        let nodes = template.nodes();
        assert_eq!(nodes.len(), 3);
        assert!(matches!(
            &nodes[1],
            TemplateNode::Variable(VariableRef { name, offset: 6 }) if name == "ENV_VAR"
        ));
        assert!(matches!(
            &nodes[2],
            TemplateNode::Literal(Literal { text, offset: 17 }) if text == ":22133"
        ));
    }

    #[test]
    fn test_whitespace_inside_tags() {
        let template = Template::compile("{{ a }}{{{ b }}}{{& c }}").unwrap();
        assert_eq!(template.variables(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_nested_sections() {
        let template = Template::compile("{{#a}}x{{^b}}y{{/b}}{{/a}}").unwrap();
        let nodes = template.nodes();
        assert_eq!(nodes.len(), 1);

        let TemplateNode::Section(outer) = &nodes[0] else {
            panic!("expected section");
        };
        assert_eq!(outer.name, "a");
        assert!(!outer.inverted);
        assert_eq!(outer.children.len(), 2);

        let TemplateNode::Section(inner) = &outer.children[1] else {
            panic!("expected nested section");
        };
        assert_eq!(inner.name, "b");
        assert!(inner.inverted);
        assert_eq!(inner.offset, 7);
    }

    #[test]
    fn test_comment() {
        let template = Template::compile("a{{! note to self }}b").unwrap();
        assert!(matches!(
            &template.nodes()[1],
            TemplateNode::Comment(Comment { text, .. }) if text == "note to self"
        ));
        assert!(template.variables().is_empty());
    }

    #[test]
    fn test_variables_deduplicated_in_order() {
        let template = Template::compile("{{B}} {{A}} {{#B}}{{C}}{{A}}{{/B}}").unwrap();
        assert_eq!(template.variables(), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_unclosed_tag() {
        assert_eq!(parse_error_offset("url: {{HOST"), 5);
        assert_eq!(parse_error_offset("url: {{{HOST}}"), 5);
    }

    #[test]
    fn test_unbalanced_sections() {
        assert_eq!(parse_error_offset("ok {{#a}} never closed"), 3);
        assert_eq!(parse_error_offset("{{/a}}"), 0);
        assert_eq!(parse_error_offset("{{#a}}{{/b}}"), 6);
    }

    #[test]
    fn test_rejected_tags() {
        assert_eq!(parse_error_offset("{{}}"), 0);
        assert_eq!(parse_error_offset("x {{> partial}}"), 2);
        assert_eq!(parse_error_offset("{{=<% %>=}}"), 0);
        assert_eq!(parse_error_offset("a: {{ x{y }}"), 3);
    }

    #[test]
    fn test_names_with_inner_whitespace() {
        let template = Template::compile("cmd: \"{{ not a var }}\" {{#a b}}x{{/a b}}").unwrap();
        assert_eq!(template.variables(), vec!["not a var", "a b"]);

        let template = Template::compile("image: {{ .Values.image | quote }}").unwrap();
        assert_eq!(template.variables(), vec![".Values.image | quote"]);
    }

    #[test]
    fn test_multibyte_text_around_tags() {
        let template = Template::compile("clé: {{VALEUR}} ✓").unwrap();
        assert_eq!(template.variables(), vec!["VALEUR"]);
        assert_eq!(template.nodes()[1].offset(), "clé: ".len());
    }
}
