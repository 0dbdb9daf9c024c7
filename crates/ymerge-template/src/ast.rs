/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template AST types.
//!
//! Every node records the byte offset of its opening delimiter (or of its
//! first character, for literals) in the template source.

/// A node in the template AST.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// Literal text to be output as-is.
    Literal(Literal),

    /// Variable interpolation: `{{name}}`, `{{{name}}}` or `{{& name}}`
    Variable(VariableRef),

    /// Section block: `{{#name}}...{{/name}}` or `{{^name}}...{{/name}}`
    Section(Section),

    /// Comment (not rendered): `{{! comment}}`
    Comment(Comment),
}

/// Literal text node.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// The literal text content.
    pub text: String,
    /// Byte offset of the text in the template source.
    pub offset: usize,
}

/// Variable reference.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableRef {
    /// Variable name, with surrounding whitespace removed.
    pub name: String,
    /// Byte offset of the opening `{{`.
    pub offset: usize,
}

/// Section block.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Variable controlling the section.
    pub name: String,
    /// `true` for `{{^name}}` blocks.
    pub inverted: bool,
    /// Section body.
    pub children: Vec<TemplateNode>,
    /// Byte offset of the opening tag.
    pub offset: usize,
}

/// Comment (not rendered).
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// The comment text.
    pub text: String,
    /// Byte offset of the opening `{{`.
    pub offset: usize,
}

impl TemplateNode {
    /// Byte offset of this node in the template source.
    pub fn offset(&self) -> usize {
        match self {
            TemplateNode::Literal(Literal { offset, .. })
            | TemplateNode::Variable(VariableRef { offset, .. })
            | TemplateNode::Section(Section { offset, .. })
            | TemplateNode::Comment(Comment { offset, .. }) => *offset,
        }
    }
}
