/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template evaluation.

use crate::ast::{Section, TemplateNode, VariableRef};
use crate::context::VariableSource;
use crate::error::{TemplateError, TemplateResult};
use crate::parser::Template;

/// How to treat a `{{name}}` whose variable is not defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedVariables {
    /// Render as the empty string (mustache behaviour).
    #[default]
    Empty,

    /// Fail with [`TemplateError::UndefinedVariable`].
    Error,
}

/// Options for rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Treatment of undefined interpolated variables.
    ///
    /// Sections never fail: an undefined section variable is simply falsy.
    pub undefined: UndefinedVariables,
}

impl Template {
    /// Render this template with default options.
    pub fn render(&self, variables: &dyn VariableSource) -> TemplateResult<String> {
        self.render_with(variables, &RenderOptions::default())
    }

    /// Render this template with custom options.
    pub fn render_with(
        &self,
        variables: &dyn VariableSource,
        options: &RenderOptions,
    ) -> TemplateResult<String> {
        let mut output = String::new();
        evaluate(&self.nodes, variables, options, &mut output)?;
        Ok(output)
    }
}

/// Evaluate a list of template nodes, appending to `output`.
fn evaluate(
    nodes: &[TemplateNode],
    variables: &dyn VariableSource,
    options: &RenderOptions,
    output: &mut String,
) -> TemplateResult<()> {
    for node in nodes {
        match node {
            TemplateNode::Literal(literal) => output.push_str(&literal.text),
            TemplateNode::Variable(var) => render_variable(var, variables, options, output)?,
            TemplateNode::Section(section) => {
                if section_is_active(section, variables) {
                    evaluate(&section.children, variables, options, output)?;
                }
            }
            TemplateNode::Comment(_) => {}
        }
    }
    Ok(())
}

fn render_variable(
    var: &VariableRef,
    variables: &dyn VariableSource,
    options: &RenderOptions,
    output: &mut String,
) -> TemplateResult<()> {
    match (variables.lookup(&var.name), options.undefined) {
        (Some(value), _) => output.push_str(value),
        (None, UndefinedVariables::Empty) => {}
        (None, UndefinedVariables::Error) => {
            return Err(TemplateError::UndefinedVariable {
                name: var.name.clone(),
            });
        }
    }
    Ok(())
}

/// A section renders when its variable is a non-empty string; an inverted
/// section renders in exactly the opposite case.
fn section_is_active(section: &Section, variables: &dyn VariableSource) -> bool {
    let truthy = variables
        .lookup(&section.name)
        .is_some_and(|value| !value.is_empty());
    truthy != section.inverted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn render(source: &str, pairs: &[(&str, &str)]) -> String {
        Template::compile(source)
            .unwrap()
            .render(&vars(pairs))
            .unwrap()
    }

    #[test]
    fn test_interpolation() {
        assert_eq!(
            render("another_key: {{ENV_VAR}}:22133", &[("ENV_VAR", "localhost")]),
            "another_key: localhost:22133"
        );
    }

    #[test]
    fn test_values_are_not_escaped() {
        let pairs = [("V", "a&b <c> \"d\" e=f")];
        assert_eq!(render("{{V}}", &pairs), "a&b <c> \"d\" e=f");
        assert_eq!(render("{{{V}}}", &pairs), "a&b <c> \"d\" e=f");
        assert_eq!(render("{{&V}}", &pairs), "a&b <c> \"d\" e=f");
    }

    #[test]
    fn test_undefined_renders_empty_by_default() {
        assert_eq!(render("host: '{{MISSING}}'", &[]), "host: ''");
    }

    #[test]
    fn test_undefined_is_error_when_strict() {
        let template = Template::compile("host: {{MISSING}}").unwrap();
        let options = RenderOptions {
            undefined: UndefinedVariables::Error,
        };
        let err = template.render_with(&vars(&[]), &options).unwrap_err();
        assert!(
            matches!(err, TemplateError::UndefinedVariable { ref name } if name == "MISSING")
        );
    }

    #[test]
    fn test_strict_mode_ignores_undefined_sections() {
        let template = Template::compile("{{#DEBUG}}debug: true{{/DEBUG}}").unwrap();
        let options = RenderOptions {
            undefined: UndefinedVariables::Error,
        };
        assert_eq!(template.render_with(&vars(&[]), &options).unwrap(), "");
    }

    #[test]
    fn test_sections() {
        let source = "{{#DEBUG}}level: debug{{/DEBUG}}{{^DEBUG}}level: info{{/DEBUG}}";
        assert_eq!(render(source, &[("DEBUG", "1")]), "level: debug");
        assert_eq!(render(source, &[("DEBUG", "")]), "level: info");
        assert_eq!(render(source, &[]), "level: info");
    }

    #[test]
    fn test_substituted_value_is_not_reinterpreted() {
        // A value that looks like a tag is inserted verbatim.
        assert_eq!(render("{{A}}", &[("A", "{{B}}"), ("B", "nope")]), "{{B}}");
    }

    #[test]
    fn test_comments_produce_no_output() {
        assert_eq!(render("a: 1{{! dropped }}\n", &[]), "a: 1\n");
    }
}
