//! This module is used to canonicalize YAML documents.
//!
//! Formatting never touches a source with syntax errors. Every document
//! of a stream goes through the indent pass and then through the configured
//! passes in order, each pass seeing the output of the previous one.

mod edits;
mod indent;
mod lists;
mod options;
mod order;
mod quotes;

pub use lists::{ListOrder, ListSort, SortPredicate};
pub use options::*;
pub use order::PriorityTable;

use crate::{
    parser,
    syntax::{SyntaxKind::*, SyntaxNode},
    Error,
};
use edits::{rebuild, Edits};
use rowan::{GreenNode, NodeOrToken};

/// A traversal over one document.
#[derive(Debug, Clone)]
pub enum Pass {
    /// Canonical quote usage of string scalars.
    CanonicalQuotes,
    /// Orders mapping entries by the priority of their paths.
    CanonicalOrder(PriorityTable),
    /// Sorts the sequences that may be sorted.
    SortLists(ListSort),
}

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Pass::CanonicalQuotes => "canonical_quotes",
            Pass::CanonicalOrder(_) => "canonical_order",
            Pass::SortLists(_) => "sort_lists",
        }
    }

    fn edits(&self, root: &SyntaxNode) -> Edits {
        match self {
            Pass::CanonicalQuotes => quotes::canonical_quotes(root),
            Pass::CanonicalOrder(table) => order::canonical_order(root, table),
            Pass::SortLists(sort) => lists::sort_lists(root, sort),
        }
    }
}

/// Parses then formats a YAML stream.
///
/// Sources with syntax errors are refused with [`Error::InvalidSyntax`].
pub fn format(src: &str, passes: &[Pass], options: &Options) -> Result<String, Error> {
    let p = parser::parse(src);
    if !p.errors.is_empty() {
        return Err(Error::InvalidSyntax { errors: p.errors });
    }
    format_syntax(p.into_syntax(), passes, options)
}

/// Formats a parsed YAML stream.
pub fn format_syntax(
    stream: SyntaxNode,
    passes: &[Pass],
    options: &Options,
) -> Result<String, Error> {
    let mut formatted = String::new();
    for (index, element) in stream.children_with_tokens().enumerate() {
        match element {
            NodeOrToken::Node(doc) if doc.kind() == DOCUMENT => {
                let _span = tracing::debug_span!("document", index).entered();
                formatted += &format_document(&doc, passes, options)?;
            }
            element => formatted += &element.to_string(),
        }
    }
    Ok(formatted)
}

fn format_document(doc: &SyntaxNode, passes: &[Pass], options: &Options) -> Result<String, Error> {
    let mut root = SyntaxNode::new_root(rebuild(doc, &Edits::default()));

    let edits = indent::normalize_indent(&root, options);
    root = apply("indent", &root, edits)?;
    for pass in passes {
        let edits = pass.edits(&root);
        root = apply(pass.name(), &root, edits)?;
    }
    Ok(root.to_string())
}

/// Applies the edits and reparses the result so the next pass
/// sees the tree the parser would build for it.
fn apply(pass: &str, root: &SyntaxNode, edits: Edits) -> Result<SyntaxNode, Error> {
    if edits.is_empty() {
        tracing::trace!(pass, "no changes");
        return Ok(root.clone());
    }
    tracing::debug!(pass, changes = edits.len(), "document changed");
    let text = SyntaxNode::new_root(rebuild(root, &edits)).to_string();
    reparse(&text).map(SyntaxNode::new_root)
}

fn reparse(text: &str) -> Result<GreenNode, Error> {
    let p = parser::parse(text);
    if !p.errors.is_empty() {
        return Err(Error::Unstable { errors: p.errors });
    }
    let stream = p.into_syntax();
    let mut documents = stream.children().filter(|n| n.kind() == DOCUMENT);
    match (documents.next(), documents.next()) {
        (Some(doc), None) => Ok(rebuild(&doc, &Edits::default())),
        _ => Err(Error::Unstable { errors: vec![] }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::Conventions;
    use pretty_assertions::assert_eq;

    fn fleet(class: &str, src: &str) -> String {
        let conventions = Conventions::fleet();
        let passes = conventions.passes(class).unwrap();
        let out = format(src, passes, &Options::default()).unwrap();
        let again = format(&out, passes, &Options::default()).unwrap();
        assert_eq!(again, out, "formatting is not idempotent");
        out
    }

    #[test]
    fn test_refuses_invalid_syntax() {
        let err = format("a: 'open\n", &[Pass::CanonicalQuotes], &Options::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidSyntax { errors } if errors.len() == 1));
    }

    #[test]
    fn test_without_passes_only_indent() {
        let src = "# comment\nkey: \"value\"\nlist:\n- a\n";
        let out = format(src, &[], &Options::default()).unwrap();
        assert_eq!(out, "# comment\nkey: \"value\"\nlist:\n  - a\n");
    }

    #[test]
    fn test_multiple_documents() {
        let src = "b: \"1\"\na: \"x\"\n---\n# second\nd: \"y\"\nc: 'z'\n...\n";
        let passes = [
            Pass::CanonicalQuotes,
            Pass::CanonicalOrder(PriorityTable::default()),
        ];
        let out = format(src, &passes, &Options::default()).unwrap();
        assert_eq!(out, "a: x\nb: '1'\n---\n# second\nc: z\nd: y\n...\n");
    }

    #[test]
    fn test_manifest() {
        let src = r#"format_version: 1.0.0
owner:
  github: elastic/integrations
name: "test"
version: "0.1.0"
policy_templates:
  - title: "Test logs"
    name: "logs"
    inputs:
      - type: logfile
        title: "Collect logs"
        description: "Collecting logs"
    description: "Collect logs from the service"
title: "Test"
description: "Test integration"
"#;
        let expected = r#"name: test
title: Test
version: 0.1.0
description: Test integration
format_version: 1.0.0
policy_templates:
  - name: logs
    title: Test logs
    description: Collect logs from the service
    inputs:
      - title: Collect logs
        description: Collecting logs
        type: logfile
owner:
  github: elastic/integrations
"#;
        assert_eq!(fleet("manifest.yml", src), expected);
    }

    #[test]
    fn test_changelog() {
        let src = r#"# newer versions go on top
- changes:
    - type: enhancement
      link: https://github.com/elastic/integrations/pull/2
      description: "Second change"
  version: "0.2.0"
- version: "0.1.0"
  changes:
    - link: https://github.com/elastic/integrations/pull/1
      description: "Initial draft of the package"
      type: enhancement
"#;
        let expected = r#"# newer versions go on top
- version: 0.2.0
  changes:
    - description: Second change
      type: enhancement
      link: https://github.com/elastic/integrations/pull/2
- version: 0.1.0
  changes:
    - description: Initial draft of the package
      type: enhancement
      link: https://github.com/elastic/integrations/pull/1
"#;
        assert_eq!(fleet("changelog.yml", src), expected);
    }

    #[test]
    fn test_pipeline_keeps_processor_order() {
        let src = r#"description: "Pipeline for logs"
processors:
  - set:
      value: "{{_ingest.timestamp}}"
      field: event.ingested

  - rename:
      ignore_missing: true
      target_field: "message"
      field: log
on_failure:
  - set:
      field: error.message
      value: "{{ _ingest.on_failure_message }}"
"#;
        let expected = r#"description: Pipeline for logs
processors:
  - set:
      field: event.ingested
      value: '{{_ingest.timestamp}}'

  - rename:
      field: log
      ignore_missing: true
      target_field: message
on_failure:
  - set:
      field: error.message
      value: '{{ _ingest.on_failure_message }}'
"#;
        assert_eq!(
            fleet("data_stream/*/elasticsearch/ingest_pipeline/*.yml", src),
            expected
        );
    }

    #[test]
    fn test_fields() {
        let src = r#"- name: source
  type: group
  fields:
    - name: port
      type: long
    - name: address
      description: "Source address"
      type: keyword
- name: "@timestamp"
  type: date
  description: Event timestamp.
- name: data_stream.type
  type: constant_keyword
"#;
        let expected = r#"- name: '@timestamp'
  type: date
  description: Event timestamp.
- name: data_stream.type
  type: constant_keyword
- name: source
  type: group
  fields:
    - name: address
      type: keyword
      description: Source address
    - name: port
      type: long
"#;
        assert_eq!(fleet("data_stream/*/fields/*.yml", src), expected);
    }

    #[test]
    fn test_fields_not_sorted_outside_groups() {
        let src = "- name: event\n  type: object\n  fields:\n    - name: b\n    - name: a\n";
        assert_eq!(fleet("data_stream/*/fields/*.yml", src), src);
    }

    #[test]
    fn test_flow_collections_are_indented() {
        let src = "e:\n  s: [\n  \"key\",\n  \"value\"\n  ]\n";
        let out = format(src, &[Pass::CanonicalQuotes], &Options::default()).unwrap();
        assert_eq!(out, "e:\n  s: [\n    key,\n    value\n    ]\n");
    }
}
