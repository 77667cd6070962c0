// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_value::Name;
use serde::Serialize;

use crate::value::{ArgumentValue, Arguments, DirectiveApplication, DirectiveList};

use super::path::FieldIdentifier;

/// A field of the query after fragments have been inlined and same-keyed fields merged.
///
/// Resolvers inspect it to decide what to fetch. It is never modified once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedField {
    name: Name,
    /// Response key: the alias if one was given, otherwise the name.
    alias: Name,
    /// Declared type of the field, such as `[Concert!]!`.
    type_name: String,
    /// The concrete type this field was selected under, when its parent is a union or interface
    /// and the field sits inside a type condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    asserted_type_name: Option<Name>,
    #[serde(skip_serializing_if = "Arguments::is_empty")]
    arguments: Arguments,
    #[serde(skip_serializing_if = "DirectiveList::is_empty")]
    directives: DirectiveList,
    #[serde(skip_serializing_if = "DirectiveList::is_empty")]
    definition_directives: DirectiveList,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<ResolvedField>,
}

impl ResolvedField {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: Name,
        alias: Option<Name>,
        type_name: String,
        asserted_type_name: Option<Name>,
        arguments: Arguments,
        directives: DirectiveList,
        definition_directives: DirectiveList,
        children: Vec<ResolvedField>,
    ) -> Self {
        Self {
            alias: alias.unwrap_or_else(|| name.clone()),
            name,
            type_name,
            asserted_type_name,
            arguments,
            directives,
            definition_directives,
            children,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn alias(&self) -> &Name {
        &self.alias
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn asserted_type_name(&self) -> Option<&Name> {
        self.asserted_type_name.as_ref()
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentValue> {
        self.arguments.get(name)
    }

    /// Directives applied to this field in the query, one entry per application. Directives on the
    /// field's definition are in [`Self::definition_directives`]; [`Self::directive`] searches both.
    pub fn directives(&self) -> &DirectiveList {
        &self.directives
    }

    /// Directives applied to the field's definition in the schema.
    pub fn definition_directives(&self) -> &DirectiveList {
        &self.definition_directives
    }

    /// Looks up a directive applied in the query, then one applied to the field's definition.
    pub fn directive(&self, name: &str) -> Option<&DirectiveApplication> {
        self.directives
            .get(name)
            .or_else(|| self.definition_directives.get(name))
    }

    pub fn children(&self) -> &[ResolvedField] {
        &self.children
    }

    pub fn child_names(&self) -> Vec<&Name> {
        self.children.iter().map(|child| &child.name).collect()
    }

    /// The first child matching `identifier`.
    ///
    /// # Panics
    /// If the identifier has an empty name.
    pub fn lookup(&self, identifier: &FieldIdentifier) -> Option<&ResolvedField> {
        assert!(
            !identifier.name().is_empty(),
            "field identifier must have a non-empty name"
        );

        self.children.iter().find(|child| identifier.matches(child))
    }

    /// Descend through the children following `path`. An empty path returns `self`.
    pub fn lookup_path<'p>(
        &self,
        path: impl IntoIterator<Item = &'p FieldIdentifier>,
    ) -> Option<&ResolvedField> {
        path.into_iter()
            .try_fold(self, |field, identifier| field.lookup(identifier))
    }

    pub(super) fn merge_key(&self) -> (Name, Option<Name>) {
        (self.alias.clone(), self.asserted_type_name.clone())
    }

    /// Fold another occurrence of the same response key into this one. Identity and arguments
    /// stay those of the first occurrence.
    pub(super) fn absorb(&mut self, other: ResolvedField) {
        self.directives.extend(other.directives);
        self.children.extend(other.children);
    }

    pub(super) fn map_children(
        self,
        f: impl FnOnce(Vec<ResolvedField>) -> Vec<ResolvedField>,
    ) -> Self {
        Self {
            children: f(self.children),
            ..self
        }
    }
}

/// Find the field at `path` among sibling fields (such as the root fields of an operation).
pub fn lookup_in<'f, 'p>(
    fields: &'f [ResolvedField],
    path: impl IntoIterator<Item = &'p FieldIdentifier>,
) -> Option<&'f ResolvedField> {
    let mut path = path.into_iter();
    let first = path.next()?;

    assert!(
        !first.name().is_empty(),
        "field identifier must have a non-empty name"
    );

    fields
        .iter()
        .find(|field| first.matches(field))
        .and_then(|field| field.lookup_path(path))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use crate::selection::path::FieldPath;

    pub(crate) fn leaf(name: &str, alias: Option<&str>) -> ResolvedField {
        node(name, alias, vec![])
    }

    pub(crate) fn node(
        name: &str,
        alias: Option<&str>,
        children: Vec<ResolvedField>,
    ) -> ResolvedField {
        ResolvedField::new(
            Name::new(name),
            alias.map(Name::new),
            "String".to_string(),
            None,
            Arguments::new(),
            DirectiveList::default(),
            DirectiveList::default(),
            children,
        )
    }

    fn sample_tree() -> ResolvedField {
        node(
            "test",
            None,
            vec![
                leaf("a", None),
                leaf("a", Some("otherA")),
                node(
                    "b",
                    None,
                    vec![node("c", Some("aliasedC"), vec![leaf("value", None)])],
                ),
            ],
        )
    }

    #[test]
    fn alias_defaults_to_name() {
        let field = leaf("title", None);
        assert_eq!(field.alias().as_str(), "title");

        let field = leaf("title", Some("headline"));
        assert_eq!(field.name().as_str(), "title");
        assert_eq!(field.alias().as_str(), "headline");
    }

    #[test]
    fn lookup_any_alias_returns_first_match() {
        let tree = sample_tree();

        let a = tree.lookup(&FieldIdentifier::new("a")).unwrap();
        assert_eq!(a.alias().as_str(), "a");
    }

    #[test]
    fn lookup_exact_alias() {
        let tree = sample_tree();

        let other = tree
            .lookup(&FieldIdentifier::aliased("a", "otherA"))
            .unwrap();
        assert_eq!(other.alias().as_str(), "otherA");

        assert!(tree.lookup(&FieldIdentifier::aliased("a", "missing")).is_none());
        assert!(tree.lookup(&FieldIdentifier::aliased("otherA", "otherA")).is_none());
    }

    #[test]
    fn lookup_nested_path() {
        let tree = sample_tree();

        let path: FieldPath = "b.aliasedC:c.value".parse().unwrap();
        let value = tree.lookup_path(&path).unwrap();
        assert_eq!(value.name().as_str(), "value");
        assert!(value.children().is_empty());

        assert_eq!(tree.lookup_path(&FieldPath::default()), Some(&tree));
    }

    #[test]
    fn unaliased_component_matches_aliased_child() {
        let tree = sample_tree();

        let path: FieldPath = "b.c.value".parse().unwrap();
        assert_eq!(
            tree.lookup_path(&path).map(|f| f.name().as_str()),
            Some("value")
        );
    }

    #[test]
    fn lookup_miss_short_circuits() {
        let tree = sample_tree();

        let path: FieldPath = "b.c:c.value".parse().unwrap();
        assert!(tree.lookup_path(&path).is_none());

        let path: FieldPath = "b.x.value".parse().unwrap();
        assert!(tree.lookup_path(&path).is_none());

        let path: FieldPath = "unknown.value".parse().unwrap();
        assert!(tree.lookup_path(&path).is_none());
    }

    #[test]
    #[should_panic(expected = "non-empty name")]
    fn lookup_empty_name_panics() {
        sample_tree().lookup(&FieldIdentifier::new(""));
    }

    #[test]
    fn lookup_among_roots() {
        let roots = vec![sample_tree(), leaf("other", None)];

        let path: FieldPath = "test.b".parse().unwrap();
        assert_eq!(
            lookup_in(&roots, &path).map(|f| f.name().as_str()),
            Some("b")
        );

        let path: FieldPath = "other".parse().unwrap();
        assert!(lookup_in(&roots, &path).is_some());
        assert!(lookup_in(&roots, &FieldPath::default()).is_none());
    }

    #[test]
    fn serialized_form() {
        let b = sample_tree().lookup(&FieldIdentifier::new("b")).cloned().unwrap();

        insta::assert_snapshot!(serde_json::to_string_pretty(&b).unwrap(), @r###"
        {
          "name": "b",
          "alias": "b",
          "type_name": "String",
          "children": [
            {
              "name": "c",
              "alias": "aliasedC",
              "type_name": "String",
              "children": [
                {
                  "name": "value",
                  "alias": "value",
                  "type_name": "String"
                }
              ]
            }
          ]
        }
        "###);
    }
}
