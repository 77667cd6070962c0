// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Inlining of fragment spreads and inline fragments.

use async_graphql_parser::{
    Pos, Positioned,
    types::{Field, Selection, SelectionSet},
};
use async_graphql_value::Name;
use tracing::{debug, warn};

use crate::{config::MissingFragmentPolicy, error::SelectionError, schema::Schema};

use super::fragment_table::FragmentTable;

/// A field occurrence reached while expanding a selection set.
#[derive(Debug, Clone)]
pub struct ExpandedField<'a> {
    pub field: &'a Positioned<Field>,
    /// The type the field is selected on (the type its definition is looked up in).
    pub parent_type: Name,
    /// The concrete type asserted by the enclosing type conditions, if any.
    pub asserted_type: Option<Name>,
    /// Fragments being expanded when this field was reached, outermost first.
    pub fragment_path: Vec<Name>,
}

#[derive(Debug, Clone)]
struct Scope {
    type_name: Name,
    asserted: Option<Name>,
}

pub struct FragmentExpander<'a> {
    schema: &'a Schema,
    fragments: &'a FragmentTable,
    missing_fragment: MissingFragmentPolicy,
}

impl<'a> FragmentExpander<'a> {
    pub fn new(
        schema: &'a Schema,
        fragments: &'a FragmentTable,
        missing_fragment: MissingFragmentPolicy,
    ) -> Self {
        Self {
            schema,
            fragments,
            missing_fragment,
        }
    }

    /// Flatten `selection_set`, selected on `type_name`, into its field occurrences in syntactic
    /// order.
    pub fn expand(
        &self,
        selection_set: &'a Positioned<SelectionSet>,
        type_name: &str,
    ) -> Result<Vec<ExpandedField<'a>>, SelectionError> {
        self.expand_within(selection_set, type_name, &[])
    }

    /// Like [`Self::expand`], with `active_fragments` already being expanded further up (for
    /// example, by the fragment that selected the field owning `selection_set`). Spreading any of
    /// them again is a no-op.
    pub fn expand_within(
        &self,
        selection_set: &'a Positioned<SelectionSet>,
        type_name: &str,
        active_fragments: &[Name],
    ) -> Result<Vec<ExpandedField<'a>>, SelectionError> {
        let scope = Scope {
            type_name: Name::new(type_name),
            asserted: None,
        };
        let mut active_fragments = active_fragments.to_vec();
        let mut expanded = vec![];

        self.expand_selection_set(selection_set, &scope, &mut active_fragments, &mut expanded)?;

        Ok(expanded)
    }

    fn expand_selection_set(
        &self,
        selection_set: &'a Positioned<SelectionSet>,
        scope: &Scope,
        active_fragments: &mut Vec<Name>,
        expanded: &mut Vec<ExpandedField<'a>>,
    ) -> Result<(), SelectionError> {
        for selection in &selection_set.node.items {
            match &selection.node {
                Selection::Field(field) => expanded.push(ExpandedField {
                    field,
                    parent_type: scope.type_name.clone(),
                    asserted_type: scope.asserted.clone(),
                    fragment_path: active_fragments.clone(),
                }),
                Selection::InlineFragment(inline_fragment) => {
                    let inline_fragment = &inline_fragment.node;
                    match &inline_fragment.type_condition {
                        Some(condition) => self.expand_conditional(
                            &inline_fragment.selection_set,
                            &condition.node.on.node,
                            scope,
                            active_fragments,
                            expanded,
                        )?,
                        None => self.expand_selection_set(
                            &inline_fragment.selection_set,
                            scope,
                            active_fragments,
                            expanded,
                        )?,
                    }
                }
                Selection::FragmentSpread(fragment_spread) => self.expand_spread(
                    &fragment_spread.node.fragment_name.node,
                    fragment_spread.pos,
                    scope,
                    active_fragments,
                    expanded,
                )?,
            }
        }

        Ok(())
    }

    fn expand_spread(
        &self,
        fragment_name: &Name,
        pos: Pos,
        scope: &Scope,
        active_fragments: &mut Vec<Name>,
        expanded: &mut Vec<ExpandedField<'a>>,
    ) -> Result<(), SelectionError> {
        if active_fragments.contains(fragment_name) {
            debug!(%fragment_name, "Skipping cyclic fragment spread");
            return Ok(());
        }

        let Some(fragment) = self.fragments.lookup(fragment_name) else {
            return match self.missing_fragment {
                MissingFragmentPolicy::Ignore => {
                    warn!(%fragment_name, "Ignoring spread of undefined fragment");
                    Ok(())
                }
                MissingFragmentPolicy::Error => Err(SelectionError::FragmentDefinitionNotFound(
                    fragment_name.to_string(),
                    pos,
                )),
            };
        };

        active_fragments.push(fragment_name.clone());
        let result = self.expand_conditional(
            &fragment.selection_set,
            &fragment.type_condition.node.on.node,
            scope,
            active_fragments,
            expanded,
        );
        active_fragments.pop();

        result
    }

    fn expand_conditional(
        &self,
        selection_set: &'a Positioned<SelectionSet>,
        condition: &Name,
        scope: &Scope,
        active_fragments: &mut Vec<Name>,
        expanded: &mut Vec<ExpandedField<'a>>,
    ) -> Result<(), SelectionError> {
        if condition == &scope.type_name {
            return self.expand_selection_set(selection_set, scope, active_fragments, expanded);
        }

        let condition_types = self.schema.possible_types(condition);

        if !self.schema.is_abstract(&scope.type_name) {
            // An object only matches a condition it is a possible type of
            if condition_types.contains(&scope.type_name) {
                self.expand_selection_set(selection_set, scope, active_fragments, expanded)?;
            }
            return Ok(());
        }

        let current_types = self.schema.possible_types(&scope.type_name);

        for concrete_type in condition_types
            .into_iter()
            .filter(|typ| current_types.contains(typ))
        {
            let scope = Scope {
                type_name: concrete_type.clone(),
                asserted: Some(concrete_type),
            };
            self.expand_selection_set(selection_set, &scope, active_fragments, expanded)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_graphql_parser::{parse_query, types::ExecutableDocument};
    use test_log::test;

    const SDL: &str = r#"
        type Query {
            search: [SearchResult!]!
            nodes: [Node!]!
            concert: Concert
        }

        interface Node {
            id: ID!
        }

        type Concert implements Node {
            id: ID!
            title: String
            venue: Venue
        }

        type Venue implements Node {
            id: ID!
            name: String
        }

        type Artist {
            name: String
        }

        union SearchResult = Venue | Artist | Concert
    "#;

    struct Fixture {
        schema: Schema,
        document: ExecutableDocument,
        fragments: FragmentTable,
    }

    impl Fixture {
        fn new(query: &str) -> Self {
            let document = parse_query(query).unwrap();
            let fragments = FragmentTable::new(document.fragments.clone());
            Self {
                schema: Schema::parse(SDL).unwrap(),
                document,
                fragments,
            }
        }

        /// Expand the selection set of the first root field, returning `name@asserted` entries
        fn expand(
            &self,
            field_type: &str,
            policy: MissingFragmentPolicy,
        ) -> Result<Vec<String>, SelectionError> {
            let expander = FragmentExpander::new(&self.schema, &self.fragments, policy);

            let (_, operation) = self.document.operations.iter().next().unwrap();
            let Selection::Field(root) = &operation.node.selection_set.node.items[0].node else {
                panic!("Expected a field at the root");
            };

            let expanded = expander.expand(&root.node.selection_set, field_type)?;

            Ok(expanded
                .into_iter()
                .map(|e| match e.asserted_type {
                    Some(asserted) => format!("{}@{asserted}", e.field.node.response_key().node),
                    None => e.field.node.response_key().node.to_string(),
                })
                .collect())
        }
    }

    #[test]
    fn plain_fields_keep_order() {
        let fixture = Fixture::new("{ concert { id title id venue { name } } }");

        let expanded = fixture
            .expand("Concert", MissingFragmentPolicy::Ignore)
            .unwrap();

        assert_eq!(expanded, ["id", "title", "id", "venue"]);
    }

    #[test]
    fn union_members_and_interface_conditions() {
        let fixture = Fixture::new(
            r#"
            {
                search {
                    __typename
                    ... on Node { id }
                    ... on Concert { title }
                    ...VenueInfo
                }
            }
            fragment VenueInfo on Venue { name }
            "#,
        );

        let expanded = fixture
            .expand("SearchResult", MissingFragmentPolicy::Ignore)
            .unwrap();

        assert_eq!(
            expanded,
            [
                "__typename",
                "id@Concert",
                "id@Venue",
                "title@Concert",
                "name@Venue"
            ]
        );
    }

    #[test]
    fn transparent_conditions() {
        let fixture = Fixture::new(
            r#"
            {
                concert {
                    ... on Concert { title }
                    ... on Node { id }
                    ... on SearchResult { ... on Venue { name } }
                    ... { venue { id } }
                }
            }
            "#,
        );

        let expanded = fixture
            .expand("Concert", MissingFragmentPolicy::Ignore)
            .unwrap();

        assert_eq!(expanded, ["title", "id", "venue"]);
    }

    #[test]
    fn nested_conditions_use_innermost_type() {
        let fixture = Fixture::new(
            r#"
            {
                nodes {
                    ... on SearchResult {
                        ... on Concert { title }
                        ... on Node { id }
                    }
                }
            }
            "#,
        );

        let expanded = fixture
            .expand("Node", MissingFragmentPolicy::Ignore)
            .unwrap();

        assert_eq!(expanded, ["id@Venue", "title@Concert", "id@Concert"]);
    }

    #[test]
    fn direct_cycle_is_a_no_op() {
        let fixture = Fixture::new(
            r#"
            { concert { ...Info } }
            fragment Info on Concert { id ...Info title }
            "#,
        );

        let expanded = fixture
            .expand("Concert", MissingFragmentPolicy::Ignore)
            .unwrap();

        assert_eq!(expanded, ["id", "title"]);
    }

    #[test]
    fn indirect_cycle_is_a_no_op() {
        let fixture = Fixture::new(
            r#"
            { concert { ...First } }
            fragment First on Concert { id ...Second }
            fragment Second on Concert { title ...First }
            "#,
        );

        let expanded = fixture
            .expand("Concert", MissingFragmentPolicy::Error)
            .unwrap();

        assert_eq!(expanded, ["id", "title"]);
    }

    #[test]
    fn repeated_spread_is_not_a_cycle() {
        let fixture = Fixture::new(
            r#"
            { concert { ...Info ...Info } }
            fragment Info on Concert { id }
            "#,
        );

        let expanded = fixture
            .expand("Concert", MissingFragmentPolicy::Ignore)
            .unwrap();

        assert_eq!(expanded, ["id", "id"]);
    }

    #[test]
    fn missing_fragment_policies() {
        let fixture = Fixture::new("{ concert { id ...Missing title } }");

        let expanded = fixture
            .expand("Concert", MissingFragmentPolicy::Ignore)
            .unwrap();
        assert_eq!(expanded, ["id", "title"]);

        let error = fixture
            .expand("Concert", MissingFragmentPolicy::Error)
            .unwrap_err();
        assert!(matches!(
            error,
            SelectionError::FragmentDefinitionNotFound(name, _) if name == "Missing"
        ));
    }
}
