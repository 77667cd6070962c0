// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::{
    Positioned,
    types::{Field, FieldDefinition, SelectionSet},
};
use async_graphql_value::Name;
use tracing::instrument;

use crate::{
    config::ResolverConfig,
    error::SelectionError,
    schema::{Schema, underlying_type},
    value::{ArgumentValue, Arguments, DirectiveApplication, DirectiveList, with_defaults},
};

use super::{
    expander::{ExpandedField, FragmentExpander},
    field::ResolvedField,
    fragment_table::FragmentTable,
    merger::merge,
};

/// Builds resolved fields from a selection set: fragments are expanded, same-keyed occurrences
/// merged, and the sub-selection of every composite-typed field is built the same way.
pub struct SelectionTreeBuilder<'a> {
    schema: &'a Schema,
    fragments: &'a FragmentTable,
    config: &'a ResolverConfig,
}

impl<'a> SelectionTreeBuilder<'a> {
    pub fn new(
        schema: &'a Schema,
        fragments: &'a FragmentTable,
        config: &'a ResolverConfig,
    ) -> Self {
        Self {
            schema,
            fragments,
            config,
        }
    }

    /// Build the fields selected by `selection_set` on `type_name`.
    #[instrument(
        name = "SelectionTreeBuilder::build",
        skip_all,
        fields(type_name = %type_name)
    )]
    pub fn build(
        &self,
        selection_set: &'a Positioned<SelectionSet>,
        type_name: &str,
    ) -> Result<Vec<ResolvedField>, SelectionError> {
        self.build_at_depth(selection_set, type_name, 1, &[])
    }

    /// Build a single field selected on `parent_type` (with no enclosing type condition).
    ///
    /// `depth` is the field's depth counted from the operation root (root fields have depth 1), so
    /// the depth limit applies the same way as when the whole operation is built at once.
    pub fn build_field(
        &self,
        field: &'a Positioned<Field>,
        parent_type: &str,
        depth: usize,
    ) -> Result<ResolvedField, SelectionError> {
        self.resolve_occurrence(
            ExpandedField {
                field,
                parent_type: Name::new(parent_type),
                asserted_type: None,
                fragment_path: vec![],
            },
            depth,
        )
    }

    fn build_at_depth(
        &self,
        selection_set: &'a Positioned<SelectionSet>,
        type_name: &str,
        depth: usize,
        active_fragments: &[Name],
    ) -> Result<Vec<ResolvedField>, SelectionError> {
        let expander =
            FragmentExpander::new(self.schema, self.fragments, self.config.missing_fragment);

        let occurrences = expander
            .expand_within(selection_set, type_name, active_fragments)?
            .into_iter()
            .map(|expanded| self.resolve_occurrence(expanded, depth))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(merge(occurrences))
    }

    fn resolve_occurrence(
        &self,
        expanded: ExpandedField<'a>,
        depth: usize,
    ) -> Result<ResolvedField, SelectionError> {
        let ExpandedField {
            field,
            parent_type,
            asserted_type,
            fragment_path,
        } = expanded;

        if self.config.max_depth.is_some_and(|max_depth| depth > max_depth) {
            return Err(SelectionError::SelectionSetTooDeep(field.pos));
        }

        let field_definition = self
            .schema
            .field_definition(&parent_type, &field.node.name.node)
            .ok_or_else(|| {
                SelectionError::InvalidField(
                    field.node.name.node.to_string(),
                    parent_type.to_string(),
                    field.pos,
                )
            })?;

        let field_type_name = underlying_type(&field_definition.ty.node);

        let children = if self.schema.is_composite(field_type_name) {
            self.build_at_depth(
                &field.node.selection_set,
                field_type_name,
                depth + 1,
                &fragment_path,
            )?
        } else {
            vec![]
        };

        Ok(ResolvedField::new(
            field.node.name.node.clone(),
            field.node.alias.as_ref().map(|alias| alias.node.clone()),
            field_definition.ty.node.to_string(),
            asserted_type,
            self.arguments(field, field_definition),
            self.directives(field),
            self.definition_directives(field_definition),
            children,
        ))
    }

    fn arguments(&self, field: &Positioned<Field>, field_definition: &FieldDefinition) -> Arguments {
        let arguments = field
            .node
            .arguments
            .iter()
            .map(|(name, value)| (name.node.clone(), ArgumentValue::new(value.node.clone())))
            .collect();

        with_defaults(arguments, Some(&field_definition.arguments[..]))
    }

    fn directives(&self, field: &Positioned<Field>) -> DirectiveList {
        DirectiveList::new(
            field
                .node
                .directives
                .iter()
                .map(|directive| {
                    DirectiveApplication::from_query(
                        directive,
                        self.schema
                            .directive_definition(&directive.node.name.node),
                    )
                })
                .collect(),
        )
    }

    fn definition_directives(&self, field_definition: &FieldDefinition) -> DirectiveList {
        DirectiveList::new(
            field_definition
                .directives
                .iter()
                .map(|directive| {
                    DirectiveApplication::from_schema(
                        directive,
                        self.schema
                            .directive_definition(&directive.node.name.node),
                    )
                })
                .collect(),
        )
    }
}
