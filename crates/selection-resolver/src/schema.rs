// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Read-only view of the type system that selections are resolved against.
//!
//! The schema is assumed to be valid; this is only an index over the parsed SDL.

use std::collections::HashMap;

use async_graphql_parser::{
    Positioned,
    types::{
        BaseType, DirectiveDefinition, FieldDefinition, OperationType, ServiceDocument, Type,
        TypeDefinition, TypeKind, TypeSystemDefinition,
    },
};
use async_graphql_value::Name;

use crate::error::SelectionError;

pub const QUERY_ROOT_TYPENAME: &str = "Query";
pub const MUTATION_ROOT_TYPENAME: &str = "Mutation";
pub const SUBSCRIPTION_ROOT_TYPENAME: &str = "Subscription";

pub const TYPENAME_FIELD: &str = "__typename";

#[derive(Debug)]
pub struct Schema {
    type_definitions: Vec<TypeDefinition>,
    type_index: HashMap<Name, usize>,
    directive_definitions: HashMap<Name, DirectiveDefinition>,
    /// Object types implementing each interface, in declaration order.
    implementations: HashMap<Name, Vec<Name>>,
    query_type: Name,
    mutation_type: Name,
    subscription_type: Name,
    typename_field_definition: FieldDefinition,
}

impl Schema {
    pub fn parse(sdl: &str) -> Result<Schema, SelectionError> {
        let document = async_graphql_parser::parse_schema(sdl).map_err(|error| {
            let pos = error.positions().next().unwrap_or_default();
            SelectionError::SchemaParsingFailed(error.to_string(), pos)
        })?;

        Ok(Schema::new(document))
    }

    pub fn new(document: ServiceDocument) -> Schema {
        let mut type_definitions = vec![];
        let mut directive_definitions = HashMap::new();
        let mut query_type = Name::new(QUERY_ROOT_TYPENAME);
        let mut mutation_type = Name::new(MUTATION_ROOT_TYPENAME);
        let mut subscription_type = Name::new(SUBSCRIPTION_ROOT_TYPENAME);

        for definition in document.definitions {
            match definition {
                TypeSystemDefinition::Schema(schema) => {
                    let schema = schema.node;
                    if let Some(query) = schema.query {
                        query_type = query.node;
                    }
                    if let Some(mutation) = schema.mutation {
                        mutation_type = mutation.node;
                    }
                    if let Some(subscription) = schema.subscription {
                        subscription_type = subscription.node;
                    }
                }
                TypeSystemDefinition::Type(type_definition) => {
                    type_definitions.push(type_definition.node)
                }
                TypeSystemDefinition::Directive(directive) => {
                    directive_definitions.insert(directive.node.name.node.clone(), directive.node);
                }
            }
        }

        let type_index = type_definitions
            .iter()
            .enumerate()
            .map(|(index, td)| (td.name.node.clone(), index))
            .collect();

        let mut implementations: HashMap<Name, Vec<Name>> = HashMap::new();
        for td in &type_definitions {
            if let TypeKind::Object(object_type) = &td.kind {
                for interface in &object_type.implements {
                    implementations
                        .entry(interface.node.clone())
                        .or_default()
                        .push(td.name.node.clone());
                }
            }
        }

        Schema {
            type_definitions,
            type_index,
            directive_definitions,
            implementations,
            query_type,
            mutation_type,
            subscription_type,
            typename_field_definition: typename_field_definition(),
        }
    }

    pub fn type_definition(&self, type_name: &str) -> Option<&TypeDefinition> {
        self.type_index
            .get(type_name)
            .map(|index| &self.type_definitions[*index])
    }

    pub fn directive_definition(&self, directive_name: &str) -> Option<&DirectiveDefinition> {
        self.directive_definitions.get(directive_name)
    }

    /// Definition of a field of an object or interface type. `__typename` is defined on every
    /// composite type.
    pub fn field_definition(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        if field_name == TYPENAME_FIELD {
            return self
                .is_composite(type_name)
                .then_some(&self.typename_field_definition);
        }

        let fields = match &self.type_definition(type_name)?.kind {
            TypeKind::Object(object_type) => &object_type.fields,
            TypeKind::Interface(interface_type) => &interface_type.fields,
            _ => return None,
        };

        fields
            .iter()
            .find(|field| field.node.name.node.as_str() == field_name)
            .map(|field| &field.node)
    }

    /// The object types a value of `type_name` may have at runtime.
    pub fn possible_types(&self, type_name: &str) -> Vec<Name> {
        match self.type_definition(type_name).map(|td| &td.kind) {
            Some(TypeKind::Object(_)) => vec![Name::new(type_name)],
            Some(TypeKind::Union(union_type)) => union_type
                .members
                .iter()
                .map(|member| member.node.clone())
                .collect(),
            Some(TypeKind::Interface(_)) => self
                .implementations
                .get(type_name)
                .cloned()
                .unwrap_or_default(),
            _ => vec![],
        }
    }

    pub fn is_abstract(&self, type_name: &str) -> bool {
        matches!(
            self.type_definition(type_name).map(|td| &td.kind),
            Some(TypeKind::Interface(_) | TypeKind::Union(_))
        )
    }

    pub fn is_composite(&self, type_name: &str) -> bool {
        matches!(
            self.type_definition(type_name).map(|td| &td.kind),
            Some(TypeKind::Object(_) | TypeKind::Interface(_) | TypeKind::Union(_))
        )
    }

    pub fn root_type_name(&self, operation_type: OperationType) -> &Name {
        match operation_type {
            OperationType::Query => &self.query_type,
            OperationType::Mutation => &self.mutation_type,
            OperationType::Subscription => &self.subscription_type,
        }
    }
}

pub fn underlying_type(typ: &Type) -> &Name {
    match &typ.base {
        BaseType::Named(name) => name,
        BaseType::List(typ) => underlying_type(typ),
    }
}

fn typename_field_definition() -> FieldDefinition {
    FieldDefinition {
        description: None,
        name: Positioned::new(Name::new(TYPENAME_FIELD), Default::default()),
        arguments: vec![],
        ty: Positioned::new(
            Type {
                base: BaseType::Named(Name::new("String")),
                nullable: false,
            },
            Default::default(),
        ),
        directives: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDL: &str = r#"
        schema {
            query: RootQuery
        }

        type RootQuery {
            search: [SearchResult!]!
            node: Node
        }

        interface Node {
            id: ID!
        }

        type Concert implements Node {
            id: ID!
            title: String
        }

        type Venue implements Node {
            id: ID!
            name: String
        }

        type Artist {
            name: String
        }

        union SearchResult = Venue | Artist | Concert

        enum Genre { ROCK JAZZ }

        directive @cached(ttl: Int = 60) on FIELD_DEFINITION
    "#;

    #[test]
    fn possible_types() {
        let schema = Schema::parse(SDL).unwrap();

        let names = |type_name| {
            schema
                .possible_types(type_name)
                .into_iter()
                .map(|name| name.to_string())
                .collect::<Vec<_>>()
        };

        assert_eq!(names("SearchResult"), ["Venue", "Artist", "Concert"]);
        assert_eq!(names("Node"), ["Concert", "Venue"]);
        assert_eq!(names("Artist"), ["Artist"]);
        assert!(names("Genre").is_empty());
        assert!(names("Unknown").is_empty());
    }

    #[test]
    fn type_kinds() {
        let schema = Schema::parse(SDL).unwrap();

        assert!(schema.is_abstract("Node"));
        assert!(schema.is_abstract("SearchResult"));
        assert!(!schema.is_abstract("Concert"));
        assert!(schema.is_composite("Concert"));
        assert!(!schema.is_composite("Genre"));
        assert!(!schema.is_composite("String"));
    }

    #[test]
    fn field_definitions() {
        let schema = Schema::parse(SDL).unwrap();

        let search = schema.field_definition("RootQuery", "search").unwrap();
        assert_eq!(search.ty.node.to_string(), "[SearchResult!]!");

        assert!(schema.field_definition("Node", "id").is_some());
        assert!(schema.field_definition("Concert", "name").is_none());
        assert!(schema.field_definition("SearchResult", "id").is_none());

        let typename = schema
            .field_definition("SearchResult", TYPENAME_FIELD)
            .unwrap();
        assert_eq!(typename.ty.node.to_string(), "String!");
        assert!(schema.field_definition("Genre", TYPENAME_FIELD).is_none());
    }

    #[test]
    fn root_types_and_directives() {
        let schema = Schema::parse(SDL).unwrap();

        assert_eq!(
            schema.root_type_name(OperationType::Query).as_str(),
            "RootQuery"
        );
        assert_eq!(
            schema.root_type_name(OperationType::Mutation).as_str(),
            MUTATION_ROOT_TYPENAME
        );
        assert!(schema.directive_definition("cached").is_some());
        assert!(schema.directive_definition("skip").is_none());
    }

    #[test]
    fn invalid_sdl() {
        assert!(matches!(
            Schema::parse("type {"),
            Err(SelectionError::SchemaParsingFailed(..))
        ));
    }
}
