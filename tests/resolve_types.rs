use pretty_assertions::assert_eq;
use raml_types::{parse_raml_types, DefinitionChoice, Node, PropertyValue, TypeKind};

const API: &str = r#"
#%RAML 1.0
title: Library API
types:
  Person:
    type: object
    properties:
      name: string
      age?: integer
      address:
        type: object
        properties:
          street: string
          geo:
            properties:
              lat: number
              lng: number
      phones:
        type: array
        items:
          properties:
            number: string
            kind?: string
  Employee:
    type: Person
  Manager:
    type: [Employee, Person]
  Team: Person[]
  Grid: Person[][]
  Pet: Cat | Dog
  Cat:
    properties:
      meows: boolean
  Dog:
    properties:
      barks: boolean
  Book:
    type: |
      {
        "type": "object",
        "required": ["isbn"],
        "properties": {
          "isbn": { "type": "string" },
          "pages": { "type": "integer", "minimum": 1 }
        }
      }
traits:
  paged:
    queryParameters:
      page: integer
  secured:
    headers:
      Authorization: string
"#;

#[test]
fn test_resolve_document() {
    let model = parse_raml_types(API).unwrap();
    let types = &model.types;

    let names: Vec<&str> = types.iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec![
            "Person",
            "Employee",
            "Manager",
            "Team",
            "Grid",
            "Pet",
            "Cat",
            "Dog",
            "Book",
            "PersonAddress",
            "PersonAddressGeo",
            "PersonPhonesItem",
        ]
    );

    let person = types.lookup("Person").unwrap();
    assert_eq!(person.kind(), &TypeKind::Object);
    assert_eq!(
        person.properties.keys().collect::<Vec<_>>(),
        vec!["name", "age", "address", "phones"]
    );
    assert!(!person.property("age").unwrap().required);
    assert_eq!(person.property("address").unwrap().type_expr, "PersonAddress");

    let phones = person.property("phones").unwrap();
    assert_eq!(phones.type_expr, "array");
    assert_eq!(
        phones.facets.get("items").and_then(|items| items.get("type")),
        Some(&Node::from("PersonPhonesItem"))
    );

    let address = types.lookup("PersonAddress").unwrap();
    assert_eq!(address.type_string(), "object");
    assert_eq!(address.property("geo").unwrap().type_expr, "PersonAddressGeo");
    assert_eq!(types.lookup("PersonAddressGeo").unwrap().properties.len(), 2);

    let item = types.lookup("PersonPhonesItem").unwrap();
    assert!(!item.property("kind").unwrap().required);
}

#[test]
fn test_classification_of_declared_types() {
    let model = parse_raml_types(API).unwrap();
    let types = &model.types;

    let employee = types.lookup("Employee").unwrap();
    assert_eq!(employee.parents(), vec!["Person"]);
    assert!(employee.is_alias());

    let manager = types.lookup("Manager").unwrap();
    assert_eq!(manager.parents(), vec!["Employee", "Person"]);
    assert!(!manager.is_alias());

    assert_eq!(
        types.lookup("Team").unwrap().array_type().as_deref(),
        Some("Person")
    );
    assert_eq!(
        types.lookup("Grid").unwrap().bidimensional_array_type(),
        Some("Person")
    );
    assert_eq!(
        types.lookup("Pet").unwrap().union(),
        Some(&["Cat".to_string(), "Dog".to_string()][..])
    );
    assert!(types.lookup("Cat").unwrap().parents().is_empty());
}

#[test]
fn test_embedded_schema_is_absorbed() {
    let model = parse_raml_types(API).unwrap();
    let book = model.types.lookup("Book").unwrap();

    assert_eq!(book.type_string(), "object");
    let isbn = book.property("isbn").unwrap();
    assert_eq!(isbn.type_expr, "string");
    assert!(isbn.required);

    let pages = book.property("pages").unwrap();
    assert_eq!(pages.type_expr, "integer");
    assert!(!pages.required);
    assert_eq!(
        pages.facets.get("minimum").and_then(Node::as_f64),
        Some(1.0)
    );
}

#[test]
fn test_traits_are_named() {
    let model = parse_raml_types(API).unwrap();
    assert_eq!(
        model.traits.keys().collect::<Vec<_>>(),
        vec!["paged", "secured"]
    );
    assert_eq!(model.traits["secured"].name, "secured");
    assert!(model.traits["paged"].query_parameters.contains_key("page"));
}

#[test]
fn test_method_trait_choices() {
    let node: Node = serde_yaml::from_str("[secured, {paged: {size: 25}}]").unwrap();
    let choices = raml_types::parse_definition_choices(&node).unwrap();
    assert_eq!(choices[0], DefinitionChoice::Bare("secured".into()));
    assert_eq!(
        choices[1].parameters().and_then(|p| p.get("size")),
        Some(&Node::from(25))
    );
}

#[test]
fn test_optional_property_with_bad_value_aborts_resolution() {
    let yaml = r#"
types:
  Person:
    properties:
      tags?: [a, b]
"#;
    let err = parse_raml_types(yaml).unwrap_err();
    assert!(err.is_configuration_defect());
}

#[test]
fn test_rewritten_property_values() {
    let model = parse_raml_types(API).unwrap();
    let person = model.types.lookup("Person").unwrap();
    let PropertyValue::Inline(age) = &person.properties["age"] else {
        panic!("Expected inline property")
    };
    assert_eq!(age.get("type"), Some(&Node::from("integer")));
    assert_eq!(age.get("required"), Some(&Node::Bool(false)));
}

#[test]
fn test_loose_embedded_schemas_resolve() {
    let yaml = r##"
types:
  Loose:
    type: |
      {
        "properties": {
          "x": { "type": "integer" },
          "note": { "description": "free" },
          "any": { "type": "any" },
          "owner": { "$ref": "#/definitions/Person", "nullable": true }
        }
      }
"##;
    let model = parse_raml_types(yaml).unwrap();
    let loose = model.types.lookup("Loose").unwrap();

    assert_eq!(loose.type_string(), "object");
    assert_eq!(
        loose.properties.keys().collect::<Vec<_>>(),
        vec!["x", "note", "any", "owner"]
    );
    assert_eq!(loose.property("x").unwrap().type_expr, "integer");
    assert_eq!(loose.property("note").unwrap().type_expr, "string");
    assert_eq!(loose.property("owner").unwrap().type_expr, "Person");
}

#[test]
fn test_numeric_property_names_are_accepted() {
    let model = parse_raml_types("types:\n  T:\n    properties:\n      200: string\n").unwrap();
    let t = model.types.lookup("T").unwrap();
    assert_eq!(t.property("200").unwrap().type_expr, "string");
}
