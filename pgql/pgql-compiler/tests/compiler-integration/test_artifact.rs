use std::collections::HashSet;

use graphql_parser::schema::{Definition, Document, ObjectType, TypeDefinition, parse_schema};
use pgql_test_utils::{TestCatalog, expect_eq, init_test_tracing};

fn shop() -> TestCatalog {
    TestCatalog::new()
        .table("customers", |t| {
            t.pk("id")
                .column("email", "citext")
                .column("nicknames", "_varchar")
                .nullable()
                .column("created_at", "timestamptz")
        })
        .table("orders", |t| {
            t.column("id", "uuid")
                .primary()
                .column("customer_id", "int4")
                .column("total", "numeric")
                .column("paid", "bool")
                .nullable()
        })
        .table("order_lines", |t| {
            t.column("order_id", "uuid")
                .primary()
                .column("line_no", "int2")
                .primary()
                .column("weight", "float8")
                .nullable()
        })
        .foreign_key(("orders", "customer_id"), ("customers", "id"))
        .foreign_key(("order_lines", "order_id"), ("orders", "id"))
}

fn object_types<'d, 'a>(
    document: &'d Document<'a, String>,
) -> impl Iterator<Item = &'d ObjectType<'a, String>> {
    document.definitions.iter().filter_map(|definition| match definition {
        Definition::TypeDefinition(TypeDefinition::Object(object)) => Some(object),
        _ => None,
    })
}

#[test]
fn compiling_twice_is_byte_identical() {
    let test = shop();
    expect_eq!(actual = test.generate(), expected = test.generate());
}

#[test]
fn artifact_is_valid_sdl() {
    init_test_tracing();
    let artifact = shop().generate();
    let document = parse_schema::<String>(&artifact).unwrap();

    let type_names: Vec<_> = object_types(&document)
        .map(|object| object.name.as_str())
        .collect();
    expect_eq!(
        actual = type_names,
        expected = vec!["Customer", "Order", "OrderLine", "Query"]
    );

    let scalars: Vec<_> = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            Definition::TypeDefinition(TypeDefinition::Scalar(scalar)) => {
                Some(scalar.name.as_str())
            }
            _ => None,
        })
        .collect();
    expect_eq!(actual = scalars, expected = vec!["Date"]);
}

#[test]
fn names_are_unique_and_fields_carry_one_directive() {
    let artifact = shop().generate();
    let document = parse_schema::<String>(&artifact).unwrap();

    let mut type_names = HashSet::new();
    for object in object_types(&document) {
        assert!(type_names.insert(object.name.clone()), "{}", object.name);

        let mut field_names = HashSet::new();
        for field in &object.fields {
            assert!(
                field_names.insert(field.name.clone()),
                "{}.{}",
                object.name,
                field.name
            );
            expect_eq!(actual = field.directives.len(), expected = 1);

            let expected_directives: &[&str] = if object.name == "Query" {
                &["delegate"]
            } else {
                &["sqlColumn", "sqlJoin"]
            };
            assert!(expected_directives.contains(&field.directives[0].name.as_str()));
        }

        if object.name != "Query" {
            expect_eq!(actual = object.directives.len(), expected = 1);
            expect_eq!(actual = object.directives[0].name.as_str(), expected = "sqlTable");
        }
    }
}

#[test]
fn type_mapping_in_the_artifact() {
    let artifact = shop().generate();

    for line in [
        "  email: String! @sqlColumn(name: \"email\")",
        "  nicknames: [String!] @sqlColumn(name: \"nicknames\")",
        "  createdAt: Date! @sqlColumn(name: \"created_at\")",
        "  id: ID! @sqlColumn(name: \"id\")",
        "  total: String! @sqlColumn(name: \"total\")",
        "  paid: Boolean @sqlColumn(name: \"paid\")",
        "  lineNo: Int! @sqlColumn(name: \"line_no\")",
        "  weight: Float @sqlColumn(name: \"weight\")",
        "  orderLines: [OrderLine!]! @sqlJoin(on: \"${parent}.\\\"id\\\" = ${child}.\\\"order_id\\\"\")",
    ] {
        assert!(
            artifact.lines().any(|artifact_line| artifact_line == line),
            "missing `{line}` in:\n{artifact}"
        );
    }
}

#[test]
fn composite_unique_key() {
    let artifact = shop().generate();

    assert!(artifact.contains(r#"type OrderLine @sqlTable(uniqueKey: ["order_id", "line_no"], "#));
    assert!(artifact.contains(r#"  ORDER BY "order_lines"."order_id", "order_lines"."line_no""#));
}

#[test]
fn query_root_lists_every_table() {
    let artifact = shop().generate();

    for line in [
        "  customers(id: [Int], email: [String], createdAt: [Date], nicknames: [String!], limit: Int, offset: Int): [Customer!]! @delegate",
        "  orders(id: [ID], customerId: [Int], total: [String], paid: [Boolean], limit: Int, offset: Int): [Order!]! @delegate",
        "  orderLines(orderId: [ID], lineNo: [Int], weight: [Float], limit: Int, offset: Int): [OrderLine!]! @delegate",
    ] {
        assert!(
            artifact.lines().any(|artifact_line| artifact_line == line),
            "missing `{line}` in:\n{artifact}"
        );
    }
}
