use pgql_compiler::{compile, naming::EntityNames, schema::FieldSource};
use pgql_test_utils::{TestCatalog, expect_eq};

fn blog() -> TestCatalog {
    TestCatalog::new()
        .table("users", |t| t.pk("id").column("name", "text"))
        .table("posts", |t| {
            t.pk("id")
                .column("user_id", "int4")
                .column("title", "text")
        })
        .table("comments", |t| {
            t.pk("id")
                .column("post_id", "int4")
                .column("user_id", "int4")
                .nullable()
        })
        .foreign_key(("posts", "user_id"), ("users", "id"))
        .foreign_key(("comments", "post_id"), ("posts", "id"))
        .foreign_key(("comments", "user_id"), ("users", "id"))
}

#[test]
fn every_foreign_key_yields_one_field_on_each_side() {
    let test = blog();
    let catalog = test.catalog();
    let schema = compile(&catalog, test.config()).unwrap();

    for foreign_key in test.snapshot().foreign_keys {
        let owning = EntityNames::from_table(&foreign_key.owning_table).unwrap();
        let referenced = EntityNames::from_table(&foreign_key.referenced_table).unwrap();

        let owning_type = schema.find_type(&owning.type_name).unwrap();
        let singular: Vec<_> = owning_type
            .fields
            .forward
            .iter()
            .filter(|field| referenced.type_name == field.graphql_type.unit.to_string())
            .collect();
        expect_eq!(actual = singular.len(), expected = 1);
        expect_eq!(
            actual = singular[0].field_name.as_str(),
            expected = referenced.singular.as_str()
        );

        let referenced_type = schema.find_type(&referenced.type_name).unwrap();
        let plural: Vec<_> = referenced_type
            .fields
            .reverse
            .iter()
            .filter(|field| {
                field.graphql_type.to_string() == format!("[{}!]!", owning.type_name)
            })
            .collect();
        expect_eq!(actual = plural.len(), expected = 1);
        expect_eq!(
            actual = plural[0].field_name.as_str(),
            expected = owning.plural.as_str()
        );
    }
}

#[test]
fn forward_nullability_follows_the_owning_column() {
    let test = blog();
    let catalog = test.catalog();
    let schema = compile(&catalog, test.config()).unwrap();
    let comment = schema.find_type("Comment").unwrap();

    expect_eq!(
        actual = comment.find_field("post").unwrap().graphql_type.to_string(),
        expected = "Post!"
    );
    expect_eq!(
        actual = comment.find_field("user").unwrap().graphql_type.to_string(),
        expected = "User"
    );
}

#[test]
fn reverse_fields_are_never_nullable() {
    let test = blog();
    let catalog = test.catalog();
    let schema = compile(&catalog, test.config()).unwrap();
    let user = schema.find_type("User").unwrap();

    let reverse: Vec<_> = user
        .fields
        .reverse
        .iter()
        .map(|field| format!("{}: {}", field.field_name, field.graphql_type))
        .collect();

    expect_eq!(
        actual = reverse,
        expected = vec!["posts: [Post!]!", "comments: [Comment!]!"]
    );
}

#[test]
fn join_directions_mirror_each_other() {
    let test = blog();
    let catalog = test.catalog();
    let schema = compile(&catalog, test.config()).unwrap();

    let join_of = |type_name: &str, field_name: &str| -> String {
        let field = schema
            .find_type(type_name)
            .unwrap()
            .find_field(field_name)
            .unwrap();
        match &field.source {
            FieldSource::Join(join) => join.on.to_string(),
            FieldSource::Column(column) => panic!("{field_name} is backed by column {column}"),
        }
    };

    expect_eq!(
        actual = join_of("Post", "user"),
        expected = r#"${parent}."user_id" = ${child}."id""#
    );
    expect_eq!(
        actual = join_of("User", "posts"),
        expected = r#"${parent}."id" = ${child}."user_id""#
    );
}

#[test]
fn self_reference() {
    let test = TestCatalog::new()
        .table("employees", |t| t.pk("id").column("manager_id", "int4").nullable())
        .foreign_key(("employees", "manager_id"), ("employees", "id"));
    let catalog = test.catalog();
    let schema = compile(&catalog, test.config()).unwrap();
    let employee = schema.find_type("Employee").unwrap();

    let fields: Vec<_> = employee
        .fields
        .iter()
        .map(|field| format!("{}: {}", field.field_name, field.graphql_type))
        .collect();

    expect_eq!(
        actual = fields,
        expected = vec![
            "id: Int!",
            "managerId: Int",
            "employee: Employee",
            "employees: [Employee!]!"
        ]
    );
}
