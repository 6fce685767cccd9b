use indoc::indoc;
use pgql_compiler::{compile, sql_bind::Args};
use pgql_test_utils::{TestCatalog, expect_eq, init_test_tracing};
use serde_json::json;

fn users_and_posts() -> TestCatalog {
    TestCatalog::new()
        .table("users", |t| t.pk("id").column("name", "text"))
        .table("posts", |t| t.pk("id").column("user_id", "int4"))
        .foreign_key(("posts", "user_id"), ("users", "id"))
}

#[test]
fn users_and_posts_artifact() {
    init_test_tracing();

    expect_eq!(
        actual = users_and_posts().generate(),
        expected = indoc! {r#"
            scalar Date

            directive @sqlTable(uniqueKey: [String!]!, fragment: String!) on OBJECT
            directive @sqlColumn(name: String!) on FIELD_DEFINITION
            directive @sqlJoin(on: String!) on FIELD_DEFINITION
            directive @delegate on FIELD_DEFINITION

            type User @sqlTable(uniqueKey: ["id"], fragment: """
              SELECT * FROM "public"."users" AS "users"
              WHERE CASE WHEN ${absent(args.id)} THEN TRUE ELSE CASE WHEN ${null(args.id)} THEN "users"."id" IS NULL ELSE CASE WHEN ${non_empty(args.id)} THEN "users"."id" = ANY(${args.id}::int4[]) ELSE TRUE END END END
                AND CASE WHEN ${absent(args.name)} THEN TRUE ELSE CASE WHEN ${null(args.name)} THEN "users"."name" IS NULL ELSE CASE WHEN ${non_empty(args.name)} THEN "users"."name" = ANY(${args.name}::text[]) ELSE TRUE END END END
              ORDER BY "users"."id"
              LIMIT CASE WHEN ${number(args.limit)} THEN ${args.limit}::INT END
              OFFSET CASE WHEN ${number(args.offset)} THEN ${args.offset}::INT END
            """) {
              id: Int! @sqlColumn(name: "id")
              name: String! @sqlColumn(name: "name")

              posts: [Post!]! @sqlJoin(on: "${parent}.\"id\" = ${child}.\"user_id\"")
            }

            type Post @sqlTable(uniqueKey: ["id"], fragment: """
              SELECT * FROM "public"."posts" AS "posts"
              WHERE CASE WHEN ${absent(args.id)} THEN TRUE ELSE CASE WHEN ${null(args.id)} THEN "posts"."id" IS NULL ELSE CASE WHEN ${non_empty(args.id)} THEN "posts"."id" = ANY(${args.id}::int4[]) ELSE TRUE END END END
                AND CASE WHEN ${absent(args.userId)} THEN TRUE ELSE CASE WHEN ${null(args.userId)} THEN "posts"."user_id" IS NULL ELSE CASE WHEN ${non_empty(args.userId)} THEN "posts"."user_id" = ANY(${args.userId}::int4[]) ELSE TRUE END END END
              ORDER BY "posts"."id"
              LIMIT CASE WHEN ${number(args.limit)} THEN ${args.limit}::INT END
              OFFSET CASE WHEN ${number(args.offset)} THEN ${args.offset}::INT END
            """) {
              id: Int! @sqlColumn(name: "id")
              userId: Int! @sqlColumn(name: "user_id")

              user: User! @sqlJoin(on: "${parent}.\"user_id\" = ${child}.\"id\"")
            }

            type Query {
              users(id: [Int], name: [String], limit: Int, offset: Int): [User!]! @delegate
              posts(id: [Int], userId: [Int], limit: Int, offset: Int): [Post!]! @delegate
            }
        "#}
    );
}

#[test]
fn users_and_posts_relationships() {
    let test = users_and_posts();
    let catalog = test.catalog();
    let schema = compile(&catalog, test.config()).unwrap();

    let user = schema.find_type("User").unwrap();
    let posts = user.find_field("posts").unwrap();
    expect_eq!(actual = posts.graphql_type.to_string(), expected = "[Post!]!");
    assert!(posts.join_directive().is_some());

    let post = schema.find_type("Post").unwrap();
    let user_field = post.find_field("user").unwrap();
    expect_eq!(actual = user_field.graphql_type.to_string(), expected = "User!");
    assert!(!user_field.nullable());
}

#[test]
fn array_column_without_filter_argument_reduces_to_true() {
    let test = TestCatalog::new().table("posts", |t| {
        t.pk("id").column("tags", "_text").nullable()
    });
    let catalog = test.catalog();
    let schema = compile(&catalog, test.config()).unwrap();
    let post = schema.find_type("Post").unwrap();

    expect_eq!(
        actual = post.find_field("tags").unwrap().graphql_type.to_string(),
        expected = "[String!]"
    );

    for args in [json!({}), json!({ "tags": [] }), json!({ "id": null })] {
        let Some(args) = args.as_object().cloned() else {
            unreachable!()
        };
        let bound = post.sql_table.bind(&args);
        assert!(
            !bound.sql.contains("tags"),
            "tags clause survived binding with {args:?}: {}",
            bound.sql
        );
    }

    let mut args = Args::new();
    args.insert("tags".into(), json!(["rust"]));
    let bound = post.sql_table.bind(&args);
    expect_eq!(
        actual = bound.sql,
        expected = indoc! {r#"
            SELECT * FROM "public"."posts" AS "posts"
            WHERE "posts"."tags" && $1::text[]
            ORDER BY "posts"."id""#
        }
    );
    expect_eq!(actual = bound.params, expected = vec![json!(["rust"])]);
}

#[test]
fn excluded_table_leaves_no_trace() {
    init_test_tracing();

    let artifact = TestCatalog::new()
        .table("users", |t| t.pk("id"))
        .table("passwords", |t| t.pk("id").column("user_id", "int4").column("hash", "text"))
        .foreign_key(("passwords", "user_id"), ("users", "id"))
        .exclude("passwords")
        .generate();

    assert!(!artifact.contains("Password"), "{artifact}");
    assert!(!artifact.contains("passwords"), "{artifact}");
    assert!(artifact.contains("type User "));
}

#[test]
fn configured_schema_name_is_used_in_fragments() {
    let artifact = TestCatalog::new()
        .table("users", |t| t.pk("id"))
        .schema_name("app")
        .generate();

    assert!(artifact.contains(r#"SELECT * FROM "app"."users" AS "users""#));
}

#[test]
fn explicit_null_filters_for_missing_values() {
    let test = TestCatalog::new().table("users", |t| t.pk("id").column("email", "text").nullable());
    let catalog = test.catalog();
    let schema = compile(&catalog, test.config()).unwrap();

    let mut args = Args::new();
    args.insert("email".into(), json!(null));
    args.insert("offset".into(), json!(20));

    let bound = schema.find_type("User").unwrap().sql_table.bind(&args);
    expect_eq!(
        actual = bound.sql,
        expected = indoc! {r#"
            SELECT * FROM "public"."users" AS "users"
            WHERE "users"."email" IS NULL
            ORDER BY "users"."id"
            OFFSET $1::INT"#
        }
    );
    expect_eq!(actual = bound.params, expected = vec![json!(20)]);
}
