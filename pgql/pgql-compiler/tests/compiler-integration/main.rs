use std::{fs, path::PathBuf};

use pgql_test_utils::{TestCatalog, init_test_tracing};

mod test_artifact;
mod test_references;
mod test_scenarios;

fn read_test_case(path: &PathBuf) -> TestCatalog {
    TestCatalog::from_json(&fs::read_to_string(path).unwrap())
}

#[rstest::rstest]
fn compile(#[files("test-cases/compile/*.json")] path: PathBuf) {
    init_test_tracing();
    let artifact = read_test_case(&path).generate();

    if let Err(error) = graphql_parser::parse_schema::<String>(&artifact) {
        panic!("{} produced invalid SDL: {error}\n{artifact}", path.display());
    }
}

#[rstest::rstest]
fn error(#[files("test-cases/error/*.json")] path: PathBuf) {
    init_test_tracing();
    read_test_case(&path).compile_fail();
}
