#![forbid(unsafe_code)]

use pgqltool::PgqlToolError;

fn main() -> Result<(), PgqlToolError> {
    pgqltool::run()
}
