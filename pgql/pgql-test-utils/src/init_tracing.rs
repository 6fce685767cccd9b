use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Log to the test harness, filtered by `RUST_LOG`. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
