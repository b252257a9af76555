use tracing_subscriber::filter::EnvFilter;

static BIN_NAME: &str = std::env!("CARGO_CRATE_NAME");

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn set_up(verbosity: u8) {
    let formatter = tracing_subscriber::fmt::format::debug_fn(|writer, field, value| {
        write!(writer, "{field}={value:?}")
    });

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = max_level(verbosity);
        EnvFilter::new(format!("warn,{BIN_NAME}={level},monzo_api={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(true)
        .fmt_fields(formatter)
        .init();
}

fn max_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
