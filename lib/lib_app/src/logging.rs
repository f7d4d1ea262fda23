use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
///
/// `RUST_LOG` follows the `env_logger` filter syntax (e.g. "debug",
/// "lib_renderer=debug,wgpu=warn"). Defaults to info level.
pub fn init_logging() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        log::debug!("logging initialized");
    });
}
