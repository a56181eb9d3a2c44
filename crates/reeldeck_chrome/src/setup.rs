use eframe::NativeOptions;
use reeldeck::{DataPath, DataPathType};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "reeldeck=info,reeldeck_chrome=info";
const DEBUG_FILTER: &str = "reeldeck=debug,reeldeck_chrome=debug";

pub fn generate_native_options(is_mobile: bool) -> NativeOptions {
    let viewport = egui::ViewportBuilder::default()
        .with_title("reeldeck")
        .with_min_inner_size([320.0, 480.0]);

    let viewport = if is_mobile {
        viewport.with_inner_size([405.0, 915.0])
    } else {
        viewport.with_inner_size([560.0, 900.0])
    };

    NativeOptions {
        viewport,
        ..Default::default()
    }
}

/// Logs to stdout and to a daily rolling file under the log directory.
/// `RUST_LOG` overrides the default filter.
///
/// The returned guard flushes the file writer on drop, keep it alive for
/// the lifetime of the program.
pub fn setup_logging(path: &DataPath, debug: bool) -> WorkerGuard {
    use tracing_appender::{
        non_blocking,
        rolling::{RollingFileAppender, Rotation},
    };
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        path.path(DataPathType::Log),
        format!("reeldeck-{}.log", env!("CARGO_PKG_VERSION")),
    );
    let (non_blocking_writer, guard) = non_blocking(file_appender);

    // Log to stdout (if you run with `RUST_LOG=debug`).
    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stdout);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking_writer);

    let default_filter = if debug { DEBUG_FILTER } else { DEFAULT_FILTER };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(env_filter)
        .init();

    guard
}
