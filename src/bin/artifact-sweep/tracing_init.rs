// Initializes the tracing subscriber for the CLI binary.

use std::env;
use std::io::IsTerminal;

use artifact_sweep::config::TracingConfig;

const EVENT_FILTER_ENV_VAR: &str = "RUST_LOG";

pub fn init_tracing(config: &TracingConfig) {
    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .compact()
        .with_ansi(!config.disable_color_tracing && std::io::stdout().is_terminal());

    let mut show_target = true;
    let tracing_level = config.tracing_level;
    let event_filter = if config.http_tracing {
        format!("artifact_sweep={tracing_level},reqwest={tracing_level},hyper_util={tracing_level}")
    } else if let Ok(event_filter) = env::var(EVENT_FILTER_ENV_VAR) {
        event_filter
    } else {
        show_target = false;
        format!("artifact_sweep={tracing_level}")
    };

    let subscriber_builder = subscriber_builder
        .with_env_filter(event_filter)
        .with_target(show_target);
    if config.json_tracing {
        subscriber_builder.json().init();
    } else {
        subscriber_builder.init();
    }
}
