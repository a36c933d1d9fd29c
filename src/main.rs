use dlpchat::config::apply_bundled_config;

/// Bundled config for mobile builds (iOS/Android) and the web
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // Fall back to bundled config (mobile builds)
    apply_bundled_config(BUNDLED_CONFIG);
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {
    apply_bundled_config(BUNDLED_CONFIG);
}

#[cfg(not(target_arch = "wasm32"))]
fn init_tracing() {
    let level = std::env::var("DLP_LOG")
        .ok()
        .and_then(|raw| raw.trim().parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);
    let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
}

#[cfg(target_arch = "wasm32")]
fn init_tracing() {}

fn main() {
    load_dotenv();
    init_tracing();
    dioxus::launch(dlpchat::ui::App);
}
