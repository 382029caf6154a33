//! Static file serving.

use tower_http::services::ServeDir;

use crate::config::UiConfig;

/// Create the service mounted under `/static`.
pub fn create_static_service(ui: &UiConfig) -> ServeDir {
    ServeDir::new(&ui.static_dir)
}
