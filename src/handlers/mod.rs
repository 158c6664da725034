mod convert;
mod health;
mod metrics;
mod root;

pub use convert::{convert_html_handler, convert_markdown_handler, convert_text_handler};
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use root::root_handler;
