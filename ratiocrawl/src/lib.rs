pub mod commands;
pub mod handlers;
pub mod logging;

pub use commands::command_argument_builder;
pub use handlers::{crawl_config_from_args, handle_crawl, handle_task, render_summary};
pub use logging::{init_logging, level_for_verbosity};
