pub mod log;
pub mod url;

pub use url::url_encode;
pub use log::{
    ConsoleLogger,
    LogHandler,
    LogLevel,
    set_global_log_handler,
    set_global_log_level,
};
