use std::str::FromStr;
use std::sync::{
    atomic::{AtomicU8, Ordering},
    Mutex,
    OnceLock,
};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

static GLOBAL_LOG_LEVEL: OnceLock<AtomicU8> = OnceLock::new();
static GLOBAL_LOG_HANDLER: OnceLock<Mutex<Box<dyn LogHandler>>> = OnceLock::new();

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn from_u8(val: u8) -> LogLevel {
        match val {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warning,
            _ => LogLevel::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

fn current_global_level() -> LogLevel {
    let stored = GLOBAL_LOG_LEVEL
        .get_or_init(|| AtomicU8::new(LogLevel::Info as u8))
        .load(Ordering::Relaxed);
    LogLevel::from_u8(stored)
}

pub fn should_log(level: LogLevel) -> bool {
    level >= current_global_level()
}

pub fn set_global_log_level(level: LogLevel) {
    GLOBAL_LOG_LEVEL
        .get_or_init(|| AtomicU8::new(level as u8))
        .store(level as u8, Ordering::Relaxed);
}

pub trait LogHandler: Send + Sync {
    fn handle(&self, level: LogLevel, msg: &str);
}

/// Writes every record to stderr so decoded output on stdout stays clean.
pub struct ConsoleLogger;

impl LogHandler for ConsoleLogger {
    fn handle(&self, _level: LogLevel, msg: &str) {
        eprintln!("{}", msg);
    }
}

fn with_handler<F: FnOnce(&mut Box<dyn LogHandler>)>(f: F) {
    let lock = GLOBAL_LOG_HANDLER.get_or_init(|| Mutex::new(Box::new(ConsoleLogger)));
    // A handler that panicked mid-write leaves nothing we need to protect.
    let mut guard = match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    f(&mut *guard);
}

pub fn set_global_log_handler(handler: Box<dyn LogHandler>) {
    with_handler(|current| *current = handler);
}

pub fn log(level: LogLevel, name: &str, msg: &str) {
    if !should_log(level) {
        return;
    }

    let cur_thread = std::thread::current().id();
    let formatted_msg = format!("[{}] [{:?}] [{}] {}", level.as_str(), cur_thread, name, msg);
    with_handler(|handler| handler.handle(level, &formatted_msg));
}

pub fn debug(name: &str, msg: &str) {
    log(LogLevel::Debug, name, msg);
}

pub fn info(name: &str, msg: &str) {
    log(LogLevel::Info, name, msg);
}

pub fn warn(name: &str, msg: &str) {
    log(LogLevel::Warning, name, msg);
}

pub fn error(name: &str, msg: &str) {
    log(LogLevel::Error, name, msg);
}

/// `log_debug!("Component", "fmt {}", args..)`; the message is only formatted
/// when the level is enabled.
#[macro_export]
macro_rules! log_debug {
    ($name:expr, $($arg:tt)+) => {
        if $crate::utils::log::should_log($crate::utils::log::LogLevel::Debug) {
            $crate::utils::log::debug($name, &format!($($arg)+));
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($name:expr, $($arg:tt)+) => {
        if $crate::utils::log::should_log($crate::utils::log::LogLevel::Info) {
            $crate::utils::log::info($name, &format!($($arg)+));
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($name:expr, $($arg:tt)+) => {
        if $crate::utils::log::should_log($crate::utils::log::LogLevel::Warning) {
            $crate::utils::log::warn($name, &format!($($arg)+));
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($name:expr, $($arg:tt)+) => {
        if $crate::utils::log::should_log($crate::utils::log::LogLevel::Error) {
            $crate::utils::log::error($name, &format!($($arg)+));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Capture(Arc<Mutex<Vec<String>>>);

    impl LogHandler for Capture {
        fn handle(&self, _level: LogLevel, msg: &str) {
            self.0.lock().unwrap().push(msg.to_string());
        }
    }

    #[test]
    fn parses_levels() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn levels_are_ordered() {
        assert!(LogLevel::Error > LogLevel::Warning);
        assert!(LogLevel::Info > LogLevel::Debug);
    }

    #[test]
    fn custom_handler_receives_formatted_records() {
        let records = Arc::new(Mutex::new(Vec::new()));
        set_global_log_handler(Box::new(Capture(records.clone())));

        crate::log_error!("LogTest", "value was {}", 42);

        let records = records.lock().unwrap();
        assert!(records
            .iter()
            .any(|r| r.starts_with("[ERROR]") && r.ends_with("[LogTest] value was 42")));
    }
}
