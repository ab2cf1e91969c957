//! Глобальный logger симуляции
//!
//! Core ничего не знает о том, куда пишутся логи: embedding layer
//! (headless bin, engine bridge, тест) ставит свой `LogPrinter`.
//! По умолчанию — консольный printer.

use once_cell::sync::Lazy;
use std::sync::Mutex;

struct LoggerState {
    printer: Option<Box<dyn LogPrinter>>,
    level: LogLevel,
}

// Один mutex на printer + уровень (проще, чем два глобала)
static LOGGER: Lazy<Mutex<LoggerState>> = Lazy::new(|| {
    Mutex::new(LoggerState {
        printer: None,
        level: LogLevel::Debug,
    })
});

/// Уровень логирования (фильтр применяется в `log_with_level`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

pub trait LogPrinter: Send + Sync {
    fn print(&self, level: LogLevel, message: &str);
}

pub fn set_logger(printer: Box<dyn LogPrinter>) {
    if let Ok(mut state) = LOGGER.lock() {
        state.printer = Some(printer);
    }
}

pub fn set_logger_if_needed(printer: Box<dyn LogPrinter>) {
    if let Ok(mut state) = LOGGER.lock() {
        if state.printer.is_none() {
            state.printer = Some(printer);
        }
    }
}

pub fn set_log_level(level: LogLevel) {
    if let Ok(mut state) = LOGGER.lock() {
        state.level = level;
    }
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

/// Timestamp добавляем здесь, не в printer'е
pub fn log_with_level(level: LogLevel, message: &str) {
    if let Ok(state) = LOGGER.lock() {
        if level < state.level {
            return;
        }
        if let Some(printer) = state.printer.as_ref() {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            printer.print(level, &format!("[{}] {}", timestamp, message));
        }
    }
}

struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn print(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}

pub fn init_logger() {
    set_logger_if_needed(Box::new(ConsoleLogger));
}
