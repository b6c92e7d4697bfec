//! Small global utilities.

use log::{error, LevelFilter};

/// Activate the logger. The CLI's verbosity flag maps to the level filter;
/// library users are expected to bring their own `log` backend instead.
pub fn activate_logging(log_level: LevelFilter) {
    env_logger::Builder::new().filter_level(log_level).init();
}

pub trait LogOnErr {
    fn log_on_err(self) -> Self;
}

impl<T, E: std::fmt::Debug> LogOnErr for Result<T, E> {
    /// Produce an error [log] if self is an Err.
    fn log_on_err(self) -> Self {
        if let Err(err) = &self {
            error!("{:?}", err);
        }
        self
    }
}

pub trait LogOnErrUnwrap<T> {
    fn log_on_err_unwrap(self) -> T;
}

impl<T, E: std::fmt::Debug> LogOnErrUnwrap<T> for Result<T, E> {
    /// Produce an error [log] if self is an Err, then unwrap.
    fn log_on_err_unwrap(self) -> T {
        self.log_on_err().unwrap()
    }
}
