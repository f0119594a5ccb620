//! twister core library
//!
//! Shared building blocks for the twister test runner: the scripting rule
//! set that attaches pre/post hook scripts to test scenarios, and the
//! status types assigned while a test instance runs.

// Re-export commonly used types
pub use error::{ScriptingError, ScriptingResult, StatusError};
pub use scripting::{
    NameFilter, PatternDimension, Scripting, ScriptingData, ScriptingElement,
    ScriptingElementConfig, DEFAULT_COMMENT,
};
pub use statuses::{
    HarnessStatus, QemuOutputStatus, TestCaseStatus, TestInstanceStatus, TestSuiteStatus,
};
#[cfg(feature = "logging")]
pub use logging::{init_logging, LogConfig, LogFormat, LoggingError};

// Public modules
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod scripting;
pub mod statuses;

// Lightweight logging facade macros – keep call sites but allow stripping them in minimal builds
#[cfg(feature = "minimal-logging")]
#[macro_export]
macro_rules! twister_log_debug { ($($tt:tt)*) => { /* stripped in minimal build */ }; }
#[cfg(not(feature = "minimal-logging"))]
#[macro_export]
macro_rules! twister_log_debug { ($($tt:tt)*) => { tracing::debug!($($tt)*); }; }

#[cfg(feature = "minimal-logging")]
#[macro_export]
macro_rules! twister_log_info { ($($tt:tt)*) => { /* stripped */ }; }
#[cfg(not(feature = "minimal-logging"))]
#[macro_export]
macro_rules! twister_log_info { ($($tt:tt)*) => { tracing::info!($($tt)*); }; }

#[cfg(feature = "minimal-logging")]
#[macro_export]
macro_rules! twister_log_warn { ($($tt:tt)*) => { /* stripped */ }; }
#[cfg(not(feature = "minimal-logging"))]
#[macro_export]
macro_rules! twister_log_warn { ($($tt:tt)*) => { tracing::warn!($($tt)*); }; }
