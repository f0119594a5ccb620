//! Status types used instead of bare strings
//!
//! Status assignment tree (`parent <- child` means the parent status is
//! assigned to the child in code):
//!
//! ```text
//! HarnessStatus
//! └ QemuOutputStatus
//!   └ TestInstanceStatus
//!     ├ TestSuiteStatus
//!     └ TestCaseStatus
//! ```
//!
//! "No status yet" is `Option::None` rather than a dedicated variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatusError;

/// Declares a string-valued status enum with `as_str`, `Display`, `FromStr`
/// and serde support keyed on the string value.
macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = StatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(StatusError::Unknown {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

status_enum! {
    /// Outcome of a whole test instance (one scenario on one platform)
    TestInstanceStatus, "test instance status" {
        Error => "error",
        Fail => "failed",
        Filter => "filtered",
        Pass => "passed",
        Skip => "skipped",
    }
}

status_enum! {
    /// Outcome of a test suite
    TestSuiteStatus, "test suite status" {
        Filter => "filtered",
        Pass => "passed",
        Skip => "skipped",
        Error => "error",
        Fail => "failed",
    }
}

status_enum! {
    /// Outcome of a single test case
    TestCaseStatus, "test case status" {
        Block => "blocked",
        Error => "error",
        Fail => "failed",
        Filter => "filtered",
        Pass => "passed",
        Skip => "skipped",
        Started => "started",
    }
}

status_enum! {
    /// State reported by the QEMU output handler
    QemuOutputStatus, "QEMU output status" {
        Byte => "unexpected byte",
        Eof => "unexpected eof",
        Fail => "failed",
        Timeout => "timeout",
        Error => "error",
        Pass => "passed",
        Skip => "skipped",
    }
}

status_enum! {
    /// Verdict of an output harness
    HarnessStatus, "harness status" {
        Error => "error",
        Fail => "failed",
        Pass => "passed",
        Skip => "skipped",
    }
}

impl From<HarnessStatus> for QemuOutputStatus {
    fn from(status: HarnessStatus) -> Self {
        match status {
            HarnessStatus::Error => QemuOutputStatus::Error,
            HarnessStatus::Fail => QemuOutputStatus::Fail,
            HarnessStatus::Pass => QemuOutputStatus::Pass,
            HarnessStatus::Skip => QemuOutputStatus::Skip,
        }
    }
}

impl TryFrom<QemuOutputStatus> for TestInstanceStatus {
    type Error = StatusError;

    fn try_from(status: QemuOutputStatus) -> Result<Self, StatusError> {
        match status {
            QemuOutputStatus::Error => Ok(TestInstanceStatus::Error),
            QemuOutputStatus::Fail => Ok(TestInstanceStatus::Fail),
            QemuOutputStatus::Pass => Ok(TestInstanceStatus::Pass),
            QemuOutputStatus::Skip => Ok(TestInstanceStatus::Skip),
            QemuOutputStatus::Byte | QemuOutputStatus::Eof | QemuOutputStatus::Timeout => {
                Err(StatusError::NotAssignable {
                    kind: "QEMU output status",
                    value: status.as_str(),
                    target: "test instance status",
                })
            }
        }
    }
}

impl From<TestInstanceStatus> for TestSuiteStatus {
    fn from(status: TestInstanceStatus) -> Self {
        match status {
            TestInstanceStatus::Error => TestSuiteStatus::Error,
            TestInstanceStatus::Fail => TestSuiteStatus::Fail,
            TestInstanceStatus::Filter => TestSuiteStatus::Filter,
            TestInstanceStatus::Pass => TestSuiteStatus::Pass,
            TestInstanceStatus::Skip => TestSuiteStatus::Skip,
        }
    }
}

impl From<TestInstanceStatus> for TestCaseStatus {
    fn from(status: TestInstanceStatus) -> Self {
        match status {
            TestInstanceStatus::Error => TestCaseStatus::Error,
            TestInstanceStatus::Fail => TestCaseStatus::Fail,
            TestInstanceStatus::Filter => TestCaseStatus::Filter,
            TestInstanceStatus::Pass => TestCaseStatus::Pass,
            TestInstanceStatus::Skip => TestCaseStatus::Skip,
        }
    }
}
