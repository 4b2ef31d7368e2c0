//! Command template builder.
//!
//! Pure functions mapping structured parameters to the exact command text the
//! device grammar requires. This is the only place that knows the CLI syntax,
//! so firmware changes stay local to this module.

mod index;
mod onu;

pub use index::{MAX_ONU_ID, OltIndex, OnuTarget};
pub use onu::{
    ActivationDetails, PppoeProfile, ServiceProfile, activate, reboot, remove, show_onu_state,
    show_unconfigured,
};

use std::fmt;
use std::str::FromStr;

use crate::error::TemplateError;

/// A provisioning operation selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Activate,
    Reboot,
    Remove,
}

impl Operation {
    /// Render this operation for `target`.
    ///
    /// `Activate` needs `details`; the other operations ignore them.
    pub fn render(
        self,
        target: &OnuTarget,
        details: Option<&ActivationDetails>,
    ) -> Result<String, TemplateError> {
        match self {
            Operation::Activate => details
                .map(|d| activate(target, d))
                .ok_or(TemplateError::MissingActivationDetails),
            Operation::Reboot => Ok(reboot(target)),
            Operation::Remove => Ok(remove(target)),
        }
    }

    /// Operation name as used by callers.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Activate => "activate",
            Operation::Reboot => "reboot",
            Operation::Remove => "remove",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "activate" => Ok(Operation::Activate),
            "reboot" => Ok(Operation::Reboot),
            "remove" => Ok(Operation::Remove),
            _ => Err(TemplateError::UnknownOperation {
                name: s.to_string(),
            }),
        }
    }
}
