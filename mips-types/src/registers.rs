//! Register identities and their textual labels

use crate::constants::REGISTER_NAMES;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Identifies one architectural register
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegisterId {
    /// One of the 32 general purpose registers
    General(u8),
    Pc,
    Hi,
    Lo,
}

impl RegisterId {
    /// Resolve a label such as `t0`, `$29`, `$sp` or `pc`.
    /// Returns `None` if the label names no register.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        let label = label.strip_prefix('$').unwrap_or(label);

        match label {
            "pc" => return Some(RegisterId::Pc),
            "hi" => return Some(RegisterId::Hi),
            "lo" => return Some(RegisterId::Lo),
            _ => {}
        }

        if let Some(number) = REGISTER_NAMES.iter().position(|name| *name == label) {
            return Some(RegisterId::General(number as u8));
        }

        match label.parse::<u8>() {
            Ok(number) if number < 32 => Some(RegisterId::General(number)),
            _ => None,
        }
    }

    /// The symbolic name of a general register (`sp`, `t0`, ...)
    pub fn name(&self) -> Option<&'static str> {
        match self {
            RegisterId::General(number) => REGISTER_NAMES.get(*number as usize).copied(),
            _ => None,
        }
    }
}

impl FromStr for RegisterId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Unknown register '{}'", s))
    }
}

/// Snapshot keys: `$<n>` for general registers, `pc`/`hi`/`lo` otherwise
impl Display for RegisterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RegisterId::General(number) => write!(f, "${}", number),
            RegisterId::Pc => f.write_str("pc"),
            RegisterId::Hi => f.write_str("hi"),
            RegisterId::Lo => f.write_str("lo"),
        }
    }
}
