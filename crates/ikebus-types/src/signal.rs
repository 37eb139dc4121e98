//! The closed signal vocabulary and its classification helpers.

use serde::{Deserialize, Serialize};

macro_rules! signals {
    ($($variant:ident => $name:literal,)+) => {
        /// Event kinds raised on the bus.
        ///
        /// Debug signals carry the subsystem a diagnostic message came from;
        /// lifecycle signals report the start and outcome of an SA operation.
        /// Declaration order is significant: every debug signal precedes every
        /// lifecycle signal.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum Signal {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl Signal {
            /// Every signal, in declaration order.
            pub const ALL: &'static [Signal] = &[$(Signal::$variant,)+];

            /// Returns the canonical upper-snake name of this signal.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl std::str::FromStr for Signal {
            type Err = ParseSignalError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(ParseSignalError(s.to_string())),
                }
            }
        }
    };
}

signals! {
    Any => "ANY",

    DbgDmn => "DBG_DMN",
    DbgMgr => "DBG_MGR",
    DbgIke => "DBG_IKE",
    DbgChd => "DBG_CHD",
    DbgJob => "DBG_JOB",
    DbgCfg => "DBG_CFG",
    DbgKnl => "DBG_KNL",
    DbgNet => "DBG_NET",
    DbgEnc => "DBG_ENC",
    DbgLib => "DBG_LIB",

    IkeUpStart => "IKE_UP_START",
    IkeUpSuccess => "IKE_UP_SUCCESS",
    IkeUpFailed => "IKE_UP_FAILED",
    IkeDownStart => "IKE_DOWN_START",
    IkeDownSuccess => "IKE_DOWN_SUCCESS",
    IkeDownFailed => "IKE_DOWN_FAILED",
    IkeRekeyStart => "IKE_REKEY_START",
    IkeRekeySuccess => "IKE_REKEY_SUCCESS",
    IkeRekeyFailed => "IKE_REKEY_FAILED",

    ChildUpStart => "CHILD_UP_START",
    ChildUpSuccess => "CHILD_UP_SUCCESS",
    ChildUpFailed => "CHILD_UP_FAILED",
    ChildDownStart => "CHILD_DOWN_START",
    ChildDownSuccess => "CHILD_DOWN_SUCCESS",
    ChildDownFailed => "CHILD_DOWN_FAILED",
    ChildRekeyStart => "CHILD_REKEY_START",
    ChildRekeySuccess => "CHILD_REKEY_SUCCESS",
    ChildRekeyFailed => "CHILD_REKEY_FAILED",
    ChildRouteStart => "CHILD_ROUTE_START",
    ChildRouteSuccess => "CHILD_ROUTE_SUCCESS",
    ChildRouteFailed => "CHILD_ROUTE_FAILED",
    ChildUnrouteStart => "CHILD_UNROUTE_START",
    ChildUnrouteSuccess => "CHILD_UNROUTE_SUCCESS",
    ChildUnrouteFailed => "CHILD_UNROUTE_FAILED",
}

/// Upper bound of the debug range; signals ordered after it are lifecycle signals.
const DEBUG_MAX: Signal = Signal::DbgLib;

impl Signal {
    /// Returns `true` for the per-subsystem debug signals.
    pub fn is_debug(self) -> bool {
        self > Self::Any && self <= DEBUG_MAX
    }

    /// Returns `true` for SA lifecycle signals.
    pub fn is_lifecycle(self) -> bool {
        self > DEBUG_MAX
    }

    /// Returns the category bucket of this signal. See [`classify`].
    pub fn category(self) -> SignalCategory {
        match self {
            Self::DbgDmn => SignalCategory::Dmn,
            Self::DbgMgr => SignalCategory::Mgr,
            Self::DbgIke => SignalCategory::Ike,
            Self::DbgChd => SignalCategory::Chd,
            Self::DbgJob => SignalCategory::Job,
            Self::DbgCfg => SignalCategory::Cfg,
            Self::DbgKnl => SignalCategory::Knl,
            Self::DbgNet => SignalCategory::Net,
            Self::DbgEnc => SignalCategory::Enc,
            Self::DbgLib => SignalCategory::Lib,
            _ => SignalCategory::Any,
        }
    }

    /// Three-letter label of this signal's category, as printed in log lines.
    pub fn short_name(self) -> &'static str {
        self.category().as_str()
    }

    /// The kind of SA a lifecycle signal is about.
    pub fn subject(self) -> Option<SaKind> {
        if !self.is_lifecycle() {
            return None;
        }
        if self < Self::ChildUpStart {
            Some(SaKind::Ike)
        } else {
            Some(SaKind::Child)
        }
    }

    /// The operation a lifecycle signal reports on.
    pub fn operation(self) -> Option<Operation> {
        use Signal::*;
        match self {
            IkeUpStart | IkeUpSuccess | IkeUpFailed | ChildUpStart | ChildUpSuccess
            | ChildUpFailed => Some(Operation::Up),
            IkeDownStart | IkeDownSuccess | IkeDownFailed | ChildDownStart | ChildDownSuccess
            | ChildDownFailed => Some(Operation::Down),
            IkeRekeyStart | IkeRekeySuccess | IkeRekeyFailed | ChildRekeyStart
            | ChildRekeySuccess | ChildRekeyFailed => Some(Operation::Rekey),
            ChildRouteStart | ChildRouteSuccess | ChildRouteFailed => Some(Operation::Route),
            ChildUnrouteStart | ChildUnrouteSuccess | ChildUnrouteFailed => {
                Some(Operation::Unroute)
            }
            _ => None,
        }
    }

    /// Whether a lifecycle signal marks the start, success or failure of its operation.
    pub fn outcome(self) -> Option<Outcome> {
        if !self.is_lifecycle() {
            return None;
        }
        // Lifecycle signals come in START, SUCCESS, FAILED triplets.
        let offset = self as usize - (DEBUG_MAX as usize + 1);
        Some(match offset % 3 {
            0 => Outcome::Start,
            1 => Outcome::Success,
            _ => Outcome::Failed,
        })
    }

    /// Looks up the lifecycle signal for a subject, operation and outcome.
    ///
    /// Returns `None` for combinations that do not exist, such as routing an
    /// IKE SA.
    pub fn lifecycle(subject: SaKind, operation: Operation, outcome: Outcome) -> Option<Self> {
        Self::ALL.iter().copied().find(|signal| {
            signal.subject() == Some(subject)
                && signal.operation() == Some(operation)
                && signal.outcome() == Some(outcome)
        })
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a signal to its category bucket.
///
/// Debug signals land in their own subsystem bucket; `Any` and every
/// lifecycle signal land in [`SignalCategory::Any`]. Categories label events
/// and drive per-listener thresholds; they never gate delivery on the bus.
pub fn classify(signal: Signal) -> SignalCategory {
    signal.category()
}

/// Error returned when parsing an unknown signal name.
#[derive(Debug, Clone)]
pub struct ParseSignalError(pub String);

impl std::fmt::Display for ParseSignalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown signal: {}", self.0)
    }
}

impl std::error::Error for ParseSignalError {}

/// Category buckets: one per daemon subsystem plus `Any` for audit and
/// lifecycle signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalCategory {
    /// Audit and lifecycle signals.
    Any,
    /// Daemon main loop.
    Dmn,
    /// SA manager.
    Mgr,
    /// IKE session.
    Ike,
    /// Child session.
    Chd,
    /// Job processing.
    Job,
    /// Configuration backends.
    Cfg,
    /// Kernel interface.
    Knl,
    /// Networking.
    Net,
    /// Message encoding and decoding.
    Enc,
    /// Library logging hook.
    Lib,
}

impl SignalCategory {
    /// Every category, `Any` first.
    pub const ALL: [SignalCategory; 11] = [
        Self::Any,
        Self::Dmn,
        Self::Mgr,
        Self::Ike,
        Self::Chd,
        Self::Job,
        Self::Cfg,
        Self::Knl,
        Self::Net,
        Self::Enc,
        Self::Lib,
    ];

    /// Three-letter label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Dmn => "DMN",
            Self::Mgr => "MGR",
            Self::Ike => "IKE",
            Self::Chd => "CHD",
            Self::Job => "JOB",
            Self::Cfg => "CFG",
            Self::Knl => "KNL",
            Self::Net => "NET",
            Self::Enc => "ENC",
            Self::Lib => "LIB",
        }
    }
}

impl std::fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of security association a lifecycle signal refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaKind {
    /// An IKE SA.
    Ike,
    /// A CHILD SA.
    Child,
}

/// Operations reported by lifecycle signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Establishment.
    Up,
    /// Deletion.
    Down,
    /// Rekeying.
    Rekey,
    /// Trap policy installation (CHILD SAs only).
    Route,
    /// Trap policy removal (CHILD SAs only).
    Unroute,
}

/// Phase of a lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The operation has begun.
    Start,
    /// The operation completed.
    Success,
    /// The operation failed.
    Failed,
}
