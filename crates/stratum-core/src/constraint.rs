//! Core constraint types.
//!
//! This module provides fundamental constraint identification and classification
//! types used throughout the constraint evaluation system.

/// Reference to a constraint for identification.
///
/// # Example
///
/// ```
/// use stratum_core::ConstraintRef;
///
/// let cr = ConstraintRef::new("timetable", "Room conflict");
/// assert_eq!(cr.full_name(), "timetable/Room conflict");
///
/// let simple = ConstraintRef::new("", "Simple");
/// assert_eq!(simple.full_name(), "Simple");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintRef {
    /// Package/module containing the constraint.
    pub package: String,
    /// Name of the constraint.
    pub name: String,
}

impl ConstraintRef {
    /// Creates a new constraint reference.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Returns the fully qualified name.
    pub fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.package, self.name)
        }
    }
}

/// Whether a constraint subtracts from or adds to the score.
///
/// # Example
///
/// ```
/// use stratum_core::ImpactType;
///
/// let penalty = ImpactType::Penalty;
/// let reward = ImpactType::Reward;
///
/// assert_ne!(penalty, reward);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImpactType {
    /// Penalize (subtract from score).
    Penalty,
    /// Reward (add to score).
    Reward,
}

impl ImpactType {
    /// Sign applied to a constraint weight.
    pub fn sign(&self) -> i64 {
        match self {
            ImpactType::Penalty => -1,
            ImpactType::Reward => 1,
        }
    }
}

impl std::fmt::Display for ConstraintRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}/{}", self.package, self.name)
        }
    }
}
