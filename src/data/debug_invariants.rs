use crate::error::MeshCoordsError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when the `check-invariants`
    /// feature is enabled.
    fn debug_assert_invariants(&self);

    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshCoordsError>;
}

/// Run a fallible invariant check and panic on error when invariant checking
/// is enabled (debug builds or the `check-invariants` feature).
#[macro_export]
macro_rules! debug_assert_ok {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
