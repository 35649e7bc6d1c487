use crate::error::Result;

/// Validate structural integrity of a curve or one of its parts.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
