//! Construction errors.

/// Reasons a multiplier cannot be built. Once built, iteration never fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MultiplierError {
    #[error("n={n} must be even")]
    OddWidth { n: usize },

    #[error("n={n} must be between {min} and {max}")]
    WidthOutOfRange { n: usize, min: usize, max: usize },

    #[error("output={output} must be between 0 and {max}")]
    OutputOutOfRange { output: u128, max: u128 },
}

pub type Result<T> = std::result::Result<T, MultiplierError>;
