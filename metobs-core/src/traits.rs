//! Core traits for calculators
//!
//! Every derived-value computation implements [`Calculator`]: borrowed raw
//! form fields in, one atomic output bundle out.

use crate::errors::DeriveResult;

/// A derived-value computation over raw form fields
pub trait Calculator {
    /// Raw fields the computation reads
    type Input<'a>;

    /// Encoded output bundle, produced whole or not at all
    type Output;

    /// Run the computation
    fn compute(&self, input: Self::Input<'_>) -> DeriveResult<Self::Output>;

    /// Short name used in logs and notices
    fn name(&self) -> &'static str;
}
