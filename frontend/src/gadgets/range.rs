use crate::{builder::CircuitApi, errors::Result, variable::Variable};
use zksok_algebra::prelude::*;

/// Check `var < 2^n_bits` and return its bits, least significant first.
pub fn range_check<F: Scalar, A: CircuitApi<F>>(
    api: &mut A,
    var: Variable,
    n_bits: usize,
) -> Result<Vec<Variable>> {
    api.to_binary(var, n_bits)
}

/// Check `var <= bound` for a `var` already known to fit in `n_bits`,
/// by range checking `bound - var` to the same width.
pub fn assert_at_most<F: Scalar, A: CircuitApi<F>>(
    api: &mut A,
    var: Variable,
    bound: u64,
    n_bits: usize,
) -> Result<()> {
    let gap = api.linear_combination(&[(var, F::one().neg())], F::from(bound))?;
    api.range_check(gap, n_bits)
}
