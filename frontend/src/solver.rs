use crate::variable::VarIndex;
use zksok_algebra::prelude::*;

/// One step of witness expansion: how to compute the value of fresh variables
/// from values computed earlier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: Scalar")]
pub enum Hint<F> {
    /// `out = Σ coeff·w[var] + constant`
    Linear {
        /// the weighted inputs
        terms: Vec<(VarIndex, F)>,
        /// the constant term
        constant: F,
        /// the computed variable
        out: VarIndex,
    },
    /// `out = q_l·w[left] + q_r·w[right] + q_m·w[left]·w[right] + q_c`
    Product {
        /// the left input
        left: VarIndex,
        /// the right input
        right: VarIndex,
        /// `[q_l, q_r, q_m, q_c]`
        coeffs: [F; 4],
        /// the computed variable
        out: VarIndex,
    },
    /// `out = w[input]^-1`, or zero when `w[input]` is zero so that the
    /// `input·out = 1` constraint reports the failure.
    Inverse {
        /// the inverted variable
        input: VarIndex,
        /// the computed variable
        out: VarIndex,
    },
    /// `outputs[i]` is the i-th least significant bit of `w[input]`.
    Bits {
        /// the decomposed variable
        input: VarIndex,
        /// one variable per bit, least significant first
        outputs: Vec<VarIndex>,
    },
}

/// The ordered hints recorded while the circuit was declared.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: Scalar")]
pub struct Solver<F> {
    hints: Vec<Hint<F>>,
}

impl<F: Scalar> Solver<F> {
    /// Create an empty program.
    pub fn new() -> Self {
        Solver { hints: vec![] }
    }

    pub(crate) fn push(&mut self, hint: Hint<F>) {
        self.hints.push(hint);
    }

    /// The number of recorded hints.
    pub fn len(&self) -> usize {
        self.hints.len()
    }

    /// Whether no hint has been recorded.
    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    /// Run every hint in declaration order. Inputs must already be in `values`.
    pub fn solve(&self, values: &mut [F]) {
        for hint in self.hints.iter() {
            match hint {
                Hint::Linear {
                    terms,
                    constant,
                    out,
                } => {
                    let mut acc = *constant;
                    for (var, coeff) in terms.iter() {
                        acc.add_assign(&coeff.mul(&values[*var]));
                    }
                    values[*out] = acc;
                }
                Hint::Product {
                    left,
                    right,
                    coeffs,
                    out,
                } => {
                    let l = values[*left];
                    let r = values[*right];
                    values[*out] = coeffs[0].mul(&l)
                        + coeffs[1].mul(&r)
                        + coeffs[2].mul(&l).mul(&r)
                        + coeffs[3];
                }
                Hint::Inverse { input, out } => {
                    values[*out] = values[*input].inv().unwrap_or_else(|_| F::zero());
                }
                Hint::Bits { input, outputs } => {
                    let bits = compute_binary_le::<F>(&values[*input].to_bytes());
                    for (i, out) in outputs.iter().enumerate() {
                        values[*out] = bits.get(i).copied().unwrap_or_else(F::zero);
                    }
                }
            }
        }
    }
}

/// Compute the little-endian binary representation of a value,
/// each bit as a field element.
pub(crate) fn compute_binary_le<F: Scalar>(bytes: &[u8]) -> Vec<F> {
    let mut res = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes.iter() {
        let mut tmp = *byte;
        for _ in 0..8 {
            if (tmp & 1) == 0 {
                res.push(F::zero());
            } else {
                res.push(F::one());
            }
            tmp >>= 1;
        }
    }
    res
}

#[cfg(test)]
mod test {
    use super::{Hint, Solver};
    use zksok_algebra::{bn254::BN254Scalar, prelude::*};

    type F = BN254Scalar;

    #[test]
    fn hints_run_in_order() {
        let mut solver = Solver::<F>::new();
        // w2 = 3·w1 + 1, w3 = w1·w2, w4..w7 = bits of w3
        solver.push(Hint::Linear {
            terms: vec![(1, F::from(3u32))],
            constant: F::one(),
            out: 2,
        });
        solver.push(Hint::Product {
            left: 1,
            right: 2,
            coeffs: [F::zero(), F::zero(), F::one(), F::zero()],
            out: 3,
        });
        solver.push(Hint::Bits {
            input: 3,
            outputs: vec![4, 5, 6, 7, 8, 9],
        });
        assert_eq!(solver.len(), 3);

        let mut values = vec![F::zero(); 10];
        values[0] = F::one();
        values[1] = F::from(2u32);
        solver.solve(&mut values);

        assert_eq!(values[2], F::from(7u32));
        assert_eq!(values[3], F::from(14u32));
        // 14 = 0b001110
        let bits: Vec<F> = [0u32, 1, 1, 1, 0, 0].iter().map(|b| F::from(*b)).collect();
        assert_eq!(&values[4..10], bits.as_slice());
    }

    #[test]
    fn inverse_of_zero_is_left_at_zero() {
        let mut solver = Solver::<F>::new();
        solver.push(Hint::Inverse { input: 1, out: 2 });

        let mut values = vec![F::one(), F::from(5u32), F::zero()];
        solver.solve(&mut values);
        assert_eq!(values[1].mul(&values[2]), F::one());

        let mut values = vec![F::one(), F::zero(), F::from(9u32)];
        solver.solve(&mut values);
        assert!(values[2].is_zero());
    }
}
