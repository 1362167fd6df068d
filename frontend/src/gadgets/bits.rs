use crate::{
    builder::{powers_of_two, CircuitApi},
    errors::Result,
    variable::Variable,
};
use zksok_algebra::prelude::*;

/// A boolean that is either a constrained variable or a value known while compiling.
/// Operations on known values emit no constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bit {
    /// a variable constrained to 0 or 1
    Var(Variable),
    /// a compile-time constant
    Const(bool),
}

impl Bit {
    /// The variable behind this bit, if any.
    pub fn var(&self) -> Option<Variable> {
        match self {
            Bit::Var(v) => Some(*v),
            Bit::Const(_) => None,
        }
    }

    /// Materialize the bit as a variable.
    pub fn to_variable<F: Scalar, A: CircuitApi<F>>(&self, api: &mut A) -> Result<Variable> {
        match self {
            Bit::Var(v) => Ok(*v),
            Bit::Const(true) => Ok(api.one()),
            Bit::Const(false) => api.zero(),
        }
    }
}

/// `a xor b`
pub fn xor<F: Scalar, A: CircuitApi<F>>(api: &mut A, a: Bit, b: Bit) -> Result<Bit> {
    Ok(match (a, b) {
        (Bit::Const(x), Bit::Const(y)) => Bit::Const(x ^ y),
        (Bit::Var(v), Bit::Const(false)) | (Bit::Const(false), Bit::Var(v)) => Bit::Var(v),
        (Bit::Var(v), Bit::Const(true)) | (Bit::Const(true), Bit::Var(v)) => Bit::Var(api.not(v)?),
        (Bit::Var(x), Bit::Var(y)) => Bit::Var(api.xor(x, y)?),
    })
}

/// `a xor b xor c`
pub fn xor3<F: Scalar, A: CircuitApi<F>>(api: &mut A, a: Bit, b: Bit, c: Bit) -> Result<Bit> {
    let ab = xor(api, a, b)?;
    xor(api, ab, c)
}

/// `a and b`
pub fn and<F: Scalar, A: CircuitApi<F>>(api: &mut A, a: Bit, b: Bit) -> Result<Bit> {
    Ok(match (a, b) {
        (Bit::Const(false), _) | (_, Bit::Const(false)) => Bit::Const(false),
        (Bit::Const(true), other) | (other, Bit::Const(true)) => other,
        (Bit::Var(x), Bit::Var(y)) => Bit::Var(api.and(x, y)?),
    })
}

/// `a or b`
pub fn or<F: Scalar, A: CircuitApi<F>>(api: &mut A, a: Bit, b: Bit) -> Result<Bit> {
    Ok(match (a, b) {
        (Bit::Const(true), _) | (_, Bit::Const(true)) => Bit::Const(true),
        (Bit::Const(false), other) | (other, Bit::Const(false)) => other,
        // a + b - a·b
        (Bit::Var(x), Bit::Var(y)) => Bit::Var(api.quadratic(
            x,
            y,
            [F::one(), F::one(), F::one().neg(), F::zero()],
        )?),
    })
}

/// `not a`
pub fn not<F: Scalar, A: CircuitApi<F>>(api: &mut A, a: Bit) -> Result<Bit> {
    Ok(match a {
        Bit::Const(x) => Bit::Const(!x),
        Bit::Var(v) => Bit::Var(api.not(v)?),
    })
}

fn const_bits(value: u64, n_bits: usize) -> Vec<Bit> {
    (0..n_bits).map(|i| Bit::Const((value >> i) & 1 == 1)).collect()
}

fn var_bits(vars: Vec<Variable>) -> Vec<Bit> {
    vars.into_iter().map(Bit::Var).collect()
}

/// A byte: 8 bits, least significant first, and optionally the variable holding their value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uint8 {
    bits: Vec<Bit>,
    packed: Option<Variable>,
}

impl Uint8 {
    /// A byte known while compiling.
    pub fn constant(value: u8) -> Self {
        Uint8 {
            bits: const_bits(u64::from(value), 8),
            packed: None,
        }
    }

    /// Range check `var` to 8 bits and take it as a byte.
    pub fn from_variable<F: Scalar, A: CircuitApi<F>>(api: &mut A, var: Variable) -> Result<Self> {
        let bits = api.to_binary(var, 8)?;
        Ok(Uint8 {
            bits: var_bits(bits),
            packed: Some(var),
        })
    }

    /// The bits, least significant first.
    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }

    /// A variable holding the value of the byte.
    pub fn pack<F: Scalar, A: CircuitApi<F>>(&self, api: &mut A) -> Result<Variable> {
        if let Some(p) = self.packed {
            return Ok(p);
        }
        let mut sum = WordSum::new();
        sum.push_bits(&self.bits, F::one());
        api.linear_combination(&sum.terms, sum.constant)
    }
}

/// A 32-bit word: 32 bits, least significant first, and optionally the variable holding
/// their value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uint32 {
    bits: Vec<Bit>,
    packed: Option<Variable>,
}

impl Uint32 {
    /// A word known while compiling.
    pub fn constant(value: u32) -> Self {
        Uint32 {
            bits: const_bits(u64::from(value), 32),
            packed: None,
        }
    }

    /// Range check `var` to 32 bits and take it as a word.
    pub fn from_variable<F: Scalar, A: CircuitApi<F>>(api: &mut A, var: Variable) -> Result<Self> {
        let bits = api.to_binary(var, 32)?;
        Ok(Uint32 {
            bits: var_bits(bits),
            packed: Some(var),
        })
    }

    /// Assemble a word from four bytes, most significant first.
    pub fn from_be_bytes(bytes: &[Uint8]) -> Self {
        let mut bits = Vec::with_capacity(32);
        for byte in bytes.iter().rev() {
            bits.extend_from_slice(&byte.bits);
        }
        Uint32 { bits, packed: None }
    }

    /// Split the word into four bytes, most significant first.
    pub fn to_be_bytes(&self) -> Vec<Uint8> {
        self.bits
            .chunks(8)
            .rev()
            .map(|chunk| Uint8 {
                bits: chunk.to_vec(),
                packed: None,
            })
            .collect()
    }

    /// The bits, least significant first.
    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }

    /// The variable holding the value of the word, if one was computed.
    pub fn packed(&self) -> Option<Variable> {
        self.packed
    }

    /// Rotate right by `n` positions.
    pub fn rotr(&self, n: usize) -> Self {
        let bits = (0..32).map(|i| self.bits[(i + n) % 32]).collect();
        Uint32 { bits, packed: None }
    }

    /// Shift right by `n` positions.
    pub fn shr(&self, n: usize) -> Self {
        let bits = (0..32)
            .map(|i| self.bits.get(i + n).copied().unwrap_or(Bit::Const(false)))
            .collect();
        Uint32 { bits, packed: None }
    }

    fn bitwise<F, A, O>(&self, api: &mut A, other: &Self, op: O) -> Result<Self>
    where
        F: Scalar,
        A: CircuitApi<F>,
        O: Fn(&mut A, Bit, Bit) -> Result<Bit>,
    {
        let bits = self
            .bits
            .iter()
            .zip(other.bits.iter())
            .map(|(a, b)| op(api, *a, *b))
            .collect::<Result<Vec<Bit>>>()?;
        Ok(Uint32 { bits, packed: None })
    }

    /// Bitwise xor.
    pub fn xor<F: Scalar, A: CircuitApi<F>>(&self, api: &mut A, other: &Self) -> Result<Self> {
        self.bitwise(api, other, xor)
    }

    /// Bitwise xor of three words.
    pub fn xor3<F: Scalar, A: CircuitApi<F>>(
        &self,
        api: &mut A,
        b: &Self,
        c: &Self,
    ) -> Result<Self> {
        let bits = (0..32)
            .map(|i| xor3(api, self.bits[i], b.bits[i], c.bits[i]))
            .collect::<Result<Vec<Bit>>>()?;
        Ok(Uint32 { bits, packed: None })
    }

    /// Bitwise and.
    pub fn and<F: Scalar, A: CircuitApi<F>>(&self, api: &mut A, other: &Self) -> Result<Self> {
        self.bitwise(api, other, and)
    }

    /// Bitwise not.
    pub fn not<F: Scalar, A: CircuitApi<F>>(&self, api: &mut A) -> Result<Self> {
        let bits = self
            .bits
            .iter()
            .map(|b| not(api, *b))
            .collect::<Result<Vec<Bit>>>()?;
        Ok(Uint32 { bits, packed: None })
    }

    /// Whether every bit is a variable.
    pub fn is_variable(&self) -> bool {
        self.bits.iter().all(|b| b.var().is_some())
    }

    /// Sum of words modulo 2^32.
    pub fn add_mod<F: Scalar, A: CircuitApi<F>>(api: &mut A, words: &[&Uint32]) -> Result<Self> {
        let mut sum = WordSum::new();
        for w in words {
            sum.add_word(w);
        }
        sum.reduce(api)
    }
}

/// An integer-valued linear expression over bits and words, reduced to a word
/// modulo 2^32 by [`WordSum::reduce`].
///
/// `bound` is an upper bound on the integer value of the expression; it decides how many
/// bits the reduction decomposes into.
#[derive(Clone, Debug)]
pub struct WordSum<F> {
    terms: Vec<(Variable, F)>,
    constant: F,
    bound: u64,
}

impl<F: Scalar> Default for WordSum<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Scalar> WordSum<F> {
    /// The empty sum.
    pub fn new() -> Self {
        WordSum {
            terms: vec![],
            constant: F::zero(),
            bound: 0,
        }
    }

    /// Add a word.
    pub fn add_word(&mut self, word: &Uint32) -> &mut Self {
        self.push_word(word, F::one());
        self.widen(u64::from(u32::MAX));
        self
    }

    /// Add a constant.
    pub fn add_constant(&mut self, value: u32) -> &mut Self {
        self.constant.add_assign(&F::from(value));
        self.widen(u64::from(value));
        self
    }

    /// Add `scale·word` without touching the bound.
    pub(crate) fn push_word(&mut self, word: &Uint32, scale: F) {
        match word.packed {
            Some(p) => self.terms.push((p, scale)),
            None => self.push_bits(&word.bits, scale),
        }
    }

    /// Add `scale·Σ 2^i·bits[i]` without touching the bound.
    pub(crate) fn push_bits(&mut self, bits: &[Bit], scale: F) {
        for (bit, weight) in bits.iter().zip(powers_of_two::<F>(bits.len())) {
            self.push_bit(*bit, weight.mul(&scale));
        }
    }

    /// Add `weight·bit` without touching the bound.
    pub(crate) fn push_bit(&mut self, bit: Bit, weight: F) {
        match bit {
            Bit::Var(v) => self.terms.push((v, weight)),
            Bit::Const(true) => self.constant.add_assign(&weight),
            Bit::Const(false) => {}
        }
    }

    /// Raise the bound by `bound`.
    pub(crate) fn widen(&mut self, bound: u64) {
        self.bound = self.bound.saturating_add(bound);
    }

    /// Constrain the sum, decompose it and keep the low 32 bits.
    pub fn reduce<A: CircuitApi<F>>(self, api: &mut A) -> Result<Uint32> {
        if self.terms.is_empty() {
            let bytes = self.constant.to_bytes();
            return Ok(Uint32::constant(u8_le_slice_to_u32(&bytes[..4])));
        }
        let width = (64 - self.bound.leading_zeros() as usize).max(32);
        let sum = api.linear_combination(&self.terms, self.constant)?;
        let bits = api.to_binary(sum, width)?;

        let packed = if width > 32 {
            let mut low = vec![(sum, F::one())];
            for (bit, weight) in bits
                .iter()
                .zip(powers_of_two::<F>(width))
                .skip(32)
            {
                low.push((*bit, weight.neg()));
            }
            api.linear_combination(&low, F::zero())?
        } else {
            sum
        };

        Ok(Uint32 {
            bits: var_bits(bits[..32].to_vec()),
            packed: Some(packed),
        })
    }
}

#[cfg(test)]
mod test {
    use super::{Bit, Uint32, Uint8, WordSum};
    use crate::{
        builder::{Builder, CircuitApi},
        constraint::ConstraintForm,
        witness::Assignment,
    };
    use zksok_algebra::{bn254::BN254Scalar, prelude::*};

    type F = BN254Scalar;

    fn word_value(bits: &[Bit], witness: &[F]) -> u64 {
        bits.iter().enumerate().fold(0, |acc, (i, b)| {
            let set = match b {
                Bit::Const(v) => *v,
                Bit::Var(v) => witness[v.index()].is_one(),
            };
            acc | (u64::from(set) << i)
        })
    }

    #[test]
    fn word_operations() {
        let x_val = 0xdead_beefu32;
        let y_val = 0x8765_4321u32;
        for form in [ConstraintForm::R1cs, ConstraintForm::Sparse] {
            let mut api = Builder::<F>::new(form);
            let xv = api.declare_secret("x").unwrap();
            let yv = api.declare_secret("y").unwrap();
            let x = Uint32::from_variable(&mut api, xv).unwrap();
            let y = Uint32::from_variable(&mut api, yv).unwrap();
            let k = Uint32::constant(0xffff_0000);

            let xor = x.xor(&mut api, &y).unwrap();
            let and = x.and(&mut api, &k).unwrap();
            let not = y.not(&mut api).unwrap();
            let rot = x.rotr(7);
            let shr = x.shr(10);
            let mixed = x.xor3(&mut api, &y, &k).unwrap();
            let sum = Uint32::add_mod(&mut api, &[&x, &y, &k]).unwrap();
            let mut with_constant = WordSum::new();
            with_constant.add_word(&x).add_constant(0x2000_0000);
            let sum_k = with_constant.reduce(&mut api).unwrap();
            let sum_k_packed = sum_k.packed().unwrap();
            let cs = api.finish();

            let mut asg = Assignment::new();
            asg.assign_u64("x", u64::from(x_val))
                .assign_u64("y", u64::from(y_val));
            let w = cs.expand(&asg).unwrap().full.0;

            assert_eq!(word_value(xor.bits(), &w), u64::from(x_val ^ y_val));
            assert_eq!(word_value(and.bits(), &w), u64::from(x_val & 0xffff_0000));
            assert_eq!(word_value(not.bits(), &w), u64::from(!y_val));
            assert_eq!(word_value(rot.bits(), &w), u64::from(x_val.rotate_right(7)));
            assert_eq!(word_value(shr.bits(), &w), u64::from(x_val >> 10));
            assert_eq!(
                word_value(mixed.bits(), &w),
                u64::from(x_val ^ y_val ^ 0xffff_0000)
            );
            let expected = x_val.wrapping_add(y_val).wrapping_add(0xffff_0000);
            assert_eq!(word_value(sum.bits(), &w), u64::from(expected));
            let expected_k = x_val.wrapping_add(0x2000_0000);
            assert_eq!(word_value(sum_k.bits(), &w), u64::from(expected_k));
            assert_eq!(w[sum_k_packed.index()], F::from(expected_k));
        }
    }

    #[test]
    fn constants_fold() {
        let mut api = Builder::<F>::new(ConstraintForm::Sparse);
        let a = Uint32::constant(0x0f0f_0f0f);
        let b = Uint32::constant(0x00ff_00ff);
        let before = api.form();
        let x = a.xor(&mut api, &b).unwrap();
        let s = Uint32::add_mod(&mut api, &[&a, &b]).unwrap();
        let cs = api.finish();
        assert_eq!(before, ConstraintForm::Sparse);
        // only the gate pinning the constant one wire
        assert_eq!(cs.num_constraints(), 1);
        assert_eq!(x, Uint32::constant(0x0f0f_0f0f ^ 0x00ff_00ff));
        assert_eq!(s, Uint32::constant(0x0f0f_0f0fu32.wrapping_add(0x00ff_00ff)));
    }

    #[test]
    fn bytes_and_words() {
        let mut api = Builder::<F>::new(ConstraintForm::R1cs);
        let vars: Vec<_> = (0..4)
            .map(|i| api.declare_secret(&format!("b{}", i)).unwrap())
            .collect();
        let bytes: Vec<Uint8> = vars
            .iter()
            .map(|v| Uint8::from_variable(&mut api, *v).unwrap())
            .collect();
        let word = Uint32::from_be_bytes(&bytes);
        let back = word.to_be_bytes();
        let packed = back[1].pack(&mut api).unwrap();
        let c = Uint8::constant(0xa5).pack(&mut api).unwrap();
        let cs = api.finish();

        let mut asg = Assignment::new();
        for (i, b) in [0x12u64, 0x34, 0x56, 0x78].iter().enumerate() {
            asg.assign_u64(&format!("b{}", i), *b);
        }
        let w = cs.expand(&asg).unwrap().full.0;
        assert_eq!(word_value(word.bits(), &w), 0x1234_5678);
        assert_eq!(w[packed.index()], F::from(0x34u32));
        assert_eq!(w[c.index()], F::from(0xa5u32));

        asg.assign_u64("b2", 256);
        assert!(cs.expand(&asg).is_err());
    }
}
