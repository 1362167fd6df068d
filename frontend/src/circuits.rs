use crate::{
    builder::{Circuit, CircuitApi},
    errors::Result,
    gadgets::{
        bits::Uint8,
        range::range_check,
        sha256::{sha256, DIGEST_LEN},
    },
    witness::Assignment,
};
use zksok_algebra::prelude::*;

/// `y == x³ + x + 1` with `x` secret and `y` public.
#[derive(Copy, Clone, Debug, Default)]
pub struct CubicCircuit;

impl CubicCircuit {
    /// Inputs `x` and `y`.
    pub fn assignment<F: Scalar>(x: u64, y: u64) -> Assignment<F> {
        let mut asg = Assignment::new();
        asg.assign_u64("x", x).assign_u64("y", y);
        asg
    }
}

impl<F: Scalar> Circuit<F> for CubicCircuit {
    fn define<A: CircuitApi<F>>(&self, api: &mut A) -> Result<()> {
        let x = api.declare_secret("x")?;
        let y = api.declare_public("y")?;
        let x2 = api.mul(x, x)?;
        let x3 = api.mul(x2, x)?;
        let rhs = api.linear_combination(&[(x3, F::one()), (x, F::one())], F::one())?;
        api.assert_equal(y, rhs)
    }
}

/// `V < 2^bits` with `V` secret.
#[derive(Copy, Clone, Debug)]
pub struct RangeCircuit {
    /// the width of the range
    pub bits: usize,
}

impl RangeCircuit {
    /// Input `V`.
    pub fn assignment<F: Scalar>(value: u64) -> Assignment<F> {
        let mut asg = Assignment::new();
        asg.assign_u64("V", value);
        asg
    }
}

impl<F: Scalar> Circuit<F> for RangeCircuit {
    fn define<A: CircuitApi<F>>(&self, api: &mut A) -> Result<()> {
        let v = api.declare_secret("V")?;
        range_check(api, v, self.bits)?;
        Ok(())
    }
}

/// `SHA-256(In) == Expected`, with the `input_len` bytes `In[i]` secret and the
/// 32 bytes `Expected[i]` public.
#[derive(Copy, Clone, Debug)]
pub struct Sha256Circuit {
    /// the length of the preimage in bytes
    pub input_len: usize,
}

impl Sha256Circuit {
    /// Inputs `In[i]` and `Expected[i]`.
    pub fn assignment<F: Scalar>(preimage: &[u8], digest: &[u8]) -> Assignment<F> {
        let mut asg = Assignment::new();
        asg.assign_bytes("In", preimage).assign_bytes("Expected", digest);
        asg
    }
}

impl<F: Scalar> Circuit<F> for Sha256Circuit {
    fn define<A: CircuitApi<F>>(&self, api: &mut A) -> Result<()> {
        let mut expected = Vec::with_capacity(DIGEST_LEN);
        for i in 0..DIGEST_LEN {
            expected.push(api.declare_public(&format!("Expected[{}]", i))?);
        }
        let mut input = Vec::with_capacity(self.input_len);
        for i in 0..self.input_len {
            let byte = api.declare_secret(&format!("In[{}]", i))?;
            input.push(Uint8::from_variable(api, byte)?);
        }

        let digest = sha256(api, &input)?;
        for (byte, exp) in digest.iter().zip(expected) {
            let packed = byte.pack(api)?;
            api.assert_equal(packed, exp)?;
        }
        Ok(())
    }
}
