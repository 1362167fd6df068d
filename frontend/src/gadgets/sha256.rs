use crate::{
    builder::CircuitApi,
    errors::Result,
    gadgets::bits::{and, or, xor, Bit, Uint32, Uint8, WordSum},
};
use zksok_algebra::prelude::*;

const ROUND_CONSTANTS: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

const INITIAL_STATE: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// The length of a digest in bytes.
pub const DIGEST_LEN: usize = 32;

fn big_sigma0<F: Scalar, A: CircuitApi<F>>(api: &mut A, x: &Uint32) -> Result<Uint32> {
    x.rotr(2).xor3(api, &x.rotr(13), &x.rotr(22))
}

fn big_sigma1<F: Scalar, A: CircuitApi<F>>(api: &mut A, x: &Uint32) -> Result<Uint32> {
    x.rotr(6).xor3(api, &x.rotr(11), &x.rotr(25))
}

fn small_sigma0<F: Scalar, A: CircuitApi<F>>(api: &mut A, x: &Uint32) -> Result<Uint32> {
    x.rotr(7).xor3(api, &x.rotr(18), &x.shr(3))
}

fn small_sigma1<F: Scalar, A: CircuitApi<F>>(api: &mut A, x: &Uint32) -> Result<Uint32> {
    x.rotr(17).xor3(api, &x.rotr(19), &x.shr(10))
}

/// Add `ch(e, f, g) = (e and f) xor (not e and g)` to `sum`.
///
/// Per bit this is `g + e·(f - g)`, which takes at most two constraints.
fn ch<F: Scalar, A: CircuitApi<F>>(
    api: &mut A,
    e: &Uint32,
    f: &Uint32,
    g: &Uint32,
    sum: &mut WordSum<F>,
) -> Result<()> {
    let mut weight = F::one();
    let two = F::from(2u32);
    for i in 0..32 {
        match (e.bits()[i], f.bits()[i], g.bits()[i]) {
            (Bit::Const(true), fb, _) => sum.push_bit(fb, weight),
            (Bit::Const(false), _, gb) => sum.push_bit(gb, weight),
            (Bit::Var(ev), Bit::Const(fc), Bit::Const(gc)) => match (fc, gc) {
                (true, true) => sum.push_bit(Bit::Const(true), weight),
                (false, false) => {}
                (true, false) => sum.push_bit(Bit::Var(ev), weight),
                (false, true) => {
                    sum.push_bit(Bit::Var(ev), weight.neg());
                    sum.push_bit(Bit::Const(true), weight);
                }
            },
            (Bit::Var(ev), Bit::Var(fv), Bit::Const(gc)) => {
                let m = api.mul(ev, fv)?;
                sum.push_bit(Bit::Var(m), weight);
                if gc {
                    sum.push_bit(Bit::Var(ev), weight.neg());
                    sum.push_bit(Bit::Const(true), weight);
                }
            }
            (Bit::Var(ev), Bit::Const(fc), Bit::Var(gv)) => {
                let q_l = if fc { F::one() } else { F::zero() };
                let out = api.quadratic(ev, gv, [q_l, F::one(), F::one().neg(), F::zero()])?;
                sum.push_bit(Bit::Var(out), weight);
            }
            (Bit::Var(ev), Bit::Var(fv), Bit::Var(gv)) => {
                let d = api.sub(fv, gv)?;
                let m = api.mul(ev, d)?;
                sum.push_bit(Bit::Var(m), weight);
                sum.push_bit(Bit::Var(gv), weight);
            }
        }
        weight = weight.mul(&two);
    }
    sum.widen(u64::from(u32::MAX));
    Ok(())
}

fn maj_bit<F: Scalar, A: CircuitApi<F>>(api: &mut A, a: Bit, b: Bit, c: Bit) -> Result<Bit> {
    match (a, b, c) {
        (Bit::Const(k), x, y) | (x, Bit::Const(k), y) | (x, y, Bit::Const(k)) => {
            if k {
                or(api, x, y)
            } else {
                and(api, x, y)
            }
        }
        _ => {
            // a·b and c·(a xor b) never hold together
            let ab = and(api, a, b)?;
            let x = xor(api, a, b)?;
            let cx = and(api, c, x)?;
            or(api, ab, cx)
        }
    }
}

/// Add `maj(a, b, c)` to `sum`.
fn maj<F: Scalar, A: CircuitApi<F>>(
    api: &mut A,
    a: &Uint32,
    b: &Uint32,
    c: &Uint32,
    sum: &mut WordSum<F>,
) -> Result<()> {
    if a.is_variable() && b.is_variable() && c.is_variable() {
        // a + b + c = 2·maj + parity, bit by bit
        let parity = a.xor3(api, b, c)?;
        let half = F::from(2u32).inv()?;
        sum.push_word(a, half);
        sum.push_word(b, half);
        sum.push_word(c, half);
        sum.push_bits(parity.bits(), half.neg());
    } else {
        let bits = (0..32)
            .map(|i| maj_bit(api, a.bits()[i], b.bits()[i], c.bits()[i]))
            .collect::<Result<Vec<Bit>>>()?;
        sum.push_bits(&bits, F::one());
    }
    sum.widen(u64::from(u32::MAX));
    Ok(())
}

/// Pad a message to a multiple of 64 bytes: `0x80`, zeros, then the bit length as a
/// big-endian u64.
pub fn pad(input: &[Uint8]) -> Vec<Uint8> {
    let mut padded = input.to_vec();
    padded.push(Uint8::constant(0x80));
    while padded.len() % 64 != 56 {
        padded.push(Uint8::constant(0));
    }
    let bit_len = (input.len() as u64).wrapping_mul(8);
    padded.extend(bit_len.to_be_bytes().iter().map(|b| Uint8::constant(*b)));
    padded
}

/// Apply the compression function to one block of 16 words.
pub fn compress<F: Scalar, A: CircuitApi<F>>(
    api: &mut A,
    state: &[Uint32],
    block: &[Uint32],
) -> Result<Vec<Uint32>> {
    let mut w = block.to_vec();
    for t in 16..64 {
        let s1 = small_sigma1(api, &w[t - 2])?;
        let s0 = small_sigma0(api, &w[t - 15])?;
        let mut sum = WordSum::new();
        sum.add_word(&s1)
            .add_word(&w[t - 7])
            .add_word(&s0)
            .add_word(&w[t - 16]);
        let next = sum.reduce(api)?;
        w.push(next);
    }

    let mut a = state[0].clone();
    let mut b = state[1].clone();
    let mut c = state[2].clone();
    let mut d = state[3].clone();
    let mut e = state[4].clone();
    let mut f = state[5].clone();
    let mut g = state[6].clone();
    let mut h = state[7].clone();

    for t in 0..64 {
        let s1 = big_sigma1(api, &e)?;
        let mut t1 = WordSum::new();
        t1.add_word(&h).add_word(&s1);
        ch(api, &e, &f, &g, &mut t1)?;
        t1.add_constant(ROUND_CONSTANTS[t]).add_word(&w[t]);
        let t1 = t1.reduce(api)?;

        let s0 = big_sigma0(api, &a)?;
        let mut t2 = WordSum::new();
        t2.add_word(&t1).add_word(&s0);
        maj(api, &a, &b, &c, &mut t2)?;

        let mut new_e = WordSum::new();
        new_e.add_word(&d).add_word(&t1);
        let new_e = new_e.reduce(api)?;
        let new_a = t2.reduce(api)?;

        h = g;
        g = f;
        f = e;
        e = new_e;
        d = c;
        c = b;
        b = a;
        a = new_a;
    }

    [a, b, c, d, e, f, g, h]
        .iter()
        .zip(state.iter())
        .map(|(x, s)| Uint32::add_mod(api, &[s, x]))
        .collect()
}

/// Hash a byte string. Returns the 32 digest bytes.
pub fn sha256<F: Scalar, A: CircuitApi<F>>(api: &mut A, input: &[Uint8]) -> Result<Vec<Uint8>> {
    let padded = pad(input);
    let mut state: Vec<Uint32> = INITIAL_STATE.iter().map(|h| Uint32::constant(*h)).collect();
    for block in padded.chunks(64) {
        let words: Vec<Uint32> = block.chunks(4).map(Uint32::from_be_bytes).collect();
        state = compress(api, &state, &words)?;
    }
    Ok(state.iter().flat_map(|w| w.to_be_bytes()).collect())
}

#[cfg(test)]
mod test {
    use super::{pad, sha256, DIGEST_LEN};
    use crate::{
        builder::{Builder, CircuitApi},
        constraint::{ConstraintForm, ConstraintSystem},
        gadgets::bits::Uint8,
        variable::Variable,
        witness::Assignment,
    };
    use sha2::{Digest, Sha256};
    use zksok_algebra::{bn254::BN254Scalar, prelude::*};

    type F = BN254Scalar;

    fn hash_circuit(len: usize, form: ConstraintForm) -> (ConstraintSystem<F>, Vec<Variable>) {
        let mut api = Builder::<F>::new(form);
        let mut input = vec![];
        for i in 0..len {
            let v = api.declare_secret(&format!("In[{}]", i)).unwrap();
            input.push(Uint8::from_variable(&mut api, v).unwrap());
        }
        let digest = sha256(&mut api, &input).unwrap();
        let out = digest.iter().map(|b| b.pack(&mut api).unwrap()).collect();
        (api.finish(), out)
    }

    fn check_digest(msg: &[u8], form: ConstraintForm) {
        let (cs, out) = hash_circuit(msg.len(), form);
        let mut asg = Assignment::new();
        asg.assign_bytes("In", msg);
        let w = cs.expand(&asg).unwrap().full.0;
        let expected = Sha256::digest(msg);
        assert_eq!(out.len(), DIGEST_LEN);
        for (var, byte) in out.iter().zip(expected.iter()) {
            assert_eq!(w[var.index()], F::from(u32::from(*byte)));
        }
    }

    #[test]
    fn padding_lengths() {
        assert_eq!(pad(&[]).len(), 64);
        assert_eq!(pad(&vec![Uint8::constant(0); 55]).len(), 64);
        assert_eq!(pad(&vec![Uint8::constant(0); 56]).len(), 128);
        let padded = pad(&vec![Uint8::constant(7); 6]);
        assert_eq!(padded[6], Uint8::constant(0x80));
        assert_eq!(padded[63], Uint8::constant(48));
    }

    #[test]
    fn matches_reference_digest() {
        check_digest(b"hudaqi", ConstraintForm::R1cs);
        check_digest(b"hudaqi", ConstraintForm::Sparse);
    }

    #[test]
    fn matches_reference_digest_over_two_blocks() {
        let msg: Vec<u8> = (0u8..70).collect();
        check_digest(&msg, ConstraintForm::R1cs);
    }

    #[test]
    fn empty_message() {
        check_digest(b"", ConstraintForm::Sparse);
    }

    #[test]
    fn fits_the_proving_domain() {
        let (cs, _) = hash_circuit(6, ConstraintForm::Sparse);
        assert!(cs.num_constraints() < 1 << 17);
        let (r1cs, _) = hash_circuit(6, ConstraintForm::R1cs);
        assert!(r1cs.num_constraints() < cs.num_constraints());
    }
}
