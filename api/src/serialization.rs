//! Canonical binary encoding of everything the pipeline hands out.
//!
//! Scalars are 32 bytes little-endian, G1 points 32 bytes and G2 points 64 bytes compressed,
//! and every sequence carries a little-endian `u32` length prefix. Values that exist for both
//! backends start with a tag byte, `0` for Groth16 and `1` for PLONK.
use crate::{
    errors::{Result, ZkError},
    pipeline::Proof,
    setup::{Kzg, PlonkProverKey, PlonkVerifierKey, ProvingKey, Srs, VerifyingKey},
};
use zksok_algebra::{
    bn254::{BN254PairingEngine, BN254Scalar, BN254G1, BN254G2},
    prelude::*,
    serialization::obj_serde::BytesVisitor,
    utils::b64enc,
};
use zksok_frontend::{FullWitness, PublicWitness};
use zksok_groth16::{Groth16Proof, Groth16ProvingKey, Groth16VerifyingKey};
use zksok_plonk::{
    plonk::indexer::{PlonkPf, PlonkProof, PlonkProverParams, PlonkVK, PlonkVerifierParams},
    poly_commit::{field_polynomial::FpPolynomial, kzg_poly_com::KZGCommitment},
};

/// The tag of Groth16 values.
pub const GROTH16_TAG: u8 = 0;
/// The tag of PLONK values.
pub const PLONK_TAG: u8 = 1;

const SCALAR_LEN: usize = 32;

/// Types with a canonical byte encoding.
pub trait CanonicalEncode {
    /// Append the encoding to `out`.
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()>;

    /// The number of bytes [`CanonicalEncode::encode_into`] writes.
    fn encoded_len(&self) -> Result<usize> {
        Ok(self.to_canonical_bytes()?.len())
    }

    /// The encoding in a buffer of its own.
    fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        let mut out = vec![];
        self.encode_into(&mut out)?;
        Ok(out)
    }
}

/// Types that can be read back from their canonical encoding.
pub trait CanonicalDecode: Sized {
    /// Read one value off the front of `bytes`, advancing it.
    fn decode_from(bytes: &mut &[u8]) -> Result<Self>;

    /// Decode a value that spans all of `bytes`.
    fn from_canonical_bytes(bytes: &[u8]) -> Result<Self> {
        let mut rest = bytes;
        let value = Self::decode_from(&mut rest)?;
        if !rest.is_empty() {
            return Err(ZkError::DeserializationError);
        }
        Ok(value)
    }
}

fn take<'a>(bytes: &mut &'a [u8], n: usize) -> Result<&'a [u8]> {
    if bytes.len() < n {
        return Err(ZkError::DeserializationError);
    }
    let (head, tail) = bytes.split_at(n);
    *bytes = tail;
    Ok(head)
}

fn read_tag(bytes: &mut &[u8]) -> Result<u8> {
    Ok(take(bytes, 1)?[0])
}

fn read_prefixed<'a>(bytes: &mut &'a [u8]) -> Result<&'a [u8]> {
    let (payload, rest) = read_length_prefixed(*bytes)?;
    *bytes = rest;
    Ok(payload)
}

impl CanonicalEncode for usize {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        let v = u32::try_from(*self).map_err(|_| AlgebraError::SerializationError)?;
        out.extend_from_slice(&v.to_le_bytes());
        Ok(())
    }
}

impl CanonicalDecode for usize {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        Ok(u8_le_slice_to_u32(take(bytes, 4)?) as usize)
    }
}

impl CanonicalEncode for BN254Scalar {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend(self.to_bytes());
        Ok(())
    }
}

impl CanonicalDecode for BN254Scalar {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        Ok(<BN254Scalar as Scalar>::from_canonical_bytes(
            take(bytes, SCALAR_LEN)?,
        )?)
    }
}

macro_rules! canonical_point {
    ($g:ident) => {
        impl CanonicalEncode for $g {
            fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
                out.extend(self.to_compressed_bytes());
                Ok(())
            }
        }

        impl CanonicalDecode for $g {
            fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
                Ok($g::from_compressed_bytes(take(bytes, $g::COMPRESSED_LEN)?)?)
            }
        }
    };
}

canonical_point!(BN254G1);
canonical_point!(BN254G2);

impl<T: CanonicalEncode> CanonicalEncode for [T] {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        self.len().encode_into(out)?;
        for item in self {
            item.encode_into(out)?;
        }
        Ok(())
    }
}

impl<T: CanonicalEncode> CanonicalEncode for Vec<T> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        self.as_slice().encode_into(out)
    }
}

impl<T: CanonicalDecode> CanonicalDecode for Vec<T> {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        let len = usize::decode_from(bytes)?;
        // every element takes at least one byte
        let mut items = Vec::with_capacity(len.min(bytes.len()));
        for _ in 0..len {
            items.push(T::decode_from(bytes)?);
        }
        Ok(items)
    }
}

impl CanonicalEncode for KZGCommitment<BN254G1> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        self.0.encode_into(out)
    }
}

impl CanonicalDecode for KZGCommitment<BN254G1> {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        Ok(KZGCommitment(BN254G1::decode_from(bytes)?))
    }
}

impl CanonicalEncode for FpPolynomial<BN254Scalar> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        self.get_coefs_ref().encode_into(out)
    }
}

impl CanonicalDecode for FpPolynomial<BN254Scalar> {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        Ok(FpPolynomial::from_coefs(Vec::decode_from(bytes)?))
    }
}

impl CanonicalEncode for Kzg {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend(self.to_compressed_bytes()?);
        Ok(())
    }
}

impl CanonicalDecode for Kzg {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        let (kzg, rest) = Kzg::from_compressed_bytes(*bytes)?;
        *bytes = rest;
        Ok(kzg)
    }
}

impl CanonicalEncode for Srs {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        self.kzg.encode_into(out)?;
        self.lagrange.encode_into(out)
    }
}

impl CanonicalDecode for Srs {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        let kzg = Kzg::decode_from(bytes)?;
        let lagrange = Kzg::decode_from(bytes)?;
        Srs::from_parts(kzg, lagrange)
    }
}

impl CanonicalEncode for PlonkVK<Kzg> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        self.cm_q_vec.encode_into(out)?;
        self.cm_s_vec.encode_into(out)?;
        self.k.encode_into(out)?;
        self.cs_size.encode_into(out)?;
        self.public_vars_constraint_indices.encode_into(out)?;
        self.lagrange_constants.encode_into(out)
    }
}

impl CanonicalDecode for PlonkVK<Kzg> {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        Ok(PlonkVerifierParams {
            cm_q_vec: Vec::decode_from(bytes)?,
            cm_s_vec: Vec::decode_from(bytes)?,
            k: Vec::decode_from(bytes)?,
            cs_size: usize::decode_from(bytes)?,
            public_vars_constraint_indices: Vec::decode_from(bytes)?,
            lagrange_constants: Vec::decode_from(bytes)?,
        })
    }
}

impl CanonicalEncode for PlonkPf<Kzg> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        self.cm_w_vec.encode_into(out)?;
        self.cm_t_vec.encode_into(out)?;
        self.cm_z.encode_into(out)?;
        self.w_polys_eval_zeta.encode_into(out)?;
        self.s_polys_eval_zeta.encode_into(out)?;
        self.z_eval_zeta_omega.encode_into(out)?;
        self.opening_witness_zeta.encode_into(out)?;
        self.opening_witness_zeta_omega.encode_into(out)
    }
}

impl CanonicalDecode for PlonkPf<Kzg> {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        Ok(PlonkProof {
            cm_w_vec: Vec::decode_from(bytes)?,
            cm_t_vec: Vec::decode_from(bytes)?,
            cm_z: KZGCommitment::decode_from(bytes)?,
            w_polys_eval_zeta: Vec::decode_from(bytes)?,
            s_polys_eval_zeta: Vec::decode_from(bytes)?,
            z_eval_zeta_omega: BN254Scalar::decode_from(bytes)?,
            opening_witness_zeta: KZGCommitment::decode_from(bytes)?,
            opening_witness_zeta_omega: KZGCommitment::decode_from(bytes)?,
        })
    }
}

impl CanonicalEncode for PlonkProverKey {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        self.kzg.encode_into(out)?;
        match &self.lagrange {
            Some(lagrange) => {
                out.push(1);
                lagrange.encode_into(out)?;
            }
            None => out.push(0),
        }
        // the coset evaluations are recomputed on decoding
        self.params.q_polys.encode_into(out)?;
        self.params.s_polys.encode_into(out)?;
        self.params.verifier_params.encode_into(out)
    }
}

impl CanonicalDecode for PlonkProverKey {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        let kzg = Kzg::decode_from(bytes)?;
        let lagrange = match read_tag(bytes)? {
            0 => None,
            1 => Some(Kzg::decode_from(bytes)?),
            _ => return Err(ZkError::DeserializationError),
        };
        let q_polys: Vec<FpPolynomial<BN254Scalar>> = Vec::decode_from(bytes)?;
        let s_polys: Vec<FpPolynomial<BN254Scalar>> = Vec::decode_from(bytes)?;
        let verifier_params = PlonkVK::<Kzg>::decode_from(bytes)?;
        if q_polys.len() != verifier_params.cm_q_vec.len()
            || s_polys.len() != verifier_params.cm_s_vec.len()
        {
            return Err(ZkError::DeserializationError);
        }
        let params = PlonkProverParams::precompute(q_polys, s_polys, verifier_params)
            .map_err(|_| ZkError::DeserializationError)?;
        Ok(PlonkProverKey {
            kzg,
            lagrange,
            params,
        })
    }
}

impl CanonicalEncode for PlonkVerifierKey {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        self.kzg.encode_into(out)?;
        self.params.encode_into(out)
    }
}

impl CanonicalDecode for PlonkVerifierKey {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        Ok(PlonkVerifierKey {
            kzg: Kzg::decode_from(bytes)?,
            params: PlonkVK::<Kzg>::decode_from(bytes)?,
        })
    }
}

impl CanonicalEncode for Groth16ProvingKey<BN254PairingEngine> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        Ok(write_length_prefixed(out, &self.to_bytes()?)?)
    }
}

impl CanonicalDecode for Groth16ProvingKey<BN254PairingEngine> {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        Ok(Groth16ProvingKey::from_bytes(read_prefixed(bytes)?)?)
    }
}

impl CanonicalEncode for Groth16VerifyingKey<BN254PairingEngine> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        Ok(write_length_prefixed(out, &self.to_bytes()?)?)
    }
}

impl CanonicalDecode for Groth16VerifyingKey<BN254PairingEngine> {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        Ok(Groth16VerifyingKey::from_bytes(read_prefixed(bytes)?)?)
    }
}

impl CanonicalEncode for Groth16Proof<BN254PairingEngine> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend(self.to_bytes());
        Ok(())
    }
}

impl CanonicalDecode for Groth16Proof<BN254PairingEngine> {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        let body = take(bytes, Groth16Proof::<BN254PairingEngine>::encoded_len())?;
        Ok(Groth16Proof::from_bytes(body)?)
    }
}

impl CanonicalEncode for ProvingKey {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            ProvingKey::Groth16(pk) => {
                out.push(GROTH16_TAG);
                pk.encode_into(out)
            }
            ProvingKey::Plonk(pk) => {
                out.push(PLONK_TAG);
                pk.encode_into(out)
            }
        }
    }
}

impl CanonicalDecode for ProvingKey {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        match read_tag(bytes)? {
            GROTH16_TAG => Ok(ProvingKey::Groth16(Groth16ProvingKey::decode_from(bytes)?)),
            PLONK_TAG => Ok(ProvingKey::Plonk(PlonkProverKey::decode_from(bytes)?)),
            _ => Err(ZkError::DeserializationError),
        }
    }
}

impl CanonicalEncode for VerifyingKey {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            VerifyingKey::Groth16(vk) => {
                out.push(GROTH16_TAG);
                vk.encode_into(out)
            }
            VerifyingKey::Plonk(vk) => {
                out.push(PLONK_TAG);
                vk.encode_into(out)
            }
        }
    }
}

impl CanonicalDecode for VerifyingKey {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        match read_tag(bytes)? {
            GROTH16_TAG => Ok(VerifyingKey::Groth16(Groth16VerifyingKey::decode_from(
                bytes,
            )?)),
            PLONK_TAG => Ok(VerifyingKey::Plonk(PlonkVerifierKey::decode_from(bytes)?)),
            _ => Err(ZkError::DeserializationError),
        }
    }
}

impl CanonicalEncode for Proof {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Proof::Groth16(proof) => {
                out.push(GROTH16_TAG);
                proof.encode_into(out)
            }
            Proof::Plonk(proof) => {
                out.push(PLONK_TAG);
                proof.encode_into(out)
            }
        }
    }
}

impl CanonicalDecode for Proof {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        let proof = match read_tag(bytes)? {
            GROTH16_TAG => Groth16Proof::decode_from(bytes).map(Proof::Groth16),
            PLONK_TAG => PlonkPf::<Kzg>::decode_from(bytes).map(Proof::Plonk),
            _ => Err(ZkError::MalformedProof),
        };
        proof.map_err(|_| ZkError::MalformedProof)
    }

    fn from_canonical_bytes(bytes: &[u8]) -> Result<Self> {
        let mut rest = bytes;
        let proof = Self::decode_from(&mut rest)?;
        if !rest.is_empty() {
            return Err(ZkError::MalformedProof);
        }
        Ok(proof)
    }
}

impl CanonicalEncode for FullWitness<BN254Scalar> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        self.0.encode_into(out)
    }
}

impl CanonicalDecode for FullWitness<BN254Scalar> {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        Ok(FullWitness(Vec::decode_from(bytes)?))
    }
}

impl CanonicalEncode for PublicWitness<BN254Scalar> {
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        self.0.encode_into(out)
    }
}

impl CanonicalDecode for PublicWitness<BN254Scalar> {
    fn decode_from(bytes: &mut &[u8]) -> Result<Self> {
        Ok(PublicWitness(Vec::decode_from(bytes)?))
    }
}

/// Implement serde through the canonical encoding, base64 for human-readable formats.
/// Encoding failures surface as serializer errors.
macro_rules! canonical_serde {
    ($t:ident) => {
        impl serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let bytes = self
                    .to_canonical_bytes()
                    .map_err(serde::ser::Error::custom)?;
                if serializer.is_human_readable() {
                    serializer.serialize_str(&b64enc(&bytes))
                } else {
                    serializer.serialize_bytes(&bytes)
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let bytes = if deserializer.is_human_readable() {
                    deserializer.deserialize_str(BytesVisitor)?
                } else {
                    deserializer.deserialize_bytes(BytesVisitor)?
                };
                <$t as CanonicalDecode>::from_canonical_bytes(&bytes)
                    .map_err(serde::de::Error::custom)
            }
        }
    };
}

canonical_serde!(Srs);
canonical_serde!(ProvingKey);
canonical_serde!(VerifyingKey);
canonical_serde!(Proof);
