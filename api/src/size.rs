use crate::{
    errors::Result,
    pipeline::Proof,
    serialization::CanonicalEncode,
    setup::{SetupMaterial, Srs},
};
use std::fmt;

/// Encoded sizes in bytes of the artifacts of one circuit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeReport {
    /// the powers of tau, `None` for a circuit-specific setup
    pub srs: Option<usize>,
    /// the Lagrange-basis commitments, `None` for a circuit-specific setup
    pub srs_lagrange: Option<usize>,
    #[allow(missing_docs)]
    pub proving_key: usize,
    #[allow(missing_docs)]
    pub verifying_key: usize,
    #[allow(missing_docs)]
    pub proof: usize,
}

impl SizeReport {
    /// Encode every artifact into a buffer of its own and record the lengths.
    pub fn measure(srs: Option<&Srs>, setup: &SetupMaterial, proof: &Proof) -> Result<Self> {
        Ok(SizeReport {
            srs: srs.map(|srs| srs.kzg().encoded_len()).transpose()?,
            srs_lagrange: srs.map(|srs| srs.lagrange().encoded_len()).transpose()?,
            proving_key: setup.pk.encoded_len()?,
            verifying_key: setup.vk.encoded_len()?,
            proof: proof.encoded_len()?,
        })
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(srs), Some(lagrange)) = (self.srs, self.srs_lagrange) {
            writeln!(f, "srs: {} bytes", srs)?;
            writeln!(f, "srs lagrange: {} bytes", lagrange)?;
        }
        writeln!(f, "proving key: {} bytes", self.proving_key)?;
        writeln!(f, "verifying key: {} bytes", self.verifying_key)?;
        write!(f, "proof: {} bytes", self.proof)
    }
}
