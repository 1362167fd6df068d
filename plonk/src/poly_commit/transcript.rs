use crate::poly_commit::pcs::ToBytes;
use merlin::Transcript;
use rand_chacha::ChaChaRng;
use zksok_algebra::prelude::*;

/// The trait for polynomial commitment transcript.
pub trait PolyComTranscript {
    /// Append the commitment to the transcript.
    fn append_commitment<C: ToBytes>(&mut self, commitment: &C);

    /// Append the field to the transcript.
    fn append_field_elem<F: Scalar>(&mut self, point: &F);

    /// Get challenge result.
    fn get_challenge_field_elem<F: Scalar>(&mut self, label: &'static [u8]) -> F;
}

impl PolyComTranscript for Transcript {
    fn append_commitment<C: ToBytes>(&mut self, commitment: &C) {
        self.append_message(b"append commitment", &commitment.to_bytes());
    }

    fn append_field_elem<F: Scalar>(&mut self, field_elem: &F) {
        self.append_message(b"append field point", &field_elem.to_bytes());
    }

    fn get_challenge_field_elem<F: Scalar>(&mut self, label: &'static [u8]) -> F {
        let mut buff = [0u8; 32];
        self.challenge_bytes(label, &mut buff[..]);
        F::random(&mut ChaChaRng::from_seed(buff))
    }
}

#[cfg(test)]
mod test {
    use super::PolyComTranscript;
    use merlin::Transcript;
    use zksok_algebra::bn254::BN254Scalar;

    #[test]
    fn challenges_follow_the_transcript() {
        let mut t1 = Transcript::new(b"test");
        let mut t2 = Transcript::new(b"test");
        t1.append_field_elem(&BN254Scalar::from(5u32));
        t2.append_field_elem(&BN254Scalar::from(5u32));
        let c1: BN254Scalar = t1.get_challenge_field_elem(b"c");
        let c2: BN254Scalar = t2.get_challenge_field_elem(b"c");
        assert_eq!(c1, c2);

        let mut t3 = Transcript::new(b"test");
        t3.append_field_elem(&BN254Scalar::from(6u32));
        let c3: BN254Scalar = t3.get_challenge_field_elem(b"c");
        assert_ne!(c1, c3);
    }
}
