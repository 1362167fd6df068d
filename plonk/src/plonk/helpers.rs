use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::ConstraintSystem,
    indexer::{PlonkPK, PlonkPf, PlonkVK},
};
use crate::poly_commit::{
    field_polynomial::FpPolynomial,
    pcs::{HomomorphicPolyComElem, PolyComScheme},
};
use ark_poly::Radix2EvaluationDomain;
use std::cmp::min;
use zksok_algebra::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The data structure for challenges in Plonk.
#[derive(Default)]
pub(super) struct PlonkChallenges<F> {
    challenges: Vec<F>,
}

impl<F: Scalar> PlonkChallenges<F> {
    /// Create a challenges with capacity 5.
    pub(super) fn new() -> PlonkChallenges<F> {
        PlonkChallenges {
            challenges: Vec::with_capacity(5),
        }
    }

    /// Insert beta and gamma.
    pub(super) fn insert_beta_gamma(&mut self, beta: F, gamma: F) -> Result<()> {
        if self.challenges.is_empty() {
            self.challenges.push(beta);
            self.challenges.push(gamma);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    /// Insert alpha.
    pub(super) fn insert_alpha(&mut self, alpha: F) -> Result<()> {
        if self.challenges.len() == 2 {
            self.challenges.push(alpha);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    /// Insert zeta.
    pub(super) fn insert_zeta(&mut self, zeta: F) -> Result<()> {
        if self.challenges.len() == 3 {
            self.challenges.push(zeta);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    /// Insert u.
    pub(super) fn insert_u(&mut self, u: F) -> Result<()> {
        if self.challenges.len() == 4 {
            self.challenges.push(u);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    /// Return beta and gamma.
    pub(super) fn get_beta_gamma(&self) -> Result<(&F, &F)> {
        if self.challenges.len() > 1 {
            Ok((&self.challenges[0], &self.challenges[1]))
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    /// Return alpha.
    pub(super) fn get_alpha(&self) -> Result<&F> {
        self.challenges.get(2).ok_or(PlonkError::ChallengeError)
    }

    /// Return zeta.
    pub(super) fn get_zeta(&self) -> Result<&F> {
        self.challenges.get(3).ok_or(PlonkError::ChallengeError)
    }

    /// Return u.
    pub(super) fn get_u(&self) -> Result<&F> {
        self.challenges.get(4).ok_or(PlonkError::ChallengeError)
    }
}

/// Return the PI polynomial.
pub(super) fn pi_poly<PCS: PolyComScheme>(
    prover_params: &PlonkPK<PCS>,
    pi: &[PCS::Field],
    domain: &Radix2EvaluationDomain<<PCS::Field as Domain>::Field>,
) -> FpPolynomial<PCS::Field> {
    let mut evals = vec![PCS::Field::zero(); prover_params.verifier_params.cs_size];
    for (row, value) in prover_params
        .verifier_params
        .public_vars_constraint_indices
        .iter()
        .zip(pi.iter())
    {
        evals[*row] = *value;
    }

    FpPolynomial::ifft_with_domain(domain, &evals)
}

/// Add a random degree `num_hide_points`+`zeroing_degree` polynomial
/// that vanishes on X^{zeroing_degree} -1. Goal is to randomize
/// `polynomial` maintaining output values for elements in a sub group
/// of order N. Eg, when num_hide_points is 1, then it adds
/// (r1 + r2*X) * (X^zeroing_degree - 1) to `polynomial.
pub(super) fn hide_polynomial<R: CryptoRng + RngCore, F: Scalar>(
    prng: &mut R,
    polynomial: &mut FpPolynomial<F>,
    num_hide_points: usize,
    zeroing_degree: usize,
) -> Vec<F> {
    let mut blinds = Vec::new();
    for i in 0..num_hide_points + 1 {
        let mut blind = F::random(prng);
        blinds.push(blind);
        polynomial.add_coef_assign(&blind, i);
        blind = blind.neg();
        polynomial.add_coef_assign(&blind, zeroing_degree + i);
    }
    blinds
}

/// Build the evaluations of the z polynomial over the domain, from
/// z(\omega^{i+1}) = z(\omega^i)\prod_{j=1}^{n_wires_per_gate}(fj(\omega^i)
/// + \beta * k_j * \omega^i +\gamma)/(fj(\omega^i) + \beta * perm_j(\omega^i) +\gamma)
/// and setting z(1) = 1 for the base case
pub(super) fn z_poly<PCS: PolyComScheme, CS: ConstraintSystem<Field = PCS::Field>>(
    cs: &CS,
    prover_params: &PlonkPK<PCS>,
    w: &[PCS::Field],
    challenges: &PlonkChallenges<PCS::Field>,
) -> Result<FpPolynomial<PCS::Field>> {
    let n_wires_per_gate = CS::n_wires_per_gate();
    let (beta, gamma) = challenges.get_beta_gamma()?;
    let n_constraints = w.len() / n_wires_per_gate;
    let group = &prover_params.group[..];
    let k = &prover_params.verifier_params.k;
    let encoded_perm = encode_perm_to_group(group, &cs.compute_permutation(), k);

    let mut z_evals = Vec::with_capacity(n_constraints);
    let mut prev = PCS::Field::one();
    z_evals.push(prev);

    for i in 0..n_constraints - 1 {
        // 1. numerator = prod_{j=1..n_wires_per_gate}(fj(\omega^i) + \beta * k_j * \omega^i + \gamma)
        // 2. denominator = prod_{j=1..n_wires_per_gate}(fj(\omega^i) + \beta * permj(\omega^i) +\gamma)
        let mut numerator = PCS::Field::one();
        let mut denominator = PCS::Field::one();
        for j in 0..n_wires_per_gate {
            let k_x = k[j].mul(&group[i]);
            let f_x = &w[j * n_constraints + i];
            let f_plus_beta_id_plus_gamma = f_x.add(gamma).add(&beta.mul(&k_x));
            numerator.mul_assign(&f_plus_beta_id_plus_gamma);

            let p_x = &encoded_perm[j * n_constraints + i];
            let f_plus_beta_perm_plus_gamma = f_x.add(gamma).add(&beta.mul(p_x));
            denominator.mul_assign(&f_plus_beta_perm_plus_gamma);
        }

        // save s(\omega^{i+1}) = s(\omega^i)* a / b
        let denominator_inv = denominator
            .inv()
            .map_err(|_| PlonkError::DivisionByZero)?;
        prev.mul_assign(&numerator.mul(&denominator_inv));
        z_evals.push(prev);
    }

    Ok(FpPolynomial::from_coefs(z_evals))
}

/// Encode the permutation value, from an index to a group element.
pub(super) fn encode_perm_to_group<F: Scalar>(group: &[F], perm: &[usize], k: &[F]) -> Vec<F> {
    let n = group.len();
    perm.iter()
        .map(|pi| k[pi / n].mul(&group[pi % n]))
        .collect()
}

/// Compute the t polynomial.
pub(super) fn t_poly<PCS: PolyComScheme, CS: ConstraintSystem<Field = PCS::Field>>(
    cs: &CS,
    prover_params: &PlonkPK<PCS>,
    w_polys: &[FpPolynomial<PCS::Field>],
    z: &FpPolynomial<PCS::Field>,
    challenges: &PlonkChallenges<PCS::Field>,
    pi: &FpPolynomial<PCS::Field>,
) -> Result<FpPolynomial<PCS::Field>> {
    let n = cs.size();
    let m = cs.quot_eval_dom_size();
    let factor = m / n;
    if n * factor != m {
        return Err(PlonkError::MalformedCircuit(
            "the quotient domain is not a multiple of the domain".into(),
        ));
    }
    let domain_m =
        FpPolynomial::<PCS::Field>::evaluation_domain(m).ok_or(PlonkError::GroupNotFound(m))?;
    let k = &prover_params.verifier_params.k;

    // Compute the evaluations of w/pi/z polynomials on the coset k[1] * <root_m>.
    #[cfg(feature = "parallel")]
    let w_polys_coset_evals: Vec<Vec<PCS::Field>> = w_polys
        .par_iter()
        .map(|poly| poly.coset_fft_with_domain(&domain_m, &k[1]))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let w_polys_coset_evals: Vec<Vec<PCS::Field>> = w_polys
        .iter()
        .map(|poly| poly.coset_fft_with_domain(&domain_m, &k[1]))
        .collect();
    let pi_coset_evals = pi.coset_fft_with_domain(&domain_m, &k[1]);
    let z_coset_evals = z.coset_fft_with_domain(&domain_m, &k[1]);

    // Compute the evaluations of the quotient polynomial on the coset.
    let (beta, gamma) = challenges.get_beta_gamma()?;
    let alpha = challenges.get_alpha()?;
    let alpha_sq = alpha.mul(alpha);
    let mut t_coset_evals = Vec::with_capacity(m);

    for point in 0..m {
        let w_vals: Vec<&PCS::Field> = w_polys_coset_evals
            .iter()
            .map(|poly_coset_evals| &poly_coset_evals[point])
            .collect();
        let q_vals: Vec<&PCS::Field> = prover_params
            .q_coset_evals
            .iter()
            .map(|poly_coset_evals| &poly_coset_evals[point])
            .collect();
        // q * w
        let term1 = CS::eval_gate_func(&w_vals, &q_vals, &pi_coset_evals[point])?;

        // alpha * [z(X)\prod_j (fj(X) + beta * kj * X + gamma)]
        let mut term2 = alpha.mul(&z_coset_evals[point]);
        for j in 0..CS::n_wires_per_gate() {
            let tmp = w_polys_coset_evals[j][point]
                .add(gamma)
                .add(&beta.mul(&k[j].mul(&prover_params.coset_quotient[point])));
            term2.mul_assign(&tmp);
        }

        // alpha * [z(\omega * X)\prod_j (fj(X) + beta * perm_j(X) + gamma)]
        let mut term3 = alpha.mul(&z_coset_evals[(point + factor) % m]);
        for (w_poly_coset_evals, s_coset_evals) in w_polys_coset_evals
            .iter()
            .zip(prover_params.s_coset_evals.iter())
        {
            let tmp = w_poly_coset_evals[point]
                .add(gamma)
                .add(&beta.mul(&s_coset_evals[point]));
            term3.mul_assign(&tmp);
        }

        // alpha^2 * (z(X) - 1) * L_1(X)
        let term4 = alpha_sq
            .mul(&prover_params.l1_coset_evals[point])
            .mul(&z_coset_evals[point].sub(&PCS::Field::one()));

        let numerator = term1.add(&term2).add(&term4.sub(&term3));
        t_coset_evals.push(numerator.mul(&prover_params.z_h_inv_coset_evals[point]));
    }

    let k_inv = k[1].inv().map_err(|_| PlonkError::DivisionByZero)?;
    Ok(FpPolynomial::coset_ifft_with_domain(
        &domain_m,
        &t_coset_evals,
        &k_inv,
    ))
}

/// Compute r polynomial or commitment.
fn r_poly_or_comm<F: Scalar, PCSType: HomomorphicPolyComElem<Scalar = F> + Clone>(
    w: &[F],
    q_polys_or_comms: &[PCSType],
    k: &[F],
    last_s_poly_or_comm: &PCSType,
    z_poly_or_comm: &PCSType,
    w_polys_eval_zeta: &[&F],
    s_polys_eval_zeta: &[&F],
    z_eval_zeta_omega: &F,
    challenges: &PlonkChallenges<F>,
    t_polys_or_comms: &[PCSType],
    first_lagrange_eval_zeta: &F,
    z_h_eval_zeta: &F,
    n_t_polys: usize,
) -> Result<PCSType> {
    let (beta, gamma) = challenges.get_beta_gamma()?;
    let alpha = challenges.get_alpha()?;
    let zeta = challenges.get_zeta()?;

    // 1. sum_{i=1..n_selectors} wi * qi(X)
    let mut l = q_polys_or_comms[0].mul(&w[0]);
    for i in 1..q_polys_or_comms.len() {
        l.add_assign(&q_polys_or_comms[i].mul(&w[i]));
    }

    // 2. z(X) [ alpha * prod_{j=1..n_wires_per_gate} (fj(zeta) + beta * kj * zeta + gamma)
    //              + alpha^2 * L1(zeta)]
    let beta_zeta = beta.mul(zeta);
    let mut z_scalar = *alpha;
    for (w_eval, k_j) in w_polys_eval_zeta.iter().zip(k.iter()) {
        z_scalar.mul_assign(&w_eval.add(&k_j.mul(&beta_zeta)).add(gamma));
    }
    z_scalar.add_assign(&first_lagrange_eval_zeta.mul(&alpha.mul(alpha)));
    l.add_assign(&z_poly_or_comm.mul(&z_scalar));

    // 3. - perm_{n_wires_per_gate}(X) [alpha * z(zeta * omega) * beta
    //    * prod_{j=1..n_wires_per_gate-1}(fj(zeta) + beta * perm_j(zeta) + gamma)]
    let mut s_last_poly_scalar = alpha.mul(&z_eval_zeta_omega.mul(beta));
    for (w_eval, s_eval) in w_polys_eval_zeta.iter().zip(s_polys_eval_zeta.iter()) {
        let tmp = w_eval.add(&beta.mul(*s_eval)).add(gamma);
        s_last_poly_scalar.mul_assign(&tmp);
    }
    l.sub_assign(&last_s_poly_or_comm.mul(&s_last_poly_scalar));

    // 4. subtract Z_H(zeta) * (t1(X) + zeta^{n+2} t2(X) + zeta^{2(n+2)} t3(X))
    let factor = zeta.pow(&[n_t_polys as u64]);
    let mut exponent = z_h_eval_zeta.mul(&factor);
    let mut t_poly_combined = t_polys_or_comms[0].mul(z_h_eval_zeta);
    for t_poly in t_polys_or_comms.iter().skip(1) {
        t_poly_combined.add_assign(&t_poly.mul(&exponent));
        exponent.mul_assign(&factor);
    }
    l.sub_assign(&t_poly_combined);
    Ok(l)
}

/// Compute the r polynomial.
pub(super) fn r_poly<PCS: PolyComScheme, CS: ConstraintSystem<Field = PCS::Field>>(
    prover_params: &PlonkPK<PCS>,
    z: &FpPolynomial<PCS::Field>,
    w_polys_eval_zeta: &[&PCS::Field],
    s_polys_eval_zeta: &[&PCS::Field],
    z_eval_zeta_omega: &PCS::Field,
    challenges: &PlonkChallenges<PCS::Field>,
    t_polys: &[FpPolynomial<PCS::Field>],
    first_lagrange_eval_zeta: &PCS::Field,
    z_h_eval_zeta: &PCS::Field,
    n_t_polys: usize,
) -> Result<FpPolynomial<PCS::Field>> {
    let w = CS::eval_selector_multipliers(w_polys_eval_zeta)?;
    if w.len() != prover_params.q_polys.len() {
        return Err(PlonkError::ProvingKeyMismatch);
    }
    r_poly_or_comm::<PCS::Field, FpPolynomial<PCS::Field>>(
        &w,
        &prover_params.q_polys,
        &prover_params.verifier_params.k,
        &prover_params.s_polys[CS::n_wires_per_gate() - 1],
        z,
        w_polys_eval_zeta,
        s_polys_eval_zeta,
        z_eval_zeta_omega,
        challenges,
        t_polys,
        first_lagrange_eval_zeta,
        z_h_eval_zeta,
        n_t_polys,
    )
}

/// Commit the r commitment.
pub(super) fn r_commitment<PCS: PolyComScheme, CS: ConstraintSystem<Field = PCS::Field>>(
    verifier_params: &PlonkVK<PCS>,
    cm_z: &PCS::Commitment,
    w_polys_eval_zeta: &[&PCS::Field],
    s_polys_eval_zeta: &[&PCS::Field],
    z_eval_zeta_omega: &PCS::Field,
    challenges: &PlonkChallenges<PCS::Field>,
    t_polys: &[PCS::Commitment],
    first_lagrange_eval_zeta: &PCS::Field,
    z_h_eval_zeta: &PCS::Field,
    n_t_polys: usize,
) -> Result<PCS::Commitment> {
    let w = CS::eval_selector_multipliers(w_polys_eval_zeta)?;
    if w.len() != verifier_params.cm_q_vec.len() {
        return Err(PlonkError::VerificationKeyMismatch);
    }
    r_poly_or_comm::<PCS::Field, PCS::Commitment>(
        &w,
        &verifier_params.cm_q_vec,
        &verifier_params.k,
        &verifier_params.cm_s_vec[CS::n_wires_per_gate() - 1],
        cm_z,
        w_polys_eval_zeta,
        s_polys_eval_zeta,
        z_eval_zeta_omega,
        challenges,
        t_polys,
        first_lagrange_eval_zeta,
        z_h_eval_zeta,
        n_t_polys,
    )
}

/// Compute sum_{i=1}^\ell w_i L_j(X), where j is the constraint
/// index for the i-th public value. L_j(X) = c_j (X^n-1) / (X - \omega^j) is
/// the j-th lagrange base (zero for every X = \omega^i, except when i == j)
pub(super) fn eval_pi_poly<PCS: PolyComScheme>(
    verifier_params: &PlonkVK<PCS>,
    public_inputs: &[PCS::Field],
    z_h_eval_zeta: &PCS::Field,
    eval_point: &PCS::Field,
    root: &PCS::Field,
) -> Result<PCS::Field> {
    let mut eval = PCS::Field::zero();

    for ((constraint_index, public_value), lagrange_constant) in verifier_params
        .public_vars_constraint_indices
        .iter()
        .zip(public_inputs)
        .zip(verifier_params.lagrange_constants.iter())
    {
        // X - \omega^j j-th Lagrange denominator
        let root_to_j = root.pow(&[*constraint_index as u64]);
        let denominator = eval_point.sub(&root_to_j);
        let denominator_inv = denominator.inv().map_err(|_| PlonkError::DivisionByZero)?;
        let lagrange_i = lagrange_constant.mul(&denominator_inv);
        eval.add_assign(&lagrange_i.mul(public_value));
    }
    Ok(eval.mul(z_h_eval_zeta))
}

/// Compute constant c_j such that 1 = c_j * prod_{i != j} (\omega^j - \omega^i).
/// Over a multiplicative subgroup of order n this is \omega^j / n.
pub(super) fn compute_lagrange_constant<F: Scalar>(root: &F, n: usize, base_index: usize) -> Result<F> {
    let n_inv = F::from(n as u64)
        .inv()
        .map_err(|_| PlonkError::DivisionByZero)?;
    Ok(root.pow(&[base_index as u64]).mul(&n_inv))
}

/// Return Z_H(\zeta) = \zeta^n - 1 and the first Lagrange polynomial, scaled by n,
/// at \zeta: (\zeta^n - 1) / (\zeta - 1).
pub(super) fn first_lagrange_poly<PCS: PolyComScheme>(
    challenges: &PlonkChallenges<PCS::Field>,
    group_order: u64,
) -> Result<(PCS::Field, PCS::Field)> {
    let zeta = challenges.get_zeta()?;
    let one = PCS::Field::one();
    let z_h_eval_zeta = zeta.pow(&[group_order]).sub(&one);
    let zeta_minus_one_inv = zeta
        .sub(&one)
        .inv()
        .map_err(|_| PlonkError::DivisionByZero)?;
    Ok((z_h_eval_zeta, z_h_eval_zeta.mul(&zeta_minus_one_inv)))
}

/// Evaluate the r polynomial at point \zeta.
pub(super) fn r_eval_zeta<PCS: PolyComScheme>(
    proof: &PlonkPf<PCS>,
    challenges: &PlonkChallenges<PCS::Field>,
    pi_eval_zeta: &PCS::Field,
    first_lagrange_eval_zeta: &PCS::Field,
) -> Result<PCS::Field> {
    let alpha = challenges.get_alpha()?;
    let (beta, gamma) = challenges.get_beta_gamma()?;

    let term0 = pi_eval_zeta;
    let mut term1 = alpha.mul(&proof.z_eval_zeta_omega);
    let n_wires_per_gate = proof.w_polys_eval_zeta.len();
    for i in 0..n_wires_per_gate - 1 {
        let b = proof.w_polys_eval_zeta[i]
            .add(&beta.mul(&proof.s_polys_eval_zeta[i]))
            .add(gamma);
        term1.mul_assign(&b);
    }
    term1.mul_assign(&proof.w_polys_eval_zeta[n_wires_per_gate - 1].add(gamma));

    let term2 = first_lagrange_eval_zeta.mul(&alpha.mul(alpha));

    Ok(term1.add(&term2).sub(term0))
}

/// Split the t polynomial into `n_wires_per_gate` degree-`n` polynomials and commit.
///
/// Consecutive chunks share a random carry: `rand * X^n` is added to chunk `i` and
/// `rand` is subtracted from the constant term of chunk `i + 1`, which leaves
/// `sum_i X^{i n} t_i(X)` unchanged.
pub(super) fn split_t_and_commit<R: CryptoRng + RngCore, PCS: PolyComScheme>(
    prng: &mut R,
    pcs: &PCS,
    t: &FpPolynomial<PCS::Field>,
    n_wires_per_gate: usize,
    n: usize,
) -> Result<(Vec<PCS::Commitment>, Vec<FpPolynomial<PCS::Field>>)> {
    let mut cm_t_vec = vec![];
    let mut t_polys = vec![];
    let coefs_len = t.get_coefs_ref().len();

    let zero = PCS::Field::zero();
    let mut prev_coef = zero;

    for i in 0..n_wires_per_gate {
        let coefs_start = i * n;
        let coefs_end = if i == n_wires_per_gate - 1 {
            coefs_len
        } else {
            (i + 1) * n
        };
        let mut coefs = if coefs_start < coefs_len {
            t.get_coefs_ref()[coefs_start..min(coefs_len, coefs_end)].to_vec()
        } else {
            vec![]
        };

        let rand = PCS::Field::random(prng);
        if i != n_wires_per_gate - 1 {
            coefs.resize(n + 1, zero);
            coefs[n].add_assign(&rand);
            coefs[0].sub_assign(&prev_coef);
        } else if coefs.is_empty() {
            coefs = vec![prev_coef.neg()];
        } else {
            coefs[0].sub_assign(&prev_coef);
        }
        prev_coef = rand;

        let t_poly = FpPolynomial::from_coefs(coefs);
        let cm_t = pcs.commit(&t_poly)?;
        cm_t_vec.push(cm_t);
        t_polys.push(t_poly);
    }

    Ok((cm_t_vec, t_polys))
}
