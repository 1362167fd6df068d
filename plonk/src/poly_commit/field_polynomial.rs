use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use zksok_algebra::{prelude::*, traits::Domain};

/// Field polynomial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: Scalar")]
pub struct FpPolynomial<F> {
    /// Coefficients (or evaluations) of the polynomial
    pub coefs: Vec<F>,
}

impl<F: Scalar> FpPolynomial<F> {
    /// Return the polynomial coefs reference.
    pub fn get_coefs_ref(&self) -> &[F] {
        self.coefs.as_slice()
    }

    /// Return the constant zero polynomial
    /// # Example
    /// ```
    /// use zksok_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use zksok_algebra::{bn254::BN254Scalar, prelude::*};
    /// let poly = FpPolynomial::<BN254Scalar>::zero();
    /// let zero = BN254Scalar::zero();
    /// assert_eq!(poly.degree(), 0);
    /// assert_eq!(poly.eval(&zero), zero);
    /// assert_eq!(poly.eval(&BN254Scalar::one()), zero);
    /// ```
    pub fn zero() -> Self {
        Self::from_coefs(vec![F::zero()])
    }

    /// Return the constant one polynomial
    pub fn one() -> Self {
        Self::from_coefs(vec![F::one()])
    }

    /// Build a polynomial from the coefficient vector, low-order coefficient first.
    /// High-order zero coefficient are trimmed.
    /// # Example
    /// ```
    /// use zksok_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use zksok_algebra::{bn254::BN254Scalar, prelude::*};
    /// let zero = BN254Scalar::zero();
    /// let one = BN254Scalar::one();
    /// let two = one.add(&one);
    /// let five = two.add(&two).add(&one);
    /// let poly = FpPolynomial::from_coefs(vec![one, zero, one]);
    /// assert_eq!(poly.degree(), 2);
    /// assert_eq!(poly.eval(&two), five);
    /// let poly2 = FpPolynomial::from_coefs(vec![one, zero, one, zero, zero, zero]);
    /// assert_eq!(poly, poly2);
    /// ```
    pub fn from_coefs(mut coefs: Vec<F>) -> Self {
        if coefs.is_empty() {
            coefs.push(F::zero());
        }
        let mut p = FpPolynomial { coefs };
        p.trim_coefs();
        p
    }

    /// Build a polynomial from its zeroes/roots.
    pub fn from_zeroes(zeroes: &[F]) -> Self {
        let mut r = Self::one();
        for root in zeroes.iter() {
            let mut p = r.clone();
            r.coefs.insert(0, F::zero()); // multiply by X
            p.mul_scalar_assign(root);
            r.sub_assign(&p);
        }
        r.trim_coefs();
        r
    }

    /// Return a polynomial of `degree` + 1 uniformly random coefficients.
    pub fn random<R: CryptoRng + RngCore>(prng: &mut R, degree: usize) -> FpPolynomial<F> {
        let coefs = (0..degree + 1).map(|_| F::random(prng)).collect();
        Self::from_coefs(coefs)
    }

    /// Remove high degree zero-coefficients
    fn trim_coefs(&mut self) {
        while self.coefs.len() > 1 && self.coefs.last().map_or(false, |c| c.is_zero()) {
            self.coefs.pop();
        }
    }

    /// Return degree of the polynomial
    pub fn degree(&self) -> usize {
        if self.coefs.is_empty() {
            0
        } else {
            self.coefs.len() - 1
        }
    }

    /// Test if polynomial is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.degree() == 0 && self.coefs.first().map_or(true, |c| c.is_zero())
    }

    /// Evaluate a polynomial on a point, with Horner's rule.
    pub fn eval(&self, point: &F) -> F {
        self.coefs
            .iter()
            .rev()
            .fold(F::zero(), |acc, coef| acc.mul(point).add(coef))
    }

    /// Add another polynomial to self.
    pub fn add_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.add_assign(other_coef);
        }
        let n = self.coefs.len();
        if n < other.coefs.len() {
            self.coefs.extend_from_slice(&other.coefs[n..]);
        }
        self.trim_coefs();
    }

    /// Add with another polynomial, producing a new polynomial.
    pub fn add(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.add_assign(other);
        new
    }

    /// Subtracts another polynomial from self.
    /// # Example:
    /// ```
    /// use zksok_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use zksok_algebra::{bn254::BN254Scalar, prelude::*};
    /// let zero = BN254Scalar::zero();
    /// let one = BN254Scalar::one();
    /// let two = one.add(&one);
    /// let three = two.add(&one);
    /// let mut poly1 = FpPolynomial::from_coefs(vec![three, three, two]);
    /// let poly2 = FpPolynomial::from_coefs(vec![three, two, one, one]);
    /// poly1.sub_assign(&poly2);
    /// let poly_expected = FpPolynomial::from_coefs(vec![zero, one, one, one.neg()]);
    /// assert_eq!(poly1, poly_expected);
    /// ```
    pub fn sub_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.sub_assign(other_coef);
        }
        let n = self.coefs.len();
        if other.coefs.len() > n {
            for other_coef in other.coefs[n..].iter() {
                self.coefs.push(other_coef.neg());
            }
        }
        self.trim_coefs();
    }

    /// Subtract another polynomial from self, producing a new polynomial.
    pub fn sub(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.sub_assign(other);
        new
    }

    /// Negate the coefficients.
    pub fn neg(&self) -> Self {
        FpPolynomial {
            coefs: self.coefs.iter().map(|c| c.neg()).collect(),
        }
    }

    /// Add `coef` to the coefficient of order `order`.
    pub fn add_coef_assign(&mut self, coef: &F, order: usize) {
        if self.coefs.len() <= order {
            self.coefs.resize(order + 1, F::zero());
        }
        self.coefs[order].add_assign(coef);
        self.trim_coefs();
    }

    /// Multiply polynomial by a constant scalar.
    pub fn mul_scalar_assign(&mut self, scalar: &F) {
        for coef in self.coefs.iter_mut() {
            coef.mul_assign(scalar)
        }
        self.trim_coefs();
    }

    /// Multiply polynomial by a constant scalar into a new polynomial.
    pub fn mul_scalar(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        new.mul_scalar_assign(scalar);
        new
    }

    /// Multiply the polynomial variable by a scalar.
    /// mul_var(\sum a_i X^i, b) = \sum a_i b^i X^i
    pub fn mul_var_assign(&mut self, scalar: &F) {
        let mut r = F::one();
        for coefs in self.coefs.iter_mut() {
            coefs.mul_assign(&r);
            r.mul_assign(scalar);
        }
        self.trim_coefs();
    }

    /// Multiply polynomial variable by a scalar
    pub fn mul_var(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        new.mul_var_assign(scalar);
        new
    }

    /// Divide by `X - point`, returning the quotient and the remainder `f(point)`.
    pub fn divide_by_linear(&self, point: &F) -> (Self, F) {
        let mut quo = vec![F::zero(); self.coefs.len().saturating_sub(1)];
        let mut carry = F::zero();
        for (i, coef) in self.coefs.iter().enumerate().rev() {
            let v = coef.add(&carry.mul(point));
            if i == 0 {
                return (Self::from_coefs(quo), v);
            }
            quo[i - 1] = v;
            carry = v;
        }
        (Self::zero(), F::zero())
    }

    /// Divide polynomial to produce the quotient and remainder polynomials.
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        let k = self.coefs.len();
        let l = divisor.coefs.len();
        if l > k {
            return Ok((Self::zero(), self.clone()));
        }
        let bl_inv = divisor
            .coefs
            .last()
            .ok_or(AlgebraError::ParameterError)?
            .inv()?;
        let mut rem = self.coefs.clone();
        let mut quo = vec![F::zero(); k - l + 1];
        for i in (0..(k - l + 1)).rev() {
            let qi = bl_inv.mul(&rem[i + l - 1]);
            for (j, d) in divisor.coefs.iter().enumerate() {
                rem[i + j].sub_assign(&qi.mul(d));
            }
            quo[i] = qi;
        }
        rem.truncate(l - 1);
        if rem.is_empty() {
            rem.push(F::zero());
        }
        Ok((Self::from_coefs(quo), Self::from_coefs(rem)))
    }
}

impl<F: Domain> FpPolynomial<F> {
    /// Return the radix-2 evaluation domain of size `num_points`.
    pub fn evaluation_domain(num_points: usize) -> Option<Radix2EvaluationDomain<F::Field>> {
        let domain = Radix2EvaluationDomain::<F::Field>::new(num_points)?;
        if domain.size() == num_points {
            Some(domain)
        } else {
            None
        }
    }

    /// Return the elements of the domain, starting from one.
    pub fn domain_elements(domain: &Radix2EvaluationDomain<F::Field>) -> Vec<F> {
        domain.elements().map(F::from_field).collect()
    }

    /// Compute the FFT of the polynomial on the domain.
    /// Coefficients beyond the domain size wrap around, as `X^n = 1` on the domain.
    pub fn fft_with_domain(&self, domain: &Radix2EvaluationDomain<F::Field>) -> Vec<F> {
        let n = domain.size();
        let mut coefs = vec![F::zero().get_field(); n];
        for (i, c) in self.coefs.iter().enumerate() {
            coefs[i % n] += c.get_field();
        }
        domain.fft(&coefs).into_iter().map(F::from_field).collect()
    }

    /// Compute the polynomial from its values on the domain.
    pub fn ifft_with_domain(domain: &Radix2EvaluationDomain<F::Field>, values: &[F]) -> Self {
        let values: Vec<F::Field> = values.iter().map(|v| v.get_field()).collect();
        Self::from_coefs(domain.ifft(&values).into_iter().map(F::from_field).collect())
    }

    /// Compute the FFT of the polynomial on the set k * <root>.
    pub fn coset_fft_with_domain(&self, domain: &Radix2EvaluationDomain<F::Field>, k: &F) -> Vec<F> {
        self.mul_var(k).fft_with_domain(domain)
    }

    /// Compute the polynomial from its values on the coset k * <root>, given k^{-1}.
    pub fn coset_ifft_with_domain(
        domain: &Radix2EvaluationDomain<F::Field>,
        values: &[F],
        k_inv: &F,
    ) -> Self {
        Self::ifft_with_domain(domain, values).mul_var(k_inv)
    }

    /// Multiply two polynomials through an FFT of a large enough domain.
    pub fn fast_mul(&self, other: &Self) -> Option<Self> {
        let n = (self.coefs.len() + other.coefs.len()).next_power_of_two();
        let domain = Self::evaluation_domain(n)?;
        let a = self.fft_with_domain(&domain);
        let b = other.fft_with_domain(&domain);
        let prod: Vec<F> = a.iter().zip(b.iter()).map(|(x, y)| x.mul(y)).collect();
        Some(Self::ifft_with_domain(&domain, &prod))
    }
}
