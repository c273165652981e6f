use std::fmt::{self, Write as _};

use anyhow::{anyhow, ensure};
use fp::prime::ValidPrime;

use super::{parse_polynomial, Monomial, Polynomial, PolynomialNode};

/// A polynomial ring over F_p with named variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PolynomialRing {
    p: ValidPrime,
    names: Vec<String>,
}

impl PolynomialRing {
    pub fn new<S: Into<String>>(p: ValidPrime, names: impl IntoIterator<Item = S>) -> Self {
        Self {
            p,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn prime(&self) -> ValidPrime {
        self.p
    }

    pub fn ngens(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn gen(&self, i: usize) -> Polynomial {
        Polynomial::variable(self.p, self.ngens(), i)
    }

    pub fn gens(&self) -> Vec<Polynomial> {
        (0..self.ngens()).map(|i| self.gen(i)).collect()
    }

    pub fn zero(&self) -> Polynomial {
        Polynomial::zero(self.p, self.ngens())
    }

    pub fn one(&self) -> Polynomial {
        Polynomial::constant(self.p, self.ngens(), 1)
    }

    /// Writes the coefficient `c` as a signed rational if it has a small enough numerator and
    /// denominator, and as its symmetric representative otherwise.
    fn signed_coefficient(&self, c: u32) -> (bool, String) {
        match self.p.rational_reconstruction(c) {
            Some((a, 1)) => (a < 0, a.unsigned_abs().to_string()),
            Some((a, b)) => (a < 0, format!("{}/{b}", a.unsigned_abs())),
            None => {
                let s = self.p.to_signed(c);
                (s < 0, s.unsigned_abs().to_string())
            }
        }
    }

    fn write_monomial(&self, f: &mut impl fmt::Write, m: &Monomial) -> fmt::Result {
        let mut first = true;
        for (i, &e) in m.exponents().iter().enumerate() {
            if e == 0 {
                continue;
            }
            if !first {
                f.write_char('*')?;
            }
            first = false;
            f.write_str(&self.names[i])?;
            if e > 1 {
                write!(f, "^{e}")?;
            }
        }
        Ok(())
    }

    /// Prints the terms from the largest monomial down, e.g. `x^2*y - 1/3*y*z + 2`.
    pub fn element_to_string(&self, x: &Polynomial) -> String {
        assert_eq!(x.nvars(), self.ngens());
        if x.is_zero() {
            return "0".to_string();
        }
        let mut result = String::new();
        for (i, (m, c)) in x.terms().rev().enumerate() {
            let (negative, magnitude) = self.signed_coefficient(c);
            match (i, negative) {
                (0, true) => result.push('-'),
                (0, false) => (),
                (_, true) => result.push_str(" - "),
                (_, false) => result.push_str(" + "),
            }
            if m.degree() == 0 {
                result.push_str(&magnitude);
                continue;
            }
            if magnitude != "1" {
                result.push_str(&magnitude);
                result.push('*');
            }
            // Writing to a String never fails
            let _ = self.write_monomial(&mut result, m);
        }
        result
    }

    fn evaluate(&self, node: &PolynomialNode) -> anyhow::Result<Polynomial> {
        let p = self.p;
        Ok(match node {
            PolynomialNode::Sum(a, b) => {
                let mut result = self.evaluate(a)?;
                result.add(&self.evaluate(b)?, 1);
                result
            }
            PolynomialNode::Product(a, b) => self.evaluate(a)?.mul(&self.evaluate(b)?),
            PolynomialNode::Power(a, k) => self.evaluate(a)?.pow(*k),
            PolynomialNode::Scalar(a, b) => {
                let b = (*b % p.as_u64()) as u32;
                ensure!(b != 0, "Denominator {node:?} is divisible by {p}");
                let c = p.product(p.from_i64(*a), p.inverse(b));
                Polynomial::constant(p, self.ngens(), c)
            }
            PolynomialNode::Variable(name) => {
                let i = self
                    .names
                    .iter()
                    .position(|x| x == name)
                    .ok_or_else(|| anyhow!("Unknown variable {name}"))?;
                self.gen(i)
            }
        })
    }

    /// # Example
    /// ```
    /// # use algebra::polynomial::PolynomialRing;
    /// let ring = PolynomialRing::new(fp::prime::DEFAULT_PRIME, ["x", "y"]);
    /// let f = ring.parse("(x + y)^2 - 2*x*y").unwrap();
    /// assert_eq!(ring.element_to_string(&f), "x^2 + y^2");
    /// ```
    pub fn parse(&self, s: &str) -> anyhow::Result<Polynomial> {
        self.evaluate(&parse_polynomial(s)?)
    }
}

impl fmt::Display for PolynomialRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Multivariate polynomial ring in {} over GF({})",
            self.names.join(", "),
            self.p
        )
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use fp::prime::DEFAULT_PRIME;

    use super::*;

    fn ring() -> PolynomialRing {
        PolynomialRing::new(DEFAULT_PRIME, ["x", "y", "z"])
    }

    #[test]
    fn print_in_degrevlex_order() {
        let r = ring();
        let f = r.parse("x^2*y - x*y^2 - x^2*z + y^2*z + x*z^2 - y*z^2").unwrap();
        expect![["x^2*y - x*y^2 - x^2*z + y^2*z + x*z^2 - y*z^2"]]
            .assert_eq(&r.element_to_string(&f));

        let g = r.parse("-1/3*(-x - y + 2*z)*(x - y)").unwrap();
        expect![["1/3*x^2 - 1/3*y^2 - 2/3*x*z + 2/3*y*z"]].assert_eq(&r.element_to_string(&g));

        assert_eq!(r.element_to_string(&r.parse("6").unwrap()), "6");
        assert_eq!(r.element_to_string(&r.parse("x - x").unwrap()), "0");
        assert_eq!(r.element_to_string(&r.parse("-x + 1").unwrap()), "-x + 1");
    }

    #[test]
    fn derivatives() {
        let r = PolynomialRing::new(DEFAULT_PRIME, ["x", "y"]);
        let check = |p: &str, q: &str, expected: &str| {
            let p = r.parse(p).unwrap();
            let q = r.parse(q).unwrap();
            assert_eq!(r.element_to_string(&p.polynomial_derivative(&q)), expected);
        };
        check("x", "x", "1");
        check("x", "x^3", "3*x^2");
        check("x^2", "x^3", "6*x");
        check("x + y", "x^3", "3*x^2");
        check("x + y", "x^3*y^3", "3*x^3*y^2 + 3*x^2*y^3");
        check(
            "-x^2*y + 3*y^2",
            "x*(x + 2*y + 1)^3",
            "72*x^2 + 144*x*y + 36*x - 48*y - 24",
        );
    }

    #[test]
    fn parse_errors() {
        let r = ring();
        assert!(r.parse("w").is_err());
        assert!(r.parse("x/0").is_err());
        assert!(r.parse("1/0").is_err());
    }
}
