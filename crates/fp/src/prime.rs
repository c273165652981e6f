use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

/// The prime used when nothing else is requested. This is 2^31 - 1, the largest prime that still
/// fits a [`ValidPrime`].
pub const DEFAULT_PRIME: ValidPrime = ValidPrime::new_unchecked(2147483647);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimeError {
    NotAnInteger(ParseIntError),
    InvalidPrime(u32),
}

impl fmt::Display for PrimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnInteger(s) => write!(f, "Not an integer: {s}"),
            Self::InvalidPrime(p) => write!(f, "{p} is not a valid prime"),
        }
    }
}

impl std::error::Error for PrimeError {}

pub const fn is_prime(p: u32) -> bool {
    if p < 2 {
        return false;
    }
    let p = p as u64;
    let mut k = 2;
    while k * k <= p {
        if p % k == 0 {
            return false;
        }
        k += 1;
    }
    true
}

/// A prime number below 2^31. The bound guarantees that a product of two residues fits in a
/// `u64` and that every residue fits in an `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidPrime {
    p: u32,
}

impl ValidPrime {
    pub const fn new(p: u32) -> Self {
        assert!(p < (1 << 31), "Tried to construct a prime larger than 2^31");
        assert!(is_prime(p), "Tried to construct a composite prime");
        Self { p }
    }

    pub const fn new_unchecked(p: u32) -> Self {
        Self { p }
    }

    pub const fn as_u32(self) -> u32 {
        self.p
    }

    pub const fn as_u64(self) -> u64 {
        self.p as u64
    }

    /// Computes the sum mod p. This takes care of overflow.
    pub fn sum(self, n1: u32, n2: u32) -> u32 {
        ((n1 as u64 + n2 as u64) % self.as_u64()) as u32
    }

    /// Computes the product mod p. This takes care of overflow.
    pub fn product(self, n1: u32, n2: u32) -> u32 {
        ((n1 as u64 * n2 as u64) % self.as_u64()) as u32
    }

    pub fn negate(self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.p - n
        }
    }

    pub fn pow_mod(self, mut b: u32, mut e: u32) -> u32 {
        let mut result: u32 = 1;
        b %= self.p;
        while e > 0 {
            if (e & 1) == 1 {
                result = self.product(result, b);
            }
            b = self.product(b, b);
            e >>= 1;
        }
        result
    }

    /// The multiplicative inverse of `k`, by Fermat's little theorem.
    pub fn inverse(self, k: u32) -> u32 {
        assert!(k % self.p != 0, "Tried to invert 0 mod {}", self.p);
        self.pow_mod(k, self.p - 2)
    }

    pub fn from_i64(self, n: i64) -> u32 {
        n.rem_euclid(self.p as i64) as u32
    }

    /// The representative of `n` in `(-p/2, p/2]`.
    pub fn to_signed(self, n: u32) -> i64 {
        if n > self.p / 2 {
            n as i64 - self.p as i64
        } else {
            n as i64
        }
    }

    /// Finds `a/b` congruent to `n` with `|a|, b <= sqrt(p/2)`, if there is one. Such a fraction
    /// is unique, and this is how coefficients are printed.
    pub fn rational_reconstruction(self, n: u32) -> Option<(i64, u64)> {
        let bound = ((self.p / 2) as f64).sqrt() as i64;
        let (mut r0, mut r1) = (self.p as i64, (n % self.p) as i64);
        let (mut t0, mut t1) = (0i64, 1i64);
        while r1 > bound {
            let q = r0 / r1;
            (r0, r1) = (r1, r0 - q * r1);
            (t0, t1) = (t1, t0 - q * t1);
        }
        if t1 == 0 || t1.abs() > bound {
            return None;
        }
        let (a, b) = if t1 < 0 { (-r1, -t1) } else { (r1, t1) };
        Some((a, b as u64))
    }

    /// `i!/j!` mod p, i.e. the falling factorial `i (i - 1) ... (j + 1)`.
    pub fn factorial_ratio(self, i: u32, j: u32) -> u32 {
        (j + 1..=i).fold(1, |acc, k| self.product(acc, k % self.p))
    }
}

impl Default for ValidPrime {
    fn default() -> Self {
        DEFAULT_PRIME
    }
}

impl TryFrom<u32> for ValidPrime {
    type Error = PrimeError;

    fn try_from(p: u32) -> Result<Self, PrimeError> {
        if p < (1 << 31) && is_prime(p) {
            Ok(Self { p })
        } else {
            Err(PrimeError::InvalidPrime(p))
        }
    }
}

impl FromStr for ValidPrime {
    type Err = PrimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let p: u32 = s.parse().map_err(PrimeError::NotAnInteger)?;
        Self::try_from(p)
    }
}

impl fmt::Display for ValidPrime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.p.fmt(f)
    }
}

impl Serialize for ValidPrime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.p.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValidPrime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let p: u32 = u32::deserialize(deserializer)?;
        Self::try_from(p).map_err(D::Error::custom)
    }
}

#[cfg(feature = "proptest")]
pub mod arbitrary {
    use proptest::prelude::*;

    use super::ValidPrime;

    /// A few primes of different sizes. Small primes exercise the wrap around, the large one is
    /// the one actually used.
    pub fn arb_prime() -> impl Strategy<Value = ValidPrime> {
        prop::sample::select(vec![2u32, 3, 5, 7, 65537, 2147483647]).prop_map(ValidPrime::new)
    }
}
