use algebra::combinatorics::Partition;
use fp::prime::DEFAULT_PRIME;
use harmonics::diagonal::{DiagonalPolynomialRing, HarmonicOptions};
use rstest::rstest;

#[rstest]
#[case(3, 2, &[1, 1, 1], "s[1, 1] + s[3]")]
#[case(3, 2, &[2, 1], "s[1] + s[2]")]
#[case(3, 2, &[3], "s[]")]
#[case(4, 2, &[1, 1, 1, 1], "s[3, 1] + s[4, 1] + s[6]")]
fn harmonic_character(
    #[case] n: usize,
    #[case] r: usize,
    #[case] mu: &[usize],
    #[case] expected: &str,
) {
    let ring = DiagonalPolynomialRing::new(DEFAULT_PRIME, n, r);
    let mu = Partition::new(mu);
    let all = ring.harmonic_character(&mu, HarmonicOptions::all());
    assert_eq!(all.to_string(), expected);
}

fn options(bits: u8) -> HarmonicOptions {
    HarmonicOptions {
        use_symmetry: bits & 1 != 0,
        use_antisymmetry: bits & 2 != 0,
        use_lie: bits & 4 != 0,
    }
}

#[rstest]
#[case(&[1, 1, 1], "s[1, 1] + s[3]")]
#[case(&[2, 1], "s[1] + s[2]")]
fn options_do_not_change_the_character(
    #[case] mu: &[usize],
    #[case] expected: &str,
    #[values(0, 1, 2, 3, 4, 5, 6, 7)] bits: u8,
) {
    let ring = DiagonalPolynomialRing::new(DEFAULT_PRIME, 3, 2);
    let mu = Partition::new(mu);
    assert_eq!(ring.harmonic_character(&mu, options(bits)).to_string(), expected);
}

// With three rows, sorting a multidegree can take a 3-cycle of the rows.
#[rstest]
#[case(&[4], "s[]")]
#[case(&[3, 1], "s[1] + s[2] + s[3]")]
#[case(&[2, 2], "s[2] + s[2, 1] + s[4]")]
#[case(&[2, 1, 1], "s[1, 1] + s[2, 1] + s[3] + s[3, 1] + s[4] + s[5]")]
#[case(&[1, 1, 1, 1], "s[1, 1, 1] + s[3, 1] + s[4, 1] + s[6]")]
fn three_rows(
    #[case] mu: &[usize],
    #[case] expected: &str,
    #[values(0, 1, 2, 3, 4, 5, 6, 7)] bits: u8,
) {
    let ring = DiagonalPolynomialRing::new(DEFAULT_PRIME, 4, 3);
    let mu = Partition::new(mu);
    assert_eq!(ring.harmonic_character(&mu, options(bits)).to_string(), expected);
}

#[rstest]
fn no_variables(#[values(0, 7)] bits: u8) {
    let ring = DiagonalPolynomialRing::new(DEFAULT_PRIME, 0, 2);
    assert_eq!(
        ring.harmonic_character(&Partition::empty(), options(bits)).to_string(),
        "s[]"
    );
    assert_eq!(ring.harmonic_bicharacter(options(bits)).to_string(), "s[] # s[]");
}

#[test]
fn harmonic_bicharacter() {
    harmonics::utils::init_logging();
    let ring = DiagonalPolynomialRing::new(DEFAULT_PRIME, 3, 2);
    let chi = ring.harmonic_bicharacter(HarmonicOptions::all());
    assert_eq!(
        chi.to_string(),
        "s[] # s[3] + s[1] # s[2, 1] + s[1, 1] # s[1, 1, 1] + s[2] # s[2, 1] + s[3] # s[1, 1, 1]"
    );
}
