use algebra::combinatorics::Partition;
use fp::prime::DEFAULT_PRIME;
use harmonics::{
    character::{rows_needed, CharacterDatabase},
    diagonal::{DiagonalPolynomialRing, HarmonicOptions},
};
use rstest::rstest;

#[test]
fn rows() {
    assert_eq!(rows_needed(&Partition::new(&[1])), 1);
    assert_eq!(rows_needed(&Partition::new(&[2])), 1);
    assert_eq!(rows_needed(&Partition::new(&[1, 1, 1])), 2);
    assert_eq!(rows_needed(&Partition::new(&[2, 1, 1])), 2);
    assert_eq!(rows_needed(&Partition::new(&[1, 1, 1, 1])), 3);
}

#[test]
fn characters_are_stored() {
    let dir = tempfile::tempdir().unwrap();
    let db = CharacterDatabase::new(DEFAULT_PRIME, dir.path());
    for (mu, expected) in [
        (Partition::new(&[3]), "s[]"),
        (Partition::new(&[2, 1]), "s[1] + s[2]"),
        (Partition::new(&[1, 1, 1]), "s[1, 1] + s[3]"),
    ] {
        assert_eq!(db.harmonic_character(&mu).unwrap().to_string(), expected);
    }
    assert!(dir
        .path()
        .join("harmonic_character_plain_1,1,1.json")
        .exists());

    // A second database reads the files instead of computing.
    let db = CharacterDatabase::new(DEFAULT_PRIME, dir.path());
    let series = db.harmonic_bicharacter_truncated_series().unwrap();
    let ring = DiagonalPolynomialRing::new(DEFAULT_PRIME, 3, 2);
    assert_eq!(
        series.to_string(),
        ring.harmonic_bicharacter(HarmonicOptions::all()).to_string()
    );
    assert_eq!(series.bitruncate(4), series);
    assert!(series.bitruncate(3).is_zero());
}

#[test]
fn all_characters_of_s3() {
    let dir = tempfile::tempdir().unwrap();
    let db = CharacterDatabase::new(DEFAULT_PRIME, dir.path());
    let mut characters: Vec<(Partition, String)> = db
        .harmonic_characters(3)
        .unwrap()
        .into_iter()
        .map(|(mu, _, f)| (mu, f.to_string()))
        .collect();
    characters.sort();
    assert_eq!(
        characters,
        vec![
            (Partition::new(&[1, 1, 1]), "s[1, 1] + s[3]".to_string()),
            (Partition::new(&[2, 1]), "s[1] + s[2]".to_string()),
            (Partition::new(&[3]), "s[]".to_string()),
        ]
    );
}

#[rstest]
#[case(&[6], "s[]")]
#[case(&[5, 1], "s[1] + s[2] + s[3] + s[4] + s[5]")]
#[case(
    &[4, 2],
    "s[2] + s[2, 1] + s[2, 2] + s[3] + s[3, 1] + s[3, 2] + 2*s[4] + 2*s[4, 1] + s[4, 2] + s[5] + s[5, 1] + 2*s[6] + s[6, 1] + s[7] + s[8]"
)]
#[case(
    &[3, 3],
    "s[2, 2] + s[2, 2, 1] + s[3] + s[3, 1] + s[3, 2] + s[4, 1] + s[4, 1, 1] + s[4, 2] + s[5] + s[5, 1] + s[5, 2] + s[6] + s[6, 1] + s[7] + s[7, 1] + s[9]"
)]
fn characters_of_s6(#[case] mu: &[usize], #[case] expected: &str) {
    let dir = tempfile::tempdir().unwrap();
    let db = CharacterDatabase::new(DEFAULT_PRIME, dir.path());
    let mu = Partition::new(mu);
    assert_eq!(rows_needed(&mu), 4);
    assert_eq!(db.harmonic_character(&mu).unwrap().to_string(), expected);
}

#[test]
fn empty_shape() {
    let dir = tempfile::tempdir().unwrap();
    let db = CharacterDatabase::new(DEFAULT_PRIME, dir.path());
    assert_eq!(rows_needed(&Partition::empty()), 1);
    assert_eq!(db.harmonic_character(&Partition::empty()).unwrap().to_string(), "s[]");
    assert_eq!(db.harmonic_characters(0).unwrap().len(), 1);
}
