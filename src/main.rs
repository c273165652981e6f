#![allow(clippy::many_single_char_names)]
#![allow(clippy::type_complexity)]
#![warn(clippy::default_trait_access)]
#![warn(clippy::if_not_else)]
#![warn(clippy::needless_continue)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::explicit_into_iter_loop)]

use std::fmt::Write as _;

use algebra::combinatorics::{Partition, StandardTableau};
use clap::{load_yaml, App};
use harmonics::{
    character::CharacterDatabase,
    diagonal::{DiagonalPolynomialRing, HarmonicOptions},
    utils::{self, BOLD_ANSI_CODE},
    young::SpechtMode,
};

fn main() -> anyhow::Result<()> {
    utils::init_logging();
    #[cfg(feature = "concurrent")]
    utils::init_thread_pool()?;

    let yaml = load_yaml!("cli.yml");
    let matches = App::from_yaml(yaml).get_matches();
    let (name, sub) = matches.subcommand();
    if let Some(sub) = sub {
        query::set_args(sub.values_of("args").into_iter().flatten().map(String::from));
    }

    let result = match name {
        "character" => character()?,
        "characters" => characters()?,
        "bicharacter" => bicharacter()?,
        "specht" => specht()?,
        "series" => series()?,
        _ => unreachable!("clap requires a subcommand"),
    };
    println!("{BOLD_ANSI_CODE}{result}");
    Ok(())
}

fn shape(prompt: &str) -> Partition {
    query::raw(prompt, |mu: Partition| Ok(mu))
}

fn tableau(s: &str) -> Result<StandardTableau, String> {
    StandardTableau::try_from(s).map_err(|e| e.to_string())
}

fn character() -> anyhow::Result<String> {
    let db = CharacterDatabase::from_env()?;
    let mu = shape("Shape");
    Ok(db.harmonic_character(&mu)?.to_string())
}

fn characters() -> anyhow::Result<String> {
    let db = CharacterDatabase::from_env()?;
    let n: usize = query::raw("n", |n: usize| Ok(n));
    let mut result = String::new();
    for (mu, time, f) in db.harmonic_characters(n)? {
        writeln!(result, "{mu}\t({:.1}s): {f}", time.as_secs_f64())?;
    }
    Ok(result.trim_end().to_string())
}

fn bicharacter() -> anyhow::Result<String> {
    let p = utils::prime_from_env()?;
    let n: usize = query::raw("n", |n: usize| Ok(n));
    let r: usize = query::with_default("r", "2", |r: usize| {
        if r == 0 {
            Err("r must be positive".to_string())
        } else {
            Ok(r)
        }
    });
    let options = HarmonicOptions {
        use_symmetry: query::yes_no("Use symmetry"),
        use_antisymmetry: query::yes_no("Use antisymmetry"),
        use_lie: query::yes_no("Only compute highest weight vectors"),
    };
    let ring = DiagonalPolynomialRing::new(p, n, r);
    tracing::info!(%ring, ?options);
    Ok(ring.harmonic_bicharacter(options).to_string())
}

fn specht() -> anyhow::Result<String> {
    let prime = utils::prime_from_env()?;
    let p: StandardTableau = query::raw("P", |s: String| tableau(&s));
    let q: Option<StandardTableau> = query::optional("Q", |s: String| tableau(&s));
    let mode: SpechtMode = query::with_default("Mode", "plain", |m: SpechtMode| Ok(m));
    let use_antisymmetry = query::yes_no("Use antisymmetry");

    if let Some(q) = &q {
        anyhow::ensure!(
            q.shape() == p.shape(),
            "P has shape {} but Q has shape {}",
            p.shape(),
            q.shape()
        );
    }
    let ring = DiagonalPolynomialRing::new(prime, p.size(), 1);
    let h = ring.higher_specht(&p, q.as_ref(), mode, use_antisymmetry);
    Ok(ring.element_to_string(&h))
}

fn series() -> anyhow::Result<String> {
    let db = CharacterDatabase::from_env()?;
    let degree: Option<usize> = query::optional("Truncation degree", |d: usize| Ok(d));
    let series = db.harmonic_bicharacter_truncated_series()?;
    Ok(match degree {
        Some(d) => series.bitruncate(d).to_string(),
        None => series.to_string(),
    })
}
