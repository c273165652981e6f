//! Reads parameters for the command line tools.
//!
//! Each call first consumes the next positional command line argument, if there is one left.
//! Only when the arguments run out does it prompt on stderr and read a line from stdin. This lets
//! the same binary be used interactively and from scripts. A positional argument that fails
//! validation is a hard error, since there is nobody to ask again.

use std::{
    fmt::Display,
    io::{stderr, stdin, Write},
    str::FromStr,
    sync::Mutex,
};

static ARGS: Mutex<Option<std::vec::IntoIter<String>>> = Mutex::new(None);

/// Replaces the positional arguments that are consumed before prompting. By default these are
/// the arguments of the process, minus the program name.
pub fn set_args(args: impl IntoIterator<Item = String>) {
    let args: Vec<String> = args.into_iter().collect();
    *ARGS.lock().unwrap_or_else(|e| e.into_inner()) = Some(args.into_iter());
}

fn next_arg() -> Option<String> {
    let mut guard = ARGS.lock().unwrap_or_else(|e| e.into_inner());
    guard
        .get_or_insert_with(|| {
            std::env::args()
                .skip(1)
                .collect::<Vec<_>>()
                .into_iter()
        })
        .next()
}

fn parse_with<S, T: FromStr, F>(x: &str, validator: &F) -> Result<S, String>
where
    F: Fn(T) -> Result<S, String>,
    <T as FromStr>::Err: Display,
{
    x.parse::<T>()
        .map_err(|err| err.to_string())
        .and_then(validator)
}

pub fn optional<S, T: FromStr, F>(prompt: &str, validator: F) -> Option<S>
where
    F: Fn(T) -> Result<S, String>,
    <T as FromStr>::Err: Display,
{
    inner(prompt, |x| {
        if x.is_empty() {
            Ok(None)
        } else {
            parse_with(x, &validator).map(Some)
        }
    })
}

pub fn with_default<S, T: FromStr, F>(prompt: &str, default: &str, validator: F) -> S
where
    F: Fn(T) -> Result<S, String>,
    <T as FromStr>::Err: Display,
{
    let prompt = format!("{prompt} (default: {default})");
    inner(&prompt, |x| {
        if x.is_empty() {
            parse_with(default, &validator)
        } else {
            parse_with(x, &validator)
        }
    })
}

pub fn raw<S, T: FromStr, F>(prompt: &str, validator: F) -> S
where
    F: Fn(T) -> Result<S, String>,
    <T as FromStr>::Err: Display,
{
    inner(prompt, |x| parse_with(x, &validator))
}

pub fn yes_no(prompt: &str) -> bool {
    with_default(prompt, "y", |response: String| {
        if response.starts_with('y') || response.starts_with('n') {
            Ok(response.starts_with('y'))
        } else {
            Err(format!(
                "unrecognized response '{response}'. Should be '(y)es' or '(n)o'"
            ))
        }
    })
}

pub fn inner<S, F>(prompt: &str, validator: F) -> S
where
    F: for<'a> Fn(&'a str) -> Result<S, String>,
{
    if let Some(arg) = next_arg() {
        match validator(arg.trim()) {
            Ok(res) => {
                eprintln!("{prompt} : {arg}");
                return res;
            }
            Err(e) => {
                eprintln!("Invalid argument '{arg}' for {prompt}: {e}");
                std::process::exit(1);
            }
        }
    }
    loop {
        eprint!("{prompt} : ");
        stderr().flush().ok();
        let mut input = String::new();
        if stdin().read_line(&mut input).unwrap_or(0) == 0 {
            // End of input. Accept the default if there is one.
            if let Ok(res) = validator("") {
                return res;
            }
            eprintln!("No input for {prompt}");
            std::process::exit(1);
        }
        match validator(input.trim()) {
            Ok(res) => return res,
            Err(e) => eprintln!("Invalid input: {e}. Try again"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_come_first() {
        set_args(["7".to_string(), "".to_string(), "n".to_string()]);
        let p: u32 = raw("Prime", |p: u32| Ok(p));
        assert_eq!(p, 7);
        let d: usize = with_default("Degree", "3", Ok);
        assert_eq!(d, 3);
        assert!(!yes_no("Save"));
    }
}
