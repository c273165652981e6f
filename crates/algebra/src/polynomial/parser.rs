//! Parses polynomial expressions such as `-1/3*(x00 - x01)^2 + 2*x10` into an abstract syntax
//! tree. Variables are resolved later, by [`PolynomialRing::parse`](super::PolynomialRing::parse).

use std::str::FromStr;

use anyhow::{anyhow, Context};
use nom::{
    branch::alt,
    character::complete::{alpha1, alphanumeric0, char, digit1 as digit, space0},
    combinator::{map, map_res, opt, peek, recognize},
    error::{ParseError, VerboseError},
    sequence::{delimited, pair, preceded},
    IResult as IResultBase, Parser,
};

type IResult<I, O> = IResultBase<I, O, VerboseError<I>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolynomialNode {
    Sum(Box<PolynomialNode>, Box<PolynomialNode>),
    Product(Box<PolynomialNode>, Box<PolynomialNode>),
    Power(Box<PolynomialNode>, u32),
    /// A rational number `a/b`.
    Scalar(i64, u64),
    Variable(String),
}

/// Pad both ends with whitespace
fn space<'a, O, E: ParseError<&'a str>, F: Parser<&'a str, O, E>>(
    f: F,
) -> impl FnMut(&'a str) -> IResultBase<&'a str, O, E> {
    delimited(space0, f, space0)
}

/// Surround with brackets
fn brackets<'a, O, E: ParseError<&'a str>, F: Parser<&'a str, O, E>>(
    f: F,
) -> impl FnMut(&'a str) -> IResultBase<&'a str, O, E> {
    delimited(char('('), f, char(')'))
}

fn digits<T: FromStr>(i: &str) -> IResult<&str, T> {
    map_res(space(digit), FromStr::from_str)(i)
}

fn fold_separated<I: Clone, OS, O, E>(
    mut sep: impl Parser<I, OS, E>,
    mut f: impl Parser<I, O, E>,
    mut acc: impl FnMut(O, O) -> O,
) -> impl FnMut(I) -> IResultBase<I, O, E> {
    move |i: I| {
        let (mut i, mut res) = f.parse(i)?;
        loop {
            match sep.parse(i.clone()) {
                Err(nom::Err::Error(_)) => return Ok((i, res)),
                Err(e) => return Err(e),
                Ok((i1, _)) => match f.parse(i1.clone()) {
                    Err(nom::Err::Error(_)) => return Ok((i, res)),
                    Err(e) => return Err(e),
                    Ok((i2, o)) => {
                        i = i2;
                        res = acc(res, o);
                    }
                },
            }
        }
    }
}

fn scalar(i: &str) -> IResult<&str, PolynomialNode> {
    map(
        pair(digits::<i64>, opt(preceded(char('/'), digits::<u64>))),
        |(a, b)| PolynomialNode::Scalar(a, b.unwrap_or(1)),
    )(i)
}

fn variable(i: &str) -> IResult<&str, PolynomialNode> {
    map(recognize(pair(alpha1, alphanumeric0)), |s: &str| {
        PolynomialNode::Variable(s.to_string())
    })(i)
}

fn factor(i: &str) -> IResult<&str, PolynomialNode> {
    space(alt((scalar, variable, brackets(expr))))(i)
}

fn power(i: &str) -> IResult<&str, PolynomialNode> {
    let (i, base) = factor(i)?;
    let (i, exponent) = opt(preceded(char('^'), digits::<u32>))(i)?;
    Ok((
        i,
        match exponent {
            Some(k) => PolynomialNode::Power(Box::new(base), k),
            None => base,
        },
    ))
}

fn term(i: &str) -> IResult<&str, PolynomialNode> {
    let (i, sign) = opt(alt((char('+'), char('-'))))(i)?;

    let (i, mut res) = fold_separated(char('*'), power, |acc, val| {
        PolynomialNode::Product(Box::new(acc), Box::new(val))
    })(i)?;

    if let Some('-') = sign {
        res = PolynomialNode::Product(Box::new(PolynomialNode::Scalar(-1, 1)), Box::new(res));
    }
    Ok((i, res))
}

fn expr(i: &str) -> IResult<&str, PolynomialNode> {
    fold_separated(
        peek(alt((char('+'), char('-')))),
        space(term),
        |acc, val| PolynomialNode::Sum(Box::new(acc), Box::new(val)),
    )(i)
}

fn convert_error(i: &str) -> impl FnOnce(nom::Err<VerboseError<&str>>) -> anyhow::Error + '_ {
    move |err| {
        anyhow!(match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => nom::error::convert_error(i, e),
            _ => format!("{err:#}"),
        })
    }
}

pub fn parse_polynomial(i: &str) -> anyhow::Result<PolynomialNode> {
    let (rest, parse_tree) = space(expr)(i)
        .map_err(convert_error(i))
        .with_context(|| format!("Error when parsing polynomial string {i}"))?;
    if rest.is_empty() {
        Ok(parse_tree)
    } else {
        Err(anyhow!(
            "Failed to consume all of input. Remaining: '{rest}'"
        ))
    }
}
