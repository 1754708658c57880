//!
//! # Proj-string parser
//!
//! The crate's one shipped [`ParameterMap`](crate::parameter_map::ParameterMap)
//! source. Grammar:
//!
//! ```text
//! <projstring> :: =
//!   +<ident>=<value> { <projstring> }... |
//!   +<ident> { <projstring> }...
//!
//! <ident> ::= [_0-9a-zA-Z]+
//! <value> ::= " { <word> }... " | <word>
//! <word>  ::= [^\s]+
//! ```
//!

use crate::error::{Error, Result};
use crate::parameter_map::{Parameter, ProjStringParams};

pub fn parse(s: &str) -> Result<ProjStringParams<'_>> {
    tokenizer::tokens(s)
        .map(|r| r.map(|(name, value, _)| Parameter { name, value }))
        .filter(|r| !matches!(r, Ok(p) if p.name.is_empty()))
        .collect()
}

mod tokenizer {
    use super::*;
    use std::ops::ControlFlow;

    pub(super) fn parse_identifier(s: &str) -> Result<(&str, &str)> {
        let rv = s.chars().try_fold(Ok(0usize), |len, c| {
            if c.is_whitespace() || c == '=' {
                ControlFlow::Break(len)
            } else if !c.is_alphanumeric() && c != '_' {
                ControlFlow::Break(Err(Error::ParameterValueError {
                    name: "<projstring>".into(),
                    reason: "invalid character in parameter name".into(),
                }))
            } else {
                ControlFlow::Continue(len.map(|len| len + c.len_utf8()))
            }
        });

        match rv {
            ControlFlow::Break(res) => res.map(|len| (&s[..len], &s[len..])),
            ControlFlow::Continue(_) => Ok((s, "")),
        }
    }

    pub(super) fn unquote_next(s: &str) -> Result<(&str, &str)> {
        let s = s.trim_start();
        if let Some(after_quote) = s.strip_prefix('\"') {
            match after_quote
                .split_inclusive(|c: char| c.is_whitespace())
                .try_fold(0usize, |len, part| {
                    let offset = part.len();
                    let trimmed = part.trim_end();
                    if trimmed.ends_with('\"') {
                        ControlFlow::Break(len + trimmed.len() - 1)
                    } else {
                        ControlFlow::Continue(len + offset)
                    }
                }) {
                ControlFlow::Break(len) => Ok((&after_quote[..len], &after_quote[(len + 1)..])),
                ControlFlow::Continue(_) => Err(Error::ParameterValueError {
                    name: "<projstring>".into(),
                    reason: "unterminated quoted string".into(),
                }),
            }
        } else {
            Ok(s.split_once(|c: char| c.is_whitespace()).unwrap_or((s, "")))
        }
    }

    pub(super) fn token(s: &str) -> Result<(&str, Option<&str>, &str)> {
        let s = s.trim_start();
        if s.is_empty() {
            return Ok(("", None, ""));
        }
        if let Some(rest) = s.strip_prefix('+') {
            let (name, rest) = parse_identifier(rest)?;
            if name.is_empty() {
                return Err(Error::ParameterValueError {
                    name: "<projstring>".into(),
                    reason: "empty parameter name".into(),
                });
            }
            let rest = rest.trim_start();
            if let Some(after_eq) = rest.strip_prefix('=') {
                let (value, rest) = unquote_next(after_eq)?;
                if value.is_empty() {
                    Err(Error::ParameterValueError {
                        name: name.into(),
                        reason: "missing parameter value".into(),
                    })
                } else {
                    Ok((name, Some(value), rest))
                }
            } else {
                Ok((name, None, rest))
            }
        } else {
            unquote_next(s).map(|(_, rest)| ("", None, rest))
        }
    }

    pub(super) fn tokens(s: &str) -> impl Iterator<Item = Result<(&str, Option<&str>, &str)>> {
        std::iter::successors(Some(token(s)), |prev| match prev {
            Err(_) => None,
            Ok((_, _, rest)) => {
                if rest.is_empty() {
                    None
                } else {
                    Some(tokenizer::token(rest))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter_map::ParameterMap;

    #[test]
    fn unquote_handles_embedded_quotes() {
        let (s, r) = tokenizer::unquote_next("foo").unwrap();
        assert_eq!((s, r), ("foo", ""));

        let s = r#"foo " foobar" "baz "#;
        let (s, r) = tokenizer::unquote_next(s).unwrap();
        assert_eq!((s, r), ("foo", r#"" foobar" "baz "#));
        let (s, r) = tokenizer::unquote_next(r).unwrap();
        assert_eq!((s, r), (" foobar", r#" "baz "#));
    }

    #[test]
    fn invalid_identifier_is_error() {
        assert!(tokenizer::token("+pro@j=geocent").is_err());
    }

    #[test]
    fn parses_full_proj_string() {
        let params = parse("+proj=lcc +lat_1=49 +lat_2=44 +lat_0=46.5 +lon_0=3 +x_0=700000 +y_0=6600000 +ellps=GRS80 +no_defs").unwrap();
        assert_eq!(params.as_str("proj"), Some("lcc"));
        assert_eq!(params.require_f64("lat_1").unwrap(), 49.0);
        assert!(params.check_option("no_defs").unwrap());
    }
}
