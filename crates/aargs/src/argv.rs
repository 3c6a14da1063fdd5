//! Turn a mixed call style into a flat argv.
//!
//! Code that drives a program directly (tests, REPLs, other programs) rarely
//! wants to spell out `--this=is`. This module accepts:
//! - name-only arguments (`easy`), rendered as `--easy`
//! - literals, passed through untouched
//! - keyword groups (`this = "is"`), rendered per value kind
//!
//! Scanning the result must give the same `ParseResult` as scanning the
//! equivalent hand-written argv.

use crate::naming::kebab;

/// A keyword argument's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyword {
    /// `true` renders `--name`, `false` renders `--no-name`.
    Bool(bool),
    Str(String),
    /// One `--name=item` per element, in order.
    List(Vec<String>),
}

impl From<bool> for Keyword {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Keyword {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Keyword {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<String>> for Keyword {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for Keyword {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Keyword {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(|s| s.to_string()).collect())
    }
}

macro_rules! keyword_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Keyword {
                fn from(value: $t) -> Self {
                    Self::Str(value.to_string())
                }
            }
        )*
    };
}

keyword_from_display!(i32, i64, u32, u64, usize, f64, char);

/// One argument in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// A bare name meaning a boolean flag.
    Name(String),
    /// Passed through unchanged.
    Literal(String),
    /// Keyword arguments, in declaration order.
    Keywords(Vec<(String, Keyword)>),
}

impl Arg {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn literal(raw: impl Into<String>) -> Self {
        Self::Literal(raw.into())
    }

    fn push_tokens(&self, out: &mut Vec<String>) {
        match self {
            Self::Name(name) => out.push(format!("--{}", kebab(name))),
            Self::Literal(raw) => out.push(raw.clone()),
            Self::Keywords(pairs) => {
                for (name, value) in pairs {
                    push_keyword(out, name, value);
                }
            }
        }
    }
}

fn push_keyword(out: &mut Vec<String>, name: &str, value: &Keyword) {
    let flag = kebab(name);
    match value {
        Keyword::Bool(true) => out.push(format!("--{flag}")),
        Keyword::Bool(false) => out.push(format!("--no-{flag}")),
        Keyword::Str(v) => out.push(format!("--{flag}={v}")),
        Keyword::List(items) => {
            out.extend(items.iter().map(|v| format!("--{flag}={v}")));
        }
    }
}

/// Flatten `args` into argv, preserving call order (keyword groups expand in place).
pub fn to_argv(args: &[Arg]) -> Vec<String> {
    let mut out = Vec::new();
    for arg in args {
        arg.push_tokens(&mut out);
    }
    out
}

/// Collects positional arguments and keyword arguments separately.
///
/// `build` emits positionals first, then every keyword in declaration order.
/// Use [`to_argv`] with an explicit [`Arg::Keywords`] group when keywords must
/// come before trailing literals.
#[derive(Debug, Clone, Default)]
pub struct ArgvBuilder {
    positional: Vec<Arg>,
    keywords: Vec<(String, Keyword)>,
}

impl ArgvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A name-only argument (`--name`).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.positional.push(Arg::name(name));
        self
    }

    /// A literal passed through unchanged.
    pub fn literal(mut self, raw: impl Into<String>) -> Self {
        self.positional.push(Arg::literal(raw));
        self
    }

    pub fn literals<I, S>(mut self, raws: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.positional.extend(raws.into_iter().map(Arg::literal));
        self
    }

    /// A keyword argument. Repeating a name keeps both, in order.
    pub fn keyword(mut self, name: impl Into<String>, value: impl Into<Keyword>) -> Self {
        self.keywords.push((name.into(), value.into()));
        self
    }

    pub fn build(&self) -> Vec<String> {
        let mut out = to_argv(&self.positional);
        for (name, value) in &self.keywords {
            push_keyword(&mut out, name, value);
        }
        out
    }
}
