//! Single-pass argv tokenizer.
//!
//! Tokens are classified in this order:
//! - `--` ends flag parsing; everything after it is epilogue
//! - `-X` (one alphanumeric) is a short switch, resolved through aliases
//! - `--no-NAME` negates a flag
//! - `--NAME` / `--NAME=VALUE` is a long flag
//! - anything else is a literal
//!
//! Literals before the first flag form the prologue. A literal right after a
//! non-boolean flag becomes that flag's value. The first literal that is
//! neither switches to literal-only mode and starts the epilogue.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::value::Value;

/// Output of a scan: leading literals, flags, trailing literals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prologue: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub flags: IndexMap<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub epilogue: Vec<String>,
}

impl ParseResult {
    /// No prologue, no flags, no epilogue.
    pub fn is_empty(&self) -> bool {
        self.prologue.is_empty() && self.flags.is_empty() && self.epilogue.is_empty()
    }

    /// `None` when nothing at all was scanned.
    pub fn into_option(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }

    pub fn flag(&self, name: &str) -> Option<&Value> {
        self.flags.get(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Separator,
    Short(&'a str),
    Long {
        negated: bool,
        name: &'a str,
        value: Option<&'a str>,
    },
    Literal,
}

fn is_flag_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '-')
}

fn classify(arg: &str) -> Token<'_> {
    if arg == "--" {
        return Token::Separator;
    }
    if let Some(rest) = arg.strip_prefix("--") {
        let (name, value) = match rest.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (rest, None),
        };
        if let Some(negated) = name.strip_prefix("no-").filter(|n| is_flag_name(n)) {
            return Token::Long {
                negated: true,
                name: negated,
                value,
            };
        }
        if is_flag_name(name) {
            return Token::Long {
                negated: false,
                name,
                value,
            };
        }
        return Token::Literal;
    }
    if let Some(rest) = arg.strip_prefix('-') {
        let mut chars = rest.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_alphanumeric() {
                return Token::Short(rest);
            }
        }
    }
    Token::Literal
}

/// Scan with no aliases and no declared flag types.
pub fn scan<I, S>(tokens: I) -> Result<ParseResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let schema = Schema::builder().no_flags().any_flag(None).build()?;
    Scanner::new(&schema).scan(tokens)
}

/// Tokenizer state. One scanner handles one argv.
#[derive(Debug)]
pub struct Scanner<'s> {
    schema: &'s Schema,
    result: ParseResult,
    literal_only: bool,
    /// Flag that takes the next literal as its value, if one comes.
    awaiting: Option<String>,
    /// Token of a flag that *must* get a value from the next token.
    pending: Option<String>,
}

impl<'s> Scanner<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            result: ParseResult::default(),
            literal_only: false,
            awaiting: None,
            pending: None,
        }
    }

    pub fn scan<I, S>(mut self, tokens: I) -> Result<ParseResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            self.push(token.as_ref())?;
        }
        self.finish()
    }

    /// Feed one token.
    pub fn push(&mut self, arg: &str) -> Result<()> {
        if self.literal_only {
            self.result.epilogue.push(arg.to_string());
            return Ok(());
        }

        let token = classify(arg);
        tracing::trace!(arg, ?token, "classified token");
        match token {
            Token::Separator => {
                self.check_pending()?;
                self.literal_only = true;
                self.awaiting = None;
                Ok(())
            }
            Token::Short(raw) => self.short_flag(raw, arg),
            Token::Long {
                negated: true,
                name,
                value,
            } => self.negated_flag(name, value, arg),
            Token::Long {
                negated: false,
                name,
                value: Some(value),
            } => self.valued_flag(name, value, arg),
            Token::Long {
                negated: false,
                name,
                value: None,
            } => self.bare_flag(name, arg),
            Token::Literal => self.literal(arg),
        }
    }

    /// End of input. A flag still owed a value is an error.
    pub fn finish(mut self) -> Result<ParseResult> {
        self.check_pending()?;
        Ok(std::mem::take(&mut self.result))
    }

    fn check_pending(&self) -> Result<()> {
        match &self.pending {
            Some(token) => Err(Error::MissingValue(token.clone())),
            None => Ok(()),
        }
    }

    fn resolve(&self, raw: &str) -> Result<String> {
        self.check_pending()?;
        Ok(self.schema.resolve(raw))
    }

    fn slot(&mut self, name: &str) -> &mut Value {
        self.result.flags.entry(name.to_string()).or_default()
    }

    /// `-X` toggles like a bare boolean. On its first use a short flag not
    /// declared boolean also takes the next literal as its value, if one
    /// follows; it never demands one.
    fn short_flag(&mut self, raw: &str, arg: &str) -> Result<()> {
        let name = self.resolve(raw)?;
        let boolean = self.schema.is_boolean(&name);
        let slot = self.slot(&name);
        let Some(next) = toggle(slot) else {
            return Err(Error::UnexpectedBoolean {
                token: arg.to_string(),
                previous: slot.to_string(),
            });
        };
        let first = next == Value::On;
        *slot = next;
        self.awaiting = (first && !boolean).then_some(name);
        Ok(())
    }

    fn negated_flag(&mut self, raw: &str, value: Option<&str>, arg: &str) -> Result<()> {
        let name = self.resolve(raw)?;
        if value.is_some() {
            return Err(Error::UnexpectedNegationValue(arg.to_string()));
        }
        *self.slot(&name) = Value::Off;
        self.awaiting = None;
        Ok(())
    }

    fn valued_flag(&mut self, raw: &str, value: &str, arg: &str) -> Result<()> {
        let name = self.resolve(raw)?;
        let flag = arg.split_once('=').map_or(arg, |(flag, _)| flag);
        if self.schema.is_boolean(&name) {
            return Err(Error::UnexpectedValue {
                flag: flag.to_string(),
                value: value.to_string(),
            });
        }
        self.awaiting = None;
        self.accumulate(&name, value, flag)
    }

    fn bare_flag(&mut self, raw: &str, arg: &str) -> Result<()> {
        let name = self.resolve(raw)?;
        let boolean = self.schema.is_boolean(&name);
        let slot = self.slot(&name);
        let next = match &*slot {
            Value::Off => Some(Value::On),
            other => toggle(other),
        };
        match next {
            Some(next) => {
                let first = next == Value::On;
                *slot = next;
                self.awaiting = (first && !boolean).then_some(name);
            }
            None => {
                // Already holds a value, so this occurrence must bring another.
                self.pending = Some(arg.to_string());
                self.awaiting = Some(name);
            }
        }
        Ok(())
    }

    fn literal(&mut self, arg: &str) -> Result<()> {
        if let Some(name) = self.awaiting.take() {
            tracing::trace!(flag = %name, value = arg, "literal taken as flag value");
            self.pending = None;
            return self.accumulate(&name, arg, arg);
        }
        if self.result.flags.is_empty() {
            self.result.prologue.push(arg.to_string());
        } else {
            tracing::trace!(arg, "first loose literal after flags starts the epilogue");
            self.literal_only = true;
            self.result.epilogue.push(arg.to_string());
        }
        Ok(())
    }

    fn accumulate(&mut self, name: &str, value: &str, flag: &str) -> Result<()> {
        let slot = self.slot(name);
        *slot = match std::mem::take(slot) {
            Value::Unset | Value::On | Value::Off => Value::Scalar(value.to_string()),
            Value::Scalar(first) => Value::List(vec![first, value.to_string()]),
            Value::List(mut items) => {
                items.push(value.to_string());
                Value::List(items)
            }
            counted @ Value::Count(_) => {
                *slot = counted;
                return Err(Error::UnexpectedValue {
                    flag: flag.to_string(),
                    value: value.to_string(),
                });
            }
        };
        Ok(())
    }
}

/// Switch counting: `Unset -> On -> Count(2) -> Count(3) ...`.
///
/// `None` when the flag holds a value or was negated.
fn toggle(current: &Value) -> Option<Value> {
    match current {
        Value::Unset => Some(Value::On),
        Value::On => Some(Value::Count(2)),
        Value::Count(n) => Some(Value::Count(n + 1)),
        _ => None,
    }
}
