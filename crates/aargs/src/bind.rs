use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::argv::{Arg, to_argv};
use crate::error::{Error, Result};
use crate::naming::underscore;
use crate::scan::ParseResult;
use crate::schema::{Schema, Section};
use crate::value::Value;

/// Suffix asking for a field's truthiness instead of its value (`verbose?`).
pub const QUERY_SUFFIX: char = '?';

/// Distribute a scanned argv over `schema`'s named slots.
///
/// Flags that share a name with a positional slot satisfy that slot, so the
/// positional tokens shift left to fill whatever is still open. Leftover
/// prologue tokens lead the epilogue.
pub fn bind(schema: &Schema, parsed: ParseResult) -> Result<IndexMap<String, Value>> {
    let ParseResult {
        prologue,
        flags,
        epilogue,
    } = parsed;
    tracing::debug!(
        prologue = prologue.len(),
        flags = flags.len(),
        epilogue = epilogue.len(),
        "binding parsed arguments"
    );

    check_sufficient(schema, &schema.prologue, &flags, prologue.len())?;
    let (named, extra) = distribute(&schema.prologue, &flags, prologue);

    // Only a prologue splat can collide with a flag here; the splat wins.
    let mut values: IndexMap<String, Value> = named.into_iter().collect();
    for (name, value) in flags {
        values.entry(name).or_insert(value);
    }

    let mut trailing = extra;
    trailing.extend(epilogue);

    check_sufficient(schema, &schema.epilogue, &values, trailing.len())?;
    let (named, rest) = distribute(&schema.epilogue, &values, trailing);
    values.extend(named);

    if !rest.is_empty() {
        return Err(Error::UnexpectedEpilogue(rest));
    }
    Ok(values)
}

/// Required names not already present must fit in `available` tokens.
fn check_sufficient(
    schema: &Schema,
    section: &Section,
    present: &IndexMap<String, Value>,
    available: usize,
) -> Result<()> {
    let needed: Vec<&String> = section
        .required
        .iter()
        .filter(|name| !present.contains_key(name.as_str()))
        .collect();
    if needed.len() <= available {
        return Ok(());
    }
    let missing = needed[available..]
        .iter()
        .map(|name| schema.display_name(name))
        .collect();
    Err(Error::MissingPositional(missing))
}

/// Pair open slots with tokens, in order. Returns the pairs and the unpaired tokens.
fn distribute(
    section: &Section,
    present: &IndexMap<String, Value>,
    tokens: Vec<String>,
) -> (Vec<(String, Value)>, Vec<String>) {
    if let Some(key) = &section.splat {
        return (vec![(key.clone(), Value::List(tokens))], Vec::new());
    }

    let open: Vec<&String> = section
        .names()
        .filter(|name| !present.contains_key(name.as_str()))
        .collect();
    let mut tokens = tokens.into_iter();
    let named = open
        .into_iter()
        .zip(tokens.by_ref())
        .map(|(name, token)| (name.clone(), Value::Scalar(token)))
        .collect();
    (named, tokens.collect())
}

/// Result of a [`Args::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Plain lookup; `None` when the key is known but was not given.
    Value(Option<&'a Value>),
    /// `name?` lookup.
    Truthy(bool),
}

/// Arguments bound against a [`Schema`].
///
/// An `Args` binds exactly once; a second [`bind`](Self::bind) fails with
/// [`Error::AlreadyBound`]. The schema is shared, so many `Args` can be built
/// from one `Arc<Schema>` across threads.
#[derive(Debug, Clone)]
pub struct Args {
    schema: Arc<Schema>,
    /// Keys readable even when absent from `values`.
    declared: IndexSet<String>,
    values: IndexMap<String, Value>,
    valid: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self::new(Schema::default())
    }
}

impl Args {
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        let schema = schema.into();
        let declared = schema
            .optional_prologue()
            .iter()
            .chain(schema.optional_epilogue())
            .chain(schema.flags().keys())
            .cloned()
            .collect();
        Self {
            schema,
            declared,
            values: IndexMap::new(),
            valid: false,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Scan and bind `tokens`.
    pub fn bind<I, S>(&mut self, tokens: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.valid {
            return Err(Error::AlreadyBound);
        }
        let parsed = self.schema.scan(tokens)?;
        self.values = bind(&self.schema, parsed)?;
        self.valid = true;
        Ok(self)
    }

    /// Bind mixed-style arguments (see [`crate::argv`]).
    pub fn bind_args(&mut self, args: &[Arg]) -> Result<&mut Self> {
        self.bind(to_argv(args))
    }

    /// Bind the running process's arguments, skipping argv[0].
    pub fn bind_env(&mut self) -> Result<&mut Self> {
        self.bind(std::env::args().skip(1))
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    /// Whether `key` names something this schema exposes.
    pub fn is_known(&self, key: &str) -> bool {
        let key = underscore(key);
        self.values.contains_key(&key) || self.declared.contains(&key)
    }

    /// Raw value for `key`. Unknown keys are an error; known but absent keys are `None`.
    pub fn get(&self, key: &str) -> Result<Option<&Value>> {
        let key = self.known_key(key)?;
        Ok(self.values.get(&key))
    }

    /// Truthiness of `key`; absent and negated flags are false.
    pub fn is_set(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some_and(Value::is_truthy))
    }

    /// `name` reads the value, `name?` reads its truthiness.
    pub fn lookup(&self, field: &str) -> Result<Lookup<'_>> {
        match field.strip_suffix(QUERY_SUFFIX) {
            Some(key) => self.is_set(key).map(Lookup::Truthy),
            None => self.get(field).map(Lookup::Value),
        }
    }

    pub fn help(&self) -> Vec<String> {
        crate::help::render(&self.schema)
    }

    fn known_key(&self, key: &str) -> Result<String> {
        let canonical = underscore(key);
        if self.values.contains_key(&canonical) || self.declared.contains(&canonical) {
            Ok(canonical)
        } else {
            Err(Error::UnknownKey(key.to_string()))
        }
    }
}
