use std::fmt;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::naming::{kebab, underscore};
use crate::scan::{ParseResult, Scanner};

const DEFAULT_PROGRAM: &str = "aargs";
const DEFAULT_PROLOGUE_KEY: &str = "prologue";
const DEFAULT_EPILOGUE_KEY: &str = "epilogue";

/// Display form of the catch-all flag entry in usage text.
pub const ANY_FLAG_MARKER: &str = "[FLAGS]";

/// Declared type of a flag.
///
/// Only `Boolean` changes scanning (no `=value`, no value from the next token).
/// Other tags are carried through to help text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagType {
    Boolean,
    Anything,
    Named(String),
}

impl FlagType {
    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "boolean" | "bool" | "switch" => Self::Boolean,
            "" | "anything" | "any" => Self::Anything,
            other => Self::Named(other.to_string()),
        }
    }
}

impl fmt::Display for FlagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("boolean"),
            Self::Anything => f.write_str("anything"),
            Self::Named(tag) => f.write_str(tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagConfig {
    pub kind: FlagType,
    pub help: Option<String>,
}

impl FlagConfig {
    pub fn new(kind: FlagType) -> Self {
        Self { kind, help: None }
    }

    pub fn boolean() -> Self {
        Self::new(FlagType::Boolean)
    }

    pub fn anything() -> Self {
        Self::new(FlagType::Anything)
    }

    pub fn typed(tag: &str) -> Self {
        Self::new(FlagType::parse(tag))
    }

    /// Help text only; the type defaults to `anything`.
    pub fn help(text: impl Into<String>) -> Self {
        Self::anything().with_help(text)
    }

    pub fn with_help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    pub fn is_boolean(&self) -> bool {
        self.kind == FlagType::Boolean
    }

    /// Help column text, falling back to the type.
    pub fn description(&self) -> String {
        match (&self.help, &self.kind) {
            (Some(help), _) => help.clone(),
            (None, FlagType::Boolean) => "(switch)".to_string(),
            (None, kind) => format!("({kind})"),
        }
    }
}

/// How one positional section (prologue or epilogue) is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slots {
    /// Every token of the section goes to one name, as a list.
    Splat(String),
    /// Named slots; a trailing `?` marks a name optional.
    Names(Vec<String>),
    Disabled,
}

impl Slots {
    pub fn splat(key: impl Into<String>) -> Self {
        Self::Splat(key.into())
    }

    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Names(names.into_iter().map(Into::into).collect())
    }
}

/// Resolved positional section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Section {
    pub(crate) required: Vec<String>,
    pub(crate) optional: Vec<String>,
    pub(crate) splat: Option<String>,
}

impl Section {
    fn resolve(slots: Slots, label: &str) -> Result<Self> {
        let mut section = Self::default();
        match slots {
            Slots::Disabled => {}
            Slots::Splat(key) => section.splat = Some(underscore(&key)),
            Slots::Names(names) => {
                for raw in names {
                    match raw.strip_suffix('?') {
                        Some(name) => section.optional.push(underscore(name)),
                        None if !section.optional.is_empty() => {
                            return Err(Error::InvalidSchema(format!(
                                "required {label} '{raw}' cannot follow optional {label}"
                            )));
                        }
                        None => section.required.push(underscore(&raw)),
                    }
                }
            }
        }
        Ok(section)
    }

    /// Named slots, required first.
    pub(crate) fn names(&self) -> impl Iterator<Item = &String> {
        self.required.iter().chain(self.optional.iter())
    }

    /// Display order: required, optional, splat.
    fn display_keys(&self) -> impl Iterator<Item = &String> {
        self.names().chain(self.splat.iter())
    }
}

/// Builder for [`Schema`].
///
/// Unset sections are inferred from what *was* set (an explicitly disabled
/// section counts as unset here):
/// - prologue unset: disabled if the epilogue or flags were set, else a
///   `prologue` splat
/// - epilogue unset: disabled if the prologue or flags were set, else an
///   `epilogue` splat
/// - catch-all flag unset: none if flags were set, else `anything`
///
/// So `Schema::builder().build()` accepts any argv, and declaring any part
/// of the shape makes the rest strict.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    program: Option<String>,
    prologue: Option<Slots>,
    epilogue: Option<Slots>,
    flags: Option<IndexMap<String, FlagConfig>>,
    any_flag: Option<Option<FlagConfig>>,
    aliases: IndexMap<String, String>,
}

impl SchemaBuilder {
    pub fn program(mut self, name: impl Into<String>) -> Self {
        self.program = Some(name.into());
        self
    }

    pub fn prologue(mut self, slots: Slots) -> Self {
        self.prologue = Some(slots);
        self
    }

    pub fn epilogue(mut self, slots: Slots) -> Self {
        self.epilogue = Some(slots);
        self
    }

    /// Declare a flag. Any call marks the flag table as explicitly set.
    pub fn flag(mut self, name: &str, config: FlagConfig) -> Self {
        self.flags
            .get_or_insert_with(IndexMap::new)
            .insert(underscore(name), config);
        self
    }

    /// Mark the flag table as explicitly set without declaring anything.
    pub fn no_flags(mut self) -> Self {
        self.flags.get_or_insert_with(IndexMap::new);
        self
    }

    /// Config applied to any flag not declared with [`flag`](Self::flag).
    pub fn any_flag(mut self, config: Option<FlagConfig>) -> Self {
        self.any_flag = Some(config);
        self
    }

    pub fn alias(mut self, from: &str, to: &str) -> Self {
        self.aliases.insert(underscore(from), underscore(to));
        self
    }

    pub fn build(self) -> Result<Schema> {
        let prologue_set = declares_slots(self.prologue.as_ref());
        let epilogue_set = declares_slots(self.epilogue.as_ref());
        let flags_set = self.flags.is_some();

        let prologue = self.prologue.unwrap_or_else(|| {
            if epilogue_set || flags_set {
                Slots::Disabled
            } else {
                Slots::splat(DEFAULT_PROLOGUE_KEY)
            }
        });
        let epilogue = self.epilogue.unwrap_or_else(|| {
            if prologue_set || flags_set {
                Slots::Disabled
            } else {
                Slots::splat(DEFAULT_EPILOGUE_KEY)
            }
        });
        let any_flag = self
            .any_flag
            .unwrap_or_else(|| (!flags_set).then(FlagConfig::anything));

        Ok(Schema {
            program: self.program.unwrap_or_else(program_from_env),
            prologue: Section::resolve(prologue, "prologue")?,
            epilogue: Section::resolve(epilogue, "epilogue")?,
            flags: self.flags.unwrap_or_default(),
            any_flag,
            aliases: self.aliases,
        })
    }
}

/// A disabled section does not count as declared when inferring the others.
fn declares_slots(slots: Option<&Slots>) -> bool {
    slots.is_some_and(|slots| *slots != Slots::Disabled)
}

fn program_from_env() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|argv0| Path::new(argv0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_PROGRAM.to_string())
}

/// Declared shape of a command line. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    program: String,
    pub(crate) prologue: Section,
    pub(crate) epilogue: Section,
    flags: IndexMap<String, FlagConfig>,
    any_flag: Option<FlagConfig>,
    aliases: IndexMap<String, String>,
}

impl Default for Schema {
    /// The fully permissive schema: prologue and epilogue splats, any flag.
    fn default() -> Self {
        Self {
            program: program_from_env(),
            prologue: Section {
                splat: Some(DEFAULT_PROLOGUE_KEY.to_string()),
                ..Default::default()
            },
            epilogue: Section {
                splat: Some(DEFAULT_EPILOGUE_KEY.to_string()),
                ..Default::default()
            },
            flags: IndexMap::new(),
            any_flag: Some(FlagConfig::anything()),
            aliases: IndexMap::new(),
        }
    }
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn required_prologue(&self) -> &[String] {
        &self.prologue.required
    }

    pub fn optional_prologue(&self) -> &[String] {
        &self.prologue.optional
    }

    pub fn prologue_key(&self) -> Option<&str> {
        self.prologue.splat.as_deref()
    }

    pub fn required_epilogue(&self) -> &[String] {
        &self.epilogue.required
    }

    pub fn optional_epilogue(&self) -> &[String] {
        &self.epilogue.optional
    }

    pub fn epilogue_key(&self) -> Option<&str> {
        self.epilogue.splat.as_deref()
    }

    /// Explicitly declared flags, in declaration order.
    pub fn flags(&self) -> &IndexMap<String, FlagConfig> {
        &self.flags
    }

    pub fn any_flag(&self) -> Option<&FlagConfig> {
        self.any_flag.as_ref()
    }

    pub fn aliases(&self) -> &IndexMap<String, String> {
        &self.aliases
    }

    /// Config for `name`, falling back to the catch-all.
    pub fn flag_config(&self, name: &str) -> Option<&FlagConfig> {
        self.flags.get(name).or(self.any_flag.as_ref())
    }

    pub fn is_boolean(&self, name: &str) -> bool {
        self.flag_config(name).is_some_and(FlagConfig::is_boolean)
    }

    /// Canonical field name for a raw flag name (`f` -> `flag`, `dry-run` -> `dry_run`).
    pub fn resolve(&self, raw: &str) -> String {
        let name = underscore(raw);
        match self.aliases.get(&name) {
            Some(target) => target.clone(),
            None => name,
        }
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.prologue.required.iter().any(|n| n == name)
            || self.epilogue.required.iter().any(|n| n == name)
    }

    pub fn is_optional(&self, name: &str) -> bool {
        self.prologue.optional.iter().any(|n| n == name)
            || self.epilogue.optional.iter().any(|n| n == name)
    }

    pub fn is_splat(&self, name: &str) -> bool {
        self.prologue.splat.as_deref() == Some(name) || self.epilogue.splat.as_deref() == Some(name)
    }

    /// How `name` appears in usage text and error messages.
    pub fn display_name(&self, name: &str) -> String {
        let arg = kebab(name);
        if self.is_required(name) {
            arg.to_uppercase()
        } else if self.is_optional(name) {
            format!("[{}]", arg.to_uppercase())
        } else if self.is_splat(name) {
            let upper = arg.to_uppercase();
            format!("[{upper} ... [{upper}]]")
        } else if self.is_boolean(name) {
            format!("--[no-]{arg}")
        } else {
            format!("--{arg}=VALUE")
        }
    }

    /// Names in usage order: prologue, flags not already listed, epilogue.
    ///
    /// `None` stands for the catch-all flag entry.
    pub(crate) fn display_order(&self) -> Vec<Option<&str>> {
        let prologue: Vec<&str> = self.prologue.display_keys().map(String::as_str).collect();
        let mut order: Vec<Option<&str>> = prologue.iter().copied().map(Some).collect();
        order.extend(
            self.flags
                .keys()
                .map(String::as_str)
                .filter(|key| !prologue.contains(key))
                .map(Some),
        );
        if self.any_flag.is_some() {
            order.push(None);
        }
        order.extend(self.epilogue.display_keys().map(|k| Some(k.as_str())));
        order
    }

    /// Scan `tokens` with this schema's aliases and flag types.
    pub fn scan<I, S>(&self, tokens: I) -> Result<ParseResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Scanner::new(self).scan(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_builder_is_permissive() {
        let schema = Schema::builder().program("t").build().unwrap();
        assert_eq!(schema.prologue_key(), Some("prologue"));
        assert_eq!(schema.epilogue_key(), Some("epilogue"));
        assert_eq!(schema.any_flag(), Some(&FlagConfig::anything()));
    }

    #[test]
    fn declaring_prologue_disables_epilogue() {
        let schema = Schema::builder()
            .prologue(Slots::names(["mode"]))
            .build()
            .unwrap();
        assert_eq!(schema.required_prologue(), ["mode"]);
        assert_eq!(schema.epilogue_key(), None);
        assert!(schema.required_epilogue().is_empty());
        // flags were not declared, so the catch-all stays
        assert!(schema.any_flag().is_some());
    }

    #[test]
    fn declaring_flags_disables_everything_else() {
        let schema = Schema::builder()
            .flag("src", FlagConfig::help("file to operate on"))
            .build()
            .unwrap();
        assert_eq!(schema.prologue_key(), None);
        assert_eq!(schema.epilogue_key(), None);
        assert!(schema.any_flag().is_none());
        assert!(schema.flag_config("other").is_none());
    }

    #[test]
    fn declaring_epilogue_disables_prologue() {
        let schema = Schema::builder()
            .epilogue(Slots::splat("rest"))
            .build()
            .unwrap();
        assert_eq!(schema.prologue_key(), None);
        assert_eq!(schema.epilogue_key(), Some("rest"));
    }

    #[test]
    fn disabling_one_section_keeps_the_other_permissive() {
        let schema = Schema::builder()
            .epilogue(Slots::Disabled)
            .build()
            .unwrap();
        assert_eq!(schema.prologue_key(), Some("prologue"));
        assert_eq!(schema.epilogue_key(), None);
        assert!(schema.any_flag().is_some());

        let schema = Schema::builder()
            .prologue(Slots::Disabled)
            .build()
            .unwrap();
        assert_eq!(schema.prologue_key(), None);
        assert_eq!(schema.epilogue_key(), Some("epilogue"));
        assert!(schema.any_flag().is_some());
    }

    #[test]
    fn optional_names_are_split_out() {
        let schema = Schema::builder()
            .prologue(Slots::names(["mode", "out-file?"]))
            .build()
            .unwrap();
        assert_eq!(schema.required_prologue(), ["mode"]);
        assert_eq!(schema.optional_prologue(), ["out_file"]);
    }

    #[test]
    fn required_after_optional_is_rejected() {
        let err = Schema::builder()
            .prologue(Slots::names(["a?", "b"]))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(msg) if msg.contains("cannot follow optional")));

        let err = Schema::builder()
            .epilogue(Slots::names(["x?", "y"]))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));
    }

    #[test]
    fn aliases_resolve_to_canonical_names() {
        let schema = Schema::builder()
            .alias("f", "flag")
            .alias("n", "dry-run")
            .build()
            .unwrap();
        assert_eq!(schema.resolve("f"), "flag");
        assert_eq!(schema.resolve("n"), "dry_run");
        assert_eq!(schema.resolve("read-all"), "read_all");
    }

    #[test]
    fn display_names() {
        let schema = Schema::builder()
            .prologue(Slots::names(["mode", "file?"]))
            .epilogue(Slots::splat("etc"))
            .flag("verbose", FlagConfig::boolean())
            .flag("out_dir", FlagConfig::typed("path"))
            .build()
            .unwrap();
        assert_eq!(schema.display_name("mode"), "MODE");
        assert_eq!(schema.display_name("file"), "[FILE]");
        assert_eq!(schema.display_name("etc"), "[ETC ... [ETC]]");
        assert_eq!(schema.display_name("verbose"), "--[no-]verbose");
        assert_eq!(schema.display_name("out_dir"), "--out-dir=VALUE");
    }

    #[test]
    fn flag_type_tags() {
        assert_eq!(FlagType::parse("boolean"), FlagType::Boolean);
        assert_eq!(FlagType::parse("anything"), FlagType::Anything);
        assert_eq!(FlagType::parse("path"), FlagType::Named("path".into()));
        assert_eq!(FlagConfig::typed("path").description(), "(path)");
        assert_eq!(FlagConfig::boolean().description(), "(switch)");
    }
}
