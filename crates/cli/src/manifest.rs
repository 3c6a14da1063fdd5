use aargs::{FlagConfig, FlagType, Schema, Slots};
use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_NAME: &str = "aargs.json";

/// JSON form of a [`Schema`].
///
/// Omitted sections keep the builder's inference rules, so `{}` is the fully
/// permissive schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prologue: Option<SlotsSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epilogue: Option<SlotsSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<IndexMap<String, FlagSpec>>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "any_flag")]
    pub any_flag: Option<FlagSpec>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub aliases: IndexMap<String, String>,
}

/// `true` for the default splat, `false` to disable, a string to name the
/// splat, or a list of names (`"name?"` for optional ones).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotsSpec {
    Enabled(bool),
    Splat(String),
    Names(Vec<String>),
}

impl SlotsSpec {
    fn into_slots(self, default_key: &str) -> Slots {
        match self {
            Self::Enabled(true) => Slots::splat(default_key),
            Self::Enabled(false) => Slots::Disabled,
            Self::Splat(key) => Slots::splat(key),
            Self::Names(names) => Slots::Names(names),
        }
    }
}

/// `true` for a generic flag, a string for a type tag, or `{ "type", "help" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagSpec {
    Enabled(bool),
    Type(String),
    Full {
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        help: Option<String>,
    },
}

impl FlagSpec {
    fn into_config(self) -> Option<FlagConfig> {
        match self {
            Self::Enabled(false) => None,
            Self::Enabled(true) => Some(FlagConfig::anything()),
            Self::Type(tag) => Some(FlagConfig::typed(&tag)),
            Self::Full { kind, help } => Some(FlagConfig {
                kind: kind.as_deref().map_or(FlagType::Anything, FlagType::parse),
                help,
            }),
        }
    }
}

impl Manifest {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read schema: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse schema JSON: {}", path.display()))
    }

    /// Build the schema. `program` overrides the manifest's program name.
    pub fn into_schema(self, program: Option<String>) -> Result<Schema> {
        let mut builder = Schema::builder();
        if let Some(program) = program.or(self.program) {
            builder = builder.program(program);
        }
        if let Some(prologue) = self.prologue {
            builder = builder.prologue(prologue.into_slots("prologue"));
        }
        if let Some(epilogue) = self.epilogue {
            builder = builder.epilogue(epilogue.into_slots("epilogue"));
        }
        if let Some(flags) = self.flags {
            builder = builder.no_flags();
            for (name, spec) in flags {
                if let Some(config) = spec.into_config() {
                    builder = builder.flag(&name, config);
                }
            }
        }
        if let Some(any_flag) = self.any_flag {
            builder = builder.any_flag(any_flag.into_config());
        }
        for (from, to) in &self.aliases {
            if from.trim().is_empty() || to.trim().is_empty() {
                bail!("alias entries must not be empty: '{from}' -> '{to}'");
            }
            builder = builder.alias(from, to);
        }
        builder.build().context("invalid schema")
    }
}

/// Load the manifest at `path`, or `aargs.json` in the working directory.
///
/// A missing default manifest is not an error; a missing explicit one is.
pub fn load_manifest(path: Option<&Path>) -> Result<Option<Manifest>> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let (path, explicit) = match path {
        Some(p) => (resolve_against(&cwd, p), true),
        None => (cwd.join(DEFAULT_MANIFEST_NAME), false),
    };

    if !path.exists() {
        if explicit {
            bail!("schema not found: {}", path.display());
        }
        return Ok(None);
    }

    tracing::debug!(path = %path.display(), "loading schema manifest");
    Manifest::from_file(&path).map(Some)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
