//! Permissive argv parsing with optional schema binding.
//!
//! Scanning splits an argv into three parts without needing any declaration:
//!
//! ```text
//! look how --easy --this=is to use!
//! \______/ \______________/ \_____/
//! prologue      flags       epilogue
//! ```
//!
//! A [`Schema`] then names the positional slots, declares flag types and
//! aliases, and [`Args`] binds a scanned argv against it:
//!
//! ```
//! use aargs::{Args, Schema, Slots, Value};
//!
//! let schema = Schema::builder()
//!     .prologue(Slots::names(["mode"]))
//!     .epilogue(Slots::splat("etc"))
//!     .build()?;
//! let mut args = Args::new(schema);
//! args.bind(["anything", "extra1", "--read-all-about-it", "--", "extra2"])?;
//! assert_eq!(args.get("mode")?, Some(&Value::from("anything")));
//! assert!(args.is_set("read_all_about_it")?);
//! # Ok::<(), aargs::Error>(())
//! ```

pub mod argv;
mod bind;
mod error;
pub mod help;
pub mod naming;
mod scan;
mod schema;
mod value;

pub use argv::{Arg, ArgvBuilder, Keyword, to_argv};
pub use bind::{Args, Lookup, QUERY_SUFFIX, bind};
pub use error::{Error, Result};
pub use scan::{ParseResult, Scanner, scan};
pub use schema::{ANY_FLAG_MARKER, FlagConfig, FlagType, Schema, SchemaBuilder, Slots};
pub use value::Value;
