//! Usage line and flag table.

use crate::schema::{ANY_FLAG_MARKER, Schema};

/// Render usage text for `schema`.
///
/// The first line is always `Usage: <program> ...`. A table of
/// `name : description` rows follows only when at least one entry carries
/// its own help text; entries without help fall back to `(switch)` or
/// `(<type>)`.
pub fn render(schema: &Schema) -> Vec<String> {
    let order = schema.display_order();
    let shown: Vec<String> = order
        .iter()
        .map(|key| match key {
            Some(name) => schema.display_name(name),
            None => ANY_FLAG_MARKER.to_string(),
        })
        .collect();

    let usage = format!("Usage: {} {}", schema.program(), shown.join(" "))
        .trim_end()
        .to_string();

    let mut any_help = false;
    let rows: Vec<(&str, String)> = order
        .iter()
        .zip(&shown)
        .filter_map(|(key, left)| {
            let config = match key {
                Some(name) => schema.flag_config(name),
                None => schema.any_flag(),
            }?;
            any_help |= config.help.is_some();
            Some((left.as_str(), config.description()))
        })
        .collect();

    if rows.is_empty() || !any_help {
        return vec![usage];
    }

    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = Vec::with_capacity(rows.len() + 1);
    out.push(usage);
    for (left, help) in rows {
        out.push(format!("  {left:width$} : {help}"));
    }
    out
}

impl Schema {
    /// See [`render`].
    pub fn help(&self) -> Vec<String> {
        render(self)
    }
}
