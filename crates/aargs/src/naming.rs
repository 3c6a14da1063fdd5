//! Name folding between argv spelling (`read-all`) and field spelling (`read_all`).

/// Fold every non-alphanumeric character to `_`.
///
/// This is the canonical form used for flag lookups, aliases, and bound keys.
pub fn underscore(src: &str) -> String {
    fold(src, '_')
}

/// Fold every non-alphanumeric character to `-`.
///
/// Used when rendering names back into argv form (errors, help, `to_argv`).
pub fn kebab(src: &str) -> String {
    fold(src, '-')
}

fn fold(src: &str, sep: char) -> String {
    src.chars()
        .map(|c| if c.is_alphanumeric() { c } else { sep })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_both_directions() {
        assert_eq!(underscore("read-all-about-it"), "read_all_about_it");
        assert_eq!(kebab("read_all_about_it"), "read-all-about-it");
        assert_eq!(underscore("a.b c"), "a_b_c");
        assert_eq!(kebab("plain"), "plain");
    }
}
