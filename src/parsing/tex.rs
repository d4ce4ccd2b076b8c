//! Brace-depth-aware splitting of TeX-flavored strings.
//!
//! BibTeX name and field strings use `{...}` groups to protect text from being
//! split: `"Barnes and {Noble, Inc.}"` is one author list item away from
//! `"Barnes and Noble, Inc."`. The splitters here only honor separators at
//! brace depth zero. Unbalanced closing braces are tolerated and clamp at
//! depth zero, matching how lenient BibTeX implementations read bad input.

/// Split on a single separator character at brace depth zero.
///
/// Each piece is trimmed of surrounding whitespace; empty pieces are kept, so
/// `"Last, , First"` produces an empty middle group. A separator that starts
/// the string or ends it does not split, mirroring classic BibTeX tokenizers:
///
/// ```
/// use bib_resolver::parsing::tex::split_tex_list;
///
/// assert_eq!(
///     split_tex_list("Dixit, Jr, Avinash K.", ','),
///     ["Dixit", "Jr", "Avinash K."]
/// );
/// assert_eq!(split_tex_list("{Noble, Inc.}", ','), ["{Noble, Inc.}"]);
/// ```
#[must_use]
pub fn split_tex_list(input: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (position, ch) in input.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 && position > 0 => {
                let after = position + c.len_utf8();
                if after < input.len() {
                    parts.push(input[start..position].trim().to_string());
                    start = after;
                }
            }
            _ => {}
        }
    }
    if start < input.len() {
        parts.push(input[start..].trim().to_string());
    }
    parts
}

/// Split into words on runs of whitespace or `~` ties at brace depth zero.
///
/// TeX uses `~` for a non-breaking space between words; for tokenization it
/// behaves like any other space. Empty words are dropped.
///
/// ```
/// use bib_resolver::parsing::tex::split_tex_words;
///
/// assert_eq!(
///     split_tex_words("Michail~Markovitch"),
///     ["Michail", "Markovitch"]
/// );
/// assert_eq!(split_tex_words("{Sun Microsystems}"), ["{Sun Microsystems}"]);
/// ```
#[must_use]
pub fn split_tex_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in input.chars() {
        match ch {
            '{' => {
                depth += 1;
                current.push(ch);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if depth == 0 && (c.is_whitespace() || c == '~') => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_basic() {
        assert_eq!(split_tex_list("von Last, First", ','), ["von Last", "First"]);
        assert_eq!(
            split_tex_list("Last, Jr, First", ','),
            ["Last", "Jr", "First"]
        );
    }

    #[test]
    fn test_split_list_braces_protect_separator() {
        assert_eq!(
            split_tex_list("{Barnes, Noble}, First", ','),
            ["{Barnes, Noble}", "First"]
        );
        assert_eq!(
            split_tex_list("a{b,c{d,e}}f, g", ','),
            ["a{b,c{d,e}}f", "g"]
        );
    }

    #[test]
    fn test_split_list_keeps_empty_groups() {
        assert_eq!(split_tex_list("Last, , First", ','), ["Last", "", "First"]);
    }

    #[test]
    fn test_split_list_edge_separators_do_not_split() {
        // Leading and trailing separators are not split points.
        assert_eq!(split_tex_list(",abc", ','), [",abc"]);
        assert_eq!(split_tex_list("abc,", ','), ["abc,"]);
        assert_eq!(split_tex_list("", ','), Vec::<String>::new());
    }

    #[test]
    fn test_split_list_unbalanced_braces() {
        // A stray closing brace must not underflow the depth counter.
        assert_eq!(split_tex_list("a}b, c", ','), ["a}b", "c"]);
    }

    #[test]
    fn test_split_words_whitespace_and_ties() {
        assert_eq!(split_tex_words("Donald E. Knuth"), ["Donald", "E.", "Knuth"]);
        assert_eq!(split_tex_words("de~la Vall{\\'e}e"), ["de", "la", "Vall{\\'e}e"]);
        assert_eq!(split_tex_words("  spaced   out  "), ["spaced", "out"]);
        assert_eq!(split_tex_words(""), Vec::<String>::new());
    }

    #[test]
    fn test_split_words_braces_protect_spaces() {
        assert_eq!(
            split_tex_words("{Sun Microsystems} Labs"),
            ["{Sun Microsystems}", "Labs"]
        );
    }
}
