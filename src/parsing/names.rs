//! Decomposition of free-form person names into BibTeX name parts.
//!
//! A name string arrives in one of three shapes:
//!
//! - `First von Last`
//! - `von Last, First`
//! - `von Last, Jr, First`
//!
//! Commas are only recognized at brace depth zero, so corporate names like
//! `{Barnes, Noble, Inc.}` stay whole. The "von" particles are detected by the
//! case of each word's first visible character, skipping protected brace groups
//! and treating TeX control sequences (`{\OE}`, `{\'e}`) as single logical
//! characters.
//!
//! Four or more comma groups is malformed input: it is reported through the
//! [`ErrorReporter`] as [`BibliographyError::InvalidNameString`], the excess
//! groups are folded back into the third, and parsing continues best-effort.

use serde::{Deserialize, Serialize};

use crate::errors::{BibliographyError, ErrorReporter};
use crate::parsing::tex::{split_tex_list, split_tex_words};

/// The five part sequences of a decomposed person name.
///
/// `last` is never empty after parsing a non-empty name string; a lone word
/// like `"abc"` is a last name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameParts {
    pub first: Vec<String>,
    pub middle: Vec<String>,
    pub prelast: Vec<String>,
    pub last: Vec<String>,
    pub lineage: Vec<String>,
}

impl NameParts {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
            && self.middle.is_empty()
            && self.prelast.is_empty()
            && self.last.is_empty()
            && self.lineage.is_empty()
    }

    /// First word becomes `first`, the rest `middle`.
    fn push_first_middle(&mut self, words: Vec<String>) {
        let mut words = words.into_iter();
        if let Some(first) = words.next() {
            self.first.push(first);
            self.middle.extend(words);
        }
    }

    /// Split a word list into von particles and last names.
    ///
    /// Scanning from the end, everything up to and including the last
    /// lowercase-leading word becomes `prelast`; the rest becomes `last`.
    /// The final word is always a last name, never a particle.
    fn push_von_last(&mut self, mut words: Vec<String>) {
        if let Some(final_word) = words.pop() {
            match words.iter().rposition(|word| is_von_word(word)) {
                Some(position) => {
                    let after_von = words.split_off(position + 1);
                    self.prelast.append(&mut words);
                    self.last.extend(after_von);
                }
                None => self.last.append(&mut words),
            }
            self.last.push(final_word);
        }
    }
}

/// Parse a free-form name string into [`NameParts`].
///
/// # Errors
///
/// A name with four or more top-level comma groups is reported through
/// `reporter`; only a strict reporter turns that into an `Err`. The
/// permissive and capturing modes continue with a best-effort parse.
pub fn parse_name(
    input: &str,
    reporter: &mut ErrorReporter,
) -> Result<NameParts, BibliographyError> {
    let mut parts = NameParts::default();
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(parts);
    }

    let mut groups = split_tex_list(trimmed, ',');
    if groups.len() > 3 {
        reporter.report(BibliographyError::InvalidNameString(input.to_string()))?;
        let collapsed = groups.split_off(2).join(" ");
        groups.push(collapsed);
    }

    match groups.len() {
        1 => {
            // First von Last
            let words = split_tex_words(trimmed);
            let von_start = words
                .iter()
                .position(|word| is_von_word(word))
                .unwrap_or(words.len());
            let mut first_middle = words;
            let mut von_last = first_middle.split_off(von_start);
            if von_last.is_empty() {
                // No particle found: the final word is the last name.
                if let Some(word) = first_middle.pop() {
                    von_last.push(word);
                }
            }
            parts.push_first_middle(first_middle);
            parts.push_von_last(von_last);
        }
        2 => {
            // von Last, First
            parts.push_von_last(split_tex_words(&groups[0]));
            parts.push_first_middle(split_tex_words(&groups[1]));
        }
        _ => {
            // von Last, Jr, First
            parts.push_von_last(split_tex_words(&groups[0]));
            parts.lineage.extend(split_tex_words(&groups[1]));
            parts.push_first_middle(split_tex_words(&groups[2]));
        }
    }

    Ok(parts)
}

/// Whether a word reads as a "von" particle: its first visible character,
/// skipping protected brace groups, is lowercase. Words with no case-bearing
/// character are not particles.
fn is_von_word(word: &str) -> bool {
    let mut depth = 0usize;
    let mut chars = word.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        match ch {
            '{' => {
                if depth == 0 && matches!(chars.peek(), Some((_, '\\'))) {
                    // A special character: the whole group is one logical
                    // character whose case the control sequence determines.
                    return control_sequence_is_lower(special_char_body(&word[position..]))
                        .unwrap_or(false);
                }
                depth += 1;
            }
            '}' => depth = depth.saturating_sub(1),
            c if depth == 0 && c.is_alphabetic() => return c.is_lowercase(),
            _ => {}
        }
    }
    false
}

/// Content of the brace group at the front of `group`, outer braces stripped.
/// Unterminated groups run to the end of the string.
fn special_char_body(group: &str) -> &str {
    let mut depth = 0usize;
    for (position, ch) in group.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &group[1..position];
                }
            }
            _ => {}
        }
    }
    &group[1..]
}

/// Case of a special character like `\OE` or `\'{e}`.
///
/// The foreign-letter macros carry their case in the macro name itself. Any
/// other control sequence takes the case of the first letter after its name;
/// with no such letter the case is undecided.
fn control_sequence_is_lower(body: &str) -> Option<bool> {
    let rest = body.strip_prefix('\\')?;
    let name_length = rest
        .chars()
        .take_while(|c| c.is_alphabetic())
        .map(char::len_utf8)
        .sum::<usize>();

    match &rest[..name_length] {
        "oe" | "ae" | "aa" | "o" | "l" | "i" | "j" | "ss" => return Some(true),
        "OE" | "AE" | "AA" | "O" | "L" => return Some(false),
        _ => {}
    }

    rest[name_length..]
        .chars()
        .skip(1) // the character that terminated the sequence name
        .find(|c| c.is_alphabetic())
        .map(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> NameParts {
        parse_name(input, &mut ErrorReporter::strict()).unwrap()
    }

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_first_middle_last() {
        let parts = parse("Donald E. Knuth");
        assert_eq!(parts.first, words(&["Donald"]));
        assert_eq!(parts.middle, words(&["E."]));
        assert!(parts.prelast.is_empty());
        assert_eq!(parts.last, words(&["Knuth"]));
        assert!(parts.lineage.is_empty());
    }

    #[test]
    fn test_comma_form() {
        let parts = parse("Viktorov, Michail~Markovitch");
        assert_eq!(parts.first, words(&["Michail"]));
        assert_eq!(parts.middle, words(&["Markovitch"]));
        assert_eq!(parts.last, words(&["Viktorov"]));
    }

    #[test]
    fn test_lineage_form() {
        let parts = parse("Dixit, Jr, Avinash K.");
        assert_eq!(parts.first, words(&["Avinash"]));
        assert_eq!(parts.middle, words(&["K."]));
        assert_eq!(parts.last, words(&["Dixit"]));
        assert_eq!(parts.lineage, words(&["Jr"]));
    }

    #[test]
    fn test_single_word_is_last_name() {
        let parts = parse("abc");
        assert!(parts.first.is_empty());
        assert_eq!(parts.last, words(&["abc"]));
    }

    #[test]
    fn test_empty_name() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
    }

    #[test]
    fn test_von_particles_inline() {
        let parts = parse("Ludwig van Beethoven");
        assert_eq!(parts.first, words(&["Ludwig"]));
        assert_eq!(parts.prelast, words(&["van"]));
        assert_eq!(parts.last, words(&["Beethoven"]));
    }

    #[test]
    fn test_von_run_scanned_from_end() {
        let parts = parse("Charles Louis Xavier Joseph de la Vall{\\'e}e Poussin");
        assert_eq!(parts.first, words(&["Charles"]));
        assert_eq!(parts.middle, words(&["Louis", "Xavier", "Joseph"]));
        assert_eq!(parts.prelast, words(&["de", "la"]));
        assert_eq!(parts.last, words(&["Vall{\\'e}e", "Poussin"]));
    }

    #[test]
    fn test_final_word_is_never_a_particle() {
        let parts = parse("von der berg");
        assert_eq!(parts.prelast, words(&["von", "der"]));
        assert_eq!(parts.last, words(&["berg"]));
    }

    #[test]
    fn test_von_in_comma_form() {
        let parts = parse("de la Fontaine, Jean");
        assert_eq!(parts.first, words(&["Jean"]));
        assert_eq!(parts.prelast, words(&["de", "la"]));
        assert_eq!(parts.last, words(&["Fontaine"]));
    }

    #[test]
    fn test_braced_group_is_not_a_particle() {
        // The brace group is skipped; "Thing" decides the case.
        let parts = parse("{von} Thing, First");
        assert_eq!(parts.last, words(&["{von}", "Thing"]));
        assert!(parts.prelast.is_empty());
    }

    #[test]
    fn test_special_character_case() {
        // \OE is an uppercase letter, so the word is not a particle.
        let parts = parse("First {\\OE}uvre");
        assert_eq!(parts.last, words(&["{\\OE}uvre"]));
        assert!(parts.prelast.is_empty());

        // \ss is lowercase, making the word a von particle.
        let parts = parse("First {\\ss}traße Last");
        assert_eq!(parts.first, words(&["First"]));
        assert_eq!(parts.prelast, words(&["{\\ss}traße"]));
        assert_eq!(parts.last, words(&["Last"]));

        // An accent control symbol takes the case of the letter it accents.
        let parts = parse("First {\\'e}cole Last");
        assert_eq!(parts.prelast, words(&["{\\'e}cole"]));
    }

    #[test]
    fn test_caseless_word_is_not_a_particle() {
        let parts = parse("123 Main");
        assert_eq!(parts.first, words(&["123"]));
        assert_eq!(parts.last, words(&["Main"]));
    }

    #[test]
    fn test_too_many_commas_strict() {
        let mut reporter = ErrorReporter::strict();
        let result = parse_name("a, b, c, d", &mut reporter);
        assert_eq!(
            result,
            Err(BibliographyError::InvalidNameString("a, b, c, d".to_string()))
        );
    }

    #[test]
    fn test_too_many_commas_best_effort() {
        let mut reporter = ErrorReporter::capturing();
        let parts = parse_name("Last, Jr, First, Extra", &mut reporter).unwrap();
        assert_eq!(reporter.captured().len(), 1);
        // Excess groups collapse into the first/middle group.
        assert_eq!(parts.last, words(&["Last"]));
        assert_eq!(parts.lineage, words(&["Jr"]));
        assert_eq!(parts.first, words(&["First"]));
        assert_eq!(parts.middle, words(&["Extra"]));
    }
}
