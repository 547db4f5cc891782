//! Path parser.
//!
//! The gateway resends the caller's whole selection history on every
//! request as a `*`-joined string (`"1*1*2*3"`). [`classify`] turns that
//! string into the dialog node the caller is at plus the selection(s) they
//! just entered. Rules are checked in order and the first match wins.

use super::transitions::Node;
use crate::i18n::Language;

pub const DELIMITER: char = '*';
/// Separates answers inside one multi-select submission.
pub const ANSWER_SEPARATOR: char = ',';

const SCREENING_PREFIXES: [&str; 2] = ["1*1*", "2*1*"];
const HOTLINE_PREFIXES: [&str; 2] = ["1*2*", "2*2*"];

/// A classified path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath<'a> {
    pub node: Node,
    /// Language implied by the first menu choice; `None` for `Init` and
    /// unrecognized paths.
    pub language: Option<Language>,
    /// Newly entered selection(s): answer tokens for question nodes, the
    /// county name for `HotlineResult`, empty otherwise.
    pub selections: Vec<&'a str>,
}

impl<'a> ParsedPath<'a> {
    fn bare(node: Node, language: Option<Language>) -> Self {
        Self {
            node,
            language,
            selections: Vec::new(),
        }
    }

    fn unrecognized() -> Self {
        Self::bare(Node::Unrecognized, None)
    }
}

/// Classify an accumulated path string.
pub fn classify(path: &str) -> ParsedPath<'_> {
    if path.is_empty() {
        return ParsedPath::bare(Node::Init, None);
    }

    if let Some(language) = Language::from_menu_choice(path) {
        return ParsedPath::bare(Node::LanguageSelect, Some(language));
    }

    let language = path_language(path);

    if path == "1*2" || path == "2*2" {
        return ParsedPath::bare(Node::HotlineCountyPrompt, language);
    }

    if let Some(county) = HOTLINE_PREFIXES
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix))
    {
        return ParsedPath {
            node: Node::HotlineResult,
            language,
            selections: vec![county],
        };
    }

    if path == "1*1" || path == "2*1" {
        return ParsedPath::bare(Node::AgeMenu, language);
    }

    if !SCREENING_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return ParsedPath::unrecognized();
    }

    let delimiters = path.matches(DELIMITER).count();
    let Some(node) = Node::question_at_depth(delimiters) else {
        return ParsedPath::unrecognized();
    };
    if node.path_len().is_some_and(|len| path.len() != len) {
        return ParsedPath::unrecognized();
    }

    let segment = last_segment(path);
    let selections = if node.is_multi_select() {
        split_answers(segment)
    } else {
        vec![segment]
    };

    ParsedPath {
        node,
        language,
        selections,
    }
}

/// Language chosen by the first token of a path.
pub fn path_language(path: &str) -> Option<Language> {
    path.split(DELIMITER)
        .next()
        .and_then(Language::from_menu_choice)
}

/// Text after the final delimiter.
pub fn last_segment(path: &str) -> &str {
    path.rsplit_once(DELIMITER)
        .map_or(path, |(_, segment)| segment)
}

/// Split one multi-select submission into trimmed answer tokens.
///
/// Always uses the comma split; a non-empty submission without commas is a
/// single token.
pub fn split_answers(segment: &str) -> Vec<&str> {
    segment.split(ANSWER_SEPARATOR).map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(path: &str) -> Node {
        classify(path).node
    }

    #[test]
    fn classification_table() {
        let cases = [
            ("", Node::Init),
            ("1", Node::LanguageSelect),
            ("2", Node::LanguageSelect),
            ("3", Node::Unrecognized),
            ("1*2", Node::HotlineCountyPrompt),
            ("2*2", Node::HotlineCountyPrompt),
            ("1*2*Nairobi", Node::HotlineResult),
            ("2*2*Mombasa*1", Node::HotlineResult),
            ("1*1", Node::AgeMenu),
            ("2*1", Node::AgeMenu),
            ("1*10", Node::Unrecognized),
            ("1*3", Node::Unrecognized),
            ("1*1*2", Node::AgeSelect),
            ("2*1*5", Node::AgeSelect),
            ("1*1*12", Node::Unrecognized),
            ("1*1*", Node::Unrecognized),
            ("1*1*2*1", Node::CasesSelect),
            ("1*1*2*10", Node::Unrecognized),
            ("1*1*2*1*3", Node::ContactSelect),
            ("1*1*2*1*3*1,2", Node::HowContactSelect),
            ("1*1*2*1*3*1*4", Node::SymptomsSelect),
            ("1*1*2*1*3*1*4*5", Node::IllnessSelect),
            ("1*1*2*1*3*1*4*5*1", Node::Unrecognized),
            ("3*1*2", Node::Unrecognized),
        ];
        for (path, expected) in cases {
            assert_eq!(node(path), expected, "path {path:?}");
        }
    }

    #[test]
    fn language_follows_first_choice() {
        assert_eq!(classify("1").language, Some(Language::English));
        assert_eq!(classify("2").language, Some(Language::Swahili));
        assert_eq!(classify("2*2").language, Some(Language::Swahili));
        assert_eq!(classify("1*1").language, Some(Language::English));
        assert_eq!(classify("2*1*3").language, Some(Language::Swahili));
        assert_eq!(classify("").language, None);
    }

    #[test]
    fn hotline_result_carries_county() {
        let parsed = classify("1*2*Kisumu");
        assert_eq!(parsed.selections, vec!["Kisumu"]);
        let parsed = classify("2*2*");
        assert_eq!(parsed.node, Node::HotlineResult);
        assert_eq!(parsed.selections, vec![""]);
    }

    #[test]
    fn single_select_takes_last_token() {
        let parsed = classify("1*1*2*3");
        assert_eq!(parsed.node, Node::CasesSelect);
        assert_eq!(parsed.selections, vec!["3"]);
    }

    #[test]
    fn multi_select_splits_on_commas() {
        let parsed = classify("1*1*2*1*1*1,3");
        assert_eq!(parsed.node, Node::HowContactSelect);
        assert_eq!(parsed.selections, vec!["1", "3"]);

        let parsed = classify("1*1*2*1*1*2");
        assert_eq!(parsed.selections, vec!["2"]);

        // Spaces are not separators.
        let parsed = classify("1*1*2*1*1*2*1 2");
        assert_eq!(parsed.node, Node::SymptomsSelect);
        assert_eq!(parsed.selections, vec!["1 2"]);
    }

    #[test]
    fn multi_select_has_no_length_constraint() {
        let parsed = classify("2*1*5*3*3*1, 2, 6");
        assert_eq!(parsed.node, Node::HowContactSelect);
        assert_eq!(parsed.selections, vec!["1", "2", "6"]);
    }

    #[test]
    fn split_answers_never_returns_nothing() {
        assert_eq!(split_answers(""), vec![""]);
        assert_eq!(split_answers("4"), vec!["4"]);
        assert_eq!(split_answers("1,,2"), vec!["1", "", "2"]);
    }

    #[test]
    fn last_segment_of_undelimited_path_is_whole_path() {
        assert_eq!(last_segment("7"), "7");
        assert_eq!(last_segment("1*1*4"), "4");
    }
}
