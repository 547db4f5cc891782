//! Screening state machine: dialog nodes and the `(node, token)` transition
//! table.

use crate::i18n::Prompt;
use crate::store::SessionField;

/// Position in the dialog tree, as recovered from a path string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Init,
    LanguageSelect,
    HotlineCountyPrompt,
    HotlineResult,
    AgeMenu,
    AgeSelect,
    CasesSelect,
    ContactSelect,
    HowContactSelect,
    SymptomsSelect,
    IllnessSelect,
    Unrecognized,
}

/// One answer a question node accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub key: &'static str,
    pub label: &'static str,
    pub score: i64,
}

const fn choice(key: &'static str, label: &'static str, score: i64) -> Choice {
    Choice { key, label, score }
}

const AGE: &[Choice] = &[
    choice("1", "0-15", 1),
    choice("2", "15-25", 1),
    choice("3", "25-40", 2),
    choice("4", "40-60", 2),
    choice("5", "60+", 3),
];

const CASES: &[Choice] = &[
    choice("1", ">100", 2),
    choice("2", "<100", 1),
    choice("3", "unknown", 1),
];

const CONTACT: &[Choice] = &[
    choice("1", "yes", 3),
    choice("2", "no", 1),
    choice("3", "unknown", 1),
];

const HOW_CONTACT: &[Choice] = &[
    choice("1", "working-together", 1),
    choice("2", "face-to-face", 2),
    choice("3", "travelling-together", 1),
    choice("4", "same-environment", 2),
    choice("5", "healthcare-exposure", 2),
    choice("6", "other", 1),
    choice("7", "none", 0),
];

const SYMPTOMS: &[Choice] = &[
    choice("1", "breathing-difficulty", 1),
    choice("2", "cough", 1),
    choice("3", "fatigue", 1),
    choice("4", "fever", 1),
    choice("5", "none", 0),
];

const ILLNESS: &[Choice] = &[
    choice("1", "diabetes", 1),
    choice("2", "asthma", 2),
    choice("3", "cancer", 1),
    choice("4", "hypertension", 2),
    choice("5", "tuberculosis", 2),
    choice("6", "respiratory-illness", 2),
    choice("7", "none", 0),
];

/// Question nodes in dialog order.
pub const QUESTIONS: [Node; 6] = [
    Node::AgeSelect,
    Node::CasesSelect,
    Node::ContactSelect,
    Node::HowContactSelect,
    Node::SymptomsSelect,
    Node::IllnessSelect,
];

impl Node {
    /// Question node answered by a screening path with `delimiters` `*`s.
    pub fn question_at_depth(delimiters: usize) -> Option<Self> {
        delimiters
            .checked_sub(2)
            .and_then(|index| QUESTIONS.get(index))
            .copied()
    }

    pub fn is_question(self) -> bool {
        self.choices().is_some()
    }

    pub fn is_multi_select(self) -> bool {
        matches!(
            self,
            Self::HowContactSelect | Self::SymptomsSelect | Self::IllnessSelect
        )
    }

    /// Exact path length required by single-select nodes.
    pub fn path_len(self) -> Option<usize> {
        match self {
            Self::AgeSelect => Some(5),
            Self::CasesSelect => Some(7),
            Self::ContactSelect => Some(9),
            _ => None,
        }
    }

    pub fn choices(self) -> Option<&'static [Choice]> {
        match self {
            Self::AgeSelect => Some(AGE),
            Self::CasesSelect => Some(CASES),
            Self::ContactSelect => Some(CONTACT),
            Self::HowContactSelect => Some(HOW_CONTACT),
            Self::SymptomsSelect => Some(SYMPTOMS),
            Self::IllnessSelect => Some(ILLNESS),
            _ => None,
        }
    }

    /// Session field an answer to this node is written to.
    pub fn field(self) -> Option<SessionField> {
        match self {
            Self::AgeSelect => Some(SessionField::AgeBracket),
            Self::CasesSelect => Some(SessionField::AerialCases),
            Self::ContactSelect => Some(SessionField::ContactWithCovid),
            Self::HowContactSelect => Some(SessionField::Contacts),
            Self::SymptomsSelect => Some(SessionField::Symptoms),
            Self::IllnessSelect => Some(SessionField::Illness),
            _ => None,
        }
    }

    /// Prompt shown once this question is answered; `None` for the last
    /// question, which ends in a risk result.
    pub fn next_prompt(self) -> Option<Prompt> {
        match self {
            Self::AgeSelect => Some(Prompt::CasesMenu),
            Self::CasesSelect => Some(Prompt::ContactMenu),
            Self::ContactSelect => Some(Prompt::HowContactMenu),
            Self::HowContactSelect => Some(Prompt::SymptomsMenu),
            Self::SymptomsSelect => Some(Prompt::IllnessMenu),
            _ => None,
        }
    }

    /// Short name used in logs and error messages.
    pub fn topic(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::LanguageSelect => "language",
            Self::HotlineCountyPrompt | Self::HotlineResult => "hotlines",
            Self::AgeMenu | Self::AgeSelect => "age",
            Self::CasesSelect => "cases",
            Self::ContactSelect => "contact",
            Self::HowContactSelect => "how contact happened",
            Self::SymptomsSelect => "symptoms",
            Self::IllnessSelect => "illness",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Transition table lookup: the choice `token` selects at `node`, if any.
pub fn lookup(node: Node, token: &str) -> Option<Choice> {
    let token = token.trim();
    node.choices()?
        .iter()
        .find(|choice| choice.key == token)
        .copied()
}
