//! Localized prompt text.
//!
//! Every caller-facing string is looked up through a [`Localizer`] keyed by
//! `(Language, Prompt)`. The built-in catalog carries the English and
//! Swahili menus used by the screening dialog.

use crate::dialog::risk::RiskBand;
use serde::{Deserialize, Serialize};

/// Languages a caller can pick on the first menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Swahili,
}

impl Language {
    /// Tag persisted in the session store.
    pub fn tag(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Swahili => "sw",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "en" => Some(Self::English),
            "sw" => Some(Self::Swahili),
            _ => None,
        }
    }

    /// Interpret a stored tag. Anything that is not English renders in
    /// Swahili, which is what existing sessions expect.
    pub fn from_stored(tag: &str) -> Self {
        Self::from_tag(tag).unwrap_or_else(|| {
            tracing::warn!("Unknown stored language tag {tag:?}, rendering in Swahili");
            Self::Swahili
        })
    }

    /// Map a first-menu selection (`1` / `2`) to a language.
    pub fn from_menu_choice(token: &str) -> Option<Self> {
        match token {
            "1" => Some(Self::English),
            "2" => Some(Self::Swahili),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Identifiers of every localized prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prompt {
    /// Bilingual welcome plus language menu.
    Welcome,
    ServiceMenu,
    CountyPrompt,
    HotlineHeader,
    AgeMenu,
    CasesMenu,
    ContactMenu,
    HowContactMenu,
    SymptomsMenu,
    IllnessMenu,
    /// Contains a `{band}` placeholder.
    RiskSummary,
    RiskBand(RiskBand),
    RiskClosing,
}

/// Source of localized prompt text.
pub trait Localizer: Send + Sync {
    fn text(&self, language: Language, prompt: Prompt) -> String;

    /// Recommendations shown with every risk result, in display order.
    fn recommendations(&self, language: Language) -> Vec<String>;
}

/// Compiled-in English/Swahili catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    pub fn new() -> Self {
        Self
    }

    fn lookup(language: Language, prompt: Prompt) -> &'static str {
        use Language::{English, Swahili};
        match (prompt, language) {
            (Prompt::Welcome, _) => {
                "Welcome to KoviApp. Select language\n1. English\n2. Kiswahili"
            }
            (Prompt::ServiceMenu, English) => {
                "Select service you want to access\n\
                 1. Self-Screening for COVID-19\n\
                 2. View local hotlines"
            }
            (Prompt::ServiceMenu, Swahili) => {
                "Changua huduma unachotaka kupata\n\
                 1. Kujichunguza dhidi ya COVID-19\n\
                 2. Tazama nambari za eneo"
            }
            (Prompt::CountyPrompt, English) => "Type county name",
            (Prompt::CountyPrompt, Swahili) => "Andika jina la kaunti",
            (Prompt::HotlineHeader, English) => "Numbers to call",
            (Prompt::HotlineHeader, Swahili) => "Nambari za kupiga",
            (Prompt::AgeMenu, English) => {
                "Welcome to KoviApp Self screening. Provide honest response\n\
                 How old are you\n\
                 1. 0 - 15 years\n\
                 2. 15 - 25 years\n\
                 3. 25 - 40 years\n\
                 4. 40 - 60 years\n\
                 5. Above 60 years"
            }
            (Prompt::AgeMenu, Swahili) => {
                "Karibu kwenye KoviApp uchunguzi wa kibinafsi. Toa mwitikio wa kweli\n\
                 Una miaka mingapi\n\
                 1. Miaka 0 - 15\n\
                 2. Miaka 15 - 25\n\
                 3. Miaka 25 - 40\n\
                 4. Miaka 40 - 60\n\
                 5. Miaka zaidi ya 60"
            }
            (Prompt::CasesMenu, English) => {
                "Have there been any case of COVID-19 in your area?\n\
                 1. More than 100 cases\n\
                 2. Less than 100\n\
                 3. Not known"
            }
            (Prompt::CasesMenu, Swahili) => {
                "Kumekuwa na kesi yoyote ya COVID-19 katika eneo lako?\n\
                 1. Zaidi ya kesi 100\n\
                 2. Chini ya kesi 100\n\
                 3. Haijulikani"
            }
            (Prompt::ContactMenu, English) => {
                "Have you been in contact with a suspected or confirmed COVID-19 case?\n\
                 1. Yes\n\
                 2. No\n\
                 3. Not Sure"
            }
            (Prompt::ContactMenu, Swahili) => {
                "Je! Ushawai karibiana na mgonjwa anayeshukiwa au \
                 aliyethibitika kuwa na COVID-19?\n\
                 1. Ndio\n\
                 2. Hapana\n\
                 3. Sina hakika"
            }
            (Prompt::HowContactMenu, English) => {
                "How did the contact happen?\n\
                 1. Working together\n\
                 2. Face to face contact\n\
                 3. Travelling together\n\
                 4. Living in same environment\n\
                 5. Healthcare associated exposure\n\
                 6. Other\n\
                 7. None\n\
                 Use commas for multiple answers"
            }
            (Prompt::HowContactMenu, Swahili) => {
                "Je! Mapatano yalikuwaje?\n\
                 1. Kufanya kazi pamoja\n\
                 2. Uso kwa uso\n\
                 3. Kusafiri pamoja\n\
                 4. Kuishi katika mazingira sawa\n\
                 5. Kupeana matibabu\n\
                 6. Nyingine\n\
                 7. Hakuna\n\
                 Tumia comma kutenganisha majibu"
            }
            (Prompt::SymptomsMenu, English) => {
                "Do you have any of the following symptoms?\n\
                 1. Difficulty in breathing\n\
                 2. Cough\n\
                 3. Tiredness/Fatigue\n\
                 4. Fever\n\
                 5. None of the above"
            }
            (Prompt::SymptomsMenu, Swahili) => {
                "Je! Una dalili zifuatazo?\n\
                 1. Ugumu wa kupumua\n\
                 2. Kikohozi\n\
                 3. Uchovu\n\
                 4. Homa\n\
                 5. Hakuna"
            }
            (Prompt::IllnessMenu, English) => {
                "Do you have any of the following?\n\
                 1. Diabetes\n\
                 2. Asthmatic\n\
                 3. Cancer\n\
                 4. Hyper Tension\n\
                 5. Tuberculosis\n\
                 6. Respiratory illness\n\
                 7. None of the above"
            }
            (Prompt::IllnessMenu, Swahili) => {
                "Je! Unaugua yoyote yafuatayo?\n\
                 1. Ugonjwa wa sukari\n\
                 2. Pumu\n\
                 3. Saratani\n\
                 4. Shinikizo la damu\n\
                 5. Kifua kikuu\n\
                 6. Ugonjwa wa kupumua\n\
                 7. Hakuna yaliyo hapo juu"
            }
            (Prompt::RiskSummary, English) => {
                "You have {band} risk of getting COVID-19.\n\
                 Observe the following recommendations to reduce your risk"
            }
            (Prompt::RiskSummary, Swahili) => {
                "Una hatari ya {band} kupata COVID-19.\n\
                 Zingatia maagizo uliyopewa ili kupunguza hatari yako"
            }
            (Prompt::RiskBand(RiskBand::High), English) => "HIGH",
            (Prompt::RiskBand(RiskBand::High), Swahili) => "JUU",
            (Prompt::RiskBand(RiskBand::Medium), English) => "MEDIUM",
            (Prompt::RiskBand(RiskBand::Medium), Swahili) => "KATI",
            (Prompt::RiskBand(RiskBand::Low), English) => "LOW",
            (Prompt::RiskBand(RiskBand::Low), Swahili) => "CHINI",
            (Prompt::RiskClosing, English) => {
                "Take the questionnaire on a daily basis in order to stay updated\n\
                 See you next time"
            }
            (Prompt::RiskClosing, Swahili) => {
                "Fanya jaribio hili kila siku ndiposa ujikinge zaidi\nTutaonana wakati mwingine"
            }
        }
    }
}

impl Localizer for BuiltinCatalog {
    fn text(&self, language: Language, prompt: Prompt) -> String {
        Self::lookup(language, prompt).to_string()
    }

    fn recommendations(&self, language: Language) -> Vec<String> {
        let items: &[&str] = match language {
            Language::English => &[
                "Wear mask",
                "Avoid congested places",
                "Keep social distance of 1.5 m",
            ],
            Language::Swahili => &[
                "Vaa barakoa",
                "Epuka maeneo yenye msongamano",
                "Weka umbali wa mita 1.5",
            ],
        };
        items.iter().map(|s| (*s).to_string()).collect()
    }
}
