//! Profession keyword matching.
//!
//! Classification only picks a tone for the prompt and a stock image for the
//! hero section. It never gates correctness: unknown professions map to
//! [`ProfessionCategory::General`].

use std::fmt;

/// Broad category of a client's profession.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfessionCategory {
    Creative,
    Health,
    Legal,
    Finance,
    Technology,
    Trades,
    Hospitality,
    Education,
    RealEstate,
    General,
}

/// Keyword table, checked in order; the first category with a matching
/// keyword wins.
const KEYWORDS: &[(ProfessionCategory, &[&str])] = &[
    (
        ProfessionCategory::Creative,
        &[
            "photograph", "design", "artist", "illustrat", "videograph", "musician", "writer",
            "makeup", "tattoo", "florist",
        ],
    ),
    (
        ProfessionCategory::Health,
        &[
            "doctor", "dentist", "therap", "nurse", "physio", "chiropract", "nutrition",
            "coach", "yoga", "massage", "psycholog", "clinic",
        ],
    ),
    (
        ProfessionCategory::Legal,
        &["lawyer", "attorney", "legal", "notary", "paralegal", "solicitor"],
    ),
    (
        ProfessionCategory::Finance,
        &["account", "bookkeep", "financ", "tax", "insurance", "advisor", "consultant"],
    ),
    (
        ProfessionCategory::Technology,
        &["developer", "engineer", "software", "programmer", "it ", "data", "web"],
    ),
    (
        ProfessionCategory::Trades,
        &[
            "plumb", "electric", "carpent", "contractor", "roof", "landscap", "mechanic",
            "painter", "builder", "handyman", "cleaning",
        ],
    ),
    (
        ProfessionCategory::Hospitality,
        &["chef", "restaurant", "cater", "baker", "cafe", "hotel", "bartend"],
    ),
    (
        ProfessionCategory::Education,
        &["teacher", "tutor", "instructor", "trainer", "professor", "school"],
    ),
    (
        ProfessionCategory::RealEstate,
        &["real estate", "realtor", "broker", "property", "realty"],
    ),
];

impl ProfessionCategory {
    /// Classify a free-form profession string.
    pub fn classify(profession: &str) -> Self {
        let normalized = normalize(profession);
        if normalized.is_empty() {
            return ProfessionCategory::General;
        }
        // Pad so that keywords with a trailing space (e.g. "it ") match at the end.
        let haystack = format!("{normalized} ");
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| haystack.contains(w)))
            .map(|(category, _)| *category)
            .unwrap_or(ProfessionCategory::General)
    }

    /// Tone modifier appended to the generation prompt.
    pub fn tone(self) -> &'static str {
        match self {
            ProfessionCategory::Creative => {
                "Use an expressive, visual and inspiring tone that showcases creativity."
            }
            ProfessionCategory::Health => {
                "Use a warm, caring and reassuring tone that builds trust with patients and clients."
            }
            ProfessionCategory::Legal => {
                "Use a formal, precise and authoritative tone that conveys reliability."
            }
            ProfessionCategory::Finance => {
                "Use a confident, clear and trustworthy tone focused on results."
            }
            ProfessionCategory::Technology => {
                "Use a modern, concise and solution-oriented tone."
            }
            ProfessionCategory::Trades => {
                "Use a friendly, practical and dependable tone that stresses quality workmanship."
            }
            ProfessionCategory::Hospitality => {
                "Use an inviting, sensory and welcoming tone."
            }
            ProfessionCategory::Education => {
                "Use an encouraging, patient and knowledgeable tone."
            }
            ProfessionCategory::RealEstate => {
                "Use an aspirational, local and professional tone."
            }
            ProfessionCategory::General => "Use a professional, friendly and approachable tone.",
        }
    }

    /// Stock hero image used when the client supplied no photo.
    pub fn stock_image(self) -> &'static str {
        match self {
            ProfessionCategory::Creative => {
                "https://images.unsplash.com/photo-1452587925148-ce544e77e70d?w=1600"
            }
            ProfessionCategory::Health => {
                "https://images.unsplash.com/photo-1576091160399-112ba8d25d1d?w=1600"
            }
            ProfessionCategory::Legal => {
                "https://images.unsplash.com/photo-1589829545856-d10d557cf95f?w=1600"
            }
            ProfessionCategory::Finance => {
                "https://images.unsplash.com/photo-1554224155-6726b3ff858f?w=1600"
            }
            ProfessionCategory::Technology => {
                "https://images.unsplash.com/photo-1518770660439-4636190af475?w=1600"
            }
            ProfessionCategory::Trades => {
                "https://images.unsplash.com/photo-1581578731548-c64695cc6952?w=1600"
            }
            ProfessionCategory::Hospitality => {
                "https://images.unsplash.com/photo-1414235077428-338989a2e8c0?w=1600"
            }
            ProfessionCategory::Education => {
                "https://images.unsplash.com/photo-1503676260728-1c00da094a0b?w=1600"
            }
            ProfessionCategory::RealEstate => {
                "https://images.unsplash.com/photo-1560518883-ce09059eeffa?w=1600"
            }
            ProfessionCategory::General => {
                "https://images.unsplash.com/photo-1497366216548-37526070297c?w=1600"
            }
        }
    }
}

impl fmt::Display for ProfessionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProfessionCategory::Creative => "creative",
            ProfessionCategory::Health => "health",
            ProfessionCategory::Legal => "legal",
            ProfessionCategory::Finance => "finance",
            ProfessionCategory::Technology => "technology",
            ProfessionCategory::Trades => "trades",
            ProfessionCategory::Hospitality => "hospitality",
            ProfessionCategory::Education => "education",
            ProfessionCategory::RealEstate => "real-estate",
            ProfessionCategory::General => "general",
        };
        f.write_str(s)
    }
}

/// Lowercase, collapse whitespace, drop punctuation.
fn normalize(profession: &str) -> String {
    profession
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
