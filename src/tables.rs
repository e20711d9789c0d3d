//! Built-in lookup tables for healthcare / value-based care news.
//!
//! These are the defaults behind [`crate::config::Config`]. A YAML config can
//! replace any of them; nothing here is read directly by the filtering code.

use crate::categorize::CategoryRule;
use crate::relevance::{DisambiguationRule, FilterTables};

/// English stopwords removed before title comparison.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
    "it", "its", "of", "on", "that", "the", "to", "was", "will", "with", "their", "this", "but",
    "they", "have", "had", "what", "when", "where", "who", "which", "why", "how", "all", "each",
    "every", "both", "few", "more", "most", "other", "some", "such", "than", "too", "very", "can",
    "just", "should", "now",
];

/// Terms present in most healthcare headlines regardless of story. They carry
/// no signal about whether two titles describe the same event.
pub const GENERIC_TERMS: &[&str] = &[
    "value", "based", "care", "medicare", "advantage", "health", "healthcare", "cms", "medical",
    "patient", "patients", "provider", "providers", "plan", "plans", "program", "model", "new",
    "report", "reports", "announces", "update", "news", "2025", "2024", "quarter", "q3", "says",
    "gets", "launches", "releases", "year",
];

/// Domain keywords used when the config does not supply any.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "value-based care",
    "value based care",
    "medicare advantage",
    "accountable care",
    "aco",
    "cms",
    "cmmi",
    "risk adjustment",
    "shared savings",
    "capitation",
    "population health",
    "bundled payment",
    "medicaid",
    "physician fee schedule",
];

const BLOCKED_SOURCES: &[&str] = &[
    "newser.com",
    "富途牛牛",
    "the kenya times",
    "tuko news",
    "fundação cultural do pará",
    "rs web solutions",
];

const SOURCE_SPAM_PATTERNS: &[&str] = &[
    "investigation alert",
    "investor news",
    "law firm",
    "eagel & squire",
];

const SPAM_TERMS: &[&str] = &[
    // technical-trading spam
    "bollinger bands",
    "macd trends",
    "swing trade",
    "stock prediction",
    "price action summary",
    "momentum entry alerts",
    "breakout alerts",
    "volatility report",
    "weekly high return",
    "technical buy zone",
    "stop loss",
    "high conviction investment",
    "chart breakout",
    "trade entry summary",
    "buy zone picks",
    "momentum entry",
    "portfolio risk report",
    "fast exit and entry",
    // shareholder litigation spam
    "investigation alert",
    "investor alert",
    "securities claims",
    "suffered losses",
    "encourages investors to contact",
    "law firm announces investigation",
    "shareholder rights",
];

/// Kenyan education coverage uses "capitation" in an unrelated sense.
const GEOGRAPHIC_EXCLUSIONS: &[&str] = &["ksh", "kenyan", "kenya", "ruto", "ogamba"];

const TOPIC_EXCLUSIONS: &[&str] = &[
    "basketball",
    "football",
    "soccer",
    "nba",
    "nfl",
    "mlb",
    "doubles crown",
    "nationals 2025",
    "nuclear energy",
    "clean energy",
    "renewable energy",
    "e-commerce",
    "python package",
    "pypi",
    "gaming",
    "video game",
    "esports",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_keywords() -> Vec<String> {
    strings(DEFAULT_KEYWORDS)
}

pub fn default_stopwords() -> Vec<String> {
    strings(STOPWORDS)
}

pub fn default_generic_terms() -> Vec<String> {
    strings(GENERIC_TERMS)
}

pub fn default_disambiguation() -> Vec<DisambiguationRule> {
    vec![
        // CMMI the cybersecurity maturity model, not the CMS Innovation Center.
        DisambiguationRule {
            term: "cmmi".to_string(),
            context: strings(&["medicare", "medicaid", "health", "cms", "innovation"]),
            ambiguity_signals: strings(&["cybersecurity", "software development", "maturity level"]),
            disqualifiers: Vec::new(),
        },
        // CMS the content management system.
        DisambiguationRule {
            term: "cms".to_string(),
            context: strings(&[
                "medicare", "medicaid", "health", "hospital", "physician", "patient", "medical",
                "value-based", "accountable care",
            ]),
            ambiguity_signals: Vec::new(),
            disqualifiers: strings(&[
                "cms platform",
                "content management",
                "cms integration",
                "frontend hosting",
            ]),
        },
        // IPA pickleball events, not independent physician associations.
        DisambiguationRule {
            term: "ipa".to_string(),
            context: Vec::new(),
            ambiguity_signals: Vec::new(),
            disqualifiers: strings(&[
                "nationals",
                "doubles",
                "tournament",
                "championship",
                "pickleball",
            ]),
        },
        // Arcadia the school or sports team.
        DisambiguationRule {
            term: "arcadia".to_string(),
            context: Vec::new(),
            ambiguity_signals: Vec::new(),
            disqualifiers: strings(&["basketball", "team", "pasadena", "squad", "athlete"]),
        },
    ]
}

pub fn default_filter_tables() -> FilterTables {
    FilterTables {
        blocked_sources: strings(BLOCKED_SOURCES),
        source_spam_patterns: strings(SOURCE_SPAM_PATTERNS),
        spam_terms: strings(SPAM_TERMS),
        geographic_exclusions: strings(GEOGRAPHIC_EXCLUSIONS),
        disambiguation: default_disambiguation(),
        topic_exclusions: strings(TOPIC_EXCLUSIONS),
    }
}

fn category(label: &str, triggers: &[&str]) -> CategoryRule {
    CategoryRule {
        label: label.to_string(),
        triggers: strings(triggers),
    }
}

/// Category rules in priority order. Narrow categories come before the broad
/// ones that would otherwise absorb them, so reordering changes the output.
pub fn default_categories() -> Vec<CategoryRule> {
    vec![
        category(
            "Industry Analysis",
            &[
                "transformation imperative",
                "what is value-based care",
                "consulting",
                "thought leadership",
                "analysis:",
                "deep dive",
                "outlook",
                "milliman analysis",
                "pension",
            ],
        ),
        category(
            "Risk Adjustment & Actuarial",
            &[
                "risk adjustment",
                "radv",
                "hcc",
                "raf score",
                "actuarial",
                "fraud waste abuse",
                "guardrails for ai in medicare",
            ],
        ),
        category(
            "CMS Rules & Policy",
            &[
                "cms finalizes",
                "cms releases",
                "cms will launch",
                "physician fee schedule",
                "cms calls back",
                "cms lifts",
                "cms extends",
                "cmmi",
                "medicaid drug",
                "most favored nation",
                "prior authorization",
                "wiser model",
                "interoperability",
                "bona fide",
            ],
        ),
        category(
            "Value-Based Care Models",
            &[
                "value-based care succeeding",
                "vbc",
                "value-based care contracts",
                "physician-level measurement",
                "reinventing value-based",
                "investing in tech for value",
                "making value-based care",
                "overlooked frontier",
                "participation in value-based",
                "momentum for value-based",
            ],
        ),
        category(
            "Technology & Platforms",
            &[
                "innovaccer",
                "lightbeam",
                "vim to accelerate",
                "notifai",
                "martlet.ai",
                "nvidia",
                "ai framework",
                "analytics for vbc",
                "gravity platform",
                "ai agents",
                "digital patient",
            ],
        ),
        category(
            "Provider Contracts & Disputes",
            &[
                "wakemed",
                "negotiations",
                "ballad health sues",
                "fairview access at risk",
                "home health providers notch",
                "lawsuit",
                "contract",
                "dispute",
            ],
        ),
        category(
            "Medicare Advantage Market",
            &[
                "medicare advantage",
                "ma plans",
                "ma enrollees",
                "insurers cutting",
                "seniors must pick",
                "discontinued medicare advantage",
                "ma enrollment",
                "myths about medicare advantage",
                "turmoil in medicare advantage",
                "ma market",
                "directory errors",
            ],
        ),
        category(
            "M&A and Partnerships",
            &[
                "acquired",
                "acquires",
                "merger",
                "vatica health",
                "partnership",
                "collaboration",
                "humana and providence",
            ],
        ),
        category(
            "ACO Performance",
            &[
                "aco saves",
                "aco earns",
                "aco distributes",
                "shared savings",
                "mssp results",
                "aco performance",
                "stellar health",
                "pom aco",
                "wellspan",
                "ochsner",
            ],
        ),
        category(
            "Company Earnings & Financial Performance",
            &[
                "earnings call",
                "q3 2025",
                "quarterly",
                "stock",
                "shares",
                "price target",
                "analyst",
                "nyse",
                "rating",
                "agilon health",
                "financial results",
                "revenue",
            ],
        ),
    ]
}
