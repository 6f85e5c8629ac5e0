// Saunsei Identity - deterministic avatar and image mapping
// Copyright (c) 2026 Saunsei contributors
// Licensed under MIT License

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::naming::{GenderBucket, OriginBucket};

/// Version tag of the built-in tables. Any edit to the lists below changes
/// previously issued seeds, so bump this with it.
pub const BUILTIN_TABLES_VERSION: &str = "3";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePart {
    First,
    Last,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Suffix,
}

/// One link of a rule chain: if any pattern matches the chosen name token,
/// the chain resolves to `bucket`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule<B> {
    pub part: NamePart,
    pub kind: MatchKind,
    pub patterns: Vec<String>,
    pub bucket: B,
}

impl<B: Copy> Rule<B> {
    pub fn new(part: NamePart, kind: MatchKind, patterns: &[&str], bucket: B) -> Self {
        Self {
            part,
            kind,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            bucket,
        }
    }

    pub fn matches(&self, first: &str, last: &str) -> bool {
        let token = match self.part {
            NamePart::First => first,
            NamePart::Last => last,
        };
        match self.kind {
            MatchKind::Exact => self.patterns.iter().any(|p| p == token),
            MatchKind::Suffix => self.patterns.iter().any(|p| token.ends_with(p.as_str())),
        }
    }
}

/// First matching rule wins. Order is part of the mapping contract.
pub fn first_match<B: Copy>(rules: &[Rule<B>], first: &str, last: &str) -> Option<B> {
    rules.iter().find(|r| r.matches(first, last)).map(|r| r.bucket)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameTables {
    pub version: String,
    pub gender_rules: Vec<Rule<GenderBucket>>,
    pub origin_rules: Vec<Rule<OriginBucket>>,
}

static BUILTIN: OnceLock<NameTables> = OnceLock::new();

impl NameTables {
    /// Process-wide built-in tables, built on first use.
    pub fn builtin() -> &'static NameTables {
        BUILTIN.get_or_init(build_builtin)
    }

    pub fn load_from_disk<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read name tables {}", path.display()))?;
        let tables: NameTables = serde_json::from_str(&content)
            .with_context(|| format!("Invalid name tables JSON in {}", path.display()))?;
        tables.validate()?;

        log::info!(
            "Loaded name tables v{} from {} ({} gender rules, {} origin rules)",
            tables.version,
            path.display(),
            tables.gender_rules.len(),
            tables.origin_rules.len()
        );
        Ok(tables)
    }

    pub fn save_to_disk(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Rejects tables that could never match or would match everything.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim().is_empty() {
            bail!("Name tables must carry a version tag");
        }
        if self.gender_rules.is_empty() {
            bail!("Name tables have no gender rules");
        }
        validate_chain("gender", &self.gender_rules)?;
        validate_chain("origin", &self.origin_rules)?;
        Ok(())
    }
}

fn validate_chain<B>(chain: &str, rules: &[Rule<B>]) -> anyhow::Result<()> {
    for (i, rule) in rules.iter().enumerate() {
        if rule.patterns.is_empty() {
            bail!("{} rule {}: no patterns", chain, i);
        }
        for pattern in &rule.patterns {
            // An empty suffix matches every token.
            if pattern.is_empty() {
                bail!("{} rule {}: empty pattern", chain, i);
            }
            if pattern.contains(char::is_whitespace) {
                bail!("{} rule {}: pattern {:?} contains whitespace", chain, i, pattern);
            }
            if *pattern != pattern.to_lowercase() {
                bail!("{} rule {}: pattern {:?} must be lowercase", chain, i, pattern);
            }
        }
    }
    Ok(())
}

// === Curated lists ===

static FEMALE_FIRST_NAMES: &[&str] = &[
    "maria", "anna", "liisa", "helena", "katarina", "sophia", "emilia", "gabi", "gabriela",
    "elena", "elisa", "sara", "nina", "laura", "julia",
];

static MALE_FIRST_NAMES: &[&str] = &[
    "seppo", "mikko", "jussi", "pekka", "matti", "jari", "antti", "artjom", "alexander",
    "mariusz", "erik", "janne", "ville", "marko", "timo",
];

static FEMALE_ENDINGS: &[&str] = &["a", "i", "e", "ia", "ina", "ella", "etta", "ka", "na"];
static MALE_ENDINGS: &[&str] = &["o", "i", "u", "er", "ar", "en", "on", "us", "as", "is"];

static FINNISH_FIRST_NAMES: &[&str] = &[
    "seppo", "mikko", "jussi", "pekka", "matti", "jari", "antti", "janne", "ville", "marko",
    "timo", "liisa", "helena", "katarina", "anna",
];
static EASTERN_EUROPEAN_FIRST_NAMES: &[&str] = &[
    "mariusz", "artjom", "alexander", "alex", "dmitri", "ivan", "natasha", "elena", "maria",
    "sophia",
];
static SCANDINAVIAN_FIRST_NAMES: &[&str] = &["erik", "lars", "bjorn", "sven", "ingrid", "astrid"];

static FINNISH_LAST_ENDINGS: &[&str] = &["nen", "inen", "lä", "lainen"];
static EASTERN_EUROPEAN_LAST_ENDINGS: &[&str] = &["ski", "sky", "ov", "ova", "ev", "eva", "in", "ina"];
static SCANDINAVIAN_LAST_ENDINGS: &[&str] = &["sson", "sen", "dottir", "datter"];

fn build_builtin() -> NameTables {
    use MatchKind::{Exact, Suffix};
    use NamePart::{First, Last};

    let gender_rules = vec![
        Rule::new(First, Exact, FEMALE_FIRST_NAMES, GenderBucket::Female),
        Rule::new(First, Exact, MALE_FIRST_NAMES, GenderBucket::Male),
        Rule::new(First, Suffix, FEMALE_ENDINGS, GenderBucket::Female),
        Rule::new(First, Suffix, MALE_ENDINGS, GenderBucket::Male),
        // Final-letter fallback. The endings above already cover these letters,
        // but loaded tables may not.
        Rule::new(First, Suffix, &["a", "i"], GenderBucket::Female),
        Rule::new(First, Suffix, &["o", "u"], GenderBucket::Male),
    ];

    let origin_rules = vec![
        Rule::new(First, Exact, FINNISH_FIRST_NAMES, OriginBucket::Finnish),
        Rule::new(First, Exact, EASTERN_EUROPEAN_FIRST_NAMES, OriginBucket::EasternEuropean),
        Rule::new(First, Exact, SCANDINAVIAN_FIRST_NAMES, OriginBucket::Scandinavian),
        Rule::new(Last, Suffix, FINNISH_LAST_ENDINGS, OriginBucket::Finnish),
        Rule::new(Last, Suffix, EASTERN_EUROPEAN_LAST_ENDINGS, OriginBucket::EasternEuropean),
        Rule::new(Last, Suffix, SCANDINAVIAN_LAST_ENDINGS, OriginBucket::Scandinavian),
        // Second suffix pass, a subset of the first.
        Rule::new(Last, Suffix, &["nen", "inen", "lä"], OriginBucket::Finnish),
        Rule::new(Last, Suffix, &["ski", "sky", "ov", "ova"], OriginBucket::EasternEuropean),
        Rule::new(Last, Suffix, &["sson", "sen"], OriginBucket::Scandinavian),
    ];

    NameTables {
        version: BUILTIN_TABLES_VERSION.to_string(),
        gender_rules,
        origin_rules,
    }
}
