use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::tables::{first_match, NameTables};

/// Spacing between classification offsets in a composed avatar seed.
///
/// Base seeds stay below this for any name shorter than ~10^9 UTF-16 units,
/// so every (gender, origin) pair owns its own band of seeds.
pub const SEED_BUCKET_UNIT: u64 = 1 << 40;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderBucket {
    Male,
    Female,
}

impl GenderBucket {
    pub const ALL: [GenderBucket; 2] = [GenderBucket::Female, GenderBucket::Male];

    pub fn as_str(self) -> &'static str {
        match self {
            GenderBucket::Male => "male",
            GenderBucket::Female => "female",
        }
    }

    fn seed_offset(self) -> u64 {
        match self {
            GenderBucket::Female => SEED_BUCKET_UNIT,
            GenderBucket::Male => 2 * SEED_BUCKET_UNIT,
        }
    }
}

impl fmt::Display for GenderBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginBucket {
    Finnish,
    EasternEuropean,
    Scandinavian,
    European,
}

impl OriginBucket {
    pub const ALL: [OriginBucket; 4] = [
        OriginBucket::Finnish,
        OriginBucket::EasternEuropean,
        OriginBucket::Scandinavian,
        OriginBucket::European,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OriginBucket::Finnish => "finnish",
            OriginBucket::EasternEuropean => "eastern_european",
            OriginBucket::Scandinavian => "scandinavian",
            OriginBucket::European => "european",
        }
    }

    // Even multiples so that gender (1 or 2) + origin never lands on the same band twice.
    fn seed_offset(self) -> u64 {
        match self {
            OriginBucket::Finnish => 0,
            OriginBucket::EasternEuropean => 2 * SEED_BUCKET_UNIT,
            OriginBucket::Scandinavian => 4 * SEED_BUCKET_UNIT,
            OriginBucket::European => 6 * SEED_BUCKET_UNIT,
        }
    }
}

impl fmt::Display for OriginBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub gender: GenderBucket,
    pub origin: OriginBucket,
}

impl Classification {
    /// Offset added on top of a base seed. Distinct for each of the eight pairs.
    pub fn seed_offset(self) -> u64 {
        self.gender.seed_offset() + self.origin.seed_offset()
    }
}

/// Seed handed to the external avatar service together with the requested size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvatarSeed {
    pub value: u64,
    pub size: u32,
}

pub mod hash {
    /// 32-bit rolling string hash: `h = (h << 5) - h + unit` over UTF-16 code units.
    ///
    /// Wraps like a JavaScript `hash & hash`, so values agree with seeds
    /// computed by the mobile client.
    pub fn rolling_hash32(s: &str) -> i32 {
        s.encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
    }

    /// `abs(hash)` without the `i32::MIN` overflow.
    pub fn magnitude(h: i32) -> u32 {
        h.unsigned_abs()
    }

    pub fn rolling_magnitude(s: &str) -> u32 {
        magnitude(rolling_hash32(s))
    }
}

/// Trims like JavaScript's `String.prototype.trim`, which also strips U+FEFF.
pub(crate) fn trim_js(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

pub(crate) fn normalize(name: &str) -> String {
    trim_js(name).to_lowercase()
}

/// First and second space-separated tokens. Consecutive spaces yield empty tokens.
pub(crate) fn split_tokens(normalized: &str) -> (&str, &str) {
    let mut parts = normalized.split(' ');
    let first = parts.next().unwrap_or("");
    let last = parts.next().unwrap_or("");
    (first, last)
}

fn first_unit(s: &str) -> u64 {
    s.encode_utf16().next().map(u64::from).unwrap_or(0)
}

fn last_unit(s: &str) -> u64 {
    s.encode_utf16().last().map(u64::from).unwrap_or(0)
}

/// Name-derived part of an avatar seed, before classification offsets.
pub fn base_seed(name: &str) -> u64 {
    let normalized = normalize(name);
    let len = normalized.encode_utf16().count() as u64;

    u64::from(hash::rolling_magnitude(&normalized))
        .wrapping_add(len.wrapping_mul(1000))
        .wrapping_add(first_unit(&normalized) * 100)
        .wrapping_add(last_unit(&normalized))
}

pub fn compose_seed(base: u64, class: Classification) -> u64 {
    base.wrapping_add(class.seed_offset())
}

/// Index into a pool of `pool_size` local assets. The key is hashed as-is.
pub fn select_local_asset_index(key: &str, pool_size: NonZeroUsize) -> usize {
    hash::rolling_magnitude(key) as usize % pool_size.get()
}

/// Classifies names and picks avatar seeds against a borrowed set of tables.
#[derive(Copy, Clone, Debug)]
pub struct IdentityMapper<'t> {
    tables: &'t NameTables,
}

impl IdentityMapper<'static> {
    pub fn builtin() -> Self {
        Self::new(NameTables::builtin())
    }
}

impl Default for IdentityMapper<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'t> IdentityMapper<'t> {
    pub fn new(tables: &'t NameTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'t NameTables {
        self.tables
    }

    pub fn version(&self) -> &'t str {
        &self.tables.version
    }

    pub fn classify_gender(&self, name: &str) -> GenderBucket {
        let normalized = normalize(name);
        let (first, last) = split_tokens(&normalized);

        if let Some(bucket) = first_match(&self.tables.gender_rules, first, last) {
            return bucket;
        }

        // No rule fired (includes the empty first name): split on hash parity.
        if hash::rolling_magnitude(first) % 2 == 0 {
            GenderBucket::Female
        } else {
            GenderBucket::Male
        }
    }

    pub fn classify_origin(&self, name: &str) -> OriginBucket {
        let normalized = normalize(name);
        let (first, last) = split_tokens(&normalized);

        first_match(&self.tables.origin_rules, first, last).unwrap_or(OriginBucket::European)
    }

    pub fn classify(&self, name: &str) -> Classification {
        Classification {
            gender: self.classify_gender(name),
            origin: self.classify_origin(name),
        }
    }

    /// Seed for an externally generated avatar. `size` is carried, not hashed.
    pub fn select_asset_seed(&self, name: &str, size: u32) -> AvatarSeed {
        let value = compose_seed(base_seed(name), self.classify(name));
        AvatarSeed { value, size }
    }
}

pub fn classify_gender(name: &str) -> GenderBucket {
    IdentityMapper::builtin().classify_gender(name)
}

pub fn classify_origin(name: &str) -> OriginBucket {
    IdentityMapper::builtin().classify_origin(name)
}

pub fn select_asset_seed(name: &str, size: u32) -> AvatarSeed {
    IdentityMapper::builtin().select_asset_seed(name, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pool(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn rolling_hash_matches_known_values() {
        assert_eq!(hash::rolling_hash32(""), 0);
        assert_eq!(hash::rolling_hash32("a"), 97);
        assert_eq!(hash::rolling_hash32("ab"), 97 * 31 + 98);
        // Java's String.hashCode uses the same recurrence.
        assert_eq!(hash::rolling_hash32("hello"), 99_162_322);
    }

    #[test]
    fn rolling_hash_wraps_instead_of_overflowing() {
        let long = "z".repeat(10_000);
        let h = hash::rolling_hash32(&long);
        assert_eq!(h, hash::rolling_hash32(&long));
        assert_eq!(hash::magnitude(i32::MIN), 1u32 << 31);
    }

    #[test]
    fn hash_uses_utf16_code_units() {
        // U+1F525 is a surrogate pair in UTF-16.
        let expected = 0xD83Di32.wrapping_mul(31).wrapping_add(0xDD25);
        assert_eq!(hash::rolling_hash32("\u{1F525}"), expected);
    }

    #[test]
    fn split_tokens_follows_single_space_split() {
        assert_eq!(split_tokens("liisa virtanen"), ("liisa", "virtanen"));
        assert_eq!(split_tokens("maria"), ("maria", ""));
        assert_eq!(split_tokens(""), ("", ""));
        assert_eq!(split_tokens("anna  maria"), ("anna", ""));
    }

    #[test]
    fn known_scenarios() {
        assert_eq!(classify_gender("Seppo Seppälä"), GenderBucket::Male);
        assert_eq!(classify_gender("Maria"), GenderBucket::Female);
        assert_eq!(classify_origin("Liisa Virtanen"), OriginBucket::Finnish);
        assert_eq!(classify_origin("Mariusz Polak"), OriginBucket::EasternEuropean);
    }

    #[test]
    fn normalization_ignores_case_and_padding() {
        assert_eq!(classify_gender("  SEPPO  "), GenderBucket::Male);
        assert_eq!(classify_origin("\tErik Nordström "), OriginBucket::Scandinavian);
        assert_eq!(select_asset_seed("Anna", 64), select_asset_seed("  anna ", 64));
    }

    #[test]
    fn byte_order_mark_is_trimmed() {
        assert_eq!(classify_origin("\u{feff}Mariusz Polak"), OriginBucket::EasternEuropean);
        assert_eq!(classify_gender("\u{feff}Seppo\u{feff}"), GenderBucket::Male);
        assert_eq!(
            select_asset_seed("\u{feff}Liisa Virtanen", 100),
            select_asset_seed("Liisa Virtanen", 100)
        );
        assert_eq!(classify_gender("\u{feff}"), GenderBucket::Female);
    }

    #[test]
    fn empty_first_name_falls_back_to_hash_parity() {
        // hash("") == 0, which is even.
        assert_eq!(classify_gender(""), GenderBucket::Female);
        assert_eq!(classify_gender("   "), GenderBucket::Female);
    }

    #[test]
    fn unmatched_names_use_hash_parity() {
        for name in ["zyx", "qqq", "!!!", "bob"] {
            let expected = if hash::rolling_magnitude(name) % 2 == 0 {
                GenderBucket::Female
            } else {
                GenderBucket::Male
            };
            assert_eq!(classify_gender(name), expected, "{name}");
        }
    }

    #[test]
    fn origin_defaults_to_european() {
        assert_eq!(classify_origin(""), OriginBucket::European);
        assert_eq!(classify_origin("John Smith"), OriginBucket::European);
        assert_eq!(classify_origin("???"), OriginBucket::European);
    }

    #[test]
    fn empty_name_seed_is_well_defined() {
        let seed = select_asset_seed("", 100);
        let class = IdentityMapper::builtin().classify("");
        assert_eq!(seed.value, class.seed_offset());
        assert_eq!(seed.size, 100);
    }

    #[test]
    fn base_seed_combines_hash_length_and_edge_chars() {
        let expected = u64::from(hash::rolling_magnitude("ab")) + 2 * 1000 + 97 * 100 + 98;
        assert_eq!(base_seed(" AB "), expected);
    }

    #[test]
    fn size_does_not_affect_seed_value() {
        let a = select_asset_seed("Liisa Virtanen", 64);
        let b = select_asset_seed("Liisa Virtanen", 512);
        assert_eq!(a.value, b.value);
        assert_ne!(a.size, b.size);
    }

    #[test]
    fn classification_offsets_are_pairwise_distinct() {
        let mut seen = HashSet::new();
        for gender in GenderBucket::ALL {
            for origin in OriginBucket::ALL {
                let off = Classification { gender, origin }.seed_offset();
                assert!(off >= SEED_BUCKET_UNIT);
                assert_eq!(off % SEED_BUCKET_UNIT, 0);
                assert!(seen.insert(off), "{gender}/{origin} collides");
            }
        }
    }

    #[test]
    fn local_index_is_in_range() {
        for n in 1..12 {
            for key in ["", "Home Sauna", "Löyly Helsinki", "\u{1F525}", "x"] {
                assert!(select_local_asset_index(key, pool(n)) < n);
            }
        }
        assert_eq!(select_local_asset_index("anything", pool(1)), 0);
    }

    #[test]
    fn local_index_is_case_sensitive() {
        // Keys are not normalized, unlike avatar names.
        let a = hash::rolling_magnitude("Home Sauna");
        let b = hash::rolling_magnitude("home sauna");
        assert_ne!(a, b);
    }
}
