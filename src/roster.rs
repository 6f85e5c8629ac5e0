use std::num::NonZeroUsize;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Serialize;

use crate::avatar::{avatar_url, initials};
use crate::naming::{select_local_asset_index, GenderBucket, IdentityMapper, OriginBucket};
use crate::settings::MapperSettings;

// Demo population for leaderboards and feeds. Mixes the app's regulars with
// names that fall through to the suffix and hash rules.
static DEMO_FIRST_NAMES: &[&str] = &[
    "Seppo", "Artjom", "Alexander", "Mariusz", "Gabi", "Erik", "Liisa", "Maria", "Anna", "Helena",
    "Mikko", "Jussi", "Pekka", "Matti", "Antti", "Janne", "Ville", "Timo", "Aino", "Eeva",
    "Kaisa", "Noora", "Dmitri", "Ivan", "Natasha", "Katarzyna", "Lars", "Sven", "Ingrid", "Astrid",
    "Björn", "Sofie", "Oskar", "Lukas", "Chloé", "Henrik", "Tuomas", "Riikka", "Olli", "Juho",
];

static DEMO_LAST_NAMES: &[&str] = &[
    "Seppälä", "Wickström", "Tamm", "Polak", "Hämäläinen", "Nordström", "Virtanen", "Korhonen",
    "Nieminen", "Mäkelä", "Laine", "Heikkinen", "Koskinen", "Järvinen", "Lehtonen", "Salo",
    "Kowalski", "Nowak", "Petrov", "Ivanova", "Smirnov", "Lebedev", "Andersson", "Johansson",
    "Hansen", "Larsen", "Sigurdardottir", "Olsen", "Lindqvist", "Berg", "Dubois", "Rossi",
    "Müller", "García", "Novak", "Horvath", "Jensen", "Eriksson", "Kallio", "Rantanen",
];

/// Number of distinct names `demo_names` can produce.
pub fn demo_name_capacity() -> usize {
    DEMO_FIRST_NAMES.len() * DEMO_LAST_NAMES.len()
}

/// `count` distinct demo display names, reproducible for a given `seed`.
///
/// Capped at [`demo_name_capacity`], with a warning when the cap applies.
pub fn demo_names(count: usize, seed: u64) -> Vec<String> {
    let width = DEMO_LAST_NAMES.len();
    let capacity = demo_name_capacity();
    if count > capacity {
        log::warn!(
            "Requested {} demo names, only {} distinct names available",
            count,
            capacity
        );
    }
    let mut combos: Vec<usize> = (0..capacity).collect();

    let mut rng = StdRng::seed_from_u64(seed);
    combos.shuffle(&mut rng);
    combos.truncate(count);

    combos
        .into_iter()
        .map(|i| format!("{} {}", DEMO_FIRST_NAMES[i / width], DEMO_LAST_NAMES[i % width]))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub name: String,
    pub initials: String,
    pub gender: GenderBucket,
    pub origin: OriginBucket,
    pub avatar_seed: u64,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Roster {
    pub generated_at: String,
    pub seed: u64,
    pub tables_version: String,
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn generate(
        mapper: &IdentityMapper<'_>,
        settings: &MapperSettings,
        count: usize,
        seed: u64,
        size: u32,
    ) -> Self {
        let entries: Vec<RosterEntry> = demo_names(count, seed)
            .into_iter()
            .map(|name| entry_for(mapper, settings, name, size))
            .collect();

        Self {
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            seed,
            tables_version: mapper.version().to_string(),
            entries,
        }
    }
}

pub fn entry_for(
    mapper: &IdentityMapper<'_>,
    settings: &MapperSettings,
    name: String,
    size: u32,
) -> RosterEntry {
    let class = mapper.classify(&name);
    let seed = mapper.select_asset_seed(&name, size);
    RosterEntry {
        initials: initials(&name),
        gender: class.gender,
        origin: class.origin,
        avatar_seed: seed.value,
        avatar_url: avatar_url(settings, mapper.version(), seed),
        name,
    }
}

/// Histogram of local asset indices for `keys`.
pub fn spread<I, S>(keys: I, pool_size: NonZeroUsize) -> Vec<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts = vec![0usize; pool_size.get()];
    for key in keys {
        counts[select_local_asset_index(key.as_ref(), pool_size)] += 1;
    }
    counts
}

#[derive(Debug, Clone, Serialize)]
pub struct SpreadReport {
    pub pool_size: usize,
    pub total: usize,
    pub counts: Vec<usize>,
    pub max_share: f64,
}

impl SpreadReport {
    pub fn from_counts(counts: Vec<usize>) -> Self {
        let total: usize = counts.iter().sum();
        let max = counts.iter().copied().max().unwrap_or(0);
        let max_share = if total == 0 { 0.0 } else { max as f64 / total as f64 };
        Self {
            pool_size: counts.len(),
            total,
            counts,
            max_share,
        }
    }

    pub fn all_buckets_used(&self) -> bool {
        self.counts.iter().all(|&c| c > 0)
    }
}
