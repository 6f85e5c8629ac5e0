use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::bail;

use crate::naming::{select_local_asset_index, AvatarSeed};
use crate::settings::MapperSettings;

/// URL of the generated avatar for `seed`. `version` busts client caches
/// whenever the name tables change.
pub fn avatar_url(settings: &MapperSettings, version: &str, seed: AvatarSeed) -> String {
    format!(
        "{}/{}/svg?seed={}&size={}&v={}",
        settings.avatar_base_url, settings.avatar_style, seed.value, seed.size, version
    )
}

/// Fallback text shown while the avatar loads: first letter of every word.
pub fn initials(name: &str) -> String {
    name.split(' ').filter_map(|word| word.chars().next()).collect()
}

/// Fixed, non-empty set of local images picked by key hash.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPool {
    paths: Vec<PathBuf>,
}

impl AssetPool {
    pub fn new(paths: Vec<PathBuf>) -> anyhow::Result<Self> {
        if paths.is_empty() {
            bail!("Asset pool needs at least one image");
        }
        Ok(Self { paths })
    }

    pub fn from_settings(settings: &MapperSettings) -> anyhow::Result<Self> {
        Self::new(settings.image_pool.clone())
    }

    pub fn size(&self) -> NonZeroUsize {
        // `new` guarantees at least one entry.
        NonZeroUsize::new(self.paths.len()).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn index_of(&self, key: &str) -> usize {
        select_local_asset_index(key, self.size())
    }

    pub fn pick(&self, key: &str) -> &Path {
        &self.paths[self.index_of(key)]
    }

    /// Explicit slot, wrapped around the pool. Used for round-robin lists.
    pub fn at(&self, index: usize) -> &Path {
        &self.paths[index % self.paths.len()]
    }

    /// An explicit index wins over the key hash.
    pub fn pick_or_at(&self, key: &str, index: Option<usize>) -> &Path {
        match index {
            Some(index) => self.at(index),
            None => self.pick(key),
        }
    }

    pub fn resolve_index(&self, key: &str, index: Option<usize>) -> usize {
        match index {
            Some(index) => index % self.paths.len(),
            None => self.index_of(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::IdentityMapper;

    #[test]
    fn avatar_url_layout() {
        let settings = MapperSettings::default();
        let seed = AvatarSeed { value: 42, size: 88 };
        assert_eq!(
            avatar_url(&settings, "3", seed),
            "https://api.dicebear.com/7.x/avataaars/svg?seed=42&size=88&v=3"
        );
    }

    #[test]
    fn avatar_url_is_stable_per_name() {
        let settings = MapperSettings::default();
        let mapper = IdentityMapper::builtin();
        let a = avatar_url(&settings, mapper.version(), mapper.select_asset_seed("Gabi Hämäläinen", 88));
        let b = avatar_url(&settings, mapper.version(), mapper.select_asset_seed("Gabi Hämäläinen", 88));
        assert_eq!(a, b);
        assert!(a.ends_with("&size=88&v=3"), "{a}");
    }

    #[test]
    fn initials_take_first_char_of_each_word() {
        assert_eq!(initials("Seppo Seppälä"), "SS");
        assert_eq!(initials("Liisa"), "L");
        assert_eq!(initials("Äijä Öhman"), "ÄÖ");
        assert_eq!(initials("Anna  Maria"), "AM");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn empty_pool_is_rejected() {
        assert!(AssetPool::new(Vec::new()).is_err());
    }

    #[test]
    fn pick_is_stable_and_in_pool() {
        let pool = AssetPool::from_settings(&MapperSettings::default()).unwrap();
        let first = pool.pick("Nordic Wellness Spa").to_path_buf();
        assert_eq!(pool.pick("Nordic Wellness Spa"), first.as_path());
        assert!(pool.paths().contains(&first));
        assert!(pool.index_of("Allas Sea Pool") < 5);
    }

    #[test]
    fn explicit_index_wraps_and_overrides_hash() {
        let pool = AssetPool::from_settings(&MapperSettings::default()).unwrap();
        assert_eq!(pool.at(0), Path::new("pics/saunas/saun1.jpg"));
        assert_eq!(pool.at(7), Path::new("pics/saunas/saun3.jpg"));
        assert_eq!(pool.at(5), pool.at(0));

        let key = "Nordic Wellness Spa";
        let hashed = pool.index_of(key);
        let other = (hashed + 1) % 5;
        assert_eq!(pool.pick_or_at(key, Some(other)), pool.at(other));
        assert_ne!(pool.pick_or_at(key, Some(other)), pool.pick(key));
        assert_eq!(pool.pick_or_at(key, None), pool.pick(key));
        assert_eq!(pool.resolve_index(key, Some(other + 10)), other);
        assert_eq!(pool.resolve_index(key, None), hashed);
    }

    #[test]
    fn single_image_pool_always_picks_it() {
        let pool = AssetPool::new(vec![PathBuf::from("only.jpg")]).unwrap();
        assert_eq!(pool.pick("anything"), Path::new("only.jpg"));
        assert_eq!(pool.pick(""), Path::new("only.jpg"));
    }
}
