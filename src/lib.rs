//! Deterministic name-to-avatar and location-to-image mapping.
//!
//! Everything here is a pure function of its input and the active
//! [`NameTables`]: the same name always yields the same buckets, seed and
//! image index. The buckets are a cosmetic heuristic for avatar variety and
//! carry no real-world meaning.

pub mod avatar;
pub mod naming;
pub mod roster;
pub mod settings;
pub mod tables;

pub use avatar::{avatar_url, initials, AssetPool};
pub use naming::{
    classify_gender, classify_origin, select_asset_seed, select_local_asset_index, AvatarSeed,
    Classification, GenderBucket, IdentityMapper, OriginBucket,
};
pub use settings::MapperSettings;
pub use tables::NameTables;
