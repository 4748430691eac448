//! Data-file loading for the encounter engine.
//!
//! `encounter-content` turns RON/TOML data files into the template,
//! ability, item, and balance values the runtime feeds to
//! `encounter-core` through its oracle traits. The crate does no
//! interpretation of its own: files in, validated values out.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ContentFactory, EnemyLoader, ItemLoader, LoadResult, TablesLoader,
    TuningLoader,
};
