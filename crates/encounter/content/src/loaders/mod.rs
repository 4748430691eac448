//! File loaders for encounter data.
//!
//! Each loader owns one file format/shape. [`ContentFactory`] resolves
//! them against a data directory.

mod abilities;
mod enemies;
mod factory;
mod items;
mod tables;
mod tuning;

pub use abilities::AbilityLoader;
pub use enemies::EnemyLoader;
pub use factory::ContentFactory;
pub use items::ItemLoader;
pub use tables::TablesLoader;
pub use tuning::TuningLoader;

/// Result alias for all loader operations.
pub type LoadResult<T> = anyhow::Result<T>;
