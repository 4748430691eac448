//! Pure combat formulas.
//!
//! Everything here is a side-effect-free function over explicit inputs:
//! attribute values, a roll, and the balance tables. The engine supplies
//! state and rolls; these modules supply the math.

mod damage;
mod flee;
mod hit;
mod initiative;

pub use damage::{calculate_damage, resisted};
pub use flee::{flee_chance, flee_permitted};
pub use hit::{check_hit, hit_chance};
pub use initiative::roll_initiative;
