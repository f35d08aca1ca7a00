pub mod taxon;
pub mod card;

pub use taxon::*;
pub use card::*;
