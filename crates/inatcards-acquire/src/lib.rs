pub mod client;
pub mod config;
pub mod image;
pub mod source;
pub mod species_list;
pub mod taxon_page;
pub mod types;

pub use client::InatClient;
pub use config::InatEndpoints;
pub use source::UrlKind;
pub use species_list::SpeciesWalk;
