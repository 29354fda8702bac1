/// Domain types for the mpi3 player
mod filter;
mod ids;
mod song;

pub use filter::{Filter, FilterField, OrderBy};
pub use ids::SongId;
pub use song::{sortable_title, Song, SongField};
