//! Frame variants
mod category;
mod home;
mod settings;
mod song_list;

pub use category::CategoryFrame;
pub use home::HomeFrame;
pub use settings::SettingsFrame;
pub use song_list::SongListFrame;
