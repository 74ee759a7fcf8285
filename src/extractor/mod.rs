pub mod models;
pub mod ytdlp;

pub use models::{MediaInfo, RawFormat};
pub use ytdlp::{find_ytdlp, MediaExtractor};
