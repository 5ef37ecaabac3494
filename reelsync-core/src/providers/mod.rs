//! HTTP adapters for the metadata, artwork and season ports.

pub mod fanart;
pub mod http;
pub mod omdb;
pub mod tmdb;
pub mod trakt;

pub use fanart::FanartClient;
pub use http::ProviderHttp;
pub use omdb::OmdbClient;
pub use tmdb::TmdbClient;
pub use trakt::TraktClient;
