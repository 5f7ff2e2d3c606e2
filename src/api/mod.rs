pub mod coingecko;
pub mod error;
pub mod http;
pub mod open_meteo;

pub use coingecko::CoinGeckoClient;
pub use error::ApiError;
pub use open_meteo::OpenMeteoClient;
