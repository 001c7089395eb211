pub mod caching;
pub mod exchange_rate_api;
pub mod util;

pub use caching::CachingRateProvider;
pub use exchange_rate_api::ExchangeRateApiProvider;
