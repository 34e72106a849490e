pub mod twelvedata;

pub use twelvedata::TwelveDataClient;
