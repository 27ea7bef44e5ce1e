pub mod quotes;
pub mod sweep;

pub use quotes::QuoteService;
