/// Pipeline services for processing-service
pub mod fetcher;
pub mod processor;
pub mod runner;
pub mod summary;
pub mod transcoder;

pub use fetcher::ImageFetcher;
pub use processor::ProductProcessor;
pub use runner::BatchRunner;
pub use transcoder::{Transcoder, TranscoderConfig};
