mod executor;
mod searcher;
mod segment_reader;

pub use self::executor::Executor;
pub use self::searcher::Searcher;
pub use self::segment_reader::SegmentReader;
