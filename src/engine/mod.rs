pub mod parser;
pub mod time_frame;
pub mod timespan;
