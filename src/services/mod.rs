pub mod dataset;
pub mod encoder;
pub mod placeholder;
pub mod report_writer;

pub use dataset::count_decimals;
pub use encoder::QuestionEncoder;
pub use placeholder::PlaceholderResolver;
pub use report_writer::ReportWriter;
