pub mod question_loader;

pub use question_loader::{load_all_question_files, load_question_file};
