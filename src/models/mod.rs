pub mod exam;
pub mod loaders;
pub mod question;
pub mod report;

pub use exam::{Exam, ExamSummary};
pub use loaders::{load_all_question_files, load_question_file};
pub use report::{CompileReport, Issue, IssueKind};
pub use question::{
    Calculated, Ddimageortext, Essay, Gapselect, Matching, Multichoice, Numerical, Question,
    QuestionKind, Shortanswer, ToleranceKind,
};
