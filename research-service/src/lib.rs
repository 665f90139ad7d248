//! The research pipeline behind the form: collect matching posts and
//! comments, score and count them, summarize on request, export to CSV.

pub mod collector;
pub mod export;
pub mod pipeline;
pub mod session;

pub use collector::{collect, MAX_COMMENTS_PER_POST};
pub use export::{export_csv, save_csv, to_csv_bytes, write_csv, CSV_HEADER};
pub use pipeline::{build_report, score_sentiment};
pub use session::{summarize_insights, PreparedRun, ResearchSession};
