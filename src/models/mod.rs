pub mod form_spec;
pub mod loaders;
pub mod outcome;
pub mod record;
pub mod template;

pub use form_spec::FormSpec;
pub use loaders::{load_records_from_csv, load_records_from_file, load_records_from_json};
pub use outcome::{AbortInfo, BatchResult, BatchSummary, SubmissionOutcome};
pub use record::Record;
pub use template::{RenderedTask, TaskTemplate};
