//! 业务能力层
//!
//! 每个服务只描述"我能做什么"，只处理单条记录，不关心流程顺序。

pub mod failure_writer;
pub mod form_filler;
pub mod processed_store;
pub mod task_creator;

pub use failure_writer::FailureWriter;
pub use form_filler::{FastFieldForm, FormFiller};
pub use processed_store::ProcessedStore;
pub use task_creator::{AsanaTaskCreator, TaskCreator};
