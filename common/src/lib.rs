pub mod action;
pub mod classifier;
pub mod config;
pub mod error;
pub mod executor;
pub mod fetch;
pub mod files;
pub mod fsutil;
pub mod llm;
pub mod markdown;
pub mod media;
pub mod process;
pub mod results;
pub mod sqlite;

pub use action::{Action, ActionKind};
pub use classifier::{classify, Trigger, BUSINESS_TRIGGERS, RUN_TRIGGERS};
pub use config::Settings;
pub use error::{ActionError, ErrorBody, FailureKind};
pub use executor::Executor;
pub use llm::LlmClient;
pub use results::{ActionOutput, MessageBody, TASK_NOT_RECOGNIZED};
