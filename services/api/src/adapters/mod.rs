pub mod chat_llm;
pub mod db;
pub mod uploads;

pub use chat_llm::ChatCompletionAdapter;
pub use db::DbAdapter;
pub use uploads::UploadStore;
