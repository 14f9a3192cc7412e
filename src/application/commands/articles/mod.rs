// src/application/commands/articles/mod.rs
mod add_version;
mod archive;
mod create;
mod options;
mod placement;
mod release;
mod review;
mod service;
mod signature;
mod transaction;
mod withdraw;

pub use add_version::AddVersionCommand;
pub use archive::{ArchiveArticleCommand, DeleteVersionCommand};
pub use create::CreateArticleCommand;
pub use options::{ContentCommand, VersionInput};
pub use release::ReleaseArticleCommand;
pub use review::{PutBackCommand, SubmitArticleCommand};
pub use service::ArticleCommandService;
pub use signature::SignatureCommand;
pub use withdraw::WithdrawArticleCommand;
