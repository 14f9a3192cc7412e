mod find_by_id;
mod list;
mod service;

pub use find_by_id::FindArticleQuery;
pub use list::ListArticlesQuery;
pub use service::ArticleQueryService;
