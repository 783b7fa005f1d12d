//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod article;
pub mod cursor;
pub mod pagination;
pub mod tag;
pub mod validation;

pub use article::{Article, ArticleChanges, ArticleContent, ArticleTitle, NewArticle};
pub use cursor::{decode_cursor, encode_cursor, CursorError};
pub use pagination::{page_limit, ListParams, Page, PageQuery, Timestamped};
pub use tag::{Tag, TagName};
pub use validation::ValidationError;
