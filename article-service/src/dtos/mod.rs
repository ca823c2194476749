pub mod articles;

pub use articles::{
    ArticlePayload, ArticleResponse, CreatedResponse, DeletedResponse, UpdatedResponse,
};
