mod open_tdb;
mod source;

pub use open_tdb::{DEFAULT_BASE_URL, OpenTdbClient, TriviaApiConfig};
pub use source::{
    QuestionBatch, QuestionRequest, QuestionSource, ResponseCode, TokenGrant, TokenSource,
};
