pub mod generation_queries;

pub use generation_queries::{
    endpoint, generation_mix, parse_generation_response, UpstreamError, DEFAULT_BASE_URL,
};
