pub mod mapping;
pub mod pipeline;
pub mod prompts;
pub mod schema;

pub use mapping::map_to_candidate_analysis;
pub use pipeline::generate_candidate_analysis;
pub use schema::AnalysisTemplate;
