pub mod error;
pub mod inference_engine;
pub mod interface;
pub mod label_table;
pub mod model;
pub mod pipeline;
pub mod preprocess;
pub mod ranker;
pub mod worker;
