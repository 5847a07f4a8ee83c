pub mod dataset;
pub mod index;

pub use dataset::{convert_raw_dataset, load_attractions, load_attractions_from_reader};
pub use index::{
    apply_location_filter, build_query, filter_by_location, location_tokens, AttractionIndex,
    AttractionSearch, VectorIndex,
};
