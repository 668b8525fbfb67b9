pub mod arcgis;
pub mod census;
pub mod nominatim;

pub use arcgis::{QueryResponse, query_point};
