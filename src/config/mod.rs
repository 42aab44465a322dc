pub mod exclusions;
pub mod patterns;

pub use exclusions::{detect_project_type, get_default_exclusions, ProjectType};
pub use patterns::{
    catalog_file_pattern, place_marker_pattern, split_catalog_name, CATALOG_EXTENSION,
};
