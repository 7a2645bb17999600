pub mod data_url;
pub mod ecmascript;
pub mod indexmap;
pub mod path_ext;
pub mod rayon;
pub mod sanitize_file_name;
pub mod xxhash;

pub use concat_string::concat_string;
