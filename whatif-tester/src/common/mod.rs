pub mod scenario;
pub mod util;

pub use util::{DataFile, parse_date_ms, split_csv};
