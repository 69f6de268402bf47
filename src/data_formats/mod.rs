pub mod csv;
pub mod json;
pub mod convert;

pub use self::csv::{read_csv, ColumnType};
pub use self::json::{read_json, write_json_lines};
pub use self::convert::{convert_list_of_dicts, normalize_rows};
