pub mod time;

pub use self::time::{now_timestamp, parse_timestamp, Clock, DATE_FORMAT};
