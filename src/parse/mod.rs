pub mod task_codec;

pub use task_codec::{DecodeError, parse_tasks, parse_theme, serialize_tasks, serialize_theme};
