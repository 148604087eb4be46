pub mod command_parser;
pub mod legacy_parser;
pub mod record_parser;
pub mod record_serializer;
pub mod when;

pub use command_parser::{Command, parse_command, parse_command_on};
pub use record_parser::{DroppedLine, RecordError, parse_record_bytes, parse_records};
pub use record_serializer::serialize_records;
pub use when::{parse_when, parse_when_on};
