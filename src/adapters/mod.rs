//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                    |
//! |------------|----------------|--------------------------------|
//! | `serial`   | DeviceChannel  | Solenoid controller (serial)   |
//! | `keyboard` | OperatorInput  | Terminal, raw mode             |
//! | `csv_file` | Persister      | CSV file on disk               |
//! | `time`     | Clock          | Local wall clock + thread sleep|
//! | `console`  | EventSink      | Operator terminal + `log`      |
//! | `terminal` | —              | Pre-run prompts (line mode)    |

pub mod console;
pub mod csv_file;
pub mod keyboard;
pub mod serial;
pub mod terminal;
pub mod time;
