// HBNB Console - Core Library
// Exposes the store, parser and dispatcher for the binary and for tests

pub mod error;
pub mod config;
pub mod attributes;     // Typed attribute schema + coercion
pub mod entities;       // Entity struct + one kind per registrable class
pub mod registry;       // Class name → constructor
pub mod parser;         // Command line tokenizer
pub mod storage;        // In-memory store + JSON file persistence
pub mod input;          // Line sources (terminal, pipe, script)
pub mod console;        // Command dispatcher (REPL)

// Re-export commonly used types
pub use error::{CommandError, ConsoleError, EntityError, StoreError};
pub use config::{ClassFilter, ConsoleConfig};
pub use attributes::{AttributeDefinition, AttributeType};
pub use entities::{Entity, EntityKind};
pub use registry::ClassRegistry;
pub use parser::parse_line;
pub use storage::FileStorage;
pub use input::{LineSource, ReadResult, ScriptInput, TerminalInput};
pub use console::{Console, Flow, COMMANDS};
