//! Command table and dispatch.
//!
//! Every command is a [`CommandSpec`]: an upper-case name, an [`Arity`] rule
//! and a plain function handler. The table is filled once at startup by
//! [`CommandTable::with_builtin_commands`] and then shared read-only by every
//! connection. Lookup is case-insensitive on the name only; arguments reach
//! the handler untouched.

mod connection;
mod hashes;
mod lists;
mod server;
mod sets;
mod strings;

use crate::error::CommandError;
use crate::metrics::{Metrics, Timer};
use crate::protocol::RespValue;
use crate::storage::MemoryStore;
use bytes::Bytes;
use std::collections::HashMap;
use tracing::debug;

/// Handler signature. `args[0]` is the command name as the client sent it;
/// the arity rule has already been checked when the handler runs.
pub type CommandHandler = fn(&MemoryStore, &[Bytes]) -> Result<RespValue, CommandError>;

/// Argument count rule, counting the command name itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl Arity {
    pub fn accepts(self, argc: usize) -> bool {
        match self {
            Arity::Exact(n) => argc == n,
            Arity::AtLeast(n) => argc >= n,
            Arity::Between(min, max) => (min..=max).contains(&argc),
        }
    }
}

/// One entry of the command table.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Canonical upper-case name.
    pub name: &'static str,
    pub arity: Arity,
    pub handler: CommandHandler,
}

#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: HashMap<&'static str, CommandSpec>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with every command the server speaks.
    pub fn with_builtin_commands() -> Self {
        let mut table = Self::new();
        connection::register(&mut table);
        strings::register(&mut table);
        lists::register(&mut table);
        sets::register(&mut table);
        hashes::register(&mut table);
        server::register(&mut table);
        table
    }

    /// Registers or replaces one command.
    pub fn register(&mut self, spec: CommandSpec) {
        self.entries.insert(spec.name, spec);
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, name: &[u8]) -> Option<&CommandSpec> {
        let upper = String::from_utf8_lossy(name).to_ascii_uppercase();
        self.entries.get(upper.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run one command and turn the outcome into a reply. Command-level
    /// failures become `Error` replies; they never escape as `Err`.
    pub fn execute(&self, store: &MemoryStore, args: &[Bytes]) -> RespValue {
        let metrics = Metrics::get();
        let timer = Timer::new();

        match self.dispatch(store, args) {
            Ok((name, reply)) => {
                metrics.record_command(name, timer.elapsed_seconds());
                reply
            }
            Err((name, err)) => {
                debug!(error = %err, "command failed");
                metrics.record_error(err.kind(), name);
                RespValue::Error(err.to_string())
            }
        }
    }

    fn dispatch(
        &self,
        store: &MemoryStore,
        args: &[Bytes],
    ) -> Result<(&'static str, RespValue), (Option<&'static str>, CommandError)> {
        let Some(name) = args.first() else {
            return Err((None, CommandError::Empty));
        };

        let Some(spec) = self.lookup(name) else {
            let original = String::from_utf8_lossy(name).into_owned();
            return Err((None, CommandError::Unknown(original)));
        };

        if !spec.arity.accepts(args.len()) {
            let lowered = spec.name.to_ascii_lowercase();
            return Err((Some(spec.name), CommandError::WrongArity(lowered)));
        }

        (spec.handler)(store, args)
            .map(|reply| (spec.name, reply))
            .map_err(|err| (Some(spec.name), err))
    }
}

/// Parse a decimal integer argument such as an `LRANGE` bound.
///
/// A leading `+` is accepted here, unlike in protocol length headers: `+1`
/// is a valid index.
pub(crate) fn parse_i64(arg: &[u8]) -> Result<i64, CommandError> {
    std::str::from_utf8(arg)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(CommandError::NotAnInteger)
}

pub(crate) fn integer(n: usize) -> RespValue {
    RespValue::Integer(i64::try_from(n).unwrap_or(i64::MAX))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Run one command against `store` through the full builtin table.
    pub fn run(store: &MemoryStore, parts: &[&str]) -> RespValue {
        let args: Vec<Bytes> = parts.iter().map(|p| Bytes::copy_from_slice(p.as_bytes())).collect();
        CommandTable::with_builtin_commands().execute(store, &args)
    }

    pub fn bulk(s: &str) -> RespValue {
        RespValue::BulkString(Some(Bytes::copy_from_slice(s.as_bytes())))
    }

    pub fn bulk_list(items: &[&str]) -> RespValue {
        RespValue::Array(Some(items.iter().map(|s| bulk(s)).collect()))
    }

    /// Sorted bulk payloads of an array reply, for order-free comparisons.
    pub fn sorted_items(reply: RespValue) -> Vec<Bytes> {
        match reply {
            RespValue::Array(Some(items)) => {
                let mut out: Vec<Bytes> = items
                    .into_iter()
                    .map(|item| match item {
                        RespValue::BulkString(Some(data)) => data,
                        other => panic!("Expected bulk string, got {:?}", other),
                    })
                    .collect();
                out.sort();
                out
            }
            other => panic!("Expected array, got {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::run;
    use super::*;

    fn echo_first(_: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
        Ok(RespValue::BulkString(Some(args[0].clone())))
    }

    #[test]
    fn test_arity_rules() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(3));
        assert!(Arity::AtLeast(3).accepts(5));
        assert!(!Arity::AtLeast(3).accepts(2));
        assert!(Arity::Between(1, 2).accepts(1));
        assert!(Arity::Between(1, 2).accepts(2));
        assert!(!Arity::Between(1, 2).accepts(3));
    }

    #[test]
    fn test_register_and_lookup() {
        let mut table = CommandTable::new();
        assert!(table.is_empty());

        table.register(CommandSpec {
            name: "FIRST",
            arity: Arity::Exact(1),
            handler: echo_first,
        });

        assert_eq!(table.len(), 1);
        assert!(table.lookup(b"first").is_some());
        assert!(table.lookup(b"FiRsT").is_some());
        assert!(table.lookup(b"second").is_none());

        let store = MemoryStore::new();
        let reply = table.execute(&store, &[Bytes::from("first")]);
        assert_eq!(reply, RespValue::bulk("first"));
    }

    #[test]
    fn test_builtin_table_covers_every_command() {
        let table = CommandTable::with_builtin_commands();
        for name in [
            "PING", "ECHO", "SET", "GET", "INCR", "DECR", "EXISTS", "DEL", "LPUSH", "RPUSH",
            "LPOP", "RPOP", "LRANGE", "LLEN", "SADD", "SREM", "SMEMBERS", "SCARD", "SISMEMBER",
            "HSET", "HGET", "HEXISTS", "HGETALL", "HLEN", "HDEL", "DBSIZE", "FLUSHDB", "SAVE",
            "COMMAND",
        ] {
            assert!(table.lookup(name.as_bytes()).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_empty_command() {
        let store = MemoryStore::new();
        let table = CommandTable::with_builtin_commands();
        assert_eq!(table.execute(&store, &[]), RespValue::error("ERR empty command"));
    }

    #[test]
    fn test_unknown_command_keeps_original_case() {
        let store = MemoryStore::new();
        assert_eq!(
            run(&store, &["FooBar", "x"]),
            RespValue::error("ERR unknown command 'FooBar'")
        );
    }

    #[test]
    fn test_wrong_arity_uses_lowercase_name() {
        let store = MemoryStore::new();
        assert_eq!(
            run(&store, &["GET"]),
            RespValue::error("ERR wrong number of arguments for 'get' command")
        );
        assert_eq!(
            run(&store, &["LpUsH", "k"]),
            RespValue::error("ERR wrong number of arguments for 'lpush' command")
        );
    }

    #[test]
    fn test_name_is_case_insensitive_arguments_are_not() {
        let store = MemoryStore::new();
        for name in ["ping", "PING", "PiNg"] {
            assert_eq!(run(&store, &[name]), RespValue::SimpleString("PONG".to_string()));
        }

        run(&store, &["SET", "MyKey", "upper"]);
        run(&store, &["set", "mykey", "lower"]);
        assert_eq!(run(&store, &["Get", "MyKey"]), RespValue::bulk("upper"));
        assert_eq!(run(&store, &["GET", "mykey"]), RespValue::bulk("lower"));
    }

    #[test]
    fn test_non_utf8_name_is_unknown() {
        let store = MemoryStore::new();
        let table = CommandTable::with_builtin_commands();
        let reply = table.execute(&store, &[Bytes::from_static(b"\xff\xfe")]);
        match reply {
            RespValue::Error(message) => assert!(message.starts_with("ERR unknown command")),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64(b"-3"), Ok(-3));
        assert_eq!(parse_i64(b"10"), Ok(10));
        assert_eq!(parse_i64(b"+1"), Ok(1));
        assert_eq!(parse_i64(b"+-1"), Err(CommandError::NotAnInteger));
        assert_eq!(parse_i64(b"x"), Err(CommandError::NotAnInteger));
        assert_eq!(parse_i64(b""), Err(CommandError::NotAnInteger));
    }
}
