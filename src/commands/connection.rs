use super::{Arity, CommandSpec, CommandTable};
use crate::error::CommandError;
use crate::protocol::RespValue;
use crate::storage::MemoryStore;
use bytes::Bytes;

pub(super) fn register(table: &mut CommandTable) {
    table.register(CommandSpec {
        name: "PING",
        arity: Arity::Between(1, 2),
        handler: ping,
    });
    table.register(CommandSpec {
        name: "ECHO",
        arity: Arity::Exact(2),
        handler: echo,
    });
}

fn ping(_: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    match args.get(1) {
        None => Ok(RespValue::SimpleString("PONG".to_string())),
        Some(message) => Ok(RespValue::BulkString(Some(message.clone()))),
    }
}

fn echo(_: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::BulkString(Some(args[1].clone())))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{bulk, run};
    use super::*;

    #[test]
    fn test_ping() {
        let store = MemoryStore::new();
        match run(&store, &["PING"]) {
            RespValue::SimpleString(s) => assert_eq!(s, "PONG"),
            other => panic!("Expected PONG, got {:?}", other),
        }
        assert_eq!(run(&store, &["PING", "hello"]), bulk("hello"));
    }

    #[test]
    fn test_ping_too_many_arguments() {
        let store = MemoryStore::new();
        assert_eq!(
            run(&store, &["PING", "a", "b"]),
            RespValue::error("ERR wrong number of arguments for 'ping' command")
        );
    }

    #[test]
    fn test_echo() {
        let store = MemoryStore::new();
        assert_eq!(run(&store, &["ECHO", "Hello World"]), bulk("Hello World"));
        assert_eq!(run(&store, &["echo", ""]), bulk(""));
    }

    #[test]
    fn test_echo_requires_exactly_one_argument() {
        let store = MemoryStore::new();
        let expected = RespValue::error("ERR wrong number of arguments for 'echo' command");
        assert_eq!(run(&store, &["ECHO"]), expected);
        assert_eq!(run(&store, &["ECHO", "a", "b"]), expected);
    }
}
