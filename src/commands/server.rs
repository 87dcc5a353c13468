use super::{integer, Arity, CommandSpec, CommandTable};
use crate::error::CommandError;
use crate::protocol::RespValue;
use crate::storage::MemoryStore;
use bytes::Bytes;

pub(super) fn register(table: &mut CommandTable) {
    table.register(CommandSpec {
        name: "DBSIZE",
        arity: Arity::Exact(1),
        handler: dbsize,
    });
    table.register(CommandSpec {
        name: "FLUSHDB",
        arity: Arity::Exact(1),
        handler: flushdb,
    });
    table.register(CommandSpec {
        name: "SAVE",
        arity: Arity::Exact(1),
        handler: save,
    });
    table.register(CommandSpec {
        name: "COMMAND",
        arity: Arity::AtLeast(1),
        handler: command_info,
    });
}

fn dbsize(store: &MemoryStore, _: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(integer(store.keys_count()))
}

fn flushdb(store: &MemoryStore, _: &[Bytes]) -> Result<RespValue, CommandError> {
    store.flush();
    Ok(RespValue::ok())
}

fn save(store: &MemoryStore, _: &[Bytes]) -> Result<RespValue, CommandError> {
    store.save()?;
    Ok(RespValue::ok())
}

// Clients send COMMAND on connect; an empty table keeps them happy.
fn command_info(_: &MemoryStore, _: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::Array(Some(vec![])))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::run;
    use super::*;

    #[test]
    fn test_dbsize_counts_every_namespace() {
        let store = MemoryStore::new();
        assert_eq!(run(&store, &["DBSIZE"]), RespValue::Integer(0));

        run(&store, &["SET", "a", "1"]);
        run(&store, &["RPUSH", "b", "x"]);
        run(&store, &["SADD", "c", "y"]);
        run(&store, &["HSET", "d", "f", "v"]);
        run(&store, &["HSET", "a", "f", "v"]);
        assert_eq!(run(&store, &["DBSIZE"]), RespValue::Integer(4));
    }

    #[test]
    fn test_flushdb() {
        let store = MemoryStore::new();
        run(&store, &["SET", "a", "1"]);
        run(&store, &["SADD", "s", "m"]);

        assert_eq!(run(&store, &["FLUSHDB"]), RespValue::ok());
        assert_eq!(run(&store, &["DBSIZE"]), RespValue::Integer(0));
    }

    #[test]
    fn test_save_keeps_data() {
        let store = MemoryStore::new();
        run(&store, &["SET", "a", "1"]);
        assert_eq!(run(&store, &["SAVE"]), RespValue::ok());
        assert_eq!(run(&store, &["DBSIZE"]), RespValue::Integer(1));
    }

    #[test]
    fn test_command_returns_empty_array() {
        let store = MemoryStore::new();
        assert_eq!(run(&store, &["COMMAND"]), RespValue::Array(Some(vec![])));
        assert_eq!(run(&store, &["COMMAND", "DOCS"]), RespValue::Array(Some(vec![])));
    }

    #[test]
    fn test_exact_arity() {
        let store = MemoryStore::new();
        assert_eq!(
            run(&store, &["DBSIZE", "extra"]),
            RespValue::error("ERR wrong number of arguments for 'dbsize' command")
        );
    }
}
