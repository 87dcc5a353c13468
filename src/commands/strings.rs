use super::{Arity, CommandSpec, CommandTable};
use crate::error::CommandError;
use crate::protocol::RespValue;
use crate::storage::MemoryStore;
use bytes::Bytes;

pub(super) fn register(table: &mut CommandTable) {
    table.register(CommandSpec {
        name: "SET",
        arity: Arity::AtLeast(3),
        handler: set,
    });
    table.register(CommandSpec {
        name: "GET",
        arity: Arity::AtLeast(2),
        handler: get,
    });
    table.register(CommandSpec {
        name: "INCR",
        arity: Arity::AtLeast(2),
        handler: incr,
    });
    table.register(CommandSpec {
        name: "DECR",
        arity: Arity::AtLeast(2),
        handler: decr,
    });
    table.register(CommandSpec {
        name: "EXISTS",
        arity: Arity::AtLeast(2),
        handler: exists,
    });
    table.register(CommandSpec {
        name: "DEL",
        arity: Arity::AtLeast(2),
        handler: del,
    });
}

fn set(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    store.set(args[1].clone(), args[2].clone());
    Ok(RespValue::ok())
}

fn get(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::BulkString(store.get(&args[1])))
}

fn incr(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::Integer(store.incr(args[1].clone())?))
}

fn decr(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::Integer(store.decr(args[1].clone())?))
}

fn exists(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::Integer(store.exists(&args[1]) as i64))
}

fn del(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::Integer(store.delete(&args[1]) as i64))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{bulk, run};
    use super::*;

    #[test]
    fn test_set_and_get() {
        let store = MemoryStore::new();
        assert_eq!(run(&store, &["SET", "key1", "value1"]), RespValue::ok());
        assert_eq!(run(&store, &["GET", "key1"]), bulk("value1"));
    }

    #[test]
    fn test_get_missing_is_null_not_empty() {
        let store = MemoryStore::new();
        assert_eq!(run(&store, &["GET", "nope"]), RespValue::BulkString(None));

        run(&store, &["SET", "empty", ""]);
        assert_eq!(run(&store, &["GET", "empty"]), bulk(""));
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let store = MemoryStore::new();
        assert_eq!(run(&store, &["SET", "k", "v", "EX", "10"]), RespValue::ok());
        assert_eq!(run(&store, &["GET", "k", "extra"]), bulk("v"));
    }

    #[test]
    fn test_set_wrong_arity() {
        let store = MemoryStore::new();
        assert_eq!(
            run(&store, &["SET", "k"]),
            RespValue::error("ERR wrong number of arguments for 'set' command")
        );
    }

    #[test]
    fn test_incr_decr() {
        let store = MemoryStore::new();
        assert_eq!(run(&store, &["INCR", "n"]), RespValue::Integer(1));
        assert_eq!(run(&store, &["INCR", "n"]), RespValue::Integer(2));
        assert_eq!(run(&store, &["DECR", "m"]), RespValue::Integer(-1));
        assert_eq!(run(&store, &["GET", "n"]), bulk("2"));
    }

    #[test]
    fn test_incr_non_numeric() {
        let store = MemoryStore::new();
        run(&store, &["SET", "s", "abc"]);
        assert_eq!(
            run(&store, &["INCR", "s"]),
            RespValue::error("ERR value is not an integer or out of range")
        );
        assert_eq!(run(&store, &["GET", "s"]), bulk("abc"));
    }

    #[test]
    fn test_del_once() {
        let store = MemoryStore::new();
        run(&store, &["SET", "k", "v"]);
        assert_eq!(run(&store, &["DEL", "k"]), RespValue::Integer(1));
        assert_eq!(run(&store, &["DEL", "k"]), RespValue::Integer(0));
    }

    #[test]
    fn test_exists_any_namespace() {
        let store = MemoryStore::new();
        assert_eq!(run(&store, &["EXISTS", "k"]), RespValue::Integer(0));
        run(&store, &["HSET", "k", "f", "v"]);
        assert_eq!(run(&store, &["EXISTS", "k"]), RespValue::Integer(1));
        run(&store, &["DEL", "k"]);
        assert_eq!(run(&store, &["EXISTS", "k"]), RespValue::Integer(0));
    }
}
