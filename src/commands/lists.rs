use super::{integer, parse_i64, Arity, CommandSpec, CommandTable};
use crate::error::CommandError;
use crate::protocol::RespValue;
use crate::storage::MemoryStore;
use bytes::Bytes;

pub(super) fn register(table: &mut CommandTable) {
    table.register(CommandSpec {
        name: "LPUSH",
        arity: Arity::AtLeast(3),
        handler: lpush,
    });
    table.register(CommandSpec {
        name: "RPUSH",
        arity: Arity::AtLeast(3),
        handler: rpush,
    });
    table.register(CommandSpec {
        name: "LPOP",
        arity: Arity::AtLeast(2),
        handler: lpop,
    });
    table.register(CommandSpec {
        name: "RPOP",
        arity: Arity::AtLeast(2),
        handler: rpop,
    });
    table.register(CommandSpec {
        name: "LRANGE",
        arity: Arity::AtLeast(4),
        handler: lrange,
    });
    table.register(CommandSpec {
        name: "LLEN",
        arity: Arity::AtLeast(2),
        handler: llen,
    });
}

fn lpush(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let len = store.lpush(args[1].clone(), args[2..].iter().cloned());
    Ok(integer(len))
}

fn rpush(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let len = store.rpush(args[1].clone(), args[2..].iter().cloned());
    Ok(integer(len))
}

fn lpop(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::BulkString(store.lpop(&args[1])))
}

fn rpop(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::BulkString(store.rpop(&args[1])))
}

fn lrange(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let start = parse_i64(&args[2])?;
    let stop = parse_i64(&args[3])?;
    Ok(RespValue::bulk_array(store.lrange(&args[1], start, stop)))
}

fn llen(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(integer(store.llen(&args[1])))
}
