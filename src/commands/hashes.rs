use super::{integer, Arity, CommandSpec, CommandTable};
use crate::error::CommandError;
use crate::protocol::RespValue;
use crate::storage::MemoryStore;
use bytes::Bytes;

pub(super) fn register(table: &mut CommandTable) {
    table.register(CommandSpec {
        name: "HSET",
        arity: Arity::AtLeast(4),
        handler: hset,
    });
    table.register(CommandSpec {
        name: "HGET",
        arity: Arity::AtLeast(3),
        handler: hget,
    });
    table.register(CommandSpec {
        name: "HGETALL",
        arity: Arity::AtLeast(2),
        handler: hgetall,
    });
    table.register(CommandSpec {
        name: "HDEL",
        arity: Arity::AtLeast(3),
        handler: hdel,
    });
    table.register(CommandSpec {
        name: "HEXISTS",
        arity: Arity::AtLeast(3),
        handler: hexists,
    });
    table.register(CommandSpec {
        name: "HLEN",
        arity: Arity::AtLeast(2),
        handler: hlen,
    });
}

fn hset(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let created = store.hset(args[1].clone(), args[2].clone(), args[3].clone());
    Ok(RespValue::Integer(created as i64))
}

fn hget(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::BulkString(store.hget(&args[1], &args[2])))
}

/// Flat `field, value, field, value, ...` array.
fn hgetall(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    let pairs = store.hgetall(&args[1]);
    Ok(RespValue::bulk_array(
        pairs.into_iter().flat_map(|(field, value)| [field, value]),
    ))
}

fn hdel(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(integer(store.hdel(&args[1], &args[2..])))
}

fn hexists(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::Integer(store.hexists(&args[1], &args[2]) as i64))
}

fn hlen(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(integer(store.hlen(&args[1])))
}
