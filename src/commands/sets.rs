use super::{integer, Arity, CommandSpec, CommandTable};
use crate::error::CommandError;
use crate::protocol::RespValue;
use crate::storage::MemoryStore;
use bytes::Bytes;

pub(super) fn register(table: &mut CommandTable) {
    table.register(CommandSpec {
        name: "SADD",
        arity: Arity::AtLeast(3),
        handler: sadd,
    });
    table.register(CommandSpec {
        name: "SREM",
        arity: Arity::AtLeast(3),
        handler: srem,
    });
    table.register(CommandSpec {
        name: "SMEMBERS",
        arity: Arity::AtLeast(2),
        handler: smembers,
    });
    table.register(CommandSpec {
        name: "SISMEMBER",
        arity: Arity::AtLeast(3),
        handler: sismember,
    });
    table.register(CommandSpec {
        name: "SCARD",
        arity: Arity::AtLeast(2),
        handler: scard,
    });
}

fn sadd(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(integer(store.sadd(args[1].clone(), args[2..].iter().cloned())))
}

fn srem(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(integer(store.srem(&args[1], &args[2..])))
}

fn smembers(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::bulk_array(store.smembers(&args[1])))
}

fn sismember(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(RespValue::Integer(store.sismember(&args[1], &args[2]) as i64))
}

fn scard(store: &MemoryStore, args: &[Bytes]) -> Result<RespValue, CommandError> {
    Ok(integer(store.scard(&args[1])))
}
