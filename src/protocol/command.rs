//! Command extraction from decoded frames.

use super::RespValue;
use crate::error::ProtocolError;
use bytes::Bytes;

/// Turn a decoded frame into an argument list; index 0 is the command name.
///
/// Only a non-null array of non-null bulk strings or simple strings is a
/// command. Anything else is a framing error.
pub fn to_command(value: RespValue) -> Result<Vec<Bytes>, ProtocolError> {
    let items = match value {
        RespValue::Array(Some(items)) => items,
        RespValue::Array(None) => return Err(ProtocolError::NullCommand),
        _ => return Err(ProtocolError::NotAnArray),
    };

    items
        .into_iter()
        .map(|item| match item {
            RespValue::BulkString(Some(data)) => Ok(data),
            RespValue::BulkString(None) => Err(ProtocolError::NullArgument),
            RespValue::SimpleString(s) => Ok(Bytes::from(s)),
            RespValue::Error(_) => Err(ProtocolError::InvalidArgument('-')),
            RespValue::Integer(_) => Err(ProtocolError::InvalidArgument(':')),
            RespValue::Array(_) => Err(ProtocolError::InvalidArgument('*')),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_and_simple_elements() {
        let frame = RespValue::Array(Some(vec![
            RespValue::bulk("SET"),
            RespValue::SimpleString("key".to_string()),
            RespValue::bulk(""),
        ]));

        let args = to_command(frame).unwrap();
        assert_eq!(args, vec![Bytes::from("SET"), Bytes::from("key"), Bytes::new()]);
    }

    #[test]
    fn test_empty_array_is_a_frame() {
        assert_eq!(to_command(RespValue::Array(Some(vec![]))).unwrap(), Vec::<Bytes>::new());
    }

    #[test]
    fn test_non_array_rejected() {
        assert_eq!(
            to_command(RespValue::SimpleString("PING".to_string())),
            Err(ProtocolError::NotAnArray)
        );
        assert_eq!(to_command(RespValue::bulk("PING")), Err(ProtocolError::NotAnArray));
        assert_eq!(to_command(RespValue::Array(None)), Err(ProtocolError::NullCommand));
    }

    #[test]
    fn test_bad_elements_rejected() {
        let null_arg = RespValue::Array(Some(vec![RespValue::bulk("GET"), RespValue::null_bulk()]));
        assert_eq!(to_command(null_arg), Err(ProtocolError::NullArgument));

        let int_arg = RespValue::Array(Some(vec![RespValue::bulk("GET"), RespValue::Integer(1)]));
        assert_eq!(to_command(int_arg), Err(ProtocolError::InvalidArgument(':')));

        let nested = RespValue::Array(Some(vec![RespValue::Array(Some(vec![]))]));
        assert_eq!(to_command(nested), Err(ProtocolError::InvalidArgument('*')));
    }
}
