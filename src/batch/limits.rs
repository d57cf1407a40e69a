use crate::operation::size::decimal_digits;
use crate::transport::ServerLimits;

pub const DEFAULT_MAX_BSON_OBJECT_SIZE: usize = 16 * 1024 * 1024;
pub const DEFAULT_MAX_WRITE_BATCH_SIZE: usize = 1000;
pub const ENCRYPTED_MAX_BATCH_SIZE_BYTES: usize = 2 * 1024 * 1024;

/// Ceilings the splitters enforce, fixed for the life of a bulk operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub max_bson_object_size: usize,
    pub max_write_batch_size: usize,
    pub max_batch_size_bytes: usize,
    pub max_key_size: usize,  // bytes for the positional array key of each entry
}

impl BatchLimits {
    pub fn new(max_bson_object_size: usize, max_write_batch_size: usize, max_batch_size_bytes: usize) -> Self {
        let max_write_batch_size = max_write_batch_size.max(1);
        BatchLimits {
            max_bson_object_size,
            max_write_batch_size,
            max_batch_size_bytes,
            max_key_size: decimal_digits(max_write_batch_size - 1) + 2,
        }
    }

    pub fn from_server(server: &ServerLimits, auto_encryption: bool) -> Self {
        let max_bson_object_size = server.max_bson_object_size.unwrap_or(DEFAULT_MAX_BSON_OBJECT_SIZE);
        let max_write_batch_size = server.max_write_batch_size.unwrap_or(DEFAULT_MAX_WRITE_BATCH_SIZE);

        // Encrypted payloads are split on 2MiB, single documents may still be larger
        let max_batch_size_bytes = if auto_encryption {
            ENCRYPTED_MAX_BATCH_SIZE_BYTES
        } else {
            max_bson_object_size
        };

        BatchLimits::new(max_bson_object_size, max_write_batch_size, max_batch_size_bytes)
    }
}

impl Default for BatchLimits {
    fn default() -> Self {
        BatchLimits::from_server(&ServerLimits::default(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_server_values() {
        let limits = BatchLimits::default();
        assert_eq!(limits.max_bson_object_size, 16 * 1024 * 1024);
        assert_eq!(limits.max_write_batch_size, 1000);
        assert_eq!(limits.max_batch_size_bytes, limits.max_bson_object_size);
        // digits(999) + 2
        assert_eq!(limits.max_key_size, 5);
    }

    #[test]
    fn server_values_and_encryption() {
        let server = ServerLimits {
            max_bson_object_size: Some(4 * 1024 * 1024),
            max_write_batch_size: Some(100_000),
            max_message_size_bytes: None,
        };
        let limits = BatchLimits::from_server(&server, true);
        assert_eq!(limits.max_bson_object_size, 4 * 1024 * 1024);
        assert_eq!(limits.max_batch_size_bytes, ENCRYPTED_MAX_BATCH_SIZE_BYTES);
        assert_eq!(limits.max_key_size, 7);
    }
}
