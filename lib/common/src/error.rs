use std::io;

/// An error related to storage operations (reads, writes...).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    /// A lock guarding the storage has been poisoned by a panicking writer.
    #[error("The storage lock has been poisoned")]
    Poisoned,
}

impl From<StorageError> for io::Error {
    #[inline]
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Poisoned => Self::other(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poisoned_lock_maps_to_other() {
        let io_error = io::Error::from(StorageError::Poisoned);

        assert_eq!(io_error.kind(), io::ErrorKind::Other);
        assert_eq!(io_error.to_string(), "The storage lock has been poisoned");
    }
}
