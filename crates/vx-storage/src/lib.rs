use anyhow::{Result, anyhow};
use std::sync::{Arc, Mutex};

/// A single persistent key-value slot holding the wallet balance as a decimal string.
pub trait BalanceSlot {
    fn load(&self) -> Result<Option<String>>;
    fn store(&self, value: &str) -> Result<()>;
}

impl<T: BalanceSlot + ?Sized> BalanceSlot for Arc<T> {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn store(&self, value: &str) -> Result<()> {
        (**self).store(value)
    }
}

impl<T: BalanceSlot + ?Sized> BalanceSlot for Box<T> {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn store(&self, value: &str) -> Result<()> {
        (**self).store(value)
    }
}

/// Accepts writes and forgets them. Used when no persistent store is configured.
#[derive(Default)]
pub struct NoopSlot;

impl BalanceSlot for NoopSlot {
    fn load(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn store(&self, _value: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySlot {
    value: Mutex<Option<String>>,
}

impl InMemorySlot {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.value.lock().ok().and_then(|guard| guard.clone())
    }
}

impl BalanceSlot for InMemorySlot {
    fn load(&self) -> Result<Option<String>> {
        let guard = self
            .value
            .lock()
            .map_err(|_| anyhow!("in-memory balance slot poisoned"))?;
        Ok(guard.clone())
    }

    fn store(&self, value: &str) -> Result<()> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| anyhow!("in-memory balance slot poisoned"))?;
        *guard = Some(value.to_owned());
        Ok(())
    }
}

#[cfg(feature = "rocksdb")]
pub use rocks::RocksDbSlot;

#[cfg(feature = "rocksdb")]
mod rocks {
    use super::BalanceSlot;
    use anyhow::{Context, Result};
    use rocksdb::{DB, Options};
    use std::sync::Arc;
    use tracing::debug;

    pub struct RocksDbSlot {
        db: Arc<DB>,
        key: String,
    }

    impl RocksDbSlot {
        pub fn open_default(path: &str, key: &str) -> Result<Self> {
            let mut options = Options::default();
            options.create_if_missing(true);
            let db = DB::open(&options, path)
                .with_context(|| format!("failed to open balance store at {path}"))?;
            Ok(Self {
                db: Arc::new(db),
                key: Self::key_for_slot(key),
            })
        }

        fn key_for_slot(key: &str) -> String {
            format!("balance-slot:{key}")
        }
    }

    impl BalanceSlot for RocksDbSlot {
        fn load(&self) -> Result<Option<String>> {
            let value = self
                .db
                .get(self.key.as_bytes())
                .context("failed to read balance slot")?;
            match value {
                Some(raw) => Ok(Some(
                    String::from_utf8(raw).context("balance slot is not valid utf-8")?,
                )),
                None => Ok(None),
            }
        }

        fn store(&self, value: &str) -> Result<()> {
            self.db
                .put(self.key.as_bytes(), value.as_bytes())
                .context("failed to write balance slot")?;
            debug!(key = %self.key, value, "balance slot written");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_slot_starts_empty() -> Result<()> {
        let slot = InMemorySlot::default();
        assert_eq!(slot.load()?, None);
        slot.store("50000")?;
        assert_eq!(slot.load()?.as_deref(), Some("50000"));
        Ok(())
    }

    #[test]
    fn shared_slot_sees_writes_through_arc() -> Result<()> {
        let slot = Arc::new(InMemorySlot::with_value("10"));
        let handle = Arc::clone(&slot);
        handle.store("20")?;
        assert_eq!(slot.current().as_deref(), Some("20"));
        Ok(())
    }

    #[test]
    fn boxed_slot_forwards_to_inner() -> Result<()> {
        let slot: Box<dyn BalanceSlot> = Box::new(InMemorySlot::with_value("5"));
        assert_eq!(slot.load()?.as_deref(), Some("5"));
        slot.store("6")?;
        assert_eq!(slot.load()?.as_deref(), Some("6"));
        Ok(())
    }

    #[test]
    fn noop_slot_forgets_everything() -> Result<()> {
        let slot = NoopSlot;
        slot.store("1")?;
        assert_eq!(slot.load()?, None);
        Ok(())
    }

    #[cfg(feature = "rocksdb")]
    #[test]
    fn rocksdb_slot_survives_reopen() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("main");
        let path = path.to_str().expect("temp path is utf-8");
        let other_path = dir.path().join("other");

        {
            let slot = RocksDbSlot::open_default(path, "voltrixBalance")?;
            assert_eq!(slot.load()?, None);
            slot.store("125000")?;
        }

        let reopened = RocksDbSlot::open_default(path, "voltrixBalance")?;
        assert_eq!(reopened.load()?.as_deref(), Some("125000"));

        let other = RocksDbSlot::open_default(
            other_path.to_str().expect("temp path is utf-8"),
            "voltrixBalance",
        )?;
        assert_eq!(other.load()?, None);
        Ok(())
    }
}
