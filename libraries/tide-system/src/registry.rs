//! Per-user registry access.
//!
//! Key paths are relative to `HKEY_CURRENT_USER` and use `\` separators. The
//! empty value name addresses a key's default value.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};

/// Minimal registry surface used by the registrars.
///
/// Missing keys and values are reported as [`io::ErrorKind::NotFound`] by
/// the mutating calls, and as `None`/`false` by the queries.
pub trait RegistryStore: Send + Sync {
    fn get_value(&self, key: &str, name: &str) -> io::Result<Option<String>>;

    /// Write a string value, creating `key` and its parents as needed.
    fn set_value(&self, key: &str, name: &str, value: &str) -> io::Result<()>;

    fn delete_value(&self, key: &str, name: &str) -> io::Result<()>;

    fn key_exists(&self, key: &str) -> io::Result<bool>;

    /// Names of the immediate subkeys of `key`.
    fn subkeys(&self, key: &str) -> io::Result<Vec<String>>;

    /// Delete `key`. Fails if it still has subkeys.
    fn delete_key(&self, key: &str) -> io::Result<()>;
}

/// Delete `key` and everything below it, children first.
///
/// Parts of the tree that are already gone are skipped, so a half-removed
/// tree can be cleaned up by calling this again.
pub fn delete_tree(store: &dyn RegistryStore, key: &str) -> io::Result<()> {
    let children = match store.subkeys(key) {
        Ok(children) => children,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    for child in children {
        delete_tree(store, &format!("{key}\\{child}"))?;
    }

    match store.delete_key(key) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Registry for the current OS.
pub fn host_registry() -> Arc<dyn RegistryStore> {
    #[cfg(windows)]
    {
        Arc::new(WindowsRegistry)
    }
    #[cfg(not(windows))]
    {
        Arc::new(UnsupportedRegistry)
    }
}

fn not_found(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{what} not found"))
}

/// In-process registry. Key paths are case-sensitive.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    keys: Mutex<BTreeMap<String, BTreeMap<String, String>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All key paths, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, BTreeMap<String, String>>> {
        match self.keys.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl RegistryStore for MemoryRegistry {
    fn get_value(&self, key: &str, name: &str) -> io::Result<Option<String>> {
        Ok(self.lock().get(key).and_then(|values| values.get(name).cloned()))
    }

    fn set_value(&self, key: &str, name: &str, value: &str) -> io::Result<()> {
        let mut keys = self.lock();

        let mut path = String::new();
        for part in key.split('\\') {
            if !path.is_empty() {
                path.push('\\');
            }
            path.push_str(part);
            keys.entry(path.clone()).or_default();
        }

        keys.entry(key.to_string())
            .or_default()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete_value(&self, key: &str, name: &str) -> io::Result<()> {
        self.lock()
            .get_mut(key)
            .ok_or_else(|| not_found(key))?
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(name))
    }

    fn key_exists(&self, key: &str) -> io::Result<bool> {
        Ok(self.lock().contains_key(key))
    }

    fn subkeys(&self, key: &str) -> io::Result<Vec<String>> {
        let keys = self.lock();
        if !keys.contains_key(key) {
            return Err(not_found(key));
        }

        let prefix = format!("{key}\\");
        Ok(keys
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('\\'))
            .map(str::to_string)
            .collect())
    }

    fn delete_key(&self, key: &str) -> io::Result<()> {
        let mut keys = self.lock();
        if !keys.contains_key(key) {
            return Err(not_found(key));
        }

        let prefix = format!("{key}\\");
        if keys.keys().any(|path| path.starts_with(&prefix)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{key} has subkeys"),
            ));
        }

        keys.remove(key);
        Ok(())
    }
}

/// Registry for platforms that have none. Every call fails with
/// [`io::ErrorKind::Unsupported`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRegistry;

fn unsupported<T>() -> io::Result<T> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "no registry on this platform",
    ))
}

impl RegistryStore for UnsupportedRegistry {
    fn get_value(&self, _key: &str, _name: &str) -> io::Result<Option<String>> {
        unsupported()
    }

    fn set_value(&self, _key: &str, _name: &str, _value: &str) -> io::Result<()> {
        unsupported()
    }

    fn delete_value(&self, _key: &str, _name: &str) -> io::Result<()> {
        unsupported()
    }

    fn key_exists(&self, _key: &str) -> io::Result<bool> {
        unsupported()
    }

    fn subkeys(&self, _key: &str) -> io::Result<Vec<String>> {
        unsupported()
    }

    fn delete_key(&self, _key: &str) -> io::Result<()> {
        unsupported()
    }
}

#[cfg(windows)]
pub use self::native::WindowsRegistry;

#[cfg(windows)]
mod native {
    use std::io;

    use winreg::enums::{HKEY_CURRENT_USER, KEY_SET_VALUE};
    use winreg::RegKey;

    use super::RegistryStore;

    /// `HKEY_CURRENT_USER` through `winreg`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct WindowsRegistry;

    fn hkcu() -> RegKey {
        RegKey::predef(HKEY_CURRENT_USER)
    }

    impl RegistryStore for WindowsRegistry {
        fn get_value(&self, key: &str, name: &str) -> io::Result<Option<String>> {
            let key = match hkcu().open_subkey(key) {
                Ok(key) => key,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e),
            };

            match key.get_value::<String, _>(name) {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e),
            }
        }

        fn set_value(&self, key: &str, name: &str, value: &str) -> io::Result<()> {
            let (key, _) = hkcu().create_subkey(key)?;
            key.set_value(name, &value.to_string())
        }

        fn delete_value(&self, key: &str, name: &str) -> io::Result<()> {
            hkcu()
                .open_subkey_with_flags(key, KEY_SET_VALUE)?
                .delete_value(name)
        }

        fn key_exists(&self, key: &str) -> io::Result<bool> {
            match hkcu().open_subkey(key) {
                Ok(_) => Ok(true),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e),
            }
        }

        fn subkeys(&self, key: &str) -> io::Result<Vec<String>> {
            hkcu().open_subkey(key)?.enum_keys().collect()
        }

        fn delete_key(&self, key: &str) -> io::Result<()> {
            hkcu().delete_subkey(key)
        }
    }
}
