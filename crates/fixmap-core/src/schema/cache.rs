//! Per-type schema cache shared by concurrent decodes.

use super::Schema;
use crate::decoder::Record;
use crate::error::Result;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

type Erased = Arc<dyn Any + Send + Sync>;

/// Read-mostly map from record type to its built schema
///
/// Hits only take the read lock. A miss builds the schema outside the lock
/// and inserts it under the write lock; if two threads race, the first insert
/// wins and both get the same `Arc`. Build errors are not cached.
#[derive(Default)]
pub struct SchemaCache {
    schemas: RwLock<HashMap<TypeId, Erased>>,
}

impl SchemaCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached schema for `T`, building it on first use
    pub fn get_or_build<T: Record>(&self) -> Result<Arc<Schema<T>>> {
        if let Some(schema) = self.get::<T>() {
            return Ok(schema);
        }

        let built: Erased = Arc::new(T::schema()?);
        let erased = {
            let mut schemas = self.schemas.write();
            Arc::clone(schemas.entry(TypeId::of::<T>()).or_insert(built))
        };
        debug!("Cached schema for {}", std::any::type_name::<T>());

        Ok(downcast::<T>(erased))
    }

    /// Returns the cached schema for `T` without building it
    pub fn get<T: Record>(&self) -> Option<Arc<Schema<T>>> {
        let erased = self.schemas.read().get(&TypeId::of::<T>()).cloned()?;
        trace!("Schema cache hit for {}", std::any::type_name::<T>());
        Some(downcast::<T>(erased))
    }

    /// Number of cached schemas
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    /// Returns true if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    /// Drops every cached schema
    pub fn clear(&self) {
        self.schemas.write().clear();
    }
}

impl fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCache")
            .field("schemas", &self.len())
            .finish()
    }
}

/// Entries are keyed by `TypeId::of::<T>()` and always hold a `Schema<T>`
fn downcast<T: Record>(erased: Erased) -> Arc<Schema<T>> {
    match erased.downcast::<Schema<T>>() {
        Ok(schema) => schema,
        Err(_) => unreachable!("schema cache entry does not match its TypeId"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Default)]
    struct Counted {
        code: String,
    }

    impl Record for Counted {
        fn schema() -> Result<Schema<Self>> {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            Schema::builder("Counted")
                .field("code", "0,3", |c: &mut Counted| &mut c.code)
                .build()
        }
    }

    #[derive(Default)]
    struct Plain {
        flag: bool,
    }

    impl Record for Plain {
        fn schema() -> Result<Schema<Self>> {
            Schema::builder("Plain")
                .field("flag", "0,1", |p: &mut Plain| &mut p.flag)
                .build()
        }
    }

    struct Broken;

    impl Record for Broken {
        fn schema() -> Result<Schema<Self>> {
            Err(crate::error::Error::invalid_range("", "empty declaration"))
        }
    }

    #[test]
    fn test_builds_once() {
        let cache = SchemaCache::new();
        assert!(cache.is_empty());
        assert!(cache.get::<Counted>().is_none());

        let before = BUILDS.load(Ordering::SeqCst);
        let first = cache.get_or_build::<Counted>().unwrap();
        let second = cache.get_or_build::<Counted>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(BUILDS.load(Ordering::SeqCst) - before, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(first.field("code").map(|f| f.span().width()), Some(Some(3)));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = SchemaCache::new();
        assert!(cache.get_or_build::<Broken>().is_err());
        assert!(cache.get_or_build::<Broken>().is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = SchemaCache::new();
        cache.get_or_build::<Plain>().unwrap();
        cache.clear();
        assert!(cache.get::<Plain>().is_none());
    }
}
