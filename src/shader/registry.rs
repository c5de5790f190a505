//! Fixed-capacity, hash-chained tables of shader files and shaders.  Names are compared without
//! regard to case or path separator style, and shader names also ignore any extension.

use errors::{ErrorKind, Result};
use super::{Handle, Shader, SourceFile};

pub const MAX_SHADER_FILES: usize = 4096;
pub const MAX_SHADERS: usize = 8192;
pub const HASH_SIZE: usize = 1024;

#[derive(Copy, Clone, Debug)]
pub struct RegistryLimits {
    pub max_files: usize,
    pub max_shaders: usize,
    /// Number of hash buckets; rounded up to a power of two
    pub hash_size: usize,
}

impl Default for RegistryLimits {
    fn default() -> Self {
        RegistryLimits {
            max_files: MAX_SHADER_FILES,
            max_shaders: MAX_SHADERS,
            hash_size: HASH_SIZE,
        }
    }
}

/// Strip the extension from a name, if there is one.  Only a dot in the last path component
/// counts.
pub fn strip_extension(name: &str) -> &str {
    let component_start = name.rfind(|c| c == '/' || c == '\\').map_or(0, |i| i + 1);
    match name[component_start..].rfind('.') {
        Some(dot) => &name[..component_start + dot],
        None => name,
    }
}

/// Fold a name into the form used for comparisons: lowercase, forward slashes.
pub fn normalize(name: &str) -> String {
    name.chars()
        .map(|c| if c == '\\' { '/' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Bucket for an already-normalized key.  `size` must be a power of two.
pub fn hash_name(key: &str, size: usize) -> usize {
    let mut hash: i64 = 0;
    for (i, letter) in key.bytes().enumerate() {
        hash = hash.wrapping_add((letter as i64).wrapping_mul(i as i64 + 119));
    }
    hash = hash ^ (hash >> 10) ^ (hash >> 20);
    (hash as usize) & (size - 1)
}


struct Slot<T> {
    key: String,
    next: Option<usize>,
    value: T,
}

/// Entries live in one preallocated pool; each bucket is the head of a chain through it.
struct ChainedTable<T> {
    buckets: Vec<Option<usize>>,
    slots: Vec<Slot<T>>,
    capacity: usize,
}

impl<T> ChainedTable<T> {
    fn new(capacity: usize, hash_size: usize) -> Self {
        ChainedTable {
            buckets: vec![None; hash_size.max(1).next_power_of_two()],
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn bucket(&self, hash_key: &str) -> usize {
        hash_name(hash_key, self.buckets.len())
    }

    fn find(&self, key: &str, hash_key: &str) -> Option<usize> {
        let mut cursor = self.buckets[self.bucket(hash_key)];
        while let Some(index) = cursor {
            let slot = &self.slots[index];
            if slot.key == key {
                return Some(index);
            }
            cursor = slot.next;
        }
        None
    }

    /// Returns None if the pool is used up.
    fn insert(&mut self, key: String, hash_key: &str, value: T) -> Option<usize> {
        if self.slots.len() >= self.capacity {
            return None;
        }
        let bucket = self.bucket(hash_key);
        let index = self.slots.len();
        self.slots.push(Slot {
            key,
            next: self.buckets[bucket],
            value,
        });
        self.buckets[bucket] = Some(index);
        Some(index)
    }
}


pub struct SourceRegistry {
    table: ChainedTable<SourceFile>,
}

impl SourceRegistry {
    pub fn new(limits: &RegistryLimits) -> Self {
        SourceRegistry {
            table: ChainedTable::new(limits.max_files, limits.hash_size),
        }
    }

    pub fn find(&self, filename: &str) -> Option<Handle<SourceFile>> {
        let key = normalize(filename);
        self.table.find(&key, strip_extension(&key)).map(Handle::from)
    }

    /// Find the file with this name, registering it if it's new.
    pub fn get_or_create(&mut self, filename: &str) -> Result<Handle<SourceFile>> {
        if filename.is_empty() {
            bail!(ErrorKind::EmptyName);
        }
        let key = normalize(filename);
        if let Some(index) = self.table.find(&key, strip_extension(&key)) {
            return Ok(index.into());
        }

        let hash_key = strip_extension(&key).to_string();
        match self.table.insert(key, &hash_key, SourceFile::new(filename)) {
            Some(index) => Ok(index.into()),
            None => bail!(ErrorKind::RegistryFull("shader file", self.table.capacity)),
        }
    }

    pub fn get(&self, handle: Handle<SourceFile>) -> &SourceFile {
        &self.table.slots[handle.index()].value
    }

    pub fn get_mut(&mut self, handle: Handle<SourceFile>) -> &mut SourceFile {
        &mut self.table.slots[handle.index()].value
    }

    pub fn len(&self) -> usize {
        self.table.slots.len()
    }
}


pub struct ShaderRegistry {
    table: ChainedTable<Shader>,
}

impl ShaderRegistry {
    pub fn new(limits: &RegistryLimits) -> Self {
        ShaderRegistry {
            table: ChainedTable::new(limits.max_shaders, limits.hash_size),
        }
    }

    pub fn find(&self, name: &str) -> Option<Handle<Shader>> {
        let key = normalize(strip_extension(name));
        self.table.find(&key, &key).map(Handle::from)
    }

    /// Find the shader with this name, registering it as untouched if it's new.  Callers tell the
    /// two cases apart by looking at the shader's kind and owner.
    pub fn get_or_create(&mut self, name: &str) -> Result<Handle<Shader>> {
        let stripped = strip_extension(name);
        if stripped.is_empty() {
            bail!(ErrorKind::EmptyName);
        }
        let key = normalize(stripped);
        if let Some(index) = self.table.find(&key, &key) {
            return Ok(index.into());
        }

        let hash_key = key.clone();
        match self.table.insert(key, &hash_key, Shader::new(stripped)) {
            Some(index) => Ok(index.into()),
            None => bail!(ErrorKind::RegistryFull("shader", self.table.capacity)),
        }
    }

    pub fn get(&self, handle: Handle<Shader>) -> &Shader {
        &self.table.slots[handle.index()].value
    }

    pub fn get_mut(&mut self, handle: Handle<Shader>) -> &mut Shader {
        &mut self.table.slots[handle.index()].value
    }

    pub fn len(&self) -> usize {
        self.table.slots.len()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use shader::ShaderKind;

    fn tiny_limits() -> RegistryLimits {
        RegistryLimits {
            max_files: 2,
            max_shaders: 3,
            hash_size: 4,
        }
    }

    #[test]
    fn strips_only_the_last_component_extension() {
        assert_eq!(strip_extension("textures/base/wall.tga"), "textures/base/wall");
        assert_eq!(strip_extension("textures/base.dir/wall"), "textures/base.dir/wall");
        assert_eq!(strip_extension("a.b.c"), "a.b");
        assert_eq!(strip_extension("noext"), "noext");
    }

    #[test]
    fn normalizes_case_and_separators() {
        assert_eq!(normalize("Textures\\Base/WALL"), "textures/base/wall");
    }

    #[test]
    fn hash_is_order_sensitive_and_bounded() {
        assert_eq!(hash_name("ab", 1024), hash_name("ab", 1024));
        assert_ne!(hash_name("ab", 1024), hash_name("ba", 1024));
        for name in &["", "a", "textures/base/wall", "scripts/common"] {
            assert!(hash_name(name, 1024) < 1024);
        }
        // 'a' is 97, at position 0 it contributes 97 * 119
        let raw = 97 * 119;
        assert_eq!(hash_name("a", 1 << 20), (raw ^ (raw >> 10) ^ (raw >> 20)) as usize);
    }

    #[test]
    fn shader_names_match_loosely() {
        let mut registry = ShaderRegistry::new(&RegistryLimits::default());
        let wall = registry.get_or_create("textures/base/Wall.tga").unwrap();
        assert_eq!(registry.get_or_create("TEXTURES\\base\\wall").unwrap(), wall);
        assert_eq!(registry.find("textures/base/wall.jpg"), Some(wall));
        assert_eq!(registry.len(), 1);

        let shader = registry.get(wall);
        assert_eq!(shader.name, "textures/base/Wall");
        assert_eq!(shader.kind, ShaderKind::Untouched);
        assert!(shader.owner.is_none());
    }

    #[test]
    fn file_names_keep_their_extension() {
        let mut registry = SourceRegistry::new(&RegistryLimits::default());
        let base = registry.get_or_create("Base.shader").unwrap();
        assert_eq!(registry.get_or_create("base.SHADER").unwrap(), base);
        assert_eq!(registry.get(base).filename, "Base.shader");
        assert!(!registry.get(base).scanned);
        assert!(registry.get(base).authored.is_empty());

        // Same stem, different extension: a different file that shares a bucket
        let other = registry.get_or_create("base.txt").unwrap();
        assert_ne!(other, base);
        assert_eq!(registry.find("BASE.TXT"), Some(other));
    }

    #[test]
    fn full_tables_refuse_new_names() {
        let mut registry = ShaderRegistry::new(&tiny_limits());
        for name in &["a", "b", "c"] {
            registry.get_or_create(name).unwrap();
        }
        match registry.get_or_create("d") {
            Err(::errors::Error(ErrorKind::RegistryFull("shader", 3), _)) => {}
            other => panic!("expected a full registry, got {:?}", other.map(|_| ())),
        }
        // Existing names are still found
        assert!(registry.get_or_create("B").is_ok());

        let mut files = SourceRegistry::new(&tiny_limits());
        files.get_or_create("one.shader").unwrap();
        files.get_or_create("two.shader").unwrap();
        assert!(files.get_or_create("three.shader").is_err());
    }

    #[test]
    fn empty_names_are_refused() {
        let mut registry = ShaderRegistry::new(&RegistryLimits::default());
        assert!(registry.get_or_create("").is_err());
        assert!(registry.get_or_create(".tga").is_err());
        assert_eq!(registry.len(), 0);
    }
}
