use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Code units, the classes they define, and which classes are defined so far.
///
/// `F` is the factory type instantiating a class (controller or bootstrap).
pub struct ClassRegistry<F> {
    units: HashMap<PathBuf, Vec<String>>,
    factories: HashMap<String, F>,
    defined: HashSet<String>,
    loaded: HashSet<PathBuf>,
}

impl<F> Default for ClassRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for ClassRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("units", &self.units)
            .field("defined", &self.defined)
            .field("loaded", &self.loaded)
            .finish()
    }
}

impl<F> ClassRegistry<F> {
    #[must_use]
    pub fn new() -> Self {
        ClassRegistry {
            units: HashMap::new(),
            factories: HashMap::new(),
            defined: HashSet::new(),
            loaded: HashSet::new(),
        }
    }

    /// Declare that the unit at `path` defines `class`. The class is not usable
    /// until the unit is loaded; declaring it on an already loaded unit defines
    /// it right away.
    ///
    /// Re-declaring a class replaces its factory.
    pub fn register_unit<P: Into<PathBuf>>(&mut self, path: P, class: &str, factory: F) -> &mut Self {
        let path = path.into();
        let classes = self.units.entry(path.clone()).or_default();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        if self.factories.insert(class.to_string(), factory).is_some() {
            warn!(
                class = %class,
                unit = %path.display(),
                "Replaced existing class factory"
            );
        }
        if self.loaded.contains(&path) && self.defined.insert(class.to_string()) {
            debug!(class = %class, unit = %path.display(), "Class defined by loaded unit");
        }
        self
    }

    /// Define `class` right away, without a code unit.
    pub fn define(&mut self, class: &str, factory: F) -> &mut Self {
        self.factories.insert(class.to_string(), factory);
        self.defined.insert(class.to_string());
        self
    }

    /// Load a unit: every class it declares becomes defined.
    ///
    /// Returns how many classes became newly defined. Loading an already loaded
    /// unit defines nothing. A path no unit is registered for defines nothing
    /// and stays unloaded, so a later registration can still be loaded.
    pub fn load_unit(&mut self, path: &Path) -> usize {
        let Some(classes) = self.units.get(path) else {
            debug!(unit = %path.display(), "No unit registered for path");
            return 0;
        };
        if !self.loaded.insert(path.to_path_buf()) {
            debug!(unit = %path.display(), "Unit already loaded");
            return 0;
        }
        let mut newly_defined = 0;
        for class in classes {
            if self.defined.insert(class.clone()) {
                newly_defined += 1;
            }
        }
        info!(
            unit = %path.display(),
            classes = ?classes,
            newly_defined = newly_defined,
            "Unit loaded"
        );
        newly_defined
    }

    #[must_use]
    pub fn is_defined(&self, class: &str) -> bool {
        self.defined.contains(class)
    }

    #[must_use]
    pub fn is_loaded(&self, path: &Path) -> bool {
        self.loaded.contains(path)
    }

    /// Unit declaring `class`, if any.
    #[must_use]
    pub fn unit_of(&self, class: &str) -> Option<&Path> {
        self.units
            .iter()
            .find(|(_, classes)| classes.iter().any(|c| c == class))
            .map(|(path, _)| path.as_path())
    }

    /// Factory of a defined class.
    #[must_use]
    pub fn factory(&self, class: &str) -> Option<&F> {
        if self.is_defined(class) {
            self.factories.get(class)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_undefined_until_unit_loaded() {
        let mut reg: ClassRegistry<u8> = ClassRegistry::new();
        reg.register_unit("/c/Home.rs", "Home", 1);
        assert!(!reg.is_defined("Home"));
        assert!(reg.factory("Home").is_none());

        assert_eq!(reg.load_unit(Path::new("/c/Home.rs")), 1);
        assert!(reg.is_defined("Home"));
        assert_eq!(reg.factory("Home"), Some(&1));
    }

    #[test]
    fn test_loading_twice_is_noop() {
        let mut reg: ClassRegistry<u8> = ClassRegistry::new();
        reg.register_unit("/c/Home.rs", "Home", 1);
        assert_eq!(reg.load_unit(Path::new("/c/Home.rs")), 1);
        assert_eq!(reg.load_unit(Path::new("/c/Home.rs")), 0);
        assert!(reg.is_defined("Home"));
    }

    #[test]
    fn test_unit_defining_other_class() {
        let mut reg: ClassRegistry<u8> = ClassRegistry::new();
        reg.register_unit("/c/Home.rs", "Homepage", 1);
        reg.load_unit(Path::new("/c/Home.rs"));
        assert!(!reg.is_defined("Home"));
        assert!(reg.is_defined("Homepage"));
    }

    #[test]
    fn test_registration_after_unregistered_load() {
        let mut reg: ClassRegistry<u8> = ClassRegistry::new();
        assert_eq!(reg.load_unit(Path::new("/c/Home.rs")), 0);
        assert!(!reg.is_loaded(Path::new("/c/Home.rs")));

        reg.register_unit("/c/Home.rs", "Home", 1);
        assert_eq!(reg.load_unit(Path::new("/c/Home.rs")), 1);
        assert_eq!(reg.factory("Home"), Some(&1));
    }

    #[test]
    fn test_class_declared_on_loaded_unit_is_defined() {
        let mut reg: ClassRegistry<u8> = ClassRegistry::new();
        reg.register_unit("/c/Home.rs", "Home", 1);
        reg.load_unit(Path::new("/c/Home.rs"));
        reg.register_unit("/c/Home.rs", "HomeAdmin", 2);
        assert!(reg.is_defined("HomeAdmin"));
        assert_eq!(reg.load_unit(Path::new("/c/Home.rs")), 0);
    }

    #[test]
    fn test_define_directly_and_unit_lookup() {
        let mut reg: ClassRegistry<u8> = ClassRegistry::new();
        reg.define("Bootstrap", 7);
        reg.register_unit("/app/Extra.rs", "Extra", 8);
        assert_eq!(reg.factory("Bootstrap"), Some(&7));
        assert_eq!(reg.unit_of("Extra"), Some(Path::new("/app/Extra.rs")));
        assert_eq!(reg.unit_of("Bootstrap"), None);
    }
}
