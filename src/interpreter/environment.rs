use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::object::Object;

/// Shared handle to one scope. Cloning the handle does not copy the scope,
/// so closures and the frames that created them see the same bindings.
#[derive(Clone)]
pub struct Environment {
    env_ptr: Rc<RefCell<EnvironmentData>>,
}

#[derive(Clone)]
struct Binding {
    value: Object,
    constant: bool,
}

struct EnvironmentData {
    values: HashMap<String, Binding>,
    enclosing: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        let env_data = EnvironmentData {
            values: HashMap::new(),
            enclosing: None,
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    pub fn with_enclosing(env: &Environment) -> Self {
        let env_data = EnvironmentData {
            values: HashMap::new(),
            enclosing: Some(env.clone()),
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    /// Looks `name` up in this scope, then in each enclosing one.
    pub fn get(&self, name: &str) -> Option<Object> {
        let data = self.env_ptr.borrow();
        match data.values.get(name) {
            Some(binding) => Some(binding.value.clone()),
            None => data.enclosing.as_ref()?.get(name),
        }
    }

    /// Binds a mutable variable in this scope, replacing any binding of the
    /// same name (constant or not).
    pub fn set(&self, name: &str, value: Object) {
        self.bind(name, value, false);
    }

    pub fn set_const(&self, name: &str, value: Object) {
        self.bind(name, value, true);
    }

    fn bind(&self, name: &str, value: Object, constant: bool) {
        self.env_ptr
            .borrow_mut()
            .values
            .insert(name.to_owned(), Binding { value, constant });
    }

    /// Updates the nearest binding of `name`. Returns false if that binding is
    /// constant. A name bound nowhere becomes a new variable in this scope.
    pub fn reassign(&self, name: &str, value: Object) -> bool {
        match self.find_scope(name) {
            Some(scope) => {
                let mut data = scope.env_ptr.borrow_mut();
                match data.values.get_mut(name) {
                    Some(binding) if binding.constant => false,
                    Some(binding) => {
                        binding.value = value;
                        true
                    }
                    None => false,
                }
            }
            None => {
                self.set(name, value);
                true
            }
        }
    }

    fn find_scope(&self, name: &str) -> Option<Environment> {
        let data = self.env_ptr.borrow();
        if data.values.contains_key(name) {
            return Some(self.clone());
        }
        data.enclosing.as_ref()?.find_scope(name)
    }

    /// Copies every binding of this scope, constness included, into `target`.
    pub fn export_to(&self, target: &Environment) {
        let bindings: Vec<_> = self
            .env_ptr
            .borrow()
            .values
            .iter()
            .map(|(name, binding)| (name.clone(), binding.clone()))
            .collect();

        let mut target = target.env_ptr.borrow_mut();
        for (name, binding) in bindings {
            target.values.insert(name, binding);
        }
    }

    pub fn is_const(&self, name: &str) -> bool {
        self.env_ptr
            .borrow()
            .values
            .get(name)
            .map_or(false, |binding| binding.constant)
    }

    /// Names bound directly in this scope, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.env_ptr.borrow().values.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<environment {:?}>", self.names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_walks_outward() {
        let globals = Environment::new();
        globals.set("x", Object::Integer(1));
        let inner = Environment::with_enclosing(&globals);
        inner.set("y", Object::Integer(2));

        assert_eq!(inner.get("x"), Some(Object::Integer(1)));
        assert_eq!(inner.get("y"), Some(Object::Integer(2)));
        assert_eq!(globals.get("y"), None);
    }

    #[test]
    fn test_shadowing() {
        let globals = Environment::new();
        globals.set("x", Object::Integer(1));
        let inner = Environment::with_enclosing(&globals);
        inner.set("x", Object::Integer(2));

        assert_eq!(inner.get("x"), Some(Object::Integer(2)));
        assert_eq!(globals.get("x"), Some(Object::Integer(1)));
    }

    #[test]
    fn test_set_overwrites_constant() {
        let env = Environment::new();
        env.set_const("x", Object::Integer(1));
        assert!(env.is_const("x"));
        env.set("x", Object::Integer(2));
        assert!(!env.is_const("x"));
        assert!(env.reassign("x", Object::Integer(3)));
        assert_eq!(env.get("x"), Some(Object::Integer(3)));
    }

    #[test]
    fn test_reassign_updates_nearest_scope() {
        let globals = Environment::new();
        globals.set("count", Object::Integer(0));
        let inner = Environment::with_enclosing(&globals);

        assert!(inner.reassign("count", Object::Integer(5)));
        assert_eq!(globals.get("count"), Some(Object::Integer(5)));
        assert!(inner.names().is_empty());
    }

    #[test]
    fn test_reassign_constant_fails() {
        let globals = Environment::new();
        globals.set_const("limit", Object::Integer(10));
        let inner = Environment::with_enclosing(&globals);

        assert!(!inner.reassign("limit", Object::Integer(11)));
        assert_eq!(globals.get("limit"), Some(Object::Integer(10)));
    }

    #[test]
    fn test_reassign_unknown_binds_innermost() {
        let globals = Environment::new();
        let inner = Environment::with_enclosing(&globals);

        assert!(inner.reassign("fresh", Object::Boolean(true)));
        assert_eq!(inner.names(), vec!["fresh".to_owned()]);
        assert_eq!(globals.get("fresh"), None);
        assert!(!inner.is_const("fresh"));
    }

    #[test]
    fn test_export_preserves_constness() {
        let importer = Environment::new();
        let module = Environment::with_enclosing(&importer);
        module.set("helper", Object::Integer(1));
        module.set_const("PI", Object::Integer(3));

        module.export_to(&importer);

        assert_eq!(importer.names(), vec!["PI".to_owned(), "helper".to_owned()]);
        assert!(importer.is_const("PI"));
        assert!(!importer.reassign("PI", Object::Integer(4)));
        assert!(importer.reassign("helper", Object::Integer(2)));
    }

    #[test]
    fn test_handles_share_a_scope() {
        let env = Environment::new();
        let alias = env.clone();
        alias.set("shared", Object::Null);
        assert_eq!(env.get("shared"), Some(Object::Null));
    }
}
