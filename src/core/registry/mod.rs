//=========================================================================
// Component Registry
//=========================================================================
//
// Type-keyed service locator shared by every state and game object.
//
// Architecture:
//   EngineBuilder → insert<T>() → HashMap<TypeId, Box<dyn Any>>
//                                        ↓
//   Hooks ← Context::components() ← get<T>() / get_mut<T>()
//
// One registry exists per engine. It is created before the first frame
// and lent to hooks by reference; there is no global instance.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::collections::HashMap;

use log::{debug, warn};

//=== ComponentRegistry ===================================================

/// Stores at most one value per type.
///
/// Engine collaborators ([`Settings`](crate::config::Settings),
/// [`InputState`](crate::core::input::InputState), ...) are registered here
/// at startup; game code may add its own shared services.
pub struct ComponentRegistry {
    components: HashMap<TypeId, Box<dyn Any>>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            components: HashMap::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Inserts a component, returning the previous value of the same type.
    pub fn insert<T: 'static>(&mut self, value: T) -> Option<T> {
        let previous = self
            .components
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old);

        if previous.is_some() {
            warn!(
                "Component {} was already registered and has been replaced",
                std::any::type_name::<T>()
            );
        } else {
            debug!("Registered component {}", std::any::type_name::<T>());
        }

        previous
    }

    /// Removes and returns the component of type `T`.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.components
            .remove(&TypeId::of::<T>())
            .and_then(|c| c.downcast::<T>().ok())
            .map(|c| *c)
    }

    //--- Query API --------------------------------------------------------

    /// Returns a shared reference to the component of type `T`.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|c| c.downcast_ref::<T>())
    }

    /// Returns a mutable reference to the component of type `T`.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.components
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| c.downcast_mut::<T>())
    }

    /// Returns the component of type `T`, inserting `T::default()` first if absent.
    pub fn get_or_default<T: Default + 'static>(&mut self) -> &mut T {
        self.components
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::default()))
            .downcast_mut::<T>()
            .expect("component stored under the TypeId of another type")
    }

    /// Returns true if a component of type `T` is registered.
    pub fn contains<T: 'static>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Default)]
    struct Score {
        value: i32,
    }

    #[derive(Debug, PartialEq)]
    struct PlayerName(String);

    #[test]
    fn new_registry_is_empty() {
        let registry = ComponentRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get::<Score>().is_none());
        assert!(!registry.contains::<Score>());
    }

    #[test]
    fn insert_and_get() {
        let mut registry = ComponentRegistry::new();
        registry.insert(Score { value: 42 });

        assert!(registry.contains::<Score>());
        assert_eq!(registry.get::<Score>(), Some(&Score { value: 42 }));
    }

    #[test]
    fn separate_slots_per_type() {
        let mut registry = ComponentRegistry::new();
        registry.insert(Score { value: 1 });
        registry.insert(PlayerName("ada".to_string()));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get::<Score>().map(|s| s.value), Some(1));
        assert_eq!(
            registry.get::<PlayerName>(),
            Some(&PlayerName("ada".to_string()))
        );
    }

    #[test]
    fn insert_replaces_and_returns_previous() {
        let mut registry = ComponentRegistry::new();
        assert!(registry.insert(Score { value: 1 }).is_none());

        let previous = registry.insert(Score { value: 2 });
        assert_eq!(previous, Some(Score { value: 1 }));
        assert_eq!(registry.get::<Score>().map(|s| s.value), Some(2));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_mut_modifies_in_place() {
        let mut registry = ComponentRegistry::new();
        registry.insert(Score { value: 10 });

        if let Some(score) = registry.get_mut::<Score>() {
            score.value += 5;
        }

        assert_eq!(registry.get::<Score>().map(|s| s.value), Some(15));
    }

    #[test]
    fn get_or_default_inserts_once() {
        let mut registry = ComponentRegistry::new();
        registry.get_or_default::<Score>().value = 3;
        registry.get_or_default::<Score>().value += 1;

        assert_eq!(registry.get::<Score>().map(|s| s.value), Some(4));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_returns_value() {
        let mut registry = ComponentRegistry::new();
        registry.insert(PlayerName("bob".to_string()));

        assert_eq!(
            registry.remove::<PlayerName>(),
            Some(PlayerName("bob".to_string()))
        );
        assert!(registry.remove::<PlayerName>().is_none());
        assert!(registry.is_empty());
    }
}
