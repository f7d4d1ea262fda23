use generational_arena::Arena;

/// Stable identifier for a registered render object. Stays valid for the
/// object's whole life; a removal operation added later would invalidate only
/// the removed id, not shift the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(generational_arena::Index);

/// Append-ordered arena of render objects.
///
/// Registration happens at object creation; there is no removal today, so
/// arena order and registration order coincide. Iteration order is the draw
/// order: later registrations draw on top.
#[derive(Debug)]
pub struct Registry<T> {
    arena: Arena<T>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn register(&mut self, value: T) -> ObjectId {
        ObjectId(self.arena.insert(value))
    }

    pub fn get(&self, id: ObjectId) -> Option<&T> {
        self.arena.get(id.0)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        self.arena.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &T)> {
        self.arena.iter().map(|(index, value)| (ObjectId(index), value))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_stay_valid_as_the_registry_grows() {
        let mut registry = Registry::new();

        let first = registry.register("first");
        let second = registry.register("second");

        for _ in 0..100 {
            registry.register("filler");
        }

        assert_eq!(registry.get(first), Some(&"first"));
        assert_eq!(registry.get(second), Some(&"second"));
        assert_eq!(registry.len(), 102);
    }

    #[test]
    fn iterates_in_registration_order() {
        let mut registry = Registry::new();

        registry.register(10);
        registry.register(20);
        registry.register(30);

        let values: Vec<i32> = registry.iter().map(|(_, value)| *value).collect();
        assert_eq!(values, [10, 20, 30]);
    }

    #[test]
    fn foreign_id_misses() {
        let mut other = Registry::new();
        let foreign = other.register(1);

        let registry: Registry<i32> = Registry::new();
        assert_eq!(registry.get(foreign), None);
    }
}
