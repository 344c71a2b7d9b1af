use indexmap::map::Entry;
use indexmap::IndexMap;
use std::fmt;
use uuid::Uuid;

use crate::reflection::ReflectedType;

pub type Predicate = Box<dyn Fn(&dyn ReflectedType) -> bool + Send + Sync>;

/// Named groups of predicates.
///
/// A candidate passes when every group passes, and a group passes when any
/// of its predicates does. Registering under an existing id widens that
/// group; registering under a new id adds another condition.
pub struct FilterPipeline {
    groups: IndexMap<String, Vec<Predicate>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            groups: IndexMap::new(),
        }
    }

    /// Adds `predicate` to group `id`, or replaces the group when `singular`.
    /// Without an id a fresh one is generated. Returns the id used.
    pub fn register<F>(&mut self, id: Option<&str>, predicate: F, singular: bool) -> String
    where
        F: Fn(&dyn ReflectedType) -> bool + Send + Sync + 'static,
    {
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let predicate: Predicate = Box::new(predicate);

        match self.groups.entry(id.clone()) {
            Entry::Occupied(mut group) if !singular => group.get_mut().push(predicate),
            Entry::Occupied(mut group) => *group.get_mut() = vec![predicate],
            Entry::Vacant(slot) => {
                slot.insert(vec![predicate]);
            }
        }
        id
    }

    pub fn remove(&mut self, id: &str) {
        self.groups.shift_remove(id);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.groups.contains_key(id)
    }

    pub fn group_len(&self, id: &str) -> usize {
        self.groups.get(id).map_or(0, Vec::len)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn evaluate(&self, candidate: &dyn ReflectedType) -> bool {
        self.groups
            .values()
            .all(|group| group.iter().any(|predicate| predicate(candidate)))
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.groups.iter().map(|(id, group)| (id, group.len())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::{MethodInfo, TypeKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Minimal stand-in carrying only a name.
    struct Named(&'static str);

    impl ReflectedType for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn kind(&self) -> TypeKind {
            TypeKind::Class
        }
        fn is_abstract(&self) -> bool {
            false
        }
        fn is_final(&self) -> bool {
            false
        }
        fn is_subtype_of(&self, _name: &str) -> bool {
            false
        }
        fn interfaces(&self) -> Vec<String> {
            Vec::new()
        }
        fn traits(&self) -> Vec<String> {
            Vec::new()
        }
        fn method(&self, _name: &str) -> Option<MethodInfo> {
            None
        }
    }

    fn named(expected: &'static str) -> impl Fn(&dyn ReflectedType) -> bool + Send + Sync {
        move |t: &dyn ReflectedType| t.name() == expected
    }

    #[test]
    fn test_empty_pipeline_passes_everything() {
        assert!(FilterPipeline::new().evaluate(&Named("A")));
    }

    #[test]
    fn test_same_id_is_or() {
        let mut filters = FilterPipeline::new();
        filters.register(Some("k"), named("A"), false);
        filters.register(Some("k"), named("B"), false);

        assert_eq!(filters.group_len("k"), 2);
        assert!(filters.evaluate(&Named("A")));
        assert!(filters.evaluate(&Named("B")));
        assert!(!filters.evaluate(&Named("C")));
    }

    #[test]
    fn test_singular_replaces_group() {
        let mut filters = FilterPipeline::new();
        filters.register(Some("k"), named("A"), false);
        filters.register(Some("k"), named("B"), true);

        assert_eq!(filters.group_len("k"), 1);
        assert!(!filters.evaluate(&Named("A")));
        assert!(filters.evaluate(&Named("B")));
    }

    #[test]
    fn test_distinct_ids_are_and() {
        let mut filters = FilterPipeline::new();
        filters.register(Some("prefix"), |t: &dyn ReflectedType| t.name().starts_with("App"), false);
        filters.register(Some("suffix"), |t: &dyn ReflectedType| t.name().ends_with("Job"), false);

        assert!(filters.evaluate(&Named("App\\SendJob")));
        assert!(!filters.evaluate(&Named("App\\User")));
        assert!(!filters.evaluate(&Named("Lib\\SendJob")));
    }

    #[test]
    fn test_failing_group_fails_regardless_of_other_group() {
        let mut filters = FilterPipeline::new();
        filters.register(Some("a"), |_: &dyn ReflectedType| false, false);
        filters.register(Some("b"), |_: &dyn ReflectedType| true, false);
        assert!(!filters.evaluate(&Named("A")));

        let mut reversed = FilterPipeline::new();
        reversed.register(Some("a"), |_: &dyn ReflectedType| true, false);
        reversed.register(Some("b"), |_: &dyn ReflectedType| false, false);
        assert!(!reversed.evaluate(&Named("A")));
    }

    #[test]
    fn test_generated_ids_never_coalesce() {
        let mut filters = FilterPipeline::new();
        let first = filters.register(None, named("A"), false);
        let second = filters.register(None, named("B"), false);

        assert_ne!(first, second);
        assert_eq!(filters.len(), 2);
        assert!(!filters.evaluate(&Named("A")));
        assert!(!filters.evaluate(&Named("B")));
    }

    #[test]
    fn test_remove_group() {
        let mut filters = FilterPipeline::new();
        filters.register(Some("k"), |_: &dyn ReflectedType| false, false);
        filters.remove("k");
        filters.remove("absent");

        assert!(!filters.contains("k"));
        assert!(filters.is_empty());
        assert!(filters.evaluate(&Named("A")));
    }

    #[test]
    fn test_stops_at_first_failing_group() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut filters = FilterPipeline::new();
        filters.register(Some("fails"), |_: &dyn ReflectedType| false, false);
        filters.register(
            Some("counted"),
            move |_: &dyn ReflectedType| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            },
            false,
        );

        assert!(!filters.evaluate(&Named("A")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_ids_keep_registration_order() {
        let mut filters = FilterPipeline::new();
        filters.register(Some("type"), |_: &dyn ReflectedType| true, false);
        filters.register(Some("abstract"), |_: &dyn ReflectedType| true, false);

        let ids: Vec<&str> = filters.ids().collect();
        assert_eq!(ids, vec!["type", "abstract"]);
    }
}
