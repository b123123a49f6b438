use std::ops::RangeInclusive;

/// A GUI-adjustable parameter bound to an explicit setter.
struct ParamEntry<T> {
    name: String,
    value: f32,
    range: RangeInclusive<f32>,
    apply: Box<dyn Fn(&mut T, f32)>,
}

/// Mutable view of one parameter, shaped for slider widgets.
pub struct ParamSlot<'a> {
    pub name: &'a str,
    pub value: &'a mut f32,
    pub range: RangeInclusive<f32>,
}

/// Registry of `{value, range, setter}` entries built at construction time.
///
/// Replaces runtime type inspection of scene objects: instead of asking
/// "is this node a mesh with material X", each adjustable value is bound to
/// a setter when the scene is built. GUI widgets mutate the stored values;
/// the scene pulls them in during `update` via [`ParamRegistry::apply_all`].
pub struct ParamRegistry<T> {
    entries: Vec<ParamEntry<T>>,
}

impl<T> ParamRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Bind a named value to a setter. Returns false (and changes nothing)
    /// if the name is already taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        initial: f32,
        range: RangeInclusive<f32>,
        apply: impl Fn(&mut T, f32) + 'static,
    ) -> bool {
        let name = name.into();
        if self.entries.iter().any(|e| e.name == name) {
            return false;
        }
        self.entries.push(ParamEntry {
            value: initial.clamp(*range.start(), *range.end()),
            name,
            range,
            apply: Box::new(apply),
        });
        true
    }

    /// Set a parameter by name, clamped to its range.
    pub fn set(&mut self, name: &str, value: f32) -> bool {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.value = value.clamp(*entry.range.start(), *entry.range.end());
                true
            }
            None => false,
        }
    }

    pub fn value(&self, name: &str) -> Option<f32> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.value)
    }

    /// Push every stored value into the target through its setter.
    pub fn apply_all(&self, target: &mut T) {
        for entry in &self.entries {
            (entry.apply)(target, entry.value);
        }
    }

    /// Iterate slots for GUI widgets (registration order).
    pub fn slots_mut(&mut self) -> impl Iterator<Item = ParamSlot<'_>> {
        self.entries.iter_mut().map(|e| ParamSlot {
            name: &e.name,
            value: &mut e.value,
            range: e.range.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for ParamRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Scene {
        spin_speed: f32,
        scale: f32,
    }

    fn registry() -> ParamRegistry<Scene> {
        let mut params = ParamRegistry::new();
        params.register("spin speed", 1.0, 0.0..=10.0, |s: &mut Scene, v| {
            s.spin_speed = v;
        });
        params.register("scale", 1.0, 0.1..=3.0, |s: &mut Scene, v| s.scale = v);
        params
    }

    #[test]
    fn apply_all_pushes_values_through_setters() {
        let mut params = registry();
        params.set("spin speed", 4.0);
        let mut scene = Scene::default();
        params.apply_all(&mut scene);
        assert_eq!(scene.spin_speed, 4.0);
        assert_eq!(scene.scale, 1.0);
    }

    #[test]
    fn set_clamps_to_range() {
        let mut params = registry();
        params.set("scale", 100.0);
        assert_eq!(params.value("scale"), Some(3.0));
        params.set("scale", -5.0);
        assert_eq!(params.value("scale"), Some(0.1));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut params = registry();
        assert!(!params.register("scale", 2.0, 0.0..=1.0, |_, _| {}));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn unknown_name_reports_failure() {
        let mut params = registry();
        assert!(!params.set("missing", 1.0));
        assert_eq!(params.value("missing"), None);
    }

    #[test]
    fn slots_expose_mutable_values_for_widgets() {
        let mut params = registry();
        for slot in params.slots_mut() {
            if slot.name == "spin speed" {
                *slot.value = 2.5;
            }
        }
        let mut scene = Scene::default();
        params.apply_all(&mut scene);
        assert_eq!(scene.spin_speed, 2.5);
    }
}
