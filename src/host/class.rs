//! Native class registration: the hook vtable and the per-class record with
//! its single shared prototype.

use std::collections::HashMap;
use std::rc::Rc;

use crate::host::context::EvalContext;
use crate::host::error::JErrorType;
use crate::host::function_object::CallArgs;
use crate::host::object::{new_object_with_class, JsObjectType};
use crate::host::object_property::PropertyKey;
use crate::host::value::JsValue;

/// The hook vtable of a native class. One immutable implementation is shared
/// (via `Rc`) by the class prototype and every instance; hooks must tell the
/// two apart through the native-state slot, never through object identity.
///
/// The runtime drives these hooks; script code never calls them directly.
pub trait ClassOps {
    /// Class name, used for registration and diagnostics.
    fn name(&self) -> &str;

    /// Object-creation hook. Invoked for both `new Class()`
    /// (`args.constructing == true`) and a plain call (`false`); the hook
    /// decides whether a plain call is a misuse error.
    fn construct(
        &self,
        ctx: &mut EvalContext,
        class: &Rc<ClassDefinition>,
        args: CallArgs,
    ) -> Result<JsValue, JErrorType>;

    /// Lazy-resolution hook, invoked when ordinary lookup misses `key` on
    /// `obj`. Returns `Ok(true)` after defining the member as a concrete own
    /// property of `obj`; `Ok(false)` leaves the miss to ordinary handling.
    /// Fires at most once per name per object: once the property exists,
    /// lookup no longer misses.
    fn resolve(
        &self,
        ctx: &mut EvalContext,
        obj: &JsObjectType,
        key: &PropertyKey,
    ) -> Result<bool, JErrorType>;

    /// Side-effect-free prediction: could `resolve` ever produce `key`?
    /// Must cover exactly the names `resolve` can define, independent of
    /// object identity or resolution state, so the runtime may cache
    /// negative lookups for every other name.
    fn may_resolve(&self, key: &PropertyKey) -> bool;

    /// Enumeration hook: the full set of lazily resolvable names `obj` owns,
    /// whether or not they have been resolved yet. Must not resolve
    /// anything.
    fn new_enumerate(&self, obj: &JsObjectType) -> Vec<PropertyKey>;

    /// Reclamation hook, run by the collector at most once per object at an
    /// unspecified time after the object becomes unreachable. Releases any
    /// bound native state. No error channel: finalizers run outside script
    /// context.
    fn finalize(&self, obj: &JsObjectType);
}

/// Per-class record created at registration time. `prototype` is the one
/// shared prototype object of the class; its native-state slot stays empty
/// for its whole life, which is what marks it as the prototype.
pub struct ClassDefinition {
    pub name: String,
    pub ops: Rc<dyn ClassOps>,
    pub prototype: JsObjectType,
}

/// Registry of native classes known to an evaluation context.
pub struct ClassRegistry {
    classes: HashMap<String, Rc<ClassDefinition>>,
}
impl ClassRegistry {
    pub fn new() -> Self {
        ClassRegistry {
            classes: HashMap::new(),
        }
    }

    /// Register a class, creating its shared prototype. Registration is
    /// idempotent: a second call for the same name returns the existing
    /// definition instead of re-creating the prototype.
    pub fn init_class(&mut self, ops: Rc<dyn ClassOps>) -> Rc<ClassDefinition> {
        let name = ops.name().to_string();
        if let Some(existing) = self.classes.get(&name) {
            return existing.clone();
        }
        let prototype = new_object_with_class(ops.clone(), None);
        let def = Rc::new(ClassDefinition {
            name: name.clone(),
            ops,
            prototype,
        });
        self.classes.insert(name, def.clone());
        def
    }

    pub fn get_class(&self, name: &str) -> Option<Rc<ClassDefinition>> {
        self.classes.get(name).cloned()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }
}
impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}
