use std::rc::Rc;

use crate::host::class::{ClassDefinition, ClassOps, ClassRegistry};
use crate::host::error::JErrorType;
use crate::host::function_object::CallArgs;
use crate::host::heap::{Heap, HeapConfig};
use crate::host::value::JsValue;

/// Execution context passed to native functions: the collected heap plus the
/// registry of native classes.
pub struct EvalContext {
    pub heap: Heap,
    pub registry: ClassRegistry,
}

impl EvalContext {
    pub fn new() -> Self {
        EvalContext {
            heap: Heap::default(),
            registry: ClassRegistry::new(),
        }
    }

    pub fn with_heap(config: HeapConfig) -> Self {
        EvalContext {
            heap: Heap::new(config),
            registry: ClassRegistry::new(),
        }
    }

    pub fn init_class(&mut self, ops: Rc<dyn ClassOps>) -> Rc<ClassDefinition> {
        self.registry.init_class(ops)
    }

    /// The `new ClassName(...)` path: invokes the class construct hook with
    /// the constructing calling convention.
    pub fn construct(
        &mut self,
        class_name: &str,
        args: Vec<JsValue>,
    ) -> Result<JsValue, JErrorType> {
        self.invoke_constructor(class_name, args, true)
    }

    /// The plain `ClassName(...)` path. Kept distinct so the construct hook
    /// sees `constructing == false` and can report the misuse.
    pub fn call_constructor(
        &mut self,
        class_name: &str,
        args: Vec<JsValue>,
    ) -> Result<JsValue, JErrorType> {
        self.invoke_constructor(class_name, args, false)
    }

    fn invoke_constructor(
        &mut self,
        class_name: &str,
        args: Vec<JsValue>,
        constructing: bool,
    ) -> Result<JsValue, JErrorType> {
        let class = self.registry.get_class(class_name).ok_or_else(|| {
            JErrorType::ReferenceError(format!("{} is not defined", class_name))
        })?;
        let ops = class.ops.clone();
        ops.construct(
            self,
            &class,
            CallArgs {
                this: JsValue::Undefined,
                args,
                constructing,
            },
        )
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
