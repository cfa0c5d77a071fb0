use crate::host::context::EvalContext;
use crate::host::error::JErrorType;
use crate::host::object::{JsObject, ObjectBase};
use crate::host::value::JsValue;

/// Calling-convention record handed to every native function. `constructing`
/// distinguishes `new Class()` from a plain call, which constructor hooks
/// must reject.
pub struct CallArgs {
    pub this: JsValue,
    pub args: Vec<JsValue>,
    pub constructing: bool,
}
impl CallArgs {
    pub fn require_at_least(&self, name: &str, count: usize) -> Result<(), JErrorType> {
        if self.args.len() < count {
            Err(JErrorType::TypeError(format!(
                "{}() requires at least {} argument(s), got {}",
                name,
                count,
                self.args.len()
            )))
        } else {
            Ok(())
        }
    }

    pub fn get(&self, index: usize) -> JsValue {
        self.args.get(index).cloned().unwrap_or(JsValue::Undefined)
    }
}

/// Function signature for native members. Receives the evaluation context
/// and the calling convention record; errors become catchable script errors.
pub type NativeFn = fn(ctx: &mut EvalContext, args: CallArgs) -> Result<JsValue, JErrorType>;

pub struct FunctionObjectBase {
    pub name: String,
    pub length: u32,
    pub object_base: ObjectBase,
}
impl FunctionObjectBase {
    pub fn new(name: String, length: u32) -> Self {
        FunctionObjectBase {
            name,
            length,
            object_base: ObjectBase::new(),
        }
    }
}

pub trait JsFunctionObject: JsObject {
    fn get_function_base(&self) -> &FunctionObjectBase;

    fn get_function_base_mut(&mut self) -> &mut FunctionObjectBase;

    fn call(
        &self,
        ctx: &mut EvalContext,
        this: &JsValue,
        args: Vec<JsValue>,
    ) -> Result<JsValue, JErrorType>;

    fn construct(
        &self,
        _ctx: &mut EvalContext,
        _args: Vec<JsValue>,
    ) -> Result<JsValue, JErrorType> {
        Err(JErrorType::TypeError(format!(
            "{} is not a constructor",
            self.get_function_base().name
        )))
    }
}

/// A callable host object wrapping a native function pointer. Lazily resolved
/// methods and accessor getters are objects of this kind.
pub struct NativeFunctionObject {
    base: FunctionObjectBase,
    func: NativeFn,
}
impl NativeFunctionObject {
    pub fn new(name: &str, length: u32, func: NativeFn) -> Self {
        NativeFunctionObject {
            base: FunctionObjectBase::new(name.to_string(), length),
            func,
        }
    }
}
impl JsObject for NativeFunctionObject {
    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base.object_base
    }

    fn get_object_base(&self) -> &ObjectBase {
        &self.base.object_base
    }

    fn as_super_trait(&self) -> &dyn JsObject {
        self
    }

    fn as_super_trait_mut(&mut self) -> &mut dyn JsObject {
        self
    }

    fn to_string(&self) -> String {
        format!("function {}()", self.base.name)
    }
}
impl JsFunctionObject for NativeFunctionObject {
    fn get_function_base(&self) -> &FunctionObjectBase {
        &self.base
    }

    fn get_function_base_mut(&mut self) -> &mut FunctionObjectBase {
        &mut self.base
    }

    fn call(
        &self,
        ctx: &mut EvalContext,
        this: &JsValue,
        args: Vec<JsValue>,
    ) -> Result<JsValue, JErrorType> {
        (self.func)(
            ctx,
            CallArgs {
                this: this.clone(),
                args,
                constructing: false,
            },
        )
    }
}
