//! The `Crc` native class: an incremental CRC-32 accumulator whose two
//! members — an `update(bytes)` method and a read-only `checksum` accessor —
//! are resolved lazily on the shared prototype the first time script code
//! looks them up.
//!
//! The same hook vtable serves the prototype and every instance; the
//! operations tell them apart solely by the native-state slot (the prototype
//! never has state).

use std::mem;
use std::rc::Rc;

use crate::classes::checksum;
use crate::host::class::{ClassDefinition, ClassOps};
use crate::host::context::EvalContext;
use crate::host::error::JErrorType;
use crate::host::function_object::CallArgs;
use crate::host::object::{new_object_with_class, JsObject, JsObjectType, ObjectType};
use crate::host::object_property::PropertyKey;
use crate::host::operations;
use crate::host::value::{JsNumberType, JsValue};

pub const CLASS_NAME: &str = "Crc";

lazy_static! {
    static ref PROP_UPDATE: PropertyKey = PropertyKey::Str("update".to_string());
    static ref PROP_CHECKSUM: PropertyKey = PropertyKey::Str("checksum".to_string());
}

/// Per-instance native payload: the running accumulator. Owned exclusively
/// by the one host object it is bound to.
struct CrcState {
    crc: u32,
}
impl CrcState {
    fn new() -> Self {
        CrcState {
            crc: checksum::initial(),
        }
    }
}

const STATE_SIZE: usize = mem::size_of::<CrcState>();

/// True iff `obj` is the class prototype. The empty native-state slot is the
/// only discriminator.
fn is_prototype(obj: &JsObjectType) -> bool {
    !(**obj).borrow().as_js_object().has_native_state()
}

/// Guard that every member implementation runs before touching native
/// state, so calling a member through the prototype itself (e.g. a getter
/// invoked with the prototype as receiver) reports a misuse error instead of
/// dereferencing an empty slot.
fn check_is_instance(obj: &JsObjectType, what: &str) -> Result<(), JErrorType> {
    if is_prototype(obj) {
        Err(JErrorType::TypeError(format!(
            "can't {} on Crc.prototype",
            what
        )))
    } else {
        Ok(())
    }
}

fn this_object(this: &JsValue, what: &str) -> Result<JsObjectType, JErrorType> {
    match this {
        JsValue::Object(o) => Ok(o.clone()),
        _ => Err(JErrorType::TypeError(format!(
            "can't {} on a non-object",
            what
        ))),
    }
}

fn crc_update(_ctx: &mut EvalContext, args: CallArgs) -> Result<JsValue, JErrorType> {
    let this = this_object(&args.this, "call update()")?;
    check_is_instance(&this, "call update()")?;
    args.require_at_least("update", 1)?;

    let buffer = match args.get(0) {
        JsValue::Object(o) => o,
        _ => {
            return Err(JErrorType::TypeError(
                "argument to update() should be a byte array".to_string(),
            ))
        }
    };

    let b = (*buffer).borrow();
    let bytes = match &*b {
        ObjectType::Bytes(arr) => arr.data(),
        _ => {
            return Err(JErrorType::TypeError(
                "argument to update() should be a byte array".to_string(),
            ))
        }
    };
    if bytes.len() > checksum::MAX_INPUT_LEN {
        return Err(JErrorType::RangeError(
            "array has too many bytes".to_string(),
        ));
    }

    let mut t = (*this).borrow_mut();
    let state = t
        .as_js_object_mut()
        .native_state_mut()
        .and_then(|s| s.downcast_mut::<CrcState>())
        .ok_or_else(|| JErrorType::TypeError("update() called on a non-Crc object".to_string()))?;
    state.crc = checksum::update(state.crc, bytes);

    Ok(JsValue::Undefined)
}

fn crc_get_checksum(_ctx: &mut EvalContext, args: CallArgs) -> Result<JsValue, JErrorType> {
    let this = this_object(&args.this, "read checksum")?;
    check_is_instance(&this, "read checksum")?;

    let t = (*this).borrow();
    let state = t
        .as_js_object()
        .native_state()
        .and_then(|s| s.downcast_ref::<CrcState>())
        .ok_or_else(|| JErrorType::TypeError("checksum read on a non-Crc object".to_string()))?;
    // Widen the unsigned accumulator; no sign reinterpretation.
    Ok(JsValue::Number(JsNumberType::Integer(i64::from(state.crc))))
}

/// The `Crc` class hooks. One shared, immutable vtable for the prototype and
/// all instances.
pub struct CrcClass;

impl CrcClass {
    /// Register the class with the context, creating its shared prototype.
    pub fn init(ctx: &mut EvalContext) -> Rc<ClassDefinition> {
        ctx.init_class(Rc::new(CrcClass))
    }
}

impl ClassOps for CrcClass {
    fn name(&self) -> &str {
        CLASS_NAME
    }

    fn construct(
        &self,
        ctx: &mut EvalContext,
        class: &Rc<ClassDefinition>,
        args: CallArgs,
    ) -> Result<JsValue, JErrorType> {
        if !args.constructing {
            return Err(JErrorType::TypeError(
                "class constructor Crc cannot be invoked without 'new'".to_string(),
            ));
        }

        // Charge the heap before creating anything, so a failed construction
        // leaves no half-bound object behind.
        ctx.heap.allocate(STATE_SIZE)?;

        let obj = new_object_with_class(class.ops.clone(), Some(class.prototype.clone()));
        (*obj)
            .borrow_mut()
            .as_js_object_mut()
            .set_native_state(Box::new(CrcState::new()));
        ctx.heap.register(obj.clone(), STATE_SIZE);

        Ok(JsValue::Object(obj))
    }

    fn resolve(
        &self,
        _ctx: &mut EvalContext,
        obj: &JsObjectType,
        key: &PropertyKey,
    ) -> Result<bool, JErrorType> {
        // Only the prototype resolves members. For instances the runtime
        // walks the chain and fires this again on the prototype.
        if !is_prototype(obj) {
            return Ok(false);
        }

        let name = match key.as_str() {
            Some(name) => name,
            None => return Ok(false),
        };

        if name == "update" {
            operations::define_native_method(obj, key.clone(), "update", 1, crc_update)?;
            return Ok(true);
        }

        if name == "checksum" {
            operations::define_native_getter(obj, key.clone(), "checksum", crc_get_checksum)?;
            return Ok(true);
        }

        Ok(false)
    }

    fn may_resolve(&self, key: &PropertyKey) -> bool {
        key == &*PROP_UPDATE || key == &*PROP_CHECKSUM
    }

    fn new_enumerate(&self, obj: &JsObjectType) -> Vec<PropertyKey> {
        // Instances report nothing; the enumeration walk asks the prototype
        // itself, which always owns both lazy names, resolved or not.
        if !is_prototype(obj) {
            return vec![];
        }
        vec![PROP_UPDATE.clone(), PROP_CHECKSUM.clone()]
    }

    fn finalize(&self, obj: &JsObjectType) {
        // Take-then-drop: the slot is cleared in the same step, so a second
        // invocation finds nothing to release.
        let state = (**obj).borrow_mut().as_js_object_mut().take_native_state();
        drop(state);
    }
}
