//! Abstract object operations over `JsObjectType` handles, with lazy
//! class-hook integration: an own-property miss consults the object's class
//! `resolve` hook (gated by `may_resolve`) before the prototype chain is
//! walked, so a prototype's hook fires on behalf of instance lookups that
//! fall through to it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::host::context::EvalContext;
use crate::host::error::JErrorType;
use crate::host::function_object::{JsFunctionObject, NativeFn, NativeFunctionObject};
use crate::host::object::{JsObject, JsObjectType, ObjectType};
use crate::host::object_property::{PropertyDescriptor, PropertyKey};
use crate::host::value::JsValue;

/// Outcome of an own-property lookup, cloned out of the descriptor so no
/// borrow of the object outlives the lookup.
enum OwnLookup {
    Data(JsValue),
    Accessor {
        get: Option<Rc<dyn JsFunctionObject>>,
        set: Option<Rc<dyn JsFunctionObject>>,
    },
    DataReadonly(JsValue),
}

fn lookup_own(o: &JsObjectType, p: &PropertyKey) -> Option<OwnLookup> {
    let b = (**o).borrow();
    match b.as_js_object().get_own_property(p) {
        None => None,
        Some(PropertyDescriptor::Data {
            value, writable, ..
        }) => {
            if *writable {
                Some(OwnLookup::Data(value.clone()))
            } else {
                Some(OwnLookup::DataReadonly(value.clone()))
            }
        }
        Some(PropertyDescriptor::Accessor { get, set, .. }) => Some(OwnLookup::Accessor {
            get: get.clone(),
            set: set.clone(),
        }),
    }
}

/// Give the object's class one chance to lazily materialize `p` as a
/// concrete own property. Returns true if it did.
fn try_resolve(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    p: &PropertyKey,
) -> Result<bool, JErrorType> {
    let ops = (**o).borrow().as_js_object().class_ops();
    match ops {
        // may_resolve lets the runtime skip the hook (and cache the miss)
        // for names the class can never produce.
        Some(ops) if ops.may_resolve(p) => ops.resolve(ctx, o, p),
        _ => Ok(false),
    }
}

pub fn get(ctx: &mut EvalContext, o: &JsObjectType, p: &PropertyKey) -> Result<JsValue, JErrorType> {
    get_with_receiver(ctx, o, p, &JsValue::Object(o.clone()))
}

pub fn get_with_receiver(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    p: &PropertyKey,
    receiver: &JsValue,
) -> Result<JsValue, JErrorType> {
    let mut own = lookup_own(o, p);
    if own.is_none() && try_resolve(ctx, o, p)? {
        own = lookup_own(o, p);
    }
    match own {
        Some(OwnLookup::Data(value)) | Some(OwnLookup::DataReadonly(value)) => Ok(value),
        Some(OwnLookup::Accessor { get, .. }) => match get {
            None => Ok(JsValue::Undefined),
            Some(getter) => getter.call(ctx, receiver, Vec::new()),
        },
        None => {
            let proto = (**o).borrow().as_js_object().get_prototype_of();
            match proto {
                None => Ok(JsValue::Undefined),
                Some(proto) => get_with_receiver(ctx, &proto, p, receiver),
            }
        }
    }
}

pub fn set(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    p: PropertyKey,
    value: JsValue,
) -> Result<bool, JErrorType> {
    let receiver = o.clone();
    set_on_chain(ctx, o, p, value, &receiver)
}

fn set_on_chain(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    p: PropertyKey,
    value: JsValue,
    receiver: &JsObjectType,
) -> Result<bool, JErrorType> {
    let mut own = lookup_own(o, &p);
    if own.is_none() && try_resolve(ctx, o, &p)? {
        own = lookup_own(o, &p);
    }
    match own {
        Some(OwnLookup::Data(_)) => {
            let ok = (**receiver).borrow_mut().as_js_object_mut().define_own_property(
                p,
                PropertyDescriptor::Data {
                    value,
                    writable: true,
                    enumerable: true,
                    configurable: true,
                },
            );
            Ok(ok)
        }
        Some(OwnLookup::DataReadonly(_)) => Ok(false),
        Some(OwnLookup::Accessor { set, .. }) => match set {
            // An accessor with no setter rejects the write; this is what
            // keeps getter-only members read-only without the class doing
            // anything.
            None => Ok(false),
            Some(setter) => {
                setter.call(ctx, &JsValue::Object(receiver.clone()), vec![value])?;
                Ok(true)
            }
        },
        None => {
            let proto = (**o).borrow().as_js_object().get_prototype_of();
            match proto {
                Some(proto) => set_on_chain(ctx, &proto, p, value, receiver),
                None => {
                    let ok = (**receiver)
                        .borrow_mut()
                        .as_js_object_mut()
                        .define_own_property(
                            p,
                            PropertyDescriptor::Data {
                                value,
                                writable: true,
                                enumerable: true,
                                configurable: true,
                            },
                        );
                    Ok(ok)
                }
            }
        }
    }
}

pub fn has_property(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    p: &PropertyKey,
) -> Result<bool, JErrorType> {
    if lookup_own(o, p).is_some() {
        return Ok(true);
    }
    if try_resolve(ctx, o, p)? && lookup_own(o, p).is_some() {
        return Ok(true);
    }
    let proto = (**o).borrow().as_js_object().get_prototype_of();
    match proto {
        None => Ok(false),
        Some(proto) => has_property(ctx, &proto, p),
    }
}

/// For-in style enumeration: own enumerable keys of the object and its
/// prototype chain, merged with each level's `new_enumerate` output so
/// unresolved lazy members appear too. Enumeration reports names only; it
/// never forces resolution.
pub fn enumerate_keys(o: &JsObjectType) -> Vec<PropertyKey> {
    let mut result: Vec<PropertyKey> = vec![];
    let mut cur = Some(o.clone());
    while let Some(obj) = cur {
        let (own, ops, proto) = {
            let b = (*obj).borrow();
            let jso = b.as_js_object();
            let own: Vec<PropertyKey> = jso
                .own_property_keys()
                .into_iter()
                .filter(|k| {
                    jso.get_own_property(k)
                        .map_or(false, |d| d.is_enumerable())
                })
                .collect();
            (own, jso.class_ops(), jso.get_prototype_of())
        };
        for key in own {
            if !result.contains(&key) {
                result.push(key);
            }
        }
        if let Some(ops) = ops {
            for key in ops.new_enumerate(&obj) {
                if !result.contains(&key) {
                    result.push(key);
                }
            }
        }
        cur = proto;
    }
    result
}

/// Invoke a callable value.
pub fn call(
    ctx: &mut EvalContext,
    func: &JsValue,
    this: &JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    if let JsValue::Object(o) = func {
        let b = (**o).borrow();
        if let ObjectType::Function(f) = &*b {
            return f.call(ctx, this, args);
        }
    }
    Err(JErrorType::TypeError(format!(
        "'{}' is not a function",
        func
    )))
}

/// Define an enumerable native method as an ordinary data property of `obj`.
/// This is what resolve hooks call to materialize a method member.
pub fn define_native_method(
    obj: &JsObjectType,
    key: PropertyKey,
    name: &str,
    length: u32,
    func: NativeFn,
) -> Result<(), JErrorType> {
    let fobj: JsObjectType = Rc::new(RefCell::new(ObjectType::Function(Box::new(
        NativeFunctionObject::new(name, length, func),
    ))));
    let ok = (**obj).borrow_mut().as_js_object_mut().define_own_property(
        key,
        PropertyDescriptor::Data {
            value: JsValue::Object(fobj),
            writable: true,
            enumerable: true,
            configurable: true,
        },
    );
    if ok {
        Ok(())
    } else {
        Err(JErrorType::TypeError(format!(
            "could not define property '{}'",
            name
        )))
    }
}

/// Define an enumerable getter-only accessor on `obj`. Writes through it are
/// rejected by descriptor mechanics (no setter), not by the getter.
pub fn define_native_getter(
    obj: &JsObjectType,
    key: PropertyKey,
    name: &str,
    func: NativeFn,
) -> Result<(), JErrorType> {
    let getter: Rc<dyn JsFunctionObject> = Rc::new(NativeFunctionObject::new(name, 0, func));
    let ok = (**obj).borrow_mut().as_js_object_mut().define_own_property(
        key,
        PropertyDescriptor::Accessor {
            get: Some(getter),
            set: None,
            enumerable: true,
            configurable: true,
        },
    );
    if ok {
        Ok(())
    } else {
        Err(JErrorType::TypeError(format!(
            "could not define property '{}'",
            name
        )))
    }
}
