use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ptr;
use std::rc::Rc;

use crate::host::bytes_object::ByteArrayObject;
use crate::host::class::ClassOps;
use crate::host::function_object::JsFunctionObject;
use crate::host::object_property::{PropertyDescriptor, PropertyKey};

pub type JsObjectType = Rc<RefCell<ObjectType>>;

pub enum ObjectType {
    Ordinary(Box<dyn JsObject>),
    Function(Box<dyn JsFunctionObject>),
    Bytes(ByteArrayObject),
}
impl ObjectType {
    pub fn is_callable(&self) -> bool {
        match self {
            ObjectType::Function(_) => true,
            _ => false,
        }
    }

    pub fn as_js_object(&self) -> &dyn JsObject {
        match self {
            ObjectType::Ordinary(o) => o.as_super_trait(),
            ObjectType::Function(o) => o.as_super_trait(),
            ObjectType::Bytes(o) => o.as_super_trait(),
        }
    }

    pub fn as_js_object_mut(&mut self) -> &mut dyn JsObject {
        match self {
            ObjectType::Ordinary(o) => o.as_super_trait_mut(),
            ObjectType::Function(o) => o.as_super_trait_mut(),
            ObjectType::Bytes(o) => o.as_super_trait_mut(),
        }
    }
}
impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        same_js_object(self.as_js_object(), other.as_js_object())
    }
}

/// Identity comparison: two trait objects are the same object iff they share
/// one `ObjectBase`.
pub fn same_js_object(a: &dyn JsObject, b: &dyn JsObject) -> bool {
    ptr::eq(
        a.get_object_base() as *const ObjectBase,
        b.get_object_base() as *const ObjectBase,
    )
}

pub struct ObjectBase {
    pub(crate) properties: HashMap<PropertyKey, PropertyDescriptor>,
    pub(crate) is_extensible: bool,
    pub(crate) prototype: Option<JsObjectType>,
    pub(crate) class_ops: Option<Rc<dyn ClassOps>>,
    pub(crate) native_state: Option<Box<dyn Any>>,
}
impl ObjectBase {
    pub fn new() -> Self {
        ObjectBase {
            properties: HashMap::new(),
            is_extensible: true,
            prototype: None,
            class_ops: None,
            native_state: None,
        }
    }

    pub fn with_class(ops: Rc<dyn ClassOps>) -> Self {
        let mut base = ObjectBase::new();
        base.class_ops = Some(ops);
        base
    }
}
impl Default for ObjectBase {
    fn default() -> Self {
        Self::new()
    }
}

pub trait JsObject {
    fn get_object_base_mut(&mut self) -> &mut ObjectBase;

    fn get_object_base(&self) -> &ObjectBase;

    fn as_super_trait(&self) -> &dyn JsObject;

    fn as_super_trait_mut(&mut self) -> &mut dyn JsObject;

    fn get_prototype_of(&self) -> Option<JsObjectType> {
        self.get_object_base().prototype.clone()
    }

    fn set_prototype_of(&mut self, prototype: Option<JsObjectType>) -> bool {
        if !self.is_extensible() {
            return false;
        }
        if let Some(new_proto) = &prototype {
            // Walk up from the candidate to prevent a circular chain. The
            // caller holds this object mutably, so a failed borrow on the
            // walk means the chain reached this object itself.
            let mut p = Some(new_proto.clone());
            while let Some(some_p) = p {
                let next = match (*some_p).try_borrow() {
                    Err(_) => return false,
                    Ok(b) => {
                        if same_js_object(self.as_super_trait(), b.as_js_object()) {
                            return false;
                        }
                        b.as_js_object().get_prototype_of()
                    }
                };
                p = next;
            }
        }
        self.get_object_base_mut().prototype = prototype;
        true
    }

    fn is_extensible(&self) -> bool {
        self.get_object_base().is_extensible
    }

    fn prevent_extensions(&mut self) -> bool {
        self.get_object_base_mut().is_extensible = false;
        true
    }

    fn get_own_property(&self, property: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.get_object_base().properties.get(property)
    }

    fn define_own_property(
        &mut self,
        property: PropertyKey,
        descriptor: PropertyDescriptor,
    ) -> bool {
        ordinary_define_own_property(self, property, descriptor)
    }

    fn delete(&mut self, property: &PropertyKey) -> bool {
        match self.get_own_property(property) {
            None => true,
            Some(pd) => {
                if pd.is_configurable() {
                    self.get_object_base_mut().properties.remove(property);
                    true
                } else {
                    false
                }
            }
        }
    }

    fn own_property_keys(&self) -> Vec<PropertyKey> {
        let mut int_keys = vec![];
        let mut str_keys = vec![];
        let mut sym_keys = vec![];
        for key in self.get_object_base().properties.keys() {
            match key {
                PropertyKey::Str(d) => {
                    str_keys.push(d.to_string());
                }
                PropertyKey::Int(d) => {
                    int_keys.push(*d);
                }
                PropertyKey::Sym(d) => {
                    sym_keys.push(d.clone());
                }
            }
        }
        int_keys.sort_unstable();
        str_keys.sort_unstable();

        let mut result = vec![];
        result.extend(int_keys.into_iter().map(PropertyKey::Int));
        result.extend(str_keys.into_iter().map(PropertyKey::Str));
        result.extend(sym_keys.into_iter().map(PropertyKey::Sym));
        result
    }

    /// The shared hook vtable of the native class this object belongs to,
    /// if any. Present on both the class prototype and its instances.
    fn class_ops(&self) -> Option<Rc<dyn ClassOps>> {
        self.get_object_base().class_ops.clone()
    }

    /// Whether the native-state slot is occupied. An empty slot is the one
    /// and only marker that an object is a class prototype rather than an
    /// instance.
    fn has_native_state(&self) -> bool {
        self.get_object_base().native_state.is_some()
    }

    fn native_state(&self) -> Option<&dyn Any> {
        self.get_object_base().native_state.as_deref()
    }

    fn native_state_mut(&mut self) -> Option<&mut dyn Any> {
        match &mut self.get_object_base_mut().native_state {
            Some(state) => Some(state.as_mut()),
            None => None,
        }
    }

    fn set_native_state(&mut self, state: Box<dyn Any>) {
        self.get_object_base_mut().native_state = Some(state);
    }

    /// Empties the slot, handing ownership of the state to the caller. Used
    /// by finalize hooks: taking rather than reading makes a repeated
    /// finalization a no-op.
    fn take_native_state(&mut self) -> Option<Box<dyn Any>> {
        self.get_object_base_mut().native_state.take()
    }

    fn to_string(&self) -> String {
        match &self.get_object_base().class_ops {
            Some(ops) => format!("[object {}]", ops.name()),
            None => "object".to_string(),
        }
    }
}

pub fn ordinary_define_own_property<J: JsObject + ?Sized>(
    o: &mut J,
    property: PropertyKey,
    descriptor: PropertyDescriptor,
) -> bool {
    match o.get_own_property(&property) {
        Some(current) => {
            // A non-configurable property only accepts an identical
            // redefinition.
            if !current.is_configurable() && current != &descriptor {
                return false;
            }
            o.get_object_base_mut().properties.insert(property, descriptor);
            true
        }
        None => {
            if o.is_extensible() {
                o.get_object_base_mut().properties.insert(property, descriptor);
                true
            } else {
                false
            }
        }
    }
}

/// A plain host object, optionally belonging to a native class.
pub struct NativeObject {
    base: ObjectBase,
}
impl NativeObject {
    pub fn new() -> Self {
        NativeObject {
            base: ObjectBase::new(),
        }
    }

    pub fn with_class(ops: Rc<dyn ClassOps>) -> Self {
        NativeObject {
            base: ObjectBase::with_class(ops),
        }
    }
}
impl Default for NativeObject {
    fn default() -> Self {
        Self::new()
    }
}
impl JsObject for NativeObject {
    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn as_super_trait(&self) -> &dyn JsObject {
        self
    }

    fn as_super_trait_mut(&mut self) -> &mut dyn JsObject {
        self
    }
}

pub fn new_object(prototype: Option<JsObjectType>) -> JsObjectType {
    let mut obj = NativeObject::new();
    obj.get_object_base_mut().prototype = prototype;
    Rc::new(RefCell::new(ObjectType::Ordinary(Box::new(obj))))
}

/// Allocates a host object tied to a native class, chained to the given
/// prototype. The native-state slot starts empty; the caller decides whether
/// the object becomes a prototype (slot stays empty) or an instance (slot is
/// bound right after).
pub fn new_object_with_class(
    ops: Rc<dyn ClassOps>,
    prototype: Option<JsObjectType>,
) -> JsObjectType {
    let mut obj = NativeObject::with_class(ops);
    obj.get_object_base_mut().prototype = prototype;
    Rc::new(RefCell::new(ObjectType::Ordinary(Box::new(obj))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::value::JsValue;

    fn data_prop(value: JsValue, configurable: bool) -> PropertyDescriptor {
        PropertyDescriptor::Data {
            value,
            writable: true,
            enumerable: true,
            configurable,
        }
    }

    #[test]
    fn test_prototype_cycle_is_rejected() {
        let a = new_object(None);
        let b = new_object(Some(a.clone()));
        let accepted = a
            .borrow_mut()
            .as_js_object_mut()
            .set_prototype_of(Some(b.clone()));
        assert!(!accepted);
        assert!(a.borrow().as_js_object().get_prototype_of().is_none());
    }

    #[test]
    fn test_non_extensible_object_rejects_new_properties() {
        let obj = new_object(None);
        let mut o = obj.borrow_mut();
        let o = o.as_js_object_mut();
        o.prevent_extensions();
        assert!(!o.define_own_property(
            PropertyKey::Str("x".to_string()),
            data_prop(JsValue::Null, true),
        ));
        assert!(o.get_own_property(&PropertyKey::Str("x".to_string())).is_none());
    }

    #[test]
    fn test_non_configurable_property_survives_delete_and_redefine() {
        let obj = new_object(None);
        let mut o = obj.borrow_mut();
        let o = o.as_js_object_mut();
        let key = PropertyKey::Str("pinned".to_string());
        assert!(o.define_own_property(key.clone(), data_prop(JsValue::Boolean(true), false)));

        assert!(!o.delete(&key));
        assert!(!o.define_own_property(key.clone(), data_prop(JsValue::Boolean(false), false)));
        match o.get_own_property(&key) {
            Some(PropertyDescriptor::Data { value, .. }) => {
                assert_eq!(value, &JsValue::Boolean(true))
            }
            other => panic!("expected data property, got {:?}", other.is_some()),
        }
    }

    #[test]
    fn test_own_property_keys_orders_ints_before_strings() {
        let obj = new_object(None);
        let mut o = obj.borrow_mut();
        let o = o.as_js_object_mut();
        o.define_own_property(PropertyKey::Str("b".to_string()), data_prop(JsValue::Null, true));
        o.define_own_property(PropertyKey::Int(7), data_prop(JsValue::Null, true));
        o.define_own_property(PropertyKey::Str("a".to_string()), data_prop(JsValue::Null, true));
        o.define_own_property(PropertyKey::Int(2), data_prop(JsValue::Null, true));

        assert_eq!(
            o.own_property_keys(),
            vec![
                PropertyKey::Int(2),
                PropertyKey::Int(7),
                PropertyKey::Str("a".to_string()),
                PropertyKey::Str("b".to_string()),
            ]
        );
    }
}
