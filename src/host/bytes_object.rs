use std::cell::RefCell;
use std::rc::Rc;

use crate::host::object::{JsObject, JsObjectType, ObjectBase, ObjectType};
use crate::host::object_property::{PropertyDescriptor, PropertyKey};
use crate::host::value::{JsNumberType, JsValue};

lazy_static! {
    static ref LENGTH_PROP: PropertyKey = PropertyKey::Str("length".to_string());
}

/// A contiguous buffer of unsigned bytes — the only argument type byte-eating
/// native members accept (the Uint8Array analog of this host).
pub struct ByteArrayObject {
    base: ObjectBase,
    data: Vec<u8>,
}
impl ByteArrayObject {
    pub fn new(data: Vec<u8>) -> Self {
        let mut base = ObjectBase::new();
        base.properties.insert(
            LENGTH_PROP.clone(),
            PropertyDescriptor::Data {
                value: JsValue::Number(JsNumberType::Integer(data.len() as i64)),
                writable: false,
                enumerable: false,
                configurable: false,
            },
        );
        ByteArrayObject { base, data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
impl JsObject for ByteArrayObject {
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

    fn to_string(&self) -> String {
        format!("bytes[{}]", self.data.len())
    }
}

pub fn new_byte_array(data: Vec<u8>) -> JsObjectType {
    Rc::new(RefCell::new(ObjectType::Bytes(ByteArrayObject::new(data))))
}
