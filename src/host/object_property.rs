use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::host::function_object::JsFunctionObject;
use crate::host::symbol::SymbolData;
use crate::host::value::JsValue;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Str(String),
    Int(u32),
    Sym(SymbolData),
}
impl PropertyKey {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyKey::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}
impl Display for PropertyKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Str(s) => write!(f, "{}", s),
            PropertyKey::Int(i) => write!(f, "{}", i),
            PropertyKey::Sym(s) => write!(f, "{}", s),
        }
    }
}

pub enum PropertyDescriptor {
    Data {
        value: JsValue,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    Accessor {
        get: Option<Rc<dyn JsFunctionObject>>,
        set: Option<Rc<dyn JsFunctionObject>>,
        enumerable: bool,
        configurable: bool,
    },
}
impl PropertyDescriptor {
    pub fn is_enumerable(&self) -> bool {
        match self {
            PropertyDescriptor::Data { enumerable, .. } => *enumerable,
            PropertyDescriptor::Accessor { enumerable, .. } => *enumerable,
        }
    }

    pub fn is_configurable(&self) -> bool {
        match self {
            PropertyDescriptor::Data { configurable, .. } => *configurable,
            PropertyDescriptor::Accessor { configurable, .. } => *configurable,
        }
    }

    pub fn is_data_descriptor(&self) -> bool {
        match self {
            PropertyDescriptor::Data { .. } => true,
            PropertyDescriptor::Accessor { .. } => false,
        }
    }

    pub fn is_accessor_descriptor(&self) -> bool {
        !self.is_data_descriptor()
    }
}
impl PartialEq for PropertyDescriptor {
    fn eq(&self, other: &Self) -> bool {
        match self {
            PropertyDescriptor::Data {
                value,
                writable,
                enumerable,
                configurable,
            } => {
                if let PropertyDescriptor::Data {
                    value: other_value,
                    writable: other_writable,
                    enumerable: other_enumerable,
                    configurable: other_configurable,
                } = other
                {
                    value == other_value
                        && writable == other_writable
                        && enumerable == other_enumerable
                        && configurable == other_configurable
                } else {
                    false
                }
            }
            PropertyDescriptor::Accessor {
                set: setter,
                get: getter,
                enumerable,
                configurable,
            } => {
                if let PropertyDescriptor::Accessor {
                    set: other_setter,
                    get: other_getter,
                    enumerable: other_enumerable,
                    configurable: other_configurable,
                } = other
                {
                    same_function(setter, other_setter)
                        && same_function(getter, other_getter)
                        && enumerable == other_enumerable
                        && configurable == other_configurable
                } else {
                    false
                }
            }
        }
    }
}

fn same_function(
    a: &Option<Rc<dyn JsFunctionObject>>,
    b: &Option<Rc<dyn JsFunctionObject>>,
) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}
