//! # lazyprop - Lazy property resolution for native classes
//!
//! A JS-like host object model whose native classes materialize their
//! members lazily: a class registers a hook vtable (`construct`, `resolve`,
//! `may_resolve`, `new_enumerate`, `finalize`) and the runtime calls
//! `resolve` the first time a lookup misses a member name. The hook defines
//! the concrete property on the class's shared prototype; every later access
//! is served by ordinary property lookup and the hook never fires for that
//! name again.
//!
//! The bundled [`classes::crc::CrcClass`] shows the whole protocol with an
//! incremental CRC-32 accumulator: a mutating `update(bytes)` method and a
//! read-only `checksum` accessor, both resolved on first touch.
//!
//! ## Quick Start
//!
//! ```
//! use lazyprop::classes::crc::CrcClass;
//! use lazyprop::host::bytes_object::new_byte_array;
//! use lazyprop::host::context::EvalContext;
//! use lazyprop::host::object_property::PropertyKey;
//! use lazyprop::host::operations;
//! use lazyprop::host::value::{JsNumberType, JsValue};
//!
//! let mut ctx = EvalContext::new();
//! CrcClass::init(&mut ctx);
//!
//! // const crc = new Crc();
//! let crc = ctx.construct("Crc", vec![]).unwrap();
//! let obj = match &crc {
//!     JsValue::Object(o) => o.clone(),
//!     _ => unreachable!(),
//! };
//!
//! // crc.update(new Uint8Array([1, 2, 3, 4, 5]));
//! let update = operations::get(&mut ctx, &obj, &PropertyKey::Str("update".to_string())).unwrap();
//! let buf = JsValue::Object(new_byte_array(vec![1, 2, 3, 4, 5]));
//! operations::call(&mut ctx, &update, &crc, vec![buf]).unwrap();
//!
//! // crc.checksum;
//! let sum = operations::get(&mut ctx, &obj, &PropertyKey::Str("checksum".to_string())).unwrap();
//! assert_eq!(sum, JsValue::Number(JsNumberType::Integer(0x470B99F4)));
//! ```
//!
//! ## How resolution works
//!
//! 1. Script looks up `crc.update`; the instance has no such own property.
//! 2. The instance's `resolve` hook declines (only the prototype resolves),
//!    so lookup falls through the prototype chain.
//! 3. The prototype misses too; its `resolve` hook matches the name and
//!    defines the concrete member on the prototype, enumerable, and reports
//!    success.
//! 4. Lookup retries on the prototype and finds an ordinary property. All
//!    instances share that one resolution event per member name.
//!
//! `may_resolve` answers "could `resolve` ever produce this name?" without
//! side effects so the runtime can cache misses for every other name, and
//! `new_enumerate` reports the prospective names during enumeration without
//! forcing resolution.
//!
//! ## Lifetime of native state
//!
//! Instances own a non-garbage-collected state cell in their native-state
//! slot; the prototype's slot is permanently empty, and that emptiness is
//! the only prototype/instance discriminator. The heap registers every
//! constructed instance and, on [`host::heap::Heap::collect`], hands
//! unreachable ones to the class `finalize` hook, which takes and drops the
//! cell. Member implementations must check the discriminator before touching
//! the slot, which is what turns `Crc.prototype.update.call(...)` into a
//! catchable error instead of an empty-slot dereference.
//!
//! ## Architecture
//!
//! - **[`host`]** - The host runtime boundary
//!   - **[`host::object`]** - Prototype-chained objects and the native-state slot
//!   - **[`host::class`]** - Hook vtable trait and class registry
//!   - **[`host::operations`]** - Lookup/enumeration driving the hooks
//!   - **[`host::heap`]** - Allocation accounting and the finalizing sweep
//! - **[`classes`]** - Native extension classes (`Crc` and its checksum boundary)

#[macro_use]
extern crate lazy_static;

pub mod classes;
pub mod host;
