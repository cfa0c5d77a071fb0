extern crate lazyprop;

use std::cell::Cell;
use std::rc::Rc;

use lazyprop::classes::crc::CrcClass;
use lazyprop::host::bytes_object::new_byte_array;
use lazyprop::host::class::{ClassDefinition, ClassOps};
use lazyprop::host::context::EvalContext;
use lazyprop::host::error::JErrorType;
use lazyprop::host::function_object::CallArgs;
use lazyprop::host::heap::HeapConfig;
use lazyprop::host::object::{JsObject, JsObjectType};
use lazyprop::host::object_property::PropertyKey;
use lazyprop::host::operations;
use lazyprop::host::symbol::SymbolData;
use lazyprop::host::value::JsValue;

fn key(name: &str) -> PropertyKey {
    PropertyKey::Str(name.to_string())
}

fn construct_crc(ctx: &mut EvalContext) -> JsObjectType {
    match ctx.construct("Crc", vec![]).unwrap() {
        JsValue::Object(o) => o,
        other => panic!("expected object from constructor, got {:?}", other),
    }
}

fn has_own(obj: &JsObjectType, name: &str) -> bool {
    (**obj)
        .borrow()
        .as_js_object()
        .get_own_property(&key(name))
        .is_some()
}

/// Hook vtable that wraps `CrcClass` and counts hook invocations, so tests
/// can observe how often the runtime consults the hooks.
struct CountingCrc {
    inner: CrcClass,
    resolves: Rc<Cell<usize>>,
    finalizes: Rc<Cell<usize>>,
}
impl CountingCrc {
    fn install(ctx: &mut EvalContext) -> (Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let resolves = Rc::new(Cell::new(0));
        let finalizes = Rc::new(Cell::new(0));
        ctx.init_class(Rc::new(CountingCrc {
            inner: CrcClass,
            resolves: resolves.clone(),
            finalizes: finalizes.clone(),
        }));
        (resolves, finalizes)
    }
}
impl ClassOps for CountingCrc {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn construct(
        &self,
        ctx: &mut EvalContext,
        class: &Rc<ClassDefinition>,
        args: CallArgs,
    ) -> Result<JsValue, JErrorType> {
        self.inner.construct(ctx, class, args)
    }

    fn resolve(
        &self,
        ctx: &mut EvalContext,
        obj: &JsObjectType,
        key: &PropertyKey,
    ) -> Result<bool, JErrorType> {
        self.resolves.set(self.resolves.get() + 1);
        self.inner.resolve(ctx, obj, key)
    }

    fn may_resolve(&self, key: &PropertyKey) -> bool {
        self.inner.may_resolve(key)
    }

    fn new_enumerate(&self, obj: &JsObjectType) -> Vec<PropertyKey> {
        self.inner.new_enumerate(obj)
    }

    fn finalize(&self, obj: &JsObjectType) {
        self.finalizes.set(self.finalizes.get() + 1);
        self.inner.finalize(obj)
    }
}

// ── Resolution state machine ─────────────────────────────────────────

#[test]
fn test_resolve_fires_once_per_name_on_prototype() {
    let mut ctx = EvalContext::new();
    let (resolves, _) = CountingCrc::install(&mut ctx);
    let proto = ctx.registry.get_class("Crc").unwrap().prototype.clone();

    assert!(!has_own(&proto, "update"));
    let first = operations::get(&mut ctx, &proto, &key("update")).unwrap();
    assert_eq!(resolves.get(), 1);
    assert!(has_own(&proto, "update"));

    // The second lookup is served by ordinary property lookup: same function
    // object, no further hook call.
    let second = operations::get(&mut ctx, &proto, &key("update")).unwrap();
    assert_eq!(resolves.get(), 1);
    assert_eq!(first, second);
}

#[test]
fn test_instance_lookup_resolves_on_prototype() {
    let mut ctx = EvalContext::new();
    CrcClass::init(&mut ctx);
    let proto = ctx.registry.get_class("Crc").unwrap().prototype.clone();
    let crc = construct_crc(&mut ctx);

    assert!(!has_own(&proto, "update"));
    operations::get(&mut ctx, &crc, &key("update")).unwrap();

    // The member landed on the shared prototype, not on the instance.
    assert!(has_own(&proto, "update"));
    assert!(!has_own(&crc, "update"));
}

#[test]
fn test_unknown_name_is_not_resolved() {
    let mut ctx = EvalContext::new();
    let (resolves, _) = CountingCrc::install(&mut ctx);
    let crc = construct_crc(&mut ctx);

    let value = operations::get(&mut ctx, &crc, &key("digest")).unwrap();
    assert_eq!(value, JsValue::Undefined);
    // may_resolve filtered the name out before the hook was consulted.
    assert_eq!(resolves.get(), 0);
}

#[test]
fn test_has_property_goes_through_resolution() {
    let mut ctx = EvalContext::new();
    CrcClass::init(&mut ctx);
    let crc = construct_crc(&mut ctx);

    assert!(operations::has_property(&mut ctx, &crc, &key("update")).unwrap());
    assert!(operations::has_property(&mut ctx, &crc, &key("checksum")).unwrap());
    assert!(!operations::has_property(&mut ctx, &crc, &key("digest")).unwrap());
}

// ── mayResolve ───────────────────────────────────────────────────────

#[test]
fn test_may_resolve_matches_exactly_the_lazy_names() {
    let ops = CrcClass;
    assert!(ops.may_resolve(&key("update")));
    assert!(ops.may_resolve(&key("checksum")));
    assert!(!ops.may_resolve(&key("digest")));
    assert!(!ops.may_resolve(&key("")));
    assert!(!ops.may_resolve(&PropertyKey::Int(0)));
    assert!(!ops.may_resolve(&PropertyKey::Sym(SymbolData::new_empty())));
}

#[test]
fn test_may_resolve_is_independent_of_resolution_state() {
    let mut ctx = EvalContext::new();
    CrcClass::init(&mut ctx);
    let proto = ctx.registry.get_class("Crc").unwrap().prototype.clone();
    let ops = ctx.registry.get_class("Crc").unwrap().ops.clone();

    operations::get(&mut ctx, &proto, &key("update")).unwrap();
    assert!(ops.may_resolve(&key("update")));
    assert!(ops.may_resolve(&key("checksum")));
    assert!(!ops.may_resolve(&key("digest")));
}

// ── Enumeration ──────────────────────────────────────────────────────

#[test]
fn test_enumerating_fresh_instance_reports_lazy_names() {
    let mut ctx = EvalContext::new();
    CrcClass::init(&mut ctx);
    let proto = ctx.registry.get_class("Crc").unwrap().prototype.clone();
    let crc = construct_crc(&mut ctx);

    let keys = operations::enumerate_keys(&crc);
    assert!(keys.contains(&key("update")));
    assert!(keys.contains(&key("checksum")));

    // Enumeration reports prospective names without resolving them.
    assert!(!has_own(&proto, "update"));
    assert!(!has_own(&proto, "checksum"));
}

#[test]
fn test_enumerating_prototype_is_stable_across_resolution() {
    let mut ctx = EvalContext::new();
    CrcClass::init(&mut ctx);
    let proto = ctx.registry.get_class("Crc").unwrap().prototype.clone();

    let before = operations::enumerate_keys(&proto);
    assert!(before.contains(&key("update")));
    assert!(before.contains(&key("checksum")));

    // Resolve one member, then enumerate again: same names, no duplicates.
    operations::get(&mut ctx, &proto, &key("update")).unwrap();
    let after = operations::enumerate_keys(&proto);
    assert_eq!(
        after.iter().filter(|k| **k == key("update")).count(),
        1
    );
    assert_eq!(
        after.iter().filter(|k| **k == key("checksum")).count(),
        1
    );
}

#[test]
fn test_new_enumerate_reports_nothing_for_instances() {
    let mut ctx = EvalContext::new();
    CrcClass::init(&mut ctx);
    let crc = construct_crc(&mut ctx);
    let ops = ctx.registry.get_class("Crc").unwrap().ops.clone();
    assert!(ops.new_enumerate(&crc).is_empty());
}

// ── Finalization ─────────────────────────────────────────────────────

#[test]
fn test_collect_finalizes_unreachable_instance() {
    let mut ctx = EvalContext::new();
    let (_, finalizes) = CountingCrc::install(&mut ctx);

    let crc = construct_crc(&mut ctx);
    update_once(&mut ctx, &crc);
    assert_eq!(ctx.heap.live_objects(), 1);

    drop(crc);
    assert_eq!(ctx.heap.collect(), 1);
    assert_eq!(finalizes.get(), 1);
    assert_eq!(ctx.heap.live_objects(), 0);
    assert_eq!(ctx.heap.get_allocated(), 0);

    // Nothing left for a second sweep.
    assert_eq!(ctx.heap.collect(), 0);
    assert_eq!(finalizes.get(), 1);
}

#[test]
fn test_collect_spares_reachable_instances() {
    let mut ctx = EvalContext::new();
    let (_, finalizes) = CountingCrc::install(&mut ctx);

    let crc = construct_crc(&mut ctx);
    assert_eq!(ctx.heap.collect(), 0);
    assert_eq!(finalizes.get(), 0);

    // Still usable after the sweep.
    update_once(&mut ctx, &crc);
}

#[test]
fn test_repeated_finalize_is_a_no_op() {
    let mut ctx = EvalContext::new();
    CrcClass::init(&mut ctx);
    let crc = construct_crc(&mut ctx);
    let ops = ctx.registry.get_class("Crc").unwrap().ops.clone();

    ops.finalize(&crc);
    assert!(!(*crc).borrow().as_js_object().has_native_state());
    // The slot was cleared on the first call; the second finds nothing.
    ops.finalize(&crc);
    assert!(!(*crc).borrow().as_js_object().has_native_state());
}

// ── Construction failure paths ───────────────────────────────────────

#[test]
fn test_construction_fails_cleanly_when_out_of_memory() {
    let mut ctx = EvalContext::with_heap(HeapConfig::with_limit(2));
    CrcClass::init(&mut ctx);

    let result = ctx.construct("Crc", vec![]);
    match result {
        Err(JErrorType::RangeError(msg)) => assert_eq!(msg, "Out of memory"),
        other => panic!("expected RangeError, got {:?}", other),
    }
    // No partially-bound object was left behind.
    assert_eq!(ctx.heap.live_objects(), 0);
    assert_eq!(ctx.heap.get_allocated(), 0);
}

#[test]
fn test_class_registration_is_idempotent() {
    let mut ctx = EvalContext::new();
    let first = CrcClass::init(&mut ctx);
    let second = CrcClass::init(&mut ctx);
    assert!(Rc::ptr_eq(&first.prototype, &second.prototype));
}

fn update_once(ctx: &mut EvalContext, obj: &JsObjectType) {
    let update = operations::get(ctx, obj, &key("update")).unwrap();
    operations::call(
        ctx,
        &update,
        &JsValue::Object(obj.clone()),
        vec![JsValue::Object(new_byte_array(vec![1, 2, 3]))],
    )
    .unwrap();
}
