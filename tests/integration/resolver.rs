//! Resolution outcomes through the public API

use std::sync::Arc;

use vmtpl_cli::cache::{MemoryTemplateStore, StaticStoreProvider, StoreProvider, TemplateStore};
use vmtpl_cli::core::{Template, VmtplError};
use vmtpl_cli::resolver::{AnnotationKeys, TemplateResolver};
use vmtpl_cli::test_utils::fixtures::{baked_vm, template, templated_vm};
use vmtpl_cli::test_utils::init_test_logging;

fn seeded_store() -> Arc<MemoryTemplateStore> {
    Arc::new(MemoryTemplateStore::from_templates([
        template("ns1", "tpl1"),
        template("ns1", "tpl2"),
        template("ns2", "tpl1"),
    ]))
}

fn resolver_over(store: Arc<MemoryTemplateStore>) -> TemplateResolver {
    TemplateResolver::with_default_keys(Arc::new(StaticStoreProvider::new(store)))
}

/// Provider that can be switched on and off, to show the store is looked up
/// per resolution rather than captured once.
struct SwitchableProvider {
    store: Arc<MemoryTemplateStore>,
    enabled: std::sync::atomic::AtomicBool,
}

impl StoreProvider for SwitchableProvider {
    fn store(&self) -> Option<Arc<dyn TemplateStore>> {
        if self.enabled.load(std::sync::atomic::Ordering::SeqCst) {
            Some(self.store.clone() as Arc<dyn TemplateStore>)
        } else {
            None
        }
    }
}

#[test]
fn test_vm_without_annotations_has_no_parent() {
    init_test_logging(None);
    let resolver = resolver_over(seeded_store());
    assert!(resolver.resolve(&baked_vm("vm1")).unwrap().is_none());
}

#[test]
fn test_found_template_is_copy_of_stored() {
    let store = seeded_store();
    let resolver = resolver_over(store.clone());

    let resolved = resolver.resolve(&templated_vm("vm1", "ns1", "tpl1")).unwrap().unwrap();
    assert_eq!(resolved, template("ns1", "tpl1"));

    let cached = store.get_by_key("ns1/tpl1").unwrap().unwrap();
    assert!(!std::ptr::eq(&resolved, cached.as_ref()));
}

#[test]
fn test_missing_template_reports_key_and_vm() {
    let resolver = resolver_over(Arc::new(MemoryTemplateStore::new()));
    let err = resolver.resolve(&templated_vm("fedora-vm", "ns1", "tpl1")).unwrap_err();

    assert!(matches!(err, VmtplError::TemplateNotFound { .. }));
    let message = err.to_string();
    assert!(message.contains("ns1/tpl1"), "{message}");
    assert!(message.contains("fedora-vm"), "{message}");
}

#[test]
fn test_no_store_ignores_annotations() {
    let resolver =
        TemplateResolver::with_default_keys(Arc::new(StaticStoreProvider::unavailable()));
    assert!(resolver.resolve(&templated_vm("vm1", "ns1", "tpl1")).unwrap().is_none());
    assert!(resolver.resolve(&templated_vm("vm1", "ns9", "missing")).unwrap().is_none());
}

#[test]
fn test_absences_are_indistinguishable() {
    let unavailable =
        TemplateResolver::with_default_keys(Arc::new(StaticStoreProvider::unavailable()));
    let available = resolver_over(seeded_store());

    let outcomes = [
        unavailable.resolve(&templated_vm("vm1", "ns1", "tpl1")),
        available.resolve(&baked_vm("vm1")),
        available.resolve(&templated_vm("vm1", "", "tpl1")),
        available.resolve(&templated_vm("vm1", "ns1", "")),
    ];

    for outcome in outcomes {
        assert!(matches!(outcome, Ok(None)));
    }
}

#[test]
fn test_resolution_is_idempotent() {
    let resolver = resolver_over(seeded_store());
    let vms = [
        templated_vm("vm1", "ns1", "tpl1"),
        templated_vm("vm2", "ns1", "gone"),
        baked_vm("vm3"),
        templated_vm("vm4", "a/b", "tpl1"),
    ];

    for vm in &vms {
        let first = format!("{:?}", resolver.resolve(vm));
        for _ in 0..5 {
            assert_eq!(format!("{:?}", resolver.resolve(vm)), first);
        }
    }
}

#[test]
fn test_mutating_result_does_not_leak() {
    let resolver = resolver_over(seeded_store());
    let vm = templated_vm("vm1", "ns2", "tpl1");

    let mut first = resolver.resolve(&vm).unwrap().unwrap();
    first.labels.clear();
    first.objects.clear();
    first.parameters[0].value = Some("changed".to_string());

    let second = resolver.resolve(&vm).unwrap().unwrap();
    assert_eq!(second, template("ns2", "tpl1"));
    assert_ne!(first, second);
}

#[test]
fn test_store_updates_do_not_affect_earlier_copies() {
    let store = seeded_store();
    let resolver = resolver_over(store.clone());
    let vm = templated_vm("vm1", "ns1", "tpl2");

    let before = resolver.resolve(&vm).unwrap().unwrap();

    let mut changed = template("ns1", "tpl2");
    changed.message = Some("updated".to_string());
    store.update(changed);

    let after = resolver.resolve(&vm).unwrap().unwrap();
    assert_eq!(before.message, None);
    assert_eq!(after.message.as_deref(), Some("updated"));

    store.delete("ns1/tpl2");
    assert!(matches!(resolver.resolve(&vm), Err(VmtplError::TemplateNotFound { .. })));
    assert_eq!(before.name(), "tpl2");
}

#[test]
fn test_provider_consulted_per_call() {
    let provider = Arc::new(SwitchableProvider {
        store: seeded_store(),
        enabled: std::sync::atomic::AtomicBool::new(false),
    });
    let resolver = TemplateResolver::with_default_keys(provider.clone());
    let vm = templated_vm("vm1", "ns1", "tpl1");

    assert!(resolver.resolve(&vm).unwrap().is_none());

    provider.enabled.store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(resolver.resolve(&vm).unwrap().is_some());
}

#[test]
fn test_annotation_with_separator_is_not_found() {
    let resolver = resolver_over(seeded_store());
    let err = resolver.resolve(&templated_vm("vm1", "ns1", "tpl1/extra")).unwrap_err();
    match err {
        VmtplError::TemplateNotFound { key, vm } => {
            assert_eq!(key, "ns1/tpl1/extra");
            assert_eq!(vm, "vm1");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_custom_annotation_keys() {
    let keys = AnnotationKeys {
        template_name: "example.com/template".to_string(),
        template_namespace: "example.com/template-namespace".to_string(),
    };
    let resolver = TemplateResolver::new(Arc::new(StaticStoreProvider::new(seeded_store())), keys);

    let vm = baked_vm("vm1")
        .with_annotation("example.com/template-namespace", "ns1")
        .with_annotation("example.com/template", "tpl1");
    let resolved: Template = resolver.resolve(&vm).unwrap().unwrap();
    assert_eq!(resolved.name(), "tpl1");

    // Standard annotations are not consulted
    assert!(resolver.resolve(&templated_vm("vm2", "ns1", "tpl1")).unwrap().is_none());
}
