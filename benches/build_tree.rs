//! This bench test simulates rebuilding the component tree of a very large
//! form: thousands of fields spread across nested fieldsets.

#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use formbridge::{
    ComponentType,
    domain::{Component, ComponentExtra},
    transform::tree,
};

/// Generates a flat component list: 50 top-level fieldsets of 100 fields
/// each, ordered by (pid, weight) as the repository would return them.
fn large_form() -> Vec<Component> {
    let mut components = Vec::with_capacity(5050);
    for group in 0..50u64 {
        let weight = i64::try_from(group).unwrap();
        components.push(component(group + 1, 0, weight, ComponentType::Fieldset));
    }
    for group in 0..50u64 {
        for field in 0..100u64 {
            let weight = i64::try_from(field).unwrap();
            components.push(component(
                51 + group * 100 + field,
                group + 1,
                weight,
                ComponentType::Textfield,
            ));
        }
    }
    components
}

fn component(cid: u64, pid: u64, weight: i64, kind: ComponentType) -> Component {
    Component {
        cid,
        pid,
        weight,
        form_key: format!("field_{cid}"),
        name: format!("Field {cid}"),
        kind,
        value: String::new(),
        required: false,
        extra: ComponentExtra::default(),
    }
}

fn build_tree(c: &mut Criterion) {
    c.bench_function("build tree", |b| {
        b.iter_batched(large_form, tree::build, BatchSize::SmallInput);
    });
}

criterion_group!(benches, build_tree);
criterion_main!(benches);
