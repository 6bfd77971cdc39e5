//! Minimal keyed tree reconciler
//!
//! Drives any [`HostConfig`]: mounts element trees, diffs re-rendered trees
//! against the mounted fibers, and issues the attach/detach/update calls that
//! bring the host in line. Children match by key, or by position among unkeyed
//! siblings, and by kind. Within one parent, removals run first, then updates
//! and mounts, then placement from the last child backwards.

mod fiber;
mod root;

pub use fiber::Fiber;
pub use root::Root;

use crate::element::Element;
use crate::host::{HostConfig, UpdatePayload};
use std::collections::HashMap;

/// Identity of a child among its siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ChildKey<'a> {
    Keyed(&'a str),
    Index(usize),
}

fn child_keys<'a>(elements: impl Iterator<Item = &'a Element>) -> Vec<ChildKey<'a>> {
    let mut unkeyed = 0;
    elements
        .map(|element| match &element.key {
            Some(key) => ChildKey::Keyed(key.as_str()),
            None => {
                unkeyed += 1;
                ChildKey::Index(unkeyed - 1)
            }
        })
        .collect()
}

/// Create the instance for `element` and its whole sub-tree.
///
/// Children are attached to the new instance leaf-first; the returned root is
/// still detached.
pub fn mount<H: HostConfig>(host: &mut H, element: &Element) -> Result<Fiber<H::Instance>, H::Error> {
    let instance = host.create_instance(element)?;
    let mut fiber = Fiber::new(element, instance);
    for child in &element.children {
        let child_fiber = mount(host, child)?;
        host.append_child(instance, child_fiber.instance)?;
        fiber.children.push(child_fiber);
    }
    host.finalize_initial_children(instance, element)?;
    Ok(fiber)
}

/// Whether `fiber` can be updated in place to `element`
pub fn can_update<H: HostConfig>(host: &H, fiber: &Fiber<H::Instance>, element: &Element) -> bool {
    fiber.element.same_identity(element)
        && host.prepare_update(fiber.instance, &fiber.element, element) != UpdatePayload::Remount
}

/// Update a fiber whose identity matches `element`, then reconcile its children
pub fn update<H: HostConfig>(
    host: &mut H,
    fiber: &mut Fiber<H::Instance>,
    element: &Element,
) -> Result<(), H::Error> {
    match host.prepare_update(fiber.instance, &fiber.element, element) {
        UpdatePayload::Unchanged => {}
        UpdatePayload::Changed | UpdatePayload::Remount => {
            host.commit_update(fiber.instance, &fiber.element, element)?;
        }
    }
    fiber.element = element.shell();
    reconcile_children(host, fiber.instance, &mut fiber.children, &element.children)
}

/// Bring the children of `parent` from `current` to `elements`
pub fn reconcile_children<H: HostConfig>(
    host: &mut H,
    parent: H::Instance,
    current: &mut Vec<Fiber<H::Instance>>,
    elements: &[Element],
) -> Result<(), H::Error> {
    let old_keys = child_keys(current.iter().map(|fiber| &fiber.element));
    let old_by_key: HashMap<ChildKey<'_>, usize> = old_keys
        .iter()
        .enumerate()
        .map(|(index, key)| (*key, index))
        .collect();

    let mut matched = vec![None; elements.len()];
    let mut used = vec![false; current.len()];
    for (index, (element, key)) in elements.iter().zip(child_keys(elements.iter())).enumerate() {
        if let Some(&old) = old_by_key.get(&key) {
            if can_update(host, &current[old], element) {
                matched[index] = Some(old);
                used[old] = true;
            }
        }
    }

    let mut slots: Vec<Option<Fiber<H::Instance>>> = current.drain(..).map(Some).collect();
    let mut result = Ok(());
    for (index, slot) in slots.iter_mut().enumerate() {
        if used[index] {
            continue;
        }
        if let Some(stale) = slot.take() {
            if let Err(error) = host.remove_child(parent, stale.instance) {
                *slot = Some(stale);
                result = Err(error);
                break;
            }
        }
    }

    let mut next = Vec::with_capacity(elements.len());
    if result.is_ok() {
        result = settle_children(host, parent, &mut slots, &matched, elements, &mut next);
    }
    if result.is_err() {
        // Keep whatever is still mounted so a later pass can reconcile or
        // remove it
        next.extend(slots.into_iter().flatten());
    }
    *current = next;
    result
}

/// Update or mount each element in order, then move the ones out of place
fn settle_children<H: HostConfig>(
    host: &mut H,
    parent: H::Instance,
    slots: &mut [Option<Fiber<H::Instance>>],
    matched: &[Option<usize>],
    elements: &[Element],
    next: &mut Vec<Fiber<H::Instance>>,
) -> Result<(), H::Error> {
    let mut placement = Vec::with_capacity(elements.len());
    let mut last_placed = 0;
    for (element, old) in elements.iter().zip(matched) {
        match old.and_then(|old| slots[old].take().map(|fiber| (old, fiber))) {
            Some((old, mut fiber)) => {
                let updated = update(host, &mut fiber, element);
                next.push(fiber);
                updated?;
                if old < last_placed {
                    placement.push(true);
                } else {
                    last_placed = old;
                    placement.push(false);
                }
            }
            None => {
                next.push(mount(host, element)?);
                placement.push(true);
            }
        }
    }

    for index in (0..next.len()).rev() {
        if !placement[index] {
            continue;
        }
        let child = next[index].instance;
        match next.get(index + 1) {
            Some(sibling) => host.insert_before(parent, child, sibling.instance)?,
            None => host.append_child(parent, child)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Host over plain integers that logs every call
    #[derive(Default)]
    struct LogHost {
        next: u32,
        children: HashMap<u32, Vec<u32>>,
        log: Vec<String>,
    }

    impl LogHost {
        fn label(element: &Element) -> String {
            element
                .props
                .get("label")
                .and_then(|value| value.as_text())
                .unwrap_or(&element.kind)
                .to_string()
        }
    }

    impl HostConfig for LogHost {
        type Instance = u32;
        type Error = String;

        fn create_instance(&mut self, element: &Element) -> Result<u32, String> {
            self.next += 1;
            self.log.push(format!("create {} #{}", Self::label(element), self.next));
            Ok(self.next)
        }

        fn append_child(&mut self, parent: u32, child: u32) -> Result<(), String> {
            let children = self.children.entry(parent).or_default();
            children.retain(|&existing| existing != child);
            children.push(child);
            self.log.push(format!("append #{child} to #{parent}"));
            Ok(())
        }

        fn insert_before(&mut self, parent: u32, child: u32, before: u32) -> Result<(), String> {
            let children = self.children.entry(parent).or_default();
            children.retain(|&existing| existing != child);
            let index = children.iter().position(|&c| c == before).unwrap_or(children.len());
            children.insert(index, child);
            self.log.push(format!("insert #{child} before #{before}"));
            Ok(())
        }

        fn remove_child(&mut self, parent: u32, child: u32) -> Result<(), String> {
            self.children.entry(parent).or_default().retain(|&existing| existing != child);
            self.log.push(format!("remove #{child}"));
            Ok(())
        }

        fn prepare_update(&self, _: u32, old: &Element, new: &Element) -> UpdatePayload {
            if old.props.get("size") != new.props.get("size") {
                UpdatePayload::Remount
            } else if old.props != new.props {
                UpdatePayload::Changed
            } else {
                UpdatePayload::Unchanged
            }
        }

        fn commit_update(&mut self, instance: u32, _: &Element, new: &Element) -> Result<(), String> {
            if Self::label(new) == "broken" {
                return Err(format!("cannot update #{instance}"));
            }
            self.log.push(format!("update #{instance} to {}", Self::label(new)));
            Ok(())
        }

        fn prepare_for_commit(&mut self) {}

        fn reset_after_commit(&mut self) -> Result<(), String> {
            Ok(())
        }
    }

    fn item(key: &str) -> Element {
        Element::new("group").key(key).prop("label", key)
    }

    fn list(keys: &[&str]) -> Element {
        Element::new("group").children(keys.iter().map(|key| item(key)))
    }

    #[test]
    fn test_reorder_moves_without_recreating() {
        let mut host = LogHost::default();
        let mut root = mount(&mut host, &list(&["a", "b", "c"])).unwrap();
        host.log.clear();

        update(&mut host, &mut root, &list(&["c", "a", "b"])).unwrap();

        assert!(host.log.iter().all(|line| !line.starts_with("create") && !line.starts_with("remove")));
        assert_eq!(host.children[&root.instance], vec![4, 2, 3]);
    }

    #[test]
    fn test_removals_run_before_mounts() {
        let mut host = LogHost::default();
        let mut root = mount(&mut host, &list(&["a", "b"])).unwrap();
        host.log.clear();

        update(&mut host, &mut root, &list(&["b", "c"])).unwrap();

        assert_eq!(host.log[0], "remove #2");
        assert_eq!(host.log[1], "create c #4");
        assert_eq!(host.children[&root.instance], vec![3, 4]);
    }

    #[test]
    fn test_changed_key_remounts() {
        let mut host = LogHost::default();
        let mut root = mount(&mut host, &list(&["a"])).unwrap();
        host.log.clear();

        update(&mut host, &mut root, &list(&["z"])).unwrap();

        assert_eq!(host.log, vec!["remove #2", "create z #3", "append #3 to #1"]);
    }

    #[test]
    fn test_prop_change_updates_in_place() {
        let mut host = LogHost::default();
        let mut root = mount(&mut host, &list(&["a"])).unwrap();
        host.log.clear();

        let renamed = Element::new("group").child(Element::new("group").key("a").prop("label", "renamed"));
        update(&mut host, &mut root, &renamed).unwrap();

        assert_eq!(host.log, vec!["update #2 to renamed"]);
    }

    #[test]
    fn test_constructor_prop_change_remounts() {
        let mut host = LogHost::default();
        let sized = |size: i32| Element::new("group").child(Element::new("boxGeometry").prop("size", size));
        let mut root = mount(&mut host, &sized(1)).unwrap();
        host.log.clear();

        update(&mut host, &mut root, &sized(2)).unwrap();

        assert_eq!(host.log[0], "remove #2");
        assert_eq!(host.log[1], "create boxGeometry #3");
    }

    #[test]
    fn test_failed_child_update_keeps_mounted_fibers() {
        let mut host = LogHost::default();
        let mut root = mount(&mut host, &list(&["a", "b"])).unwrap();

        let broken = Element::new("group")
            .child(item("a"))
            .child(Element::new("group").key("b").prop("label", "broken"));
        assert!(update(&mut host, &mut root, &broken).is_err());
        assert_eq!(root.children.len(), 2);

        host.log.clear();
        update(&mut host, &mut root, &list(&["a", "b"])).unwrap();
        assert!(host.log.iter().all(|line| !line.starts_with("create")));
        assert_eq!(host.children[&root.instance], vec![2, 3]);
    }
}
