//! Name-keyed domain merge used by the restore protocol
//!
//! When an untrusted tool rewrites a document it may drop domains or
//! elements it does not understand. The merge reconciles the current file
//! state with the last trusted snapshot: everything present in either input
//! survives, and on an element-name collision the trusted side wins because
//! it is processed second.

use std::collections::HashMap;

use crate::model::{Element, NamedDomain};

/// Merge two domain collections, current first, trusted second
///
/// Domains are grouped by name in first-seen order across the concatenated
/// inputs. Within a group, elements are keyed by name: a later element with
/// a seen name overwrites the earlier one's fields in place, a new name
/// appends. The result is idempotent against re-merging with the same
/// trusted set, but not commutative - swapping the arguments flips which
/// side wins collisions.
pub fn merge_domains(current: &[NamedDomain], trusted: &[NamedDomain]) -> Vec<NamedDomain> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, ElementGroup> = HashMap::new();

    for domain in current.iter().chain(trusted) {
        let group = groups.entry(domain.name.clone()).or_insert_with(|| {
            order.push(domain.name.clone());
            ElementGroup::default()
        });
        for element in &domain.elements {
            group.upsert(element);
        }
    }

    order
        .into_iter()
        .map(|name| {
            let group = groups.remove(&name).unwrap_or_default();
            NamedDomain {
                name,
                elements: group.elements,
            }
        })
        .collect()
}

/// Elements of one domain group in first-insertion order
#[derive(Default)]
struct ElementGroup {
    elements: Vec<Element>,
    positions: HashMap<String, usize>,
}

impl ElementGroup {
    fn upsert(&mut self, element: &Element) {
        match self.positions.get(&element.name) {
            Some(&position) => self.elements[position] = element.clone(),
            None => {
                self.positions.insert(element.name.clone(), self.elements.len());
                self.elements.push(element.clone());
            }
        }
    }
}
