/// PROPERTY-BASED TESTS: host handle to id mapping
///
/// Key invariants:
/// 1. A handle keeps its id while it is queried every cycle
/// 2. Ids are never handed out twice, even after a handle is forgotten
/// 3. The null handle never gets an id

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use scenesync_shared::{HostHandle, IdRegistry, INVALID_ID};

fn handle_strategy() -> impl Strategy<Value = HostHandle> {
    (0u64..64u64).prop_map(HostHandle)
}

proptest! {
    #[test]
    fn prop_ids_are_stable_within_a_cycle(handles in prop::collection::vec(handle_strategy(), 1..100)) {
        let mut registry = IdRegistry::new();
        let mut seen: HashMap<HostHandle, i32> = HashMap::new();

        for handle in handles {
            let id = registry.get_id(&handle);
            if handle.0 == 0 {
                prop_assert_eq!(id, INVALID_ID);
                continue;
            }
            prop_assert!(id >= 0);
            if let Some(previous) = seen.insert(handle, id) {
                prop_assert_eq!(previous, id);
            }
        }

        let distinct: HashSet<i32> = seen.values().copied().collect();
        prop_assert_eq!(distinct.len(), seen.len());
    }

    #[test]
    fn prop_ids_are_never_reused(
        cycles in prop::collection::vec(prop::collection::vec(handle_strategy(), 0..20), 1..8)
    ) {
        let mut registry = IdRegistry::new();
        let mut issued: HashSet<i32> = HashSet::new();
        let mut live: HashMap<HostHandle, i32> = HashMap::new();

        for cycle in cycles {
            for handle in &cycle {
                if handle.0 == 0 {
                    continue;
                }
                let id = registry.get_id(handle);
                match live.get(handle) {
                    Some(known) => prop_assert_eq!(*known, id),
                    None => {
                        prop_assert!(issued.insert(id), "id {} handed out twice", id);
                        live.insert(*handle, id);
                    }
                }
            }

            registry.erase_stale_records();
            live.retain(|handle, _| cycle.contains(handle));
            prop_assert_eq!(registry.len(), live.len());
        }
    }
}

#[test]
fn peek_does_not_keep_a_handle_alive() {
    let mut registry = IdRegistry::new();
    let id = registry.get_id(&HostHandle(3));
    registry.erase_stale_records();

    assert_eq!(registry.peek_id(&HostHandle(3)), id);
    registry.erase_stale_records();
    assert!(!registry.contains(&HostHandle(3)));
    assert_eq!(registry.peek_id(&HostHandle(3)), INVALID_ID);
}
