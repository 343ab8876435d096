use super::mock_test_prelude::*;
use crate::util::metadata::hashcode::{address_hashcode, HashcodeState};
use crate::util::metadata::header_metadata::{load_info, store_info};
use crate::util::metadata::log_bit;
use crate::util::ObjectReference;

use std::sync::atomic::Ordering;

fn new_object(fixture: &MutatorFixture) -> ObjectReference {
    let class = register_class(MockClass::scalar(24));
    ObjectReference::from_raw_address(memory_manager::alloc_instance(
        fixture.helper(),
        fixture.tls(),
        class,
    ))
}

#[test]
pub fn hashcode_is_stable() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create();
            let object = new_object(&fixture);
            let other = new_object(&fixture);
            assert_eq!(memory_manager::hashcode_state(object), HashcodeState::Unset);

            let hash = memory_manager::identity_hashcode(fixture.helper(), object);
            assert_eq!(
                memory_manager::hashcode_state(object),
                HashcodeState::SetUnallocated
            );
            assert_eq!(
                hash,
                address_hashcode(
                    object.to_raw_address(),
                    fixture.config().log_object_alignment
                )
            );
            for _ in 0..10 {
                assert_eq!(
                    memory_manager::identity_hashcode(fixture.helper(), object),
                    hash
                );
            }
            // Neighbours hash differently.
            assert_ne!(
                memory_manager::identity_hashcode(fixture.helper(), other),
                hash
            );
            assert_eq!(
                memory_manager::identity_hashcode(fixture.helper(), ObjectReference::NULL),
                0
            );
        },
        no_cleanup,
    )
}

#[test]
pub fn hashcode_keeps_other_header_bits() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create();
            let object = new_object(&fixture);
            store_info(object, 0x1234_0003);
            assert!(log_bit::attempt_remember(object));

            memory_manager::identity_hashcode(fixture.helper(), object);
            let info = load_info(object, Ordering::SeqCst);
            assert_eq!(info, 0x1234_0003 | log_bit::OBJ_REM_BIT | 0x04);
            assert!(log_bit::is_remembered(object));
        },
        no_cleanup,
    )
}

#[test]
pub fn concurrent_first_hashcode_agrees() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create();
            let objects: Vec<ObjectReference> = (0..64).map(|_| new_object(&fixture)).collect();
            let helper = fixture.helper();

            let results: Vec<Vec<i32>> = std::thread::scope(|s| {
                let handles: Vec<_> = (0..8)
                    .map(|t| {
                        let objects = &objects;
                        s.spawn(move || {
                            // Each thread also flips remembered bits, racing the hashcode CAS.
                            objects
                                .iter()
                                .enumerate()
                                .map(|(i, o)| {
                                    if i % 8 == t {
                                        log_bit::attempt_remember(*o);
                                    }
                                    memory_manager::identity_hashcode(helper, *o)
                                })
                                .collect::<Vec<i32>>()
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            for per_thread in results.iter() {
                assert_eq!(per_thread, &results[0]);
            }
            for (object, hash) in objects.iter().zip(results[0].iter()) {
                assert_eq!(
                    memory_manager::hashcode_state(*object),
                    HashcodeState::SetUnallocated
                );
                assert!(log_bit::is_remembered(*object));
                assert_eq!(memory_manager::identity_hashcode(helper, *object), *hash);
            }
        },
        no_cleanup,
    )
}
