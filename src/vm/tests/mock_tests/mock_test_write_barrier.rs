use super::mock_test_prelude::*;
use crate::plan::barriers::{Barrier, BarrierSelector};
use crate::util::constants::BYTES_IN_WORD;
use crate::util::metadata::log_bit;
use crate::util::{Address, ObjectReference};

const OBJECT_SIZE: usize = 4 * BYTES_IN_WORD;
/// The reference field of the test objects.
const FIELD_OFFSET: usize = 2 * BYTES_IN_WORD;

fn new_old_object(fixture: &MutatorFixture) -> ObjectReference {
    let handle = mock_allocation_handle(register_class(MockClass::scalar(OBJECT_SIZE)));
    let addr = fixture.mature.alloc(OBJECT_SIZE, handle);
    assert!(addr < fixture.nos_boundary());
    ObjectReference::from_raw_address(addr)
}

fn new_young_object(fixture: &MutatorFixture) -> ObjectReference {
    let handle = mock_allocation_handle(register_class(MockClass::scalar(OBJECT_SIZE)));
    let addr = memory_manager::alloc(fixture.helper(), fixture.tls(), OBJECT_SIZE, handle);
    assert!(addr >= fixture.nos_boundary());
    ObjectReference::from_raw_address(addr)
}

fn field(object: ObjectReference) -> Address {
    object.to_raw_address() + FIELD_OFFSET
}

fn write(fixture: &MutatorFixture, src: ObjectReference, target: ObjectReference) {
    memory_manager::object_reference_write(fixture.helper(), fixture.tls(), src, field(src), target)
}

fn read(src: ObjectReference) -> ObjectReference {
    unsafe { field(src).load::<ObjectReference>() }
}

fn slow_calls() -> usize {
    read_mockvm(|mock| mock.write_barrier_slow.call_count())
}

#[test]
pub fn old_to_young_store_is_remembered_once() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create();
            assert_eq!(
                fixture.helper().barrier().selector(),
                BarrierSelector::GenRememberedSet
            );
            let old = new_old_object(&fixture);
            let young = new_young_object(&fixture);
            let young2 = new_young_object(&fixture);

            write(&fixture, old, young);
            assert_eq!(read(old), young);
            assert_eq!(slow_calls(), 1);
            assert!(log_bit::is_remembered(old));
            assert_eq!(fixture.helper().remembered_set().len(), 1);

            // Already remembered: a plain store.
            write(&fixture, old, young2);
            assert_eq!(read(old), young2);
            assert_eq!(slow_calls(), 1);

            // Once the collector has processed it, the next store records it again.
            let remembered = fixture.helper().remembered_set().drain();
            assert_eq!(remembered, vec![old]);
            fixture.helper().remembered_set().forget(old);
            write(&fixture, old, young);
            assert_eq!(slow_calls(), 2);
            assert_eq!(fixture.helper().remembered_set().len(), 1);
        },
        no_cleanup,
    )
}

#[test]
pub fn stores_that_need_no_record() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create();
            let old = new_old_object(&fixture);
            let old2 = new_old_object(&fixture);
            let young = new_young_object(&fixture);
            let young2 = new_young_object(&fixture);

            // Old to old.
            write(&fixture, old, old2);
            assert_eq!(read(old), old2);
            // Null.
            write(&fixture, old, ObjectReference::NULL);
            assert!(read(old).is_null());
            // Into a nursery object, whatever the target.
            write(&fixture, young, young2);
            assert_eq!(read(young), young2);
            write(&fixture, young, old);
            assert_eq!(read(young), old);

            assert_eq!(slow_calls(), 0);
            assert!(!log_bit::is_remembered(old));
            assert!(!log_bit::is_remembered(young));
            assert!(fixture.helper().remembered_set().is_empty());
        },
        no_cleanup,
    )
}

#[test]
pub fn non_generational_mode_never_records() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create_with_options(&[("gen_mode", "false")]);
            let old = new_old_object(&fixture);
            let young = new_young_object(&fixture);

            write(&fixture, old, young);
            assert_eq!(read(old), young);
            assert_eq!(slow_calls(), 0);
            assert!(!log_bit::is_remembered(old));
        },
        no_cleanup,
    )
}

#[test]
pub fn no_barrier_never_records() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create_with_options(&[("barrier", "NoBarrier")]);
            assert_eq!(
                fixture.helper().barrier().selector(),
                BarrierSelector::NoBarrier
            );
            let old = new_old_object(&fixture);
            let young = new_young_object(&fixture);

            write(&fixture, old, young);
            assert_eq!(read(old), young);
            assert_eq!(slow_calls(), 0);
        },
        no_cleanup,
    )
}

#[test]
pub fn concurrent_stores_remember_once() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create();
            let old = new_old_object(&fixture);
            let young = new_young_object(&fixture);
            let helper = fixture.helper();
            let tls = fixture.tls();

            std::thread::scope(|s| {
                for _ in 0..8 {
                    s.spawn(move || {
                        for _ in 0..100 {
                            memory_manager::object_reference_write(
                                helper,
                                tls,
                                old,
                                field(old),
                                young,
                            );
                        }
                    });
                }
            });

            // Racing threads may all reach the slow path, but only one queues the object.
            assert!(slow_calls() >= 1);
            assert_eq!(helper.remembered_set().len(), 1);
            assert_eq!(read(old), young);
        },
        no_cleanup,
    )
}
