use super::mock_test_prelude::*;
use crate::util::metadata::header_metadata;
use crate::util::Address;

#[test]
pub fn alloc_large_object_bypasses_tla() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create();
            let threshold = fixture.config().large_object_threshold;
            let small = mock_allocation_handle(register_class(MockClass::scalar(32)));
            let large_class = register_class(MockClass::scalar(threshold + 8));

            let first = memory_manager::alloc(fixture.helper(), fixture.tls(), 32, small);
            let free = fixture.tla().free();
            let ceiling = fixture.tla().ceiling();

            let large = memory_manager::alloc_instance(fixture.helper(), fixture.tls(), large_class);
            assert!(!large.is_zero());
            assert!(fixture.mature.contains(large));
            assert!(large < fixture.nos_boundary());
            assert_eq!(
                header_metadata::load_allocation_handle(large),
                mock_allocation_handle(large_class)
            );
            // The TLA is left as it was.
            assert_eq!(fixture.tla().free(), free);
            assert_eq!(fixture.tla().ceiling(), ceiling);

            let next = memory_manager::alloc(fixture.helper(), fixture.tls(), 32, small);
            assert_eq!(next, first + 32usize);
            assert_eq!(read_mockvm(|mock| mock.alloc_slow.call_count()), 2);
        },
        no_cleanup,
    )
}

#[test]
pub fn alloc_at_threshold_uses_tla() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create();
            let threshold = fixture.config().large_object_threshold;
            let handle = mock_allocation_handle(register_class(MockClass::scalar(threshold)));

            let addr = memory_manager::alloc(fixture.helper(), fixture.tls(), threshold, handle);
            assert!(fixture.nursery.contains(addr));
            assert_eq!(fixture.tla().free(), addr + threshold);
        },
        no_cleanup,
    )
}

#[test]
pub fn alloc_large_object_sees_requested_size() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create();
            let size = 3 * fixture.config().large_object_threshold;
            let handle = mock_allocation_handle(register_class(MockClass::scalar(size)));
            write_mockvm(|mock| {
                mock.alloc_slow = MockMethod::new_fixed(Box::new(move |(_, requested, h)| {
                    assert_eq!(requested, size);
                    assert_eq!(h, handle);
                    Address::ZERO
                }));
            });
            let addr = memory_manager::alloc(fixture.helper(), fixture.tls(), size, handle);
            assert!(addr.is_zero());
            assert!(read_mockvm(|mock| mock.alloc_slow.is_called()));
        },
        no_cleanup,
    )
}
