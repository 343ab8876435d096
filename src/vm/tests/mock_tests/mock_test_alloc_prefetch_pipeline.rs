use super::mock_test_prelude::*;
use crate::util::constants::BYTES_IN_WORD;
use crate::util::test_util::all_bytes_are;

const GARBAGE: u8 = 0xab;

#[test]
pub fn alloc_zeroes_ahead_of_free() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create_with_options(&[
                ("prefetch", "true"),
                ("zeroing_size", "2048"),
            ]);
            let config = *fixture.config();
            let start = fixture.nursery.start();
            let end = start + config.tla_size;
            // The zeroing pipeline must not rely on fresh pages.
            unsafe { std::ptr::write_bytes(start.to_mut_ptr::<u8>(), GARBAGE, config.tla_size) };

            let handle = mock_allocation_handle(register_class(MockClass::scalar(64)));
            let first = memory_manager::alloc(fixture.helper(), fixture.tls(), 64, handle);
            assert_eq!(first, start);
            assert_eq!(fixture.tla().end(), end);
            assert_eq!(fixture.tla().free(), start + 64usize);
            assert_eq!(fixture.tla().ceiling(), start + 2048usize);
            assert!(all_bytes_are(first + BYTES_IN_WORD, start + 2048usize, 0));
            assert!(all_bytes_are(start + 2048usize, end, GARBAGE));

            // Fill the zeroed quantum exactly. None of these move the ceiling.
            for _ in 1..32 {
                memory_manager::alloc(fixture.helper(), fixture.tls(), 64, handle);
            }
            assert_eq!(fixture.tla().free(), start + 2048usize);
            assert_eq!(fixture.tla().ceiling(), start + 2048usize);

            let next = memory_manager::alloc(fixture.helper(), fixture.tls(), 64, handle);
            assert_eq!(next, start + 2048usize);
            assert_eq!(fixture.tla().ceiling(), start + 4096usize);
            assert!(all_bytes_are(next + BYTES_IN_WORD, start + 4096usize, 0));
            assert!(all_bytes_are(start + 4096usize, end, GARBAGE));

            // Only the first allocation went to the binding.
            assert_eq!(read_mockvm(|mock| mock.alloc_slow.call_count()), 1);
        },
        no_cleanup,
    )
}

#[test]
pub fn alloc_object_larger_than_zeroing_size() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create_with_options(&[
                ("prefetch", "true"),
                ("zeroing_size", "512"),
            ]);
            let config = *fixture.config();
            let start = fixture.nursery.start();
            unsafe { std::ptr::write_bytes(start.to_mut_ptr::<u8>(), GARBAGE, config.tla_size) };

            let size = 4096;
            let handle = mock_allocation_handle(register_class(MockClass::scalar(size)));
            let addr = memory_manager::alloc(fixture.helper(), fixture.tls(), size, handle);
            assert_eq!(addr, start);
            // The ceiling skips a quantum past the new free pointer.
            assert_eq!(fixture.tla().ceiling(), start + (size + 512));
            assert!(all_bytes_are(addr + BYTES_IN_WORD, fixture.tla().ceiling(), 0));
        },
        no_cleanup,
    )
}

#[test]
pub fn alloc_ceiling_clipped_to_end() {
    with_mockvm(
        default_setup,
        || {
            let fixture =
                MutatorFixture::create_with_options(&[("prefetch", "true"), ("tla_size", "4096")]);
            let start = fixture.nursery.start();
            let handle = mock_allocation_handle(register_class(MockClass::scalar(1024)));

            for i in 0..4 {
                let addr = memory_manager::alloc(fixture.helper(), fixture.tls(), 1024, handle);
                assert_eq!(addr, start + i * 1024);
                assert!(fixture.tla().ceiling() <= fixture.tla().end());
            }
            assert_eq!(fixture.tla().ceiling(), fixture.tla().end());
            assert_eq!(read_mockvm(|mock| mock.alloc_slow.call_count()), 1);

            // The TLA is full. The next object starts a new one.
            let addr = memory_manager::alloc(fixture.helper(), fixture.tls(), 1024, handle);
            assert_eq!(addr, start + 4096usize);
            assert_eq!(read_mockvm(|mock| mock.alloc_slow.call_count()), 2);
        },
        no_cleanup,
    )
}
