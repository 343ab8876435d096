use super::mock_test_prelude::*;
use crate::util::alloc::array::array_size;
use crate::util::metadata::header_metadata;
use crate::util::{Address, ObjectReference};

#[test]
pub fn alloc_int_array() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create();
            let int = register_class(MockClass::scalar(16));
            let int_array = register_array_class(int, 4);
            let align = fixture.config().object_alignment;

            let addr = memory_manager::alloc_array(fixture.helper(), fixture.tls(), int, 10);
            assert!(fixture.nursery.contains(addr));
            let array = ObjectReference::from_raw_address(addr);
            assert_eq!(header_metadata::load_array_length(array), 10);
            assert_eq!(
                header_metadata::load_allocation_handle(addr),
                mock_allocation_handle(int_array)
            );
            let size = array_size(MOCK_ARRAY_FIRST_ELEMENT_OFFSET, 4, 10, align).unwrap();
            assert_eq!(header_metadata::object_size::<MockVM>(array), size);

            // An empty array is just the header.
            let empty = memory_manager::alloc_array(fixture.helper(), fixture.tls(), int, 0);
            assert_eq!(empty, addr + size);
            let empty = ObjectReference::from_raw_address(empty);
            assert_eq!(header_metadata::load_array_length(empty), 0);
            assert_eq!(
                header_metadata::object_size::<MockVM>(empty),
                array_size(MOCK_ARRAY_FIRST_ELEMENT_OFFSET, 4, 0, align).unwrap()
            );
            assert!(!read_mockvm(|mock| mock.alloc_vector_slow.is_called()));
        },
        no_cleanup,
    )
}

#[test]
pub fn alloc_large_array_has_length() {
    with_mockvm(
        default_setup,
        || {
            let fixture = MutatorFixture::create();
            let long = register_class(MockClass::scalar(16));
            register_array_class(long, 8);
            let length = (fixture.config().large_object_threshold / 8) as i32 + 1;

            let addr = memory_manager::alloc_array(fixture.helper(), fixture.tls(), long, length);
            assert!(fixture.mature.contains(addr));
            let array = ObjectReference::from_raw_address(addr);
            assert_eq!(header_metadata::load_array_length(array), length);
            assert!(fixture.tla().free().is_zero());
        },
        no_cleanup,
    )
}

#[test]
pub fn alloc_negative_length_array() {
    with_mockvm(
        || -> MockVM {
            MockVM {
                alloc_vector_slow: MockMethod::new_fixed(Box::new(|(_, length, _)| {
                    assert_eq!(length, -1);
                    Address::ZERO
                })),
                ..MockVM::default()
            }
        },
        || {
            let fixture = MutatorFixture::create();
            let byte = register_class(MockClass::scalar(16));
            register_array_class(byte, 1);

            let addr = memory_manager::alloc_array(fixture.helper(), fixture.tls(), byte, -1);
            assert!(addr.is_zero());
            assert_eq!(read_mockvm(|mock| mock.alloc_vector_slow.call_count()), 1);
            assert!(!read_mockvm(|mock| mock.alloc_slow.is_called()));
        },
        no_cleanup,
    )
}

#[test]
pub fn alloc_overflowing_array() {
    with_mockvm(
        || -> MockVM {
            MockVM {
                alloc_vector_slow: MockMethod::new_fixed(Box::new(|(_, length, _)| {
                    assert_eq!(length, i32::MAX);
                    Address::ZERO
                })),
                ..MockVM::default()
            }
        },
        || {
            let fixture = MutatorFixture::create();
            let element = register_class(MockClass::scalar(16));
            // No size for i32::MAX of these fits in a usize.
            let element_size = usize::MAX / (i32::MAX as usize) + 1;
            register_array_class(element, element_size);

            let addr =
                memory_manager::alloc_array(fixture.helper(), fixture.tls(), element, i32::MAX);
            assert!(addr.is_zero());
            assert_eq!(read_mockvm(|mock| mock.alloc_vector_slow.call_count()), 1);
            assert_eq!(read_mockvm(|mock| mock.array_class.call_count()), 1);
            assert!(!read_mockvm(|mock| mock.alloc_slow.is_called()));
        },
        no_cleanup,
    )
}
