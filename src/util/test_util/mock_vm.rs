//! A binding whose every method is a [`MockMethod`], so tests can script the runtime.
//!
//! The binding methods run while the MockVM lock is held. A closure installed here must not call
//! back into `MockVM` methods, directly or through the fast paths.

use crate::plan::barriers::plain_store;
use crate::util::constants::BYTES_IN_INT;
use crate::util::metadata::header_metadata::ARRAY_LENGTH_OFFSET;
use crate::util::{Address, AllocationHandle, ClassHandle, ObjectReference, VMMutatorThread};
use crate::vm::VMBinding;

use super::mock_method::*;

use lazy_static::lazy_static;
use std::default::Default;
use std::sync::Mutex;

lazy_static! {
    // The mutex may get poisoned any time. Accessing this mutex needs to deal with the poisoned case.
    // One can use read/write_mockvm to access mock vm.
    static ref MOCK_VM_INSTANCE: Mutex<MockVM> = Mutex::new(MockVM::default());
    // Classes are never unregistered, so handles stay valid across tests.
    static ref MOCK_CLASSES: Mutex<Vec<MockClass>> = Mutex::new(vec![]);
}

macro_rules! mock {
    ($fn: ident($($arg:expr),*)) => {
        write_mockvm(|mock| mock.$fn.call(($($arg),*)))
    };
}

pub fn read_mockvm<F, R>(func: F) -> R
where
    F: FnOnce(&MockVM) -> R,
{
    let lock = MOCK_VM_INSTANCE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    func(&lock)
}

pub fn write_mockvm<F, R>(func: F) -> R
where
    F: FnOnce(&mut MockVM) -> R,
{
    let mut lock = MOCK_VM_INSTANCE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    func(&mut lock)
}

pub fn with_mockvm<S, T, C>(setup: S, test: T, cleanup: C)
where
    S: FnOnce() -> MockVM,
    T: FnOnce() + std::panic::UnwindSafe,
    C: FnOnce(),
{
    super::serial_test(|| {
        // Setup
        {
            write_mockvm(|mock| *mock = setup());
        }
        super::with_cleanup(test, cleanup);
    })
}

pub fn default_setup() -> MockVM {
    MockVM::default()
}

pub fn no_cleanup() {}

/// The first element of a mock array follows the length field.
pub const MOCK_ARRAY_FIRST_ELEMENT_OFFSET: usize = ARRAY_LENGTH_OFFSET + BYTES_IN_INT;

/// A class as the mock class subsystem knows it.
#[derive(Copy, Clone, Debug, Default)]
pub struct MockClass {
    pub instance_size: usize,
    pub is_array: bool,
    pub element_size: usize,
    pub first_element_offset: usize,
    pub array_class: Option<ClassHandle>,
    pub is_interface: bool,
    pub is_final: bool,
    pub depth: usize,
}

impl MockClass {
    pub fn scalar(instance_size: usize) -> Self {
        MockClass {
            instance_size,
            depth: 1,
            ..Default::default()
        }
    }

    pub fn array(element_size: usize) -> Self {
        MockClass {
            is_array: true,
            element_size,
            first_element_offset: MOCK_ARRAY_FIRST_ELEMENT_OFFSET,
            is_final: true,
            depth: 1,
            ..Default::default()
        }
    }
}

fn class_index(class: ClassHandle) -> usize {
    (class.as_usize() >> 4) - 1
}

/// Register a class and return its handle.
pub fn register_class(class: MockClass) -> ClassHandle {
    let mut classes = MOCK_CLASSES
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    classes.push(class);
    ClassHandle::from_usize(classes.len() << 4)
}

/// Register the array class with elements of class `element`.
pub fn register_array_class(element: ClassHandle, element_size: usize) -> ClassHandle {
    let array = register_class(MockClass::array(element_size));
    let mut classes = MOCK_CLASSES
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    classes[class_index(element)].array_class = Some(array);
    array
}

pub fn mock_class(class: ClassHandle) -> MockClass {
    let classes = MOCK_CLASSES
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    classes[class_index(class)]
}

/// Allocation handles are the class handles themselves.
pub fn mock_allocation_handle(class: ClassHandle) -> AllocationHandle {
    AllocationHandle::from_usize(class.as_usize())
}

pub struct MockVM {
    // active plan
    pub tls_base: MockMethod<VMMutatorThread, Address>,
    pub tls_gc_offset: MockMethod<(), usize>,
    // collection
    pub alloc_slow: MockMethod<(VMMutatorThread, usize, AllocationHandle), Address>,
    pub alloc_vector_slow: MockMethod<(VMMutatorThread, i32, AllocationHandle), Address>,
    pub write_barrier_slow:
        MockMethod<(VMMutatorThread, ObjectReference, Address, ObjectReference), ()>,
    pub nos_boundary: MockMethod<(), Address>,
    // object model
    pub allocation_handle: MockMethod<ClassHandle, AllocationHandle>,
    pub class_of: MockMethod<AllocationHandle, ClassHandle>,
    pub instance_size: MockMethod<ClassHandle, usize>,
    pub array_class: MockMethod<ClassHandle, ClassHandle>,
    pub array_element_size: MockMethod<ClassHandle, usize>,
    pub array_first_element_offset: MockMethod<ClassHandle, usize>,
    pub is_array: MockMethod<ClassHandle, bool>,
    pub is_interface: MockMethod<ClassHandle, bool>,
    pub is_final: MockMethod<ClassHandle, bool>,
    pub fast_type_check_depth: MockMethod<ClassHandle, usize>,
}

impl Default for MockVM {
    fn default() -> Self {
        Self {
            tls_base: MockMethod::new_unimplemented(),
            tls_gc_offset: MockMethod::new_default(),

            alloc_slow: MockMethod::new_unimplemented(),
            alloc_vector_slow: MockMethod::new_default(),
            write_barrier_slow: MockMethod::new_fixed(Box::new(|(_, _, slot, target)| {
                plain_store(slot, target)
            })),
            // Nothing is young.
            nos_boundary: MockMethod::new_fixed(Box::new(|_| Address::MAX)),

            allocation_handle: MockMethod::new_fixed(Box::new(mock_allocation_handle)),
            class_of: MockMethod::new_fixed(Box::new(|handle| {
                ClassHandle::from_usize(handle.as_usize())
            })),
            instance_size: MockMethod::new_fixed(Box::new(|c| mock_class(c).instance_size)),
            array_class: MockMethod::new_fixed(Box::new(|c| {
                mock_class(c)
                    .array_class
                    .unwrap_or_else(|| panic!("No array class registered for {:?}", c))
            })),
            array_element_size: MockMethod::new_fixed(Box::new(|c| mock_class(c).element_size)),
            array_first_element_offset: MockMethod::new_fixed(Box::new(|c| {
                mock_class(c).first_element_offset
            })),
            is_array: MockMethod::new_fixed(Box::new(|c| mock_class(c).is_array)),
            is_interface: MockMethod::new_fixed(Box::new(|c| mock_class(c).is_interface)),
            is_final: MockMethod::new_fixed(Box::new(|c| mock_class(c).is_final)),
            fast_type_check_depth: MockMethod::new_fixed(Box::new(|c| mock_class(c).depth)),
        }
    }
}

unsafe impl Sync for MockVM {}
unsafe impl Send for MockVM {}

impl VMBinding for MockVM {
    type VMActivePlan = MockVM;
    type VMCollection = MockVM;
    type VMObjectModel = MockVM;
}

impl crate::vm::ActivePlan<MockVM> for MockVM {
    fn tls_base(tls: VMMutatorThread) -> Address {
        mock!(tls_base(tls))
    }

    fn tls_gc_offset() -> usize {
        mock!(tls_gc_offset())
    }
}

impl crate::vm::Collection<MockVM> for MockVM {
    fn alloc_slow(tls: VMMutatorThread, size: usize, handle: AllocationHandle) -> Address {
        mock!(alloc_slow(tls, size, handle))
    }

    fn alloc_vector_slow(tls: VMMutatorThread, length: i32, handle: AllocationHandle) -> Address {
        mock!(alloc_vector_slow(tls, length, handle))
    }

    fn write_barrier_slow(
        tls: VMMutatorThread,
        src: ObjectReference,
        slot: Address,
        target: ObjectReference,
    ) {
        mock!(write_barrier_slow(tls, src, slot, target))
    }

    fn nos_boundary() -> Address {
        mock!(nos_boundary())
    }
}

impl crate::vm::ObjectModel<MockVM> for MockVM {
    fn allocation_handle(class: ClassHandle) -> AllocationHandle {
        mock!(allocation_handle(class))
    }

    fn class_of(handle: AllocationHandle) -> ClassHandle {
        mock!(class_of(handle))
    }

    fn instance_size(class: ClassHandle) -> usize {
        mock!(instance_size(class))
    }

    fn array_class(element: ClassHandle) -> ClassHandle {
        mock!(array_class(element))
    }

    fn array_element_size(class: ClassHandle) -> usize {
        mock!(array_element_size(class))
    }

    fn array_first_element_offset(class: ClassHandle) -> usize {
        mock!(array_first_element_offset(class))
    }

    fn is_array(class: ClassHandle) -> bool {
        mock!(is_array(class))
    }

    fn is_interface(class: ClassHandle) -> bool {
        mock!(is_interface(class))
    }

    fn is_final(class: ClassHandle) -> bool {
        mock!(is_final(class))
    }

    fn fast_type_check_depth(class: ClassHandle) -> usize {
        mock!(fast_type_check_depth(class))
    }
}
