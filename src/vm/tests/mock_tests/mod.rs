// Mock tests can be placed anywhere in the source directory `src` or the test directory `tests`.
// * They need to be conditionally compiled for tests (or with the feature `mock_test`). Otherwise they cannot access `MockVM`.
// * They should have the prefix 'mock_test_' in their file name so they will be picked up by the CI testing scripts.
// * A closure installed in the MockVM runs with the MockVM locked, and must not call the binding.

// Common includes for mock tests.
pub(crate) mod mock_test_prelude {
    pub use crate::memory_manager;
    pub use crate::util::test_util::fixtures::*;
    pub use crate::util::test_util::mock_method::*;
    pub use crate::util::test_util::mock_vm::*;
    pub use crate::vm::*;
}

mod mock_test_alloc_array;
mod mock_test_alloc_large_object;
mod mock_test_alloc_prefetch_pipeline;
mod mock_test_hashcode;
mod mock_test_write_barrier;
