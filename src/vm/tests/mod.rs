// All the tests with prefix 'mock_test_' use MockVM. They run one at a time through `with_mockvm`,
// and each creates its own `MutatorFixture` so the binding closures see a fresh heap.
mod mock_tests;
