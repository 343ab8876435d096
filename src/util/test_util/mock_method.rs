//! A stand-in for one binding method: a closure (or a rotation of closures) plus a call counter.

pub type MockClosureSignature<I, R> = Box<dyn Fn(I) -> R + Send + Sync>;

pub struct MockMethod<I, R> {
    /// Called in turn. A fixed method has exactly one.
    closures: Vec<MockClosureSignature<I, R>>,
    call_count: usize,
}

impl<I, R> Default for MockMethod<I, R> {
    fn default() -> Self {
        Self::new_unimplemented()
    }
}

impl<I, R> MockMethod<I, R> {
    pub fn new_unimplemented() -> Self {
        Self::new_fixed(Box::new(|_| unimplemented!()))
    }

    pub fn new_default() -> Self
    where
        R: Default,
    {
        Self::new_fixed(Box::new(|_| R::default()))
    }

    pub fn new_fixed(closure: MockClosureSignature<I, R>) -> Self {
        Self::new_sequence(vec![closure])
    }

    /// The n-th call goes to closure `n % closures.len()`.
    pub fn new_sequence(closures: Vec<MockClosureSignature<I, R>>) -> Self {
        assert!(!closures.is_empty());
        Self {
            closures,
            call_count: 0,
        }
    }

    pub fn call(&mut self, args: I) -> R {
        let index = self.call_count % self.closures.len();
        self.call_count += 1;
        (self.closures[index])(args)
    }

    pub fn is_called(&self) -> bool {
        self.call_count > 0
    }

    pub fn call_count(&self) -> usize {
        self.call_count
    }
}
