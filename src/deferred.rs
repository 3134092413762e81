use std::cell::RefCell;
use std::rc::Rc;

use crate::cursor::Cursor;
use crate::parser::Parser;

type Thunk<T> = Rc<dyn Fn() -> Parser<T>>;

/// A two-phase cell for self-referential grammars.
///
/// Create the handle first, build the grammar against `parser()`, then call
/// `implement` with a thunk producing the finished parser. The parser
/// returned by `parser()` dereferences the cell on every invocation, which
/// is what breaks the otherwise-infinite construction cycle of a rule that
/// contains itself.
///
/// The cell is expected to be written exactly once, before the grammar is
/// first invoked, by single-threaded setup code.
pub struct DeferredParser<T> {
    implementation: Rc<RefCell<Option<Thunk<T>>>>,
}

impl<T> Clone for DeferredParser<T> {
    fn clone(&self) -> Self {
        DeferredParser {
            implementation: Rc::clone(&self.implementation),
        }
    }
}

impl<T: Clone + Default + 'static> DeferredParser<T> {
    pub fn new() -> Self {
        DeferredParser {
            implementation: Rc::new(RefCell::new(None)),
        }
    }

    /// The indirection parser. Each invocation resolves the thunk assigned
    /// by `implement` and runs the parser it produces.
    ///
    /// Until `implement` has been called this succeeds with `T::default()`
    /// and consumes no input. That silently masks missing grammar wiring;
    /// it is kept as the documented fallback rather than made a failure.
    pub fn parser(&self) -> Parser<T> {
        let cell = Rc::clone(&self.implementation);
        Parser::new(move |input: Cursor<'_>| {
            let parser = match cell.borrow().as_ref() {
                Some(thunk) => thunk(),
                None => Parser::ret(T::default()),
            };
            parser.parse(input)
        })
    }

    pub fn implement(&self, thunk: impl Fn() -> Parser<T> + 'static) {
        *self.implementation.borrow_mut() = Some(Rc::new(thunk));
    }
}

impl<T: Clone + Default + 'static> Default for DeferredParser<T> {
    fn default() -> Self {
        Self::new()
    }
}
