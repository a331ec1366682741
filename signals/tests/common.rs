use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[allow(unused)]
pub fn init_tracing() { let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::TRACE).try_init(); }

/// Returns an accumulator and a function that drains what was accumulated so far
#[allow(unused)]
pub fn watcher<T: 'static>() -> (Rc<dyn Fn(T)>, Box<dyn Fn() -> Vec<T>>) {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let watcher = {
        let changes = changes.clone();
        Rc::new(move |value: T| {
            changes.borrow_mut().push(value);
        })
    };

    let check = Box::new(move || {
        let changes: Vec<T> = changes.borrow_mut().drain(..).collect();
        changes
    });

    (watcher, check)
}

#[allow(unused)]
pub fn free_function(arg: &Cell<i32>) { arg.set(arg.get() + 1); }

#[allow(unused)]
pub struct StructStatic;

#[allow(unused)]
impl StructStatic {
    pub fn static_slot(arg: &Cell<i32>) { arg.set(arg.get() + 1); }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestStruct {
    pub foo: i32,
}

impl TestStruct {
    #[allow(unused)]
    pub fn new(foo: i32) -> Self { Self { foo } }
}

/// Records every call made to it, by method name and arguments
#[derive(Default)]
pub struct Mock {
    calls: RefCell<Vec<String>>,
}

#[allow(unused)]
impl Mock {
    fn record(&self, call: String) { self.calls.borrow_mut().push(call); }

    /// Drains the recorded calls
    pub fn calls(&self) -> Vec<String> { self.calls.borrow_mut().drain(..).collect() }

    pub fn times(&self, method: &str) -> usize {
        self.calls.borrow().iter().filter(|call| call.split('(').next() == Some(method)).count()
    }

    pub fn slot_no_arg(&self) { self.record("slot_no_arg()".to_string()) }
    pub fn slot_int(&self, arg: i32) { self.record(format!("slot_int({arg})")) }
    pub fn slot_int_ptr(&self, arg: *mut i32) { self.record(format!("slot_int_ptr({arg:p})")) }
    pub fn slot_const_int_ptr(&self, arg: *const i32) { self.record(format!("slot_const_int_ptr({arg:p})")) }
    pub fn slot_int_ref(&self, arg: &Cell<i32>) { self.record(format!("slot_int_ref({:p})", arg)) }
    pub fn slot_const_int_ref(&self, arg: &i32) { self.record(format!("slot_const_int_ref({:p})", arg)) }

    pub fn slot_struct(&self, arg: TestStruct) { self.record(format!("slot_struct({})", arg.foo)) }
    pub fn slot_struct_ptr(&self, arg: *mut TestStruct) { self.record(format!("slot_struct_ptr({arg:p})")) }
    pub fn slot_const_struct_ptr(&self, arg: *const TestStruct) { self.record(format!("slot_const_struct_ptr({arg:p})")) }
    pub fn slot_struct_ref(&self, arg: &RefCell<TestStruct>) { self.record(format!("slot_struct_ref({:p})", arg)) }
    pub fn slot_const_struct_ref(&self, arg: &TestStruct) { self.record(format!("slot_const_struct_ref({:p})", arg)) }

    pub fn slot_int_struct(&self, arg1: i32, arg2: TestStruct) { self.record(format!("slot_int_struct({arg1}, {})", arg2.foo)) }
}
