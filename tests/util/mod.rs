//! Test automation.

use std::sync::{Arc, Mutex};
use std::thread;

/// "Multiply" a closure, by running it in multiple threads at the same time.
///
/// The closure gets the index of its thread. Every thread is joined, thread destructors
/// included, before this returns.
#[allow(dead_code)]
pub fn multiply<F: Fn(usize) + Sync>(threads: usize, func: F) {
    thread::scope(|scope| {
        let func = &func;

        // The implicit join of the scope does not wait for thread-local destructors, an explicit
        // one does.
        let handles: Vec<_> = (0..threads).map(|n| scope.spawn(move || func(n))).collect();

        for handle in handles {
            handle.join().unwrap();
        }
    });
}

/// A log of destructor runs.
#[derive(Clone, Default)]
pub struct Recorder {
    log: Arc<Mutex<Vec<usize>>>,
}

/// The context of a recording destructor.
struct Mark {
    log: Arc<Mutex<Vec<usize>>>,
    id: usize,
}

impl Recorder {
    /// Create an empty log.
    pub fn new() -> Recorder {
        Recorder::default()
    }

    /// Register a destructor on the current thread, recording `id` when it runs.
    pub fn register(&self, id: usize) {
        let mark = Box::new(Mark {
            log: self.log.clone(),
            id,
        });

        unsafe { rtport::register(record, Box::into_raw(mark) as *mut u8) }
    }

    /// The recorded ids, in the order their destructors ran.
    pub fn runs(&self) -> Vec<usize> {
        self.log.lock().unwrap().clone()
    }
}

/// Record a destructor run, and release its context.
unsafe extern "C" fn record(arg: *mut u8) {
    let mark = Box::from_raw(arg as *mut Mark);
    mark.log.lock().unwrap().push(mark.id);
}
