#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use joyframe::{JoystickState, RawStateSource, SourceError};

pub type Reads = Rc<RefCell<VecDeque<Result<JoystickState, SourceError>>>>;

/// Joystick source fed from a queue the test keeps a handle to.
pub struct Scripted {
    name: String,
    reads: Reads,
    pub acquires: Rc<RefCell<usize>>,
}

impl Scripted {
    pub fn new(name: &str) -> (Self, Reads) {
        let reads: Reads = Rc::default();
        let src = Self {
            name: name.to_string(),
            reads: Rc::clone(&reads),
            acquires: Rc::default(),
        };
        (src, reads)
    }
}

impl RawStateSource for Scripted {
    type State = JoystickState;

    fn product_name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, into: &mut JoystickState) -> Result<(), SourceError> {
        match self.reads.borrow_mut().pop_front() {
            Some(Ok(s)) => {
                *into = s;
                Ok(())
            }
            Some(Err(e)) => Err(e),
            None => Err(SourceError::Unplugged),
        }
    }

    fn acquire(&mut self) -> Result<(), SourceError> {
        *self.acquires.borrow_mut() += 1;
        Ok(())
    }
}

pub fn js(buttons: u32, x: i32, y: i32, z: i32) -> JoystickState {
    JoystickState { buttons, x, y, z }
}

pub fn push(reads: &Reads, state: JoystickState) {
    reads.borrow_mut().push_back(Ok(state));
}

pub fn push_err(reads: &Reads, e: SourceError) {
    reads.borrow_mut().push_back(Err(e));
}
