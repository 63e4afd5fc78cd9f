// Shared fixtures for the ECS unit tests.

use crate::ecs::{Component, Context};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared record of hook invocations.
#[derive(Clone, Default)]
pub(crate) struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Position {
    pub x: f32,
    pub y: f32,
}

impl Component for Position {}

/// Moves the sibling `Position` every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Component for Velocity {
    fn update(&mut self, ctx: &mut Context<'_>, dt: f32) {
        let pos = ctx.get_mut::<Position>();
        pos.x += self.x * dt;
        pos.y += self.y * dt;
    }
}

macro_rules! recorder {
    ($name:ident, $label:literal) => {
        pub(crate) struct $name {
            pub label: &'static str,
            log: Log,
        }

        impl $name {
            pub fn new(log: &Log) -> Self {
                Self {
                    label: $label,
                    log: log.clone(),
                }
            }
        }

        impl Component for $name {
            fn init(&mut self, _ctx: &mut Context<'_>) {
                self.log.push(format!("init:{}", self.label));
            }

            fn update(&mut self, _ctx: &mut Context<'_>, _dt: f32) {
                self.log.push(format!("update:{}", self.label));
            }

            fn draw(&mut self, _ctx: &mut Context<'_>) {
                self.log.push(format!("draw:{}", self.label));
            }
        }
    };
}

recorder!(First, "first");
recorder!(Second, "second");
