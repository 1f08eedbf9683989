//! Failure injection for the in-memory backends
//!
//! A [`MockBehaviour`] is shared (behind an `Arc<Mutex<_>>`) with a [`MemoryStore`](crate::MemoryStore) or a [`MemoryAuth`](crate::MemoryAuth).
//! Every call these backends receive is first checked against it, and may be refused.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Every backend call that can be made to fail
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    // TaskStore
    CreateTask,
    ListTasks,
    UpdateFields,
    DeleteTask,
    // AuthBackend
    SignIn,
    SignUp,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::CreateTask, Operation::ListTasks, Operation::UpdateFields, Operation::DeleteTask,
        Operation::SignIn, Operation::SignUp,
    ];
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::CreateTask => "create_task",
            Operation::ListTasks => "list_tasks",
            Operation::UpdateFields => "update_fields",
            Operation::DeleteTask => "delete_task",
            Operation::SignIn => "sign_in",
            Operation::SignUp => "sign_up",
        };
        write!(f, "{}", name)
    }
}

/// What is left to happen to an operation: some successes, then some failures, then successes forever
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Plan {
    successes: u32,
    failures: u32,
}

/// Per-operation failure plans. Operations without a plan always succeed
#[derive(Clone, Debug, Default)]
pub struct MockBehaviour {
    is_suspended: bool,
    plans: HashMap<Operation, Plan>,
}

impl MockBehaviour {
    /// Nothing fails
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails `n_fails` times from now on
    pub fn fail_now(n_fails: u32) -> Self {
        let mut behaviour = Self::new();
        for op in Operation::ALL.iter() {
            behaviour.plan(*op, 0, n_fails);
        }
        behaviour
    }

    /// Only `op` fails, `failures` times, after `successes` calls went through
    pub fn failing(op: Operation, successes: u32, failures: u32) -> Self {
        let mut behaviour = Self::new();
        behaviour.plan(op, successes, failures);
        behaviour
    }

    /// Replace the plan of `op`
    pub fn plan(&mut self, op: Operation, successes: u32, failures: u32) -> &mut Self {
        self.plans.insert(op, Plan { successes, failures });
        self
    }

    /// Let every call through until [`Self::resume`] is called. Plans are left untouched meanwhile
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    /// Consume one step of the plan of `op`, and tell whether this call should go through
    pub fn check(&mut self, op: Operation) -> Result<(), Box<dyn Error>> {
        if self.is_suspended {
            return Ok(());
        }
        let plan = match self.plans.get_mut(&op) {
            None => return Ok(()),
            Some(plan) => plan,
        };

        if plan.successes > 0 {
            plan.successes -= 1;
            Ok(())
        } else if plan.failures > 0 {
            plan.failures -= 1;
            log::debug!("Mock behaviour: failing {} ({} more failures planned)", op, plan.failures);
            Err(format!("Mocked failure of {}", op).into())
        } else {
            Ok(())
        }
    }
}
