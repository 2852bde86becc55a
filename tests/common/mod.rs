//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

use spark_fiber::{
    Engine, EngineConfig, FiberId, HostCall, HostError, HostId, HostRenderer, HostTree, NodeType,
    Props, SetState,
};

/// Engine over a fresh `HostTree` plus its container.
pub fn mount() -> (Engine<HostTree>, HostId) {
    mount_with(EngineConfig::default())
}

pub fn mount_with(config: EngineConfig) -> (Engine<HostTree>, HostId) {
    let mut host = HostTree::from_config(&config).expect("valid config");
    let container = host.create_container();
    let engine = Engine::with_config(host, config).expect("valid config");
    (engine, container)
}

/// Slot a component writes its setter into so the test can call it later.
pub type SetterSlot<T> = Rc<RefCell<Option<SetState<T>>>>;

pub fn setter_slot<T>() -> SetterSlot<T> {
    Rc::new(RefCell::new(None))
}

pub fn setter<T: 'static>(slot: &SetterSlot<T>) -> SetState<T> {
    slot.borrow().clone().expect("component has rendered")
}

/// Every non-root fiber of the committed tree, pre-order.
pub fn committed_fibers(engine: &Engine<HostTree>) -> Vec<FiberId> {
    let current = engine.current().expect("a committed tree");
    current
        .preorder(FiberId::ROOT)
        .into_iter()
        .filter(|&id| id != FiberId::ROOT)
        .collect()
}

/// Index of the first call matching `predicate`.
pub fn position(calls: &[HostCall], predicate: impl Fn(&HostCall) -> bool) -> Option<usize> {
    calls.iter().position(predicate)
}

/// Shared, ordered record of host calls and component side effects.
pub type Journal = Rc<RefCell<Vec<String>>>;

/// `HostTree` wrapper that journals every call and can be told to fail.
pub struct ScriptedHost {
    pub tree: HostTree,
    pub journal: Journal,
    /// Fail the next `attach`, once.
    pub fail_attach: Rc<Cell<bool>>,
    /// Fail the next `create_host_node`, once.
    pub fail_create: Rc<Cell<bool>>,
}

impl ScriptedHost {
    pub fn new(journal: Journal) -> Self {
        Self {
            tree: HostTree::new(),
            journal,
            fail_attach: Rc::new(Cell::new(false)),
            fail_create: Rc::new(Cell::new(false)),
        }
    }

    fn note(&self, entry: String) {
        self.journal.borrow_mut().push(entry);
    }
}

fn injected() -> HostError {
    HostError::Io(io::Error::other("injected host failure"))
}

impl HostRenderer for ScriptedHost {
    type Handle = HostId;

    fn create_host_node(&mut self, kind: &NodeType, props: &Props) -> Result<HostId, HostError> {
        if self.fail_create.replace(false) {
            return Err(injected());
        }
        let id = self.tree.create_host_node(kind, props)?;
        self.note(format!("create {id}"));
        Ok(id)
    }

    fn apply_property_diff(
        &mut self,
        node: &HostId,
        old: &Props,
        new: &Props,
    ) -> Result<(), HostError> {
        self.tree.apply_property_diff(node, old, new)?;
        self.note(format!("diff {node}"));
        Ok(())
    }

    fn attach(&mut self, parent: &HostId, child: &HostId) -> Result<(), HostError> {
        if self.fail_attach.replace(false) {
            return Err(injected());
        }
        self.tree.attach(parent, child)?;
        self.note(format!("attach {child}"));
        Ok(())
    }

    fn detach(&mut self, parent: &HostId, child: &HostId) -> Result<(), HostError> {
        self.tree.detach(parent, child)?;
        self.note(format!("detach {child}"));
        Ok(())
    }
}

/// Engine over a `ScriptedHost` writing into `journal`.
pub fn mount_scripted(journal: &Journal) -> (Engine<ScriptedHost>, HostId) {
    let mut host = ScriptedHost::new(journal.clone());
    let container = host.tree.create_container();
    (Engine::new(host), container)
}

/// Index of the last journal entry starting with `prefix`.
pub fn last_entry(journal: &Journal, prefix: &str) -> Option<usize> {
    journal.borrow().iter().rposition(|entry| entry.starts_with(prefix))
}
