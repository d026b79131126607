use std::cell::{Cell, RefCell};
use std::rc::Rc;

use evbus::{
    listener_table, Config, DuplicatePolicy, EventManager, Listener, ListenerTable, Quit,
    RegistrationError, Tick,
};

struct Sprite {
    name: &'static str,
    ticks: RefCell<Vec<u64>>,
}

impl Sprite {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            ticks: RefCell::new(Vec::new()),
        }
    }

    fn on_tick(&self, tick: &Tick) {
        self.ticks.borrow_mut().push(tick.frame);
    }
}

listener_table! {
    Sprite {
        Tick => on_tick,
    }
}

struct Echo {
    running: Cell<bool>,
    quits: Cell<u32>,
}

impl Echo {
    fn on_quit(&self, _: &Quit) {
        self.running.set(false);
        self.quits.set(self.quits.get() + 1);
    }
}

#[test]
fn test_each_instance_is_bound_separately() {
    let manager = EventManager::default();
    let left = manager.attach(Sprite::new("left")).unwrap();
    let right = manager.attach(Sprite::new("right")).unwrap();

    manager.send(Tick::new(9)).unwrap();

    assert_eq!(left.name, "left");
    assert_eq!(*left.ticks.borrow(), vec![9]);
    assert_eq!(right.name, "right");
    assert_eq!(*right.ticks.borrow(), vec![9]);
    assert_eq!(manager.listener_count::<Tick>(), 2);
}

#[test]
fn test_table_is_built_once_per_type() {
    let a: *const ListenerTable<Sprite> = Sprite::listener_table();
    let b: *const ListenerTable<Sprite> = Sprite::listener_table();
    assert_eq!(a, b);
}

#[test]
fn test_external_table_matches_capability() {
    let manager = EventManager::default();
    let table = ListenerTable::<Echo>::builder()
        .on("on_quit", Echo::on_quit)
        .build();
    let echo = Rc::new(Echo {
        running: Cell::new(true),
        quits: Cell::new(0),
    });

    let attached = manager.attach_with(Rc::clone(&echo), &table).unwrap();
    assert_eq!(attached.bindings().len(), 1);
    assert_eq!(attached.bindings()[0].0.name(), "Quit");

    manager.queue(Quit::new()).unwrap();
    assert!(echo.running.get());
    manager.send(Tick::new(1)).unwrap();
    assert!(!echo.running.get());
}

#[test]
fn test_disposed_owner_receives_nothing() {
    let manager = EventManager::default();
    let sprite = manager.attach(Sprite::new("gone")).unwrap();
    let owner = sprite.dispose();

    manager.send(Tick::new(1)).unwrap();
    assert!(owner.ticks.borrow().is_empty());
}

#[test]
fn test_bind_holds_owner_weakly() {
    let manager = EventManager::default();
    let echo = Rc::new(Echo {
        running: Cell::new(true),
        quits: Cell::new(0),
    });

    manager
        .bind(&Rc::downgrade(&echo), "on_quit", Echo::on_quit)
        .unwrap();
    manager.send(Quit::new()).unwrap();
    assert_eq!(echo.quits.get(), 1);

    drop(echo);
    manager.send(Quit::new()).unwrap();
    assert_eq!(manager.listener_count::<Quit>(), 0);
}

#[test]
fn test_duplicate_bind_is_idempotent_by_default() {
    let manager = EventManager::default();
    let echo = Rc::new(Echo {
        running: Cell::new(true),
        quits: Cell::new(0),
    });
    let weak = Rc::downgrade(&echo);

    let a = manager.bind(&weak, "on_quit", Echo::on_quit).unwrap();
    let b = manager.bind(&weak, "on_quit", Echo::on_quit).unwrap();
    assert_eq!(a, b);

    manager.send(Quit::new()).unwrap();
    assert_eq!(echo.quits.get(), 1);
}

#[test]
fn test_duplicate_attach_rejected_when_configured() {
    let manager = EventManager::new(Config {
        duplicate_policy: DuplicatePolicy::Reject,
        ..Config::default()
    });
    let sprite = manager.attach(Sprite::new("once")).unwrap();

    match manager.attach_rc(sprite.handle()) {
        Err(RegistrationError::Duplicate { event, listener }) => {
            assert_eq!(event, "Tick");
            assert_eq!(listener, "Sprite::on_tick");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("duplicate attach accepted"),
    }
    assert_eq!(manager.listener_count::<Tick>(), 1);
}

#[test]
fn test_failing_method_reports_owner_label() {
    struct Strict;

    impl Strict {
        fn on_tick(&self, tick: &Tick) -> Result<(), String> {
            if tick.frame > 1 {
                Err(format!("frame {} too late", tick.frame))
            } else {
                Ok(())
            }
        }
    }

    listener_table! {
        Strict {
            Tick => on_tick,
        }
    }

    let manager = EventManager::default();
    let _strict = manager.attach(Strict).unwrap();

    manager.send(Tick::new(1)).unwrap();
    let err = manager.send(Tick::new(2)).unwrap_err();
    assert_eq!(err.listener(), Some("Strict::on_tick"));
    assert_eq!(
        err.to_string(),
        "listener Strict::on_tick failed on Tick: frame 2 too late"
    );
}
