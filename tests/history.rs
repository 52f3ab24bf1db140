use std::cell::RefCell;
use std::rc::Rc;

use waypoint::{AddressBar, App, HistorySource, PollingSource};

/// An in-memory address bar. `history_api` controls whether `push_state`
/// succeeds, mimicking capable and legacy environments.
struct FakeBar {
    address: Rc<RefCell<String>>,
    history_api: bool,
}

impl FakeBar {
    fn new(initial: &str, history_api: bool) -> (FakeBar, Rc<RefCell<String>>) {
        let address = Rc::new(RefCell::new(initial.to_string()));
        let bar = FakeBar {
            address: Rc::clone(&address),
            history_api,
        };
        (bar, address)
    }
}

impl AddressBar for FakeBar {
    fn address(&self) -> String {
        self.address.borrow().clone()
    }

    fn push_state(&self, url: &str) -> bool {
        if self.history_api {
            *self.address.borrow_mut() = url.to_string();
        }
        self.history_api
    }

    fn set_fragment(&self, url: &str) {
        *self.address.borrow_mut() = format!("#!{url}");
    }
}

#[test]
fn history_is_bounded_to_one_hundred_entries() {
    let app = App::new();
    app.route("/{page}", |_, _| Ok(())).unwrap();

    for i in 0..120 {
        app.location(&format!("/p{i}"), false);
    }

    let history = app.history();
    assert_eq!(history.len(), 100);
    // The first navigation pushes nothing, so the stack saw /p0 .. /p118 and
    // evicted the oldest nineteen.
    assert_eq!(history[0], "/p19");
    assert_eq!(history[99], "/p118");
    assert_eq!(app.current_url(), "/p119");
}

#[test]
fn adjacent_duplicates_collapse() {
    let app = App::new();
    app.route("/{page}", |_, _| Ok(())).unwrap();

    app.location("/a", false);
    app.location("/a", false);
    app.location("/b", false);

    assert_eq!(app.history(), ["/a"]);
}

#[test]
fn refresh_does_not_grow_the_stack() {
    let app = App::new();
    app.route("/{page}", |_, _| Ok(())).unwrap();

    app.location("/a", false);
    app.location("/b", false);
    app.location("/b", true);
    app.refresh();

    assert_eq!(app.history(), ["/a"]);
    assert_eq!(app.current_url(), "/b");
    assert_eq!(app.navigation_count(), 4);
}

#[test]
fn back_pops_the_stack_and_falls_back_to_the_root() {
    let app = App::new();
    app.route("/", |_, _| Ok(())).unwrap();
    app.route("/{page}", |_, _| Ok(())).unwrap();

    app.location("/a", false);
    app.location("/b", false);
    assert_eq!(app.history(), ["/a"]);

    app.back();
    assert_eq!(app.current_url(), "/a");
    // Back-class navigations never push, so the stack is empty now.
    assert!(app.history().is_empty());

    app.back();
    assert_eq!(app.current_url(), "/");
}

#[test]
fn native_source_suppresses_the_echo_of_its_own_push() {
    let app = App::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let seen = Rc::clone(&log);
    app.route("/{page}", move |app, _| {
        seen.borrow_mut().push(app.current_url());
        Ok(())
    })
    .unwrap();

    let (bar, address) = FakeBar::new("/home", true);
    app.bind(HistorySource::new(bar));
    app.start();
    assert_eq!(*log.borrow(), ["/home"]);

    app.redirect("/next");
    assert_eq!(*address.borrow(), "/next");
    assert_eq!(*log.borrow(), ["/home", "/next"]);

    // The environment echoes the push as a pop event. It must be dropped.
    app.pop("/next");
    assert_eq!(*log.borrow(), ["/home", "/next"]);
    assert_eq!(app.navigation_count(), 2);

    // A genuine pop for the same URL later on is not suppressed.
    app.pop("/next");
    assert_eq!(*log.borrow(), ["/home", "/next", "/next"]);
}

#[test]
fn pop_navigations_do_not_push_history() {
    let app = App::new();
    app.route("/{page}", |_, _| Ok(())).unwrap();

    let (bar, _) = FakeBar::new("/home", true);
    app.bind(HistorySource::new(bar));
    app.start();
    app.redirect("/next");
    assert_eq!(app.history(), ["/home"]);

    app.pop("/home");
    assert_eq!(app.current_url(), "/home");
    assert_eq!(app.history(), ["/home"]);
}

#[test]
fn ready_fires_once() {
    let app = App::new();
    let count = Rc::new(RefCell::new(0));
    app.route("/{page}", |_, _| Ok(())).unwrap();

    let seen = Rc::clone(&count);
    app.on_ready(move |_, _| {
        *seen.borrow_mut() += 1;
    });

    let (bar, _) = FakeBar::new("/home", true);
    app.bind(HistorySource::new(bar));
    app.start();
    app.start();

    assert_eq!(*count.borrow(), 1);
}

#[test]
fn polling_source_defers_redirects_until_the_next_tick() {
    let app = App::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let seen = Rc::clone(&log);
    app.route("/{page}", move |app, _| {
        let model = app.model::<u32>().map(|value| *value);
        seen.borrow_mut().push(format!("{}:{model:?}", app.current_url()));
        Ok(())
    })
    .unwrap();

    let (bar, address) = FakeBar::new("/home", false);
    app.bind(PollingSource::new(bar));
    app.start();
    assert_eq!(*log.borrow(), ["/home:None"]);

    // A legacy source only assigns the fragment; nothing dispatches yet.
    app.redirect_with("/next", 7u32);
    assert_eq!(*address.borrow(), "#!/next");
    assert_eq!(app.current_url(), "/home");

    // The next tick observes the drift and delivers the navigation, model
    // included, without pushing onto the history stack.
    app.poll();
    assert_eq!(*log.borrow(), ["/home:None", "/next:Some(7)"]);
    assert_eq!(app.current_url(), "/next");
    assert!(app.history().is_empty());

    // No drift, no navigation.
    app.poll();
    assert_eq!(app.navigation_count(), 2);
}

#[test]
fn hash_change_delivers_legacy_navigations() {
    let app = App::new();
    app.route("/{page}", |_, _| Ok(())).unwrap();

    let (bar, _) = FakeBar::new("/home", false);
    app.bind(HistorySource::new(bar));
    app.start();

    app.hash_change("#!/docs");
    assert_eq!(app.current_url(), "/docs");
    assert!(app.history().is_empty());
    assert_eq!(app.navigation_count(), 2);
}

#[test]
fn polling_interval_is_half_a_second() {
    assert_eq!(
        PollingSource::<FakeBar>::INTERVAL,
        std::time::Duration::from_millis(500)
    );
}
