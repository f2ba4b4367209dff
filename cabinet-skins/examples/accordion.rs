//! Drives an accordion and a sidebar through a scripted pointer session.
//!
//! Run with `cargo run -p cabinet-skins --example accordion`; debug output
//! goes to `accordion.log`.

use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use cabinet::{Cabinet, DrawerEvent, HoverTarget, HoverTracker, ListenerResponse, TokioScheduler};
use cabinet_skins::Skin;
use simplelog::{Config, LevelFilter, WriteLogger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = File::create("accordion.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let scheduler = Arc::new(TokioScheduler::current()?);

    // Accordion: click driven, the form in section 2 refuses to close.
    let accordion = Cabinet::new(Skin::Accordion.config()?, scheduler.clone());
    for title in ["Account", "Billing", "Profile form"] {
        let drawer = accordion.add_drawer();
        drawer.add_open_observer(move |open| {
            println!("  [accordion] {:<12} {}", title, if open { "open" } else { "closed" });
        });
    }
    if let Some(form) = accordion.drawer(2) {
        form.add_open_listener(|open| {
            if open {
                ListenerResponse::Proceed
            } else {
                println!("  [accordion] Profile form has unsaved input, staying open");
                ListenerResponse::VetoClose
            }
        });
    }

    println!("click Account, then Profile form, then Billing");
    for index in [0, 2, 1] {
        accordion.dispatch(index, DrawerEvent::Click);
        settle().await;
    }
    println!("open: {:?}", accordion.open_indices());

    // Sidebar: hover driven, jitter between trigger and contents is absorbed.
    let sidebar = Cabinet::new(Skin::Sidebar.config()?, scheduler);
    for title in ["Files", "Search"] {
        let drawer = sidebar.add_drawer();
        drawer.add_open_observer(move |open| {
            println!("  [sidebar] {:<12} {}", title, if open { "open" } else { "closed" });
        });
    }

    println!("hover Files trigger, slide onto its contents, move to Search, leave");
    let mut tracker = HoverTracker::new();
    let path = [
        Some(HoverTarget::trigger(0)),
        Some(HoverTarget::contents(0)),
        Some(HoverTarget::trigger(1)),
        None,
    ];
    for target in path {
        for (index, event) in tracker.update(target) {
            sidebar.dispatch(index, event);
        }
        settle().await;
    }
    println!("open: {:?}", sidebar.open_indices());

    log::info!("demo finished");
    Ok(())
}

/// Wait past the debounce window.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}
