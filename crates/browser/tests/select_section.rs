use std::time::{Duration, Instant};

use browser::{PICKER_STYLESHEET, Shell};
use bus::{Bus, ContentCommand};
use dom::test_utils::PageBuilder;
use dom::{Document, InputEvent};
use picker::{Launch, Phase, PickerConfig};
use runtime_content::start_content_runtime;

fn page() -> Document {
    let mut page = PageBuilder::new(800.0, 600.0);
    page.block(page.body(), "article", 0.0, 0.0, 800.0, 300.0);
    page.build()
}

fn connected_shell() -> Shell {
    let mut shell = Shell::new(page(), PickerConfig::default());
    let (bus, cmd_rx) = Bus::new();
    start_content_runtime(cmd_rx, bus.evt_tx.clone());
    shell.connect(bus);
    shell
}

#[test]
fn first_select_injects_then_launches() {
    let mut shell = connected_shell();

    assert_eq!(shell.select_section(), Ok(Launch::Started));
    let tab = shell.active_tab();
    assert_eq!(tab.stylesheets(), &[PICKER_STYLESHEET.to_string()]);
    assert_eq!(tab.picker().phase(), Some(Phase::CursorSelect));
}

#[test]
fn select_while_running_is_rejected() {
    let mut shell = connected_shell();
    shell.select_section().unwrap();
    let listeners = shell.active_tab().document().listeners().len();

    assert_eq!(shell.select_section(), Ok(Launch::AlreadyRunning));
    assert_eq!(
        shell.active_tab().document().listeners().len(),
        listeners
    );
}

#[test]
fn stylesheet_survives_sessions_until_navigation() {
    let mut shell = connected_shell();
    shell.select_section().unwrap();
    shell.active_tab_mut().handle_input(&InputEvent::key("KeyQ"));
    assert!(!shell.active_tab().picker().is_running());

    assert_eq!(shell.select_section(), Ok(Launch::Started));
    assert_eq!(shell.active_tab().stylesheets().len(), 1);
    shell.active_tab_mut().handle_input(&InputEvent::key("KeyQ"));

    shell.active_tab_mut().navigate(page());
    assert!(shell.active_tab().stylesheets().is_empty());
    assert_eq!(shell.select_section(), Ok(Launch::Started));
    assert_eq!(shell.active_tab().stylesheets().len(), 1);
}

#[test]
fn tabs_have_separate_guards() {
    let mut shell = connected_shell();
    shell.select_section().unwrap();
    let second = shell.add_tab(page());

    assert_eq!(shell.select_section(), Ok(Launch::Started));
    assert_eq!(shell.tab(second).unwrap().stylesheets().len(), 1);
    assert!(shell.switch_to(1));
    assert!(shell.active_tab().picker().is_running());
}

#[test]
fn missing_runtime_still_launches() {
    let mut shell = Shell::new(page(), PickerConfig::default());
    assert_eq!(shell.select_section(), Ok(Launch::Started));
    assert!(shell.active_tab().has_stylesheet(PICKER_STYLESHEET));

    let (bus, cmd_rx) = Bus::new();
    drop(cmd_rx);
    let mut shell = Shell::new(page(), PickerConfig::default());
    shell.connect(bus);
    assert_eq!(shell.select_section(), Ok(Launch::Started));
    assert!(shell.active_tab().has_stylesheet(PICKER_STYLESHEET));
}

#[test]
fn silent_runtime_times_out() {
    let (bus, cmd_rx) = Bus::new();
    let _evt_tx = bus.evt_tx.clone();
    let mut shell = Shell::new(page(), PickerConfig::default());
    shell.connect(bus);
    shell.set_handshake_timeout(Duration::from_millis(20));

    let started = Instant::now();
    assert_eq!(shell.select_section(), Ok(Launch::Started));
    assert!(started.elapsed() >= Duration::from_millis(20));
    assert!(shell.active_tab().has_stylesheet(PICKER_STYLESHEET));
    assert!(matches!(
        cmd_rx.try_recv(),
        Ok(ContentCommand::SectionReaderSelect { tab_id: 1, .. })
    ));
}

#[test]
fn runtime_that_dropped_its_sender_fails_fast() {
    let (bus, cmd_rx) = Bus::new();
    let mut shell = Shell::new(page(), PickerConfig::default());
    shell.connect(bus);
    shell.set_handshake_timeout(Duration::from_secs(60));

    let started = Instant::now();
    assert_eq!(shell.select_section(), Ok(Launch::Started));
    assert!(started.elapsed() < Duration::from_secs(30));
    assert!(shell.active_tab().has_stylesheet(PICKER_STYLESHEET));
    drop(cmd_rx);
}
