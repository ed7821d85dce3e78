use std::io::Write;

use browser::Shell;
use bus::Bus;
use runtime_content::start_content_runtime;

use crate::scenario::{Scenario, ScenarioError, Step};

/// Outline lines printed per step.
const OUTLINE_CAP: usize = 200;

/// Play `scenario` against a fresh shell and content runtime, writing the
/// page state after every step to `out`.
pub fn execute(scenario: &Scenario, out: &mut dyn Write) -> Result<(), ScenarioError> {
    let steps = scenario.steps()?;
    let mut shell = Shell::new(scenario.build_document()?, scenario.picker.clone());
    let (bus, cmd_rx) = Bus::new();
    let runtime = start_content_runtime(cmd_rx, bus.evt_tx.clone());
    shell.connect(bus);

    for (index, step) in steps.iter().enumerate() {
        log::info!(target: "section_reader", "step {}: {step}", index + 1);
        match step {
            Step::Launch => {
                let launch = shell.select_section()?;
                writeln!(out, "launch: {launch:?}").map_err(ScenarioError::Output)?;
            }
            Step::Navigate => {
                let document = scenario.build_document()?;
                shell.active_tab_mut().navigate(document);
            }
            Step::Input(event) => shell.active_tab_mut().handle_input(event),
        }
        report(&shell, index + 1, step, out).map_err(ScenarioError::Output)?;
    }

    drop(shell);
    if runtime.join().is_err() {
        log::warn!(target: "section_reader", "content runtime panicked");
    }
    Ok(())
}

fn report(shell: &Shell, number: usize, step: &Step, out: &mut dyn Write) -> std::io::Result<()> {
    let tab = shell.active_tab();
    let phase = match tab.picker().phase() {
        Some(phase) => format!("{phase:?}"),
        None => "Idle".to_string(),
    };
    writeln!(out, "== step {number}: {step}")?;
    writeln!(out, "phase: {phase}")?;
    if let Some(chain) = tab.picker().session().and_then(|s| s.chain()) {
        writeln!(
            out,
            "chain: {} (active {})",
            chain.breadcrumb(tab.document(), usize::MAX),
            chain.active_index()
        )?;
    }
    if !tab.stylesheets().is_empty() {
        writeln!(out, "stylesheets: {}", tab.stylesheets().join(", "))?;
    }
    for line in dom::outline(tab.document(), OUTLINE_CAP) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"
        [viewport]
        width = 1024
        height = 768

        [picker]
        breadcrumb_segments = 3

        [[element]]
        key = "article"
        tag = "div"
        class = "article"
        rect = [0, 0, 800, 600]
        client = [784, 600]

        [[element]]
        key = "para"
        parent = "article"
        tag = "p"
        rect = [0, 100, 800, 200]

        [[element]]
        key = "span"
        parent = "para"
        tag = "span"
        rect = [0, 100, 120, 20]
        text = "Lorem ipsum"

        [[step]]
        launch = true
        [[step]]
        click = [10, 105]
        [[step]]
        key = "KeyX"
        [[step]]
        key = "KeyX"
        [[step]]
        key = "KeyC"
        [[step]]
        key = "KeyQ"
    "#;

    fn run(text: &str) -> String {
        let scenario = Scenario::parse(text).unwrap();
        let mut out = Vec::new();
        execute(&scenario, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn full_session_reports_each_phase() {
        let report = run(ARTICLE);

        assert!(report.contains("launch: Started"));
        assert!(report.contains("== step 4: key KeyX\nphase: AncestorCycle\nchain: span.p.div (active 2)"));
        assert!(report.contains("sectionReaderFloatingButtonSelectors"));
        assert!(report.contains("\"span.p.div\""));
        assert!(report.contains("== step 5: key KeyC\nphase: FocusExpand"));
        assert!(report.contains("position: fixed; inset: 0; overflow: auto;"));

        let last = report.rsplit("== step 6").next().unwrap();
        assert!(last.contains("phase: Idle"));
        assert!(!last.contains("sectionReaderFloatingButton"));
        assert!(last.contains(r#"<div class="article">"#));
    }

    #[test]
    fn relaunch_is_reported_as_already_running() {
        let report = run(
            r#"
            [[step]]
            launch = true
            [[step]]
            launch = true
            [[step]]
            navigate = true
            [[step]]
            launch = true
            "#,
        );
        let launches: Vec<&str> = report.lines().filter(|l| l.starts_with("launch:")).collect();
        assert_eq!(
            launches,
            ["launch: Started", "launch: AlreadyRunning", "launch: Started"]
        );
    }
}
