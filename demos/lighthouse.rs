/// Lighthouse example — a scripted walkthrough of the bundled story.
///
/// Relights the dark lighthouse: borrow the skiff, find the key and the oil
/// in the cove, and light the lamp. A few deliberately wrong moves show how
/// rejected input leaves the session where it was.
///
/// Run with: cargo run --example lighthouse

use adventure_engine::{Session, StoryEngine};

enum Step {
    Act(&'static str),
    Use(&'static str),
}

fn main() {
    let engine = StoryEngine::builder()
        .locations_dir("story_data/lighthouse/locations")
        .manifest("story_data/lighthouse/story.ron")
        .build()
        .expect("Failed to load the lighthouse story");

    println!("========================================");
    println!("   {}", engine.title());
    println!("========================================\n");

    let mut session = Session::new(&engine);
    print_state(&session);

    let script = [
        Step::Act("Search the crates"),
        Step::Act("Return to the quay"),
        Step::Act("Row out to the lighthouse"), // not offered yet
        Step::Act("Knock on the harbormaster's shack"),
        Step::Act("Return to the quay"),
        Step::Act("Row out to the lighthouse"),
        Step::Use("brass key"), // not carried yet
        Step::Act("Take the path to the cove"),
        Step::Act("Search the boathouse"),
        Step::Act("Take the lantern too"),
        Step::Act("Back to the shore"),
        Step::Act("Enter the cave"),
        Step::Use("lantern"),
        Step::Use("rope"),
        Step::Act("Back to the shore"),
        Step::Act("Climb back to the landing"),
        Step::Use("brass key"),
        Step::Act("Enter the tower"),
        Step::Use("lantern"),
        Step::Act("Climb to the lamp room"),
        Step::Use("oil cask"),
        Step::Act("Light the lamp"),
        Step::Act("Row home"),
    ];

    for step in &script {
        let (label, result) = match step {
            Step::Act(text) => (format!("> {}", text), session.perform_action(text).map(|_| ())),
            Step::Use(item) => (format!("> use {}", item), session.use_item(item).map(|_| ())),
        };
        println!("{}", label);
        match result {
            Ok(_) => print_state(&session),
            Err(e) => println!("  [rejected: {}]\n", e),
        }
    }

    println!("========================================");
    println!("   THE END — {} turns", session.turns());
    println!("========================================");
}

fn print_state(session: &Session<'_>) {
    let state = session.state();
    println!("--- {} ({}) ---", state.location_name, state.image_url);
    println!("{}", state.narrative);
    if !state.inventory.is_empty() {
        println!("[Carrying: {}]", state.inventory.join(", "));
    }
    for action in &state.actions {
        println!("  * {}", action);
    }
    println!();
}
