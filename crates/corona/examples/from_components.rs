//! Example: Laying out a component tree built in code
//!
//! This example builds a small performance-test scenario, lays it out on
//! the default canvas and prints where every leaf ends up.

use corona::{
    DiagramBuilder,
    config::AppConfig,
    model::{BadgeKind, Component, ComponentKind},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building radial layout from components...\n");

    let scenario = Component::new(ComponentKind::Scenario, "http")
        .with_child(
            Component::new(ComponentKind::Generator, "DefaultMessageGenerator")
                .with_property("threads", "4"),
        )
        .with_child(
            Component::new(ComponentKind::Sender, "HttpSender")
                .with_property("target", "http://localhost:8080/")
                .with_property("method", "POST")
                .with_execution_count(1500),
        )
        .with_child(Component::new(ComponentKind::Receiver, "HttpReceiver"))
        .with_child(
            Component::new(ComponentKind::Reporter, "ResponseTimeStatsReporter")
                .with_badge(BadgeKind::Add)
                .with_child(Component::new(ComponentKind::Destination, "ConsoleDestination"))
                .with_child(
                    Component::new(ComponentKind::Destination, "CsvDestination")
                        .with_property("path", "results.csv"),
                ),
        );

    let builder = DiagramBuilder::new(AppConfig::default());
    let mut diagram = builder.build(&scenario)?;
    let frame = diagram.frame()?;

    println!(
        "Diagram needs {:.1}° (minimum {:.1}°)\n",
        frame.extents().preferred(),
        frame.extents().minimum()
    );

    for leaf in frame.leaves() {
        let placement = leaf.placement();
        let geometry = leaf.geometry();
        println!(
            "{:<12} {:<28} start {:>6.1}° extent {:>5.1}° radii [{:.0}, {:.0}] rotation {:>5.1}°{}",
            leaf.kind(),
            geometry.header(),
            placement.angular().start(),
            placement.angular().extent(),
            placement.radial().inner(),
            placement.radial().outer(),
            geometry.text_rotation(),
            if geometry.is_minimum_view() { " (minimum view)" } else { "" },
        );
    }

    Ok(())
}
