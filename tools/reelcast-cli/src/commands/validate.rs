//! Validate a session's cursor track and effect configuration.

use reelcast_processing_core::ZoomTimeline;

use crate::SessionArgs;

pub fn run(args: SessionArgs) -> anyhow::Result<()> {
    println!("Validating session:");
    println!("  Cursor data: {}", args.cursor_data.display());
    println!("  Zoom config: {}", args.zoom_config.display());

    let session = super::load_session(&args)?;

    println!("  Cursor samples: {}", session.track.positions.len());
    println!(
        "  Zoom layers: {} manual, {} auto ({:?} mode)",
        session.effects.zoom.manual_layers.len(),
        session.effects.zoom.auto_layers.len(),
        session.effects.zoom.mode
    );

    let mut issues = session.validate();
    let timeline = ZoomTimeline::new(&session.effects.zoom);
    issues.extend(timeline.warnings().iter().map(ToString::to_string));

    if issues.is_empty() {
        println!("\nSession is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Rendering will clamp or ignore the affected values.",
            issues.len()
        );
    }

    Ok(())
}
