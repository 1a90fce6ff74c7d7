//! Gallery demo: eight items laid out at several simulated window widths.
//!
//! Run with: `cargo run -p masonry --example gallery`
//! Set `RUST_LOG=masonry_layout=debug` to watch resize coalescing.

use masonry::html::render_html;
use masonry::{
    Breakpoints, ColumnAttrs, FrameScheduler, HostEnv, Lifecycle, ManualFrameScheduler, Masonry,
    MasonryProps, SimulatedViewport, Style,
};
use std::rc::Rc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    masonry::logging::init("info")?;

    let viewport = Rc::new(SimulatedViewport::new(1280.0));
    let scheduler = Rc::new(ManualFrameScheduler::new());
    let host = HostEnv::new(
        viewport.clone(),
        Some(scheduler.clone() as Rc<dyn FrameScheduler>),
    );

    let props = MasonryProps::new()
        .breakpoint_cols(Breakpoints::new(4).at(1100, 3).at(700, 2).at(500, 1))
        .class_name("my-masonry-grid")
        .column_class_name("my-masonry-grid_column")
        .column_attrs(ColumnAttrs::with_style(
            Style::new().with("padding-left", "30px"),
        ));
    let grid = Masonry::new(props, &host);

    let lifecycle = Lifecycle::new();
    grid.bind(&lifecycle);
    lifecycle.mount();

    let items: Vec<String> = (1..=8).map(|i| format!("<div>Item {i}</div>")).collect();

    println!("=== Masonry Gallery ===\n");
    for width in [1280.0, 1100.0, 900.0, 640.0, 480.0] {
        // A drag produces several resize events before the next frame.
        viewport.resize(width + 40.0);
        viewport.resize(width + 20.0);
        viewport.resize(width);
        scheduler.run_frame();

        let view = grid.render(items.iter(), |item, _| item.as_str());
        println!("{width:>6}px -> {} columns", grid.column_count());
        for column in &view.columns {
            let labels: Vec<&str> = column
                .items
                .iter()
                .map(|item| item.trim_start_matches("<div>").trim_end_matches("</div>"))
                .collect();
            println!("    column {}: {}", column.index, labels.join(", "));
        }
        println!("    {}\n", render_html(&view));
    }

    println!(
        "{} resize events, {} recomputations",
        grid.engine().reactor().notification_count(),
        grid.engine().reactor().recompute_count()
    );

    lifecycle.cleanup();
    Ok(())
}
