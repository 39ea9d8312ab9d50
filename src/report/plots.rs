use std::path::Path;

use anyhow::Result;
use plotly::common::{DashType, Line, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

/// Build an ROC plot from fallout and recall, with the Gini coefficient in
/// the title and a dashed diagonal reference line.
pub fn roc_plot(fallout: &[f64], recall: &[f64], gini: f64) -> Plot {
    // Assert that the fallout and recall have the same length
    assert_eq!(
        fallout.len(),
        recall.len(),
        "Fallout and recall must have the same length"
    );

    let reference_line = Scatter::new(vec![0.0, 1.0], vec![0.0, 1.0])
        .mode(Mode::Lines)
        .name("No discrimination")
        .line(
            Line::new()
                .color("rgba(128, 128, 128, 0.4)")
                .dash(DashType::Dash),
        );

    let curve = Scatter::new(fallout.to_vec(), recall.to_vec())
        .mode(Mode::Lines)
        .name("ROC")
        .line(Line::new().width(2.0));

    let layout = Layout::new()
        .title(format!("ROC plot: gini={:.4}", gini).as_str())
        .x_axis(Axis::new().title("Fallout"))
        .y_axis(Axis::new().title("Recall"));

    let mut plot = Plot::new();
    plot.add_trace(reference_line);
    plot.add_trace(curve);
    plot.set_layout(layout);

    plot
}

/// Render the ROC plot to a static HTML file.
pub fn write_roc_plot<P: AsRef<Path>>(
    path: P,
    fallout: &[f64],
    recall: &[f64],
    gini: f64,
) -> Result<()> {
    let plot = roc_plot(fallout, recall, gini);
    plot.write_html(path.as_ref());
    log::info!("Wrote ROC plot to {}", path.as_ref().display());
    Ok(())
}
