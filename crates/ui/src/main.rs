use anyhow::Result;

use barmark_ui::DemoApp;

fn main() -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_title("barmark"),
        ..Default::default()
    };

    eframe::run_native(
        "barmark",
        native_options,
        Box::new(|cc| Ok(Box::new(DemoApp::new(cc)?))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start ui: {e}"))?;

    Ok(())
}
