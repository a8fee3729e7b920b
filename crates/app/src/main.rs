use gpui::*;
use gpui_component::Root;

use murmur::app::{
    MurmurShell, Quit, ResetPanels, ToggleListAnimation, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use murmur::settings::SettingsStore;
use murmur_chat::ExpressionCatalog;

/// Application entry point.
///
/// Loads settings and the emoji catalog, initializes gpui-component, binds the
/// shell actions and opens one phone-sized window wrapped in [`Root`].
fn main() {
    tracing_subscriber::fmt::init();

    let catalog = match ExpressionCatalog::normal() {
        Ok(catalog) => catalog,
        Err(error) => {
            tracing::error!("failed to build expression catalog: {error}");
            return;
        }
    };
    let settings = SettingsStore::load();

    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        // Required before any Root is created.
        gpui_component::init(cx);

        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });

        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("escape", ResetPanels, None),
            KeyBinding::new("cmd-l", ToggleListAnimation, None),
        ]);

        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        size(px(WINDOW_WIDTH), px(WINDOW_HEIGHT)),
                        cx,
                    ))),
                    titlebar: Some(TitlebarOptions {
                        title: Some("Murmur".into()),
                        ..Default::default()
                    }),
                    ..Default::default()
                };

                let opened = cx.open_window(options, |window, cx| {
                    let shell = cx.new(|cx| MurmurShell::new(settings, catalog, window, cx));
                    cx.new(|cx| Root::new(shell, window, cx))
                });
                if let Err(error) = opened {
                    tracing::error!("failed to open main window: {error}");
                    cx.quit();
                    return;
                }

                cx.activate(true);
            })
        })
        .detach();
    });
}
