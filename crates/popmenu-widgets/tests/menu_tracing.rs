#![cfg(feature = "tracing")]
//! Tracing instrumentation of the menu lifecycle.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use popmenu_core::geometry::{Rect, Size};
use popmenu_render::Frame;
use popmenu_widgets::menu::{Menu, MenuState};
use popmenu_widgets::{StatefulWidget, Widget};
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

struct Fixed(Size);

impl Widget for Fixed {
    fn render(&self, _area: Rect, _frame: &mut Frame) {}

    fn measure(&self, _available: Size) -> Size {
        self.0
    }
}

#[derive(Default)]
struct TraceState {
    spans: Vec<String>,
    messages: Vec<String>,
}

struct TraceCapture {
    state: Arc<Mutex<TraceState>>,
}

impl<S> Layer<S> for TraceCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::Id,
        _ctx: Context<'_, S>,
    ) {
        struct WidgetName {
            name: Option<String>,
        }
        impl tracing::field::Visit for WidgetName {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "widget" {
                    self.name = Some(value.to_string());
                }
            }

            fn record_debug(&mut self, _field: &tracing::field::Field, _value: &dyn std::fmt::Debug) {}
        }
        let mut widget = WidgetName { name: None };
        attrs.record(&mut widget);
        let label = match widget.name {
            Some(name) => format!("{}:{name}", attrs.metadata().name()),
            None => attrs.metadata().name().to_string(),
        };
        self.state.lock().expect("trace lock").spans.push(label);
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct Msg {
            message: Option<String>,
        }
        impl tracing::field::Visit for Msg {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_string());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                }
            }
        }
        let mut msg = Msg { message: None };
        event.record(&mut msg);
        if let Some(message) = msg.message {
            self.state.lock().expect("trace lock").messages.push(message);
        }
    }
}

#[test]
fn lifecycle_emits_render_spans_and_transition_events() {
    let state = Arc::new(Mutex::new(TraceState::default()));
    let subscriber = tracing_subscriber::registry().with(TraceCapture {
        state: Arc::clone(&state),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    let menu = Menu::new(Fixed(Size::new(40.0, 20.0)), Fixed(Size::new(200.0, 150.0)));
    let mut menu_state = MenuState::new();
    let area = Rect::new(20.0, 20.0, 40.0, 20.0);
    let mut frame = Frame::new(Size::new(400.0, 800.0));

    menu.render(area, &mut frame, &mut menu_state);
    let first = menu_state.show();
    let second = menu_state.show();
    menu_state.on_trigger_measured(first, area.origin());
    menu_state.measure_from_last_layout(second);
    frame.clear();
    menu.render(area, &mut frame, &mut menu_state);
    menu_state.hide();
    for _ in 0..30 {
        menu_state.tick(Duration::from_millis(16));
    }

    let snapshot = state.lock().expect("trace lock");
    assert!(snapshot.spans.iter().any(|s| s == "widget_render:Menu"));
    assert!(snapshot.spans.iter().any(|s| s == "widget_render:MenuOverlay"));

    let expected = [
        "menu.show",
        "menu.measure.stale",
        "menu.measure.applied",
        "menu.grow.start",
        "menu.hide",
        "menu.hidden",
    ];
    let mut cursor = snapshot.messages.iter();
    for message in expected {
        assert!(
            cursor.any(|m| m == message),
            "missing or out-of-order `{message}` in {:?}",
            snapshot.messages
        );
    }
}
