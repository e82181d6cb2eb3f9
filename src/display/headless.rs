use std::collections::BTreeMap;

use super::{DisplaySurface, Widget, WidgetId};

/// In-memory display. Holds only the widgets it was created with.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    widgets: BTreeMap<WidgetId, Widget>,
}

impl HeadlessDisplay {
    pub fn with_widgets(ids: impl IntoIterator<Item = WidgetId>) -> Self {
        Self {
            widgets: ids.into_iter().map(|id| (id, Widget::default())).collect(),
        }
    }

    pub fn full() -> Self {
        Self::with_widgets(WidgetId::ALL)
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(&id)
    }

    pub fn text(&self, id: WidgetId) -> Option<&str> {
        self.widget(id).map(|w| w.text.as_str())
    }
}

impl DisplaySurface for HeadlessDisplay {
    fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(&id)
    }
}
