//! Dashboard widgets.
//!
//! A widget's payload shape is selected by its `type` tag; each variant
//! carries only the fields that shape needs.

use serde::Serialize;

use crate::models::Status;

// ---

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidget {
    pub title: String,
    #[serde(flatten)]
    pub content: WidgetContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_to: Option<String>,
    pub link_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum WidgetContent {
    Stat {
        value: String,
        /// Percent change against the previous period; sign gives direction.
        #[serde(skip_serializing_if = "Option::is_none")]
        change: Option<f64>,
    },
    Status {
        status: Status,
        description: String,
    },
    List {
        items: Vec<ListItem>,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub label: String,
    pub value: String,
}

impl DashboardWidget {
    pub fn new(title: impl Into<String>, content: WidgetContent) -> Self {
        Self {
            title: title.into(),
            content,
            link_to: None,
            link_text: "Ver más".to_string(),
        }
    }

    pub fn linked(mut self, link_to: impl Into<String>) -> Self {
        self.link_to = Some(link_to.into());
        self
    }

    /// One-line plain-text rendering, for logs and text clients.
    pub fn summary(&self) -> String {
        let body = match &self.content {
            WidgetContent::Stat { value, change } => match change {
                Some(c) if *c > 0.0 => format!("{value} (↑ {}%)", c.abs()),
                Some(c) if *c < 0.0 => format!("{value} (↓ {}%)", c.abs()),
                _ => value.clone(),
            },
            WidgetContent::Status { status, description } => {
                format!("{} - {}", capitalize(status.label()), description)
            }
            WidgetContent::List { items } => items
                .iter()
                .map(|item| format!("{}: {}", item.label, item.value))
                .collect::<Vec<_>>()
                .join(", "),
            WidgetContent::Text { text } => text.clone(),
        };
        format!("{}: {}", self.title, body)
    }
}

/// `óptimo` → `Óptimo`
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
