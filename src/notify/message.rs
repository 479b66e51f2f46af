//! Notification payload and message rendering.

use handlebars::Handlebars;
use serde::Serialize;

use crate::detect::ChangeEvent;

use super::NotifyError;

/// Default Handlebars template for notification text.
pub const DEFAULT_TEMPLATE: &str = "Interface {{interface}} addresses: \
{{#each addresses}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}";

/// What a receiver is told about one change: the interface and its
/// current address list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Interface name.
    pub interface: String,
    /// Current addresses in snapshot order.
    pub addresses: Vec<String>,
    /// Human-readable reason the change fired.
    pub reason: String,
}

impl From<&ChangeEvent> for Notification {
    fn from(event: &ChangeEvent) -> Self {
        Self {
            interface: event.interface.name.clone(),
            addresses: event.interface.addresses().to_vec(),
            reason: event.reason.to_string(),
        }
    }
}

impl Notification {
    /// Subject line used where a separate title is needed (email).
    #[must_use]
    pub fn subject(&self) -> String {
        format!("IP address change on {}", self.interface)
    }
}

/// Renders notification text from a Handlebars template.
///
/// Output is plain text, so HTML escaping is disabled.
#[derive(Debug, Clone)]
pub struct MessageRenderer {
    template: String,
}

impl MessageRenderer {
    /// Creates a renderer for the given template.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Checks template syntax by rendering a sample notification.
    ///
    /// # Errors
    ///
    /// Returns the Handlebars error message if the template is invalid.
    pub fn validate(template: &str) -> Result<(), String> {
        let sample = Notification {
            interface: "eth0".to_string(),
            addresses: vec!["192.0.2.1".to_string()],
            reason: "first run".to_string(),
        };
        Self::new(template)
            .render(&sample)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    /// Renders the text for a notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if rendering fails.
    pub fn render(&self, notification: &Notification) -> Result<String, NotifyError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars
            .render_template(&self.template, notification)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }
}

impl Default for MessageRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}
