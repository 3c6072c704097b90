use serde::{Deserialize, Serialize};

/// Visibility of the immersive session, mirrored from the XR runtime once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum XrSessionState {
    /// No immersive session (desktop viewing)
    #[default]
    NotPresenting,
    /// Session exists but the headset is not being worn / content is hidden
    Hidden,
    /// Content visible but input focus is elsewhere (system menu)
    VisibleBlurred,
    Visible,
}

impl XrSessionState {
    /// Movement is only simulated while the user can actually see the scene.
    pub fn allows_movement(self) -> bool {
        self == XrSessionState::Visible
    }

    pub fn is_immersive(self) -> bool {
        self != XrSessionState::NotPresenting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_visible_allows_movement() {
        assert!(XrSessionState::Visible.allows_movement());
        assert!(!XrSessionState::VisibleBlurred.allows_movement());
        assert!(!XrSessionState::Hidden.allows_movement());
        assert!(!XrSessionState::NotPresenting.allows_movement());
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&XrSessionState::VisibleBlurred).unwrap();
        assert_eq!(json, "\"visible-blurred\"");
        let state: XrSessionState = serde_json::from_str("\"not-presenting\"").unwrap();
        assert_eq!(state, XrSessionState::NotPresenting);
    }
}
