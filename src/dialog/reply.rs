/// Marker that keeps the USSD session open.
pub const CONTINUE_MARKER: &str = "CON ";
/// Marker that ends the USSD session.
pub const END_MARKER: &str = "END ";

/// What the gateway receives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Another prompt follows.
    Continue(String),
    /// Terminal message.
    End(String),
    /// Nothing recognized; empty body.
    Silent,
}

impl Reply {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Continue(text) | Self::End(text) => text,
            Self::Silent => "",
        }
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continue(text) => write!(f, "{CONTINUE_MARKER}{text}"),
            Self::End(text) => write!(f, "{END_MARKER}{text}"),
            Self::Silent => Ok(()),
        }
    }
}
